/*
    MartyPC
    https://github.com/dbalsom/martypc

    Copyright 2022-2025 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------

    device_traits::disc_ports.rs

    Defines the collaborators the floppy controller talks to: the disc
    controller chip, the media change and drive noise sinks, and the virtual
    time scheduler that drives the poll engine.
*/

/// The disc controller chip. Codecs report data and status through these hooks from `poll`.
pub trait FdcPort {
    /// A command addressed a drive that will never answer.
    fn timeout(&mut self);

    fn data(&mut self, _byte: u8) {}

    fn finish_read(&mut self) {}

    fn sector_id(&mut self, _track: u8, _side: u8, _sector: u8, _size: u8, _crc: u16) {}

    fn write_protect(&mut self) {}

    fn index_pulse(&mut self) {}
}

/// Signals raised to the rest of the machine when a drive's head moves.
pub trait DiscSignals {
    /// Clear the latched disc changed bit for `drive`.
    fn media_change_clear(&mut self, drive: usize);

    /// Play head step noise for a seek of `delta` tracks.
    fn seek_noise(&mut self, delta: i32);
}

/// A single-shot scheduler in virtual time. Delays are in timer ticks (see `TIMER_USEC`).
pub trait DiscTimer {
    /// Schedule the next callback `delay` ticks from now, replacing any pending one.
    fn schedule(&mut self, delay: u64);

    fn cancel(&mut self);

    /// Return the number of ticks until the pending callback, if one is scheduled.
    fn pending(&self) -> Option<u64>;

    /// Advance virtual time by up to `ticks`. Returns the ticks consumed, which is less than
    /// `ticks` only when the pending callback fell due; that callback is then no longer pending.
    fn elapse(&mut self, ticks: u64) -> u64;
}
