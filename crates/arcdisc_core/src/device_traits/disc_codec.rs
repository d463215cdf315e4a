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

    device_traits::disc_codec.rs

    Defines the DiscCodec trait which any disc image codec (SSD, ADF, HFE, etc)
    must implement, and the CodecLoader trait used to construct codecs on mount.
*/

use crate::{
    device_traits::disc_ports::FdcPort,
    device_types::{
        disc::{DriveCapabilities, SectorRequest, TrackRequest},
        format::DiscFormat,
        image_stream::ImageStream,
    },
};

/// A codec bound to a drive slot. Only `close` and `capabilities` are required. The controller
/// consults `capabilities()` before every optional call, so a codec only needs to override the
/// operations it reports.
pub trait DiscCodec {
    fn capabilities(&self) -> DriveCapabilities;

    /// Request that the drive be polled 16 times per base poll interval.
    fn high_res_poll(&self) -> bool {
        false
    }

    /// Release the image. The codec is dropped after this returns.
    fn close(&mut self, drive: usize);

    fn seek(&mut self, _drive: usize, _track: i32) {}

    /// Called once per engine tick while this codec's drive is selected and the motor is on.
    fn poll(&mut self, _fdc: &mut dyn FdcPort) {}

    fn read_sector(&mut self, _drive: usize, _req: SectorRequest) {}

    fn write_sector(&mut self, _drive: usize, _req: SectorRequest) {}

    fn read_address(&mut self, _drive: usize, _req: TrackRequest) {}

    fn format(&mut self, _drive: usize, _req: TrackRequest) {}

    fn stop(&mut self) {}
}

/// Constructs codecs for resolved images. The controller calls `load` at most once per mount
/// attempt. The stream is positioned at the start of the image.
pub trait CodecLoader {
    fn load(
        &mut self,
        format: DiscFormat,
        drive: usize,
        stream: ImageStream,
        write_protect: bool,
    ) -> anyhow::Result<Box<dyn DiscCodec>>;
}
