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

    devices::disc::timer.rs

    A deterministic single-shot virtual time scheduler for the disc poll engine.
*/

use crate::device_traits::disc_ports::DiscTimer;

#[derive(Debug, Default)]
pub struct VirtualTimer {
    now: u64,
    deadline: Option<u64>,
}

impl VirtualTimer {
    pub fn new() -> Self {
        Default::default()
    }

    /// Total ticks elapsed since creation.
    pub fn now(&self) -> u64 {
        self.now
    }
}

impl DiscTimer for VirtualTimer {
    fn schedule(&mut self, delay: u64) {
        self.deadline = Some(self.now.saturating_add(delay));
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }

    fn pending(&self) -> Option<u64> {
        self.deadline.map(|deadline| deadline.saturating_sub(self.now))
    }

    fn elapse(&mut self, ticks: u64) -> u64 {
        match self.pending() {
            Some(due) if due <= ticks => {
                self.now += due;
                self.deadline = None;
                due
            }
            _ => {
                self.now = self.now.saturating_add(ticks);
                ticks
            }
        }
    }
}
