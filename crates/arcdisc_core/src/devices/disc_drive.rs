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

    devices::disc_drive.rs

    Implements a disc drive slot: the codec bound to it and the head and
    media state the controller tracks for it.
*/

use crate::device_traits::disc_codec::DiscCodec;
use std::path::{Path, PathBuf};

pub struct DriveSlot {
    drive_n: usize,
    pub(crate) codec: Option<Box<dyn DiscCodec>>,
    pub(crate) track: i32,
    pub(crate) write_protected: bool,
    pub(crate) media_changed: bool,
    pub(crate) path: Option<PathBuf>,
}

impl DriveSlot {
    pub fn new(drive_n: usize) -> Self {
        Self {
            drive_n,
            codec: None,
            track: 0,
            write_protected: false,
            media_changed: false,
            path: None,
        }
    }

    pub fn drive_n(&self) -> usize {
        self.drive_n
    }

    pub fn is_empty(&self) -> bool {
        self.codec.is_none()
    }

    pub fn track(&self) -> i32 {
        self.track
    }

    pub fn write_protected(&self) -> bool {
        self.write_protected
    }

    /// Whether the disc has changed since the head last stepped.
    pub fn media_changed(&self) -> bool {
        self.media_changed
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub(crate) fn codec_mut(&mut self) -> Option<&mut Box<dyn DiscCodec>> {
        self.codec.as_mut()
    }

    /// Bind a freshly loaded codec, closing whatever was in the drive first.
    pub(crate) fn bind(&mut self, codec: Box<dyn DiscCodec>, path: PathBuf, write_protect: bool) {
        self.eject();
        self.codec = Some(codec);
        self.path = Some(path);
        self.write_protected = write_protect;
        self.media_changed = true;
    }

    /// Close and drop the bound codec. The head position is kept.
    pub(crate) fn eject(&mut self) {
        if let Some(mut codec) = self.codec.take() {
            log::debug!("Drive {}: closing image {:?}", self.drive_n, self.path);
            codec.close(self.drive_n);
        }
        self.path = None;
    }
}
