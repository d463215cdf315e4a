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

    device_types::image_stream.rs

    Implements the stream handed to disc image codecs. An image is backed either
    by an open file or by an in-memory buffer extracted from an archive.
*/

use std::{
    fs::File,
    io::{Cursor, Read, Result as IoResult, Seek, SeekFrom, Write},
};

pub enum ImageStream {
    File(File),
    Memory(Cursor<Vec<u8>>),
}

impl ImageStream {
    pub fn from_vec(data: Vec<u8>) -> Self {
        ImageStream::Memory(Cursor::new(data))
    }

    /// Return the total length of the backing store in bytes. The stream position is unchanged.
    pub fn len(&mut self) -> IoResult<u64> {
        match self {
            ImageStream::File(file) => Ok(file.metadata()?.len()),
            ImageStream::Memory(cursor) => Ok(cursor.get_ref().len() as u64),
        }
    }

    pub fn is_empty(&mut self) -> IoResult<bool> {
        Ok(self.len()? == 0)
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, ImageStream::Memory(_))
    }
}

impl Read for ImageStream {
    fn read(&mut self, buf: &mut [u8]) -> IoResult<usize> {
        match self {
            ImageStream::File(file) => file.read(buf),
            ImageStream::Memory(cursor) => cursor.read(buf),
        }
    }
}

impl Write for ImageStream {
    fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
        match self {
            ImageStream::File(file) => file.write(buf),
            ImageStream::Memory(cursor) => cursor.write(buf),
        }
    }

    fn flush(&mut self) -> IoResult<()> {
        match self {
            ImageStream::File(file) => file.flush(),
            ImageStream::Memory(cursor) => cursor.flush(),
        }
    }
}

impl Seek for ImageStream {
    fn seek(&mut self, pos: SeekFrom) -> IoResult<u64> {
        match self {
            ImageStream::File(file) => file.seek(pos),
            ImageStream::Memory(cursor) => cursor.seek(pos),
        }
    }
}
