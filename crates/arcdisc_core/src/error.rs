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

    error.rs

    Error type returned by disc mount and create operations.
*/

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum DiscError {
    #[error("Invalid drive index: {0}")]
    BadDrive(usize),
    #[error("Couldn't open disc image '{}': {source}", .path.display())]
    OpenFailure {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Couldn't identify the format of disc image '{}'", .0.display())]
    FormatUnrecognized(PathBuf),
    #[error("Couldn't read archive '{}': {source}", .path.display())]
    ArchiveFailure {
        path:   PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("Archive entry '{name}' is {size} bytes, too large to be a disc image")]
    EntryTooLarge { name: String, size: u64 },
    #[error("Couldn't create disc image '{}': {source}", .path.display())]
    CreateFailure {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{format} codec failed to load '{}': {source}", .path.display())]
    CodecLoad {
        format: String,
        path:   PathBuf,
        #[source]
        source: anyhow::Error,
    },
}
