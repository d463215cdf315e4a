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

    devices::disc::archive.rs

    Scans a zip archive for the first entry that looks like a disc image and
    extracts it into memory.
*/

use crate::{
    device_types::format::{DiscFormat, FormatRegistry, ARCHIVE_ENTRY_LIMIT},
    error::DiscError,
};
use std::{
    io::{self, Read, Seek},
    path::Path,
};
use zip::{result::ZipError, ZipArchive};

pub(crate) struct ArchiveSelection {
    pub(crate) name:   String,
    pub(crate) format: DiscFormat,
    pub(crate) data:   Vec<u8>,
}

/// Walk the archive's entries in stored order and extract the first file the registry accepts.
/// Only that entry is decompressed. The archive is dropped before returning.
pub(crate) fn prescan<R: Read + Seek>(
    registry: &FormatRegistry,
    reader: R,
    path: &Path,
) -> Result<ArchiveSelection, DiscError> {
    let archive_err = |source: ZipError| DiscError::ArchiveFailure {
        path: path.to_path_buf(),
        source,
    };
    let mut archive = ZipArchive::new(reader).map_err(archive_err)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(archive_err)?;
        if entry.is_dir() {
            continue;
        }

        let size = entry.size();
        let Some(found) = registry.resolve(entry.name(), size) else {
            log::trace!("Skipping archive entry {}", entry.name());
            continue;
        };

        if size > ARCHIVE_ENTRY_LIMIT {
            let err = DiscError::EntryTooLarge {
                name: entry.name().to_string(),
                size,
            };
            log::warn!("{}", err);
            continue;
        }

        // The declared size is not trusted. Read one byte past it to catch entries that inflate
        // to more than they claim.
        let mut data = Vec::with_capacity(size as usize);
        entry
            .by_ref()
            .take(size + 1)
            .read_to_end(&mut data)
            .map_err(|e| archive_err(ZipError::from(e)))?;
        if data.len() as u64 > size {
            return Err(archive_err(ZipError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("entry {} inflates past its declared size of {} bytes", entry.name(), size),
            ))));
        }

        log::debug!(
            "Extracted {} ({} bytes) from archive {} as {}",
            entry.name(),
            data.len(),
            path.display(),
            found.format
        );
        return Ok(ArchiveSelection {
            name: entry.name().to_string(),
            format: found.format,
            data,
        });
    }

    Err(DiscError::FormatUnrecognized(path.to_path_buf()))
}
