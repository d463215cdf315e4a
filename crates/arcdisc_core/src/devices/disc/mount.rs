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

    devices::disc::mount.rs

    Implements mounting disc images into drive slots. An image is identified by
    archive signature, then by extension and size, then by size alone, and is
    handed to exactly one codec.
*/

use crate::{
    device_traits::disc_ports::{DiscSignals, DiscTimer, FdcPort},
    device_types::{
        disc::DISC_MAX_DRIVES,
        format::{guess_format_from_size, DiscFormat, ARCHIVE_SIGNATURE},
        image_stream::ImageStream,
    },
    devices::disc::{archive, controller::FloppyController},
    disc_config::DiscConfig,
    error::DiscError,
};
use std::{
    fs::{File, OpenOptions},
    io::{Read, Seek},
    path::Path,
};

impl<T: DiscTimer, F: FdcPort, S: DiscSignals> FloppyController<T, F, S> {
    /// Mount the image at `path` into `drive`, replacing any image already there. On failure the
    /// drive is left as it was.
    pub fn mount(&mut self, drive: usize, path: impl AsRef<Path>) -> Result<DiscFormat, DiscError> {
        self.mount_with(drive, path, None)
    }

    /// Mount with an explicit write protect state, overriding the configured default. Images that
    /// can't be opened for writing are always write protected. An image taken from an archive is
    /// mounted write protected even when the archive file itself is writable and `write_protect`
    /// is `Some(false)`, as writes are never stored back into the archive.
    pub fn mount_with(
        &mut self,
        drive: usize,
        path: impl AsRef<Path>,
        write_protect: Option<bool>,
    ) -> Result<DiscFormat, DiscError> {
        let path = path.as_ref();
        let result = self.mount_inner(drive, path, write_protect);
        if let Err(e) = &result {
            log::error!("Drive {}: failed to mount {}: {}", drive, path.display(), e);
        }
        result
    }

    /// Mount every image named in `config`. Failures are logged and skipped. Returns the number
    /// of images mounted.
    pub fn mount_configured(&mut self, config: &DiscConfig) -> usize {
        let mut mounted = 0;
        for drive in &config.drive {
            if let Some(image) = &drive.image {
                if self.mount_with(drive.index, image, drive.write_protect).is_ok() {
                    mounted += 1;
                }
            }
        }
        mounted
    }

    fn mount_inner(&mut self, drive: usize, path: &Path, wp_override: Option<bool>) -> Result<DiscFormat, DiscError> {
        if drive >= DISC_MAX_DRIVES {
            return Err(DiscError::BadDrive(drive));
        }

        let open_err = |source| DiscError::OpenFailure {
            path: path.to_path_buf(),
            source,
        };

        let (mut file, read_only) = match OpenOptions::new().read(true).write(true).open(path) {
            Ok(file) => (file, false),
            Err(e) => {
                log::debug!("Couldn't open {} for writing ({}), trying read-only", path.display(), e);
                (File::open(path).map_err(open_err)?, true)
            }
        };
        let write_protect = read_only || wp_override.unwrap_or(self.default_write_protect);

        let size = file.metadata().map_err(open_err)?.len();
        let mut signature = [0u8; 4];
        file.read_exact(&mut signature).map_err(open_err)?;

        if signature == ARCHIVE_SIGNATURE {
            let selection = archive::prescan(&self.registry, file, path)?;
            log::debug!(
                "Drive {}: mounting {} from archive {}",
                drive,
                selection.name,
                path.display()
            );
            let stream = ImageStream::from_vec(selection.data);
            self.bind_codec(drive, selection.format, path, stream, true)?;
            return Ok(selection.format);
        }

        let name = path.to_string_lossy();
        let format = match self.registry.resolve(&name, size) {
            Some(entry) => entry.format,
            None => {
                let format = guess_format_from_size(size)
                    .ok_or_else(|| DiscError::FormatUnrecognized(path.to_path_buf()))?;
                log::debug!("No format for {}, guessed {} from size {}", name, format, size);
                format
            }
        };

        file.rewind().map_err(open_err)?;
        self.bind_codec(drive, format, path, ImageStream::File(file), write_protect)?;
        Ok(format)
    }

    fn bind_codec(
        &mut self,
        drive: usize,
        format: DiscFormat,
        path: &Path,
        stream: ImageStream,
        write_protect: bool,
    ) -> Result<(), DiscError> {
        let codec = self
            .loader
            .load(format, drive, stream, write_protect)
            .map_err(|source| DiscError::CodecLoad {
                format: format.to_string(),
                path: path.to_path_buf(),
                source,
            })?;

        log::debug!(
            "Drive {}: mounted {} as {}{}",
            drive,
            path.display(),
            format,
            if write_protect { " (write protected)" } else { "" }
        );
        self.drives[drive].bind(codec, path.to_path_buf(), write_protect);
        Ok(())
    }
}
