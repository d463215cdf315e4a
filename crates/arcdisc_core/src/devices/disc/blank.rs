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

    devices::disc::blank.rs

    Creates blank disc images. ADFS images get an old-map free space map and an
    empty root directory so they can be used without formatting.
*/

use crate::{
    device_traits::disc_ports::{DiscSignals, DiscTimer, FdcPort},
    device_types::{disc::DISC_MAX_DRIVES, format::DiscFormat},
    devices::disc::controller::FloppyController,
    error::DiscError,
};
use std::path::Path;

const ADFS_FIRST_FREE_SECTOR: u32 = 7;
const ADFS_ROOT_SECTOR: u32 = 2;
const ADFS_DIR_IDENTITY: &[u8; 4] = b"Hugo";
// End of the root directory, the last byte the blank filesystem touches.
const ADFS_ROOT_END: usize = 0x700;

struct AdfsLayout {
    sectors: u32,
    disc_id: [u8; 2],
}

const ADFS_S: AdfsLayout = AdfsLayout {
    sectors: 1280,
    disc_id: [0x88, 0x39],
};

const ADFS_L: AdfsLayout = AdfsLayout {
    sectors: 2560,
    disc_id: [0x01, 0x84],
};

fn put_u24(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 3].copy_from_slice(&value.to_le_bytes()[..3]);
}

/// Compute the ADFS old map checksum of a 256 byte map sector. The sum runs from byte 254 down
/// to byte 0 with end-around carry. Missing bytes of a short sector count as zero.
pub(crate) fn map_checksum(sector: &[u8]) -> u8 {
    let mut sum: u32 = 255;
    for &byte in sector.iter().take(255).rev() {
        if sum > 255 {
            sum = (sum & 0xFF) + 1;
        }
        sum += byte as u32;
    }
    (sum & 0xFF) as u8
}

fn write_adfs_root(image: &mut [u8], layout: &AdfsLayout) {
    // Free space map, sector 0: start of the single free region and the disc size.
    put_u24(image, 0x000, ADFS_FIRST_FREE_SECTOR);
    put_u24(image, 0x0FC, layout.sectors);
    image[0x0FF] = map_checksum(&image[0x000..0x100]);

    // Free space map, sector 1: length of the free region, disc id and end of the free list.
    put_u24(image, 0x100, layout.sectors - ADFS_FIRST_FREE_SECTOR);
    image[0x1FB..0x1FD].copy_from_slice(&layout.disc_id);
    image[0x1FE] = 3;
    image[0x1FF] = map_checksum(&image[0x100..0x200]);

    // Root directory, sectors 2-6.
    image[0x201..0x205].copy_from_slice(ADFS_DIR_IDENTITY);
    image[0x6CC] = b'$';
    put_u24(image, 0x6D6, ADFS_ROOT_SECTOR);
    image[0x6D9] = b'$';
    image[0x6FB..0x6FF].copy_from_slice(ADFS_DIR_IDENTITY);
}

/// Build a zero filled image of `size` bytes, with an empty ADFS filesystem if `format` is one
/// of the old map ADFS formats. An image too small to hold the root directory stays zero filled.
pub(crate) fn blank_image(format: DiscFormat, size: u64) -> Vec<u8> {
    let mut image = vec![0u8; size as usize];
    if image.len() < ADFS_ROOT_END {
        if matches!(format, DiscFormat::Adf | DiscFormat::Adl) {
            log::warn!("blank_image(): {} bytes is too small for an ADFS root, leaving it empty", size);
        }
        return image;
    }
    match format {
        DiscFormat::Adf => write_adfs_root(&mut image, &ADFS_S),
        DiscFormat::Adl => write_adfs_root(&mut image, &ADFS_L),
        _ => {}
    }
    image
}

impl<T: DiscTimer, F: FdcPort, S: DiscSignals> FloppyController<T, F, S> {
    /// Create a blank image at `path` sized for its extension and mount it in `drive`. Returns
    /// `Ok(None)` without creating anything if the extension has no fixed size format.
    pub fn create(&mut self, drive: usize, path: impl AsRef<Path>) -> Result<Option<DiscFormat>, DiscError> {
        let path = path.as_ref();
        if drive >= DISC_MAX_DRIVES {
            log::error!("create(): Invalid drive: {}", drive);
            return Err(DiscError::BadDrive(drive));
        }

        let name = path.to_string_lossy();
        let Some((format, size)) = self
            .registry
            .fixed_entry(&name)
            .and_then(|entry| entry.size.fixed_size().map(|size| (entry.format, size)))
        else {
            log::debug!("create(): No fixed size format for {}", name);
            return Ok(None);
        };

        if let Err(source) = std::fs::write(path, blank_image(format, size)) {
            let err = DiscError::CreateFailure {
                path: path.to_path_buf(),
                source,
            };
            log::error!("{}", err);
            return Err(err);
        }
        log::debug!("Created blank {} image {} ({} bytes)", format, name, size);

        self.mount(drive, path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::disc::test_util::*;

    #[test]
    fn adf_map_matches_reference_bytes() {
        let image = blank_image(DiscFormat::Adf, 327_680);
        assert_eq!(image.len(), 327_680);
        assert_eq!(image[0], 7);
        assert_eq!(&image[0xFC..0x102], &[0x00, 0x05, 0x00, 0x0C, 0xF9, 0x04]);
        assert_eq!(&image[0x1FB..0x205], &[0x88, 0x39, 0x00, 0x03, 0xC1, 0x00, b'H', b'u', b'g', b'o']);
        assert_eq!(image[0x6CC], b'$');
        assert_eq!(&image[0x6D6..0x6DA], &[2, 0, 0, b'$']);
        assert_eq!(&image[0x6FB..0x6FF], b"Hugo");
    }

    #[test]
    fn adl_map_matches_reference_bytes() {
        let image = blank_image(DiscFormat::Adl, 655_360);
        assert_eq!(&image[0xFC..0x102], &[0x00, 0x0A, 0x00, 0x11, 0xF9, 0x09]);
        assert_eq!(&image[0x1FB..0x200], &[0x01, 0x84, 0x00, 0x03, 0x8A]);
        assert_eq!(&image[0x6FB..0x6FF], b"Hugo");
    }

    #[test]
    fn map_checksum_of_empty_sector() {
        assert_eq!(map_checksum(&[0u8; 256]), 0xFF);
        let mut sector = [0u8; 256];
        sector[1] = 1;
        assert_eq!(map_checksum(&sector), 0x01);
    }

    #[test]
    fn short_inputs_do_not_panic() {
        assert_eq!(map_checksum(&[]), 0xFF);
        assert_eq!(map_checksum(&[0, 1]), 0x01);

        let image = blank_image(DiscFormat::Adf, 0x100);
        assert_eq!(image, vec![0u8; 0x100]);
        assert!(blank_image(DiscFormat::Adl, 0).is_empty());
    }

    #[test]
    fn non_adfs_images_are_zero_filled() {
        let image = blank_image(DiscFormat::Ssd, 800_000);
        assert_eq!(image.len(), 800_000);
        assert!(image.iter().all(|&b| b == 0));
    }

    #[test]
    fn create_adf_writes_and_mounts() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FakeLoader::default();
        let mut fdc = test_controller(&loader);
        let path = dir.path().join("disk.ADF");

        assert_eq!(fdc.create(0, &path).unwrap(), Some(DiscFormat::Adf));

        let data = std::fs::read(&path).unwrap();
        assert_eq!(data.len(), 327_680);
        assert_eq!(data[0], 7);
        assert_eq!(&data[0x6FB..=0x6FE], b"Hugo");

        assert!(!fdc.is_empty(0));
        assert_eq!(loader.state().loads[0].format, DiscFormat::Adf);
        assert_eq!(loader.state().loads[0].data, data);
    }

    #[test]
    fn create_uses_first_fixed_entry() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FakeLoader::default();
        let mut fdc = test_controller(&loader);

        let adl = dir.path().join("big.adl");
        assert_eq!(fdc.create(1, &adl).unwrap(), Some(DiscFormat::Adl));
        assert_eq!(std::fs::metadata(&adl).unwrap().len(), 655_360);

        let dsd = dir.path().join("dfs.dsd");
        assert_eq!(fdc.create(2, &dsd).unwrap(), Some(DiscFormat::Dsd));
        assert_eq!(std::fs::metadata(&dsd).unwrap().len(), 1_600_000);
    }

    #[test]
    fn unconstrained_and_unknown_extensions_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FakeLoader::default();
        let mut fdc = test_controller(&loader);

        for name in ["flux.hfe", "flux.scp", "notes.txt", "noext"] {
            let path = dir.path().join(name);
            assert_eq!(fdc.create(0, &path).unwrap(), None);
            assert!(!path.exists());
        }
        assert!(fdc.is_empty(0));
    }

    #[test]
    fn create_reports_bad_drive_and_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FakeLoader::default();
        let mut fdc = test_controller(&loader);

        let path = dir.path().join("disk.adf");
        assert!(matches!(fdc.create(5, &path), Err(DiscError::BadDrive(5))));
        assert!(!path.exists());

        let unwritable = dir.path().join("no_such_dir").join("disk.adf");
        assert!(matches!(fdc.create(0, &unwritable), Err(DiscError::CreateFailure { .. })));
        assert!(fdc.is_empty(0));
    }
}
