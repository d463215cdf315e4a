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

    device_types::format.rs

    Defines the disc image format registry and the rules used to pick a codec
    for an image: extension and size matching, and the raw size heuristic used
    when no extension matches.
*/

use crate::device_types::disc::Density;
use strum_macros::Display;

/// Signature of a zip local file header. Images starting with it are scanned as archives.
pub const ARCHIVE_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Largest uncompressed archive entry we will consider to be a floppy image.
pub const ARCHIVE_ENTRY_LIMIT: u64 = 10_000_000;

/// Layout of a raw sector dump, handed to the generic sector codec.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct SectorGeometry {
    pub sectors: u8,
    pub sector_size: u16,
    pub sides: u8,
    /// 2 for 40 track images read in an 80 track drive.
    pub track_step: u8,
    pub density: Density,
    pub first_sector: u8,
}

impl SectorGeometry {
    pub const TRACKS: u64 = 80;

    pub const fn new(sectors: u8, sector_size: u16, sides: u8, track_step: u8, density: Density) -> Self {
        Self {
            sectors,
            sector_size,
            sides,
            track_step,
            density,
            first_sector: 1,
        }
    }

    /// Return the size in bytes of an image with this geometry.
    pub fn image_size(&self) -> u64 {
        (Self::TRACKS / self.track_step as u64) * self.sides as u64 * self.sectors as u64 * self.sector_size as u64
    }
}

/// Identifies the codec a disc image is handed to.
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq)]
pub enum DiscFormat {
    /// 200K single sided DFS
    #[strum(to_string = "SSD")]
    Ssd,
    /// 400K double sided DFS
    #[strum(to_string = "DSD")]
    Dsd,
    /// ADFS S/M/L, 256 byte sectors
    #[strum(to_string = "ADF")]
    Adf,
    /// Arthur/RISC OS 800K, 1024 byte sectors
    #[strum(to_string = "ADF (Archimedes DD)")]
    AdfArcDd,
    /// RISC OS 1.6M, 1024 byte sectors
    #[strum(to_string = "ADF (Archimedes HD)")]
    AdfArcHd,
    /// ADFS L, interleaved sides
    #[strum(to_string = "ADL")]
    Adl,
    #[strum(to_string = "HFE")]
    Hfe,
    #[strum(to_string = "FDI")]
    Fdi,
    #[strum(to_string = "APD")]
    Apd,
    #[strum(to_string = "SCP")]
    Scp,
    /// Raw sector dump with an explicit geometry.
    #[strum(to_string = "raw sector image")]
    Sector(SectorGeometry),
}

/// Size constraint of a registry entry.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SizeRule {
    /// Images up to and including this many bytes.
    Max(u64),
    /// Self describing formats of any size.
    Unconstrained,
}

impl SizeRule {
    pub fn admits(&self, size: u64) -> bool {
        match self {
            SizeRule::Max(bound) => size <= *bound,
            SizeRule::Unconstrained => true,
        }
    }

    pub fn fixed_size(&self) -> Option<u64> {
        match self {
            SizeRule::Max(bound) => Some(*bound),
            SizeRule::Unconstrained => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FormatEntry {
    pub ext: &'static str,
    pub format: DiscFormat,
    pub size: SizeRule,
}

impl FormatEntry {
    const fn new(ext: &'static str, format: DiscFormat, size: SizeRule) -> Self {
        Self { ext, format, size }
    }

    fn matches_ext(&self, ext: &str) -> bool {
        self.ext.eq_ignore_ascii_case(ext)
    }
}

/// Entries sharing an extension are ordered smallest bound first so that size alone picks
/// between them.
const BASE_FORMATS: [FormatEntry; 7] = [
    FormatEntry::new("SSD", DiscFormat::Ssd, SizeRule::Max(800_000)),
    FormatEntry::new("DSD", DiscFormat::Dsd, SizeRule::Max(1_600_000)),
    FormatEntry::new("ADF", DiscFormat::Adf, SizeRule::Max(327_680)),
    FormatEntry::new("ADF", DiscFormat::AdfArcDd, SizeRule::Max(1_638_400)),
    FormatEntry::new("ADF", DiscFormat::AdfArcHd, SizeRule::Max(3_276_800)),
    FormatEntry::new("ADL", DiscFormat::Adl, SizeRule::Max(655_360)),
    FormatEntry::new("HFE", DiscFormat::Hfe, SizeRule::Unconstrained),
];

const EXTENDED_FORMATS: [FormatEntry; 3] = [
    FormatEntry::new("FDI", DiscFormat::Fdi, SizeRule::Unconstrained),
    FormatEntry::new("APD", DiscFormat::Apd, SizeRule::Unconstrained),
    FormatEntry::new("SCP", DiscFormat::Scp, SizeRule::Unconstrained),
];

/// Return the extension of the last component of `name`, if any. Both separators are
/// accepted since archive entry names always use '/'.
pub fn file_extension(name: &str) -> Option<&str> {
    let file_name = name.rsplit(['/', '\\']).next()?;
    file_name.rsplit_once('.').map(|(_, ext)| ext)
}

/// An ordered table of supported image formats.
#[derive(Clone, Debug)]
pub struct FormatRegistry {
    entries: Vec<FormatEntry>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new(true)
    }
}

impl FormatRegistry {
    /// Build the registry. `extended` adds the FDI, APD and SCP flux formats.
    pub fn new(extended: bool) -> Self {
        let mut entries = BASE_FORMATS.to_vec();
        if extended {
            entries.extend_from_slice(&EXTENDED_FORMATS);
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[FormatEntry] {
        &self.entries
    }

    /// Return the first entry, in registry order, whose extension matches `name` and whose size
    /// rule admits `size`.
    pub fn resolve(&self, name: &str, size: u64) -> Option<FormatEntry> {
        let ext = file_extension(name)?;
        self.entries
            .iter()
            .find(|entry| entry.matches_ext(ext) && entry.size.admits(size))
            .copied()
    }

    /// Return the first fixed size entry whose extension matches `name`.
    pub fn fixed_entry(&self, name: &str) -> Option<FormatEntry> {
        let ext = file_extension(name)?;
        self.entries
            .iter()
            .find(|entry| entry.matches_ext(ext) && entry.size.fixed_size().is_some())
            .copied()
    }

    /// Return the lower-case extensions a file browser should offer, including archives.
    pub fn extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = Vec::new();
        for entry in &self.entries {
            let ext = entry.ext.to_ascii_lowercase();
            if !extensions.contains(&ext) {
                extensions.push(ext);
            }
        }
        extensions.push("zip".to_string());
        extensions
    }
}

#[derive(Copy, Clone, Debug)]
enum SizeTest {
    Exact(u64),
    AtMost(u64),
}

impl SizeTest {
    fn matches(&self, size: u64) -> bool {
        match self {
            SizeTest::Exact(n) => size == *n,
            SizeTest::AtMost(n) => size <= *n,
        }
    }
}

/// Raw size fallback, checked in order. The two range checks come last as they would shadow
/// every exact match below 400K. Non-sector entries name base registry slots so both tables
/// always agree on which codec a size fallback reaches.
const SIZE_HEURISTICS: [(SizeTest, DiscFormat); 8] = [
    // 1680K DOS - 80*2*21*512
    (
        SizeTest::Exact(1_720_320),
        DiscFormat::Sector(SectorGeometry::new(21, 512, 2, 1, Density::High)),
    ),
    // 1440K DOS - 80*2*18*512
    (
        SizeTest::Exact(1_474_560),
        DiscFormat::Sector(SectorGeometry::new(18, 512, 2, 1, Density::High)),
    ),
    // 800K ADFS/DOS - 80*2*5*1024
    (SizeTest::Exact(819_200), BASE_FORMATS[2].format),
    // 640K ADFS - 80*2*16*256
    (SizeTest::Exact(655_360), BASE_FORMATS[3].format),
    // 720K DOS - 80*2*9*512
    (
        SizeTest::Exact(737_280),
        DiscFormat::Sector(SectorGeometry::new(9, 512, 2, 1, Density::Double)),
    ),
    // 360K DOS - 40*2*9*512
    (
        SizeTest::Exact(368_640),
        DiscFormat::Sector(SectorGeometry::new(9, 512, 2, 2, Density::Double)),
    ),
    // 200K DFS - 80*1*10*256
    (SizeTest::AtMost(204_800), BASE_FORMATS[0].format),
    // 400K DFS - 80*2*10*256
    (SizeTest::AtMost(409_600), BASE_FORMATS[1].format),
];

/// Guess an image format from its size alone. Used only when no extension matched.
pub fn guess_format_from_size(size: u64) -> Option<DiscFormat> {
    SIZE_HEURISTICS
        .iter()
        .find(|(test, _)| test.matches(size))
        .map(|(_, format)| *format)
}
