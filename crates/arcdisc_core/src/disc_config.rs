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

    disc_config.rs

    This module manages the disc subsystem configuration: the default write
    protect state, which image formats are registered, and the images mounted
    in each drive at startup.
*/

use crate::device_types::disc::DISC_MAX_DRIVES;
use anyhow::{anyhow, Context, Error};
use serde_derive::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct DiscConfigFile {
    #[serde(default)]
    pub disc: DiscConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DiscConfig {
    /// Mount every image write-protected.
    pub write_protect: bool,
    /// Register the FDI, APD and SCP flux formats.
    pub extended_formats: bool,
    pub drive: Vec<DriveImageConfig>,
}

impl Default for DiscConfig {
    fn default() -> Self {
        Self {
            write_protect: false,
            extended_formats: true,
            drive: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct DriveImageConfig {
    pub index: usize,
    pub image: Option<String>,
    pub write_protect: Option<bool>,
}

impl DiscConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<DiscConfig, Error> {
        let config_file = toml::from_str::<DiscConfigFile>(toml_str)?;
        let config = config_file.disc;

        for drive in &config.drive {
            if drive.index >= DISC_MAX_DRIVES {
                return Err(anyhow!("Invalid drive index in disc configuration: {}", drive.index));
            }
        }
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<DiscConfig, Error> {
        let path = path.as_ref();
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("Couldn't read disc configuration: {}", path.display()))?;

        DiscConfig::from_toml_str(&toml_str).with_context(|| format!("Error parsing {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let config = DiscConfig::from_toml_str("").unwrap();
        assert!(!config.write_protect);
        assert!(config.extended_formats);
        assert!(config.drive.is_empty());
    }

    #[test]
    fn parses_drive_table() {
        let config = DiscConfig::from_toml_str(
            r#"
            [disc]
            write_protect = true
            extended_formats = false

            [[disc.drive]]
            index = 0
            image = "games/zarch.adf"

            [[disc.drive]]
            index = 2
            image = "work.adl"
            write_protect = false
            "#,
        )
        .unwrap();

        assert!(config.write_protect);
        assert!(!config.extended_formats);
        assert_eq!(config.drive.len(), 2);
        assert_eq!(config.drive[0].image.as_deref(), Some("games/zarch.adf"));
        assert_eq!(config.drive[0].write_protect, None);
        assert_eq!(config.drive[1].index, 2);
        assert_eq!(config.drive[1].write_protect, Some(false));
    }

    #[test]
    fn rejects_out_of_range_drive() {
        let result = DiscConfig::from_toml_str("[[disc.drive]]\nindex = 4\n");
        assert!(result.is_err());
    }

    #[test]
    fn reads_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[disc]\nextended_formats = false").unwrap();
        let config = DiscConfig::from_file(file.path()).unwrap();
        assert!(!config.extended_formats);

        let missing = file.path().with_extension("missing");
        assert!(DiscConfig::from_file(missing).is_err());
    }
}
