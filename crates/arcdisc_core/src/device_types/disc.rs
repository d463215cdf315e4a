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

    device_types::disc.rs

    Defines types shared between the disc subsystem and the image codecs bound
    to its drive slots: recording densities, codec capability sets and the
    parameters of sector and track commands.
*/

use strum_macros::{Display, EnumIter};

pub const DISC_MAX_DRIVES: usize = 4;

/// Number of virtual timer ticks in one microsecond. The low 32 bits of a tick count are
/// fractional microseconds, so the high resolution divisor never truncates a poll interval
/// to zero.
pub const TIMER_USEC: u64 = 1 << 32;

/// Base poll interval per density, in microseconds.
pub const DISC_POLL_TIMES: [u64; 4] = [
    32, // Double density
    32, // Double density
    16, // High density
    8,  // Extended density. Supported by SuperIO but never used on the Arc
];

/// Divisor applied to the poll interval when a codec requests high resolution polling.
pub const HIGH_RES_POLL_SHIFT: u32 = 4;

/// Number of engine ticks a command may go unanswered before the controller is told
/// the sector was not found.
pub const DISC_NOT_FOUND_TICKS: u32 = 10_000;

/// The recording density selected by the disc controller.
#[derive(Copy, Clone, Debug, Default, Display, EnumIter, Hash, Eq, PartialEq)]
#[repr(u8)]
pub enum Density {
    /// Density select 0. Clocked at the double density rate.
    #[default]
    Low = 0,
    Double = 1,
    High = 2,
    Extended = 3,
}

impl Density {
    /// Return the base poll interval for this density in timer ticks.
    #[inline]
    pub fn poll_time(&self) -> u64 {
        DISC_POLL_TIMES[*self as usize] * TIMER_USEC
    }
}

impl TryFrom<u8> for Density {
    type Error = &'static str;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Density::Low),
            1 => Ok(Density::Double),
            2 => Ok(Density::High),
            3 => Ok(Density::Extended),
            _ => Err("Bad density select"),
        }
    }
}

/// The set of optional operations a bound codec implements. The disc controller checks
/// the relevant member before every call and never invokes an operation reported absent.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DriveCapabilities {
    pub seek: bool,
    pub poll: bool,
    pub read_sector: bool,
    pub write_sector: bool,
    pub read_address: bool,
    pub format: bool,
    pub stop: bool,
}

impl DriveCapabilities {
    pub const NONE: DriveCapabilities = DriveCapabilities {
        seek: false,
        poll: false,
        read_sector: false,
        write_sector: false,
        read_address: false,
        format: false,
        stop: false,
    };

    pub const ALL: DriveCapabilities = DriveCapabilities {
        seek: true,
        poll: true,
        read_sector: true,
        write_sector: true,
        read_address: true,
        format: true,
        stop: true,
    };
}

/// Parameters of a read or write sector command.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SectorRequest {
    pub sector:  u8,
    pub track:   i32,
    pub side:    u8,
    pub density: Density,
}

/// Parameters of a read address or format track command.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TrackRequest {
    pub track:   i32,
    pub side:    u8,
    pub density: Density,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn poll_times_follow_density_table() {
        let times: Vec<u64> = Density::iter().map(|d| d.poll_time() / TIMER_USEC).collect();
        assert_eq!(times, vec![32, 32, 16, 8]);
    }

    #[test]
    fn high_res_interval_is_never_zero() {
        for density in Density::iter() {
            assert!(density.poll_time() >> HIGH_RES_POLL_SHIFT > 0);
        }
    }

    #[test]
    fn density_from_select_bits() {
        assert_eq!(Density::try_from(2), Ok(Density::High));
        assert!(Density::try_from(4).is_err());
    }
}
