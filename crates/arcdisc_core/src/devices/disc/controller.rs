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

    devices::disc::controller.rs

    Implements the disc subsystem's drive table and poll engine. The engine
    ticks the selected drive's codec at a rate set by the recording density,
    and emulates the controller's sector-not-found timeout for commands sent
    to a drive that can't service them.
*/

use crate::{
    device_traits::{
        disc_codec::{CodecLoader, DiscCodec},
        disc_ports::{DiscSignals, DiscTimer, FdcPort},
    },
    device_types::{
        disc::{
            Density,
            DriveCapabilities,
            SectorRequest,
            TrackRequest,
            DISC_MAX_DRIVES,
            DISC_NOT_FOUND_TICKS,
            HIGH_RES_POLL_SHIFT,
        },
        format::FormatRegistry,
    },
    devices::disc_drive::DriveSlot,
    disc_config::DiscConfig,
};

pub struct FloppyController<T: DiscTimer, F: FdcPort, S: DiscSignals> {
    pub(crate) drives: [DriveSlot; DISC_MAX_DRIVES],
    drive_select: usize,
    motor_on: bool,
    density: Density,
    poll_time: u64,
    /// Ticks remaining until the controller is told the sector was not found. Zero when idle.
    not_found: u32,

    pub(crate) default_write_protect: bool,
    pub(crate) registry: FormatRegistry,
    pub(crate) loader: Box<dyn CodecLoader>,

    timer: T,
    fdc: F,
    signals: S,
}

impl<T: DiscTimer, F: FdcPort, S: DiscSignals> FloppyController<T, F, S> {
    pub fn new(config: &DiscConfig, loader: Box<dyn CodecLoader>, timer: T, fdc: F, signals: S) -> Self {
        let density = Density::default();
        FloppyController {
            drives: std::array::from_fn(DriveSlot::new),
            drive_select: 0,
            motor_on: false,
            density,
            poll_time: density.poll_time(),
            not_found: 0,
            default_write_protect: config.write_protect,
            registry: FormatRegistry::new(config.extended_formats),
            loader,
            timer,
            fdc,
            signals,
        }
    }

    /// Select drive 0, stop the motor and clear any pending command timeout. Mounted images and
    /// head positions are kept.
    pub fn reset(&mut self) {
        self.drive_select = 0;
        self.motor_on = false;
        self.not_found = 0;
        self.timer.cancel();
        log::debug!("Disc controller reset");
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    pub fn drive(&self, drive: usize) -> Option<&DriveSlot> {
        self.drives.get(drive)
    }

    pub fn selected_drive(&self) -> usize {
        self.drive_select
    }

    pub fn motor_on(&self) -> bool {
        self.motor_on
    }

    pub fn density(&self) -> Density {
        self.density
    }

    /// Return the current command timeout count. Zero when no timeout is pending.
    pub fn command_timeout(&self) -> u32 {
        self.not_found
    }

    /// Return the interval the next tick will be scheduled with.
    pub fn poll_interval(&self) -> u64 {
        let high_res = self.drives[self.drive_select]
            .codec
            .as_ref()
            .is_some_and(|codec| codec.high_res_poll());

        if high_res {
            self.poll_time >> HIGH_RES_POLL_SHIFT
        }
        else {
            self.poll_time
        }
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn fdc(&self) -> &F {
        &self.fdc
    }

    pub fn fdc_mut(&mut self) -> &mut F {
        &mut self.fdc
    }

    pub fn signals(&self) -> &S {
        &self.signals
    }

    pub fn is_empty(&self, drive: usize) -> bool {
        self.drives.get(drive).map_or(true, |slot| slot.is_empty())
    }

    pub fn current_track(&self, drive: usize) -> Option<i32> {
        self.drives.get(drive).map(|slot| slot.track)
    }

    /// Advance virtual time by `elapsed` ticks, running every poll that falls due.
    pub fn run(&mut self, elapsed: u64) {
        let mut remaining = elapsed;
        while let Some(due) = self.timer.pending() {
            if due > remaining {
                break;
            }
            remaining -= self.timer.elapse(due);
            self.poll();
        }
        self.timer.elapse(remaining);
    }

    /// Run one engine tick. Called when the scheduled poll falls due.
    pub fn poll(&mut self) {
        let interval = self.poll_interval();
        self.timer.schedule(interval);

        if let Some(codec) = self.drives[self.drive_select].codec.as_mut() {
            if codec.capabilities().poll {
                codec.poll(&mut self.fdc);
            }
        }

        if self.not_found > 0 {
            self.not_found -= 1;
            if self.not_found == 0 {
                log::trace!("Drive {}: sector not found", self.drive_select);
                self.fdc.timeout();
            }
        }
    }

    pub fn set_motor(&mut self, on: bool) {
        if on && !self.motor_on {
            log::trace!("Drive {} selected, motor on", self.drive_select);
        }
        else if !on && self.motor_on {
            log::trace!("Drive {} selected, motor off", self.drive_select);
        }
        self.motor_on = on;

        if !on {
            self.timer.cancel();
        }
        else if self.timer.pending().is_none() {
            self.timer.schedule(self.poll_time);
        }
    }

    /// Set the recording density. The new rate applies from the next reschedule.
    pub fn set_density(&mut self, density: Density) {
        self.density = density;
        self.poll_time = density.poll_time();
    }

    pub fn select_drive(&mut self, drive: usize) {
        if drive >= DISC_MAX_DRIVES {
            log::warn!("select_drive(): Invalid drive: {}", drive);
            return;
        }
        self.drive_select = drive;
    }

    /// Move the head of `drive` to `track`.
    pub fn seek(&mut self, drive: usize, track: i32) {
        let Some(slot) = self.drives.get_mut(drive) else {
            log::warn!("seek(): Invalid drive: {}", drive);
            return;
        };

        if let Some(codec) = slot.codec.as_mut() {
            if codec.capabilities().seek {
                codec.seek(drive, track);
            }
        }

        if !slot.is_empty() && slot.track != track {
            slot.media_changed = false;
            self.signals.media_change_clear(drive);
            self.signals.seek_noise(track - slot.track);
        }
        slot.track = track;
    }

    pub fn read_sector(&mut self, drive: usize, sector: u8, track: i32, side: u8, density: Density) {
        let req = SectorRequest {
            sector,
            track,
            side,
            density,
        };
        self.dispatch_command(drive, "read_sector", |caps| caps.read_sector, |codec| {
            codec.read_sector(drive, req)
        });
    }

    pub fn write_sector(&mut self, drive: usize, sector: u8, track: i32, side: u8, density: Density) {
        let req = SectorRequest {
            sector,
            track,
            side,
            density,
        };
        self.dispatch_command(drive, "write_sector", |caps| caps.write_sector, |codec| {
            codec.write_sector(drive, req)
        });
    }

    pub fn read_address(&mut self, drive: usize, track: i32, side: u8, density: Density) {
        let req = TrackRequest { track, side, density };
        self.dispatch_command(drive, "read_address", |caps| caps.read_address, |codec| {
            codec.read_address(drive, req)
        });
    }

    pub fn format(&mut self, drive: usize, track: i32, side: u8, density: Density) {
        let req = TrackRequest { track, side, density };
        self.dispatch_command(drive, "format", |caps| caps.format, |codec| codec.format(drive, req));
    }

    pub fn stop(&mut self, drive: usize) {
        match self.drives.get_mut(drive) {
            Some(slot) => {
                if let Some(codec) = slot.codec.as_mut() {
                    if codec.capabilities().stop {
                        codec.stop();
                    }
                }
            }
            None => log::warn!("stop(): Invalid drive: {}", drive),
        }
    }

    /// Stop and close the image in `drive`. The drive is no longer polled.
    pub fn close(&mut self, drive: usize) {
        if drive >= DISC_MAX_DRIVES {
            log::warn!("close(): Invalid drive: {}", drive);
            return;
        }
        self.stop(drive);
        self.drives[drive].eject();
    }

    /// Hand a command to the drive's codec, or arm the not-found timeout if the drive can't
    /// service it.
    fn dispatch_command(
        &mut self,
        drive: usize,
        command: &str,
        supported: impl Fn(&DriveCapabilities) -> bool,
        call: impl FnOnce(&mut dyn DiscCodec),
    ) {
        let serviced = match self.drives.get_mut(drive).and_then(|slot| slot.codec_mut()) {
            Some(codec) if supported(&codec.capabilities()) => {
                call(codec.as_mut());
                true
            }
            _ => false,
        };

        if !serviced {
            log::trace!("{}(): Drive {} can't service command", command, drive);
            self.arm_command_timeout();
        }
    }

    fn arm_command_timeout(&mut self) {
        if self.not_found == 0 {
            self.not_found = DISC_NOT_FOUND_TICKS;
        }
    }
}
