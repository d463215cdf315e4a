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

    devices::disc::test_util.rs

    Fakes for the codec loader and controller collaborators, and image fixture
    helpers shared by the disc controller tests.
*/

use crate::{
    device_traits::{
        disc_codec::{CodecLoader, DiscCodec},
        disc_ports::{DiscSignals, FdcPort},
    },
    device_types::{
        disc::{DriveCapabilities, SectorRequest, TrackRequest},
        format::DiscFormat,
        image_stream::ImageStream,
    },
    devices::disc::{controller::FloppyController, timer::VirtualTimer},
    disc_config::DiscConfig,
};
use anyhow::anyhow;
use std::{
    cell::{Ref, RefCell, RefMut},
    io::{Cursor, Read, Write},
    path::{Path, PathBuf},
    rc::Rc,
};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

pub type TestController = FloppyController<VirtualTimer, FakeFdc, FakeSignals>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Clone, Debug)]
pub struct LoadRecord {
    pub format: DiscFormat,
    pub drive: usize,
    pub write_protect: bool,
    pub from_memory: bool,
    pub data: Vec<u8>,
}

/// Everything the fake codecs were asked to do, shared between the loader and its codecs.
#[derive(Default)]
pub struct LoaderState {
    pub caps: DriveCapabilities,
    pub high_res: bool,
    pub fail: bool,
    pub loads: Vec<LoadRecord>,
    pub polls: usize,
    pub seeks: Vec<(usize, i32)>,
    pub reads: Vec<SectorRequest>,
    pub writes: Vec<SectorRequest>,
    pub addresses: Vec<TrackRequest>,
    pub formats: Vec<TrackRequest>,
    pub stops: usize,
    /// Load index of each codec closed, in order.
    pub closed: Vec<usize>,
}

#[derive(Clone, Default)]
pub struct FakeLoader(Rc<RefCell<LoaderState>>);

impl FakeLoader {
    pub fn with_caps(caps: DriveCapabilities) -> Self {
        let loader = FakeLoader::default();
        loader.state_mut().caps = caps;
        loader
    }

    pub fn state(&self) -> Ref<'_, LoaderState> {
        self.0.borrow()
    }

    pub fn state_mut(&self) -> RefMut<'_, LoaderState> {
        self.0.borrow_mut()
    }
}

impl CodecLoader for FakeLoader {
    fn load(
        &mut self,
        format: DiscFormat,
        drive: usize,
        mut stream: ImageStream,
        write_protect: bool,
    ) -> anyhow::Result<Box<dyn DiscCodec>> {
        let mut data = Vec::new();
        stream.read_to_end(&mut data)?;

        let mut state = self.0.borrow_mut();
        state.loads.push(LoadRecord {
            format,
            drive,
            write_protect,
            from_memory: stream.is_memory(),
            data,
        });
        if state.fail {
            return Err(anyhow!("Corrupt image"));
        }
        Ok(Box::new(FakeCodec {
            state: self.0.clone(),
            caps: state.caps,
            high_res: state.high_res,
            load_n: state.loads.len() - 1,
        }))
    }
}

pub struct FakeCodec {
    state: Rc<RefCell<LoaderState>>,
    caps: DriveCapabilities,
    high_res: bool,
    load_n: usize,
}

impl DiscCodec for FakeCodec {
    fn capabilities(&self) -> DriveCapabilities {
        self.caps
    }

    fn high_res_poll(&self) -> bool {
        self.high_res
    }

    fn close(&mut self, _drive: usize) {
        self.state.borrow_mut().closed.push(self.load_n);
    }

    fn seek(&mut self, drive: usize, track: i32) {
        self.state.borrow_mut().seeks.push((drive, track));
    }

    fn poll(&mut self, fdc: &mut dyn FdcPort) {
        self.state.borrow_mut().polls += 1;
        fdc.index_pulse();
    }

    fn read_sector(&mut self, _drive: usize, req: SectorRequest) {
        self.state.borrow_mut().reads.push(req);
    }

    fn write_sector(&mut self, _drive: usize, req: SectorRequest) {
        self.state.borrow_mut().writes.push(req);
    }

    fn read_address(&mut self, _drive: usize, req: TrackRequest) {
        self.state.borrow_mut().addresses.push(req);
    }

    fn format(&mut self, _drive: usize, req: TrackRequest) {
        self.state.borrow_mut().formats.push(req);
    }

    fn stop(&mut self) {
        self.state.borrow_mut().stops += 1;
    }
}

#[derive(Default)]
pub struct FakeFdc {
    pub timeouts: usize,
    pub index_pulses: usize,
}

impl FdcPort for FakeFdc {
    fn timeout(&mut self) {
        self.timeouts += 1;
    }

    fn index_pulse(&mut self) {
        self.index_pulses += 1;
    }
}

#[derive(Default)]
pub struct FakeSignals {
    pub cleared: Vec<usize>,
    pub noise: Vec<i32>,
}

impl DiscSignals for FakeSignals {
    fn media_change_clear(&mut self, drive: usize) {
        self.cleared.push(drive);
    }

    fn seek_noise(&mut self, delta: i32) {
        self.noise.push(delta);
    }
}

pub fn test_controller(loader: &FakeLoader) -> TestController {
    test_controller_with(loader, &DiscConfig::default())
}

pub fn test_controller_with(loader: &FakeLoader, config: &DiscConfig) -> TestController {
    init_logger();
    FloppyController::new(
        config,
        Box::new(loader.clone()),
        VirtualTimer::new(),
        FakeFdc::default(),
        FakeSignals::default(),
    )
}

/// Write an image file of `size` bytes. The first byte is the low byte of the size so loads can
/// be told apart.
pub fn image_file(dir: &Path, name: &str, size: usize) -> PathBuf {
    let path = dir.join(name);
    let mut data = vec![0u8; size];
    if let Some(first) = data.first_mut() {
        *first = (size & 0xFF) as u8;
    }
    std::fs::write(&path, data).unwrap();
    path
}

pub enum ArchiveItem<'a> {
    Dir(&'a str),
    File(&'a str, Vec<u8>),
}

pub fn zip_bytes(items: &[ArchiveItem]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for item in items {
        match item {
            ArchiveItem::Dir(dir_name) => writer.add_directory(*dir_name, options).unwrap(),
            ArchiveItem::File(file_name, data) => {
                writer.start_file(*file_name, options).unwrap();
                writer.write_all(data).unwrap();
            }
        }
    }
    writer.finish().unwrap().into_inner()
}

pub fn zip_file(dir: &Path, name: &str, items: &[ArchiveItem]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, zip_bytes(items)).unwrap();
    path
}
