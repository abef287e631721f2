//! Host, script and library doubles shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::ptr;

use tempfile::TempDir;
use yapb_amxx_core::prelude::*;
use yapb_amxx_core::NativeLibrary;
use yapb_amxx_sdk::{BotApiFactory, BotApiTable, ExportedApi, BOT_API_VERSION};
use yapb_amxx_testbot::TestBot;

/// Script VM with a flat heap addressed by cell index.
pub struct MemoryAmx {
    pub heap: Vec<Cell>,
    pub errors: Vec<(AmxError, String)>,
}

impl MemoryAmx {
    pub fn new() -> Self {
        Self {
            heap: vec![0; 128],
            errors: Vec::new(),
        }
    }

    /// Read a terminated string stored at `addr`.
    pub fn string_at(&self, addr: usize) -> String {
        self.heap[addr..]
            .iter()
            .take_while(|c| **c != 0)
            .map(|c| *c as u8 as char)
            .collect()
    }

    fn range(&self, addr: Cell, len: usize) -> Option<std::ops::Range<usize>> {
        let start = usize::try_from(addr).ok()?;
        let end = start.checked_add(len)?;
        (end <= self.heap.len()).then_some(start..end)
    }
}

impl Amx for MemoryAmx {
    fn read_cells(&self, addr: Cell, out: &mut [Cell]) -> bool {
        match self.range(addr, out.len()) {
            Some(range) => {
                out.copy_from_slice(&self.heap[range]);
                true
            }
            None => false,
        }
    }

    fn write_cells(&mut self, addr: Cell, values: &[Cell]) -> bool {
        match self.range(addr, values.len()) {
            Some(range) => {
                self.heap[range].copy_from_slice(values);
                true
            }
            None => false,
        }
    }

    fn set_string(&mut self, addr: Cell, value: &str, max_len: Cell) -> Cell {
        let max = usize::try_from(max_len).unwrap_or(0);
        let mut cells: Vec<Cell> = value.bytes().take(max).map(Cell::from).collect();
        let written = cells.len() as Cell;
        cells.push(0);
        if self.write_cells(addr, &cells) {
            written
        } else {
            0
        }
    }

    fn raise_error(&mut self, error: AmxError, message: &str) {
        self.errors.push((error, message.to_string()));
    }
}

/// Module host rooted at a temporary mod directory.
pub struct RecordingHost {
    pub dir: TempDir,
    pub logs: RefCell<Vec<String>>,
    pub natives: Option<&'static [NativeInfo]>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            logs: RefCell::new(Vec::new()),
            natives: None,
        }
    }

    /// Place a file where the default configuration looks for the library.
    pub fn install_library(&self) -> PathBuf {
        let path = BridgeConfig::default().library_path(self.dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"placeholder").unwrap();
        path
    }

    /// Copy a real library into the default location.
    pub fn install_library_from(&self, source: &Path) -> PathBuf {
        let path = BridgeConfig::default().library_path(self.dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::copy(source, &path).unwrap();
        path
    }

    pub fn error_lines(&self) -> Vec<String> {
        self.logs
            .borrow()
            .iter()
            .filter(|line| line.starts_with("ERROR:"))
            .cloned()
            .collect()
    }
}

impl ModuleHost for RecordingHost {
    fn mod_dir(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    fn log(&self, message: &str) {
        self.logs.borrow_mut().push(message.to_string());
    }

    fn add_natives(&mut self, natives: &'static [NativeInfo]) {
        self.natives = Some(natives);
    }
}

/// In-process stand-in for a dynamic library.
#[derive(Debug, Default)]
pub struct FakeLibrary {
    pub factory: Option<BotApiFactory>,
    pub fail_load: bool,
    pub loaded: bool,
    pub loads: usize,
    pub unloads: usize,
    /// Loads requested while a library was still mapped
    pub loads_while_loaded: usize,
}

impl FakeLibrary {
    pub fn exporting(factory: BotApiFactory) -> Self {
        Self {
            factory: Some(factory),
            ..Self::default()
        }
    }

    pub fn broken() -> Self {
        Self {
            fail_load: true,
            ..Self::default()
        }
    }
}

impl NativeLibrary for FakeLibrary {
    fn load(&mut self, path: &Path) -> yapb_amxx_core::Result<()> {
        if self.loaded {
            self.loads_while_loaded += 1;
        }
        self.unload();
        if self.fail_load {
            return Err(BridgeError::LibraryLoadFailed {
                path: path.to_path_buf(),
                reason: "invalid ELF header".to_string(),
            });
        }
        self.loaded = true;
        self.loads += 1;
        Ok(())
    }

    fn factory(&self, _symbol: &str) -> Option<BotApiFactory> {
        if self.loaded {
            self.factory
        } else {
            None
        }
    }

    fn unload(&mut self) {
        if self.loaded {
            self.loaded = false;
            self.unloads += 1;
        }
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }
}

// Every call leaks a fresh table so tests never share bot state.
fn leak_test_bot() -> &'static ExportedApi {
    Box::leak(Box::new(ExportedApi::new(TestBot::with_graph())))
}

/// Factory behaving like the real bot library.
pub unsafe extern "C" fn test_bot_factory(version: i32) -> *const BotApiTable {
    if version != BOT_API_VERSION {
        return ptr::null();
    }
    leak_test_bot().as_ptr()
}

/// Factory that rejects every version.
pub unsafe extern "C" fn refusing_factory(_version: i32) -> *const BotApiTable {
    ptr::null()
}

/// Factory returning a table shorter than the bridge expects.
pub unsafe extern "C" fn truncated_factory(_version: i32) -> *const BotApiTable {
    let mut table = unsafe { ptr::read(leak_test_bot().table()) };
    table.size = 8;
    Box::leak(Box::new(table))
}

/// Factory returning a table built for another version.
pub unsafe extern "C" fn mislabelled_factory(_version: i32) -> *const BotApiTable {
    let mut table = unsafe { ptr::read(leak_test_bot().table()) };
    table.version = BOT_API_VERSION + 1;
    Box::leak(Box::new(table))
}

/// Call `native` with zeroed arguments and collect the result.
pub fn call_with_zeros(
    bridge: &mut Bridge<impl NativeLibrary>,
    native: &NativeInfo,
    amx: &mut MemoryAmx,
) -> Cell {
    let block = Params::encode(&vec![0; native.arity]);
    bridge.call(native, amx, Params::new(&block))
}

/// Call a native by name with `args`.
pub fn call(
    bridge: &mut Bridge<impl NativeLibrary>,
    name: &str,
    amx: &mut MemoryAmx,
    args: &[Cell],
) -> Cell {
    let native = yapb_amxx_core::natives::find(name).unwrap();
    let block = Params::encode(args);
    bridge.call(native, amx, Params::new(&block))
}
