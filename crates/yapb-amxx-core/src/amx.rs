//! Host runtime interface.
//!
//! The module host and the script VM are external; these traits describe
//! the handful of services the bridge uses from them. Values follow the AMX
//! conventions: 32-bit cells, a parameter block whose first cell holds the
//! argument size in bytes, and script arrays addressed by cell offsets.

use std::path::PathBuf;

use crate::natives::NativeInfo;

/// The script VM's value unit.
pub type Cell = i32;

/// Size of one cell in bytes.
pub const CELL_SIZE: usize = std::mem::size_of::<Cell>();

/// Error codes a native may raise in the calling script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum AmxError {
    /// Invalid memory access
    MemoryAccess = 5,
    /// Native function failed
    Native = 10,
    /// Parameter count mismatch
    Params = 25,
}

impl AmxError {
    /// Numeric code as understood by the VM.
    pub fn code(self) -> Cell {
        self as Cell
    }
}

/// Per-call access to the calling script.
pub trait Amx {
    /// Copy `out.len()` cells starting at script address `addr` into `out`.
    /// Returns false if the range is not addressable.
    fn read_cells(&self, addr: Cell, out: &mut [Cell]) -> bool;

    /// Copy `values` into the script starting at `addr`.
    /// Returns false if the range is not addressable.
    fn write_cells(&mut self, addr: Cell, values: &[Cell]) -> bool;

    /// Copy `value` into the script string at `addr`, writing at most
    /// `max_len` characters plus the terminator. Returns the number of
    /// characters written.
    fn set_string(&mut self, addr: Cell, value: &str, max_len: Cell) -> Cell;

    /// Raise a runtime error in the calling script.
    fn raise_error(&mut self, error: AmxError, message: &str);
}

/// Services the module host provides at attach time.
pub trait ModuleHost {
    /// The game's mod directory, root of the library search path.
    fn mod_dir(&self) -> PathBuf;

    /// Write one line to the host log.
    fn log(&self, message: &str);

    /// Make natives callable from scripts.
    fn add_natives(&mut self, natives: &'static [NativeInfo]);
}

/// AMX parameter block as passed to a native.
///
/// Cell 0 holds the size of the arguments in bytes; arguments start at 1.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    cells: &'a [Cell],
}

impl<'a> Params<'a> {
    /// Wrap a raw parameter block.
    pub fn new(cells: &'a [Cell]) -> Self {
        Self { cells }
    }

    /// Number of arguments the script passed.
    pub fn count(&self) -> usize {
        let declared = self
            .cells
            .first()
            .and_then(|bytes| usize::try_from(*bytes).ok())
            .map_or(0, |bytes| bytes / CELL_SIZE);
        declared.min(self.cells.len().saturating_sub(1))
    }

    /// Argument `n` (1-based), or 0 when absent.
    pub fn get(&self, n: usize) -> Cell {
        if n == 0 || n > self.count() {
            return 0;
        }
        self.cells[n]
    }

    /// Build a parameter block from plain arguments.
    pub fn encode(args: &[Cell]) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(args.len() + 1);
        cells.push((args.len() * CELL_SIZE) as Cell);
        cells.extend_from_slice(args);
        cells
    }
}
