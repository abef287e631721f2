//! C-compatible capability table.
//!
//! This is the only thing that crosses the library boundary: the factory
//! export returns a pointer to a [`BotApiTable`] and every later call goes
//! through its function pointers with the opaque `instance` as receiver.

use std::ffi::{c_char, c_void, CString};
use std::mem;

use crate::api::{BotApi, Vec3};
use crate::BOT_API_VERSION;

/// Signature of the factory export.
///
/// Returns null when the library does not support the requested version.
pub type BotApiFactory = unsafe extern "C" fn(version: i32) -> *const BotApiTable;

/// Capability table exported by the bot library.
///
/// Coordinates are passed as pointers to three consecutive `f32`s.
#[repr(C)]
pub struct BotApiTable {
    /// Size of the table in bytes as built by the library
    pub size: u32,

    /// Version token the table was built for
    pub version: i32,

    /// Receiver passed as the first argument of every function
    pub instance: *mut c_void,

    pub get_bot_version: unsafe extern "C" fn(*mut c_void) -> *const c_char,
    pub is_bots_in_game: unsafe extern "C" fn(*mut c_void) -> bool,
    pub is_bot: unsafe extern "C" fn(*mut c_void, i32) -> bool,
    pub get_nearest_node: unsafe extern "C" fn(*mut c_void, *const f32) -> i32,
    pub is_node_valid: unsafe extern "C" fn(*mut c_void, i32) -> bool,

    /// Writes three floats to the output pointer and returns true, or
    /// returns false without writing when the node does not exist.
    pub get_node_origin: unsafe extern "C" fn(*mut c_void, i32, *mut f32) -> bool,

    pub get_current_node_id: unsafe extern "C" fn(*mut c_void, i32) -> i32,
    pub set_bot_goal: unsafe extern "C" fn(*mut c_void, i32, i32),
    pub get_bot_goal: unsafe extern "C" fn(*mut c_void, i32) -> i32,
    pub set_bot_goal_origin: unsafe extern "C" fn(*mut c_void, i32, *const f32),
    pub has_graph: unsafe extern "C" fn(*mut c_void) -> bool,
    pub get_node_flags: unsafe extern "C" fn(*mut c_void, i32) -> i32,
}

impl BotApiTable {
    /// Size of the table layout known to this SDK.
    pub const SIZE: u32 = mem::size_of::<BotApiTable>() as u32;
}

struct Adapter<T> {
    api: T,
    version: CString,
}

/// A capability table backed by a Rust [`BotApi`] implementation.
///
/// Owns the implementation; the table pointer stays valid for as long as
/// this value is neither moved nor dropped. The version string is captured
/// once at construction.
pub struct ExportedApi {
    table: BotApiTable,
    release: unsafe fn(*mut c_void),
}

// SAFETY: the table is only ever driven from the host's single game thread,
// and the wrapped implementation is itself `Send`.
unsafe impl Send for ExportedApi {}
unsafe impl Sync for ExportedApi {}

impl ExportedApi {
    /// Build a table forwarding to `api`.
    pub fn new<T: BotApi + 'static>(api: T) -> Self {
        let version = c_version(api.bot_version());
        let instance = Box::into_raw(Box::new(Adapter { api, version })) as *mut c_void;

        Self {
            table: BotApiTable {
                size: BotApiTable::SIZE,
                version: BOT_API_VERSION,
                instance,
                get_bot_version: get_bot_version::<T>,
                is_bots_in_game: is_bots_in_game::<T>,
                is_bot: is_bot::<T>,
                get_nearest_node: get_nearest_node::<T>,
                is_node_valid: is_node_valid::<T>,
                get_node_origin: get_node_origin::<T>,
                get_current_node_id: get_current_node_id::<T>,
                set_bot_goal: set_bot_goal::<T>,
                get_bot_goal: get_bot_goal::<T>,
                set_bot_goal_origin: set_bot_goal_origin::<T>,
                has_graph: has_graph::<T>,
                get_node_flags: get_node_flags::<T>,
            },
            release: release::<T>,
        }
    }

    /// The table as handed out by the factory export.
    pub fn as_ptr(&self) -> *const BotApiTable {
        &self.table
    }

    /// Borrow the table.
    pub fn table(&self) -> &BotApiTable {
        &self.table
    }
}

impl Drop for ExportedApi {
    fn drop(&mut self) {
        // SAFETY: `instance` came from `Box::into_raw` in `new` with the same `T`
        unsafe { (self.release)(self.table.instance) }
    }
}

// A C string ends at the first NUL, so anything after it is dropped
fn c_version(version: &str) -> CString {
    let bytes = version.as_bytes();
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    CString::new(&bytes[..end]).unwrap_or_default()
}

unsafe fn release<T>(instance: *mut c_void) {
    drop(unsafe { Box::from_raw(instance as *mut Adapter<T>) });
}

unsafe fn adapter<'a, T>(instance: *mut c_void) -> &'a Adapter<T> {
    unsafe { &*(instance as *const Adapter<T>) }
}

unsafe fn adapter_mut<'a, T>(instance: *mut c_void) -> &'a mut Adapter<T> {
    unsafe { &mut *(instance as *mut Adapter<T>) }
}

unsafe fn read_vec3(origin: *const f32) -> Vec3 {
    if origin.is_null() {
        return [0.0; 3];
    }
    unsafe { *(origin as *const Vec3) }
}

unsafe extern "C" fn get_bot_version<T: BotApi>(instance: *mut c_void) -> *const c_char {
    unsafe { adapter::<T>(instance) }.version.as_ptr()
}

unsafe extern "C" fn is_bots_in_game<T: BotApi>(instance: *mut c_void) -> bool {
    unsafe { adapter::<T>(instance) }.api.is_bots_in_game()
}

unsafe extern "C" fn is_bot<T: BotApi>(instance: *mut c_void, index: i32) -> bool {
    unsafe { adapter::<T>(instance) }.api.is_bot(index)
}

unsafe extern "C" fn get_nearest_node<T: BotApi>(instance: *mut c_void, origin: *const f32) -> i32 {
    let origin = unsafe { read_vec3(origin) };
    unsafe { adapter::<T>(instance) }.api.nearest_node(&origin)
}

unsafe extern "C" fn is_node_valid<T: BotApi>(instance: *mut c_void, node: i32) -> bool {
    unsafe { adapter::<T>(instance) }.api.is_node_valid(node)
}

unsafe extern "C" fn get_node_origin<T: BotApi>(
    instance: *mut c_void,
    node: i32,
    out: *mut f32,
) -> bool {
    if out.is_null() {
        return false;
    }
    match unsafe { adapter::<T>(instance) }.api.node_origin(node) {
        Some(origin) => {
            unsafe { *(out as *mut Vec3) = origin };
            true
        }
        None => false,
    }
}

unsafe extern "C" fn get_current_node_id<T: BotApi>(instance: *mut c_void, index: i32) -> i32 {
    unsafe { adapter::<T>(instance) }.api.current_node(index)
}

unsafe extern "C" fn set_bot_goal<T: BotApi>(instance: *mut c_void, index: i32, node: i32) {
    unsafe { adapter_mut::<T>(instance) }.api.set_bot_goal(index, node)
}

unsafe extern "C" fn get_bot_goal<T: BotApi>(instance: *mut c_void, index: i32) -> i32 {
    unsafe { adapter::<T>(instance) }.api.bot_goal(index)
}

unsafe extern "C" fn set_bot_goal_origin<T: BotApi>(
    instance: *mut c_void,
    index: i32,
    origin: *const f32,
) {
    let origin = unsafe { read_vec3(origin) };
    unsafe { adapter_mut::<T>(instance) }
        .api
        .set_bot_goal_origin(index, &origin)
}

unsafe extern "C" fn has_graph<T: BotApi>(instance: *mut c_void) -> bool {
    unsafe { adapter::<T>(instance) }.api.has_graph()
}

unsafe extern "C" fn get_node_flags<T: BotApi>(instance: *mut c_void, node: i32) -> i32 {
    unsafe { adapter::<T>(instance) }.api.node_flags(node)
}
