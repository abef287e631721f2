//! Script natives forwarded to the bot library.
//!
//! The table is fixed at build time; scripts bind to these names. Whether a
//! call reaches the library or the unavailable stub is decided per call by
//! the bridge, see [`Bridge::call`](crate::bridge::Bridge::call).

use std::fmt;

use yapb_amxx_sdk::{BotApi, Vec3};

use crate::amx::{Amx, AmxError, Cell, Params};

/// Error raised in scripts when the bot library is not available.
pub const UNAVAILABLE_MESSAGE: &str = "Native is unavailable. YaPB DLL isn't loaded.";

/// Forwarding function of a native.
pub type NativeFn = fn(&mut dyn BotApi, &mut dyn Amx, Params<'_>) -> Cell;

/// A named entry point exposed to scripts.
#[derive(Clone, Copy)]
pub struct NativeInfo {
    /// Name scripts bind to
    pub name: &'static str,

    /// Minimum number of script arguments
    pub arity: usize,

    /// Forwarding function
    pub func: NativeFn,
}

impl fmt::Debug for NativeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeInfo")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

impl NativeInfo {
    /// Dispatch through the process-wide bridge.
    pub fn invoke(&self, amx: &mut dyn Amx, params: Params<'_>) -> Cell {
        crate::bridge::yapb().call(self, amx, params)
    }

    /// Run the forwarding function against `api`.
    pub fn forward(&self, api: &mut dyn BotApi, amx: &mut dyn Amx, params: Params<'_>) -> Cell {
        if params.count() < self.arity {
            amx.raise_error(
                AmxError::Params,
                &format!(
                    "{} expects {} parameters, got {}",
                    self.name,
                    self.arity,
                    params.count()
                ),
            );
            return 0;
        }
        (self.func)(api, amx, params)
    }
}

/// Stub answering every native while the bot library is unavailable.
pub fn unavailable(amx: &mut dyn Amx) -> Cell {
    amx.raise_error(AmxError::Native, UNAVAILABLE_MESSAGE);
    0
}

/// Every native the module registers.
pub static BOT_NATIVES: &[NativeInfo] = &[
    NativeInfo { name: "yb_get_bot_version", arity: 2, func: get_bot_version },
    NativeInfo { name: "yb_game_has_bots", arity: 0, func: game_has_bots },
    NativeInfo { name: "yb_is_user_bot", arity: 1, func: is_user_bot },
    NativeInfo { name: "yb_get_nearest_node", arity: 1, func: get_nearest_node },
    NativeInfo { name: "yb_is_node_valid", arity: 1, func: is_node_valid },
    NativeInfo { name: "yb_get_node_origin", arity: 2, func: get_node_origin },
    NativeInfo { name: "yb_get_bot_node", arity: 1, func: get_bot_node },
    NativeInfo { name: "yb_set_bot_goal_node", arity: 2, func: set_bot_goal_node },
    NativeInfo { name: "yb_get_bot_goal", arity: 1, func: get_bot_goal },
    NativeInfo { name: "yb_set_bot_goal_origin", arity: 2, func: set_bot_goal_origin },
    NativeInfo { name: "yb_has_graph", arity: 0, func: has_graph },
    NativeInfo { name: "yb_get_node_flags", arity: 1, func: get_node_flags },
];

/// Look a native up by name.
pub fn find(name: &str) -> Option<&'static NativeInfo> {
    BOT_NATIVES.iter().find(|n| n.name == name)
}

fn bool_cell(value: bool) -> Cell {
    value as Cell
}

// Script origins are integer cells; the library works in floats
fn read_origin(amx: &mut dyn Amx, addr: Cell) -> Option<Vec3> {
    let mut cells: [Cell; 3] = [0; 3];
    if !amx.read_cells(addr, &mut cells) {
        amx.raise_error(
            AmxError::MemoryAccess,
            &format!("Invalid origin array address {addr}"),
        );
        return None;
    }
    Some(cells.map(|c| c as f32))
}

fn get_bot_version(api: &mut dyn BotApi, amx: &mut dyn Amx, params: Params<'_>) -> Cell {
    amx.set_string(params.get(1), api.bot_version(), params.get(2))
}

fn game_has_bots(api: &mut dyn BotApi, _amx: &mut dyn Amx, _params: Params<'_>) -> Cell {
    bool_cell(api.is_bots_in_game())
}

fn is_user_bot(api: &mut dyn BotApi, _amx: &mut dyn Amx, params: Params<'_>) -> Cell {
    bool_cell(api.is_bot(params.get(1)))
}

fn get_nearest_node(api: &mut dyn BotApi, amx: &mut dyn Amx, params: Params<'_>) -> Cell {
    match read_origin(amx, params.get(1)) {
        Some(origin) => api.nearest_node(&origin),
        None => 0,
    }
}

fn is_node_valid(api: &mut dyn BotApi, _amx: &mut dyn Amx, params: Params<'_>) -> Cell {
    bool_cell(api.is_node_valid(params.get(1)))
}

fn get_node_origin(api: &mut dyn BotApi, amx: &mut dyn Amx, params: Params<'_>) -> Cell {
    let Some(origin) = api.node_origin(params.get(1)) else {
        return 0;
    };

    let addr = params.get(2);
    if !amx.write_cells(addr, &origin.map(|v| v as Cell)) {
        amx.raise_error(
            AmxError::MemoryAccess,
            &format!("Invalid origin array address {addr}"),
        );
        return 0;
    }
    1
}

fn get_bot_node(api: &mut dyn BotApi, _amx: &mut dyn Amx, params: Params<'_>) -> Cell {
    api.current_node(params.get(1))
}

fn set_bot_goal_node(api: &mut dyn BotApi, _amx: &mut dyn Amx, params: Params<'_>) -> Cell {
    api.set_bot_goal(params.get(1), params.get(2));
    1
}

fn get_bot_goal(api: &mut dyn BotApi, _amx: &mut dyn Amx, params: Params<'_>) -> Cell {
    api.bot_goal(params.get(1))
}

fn set_bot_goal_origin(api: &mut dyn BotApi, amx: &mut dyn Amx, params: Params<'_>) -> Cell {
    match read_origin(amx, params.get(2)) {
        Some(origin) => {
            api.set_bot_goal_origin(params.get(1), &origin);
            1
        }
        None => 0,
    }
}

fn has_graph(api: &mut dyn BotApi, _amx: &mut dyn Amx, _params: Params<'_>) -> Cell {
    bool_cell(api.has_graph())
}

fn get_node_flags(api: &mut dyn BotApi, _amx: &mut dyn Amx, params: Params<'_>) -> Cell {
    api.node_flags(params.get(1))
}
