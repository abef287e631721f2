//! Module lifecycle hooks called by the host.

use crate::amx::ModuleHost;
use crate::bridge::yapb;
use crate::logging;

/// Called once when the host attaches the module.
pub fn on_attach(host: &mut dyn ModuleHost) {
    logging::init();
    yapb().attach(host);
}

/// Called once when the host detaches the module.
pub fn on_detach() {
    yapb().detach();
}
