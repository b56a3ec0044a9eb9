//! In-memory content host for the tab lifecycle core.
//!
//! [`SimulatedHost`] implements [`tabhost_core::ContentHost`] without
//! rendering anything, so the controller can be driven from tests and from
//! scenario files.

mod host;
mod surface;

pub use host::SimulatedHost;
pub use surface::{Surface, SurfaceKind};

use tabhost_core::{ControllerConfig, TabLifecycleController};

/// A controller wired to a fresh simulated host
pub fn simulated_controller(config: ControllerConfig) -> TabLifecycleController<SimulatedHost> {
    TabLifecycleController::new(SimulatedHost::new(), config)
}
