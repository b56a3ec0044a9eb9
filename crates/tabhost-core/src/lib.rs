//! Tab and content-surface lifecycle coordination.
//!
//! The [`TabLifecycleController`] binds logical tabs (window membership,
//! strip position, pin state) to the content surfaces that display them,
//! through attach, detach, placeholder substitution, pinned-tab
//! reconciliation and window close.

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod history;
pub mod host;
pub mod ids;
pub mod partition;
pub mod record;
pub mod scenario;
pub mod snapshot;
pub mod tasks;
pub mod window;

pub use config::ControllerConfig;
pub use controller::{CloseDecision, CreationOptions, TabLifecycleController, WindowCloseOutcome};
pub use error::{Error, HostError, Result};
pub use events::{Notification, TabEvent};
pub use host::{AttachParams, ContentHost, GuestParams, HostEvent, SurfaceInfo};
pub use ids::{SurfaceId, TabId, WindowId};
pub use partition::{BrowserContext, Partition};
pub use snapshot::TabSnapshot;
