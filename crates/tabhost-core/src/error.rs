use crate::ids::{SurfaceId, WindowId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to create tab: {0}")]
    Creation(#[from] HostError),

    #[error("Window not found: {0}")]
    WindowNotFound(WindowId),

    #[error("Unknown surface: {0}")]
    UnknownSurface(SurfaceId),

    #[error("{window} has no slot {slot}")]
    SlotOutOfRange { window: WindowId, slot: usize },

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Invariant violated: {0}")]
    Invariant(String),
}

/// Failures reported by the content-hosting collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Invalid owner surface: {0}")]
    InvalidOwner(SurfaceId),

    #[error("Surface not found: {0}")]
    SurfaceNotFound(SurfaceId),

    #[error("Surface {0} has no attach params")]
    MissingAttachParams(SurfaceId),

    #[error("Invalid guest params: {0}")]
    InvalidParams(String),
}

pub type Result<T> = std::result::Result<T, Error>;
