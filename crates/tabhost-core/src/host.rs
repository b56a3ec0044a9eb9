use crate::error::HostError;
use crate::events::EventSink;
use crate::history::NavigationHistory;
use crate::ids::{SurfaceId, WindowId};
use serde::{Deserialize, Serialize};
use url::Url;

/// Parameters the controller hands to the host when allocating a guest surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestParams {
    pub partition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_partition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,
}

/// Identifiers of a guest binding: the window that embeds the guest and the
/// embedder element hosting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachParams {
    pub owner_window: WindowId,
    pub element_instance_id: u64,
}

/// Notifications from the content host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The surface's guest finished attaching to its embedder
    DidAttach(SurfaceId),
    /// The surface was destroyed; the id is no longer valid
    Destroyed(SurfaceId),
    /// `source` was duplicated into the new surface `clone`
    Cloned { source: SurfaceId, clone: SurfaceId },
}

/// Read-only facts about a surface, used to build tab snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceInfo {
    pub url: Option<Url>,
    pub title: String,
    pub loading: bool,
    pub audible: bool,
    pub off_the_record: bool,
    pub partition: String,
    pub auto_discardable: bool,
}

/// The content-hosting collaborator that owns every surface.
///
/// Operations on a surface the host no longer knows about are no-ops and
/// queries on one return their empty value.
pub trait ContentHost {
    fn subscribe(&mut self, sink: EventSink<HostEvent>);

    fn create_guest_surface(
        &mut self,
        owner: Option<SurfaceId>,
        params: &GuestParams,
    ) -> Result<SurfaceId, HostError>;

    /// Allocate an inert stand-in for `source`, in the same storage partition
    fn create_placeholder(&mut self, source: SurfaceId) -> Result<SurfaceId, HostError>;

    fn clone_surface(&mut self, source: SurfaceId) -> Result<SurfaceId, HostError>;

    fn destroy(&mut self, surface: SurfaceId);

    fn is_alive(&self, surface: SurfaceId) -> bool;

    fn show(&mut self, surface: SurfaceId);

    fn hide(&mut self, surface: SurfaceId);

    fn navigation_history(&self, surface: SurfaceId) -> NavigationHistory;

    fn copy_navigation_history_from(&mut self, target: SurfaceId, history: &NavigationHistory);

    fn begin_load(&mut self, surface: SurfaceId);

    fn user_gesture_done(&mut self, surface: SurfaceId);

    fn set_foreground_eligible_while_detached(&mut self, surface: SurfaceId, eligible: bool);

    fn is_attached(&self, surface: SurfaceId) -> bool;

    fn attach_params(&self, surface: SurfaceId) -> Option<AttachParams>;

    fn set_attach_params(&mut self, surface: SurfaceId, params: AttachParams);

    /// Bind the surface's guest using its stored attach params
    fn attach_guest(&mut self, surface: SurfaceId) -> Result<(), HostError>;

    fn detach_guest(&mut self, surface: SurfaceId);

    fn tab_id_changed(&mut self, surface: SurfaceId);

    fn is_discarded(&self, surface: SurfaceId) -> bool;

    fn discard(&mut self, surface: SurfaceId) -> bool;

    fn set_auto_discardable(&mut self, surface: SurfaceId, auto_discardable: bool);

    fn surface_info(&self, surface: SurfaceId) -> Option<SurfaceInfo>;
}
