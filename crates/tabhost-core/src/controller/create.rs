use super::TabLifecycleController;
use crate::events::TabEvent;
use crate::host::{ContentHost, GuestParams};
use crate::ids::{SurfaceId, TabId, WindowId};
use crate::partition::{BrowserContext, Partition};
use crate::{Error, Result};
use url::Url;

/// How a new tab is created
#[derive(Debug, Clone, Default)]
pub struct CreationOptions {
    /// Storage scope; determines the guest's partition and parent partition
    pub context: BrowserContext,
    pub url: Option<Url>,
    /// Select and show the tab once it is in its window
    pub active: bool,
    pub pinned: bool,
}

impl CreationOptions {
    pub fn new(context: BrowserContext) -> Self {
        Self {
            context,
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }

    fn guest_params(&self) -> GuestParams {
        GuestParams {
            partition: self.context.partition.with_prefix(),
            parent_partition: self.context.parent.as_ref().map(Partition::with_prefix),
            url: self.url.clone(),
        }
    }
}

impl<H: ContentHost> TabLifecycleController<H> {
    /// Allocate a guest surface through the host and track it as a new tab.
    ///
    /// When `window` is given the tab is appended to that window's strip.
    /// Nothing is created if the window does not exist or the host refuses.
    pub fn create_tab(
        &mut self,
        owner: Option<SurfaceId>,
        window: Option<WindowId>,
        options: CreationOptions,
    ) -> Result<SurfaceId> {
        if let Some(id) = window.filter(|id| !self.windows.contains(*id)) {
            return Err(Error::WindowNotFound(id));
        }

        let params = options.guest_params();
        let surface = self
            .host
            .create_guest_surface(owner, &params)
            .inspect_err(|err| tracing::warn!("Host refused to create a tab: {}", err))?;
        self.register_tab(surface);
        tracing::info!("Created {} in partition {}", surface, params.partition);

        if window.is_some() {
            self.set_window(surface, window)?;
        }
        if options.pinned {
            self.set_pinned(surface, true);
        }
        if options.active {
            self.set_active(surface, true);
        }
        Ok(surface)
    }

    /// Duplicate a tab's surface; the clone gets a fresh, unattached record
    pub fn clone_tab(&mut self, source: SurfaceId) -> Result<SurfaceId> {
        if !self.tabs.contains(source) {
            return Err(Error::UnknownSurface(source));
        }
        let clone = self.host.clone_surface(source)?;
        self.dispatch_pending();
        Ok(clone)
    }

    /// Ask the host to destroy a tab's surface
    pub fn destroy_tab(&mut self, surface: SurfaceId) {
        tracing::debug!("Destroying {}", surface);
        self.host.destroy(surface);
        self.dispatch_pending();
    }

    pub(crate) fn register_tab(&mut self, surface: SurfaceId) -> TabId {
        if let Some(record) = self.tabs.get(surface) {
            return record.tab_id;
        }
        let tab_id = self.tabs.register(surface).tab_id;
        self.emit(TabEvent::Created { surface });
        tab_id
    }

    pub(super) fn did_clone_to_new_surface(&mut self, source: SurfaceId, clone: SurfaceId) {
        tracing::debug!("{} cloned into {}", source, clone);
        self.register_tab(clone);
    }

    pub(super) fn surface_destroyed(&mut self, surface: SurfaceId) {
        if !self.tabs.contains(surface) {
            return;
        }
        if self.window_of(surface).is_some() {
            if let Err(err) = self.set_window(surface, None) {
                tracing::warn!(
                    "Could not take destroyed {} out of its window: {}",
                    surface,
                    err
                );
            }
        }
        self.tabs.remove(surface);
        tracing::debug!("Dropped record for {}", surface);
        self.emit(TabEvent::Destroyed { surface });
    }
}
