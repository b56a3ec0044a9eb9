use crate::config::ControllerConfig;
use serde::{Deserialize, Serialize};
use url::Url;

/// A scripted sequence of window and tab operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ControllerConfig>,
    pub steps: Vec<Step>,
}

/// One scenario step. Tabs and windows are referred to by labels introduced
/// in earlier steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    OpenWindow {
        label: String,
    },
    ActivateWindow {
        window: String,
    },
    CloseWindow {
        window: String,
    },
    Shutdown,
    CreateTab {
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        window: Option<String>,
        /// Tab whose surface owns the new guest
        #[serde(default, skip_serializing_if = "Option::is_none")]
        opener: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<Url>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        partition: Option<String>,
        #[serde(default)]
        incognito: bool,
        #[serde(default)]
        active: bool,
        #[serde(default)]
        pinned: bool,
    },
    CloneTab {
        tab: String,
        label: String,
    },
    DestroyTab {
        tab: String,
    },
    Navigate {
        tab: String,
        url: Url,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Attach {
        tab: String,
        window: String,
        slot: usize,
    },
    Detach {
        tab: String,
        /// Label for the placeholder left in the slot
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    /// Move a tab to the end of another window, or out of every window
    Move {
        tab: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        window: Option<String>,
    },
    /// Drop a tab onto a slot, replacing its occupant
    Replace {
        tab: String,
        window: String,
        slot: usize,
    },
    Pin {
        tab: String,
        #[serde(default = "default_true")]
        pinned: bool,
    },
    Select {
        tab: String,
    },
    Discard {
        tab: String,
    },
    Reconcile {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tab: Option<String>,
    },
    RunTasks,
    Expect(TabExpectation),
    ExpectWindow(WindowExpectation),
}

fn default_true() -> bool {
    true
}

/// Expected tab state; unset fields are not checked
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabExpectation {
    pub tab: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alive: Option<bool>,
    /// Label of the owning window; `attached: false` checks there is none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attached: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discarded: Option<bool>,
    /// Number of loads the surface has begun
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loads: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,
}

/// Expected window state; unset fields are not checked
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowExpectation {
    pub window: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active: Option<bool>,
    /// Tab labels in strip order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tabs: Option<Vec<String>>,
}

/// Whether a label names a window or a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Window,
    Tab,
}

impl Step {
    /// The op name as written in scenario files
    pub fn op(&self) -> &'static str {
        match self {
            Step::OpenWindow { .. } => "open_window",
            Step::ActivateWindow { .. } => "activate_window",
            Step::CloseWindow { .. } => "close_window",
            Step::Shutdown => "shutdown",
            Step::CreateTab { .. } => "create_tab",
            Step::CloneTab { .. } => "clone_tab",
            Step::DestroyTab { .. } => "destroy_tab",
            Step::Navigate { .. } => "navigate",
            Step::Attach { .. } => "attach",
            Step::Detach { .. } => "detach",
            Step::Move { .. } => "move",
            Step::Replace { .. } => "replace",
            Step::Pin { .. } => "pin",
            Step::Select { .. } => "select",
            Step::Discard { .. } => "discard",
            Step::Reconcile { .. } => "reconcile",
            Step::RunTasks => "run_tasks",
            Step::Expect(_) => "expect",
            Step::ExpectWindow(_) => "expect_window",
        }
    }

    /// Labels this step introduces
    pub fn introduces(&self) -> Vec<(&str, LabelKind)> {
        match self {
            Step::OpenWindow { label } => vec![(label.as_str(), LabelKind::Window)],
            Step::CreateTab { label, .. } | Step::CloneTab { label, .. } => {
                vec![(label.as_str(), LabelKind::Tab)]
            }
            Step::Detach {
                placeholder: Some(label),
                ..
            } => vec![(label.as_str(), LabelKind::Tab)],
            _ => Vec::new(),
        }
    }

    /// Labels this step refers to
    pub fn references(&self) -> Vec<(&str, LabelKind)> {
        use LabelKind::{Tab, Window};

        let mut refs = Vec::new();
        match self {
            Step::OpenWindow { .. } | Step::Shutdown | Step::RunTasks => {}
            Step::ActivateWindow { window } | Step::CloseWindow { window } => {
                refs.push((window.as_str(), Window))
            }
            Step::CreateTab { window, opener, .. } => {
                if let Some(window) = window {
                    refs.push((window.as_str(), Window));
                }
                if let Some(opener) = opener {
                    refs.push((opener.as_str(), Tab));
                }
            }
            Step::CloneTab { tab, .. }
            | Step::DestroyTab { tab }
            | Step::Navigate { tab, .. }
            | Step::Detach { tab, .. }
            | Step::Pin { tab, .. }
            | Step::Select { tab }
            | Step::Discard { tab } => refs.push((tab.as_str(), Tab)),
            Step::Attach { tab, window, .. } | Step::Replace { tab, window, .. } => {
                refs.push((tab.as_str(), Tab));
                refs.push((window.as_str(), Window));
            }
            Step::Move { tab, window } => {
                refs.push((tab.as_str(), Tab));
                if let Some(window) = window {
                    refs.push((window.as_str(), Window));
                }
            }
            Step::Reconcile { tab } => {
                if let Some(tab) = tab {
                    refs.push((tab.as_str(), Tab));
                }
            }
            Step::Expect(expect) => {
                refs.push((expect.tab.as_str(), Tab));
                if let Some(window) = &expect.window {
                    refs.push((window.as_str(), Window));
                }
            }
            Step::ExpectWindow(expect) => {
                refs.push((expect.window.as_str(), Window));
                for tab in expect.tabs.iter().flatten() {
                    refs.push((tab.as_str(), Tab));
                }
            }
        }
        refs
    }
}
