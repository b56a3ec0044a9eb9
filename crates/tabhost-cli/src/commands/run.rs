use crate::OutputFormat;
use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tabhost_browser::{SimulatedHost, simulated_controller};
use tabhost_core::events::{EventStream, Notification};
use tabhost_core::scenario::{Scenario, ScenarioReader, Step, TabExpectation, WindowExpectation};
use tabhost_core::{
    BrowserContext, ContentHost, ControllerConfig, CreationOptions, Partition, SurfaceId,
    TabLifecycleController, TabSnapshot, WindowId,
};

/// Switches for a scenario run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Controller config file; overrides the scenario's embedded config
    pub config: Option<PathBuf>,
    /// Verify record/strip consistency after every step
    pub check_invariants: bool,
    /// Keep the lifecycle notification log in the report
    pub events: bool,
}

/// Final state of a replayed scenario
#[derive(Debug, Serialize)]
pub struct RunReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub steps: usize,
    pub tasks_run: usize,
    pub pending_tasks: usize,
    pub windows: Vec<WindowReport>,
    pub tabs: Vec<TabReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<Notification>,
}

#[derive(Debug, Serialize)]
pub struct WindowReport {
    pub label: String,
    pub id: WindowId,
    pub visible: bool,
    pub last_active: bool,
    /// Tab labels in strip order
    pub tabs: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TabReport {
    pub label: String,
    pub loads: u32,
    #[serde(flatten)]
    pub snapshot: TabSnapshot,
}

/// Replay a scenario file against a controller backed by the simulated host
pub fn run_scenario(file: &Path, options: &RunOptions) -> Result<RunReport> {
    tracing::debug!("Reading scenario file: {}", file.display());

    let scenario = ScenarioReader::from_file(file)?;
    ScenarioReader::validate(&scenario)?;

    let config = match &options.config {
        Some(path) => ControllerConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => scenario.config.clone().unwrap_or_default(),
    };

    let mut runner = Runner::new(config);
    for (idx, step) in scenario.steps.iter().enumerate() {
        tracing::debug!("Step {}: {}", idx, step.op());
        runner
            .step(step)
            .with_context(|| format!("Step {} ({}) failed", idx, step.op()))?;
        if options.check_invariants {
            runner
                .controller
                .check_invariants()
                .with_context(|| format!("Inconsistent state after step {} ({})", idx, step.op()))?;
        }
    }

    Ok(runner.into_report(&scenario, options.events))
}

pub fn execute(file: &Path, options: &RunOptions, format: OutputFormat) -> Result<()> {
    tracing::info!("Running scenario: {}", file.display());

    let report = run_scenario(file, options)?;

    match format {
        OutputFormat::Json => output_json(&report)?,
        OutputFormat::Table => output_table(&report),
        OutputFormat::Pretty => output_pretty(&report),
    }

    Ok(())
}

struct Runner {
    controller: TabLifecycleController<SimulatedHost>,
    notifications: EventStream<Notification>,
    windows: HashMap<String, WindowId>,
    tabs: HashMap<String, SurfaceId>,
    tasks_run: usize,
}

impl Runner {
    fn new(config: ControllerConfig) -> Self {
        let mut controller = simulated_controller(config);
        let notifications = controller.subscribe();
        Self {
            controller,
            notifications,
            windows: HashMap::new(),
            tabs: HashMap::new(),
            tasks_run: 0,
        }
    }

    fn window(&self, label: &str) -> Result<WindowId> {
        self.windows
            .get(label)
            .copied()
            .ok_or_else(|| anyhow!("Unknown window label '{}'", label))
    }

    fn tab(&self, label: &str) -> Result<SurfaceId> {
        self.tabs
            .get(label)
            .copied()
            .ok_or_else(|| anyhow!("Unknown tab label '{}'", label))
    }

    fn step(&mut self, step: &Step) -> Result<()> {
        match step {
            Step::OpenWindow { label } => {
                let id = self.controller.open_window();
                self.windows.insert(label.clone(), id);
            }
            Step::ActivateWindow { window } => {
                let id = self.window(window)?;
                self.controller.activate_window(id)?;
            }
            Step::CloseWindow { window } => {
                let id = self.window(window)?;
                let outcome = self.controller.close_window(id)?;
                tracing::debug!("Closing '{}': {:?}", window, outcome);
            }
            Step::Shutdown => self.controller.begin_shutdown(),
            Step::CreateTab {
                label,
                window,
                opener,
                url,
                partition,
                incognito,
                active,
                pinned,
            } => {
                let window = window.as_deref().map(|w| self.window(w)).transpose()?;
                let opener = opener.as_deref().map(|t| self.tab(t)).transpose()?;
                let context = if *incognito {
                    BrowserContext::default()
                        .off_the_record(partition.as_deref().unwrap_or("incognito"))
                } else {
                    BrowserContext::new(
                        partition
                            .as_deref()
                            .map(Partition::parse)
                            .unwrap_or_default(),
                    )
                };
                let mut options = CreationOptions::new(context)
                    .active(*active)
                    .pinned(*pinned);
                options.url = url.clone();

                let surface = self.controller.create_tab(opener, window, options)?;
                self.tabs.insert(label.clone(), surface);
            }
            Step::CloneTab { tab, label } => {
                let clone = self.controller.clone_tab(self.tab(tab)?)?;
                self.tabs.insert(label.clone(), clone);
            }
            Step::DestroyTab { tab } => {
                let surface = self.tab(tab)?;
                self.controller.destroy_tab(surface);
            }
            Step::Navigate { tab, url, title } => {
                let surface = self.tab(tab)?;
                let title = title.as_deref().unwrap_or_default();
                if !self
                    .controller
                    .host_mut()
                    .commit_navigation(surface, url.clone(), title)
                {
                    bail!("Tab '{}' no longer exists", tab);
                }
                self.controller.dispatch_pending();
            }
            Step::Attach { tab, window, slot } => {
                let surface = self.tab(tab)?;
                let id = self.window(window)?;
                if self.controller.host().is_attached(surface) {
                    bail!("Tab '{}' is already attached", tab);
                }
                if !self.controller.attach_guest(surface, id, *slot) {
                    bail!("Could not attach '{}' to '{}' slot {}", tab, window, slot);
                }
            }
            Step::Detach { tab, placeholder } => {
                let surface = self.tab(tab)?;
                let position = self
                    .controller
                    .window_of(surface)
                    .zip(self.controller.slot_of(surface));
                if self.controller.detach_guest(surface).is_none() {
                    bail!("Tab '{}' is not attached", tab);
                }
                if let (Some(label), Some((window, slot))) = (placeholder, position) {
                    let stand_in = self
                        .controller
                        .windows()
                        .get(window)
                        .and_then(|w| w.surface_at(slot))
                        .ok_or_else(|| anyhow!("No placeholder left behind by '{}'", tab))?;
                    self.tabs.insert(label.clone(), stand_in);
                }
            }
            Step::Move { tab, window } => {
                let surface = self.tab(tab)?;
                let window = window.as_deref().map(|w| self.window(w)).transpose()?;
                self.controller.set_window(surface, window)?;
            }
            Step::Replace { tab, window, slot } => {
                let surface = self.tab(tab)?;
                let id = self.window(window)?;
                self.controller.replace_in_strip(id, *slot, surface)?;
            }
            Step::Pin { tab, pinned } => {
                let surface = self.tab(tab)?;
                self.controller.set_pinned(surface, *pinned);
            }
            Step::Select { tab } => {
                let surface = self.tab(tab)?;
                self.controller.set_active(surface, true);
            }
            Step::Discard { tab } => {
                let surface = self.tab(tab)?;
                if !self.controller.discard(surface) {
                    tracing::debug!("Tab '{}' was not discarded", tab);
                }
            }
            Step::Reconcile { tab } => match tab {
                Some(tab) => {
                    let surface = self.tab(tab)?;
                    self.controller.maybe_attach_or_create_pinned_tab(surface);
                    self.controller.dispatch_pending();
                }
                None => {
                    self.controller.reconcile();
                }
            },
            Step::RunTasks => {
                self.tasks_run += self.controller.run_until_idle();
            }
            Step::Expect(expect) => self.check_tab(expect)?,
            Step::ExpectWindow(expect) => self.check_window(expect)?,
        }
        Ok(())
    }

    fn check_tab(&self, expect: &TabExpectation) -> Result<()> {
        let surface = self.tab(&expect.tab)?;
        let c = &self.controller;
        let mut mismatches = Vec::new();

        let mut check = |field: &str, expected: String, actual: String| {
            if expected != actual {
                mismatches.push(format!("{}: expected {}, got {}", field, expected, actual));
            }
        };

        if let Some(alive) = expect.alive {
            check("alive", alive.to_string(), c.host().is_alive(surface).to_string());
        }
        if let Some(window) = &expect.window {
            let expected = self.window(window)?;
            check(
                "window",
                format!("{:?}", Some(expected)),
                format!("{:?}", c.window_of(surface)),
            );
        }
        if let Some(attached) = expect.attached {
            check(
                "attached",
                attached.to_string(),
                c.window_of(surface).is_some().to_string(),
            );
        }
        if let Some(slot) = expect.slot {
            check(
                "slot",
                format!("{:?}", Some(slot)),
                format!("{:?}", c.slot_of(surface)),
            );
        }
        if let Some(pinned) = expect.pinned {
            check("pinned", pinned.to_string(), c.is_pinned(surface).to_string());
        }
        if let Some(placeholder) = expect.placeholder {
            check(
                "placeholder",
                placeholder.to_string(),
                c.is_placeholder(surface).to_string(),
            );
        }
        if let Some(active) = expect.active {
            check("active", active.to_string(), c.is_active(surface).to_string());
        }
        if let Some(discarded) = expect.discarded {
            check(
                "discarded",
                discarded.to_string(),
                c.is_discarded(surface).to_string(),
            );
        }
        if let Some(loads) = expect.loads {
            check(
                "loads",
                loads.to_string(),
                c.host().load_count(surface).to_string(),
            );
        }
        if let Some(url) = &expect.url {
            let actual = c
                .host()
                .surface_info(surface)
                .and_then(|info| info.url)
                .map(|u| u.to_string())
                .unwrap_or_default();
            check("url", url.to_string(), actual);
        }

        if !mismatches.is_empty() {
            bail!(
                "Tab '{}' does not match: {}",
                expect.tab,
                mismatches.join("; ")
            );
        }
        Ok(())
    }

    fn check_window(&self, expect: &WindowExpectation) -> Result<()> {
        let id = self.window(&expect.window)?;
        let windows = self.controller.windows();
        let window = windows.get(id);
        let mut mismatches = Vec::new();

        if let Some(exists) = expect.exists {
            if window.is_some() != exists {
                mismatches.push(format!(
                    "exists: expected {}, got {}",
                    exists,
                    window.is_some()
                ));
            }
        }
        if let Some(visible) = expect.visible {
            let actual = window.is_some_and(|w| w.is_visible());
            if actual != visible {
                mismatches.push(format!("visible: expected {}, got {}", visible, actual));
            }
        }
        if let Some(last_active) = expect.last_active {
            let actual = windows.last_active() == Some(id);
            if actual != last_active {
                mismatches.push(format!(
                    "last_active: expected {}, got {}",
                    last_active, actual
                ));
            }
        }
        if let Some(tabs) = &expect.tabs {
            let actual: Vec<String> = window
                .map(|w| w.surfaces())
                .unwrap_or_default()
                .into_iter()
                .map(|surface| self.label_of(surface))
                .collect();
            if &actual != tabs {
                mismatches.push(format!(
                    "tabs: expected [{}], got [{}]",
                    tabs.join(", "),
                    actual.join(", ")
                ));
            }
        }

        if !mismatches.is_empty() {
            bail!(
                "Window '{}' does not match: {}",
                expect.window,
                mismatches.join("; ")
            );
        }
        Ok(())
    }

    /// Scenario label of a surface, or its id for surfaces nobody labelled
    fn label_of(&self, surface: SurfaceId) -> String {
        self.tabs
            .iter()
            .find(|(_, s)| **s == surface)
            .map(|(label, _)| label.clone())
            .unwrap_or_else(|| surface.to_string())
    }

    fn window_label_of(&self, id: WindowId) -> String {
        self.windows
            .iter()
            .find(|(_, w)| **w == id)
            .map(|(label, _)| label.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn into_report(mut self, scenario: &Scenario, include_events: bool) -> RunReport {
        let mut events = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            if include_events {
                events.push(notification);
            }
        }

        let last_active = self.controller.windows().last_active();
        let windows = self
            .controller
            .windows()
            .all()
            .map(|window| WindowReport {
                label: self.window_label_of(window.id()),
                id: window.id(),
                visible: window.is_visible(),
                last_active: last_active == Some(window.id()),
                tabs: window
                    .surfaces()
                    .into_iter()
                    .map(|surface| self.label_of(surface))
                    .collect(),
            })
            .collect();

        let tabs = self
            .controller
            .tabs()
            .surfaces()
            .into_iter()
            .filter_map(|surface| {
                let snapshot = self.controller.snapshot(surface)?;
                Some(TabReport {
                    label: self.label_of(surface),
                    loads: self.controller.host().load_count(surface),
                    snapshot,
                })
            })
            .collect();

        RunReport {
            name: scenario.name.clone(),
            steps: scenario.steps.len(),
            tasks_run: self.tasks_run,
            pending_tasks: self.controller.pending_tasks(),
            windows,
            tabs,
            events,
        }
    }
}

fn output_pretty(report: &RunReport) {
    use console::style;

    let title = match &report.name {
        Some(name) => format!("Scenario: {}", name),
        None => "Scenario Report".to_string(),
    };
    println!("\n{}", style(&title).bold().cyan());
    println!("{}", style("=".repeat(title.len())).cyan());

    println!("\n{}", style("Summary:").bold());
    println!("  Steps:          {}", report.steps);
    println!("  Tasks Run:      {}", report.tasks_run);
    println!("  Pending Tasks:  {}", report.pending_tasks);

    println!("\n{}", style("Windows:").bold());
    if report.windows.is_empty() {
        println!("  (none)");
    }
    for window in &report.windows {
        let mut flags = Vec::new();
        if window.last_active {
            flags.push(style("last active").green().to_string());
        }
        if !window.visible {
            flags.push(style("hidden").yellow().to_string());
        }
        println!(
            "  {} ({}) {}",
            style(&window.label).bold(),
            window.id,
            flags.join(" ")
        );
        for (slot, tab) in window.tabs.iter().enumerate() {
            println!("    {}. {}", slot, tab);
        }
    }

    println!("\n{}", style("Tabs:").bold());
    if report.tabs.is_empty() {
        println!("  (none)");
    }
    for tab in &report.tabs {
        let snap = &tab.snapshot;
        let mut flags = Vec::new();
        if snap.pinned {
            flags.push("pinned");
        }
        if snap.placeholder {
            flags.push("placeholder");
        }
        if snap.active {
            flags.push("active");
        }
        if snap.discarded {
            flags.push("discarded");
        }
        let position = match (snap.window(), snap.slot()) {
            (Some(window), Some(slot)) => format!("{} slot {}", window, slot),
            _ => "unattached".to_string(),
        };
        println!(
            "  {} ({}) {} loads={} {}",
            style(&tab.label).bold(),
            snap.id,
            position,
            tab.loads,
            style(flags.join(" ")).dim()
        );
        if !snap.url.is_empty() {
            println!("      {}", snap.url);
        }
    }

    if !report.events.is_empty() {
        println!("\n{}", style("Events:").bold());
        for notification in &report.events {
            println!("  {:?}", notification.event);
        }
    }

    println!();
}

fn output_json(report: &RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

fn output_table(report: &RunReport) {
    println!("Label,Tab,Window,Slot,Pinned,Placeholder,Active,Discarded,Loads,Url");
    for tab in &report.tabs {
        let snap = &tab.snapshot;
        println!(
            "{},{},{},{},{},{},{},{},{},{}",
            tab.label,
            snap.id.0,
            snap.window_id,
            snap.index,
            snap.pinned,
            snap.placeholder,
            snap.active,
            snap.discarded,
            tab.loads,
            snap.url
        );
    }
}
