use crate::OutputFormat;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use tabhost_core::scenario::{LabelKind, ScenarioReader};

#[derive(Debug, Serialize)]
pub struct ValidationSummary {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub steps: usize,
    pub windows: usize,
    pub tabs: usize,
}

/// Parse and structurally validate a scenario file
pub fn validate_scenario(file: &Path) -> Result<ValidationSummary> {
    let scenario = ScenarioReader::from_file(file)?;
    ScenarioReader::validate(&scenario)?;

    let introduced: Vec<LabelKind> = scenario
        .steps
        .iter()
        .flat_map(|step| step.introduces())
        .map(|(_, kind)| kind)
        .collect();

    Ok(ValidationSummary {
        valid: true,
        name: scenario.name.clone(),
        steps: scenario.steps.len(),
        windows: introduced.iter().filter(|k| **k == LabelKind::Window).count(),
        tabs: introduced.iter().filter(|k| **k == LabelKind::Tab).count(),
    })
}

pub fn execute(file: &Path, format: OutputFormat) -> Result<()> {
    tracing::info!("Validating scenario: {}", file.display());

    let summary = validate_scenario(file)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Table => {
            println!("Metric,Value");
            println!("Steps,{}", summary.steps);
            println!("Windows,{}", summary.windows);
            println!("Tabs,{}", summary.tabs);
        }
        OutputFormat::Pretty => {
            use console::style;

            println!(
                "{} {} is a valid scenario",
                style("✓").green().bold(),
                file.display()
            );
            if let Some(name) = &summary.name {
                println!("  Name:     {}", name);
            }
            println!("  Steps:    {}", summary.steps);
            println!("  Windows:  {}", summary.windows);
            println!("  Tabs:     {}", summary.tabs);
        }
    }

    Ok(())
}
