use super::types::{LabelKind, Scenario};
use crate::{Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct ScenarioReader;

impl ScenarioReader {
    /// Read and parse a scenario file from the given path
    pub fn from_file(path: &Path) -> Result<Scenario> {
        tracing::debug!("Reading scenario file from: {}", path.display());

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let scenario: Scenario = serde_json::from_reader(reader)?;

        tracing::info!(
            "Successfully parsed scenario with {} steps",
            scenario.steps.len()
        );

        Ok(scenario)
    }

    /// Parse a scenario from a JSON string
    pub fn from_str(content: &str) -> Result<Scenario> {
        tracing::debug!("Parsing scenario from string");

        let scenario: Scenario = serde_json::from_str(content)?;
        Ok(scenario)
    }

    /// Validate that every label is introduced once, before it is used, and
    /// names the right kind of thing
    pub fn validate(scenario: &Scenario) -> Result<()> {
        tracing::debug!("Validating scenario structure");

        if scenario.steps.is_empty() {
            return Err(Error::InvalidScenario("Scenario has no steps".to_string()));
        }

        let mut labels: HashMap<&str, LabelKind> = HashMap::new();
        for (idx, step) in scenario.steps.iter().enumerate() {
            for (label, kind) in step.references() {
                match labels.get(label) {
                    None => {
                        return Err(Error::InvalidScenario(format!(
                            "Step {} ({}) refers to unknown label '{}'",
                            idx,
                            step.op(),
                            label
                        )));
                    }
                    Some(found) if *found != kind => {
                        return Err(Error::InvalidScenario(format!(
                            "Step {} ({}) expects '{}' to be a {:?}, not a {:?}",
                            idx,
                            step.op(),
                            label,
                            kind,
                            found
                        )));
                    }
                    Some(_) => {}
                }
            }
            for (label, kind) in step.introduces() {
                if label.is_empty() {
                    return Err(Error::InvalidScenario(format!(
                        "Step {} ({}) has an empty label",
                        idx,
                        step.op()
                    )));
                }
                if labels.insert(label, kind).is_some() {
                    return Err(Error::InvalidScenario(format!(
                        "Step {} ({}) reuses label '{}'",
                        idx,
                        step.op(),
                        label
                    )));
                }
            }
        }

        tracing::debug!("Scenario structure is valid");
        Ok(())
    }
}
