use crate::config::Thresholds;
use crate::error::{CoverageError, Result};
use crate::model::{PlayRegistry, SetupConfig, Week};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// The three documents the coverage report is computed from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inputs {
    pub week: Option<Week>,
    pub plays: PlayRegistry,
    pub setup: SetupConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub days: usize,
    pub segments: usize,
    pub script_rows: usize,
    pub plays: usize,
    pub buckets: usize,
    pub situations: usize,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|source| CoverageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CoverageError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the week, play registry and setup configuration.
///
/// A week file holding `null` loads as "no week" rather than an error.
pub fn load_inputs(week_path: &Path, plays_path: &Path, setup_path: &Path) -> Result<(Inputs, LoadReport)> {
    let week: Option<Week> = read_json(week_path)?;
    let plays: Option<PlayRegistry> = read_json(plays_path)?;
    let setup: Option<SetupConfig> = read_json(setup_path)?;
    let inputs = Inputs {
        week,
        plays: plays.unwrap_or_default(),
        setup: setup.unwrap_or_default(),
    };

    let (days, segments, script_rows) = match &inputs.week {
        Some(week) => week.practice_plans.values().fold((0, 0, 0), |(d, s, r), plan| {
            let rows: usize = plan.segments.iter().map(|seg| seg.script.len()).sum();
            (d + 1, s + plan.segments.len(), r + rows)
        }),
        None => (0, 0, 0),
    };
    let setup = &inputs.setup;
    let report = LoadReport {
        days,
        segments,
        script_rows,
        plays: inputs.plays.len(),
        buckets: setup.play_buckets.len(),
        situations: setup.field_zones.len()
            + setup.down_distance_categories.len()
            + setup.special_situations.len(),
    };
    info!(
        days = report.days,
        segments = report.segments,
        script_rows = report.script_rows,
        plays = report.plays,
        "loaded coverage inputs"
    );
    Ok((inputs, report))
}

/// Thresholds from an optional JSON file; defaults when no file is given.
pub fn load_thresholds(path: Option<&Path>) -> Result<Thresholds> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading thresholds");
            read_json(path)
        }
        None => Ok(Thresholds::default()),
    }
}
