//! Read/write dataset JSON files.
//!
//! Dataset JSON is the "portable" representation of a finished run:
//! - dashboard kind + series ids + panel toggles
//! - the windowed derived rows and their index bases
//! - the warnings that were active when the run was exported
//!
//! `mdash plot` re-renders a dataset without any network access.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::pipeline::{RunOutput, build_panels};
use crate::domain::{AlignedRow, Dashboard, DashboardConfig, IndexBases, Panel};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetFile {
    pub tool: String,
    pub dashboard: Dashboard,
    pub series_a: String,
    pub series_b: String,
    pub base_year: i32,
    pub show_ratio: bool,
    pub show_index: bool,
    pub bases: IndexBases,
    pub warnings: Vec<String>,
    pub rows: Vec<AlignedRow>,
}

impl DatasetFile {
    pub fn from_run(run: &RunOutput) -> Self {
        Self {
            tool: "mdash".to_string(),
            dashboard: run.config.dashboard,
            series_a: run.config.series_a.clone(),
            series_b: run.config.series_b.clone(),
            base_year: run.config.base_year,
            show_ratio: run.config.show_ratio,
            show_index: run.config.show_index,
            bases: run.bases,
            warnings: run.warnings.clone(),
            rows: run.view.clone(),
        }
    }

    /// Rebuild chart panels from the stored rows, applying the same
    /// suppression rules as a live run.
    pub fn panels(&self) -> Vec<Panel> {
        build_panels(&self.label_config(), &self.rows, &self.bases)
    }

    // Panels only consume labels and toggles from the config; the fetch and
    // join settings are irrelevant for a saved dataset.
    fn label_config(&self) -> DashboardConfig {
        let mut config = DashboardConfig::for_dashboard(self.dashboard);
        config.series_a = self.series_a.clone();
        config.series_b = self.series_b.clone();
        config.base_year = self.base_year;
        config.show_ratio = self.show_ratio;
        config.show_index = self.show_index;
        config
    }
}

/// Write a dataset JSON file.
pub fn write_dataset_json(path: &Path, run: &RunOutput) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::invalid(format!("Failed to create dataset JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, &DatasetFile::from_run(run))
        .map_err(|e| AppError::invalid(format!("Failed to write dataset JSON: {e}")))?;

    Ok(())
}

/// Read a dataset JSON file.
pub fn read_dataset_json(path: &Path) -> Result<DatasetFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::invalid(format!("Failed to open dataset JSON '{}': {e}", path.display()))
    })?;
    let dataset: DatasetFile = serde_json::from_reader(file)
        .map_err(|e| AppError::invalid(format!("Invalid dataset JSON: {e}")))?;
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_dashboard;
    use crate::data::{FredGraphClient, SeriesCache};
    use std::time::Duration;

    #[test]
    fn dataset_round_trip_preserves_rows_and_panels() {
        let mut config = DashboardConfig::for_dashboard(Dashboard::Gdp);
        config.offline = true;
        config.show_index = true;

        let client = FredGraphClient::with_base_url("http://unused.invalid");
        let mut cache = SeriesCache::new(Duration::from_secs(0));
        let run = run_dashboard(&config, &client, &mut cache).unwrap();

        let path = std::env::temp_dir().join(format!("mdash-dataset-{}.json", std::process::id()));
        write_dataset_json(&path, &run).unwrap();
        let dataset = read_dataset_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(dataset.tool, "mdash");
        assert_eq!(dataset.rows.len(), run.view.len());
        // Rebuilt panels match the live run's panel set.
        let panels = dataset.panels();
        assert_eq!(panels.len(), run.panels.len());
        assert_eq!(panels[0].series.len(), run.panels[0].series.len());
    }

    #[test]
    fn unreadable_dataset_is_an_invalid_input_error() {
        let path = std::env::temp_dir().join(format!("mdash-missing-{}.json", std::process::id()));
        let err = read_dataset_json(&path).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
