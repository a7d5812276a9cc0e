//! JSON output structures for the clonedir CLI

use clonedir_sync::MirrorReport;
use serde::Serialize;
use std::path::Path;

/// Complete JSON output for a mirror run
#[derive(Debug, Serialize)]
pub struct MirrorResultJson<'a> {
    /// Operation metadata
    pub metadata: OperationMetadata,
    /// Full run report
    pub report: &'a MirrorReport,
    /// Overall result
    pub result: OperationResult,
}

/// Operation metadata
#[derive(Debug, Serialize)]
pub struct OperationMetadata {
    /// clonedir version
    pub version: String,
    /// Operation type
    pub operation: String,
    /// Source path
    pub source_path: String,
}

/// Overall result
#[derive(Debug, Serialize)]
pub struct OperationResult {
    /// Whether every destination succeeded
    pub success: bool,
    /// Destinations that failed
    pub failed_destinations: Vec<String>,
}

impl<'a> MirrorResultJson<'a> {
    /// Build the JSON document for `report`
    pub fn new(source: &Path, report: &'a MirrorReport) -> Self {
        Self {
            metadata: OperationMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                operation: "mirror".to_string(),
                source_path: source.display().to_string(),
            },
            report,
            result: OperationResult {
                success: report.is_success(),
                failed_destinations: report
                    .failures()
                    .map(|d| d.destination.display().to_string())
                    .collect(),
            },
        }
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clonedir_sync::{DestinationReport, RunId};
    use clonedir_types::MirrorStats;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_json_lists_failures() {
        let report = MirrorReport {
            run_id: RunId::nil(),
            started_at: "2024-01-01T00:00:00Z".parse().unwrap(),
            duration: Duration::from_secs(1),
            inventory_len: 2,
            use_checksum: true,
            dry_run: false,
            destinations: vec![
                DestinationReport {
                    destination: PathBuf::from("/ok"),
                    stats: MirrorStats::new(),
                    error: None,
                },
                DestinationReport {
                    destination: PathBuf::from("/bad"),
                    stats: MirrorStats::new(),
                    error: Some("Failed to write '/bad': denied".to_string()),
                },
            ],
        };

        let json = MirrorResultJson::new(Path::new("/src"), &report);
        let value: serde_json::Value = serde_json::from_str(&json.to_json().unwrap()).unwrap();

        assert_eq!(value["result"]["success"], false);
        assert_eq!(value["result"]["failed_destinations"][0], "/bad");
        assert_eq!(value["metadata"]["operation"], "mirror");
        assert_eq!(value["report"]["inventory_len"], 2);
    }
}
