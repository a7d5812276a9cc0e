//! Main mirror engine

use crate::{
    inventory::Inventory,
    progress::MirrorObserver,
    reconcile::Reconciler,
};
use chrono::{DateTime, Utc};
use clonedir_config::MirrorConfig;
use clonedir_types::{Error, ErrorPolicy, ErrorSeverity, MirrorStats, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, info_span, warn};

/// Unique identifier for a mirror run
pub type RunId = uuid::Uuid;

/// Mirror request: one source, any number of destinations
#[derive(Debug, Clone)]
pub struct MirrorRequest {
    /// Source directory path
    pub source: PathBuf,
    /// Destination directory paths, processed in order
    pub destinations: Vec<PathBuf>,
    /// Request ID for tracking
    pub run_id: RunId,
}

impl MirrorRequest {
    /// Create a new mirror request
    pub fn new<P, I, D>(source: P, destinations: I) -> Self
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = D>,
        D: AsRef<Path>,
    {
        Self {
            source: source.as_ref().to_path_buf(),
            destinations: destinations
                .into_iter()
                .map(|d| d.as_ref().to_path_buf())
                .collect(),
            run_id: RunId::new_v4(),
        }
    }
}

/// Mirror options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorOptions {
    /// Skip entries whose fingerprint already matches
    pub use_checksum: bool,
    /// Dry run (don't actually modify destinations)
    pub dry_run: bool,
    /// What to do when a destination fails
    pub on_error: ErrorPolicy,
}

impl MirrorOptions {
    /// Options that copy every entry unconditionally
    pub fn without_checksum() -> Self {
        Self {
            use_checksum: false,
            ..Self::default()
        }
    }

    /// Set dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the destination error policy
    pub fn with_error_policy(mut self, on_error: ErrorPolicy) -> Self {
        self.on_error = on_error;
        self
    }
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            use_checksum: true,
            dry_run: false,
            on_error: ErrorPolicy::Abort,
        }
    }
}

impl From<&MirrorConfig> for MirrorOptions {
    fn from(config: &MirrorConfig) -> Self {
        Self {
            use_checksum: config.use_checksum,
            dry_run: config.dry_run,
            on_error: config.on_error,
        }
    }
}

/// Outcome for one destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationReport {
    /// Destination root
    pub destination: PathBuf,
    /// Work done before completion or failure
    pub stats: MirrorStats,
    /// Failure message, when the destination could not be mirrored
    pub error: Option<String>,
}

impl DestinationReport {
    /// Whether the destination now mirrors the source
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of a whole mirror run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorReport {
    /// Request ID
    pub run_id: RunId,
    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,
    /// Total run duration
    pub duration: Duration,
    /// Number of source entries
    pub inventory_len: usize,
    /// Whether checksums were computed
    pub use_checksum: bool,
    /// Whether the run was a dry run
    pub dry_run: bool,
    /// Per-destination outcomes, in request order
    pub destinations: Vec<DestinationReport>,
}

impl MirrorReport {
    /// Whether every destination succeeded
    pub fn is_success(&self) -> bool {
        self.destinations.iter().all(DestinationReport::is_success)
    }

    /// Destinations that failed
    pub fn failures(&self) -> impl Iterator<Item = &DestinationReport> {
        self.destinations.iter().filter(|d| !d.is_success())
    }

    /// Statistics summed over all destinations
    pub fn total_stats(&self) -> MirrorStats {
        let mut total = MirrorStats::new();
        for destination in &self.destinations {
            total.merge(&destination.stats);
        }
        total
    }
}

/// Main mirror engine
#[derive(Debug, Clone, Default)]
pub struct MirrorEngine {
    options: MirrorOptions,
}

impl MirrorEngine {
    /// Create a mirror engine with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mirror engine with custom options
    pub fn with_options(options: MirrorOptions) -> Self {
        Self { options }
    }

    /// Options in use
    pub fn options(&self) -> &MirrorOptions {
        &self.options
    }

    /// Mirror the source of `request` into each of its destinations
    pub fn run(
        &self,
        request: &MirrorRequest,
        observer: &mut dyn MirrorObserver,
    ) -> Result<MirrorReport> {
        let _span = info_span!("mirror", run_id = %request.run_id).entered();
        let start_time = Instant::now();
        let started_at = Utc::now();

        info!(
            "Starting mirror of {} into {} destination(s)",
            request.source.display(),
            request.destinations.len()
        );
        self.validate(request)?;

        let inventory = Inventory::build(&request.source, self.options.use_checksum, observer)?;
        let reconciler = Reconciler::new(&inventory).dry_run(self.options.dry_run);

        let mut report = MirrorReport {
            run_id: request.run_id,
            started_at,
            duration: Duration::default(),
            inventory_len: inventory.len(),
            use_checksum: self.options.use_checksum,
            dry_run: self.options.dry_run,
            destinations: Vec::with_capacity(request.destinations.len()),
        };

        for destination in &request.destinations {
            observer.destination_started(destination);

            let mut stats = MirrorStats::new();
            match reconciler.reconcile_into(destination, &mut stats, observer) {
                Ok(()) => {
                    observer.destination_finished(destination, Ok(&stats));
                    report.destinations.push(DestinationReport {
                        destination: destination.clone(),
                        stats,
                        error: None,
                    });
                }
                Err(error) => {
                    let error = error.in_destination(destination);
                    observer.destination_finished(destination, Err(&error));

                    if self.options.on_error == ErrorPolicy::Abort
                        || error.severity() >= ErrorSeverity::Critical
                    {
                        return Err(error);
                    }

                    warn!("{}; continuing with next destination", error);
                    report.destinations.push(DestinationReport {
                        destination: destination.clone(),
                        stats,
                        error: Some(error.to_string()),
                    });
                }
            }
        }

        report.duration = start_time.elapsed();
        info!(
            "Mirror completed: {} destination(s) in {:?}",
            report.destinations.len(),
            report.duration
        );
        Ok(report)
    }

    /// Validate source and destination paths
    fn validate(&self, request: &MirrorRequest) -> Result<()> {
        let source = &request.source;
        if !source.exists() {
            return Err(Error::invalid_source(source, "path does not exist"));
        }
        if !source.is_dir() {
            return Err(Error::invalid_source(source, "path is not a directory"));
        }
        if request.destinations.is_empty() {
            return Err(Error::config("at least one destination is required"));
        }

        // The deletion pass would otherwise remove source entries.
        let source = resolve(source);
        for destination in &request.destinations {
            let resolved = resolve(destination);
            if resolved.starts_with(&source) {
                return Err(Error::config(format!(
                    "destination '{}' lies inside source '{}'",
                    destination.display(),
                    request.source.display()
                )));
            }
            if source.starts_with(&resolved) {
                return Err(Error::config(format!(
                    "destination '{}' contains source '{}'",
                    destination.display(),
                    request.source.display()
                )));
            }
        }

        Ok(())
    }
}

/// Best-effort absolute form of a path that may not exist yet
fn resolve(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => resolve(parent).join(name),
        _ => std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopObserver;
    use clonedir_types::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_mirror_request_creation() {
        let request = MirrorRequest::new("source", ["one", "two"]);

        assert_eq!(request.source, PathBuf::from("source"));
        assert_eq!(
            request.destinations,
            vec![PathBuf::from("one"), PathBuf::from("two")]
        );
    }

    #[test]
    fn test_mirror_options() {
        let default = MirrorOptions::default();
        assert!(default.use_checksum);
        assert!(!default.dry_run);
        assert_eq!(default.on_error, ErrorPolicy::Abort);

        let full = MirrorOptions::without_checksum()
            .with_dry_run(true)
            .with_error_policy(ErrorPolicy::Continue);
        assert!(!full.use_checksum);
        assert!(full.dry_run);
        assert_eq!(full.on_error, ErrorPolicy::Continue);
    }

    #[test]
    fn test_options_from_config() {
        let config = MirrorConfig {
            use_checksum: false,
            dry_run: true,
            on_error: ErrorPolicy::Continue,
        };
        let options = MirrorOptions::from(&config);
        assert_eq!(options, MirrorOptions::without_checksum().with_dry_run(true).with_error_policy(ErrorPolicy::Continue));
    }

    #[test]
    fn test_missing_source_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let request = MirrorRequest::new(temp_dir.path().join("nope"), [temp_dir.path().join("d")]);

        let error = MirrorEngine::new().run(&request, &mut NoopObserver).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
        assert!(matches!(error, Error::InvalidSource { .. }));
    }

    #[test]
    fn test_file_source_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("f.txt");
        fs::write(&file, b"x").unwrap();
        let request = MirrorRequest::new(&file, [temp_dir.path().join("d")]);

        let error = MirrorEngine::new().run(&request, &mut NoopObserver).unwrap_err();
        assert!(matches!(error, Error::InvalidSource { .. }));
    }

    #[test]
    fn test_no_destinations_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let request = MirrorRequest::new(temp_dir.path(), Vec::<PathBuf>::new());

        let error = MirrorEngine::new().run(&request, &mut NoopObserver).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_destination_inside_source_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let request = MirrorRequest::new(temp_dir.path(), [temp_dir.path().join("backup/new")]);

        let error = MirrorEngine::new().run(&request, &mut NoopObserver).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
        assert!(error.to_string().contains("inside source"));
        assert!(!temp_dir.path().join("backup").exists());
    }

    #[test]
    fn test_destination_containing_source_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("outer/src");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("precious.txt"), b"keep").unwrap();
        let request = MirrorRequest::new(&source, [temp_dir.path().join("outer")]);

        let error = MirrorEngine::new().run(&request, &mut NoopObserver).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
        assert!(error.to_string().contains("contains source"));
        assert_eq!(fs::read(source.join("precious.txt")).unwrap(), b"keep");
    }

    #[test]
    fn test_failed_destination_keeps_partial_stats() {
        let source = TempDir::new().unwrap();
        fs::write(source.path().join("a.txt"), b"abc").unwrap();
        fs::create_dir(source.path().join("z")).unwrap();
        let dest = TempDir::new().unwrap();
        let broken = dest.path().join("broken");
        fs::create_dir(&broken).unwrap();
        fs::write(broken.join("z"), b"not a directory").unwrap();
        let request = MirrorRequest::new(source.path(), [&broken]);

        let report = MirrorEngine::with_options(
            MirrorOptions::default().with_error_policy(ErrorPolicy::Continue),
        )
        .run(&request, &mut NoopObserver)
        .unwrap();

        let failed = &report.destinations[0];
        assert!(failed.error.is_some());
        assert_eq!(failed.stats.files_copied, 1);
        assert_eq!(failed.stats.bytes_copied, 3);
        assert_eq!(fs::read(broken.join("a.txt")).unwrap(), b"abc");
    }

    #[test]
    fn test_report_totals() {
        let source = TempDir::new().unwrap();
        fs::write(source.path().join("f.txt"), b"abc").unwrap();
        let dest = TempDir::new().unwrap();
        let request = MirrorRequest::new(
            source.path(),
            [dest.path().join("one"), dest.path().join("two")],
        );

        let report = MirrorEngine::new().run(&request, &mut NoopObserver).unwrap();

        assert!(report.is_success());
        assert_eq!(report.run_id, request.run_id);
        assert_eq!(report.inventory_len, 1);
        assert_eq!(report.destinations.len(), 2);
        assert_eq!(report.total_stats().files_copied, 2);
        assert_eq!(report.total_stats().bytes_copied, 6);
        assert_eq!(report.failures().count(), 0);
    }
}
