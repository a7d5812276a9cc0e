//! Console rendering of mirror progress

use clonedir_sync::{MirrorAction, MirrorObserver};
use clonedir_types::{Error, MirrorStats};
use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;

/// Prints checksum progress and one status line per copy or delete
pub struct ConsoleObserver {
    enabled: bool,
    dry_run: bool,
    checksum_bar: Option<ProgressBar>,
}

impl ConsoleObserver {
    /// Create an observer; a disabled one prints nothing
    pub fn new(enabled: bool, dry_run: bool) -> Self {
        Self {
            enabled,
            dry_run,
            checksum_bar: None,
        }
    }

    fn verb(&self) -> &'static str {
        if self.dry_run {
            "would do"
        } else {
            "doing"
        }
    }
}

impl MirrorObserver for ConsoleObserver {
    fn checksums_started(&mut self, total: usize) {
        if !self.enabled {
            return;
        }
        println!("{}", style("calculating checksums").bold());

        let pb = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stdout());
        if let Ok(progress_style) =
            ProgressStyle::default_bar().template("{spinner:.green} [{wide_bar:.cyan/blue}] {pos} of {len}")
        {
            pb.set_style(progress_style.progress_chars("█▉▊▋▌▍▎▏  "));
        }
        self.checksum_bar = Some(pb);
    }

    fn checksum_progress(&mut self, done: usize, _total: usize) {
        if let Some(pb) = &self.checksum_bar {
            pb.set_position(done as u64);
        }
    }

    fn checksums_finished(&mut self) {
        if let Some(pb) = self.checksum_bar.take() {
            pb.finish_and_clear();
        }
        if self.enabled {
            println!("{}", style("checksums calculated").green());
        }
    }

    fn destination_started(&mut self, destination: &Path) {
        if self.enabled {
            println!(
                "{} Mirroring into {}",
                style("⟲").blue().bold(),
                style(destination.display()).cyan()
            );
        }
    }

    fn action(&mut self, action: &MirrorAction) {
        if !self.enabled {
            return;
        }
        match action {
            MirrorAction::CreateDirectory {
                source,
                destination,
            }
            | MirrorAction::CopyFile {
                source,
                destination,
                ..
            } => println!(
                "{}: {} -> {}...{}",
                self.verb(),
                source.display(),
                style(destination.display()).cyan(),
                style("done!").green()
            ),
            MirrorAction::DeleteFile { path } | MirrorAction::DeleteDirectory { path } => {
                println!(
                    "{} del {}...{}",
                    self.verb(),
                    style(path.display()).yellow(),
                    style("done!").green()
                );
            }
            MirrorAction::Skip { .. } => {}
        }
    }

    fn destination_finished(
        &mut self,
        destination: &Path,
        outcome: std::result::Result<&MirrorStats, &Error>,
    ) {
        if !self.enabled {
            return;
        }
        match outcome {
            Ok(stats) if stats.is_unchanged() => println!(
                "{} {} already up to date",
                style("✓").green(),
                destination.display()
            ),
            Ok(_) => println!("{} {} mirrored", style("✓").green(), destination.display()),
            Err(error) => println!("{} {}", style("✗").red().bold(), style(error).red()),
        }
    }
}
