//! Summary display for the clonedir CLI

use clonedir_sync::MirrorReport;
use clonedir_types::MirrorStats;
use console::style;
use std::time::Duration;

/// Print the end-of-run summary for every destination
pub fn display_report(report: &MirrorReport) {
    println!();
    let title = if report.dry_run {
        "Mirror Statistics (dry run):"
    } else {
        "Mirror Statistics:"
    };
    println!("{}", style(title).bold().underlined());
    println!("  Source entries: {}", style(report.inventory_len).cyan());
    println!(
        "  Checksums: {}",
        if report.use_checksum {
            style("enabled").green()
        } else {
            style("disabled").yellow()
        }
    );

    for destination in &report.destinations {
        println!();
        println!("  {}", style(destination.destination.display()).cyan().bold());
        match &destination.error {
            Some(error) => println!("    {} {}", style("✗").red().bold(), style(error).red()),
            None => display_stats(&destination.stats),
        }
    }

    println!();
    println!(
        "  Duration: {}",
        style(format_duration(report.duration)).blue()
    );
}

fn display_stats(stats: &MirrorStats) {
    println!(
        "    Directories created: {}",
        style(stats.directories_created).green()
    );
    println!("    Files copied: {}", style(stats.files_copied).green());
    println!(
        "    Bytes copied: {}",
        style(format_bytes(stats.bytes_copied)).green()
    );
    println!("    Entries skipped: {}", style(stats.entries_skipped).yellow());
    println!(
        "    Deleted: {} files, {} directories",
        style(stats.files_deleted).yellow(),
        style(stats.directories_deleted).yellow()
    );
}

/// Format bytes in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}

/// Format duration in human-readable format
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{:.2}s", duration.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
