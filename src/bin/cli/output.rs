//! Output formatting for CLI operations.

use serde_json::json;
use std::path::Path;

use crspatch::batch::BatchResult;
use crspatch::{Archive, PatchReport};

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats the outcome of a patch run
    fn format_batch(&self, result: &BatchResult) -> String;

    /// Formats archive information
    fn format_info(&self, path: &Path, archive: &Archive) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_batch(&self, result: &BatchResult) -> String {
        let mut output = String::new();

        for (outcome, report) in result.succeeded() {
            output.push_str(&format!(
                "OK   {} -> {}\n",
                outcome.input.display(),
                outcome.output.display()
            ));
            output.push_str(&format!(
                "     {} records, {} removed, {} paths patched ({} -> {}, {:+} bytes)\n",
                report.records_found,
                report.removed.len(),
                report.paths_patched,
                humanize_bytes(report.input_len as u64),
                humanize_bytes(report.output_len as u64),
                report.size_delta()
            ));
            if report.unaccounted_bytes > 0 {
                output.push_str(&format!(
                    "     dropped {} bytes outside any record\n",
                    report.unaccounted_bytes
                ));
            }
            for removed in &report.removed {
                output.push_str(&format!(
                    "     removed {} ({:#08x}-{:#08x})\n",
                    removed.name,
                    removed.offset,
                    removed.offset + removed.len
                ));
            }
            for warning in &report.warnings {
                output.push_str(&format!("     warning: {}\n", warning));
            }
        }

        for (outcome, error) in result.failed() {
            output.push_str(&format!("FAIL {}: {}\n", outcome.input.display(), error));
        }

        let total = result.outcomes.len();
        output.push_str(&format!(
            "\nFiles processed: {}/{}\n",
            total - result.failure_count(),
            total
        ));
        output
    }

    fn format_info(&self, path: &Path, archive: &Archive) -> String {
        let info = archive.info();
        let mut output = String::new();

        output.push_str(&format!("Archive: {}\n", path.display()));
        output.push_str(&format!("Size: {}\n", humanize_bytes(info.archive_size as u64)));
        match info.declared_file_count {
            Some(count) => output.push_str(&format!("Index: present ({} files)\n", count)),
            None => output.push_str("Index: none\n"),
        }
        if info.unaccounted_bytes > 0 {
            output.push_str(&format!("Unaccounted: {} bytes\n", info.unaccounted_bytes));
        }
        output.push('\n');

        output.push_str(&format!(
            "{:>8} {:>10} {:>10} {:>19} {:<12} {}\n",
            "Offset", "Size", "Packed", "Modified", "Name", "Path"
        ));
        output.push_str(&"-".repeat(78));
        output.push('\n');
        for record in archive.records() {
            output.push_str(&format!(
                "{:>8} {:>10} {:>10} {:>19} {:<12} {}\n",
                format!("{:06X}", record.offset),
                record.original_size,
                record.compressed_size,
                record.modified.to_string(),
                record.display_name(),
                String::from_utf8_lossy(crspatch::format::trim_padding(record.path_field()))
            ));
        }
        output.push_str(&"-".repeat(78));
        output.push('\n');
        output.push_str(&format!(
            "{} records, {} -> {} ({:.1}%)\n",
            info.record_count,
            humanize_bytes(info.total_size),
            humanize_bytes(info.packed_size),
            info.compression_ratio() * 100.0
        ));
        output
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_batch(&self, result: &BatchResult) -> String {
        let files: Vec<_> = result
            .outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(report) => json!({
                    "input": outcome.input.display().to_string(),
                    "output": outcome.output.display().to_string(),
                    "success": true,
                    "report": report_json(report),
                }),
                Err(e) => json!({
                    "input": outcome.input.display().to_string(),
                    "success": false,
                    "error": e.to_string(),
                }),
            })
            .collect();

        let obj = json!({
            "success": result.is_success(),
            "files_processed": result.outcomes.len() - result.failure_count(),
            "files_failed": result.failure_count(),
            "files": files,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_info(&self, path: &Path, archive: &Archive) -> String {
        let info = archive.info();
        let records: Vec<_> = archive
            .records()
            .iter()
            .map(|r| {
                json!({
                    "name": r.display_name(),
                    "offset": r.offset,
                    "original_size": r.original_size,
                    "compressed_size": r.compressed_size,
                    "modified": r.modified.to_string(),
                    "path": String::from_utf8_lossy(crspatch::format::trim_padding(r.path_field())),
                    "path_len": r.path_len(),
                })
            })
            .collect();

        let obj = json!({
            "archive": path.display().to_string(),
            "archive_size": info.archive_size,
            "record_count": info.record_count,
            "total_size": info.total_size,
            "packed_size": info.packed_size,
            "compression_ratio": info.compression_ratio(),
            "has_index": info.has_index,
            "declared_file_count": info.declared_file_count,
            "unaccounted_bytes": info.unaccounted_bytes,
            "records": records,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }
}

fn report_json(report: &PatchReport) -> serde_json::Value {
    json!({
        "input_len": report.input_len,
        "output_len": report.output_len,
        "records_found": report.records_found,
        "removed": report.removed.iter().map(|r| json!({
            "name": r.name,
            "offset": r.offset,
            "len": r.len,
        })).collect::<Vec<_>>(),
        "entries": report.entries.iter().map(|e| json!({
            "name": e.name,
            "original_offset": e.original_offset,
            "new_offset": e.new_offset,
        })).collect::<Vec<_>>(),
        "paths_patched": report.paths_patched,
        "warnings": report.warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
        "timestamp": report.timestamp.to_string(),
        "file_count": report.file_count,
        "index_size": report.index_size,
        "replaced_header": report.replaced_header,
        "unaccounted_bytes": report.unaccounted_bytes,
        "size_delta": report.size_delta(),
        "clean": report.is_clean(),
    })
}

/// Creates the appropriate formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Renders the per-file validation log.
pub fn render_log(report: &PatchReport) -> String {
    let ts = report.timestamp;
    let mut lines = vec![
        "Generated index summary".to_string(),
        "------------------------".to_string(),
        format!("Number of files: {}", report.file_count),
        format!(
            "Index size: {} bytes (0x{:04X})",
            report.index_size, report.index_size
        ),
        format!(
            "MS-DOS Time: {:02}:{:02}:{:02} (HEX: {})",
            ts.hour(),
            ts.minute(),
            ts.second(),
            hex_bytes(&ts.time().to_le_bytes())
        ),
        format!(
            "MS-DOS Date: {}-{:02}-{:02} (HEX: {})",
            ts.year(),
            ts.month(),
            ts.day(),
            hex_bytes(&ts.date().to_le_bytes())
        ),
        String::new(),
    ];

    for (i, entry) in report.entries.iter().enumerate() {
        lines.push(format!(
            "[{}] Original offset: 0x{:06X} -> Adjusted offset: 0x{:06X} -> Entry HEX: {} -> ASCII: {}",
            i,
            entry.original_offset,
            entry.new_offset,
            entry.entry_hex(),
            entry.name
        ));
    }

    lines.join("\n")
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Converts bytes to a human-readable string
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
