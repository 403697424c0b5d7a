/*!
 * Reporting functionality for treepack
 *
 * Renders a summary of a packing run as console tables using the tabled
 * library.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::utils::format_file_size;
use crate::writer::ClipboardOutcome;

/// Statistics for a packing run
#[derive(Debug, Clone)]
pub struct PackReport {
    /// Output file path
    pub output_file: String,
    /// Directory that was packaged
    pub source_dir: String,
    /// Time taken to scan, render and write
    pub duration: Duration,
    /// Number of files packed
    pub files_processed: usize,
    /// Number of files packed as text
    pub text_files: usize,
    /// Relative paths of files that could not be read
    pub unreadable_files: Vec<String>,
    /// Bytes of packed text
    pub total_bytes: u64,
    /// Size of the generated script
    pub script_bytes: u64,
    /// Directory entries the walk could not list
    pub skipped_entries: usize,
    /// Clipboard result
    pub clipboard: ClipboardOutcome,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for packing runs
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &PackReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &PackReport) {
        println!("\n{}", self.generate_report(report));
    }

    fn create_summary_table(&self, report: &PackReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let clipboard = match &report.clipboard {
            ClipboardOutcome::Copied(name) => format!("copied ({})", name),
            ClipboardOutcome::Disabled => "disabled".to_string(),
            ClipboardOutcome::Failed => "not copied".to_string(),
        };

        let rows = vec![
            SummaryRow {
                key: "📂 Source".to_string(),
                value: report.source_dir.clone(),
            },
            SummaryRow {
                key: "📜 Output Script".to_string(),
                value: format!(
                    "{} ({})",
                    report.output_file,
                    format_file_size(report.script_bytes)
                ),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files Packed".to_string(),
                value: report.files_processed.to_string(),
            },
            SummaryRow {
                key: "📝 Text Content".to_string(),
                value: format!(
                    "{} files, {}",
                    report.text_files,
                    format_file_size(report.total_bytes)
                ),
            },
            SummaryRow {
                key: "⚠️ Unreadable".to_string(),
                value: report.unreadable_files.len().to_string(),
            },
            SummaryRow {
                key: "🚫 Unlisted Entries".to_string(),
                value: report.skipped_entries.to_string(),
            },
            SummaryRow {
                key: "📋 Clipboard".to_string(),
                value: clipboard,
            },
        ];

        style(Table::new(rows))
    }

    fn create_unreadable_table(&self, report: &PackReport) -> String {
        #[derive(Tabled)]
        struct UnreadableRow {
            #[tabled(rename = "File Path")]
            path: String,
        }

        let rows: Vec<UnreadableRow> = report
            .unreadable_files
            .iter()
            .map(|path| UnreadableRow { path: path.clone() })
            .collect();

        style(Table::new(rows))
    }

    fn generate_console_report(&self, report: &PackReport) -> String {
        let summary = format!(
            "✅  PACKING COMPLETE\n{}",
            self.create_summary_table(report)
        );

        if report.unreadable_files.is_empty() {
            return summary;
        }

        format!(
            "⚠️  UNREADABLE FILES (packed without contents)\n{}\n\n{}",
            self.create_unreadable_table(report),
            summary
        )
    }
}

fn style(mut table: Table) -> String {
    table
        .with(Style::rounded())
        .with(Padding::new(1, 1, 0, 0))
        .with(Modify::new(Columns::new(..)).with(Alignment::left()));

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(unreadable: Vec<String>, clipboard: ClipboardOutcome) -> PackReport {
        PackReport {
            output_file: "create_tree.sh".to_string(),
            source_dir: "proj".to_string(),
            duration: Duration::from_millis(12),
            files_processed: 3 + unreadable.len(),
            text_files: 3,
            unreadable_files: unreadable,
            total_bytes: 2048,
            script_bytes: 4096,
            skipped_entries: 0,
            clipboard,
        }
    }

    #[test]
    fn test_summary_report() {
        let text = Reporter::new(ReportFormat::ConsoleTable)
            .generate_report(&report(vec![], ClipboardOutcome::Copied("pbcopy".to_string())));

        assert!(text.contains("PACKING COMPLETE"));
        assert!(text.contains("create_tree.sh (4.00 KB)"));
        assert!(text.contains("3 files, 2.00 KB"));
        assert!(text.contains("copied (pbcopy)"));
        assert!(!text.contains("UNREADABLE FILES"));
    }

    #[test]
    fn test_report_lists_unreadable_files() {
        let text = Reporter::new(ReportFormat::ConsoleTable)
            .generate_report(&report(
                vec!["proj/logo.png".to_string()],
                ClipboardOutcome::Failed,
            ));

        assert!(text.contains("UNREADABLE FILES"));
        assert!(text.contains("proj/logo.png"));
        assert!(text.contains("not copied"));
    }

    #[test]
    fn test_disabled_clipboard_is_not_reported_as_copied() {
        let text = Reporter::new(ReportFormat::ConsoleTable)
            .generate_report(&report(vec![], ClipboardOutcome::Disabled));

        assert!(text.contains("disabled"));
        assert!(!text.contains("copied ("));
    }
}
