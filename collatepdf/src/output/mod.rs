//! User-facing output for the command line.
//!
//! Library diagnostics go through the `log` facade; this module formats the
//! status lines and summaries the binary prints itself.

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::collate::Assembly;
use crate::io::WriteStatistics;

/// Print what went into an assembled document.
pub fn display_assembly(formatter: &OutputFormatter, assembly: &Assembly) {
    if !assembly.skipped.is_empty() {
        formatter.warning(&format!(
            "{} file(s) listed in the index were not found",
            assembly.skipped.len()
        ));
        for path in &assembly.skipped {
            formatter.detail("Skipped", &path.display().to_string());
        }
    }

    formatter.info(&format!(
        "Collated {} document(s) into {} page(s) in {:.2}s",
        assembly.documents,
        assembly.total_pages,
        assembly.build_time.as_secs_f64()
    ));

    formatter.detail("Cover pages", &assembly.cover_pages.to_string());
    formatter.detail("Body starts at page", &(assembly.first_page + 1).to_string());
}

/// Print the table of contents, one line per entry.
pub fn display_toc(formatter: &OutputFormatter, toc: &[String]) {
    formatter.section("Table of contents");
    for line in toc {
        if line.is_empty() {
            formatter.blank_line();
        } else {
            formatter.item(line);
        }
    }
}

/// Print the result of writing the output file.
pub fn display_write_statistics(formatter: &OutputFormatter, stats: &WriteStatistics) {
    formatter.success(&format!(
        "Created {} ({})",
        stats.output_path.display(),
        stats.format_file_size()
    ));
    formatter.detail("Pages", &stats.page_count.to_string());
    formatter.detail(
        "Write time",
        &format!("{:.2}s", stats.write_time.as_secs_f64()),
    );
    formatter.detail("Compression", if stats.compressed { "Yes" } else { "No" });
}
