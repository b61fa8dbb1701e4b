//! Report command handler
//!
//! Renders the transcript report for the stored semesters in Markdown or HTML.

use super::{load_gradebook, open_store, report_failure};
use gradeplan::config::Config;
use gradeplan::core::report::{
    HtmlReporter, MarkdownReporter, ReportContext, ReportFormat, ReportGenerator,
};
use gradeplan::{error, info};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Run the report command.
///
/// # Arguments
/// * `output_file` - Optional output path; defaults to `reports_dir/transcript.<ext>`
/// * `format_str` - Report format (markdown, html)
/// * `config` - Configuration providing the data file and reports directory
pub fn run(output_file: Option<&Path>, format_str: &str, config: &Config) {
    match generate_report(output_file, format_str, config) {
        Ok(path) => println!("✓ Report generated: {}", path.display()),
        Err(err) => report_failure("Report generation", &err),
    }
}

fn generate_report(
    output_file: Option<&Path>,
    format_str: &str,
    config: &Config,
) -> Result<PathBuf, String> {
    let format = ReportFormat::from_str(format_str).map_err(|e| format!("✗ {e}"))?;

    let store = open_store(config);
    let gradebook = load_gradebook(&store)?;
    let ctx = ReportContext::new(gradebook.semesters(), &config.organizer());

    let output_path = output_file.map_or_else(
        || default_output_path(config, format),
        Path::to_path_buf,
    );
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                error!("Failed to create {}: {e}", parent.display());
                format!("✗ Failed to create directory {}: {e}", parent.display())
            })?;
        }
    }

    let generator: Box<dyn ReportGenerator> = match format {
        ReportFormat::Markdown => Box::new(MarkdownReporter::new()),
        ReportFormat::Html => Box::new(HtmlReporter::new()),
    };
    generator
        .generate(&ctx, &output_path)
        .map_err(|e| format!("✗ Failed to write {}: {e}", output_path.display()))?;

    info!(
        "Generated {format} report for {} semester(s)",
        ctx.semester_count()
    );
    Ok(output_path)
}

fn default_output_path(config: &Config, format: ReportFormat) -> PathBuf {
    PathBuf::from(&config.paths.reports_dir).join(format!("transcript.{}", format.extension()))
}
