use std::path::PathBuf;
use std::process::ExitCode;

use raudit_lib::{locate, AuditError, AuditOutput, DiscoverOutput, AUDIT_OUTPUT_VERSION};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::{load_config, log_effective_config, resolve_engine_options};

/// Run the discover command.
pub fn run_discover(
    config_path: Option<PathBuf>,
    verbose: bool,
    project: PathBuf,
    screenshots: PathBuf,
    fuzzy_threshold: Option<f64>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };
    let options = match resolve_engine_options(&config, fuzzy_threshold, None) {
        Ok(options) => options,
        Err(err) => return render_error(err, format, output),
    };
    if verbose {
        log_effective_config(&options, config_path.as_deref());
    }

    let discovery = match locate(&project, &screenshots, &options.matching) {
        Ok(discovery) => discovery,
        Err(err) => return render_error(err, format, output),
    };

    let body = AuditOutput::Discover(DiscoverOutput {
        version: AUDIT_OUTPUT_VERSION.to_string(),
        project_root: discovery.project_root,
        screenshot_root: discovery.screenshot_root,
        summary: discovery.summary,
        pages: discovery.pages,
        pairs: discovery.pairs,
        skipped: discovery.skipped,
    });

    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(AuditError::Unknown(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}
