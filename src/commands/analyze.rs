use std::path::PathBuf;
use std::process::ExitCode;

use raudit_lib::{
    AnalyzeOutput, AuditError, AuditOutput, ResponsivenessEngine, AUDIT_OUTPUT_VERSION,
};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::{load_config, log_effective_config, resolve_engine_options};

/// Run the analyze command.
#[allow(clippy::too_many_arguments)]
pub fn run_analyze(
    config_path: Option<PathBuf>,
    verbose: bool,
    project: PathBuf,
    screenshots: PathBuf,
    output_dir: PathBuf,
    no_visuals: bool,
    fuzzy_threshold: Option<f64>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };

    let visuals_dir = (!no_visuals).then_some(output_dir);
    let options = match resolve_engine_options(&config, fuzzy_threshold, visuals_dir.clone()) {
        Ok(options) => options,
        Err(err) => return render_error(err, format, output),
    };
    if verbose {
        log_effective_config(&options, config_path.as_deref());
    }

    let engine = match ResponsivenessEngine::new(options) {
        Ok(engine) => engine,
        Err(err) => return render_error(err, format, output),
    };

    let report = match engine.analyze_project(&project, &screenshots) {
        Ok(report) => report,
        Err(err) => return render_error(err, format, output),
    };

    ::log::info!(
        "Analyzed {} pages ({} skipped artifacts)",
        report.pages.len(),
        report.skipped.len()
    );

    let body = AuditOutput::Analyze(AnalyzeOutput {
        version: AUDIT_OUTPUT_VERSION.to_string(),
        visuals_dir,
        report,
    });

    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(AuditError::Unknown(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}
