use std::path::{Path, PathBuf};

use raudit_lib::{AuditError, Config, EngineOptions};

/// Load config from a TOML file, or return defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<Config, AuditError> {
    let cfg = Config::load(path)?;

    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("{} ({})", e, p.display()))
            .unwrap_or_else(|| e.to_string());
        AuditError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Merge CLI arguments with the config file, preferring CLI values when present.
pub fn resolve_engine_options(
    config: &Config,
    cli_fuzzy_threshold: Option<f64>,
    visuals_dir: Option<PathBuf>,
) -> Result<EngineOptions, AuditError> {
    let mut options = config.engine_options(visuals_dir);
    if let Some(threshold) = cli_fuzzy_threshold {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AuditError::invalid_argument(format!(
                "--fuzzy-threshold must be within [0, 1] (got {threshold})"
            )));
        }
        options.matching.fuzzy_threshold = threshold;
    }
    Ok(options)
}

/// Format effective config as a single-line string.
pub fn format_effective_config(options: &EngineOptions, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let visuals = options
        .visuals_dir
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "off".to_string());
    format!(
        "Effective config [{source}]: weights: layout={:.2}, css={:.2}, html={:.2} (sum {:.2}), histogram_bins={}, canny={}/{}, max_height_divergence={:.1}, fuzzy_threshold={:.2}, breakpoint_tolerance={}px, visuals={}",
        options.weights.layout,
        options.weights.css,
        options.weights.html,
        options.weights.sum(),
        options.visual.histogram_bins,
        options.visual.canny_low,
        options.visual.canny_high,
        options.visual.max_height_divergence,
        options.matching.fuzzy_threshold,
        options.css.breakpoint_tolerance,
        visuals
    )
}

/// Log effective config (verbose mode).
pub fn log_effective_config(options: &EngineOptions, config_source: Option<&Path>) {
    ::log::info!("{}", format_effective_config(options, config_source));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn config_values_flow_into_engine_options() {
        let mut cfg = Config::default();
        cfg.matching.fuzzy_threshold = 0.8;
        cfg.weights.layout = 0.4;
        let opts = resolve_engine_options(&cfg, None, None).expect("options");
        assert_eq!(opts.matching.fuzzy_threshold, 0.8);
        assert_eq!(opts.weights.layout, 0.4);
        assert!(opts.visuals_dir.is_none());
    }

    #[test]
    fn cli_threshold_overrides_config() {
        let mut cfg = Config::default();
        cfg.matching.fuzzy_threshold = 0.8;
        let opts = resolve_engine_options(&cfg, Some(0.6), Some(PathBuf::from("out")))
            .expect("options");
        assert_eq!(opts.matching.fuzzy_threshold, 0.6);
        assert_eq!(opts.visuals_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn cli_threshold_out_of_range_is_rejected() {
        let err = resolve_engine_options(&Config::default(), Some(1.5), None).unwrap_err();
        assert!(matches!(err, AuditError::InvalidArgument(_)));
    }

    #[test]
    fn invalid_config_file_is_a_config_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("raudit.toml");
        std::fs::write(&path, "[visual]\ncanny_low = 300\ncanny_high = 200\n").expect("write");
        let err = load_config(Some(&path)).unwrap_err();
        match err {
            AuditError::Config(msg) => {
                assert!(msg.contains("canny_low"));
                assert!(msg.contains("raudit.toml"));
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn format_effective_config_includes_all_fields() {
        let opts = EngineOptions {
            visuals_dir: Some(PathBuf::from("visuals")),
            ..Default::default()
        };
        let summary = format_effective_config(&opts, Some(Path::new("raudit.toml")));
        assert!(summary.contains("layout=0.35"));
        assert!(summary.contains("css=0.35"));
        assert!(summary.contains("html=0.25"));
        assert!(summary.contains("sum 0.95"));
        assert!(summary.contains("histogram_bins=8"));
        assert!(summary.contains("canny=100/200"));
        assert!(summary.contains("fuzzy_threshold=0.50"));
        assert!(summary.contains("breakpoint_tolerance=20px"));
        assert!(summary.contains("visuals=visuals"));
        assert!(summary.contains("raudit.toml"));
    }
}
