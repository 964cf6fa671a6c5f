use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use raudit_lib::{
    Aggregate, AuditError, AuditOutput, ErrorOutput, MatchKind, Tier, VisualStatus,
    AUDIT_OUTPUT_VERSION,
};

use crate::cli::OutputFormat;

/// Write output in the requested format.
pub fn write_output(
    body: &AuditOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

/// Render an error and return the fatal exit code.
pub fn render_error(err: AuditError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    ::log::debug!("Fatal error: {err:?}");
    let error_payload = err.to_payload();
    let payload = AuditOutput::Error(ErrorOutput {
        version: AUDIT_OUTPUT_VERSION.to_string(),
        message: Some(error_payload.message.clone()),
        error: error_payload,
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    ExitCode::from(2)
}

/// Write JSON output to file or stdout.
fn write_json_output(
    body: &AuditOutput,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Write pretty output to file or stdout.
fn write_pretty_output(body: &AuditOutput, output: Option<&Path>) -> io::Result<()> {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_human = output.is_none() && stdout_is_tty;

    if use_human {
        let content = format_pretty(body, true);
        println!("{content}");
        return Ok(());
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

fn optional_score(score: Option<f64>) -> String {
    score
        .map(|s| format!("{s:5.2}"))
        .unwrap_or_else(|| "  n/a".to_string())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &AuditOutput, colorize: bool) -> String {
    match body {
        AuditOutput::Analyze(out) => {
            let report = &out.report;
            let mut buf = String::new();
            let header = color("[ANALYZE]", "36", colorize);

            match &report.aggregate {
                Aggregate::Scored(agg) => {
                    let tier = agg.responsiveness.tier;
                    let score = color(&format!("{:.2}/10", agg.score), tier_color_code(tier), colorize);
                    writeln!(buf, "{header} Responsiveness {score} - {tier}").ok();
                    writeln!(
                        buf,
                        "Rubric: responsiveness {:.2}/{:.0} ({:.1}%), flexbox/grid {:.2}/{:.0} ({}), total {:.2}/{:.0}",
                        agg.responsiveness.points,
                        agg.responsiveness.max_points,
                        agg.responsiveness.percentage,
                        report.layout_techniques.points,
                        report.layout_techniques.max_points,
                        report.layout_techniques.tier,
                        agg.design_total,
                        agg.design_total_max
                    )
                    .ok();
                }
                Aggregate::NoData { reason } => {
                    let marker = color("NO DATA", "33", colorize);
                    writeln!(buf, "{header} {marker}: {reason}").ok();
                }
            }

            let d = &report.discovery;
            writeln!(
                buf,
                "Discovered: {} pages, {} stylesheet files, {} inline blocks, {} screenshot pairs ({} exact, {} fuzzy matches)",
                d.pages, d.stylesheet_files, d.inline_blocks, d.screenshot_pairs, d.exact_matches, d.fuzzy_matches
            )
            .ok();

            if !report.pages.is_empty() {
                writeln!(buf, "Pages:").ok();
                for page in &report.pages {
                    let s = &page.scores;
                    write!(
                        buf,
                        "- {:24} overall {}  css {:5.2}  html {:5.2}  layout {}",
                        file_label(&page.page),
                        optional_score(s.overall_score),
                        s.css_score,
                        s.html_score,
                        optional_score(s.layout_score)
                    )
                    .ok();
                    match &page.visual_status {
                        VisualStatus::Analyzed => {}
                        VisualStatus::Unavailable { reason } | VisualStatus::Unreadable { reason } => {
                            write!(buf, "  ({reason})").ok();
                        }
                    }
                    if let Some(MatchKind::Fuzzy { similarity }) =
                        page.screenshots.as_ref().map(|m| m.kind)
                    {
                        write!(buf, "  [fuzzy match {similarity:.2}]").ok();
                    }
                    writeln!(buf).ok();
                    for rec in &page.recommendations {
                        writeln!(buf, "    * {rec}").ok();
                    }
                }
            }

            if !report.breakpoints.is_empty() {
                let list: Vec<String> = report.breakpoints.iter().map(|b| b.to_string()).collect();
                writeln!(buf, "Breakpoints: {}", list.join(", ")).ok();
            }

            if !report.skipped.is_empty() {
                writeln!(buf, "Skipped ({}):", report.skipped.len()).ok();
                for skip in &report.skipped {
                    writeln!(buf, "- [{}] {}: {}", skip.kind, skip.path, skip.reason).ok();
                }
            }

            if let Some(dir) = &out.visuals_dir {
                writeln!(buf, "Visuals: {}", dir.display()).ok();
            }
            buf
        }
        AuditOutput::Discover(out) => {
            let mut buf = String::new();
            let header = color("[DISCOVER]", "34", colorize);
            writeln!(buf, "{} {}", header, out.project_root.display()).ok();
            writeln!(
                buf,
                "{} pages, {} stylesheet files, {} inline blocks, {} screenshot pairs in {}",
                out.summary.pages,
                out.summary.stylesheet_files,
                out.summary.inline_blocks,
                out.summary.screenshot_pairs,
                out.screenshot_root.display()
            )
            .ok();
            for page in &out.pages {
                let matched = match page.screenshots.as_ref() {
                    Some(m) => match m.kind {
                        MatchKind::Exact => format!("-> {} (exact)", m.pair.base_name),
                        MatchKind::Fuzzy { similarity } => {
                            format!("-> {} (fuzzy {:.2})", m.pair.base_name, similarity)
                        }
                    },
                    None => "-> no screenshots".to_string(),
                };
                writeln!(buf, "- {} {}", page.path.display(), matched).ok();
                for source in &page.stylesheets {
                    writeln!(buf, "    {}", source.label()).ok();
                }
            }
            if !out.skipped.is_empty() {
                writeln!(buf, "Skipped ({}):", out.skipped.len()).ok();
                for skip in &out.skipped {
                    writeln!(buf, "- [{}] {}: {}", skip.kind, skip.path, skip.reason).ok();
                }
            }
            buf
        }
        AuditOutput::Error(out) => {
            let mut buf = String::new();
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or(out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Map a tier to an ANSI color code.
fn tier_color_code(tier: Tier) -> &'static str {
    match tier {
        Tier::Distinction | Tier::Credit => "32", // green
        Tier::Pass => "33",                       // yellow
        Tier::Fail => "31",                       // red
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raudit_lib::{
        AnalyzeOutput, DiscoverOutput, DiscoverySummary, ErrorCategory, ErrorPayload,
        HtmlFeatureProfile, PageReport, PageScore, ProjectReport, SkipKind, SkippedArtifact,
        StylesheetOrigin,
    };

    fn report(aggregate: Aggregate) -> ProjectReport {
        ProjectReport {
            project_root: PathBuf::from("site"),
            screenshot_root: PathBuf::from("shots"),
            discovery: DiscoverySummary {
                pages: 1,
                ..Default::default()
            },
            pages: vec![PageReport {
                page: PathBuf::from("site/about.html"),
                stylesheet_origin: StylesheetOrigin::Page,
                css_profiles: vec![],
                html: HtmlFeatureProfile::default(),
                screenshots: None,
                visual_status: VisualStatus::Unavailable {
                    reason: "no screenshot pair matched 'about'".to_string(),
                },
                visual: None,
                scores: PageScore {
                    css_score: 3.0,
                    html_score: 5.0,
                    layout_score: None,
                    overall_score: None,
                },
                recommendations: vec!["Add more media queries.".to_string()],
                skipped: vec![],
            }],
            aggregate,
            layout_techniques: raudit_lib::assess_layout_techniques(
                &Vec::<raudit_lib::CssFeatureProfile>::new(),
            ),
            breakpoints: vec![480, 768],
            skipped: vec![SkippedArtifact::new(
                "site/about.html",
                SkipKind::MatchFailure,
                "no screenshot pair matched 'about'",
            )],
        }
    }

    #[test]
    fn render_error_always_returns_fatal_exit_code() {
        let code = render_error(
            AuditError::Config("boom".to_string()),
            OutputFormat::Json,
            None,
        );
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn format_pretty_reports_no_data_and_unscored_pages() {
        let output = AuditOutput::Analyze(AnalyzeOutput {
            version: AUDIT_OUTPUT_VERSION.to_string(),
            visuals_dir: None,
            report: report(Aggregate::NoData {
                reason: "no page had a matched screenshot pair to score".to_string(),
            }),
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[ANALYZE] NO DATA"));
        assert!(pretty.contains("about.html"));
        assert!(pretty.contains("n/a"));
        assert!(pretty.contains("no screenshot pair matched 'about'"));
        assert!(pretty.contains("Breakpoints: 480, 768"));
        assert!(pretty.contains("[match-failure]"));
        assert!(pretty.contains("* Add more media queries."));
    }

    #[test]
    fn format_pretty_shows_score_and_tier() {
        let responsiveness = raudit_lib::assess_responsiveness(7.5);
        let output = AuditOutput::Analyze(AnalyzeOutput {
            version: AUDIT_OUTPUT_VERSION.to_string(),
            visuals_dir: Some(PathBuf::from("responsive_analysis")),
            report: report(Aggregate::Scored(raudit_lib::AggregateScore {
                score: 7.5,
                pages_scored: 1,
                responsiveness,
                design_total: responsiveness.points,
                design_total_max: 11.0,
            })),
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("Responsiveness 7.50/10 - Credit (65-74%)"));
        assert!(pretty.contains("Rubric: responsiveness"));
        assert!(pretty.contains("Visuals: responsive_analysis"));
    }

    #[test]
    fn format_pretty_lists_discovered_pages() {
        let output = AuditOutput::Discover(DiscoverOutput {
            version: AUDIT_OUTPUT_VERSION.to_string(),
            project_root: PathBuf::from("site"),
            screenshot_root: PathBuf::from("shots"),
            summary: DiscoverySummary::default(),
            pages: vec![],
            pairs: vec![],
            skipped: vec![],
        });
        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[DISCOVER] site"));
        assert!(pretty.contains("0 pages"));
    }

    #[test]
    fn format_pretty_handles_errors() {
        let output = AuditOutput::Error(ErrorOutput {
            version: AUDIT_OUTPUT_VERSION.to_string(),
            message: Some("bad input".to_string()),
            error: ErrorPayload {
                category: ErrorCategory::Config,
                message: "bad input".to_string(),
                remediation: Some("check flags".to_string()),
            },
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[ERROR] bad input"));
        assert!(pretty.contains("Hint: check flags"));
    }
}
