use serde::{Deserialize, Serialize};

use crate::types::{
    Aggregate, AggregateScore, CssFeatureProfile, PageReport, PageScore, Tier, TierAssessment,
};

/// Rubric points available for responsiveness.
pub const RESPONSIVENESS_POINTS: f64 = 7.0;
/// Rubric points available for Flexbox/Grid usage.
pub const LAYOUT_TECHNIQUE_POINTS: f64 = 4.0;

/// Composite score weights.
///
/// The defaults sum to 0.95, not 1.0, so a page maxes out at 9.5. Changing them changes
/// the scale of every score and is a grading policy change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ScoreWeights {
    pub layout: f64,
    pub css: f64,
    pub html: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            layout: 0.35,
            css: 0.35,
            html: 0.25,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.layout + self.css + self.html
    }
}

/// Weighted composite of the three component scores, or `None` without a layout score.
pub fn composite_score(
    layout: Option<f64>,
    css: f64,
    html: f64,
    weights: &ScoreWeights,
) -> Option<f64> {
    let layout = layout?;
    let score = weights.layout * layout + weights.css * css + weights.html * html;
    Some(score.clamp(0.0, 10.0))
}

pub fn page_score(
    layout: Option<f64>,
    css: f64,
    html: f64,
    weights: &ScoreWeights,
) -> PageScore {
    PageScore {
        css_score: css,
        html_score: html,
        layout_score: layout,
        overall_score: composite_score(layout, css, html, weights),
    }
}

pub fn tier_for(score: f64) -> Tier {
    if score >= 8.5 {
        Tier::Distinction
    } else if score >= 7.0 {
        Tier::Credit
    } else if score >= 5.0 {
        Tier::Pass
    } else {
        Tier::Fail
    }
}

/// Place a 0-10 score into its tier and interpolate a percentage within the tier's band.
pub fn assess_responsiveness(score: f64) -> TierAssessment {
    let tier = tier_for(score);
    let percentage = match tier {
        Tier::Distinction => f64::min(100.0, 75.0 + (score - 8.5) * 25.0 / 1.5),
        Tier::Credit => 65.0 + (score - 7.0) * 9.0 / 1.5,
        Tier::Pass => 50.0 + (score - 5.0) * 14.0 / 2.0,
        Tier::Fail => score * 49.0 / 5.0,
    };
    assessment(tier, percentage, RESPONSIVENESS_POINTS)
}

/// Grade Flexbox/Grid usage averaged over every stylesheet profile.
///
/// Flexbox features count `flex`, `flex-wrap` and `flex-direction` declarations; grid
/// features count `grid` and `grid-template`. No profiles grades as 0%.
pub fn assess_layout_techniques<'a, I>(profiles: I) -> TierAssessment
where
    I: IntoIterator<Item = &'a CssFeatureProfile>,
{
    let mut n = 0usize;
    let mut flex = 0usize;
    let mut grid = 0usize;
    for profile in profiles {
        n += 1;
        flex += profile.layouts.flex_features();
        grid += profile.layouts.grid_features();
    }
    if n == 0 {
        return assessment(Tier::Fail, 0.0, LAYOUT_TECHNIQUE_POINTS);
    }

    let avg_flex = flex as f64 / n as f64;
    let avg_grid = grid as f64 / n as f64;
    let combined = avg_flex + avg_grid;

    let (tier, percentage) =
        if avg_flex >= 8.0 || avg_grid >= 5.0 || (avg_flex >= 5.0 && avg_grid >= 3.0) {
            (Tier::Distinction, f64::min(100.0, 75.0 + combined * 25.0 / 15.0))
        } else if avg_flex >= 5.0 || avg_grid >= 3.0 || (avg_flex >= 3.0 && avg_grid >= 2.0) {
            (Tier::Credit, 65.0 + (combined - 5.0) * 9.0 / 3.0)
        } else if avg_flex >= 2.0 || avg_grid >= 1.0 {
            (Tier::Pass, 50.0 + (combined - 2.0) * 14.0 / 3.0)
        } else {
            (Tier::Fail, f64::min(49.0, combined * 49.0 / 2.0))
        };
    assessment(tier, percentage, LAYOUT_TECHNIQUE_POINTS)
}

fn assessment(tier: Tier, percentage: f64, max_points: f64) -> TierAssessment {
    let percentage = percentage.clamp(0.0, 100.0);
    TierAssessment {
        tier,
        percentage,
        points: max_points * percentage / 100.0,
        max_points,
    }
}

/// Mean overall score of the pages that have one.
///
/// Pages without an overall score (no screenshots) are left out rather than counted as
/// zero. With nothing to average the result is [`Aggregate::NoData`].
pub fn aggregate<'a, I>(reports: I, layout_techniques: &TierAssessment) -> Aggregate
where
    I: IntoIterator<Item = &'a PageReport>,
{
    let scores: Vec<f64> = reports
        .into_iter()
        .filter_map(|r| r.scores.overall_score)
        .collect();
    if scores.is_empty() {
        return Aggregate::NoData {
            reason: "no page had a matched screenshot pair to score".to_string(),
        };
    }

    let score = scores.iter().sum::<f64>() / scores.len() as f64;
    let responsiveness = assess_responsiveness(score);
    Aggregate::Scored(AggregateScore {
        score,
        pages_scored: scores.len(),
        responsiveness,
        design_total: responsiveness.points + layout_techniques.points,
        design_total_max: RESPONSIVENESS_POINTS + LAYOUT_TECHNIQUE_POINTS,
    })
}
