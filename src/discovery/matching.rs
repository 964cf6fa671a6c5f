use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{MatchKind, PageMatch, ScreenshotPair};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct MatchingOptions {
    /// A fuzzy candidate is accepted only when its similarity is strictly above this.
    pub fuzzy_threshold: f64,
}

impl Default for MatchingOptions {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.5,
        }
    }
}

/// Positional character overlap of two names, case-insensitive.
///
/// Counts indices where both strings hold the same character and divides by the longer
/// length. This is not an edit distance: an insertion early in one name shifts every
/// later character out of alignment. Two empty names score 0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 0.0;
    }
    let same = a.iter().zip(b.iter()).filter(|(x, y)| x == y).count();
    same as f64 / longest as f64
}

/// Pair each page stem with a screenshot pair.
///
/// Exact base-name matches are resolved first for every page. Pages still unmatched
/// then take the most similar pair among those no exact match claimed, provided the
/// similarity clears the threshold. Ties keep the pair that sorts first.
pub fn match_pages(
    stems: &[&str],
    pairs: &[ScreenshotPair],
    options: &MatchingOptions,
) -> Vec<Option<PageMatch>> {
    let mut matches: Vec<Option<PageMatch>> = stems
        .iter()
        .map(|stem| {
            pairs.iter().find(|p| p.base_name == *stem).map(|pair| PageMatch {
                pair: pair.clone(),
                kind: MatchKind::Exact,
            })
        })
        .collect();

    let claimed: HashSet<&str> = matches
        .iter()
        .flatten()
        .map(|m| m.pair.base_name.as_str())
        .collect();
    let candidates: Vec<&ScreenshotPair> = pairs
        .iter()
        .filter(|p| !claimed.contains(p.base_name.as_str()))
        .collect();

    for (stem, slot) in stems.iter().zip(matches.iter_mut()) {
        if slot.is_some() {
            continue;
        }
        *slot = best_fuzzy_match(stem, &candidates, options.fuzzy_threshold);
        match slot {
            Some(m) => ::log::debug!(
                "Page '{}' fuzzy-matched screenshots '{}' ({:?})",
                stem,
                m.pair.base_name,
                m.kind
            ),
            None => ::log::debug!("Page '{}' has no screenshot pair", stem),
        }
    }

    matches
}

fn best_fuzzy_match(
    stem: &str,
    candidates: &[&ScreenshotPair],
    threshold: f64,
) -> Option<PageMatch> {
    let mut best: Option<(&ScreenshotPair, f64)> = None;
    for pair in candidates {
        let score = similarity(stem, &pair.base_name);
        if score > best.map(|(_, s)| s).unwrap_or(0.0) {
            best = Some((pair, score));
        }
    }
    best.filter(|(_, score)| *score > threshold)
        .map(|(pair, similarity)| PageMatch {
            pair: pair.clone(),
            kind: MatchKind::Fuzzy { similarity },
        })
}
