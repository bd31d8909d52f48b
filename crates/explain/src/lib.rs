//! Explanation generation for recipe matches.
//!
//! Converts match metadata into human-readable explanations suitable
//! for display next to each generated suggestion.

use recipefinder_model::MatchedRecipe;
use serde::{Deserialize, Serialize};

/// A structured explanation for one aspect of a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    /// Short summary (1 line)
    pub summary: String,

    /// Detailed explanation (1-2 sentences)
    pub detail: String,

    /// Evidence items supporting this explanation
    pub evidence: Vec<EvidenceItem>,
}

/// A piece of evidence supporting an explanation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceItem {
    /// Type of evidence
    pub kind: String,

    /// The specific value or match
    pub value: String,

    /// Optional context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Generate explanations for a generated suggestion.
pub fn explain_match(hit: &MatchedRecipe, available_time: u32) -> Vec<Explanation> {
    let mut explanations = vec![explain_ingredients(hit)];

    if hit.additional_ingredients > 0 {
        explanations.push(explain_missing(hit.additional_ingredients));
    }

    explanations.push(explain_time(hit.recipe.prep_time, available_time));
    explanations
}

fn explain_ingredients(hit: &MatchedRecipe) -> Explanation {
    if !hit.has_ingredient_match() {
        return Explanation {
            summary: "No matching ingredients".to_string(),
            detail: format!(
                "'{}' does not use any of your ingredients. \
                 It is suggested because it fits your time.",
                hit.recipe.title
            ),
            evidence: vec![],
        };
    }

    Explanation {
        summary: format!("Matches your ingredients ({}%)", hit.match_percentage),
        detail: format!(
            "'{}' uses {} of your ingredients: {}.",
            hit.recipe.title,
            hit.matched_ingredients.len(),
            hit.matched_ingredients.join(", ")
        ),
        evidence: hit
            .matched_ingredients
            .iter()
            .map(|ingredient| EvidenceItem {
                kind: "matched_ingredient".to_string(),
                value: ingredient.clone(),
                context: None,
            })
            .collect(),
    }
}

fn explain_missing(count: usize) -> Explanation {
    Explanation {
        summary: format!("Need {} more ingredient(s)", count),
        detail: format!(
            "{} ingredient(s) in this recipe are not covered by what you have.",
            count
        ),
        evidence: vec![EvidenceItem {
            kind: "additional_ingredients".to_string(),
            value: count.to_string(),
            context: None,
        }],
    }
}

fn explain_time(prep_time: u32, available_time: u32) -> Explanation {
    if prep_time <= available_time {
        let spare = available_time - prep_time;
        Explanation {
            summary: format!("Ready in {} mins", prep_time),
            detail: format!(
                "Fits your {} minute budget with {} minute(s) to spare.",
                available_time, spare
            ),
            evidence: vec![EvidenceItem {
                kind: "prep_time".to_string(),
                value: prep_time.to_string(),
                context: Some(format!("{} min spare", spare)),
            }],
        }
    } else {
        let over = prep_time - available_time;
        Explanation {
            summary: format!("Takes {} mins", prep_time),
            detail: format!(
                "Runs {} minute(s) over your {} minute budget.",
                over, available_time
            ),
            evidence: vec![EvidenceItem {
                kind: "prep_time".to_string(),
                value: prep_time.to_string(),
                context: Some(format!("{} min over", over)),
            }],
        }
    }
}

/// Generate a one-line summary for a generated suggestion.
pub fn summarize_match(hit: &MatchedRecipe, available_time: u32) -> String {
    let level = if !hit.has_ingredient_match() {
        "TIME FIT ONLY"
    } else if hit.match_percentage >= 75 {
        "GREAT MATCH"
    } else if hit.match_percentage >= 40 {
        "GOOD MATCH"
    } else {
        "PARTIAL MATCH"
    };

    let time = if hit.recipe.fits_within(available_time) {
        format!("{} mins, fits your time", hit.recipe.prep_time)
    } else {
        format!("{} mins, over your time", hit.recipe.prep_time)
    };

    format!("{}: {}% of your ingredients, {}", level, hit.match_percentage, time)
}
