//! Scoring and ranking of recipes against ingredients on hand.
//!
//! Takes the full recipe corpus and applies the match heuristic
//! (ingredient overlap, coverage, time fit, missing ingredients)
//! to produce a ranked, capped list of suggestions.

use recipefinder_features::{ingredients_match, normalize_ingredient};
use recipefinder_model::{Recipe, ScoredRecipe};

/// Configuration for the matcher.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Added for every (user ingredient, recipe ingredient) match
    pub match_weight: f64,
    /// Multiplied by the matched share of user ingredients (0.0 - 1.0)
    pub coverage_weight: f64,
    /// Added when the recipe fits the time budget
    pub time_fit_bonus: f64,
    /// Spare minutes are divided by this and added as a bonus
    pub time_slack_divisor: f64,
    /// Subtracted when the recipe exceeds the time budget
    pub over_time_penalty: f64,
    /// Subtracted per recipe ingredient not covered by the match
    pub missing_ingredient_penalty: f64,
    /// Maximum number of results
    pub top_n: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            match_weight: 2.0,
            coverage_weight: 10.0,
            time_fit_bonus: 5.0,
            time_slack_divisor: 10.0,
            over_time_penalty: 3.0,
            missing_ingredient_penalty: 0.5,
            top_n: 5,
        }
    }
}

impl MatchConfig {
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }
}

/// Score every recipe, drop noise, and return the best `config.top_n`.
///
/// `user_ingredients` must already be normalized. A recipe is kept when
/// it shares at least one ingredient or fits the time budget. Ties keep
/// corpus order.
pub fn score_recipes(
    corpus: &[Recipe],
    user_ingredients: &[String],
    max_time: u32,
    config: &MatchConfig,
) -> Vec<ScoredRecipe> {
    let mut candidates: Vec<Candidate<'_>> = corpus
        .iter()
        .map(|recipe| compute_match(recipe, user_ingredients, max_time, config))
        .filter(|candidate| !candidate.matched.is_empty() || candidate.recipe.fits_within(max_time))
        .collect();

    // Stable, so equal scores stay in corpus order
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(config.top_n);

    candidates.into_iter().map(Candidate::into_scored).collect()
}

/// Intermediate result before output shaping.
struct Candidate<'a> {
    recipe: &'a Recipe,
    score: f64,
    matched: Vec<String>,
    coverage: f64,
    additional: usize,
}

impl Candidate<'_> {
    fn into_scored(self) -> ScoredRecipe {
        ScoredRecipe {
            recipe: self.recipe.clone(),
            score: round_to_cents(self.score),
            matched_ingredients: self.matched,
            match_percentage: (self.coverage * 100.0).round().clamp(0.0, 100.0) as u8,
            additional_ingredients: self.additional,
        }
    }
}

/// Compute score and match metadata for a single recipe.
fn compute_match<'a>(
    recipe: &'a Recipe,
    user_ingredients: &[String],
    max_time: u32,
    config: &MatchConfig,
) -> Candidate<'a> {
    let recipe_ingredients: Vec<String> = recipe
        .ingredients
        .iter()
        .map(|ingredient| normalize_ingredient(ingredient))
        .collect();

    let mut score = 0.0_f64;
    let mut matched: Vec<String> = Vec::new();

    for user in user_ingredients {
        for candidate in &recipe_ingredients {
            if ingredients_match(user, candidate) {
                score += config.match_weight;
                if !matched.contains(user) {
                    matched.push(user.clone());
                }
            }
        }
    }

    let coverage = if user_ingredients.is_empty() {
        0.0
    } else {
        matched.len() as f64 / user_ingredients.len() as f64
    };
    score += coverage * config.coverage_weight;

    if recipe.fits_within(max_time) {
        let slack = f64::from(max_time - recipe.prep_time);
        score += config.time_fit_bonus + slack / config.time_slack_divisor;
    } else {
        score -= config.over_time_penalty;
    }

    let additional = recipe.ingredients.len().saturating_sub(matched.len());
    score -= additional as f64 * config.missing_ingredient_penalty;

    Candidate {
        recipe,
        score,
        matched,
        coverage,
        additional,
    }
}

/// Halves round away from zero, so -2.125 becomes -2.13.
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
