use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{Constitution, Flavor, Preferences, Recipe, UserProfile};
use super::reason::MatchReason;
use super::tables::{
    self, SituationalRule, AVOID_CONSTITUTION_PENALTY, COOKING_TIME_FIT_BONUS,
    COOKING_TIME_OVERRUN_FACTOR, COOKING_TIME_OVERRUN_PENALTY, DEFAULT_BASE_SCORE,
    DEFAULT_DIFFICULTY_LEVEL, DIFFICULTY_FIT_BONUS, DIFFICULTY_OVERREACH_PENALTY,
    EXCLUSION_PENALTY, FLAVOR_DISLIKE_PENALTY, FLAVOR_DISLIKE_THRESHOLD, FLAVOR_LIKE_BONUS,
    FLAVOR_LIKE_THRESHOLD, MAX_MATCH_SCORE, MIN_MATCH_SCORE, SUITABLE_CONSTITUTION_BONUS,
};

/// Score and explanation produced for one recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub score: i32,
    pub reason: MatchReason,
}

/// Running total plus the ordered list of reasons fired so far.
struct Tally {
    score: i32,
    reasons: Vec<MatchReason>,
}

impl Tally {
    fn adjust(&mut self, delta: i32, reason: Option<MatchReason>) {
        self.score += delta;
        if let Some(reason) = reason {
            self.reasons.push(reason);
        }
    }
}

/// Score a recipe against a profile.
///
/// Rules run in a fixed order; the first reason appended by any rule is the
/// one reported, falling back to a score band when none fired.
pub fn score_recipe(recipe: &Recipe, profile: Option<&UserProfile>) -> MatchOutcome {
    let profile = match profile {
        Some(profile) if !profile.is_empty() => profile,
        _ => {
            return MatchOutcome {
                score: base_score(recipe),
                reason: MatchReason::EVERYDAY,
            }
        }
    };

    let mut tally = Tally {
        score: base_score(recipe),
        reasons: Vec::new(),
    };

    if let Some(constitution) = profile.constitution {
        apply_constitution(&mut tally, recipe, constitution);
    }

    if let Some(preferences) = &profile.preferences {
        apply_preferences(&mut tally, recipe, preferences);
    }

    let score = tally.score.clamp(MIN_MATCH_SCORE, MAX_MATCH_SCORE);
    let reason = tally
        .reasons
        .first()
        .copied()
        .unwrap_or_else(|| MatchReason::fallback(score, profile.constitution));

    tracing::trace!(recipe = %recipe.name, raw = tally.score, score, "scored recipe");

    MatchOutcome { score, reason }
}

/// A zero base score is treated as unset.
fn base_score(recipe: &Recipe) -> i32 {
    match recipe.base_score {
        0 => DEFAULT_BASE_SCORE,
        score => score,
    }
}

fn apply_constitution(tally: &mut Tally, recipe: &Recipe, constitution: Constitution) {
    // A constitution listed as both suitable and avoided gets both adjustments.
    if recipe.suitable_constitutions.contains(&constitution) {
        tally.adjust(
            SUITABLE_CONSTITUTION_BONUS,
            Some(MatchReason::SuitsConstitution),
        );
    }
    if recipe.avoid_constitutions.contains(&constitution) {
        tally.adjust(
            AVOID_CONSTITUTION_PENALTY,
            Some(MatchReason::UnsuitedToConstitution),
        );
    }

    if let Some(row) = recipe
        .nature
        .and_then(|nature| tables::nature_affinity(constitution, nature))
    {
        tally.adjust(row.delta, row.reason);
    }
}

fn apply_preferences(tally: &mut Tally, recipe: &Recipe, preferences: &Preferences) {
    tally.adjust(flavor_delta(&recipe.flavors, &preferences.flavors), None);

    if !preferences.exclusions.is_empty() && contains_excluded(recipe, &preferences.exclusions) {
        tally.adjust(
            EXCLUSION_PENALTY,
            Some(MatchReason::ContainsExcludedIngredient),
        );
    }

    if !preferences.current_conditions.is_empty() {
        let (delta, reason) = situational_delta(
            recipe,
            tables::CONDITION_RULES,
            &preferences.current_conditions,
        );
        tally.adjust(delta, reason);
    }

    if let Some(max_minutes) = preferences.max_cooking_time.filter(|minutes| *minutes > 0) {
        tally.adjust(cooking_time_delta(recipe.cooking_time, max_minutes), None);
    }

    if let Some(ceiling) = preferences.cooking_difficulty.filter(|level| *level > 0) {
        tally.adjust(difficulty_delta(recipe, ceiling), None);
    }

    if !preferences.meal_scenarios.is_empty() {
        let (delta, reason) =
            situational_delta(recipe, tables::SCENARIO_RULES, &preferences.meal_scenarios);
        tally.adjust(delta, reason);
    }
}

fn flavor_delta(recipe_flavors: &[String], preferred: &BTreeMap<Flavor, f64>) -> i32 {
    recipe_flavors
        .iter()
        .filter_map(|tag| tables::flavor_key(tag))
        .filter_map(|flavor| preferred.get(&flavor))
        .map(|level| {
            if *level >= FLAVOR_LIKE_THRESHOLD {
                FLAVOR_LIKE_BONUS
            } else if *level <= FLAVOR_DISLIKE_THRESHOLD {
                FLAVOR_DISLIKE_PENALTY
            } else {
                0
            }
        })
        .sum()
}

/// Case-sensitive substring match of exclusion keywords against ingredient names.
fn contains_excluded(recipe: &Recipe, exclusions: &[String]) -> bool {
    exclusions.iter().any(|exclusion| {
        let keywords = tables::exclusion_keywords(exclusion);
        recipe.ingredients.iter().any(|ingredient| {
            !ingredient.name.is_empty()
                && keywords
                    .iter()
                    .any(|keyword| ingredient.name.contains(keyword))
        })
    })
}

/// Sum a family of situational rules; a later tag's reason replaces an earlier one.
fn situational_delta<T: PartialEq + Copy + 'static>(
    recipe: &Recipe,
    rules: &'static [SituationalRule<T>],
    tags: &[T],
) -> (i32, Option<MatchReason>) {
    let mut delta = 0;
    let mut reason = None;

    for tag in tags {
        let Some(rule) = tables::situational_rule(rules, *tag) else {
            continue;
        };
        for chain in rule.chains {
            if let Some(arm) = chain.iter().find(|arm| arm.test.matches(recipe)) {
                delta += arm.delta;
                if arm.reason.is_some() {
                    reason = arm.reason;
                }
            }
        }
    }

    (delta, reason)
}

fn cooking_time_delta(cooking_time: u32, max_minutes: u32) -> i32 {
    if cooking_time <= max_minutes {
        COOKING_TIME_FIT_BONUS
    } else if f64::from(cooking_time) > f64::from(max_minutes) * COOKING_TIME_OVERRUN_FACTOR {
        COOKING_TIME_OVERRUN_PENALTY
    } else {
        0
    }
}

fn difficulty_delta(recipe: &Recipe, ceiling: u8) -> i32 {
    let level = recipe
        .difficulty
        .map(|difficulty| difficulty.level())
        .unwrap_or(DEFAULT_DIFFICULTY_LEVEL);

    if level <= ceiling {
        DIFFICULTY_FIT_BONUS
    } else if u16::from(level) > u16::from(ceiling) + 1 {
        DIFFICULTY_OVERREACH_PENALTY
    } else {
        0
    }
}
