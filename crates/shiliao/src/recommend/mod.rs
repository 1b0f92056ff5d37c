//! Constitution-aware recipe scoring and ranking.
//!
//! The scorer is a pure function over a recipe and an optional profile; the
//! ranker maps it over a candidate set and sorts best match first. Neither
//! performs I/O or keeps state between calls.

pub mod domain;
pub mod ranker;
pub mod reason;
pub mod scorer;
pub mod tables;

#[cfg(test)]
mod tests;

pub use domain::{
    Constitution, CookingStep, CurrentCondition, Difficulty, Flavor, Ingredient, MealScenario,
    Nature, Preferences, Recipe, RecipeCategory, RecipeId, UserProfile,
};
pub use ranker::{rank_recipes, RecipeRanker, ScoredRecipe};
pub use reason::{
    constitution_name, constitution_name_en, recommendation_headline, MatchReason, ReasonLocale,
    ScoreBand,
};
pub use scorer::{score_recipe, MatchOutcome};
