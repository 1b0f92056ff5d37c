use serde::{Deserialize, Serialize};

use super::domain::{Recipe, UserProfile};
use super::reason::ReasonLocale;
use super::scorer::score_recipe;

/// Recipe annotated with its match score and rendered reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub match_score: i32,
    pub match_reason: String,
}

/// Applies the scorer to a candidate set and orders it best match first.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecipeRanker {
    locale: ReasonLocale,
}

impl RecipeRanker {
    pub fn new(locale: ReasonLocale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> ReasonLocale {
        self.locale
    }

    pub fn annotate(&self, recipe: Recipe, profile: Option<&UserProfile>) -> ScoredRecipe {
        let outcome = score_recipe(&recipe, profile);
        ScoredRecipe {
            recipe,
            match_score: outcome.score,
            match_reason: outcome.reason.text(self.locale).into_owned(),
        }
    }

    /// Equal scores keep their input order.
    pub fn rank<I>(&self, recipes: I, profile: Option<&UserProfile>) -> Vec<ScoredRecipe>
    where
        I: IntoIterator<Item = Recipe>,
    {
        let mut ranked: Vec<ScoredRecipe> = recipes
            .into_iter()
            .map(|recipe| self.annotate(recipe, profile))
            .collect();

        ranked.sort_by(|left, right| right.match_score.cmp(&left.match_score));
        ranked
    }
}

/// Rank with the default (Chinese) reason texts.
pub fn rank_recipes<I>(recipes: I, profile: Option<&UserProfile>) -> Vec<ScoredRecipe>
where
    I: IntoIterator<Item = Recipe>,
{
    RecipeRanker::default().rank(recipes, profile)
}
