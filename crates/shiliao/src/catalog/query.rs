use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::recommend::{Nature, Recipe, RecipeCategory};

pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Dishes at or under this many minutes count as quick.
pub const QUICK_COOKING_MINUTES: u32 = 30;

/// Listing filter accepted by the catalog endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeQuery {
    pub category: Option<RecipeCategory>,
    pub nature: Option<Nature>,
    pub keyword: Option<String>,
    pub is_active: Option<bool>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl RecipeQuery {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if let Some(active) = self.is_active {
            if recipe.is_active != active {
                return false;
            }
        }
        if let Some(category) = self.category {
            if recipe.category != category {
                return false;
            }
        }
        if let Some(nature) = self.nature {
            if recipe.nature != Some(nature) {
                return false;
            }
        }
        match self.keyword.as_deref().map(str::trim) {
            Some(keyword) if !keyword.is_empty() => keyword_matches(recipe, keyword),
            _ => true,
        }
    }

    pub fn page(&self) -> usize {
        self.page.filter(|page| *page > 0).unwrap_or(1)
    }

    pub fn page_size_or(&self, default_size: usize) -> usize {
        self.page_size
            .filter(|size| *size > 0)
            .unwrap_or(default_size)
    }

    /// Filter, order, and slice the catalog; returns the page and the filtered total.
    pub fn apply(&self, recipes: Vec<Recipe>, default_size: usize) -> (Vec<Recipe>, usize) {
        let mut matched: Vec<Recipe> = recipes
            .into_iter()
            .filter(|recipe| self.matches(recipe))
            .collect();
        matched.sort_by(catalog_order);

        let total = matched.len();
        let page_size = self.page_size_or(default_size);
        let skip = (self.page() - 1).saturating_mul(page_size);
        let page = matched.into_iter().skip(skip).take(page_size).collect();

        (page, total)
    }
}

/// Catalog ordering: `sortOrder` ascending, then `baseScore` and `createdAt` descending.
pub fn catalog_order(left: &Recipe, right: &Recipe) -> Ordering {
    left.sort_order
        .cmp(&right.sort_order)
        .then_with(|| right.base_score.cmp(&left.base_score))
        .then_with(|| right.created_at.cmp(&left.created_at))
}

fn keyword_matches(recipe: &Recipe, keyword: &str) -> bool {
    let needle = keyword.to_lowercase();
    let hit = |text: &str| text.to_lowercase().contains(&needle);

    hit(&recipe.name)
        || hit(&recipe.description)
        || recipe.ingredients.iter().any(|ingredient| hit(&ingredient.name))
        || recipe.tags.iter().any(|tag| hit(tag))
}

/// Pagination block echoed back alongside a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
}

/// Storefront category with the number of active recipes in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub key: &'static str,
    pub name: &'static str,
    pub count: usize,
}

pub fn category_counts(recipes: &[Recipe]) -> Vec<CategoryCount> {
    let active: Vec<&Recipe> = recipes.iter().filter(|recipe| recipe.is_active).collect();
    let count_where = |predicate: &dyn Fn(&Recipe) -> bool| {
        active.iter().filter(|recipe| predicate(recipe)).count()
    };

    vec![
        CategoryCount {
            key: "recommended",
            name: "为你推荐",
            count: active.len(),
        },
        CategoryCount {
            key: "warming",
            name: "温补",
            count: count_where(&|recipe| recipe.nature.is_some_and(Nature::is_warming)),
        },
        CategoryCount {
            key: "cooling",
            name: "清润",
            count: count_where(&|recipe| recipe.nature.is_some_and(Nature::is_cooling)),
        },
        CategoryCount {
            key: "quick",
            name: "快手菜",
            count: count_where(&|recipe| recipe.cooking_time <= QUICK_COOKING_MINUTES),
        },
    ]
}
