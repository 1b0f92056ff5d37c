use crate::recommend::domain::{
    Constitution, Difficulty, Ingredient, Nature, Preferences, Recipe, RecipeCategory, RecipeId,
    UserProfile,
};

pub(super) fn ingredient(name: &str) -> Ingredient {
    Ingredient {
        name: name.to_string(),
        amount: "适量".to_string(),
        icon: String::new(),
    }
}

/// The spare-rib soup used throughout the scoring scenarios.
pub(super) fn rib_soup() -> Recipe {
    Recipe {
        id: RecipeId("rib-soup".to_string()),
        name: "山药排骨汤".to_string(),
        nature: Some(Nature::Warm),
        suitable_constitutions: vec![Constitution::YangDeficiency],
        ingredients: vec![ingredient("排骨")],
        cooking_time: 60,
        difficulty: Some(Difficulty::Easy),
        base_score: 95,
        category: RecipeCategory::Warming,
        ..Recipe::default()
    }
}

/// A recipe no constitution or situational rule has an opinion about.
pub(super) fn plain_recipe(name: &str, base_score: i32) -> Recipe {
    Recipe {
        id: RecipeId(name.to_string()),
        name: name.to_string(),
        nature: None,
        ingredients: vec![ingredient("白菜")],
        cooking_time: 20,
        difficulty: Some(Difficulty::Easy),
        base_score,
        ..Recipe::default()
    }
}

pub(super) fn constitution_only(constitution: Constitution) -> UserProfile {
    UserProfile {
        constitution: Some(constitution),
        preferences: Some(Preferences::default()),
    }
}

pub(super) fn preferences_only(preferences: Preferences) -> UserProfile {
    UserProfile {
        constitution: None,
        preferences: Some(preferences),
    }
}
