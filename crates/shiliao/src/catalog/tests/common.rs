use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::catalog::profile::{DiagnosisMethod, PreferenceRecord, UserRecord};
use crate::catalog::repository::{ProfileStore, RecipeRepository, RepositoryError};
use crate::catalog::{recipe_router, RecipeService};
use crate::config::RecommendConfig;
use crate::recommend::{
    Constitution, Difficulty, Ingredient, Nature, Recipe, RecipeCategory, RecipeId,
};

pub(super) const SESSION: &str = "session-yang";

fn ingredient(name: &str) -> Ingredient {
    Ingredient {
        name: name.to_string(),
        amount: "适量".to_string(),
        icon: String::new(),
    }
}

pub(super) fn stew() -> Recipe {
    Recipe {
        id: RecipeId("stew".to_string()),
        name: "当归生姜羊肉汤".to_string(),
        nature: Some(Nature::Warm),
        flavors: vec!["甘".to_string(), "辛".to_string()],
        suitable_constitutions: vec![Constitution::YangDeficiency],
        category: RecipeCategory::Warming,
        tags: vec!["滋补".to_string()],
        ingredients: vec![ingredient("羊肉"), ingredient("生姜")],
        cooking_time: 90,
        difficulty: Some(Difficulty::Medium),
        base_score: 85,
        ..Recipe::default()
    }
}

pub(super) fn pear() -> Recipe {
    Recipe {
        id: RecipeId("pear".to_string()),
        name: "冰糖雪梨".to_string(),
        nature: Some(Nature::Cool),
        flavors: vec!["甘".to_string()],
        suitable_constitutions: vec![Constitution::YinDeficiency],
        avoid_constitutions: vec![Constitution::YangDeficiency],
        category: RecipeCategory::Cooling,
        ingredients: vec![ingredient("雪梨"), ingredient("冰糖")],
        cooking_time: 30,
        difficulty: Some(Difficulty::Easy),
        base_score: 80,
        ..Recipe::default()
    }
}

pub(super) fn porridge() -> Recipe {
    Recipe {
        id: RecipeId("porridge".to_string()),
        name: "小米粥".to_string(),
        nature: Some(Nature::Neutral),
        flavors: vec!["甘".to_string()],
        category: RecipeCategory::Neutral,
        tags: vec!["家常菜".to_string()],
        ingredients: vec![ingredient("小米")],
        cooking_time: 25,
        difficulty: Some(Difficulty::Easy),
        base_score: 75,
        ..Recipe::default()
    }
}

pub(super) fn catalog() -> Vec<Recipe> {
    vec![stew(), pear(), porridge()]
}

#[derive(Default, Clone)]
pub(super) struct MemoryRecipes {
    pub(super) records: Arc<Mutex<Vec<Recipe>>>,
}

impl MemoryRecipes {
    pub(super) fn seeded(recipes: Vec<Recipe>) -> Self {
        Self {
            records: Arc::new(Mutex::new(recipes)),
        }
    }
}

impl RecipeRepository for MemoryRecipes {
    fn all(&self) -> Result<Vec<Recipe>, RepositoryError> {
        Ok(self.records.lock().expect("repository mutex poisoned").clone())
    }

    fn fetch(&self, id: &RecipeId) -> Result<Option<Recipe>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|recipe| &recipe.id == id).cloned())
    }

    fn insert(&self, recipe: Recipe) -> Result<Recipe, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == recipe.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(recipe.clone());
        Ok(recipe)
    }

    fn update(&self, recipe: Recipe) -> Result<Recipe, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == recipe.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = recipe.clone();
        Ok(recipe)
    }

    fn remove(&self, id: &RecipeId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let before = guard.len();
        guard.retain(|recipe| &recipe.id != id);
        if guard.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryProfiles {
    users: Arc<Mutex<HashMap<String, UserRecord>>>,
    preferences: Arc<Mutex<HashMap<String, PreferenceRecord>>>,
}

impl MemoryProfiles {
    pub(super) fn with_user(self, session: &str, constitution: Option<Constitution>) -> Self {
        let mut user = UserRecord::anonymous(session);
        if let Some(constitution) = constitution {
            user.assess(constitution, DiagnosisMethod::Manual);
        }
        self.users
            .lock()
            .expect("profile mutex poisoned")
            .insert(session.to_string(), user);
        self
    }

    pub(super) fn stored_preference(&self, session: &str) -> Option<PreferenceRecord> {
        self.preferences
            .lock()
            .expect("profile mutex poisoned")
            .get(session)
            .cloned()
    }
}

impl ProfileStore for MemoryProfiles {
    fn user(&self, session_id: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let guard = self.users.lock().expect("profile mutex poisoned");
        Ok(guard.get(session_id).cloned())
    }

    fn upsert_user(&self, user: UserRecord) -> Result<UserRecord, RepositoryError> {
        let mut guard = self.users.lock().expect("profile mutex poisoned");
        guard.insert(user.session_id.clone(), user.clone());
        Ok(user)
    }

    fn preference(&self, session_id: &str) -> Result<Option<PreferenceRecord>, RepositoryError> {
        let guard = self.preferences.lock().expect("profile mutex poisoned");
        Ok(guard.get(session_id).cloned())
    }

    fn save_preference(
        &self,
        session_id: &str,
        preference: PreferenceRecord,
    ) -> Result<PreferenceRecord, RepositoryError> {
        let mut guard = self.preferences.lock().expect("profile mutex poisoned");
        guard.insert(session_id.to_string(), preference.clone());
        Ok(preference)
    }

    fn clear_preference(&self, session_id: &str) -> Result<bool, RepositoryError> {
        let mut guard = self.preferences.lock().expect("profile mutex poisoned");
        Ok(guard.remove(session_id).is_some())
    }
}

pub(super) struct UnavailableRecipes;

impl RecipeRepository for UnavailableRecipes {
    fn all(&self) -> Result<Vec<Recipe>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &RecipeId) -> Result<Option<Recipe>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert(&self, _recipe: Recipe) -> Result<Recipe, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _recipe: Recipe) -> Result<Recipe, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove(&self, _id: &RecipeId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) type MemoryService = RecipeService<MemoryRecipes, MemoryProfiles>;

/// Catalog of three recipes plus one yang-deficient user under [`SESSION`].
pub(super) fn build_service() -> (MemoryService, Arc<MemoryRecipes>, Arc<MemoryProfiles>) {
    let recipes = Arc::new(MemoryRecipes::seeded(catalog()));
    let profiles = Arc::new(
        MemoryProfiles::default().with_user(SESSION, Some(Constitution::YangDeficiency)),
    );
    let service = RecipeService::new(recipes.clone(), profiles.clone(), RecommendConfig::default());
    (service, recipes, profiles)
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    recipe_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn names(list: &Value) -> Vec<String> {
    list.as_array()
        .expect("list array")
        .iter()
        .map(|entry| entry["name"].as_str().expect("name").to_string())
        .collect()
}
