use metrics_exporter_prometheus::PrometheusHandle;
use shiliao::catalog::{PreferenceRecord, ProfileStore, RecipeRepository, RepositoryError, UserRecord};
use shiliao::recommend::{Recipe, RecipeId};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

const SEED_CATALOG: &str = include_str!("../data/recipes.json");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Recipes bundled with the binary for local runs and the `rank` command.
pub(crate) fn seed_recipes() -> Result<Vec<Recipe>, serde_json::Error> {
    serde_json::from_str(SEED_CATALOG)
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRecipeRepository {
    records: Arc<Mutex<BTreeMap<RecipeId, Recipe>>>,
}

impl RecipeRepository for InMemoryRecipeRepository {
    fn all(&self) -> Result<Vec<Recipe>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn fetch(&self, id: &RecipeId) -> Result<Option<Recipe>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn insert(&self, recipe: Recipe) -> Result<Recipe, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&recipe.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(recipe.id.clone(), recipe.clone());
        Ok(recipe)
    }

    fn update(&self, recipe: Recipe) -> Result<Recipe, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get_mut(&recipe.id) {
            Some(slot) => {
                *slot = recipe.clone();
                Ok(recipe)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn remove(&self, id: &RecipeId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileStore {
    users: Arc<Mutex<HashMap<String, UserRecord>>>,
    preferences: Arc<Mutex<HashMap<String, PreferenceRecord>>>,
}

impl ProfileStore for InMemoryProfileStore {
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
