use super::profile::{PreferenceRecord, UserRecord};
use crate::recommend::{Recipe, RecipeId};

/// Storage abstraction for the recipe catalog.
pub trait RecipeRepository: Send + Sync {
    fn all(&self) -> Result<Vec<Recipe>, RepositoryError>;
    fn fetch(&self, id: &RecipeId) -> Result<Option<Recipe>, RepositoryError>;
    fn insert(&self, recipe: Recipe) -> Result<Recipe, RepositoryError>;
    fn update(&self, recipe: Recipe) -> Result<Recipe, RepositoryError>;
    fn remove(&self, id: &RecipeId) -> Result<(), RepositoryError>;
}

/// Session-keyed users and their preference records.
pub trait ProfileStore: Send + Sync {
    fn user(&self, session_id: &str) -> Result<Option<UserRecord>, RepositoryError>;
    fn upsert_user(&self, user: UserRecord) -> Result<UserRecord, RepositoryError>;
    fn preference(&self, session_id: &str) -> Result<Option<PreferenceRecord>, RepositoryError>;
    fn save_preference(
        &self,
        session_id: &str,
        preference: PreferenceRecord,
    ) -> Result<PreferenceRecord, RepositoryError>;
    /// Returns whether a record existed.
    fn clear_preference(&self, session_id: &str) -> Result<bool, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
