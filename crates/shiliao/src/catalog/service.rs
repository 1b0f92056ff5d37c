use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use super::constitution::{constitution_profile, constitution_profiles, ConstitutionProfile};
use super::profile::{
    ConstitutionAssessment, DiagnosisMethod, PreferenceError, PreferenceRecord, PreferenceUpdate,
    UserRecord,
};
use super::query::{category_counts, CategoryCount, Pagination, RecipeQuery};
use super::repository::{ProfileStore, RecipeRepository, RepositoryError};
use crate::config::RecommendConfig;
use crate::recommend::{
    recommendation_headline, Constitution, Recipe, RecipeId, RecipeRanker, ScoredRecipe,
    UserProfile,
};

/// One page of ranked catalog entries.
#[derive(Debug, Clone, Serialize)]
pub struct RecipePage {
    pub list: Vec<ScoredRecipe>,
    pub pagination: Pagination,
}

/// Top matches plus the headline explaining the selection.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub list: Vec<ScoredRecipe>,
    pub reason: String,
}

/// Stored assessment for a session alongside its reference description.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConstitution {
    pub constitution: Option<ConstitutionAssessment>,
    pub constitution_info: Option<&'static ConstitutionProfile>,
}

/// Service composing the catalog repository, the profile store, and the ranker.
pub struct RecipeService<R, P> {
    recipes: Arc<R>,
    profiles: Arc<P>,
    ranker: RecipeRanker,
    config: RecommendConfig,
}

static RECIPE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_recipe_id() -> RecipeId {
    let id = RECIPE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RecipeId(format!("recipe-{id:06}"))
}

impl<R, P> RecipeService<R, P>
where
    R: RecipeRepository + 'static,
    P: ProfileStore + 'static,
{
    pub fn new(recipes: Arc<R>, profiles: Arc<P>, config: RecommendConfig) -> Self {
        Self {
            recipes,
            profiles,
            ranker: RecipeRanker::new(config.locale),
            config,
        }
    }

    /// Profile for a session; `None` when there is no session or no such user.
    pub fn profile_for(
        &self,
        session: Option<&str>,
    ) -> Result<Option<UserProfile>, RecipeServiceError> {
        let Some(session) = session else {
            return Ok(None);
        };
        let Some(user) = self.profiles.user(session)? else {
            tracing::debug!(session, "no user for session, ranking without profile");
            return Ok(None);
        };
        let preference = self.profiles.preference(session)?;
        Ok(Some(UserProfile::assemble(Some(&user), preference.as_ref())))
    }

    /// Filter and paginate the catalog, then rank the page for the session.
    pub fn list(
        &self,
        query: &RecipeQuery,
        session: Option<&str>,
    ) -> Result<RecipePage, RecipeServiceError> {
        let (page, total) = query.apply(self.recipes.all()?, self.config.page_size);
        let profile = self.profile_for(session)?;
        let list = self.ranker.rank(page, profile.as_ref());

        Ok(RecipePage {
            list,
            pagination: Pagination {
                page: query.page(),
                page_size: query.page_size_or(self.config.page_size),
                total,
            },
        })
    }

    pub fn get(
        &self,
        id: &RecipeId,
        session: Option<&str>,
    ) -> Result<ScoredRecipe, RecipeServiceError> {
        let recipe = self
            .recipes
            .fetch(id)?
            .ok_or_else(|| RecipeServiceError::RecipeNotFound(id.0.clone()))?;
        let profile = self.profile_for(session)?;
        Ok(self.ranker.annotate(recipe, profile.as_ref()))
    }

    /// Rank every active recipe and keep the best `limit` (configured default when absent).
    pub fn recommended(
        &self,
        limit: Option<usize>,
        session: Option<&str>,
    ) -> Result<Recommendation, RecipeServiceError> {
        let limit = limit.unwrap_or(self.config.recommended_limit);
        let active = self
            .recipes
            .all()?
            .into_iter()
            .filter(|recipe| recipe.is_active);
        let profile = self.profile_for(session)?;

        let mut list = self.ranker.rank(active, profile.as_ref());
        list.truncate(limit);

        let constitution = profile.as_ref().and_then(|profile| profile.constitution);
        Ok(Recommendation {
            list,
            reason: recommendation_headline(constitution, self.ranker.locale()),
        })
    }

    pub fn categories(&self) -> Result<Vec<CategoryCount>, RecipeServiceError> {
        Ok(category_counts(&self.recipes.all()?))
    }

    pub fn create(&self, mut recipe: Recipe) -> Result<Recipe, RecipeServiceError> {
        recipe.name = recipe.name.trim().to_string();
        if recipe.name.is_empty() {
            return Err(RecipeServiceError::InvalidRecipe(
                "name is required".to_string(),
            ));
        }
        self.ensure_unique_name(&recipe.name, None)?;

        if recipe.id.0.trim().is_empty() {
            recipe.id = self.unused_id()?;
        }
        let now = Utc::now();
        recipe.created_at.get_or_insert(now);
        recipe.updated_at = Some(now);

        let stored = self.recipes.insert(recipe)?;
        tracing::info!(id = %stored.id.0, name = %stored.name, "recipe created");
        Ok(stored)
    }

    /// Apply a partial JSON update; keys absent from the patch keep their value.
    pub fn update(&self, id: &RecipeId, patch: Value) -> Result<Recipe, RecipeServiceError> {
        let Value::Object(fields) = patch else {
            return Err(RecipeServiceError::InvalidRecipe(
                "update body must be a JSON object".to_string(),
            ));
        };

        let existing = self
            .recipes
            .fetch(id)?
            .ok_or_else(|| RecipeServiceError::RecipeNotFound(id.0.clone()))?;
        let created_at = existing.created_at;

        let mut merged = serde_json::to_value(existing)
            .map_err(|err| RecipeServiceError::InvalidRecipe(err.to_string()))?;
        if let Value::Object(target) = &mut merged {
            for (key, value) in fields {
                if key != "id" {
                    target.insert(key, value);
                }
            }
        }

        let mut recipe: Recipe = serde_json::from_value(merged)
            .map_err(|err| RecipeServiceError::InvalidRecipe(err.to_string()))?;
        recipe.id = id.clone();
        recipe.name = recipe.name.trim().to_string();
        if recipe.name.is_empty() {
            return Err(RecipeServiceError::InvalidRecipe(
                "name is required".to_string(),
            ));
        }
        self.ensure_unique_name(&recipe.name, Some(id))?;
        recipe.created_at = created_at;
        recipe.updated_at = Some(Utc::now());

        let stored = self.recipes.update(recipe)?;
        tracing::info!(id = %stored.id.0, "recipe updated");
        Ok(stored)
    }

    pub fn remove(&self, id: &RecipeId) -> Result<(), RecipeServiceError> {
        match self.recipes.remove(id) {
            Ok(()) => {
                tracing::info!(id = %id.0, "recipe removed");
                Ok(())
            }
            Err(RepositoryError::NotFound) => Err(RecipeServiceError::RecipeNotFound(id.0.clone())),
            Err(other) => Err(other.into()),
        }
    }

    /// Rank caller-supplied recipes without touching storage.
    pub fn rank(&self, recipes: Vec<Recipe>, profile: Option<&UserProfile>) -> Vec<ScoredRecipe> {
        self.ranker.rank(recipes, profile)
    }

    /// Stored preferences, or the defaults when the user never saved any.
    pub fn preference(&self, session: Option<&str>) -> Result<PreferenceRecord, RecipeServiceError> {
        let session = self.known_session(session)?;
        Ok(self.profiles.preference(session)?.unwrap_or_default())
    }

    pub fn update_preference(
        &self,
        session: Option<&str>,
        update: PreferenceUpdate,
    ) -> Result<PreferenceRecord, RecipeServiceError> {
        let session = self.known_session(session)?;
        let mut record = self.profiles.preference(session)?.unwrap_or_default();
        if let Err(err) = record.merge(update) {
            tracing::warn!(session, error = %err, "rejected preference update");
            return Err(err.into());
        }
        let saved = self.profiles.save_preference(session, record)?;
        tracing::debug!(session, "preferences saved");
        Ok(saved)
    }

    pub fn reset_preference(
        &self,
        session: Option<&str>,
    ) -> Result<PreferenceRecord, RecipeServiceError> {
        let session = self.known_session(session)?;
        let existed = self.profiles.clear_preference(session)?;
        tracing::debug!(session, existed, "preferences reset");
        Ok(PreferenceRecord::default())
    }

    /// Record a constitution, creating an anonymous user on first contact.
    pub fn set_constitution(
        &self,
        session: Option<&str>,
        constitution: Constitution,
        method: DiagnosisMethod,
    ) -> Result<UserRecord, RecipeServiceError> {
        let session = session
            .filter(|session| !session.trim().is_empty())
            .ok_or(RecipeServiceError::MissingSession)?;
        let mut user = self
            .profiles
            .user(session)?
            .unwrap_or_else(|| UserRecord::anonymous(session));
        user.assess(constitution, method);

        let stored = self.profiles.upsert_user(user)?;
        tracing::info!(session, constitution = constitution.tag(), "constitution recorded");
        Ok(stored)
    }

    pub fn constitutions(&self) -> &'static [ConstitutionProfile] {
        constitution_profiles()
    }

    pub fn constitution_info(
        &self,
        tag: &str,
    ) -> Result<&'static ConstitutionProfile, RecipeServiceError> {
        Constitution::from_tag(tag)
            .and_then(constitution_profile)
            .ok_or_else(|| RecipeServiceError::UnknownConstitution(tag.to_string()))
    }

    /// Read back the assessment recorded for a session.
    pub fn user_constitution(
        &self,
        session: Option<&str>,
    ) -> Result<UserConstitution, RecipeServiceError> {
        let session = session
            .filter(|session| !session.trim().is_empty())
            .ok_or(RecipeServiceError::MissingSession)?;
        let user = self
            .profiles
            .user(session)?
            .ok_or_else(|| RecipeServiceError::UnknownUser(session.to_string()))?;
        let constitution_info = user.constitution().and_then(constitution_profile);
        Ok(UserConstitution {
            constitution: user.constitution,
            constitution_info,
        })
    }

    fn known_session<'s>(&self, session: Option<&'s str>) -> Result<&'s str, RecipeServiceError> {
        let session = session
            .filter(|session| !session.trim().is_empty())
            .ok_or(RecipeServiceError::MissingSession)?;
        match self.profiles.user(session)? {
            Some(_) => Ok(session),
            None => Err(RecipeServiceError::UnknownUser(session.to_string())),
        }
    }

    fn ensure_unique_name(
        &self,
        name: &str,
        except: Option<&RecipeId>,
    ) -> Result<(), RecipeServiceError> {
        let duplicate = self
            .recipes
            .all()?
            .iter()
            .any(|recipe| recipe.name == name && Some(&recipe.id) != except);
        if duplicate {
            tracing::warn!(name, "duplicate recipe name");
            return Err(RepositoryError::Conflict.into());
        }
        Ok(())
    }

    fn unused_id(&self) -> Result<RecipeId, RecipeServiceError> {
        loop {
            let candidate = next_recipe_id();
            if self.recipes.fetch(&candidate)?.is_none() {
                return Ok(candidate);
            }
        }
    }
}

/// Error raised by the recipe service.
#[derive(Debug, thiserror::Error)]
pub enum RecipeServiceError {
    #[error("missing X-Session-Id header")]
    MissingSession,
    #[error("no user for session {0}")]
    UnknownUser(String),
    #[error("recipe {0} not found")]
    RecipeNotFound(String),
    #[error("constitution {0} not found")]
    UnknownConstitution(String),
    #[error("invalid recipe: {0}")]
    InvalidRecipe(String),
    #[error(transparent)]
    Preference(#[from] PreferenceError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
