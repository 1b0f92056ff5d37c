//! Recipe catalog, user profiles, and the HTTP surface over them.
//!
//! Storage sits behind the [`RecipeRepository`] and [`ProfileStore`] traits so the
//! service and router can be exercised with in-memory doubles.

pub mod constitution;
pub mod profile;
pub mod query;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use constitution::{
    constitution_profile, constitution_profiles, ConstitutionProfile, DietaryGuidelines,
};
pub use profile::{
    ConstitutionAssessment, DiagnosisMethod, FlavorPreference, FlavorPreferenceUpdate,
    PreferenceError, PreferenceRecord, PreferenceUpdate, UserRecord,
};
pub use query::{category_counts, CategoryCount, Pagination, RecipeQuery};
pub use repository::{ProfileStore, RecipeRepository, RepositoryError};
pub use router::{recipe_router, Envelope, RankRequest, SESSION_HEADER};
pub use service::{
    RecipePage, RecipeService, RecipeServiceError, Recommendation, UserConstitution,
};
