use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::profile::{DiagnosisMethod, PreferenceUpdate};
use super::query::RecipeQuery;
use super::repository::{ProfileStore, RecipeRepository, RepositoryError};
use super::service::{RecipeService, RecipeServiceError};
use crate::recommend::{Constitution, Recipe, RecipeId, UserProfile};

pub const SESSION_HEADER: &str = "x-session-id";

/// Router exposing the catalog, ranking, and preference endpoints.
pub fn recipe_router<R, P>(service: Arc<RecipeService<R, P>>) -> Router
where
    R: RecipeRepository + 'static,
    P: ProfileStore + 'static,
{
    Router::new()
        .route(
            "/api/recipes",
            get(list_handler::<R, P>).post(create_handler::<R, P>),
        )
        .route("/api/recipes/recommended", get(recommended_handler::<R, P>))
        .route("/api/recipes/categories", get(categories_handler::<R, P>))
        .route("/api/recipes/rank", post(rank_handler::<R, P>))
        .route(
            "/api/recipes/:recipe_id",
            get(get_handler::<R, P>)
                .put(update_handler::<R, P>)
                .delete(delete_handler::<R, P>),
        )
        .route(
            "/api/preferences",
            get(get_preference_handler::<R, P>)
                .put(update_preference_handler::<R, P>)
                .delete(reset_preference_handler::<R, P>),
        )
        .route("/api/constitutions", get(constitutions_handler::<R, P>))
        .route(
            "/api/constitutions/:constitution_type",
            get(constitution_info_handler::<R, P>),
        )
        .route(
            "/api/users/constitution",
            get(user_constitution_handler::<R, P>).put(constitution_handler::<R, P>),
        )
        .with_state(service)
}

/// `{code, message, data}` body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub code: u16,
    pub message: String,
    pub data: T,
}

fn success<T: Serialize>(status: StatusCode, message: &str, data: T) -> Response {
    let body = Envelope {
        code: 0,
        message: message.to_string(),
        data,
    };
    (status, Json(body)).into_response()
}

fn failure(status: StatusCode, message: String) -> Response {
    let body = json!({
        "code": status.as_u16(),
        "message": message,
        "data": Value::Null,
    });
    (status, Json(body)).into_response()
}

fn service_failure(error: RecipeServiceError) -> Response {
    let status = match &error {
        RecipeServiceError::MissingSession
        | RecipeServiceError::InvalidRecipe(_)
        | RecipeServiceError::Preference(_) => StatusCode::BAD_REQUEST,
        RecipeServiceError::UnknownUser(_)
        | RecipeServiceError::UnknownConstitution(_)
        | RecipeServiceError::RecipeNotFound(_)
        | RecipeServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        RecipeServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        RecipeServiceError::Repository(RepositoryError::Unavailable(_)) => {
            tracing::warn!(error = %error, "repository unavailable");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let message = match &error {
        RecipeServiceError::Repository(RepositoryError::Conflict) => {
            "recipe name already exists".to_string()
        }
        other => other.to_string(),
    };
    failure(status, message)
}

fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

pub(crate) async fn list_handler<R, P>(
    State(service): State<Arc<RecipeService<R, P>>>,
    headers: HeaderMap,
    query: Result<Query<RecipeQuery>, QueryRejection>,
) -> Response
where
    R: RecipeRepository + 'static,
    P: ProfileStore + 'static,
{
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return failure(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    match service.list(&query, session_id(&headers)) {
        Ok(page) => success(StatusCode::OK, "success", page),
        Err(error) => service_failure(error),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LimitQuery {
    limit: Option<usize>,
}

pub(crate) async fn recommended_handler<R, P>(
    State(service): State<Arc<RecipeService<R, P>>>,
    headers: HeaderMap,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Response
where
    R: RecipeRepository + 'static,
    P: ProfileStore + 'static,
{
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return failure(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    match service.recommended(query.limit, session_id(&headers)) {
        Ok(recommendation) => success(StatusCode::OK, "success", recommendation),
        Err(error) => service_failure(error),
    }
}

pub(crate) async fn categories_handler<R, P>(
    State(service): State<Arc<RecipeService<R, P>>>,
) -> Response
where
    R: RecipeRepository + 'static,
    P: ProfileStore + 'static,
{
    match service.categories() {
        Ok(categories) => success(
            StatusCode::OK,
            "success",
            json!({ "categories": categories }),
        ),
        Err(error) => service_failure(error),
    }
}

pub(crate) async fn get_handler<R, P>(
    State(service): State<Arc<RecipeService<R, P>>>,
    headers: HeaderMap,
    Path(recipe_id): Path<String>,
) -> Response
where
    R: RecipeRepository + 'static,
    P: ProfileStore + 'static,
{
    match service.get(&RecipeId(recipe_id), session_id(&headers)) {
        Ok(recipe) => success(StatusCode::OK, "success", recipe),
        Err(error) => service_failure(error),
    }
}

pub(crate) async fn create_handler<R, P>(
    State(service): State<Arc<RecipeService<R, P>>>,
    body: Result<Json<Recipe>, JsonRejection>,
) -> Response
where
    R: RecipeRepository + 'static,
    P: ProfileStore + 'static,
{
    let Json(recipe) = match body {
        Ok(body) => body,
        Err(rejection) => return failure(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    match service.create(recipe) {
        Ok(recipe) => success(StatusCode::CREATED, "recipe created", recipe),
        Err(error) => service_failure(error),
    }
}

pub(crate) async fn update_handler<R, P>(
    State(service): State<Arc<RecipeService<R, P>>>,
    Path(recipe_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: RecipeRepository + 'static,
    P: ProfileStore + 'static,
{
    let Json(patch) = match body {
        Ok(body) => body,
        Err(rejection) => return failure(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    match service.update(&RecipeId(recipe_id), patch) {
        Ok(recipe) => success(StatusCode::OK, "recipe updated", recipe),
        Err(error) => service_failure(error),
    }
}

pub(crate) async fn delete_handler<R, P>(
    State(service): State<Arc<RecipeService<R, P>>>,
    Path(recipe_id): Path<String>,
) -> Response
where
    R: RecipeRepository + 'static,
    P: ProfileStore + 'static,
{
    match service.remove(&RecipeId(recipe_id)) {
        Ok(()) => success(StatusCode::OK, "recipe deleted", Value::Null),
        Err(error) => service_failure(error),
    }
}

/// Stateless ranking request carrying its own recipes and profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RankRequest {
    pub recipes: Vec<Recipe>,
    pub profile: Option<UserProfile>,
}

pub(crate) async fn rank_handler<R, P>(
    State(service): State<Arc<RecipeService<R, P>>>,
    body: Result<Json<RankRequest>, JsonRejection>,
) -> Response
where
    R: RecipeRepository + 'static,
    P: ProfileStore + 'static,
{
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return failure(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    let ranked = service.rank(request.recipes, request.profile.as_ref());
    success(StatusCode::OK, "success", json!({ "list": ranked }))
}

pub(crate) async fn get_preference_handler<R, P>(
    State(service): State<Arc<RecipeService<R, P>>>,
    headers: HeaderMap,
) -> Response
where
    R: RecipeRepository + 'static,
    P: ProfileStore + 'static,
{
    match service.preference(session_id(&headers)) {
        Ok(preference) => success(StatusCode::OK, "success", preference),
        Err(error) => service_failure(error),
    }
}

pub(crate) async fn update_preference_handler<R, P>(
    State(service): State<Arc<RecipeService<R, P>>>,
    headers: HeaderMap,
    body: Result<Json<PreferenceUpdate>, JsonRejection>,
) -> Response
where
    R: RecipeRepository + 'static,
    P: ProfileStore + 'static,
{
    let Json(update) = match body {
        Ok(body) => body,
        Err(rejection) => return failure(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    match service.update_preference(session_id(&headers), update) {
        Ok(preference) => success(StatusCode::OK, "preferences updated", preference),
        Err(error) => service_failure(error),
    }
}

pub(crate) async fn reset_preference_handler<R, P>(
    State(service): State<Arc<RecipeService<R, P>>>,
    headers: HeaderMap,
) -> Response
where
    R: RecipeRepository + 'static,
    P: ProfileStore + 'static,
{
    match service.reset_preference(session_id(&headers)) {
        Ok(preference) => success(StatusCode::OK, "preferences reset", preference),
        Err(error) => service_failure(error),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstitutionRequest {
    #[serde(rename = "type")]
    pub constitution: Constitution,
    #[serde(default)]
    pub diagnosis_method: DiagnosisMethod,
}

pub(crate) async fn constitution_handler<R, P>(
    State(service): State<Arc<RecipeService<R, P>>>,
    headers: HeaderMap,
    body: Result<Json<ConstitutionRequest>, JsonRejection>,
) -> Response
where
    R: RecipeRepository + 'static,
    P: ProfileStore + 'static,
{
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return failure(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    match service.set_constitution(
        session_id(&headers),
        request.constitution,
        request.diagnosis_method,
    ) {
        Ok(user) => success(
            StatusCode::OK,
            "constitution saved",
            json!({ "constitution": user.constitution }),
        ),
        Err(error) => service_failure(error),
    }
}

pub(crate) async fn constitutions_handler<R, P>(
    State(service): State<Arc<RecipeService<R, P>>>,
) -> Response
where
    R: RecipeRepository + 'static,
    P: ProfileStore + 'static,
{
    success(StatusCode::OK, "success", service.constitutions())
}

pub(crate) async fn constitution_info_handler<R, P>(
    State(service): State<Arc<RecipeService<R, P>>>,
    Path(constitution_type): Path<String>,
) -> Response
where
    R: RecipeRepository + 'static,
    P: ProfileStore + 'static,
{
    match service.constitution_info(&constitution_type) {
        Ok(profile) => success(StatusCode::OK, "success", profile),
        Err(error) => service_failure(error),
    }
}

pub(crate) async fn user_constitution_handler<R, P>(
    State(service): State<Arc<RecipeService<R, P>>>,
    headers: HeaderMap,
) -> Response
where
    R: RecipeRepository + 'static,
    P: ProfileStore + 'static,
{
    match service.user_constitution(session_id(&headers)) {
        Ok(constitution) => success(StatusCode::OK, "success", constitution),
        Err(error) => service_failure(error),
    }
}
