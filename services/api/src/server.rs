use crate::cli::ServeArgs;
use crate::infra::{seed_recipes, AppState, InMemoryProfileStore, InMemoryRecipeRepository};
use crate::routes::with_recipe_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use shiliao::catalog::RecipeService;
use shiliao::config::AppConfig;
use shiliao::error::AppError;
use shiliao::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let recipe_service = RecipeService::new(
        Arc::new(InMemoryRecipeRepository::default()),
        Arc::new(InMemoryProfileStore::default()),
        config.recommend,
    );
    let seeds = seed_recipes()?;
    let seeded = seeds.len();
    for recipe in seeds {
        recipe_service.create(recipe)?;
    }

    let app = with_recipe_routes(Arc::new(recipe_service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        recipes = seeded,
        locale = ?config.recommend.locale,
        "diet therapy recommender ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
