use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::catalog::{RecipeService, SESSION_HEADER};
use crate::config::RecommendConfig;

fn get(uri: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(session) = session {
        builder = builder.header(SESSION_HEADER, session);
    }
    builder.body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, session: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(session) = session {
        builder = builder.header(SESSION_HEADER, session);
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn list_route_wraps_ranked_page_in_envelope() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/recipes?page=1&pageSize=2", Some(SESSION)))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["code"], 0);
    assert_eq!(payload["message"], "success");
    assert_eq!(
        names(&payload["data"]["list"]),
        vec!["当归生姜羊肉汤", "冰糖雪梨"]
    );
    assert_eq!(payload["data"]["list"][0]["matchScore"], 99);
    assert_eq!(payload["data"]["list"][0]["matchReason"], "适合您的体质");
    assert_eq!(
        payload["data"]["pagination"],
        json!({ "page": 1, "pageSize": 2, "total": 3 })
    );
}

#[tokio::test]
async fn list_route_filters_by_nature_and_keyword() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    // 温
    let response = router
        .clone()
        .oneshot(get("/api/recipes?nature=%E6%B8%A9", None))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(names(&payload["data"]["list"]), vec!["当归生姜羊肉汤"]);

    // 小米
    let response = router
        .oneshot(get("/api/recipes?keyword=%E5%B0%8F%E7%B1%B3", None))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(names(&payload["data"]["list"]), vec!["小米粥"]);
}

#[tokio::test]
async fn malformed_query_is_a_bad_request() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/recipes/recommended?limit=many", None))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["code"], 400);
    assert!(payload["data"].is_null());
}

#[tokio::test]
async fn recommended_route_honours_limit_and_headline() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/recipes/recommended?limit=1", Some(SESSION)))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(names(&payload["data"]["list"]), vec!["当归生姜羊肉汤"]);
    assert_eq!(
        payload["data"]["reason"],
        "根据您的阳虚质，为您精选的食养方案"
    );
}

#[tokio::test]
async fn categories_route_lists_counts() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/recipes/categories", None))
        .await
        .expect("route executes");

    let payload = read_json_body(response).await;
    assert_eq!(
        payload["data"]["categories"][3],
        json!({ "key": "quick", "name": "快手菜", "count": 2 })
    );
}

#[tokio::test]
async fn unknown_recipe_is_not_found() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/recipes/ghost", None))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["code"], 404);
    assert_eq!(payload["message"], "recipe ghost not found");
}

#[tokio::test]
async fn duplicate_recipe_names_conflict() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(with_json(
            "POST",
            "/api/recipes",
            None,
            json!({ "name": "山楂麦芽饮", "nature": "平", "cookingTime": 10 }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["data"]["nature"], "平");
    assert_eq!(payload["data"]["difficulty"], "简单");

    let response = router
        .oneshot(with_json(
            "POST",
            "/api/recipes",
            None,
            json!({ "name": "小米粥" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], "recipe name already exists");
}

#[tokio::test]
async fn update_and_delete_routes_modify_the_catalog() {
    let (service, recipes, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(with_json(
            "PUT",
            "/api/recipes/porridge",
            None,
            json!({ "isActive": false }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["data"]["isActive"], false);

    let response = router
        .oneshot(
            Request::delete("/api/recipes/porridge")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(recipes.records.lock().expect("lock").len(), 2);
}

#[tokio::test]
async fn rank_route_scores_supplied_recipes() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let request = json!({
        "recipes": [
            serde_json::to_value(porridge()).unwrap(),
            serde_json::to_value(pear()).unwrap(),
            serde_json::to_value(stew()).unwrap(),
        ],
        "profile": { "constitution": "yin_deficiency" }
    });
    let response = router
        .oneshot(with_json("POST", "/api/recipes/rank", None, request))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        names(&payload["data"]["list"]),
        vec!["冰糖雪梨", "当归生姜羊肉汤", "小米粥"]
    );
    assert_eq!(payload["data"]["list"][0]["matchScore"], 95);
    assert_eq!(payload["data"]["list"][2]["matchScore"], 80);
    assert_eq!(
        payload["data"]["list"][2]["matchReason"],
        "清润之品，适合阴虚体质"
    );
}

#[tokio::test]
async fn rank_route_keeps_recipes_with_malformed_fields() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let request = json!({
        "recipes": [{
            "id": "lamb",
            "name": "羊肉汤",
            "nature": "温",
            "suitableConstitutions": ["yang_xu", "yang_deficiency"],
            "baseScore": null,
            "tags": null,
        }],
        "profile": { "constitution": "yang_deficiency" }
    });
    let response = router
        .oneshot(with_json("POST", "/api/recipes/rank", None, request))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(names(&payload["data"]["list"]), vec!["羊肉汤"]);
    assert_eq!(payload["data"]["list"][0]["baseScore"], 80);
    assert_eq!(
        payload["data"]["list"][0]["suitableConstitutions"],
        json!(["yang_deficiency"])
    );
    assert_eq!(payload["data"]["list"][0]["matchScore"], 95);
}

#[tokio::test]
async fn constitution_routes_serve_reference_profiles() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(get("/api/constitutions", None))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let list = payload["data"].as_array().expect("profile list");
    assert_eq!(list.len(), 9);
    assert_eq!(list[0]["type"], "balanced");

    let response = router
        .clone()
        .oneshot(get("/api/constitutions/yin_deficiency", None))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["data"]["name"], "阴虚质");
    assert!(payload["data"]["dietaryGuidelines"]["recommended"].is_array());

    let response = router
        .oneshot(get("/api/constitutions/ghost", None))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], "constitution ghost not found");
}

#[tokio::test]
async fn user_constitution_route_reads_back_the_assessment() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(get("/api/users/constitution", Some(SESSION)))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["data"]["constitution"]["type"], "yang_deficiency");
    assert_eq!(payload["data"]["constitution"]["diagnosisMethod"], "manual");
    assert_eq!(payload["data"]["constitutionInfo"]["name"], "阳虚质");

    let response = router
        .oneshot(get("/api/users/constitution", None))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rank_route_rejects_malformed_bodies() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(with_json(
            "POST",
            "/api/recipes/rank",
            None,
            json!({ "recipes": "not a list" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["code"], 400);
}

#[tokio::test]
async fn preference_routes_map_session_errors() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(get("/api/preferences", None))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], "missing X-Session-Id header");

    let response = router
        .clone()
        .oneshot(get("/api/preferences", Some("ghost")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router
        .clone()
        .oneshot(with_json(
            "PUT",
            "/api/preferences",
            Some(SESSION),
            json!({ "flavorPreference": { "sour": 120 } }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], "sour must be between 0 and 100, got 120");

    let response = router
        .clone()
        .oneshot(with_json(
            "PUT",
            "/api/preferences",
            Some(SESSION),
            json!({ "mealScenarios": ["养生"], "maxCookingTime": 45 }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["data"]["maxCookingTime"], 45);
    assert_eq!(payload["data"]["mealScenarios"], json!(["养生"]));

    let response = router
        .oneshot(
            Request::delete("/api/preferences")
                .header(SESSION_HEADER, SESSION)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["data"]["maxCookingTime"], 60);
}

#[tokio::test]
async fn constitution_route_personalises_later_requests() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(with_json(
            "PUT",
            "/api/users/constitution",
            Some("new-visitor"),
            json!({ "type": "yin_deficiency" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["data"]["constitution"]["type"], "yin_deficiency");
    assert_eq!(payload["data"]["constitution"]["diagnosisMethod"], "manual");

    let response = router
        .clone()
        .oneshot(get("/api/recipes/pear", Some("new-visitor")))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["data"]["matchScore"], 95);

    let response = router
        .oneshot(with_json(
            "PUT",
            "/api/users/constitution",
            Some("new-visitor"),
            json!({ "type": "sanguine" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn categories_handler_reports_unavailable_storage() {
    let service = Arc::new(RecipeService::new(
        Arc::new(UnavailableRecipes),
        Arc::new(MemoryProfiles::default()),
        RecommendConfig::default(),
    ));

    let response = crate::catalog::router::categories_handler::<UnavailableRecipes, MemoryProfiles>(
        State(service),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(payload["code"], 500);
    assert_eq!(payload["message"], "repository unavailable: database offline");
}
