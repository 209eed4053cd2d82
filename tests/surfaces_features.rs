//! Integration tests for surfaces, features and cascading product deletion.

use serde_json::json;

mod common;

use crate::common::*;

struct Setup {
    pool: sqlx::SqlitePool,
    app: axum::Router,
    cookie: String,
    org_id: String,
    product_id: String,
}

async fn setup() -> Setup {
    let (pool, app) = test_app().await;
    let cookie = sign_up(&app, "Ada", "ada@example.com").await;
    let org_id = create_org(&app, &cookie, "Acme", "acme").await;
    let product_id = create_product(&app, &cookie, &org_id, "Checkout").await;
    Setup {
        pool,
        app,
        cookie,
        org_id,
        product_id,
    }
}

impl Setup {
    fn surfaces_uri(&self) -> String {
        format!("/api/organizations/{}/products/{}/surfaces", self.org_id, self.product_id)
    }

    fn features_uri(&self) -> String {
        format!("/api/organizations/{}/products/{}/features", self.org_id, self.product_id)
    }

    async fn add_surface(&self, name: &str) -> String {
        let (status, body) = post(
            &self.app,
            &self.surfaces_uri(),
            Some(&self.cookie),
            json!({ "name": name, "type": "service" }),
        )
        .await;
        assert_eq!(status, http::StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    async fn add_feature(&self, title: &str) -> String {
        let (status, body) = post(&self.app, &self.features_uri(), Some(&self.cookie), json!({ "title": title })).await;
        assert_eq!(status, http::StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn surface_defaults_and_inherited_organization() {
    let s = setup().await;
    s.add_surface("checkout-api").await;

    let (status, body) = get(&s.app, &s.surfaces_uri(), Some(&s.cookie)).await;

    assert_eq!(status, http::StatusCode::OK);
    let surface = &body[0];
    assert_eq!(surface["name"], "checkout-api");
    assert_eq!(surface["type"], "service");
    assert_eq!(surface["environments"], json!({}));
    assert_eq!(surface["organizationId"], json!(s.org_id));
    assert_eq!(surface["productId"], json!(s.product_id));
}

#[tokio::test]
async fn feature_defaults() {
    let s = setup().await;
    s.add_feature("Guest checkout").await;

    let (_, body) = get(&s.app, &s.features_uri(), Some(&s.cookie)).await;

    let feature = &body[0];
    assert_eq!(feature["title"], "Guest checkout");
    assert_eq!(feature["acceptanceCriteria"], json!([]));
    assert_eq!(feature["source"], "manual");
    assert_eq!(feature["status"], "draft");
    assert_eq!(feature["organizationId"], json!(s.org_id));
}

#[tokio::test]
async fn update_surface_patches_fields() {
    let s = setup().await;
    let surface_id = s.add_surface("checkout-api").await;
    let uri = format!("/api/organizations/{}/surfaces/{}", s.org_id, surface_id);

    let (status, _) = patch(
        &s.app,
        &uri,
        Some(&s.cookie),
        json!({
            "type": "webapp",
            "location": "github.com/acme/checkout",
            "environments": { "prod": "https://checkout.acme.test" }
        }),
    )
    .await;
    assert_eq!(status, http::StatusCode::NO_CONTENT);

    let (_, body) = get(&s.app, &s.surfaces_uri(), Some(&s.cookie)).await;
    assert_eq!(body[0]["name"], "checkout-api");
    assert_eq!(body[0]["type"], "webapp");
    assert_eq!(body[0]["location"], "github.com/acme/checkout");
    assert_eq!(body[0]["environments"], json!({ "prod": "https://checkout.acme.test" }));

    let (status, _) = patch(&s.app, &uri, Some(&s.cookie), json!({ "location": null })).await;
    assert_eq!(status, http::StatusCode::NO_CONTENT);
    let (_, body) = get(&s.app, &s.surfaces_uri(), Some(&s.cookie)).await;
    assert!(body[0]["location"].is_null());
    assert_eq!(body[0]["type"], "webapp");
}

#[tokio::test]
async fn update_feature_status_and_criteria() {
    let s = setup().await;
    let feature_id = s.add_feature("Guest checkout").await;
    let uri = format!("/api/organizations/{}/features/{}", s.org_id, feature_id);

    let (status, _) = patch(
        &s.app,
        &uri,
        Some(&s.cookie),
        json!({ "status": "in_progress", "acceptanceCriteria": ["No account needed"] }),
    )
    .await;
    assert_eq!(status, http::StatusCode::NO_CONTENT);

    let (_, body) = get(&s.app, &s.features_uri(), Some(&s.cookie)).await;
    assert_eq!(body[0]["title"], "Guest checkout");
    assert_eq!(body[0]["status"], "in_progress");
    assert_eq!(body[0]["acceptanceCriteria"], json!(["No account needed"]));
}

#[tokio::test]
async fn remove_surface_and_feature() {
    let s = setup().await;
    let surface_id = s.add_surface("checkout-api").await;
    let feature_id = s.add_feature("Guest checkout").await;

    let (status, _) = delete(&s.app, &format!("/api/organizations/{}/surfaces/{}", s.org_id, surface_id), Some(&s.cookie)).await;
    assert_eq!(status, http::StatusCode::NO_CONTENT);
    let (status, _) = delete(&s.app, &format!("/api/organizations/{}/features/{}", s.org_id, feature_id), Some(&s.cookie)).await;
    assert_eq!(status, http::StatusCode::NO_CONTENT);

    let (_, surfaces) = get(&s.app, &s.surfaces_uri(), Some(&s.cookie)).await;
    assert_eq!(surfaces, json!([]));
    let (_, features) = get(&s.app, &s.features_uri(), Some(&s.cookie)).await;
    assert_eq!(features, json!([]));

    let (status, body) = delete(&s.app, &format!("/api/organizations/{}/surfaces/{}", s.org_id, surface_id), Some(&s.cookie)).await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Surface not found");
}

#[tokio::test]
async fn children_are_not_reachable_through_another_organization() {
    let s = setup().await;
    let other_org = create_org(&s.app, &s.cookie, "Globex", "globex").await;
    let surface_id = s.add_surface("checkout-api").await;
    let feature_id = s.add_feature("Guest checkout").await;

    let (status, body) = patch(
        &s.app,
        &format!("/api/organizations/{}/surfaces/{}", other_org, surface_id),
        Some(&s.cookie),
        json!({ "name": "renamed" }),
    )
    .await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Surface not found");

    let (status, body) = delete(&s.app, &format!("/api/organizations/{}/features/{}", other_org, feature_id), Some(&s.cookie)).await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Feature not found");

    let (status, _) = get(
        &s.app,
        &format!("/api/organizations/{}/products/{}/features", other_org, s.product_id),
        Some(&s.cookie),
    )
    .await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn relations_returns_product_with_children() {
    let s = setup().await;
    s.add_surface("checkout-api").await;
    s.add_feature("Guest checkout").await;
    s.add_feature("Saved cards").await;

    let (status, body) = get(
        &s.app,
        &format!("/api/organizations/{}/products/{}/relations", s.org_id, s.product_id),
        Some(&s.cookie),
    )
    .await;

    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(body["name"], "Checkout");
    assert_eq!(body["surfaces"].as_array().unwrap().len(), 1);
    assert_eq!(body["features"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn deleting_product_cascades_to_children() {
    let s = setup().await;
    s.add_surface("checkout-api").await;
    s.add_surface("checkout-web").await;
    s.add_feature("Guest checkout").await;
    let survivor = create_product(&s.app, &s.cookie, &s.org_id, "Search").await;
    let (status, _) = post(
        &s.app,
        &format!("/api/organizations/{}/products/{}/features", s.org_id, survivor),
        Some(&s.cookie),
        json!({ "title": "Autocomplete" }),
    )
    .await;
    assert_eq!(status, http::StatusCode::CREATED);

    let (status, _) = delete(
        &s.app,
        &format!("/api/organizations/{}/products/{}", s.org_id, s.product_id),
        Some(&s.cookie),
    )
    .await;
    assert_eq!(status, http::StatusCode::NO_CONTENT);

    let surfaces = prodtrack::app::db::surfaces::list_by_product(&s.pool, &s.product_id).await.unwrap();
    let features = prodtrack::app::db::features::list_by_product(&s.pool, &s.product_id).await.unwrap();
    assert!(surfaces.is_empty());
    assert!(features.is_empty());

    let remaining = prodtrack::app::db::features::list_by_product(&s.pool, &survivor).await.unwrap();
    assert_eq!(remaining.len(), 1);
}

#[tokio::test]
async fn child_routes_deny_non_members_and_anonymous_callers() {
    let s = setup().await;
    let surface_id = s.add_surface("checkout-api").await;
    let feature_id = s.add_feature("Guest checkout").await;
    let mallory = sign_up(&s.app, "Mallory", "mallory@example.com").await;

    let surface_uri = format!("/api/organizations/{}/surfaces/{}", s.org_id, surface_id);
    let feature_uri = format!("/api/organizations/{}/features/{}", s.org_id, feature_id);

    for cookie in [Some(mallory.as_str()), None] {
        let (expected_status, expected_error) = match cookie {
            Some(_) => (http::StatusCode::FORBIDDEN, "Access denied to organization"),
            None => (http::StatusCode::UNAUTHORIZED, "Unauthorized"),
        };
        let responses = [
            get(&s.app, &s.surfaces_uri(), cookie).await,
            get(&s.app, &s.features_uri(), cookie).await,
            patch(&s.app, &surface_uri, cookie, json!({ "name": "renamed" })).await,
            patch(&s.app, &feature_uri, cookie, json!({ "title": "renamed" })).await,
            delete(&s.app, &surface_uri, cookie).await,
            delete(&s.app, &feature_uri, cookie).await,
        ];
        for (status, body) in responses {
            assert_eq!(status, expected_status);
            assert_eq!(body["error"], expected_error);
        }
    }

    // Nothing was changed or removed along the way.
    let (_, surfaces) = get(&s.app, &s.surfaces_uri(), Some(&s.cookie)).await;
    assert_eq!(surfaces[0]["name"], "checkout-api");
    let (_, features) = get(&s.app, &s.features_uri(), Some(&s.cookie)).await;
    assert_eq!(features[0]["title"], "Guest checkout");
}
