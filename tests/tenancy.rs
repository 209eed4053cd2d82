//! Service-level tests for identity, organization resolution and entity access.

use prodtrack::app::{
    db::{self, products::NewProduct},
    domain::{Criticality, OrganizationRole},
    error::AppError,
    features::products::access,
    identity, tenant,
};

mod common;

use crate::common::*;

async fn load_user(pool: &sqlx::SqlitePool, cookie: &str) -> db::User {
    let user_id = user_id_from_cookie(pool, cookie).await;
    db::users::find_by_id(pool, &user_id).await.unwrap().unwrap()
}

async fn insert_product(pool: &sqlx::SqlitePool, org_id: &str, name: &str) -> String {
    let product = NewProduct {
        id: ulid::Ulid::new().to_string(),
        organization_id: org_id.to_string(),
        name: name.to_string(),
        description: None,
        criticality: Criticality::Medium,
        owners: vec![],
    };
    db::products::insert(pool, &product).await.unwrap();
    product.id
}

#[tokio::test]
async fn identity_resolves_only_live_sessions() {
    let (pool, app) = test_app().await;
    let cookie = sign_up(&app, "Ada", "ada@example.com").await;
    let token = extract_session_id_from_cookie(&cookie).unwrap();

    let user = identity::authenticated_user(&pool, Some(token)).await.unwrap();
    assert_eq!(user.as_ref().map(|u| u.email.as_str()), Some("ada@example.com"));
    assert!(identity::is_authenticated(user.as_ref()));

    assert!(identity::authenticated_user(&pool, None).await.unwrap().is_none());
    assert!(identity::authenticated_user(&pool, Some("")).await.unwrap().is_none());

    sqlx::query("UPDATE sessions SET expires_at = 0")
        .execute(&pool)
        .await
        .unwrap();
    let expired = identity::authenticated_user(&pool, Some(token)).await.unwrap();
    assert!(expired.is_none());
    assert!(!identity::is_authenticated(expired.as_ref()));
}

#[tokio::test]
async fn user_organizations_for_anonymous_is_empty() {
    let pool = test_pool().await;

    let result = tenant::user_organizations(&pool, None).await.unwrap();
    assert!(result.user.is_none());
    assert!(result.organizations.is_empty());
    assert!(!tenant::has_user_organizations(&pool, None).await.unwrap());
}

#[tokio::test]
async fn require_org_access_outcomes() {
    let (pool, app) = test_app().await;
    let ada_cookie = sign_up(&app, "Ada", "ada@example.com").await;
    let bob_cookie = sign_up(&app, "Bob", "bob@example.com").await;
    let org_id = create_org(&app, &ada_cookie, "Acme", "acme").await;
    let ada = load_user(&pool, &ada_cookie).await;
    let bob = load_user(&pool, &bob_cookie).await;

    let role = tenant::require_org_access(&pool, Some(&ada), &org_id).await.unwrap();
    assert_eq!(role, OrganizationRole::Owner);

    let denied = tenant::require_org_access(&pool, Some(&bob), &org_id).await.unwrap_err();
    assert!(matches!(denied, AppError::AccessDenied(ref msg) if msg == "Access denied to organization"));

    let anonymous = tenant::require_org_access(&pool, None, &org_id).await.unwrap_err();
    assert!(matches!(anonymous, AppError::Unauthorized));
    assert_eq!(anonymous.to_string(), "Unauthorized");
}

#[tokio::test]
async fn product_with_access_hides_other_organizations() {
    let (pool, app) = test_app().await;
    let cookie = sign_up(&app, "Ada", "ada@example.com").await;
    let acme = create_org(&app, &cookie, "Acme", "acme").await;
    let globex = create_org(&app, &cookie, "Globex", "globex").await;
    let ada = load_user(&pool, &cookie).await;
    let product_id = insert_product(&pool, &acme, "Checkout").await;

    let found = access::product_with_access(&pool, Some(&ada), &product_id, &acme)
        .await
        .unwrap()
        .expect("product visible in its own organization");
    assert_eq!(found.name, "Checkout");

    let hidden = access::product_with_access(&pool, Some(&ada), &product_id, &globex)
        .await
        .unwrap();
    assert!(hidden.is_none());

    let missing = access::require_product_access(&pool, Some(&ada), &product_id, &globex)
        .await
        .unwrap_err();
    assert!(matches!(missing, AppError::NotFound(ref msg) if msg == "Product not found"));
}

#[tokio::test]
async fn guard_runs_before_lookup() {
    let (pool, app) = test_app().await;
    let ada_cookie = sign_up(&app, "Ada", "ada@example.com").await;
    let bob_cookie = sign_up(&app, "Bob", "bob@example.com").await;
    let acme = create_org(&app, &ada_cookie, "Acme", "acme").await;
    let bob = load_user(&pool, &bob_cookie).await;

    // Even a nonexistent id reports the tenancy failure first.
    let err = access::require_surface_access(&pool, Some(&bob), "missing", &acme)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AccessDenied(_)));

    let err = access::require_feature_access(&pool, None, "missing", &acme)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));
}

#[tokio::test]
async fn remove_product_cascades_in_one_go() {
    let (pool, app) = test_app().await;
    let cookie = sign_up(&app, "Ada", "ada@example.com").await;
    let acme = create_org(&app, &cookie, "Acme", "acme").await;
    let ada = load_user(&pool, &cookie).await;
    let product_id = insert_product(&pool, &acme, "Checkout").await;

    db::surfaces::insert(
        &pool,
        &db::surfaces::NewSurface {
            id: ulid::Ulid::new().to_string(),
            product_id: product_id.clone(),
            organization_id: acme.clone(),
            name: "api".to_string(),
            surface_type: prodtrack::app::domain::SurfaceType::Service,
            location: None,
            environments: Default::default(),
            external_id: None,
        },
    )
    .await
    .unwrap();

    access::remove_product(&pool, Some(&ada), &product_id, &acme).await.unwrap();

    assert!(db::products::find_by_id(&pool, &product_id).await.unwrap().is_none());
    assert!(db::surfaces::list_by_product(&pool, &product_id).await.unwrap().is_empty());

    let again = access::remove_product(&pool, Some(&ada), &product_id, &acme).await.unwrap_err();
    assert!(matches!(again, AppError::NotFound(_)));
}
