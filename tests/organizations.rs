//! Integration tests for organization listing, creation and membership.

use serde_json::json;

mod common;

use crate::common::*;

#[tokio::test]
async fn anonymous_caller_has_no_organizations() {
    let (_pool, app) = test_app().await;

    let (status, body) = get(&app, "/api/organizations/exists", None).await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(body, json!(false));

    let (status, body) = get(&app, "/api/organizations", None).await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn user_without_memberships_has_no_organizations() {
    let (_pool, app) = test_app().await;
    let cookie = sign_up(&app, "Ada", "ada@example.com").await;

    let (_, body) = get(&app, "/api/organizations/exists", Some(&cookie)).await;
    assert_eq!(body, json!(false));

    let (_, body) = get(&app, "/api/organizations", Some(&cookie)).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn create_organization_makes_caller_owner_and_activates_it() {
    let (pool, app) = test_app().await;
    let cookie = sign_up(&app, "Ada", "ada@example.com").await;

    let org_id = create_org(&app, &cookie, "Acme", "acme").await;

    let (_, body) = get(&app, "/api/organizations", Some(&cookie)).await;
    assert_eq!(body, json!([{ "id": org_id, "name": "Acme", "slug": "acme" }]));

    let (_, body) = get(&app, "/api/organizations/exists", Some(&cookie)).await;
    assert_eq!(body, json!(true));

    let user_id = user_id_from_cookie(&pool, &cookie).await;
    let role = prodtrack::app::db::organizations::find_member_role(&pool, &org_id, &user_id)
        .await
        .unwrap();
    assert_eq!(role, Some(prodtrack::app::domain::OrganizationRole::Owner));

    let (_, session) = get(&app, "/api/auth/session", Some(&cookie)).await;
    assert_eq!(session["session"]["activeOrganizationId"], json!(org_id));
}

#[tokio::test]
async fn create_organization_requires_authentication() {
    let (_pool, app) = test_app().await;

    let (status, body) = post(&app, "/api/organizations", None, json!({ "name": "Acme", "slug": "acme" })).await;

    assert_eq!(status, http::StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn duplicate_slug_conflicts() {
    let (_pool, app) = test_app().await;
    let ada = sign_up(&app, "Ada", "ada@example.com").await;
    let bob = sign_up(&app, "Bob", "bob@example.com").await;
    create_org(&app, &ada, "Acme", "acme").await;

    let (status, _) = post(&app, "/api/organizations", Some(&bob), json!({ "name": "Other", "slug": "acme" })).await;

    assert_eq!(status, http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_slug_is_rejected() {
    let (_pool, app) = test_app().await;
    let cookie = sign_up(&app, "Ada", "ada@example.com").await;

    let (status, _) = post(&app, "/api/organizations", Some(&cookie), json!({ "name": "Acme", "slug": "Not A Slug" })).await;

    assert_eq!(status, http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn organization_limit_is_enforced() {
    let (_pool, app) = test_app().await;
    let cookie = sign_up(&app, "Ada", "ada@example.com").await;
    for i in 0..5 {
        create_org(&app, &cookie, &format!("Org {}", i), &format!("org-{}", i)).await;
    }

    let (status, _) = post(&app, "/api/organizations", Some(&cookie), json!({ "name": "One more", "slug": "org-5" })).await;

    assert_eq!(status, http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn show_organization_lists_members() {
    let (_pool, app) = test_app().await;
    let cookie = sign_up(&app, "Ada", "ada@example.com").await;
    let org_id = create_org(&app, &cookie, "Acme", "acme").await;

    let (status, body) = get(&app, &format!("/api/organizations/{}", org_id), Some(&cookie)).await;

    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(body["slug"], "acme");
    assert_eq!(body["members"][0]["email"], "ada@example.com");
    assert_eq!(body["members"][0]["role"], "owner");
    assert_eq!(body["invitations"], json!([]));
}

#[tokio::test]
async fn non_member_cannot_view_or_activate_organization() {
    let (_pool, app) = test_app().await;
    let ada = sign_up(&app, "Ada", "ada@example.com").await;
    let bob = sign_up(&app, "Bob", "bob@example.com").await;
    let org_id = create_org(&app, &ada, "Acme", "acme").await;

    let (status, body) = get(&app, &format!("/api/organizations/{}", org_id), Some(&bob)).await;
    assert_eq!(status, http::StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Access denied to organization");

    let (status, _) = send(
        &app,
        json_request("POST", &format!("/api/organizations/{}/activate", org_id), Some(&bob), None),
    )
    .await;
    assert_eq!(status, http::StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn activate_switches_active_organization() {
    let (_pool, app) = test_app().await;
    let cookie = sign_up(&app, "Ada", "ada@example.com").await;
    let first = create_org(&app, &cookie, "First", "first").await;
    let _second = create_org(&app, &cookie, "Second", "second").await;

    let (status, body) = send(
        &app,
        json_request("POST", &format!("/api/organizations/{}/activate", first), Some(&cookie), None),
    )
    .await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(body["id"], json!(first));

    let (_, session) = get(&app, "/api/auth/session", Some(&cookie)).await;
    assert_eq!(session["session"]["activeOrganizationId"], json!(first));
}

#[tokio::test]
async fn sole_owner_cannot_leave() {
    let (_pool, app) = test_app().await;
    let cookie = sign_up(&app, "Ada", "ada@example.com").await;
    let org_id = create_org(&app, &cookie, "Acme", "acme").await;

    let (status, _) = send(
        &app,
        json_request("POST", &format!("/api/organizations/{}/leave", org_id), Some(&cookie), None),
    )
    .await;

    assert_eq!(status, http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn member_can_leave_and_loses_access() {
    let (pool, app) = test_app().await;
    let ada = sign_up(&app, "Ada", "ada@example.com").await;
    let bob = sign_up(&app, "Bob", "bob@example.com").await;
    let org_id = create_org(&app, &ada, "Acme", "acme").await;
    let bob_id = user_id_from_cookie(&pool, &bob).await;
    prodtrack::app::db::organizations::add_member(
        &pool,
        &org_id,
        &bob_id,
        prodtrack::app::domain::OrganizationRole::Member,
    )
    .await
    .unwrap();

    let (status, _) = send(
        &app,
        json_request("POST", &format!("/api/organizations/{}/leave", org_id), Some(&bob), None),
    )
    .await;
    assert_eq!(status, http::StatusCode::NO_CONTENT);

    let (status, _) = get(&app, &format!("/api/organizations/{}/products", org_id), Some(&bob)).await;
    assert_eq!(status, http::StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn member_removal_rules() {
    let (pool, app) = test_app().await;
    let ada = sign_up(&app, "Ada", "ada@example.com").await;
    let bob = sign_up(&app, "Bob", "bob@example.com").await;
    let cy = sign_up(&app, "Cy", "cy@example.com").await;
    let org_id = create_org(&app, &ada, "Acme", "acme").await;
    let ada_id = user_id_from_cookie(&pool, &ada).await;
    let bob_id = user_id_from_cookie(&pool, &bob).await;
    let cy_id = user_id_from_cookie(&pool, &cy).await;

    use prodtrack::app::{db::organizations::add_member, domain::OrganizationRole};
    add_member(&pool, &org_id, &bob_id, OrganizationRole::Admin).await.unwrap();
    add_member(&pool, &org_id, &cy_id, OrganizationRole::Member).await.unwrap();

    // Plain members cannot remove anyone.
    let (status, _) = delete(&app, &format!("/api/organizations/{}/members/{}", org_id, bob_id), Some(&cy)).await;
    assert_eq!(status, http::StatusCode::FORBIDDEN);

    // Admins cannot remove owners.
    let (status, _) = delete(&app, &format!("/api/organizations/{}/members/{}", org_id, ada_id), Some(&bob)).await;
    assert_eq!(status, http::StatusCode::FORBIDDEN);

    // Nobody removes themselves through this route.
    let (status, _) = delete(&app, &format!("/api/organizations/{}/members/{}", org_id, bob_id), Some(&bob)).await;
    assert_eq!(status, http::StatusCode::BAD_REQUEST);

    let (status, _) = delete(&app, &format!("/api/organizations/{}/members/{}", org_id, cy_id), Some(&bob)).await;
    assert_eq!(status, http::StatusCode::NO_CONTENT);

    let (status, _) = delete(&app, &format!("/api/organizations/{}/members/{}", org_id, cy_id), Some(&ada)).await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn concurrent_owner_leaves_keep_one_owner() {
    use prodtrack::app::{db::organizations::add_member, domain::OrganizationRole};

    let (pool, app) = test_app().await;
    let ada = sign_up(&app, "Ada", "ada@example.com").await;
    let bob = sign_up(&app, "Bob", "bob@example.com").await;
    let org_id = create_org(&app, &ada, "Acme", "acme").await;
    let bob_id = user_id_from_cookie(&pool, &bob).await;
    add_member(&pool, &org_id, &bob_id, OrganizationRole::Owner).await.unwrap();

    let uri = format!("/api/organizations/{}/leave", org_id);
    let ((first, _), (second, _)) = tokio::join!(
        send(&app, json_request("POST", &uri, Some(&ada), None)),
        send(&app, json_request("POST", &uri, Some(&bob), None)),
    );

    let mut statuses = vec![first, second];
    statuses.sort();
    assert_eq!(statuses, vec![http::StatusCode::NO_CONTENT, http::StatusCode::BAD_REQUEST]);
    let owners = prodtrack::app::db::organizations::count_owners(&pool, &org_id)
        .await
        .unwrap();
    assert_eq!(owners, 1);
}
