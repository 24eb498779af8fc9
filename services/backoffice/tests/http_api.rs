//! End-to-end tests for the HTTP layer.
//!
//! The router runs against the in-memory repositories, no database required.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use backoffice::jwt::{JwtConfig, JwtService};
use backoffice::models::{Account, NewAccount, Permission, Role};
use backoffice::repositories::AccountRepository;
use backoffice::routes::create_router;
use backoffice::{AppState, InMemoryRepositories};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "an-unguessable-test-secret-of-32-bytes!";

struct TestApp {
    repositories: InMemoryRepositories,
    jwt: JwtService,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let repositories = InMemoryRepositories::new();
        let jwt = JwtService::new(JwtConfig::new(SECRET));
        let router = create_router(AppState::in_memory(&repositories, jwt.clone()));
        Self {
            repositories,
            jwt,
            router,
        }
    }

    fn grant(&self, role: Role, permissions: &[Permission]) {
        self.repositories
            .role_permissions
            .clone()
            .with_role(role, permissions.iter().copied());
    }

    async fn account(&self, username: &str, role: Role, active: bool) -> Account {
        let accounts = &self.repositories.accounts;
        let account = accounts
            .create_account(NewAccount {
                username: username.to_string(),
                password_hash: "not-a-real-hash".to_string(),
                firstname: "Test".to_string(),
                lastname: "User".to_string(),
                birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                birth_place: "Paris".to_string(),
                role,
                formation_mode: None,
            })
            .await
            .unwrap();
        accounts.update_account_state(username, active).await.unwrap();
        accounts.find_account_by_id(account.id).await.unwrap().unwrap()
    }

    /// Active administrator holding every permission, and its access token
    async fn admin(&self) -> (Account, String) {
        self.grant(Role::Admin, &Permission::ALL);
        let admin = self.account("admin@school.org", Role::Admin, true).await;
        let token = self.jwt.generate_access_token(&admin).unwrap();
        (admin, token)
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_missing_or_invalid_token_is_unauthorized() {
    let app = TestApp::new();
    let (admin, _) = app.admin().await;

    let (status, body) = app
        .send("GET", "/account-management/all-accounts", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = app
        .send("GET", "/account-management/all-accounts", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let refresh = app.jwt.generate_refresh_token(&admin).unwrap();
    let (status, _) = app
        .send("GET", "/account-management/all-accounts", Some(&refresh), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_allowed_request_reaches_handler() {
    let app = TestApp::new();
    let (_, token) = app.admin().await;
    app.account("s@b.com", Role::Student, false).await;

    let (status, body) = app
        .send("GET", "/account-management/all-accounts", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = app
        .send(
            "GET",
            "/account-management/accounts?role=Student&limit=5",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["totalItems"], 1);
    assert_eq!(body["items"][0]["username"], "s@b.com");
}

#[tokio::test]
async fn test_insufficient_permission_is_forbidden() {
    let app = TestApp::new();
    app.grant(Role::Admin, &[Permission::Read]);
    let admin = app.account("admin@school.org", Role::Admin, true).await;
    let token = app.jwt.generate_access_token(&admin).unwrap();

    let (status, _) = app
        .send("GET", "/account-management/all-accounts", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_role_mismatch_is_forbidden() {
    let app = TestApp::new();
    app.grant(Role::Teacher, &Permission::ALL);
    let teacher = app.account("t@b.com", Role::Teacher, true).await;
    let token = app.jwt.generate_access_token(&teacher).unwrap();

    let (status, _) = app
        .send("GET", "/account-management/all-accounts", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_inactive_principal_is_forbidden() {
    let app = TestApp::new();
    let (admin, token) = app.admin().await;

    app.repositories
        .accounts
        .update_account_state(&admin.username, false)
        .await
        .unwrap();

    let (status, body) = app
        .send("GET", "/account-management/all-accounts", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "account is not active");
}

#[tokio::test]
async fn test_permission_changes_apply_to_the_next_request() {
    let app = TestApp::new();
    let (_, token) = app.admin().await;

    let (status, _) = app
        .send(
            "PUT",
            "/account-management/role-permissions",
            Some(&token),
            Some(json!({ "role": "Admin", "permissions": ["Read", "Update"] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send("GET", "/account-management/role-permissions", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_malformed_requests_are_bad_request() {
    let app = TestApp::new();
    let (_, token) = app.admin().await;

    let (status, body) = app
        .send(
            "PUT",
            "/account-management/role-permissions",
            Some(&token),
            Some(json!({ "role": "Admin", "permissions": ["Read", "Fly"] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // the rejected body changed nothing
    let (status, body) = app
        .send("GET", "/account-management/role-permissions", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["permissions"].as_array().unwrap().len(), Permission::ALL.len());

    let (status, body) = app
        .send("GET", "/account-management/account/not-a-uuid", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = app
        .send(
            "GET",
            "/account-management/accounts?page=first",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_account_state_toggle() {
    let app = TestApp::new();
    let (_, token) = app.admin().await;
    app.account("a@b.com", Role::Student, false).await;

    let (status, body) = app
        .send(
            "POST",
            "/account-management/account-state/a@b.com",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], true);

    let (status, body) = app
        .send(
            "GET",
            "/account-management/account-state/a@b.com",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], true);

    let (status, _) = app
        .send(
            "GET",
            "/account-management/account-state/nobody@b.com",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_account_status_mapping() {
    let app = TestApp::new();
    let (_, token) = app.admin().await;
    let account = app.account("a@b.com", Role::Student, true).await;
    let uri = format!("/account-management/account/{}", account.id);

    let (status, body) = app.send("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "account is active and cannot be deleted");
    assert!(app.repositories.accounts.delete_calls.lock().unwrap().is_empty());

    let (status, _) = app
        .send(
            "DELETE",
            &format!("/account-management/account/{}", Uuid::new_v4()),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.send(
        "POST",
        "/account-management/account-state/a@b.com",
        Some(&token),
        None,
    )
    .await;
    let (status, _) = app.send("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send("GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sign_up_then_login_after_activation() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;

    let (status, body) = app
        .send(
            "POST",
            "/auth/signup",
            None,
            Some(json!({
                "username": "ada@b.com",
                "password": "Str0ng!Pass",
                "firstname": "Ada",
                "lastname": "Lovelace",
                "birthDate": "1990-05-17",
                "birthPlace": "London",
                "role": "Student",
                "formationMode": "Initial"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["active"], false);
    assert!(body.get("passwordHash").is_none());

    let credentials = json!({ "username": "ada@b.com", "password": "Str0ng!Pass" });
    let (status, _) = app
        .send("POST", "/auth/login", None, Some(credentials.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.send(
        "POST",
        "/account-management/account-state/ada@b.com",
        Some(&admin_token),
        None,
    )
    .await;

    let (status, body) = app
        .send("POST", "/auth/login", None, Some(credentials))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tokenType"], "Bearer");

    let (status, body) = app
        .send(
            "POST",
            "/auth/refresh",
            None,
            Some(json!({ "refreshToken": body["refreshToken"] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["accessToken"].is_string());
}

#[tokio::test]
async fn test_skill_management() {
    let app = TestApp::new();
    app.grant(
        Role::Teacher,
        &[Permission::Add, Permission::ReadAll, Permission::Delete],
    );
    let teacher = app.account("t@b.com", Role::Teacher, true).await;
    let token = app.jwt.generate_access_token(&teacher).unwrap();

    let (status, skill) = app
        .send(
            "POST",
            "/skill-management/skill/create",
            Some(&token),
            Some(json!({ "name": "Rust" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .send(
            "POST",
            "/skill-management/skill/create",
            Some(&token),
            Some(json!({ "name": "Rust" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Update is not granted to teachers here
    let (status, _) = app
        .send(
            "POST",
            "/skill-management/skill/update",
            Some(&token),
            Some(json!({ "id": skill["id"], "name": "Rust 2024" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, session) = app
        .send(
            "POST",
            "/skill-management/skill/training/add",
            Some(&token),
            Some(json!({
                "skillId": skill["id"],
                "teacherId": teacher.id,
                "startDate": "2030-01-01T09:00:00Z",
                "endDate": "2030-01-01T12:00:00Z"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(session["teacherId"], teacher.id.to_string());

    let (status, page) = app
        .send("GET", "/skill-management/skill/all", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["items"][0]["name"], "Rust");

    let uri = format!(
        "/skill-management/skill/delete/{}",
        skill["id"].as_str().unwrap()
    );
    let (status, _) = app.send("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.send("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_material_room_usage() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;
    app.grant(Role::Teacher, &[Permission::Add, Permission::Read]);
    let teacher = app.account("t@b.com", Role::Teacher, true).await;
    let token = app.jwt.generate_access_token(&teacher).unwrap();

    let room = app.repositories.material_rooms.add_room();
    let material = app.repositories.material_rooms.add_material();

    let (status, _) = app
        .send(
            "POST",
            &format!("/useMaterialRoom/insert/{}/{}", room, material),
            Some(&token),
            Some(json!({ "quantity": 3 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let key = format!("roomId={}&materialId={}", room, material);
    let (status, usage) = app
        .send(
            "GET",
            &format!("/useMaterialRoom/getOne?{}", key),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(usage["quantity"], 3);

    // Deleting is reserved to administrators
    let delete_uri = format!("/useMaterialRoom/delete?{}", key);
    let (status, _) = app.send("DELETE", &delete_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send("DELETE", &delete_uri, Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(
            "GET",
            &format!("/useMaterialRoom/getOne?{}", key),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_room_and_material_management() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;
    app.grant(Role::Teacher, &[Permission::ReadAll]);
    let teacher = app.account("t@b.com", Role::Teacher, true).await;
    let token = app.jwt.generate_access_token(&teacher).unwrap();

    let (status, room) = app
        .send(
            "POST",
            "/room-management/room/create",
            Some(&admin_token),
            Some(json!({ "name": "A101", "capacity": 24 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(room["capacity"], 24);

    let (status, body) = app
        .send(
            "POST",
            "/room-management/room/create",
            Some(&admin_token),
            Some(json!({ "name": "A101" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "room A101 already exists");

    let (status, material) = app
        .send(
            "POST",
            "/material-management/material/create",
            Some(&admin_token),
            Some(json!({ "name": "Projector" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // a created room and material can be linked right away
    let room_id = room["id"].as_str().unwrap();
    let material_id = material["id"].as_str().unwrap();
    let (status, _) = app
        .send(
            "POST",
            &format!("/useMaterialRoom/insert/{}/{}", room_id, material_id),
            Some(&admin_token),
            Some(json!({ "quantity": 2 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // listing needs ReadAll, creating needs Add
    let (status, rooms) = app
        .send("GET", "/room-management/room/all", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rooms.as_array().unwrap().len(), 1);
    let (status, _) = app
        .send(
            "POST",
            "/material-management/material/create",
            Some(&token),
            Some(json!({ "name": "Whiteboard" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(
            "DELETE",
            &format!("/room-management/room/delete/{}", room_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(
            "DELETE",
            &format!("/room-management/room/delete/{}", room_id),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, usages) = app
        .send("GET", "/useMaterialRoom/getAll", Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(usages, json!([]));

    let (status, _) = app
        .send(
            "DELETE",
            &format!("/room-management/room/delete/{}", room_id),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, materials) = app
        .send("GET", "/material-management/material/all", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(materials[0]["name"], "Projector");

    let (status, _) = app
        .send(
            "DELETE",
            &format!("/material-management/material/delete/{}", material_id),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
