use axum::{
    Json, Router,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use lspd_portal::{
    client::{AdminConsole, PublicSite, RegistrationForm, StoreClient, ViewState},
    models::{ContentType, SiteSettings},
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

// --- Recording stub store ---

#[derive(Debug, Clone, PartialEq)]
struct Recorded {
    method: Method,
    path: String,
    query: String,
    body: Option<Value>,
}

/// How the stub answers mutations. Reads always succeed.
#[derive(Clone, Copy, Default)]
enum Reply {
    /// 2xx with `{"message": "ok"}`, which is no entity record.
    #[default]
    Accept,
    /// The given status with `{"error": "duplicate"}`.
    Reject(StatusCode),
    /// The given status with a plain-text body.
    Garbled(StatusCode),
}

#[derive(Clone, Default)]
struct Stub {
    calls: Arc<Mutex<Vec<Recorded>>>,
    reply: Reply,
    // When set, reading the settings answers 500.
    settings_down: bool,
}

impl Stub {
    fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }

    fn mutations(&self) -> Vec<Recorded> {
        self.calls()
            .into_iter()
            .filter(|call| call.method != Method::GET)
            .collect()
    }
}

async fn record(State(stub): State<Stub>, method: Method, uri: Uri, body: String) -> Response {
    let query = uri.query().unwrap_or_default().to_string();
    stub.calls.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: uri.path().to_string(),
        query: query.clone(),
        body: serde_json::from_str(&body).ok(),
    });

    if method == Method::GET {
        return if query.contains("type=settings") && stub.settings_down {
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        } else if query.contains("type=settings") {
            Json(SiteSettings::default()).into_response()
        } else {
            Json(json!([])).into_response()
        };
    }

    match stub.reply {
        Reply::Accept => {
            let status = if method == Method::POST {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, Json(json!({ "message": "ok" }))).into_response()
        }
        Reply::Reject(status) => (status, Json(json!({ "error": "duplicate" }))).into_response(),
        Reply::Garbled(status) => (status, "oops").into_response(),
    }
}

async fn spawn_stub(reply: Reply) -> (Stub, StoreClient) {
    spawn(Stub {
        reply,
        ..Stub::default()
    })
    .await
}

async fn spawn(stub: Stub) -> (Stub, StoreClient) {
    let router = Router::new().fallback(record).with_state(stub.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let address = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let client = StoreClient::new(format!("{address}/content"), format!("{address}/register"));
    (stub, client)
}

// --- Registration submission ---

#[tokio::test]
async fn test_registration_success_clears_form() {
    let (stub, client) = spawn_stub(Reply::Accept).await;
    let mut site = PublicSite::new(client);
    site.registration = RegistrationForm::new("John", "Doe", "12345");

    let notification = site.submit_registration().await;

    assert!(notification.is_success());
    assert!(site.registration.is_empty());
    assert_eq!(
        stub.mutations(),
        vec![Recorded {
            method: Method::POST,
            path: "/register".to_string(),
            query: String::new(),
            body: Some(json!({ "first_name": "John", "last_name": "Doe", "user_id": "12345" })),
        }]
    );
}

#[tokio::test]
async fn test_registration_error_surfaces_store_message() {
    let (_stub, client) = spawn_stub(Reply::Reject(StatusCode::CONFLICT)).await;
    let mut site = PublicSite::new(client);
    site.registration = RegistrationForm::new("John", "Doe", "12345");

    let notification = site.submit_registration().await;

    assert!(!notification.is_success());
    assert!(notification.description.contains("duplicate"));
    assert_eq!(site.registration, RegistrationForm::new("John", "Doe", "12345"));
}

#[tokio::test]
async fn test_registration_success_needs_no_record_in_reply() {
    let (stub, client) = spawn_stub(Reply::Accept).await;
    let mut site = PublicSite::new(client);
    site.registration = RegistrationForm::new("John", "Doe", "12345");

    let notification = site.submit_registration().await;

    assert_eq!(notification.description, "Вы зарегистрированы на сайте LSPD");
    assert!(site.registration.is_empty());
    assert_eq!(stub.mutations().len(), 1);
}

#[tokio::test]
async fn test_registration_error_without_json_uses_default_message() {
    let (_stub, client) = spawn_stub(Reply::Garbled(StatusCode::INTERNAL_SERVER_ERROR)).await;
    let mut site = PublicSite::new(client);
    site.registration = RegistrationForm::new("John", "Doe", "12345");

    let notification = site.submit_registration().await;

    assert!(!notification.is_success());
    assert_eq!(notification.description, "Не удалось зарегистрироваться");
    assert_eq!(site.registration, RegistrationForm::new("John", "Doe", "12345"));
}

// --- Admin role ---

#[tokio::test]
async fn test_grant_admin_sends_role_assignment() {
    let (stub, client) = spawn_stub(Reply::Accept).await;
    let mut admin = AdminConsole::new(client);

    admin.set_admin(42, true).await;

    let puts = stub.mutations();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].method, Method::PUT);
    assert_eq!(puts[0].query, "id=42");
    assert_eq!(
        puts[0].body,
        Some(json!({
            "is_admin": true,
            "position": "Администратор департамента",
            "department": "Административный"
        }))
    );
}

#[tokio::test]
async fn test_revoke_admin_sends_flag_only() {
    let (stub, client) = spawn_stub(Reply::Accept).await;
    let mut admin = AdminConsole::new(client);

    admin.set_admin(42, false).await;

    let puts = stub.mutations();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].body, Some(json!({ "is_admin": false })));
}

#[tokio::test]
async fn test_role_change_refetches_registrations() {
    let (stub, client) = spawn_stub(Reply::Accept).await;
    let mut admin = AdminConsole::new(client);

    admin.set_admin(42, true).await;

    let last = stub.calls().pop().unwrap();
    assert_eq!((last.method, last.path.as_str()), (Method::GET, "/register"));
    assert_eq!(admin.registrations, ViewState::Loaded(vec![]));
}

#[tokio::test]
async fn test_failed_role_change_skips_refetch() {
    let (stub, client) = spawn_stub(Reply::Reject(StatusCode::INTERNAL_SERVER_ERROR)).await;
    let mut admin = AdminConsole::new(client);

    let notification = admin.set_admin(42, true).await;

    assert_eq!(notification.description, "Не удалось изменить роль");
    assert_eq!(stub.calls().len(), 1);
    assert!(admin.registrations.is_loading());
}

// --- Content CRUD ---

#[tokio::test]
async fn test_delete_gallery_item_then_refetch() {
    let (stub, client) = spawn_stub(Reply::Accept).await;
    let mut admin = AdminConsole::new(client);

    admin.delete_content(ContentType::Gallery, 7).await;

    let calls = stub.calls();
    assert_eq!(calls[0].method, Method::DELETE);
    assert_eq!(calls[0].path, "/content");
    assert_eq!(calls[0].query, "type=gallery&id=7");
    assert!(
        calls[1..]
            .iter()
            .any(|c| c.method == Method::GET && c.query == "type=gallery")
    );
}

#[tokio::test]
async fn test_create_posts_empty_strings_unmodified() {
    let (stub, client) = spawn_stub(Reply::Accept).await;
    let mut admin = AdminConsole::new(client);

    admin.create_news().await;
    admin.create_achievement().await;
    admin.create_gallery_item().await;

    let posts: Vec<(String, Option<Value>)> = stub
        .mutations()
        .into_iter()
        .map(|call| (call.query, call.body))
        .collect();
    assert_eq!(
        posts,
        vec![
            (
                "type=news".to_string(),
                Some(json!({ "title": "", "category": "", "date": "" }))
            ),
            (
                "type=achievements".to_string(),
                Some(json!({ "title": "", "recipient": "", "date": "" }))
            ),
            (
                "type=gallery".to_string(),
                Some(json!({ "image_url": "", "caption": "" }))
            ),
        ]
    );
}

#[tokio::test]
async fn test_create_success_needs_no_record_in_reply() {
    let (stub, client) = spawn_stub(Reply::Accept).await;
    let mut admin = AdminConsole::new(client);
    admin.news_form.title = "Рейд".to_string();

    let notification = admin.create_news().await;

    assert_eq!(notification.description, "Новость добавлена");
    assert_eq!(admin.news_form.title, "");
    assert!(
        stub.calls()
            .iter()
            .any(|c| c.method == Method::GET && c.query == "type=news")
    );
    assert_eq!(admin.news, ViewState::Loaded(vec![]));
}

#[tokio::test]
async fn test_assignment_success_needs_no_record_in_reply() {
    let (stub, client) = spawn_stub(Reply::Accept).await;
    let mut admin = AdminConsole::new(client);

    let notification = admin.set_assignment(3, "Сержант", "Патрульный").await;

    assert_eq!(notification.description, "Данные обновлены");
    let last = stub.calls().pop().unwrap();
    assert_eq!((last.method, last.path.as_str()), (Method::GET, "/register"));
}

#[tokio::test]
async fn test_failed_create_keeps_form() {
    let (_stub, client) = spawn_stub(Reply::Reject(StatusCode::BAD_REQUEST)).await;
    let mut admin = AdminConsole::new(client);
    admin.news_form.title = "Draft".to_string();

    let notification = admin.create_news().await;

    assert_eq!(notification.description, "Не удалось добавить новость");
    assert_eq!(admin.news_form.title, "Draft");
}

#[tokio::test]
async fn test_save_settings_sends_whole_form() {
    let (stub, client) = spawn_stub(Reply::Accept).await;
    let mut admin = AdminConsole::new(client);
    admin.settings_form.hero_subtitle = "Служить и защищать".to_string();

    let notification = admin.save_settings().await;
    assert_eq!(notification.description, "Настройки сохранены");

    let put = &stub.mutations()[0];
    assert_eq!(put.query, "type=settings");
    assert_eq!(
        put.body.as_ref().and_then(|b| b["hero_subtitle"].as_str()),
        Some("Служить и защищать")
    );
    assert_eq!(
        put.body.as_ref().and_then(|b| b["hero_title"].as_str()),
        Some("Los Santos Police Department")
    );

    // The re-fetch replaces the form with what the store holds.
    let last = stub.calls().pop().unwrap();
    assert_eq!((last.method, last.query.as_str()), (Method::GET, "type=settings"));
    assert_eq!(admin.settings_form, SiteSettings::default());
}

// --- Initial load ---

#[tokio::test]
async fn test_load_reports_settings_failure() {
    let (_stub, client) = spawn(Stub {
        settings_down: true,
        ..Stub::default()
    })
    .await;
    let mut admin = AdminConsole::new(client);

    let notification = admin.load().await.expect("settings failure is reported");

    assert_eq!(notification.description, "Не удалось загрузить настройки");
    assert!(admin.settings.is_failed());
    assert_eq!(admin.news, ViewState::Loaded(vec![]));
}
