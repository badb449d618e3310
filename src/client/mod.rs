//! Console layer.
//!
//! `StoreClient` speaks the two store contracts over HTTP and decodes every response into
//! the explicit entity records. The views built on top of it (`site`, `admin`, `profile`)
//! own their snapshots as `ViewState` values and report the outcome of each user action
//! as a `Notification`.

pub mod admin;
pub mod profile;
pub mod site;

pub use admin::{AchievementForm, AdminConsole, GalleryForm, NewsForm};
pub use profile::ProfileView;
pub use site::{PublicSite, RegistrationForm};

use crate::config::AppConfig;
use crate::models::{
    Achievement, ContentType, CreateAchievementRequest, CreateGalleryItemRequest,
    CreateNewsRequest, CreateRegistrationRequest, ErrorBody, GalleryItem, NewsItem,
    Registration, SiteSettings, UpdateRegistrationRequest,
};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Shown for any transport failure.
pub const CONNECTION_PROBLEM: &str = "Проблема с подключением к серверу";

/// ClientError
///
/// Why a store call failed. `Status` keeps the `error` field of the body when the store
/// sent one.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("store answered {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Status { status: u16, message: Option<String> },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// The `error` message the store put in its body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Notification for a failed action: connectivity text for transport failures,
    /// `fallback` for everything else.
    pub fn notify(&self, fallback: &str) -> Notification {
        match self {
            ClientError::Network(_) => Notification::error(CONNECTION_PROBLEM),
            _ => Notification::error(fallback),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Notification
///
/// Outcome of a user action, ready to be shown as a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: "Успех".to_string(),
            description: description.into(),
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: "Ошибка".to_string(),
            description: description.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NotificationKind::Success
    }
}

/// ViewState
///
/// Snapshot of one remotely-owned value. `Failed` is terminal until the next manual
/// refresh; nothing retries on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            ViewState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ViewState::Failed(_))
    }

    pub(crate) fn from_result(result: Result<T, ClientError>) -> Self {
        match result {
            Ok(value) => ViewState::Loaded(value),
            Err(err) => ViewState::Failed(err.to_string()),
        }
    }
}

/// StoreClient
///
/// HTTP client for the Content Store and the Registration Store, addressed by their base
/// URLs. No timeouts, no retries: a failed call is reported once and left to the caller.
#[derive(Clone, Debug)]
pub struct StoreClient {
    http: reqwest::Client,
    content_url: String,
    register_url: String,
}

impl StoreClient {
    pub fn new(content_url: impl Into<String>, register_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            content_url: content_url.into(),
            register_url: register_url.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.content_api_url, &config.register_api_url)
    }

    // --- Content Store ---

    pub async fn list_news(&self) -> Result<Vec<NewsItem>, ClientError> {
        self.list_content(ContentType::News).await
    }

    pub async fn list_achievements(&self) -> Result<Vec<Achievement>, ClientError> {
        self.list_content(ContentType::Achievements).await
    }

    pub async fn list_gallery(&self) -> Result<Vec<GalleryItem>, ClientError> {
        self.list_content(ContentType::Gallery).await
    }

    pub async fn get_settings(&self) -> Result<SiteSettings, ClientError> {
        self.list_content(ContentType::Settings).await
    }

    async fn list_content<T: DeserializeOwned>(&self, kind: ContentType) -> Result<T, ClientError> {
        let response = self
            .http
            .get(&self.content_url)
            .query(&[("type", kind.as_str())])
            .send()
            .await?;
        decode(response).await
    }

    // Mutations succeed on any 2xx; whatever body comes back is not interpreted.

    pub async fn create_news(&self, req: &CreateNewsRequest) -> Result<(), ClientError> {
        self.create_content(ContentType::News, req).await
    }

    pub async fn create_achievement(&self, req: &CreateAchievementRequest) -> Result<(), ClientError> {
        self.create_content(ContentType::Achievements, req).await
    }

    pub async fn create_gallery_item(&self, req: &CreateGalleryItemRequest) -> Result<(), ClientError> {
        self.create_content(ContentType::Gallery, req).await
    }

    async fn create_content<B>(&self, kind: ContentType, body: &B) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .http
            .post(&self.content_url)
            .query(&[("type", kind.as_str())])
            .json(body)
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    pub async fn update_settings(&self, settings: &SiteSettings) -> Result<(), ClientError> {
        let response = self
            .http
            .put(&self.content_url)
            .query(&[("type", ContentType::Settings.as_str())])
            .json(settings)
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    pub async fn delete_content(&self, kind: ContentType, id: i64) -> Result<(), ClientError> {
        let id = id.to_string();
        let response = self
            .http
            .delete(&self.content_url)
            .query(&[("type", kind.as_str()), ("id", id.as_str())])
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    // --- Registration Store ---

    pub async fn list_registrations(&self) -> Result<Vec<Registration>, ClientError> {
        let response = self.http.get(&self.register_url).send().await?;
        decode(response).await
    }

    pub async fn create_registration(&self, req: &CreateRegistrationRequest) -> Result<(), ClientError> {
        let response = self.http.post(&self.register_url).json(req).send().await?;
        check(response).await.map(|_| ())
    }

    pub async fn update_registration(
        &self,
        id: i64,
        update: &UpdateRegistrationRequest,
    ) -> Result<(), ClientError> {
        let id = id.to_string();
        let response = self
            .http
            .put(&self.register_url)
            .query(&[("id", id.as_str())])
            .json(update)
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    pub async fn delete_registration(&self, id: i64) -> Result<(), ClientError> {
        let id = id.to_string();
        let response = self
            .http
            .delete(&self.register_url)
            .query(&[("id", id.as_str())])
            .send()
            .await?;
        check(response).await.map(|_| ())
    }
}

/// Reads the body of a successful response, or turns a non-success status into
/// `ClientError::Status` carrying the body's `error` field. An error body that is not JSON
/// leaves the message empty.
async fn check(response: reqwest::Response) -> Result<Vec<u8>, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .ok()
            .map(|body| body.error);
        tracing::debug!(status = status.as_u16(), ?message, "store call failed");
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }

    Ok(bytes.to_vec())
}

/// Like `check`, then decodes the body into the expected record. Only reads use this.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let bytes = check(response).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
