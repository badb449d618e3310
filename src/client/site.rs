use super::{CONNECTION_PROBLEM, ClientError, Notification, StoreClient, ViewState};
use crate::models::{
    Achievement, CreateRegistrationRequest, GalleryItem, NewsItem, SiteSettings,
};

const REGISTRATION_FAILED: &str = "Не удалось зарегистрироваться";

/// RegistrationForm
///
/// The public sign-up form. Fields are sent exactly as typed; the store does the trimming
/// and the required-field check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub user_id: String,
}

impl RegistrationForm {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            user_id: user_id.into(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_empty() && self.last_name.is_empty() && self.user_id.is_empty()
    }

    pub fn to_request(&self) -> CreateRegistrationRequest {
        CreateRegistrationRequest {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            user_id: self.user_id.clone(),
        }
    }
}

/// PublicSite
///
/// State behind the landing page: the three content collections, the settings texts and
/// the registration form.
#[derive(Debug)]
pub struct PublicSite {
    client: StoreClient,
    pub news: ViewState<Vec<NewsItem>>,
    pub achievements: ViewState<Vec<Achievement>>,
    pub gallery: ViewState<Vec<GalleryItem>>,
    pub settings: ViewState<SiteSettings>,
    pub registration: RegistrationForm,
}

impl PublicSite {
    pub fn new(client: StoreClient) -> Self {
        Self {
            client,
            news: ViewState::Loading,
            achievements: ViewState::Loading,
            gallery: ViewState::Loading,
            settings: ViewState::Loading,
            registration: RegistrationForm::default(),
        }
    }

    /// Fetches every section concurrently. Each section ends up `Loaded` or `Failed` on its
    /// own; one failing section does not blank the others.
    pub async fn load(&mut self) {
        let (news, achievements, gallery, settings) = tokio::join!(
            self.client.list_news(),
            self.client.list_achievements(),
            self.client.list_gallery(),
            self.client.get_settings(),
        );

        self.news = ViewState::from_result(news);
        self.achievements = ViewState::from_result(achievements);
        self.gallery = ViewState::from_result(gallery);
        self.settings = ViewState::from_result(settings);
    }

    /// Hero and about texts, falling back to the defaults while settings are not loaded.
    pub fn settings_or_default(&self) -> SiteSettings {
        self.settings.loaded().cloned().unwrap_or_default()
    }

    /// submit_registration
    ///
    /// Posts the form. On success the form is cleared; on failure it is kept so the visitor
    /// can correct and resubmit. Nothing prevents submitting the same data twice.
    pub async fn submit_registration(&mut self) -> Notification {
        let request = self.registration.to_request();

        match self.client.create_registration(&request).await {
            Ok(()) => {
                tracing::debug!(user_id = %request.user_id, "registration submitted");
                self.registration.clear();
                Notification {
                    title: "Успешно!".to_string(),
                    ..Notification::success("Вы зарегистрированы на сайте LSPD")
                }
            }
            Err(ClientError::Network(_)) => Notification::error(CONNECTION_PROBLEM),
            Err(err) => Notification::error(err.server_message().unwrap_or(REGISTRATION_FAILED)),
        }
    }
}
