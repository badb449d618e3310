use super::{ClientError, Notification, StoreClient, ViewState};
use crate::models::{
    Achievement, ContentType, CreateAchievementRequest, CreateGalleryItemRequest,
    CreateNewsRequest, GalleryItem, NewsItem, Registration, SiteSettings,
    UpdateRegistrationRequest,
};

// --- Forms ---
//
// Admin forms carry no validation at all: whatever is typed, empty strings included, is
// posted unmodified.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsForm {
    pub title: String,
    pub category: String,
    pub date: String,
}

impl NewsForm {
    fn to_request(&self) -> CreateNewsRequest {
        CreateNewsRequest {
            title: self.title.clone(),
            category: self.category.clone(),
            date: Some(self.date.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementForm {
    pub title: String,
    pub recipient: String,
    pub date: String,
}

impl AchievementForm {
    fn to_request(&self) -> CreateAchievementRequest {
        CreateAchievementRequest {
            title: self.title.clone(),
            recipient: self.recipient.clone(),
            date: self.date.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryForm {
    pub image_url: String,
    pub caption: String,
}

impl GalleryForm {
    fn to_request(&self) -> CreateGalleryItemRequest {
        CreateGalleryItemRequest {
            image_url: self.image_url.clone(),
            caption: Some(self.caption.clone()),
        }
    }
}

/// AdminConsole
///
/// State behind the admin panel. Every collection is a snapshot replaced wholesale by a
/// re-fetch after each successful mutation; nothing is patched locally. A failed mutation
/// leaves the snapshot as last fetched.
#[derive(Debug)]
pub struct AdminConsole {
    client: StoreClient,
    pub news: ViewState<Vec<NewsItem>>,
    pub achievements: ViewState<Vec<Achievement>>,
    pub gallery: ViewState<Vec<GalleryItem>>,
    pub registrations: ViewState<Vec<Registration>>,
    pub settings: ViewState<SiteSettings>,

    pub news_form: NewsForm,
    pub achievement_form: AchievementForm,
    pub gallery_form: GalleryForm,
    /// Editable copy of the settings, seeded by every settings fetch.
    pub settings_form: SiteSettings,
}

impl AdminConsole {
    pub fn new(client: StoreClient) -> Self {
        Self {
            client,
            news: ViewState::Loading,
            achievements: ViewState::Loading,
            gallery: ViewState::Loading,
            registrations: ViewState::Loading,
            settings: ViewState::Loading,
            news_form: NewsForm::default(),
            achievement_form: AchievementForm::default(),
            gallery_form: GalleryForm::default(),
            settings_form: SiteSettings::default(),
        }
    }

    /// Initial load of every tab.
    pub async fn load(&mut self) -> Option<Notification> {
        let content = self.refresh_content().await;
        let registrations = self.refresh_registrations().await;
        let settings = self.refresh_settings().await;
        content.or(registrations).or(settings)
    }

    /// Re-fetches news, achievements and gallery together.
    pub async fn refresh_content(&mut self) -> Option<Notification> {
        let (news, achievements, gallery) = tokio::join!(
            self.client.list_news(),
            self.client.list_achievements(),
            self.client.list_gallery(),
        );

        let notification = [
            news.as_ref().err(),
            achievements.as_ref().err(),
            gallery.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        .next()
        .map(|err| err.notify("Не удалось загрузить контент"));

        self.news = ViewState::from_result(news);
        self.achievements = ViewState::from_result(achievements);
        self.gallery = ViewState::from_result(gallery);
        notification
    }

    pub async fn refresh_registrations(&mut self) -> Option<Notification> {
        let result = self.client.list_registrations().await;
        let notification = result
            .as_ref()
            .err()
            .map(|err| err.notify("Не удалось загрузить регистрации"));
        self.registrations = ViewState::from_result(result);
        notification
    }

    pub async fn refresh_settings(&mut self) -> Option<Notification> {
        match self.client.get_settings().await {
            Ok(settings) => {
                self.settings_form = settings.clone();
                self.settings = ViewState::Loaded(settings);
                None
            }
            Err(err) => {
                let notification = err.notify("Не удалось загрузить настройки");
                self.settings = ViewState::Failed(err.to_string());
                Some(notification)
            }
        }
    }

    // --- Content CRUD ---

    pub async fn create_news(&mut self) -> Notification {
        let result = self.client.create_news(&self.news_form.to_request()).await;
        self.after_create(
            result,
            ContentType::News,
            "Новость добавлена",
            "Не удалось добавить новость",
        )
        .await
    }

    pub async fn create_achievement(&mut self) -> Notification {
        let result = self
            .client
            .create_achievement(&self.achievement_form.to_request())
            .await;
        self.after_create(
            result,
            ContentType::Achievements,
            "Награда добавлена",
            "Не удалось добавить награду",
        )
        .await
    }

    pub async fn create_gallery_item(&mut self) -> Notification {
        let result = self
            .client
            .create_gallery_item(&self.gallery_form.to_request())
            .await;
        self.after_create(
            result,
            ContentType::Gallery,
            "Изображение добавлено",
            "Не удалось добавить изображение",
        )
        .await
    }

    /// On success: clear the form that produced the record, then re-fetch.
    async fn after_create(
        &mut self,
        result: Result<(), ClientError>,
        kind: ContentType,
        success: &str,
        failure: &str,
    ) -> Notification {
        match result {
            Ok(()) => {
                match kind {
                    ContentType::News => self.news_form = NewsForm::default(),
                    ContentType::Achievements => self.achievement_form = AchievementForm::default(),
                    ContentType::Gallery => self.gallery_form = GalleryForm::default(),
                    ContentType::Settings => {}
                }
                self.refresh_content().await;
                Notification::success(success)
            }
            Err(err) => err.notify(failure),
        }
    }

    pub async fn delete_content(&mut self, kind: ContentType, id: i64) -> Notification {
        match self.client.delete_content(kind, id).await {
            Ok(()) => {
                self.refresh_content().await;
                Notification::success("Удалено")
            }
            Err(err) => err.notify("Не удалось удалить"),
        }
    }

    /// Sends the whole settings form; settings have no create or delete.
    pub async fn save_settings(&mut self) -> Notification {
        match self.client.update_settings(&self.settings_form).await {
            Ok(()) => {
                self.refresh_settings().await;
                Notification::success("Настройки сохранены")
            }
            Err(err) => err.notify("Не удалось сохранить настройки"),
        }
    }

    // --- Registrations ---

    /// set_admin
    ///
    /// Flips the admin flag of one registration. Granting also resets position and
    /// department to the administrative ones; revoking touches nothing else.
    pub async fn set_admin(&mut self, id: i64, is_admin: bool) -> Notification {
        let update = UpdateRegistrationRequest::admin_flag(is_admin);

        match self.client.update_registration(id, &update).await {
            Ok(()) => {
                tracing::debug!(id, is_admin, "admin flag updated");
                self.refresh_registrations().await;
                Notification::success(if is_admin {
                    "Роль администратора выдана"
                } else {
                    "Роль администратора удалена"
                })
            }
            Err(err) => err.notify("Не удалось изменить роль"),
        }
    }

    /// Direct edit of position and department, independent of the admin flag.
    pub async fn set_assignment(&mut self, id: i64, position: &str, department: &str) -> Notification {
        let update = UpdateRegistrationRequest::assignment(position, department);

        match self.client.update_registration(id, &update).await {
            Ok(()) => {
                self.refresh_registrations().await;
                Notification::success("Данные обновлены")
            }
            Err(err) => err.notify("Не удалось обновить данные"),
        }
    }

    pub async fn delete_registration(&mut self, id: i64) -> Notification {
        match self.client.delete_registration(id).await {
            Ok(()) => {
                self.refresh_registrations().await;
                Notification::success("Регистрация удалена")
            }
            Err(err) => err.notify("Не удалось удалить"),
        }
    }
}
