use crate::error::Result;
use crate::models::{
    Achievement, ContentType, CreateAchievementRequest, CreateGalleryItemRequest,
    CreateRegistrationRequest, GalleryItem, NewsItem, Registration, SiteSettings,
    UpdateRegistrationRequest,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, query_builder::QueryBuilder};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Repository Trait
///
/// Persistence contract behind both stores. Handlers only ever see `Arc<dyn Repository>`,
/// so the Postgres backend and the in-memory backend are interchangeable.
///
/// Listing order is part of the contract: news by `date` descending, everything else by
/// `created_at` descending, ties broken by `id` descending.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Content Store ---
    async fn list_news(&self) -> Result<Vec<NewsItem>>;
    async fn list_achievements(&self) -> Result<Vec<Achievement>>;
    async fn list_gallery(&self) -> Result<Vec<GalleryItem>>;

    /// `date` has already been resolved by the caller (absent dates become today).
    async fn create_news(&self, title: String, category: String, date: String) -> Result<NewsItem>;
    async fn create_achievement(&self, req: CreateAchievementRequest) -> Result<Achievement>;
    async fn create_gallery_item(&self, req: CreateGalleryItemRequest) -> Result<GalleryItem>;

    /// Returns false when no row matched. Settings is not a collection and never matches.
    async fn delete_content(&self, kind: ContentType, id: i64) -> Result<bool>;

    /// Returns the stored settings, or the defaults when nothing was saved yet.
    async fn get_settings(&self) -> Result<SiteSettings>;
    async fn update_settings(&self, settings: SiteSettings) -> Result<SiteSettings>;

    // --- Registration Store ---
    async fn list_registrations(&self) -> Result<Vec<Registration>>;
    /// Expects a payload already passed through `CreateRegistrationRequest::normalized`.
    async fn create_registration(&self, req: CreateRegistrationRequest) -> Result<Registration>;
    /// Applies only the `Some` fields. Returns `None` when the id is unknown.
    async fn update_registration(
        &self,
        id: i64,
        update: UpdateRegistrationRequest,
    ) -> Result<Option<Registration>>;
    async fn delete_registration(&self, id: i64) -> Result<bool>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// `Repository` backed by PostgreSQL. Schema lives in `migrations/`.
pub struct PostgresRepository {
    pool: PgPool,
}

const REGISTRATION_COLUMNS: &str =
    "id, first_name, last_name, user_id, created_at, is_admin, position, department";

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies pending migrations from `migrations/`.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn list_news(&self) -> Result<Vec<NewsItem>> {
        let news = sqlx::query_as::<_, NewsItem>(
            "SELECT id, title, category, date, created_at FROM news ORDER BY date DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(news)
    }

    async fn list_achievements(&self) -> Result<Vec<Achievement>> {
        let achievements = sqlx::query_as::<_, Achievement>(
            "SELECT id, title, recipient, date, created_at FROM achievements ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(achievements)
    }

    async fn list_gallery(&self) -> Result<Vec<GalleryItem>> {
        let gallery = sqlx::query_as::<_, GalleryItem>(
            "SELECT id, image_url, caption, created_at FROM gallery ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(gallery)
    }

    async fn create_news(&self, title: String, category: String, date: String) -> Result<NewsItem> {
        let item = sqlx::query_as::<_, NewsItem>(
            "INSERT INTO news (title, category, date) VALUES ($1, $2, $3) RETURNING id, title, category, date, created_at",
        )
        .bind(title)
        .bind(category)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;
        Ok(item)
    }

    async fn create_achievement(&self, req: CreateAchievementRequest) -> Result<Achievement> {
        let item = sqlx::query_as::<_, Achievement>(
            "INSERT INTO achievements (title, recipient, date) VALUES ($1, $2, $3) RETURNING id, title, recipient, date, created_at",
        )
        .bind(req.title)
        .bind(req.recipient)
        .bind(req.date)
        .fetch_one(&self.pool)
        .await?;
        Ok(item)
    }

    async fn create_gallery_item(&self, req: CreateGalleryItemRequest) -> Result<GalleryItem> {
        let item = sqlx::query_as::<_, GalleryItem>(
            "INSERT INTO gallery (image_url, caption) VALUES ($1, $2) RETURNING id, image_url, caption, created_at",
        )
        .bind(req.image_url)
        .bind(req.caption)
        .fetch_one(&self.pool)
        .await?;
        Ok(item)
    }

    /// The table name comes from a closed enum, never from request text.
    async fn delete_content(&self, kind: ContentType, id: i64) -> Result<bool> {
        let table = match kind {
            ContentType::News => "news",
            ContentType::Achievements => "achievements",
            ContentType::Gallery => "gallery",
            ContentType::Settings => return Ok(false),
        };

        let sql = format!("DELETE FROM {} WHERE id = $1", table);
        let res = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(res.rows_affected() > 0)
    }

    async fn get_settings(&self) -> Result<SiteSettings> {
        let settings = sqlx::query_as::<_, SiteSettings>(
            "SELECT hero_title, hero_subtitle, about_mission, about_history FROM site_settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(settings.unwrap_or_default())
    }

    async fn update_settings(&self, settings: SiteSettings) -> Result<SiteSettings> {
        let saved = sqlx::query_as::<_, SiteSettings>(
            r#"
            INSERT INTO site_settings (id, hero_title, hero_subtitle, about_mission, about_history)
            VALUES (1, $1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                hero_title = EXCLUDED.hero_title,
                hero_subtitle = EXCLUDED.hero_subtitle,
                about_mission = EXCLUDED.about_mission,
                about_history = EXCLUDED.about_history,
                updated_at = NOW()
            RETURNING hero_title, hero_subtitle, about_mission, about_history
            "#,
        )
        .bind(settings.hero_title)
        .bind(settings.hero_subtitle)
        .bind(settings.about_mission)
        .bind(settings.about_history)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved)
    }

    async fn list_registrations(&self) -> Result<Vec<Registration>> {
        let sql = format!(
            "SELECT {} FROM registrations ORDER BY created_at DESC, id DESC",
            REGISTRATION_COLUMNS
        );
        let registrations = sqlx::query_as::<_, Registration>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(registrations)
    }

    async fn create_registration(&self, req: CreateRegistrationRequest) -> Result<Registration> {
        let sql = format!(
            "INSERT INTO registrations (first_name, last_name, user_id) VALUES ($1, $2, $3) RETURNING {}",
            REGISTRATION_COLUMNS
        );
        let registration = sqlx::query_as::<_, Registration>(&sql)
            .bind(req.first_name)
            .bind(req.last_name)
            .bind(req.user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(registration)
    }

    /// Builds the SET clause from the present fields only, binding every value.
    async fn update_registration(
        &self,
        id: i64,
        update: UpdateRegistrationRequest,
    ) -> Result<Option<Registration>> {
        if update.is_empty() {
            return Ok(None);
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE registrations SET ");
        {
            let mut sets = builder.separated(", ");
            if let Some(is_admin) = update.is_admin {
                sets.push("is_admin = ");
                sets.push_bind_unseparated(is_admin);
            }
            if let Some(first_name) = update.first_name {
                sets.push("first_name = ");
                sets.push_bind_unseparated(first_name);
            }
            if let Some(last_name) = update.last_name {
                sets.push("last_name = ");
                sets.push_bind_unseparated(last_name);
            }
            if let Some(user_id) = update.user_id {
                sets.push("user_id = ");
                sets.push_bind_unseparated(user_id);
            }
            if let Some(position) = update.position {
                sets.push("position = ");
                sets.push_bind_unseparated(position);
            }
            if let Some(department) = update.department {
                sets.push("department = ");
                sets.push_bind_unseparated(department);
            }
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(" RETURNING ");
        builder.push(REGISTRATION_COLUMNS);

        let registration = builder
            .build_query_as::<Registration>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(registration)
    }

    async fn delete_registration(&self, id: i64) -> Result<bool> {
        let res = sqlx::query("DELETE FROM registrations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

// --- In-Memory Implementation ---

#[derive(Default)]
struct Tables {
    next_id: i64,
    news: Vec<NewsItem>,
    achievements: Vec<Achievement>,
    gallery: Vec<GalleryItem>,
    settings: Option<SiteSettings>,
    registrations: Vec<Registration>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

fn newest_first<T>(items: &[T], key: impl Fn(&T) -> (DateTime<Utc>, i64)) -> Vec<T>
where
    T: Clone,
{
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| key(b).cmp(&key(a)));
    sorted
}

/// InMemoryRepository
///
/// `Repository` kept in process memory. Used when no `DATABASE_URL` is configured in the
/// local environment, and by the test suite. Ids are allocated from one shared counter.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn list_news(&self) -> Result<Vec<NewsItem>> {
        let tables = self.tables.read().await;
        let mut news = tables.news.clone();
        news.sort_by(|a, b| (&b.date, b.id).cmp(&(&a.date, a.id)));
        Ok(news)
    }

    async fn list_achievements(&self) -> Result<Vec<Achievement>> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.achievements, |a| (a.created_at, a.id)))
    }

    async fn list_gallery(&self) -> Result<Vec<GalleryItem>> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.gallery, |g| (g.created_at, g.id)))
    }

    async fn create_news(&self, title: String, category: String, date: String) -> Result<NewsItem> {
        let mut tables = self.tables.write().await;
        let item = NewsItem {
            id: tables.allocate_id(),
            title,
            category,
            date,
            created_at: Utc::now(),
        };
        tables.news.push(item.clone());
        Ok(item)
    }

    async fn create_achievement(&self, req: CreateAchievementRequest) -> Result<Achievement> {
        let mut tables = self.tables.write().await;
        let item = Achievement {
            id: tables.allocate_id(),
            title: req.title,
            recipient: req.recipient,
            date: req.date,
            created_at: Utc::now(),
        };
        tables.achievements.push(item.clone());
        Ok(item)
    }

    async fn create_gallery_item(&self, req: CreateGalleryItemRequest) -> Result<GalleryItem> {
        let mut tables = self.tables.write().await;
        let item = GalleryItem {
            id: tables.allocate_id(),
            image_url: req.image_url,
            caption: req.caption,
            created_at: Utc::now(),
        };
        tables.gallery.push(item.clone());
        Ok(item)
    }

    async fn delete_content(&self, kind: ContentType, id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let removed = match kind {
            ContentType::News => remove_where(&mut tables.news, |n| n.id == id),
            ContentType::Achievements => remove_where(&mut tables.achievements, |a| a.id == id),
            ContentType::Gallery => remove_where(&mut tables.gallery, |g| g.id == id),
            ContentType::Settings => false,
        };
        Ok(removed)
    }

    async fn get_settings(&self) -> Result<SiteSettings> {
        let tables = self.tables.read().await;
        Ok(tables.settings.clone().unwrap_or_default())
    }

    async fn update_settings(&self, settings: SiteSettings) -> Result<SiteSettings> {
        let mut tables = self.tables.write().await;
        tables.settings = Some(settings.clone());
        Ok(settings)
    }

    async fn list_registrations(&self) -> Result<Vec<Registration>> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.registrations, |r| (r.created_at, r.id)))
    }

    async fn create_registration(&self, req: CreateRegistrationRequest) -> Result<Registration> {
        let mut tables = self.tables.write().await;
        let registration = Registration {
            id: tables.allocate_id(),
            first_name: req.first_name,
            last_name: req.last_name,
            user_id: req.user_id,
            created_at: Utc::now(),
            is_admin: false,
            position: None,
            department: None,
        };
        tables.registrations.push(registration.clone());
        Ok(registration)
    }

    async fn update_registration(
        &self,
        id: i64,
        update: UpdateRegistrationRequest,
    ) -> Result<Option<Registration>> {
        if update.is_empty() {
            return Ok(None);
        }

        let mut tables = self.tables.write().await;
        let Some(registration) = tables.registrations.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };

        if let Some(is_admin) = update.is_admin {
            registration.is_admin = is_admin;
        }
        if let Some(first_name) = update.first_name {
            registration.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            registration.last_name = last_name;
        }
        if let Some(user_id) = update.user_id {
            registration.user_id = user_id;
        }
        if update.position.is_some() {
            registration.position = update.position;
        }
        if update.department.is_some() {
            registration.department = update.department;
        }

        Ok(Some(registration.clone()))
    }

    async fn delete_registration(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        Ok(remove_where(&mut tables.registrations, |r| r.id == id))
    }
}

fn remove_where<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|item| !pred(item));
    items.len() != before
}
