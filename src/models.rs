use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

/// Position assigned to a registration when the admin flag is granted.
pub const ADMIN_POSITION: &str = "Администратор департамента";
/// Department assigned to a registration when the admin flag is granted.
pub const ADMIN_DEPARTMENT: &str = "Административный";

// --- Content Store Schemas (Mapped to Database) ---

/// ContentType
///
/// The resource selector carried in the `type` query parameter of the content endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    News,
    Achievements,
    Gallery,
    Settings,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::News => "news",
            ContentType::Achievements => "achievements",
            ContentType::Gallery => "gallery",
            ContentType::Settings => "settings",
        }
    }

    /// Collections that support list/create/delete. Settings is a singleton.
    pub fn is_collection(&self) -> bool {
        !matches!(self, ContentType::Settings)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = UnknownContentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "news" => Ok(ContentType::News),
            "achievements" => Ok(ContentType::Achievements),
            "gallery" => Ok(ContentType::Gallery),
            "settings" => Ok(ContentType::Settings),
            other => Err(UnknownContentType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownContentType(pub String);

/// NewsItem
///
/// A news entry from the `news` table. `date` is free-form text supplied by the admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub date: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Achievement
///
/// An award record from the `achievements` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Achievement {
    pub id: i64,
    pub title: String,
    pub recipient: String,
    // Usually a year, never validated.
    pub date: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// GalleryItem
///
/// An image reference from the `gallery` table. The image itself lives elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct GalleryItem {
    pub id: i64,
    pub image_url: String,
    pub caption: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// SiteSettings
///
/// The singleton record holding the landing page texts. Stored as row `id = 1` of
/// `site_settings`; the id never leaves the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct SiteSettings {
    pub hero_title: String,
    pub hero_subtitle: String,
    pub about_mission: String,
    pub about_history: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            hero_title: "Los Santos Police Department".to_string(),
            hero_subtitle: "Защищая и служа городу".to_string(),
            about_mission: String::new(),
            about_history: String::new(),
        }
    }
}

// --- Registration Store Schemas ---

/// Registration
///
/// A sign-up record from the `registrations` table. `user_id` is the member's in-game
/// identifier and is not unique. `is_admin` is the only access-control signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Registration {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub user_id: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    pub is_admin: bool,
    pub position: Option<String>,
    pub department: Option<String>,
}

// --- Request Payloads (Input Schemas) ---

/// CreateNewsRequest
///
/// Body of `POST /content?type=news`. An absent `date` is filled with the current date by
/// the handler; an empty string is kept as is.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateNewsRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// CreateAchievementRequest
///
/// Body of `POST /content?type=achievements`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateAchievementRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub date: String,
}

/// CreateGalleryItemRequest
///
/// Body of `POST /content?type=gallery`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateGalleryItemRequest {
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// CreateRegistrationRequest
///
/// Body of `POST /register`. Missing keys decode as empty strings so that the handler can
/// answer with its own "all fields are required" message.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateRegistrationRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub user_id: String,
}

impl CreateRegistrationRequest {
    /// Trims every field. Returns `None` when any field is blank after trimming.
    pub fn normalized(&self) -> Option<Self> {
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        let user_id = self.user_id.trim();

        if first_name.is_empty() || last_name.is_empty() || user_id.is_empty() {
            return None;
        }

        Some(Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            user_id: user_id.to_string(),
        })
    }
}

/// UpdateRegistrationRequest
///
/// Partial update payload for `PUT /register?id=N`. Absent keys are left untouched by the
/// store, and `skip_serializing_if` keeps them out of the JSON the console sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateRegistrationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl UpdateRegistrationRequest {
    /// admin_flag
    ///
    /// Builds the payload sent when the admin switch is toggled. Granting also overwrites
    /// the position and department with the fixed administrative values; revoking sends
    /// the flag alone and leaves whatever position/department the record had.
    pub fn admin_flag(is_admin: bool) -> Self {
        if is_admin {
            Self {
                is_admin: Some(true),
                position: Some(ADMIN_POSITION.to_string()),
                department: Some(ADMIN_DEPARTMENT.to_string()),
                ..Self::default()
            }
        } else {
            Self {
                is_admin: Some(false),
                ..Self::default()
            }
        }
    }

    /// Direct edit of the role metadata, with no defaulting.
    pub fn assignment(position: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            position: Some(position.into()),
            department: Some(department.into()),
            ..Self::default()
        }
    }

    /// Trims the identity fields and drops the ones that end up blank. `is_admin`,
    /// `position` and `department` pass through unchanged.
    pub fn normalized(self) -> Self {
        fn non_blank(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            is_admin: self.is_admin,
            first_name: non_blank(self.first_name),
            last_name: non_blank(self.last_name),
            user_id: non_blank(self.user_id),
            position: self.position,
            department: self.department,
        }
    }

    /// True when the payload carries nothing the store could apply.
    pub fn is_empty(&self) -> bool {
        self.is_admin.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.user_id.is_none()
            && self.position.is_none()
            && self.department.is_none()
    }
}

// --- Response Envelopes ---

/// MessageResponse
///
/// Body of successful deletes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// ErrorBody
///
/// Every error response from either store has this shape.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// HealthResponse
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub env: String,
}
