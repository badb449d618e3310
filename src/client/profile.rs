use super::{Notification, StoreClient, ViewState};
use crate::models::Registration;

/// ProfileView
///
/// The `/profile` page. There is no session: the store cannot say who is looking. When the
/// caller knows the visitor's game identifier it is matched against `user_id`; otherwise the
/// first record in store order (newest first) stands in for the visitor, which every
/// visitor then sees. `Loaded(None)` means "profile not found".
#[derive(Debug)]
pub struct ProfileView {
    client: StoreClient,
    pub profile: ViewState<Option<Registration>>,
}

impl ProfileView {
    pub fn new(client: StoreClient) -> Self {
        Self {
            client,
            profile: ViewState::Loading,
        }
    }

    pub async fn load(&mut self, identity: Option<&str>) -> Option<Notification> {
        match self.client.list_registrations().await {
            Ok(registrations) => {
                self.profile = ViewState::Loaded(select_profile(registrations, identity));
                None
            }
            Err(err) => {
                let notification = err.notify("Не удалось загрузить данные профиля");
                self.profile = ViewState::Failed(err.to_string());
                Some(notification)
            }
        }
    }

    pub fn current(&self) -> Option<&Registration> {
        self.profile.loaded().and_then(Option::as_ref)
    }
}

/// Picks the registration shown as "the current user".
pub fn select_profile(registrations: Vec<Registration>, identity: Option<&str>) -> Option<Registration> {
    match identity {
        Some(user_id) => registrations.into_iter().find(|r| r.user_id == user_id),
        None => {
            let first = registrations.into_iter().next();
            if let Some(registration) = &first {
                tracing::warn!(
                    id = registration.id,
                    "profile resolved without an identity; showing the first registration"
                );
            }
            first
        }
    }
}
