//! Profile-page state for the signed-in user.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use std::sync::Arc;

use super::observable::Observable;
use crate::net::api;
use crate::net::client::ApiClient;
use crate::net::types::UserProfile;

const FETCH_FAILED: &str = "Failed to fetch user profile";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileState {
    pub profile: Option<UserProfile>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct ProfileStore {
    client: Arc<ApiClient>,
    state: Arc<Observable<ProfileState>>,
}

impl ProfileStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client, state: Arc::new(Observable::default()) }
    }

    pub fn snapshot(&self) -> ProfileState {
        self.state.get()
    }

    pub fn subscribe(&self, f: impl Fn(&ProfileState) + Send + Sync + 'static) {
        self.state.subscribe(f);
    }

    /// Load `GET /users/me`. A failure drops any previously loaded profile.
    pub async fn fetch_profile(&self) -> bool {
        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });
        match api::fetch_profile(&self.client).await {
            Ok(profile) => {
                log::debug!("loaded profile for user #{}", profile.id);
                self.state.update(|s| {
                    s.profile = Some(profile);
                    s.is_loading = false;
                });
                true
            }
            Err(err) if err.is_cancelled() => false,
            Err(err) => {
                log::warn!("failed to fetch profile: {err}");
                self.state.update(|s| {
                    s.profile = None;
                    s.is_loading = false;
                    s.error = Some(err.user_message(FETCH_FAILED));
                });
                false
            }
        }
    }

    pub fn clear(&self) {
        self.state.update(|s| *s = ProfileState::default());
    }
}
