//! Widget controller: the add-user and recommendation operations over a
//! [`RecommendationApi`], publishing every state change through a
//! [`StateStore`].

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use shared::{domain::Recommendation, protocol::RefreshOptions};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    api::RecommendationApi,
    error::{ClientError, RequestError},
    store::{StateStore, WidgetState},
};

pub const EMPTY_TAG_MESSAGE: &str = "Please enter a user tag";
pub const NO_SELECTION_MESSAGE: &str = "Select a user first";

pub struct WidgetController {
    api: Arc<dyn RecommendationApi>,
    store: StateStore,
    busy: AtomicBool,
}

/// Releases the busy flag and hides the loading indicator on every exit path.
struct InFlight<'a> {
    controller: &'a WidgetController,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.controller.store.update(|state| state.loading = false);
        self.controller.busy.store(false, Ordering::Release);
    }
}

impl WidgetController {
    pub fn new(api: Arc<dyn RecommendationApi>) -> Self {
        Self {
            api,
            store: StateStore::new(),
            busy: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> WidgetState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<WidgetState> {
        self.store.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn set_tag(&self, tag: impl Into<String>) {
        let tag = tag.into();
        self.store.update(|state| state.tag = tag);
    }

    /// Selecting a user from the list replaces the current tag text.
    pub fn select_user(&self, tag: &str) {
        self.set_tag(tag);
    }

    pub async fn add_user(&self) -> Result<(), ClientError> {
        let tag = self.current_tag();
        if tag.trim().is_empty() {
            return Err(self.reject(EMPTY_TAG_MESSAGE));
        }

        let _in_flight = self.begin()?;
        match self.api.create_user(&tag).await {
            Ok(()) => {
                let inserted = self.store_user(&tag);
                info!(tag = %tag, inserted, "user registered");
                Ok(())
            }
            Err(err) => Err(self.request_failed("create_user", &tag, err, false)),
        }
    }

    pub async fn get_recommendations(&self) -> Result<(), ClientError> {
        let tag = self.current_tag();
        if tag.is_empty() {
            return Err(self.reject(NO_SELECTION_MESSAGE));
        }

        let _in_flight = self.begin()?;
        let result = self.api.recommendations(&tag).await;
        self.apply_recommendations("recommendations", &tag, result)
    }

    pub async fn refresh_recommendations(&self, options: RefreshOptions) -> Result<(), ClientError> {
        let tag = self.current_tag();
        if tag.is_empty() {
            return Err(self.reject(NO_SELECTION_MESSAGE));
        }

        let _in_flight = self.begin()?;
        let result = self.api.refresh_recommendations(&tag, options).await;
        self.apply_recommendations("refresh_recommendations", &tag, result)
    }

    fn current_tag(&self) -> String {
        self.store.read(|state| state.tag.clone())
    }

    fn store_user(&self, tag: &str) -> bool {
        let mut inserted = false;
        self.store.update(|state| inserted = state.users.insert(tag));
        inserted
    }

    fn begin(&self) -> Result<InFlight<'_>, ClientError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("rejecting request while another is in flight");
            return Err(ClientError::Busy);
        }
        self.store.update(|state| {
            state.error = None;
            state.loading = true;
        });
        Ok(InFlight { controller: self })
    }

    fn reject(&self, message: &str) -> ClientError {
        debug!(message, "validation failed");
        self.store
            .update(|state| state.error = Some(message.to_string()));
        ClientError::Validation(message.to_string())
    }

    fn apply_recommendations(
        &self,
        operation: &'static str,
        tag: &str,
        result: Result<Vec<Recommendation>, RequestError>,
    ) -> Result<(), ClientError> {
        match result {
            Ok(recommendations) => {
                info!(tag, count = recommendations.len(), "recommendations loaded");
                self.store
                    .update(|state| state.recommendations = recommendations);
                Ok(())
            }
            Err(err) => Err(self.request_failed(operation, tag, err, true)),
        }
    }

    fn request_failed(
        &self,
        operation: &'static str,
        tag: &str,
        err: RequestError,
        clear_recommendations: bool,
    ) -> ClientError {
        let message = err.to_string();
        warn!(operation, tag, status = ?err.status(), "request failed: {message}");
        self.store.update(|state| {
            state.error = Some(message);
            if clear_recommendations {
                state.recommendations.clear();
            }
        });
        ClientError::Request(err)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
