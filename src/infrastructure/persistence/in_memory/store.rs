//! # In-Memory Store
//!
//! In-memory implementation of every repository port.
//!
//! All three ports share one `RwLock`, so a batch insert and the reads that
//! load an application with its children are each a single critical section.

use crate::domain::entities::{Application, BankSubmission, Offer};
use crate::domain::value_objects::{
    ApplicationId, ApplicationStatus, BankName, OfferId, SubmissionId,
};
use crate::infrastructure::persistence::traits::{
    ApplicationRepository, BankSubmissionRepository, OfferRepository, RepositoryError,
    RepositoryResult,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct StoreState {
    applications: HashMap<ApplicationId, Application>,
    submissions: HashMap<SubmissionId, BankSubmission>,
    offers: HashMap<OfferId, Offer>,
}

impl StoreState {
    fn submissions_of(&self, id: &ApplicationId) -> Vec<BankSubmission> {
        let mut submissions: Vec<BankSubmission> = self
            .submissions
            .values()
            .filter(|s| s.application_id() == *id)
            .cloned()
            .collect();
        submissions.sort_by_key(BankSubmission::created_at);
        submissions
    }

    fn offers_of(&self, id: &ApplicationId) -> Vec<Offer> {
        let mut offers: Vec<Offer> = self
            .offers
            .values()
            .filter(|o| o.application_id() == *id)
            .cloned()
            .collect();
        offers.sort_by_key(Offer::created_at);
        offers
    }

    fn has_bank(&self, id: &ApplicationId, bank: &BankName) -> bool {
        self.submissions
            .values()
            .any(|s| s.application_id() == *id && s.bank_name() == bank)
    }

    fn check_insertable(&self, submission: &BankSubmission) -> RepositoryResult<()> {
        let app_id = submission.application_id();
        if !self.applications.contains_key(&app_id) {
            return Err(RepositoryError::not_found("Application", app_id.to_string()));
        }
        if self.submissions.contains_key(&submission.id())
            || self.has_bank(&app_id, submission.bank_name())
        {
            return Err(RepositoryError::duplicate(
                "BankSubmission",
                format!("{}/{}", app_id, submission.bank_name()),
            ));
        }
        Ok(())
    }
}

/// In-memory implementation of the repository ports.
///
/// Cloning shares the underlying storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored applications.
    pub async fn application_count(&self) -> usize {
        self.state.read().await.applications.len()
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryStore {
    async fn create(&self, application: &Application) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        if state.applications.contains_key(&application.id()) {
            return Err(RepositoryError::duplicate(
                "Application",
                application.id().to_string(),
            ));
        }
        let row = Application::from_parts(
            application.id(),
            application.customer().clone(),
            application.status(),
            application.created_at(),
            application.updated_at(),
        );
        state.applications.insert(application.id(), row);
        Ok(())
    }

    async fn get(&self, id: &ApplicationId) -> RepositoryResult<Option<Application>> {
        let state = self.state.read().await;
        Ok(state.applications.get(id).map(|app| {
            app.clone()
                .with_submissions(state.submissions_of(id))
                .with_offers(state.offers_of(id))
        }))
    }

    async fn update(&self, application: &Application) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        let Some(stored) = state.applications.get_mut(&application.id()) else {
            return Err(RepositoryError::not_found(
                "Application",
                application.id().to_string(),
            ));
        };
        *stored = Application::from_parts(
            application.id(),
            application.customer().clone(),
            application.status(),
            application.created_at(),
            application.updated_at(),
        );
        Ok(())
    }

    async fn exists(&self, id: &ApplicationId) -> RepositoryResult<bool> {
        Ok(self.state.read().await.applications.contains_key(id))
    }

    async fn find_by_status(
        &self,
        status: ApplicationStatus,
    ) -> RepositoryResult<Vec<Application>> {
        let state = self.state.read().await;
        let mut found: Vec<Application> = state
            .applications
            .values()
            .filter(|app| app.status() == status)
            .map(|app| app.clone().with_submissions(state.submissions_of(&app.id())))
            .collect();
        found.sort_by_key(Application::created_at);
        Ok(found)
    }
}

#[async_trait]
impl BankSubmissionRepository for InMemoryStore {
    async fn create(&self, submission: &BankSubmission) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        state.check_insertable(submission)?;
        state.submissions.insert(submission.id(), submission.clone());
        Ok(())
    }

    async fn create_batch(&self, submissions: &[BankSubmission]) -> RepositoryResult<()> {
        let mut state = self.state.write().await;

        let mut batch_keys = HashSet::new();
        for submission in submissions {
            state.check_insertable(submission)?;
            if !batch_keys.insert((submission.application_id(), submission.bank_name().clone())) {
                return Err(RepositoryError::duplicate(
                    "BankSubmission",
                    format!("{}/{}", submission.application_id(), submission.bank_name()),
                ));
            }
        }

        for submission in submissions {
            state.submissions.insert(submission.id(), submission.clone());
        }
        Ok(())
    }

    async fn update(&self, submission: &BankSubmission) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        match state.submissions.get_mut(&submission.id()) {
            Some(stored) => {
                *stored = submission.clone();
                Ok(())
            }
            None => Err(RepositoryError::not_found(
                "BankSubmission",
                submission.id().to_string(),
            )),
        }
    }

    async fn find_by_application(
        &self,
        application_id: &ApplicationId,
    ) -> RepositoryResult<Vec<BankSubmission>> {
        Ok(self.state.read().await.submissions_of(application_id))
    }
}

#[async_trait]
impl OfferRepository for InMemoryStore {
    async fn create(&self, offer: &Offer) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        if !state.applications.contains_key(&offer.application_id()) {
            return Err(RepositoryError::not_found(
                "Application",
                offer.application_id().to_string(),
            ));
        }
        let same_bank = state.offers.values().any(|o| {
            o.application_id() == offer.application_id() && o.bank_name() == offer.bank_name()
        });
        if same_bank || state.offers.contains_key(&offer.id()) {
            return Err(RepositoryError::duplicate("Offer", offer.id().to_string()));
        }
        state.offers.insert(offer.id(), offer.clone());
        Ok(())
    }

    async fn find_by_application(
        &self,
        application_id: &ApplicationId,
    ) -> RepositoryResult<Vec<Offer>> {
        Ok(self.state.read().await.offers_of(application_id))
    }
}
