//! Application domain services implementing the application command and
//! query ports.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::catalog_service::{listing_not_found, map_listing_repository_error};
use crate::domain::ports::{
    ApplicationCommand, ApplicationQuery, ApplicationRepository, ApplicationRepositoryError,
    ListingRepository,
};
use crate::domain::{
    ApplicationDraft, ApplicationField, ApplicationId, EmailAddress, Error, ListingSnapshot,
    ObjectIdGenerator, PersonName, VerifiedIdentity, VisaApplication,
};

/// How applicant-scoped reads and bulk deletes report "nothing matched".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyResultPolicy {
    /// Return an empty list or a zero count.
    #[default]
    Empty,
    /// Respond `not_found`, as older clients expect.
    NotFound,
}

impl FromStr for EmptyResultPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "empty" => Ok(Self::Empty),
            "not_found" | "not-found" => Ok(Self::NotFound),
            other => Err(format!(
                "unknown empty result policy '{other}' (expected 'empty' or 'not_found')"
            )),
        }
    }
}

impl EmptyResultPolicy {
    fn check(self, matched: bool, applicant: &EmailAddress) -> Result<(), Error> {
        if matched || self == Self::Empty {
            return Ok(());
        }
        Err(Error::not_found(format!(
            "no visa applications found for {applicant}"
        )))
    }
}

fn map_application_repository_error(error: ApplicationRepositoryError) -> Error {
    match error {
        ApplicationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("application repository unavailable: {message}"))
        }
        ApplicationRepositoryError::Query { message } => {
            Error::internal(format!("application repository error: {message}"))
        }
    }
}

/// Application service implementing [`ApplicationCommand`].
#[derive(Clone)]
pub struct ApplicationCommandService<A, L> {
    applications: Arc<A>,
    listings: Arc<L>,
    ids: Arc<ObjectIdGenerator>,
    clock: Arc<dyn Clock>,
    policy: EmptyResultPolicy,
}

impl<A, L> ApplicationCommandService<A, L> {
    pub fn new(
        applications: Arc<A>,
        listings: Arc<L>,
        ids: Arc<ObjectIdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            applications,
            listings,
            ids,
            clock,
            policy: EmptyResultPolicy::default(),
        }
    }

    /// Choose how a bulk withdrawal that removes nothing is reported.
    #[must_use]
    pub fn with_empty_result_policy(mut self, policy: EmptyResultPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[async_trait]
impl<A, L> ApplicationCommand for ApplicationCommandService<A, L>
where
    A: ApplicationRepository,
    L: ListingRepository,
{
    async fn submit_application(
        &self,
        applicant: &VerifiedIdentity,
        draft: ApplicationDraft,
    ) -> Result<VisaApplication, Error> {
        let first_name = PersonName::new(&draft.first_name, ApplicationField::FirstName)?;
        let last_name = PersonName::new(&draft.last_name, ApplicationField::LastName)?;
        let listing = self
            .listings
            .find_by_id(&draft.visa_id)
            .await
            .map_err(map_listing_repository_error)?
            .ok_or_else(|| listing_not_found(&draft.visa_id))?;

        let now = self.clock.utc();
        let application = VisaApplication {
            id: ApplicationId::from(self.ids.next_id()),
            visa_id: draft.visa_id,
            applicant_email: applicant.email().clone(),
            first_name,
            last_name,
            applied_date: now.date_naive(),
            fee: listing.details().fee(),
            listing: ListingSnapshot::of(&listing),
            created_at: now,
        };
        self.applications
            .insert(&application)
            .await
            .map_err(map_application_repository_error)?;
        info!(
            application_id = %application.id,
            visa_id = %application.visa_id,
            "visa application submitted"
        );
        Ok(application)
    }

    async fn withdraw_all(&self, applicant: &EmailAddress) -> Result<u64, Error> {
        let deleted = self
            .applications
            .delete_by_applicant(applicant)
            .await
            .map_err(map_application_repository_error)?;
        info!(deleted, "visa applications withdrawn");
        self.policy.check(deleted > 0, applicant)?;
        Ok(deleted)
    }
}

/// Application service implementing [`ApplicationQuery`].
#[derive(Clone)]
pub struct ApplicationQueryService<A> {
    applications: Arc<A>,
    policy: EmptyResultPolicy,
}

impl<A> ApplicationQueryService<A> {
    pub fn new(applications: Arc<A>) -> Self {
        Self {
            applications,
            policy: EmptyResultPolicy::default(),
        }
    }

    /// Choose how a read that matches nothing is reported.
    #[must_use]
    pub fn with_empty_result_policy(mut self, policy: EmptyResultPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[async_trait]
impl<A> ApplicationQuery for ApplicationQueryService<A>
where
    A: ApplicationRepository,
{
    async fn list_applications(
        &self,
        applicant: &EmailAddress,
        search: Option<String>,
    ) -> Result<Vec<VisaApplication>, Error> {
        let mut applications = self
            .applications
            .list_by_applicant(applicant)
            .await
            .map_err(map_application_repository_error)?;
        if let Some(needle) = search.as_deref() {
            applications.retain(|application| application.matches_search(needle));
        }
        debug!(count = applications.len(), "listed visa applications");
        self.policy.check(!applications.is_empty(), applicant)?;
        Ok(applications)
    }
}

#[cfg(test)]
#[path = "application_service_tests.rs"]
mod tests;
