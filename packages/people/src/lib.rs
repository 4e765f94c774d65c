#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Person directory lookups.
//!
//! Assignment sessions only reference people by ID. Before an area graph is
//! computed each assignee is looked up here, and sessions whose assignee
//! cannot be found are dropped.
//!
//! - [`RestPersonDirectory`] calls the organization REST API:
//!   `GET {base}/api/orgs/{org}/people/{person}` returning `{ "data": ... }`.
//! - [`StaticPersonDirectory`] serves a fixed set of people.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use canvass_map_canvass_models::Person;
use serde::Deserialize;

/// Default base URL of the person REST API.
pub const DEFAULT_PEOPLE_API_URL: &str = "http://localhost:3000";

/// Per-request timeout for directory calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from person directory lookups.
#[derive(Debug, thiserror::Error)]
pub enum PeopleError {
    /// The HTTP request failed or returned an error status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Looks up people by organization and ID.
#[async_trait]
pub trait PersonDirectory: Send + Sync {
    /// Fetches a person, or `None` if the directory does not know them.
    ///
    /// # Errors
    ///
    /// Returns [`PeopleError`] if the lookup itself fails.
    async fn get_person(&self, org_id: i64, person_id: i64) -> Result<Option<Person>, PeopleError>;
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Person directory backed by the organization REST API.
pub struct RestPersonDirectory {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RestPersonDirectory {
    /// Creates a directory calling the API at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Failed to build people API client ({e}), using defaults");
                reqwest::Client::new()
            });

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Sends `token` as a bearer token on every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Builds a directory from `PEOPLE_API_URL` and `PEOPLE_API_TOKEN`.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("PEOPLE_API_URL").unwrap_or_else(|_| DEFAULT_PEOPLE_API_URL.to_string());
        let directory = Self::new(base_url);

        match std::env::var("PEOPLE_API_TOKEN") {
            Ok(token) if !token.is_empty() => directory.with_token(token),
            _ => directory,
        }
    }

    /// URL of a single person resource.
    #[must_use]
    pub fn person_url(&self, org_id: i64, person_id: i64) -> String {
        format!("{}/api/orgs/{org_id}/people/{person_id}", self.base_url)
    }
}

#[async_trait]
impl PersonDirectory for RestPersonDirectory {
    async fn get_person(&self, org_id: i64, person_id: i64) -> Result<Option<Person>, PeopleError> {
        let url = self.person_url(org_id, person_id);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            log::debug!("Person {person_id} not found in org {org_id}");
            return Ok(None);
        }

        let body: DataEnvelope<Person> = resp.error_for_status()?.json().await?;
        Ok(Some(body.data))
    }
}

/// Person directory serving a fixed set of people, regardless of
/// organization.
#[derive(Debug, Clone, Default)]
pub struct StaticPersonDirectory {
    people: BTreeMap<i64, Person>,
}

impl StaticPersonDirectory {
    /// Creates a directory knowing exactly `people`.
    #[must_use]
    pub fn new(people: impl IntoIterator<Item = Person>) -> Self {
        Self {
            people: people.into_iter().map(|p| (p.id, p)).collect(),
        }
    }
}

#[async_trait]
impl PersonDirectory for StaticPersonDirectory {
    async fn get_person(&self, _org_id: i64, person_id: i64) -> Result<Option<Person>, PeopleError> {
        Ok(self.people.get(&person_id).cloned())
    }
}
