//! Commit statuses reported by external services (builds, reviews, ...).

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::ClientError;
use crate::router::Route;
use crate::spec::RepoRevSpec;

/// The status of a single context at a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepoStatus {
    /// `pending`, `success`, `error` or `failure`.
    pub state: String,
    #[serde(rename = "TargetURL", default, skip_serializing_if = "String::is_empty")]
    pub target_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Label distinguishing this status from others at the same commit.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub updated_at: String,
}

/// All statuses at a commit, with the overall state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CombinedStatus {
    #[serde(default)]
    pub state: String,
    #[serde(rename = "CommitID", default)]
    pub commit_id: String,
    #[serde(default)]
    pub statuses: Vec<RepoStatus>,
}

pub trait RepoStatusService {
    /// Record a status at the revision.
    fn create(&self, rev: &RepoRevSpec, status: &RepoStatus) -> Result<RepoStatus, ClientError>;

    fn get_combined(&self, rev: &RepoRevSpec) -> Result<CombinedStatus, ClientError>;
}

/// [`RepoStatusService`] over HTTP.
#[derive(Debug, Clone, Copy)]
pub struct RepoStatusClient<'a> {
    client: &'a Client,
}

impl<'a> RepoStatusClient<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }
}

impl RepoStatusService for RepoStatusClient<'_> {
    fn create(&self, rev: &RepoRevSpec, status: &RepoStatus) -> Result<RepoStatus, ClientError> {
        let url = self
            .client
            .url(Route::RepoStatusCreate, &rev.route_vars()?, None::<&()>)?;
        self.client.send(Method::POST, url, Some(status))
    }

    fn get_combined(&self, rev: &RepoRevSpec) -> Result<CombinedStatus, ClientError> {
        self.client
            .get(Route::RepoCombinedStatus, &rev.route_vars()?, None::<&()>)
    }
}
