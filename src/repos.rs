//! Repository endpoints and models.

use std::collections::BTreeMap;
use std::fmt;

use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::defs::Def;
use crate::error::ClientError;
use crate::options::{comma_separated, is_false, ListOptions};
use crate::people::User;
use crate::router::{Route, RouteVars};
use crate::spec::{PersonSpec, RepoRevSpec, RepoSpec};

/// Git repositories.
pub const GIT: &str = "git";
/// Mercurial repositories.
pub const HG: &str = "hg";

const REDIRECT_PREFIX: &str = "the repository requested exists at another URI (";

/// Extract the new URI from a "repository moved" server error message.
pub(crate) fn parse_redirect(message: &str) -> Option<&str> {
    let start = message.find(REDIRECT_PREFIX)? + REDIRECT_PREFIX.len();
    let rest = &message[start..];
    let uri = &rest[..rest.find(')')?];
    (!uri.contains('(')).then_some(uri)
}

/// Normalized repository identifier derived from the primary clone URL,
/// e.g. `github.com/user/repo`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoUri(pub String);

impl RepoUri {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_github(&self) -> bool {
        self.0.to_ascii_lowercase().starts_with("github.com/")
    }

    pub fn is_google_code(&self) -> bool {
        self.0.to_ascii_lowercase().starts_with("code.google.com/p/")
    }
}

impl fmt::Display for RepoUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RepoUri {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Names of per-repository statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepoStatType {
    /// References to the repo's defs from other repositories. Counted per
    /// repository, not per commit.
    XRefs,
    /// Resolved people who contributed code to the repo's defs (per commit).
    Authors,
    /// Resolved people whose commits reference the repo's defs.
    Clients,
    /// Repositories this one depends on (per commit).
    Dependencies,
    /// Repositories referencing the repo's defs.
    Dependents,
    /// Defs in a commit.
    Defs,
    /// Exported defs in a commit.
    ExportedDefs,
}

impl RepoStatType {
    pub const ALL: [RepoStatType; 7] = [
        RepoStatType::XRefs,
        RepoStatType::Authors,
        RepoStatType::Clients,
        RepoStatType::Dependencies,
        RepoStatType::Dependents,
        RepoStatType::Defs,
        RepoStatType::ExportedDefs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RepoStatType::XRefs => "xrefs",
            RepoStatType::Authors => "authors",
            RepoStatType::Clients => "clients",
            RepoStatType::Dependencies => "dependencies",
            RepoStatType::Dependents => "dependents",
            RepoStatType::Defs => "defs",
            RepoStatType::ExportedDefs => "exported-defs",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stat| stat.as_str() == s)
    }
}

/// Repository statistics keyed by [`RepoStatType`] name.
pub type RepoStats = BTreeMap<String, i64>;

/// A code repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Repo {
    #[serde(rename = "RID", default)]
    pub rid: u64,
    #[serde(rename = "URI")]
    pub uri: RepoUri,
    /// Final path component of the clone URL (`foo` for `git://x.com/foo.git`).
    #[serde(default)]
    pub name: String,
    #[serde(rename = "OwnerUserID", default)]
    pub owner_user_id: u64,
    #[serde(rename = "OwnerGitHubUserID", default, skip_serializing_if = "Option::is_none")]
    pub owner_github_user_id: Option<u64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// `git` or `hg`.
    #[serde(rename = "VCS", default)]
    pub vcs: String,
    #[serde(rename = "CloneURL", default)]
    pub clone_url: String,
    /// Set when `clone_url` redirects elsewhere.
    #[serde(rename = "ActualCloneURL", default, skip_serializing_if = "Option::is_none")]
    pub actual_clone_url: Option<String>,
    #[serde(rename = "HomepageURL", default, skip_serializing_if = "Option::is_none")]
    pub homepage_url: Option<String>,
    #[serde(default)]
    pub default_branch: String,
    #[serde(default)]
    pub language: String,
    #[serde(rename = "GitHubStars", default)]
    pub github_stars: u64,
    /// Survives renames on GitHub, unlike the URI.
    #[serde(rename = "GitHubID", default, skip_serializing_if = "Option::is_none")]
    pub github_id: Option<u64>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
    /// Hidden from global search results.
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub mirror: bool,
    #[serde(default)]
    pub private: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub stat: RepoStats,
}

impl Repo {
    /// The most direct clone URL, following any known redirect.
    pub fn actual_clone_url(&self) -> &str {
        match self.actual_clone_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => &self.clone_url,
        }
    }

    /// Whether the repository is hosted on GitHub.
    pub fn is_github_repository(&self) -> bool {
        let clone_url = self.actual_clone_url();
        if clone_url.is_empty() {
            return self.uri.is_github();
        }
        Url::parse(clone_url)
            .ok()
            .and_then(|url| url.host_str().map(|host| host.eq_ignore_ascii_case("github.com")))
            .unwrap_or(false)
    }

    pub fn spec(&self) -> RepoSpec {
        RepoSpec {
            uri: self.uri.0.clone(),
            rid: self.rid,
        }
    }

    pub fn stat(&self, stat: RepoStatType) -> Option<i64> {
        self.stat.get(stat.as_str()).copied()
    }
}

/// Index repositories by URI.
pub fn map_by_uri(repos: &[Repo]) -> BTreeMap<&RepoUri, &Repo> {
    repos.iter().map(|repo| (&repo.uri, repo)).collect()
}

/// A repository as returned by the repository endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Repository {
    #[serde(flatten)]
    pub repo: Repo,
    /// Commit the response applies to. Only set by `get` when resolving a
    /// revision was requested; empty if the revision could not be resolved
    /// or the repository is not cloned yet.
    #[serde(rename = "CommitID", default, skip_serializing_if = "String::is_empty")]
    pub commit_id: String,
    /// True if the server holds no clone of the repository.
    #[serde(rename = "NoVCSData", default, skip_serializing_if = "is_false")]
    pub no_vcs_data: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub unsupported: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notice_title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notice_body: String,
}

impl Repository {
    pub fn rev_spec(&self) -> RepoRevSpec {
        RepoRevSpec::new(RepoSpec::uri(self.repo.uri.as_str()), &self.commit_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepositoryGetOptions {
    #[serde(skip_serializing_if = "is_false")]
    pub stats: bool,
    /// Fill in `Repository::commit_id` with the resolved revision.
    #[serde(skip_serializing_if = "is_false")]
    pub resolve_revision: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepositorySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// A repository to add by clone URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRepositorySpec {
    /// `git` or `hg`.
    #[serde(rename = "Type")]
    pub vcs: String,
    #[serde(rename = "CloneURL")]
    pub clone_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepositoryListOptions {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Search query. When set, `sort` and `direction` are ignored.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub query: String,
    #[serde(
        rename = "URIs",
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "comma_separated"
    )]
    pub uris: Vec<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub built_only: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sort: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub direction: String,
    #[serde(skip_serializing_if = "is_false")]
    pub no_fork: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub owner: String,
    #[serde(flatten)]
    pub list: ListOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Signature {
    pub name: String,
    pub email: String,
    /// RFC 3339 timestamp.
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Commit {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub author: Signature,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committer: Option<Signature>,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepositoryListCommitsOptions {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub head: String,
    #[serde(flatten)]
    pub list: ListOptions,
}

/// Differences between a base and head commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommitsComparison {
    #[serde(default)]
    pub head: Option<Commit>,
    #[serde(default)]
    pub base: Option<Commit>,
    #[serde(default)]
    pub defs_added: Vec<Def>,
    #[serde(default)]
    pub defs_changed: Vec<Def>,
    #[serde(default)]
    pub defs_removed: Vec<Def>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepositoryCompareCommitsOptions {
    /// Revision to compare the base against.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub head_rev: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Branch {
    pub name: String,
    /// Commit ID at the tip of the branch.
    pub head: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub name: String,
    #[serde(rename = "CommitID")]
    pub commit_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryListBranchesOptions {
    #[serde(flatten)]
    pub list: ListOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryListTagsOptions {
    #[serde(flatten)]
    pub list: ListOptions,
}

/// A file or directory in a repository tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TreeEntry {
    pub name: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mod_time: String,
    /// Base64-encoded file contents.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub contents: String,
}

/// An embeddable repository badge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Badge {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "ImageURL", default)]
    pub image_url: String,
    #[serde(rename = "UncountedImageURL", default)]
    pub uncounted_image_url: String,
    #[serde(default)]
    pub markdown: String,
}

/// An embeddable repository counter. Same shape as [`Badge`].
pub type Counter = Badge;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthorStats {
    #[serde(default)]
    pub last_commit_date: String,
    #[serde(rename = "LastCommitID", default)]
    pub last_commit_id: String,
    #[serde(default)]
    pub defs: u64,
    #[serde(default)]
    pub exported_defs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepoAuthor {
    #[serde(rename = "UID", default)]
    pub uid: Option<u64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub stats: AuthorStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentedRepoAuthor {
    #[serde(rename = "User", default)]
    pub user: Option<User>,
    #[serde(flatten)]
    pub author: RepoAuthor,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepoClient {
    #[serde(rename = "UID", default)]
    pub uid: Option<u64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub last_commit_date: String,
    #[serde(rename = "LastCommitID", default)]
    pub last_commit_id: String,
    #[serde(default)]
    pub refs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentedRepoClient {
    #[serde(rename = "User", default)]
    pub user: Option<User>,
    #[serde(flatten)]
    pub client: RepoClient,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentedRepoDependency {
    #[serde(rename = "Repo", default)]
    pub repo: Option<Repo>,
    #[serde(rename = "ToRepo")]
    pub to_repo: RepoUri,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentedRepoDependent {
    #[serde(rename = "Repo", default)]
    pub repo: Option<Repo>,
    #[serde(rename = "FromRepo")]
    pub from_repo: RepoUri,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentedRepoContribution {
    #[serde(rename = "Repo", default)]
    pub repo: Option<Repo>,
    #[serde(rename = "RepoURI", default)]
    pub repo_uri: RepoUri,
    #[serde(flatten)]
    pub stats: AuthorStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepoUsageByClient {
    #[serde(rename = "DefRepo", default)]
    pub def_repo: RepoUri,
    #[serde(default)]
    pub ref_count: u64,
}

/// A repository whose defs the queried person references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentedRepoUsageByClient {
    #[serde(rename = "DefRepo", default)]
    pub def_repo: Option<Repo>,
    #[serde(rename = "RepoUsageByClient", default)]
    pub usage: RepoUsageByClient,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepoUsageOfAuthor {
    #[serde(rename = "Repo", default)]
    pub repo: RepoUri,
    #[serde(default)]
    pub ref_count: u64,
}

/// A repository referencing code the queried person authored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentedRepoUsageOfAuthor {
    #[serde(rename = "Repo", default)]
    pub repo: Option<Repo>,
    #[serde(rename = "RepoUsageOfAuthor", default)]
    pub usage: RepoUsageOfAuthor,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryListAuthorsOptions {
    #[serde(flatten)]
    pub list: ListOptions,
}

pub type RepositoryListClientsOptions = RepositoryListAuthorsOptions;
pub type RepositoryListDependenciesOptions = RepositoryListAuthorsOptions;
pub type RepositoryListDependentsOptions = RepositoryListAuthorsOptions;
pub type RepositoryListByClientOptions = RepositoryListAuthorsOptions;
pub type RepositoryListByRefdAuthorOptions = RepositoryListAuthorsOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepositoryListByContributorOptions {
    #[serde(skip_serializing_if = "is_false")]
    pub no_fork: bool,
    #[serde(flatten)]
    pub list: ListOptions,
}

/// Repository-related endpoints.
///
/// The refresh and compute methods only enqueue work on the server; the API
/// has no way to report when it completes.
pub trait RepositoriesService {
    fn get(
        &self,
        repo: &RepoRevSpec,
        opt: Option<&RepositoryGetOptions>,
    ) -> Result<Repository, ClientError>;

    /// Like `get`, but if the repository is unknown and its URI names a
    /// recognized host (such as github.com), the server fetches and creates
    /// it.
    fn get_or_create(
        &self,
        repo: &RepoSpec,
        opt: Option<&RepositoryGetOptions>,
    ) -> Result<Repository, ClientError>;

    fn get_settings(&self, repo: &RepoSpec) -> Result<RepositorySettings, ClientError>;

    fn update_settings(
        &self,
        repo: &RepoSpec,
        settings: &RepositorySettings,
    ) -> Result<(), ClientError>;

    /// Refresh repository metadata from its external host.
    fn refresh_profile(&self, repo: &RepoSpec) -> Result<(), ClientError>;

    /// Fetch new commits, branches, tags and blobs.
    fn refresh_vcs_data(&self, repo: &RepoSpec) -> Result<(), ClientError>;

    fn compute_stats(&self, repo: &RepoRevSpec) -> Result<(), ClientError>;

    /// Add the repository at a clone URL. An existing repository with the
    /// same clone URL or URI is returned instead.
    fn create(&self, new_repo: &NewRepositorySpec) -> Result<Repo, ClientError>;

    /// The formatted README.
    fn get_readme(&self, repo: &RepoRevSpec) -> Result<TreeEntry, ClientError>;

    fn list(&self, opt: Option<&RepositoryListOptions>) -> Result<Vec<Repository>, ClientError>;

    fn list_commits(
        &self,
        repo: &RepoSpec,
        opt: Option<&RepositoryListCommitsOptions>,
    ) -> Result<Vec<Commit>, ClientError>;

    fn get_commit(&self, rev: &RepoRevSpec) -> Result<Commit, ClientError>;

    /// Compare `base` with the head revision named in `opt`.
    fn compare_commits(
        &self,
        base: &RepoRevSpec,
        opt: Option<&RepositoryCompareCommitsOptions>,
    ) -> Result<CommitsComparison, ClientError>;

    fn list_branches(
        &self,
        repo: &RepoSpec,
        opt: Option<&RepositoryListBranchesOptions>,
    ) -> Result<Vec<Branch>, ClientError>;

    fn list_tags(
        &self,
        repo: &RepoSpec,
        opt: Option<&RepositoryListTagsOptions>,
    ) -> Result<Vec<Tag>, ClientError>;

    fn list_badges(&self, repo: &RepoSpec) -> Result<Vec<Badge>, ClientError>;

    fn list_counters(&self, repo: &RepoSpec) -> Result<Vec<Counter>, ClientError>;

    /// People who committed code to the repository.
    fn list_authors(
        &self,
        repo: &RepoRevSpec,
        opt: Option<&RepositoryListAuthorsOptions>,
    ) -> Result<Vec<AugmentedRepoAuthor>, ClientError>;

    /// People who reference defs defined in the repository.
    fn list_clients(
        &self,
        repo: &RepoSpec,
        opt: Option<&RepositoryListClientsOptions>,
    ) -> Result<Vec<AugmentedRepoClient>, ClientError>;

    /// Repositories containing defs the repository references.
    fn list_dependencies(
        &self,
        repo: &RepoRevSpec,
        opt: Option<&RepositoryListDependenciesOptions>,
    ) -> Result<Vec<AugmentedRepoDependency>, ClientError>;

    /// Repositories referencing defs defined in the repository.
    fn list_dependents(
        &self,
        repo: &RepoSpec,
        opt: Option<&RepositoryListDependentsOptions>,
    ) -> Result<Vec<AugmentedRepoDependent>, ClientError>;

    /// Repositories `person` has committed code to.
    fn list_by_contributor(
        &self,
        person: &PersonSpec,
        opt: Option<&RepositoryListByContributorOptions>,
    ) -> Result<Vec<AugmentedRepoContribution>, ClientError>;

    /// Repositories containing defs referenced by `person`.
    fn list_by_client(
        &self,
        person: &PersonSpec,
        opt: Option<&RepositoryListByClientOptions>,
    ) -> Result<Vec<AugmentedRepoUsageByClient>, ClientError>;

    /// Repositories referencing code authored by `person`.
    fn list_by_refd_author(
        &self,
        person: &PersonSpec,
        opt: Option<&RepositoryListByRefdAuthorOptions>,
    ) -> Result<Vec<AugmentedRepoUsageOfAuthor>, ClientError>;
}

/// [`RepositoriesService`] over HTTP.
#[derive(Debug, Clone, Copy)]
pub struct RepositoriesClient<'a> {
    client: &'a Client,
}

impl<'a> RepositoriesClient<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn put(&self, route: Route, route_vars: &RouteVars) -> Result<(), ClientError> {
        let url = self.client.url(route, route_vars, None::<&()>)?;
        self.client.send_empty(Method::PUT, url, None::<&()>)
    }
}

impl RepositoriesService for RepositoriesClient<'_> {
    fn get(
        &self,
        repo: &RepoRevSpec,
        opt: Option<&RepositoryGetOptions>,
    ) -> Result<Repository, ClientError> {
        self.client.get(Route::Repository, &repo.route_vars()?, opt)
    }

    fn get_or_create(
        &self,
        repo: &RepoSpec,
        opt: Option<&RepositoryGetOptions>,
    ) -> Result<Repository, ClientError> {
        let url = self
            .client
            .url(Route::RepositoriesGetOrCreate, &repo.route_vars()?, opt)?;
        self.client.send(Method::PUT, url, None::<&()>)
    }

    fn get_settings(&self, repo: &RepoSpec) -> Result<RepositorySettings, ClientError> {
        self.client
            .get(Route::RepositorySettings, &repo.route_vars()?, None::<&()>)
    }

    fn update_settings(
        &self,
        repo: &RepoSpec,
        settings: &RepositorySettings,
    ) -> Result<(), ClientError> {
        let url = self.client.url(
            Route::RepositorySettingsUpdate,
            &repo.route_vars()?,
            None::<&()>,
        )?;
        self.client.send_empty(Method::PUT, url, Some(settings))
    }

    fn refresh_profile(&self, repo: &RepoSpec) -> Result<(), ClientError> {
        self.put(Route::RepositoryRefreshProfile, &repo.route_vars()?)
    }

    fn refresh_vcs_data(&self, repo: &RepoSpec) -> Result<(), ClientError> {
        self.put(Route::RepositoryRefreshVCSData, &repo.route_vars()?)
    }

    fn compute_stats(&self, repo: &RepoRevSpec) -> Result<(), ClientError> {
        self.put(Route::RepositoryComputeStats, &repo.route_vars()?)
    }

    fn create(&self, new_repo: &NewRepositorySpec) -> Result<Repo, ClientError> {
        let url = self
            .client
            .url(Route::RepositoriesCreate, &RouteVars::new(), None::<&()>)?;
        self.client.send(Method::POST, url, Some(new_repo))
    }

    fn get_readme(&self, repo: &RepoRevSpec) -> Result<TreeEntry, ClientError> {
        self.client
            .get(Route::RepositoryReadme, &repo.route_vars()?, None::<&()>)
    }

    fn list(&self, opt: Option<&RepositoryListOptions>) -> Result<Vec<Repository>, ClientError> {
        self.client.get(Route::Repositories, &RouteVars::new(), opt)
    }

    fn list_commits(
        &self,
        repo: &RepoSpec,
        opt: Option<&RepositoryListCommitsOptions>,
    ) -> Result<Vec<Commit>, ClientError> {
        self.client.get(Route::RepoCommits, &repo.route_vars()?, opt)
    }

    fn get_commit(&self, rev: &RepoRevSpec) -> Result<Commit, ClientError> {
        self.client
            .get(Route::RepoCommit, &rev.route_vars()?, None::<&()>)
    }

    fn compare_commits(
        &self,
        base: &RepoRevSpec,
        opt: Option<&RepositoryCompareCommitsOptions>,
    ) -> Result<CommitsComparison, ClientError> {
        self.client
            .get(Route::RepoCompareCommits, &base.route_vars()?, opt)
    }

    fn list_branches(
        &self,
        repo: &RepoSpec,
        opt: Option<&RepositoryListBranchesOptions>,
    ) -> Result<Vec<Branch>, ClientError> {
        self.client.get(Route::RepoBranches, &repo.route_vars()?, opt)
    }

    fn list_tags(
        &self,
        repo: &RepoSpec,
        opt: Option<&RepositoryListTagsOptions>,
    ) -> Result<Vec<Tag>, ClientError> {
        self.client.get(Route::RepoTags, &repo.route_vars()?, opt)
    }

    fn list_badges(&self, repo: &RepoSpec) -> Result<Vec<Badge>, ClientError> {
        self.client
            .get(Route::RepositoryBadges, &repo.route_vars()?, None::<&()>)
    }

    fn list_counters(&self, repo: &RepoSpec) -> Result<Vec<Counter>, ClientError> {
        self.client
            .get(Route::RepositoryCounters, &repo.route_vars()?, None::<&()>)
    }

    fn list_authors(
        &self,
        repo: &RepoRevSpec,
        opt: Option<&RepositoryListAuthorsOptions>,
    ) -> Result<Vec<AugmentedRepoAuthor>, ClientError> {
        self.client
            .get(Route::RepositoryAuthors, &repo.route_vars()?, opt)
    }

    fn list_clients(
        &self,
        repo: &RepoSpec,
        opt: Option<&RepositoryListClientsOptions>,
    ) -> Result<Vec<AugmentedRepoClient>, ClientError> {
        self.client
            .get(Route::RepositoryClients, &repo.route_vars()?, opt)
    }

    fn list_dependencies(
        &self,
        repo: &RepoRevSpec,
        opt: Option<&RepositoryListDependenciesOptions>,
    ) -> Result<Vec<AugmentedRepoDependency>, ClientError> {
        self.client
            .get(Route::RepositoryDependencies, &repo.route_vars()?, opt)
    }

    fn list_dependents(
        &self,
        repo: &RepoSpec,
        opt: Option<&RepositoryListDependentsOptions>,
    ) -> Result<Vec<AugmentedRepoDependent>, ClientError> {
        self.client
            .get(Route::RepositoryDependents, &repo.route_vars()?, opt)
    }

    fn list_by_contributor(
        &self,
        person: &PersonSpec,
        opt: Option<&RepositoryListByContributorOptions>,
    ) -> Result<Vec<AugmentedRepoContribution>, ClientError> {
        self.client.get(
            Route::PersonRepositoryContributions,
            &person.route_vars()?,
            opt,
        )
    }

    fn list_by_client(
        &self,
        person: &PersonSpec,
        opt: Option<&RepositoryListByClientOptions>,
    ) -> Result<Vec<AugmentedRepoUsageByClient>, ClientError> {
        self.client.get(
            Route::PersonRepositoryDependencies,
            &person.route_vars()?,
            opt,
        )
    }

    fn list_by_refd_author(
        &self,
        person: &PersonSpec,
        opt: Option<&RepositoryListByRefdAuthorOptions>,
    ) -> Result<Vec<AugmentedRepoUsageOfAuthor>, ClientError> {
        self.client.get(
            Route::PersonRepositoryDependents,
            &person.route_vars()?,
            opt,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repo(uri: &str, clone_url: &str) -> Repo {
        Repo {
            uri: RepoUri::from(uri),
            clone_url: clone_url.to_string(),
            ..Repo::default()
        }
    }

    #[test]
    fn uri_host_checks() {
        assert!(RepoUri::from("GitHub.com/a/b").is_github());
        assert!(!RepoUri::from("gitlab.com/a/b").is_github());
        assert!(RepoUri::from("code.google.com/p/foo").is_google_code());
    }

    #[test]
    fn github_detection_prefers_clone_url() {
        assert!(repo("github.com/a/b", "").is_github_repository());
        assert!(repo("example.com/a/b", "https://GITHUB.com/a/b.git").is_github_repository());
        assert!(!repo("github.com/a/b", "https://example.com/a/b.git").is_github_repository());
        assert!(!repo("github.com/a/b", "::not a url::").is_github_repository());

        let mut moved = repo("example.com/a/b", "https://example.com/a/b.git");
        moved.actual_clone_url = Some("https://github.com/a/b.git".into());
        assert!(moved.is_github_repository());
        assert_eq!(moved.actual_clone_url(), "https://github.com/a/b.git");
    }

    #[test]
    fn parse_redirect_message() {
        assert_eq!(
            parse_redirect("the repository requested exists at another URI (github.com/new/x)"),
            Some("github.com/new/x")
        );
        assert_eq!(
            parse_redirect("error: the repository requested exists at another URI () now"),
            Some("")
        );
        assert_eq!(parse_redirect("repository does not exist"), None);
        assert_eq!(
            parse_redirect("the repository requested exists at another URI (unterminated"),
            None
        );
    }

    #[test]
    fn stat_type_names() {
        assert_eq!(RepoStatType::ExportedDefs.as_str(), "exported-defs");
        assert_eq!(RepoStatType::parse("xrefs"), Some(RepoStatType::XRefs));
        assert_eq!(RepoStatType::parse("stars"), None);
    }

    #[test]
    fn repository_decodes_api_json() {
        let repository: Repository = serde_json::from_value(json!({
            "RID": 12,
            "URI": "github.com/a/b",
            "Name": "b",
            "VCS": "git",
            "CloneURL": "https://github.com/a/b.git",
            "DefaultBranch": "master",
            "Fork": true,
            "Stat": { "defs": 40 },
            "CommitID": "abc123"
        }))
        .unwrap();
        assert_eq!(repository.repo.rid, 12);
        assert_eq!(repository.repo.vcs, GIT);
        assert!(repository.repo.fork);
        assert_eq!(repository.repo.stat(RepoStatType::Defs), Some(40));
        assert_eq!(repository.repo.spec(), RepoSpec { uri: "github.com/a/b".into(), rid: 12 });
        assert_eq!(
            repository.rev_spec(),
            RepoSpec::uri("github.com/a/b").at("abc123")
        );
    }

    #[test]
    fn map_by_uri_indexes() {
        let repos = vec![repo("a.com/x", ""), repo("b.com/y", "")];
        let map = map_by_uri(&repos);
        assert_eq!(map[&RepoUri::from("b.com/y")].uri.as_str(), "b.com/y");
    }

    #[test]
    fn list_options_query() {
        let opts = RepositoryListOptions {
            uris: vec!["a.com/x".into(), "b.com/y".into()],
            no_fork: true,
            ..RepositoryListOptions::default()
        };
        assert_eq!(
            serde_urlencoded::to_string(&opts).unwrap(),
            "URIs=a.com%2Fx%2Cb.com%2Fy&NoFork=true"
        );
    }
}
