//! Named API routes and URL construction.
//!
//! Every endpoint is a [`Route`] with a path pattern relative to the API base
//! URL. Patterns use `{Var}` for a required variable and `{@Var}` for an
//! optional one that renders as `@value` (used for revisions).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use reqwest::Url;
use serde::Serialize;

use crate::error::{ClientError, RouteError};

/// Named route variables, as produced by the specifiers.
pub type RouteVars = BTreeMap<&'static str, String>;

macro_rules! routes {
    ($($variant:ident => $name:literal, $pattern:literal;)+) => {
        /// A named API endpoint.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Route {
            $($variant,)+
        }

        impl Route {
            /// All routes, in declaration order.
            pub const ALL: &'static [Route] = &[$(Route::$variant,)+];

            /// Stable route name.
            pub fn name(self) -> &'static str {
                match self {
                    $(Route::$variant => $name,)+
                }
            }

            /// Path pattern relative to the API base URL.
            pub fn pattern(self) -> &'static str {
                match self {
                    $(Route::$variant => $pattern,)+
                }
            }
        }
    };
}

routes! {
    People => "people", "users";
    Person => "person", "users/{PersonSpec}";
    PersonEmails => "person.emails", "users/{PersonSpec}/emails";
    PersonSettings => "person.settings", "users/{PersonSpec}/settings";
    PersonSettingsUpdate => "person.settings.update", "users/{PersonSpec}/settings";
    PersonFromGitHub => "person.from-github", "external-users/github/{GitHubUserSpec}";
    PersonRefreshProfile => "person.refresh-profile", "users/{PersonSpec}/external-profile";
    PersonComputeStats => "person.compute-stats", "users/{PersonSpec}/stats";
    PersonAuthors => "person.authors", "users/{PersonSpec}/authors";
    PersonClients => "person.clients", "users/{PersonSpec}/clients";
    PersonOrgs => "person.orgs", "users/{PersonSpec}/orgs";
    PersonRepositoryContributions => "person.repo-contributions", "users/{PersonSpec}/repo-contributions";
    PersonRepositoryDependencies => "person.repo-dependencies", "users/{PersonSpec}/repo-dependencies";
    PersonRepositoryDependents => "person.repo-dependents", "users/{PersonSpec}/repo-dependents";

    Org => "org", "orgs/{OrgSpec}";
    OrgMembers => "org.members", "orgs/{OrgSpec}/members";
    OrgSettings => "org.settings", "orgs/{OrgSpec}/settings";
    OrgSettingsUpdate => "org.settings.update", "orgs/{OrgSpec}/settings";

    Repositories => "repos", "repos";
    RepositoriesCreate => "repos.create", "repos";
    Repository => "repo", "repos/{RepoURI}{@Rev}";
    RepositoriesGetOrCreate => "repos.get-or-create", "repos/{RepoURI}";
    RepositorySettings => "repo.settings", "repos/{RepoURI}/.settings";
    RepositorySettingsUpdate => "repo.settings.update", "repos/{RepoURI}/.settings";
    RepositoryRefreshProfile => "repo.refresh-profile", "repos/{RepoURI}/.externalprofile";
    RepositoryRefreshVCSData => "repo.refresh-vcs-data", "repos/{RepoURI}/.vcs-data";
    RepositoryComputeStats => "repo.compute-stats", "repos/{RepoURI}{@Rev}/.stats";
    RepositoryReadme => "repo.readme", "repos/{RepoURI}{@Rev}/.readme";
    RepositoryBadges => "repo.badges", "repos/{RepoURI}/.badges";
    RepositoryCounters => "repo.counters", "repos/{RepoURI}/.counters";
    RepositoryAuthors => "repo.authors", "repos/{RepoURI}{@Rev}/.authors";
    RepositoryClients => "repo.clients", "repos/{RepoURI}/.clients";
    RepositoryDependencies => "repo.dependencies", "repos/{RepoURI}{@Rev}/.dependencies";
    RepositoryDependents => "repo.dependents", "repos/{RepoURI}/.dependents";
    RepoCommits => "repo.commits", "repos/{RepoURI}/.commits";
    RepoCommit => "repo.commit", "repos/{RepoURI}{@Rev}/.commit";
    RepoCompareCommits => "repo.compare-commits", "repos/{RepoURI}{@Rev}/.commit/.compare";
    RepoBranches => "repo.branches", "repos/{RepoURI}/.branches";
    RepoTags => "repo.tags", "repos/{RepoURI}/.tags";
    RepoStatusCreate => "repo.status.create", "repos/{RepoURI}{@Rev}/.status";
    RepoCombinedStatus => "repo.status", "repos/{RepoURI}{@Rev}/.status";

    Defs => "defs", "defs";
    Def => "def", "repos/{RepoURI}{@Rev}/.{UnitType}/{Unit}/.def/{Path}";
    DefExamples => "def.examples", "repos/{RepoURI}{@Rev}/.{UnitType}/{Unit}/.def/{Path}/.examples";
    DefAuthors => "def.authors", "repos/{RepoURI}{@Rev}/.{UnitType}/{Unit}/.def/{Path}/.authors";
    DefClients => "def.clients", "repos/{RepoURI}{@Rev}/.{UnitType}/{Unit}/.def/{Path}/.clients";
    DefDependents => "def.dependents", "repos/{RepoURI}{@Rev}/.{UnitType}/{Unit}/.def/{Path}/.dependents";
    DefVersions => "def.versions", "repos/{RepoURI}{@Rev}/.{UnitType}/{Unit}/.def/{Path}/.versions";
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::ALL
            .iter()
            .copied()
            .find(|route| route.name() == s)
            .ok_or_else(|| format!("unknown route \"{s}\""))
    }
}

/// Builds request URLs from routes, route variables and query options.
#[derive(Debug, Clone)]
pub struct Router {
    base: Url,
}

impl Router {
    /// Create a router rooted at `base`. Route paths are appended to the
    /// base URL's path.
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve a route to an absolute URL.
    ///
    /// Variable values may span several path segments (repository URIs and
    /// def paths contain `/`); each segment is percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns `RouteError::MissingVar` if a required variable is absent or
    /// empty, and `RouteError::DotSegment` if a value contains a `.` or `..`
    /// path segment.
    pub fn resolve(&self, route: Route, route_vars: &RouteVars) -> Result<Url, RouteError> {
        let path = expand(route, route_vars)?;
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| RouteError::InvalidBase {
                url: self.base.to_string(),
            })?
            .pop_if_empty()
            .extend(path.split('/'));
        Ok(url)
    }

    /// Resolve a route and append `opts` as the query string.
    ///
    /// Options serialize with `serde_urlencoded`; fields the option struct
    /// skips (empty or default values) do not appear.
    pub fn url<T>(
        &self,
        route: Route,
        route_vars: &RouteVars,
        opts: Option<&T>,
    ) -> Result<Url, ClientError>
    where
        T: Serialize + ?Sized,
    {
        let mut url = self.resolve(route, route_vars)?;
        if let Some(opts) = opts {
            let query =
                serde_urlencoded::to_string(opts).map_err(|source| ClientError::Query { source })?;
            if !query.is_empty() {
                url.set_query(Some(&query));
            }
        }
        Ok(url)
    }
}

/// Substitute route variables into the route's pattern.
fn expand(route: Route, route_vars: &RouteVars) -> Result<String, RouteError> {
    let pattern = route.pattern();
    let mut path = String::with_capacity(pattern.len());
    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        path.push_str(&rest[..open]);
        let close = rest[open..].find('}').ok_or(RouteError::BadPattern {
            route: route.name(),
            pattern,
        })? + open;
        let var = &rest[open + 1..close];
        match var.strip_prefix('@') {
            Some(name) => {
                if let Some(value) = lookup(route_vars, name) {
                    check_segments(route, name, value)?;
                    path.push('@');
                    path.push_str(value);
                }
            }
            None => {
                let value = lookup(route_vars, var).ok_or(RouteError::MissingVar {
                    route: route.name(),
                    var,
                })?;
                check_segments(route, var, value)?;
                path.push_str(value);
            }
        }
        rest = &rest[close + 1..];
    }
    path.push_str(rest);
    Ok(path)
}

/// URL path normalisation drops `.` and `..` segments, which would point the
/// request at another resource.
fn check_segments(route: Route, var: &'static str, value: &str) -> Result<(), RouteError> {
    if value.split('/').any(|segment| segment == "." || segment == "..") {
        return Err(RouteError::DotSegment {
            route: route.name(),
            var,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Empty values count as absent.
fn lookup<'a>(route_vars: &'a RouteVars, name: &str) -> Option<&'a str> {
    route_vars
        .get(name)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}
