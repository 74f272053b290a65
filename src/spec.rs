//! Resource specifiers and their path-component encoding.
//!
//! A specifier names a resource by one of several alternative keys. Each
//! specifier encodes to a single URL path component and decodes back from it:
//!
//! | Specifier        | Encoded form                          |
//! |------------------|---------------------------------------|
//! | `PersonSpec`     | email, login, or `$<uid>`             |
//! | `RepoSpec`       | URI or `R$<rid>`                      |
//! | `OrgSpec`        | org login or `$<uid>`                 |
//! | `GitHubUserSpec` | login (numeric IDs are not encodable) |
//!
//! Decoding branches on the leading sigil alone, so an encoded login or URI
//! must never start with `$` or `R$`. This is assumed, not checked.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpecError;
use crate::router::RouteVars;

/// Sigil marking a numeric person or org UID.
pub const UID_SIGIL: &str = "$";

/// Sigil marking a numeric repository RID.
pub const RID_SIGIL: &str = "R$";

/// Route variable names produced by the specifiers.
pub mod vars {
    pub const PERSON_SPEC: &str = "PersonSpec";
    pub const ORG_SPEC: &str = "OrgSpec";
    pub const GITHUB_USER_SPEC: &str = "GitHubUserSpec";
    pub const REPO_URI: &str = "RepoURI";
    pub const REV: &str = "Rev";
    pub const UNIT_TYPE: &str = "UnitType";
    pub const UNIT: &str = "Unit";
    pub const PATH: &str = "Path";
}

fn parse_id(kind: &'static str, input: &str, digits: &str) -> Result<u64, SpecError> {
    digits.parse().map_err(|e: std::num::ParseIntError| SpecError::Malformed {
        kind,
        input: input.to_string(),
        message: e.to_string(),
    })
}

/// Specifies a person by email, login, or UID (in that order of precedence).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PersonSpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub login: String,
    #[serde(rename = "UID", default, skip_serializing_if = "is_zero")]
    pub uid: u64,
}

impl PersonSpec {
    const KIND: &'static str = "PersonSpec";

    pub fn email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn login(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            ..Self::default()
        }
    }

    pub fn uid(uid: u64) -> Self {
        Self {
            uid,
            ..Self::default()
        }
    }

    /// Returns the URL path component that specifies the person.
    ///
    /// # Errors
    ///
    /// Returns `SpecError::Invalid` if email, login and UID are all unset.
    pub fn path_component(&self) -> Result<String, SpecError> {
        if !self.email.is_empty() {
            Ok(self.email.clone())
        } else if !self.login.is_empty() {
            Ok(self.login.clone())
        } else if self.uid > 0 {
            Ok(format!("{UID_SIGIL}{}", self.uid))
        } else {
            Err(SpecError::Invalid { kind: Self::KIND })
        }
    }

    pub fn route_vars(&self) -> Result<RouteVars, SpecError> {
        Ok(RouteVars::from([(vars::PERSON_SPEC, self.path_component()?)]))
    }

    /// Parses a path component produced by [`PersonSpec::path_component`].
    ///
    /// # Errors
    ///
    /// Returns `SpecError::Malformed` if a `$`-prefixed component does not
    /// carry a decimal UID.
    pub fn parse(component: &str) -> Result<Self, SpecError> {
        if let Some(digits) = component.strip_prefix(UID_SIGIL) {
            return Ok(Self::uid(parse_id(Self::KIND, component, digits)?));
        }
        if component.contains('@') {
            return Ok(Self::email(component));
        }
        Ok(Self::login(component))
    }

    /// Decodes the spec from route variables produced by
    /// [`PersonSpec::route_vars`].
    pub fn from_route_vars(route_vars: &RouteVars) -> Result<Self, SpecError> {
        Self::parse(route_vars.get(vars::PERSON_SPEC).map_or("", String::as_str))
    }
}

impl FromStr for PersonSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Specifies a repository by URI or numeric RID (URI takes precedence).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoSpec {
    #[serde(rename = "URI", default, skip_serializing_if = "String::is_empty")]
    pub uri: String,
    #[serde(rename = "RID", default, skip_serializing_if = "is_zero")]
    pub rid: u64,
}

impl RepoSpec {
    const KIND: &'static str = "RepoSpec";

    pub fn uri(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            rid: 0,
        }
    }

    pub fn rid(rid: u64) -> Self {
        Self {
            uri: String::new(),
            rid,
        }
    }

    /// Returns the URL path component that specifies the repository.
    ///
    /// # Errors
    ///
    /// Returns `SpecError::Invalid` if both URI and RID are unset.
    pub fn path_component(&self) -> Result<String, SpecError> {
        if !self.uri.is_empty() {
            Ok(self.uri.clone())
        } else if self.rid > 0 {
            Ok(format!("{RID_SIGIL}{}", self.rid))
        } else {
            Err(SpecError::Invalid { kind: Self::KIND })
        }
    }

    pub fn route_vars(&self) -> Result<RouteVars, SpecError> {
        Ok(RouteVars::from([(vars::REPO_URI, self.path_component()?)]))
    }

    /// Parses a path component produced by [`RepoSpec::path_component`].
    ///
    /// # Errors
    ///
    /// Returns `SpecError::Malformed` for an empty component or an `R$`
    /// prefix without a decimal RID.
    pub fn parse(component: &str) -> Result<Self, SpecError> {
        if component.is_empty() {
            return Err(SpecError::Malformed {
                kind: Self::KIND,
                input: String::new(),
                message: "empty repository spec".to_string(),
            });
        }
        if let Some(digits) = component.strip_prefix(RID_SIGIL) {
            return Ok(Self::rid(parse_id(Self::KIND, component, digits)?));
        }
        Ok(Self::uri(component))
    }

    pub fn from_route_vars(route_vars: &RouteVars) -> Result<Self, SpecError> {
        Self::parse(route_vars.get(vars::REPO_URI).map_or("", String::as_str))
    }

    /// Pins this repository to a revision.
    pub fn at(self, rev: impl Into<String>) -> RepoRevSpec {
        RepoRevSpec {
            repo: self,
            rev: rev.into(),
        }
    }
}

impl FromStr for RepoSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Specifies a repository at a revision (commit ID, branch, tag, ...), which
/// the server resolves to a commit. An empty `rev` means the default branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRevSpec {
    #[serde(flatten)]
    pub repo: RepoSpec,
    #[serde(rename = "Rev", default, skip_serializing_if = "String::is_empty")]
    pub rev: String,
}

impl RepoRevSpec {
    pub fn new(repo: RepoSpec, rev: impl Into<String>) -> Self {
        Self {
            repo,
            rev: rev.into(),
        }
    }

    pub fn route_vars(&self) -> Result<RouteVars, SpecError> {
        let mut route_vars = self.repo.route_vars()?;
        if !self.rev.is_empty() {
            route_vars.insert(vars::REV, self.rev.clone());
        }
        Ok(route_vars)
    }

    /// Decodes the spec from route variables produced by
    /// [`RepoRevSpec::route_vars`]. A missing `Rev` yields an empty revision.
    pub fn from_route_vars(route_vars: &RouteVars) -> Result<Self, SpecError> {
        let repo = RepoSpec::from_route_vars(route_vars)?;
        let rev = route_vars.get(vars::REV).cloned().unwrap_or_default();
        Ok(Self { repo, rev })
    }
}

impl From<RepoSpec> for RepoRevSpec {
    fn from(repo: RepoSpec) -> Self {
        Self {
            repo,
            rev: String::new(),
        }
    }
}

/// Specifies a GitHub user. Only the login form can be sent to the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GitHubUserSpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub login: String,
    #[serde(rename = "ID", default, skip_serializing_if = "is_zero")]
    pub id: u64,
}

impl GitHubUserSpec {
    const KIND: &'static str = "GitHubUserSpec";

    pub fn login(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            id: 0,
        }
    }

    /// # Errors
    ///
    /// Returns `SpecError::Unsupported` if `id` is set, or
    /// `SpecError::Invalid` if `login` is empty.
    pub fn path_component(&self) -> Result<String, SpecError> {
        if self.id != 0 {
            return Err(SpecError::Unsupported {
                kind: Self::KIND,
                message: "GitHub user IDs are not supported by the HTTP API".to_string(),
            });
        }
        if self.login.is_empty() {
            return Err(SpecError::Invalid { kind: Self::KIND });
        }
        Ok(self.login.clone())
    }

    pub fn route_vars(&self) -> Result<RouteVars, SpecError> {
        Ok(RouteVars::from([(
            vars::GITHUB_USER_SPEC,
            self.path_component()?,
        )]))
    }
}

/// Specifies an organization by login or UID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrgSpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub org: String,
    #[serde(rename = "UID", default, skip_serializing_if = "is_zero")]
    pub uid: u64,
}

impl OrgSpec {
    const KIND: &'static str = "OrgSpec";

    pub fn org(org: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            uid: 0,
        }
    }

    pub fn uid(uid: u64) -> Self {
        Self {
            org: String::new(),
            uid,
        }
    }

    pub fn path_component(&self) -> Result<String, SpecError> {
        if !self.org.is_empty() {
            Ok(self.org.clone())
        } else if self.uid > 0 {
            Ok(format!("{UID_SIGIL}{}", self.uid))
        } else {
            Err(SpecError::Invalid { kind: Self::KIND })
        }
    }

    pub fn route_vars(&self) -> Result<RouteVars, SpecError> {
        Ok(RouteVars::from([(vars::ORG_SPEC, self.path_component()?)]))
    }

    pub fn parse(component: &str) -> Result<Self, SpecError> {
        if component.is_empty() {
            return Err(SpecError::Malformed {
                kind: Self::KIND,
                input: String::new(),
                message: "empty org spec".to_string(),
            });
        }
        if let Some(digits) = component.strip_prefix(UID_SIGIL) {
            return Ok(Self::uid(parse_id(Self::KIND, component, digits)?));
        }
        Ok(Self::org(component))
    }
}

impl FromStr for OrgSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Specifies a definition within a repository's source unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefSpec {
    pub repo: String,
    #[serde(rename = "CommitID", default, skip_serializing_if = "String::is_empty")]
    pub commit_id: String,
    pub unit_type: String,
    pub unit: String,
    pub path: String,
}

impl DefSpec {
    pub fn new(
        repo: impl Into<String>,
        unit_type: impl Into<String>,
        unit: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            repo: repo.into(),
            commit_id: String::new(),
            unit_type: unit_type.into(),
            unit: unit.into(),
            path: path.into(),
        }
    }

    #[must_use]
    pub fn at(mut self, commit_id: impl Into<String>) -> Self {
        self.commit_id = commit_id.into();
        self
    }

    pub fn repo_rev(&self) -> RepoRevSpec {
        RepoRevSpec::new(RepoSpec::uri(&self.repo), &self.commit_id)
    }

    /// Route variables for the def. Empty unit fields are left out so the
    /// router reports them as missing.
    pub fn route_vars(&self) -> Result<RouteVars, SpecError> {
        let mut route_vars = self.repo_rev().route_vars()?;
        for (name, value) in [
            (vars::UNIT_TYPE, &self.unit_type),
            (vars::UNIT, &self.unit),
            (vars::PATH, &self.path),
        ] {
            if !value.is_empty() {
                route_vars.insert(name, value.clone());
            }
        }
        Ok(route_vars)
    }
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_spec_precedence() {
        let spec = PersonSpec {
            email: "a@b.com".into(),
            login: "x".into(),
            uid: 5,
        };
        assert_eq!(spec.path_component().unwrap(), "a@b.com");

        let spec = PersonSpec {
            login: "x".into(),
            uid: 5,
            ..PersonSpec::default()
        };
        assert_eq!(spec.path_component().unwrap(), "x");
        assert_eq!(PersonSpec::uid(5).path_component().unwrap(), "$5");
    }

    #[test]
    fn person_spec_empty_is_invalid() {
        let err = PersonSpec::default().path_component().unwrap_err();
        assert_eq!(err, SpecError::Invalid { kind: "PersonSpec" });
        assert!(PersonSpec::default().route_vars().is_err());
    }

    #[test]
    fn person_spec_parse_shapes() {
        assert_eq!(PersonSpec::parse("$42").unwrap(), PersonSpec::uid(42));
        assert_eq!(
            PersonSpec::parse("a@b.com").unwrap(),
            PersonSpec::email("a@b.com")
        );
        assert_eq!(PersonSpec::parse("alice").unwrap(), PersonSpec::login("alice"));
    }

    #[test]
    fn person_spec_parse_bad_uid() {
        for input in ["$abc", "$", "$-1"] {
            let err = PersonSpec::parse(input).unwrap_err();
            assert!(
                matches!(err, SpecError::Malformed { input: ref got, .. } if got == input),
                "{input}: {err:?}"
            );
        }
    }

    #[test]
    fn repo_spec_precedence_and_sigil() {
        let spec = RepoSpec {
            uri: "r.com/x".into(),
            rid: 5,
        };
        assert_eq!(spec.path_component().unwrap(), "r.com/x");
        assert_eq!(RepoSpec::rid(7).path_component().unwrap(), "R$7");
        assert_eq!(
            RepoSpec::default().path_component().unwrap_err(),
            SpecError::Invalid { kind: "RepoSpec" }
        );
    }

    #[test]
    fn repo_spec_parse() {
        assert_eq!(RepoSpec::parse("R$7").unwrap(), RepoSpec::rid(7));
        assert_eq!(RepoSpec::parse("r.com/x").unwrap(), RepoSpec::uri("r.com/x"));
        assert!(matches!(
            RepoSpec::parse(""),
            Err(SpecError::Malformed { ref message, .. }) if message == "empty repository spec"
        ));
        assert!(matches!(
            RepoSpec::parse("R$x"),
            Err(SpecError::Malformed { .. })
        ));
    }

    #[test]
    fn repo_spec_dollar_alone_is_a_uri() {
        // Only "R$" is a sigil for repositories.
        assert_eq!(RepoSpec::parse("$5").unwrap(), RepoSpec::uri("$5"));
    }

    #[test]
    fn repo_rev_spec_route_vars() {
        let spec = RepoSpec::uri("r.com/x").at("abc");
        let vars = spec.route_vars().unwrap();
        assert_eq!(
            vars,
            RouteVars::from([("RepoURI", "r.com/x".to_string()), ("Rev", "abc".to_string())])
        );

        let spec = RepoRevSpec::from(RepoSpec::uri("r.com/x"));
        let vars = spec.route_vars().unwrap();
        assert_eq!(vars, RouteVars::from([("RepoURI", "r.com/x".to_string())]));
        assert!(!vars.contains_key("Rev"));
    }

    #[test]
    fn repo_rev_spec_from_route_vars() {
        let vars = RouteVars::from([("RepoURI", "R$3".to_string()), ("Rev", "v1".to_string())]);
        let spec = RepoRevSpec::from_route_vars(&vars).unwrap();
        assert_eq!(spec, RepoSpec::rid(3).at("v1"));

        let vars = RouteVars::from([("RepoURI", "r.com/x".to_string())]);
        let spec = RepoRevSpec::from_route_vars(&vars).unwrap();
        assert_eq!(spec.rev, "");

        assert!(RepoRevSpec::from_route_vars(&RouteVars::new()).is_err());
    }

    #[test]
    fn github_user_spec() {
        assert_eq!(
            GitHubUserSpec::login("octocat").path_component().unwrap(),
            "octocat"
        );

        let spec = GitHubUserSpec {
            login: "octocat".into(),
            id: 42,
        };
        assert!(matches!(
            spec.path_component(),
            Err(SpecError::Unsupported { .. })
        ));
        assert_eq!(
            GitHubUserSpec::default().path_component().unwrap_err(),
            SpecError::Invalid {
                kind: "GitHubUserSpec"
            }
        );
    }

    #[test]
    fn org_spec_encoding() {
        assert_eq!(OrgSpec::org("acme").path_component().unwrap(), "acme");
        assert_eq!(OrgSpec::uid(9).path_component().unwrap(), "$9");
        assert_eq!(OrgSpec::parse("$9").unwrap(), OrgSpec::uid(9));
        assert_eq!(OrgSpec::parse("acme").unwrap(), OrgSpec::org("acme"));
        assert!(OrgSpec::default().path_component().is_err());
    }

    #[test]
    fn def_spec_route_vars() {
        let def = DefSpec::new("r.com/x", "t", "u", "p").at("c1");
        let vars = def.route_vars().unwrap();
        assert_eq!(vars["RepoURI"], "r.com/x");
        assert_eq!(vars["Rev"], "c1");
        assert_eq!(vars["UnitType"], "t");
        assert_eq!(vars["Unit"], "u");
        assert_eq!(vars["Path"], "p");

        let def = DefSpec::new("", "t", "u", "p");
        assert!(def.route_vars().is_err());
    }

    #[test]
    fn specs_serialize_with_api_field_names() {
        let json = serde_json::to_value(PersonSpec::uid(3)).unwrap();
        assert_eq!(json, serde_json::json!({ "UID": 3 }));

        let json = serde_json::to_value(RepoSpec::uri("r.com/x").at("abc")).unwrap();
        assert_eq!(json, serde_json::json!({ "URI": "r.com/x", "Rev": "abc" }));
    }
}
