//! Definition endpoints and models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::ClientError;
use crate::options::{comma_separated, is_false, ListOptions};
use crate::people::User;
use crate::repos::{Repo, RepoUri};
use crate::router::{Route, RouteVars};
use crate::spec::DefSpec;

/// A code definition: a function, type, variable or similar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Def {
    /// Server-assigned identifier.
    #[serde(rename = "SID", default)]
    pub sid: u64,
    #[serde(default)]
    pub repo: String,
    #[serde(rename = "CommitID", default)]
    pub commit_id: String,
    #[serde(default)]
    pub unit_type: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub def_start: u32,
    #[serde(default)]
    pub def_end: u32,
    #[serde(default)]
    pub exported: bool,
    #[serde(default)]
    pub local: bool,
    #[serde(default)]
    pub test: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tree_path: String,
    /// Rendered documentation, present when requested with `doc`.
    #[serde(rename = "DocHTML", default, skip_serializing_if = "String::is_empty")]
    pub doc_html: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub stat: BTreeMap<String, i64>,
}

impl Def {
    pub fn spec(&self) -> DefSpec {
        DefSpec::new(&self.repo, &self.unit_type, &self.unit, &self.path).at(&self.commit_id)
    }
}

/// A reference from one location to a def.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ref {
    #[serde(default)]
    pub def_repo: String,
    #[serde(default)]
    pub def_unit_type: String,
    #[serde(default)]
    pub def_unit: String,
    #[serde(default)]
    pub def_path: String,
    #[serde(default)]
    pub repo: String,
    #[serde(rename = "CommitID", default)]
    pub commit_id: String,
    #[serde(default)]
    pub unit_type: String,
    #[serde(default)]
    pub unit: String,
    /// True if this is the def's own definition site.
    #[serde(rename = "Def", default)]
    pub is_def: bool,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub start: u32,
    #[serde(default)]
    pub end: u32,
}

/// A usage example of a def, with highlighted source around the reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Example {
    #[serde(flatten)]
    pub reference: Ref,
    #[serde(rename = "SrcHTML", default)]
    pub src_html: String,
    #[serde(default)]
    pub start_line: u32,
    #[serde(default)]
    pub end_line: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefAuthor {
    #[serde(rename = "UID", default)]
    pub uid: Option<u64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub last_commit_date: String,
    #[serde(rename = "LastCommitID", default)]
    pub last_commit_id: String,
    /// Bytes of the def authored by this person.
    #[serde(default)]
    pub bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentedDefAuthor {
    #[serde(rename = "User", default)]
    pub user: Option<User>,
    #[serde(flatten)]
    pub author: DefAuthor,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefClient {
    #[serde(rename = "UID", default)]
    pub uid: Option<u64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub last_commit_date: String,
    #[serde(rename = "LastCommitID", default)]
    pub last_commit_id: String,
    #[serde(default)]
    pub use_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentedDefClient {
    #[serde(rename = "User", default)]
    pub user: Option<User>,
    #[serde(flatten)]
    pub client: DefClient,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefDependent {
    #[serde(default)]
    pub from_repo: RepoUri,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentedDefDependent {
    #[serde(rename = "Repo", default)]
    pub repo: Option<Repo>,
    #[serde(flatten)]
    pub dependent: DefDependent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefGetOptions {
    /// Include rendered documentation.
    #[serde(skip_serializing_if = "is_false")]
    pub doc: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefListOptions {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Full-text query.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub query: String,
    #[serde(rename = "RepositoryURI", skip_serializing_if = "String::is_empty")]
    pub repository_uri: String,
    #[serde(rename = "CommitID", skip_serializing_if = "String::is_empty")]
    pub commit_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sort: String,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "comma_separated")]
    pub unit_types: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub unit: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub direction: String,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "comma_separated")]
    pub kinds: Vec<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub exported: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub non_exported: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub doc: bool,
    #[serde(flatten)]
    pub list: ListOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefListExamplesOptions {
    #[serde(skip_serializing_if = "is_false")]
    pub formatted: bool,
    /// Only examples from this repository.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub repository: String,
    #[serde(flatten)]
    pub list: ListOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DefListAuthorsOptions {
    #[serde(flatten)]
    pub list: ListOptions,
}

pub type DefListClientsOptions = DefListAuthorsOptions;
pub type DefListDependentsOptions = DefListAuthorsOptions;
pub type DefListVersionsOptions = DefListAuthorsOptions;

/// Definition endpoints.
pub trait DefsService {
    fn get(&self, def: &DefSpec, opt: Option<&DefGetOptions>) -> Result<Def, ClientError>;

    fn list(&self, opt: Option<&DefListOptions>) -> Result<Vec<Def>, ClientError>;

    fn list_examples(
        &self,
        def: &DefSpec,
        opt: Option<&DefListExamplesOptions>,
    ) -> Result<Vec<Example>, ClientError>;

    fn list_authors(
        &self,
        def: &DefSpec,
        opt: Option<&DefListAuthorsOptions>,
    ) -> Result<Vec<AugmentedDefAuthor>, ClientError>;

    fn list_clients(
        &self,
        def: &DefSpec,
        opt: Option<&DefListClientsOptions>,
    ) -> Result<Vec<AugmentedDefClient>, ClientError>;

    fn list_dependents(
        &self,
        def: &DefSpec,
        opt: Option<&DefListDependentsOptions>,
    ) -> Result<Vec<AugmentedDefDependent>, ClientError>;

    /// The same def at other commits of its repository.
    fn list_versions(
        &self,
        def: &DefSpec,
        opt: Option<&DefListVersionsOptions>,
    ) -> Result<Vec<Def>, ClientError>;
}

/// [`DefsService`] over HTTP.
#[derive(Debug, Clone, Copy)]
pub struct DefsClient<'a> {
    client: &'a Client,
}

impl<'a> DefsClient<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }
}

impl DefsService for DefsClient<'_> {
    fn get(&self, def: &DefSpec, opt: Option<&DefGetOptions>) -> Result<Def, ClientError> {
        self.client.get(Route::Def, &def.route_vars()?, opt)
    }

    fn list(&self, opt: Option<&DefListOptions>) -> Result<Vec<Def>, ClientError> {
        self.client.get(Route::Defs, &RouteVars::new(), opt)
    }

    fn list_examples(
        &self,
        def: &DefSpec,
        opt: Option<&DefListExamplesOptions>,
    ) -> Result<Vec<Example>, ClientError> {
        self.client.get(Route::DefExamples, &def.route_vars()?, opt)
    }

    fn list_authors(
        &self,
        def: &DefSpec,
        opt: Option<&DefListAuthorsOptions>,
    ) -> Result<Vec<AugmentedDefAuthor>, ClientError> {
        self.client.get(Route::DefAuthors, &def.route_vars()?, opt)
    }

    fn list_clients(
        &self,
        def: &DefSpec,
        opt: Option<&DefListClientsOptions>,
    ) -> Result<Vec<AugmentedDefClient>, ClientError> {
        self.client.get(Route::DefClients, &def.route_vars()?, opt)
    }

    fn list_dependents(
        &self,
        def: &DefSpec,
        opt: Option<&DefListDependentsOptions>,
    ) -> Result<Vec<AugmentedDefDependent>, ClientError> {
        self.client
            .get(Route::DefDependents, &def.route_vars()?, opt)
    }

    fn list_versions(
        &self,
        def: &DefSpec,
        opt: Option<&DefListVersionsOptions>,
    ) -> Result<Vec<Def>, ClientError> {
        self.client.get(Route::DefVersions, &def.route_vars()?, opt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn def_spec_round_trip() {
        let def: Def = serde_json::from_value(json!({
            "SID": 1,
            "Repo": "r.com/x",
            "CommitID": "c",
            "UnitType": "t",
            "Unit": "u",
            "Path": "p",
            "Name": "P",
            "Exported": true
        }))
        .unwrap();
        assert_eq!(def.spec(), DefSpec::new("r.com/x", "t", "u", "p").at("c"));
        assert!(def.exported);
    }

    #[test]
    fn example_flattens_ref() {
        let example: Example = serde_json::from_value(json!({
            "File": "f",
            "Def": true,
            "SrcHTML": "<b>x</b>",
            "StartLine": 3
        }))
        .unwrap();
        assert_eq!(example.reference.file, "f");
        assert!(example.reference.is_def);
        assert_eq!(example.start_line, 3);
    }

    #[test]
    fn list_options_query() {
        let opts = DefListOptions {
            repository_uri: "r1".into(),
            sort: "name".into(),
            unit_types: vec!["a".into(), "b".into()],
            direction: "asc".into(),
            kinds: vec!["a".into(), "b".into()],
            exported: true,
            doc: true,
            list: ListOptions::new(2, 1),
            ..DefListOptions::default()
        };
        assert_eq!(
            serde_urlencoded::to_string(&opts).unwrap(),
            "RepositoryURI=r1&Sort=name&UnitTypes=a%2Cb&Direction=asc&Kinds=a%2Cb\
             &Exported=true&Doc=true&PerPage=1&Page=2"
        );
    }

    #[test]
    fn augmented_dependent_decodes() {
        let deps: Vec<AugmentedDefDependent> =
            serde_json::from_value(json!([{ "Repo": { "URI": "r2" }, "FromRepo": "r2", "Count": 4 }]))
                .unwrap();
        assert_eq!(deps[0].repo.as_ref().map(|r| r.uri.as_str()), Some("r2"));
        assert_eq!(deps[0].dependent.count, 4);
    }
}
