//! People endpoints.

use std::collections::BTreeMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::ClientError;
use crate::options::{is_false, ListOptions};
use crate::orgs::Org;
use crate::router::Route;
use crate::spec::{GitHubUserSpec, PersonSpec};

/// A user account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    #[serde(rename = "UID", default)]
    pub uid: u64,
    #[serde(default)]
    pub login: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "AvatarURL", default, skip_serializing_if = "String::is_empty")]
    pub avatar_url: String,
    #[serde(rename = "HomepageURL", default, skip_serializing_if = "String::is_empty")]
    pub homepage_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub company: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,
}

impl User {
    /// The spec that addresses this user.
    pub fn spec(&self) -> PersonSpec {
        PersonSpec {
            login: self.login.clone(),
            uid: self.uid,
            ..PersonSpec::default()
        }
    }
}

/// A user plus optional statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    #[serde(flatten)]
    pub user: User,
    /// Only present when fetched with `PersonGetOptions::stats`.
    #[serde(rename = "Stat", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub stat: BTreeMap<String, i64>,
}

/// An email address associated with a person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmailAddr {
    /// Compared case-insensitively by the server.
    pub email: String,
    #[serde(default)]
    pub verified: bool,
    /// At most one address per user is primary.
    #[serde(default)]
    pub primary: bool,
    /// Inferred from public data rather than confirmed by the user.
    #[serde(default)]
    pub guessed: bool,
    /// Never associate this address with the user.
    #[serde(default)]
    pub blacklisted: bool,
}

/// The pricing plan a person or org selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSettings {
    #[serde(rename = "PlanID", default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
}

/// A person's configuration settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PersonSettings {
    /// RFC 3339 timestamp of the last upgrade request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_upgrade_at: Option<String>,
    #[serde(flatten)]
    pub plan: PlanSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_emails: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request_srcbot_notification: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PersonGetOptions {
    /// Include statistics about the person.
    #[serde(skip_serializing_if = "is_false")]
    pub stats: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PersonListOptions {
    /// Only people whose login or name matches.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name_or_login: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sort: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub direction: String,
    #[serde(flatten)]
    pub list: ListOptions,
}

pub type PersonListAuthorsOptions = PersonListOptions;
pub type PersonListClientsOptions = PersonListOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonListOrgsOptions {
    #[serde(flatten)]
    pub list: ListOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PersonUsageByClient {
    #[serde(rename = "AuthorUID", default)]
    pub author_uid: Option<u64>,
    #[serde(default)]
    pub author_email: Option<String>,
    #[serde(default)]
    pub ref_count: u64,
}

/// Code authored by `author` that the queried person uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentedPersonUsageByClient {
    #[serde(rename = "Author", default)]
    pub author: Option<User>,
    #[serde(flatten)]
    pub usage: PersonUsageByClient,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PersonUsageOfAuthor {
    #[serde(rename = "ClientUID", default)]
    pub client_uid: Option<u64>,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub ref_count: u64,
}

/// Code authored by the queried person that `client` uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentedPersonUsageOfAuthor {
    #[serde(rename = "Client", default)]
    pub client: Option<User>,
    #[serde(flatten)]
    pub usage: PersonUsageOfAuthor,
}

/// Person-related endpoints.
pub trait PeopleService {
    fn get(&self, person: &PersonSpec, opt: Option<&PersonGetOptions>)
        -> Result<Person, ClientError>;

    fn get_settings(&self, person: &PersonSpec) -> Result<PersonSettings, ClientError>;

    fn update_settings(
        &self,
        person: &PersonSpec,
        settings: &PersonSettings,
    ) -> Result<(), ClientError>;

    fn list_emails(&self, person: &PersonSpec) -> Result<Vec<EmailAddr>, ClientError>;

    /// Fetch the person linked to a GitHub account, creating them if needed.
    fn get_or_create_from_github(
        &self,
        user: &GitHubUserSpec,
        opt: Option<&PersonGetOptions>,
    ) -> Result<Person, ClientError>;

    /// Ask the server to refresh profile data from external sources. The
    /// refresh runs asynchronously on the server; there is no completion
    /// notification.
    fn refresh_profile(&self, person: &PersonSpec) -> Result<(), ClientError>;

    /// Ask the server to recompute the person's statistics (asynchronous).
    fn compute_stats(&self, person: &PersonSpec) -> Result<(), ClientError>;

    fn list(&self, opt: Option<&PersonListOptions>) -> Result<Vec<User>, ClientError>;

    /// People who authored code that `person` uses.
    fn list_authors(
        &self,
        person: &PersonSpec,
        opt: Option<&PersonListAuthorsOptions>,
    ) -> Result<Vec<AugmentedPersonUsageByClient>, ClientError>;

    /// People who use code that `person` authored.
    fn list_clients(
        &self,
        person: &PersonSpec,
        opt: Option<&PersonListClientsOptions>,
    ) -> Result<Vec<AugmentedPersonUsageOfAuthor>, ClientError>;

    fn list_orgs(
        &self,
        member: &PersonSpec,
        opt: Option<&PersonListOrgsOptions>,
    ) -> Result<Vec<Org>, ClientError>;
}

/// [`PeopleService`] over HTTP.
#[derive(Debug, Clone, Copy)]
pub struct PeopleClient<'a> {
    client: &'a Client,
}

impl<'a> PeopleClient<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn put(&self, route: Route, person: &PersonSpec) -> Result<(), ClientError> {
        let url = self.client.url(route, &person.route_vars()?, None::<&()>)?;
        self.client.send_empty(Method::PUT, url, None::<&()>)
    }
}

impl PeopleService for PeopleClient<'_> {
    fn get(
        &self,
        person: &PersonSpec,
        opt: Option<&PersonGetOptions>,
    ) -> Result<Person, ClientError> {
        self.client.get(Route::Person, &person.route_vars()?, opt)
    }

    fn get_settings(&self, person: &PersonSpec) -> Result<PersonSettings, ClientError> {
        self.client
            .get(Route::PersonSettings, &person.route_vars()?, None::<&()>)
    }

    fn update_settings(
        &self,
        person: &PersonSpec,
        settings: &PersonSettings,
    ) -> Result<(), ClientError> {
        let url = self
            .client
            .url(Route::PersonSettingsUpdate, &person.route_vars()?, None::<&()>)?;
        self.client.send_empty(Method::PUT, url, Some(settings))
    }

    fn list_emails(&self, person: &PersonSpec) -> Result<Vec<EmailAddr>, ClientError> {
        self.client
            .get(Route::PersonEmails, &person.route_vars()?, None::<&()>)
    }

    fn get_or_create_from_github(
        &self,
        user: &GitHubUserSpec,
        opt: Option<&PersonGetOptions>,
    ) -> Result<Person, ClientError> {
        self.client
            .get(Route::PersonFromGitHub, &user.route_vars()?, opt)
    }

    fn refresh_profile(&self, person: &PersonSpec) -> Result<(), ClientError> {
        self.put(Route::PersonRefreshProfile, person)
    }

    fn compute_stats(&self, person: &PersonSpec) -> Result<(), ClientError> {
        self.put(Route::PersonComputeStats, person)
    }

    fn list(&self, opt: Option<&PersonListOptions>) -> Result<Vec<User>, ClientError> {
        self.client.get(Route::People, &Default::default(), opt)
    }

    fn list_authors(
        &self,
        person: &PersonSpec,
        opt: Option<&PersonListAuthorsOptions>,
    ) -> Result<Vec<AugmentedPersonUsageByClient>, ClientError> {
        self.client
            .get(Route::PersonAuthors, &person.route_vars()?, opt)
    }

    fn list_clients(
        &self,
        person: &PersonSpec,
        opt: Option<&PersonListClientsOptions>,
    ) -> Result<Vec<AugmentedPersonUsageOfAuthor>, ClientError> {
        self.client
            .get(Route::PersonClients, &person.route_vars()?, opt)
    }

    fn list_orgs(
        &self,
        member: &PersonSpec,
        opt: Option<&PersonListOrgsOptions>,
    ) -> Result<Vec<Org>, ClientError> {
        self.client.get(Route::PersonOrgs, &member.route_vars()?, opt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn person_decodes_flattened_user_and_stats() {
        let person: Person = serde_json::from_value(json!({
            "UID": 7,
            "Login": "alice",
            "AvatarURL": "https://example.com/a.png",
            "Stat": { "authors": 3 }
        }))
        .unwrap();
        assert_eq!(person.user.uid, 7);
        assert_eq!(person.user.login, "alice");
        assert_eq!(person.user.avatar_url, "https://example.com/a.png");
        assert_eq!(person.stat["authors"], 3);
    }

    #[test]
    fn user_spec_prefers_login() {
        let user = User {
            uid: 7,
            login: "alice".into(),
            ..User::default()
        };
        assert_eq!(user.spec().path_component().unwrap(), "alice");
    }

    #[test]
    fn settings_skip_unset_fields() {
        let settings = PersonSettings {
            build_emails: Some(false),
            ..PersonSettings::default()
        };
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({ "BuildEmails": false })
        );
    }

    #[test]
    fn list_options_query() {
        let opts = PersonListOptions {
            name_or_login: "al".into(),
            list: ListOptions::new(2, 5),
            ..PersonListOptions::default()
        };
        assert_eq!(
            serde_urlencoded::to_string(&opts).unwrap(),
            "NameOrLogin=al&PerPage=5&Page=2"
        );
    }
}
