//! Organization endpoints.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::ClientError;
use crate::options::ListOptions;
use crate::people::{PlanSettings, User};
use crate::router::Route;
use crate::spec::OrgSpec;

/// An organization. Organizations are accounts, so they carry user fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Org {
    #[serde(flatten)]
    pub user: User,
}

impl Org {
    pub fn spec(&self) -> OrgSpec {
        OrgSpec {
            org: self.user.login.clone(),
            uid: self.user.uid,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgSettings {
    #[serde(flatten)]
    pub plan: PlanSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrgListMembersOptions {
    #[serde(flatten)]
    pub list: ListOptions,
}

pub trait OrgsService {
    fn get(&self, org: &OrgSpec) -> Result<Org, ClientError>;

    fn list_members(
        &self,
        org: &OrgSpec,
        opt: Option<&OrgListMembersOptions>,
    ) -> Result<Vec<User>, ClientError>;

    fn get_settings(&self, org: &OrgSpec) -> Result<OrgSettings, ClientError>;

    fn update_settings(&self, org: &OrgSpec, settings: &OrgSettings) -> Result<(), ClientError>;
}

/// [`OrgsService`] over HTTP.
#[derive(Debug, Clone, Copy)]
pub struct OrgsClient<'a> {
    client: &'a Client,
}

impl<'a> OrgsClient<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }
}

impl OrgsService for OrgsClient<'_> {
    fn get(&self, org: &OrgSpec) -> Result<Org, ClientError> {
        self.client.get(Route::Org, &org.route_vars()?, None::<&()>)
    }

    fn list_members(
        &self,
        org: &OrgSpec,
        opt: Option<&OrgListMembersOptions>,
    ) -> Result<Vec<User>, ClientError> {
        self.client.get(Route::OrgMembers, &org.route_vars()?, opt)
    }

    fn get_settings(&self, org: &OrgSpec) -> Result<OrgSettings, ClientError> {
        self.client
            .get(Route::OrgSettings, &org.route_vars()?, None::<&()>)
    }

    fn update_settings(&self, org: &OrgSpec, settings: &OrgSettings) -> Result<(), ClientError> {
        let url = self
            .client
            .url(Route::OrgSettingsUpdate, &org.route_vars()?, None::<&()>)?;
        self.client.send_empty(Method::PUT, url, Some(settings))
    }
}
