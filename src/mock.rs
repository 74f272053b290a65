//! Closure-backed service mocks for tests.
//!
//! Each mock implements its service trait. Install a handler per method with
//! the matching `with_*` builder; methods without a handler return the
//! default value of their result type.
//!
//! ```
//! use codegraph_client::mock::MockPeopleService;
//! use codegraph_client::people::{PeopleService, Person};
//! use codegraph_client::PersonSpec;
//!
//! let people = MockPeopleService::new().with_get(|spec, _| {
//!     let mut person = Person::default();
//!     person.user.login = spec.login.clone();
//!     Ok(person)
//! });
//! let person = people.get(&PersonSpec::login("alice"), None).unwrap();
//! assert_eq!(person.user.login, "alice");
//! ```

use crate::defs::*;
use crate::error::ClientError;
use crate::orgs::*;
use crate::people::*;
use crate::repo_status::*;
use crate::repos::*;
use crate::spec::{DefSpec, GitHubUserSpec, OrgSpec, PersonSpec, RepoRevSpec, RepoSpec};

macro_rules! mock_service {
    (
        $(#[$meta:meta])*
        $name:ident: $service:ident {
            $( fn $method:ident($($arg:ident: $ty:ty),*) -> $ret:ty = $setter:ident; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Default)]
        pub struct $name {
            $( $method: Option<Box<dyn Fn($($ty),*) -> Result<$ret, ClientError> + Send + Sync>>, )+
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            $(
                #[must_use]
                pub fn $setter(
                    mut self,
                    handler: impl Fn($($ty),*) -> Result<$ret, ClientError> + Send + Sync + 'static,
                ) -> Self {
                    self.$method = Some(Box::new(handler));
                    self
                }
            )+
        }

        impl $service for $name {
            $(
                fn $method(&self, $($arg: $ty),*) -> Result<$ret, ClientError> {
                    match &self.$method {
                        Some(handler) => handler($($arg),*),
                        None => Ok(<$ret>::default()),
                    }
                }
            )+
        }
    };
}

mock_service! {
    /// Mock [`PeopleService`].
    MockPeopleService: PeopleService {
        fn get(person: &PersonSpec, opt: Option<&PersonGetOptions>) -> Person = with_get;
        fn get_settings(person: &PersonSpec) -> PersonSettings = with_get_settings;
        fn update_settings(person: &PersonSpec, settings: &PersonSettings) -> () = with_update_settings;
        fn list_emails(person: &PersonSpec) -> Vec<EmailAddr> = with_list_emails;
        fn get_or_create_from_github(user: &GitHubUserSpec, opt: Option<&PersonGetOptions>) -> Person = with_get_or_create_from_github;
        fn refresh_profile(person: &PersonSpec) -> () = with_refresh_profile;
        fn compute_stats(person: &PersonSpec) -> () = with_compute_stats;
        fn list(opt: Option<&PersonListOptions>) -> Vec<User> = with_list;
        fn list_authors(person: &PersonSpec, opt: Option<&PersonListAuthorsOptions>) -> Vec<AugmentedPersonUsageByClient> = with_list_authors;
        fn list_clients(person: &PersonSpec, opt: Option<&PersonListClientsOptions>) -> Vec<AugmentedPersonUsageOfAuthor> = with_list_clients;
        fn list_orgs(member: &PersonSpec, opt: Option<&PersonListOrgsOptions>) -> Vec<Org> = with_list_orgs;
    }
}

mock_service! {
    /// Mock [`RepositoriesService`].
    MockRepositoriesService: RepositoriesService {
        fn get(repo: &RepoRevSpec, opt: Option<&RepositoryGetOptions>) -> Repository = with_get;
        fn get_or_create(repo: &RepoSpec, opt: Option<&RepositoryGetOptions>) -> Repository = with_get_or_create;
        fn get_settings(repo: &RepoSpec) -> RepositorySettings = with_get_settings;
        fn update_settings(repo: &RepoSpec, settings: &RepositorySettings) -> () = with_update_settings;
        fn refresh_profile(repo: &RepoSpec) -> () = with_refresh_profile;
        fn refresh_vcs_data(repo: &RepoSpec) -> () = with_refresh_vcs_data;
        fn compute_stats(repo: &RepoRevSpec) -> () = with_compute_stats;
        fn create(new_repo: &NewRepositorySpec) -> Repo = with_create;
        fn get_readme(repo: &RepoRevSpec) -> TreeEntry = with_get_readme;
        fn list(opt: Option<&RepositoryListOptions>) -> Vec<Repository> = with_list;
        fn list_commits(repo: &RepoSpec, opt: Option<&RepositoryListCommitsOptions>) -> Vec<Commit> = with_list_commits;
        fn get_commit(rev: &RepoRevSpec) -> Commit = with_get_commit;
        fn compare_commits(base: &RepoRevSpec, opt: Option<&RepositoryCompareCommitsOptions>) -> CommitsComparison = with_compare_commits;
        fn list_branches(repo: &RepoSpec, opt: Option<&RepositoryListBranchesOptions>) -> Vec<Branch> = with_list_branches;
        fn list_tags(repo: &RepoSpec, opt: Option<&RepositoryListTagsOptions>) -> Vec<Tag> = with_list_tags;
        fn list_badges(repo: &RepoSpec) -> Vec<Badge> = with_list_badges;
        fn list_counters(repo: &RepoSpec) -> Vec<Counter> = with_list_counters;
        fn list_authors(repo: &RepoRevSpec, opt: Option<&RepositoryListAuthorsOptions>) -> Vec<AugmentedRepoAuthor> = with_list_authors;
        fn list_clients(repo: &RepoSpec, opt: Option<&RepositoryListClientsOptions>) -> Vec<AugmentedRepoClient> = with_list_clients;
        fn list_dependencies(repo: &RepoRevSpec, opt: Option<&RepositoryListDependenciesOptions>) -> Vec<AugmentedRepoDependency> = with_list_dependencies;
        fn list_dependents(repo: &RepoSpec, opt: Option<&RepositoryListDependentsOptions>) -> Vec<AugmentedRepoDependent> = with_list_dependents;
        fn list_by_contributor(person: &PersonSpec, opt: Option<&RepositoryListByContributorOptions>) -> Vec<AugmentedRepoContribution> = with_list_by_contributor;
        fn list_by_client(person: &PersonSpec, opt: Option<&RepositoryListByClientOptions>) -> Vec<AugmentedRepoUsageByClient> = with_list_by_client;
        fn list_by_refd_author(person: &PersonSpec, opt: Option<&RepositoryListByRefdAuthorOptions>) -> Vec<AugmentedRepoUsageOfAuthor> = with_list_by_refd_author;
    }
}

mock_service! {
    /// Mock [`DefsService`].
    MockDefsService: DefsService {
        fn get(def: &DefSpec, opt: Option<&DefGetOptions>) -> Def = with_get;
        fn list(opt: Option<&DefListOptions>) -> Vec<Def> = with_list;
        fn list_examples(def: &DefSpec, opt: Option<&DefListExamplesOptions>) -> Vec<Example> = with_list_examples;
        fn list_authors(def: &DefSpec, opt: Option<&DefListAuthorsOptions>) -> Vec<AugmentedDefAuthor> = with_list_authors;
        fn list_clients(def: &DefSpec, opt: Option<&DefListClientsOptions>) -> Vec<AugmentedDefClient> = with_list_clients;
        fn list_dependents(def: &DefSpec, opt: Option<&DefListDependentsOptions>) -> Vec<AugmentedDefDependent> = with_list_dependents;
        fn list_versions(def: &DefSpec, opt: Option<&DefListVersionsOptions>) -> Vec<Def> = with_list_versions;
    }
}

mock_service! {
    /// Mock [`OrgsService`].
    MockOrgsService: OrgsService {
        fn get(org: &OrgSpec) -> Org = with_get;
        fn list_members(org: &OrgSpec, opt: Option<&OrgListMembersOptions>) -> Vec<User> = with_list_members;
        fn get_settings(org: &OrgSpec) -> OrgSettings = with_get_settings;
        fn update_settings(org: &OrgSpec, settings: &OrgSettings) -> () = with_update_settings;
    }
}

mock_service! {
    /// Mock [`RepoStatusService`].
    MockRepoStatusService: RepoStatusService {
        fn create(rev: &RepoRevSpec, status: &RepoStatus) -> RepoStatus = with_create;
        fn get_combined(rev: &RepoRevSpec) -> CombinedStatus = with_get_combined;
    }
}
