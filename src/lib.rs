//! Codegraph API client
//!
//! Typed client for the code-intelligence web API: people, repositories,
//! definitions, organizations and commit statuses.
//!
//! Resources are addressed by *specifiers*, compact values that render to a
//! single URL path component and parse back from one:
//!
//! | Specifier | Encodes as | Precedence |
//! |-----------|------------|------------|
//! | [`PersonSpec`] | `a@b.com`, `alice`, `$42` | email, login, UID |
//! | [`RepoSpec`] | `github.com/a/b`, `R$7` | URI, RID |
//! | [`GitHubUserSpec`] | `alice` | login only |
//! | [`OrgSpec`] | `acme`, `$5` | name, UID |
//!
//! # Example
//!
//! ```
//! use codegraph_client::{PersonSpec, RepoSpec};
//!
//! let person = PersonSpec::uid(42);
//! assert_eq!(person.path_component().unwrap(), "$42");
//! assert_eq!("$42".parse::<PersonSpec>().unwrap(), person);
//!
//! let repo = RepoSpec::parse("github.com/a/b").unwrap().at("v1.0");
//! let vars = repo.route_vars().unwrap();
//! assert_eq!(vars["RepoURI"], "github.com/a/b");
//! assert_eq!(vars["Rev"], "v1.0");
//! ```
//!
//! Talking to a server:
//!
//! ```no_run
//! use codegraph_client::people::PeopleService;
//! use codegraph_client::{Client, ClientConfig, PersonSpec};
//!
//! let client = Client::new(ClientConfig::new("https://example.com/api/")?.token("secret"))?;
//! let person = client.people().get(&PersonSpec::login("alice"), None)?;
//! println!("{}", person.user.login);
//! # Ok::<(), codegraph_client::ClientError>(())
//! ```

mod client;
mod config;
mod error;
mod options;
mod router;
mod spec;

pub mod defs;
pub mod mock;
pub mod orgs;
pub mod people;
pub mod repo_status;
pub mod repos;

pub use client::Client;
pub use config::{ClientConfig, DEFAULT_BASE_URL, ENV_TOKEN, ENV_URL, HTTP_TIMEOUT};
pub use error::{ClientError, RouteError, SpecError};
pub use options::{ListOptions, DEFAULT_PER_PAGE};
pub use router::{Route, RouteVars, Router};
pub use spec::{
    vars, DefSpec, GitHubUserSpec, OrgSpec, PersonSpec, RepoRevSpec, RepoSpec, RID_SIGIL,
    UID_SIGIL,
};
