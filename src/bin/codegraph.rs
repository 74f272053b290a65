//! Codegraph CLI
//!
//! Encode and decode resource specifiers, resolve API routes and query a
//! server from the command line.

use std::io::IsTerminal;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use codegraph_client::defs::{DefGetOptions, DefsService};
use codegraph_client::people::{PeopleService, PersonGetOptions};
use codegraph_client::repos::{RepositoriesService, RepositoryGetOptions, RepositoryListOptions};
use codegraph_client::{
    vars, Client, ClientConfig, DefSpec, GitHubUserSpec, ListOptions, OrgSpec, PersonSpec,
    RepoSpec, Route, RouteVars, Router, DEFAULT_BASE_URL, ENV_TOKEN, ENV_URL,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const KNOWN_VARS: &[&str] = &[
    vars::PERSON_SPEC,
    vars::ORG_SPEC,
    vars::GITHUB_USER_SPEC,
    vars::REPO_URI,
    vars::REV,
    vars::UNIT_TYPE,
    vars::UNIT,
    vars::PATH,
];

#[derive(Parser)]
#[command(name = "codegraph")]
#[command(about = "Resolve specifiers and query the code intelligence API")]
#[command(version)]
struct Cli {
    /// API base URL
    #[arg(long, global = true, env = ENV_URL, default_value = DEFAULT_BASE_URL)]
    url: String,

    /// Access token sent as a bearer token
    #[arg(long, global = true, env = ENV_TOKEN, hide_env_values = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    timeout: u64,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Log requests to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the URL path component for a specifier
    Encode {
        #[command(subcommand)]
        spec: EncodeSpec,
    },

    /// Parse a URL path component and print the specifier as JSON
    Decode {
        /// Kind of specifier
        kind: DecodeKind,

        /// Path component, e.g. `$42` or `github.com/a/b`
        component: String,
    },

    /// Print the URL for a named route
    Url {
        /// Route name, e.g. `person` or `repo.commits`
        route: Route,

        /// Route variable as NAME=VALUE (repeatable)
        #[arg(long = "var", value_parser = parse_var)]
        vars: Vec<(String, String)>,
    },

    #[command(flatten)]
    Remote(RemoteCommand),
}

/// Commands that talk to a server
#[derive(Subcommand)]
enum RemoteCommand {
    /// Fetch a person
    Person {
        /// Login, email or `$UID`
        spec: String,

        /// Include statistics
        #[arg(long)]
        stats: bool,
    },

    /// Fetch a repository
    Repo {
        /// Repository URI or `R$RID`
        spec: String,

        /// Revision (branch, tag or commit ID)
        #[arg(long)]
        rev: Option<String>,

        /// Resolve the revision to a commit ID
        #[arg(long)]
        resolve_revision: bool,
    },

    /// List repositories
    Repos {
        /// Search query
        #[arg(long, short)]
        query: Option<String>,

        /// Page number (starting at 1)
        #[arg(long)]
        page: Option<u32>,

        /// Results per page
        #[arg(long)]
        per_page: Option<u32>,
    },

    /// Fetch a definition
    Def {
        /// Repository URI
        repo: String,
        unit_type: String,
        unit: String,
        path: String,

        /// Commit ID
        #[arg(long)]
        rev: Option<String>,

        /// Include rendered documentation
        #[arg(long)]
        doc: bool,
    },
}

#[derive(Subcommand)]
enum EncodeSpec {
    /// A person: email, then login, then UID
    Person {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        login: Option<String>,
        #[arg(long)]
        uid: Option<u64>,
    },

    /// A repository: URI, then RID
    Repo {
        #[arg(long)]
        uri: Option<String>,
        #[arg(long)]
        rid: Option<u64>,
    },

    /// A GitHub account by login
    GithubUser {
        #[arg(long)]
        login: Option<String>,
        /// Numeric GitHub ID (cannot be encoded)
        #[arg(long)]
        id: Option<u64>,
    },

    /// An organization: name, then UID
    Org {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        uid: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DecodeKind {
    Person,
    Repo,
    Org,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = Output { pretty: cli.pretty };
    let result = match cli.command {
        Commands::Encode { spec } => run_encode(spec),
        Commands::Decode { kind, component } => run_decode(kind, &component, output),
        Commands::Url { route, vars: pairs } => run_url(&cli.url, route, pairs),
        Commands::Remote(command) => connect(&cli.url, cli.token, cli.timeout)
            .and_then(|client| run_remote(&client, command, output)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

#[derive(Clone, Copy)]
struct Output {
    pretty: bool,
}

impl Output {
    fn print<T: Serialize>(self, value: &T) -> Result<(), u8> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
        .map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("{}", json);
        Ok(())
    }
}

fn run_encode(spec: EncodeSpec) -> Result<(), u8> {
    let encoded = match spec {
        EncodeSpec::Person { email, login, uid } => PersonSpec {
            email: email.unwrap_or_default(),
            login: login.unwrap_or_default(),
            uid: uid.unwrap_or_default(),
        }
        .path_component(),
        EncodeSpec::Repo { uri, rid } => RepoSpec {
            uri: uri.unwrap_or_default(),
            rid: rid.unwrap_or_default(),
        }
        .path_component(),
        EncodeSpec::GithubUser { login, id } => GitHubUserSpec {
            login: login.unwrap_or_default(),
            id: id.unwrap_or_default(),
        }
        .path_component(),
        EncodeSpec::Org { name, uid } => OrgSpec {
            org: name.unwrap_or_default(),
            uid: uid.unwrap_or_default(),
        }
        .path_component(),
    };

    let component = encoded.map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;
    println!("{}", component);
    Ok(())
}

fn run_decode(kind: DecodeKind, component: &str, output: Output) -> Result<(), u8> {
    let report = |e: codegraph_client::SpecError| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    };
    match kind {
        DecodeKind::Person => output.print(&PersonSpec::parse(component).map_err(report)?),
        DecodeKind::Repo => output.print(&RepoSpec::parse(component).map_err(report)?),
        DecodeKind::Org => output.print(&OrgSpec::parse(component).map_err(report)?),
    }
}

fn run_url(base_url: &str, route: Route, pairs: Vec<(String, String)>) -> Result<(), u8> {
    let config = ClientConfig::new(base_url).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let mut route_vars = RouteVars::new();
    for (name, value) in pairs {
        let Some(known) = KNOWN_VARS.iter().copied().find(|v| *v == name) else {
            eprintln!(
                "Error: unknown route variable '{}' (expected one of: {})",
                name,
                KNOWN_VARS.join(", ")
            );
            return Err(2);
        };
        route_vars.insert(known, value);
    }

    let url = Router::new(config.base_url)
        .resolve(route, &route_vars)
        .map_err(|e| {
            eprintln!("Error: {}", e);
            2u8
        })?;
    println!("{}", url);
    Ok(())
}

fn connect(base_url: &str, token: Option<String>, timeout: u64) -> Result<Client, u8> {
    let mut config = ClientConfig::new(base_url)
        .map(|c| c.timeout(Duration::from_secs(timeout)))
        .map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;
    config.token = token.filter(|t| !t.is_empty());
    Client::new(config).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })
}

fn run_remote(client: &Client, command: RemoteCommand, output: Output) -> Result<(), u8> {
    let report = |e: codegraph_client::ClientError| {
        match e.redirect_uri() {
            Some(uri) => eprintln!("Error: repository moved to {}", uri),
            None => eprintln!("Error: {}", e),
        }
        e.exit_code() as u8
    };

    match command {
        RemoteCommand::Person { spec, stats } => {
            let spec = PersonSpec::parse(&spec).map_err(|e| report(e.into()))?;
            let opt = PersonGetOptions { stats };
            let person = client.people().get(&spec, Some(&opt)).map_err(report)?;
            output.print(&person)
        }
        RemoteCommand::Repo {
            spec,
            rev,
            resolve_revision,
        } => {
            let repo = RepoSpec::parse(&spec).map_err(|e| report(e.into()))?;
            let opt = RepositoryGetOptions {
                resolve_revision,
                ..RepositoryGetOptions::default()
            };
            let repository = client
                .repos()
                .get(&repo.at(rev.unwrap_or_default()), Some(&opt))
                .map_err(report)?;
            output.print(&repository)
        }
        RemoteCommand::Repos {
            query,
            page,
            per_page,
        } => {
            let opt = RepositoryListOptions {
                query: query.unwrap_or_default(),
                list: ListOptions::new(page.unwrap_or_default(), per_page.unwrap_or_default()),
                ..RepositoryListOptions::default()
            };
            let repos = client.repos().list(Some(&opt)).map_err(report)?;
            output.print(&repos)
        }
        RemoteCommand::Def {
            repo,
            unit_type,
            unit,
            path,
            rev,
            doc,
        } => {
            let spec = DefSpec::new(repo, unit_type, unit, path).at(rev.unwrap_or_default());
            let def = client
                .defs()
                .get(&spec, Some(&DefGetOptions { doc }))
                .map_err(report)?;
            output.print(&def)
        }
    }
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))
}
