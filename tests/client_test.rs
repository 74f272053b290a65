//! Service round trips against a mock HTTP server.

use codegraph_client::defs::{DefGetOptions, DefListOptions, DefsService};
use codegraph_client::orgs::{OrgSettings, OrgsService};
use codegraph_client::people::{PeopleService, PersonGetOptions, PlanSettings};
use codegraph_client::repo_status::{RepoStatus, RepoStatusService};
use codegraph_client::repos::{
    NewRepositorySpec, RepositoriesService, RepositoryCompareCommitsOptions, RepositoryGetOptions,
    RepositoryListOptions, RepositorySettings,
};
use codegraph_client::{
    Client, ClientConfig, ClientError, DefSpec, GitHubUserSpec, ListOptions, OrgSpec, PersonSpec,
    RepoSpec, RouteError, SpecError,
};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

fn client_for(server: &ServerGuard) -> Client {
    let config = ClientConfig::new(&format!("{}/api/", server.url())).unwrap();
    Client::new(config).unwrap()
}

fn json_body(value: serde_json::Value) -> String {
    value.to_string()
}

mod people {
    use super::*;

    #[test]
    fn get_by_uid_sends_options_and_token() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/api/users/$42")
            .match_query(Matcher::UrlEncoded("Stats".into(), "true".into()))
            .match_header("authorization", "Bearer secret")
            .match_header("accept", "application/json")
            .with_header("content-type", "application/json")
            .with_body(json_body(json!({ "UID": 42, "Login": "alice", "Stat": { "defs": 3 } })))
            .create();

        let config = ClientConfig::new(&format!("{}/api", server.url()))
            .unwrap()
            .token("secret");
        let client = Client::new(config).unwrap();
        let person = client
            .people()
            .get(&PersonSpec::uid(42), Some(&PersonGetOptions { stats: true }))
            .unwrap();

        mock.assert();
        assert_eq!(person.user.login, "alice");
        assert_eq!(person.stat["defs"], 3);
    }

    #[test]
    fn email_addresses_are_routed_verbatim() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/api/users/a@b.com/emails")
            .with_body(json_body(json!([{ "Email": "a@b.com", "Primary": true }])))
            .create();

        let emails = client_for(&server)
            .people()
            .list_emails(&PersonSpec::email("a@b.com"))
            .unwrap();

        mock.assert();
        assert_eq!(emails.len(), 1);
        assert!(emails[0].primary);
    }

    #[test]
    fn get_or_create_from_github_uses_login() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/api/external-users/github/alice")
            .with_body(json_body(json!({ "UID": 9, "Login": "alice" })))
            .create();

        let person = client_for(&server)
            .people()
            .get_or_create_from_github(&GitHubUserSpec::login("alice"), None)
            .unwrap();

        mock.assert();
        assert_eq!(person.user.uid, 9);
    }

    #[test]
    fn github_user_id_is_rejected_before_sending() {
        let mut server = Server::new();
        let mock = server.mock("GET", Matcher::Any).expect(0).create();

        let err = client_for(&server)
            .people()
            .get_or_create_from_github(
                &GitHubUserSpec {
                    login: String::new(),
                    id: 7,
                },
                None,
            )
            .unwrap_err();

        mock.assert();
        assert!(matches!(
            err,
            ClientError::Spec(SpecError::Unsupported { .. })
        ));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn empty_spec_is_rejected_before_sending() {
        let mut server = Server::new();
        let mock = server.mock("GET", Matcher::Any).expect(0).create();

        let err = client_for(&server)
            .people()
            .get(&PersonSpec::default(), None)
            .unwrap_err();

        mock.assert();
        assert!(matches!(err, ClientError::Spec(SpecError::Invalid { .. })));
    }

    #[test]
    fn dot_segment_login_is_rejected_before_sending() {
        let mut server = Server::new();
        let mock = server.mock("GET", Matcher::Any).expect(0).create();

        let err = client_for(&server)
            .people()
            .get(&PersonSpec::login(".."), None)
            .unwrap_err();

        mock.assert();
        assert!(matches!(
            err,
            ClientError::Route(RouteError::DotSegment { .. })
        ));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn refresh_profile_is_a_put() {
        let mut server = Server::new();
        let mock = server
            .mock("PUT", "/api/users/alice/external-profile")
            .with_status(204)
            .create();

        client_for(&server)
            .people()
            .refresh_profile(&PersonSpec::login("alice"))
            .unwrap();
        mock.assert();
    }

    #[test]
    fn list_orgs() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/api/users/alice/orgs")
            .with_body(json_body(json!([{ "UID": 5, "Login": "acme" }])))
            .create();

        let orgs = client_for(&server)
            .people()
            .list_orgs(&PersonSpec::login("alice"), None)
            .unwrap();

        mock.assert();
        assert_eq!(orgs[0].spec(), OrgSpec { org: "acme".into(), uid: 5 });
    }
}

mod repos {
    use super::*;

    #[test]
    fn get_at_revision() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/api/repos/github.com/a/b@v1.0")
            .match_query(Matcher::UrlEncoded("ResolveRevision".into(), "true".into()))
            .with_body(json_body(json!({
                "URI": "github.com/a/b",
                "CloneURL": "https://github.com/a/b.git",
                "CommitID": "abc"
            })))
            .create();

        let opt = RepositoryGetOptions {
            resolve_revision: true,
            ..RepositoryGetOptions::default()
        };
        let repo = client_for(&server)
            .repos()
            .get(&RepoSpec::uri("github.com/a/b").at("v1.0"), Some(&opt))
            .unwrap();

        mock.assert();
        assert_eq!(repo.commit_id, "abc");
        assert!(repo.repo.is_github_repository());
    }

    #[test]
    fn get_by_rid() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/api/repos/R$7")
            .with_body(json_body(json!({ "RID": 7, "URI": "x.com/y" })))
            .create();

        let repo = client_for(&server)
            .repos()
            .get(&RepoSpec::rid(7).into(), None)
            .unwrap();

        mock.assert();
        assert_eq!(repo.repo.rid, 7);
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/api/repos/a%3Fb%23c/.branches")
            .with_body("[]")
            .create();

        let branches = client_for(&server)
            .repos()
            .list_branches(&RepoSpec::uri("a?b#c"), None)
            .unwrap();

        mock.assert();
        assert!(branches.is_empty());
    }

    #[test]
    fn list_sends_query() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/api/repos")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("Query".into(), "http client".into()),
                Matcher::UrlEncoded("URIs".into(), "a.com/x,b.com/y".into()),
                Matcher::UrlEncoded("PerPage".into(), "5".into()),
                Matcher::UrlEncoded("Page".into(), "2".into()),
            ]))
            .with_body(json_body(json!([{ "URI": "a.com/x" }, { "URI": "b.com/y" }])))
            .create();

        let opt = RepositoryListOptions {
            query: "http client".into(),
            uris: vec!["a.com/x".into(), "b.com/y".into()],
            list: ListOptions::new(2, 5),
            ..RepositoryListOptions::default()
        };
        let repos = client_for(&server).repos().list(Some(&opt)).unwrap();

        mock.assert();
        assert_eq!(repos.len(), 2);
    }

    #[test]
    fn update_settings_sends_json() {
        let mut server = Server::new();
        let mock = server
            .mock("PUT", "/api/repos/r.com/x/.settings")
            .match_body(Matcher::Json(json!({ "Enabled": true })))
            .with_status(200)
            .create();

        client_for(&server)
            .repos()
            .update_settings(
                &RepoSpec::uri("r.com/x"),
                &RepositorySettings {
                    enabled: Some(true),
                },
            )
            .unwrap();
        mock.assert();
    }

    #[test]
    fn create_posts_clone_url() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/api/repos")
            .match_body(Matcher::Json(json!({
                "Type": "git",
                "CloneURL": "https://r.com/x.git"
            })))
            .with_body(json_body(json!({ "URI": "r.com/x", "VCS": "git" })))
            .create();

        let repo = client_for(&server)
            .repos()
            .create(&NewRepositorySpec {
                vcs: "git".into(),
                clone_url: "https://r.com/x.git".into(),
            })
            .unwrap();

        mock.assert();
        assert_eq!(repo.uri.as_str(), "r.com/x");
    }

    #[test]
    fn compare_commits() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/api/repos/r.com/x@base/.commit/.compare")
            .match_query(Matcher::UrlEncoded("HeadRev".into(), "head".into()))
            .with_body(json_body(json!({
                "Base": { "ID": "base" },
                "Head": { "ID": "head" },
                "DefsAdded": [{ "SID": 1 }]
            })))
            .create();

        let cmp = client_for(&server)
            .repos()
            .compare_commits(
                &RepoSpec::uri("r.com/x").at("base"),
                Some(&RepositoryCompareCommitsOptions {
                    head_rev: "head".into(),
                }),
            )
            .unwrap();

        mock.assert();
        assert_eq!(cmp.head.map(|c| c.id).as_deref(), Some("head"));
        assert_eq!(cmp.defs_added.len(), 1);
    }

    #[test]
    fn list_by_contributor_uses_person_route() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/api/users/alice/repo-contributions")
            .with_body(json_body(json!([{ "RepoURI": "r.com/x", "Defs": 4 }])))
            .create();

        let contributions = client_for(&server)
            .repos()
            .list_by_contributor(&PersonSpec::login("alice"), None)
            .unwrap();

        mock.assert();
        assert_eq!(contributions[0].repo_uri.as_str(), "r.com/x");
        assert_eq!(contributions[0].stats.defs, 4);
    }

    #[test]
    fn moved_repository_reports_new_uri() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/api/repos/github.com/old/x")
            .with_status(301)
            .with_body("the repository requested exists at another URI (github.com/new/x)")
            .create();

        let err = client_for(&server)
            .repos()
            .get(&RepoSpec::uri("github.com/old/x").into(), None)
            .unwrap_err();

        mock.assert();
        assert_eq!(err.status(), Some(301));
        assert_eq!(err.redirect_uri(), Some("github.com/new/x"));
    }
}

mod defs {
    use super::*;

    #[test]
    fn get_with_doc() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/api/repos/r.com/x/.t/u/.def/p")
            .match_query(Matcher::UrlEncoded("Doc".into(), "true".into()))
            .with_body(json_body(json!({ "SID": 1, "Path": "p" })))
            .create();

        let def = client_for(&server)
            .defs()
            .get(
                &DefSpec::new("r.com/x", "t", "u", "p"),
                Some(&DefGetOptions { doc: true }),
            )
            .unwrap();

        mock.assert();
        assert_eq!(def.sid, 1);
    }

    #[test]
    fn multi_segment_path_at_commit() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/api/repos/r.com/x@c1/.GoPackage/pkg/.def/Type/Method/.versions")
            .with_body("[]")
            .create();

        let versions = client_for(&server)
            .defs()
            .list_versions(
                &DefSpec::new("r.com/x", "GoPackage", "pkg", "Type/Method").at("c1"),
                None,
            )
            .unwrap();

        mock.assert();
        assert!(versions.is_empty());
    }

    #[test]
    fn list_sends_comma_separated_kinds() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/api/defs")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("RepositoryURI".into(), "r1".into()),
                Matcher::UrlEncoded("Kinds".into(), "func,type".into()),
                Matcher::UrlEncoded("Exported".into(), "true".into()),
            ]))
            .with_body(json_body(json!([{ "SID": 1 }, { "SID": 2 }])))
            .create();

        let opt = DefListOptions {
            repository_uri: "r1".into(),
            kinds: vec!["func".into(), "type".into()],
            exported: true,
            ..DefListOptions::default()
        };
        let defs = client_for(&server).defs().list(Some(&opt)).unwrap();

        mock.assert();
        assert_eq!(defs.len(), 2);
    }

    #[test]
    fn missing_unit_is_a_route_error() {
        let server = Server::new();
        let err = client_for(&server)
            .defs()
            .get(&DefSpec::new("r.com/x", "t", "", "p"), None)
            .unwrap_err();
        assert!(matches!(err, ClientError::Route(_)));
        assert_eq!(err.exit_code(), 2);
    }
}

mod orgs {
    use super::*;

    #[test]
    fn get_and_update_settings() {
        let mut server = Server::new();
        let get = server
            .mock("GET", "/api/orgs/$5")
            .with_body(json_body(json!({ "UID": 5, "Login": "acme" })))
            .create();
        let update = server
            .mock("PUT", "/api/orgs/acme/settings")
            .match_body(Matcher::Json(json!({ "PlanID": "team" })))
            .create();

        let client = client_for(&server);
        let org = client.orgs().get(&OrgSpec::uid(5)).unwrap();
        client
            .orgs()
            .update_settings(
                &org.spec(),
                &OrgSettings {
                    plan: PlanSettings {
                        plan_id: Some("team".into()),
                    },
                },
            )
            .unwrap();

        get.assert();
        update.assert();
    }
}

mod repo_status {
    use super::*;

    #[test]
    fn create_and_get_combined() {
        let mut server = Server::new();
        let create = server
            .mock("POST", "/api/repos/r.com/x@c/.status")
            .match_body(Matcher::Json(json!({ "State": "success", "Context": "ci" })))
            .with_body(json_body(json!({ "State": "success", "Context": "ci" })))
            .create();
        let combined = server
            .mock("GET", "/api/repos/r.com/x@c/.status")
            .with_body(json_body(json!({
                "State": "success",
                "CommitID": "c",
                "Statuses": [{ "State": "success", "Context": "ci" }]
            })))
            .create();

        let client = client_for(&server);
        let rev = RepoSpec::uri("r.com/x").at("c");
        let status = RepoStatus {
            state: "success".into(),
            context: "ci".into(),
            ..RepoStatus::default()
        };
        let created = client.repo_status().create(&rev, &status).unwrap();
        let all = client.repo_status().get_combined(&rev).unwrap();

        create.assert();
        combined.assert();
        assert_eq!(created, status);
        assert_eq!(all.statuses, vec![status]);
    }
}

mod failures {
    use super::*;

    #[test]
    fn not_found_keeps_server_message() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/api/users/ghost")
            .with_status(404)
            .with_body("person not found\n")
            .create();

        let err = client_for(&server)
            .people()
            .get(&PersonSpec::login("ghost"), None)
            .unwrap_err();

        mock.assert();
        assert!(err.is_not_found());
        assert_eq!(err.exit_code(), 1);
        match err {
            ClientError::Status { message, .. } => assert_eq!(message, "person not found"),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_json_response() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/api/users/alice")
            .with_body("<html>")
            .create();

        let err = client_for(&server)
            .people()
            .get(&PersonSpec::login("alice"), None)
            .unwrap_err();

        mock.assert();
        assert!(matches!(err, ClientError::InvalidJson { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn unreachable_server_is_a_network_error() {
        let client = Client::new(ClientConfig::new("http://127.0.0.1:1/api/").unwrap()).unwrap();
        let err = client
            .people()
            .get(&PersonSpec::login("alice"), None)
            .unwrap_err();
        assert!(matches!(err, ClientError::Network { .. }));
        assert_eq!(err.exit_code(), 3);
    }
}
