//! GitHub CLI authentication.
//!
//! Newer `gh` releases answer `gh auth status --json hosts`; older ones
//! only print prose, which is searched for "Logged in to".

use std::collections::BTreeMap;

use regex::Regex;
use serde::Deserialize;

use crate::context::RunContext;
use crate::snapshot::EnvironmentSnapshot;
use crate::ui::UserInterface;

use super::{run_login, DetectionSource};

/// Phrase `gh auth status` prints for each logged-in host.
pub const LOGGED_IN_PHRASE: &str = "Logged in to";

/// GitHub CLI login state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitAuthState {
    /// Whether any host has a working login
    pub authenticated: bool,
    /// Login name of the active account
    pub account: Option<String>,
    /// How `authenticated` was decided
    pub source: DetectionSource,
}

/// How to log in to GitHub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitLoginMethod {
    /// `gh auth login --web`
    Browser,
    /// `gh auth login --with-token`, token on stdin
    Token(String),
}

#[derive(Debug, Deserialize)]
struct StatusJson {
    hosts: BTreeMap<String, Vec<HostEntry>>,
}

#[derive(Debug, Deserialize)]
struct HostEntry {
    #[serde(default)]
    state: String,
    #[serde(default)]
    active: bool,
    #[serde(default)]
    login: Option<String>,
}

/// Parse `gh auth status --json hosts`.
///
/// Returns `None` when the output is not the expected JSON, otherwise
/// whether a host is logged in and the active login.
pub fn parse_status_json(output: &str) -> Option<(bool, Option<String>)> {
    let status: StatusJson = serde_json::from_str(output.trim()).ok()?;
    let entries: Vec<&HostEntry> = status
        .hosts
        .values()
        .flatten()
        .filter(|e| e.state == "success")
        .collect();
    let account = entries
        .iter()
        .find(|e| e.active)
        .or_else(|| entries.first())
        .and_then(|e| e.login.clone());
    Some((!entries.is_empty(), account))
}

/// Text heuristic: logged in iff the phrase appears.
pub fn classify_gh_text(output: &str) -> bool {
    output.contains(LOGGED_IN_PHRASE)
}

/// Account from prose output, both `account <login>` and the older
/// `as <login>` forms.
pub fn text_account(output: &str) -> Option<String> {
    let re = Regex::new(r"Logged in to \S+ (?:account|as) (\S+)").ok()?;
    re.captures(output).map(|c| c[1].to_string())
}

/// Determine the GitHub login state. Runs nothing when gh is missing.
pub fn check_git_auth(ctx: &RunContext<'_>, snapshot: &EnvironmentSnapshot) -> GitAuthState {
    if !snapshot.has_tool("gh") {
        return GitAuthState {
            authenticated: false,
            account: None,
            source: DetectionSource::Unavailable,
        };
    }

    if ctx.config.auth.structured {
        let invocation = snapshot
            .invocation("gh")
            .args(["auth", "status", "--json", "hosts"])
            .timeout(ctx.probe_timeout());
        // gh exits 1 when a host's token is invalid but still prints JSON.
        if let Ok(result) = ctx.runner.run(&invocation) {
            if let Some((authenticated, account)) = parse_status_json(&result.stdout) {
                return GitAuthState {
                    authenticated,
                    account,
                    source: DetectionSource::Structured,
                };
            }
        }
        tracing::debug!("structured gh auth query failed, falling back to text");
    }

    let invocation = snapshot
        .invocation("gh")
        .args(["auth", "status"])
        .timeout(ctx.probe_timeout());
    let (authenticated, account) = match ctx.runner.run(&invocation) {
        Ok(result) => {
            let output = result.combined();
            (classify_gh_text(&output), text_account(&output))
        }
        Err(e) => {
            tracing::warn!(error = %e, "gh auth status failed");
            (false, None)
        }
    };
    GitAuthState {
        authenticated,
        account,
        source: DetectionSource::Text,
    }
}

/// Log in to GitHub.
///
/// The browser flow is attached to the terminal. A token is passed on
/// stdin and never appears on the command line.
pub fn authenticate_git(
    ctx: &RunContext<'_>,
    snapshot: &EnvironmentSnapshot,
    ui: &mut dyn UserInterface,
    method: GitLoginMethod,
) -> bool {
    if !snapshot.has_tool("gh") {
        ui.warning("Cannot log in: gh is not installed");
        return false;
    }
    let base = snapshot.invocation("gh").args(["auth", "login"]);
    let invocation = match method {
        GitLoginMethod::Browser => base.arg("--web").interactive(),
        GitLoginMethod::Token(token) => base.arg("--with-token").stdin(token),
    };
    run_login(ctx, invocation.timeout(ctx.auth_timeout()), "GitHub", ui)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BootstrapConfig, LayoutConfig};
    use crate::project::verify_project_layout;
    use crate::requirements::fetch::StaticScript;
    use crate::requirements::ToolCheckResult;
    use crate::shell::ScriptedRunner;
    use crate::ui::MockUI;
    use std::path::{Path, PathBuf};

    fn with_gh() -> EnvironmentSnapshot {
        EnvironmentSnapshot::new(verify_project_layout(Path::new("."), &LayoutConfig::default()))
            .with_tool(ToolCheckResult::found("gh", PathBuf::from("gh"), None))
    }

    const STATUS_JSON: &str = r#"{"hosts":{"github.com":[
        {"state":"success","active":true,"host":"github.com","login":"octocat","tokenSource":"keyring"},
        {"state":"success","active":false,"host":"github.com","login":"work-bot","tokenSource":"keyring"}
    ]}}"#;

    #[test]
    fn text_classifier_looks_for_phrase() {
        assert!(classify_gh_text(
            "github.com\n  ✓ Logged in to github.com account octocat (keyring)\n"
        ));
        assert!(!classify_gh_text(
            "You are not logged into any GitHub hosts. To log in, run: gh auth login\n"
        ));
    }

    #[test]
    fn text_account_reads_both_wordings() {
        assert_eq!(
            text_account("✓ Logged in to github.com account octocat (keyring)").as_deref(),
            Some("octocat")
        );
        assert_eq!(
            text_account("✓ Logged in to github.com as hubot (oauth_token)").as_deref(),
            Some("hubot")
        );
    }

    #[test]
    fn json_prefers_active_login() {
        assert_eq!(
            parse_status_json(STATUS_JSON),
            Some((true, Some("octocat".to_string())))
        );
        let failed = r#"{"hosts":{"github.com":[{"state":"error","active":true,"login":"octocat"}]}}"#;
        assert_eq!(parse_status_json(failed), Some((false, None)));
        assert_eq!(parse_status_json("unknown flag: --json"), None);
    }

    #[test]
    fn structured_then_text_fallback() {
        let runner = ScriptedRunner::new();
        runner.respond_fail("gh auth status --json hosts", 1, "unknown flag: --json");
        runner.respond(
            "gh auth status",
            0,
            "",
            "github.com\n  ✓ Logged in to github.com as hubot (oauth_token)\n",
        );
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(Path::new("."), BootstrapConfig::default(), &runner, &fetcher);

        let state = check_git_auth(&ctx, &with_gh());
        assert!(state.authenticated);
        assert_eq!(state.account.as_deref(), Some("hubot"));
        assert_eq!(state.source, DetectionSource::Text);
    }

    #[test]
    fn structured_result_is_used_directly() {
        let runner = ScriptedRunner::new();
        runner.respond_ok("gh auth status --json hosts", STATUS_JSON);
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(Path::new("."), BootstrapConfig::default(), &runner, &fetcher);

        let state = check_git_auth(&ctx, &with_gh());
        assert_eq!(state.source, DetectionSource::Structured);
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn token_login_uses_stdin() {
        let runner = ScriptedRunner::new();
        runner.respond_ok("gh auth login --with-token", "");
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(Path::new("."), BootstrapConfig::default(), &runner, &fetcher);
        let mut ui = MockUI::new();

        let ok = authenticate_git(
            &ctx,
            &with_gh(),
            &mut ui,
            GitLoginMethod::Token("ghp_example".to_string()),
        );
        assert!(ok);
        assert!(!runner.calls()[0].contains("ghp_example"));
        assert_eq!(runner.stdin_seen()[0].as_deref(), Some("ghp_example"));
    }

    #[test]
    fn missing_gh_skips_login() {
        let runner = ScriptedRunner::new();
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(Path::new("."), BootstrapConfig::default(), &runner, &fetcher);
        let snapshot =
            EnvironmentSnapshot::new(verify_project_layout(Path::new("."), &LayoutConfig::default()));
        let mut ui = MockUI::new();

        assert!(!authenticate_git(&ctx, &snapshot, &mut ui, GitLoginMethod::Browser));
        assert!(runner.calls().is_empty());
    }
}
