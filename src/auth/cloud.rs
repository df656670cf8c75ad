//! Google Cloud CLI authentication.
//!
//! Detection prefers `gcloud auth list --format=json`. When that fails or
//! cannot be parsed the plain `gcloud auth list` output is searched for
//! the "No credentialed accounts." phrase, which ties this module to the
//! CLI's English wording.

use std::ffi::OsString;
use std::path::PathBuf;

use regex::Regex;
use serde::Deserialize;

use crate::context::RunContext;
use crate::snapshot::EnvironmentSnapshot;
use crate::ui::UserInterface;

use super::{run_login, DetectionSource};

/// Phrase `gcloud auth list` prints when nobody is logged in.
pub const NO_CREDENTIALS_PHRASE: &str = "No credentialed accounts.";

const ADC_FILE: &str = "application_default_credentials.json";

/// Cloud CLI login state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudAuthState {
    /// Whether an account is logged in
    pub authenticated: bool,
    /// Active account
    pub account: Option<String>,
    /// Project from `gcloud config get-value project`
    pub project_id: Option<String>,
    /// Whether application default credentials exist
    pub adc_present: bool,
    /// How `authenticated` was decided
    pub source: DetectionSource,
}

impl CloudAuthState {
    fn unavailable(adc_present: bool) -> Self {
        Self {
            authenticated: false,
            account: None,
            project_id: None,
            adc_present,
            source: DetectionSource::Unavailable,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuthListEntry {
    account: String,
    #[serde(default)]
    status: String,
}

/// Parse `gcloud auth list --format=json`.
///
/// Returns `None` when the output is not the expected JSON, otherwise the
/// active account (if any).
pub fn parse_auth_list_json(output: &str) -> Option<Option<String>> {
    let entries: Vec<AuthListEntry> = serde_json::from_str(output.trim()).ok()?;
    Some(
        entries
            .into_iter()
            .find(|e| e.status.eq_ignore_ascii_case("ACTIVE"))
            .map(|e| e.account),
    )
}

/// Text heuristic: logged in unless the no-credentials phrase appears.
pub fn classify_gcloud_text(output: &str) -> bool {
    !output.contains(NO_CREDENTIALS_PHRASE)
}

/// Active account from plain `gcloud auth list` output (`*  me@example.com`).
pub fn text_account(output: &str) -> Option<String> {
    let re = Regex::new(r"(?m)^\*\s+(\S+)").ok()?;
    re.captures(output).map(|c| c[1].to_string())
}

/// Project id from `gcloud config get-value project`; empty and `(unset)`
/// mean none.
pub fn parse_project_value(output: &str) -> Option<String> {
    let value = output.lines().map(str::trim).find(|l| !l.is_empty())?;
    (value != "(unset)").then(|| value.to_string())
}

/// Well-known ADC location for this platform.
pub fn default_adc_path() -> Option<PathBuf> {
    if cfg!(windows) {
        std::env::var_os("APPDATA").map(|appdata| PathBuf::from(appdata).join("gcloud").join(ADC_FILE))
    } else {
        dirs::home_dir().map(|home| home.join(".config").join("gcloud").join(ADC_FILE))
    }
}

/// ADC is present when the env var names an existing file or the
/// well-known file exists.
pub fn adc_present_in(env_value: Option<OsString>, well_known: Option<PathBuf>) -> bool {
    let from_env = env_value
        .filter(|v| !v.is_empty())
        .is_some_and(|v| PathBuf::from(v).is_file());
    from_env || well_known.is_some_and(|p| p.is_file())
}

fn adc_present() -> bool {
    adc_present_in(
        std::env::var_os("GOOGLE_APPLICATION_CREDENTIALS"),
        default_adc_path(),
    )
}

fn structured_login(ctx: &RunContext<'_>, snapshot: &EnvironmentSnapshot) -> Option<Option<String>> {
    let invocation = snapshot
        .invocation("gcloud")
        .args(["auth", "list", "--format=json"])
        .timeout(ctx.probe_timeout());
    match ctx.runner.run(&invocation) {
        Ok(result) if result.success => {
            let parsed = parse_auth_list_json(&result.stdout);
            if parsed.is_none() {
                tracing::debug!("gcloud auth list JSON unparsable, falling back to text");
            }
            parsed
        }
        Ok(_) | Err(_) => {
            tracing::debug!("structured gcloud auth query failed, falling back to text");
            None
        }
    }
}

fn text_login(ctx: &RunContext<'_>, snapshot: &EnvironmentSnapshot) -> (bool, Option<String>) {
    let invocation = snapshot
        .invocation("gcloud")
        .args(["auth", "list"])
        .timeout(ctx.probe_timeout());
    match ctx.runner.run(&invocation) {
        Ok(result) => {
            let output = result.combined();
            let authenticated = classify_gcloud_text(&output);
            (authenticated, authenticated.then(|| text_account(&output)).flatten())
        }
        Err(e) => {
            tracing::warn!(error = %e, "gcloud auth list failed");
            (false, None)
        }
    }
}

fn active_project(ctx: &RunContext<'_>, snapshot: &EnvironmentSnapshot) -> Option<String> {
    let invocation = snapshot
        .invocation("gcloud")
        .args(["config", "get-value", "project"])
        .timeout(ctx.probe_timeout());
    match ctx.runner.run(&invocation) {
        Ok(result) if result.success => parse_project_value(&result.stdout),
        _ => None,
    }
}

/// Determine the cloud login state. Runs nothing when gcloud is missing.
pub fn check_cloud_auth(ctx: &RunContext<'_>, snapshot: &EnvironmentSnapshot) -> CloudAuthState {
    if !snapshot.has_tool("gcloud") {
        return CloudAuthState::unavailable(adc_present());
    }

    let structured = if ctx.config.auth.structured {
        structured_login(ctx, snapshot)
    } else {
        None
    };
    let (authenticated, account, source) = match structured {
        Some(account) => (account.is_some(), account, DetectionSource::Structured),
        None => {
            let (authenticated, account) = text_login(ctx, snapshot);
            (authenticated, account, DetectionSource::Text)
        }
    };

    let state = CloudAuthState {
        authenticated,
        account,
        project_id: active_project(ctx, snapshot),
        adc_present: adc_present(),
        source,
    };
    tracing::debug!(?state, "cloud auth checked");
    state
}

/// Run `gcloud auth login --update-adc` attached to the terminal.
///
/// Success is the exit status only.
pub fn authenticate_cloud(
    ctx: &RunContext<'_>,
    snapshot: &EnvironmentSnapshot,
    ui: &mut dyn UserInterface,
) -> bool {
    if !snapshot.has_tool("gcloud") {
        ui.warning("Cannot log in: gcloud is not installed");
        return false;
    }
    let invocation = snapshot
        .invocation("gcloud")
        .args(["auth", "login", "--update-adc"])
        .interactive()
        .timeout(ctx.auth_timeout());
    run_login(ctx, invocation, "Google Cloud", ui)
}
