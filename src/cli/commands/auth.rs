//! The `auditor-bootstrap auth` command.

use crate::auth::{
    authenticate_cloud, authenticate_git, check_cloud_auth, check_git_auth, GitLoginMethod,
};
use crate::cli::args::{AuthArgs, AuthCommand as AuthSubcommand, AuthProvider, LoginArgs};
use crate::context::RunContext;
use crate::error::Result;
use crate::snapshot::EnvironmentSnapshot;
use crate::ui::{Prompt, PromptType, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// Shows or performs cloud and GitHub logins.
pub struct AuthCommand<'c, 'a> {
    ctx: &'c RunContext<'a>,
    args: AuthArgs,
}

impl<'c, 'a> AuthCommand<'c, 'a> {
    /// Create a new auth command.
    pub fn new(ctx: &'c RunContext<'a>, args: AuthArgs) -> Self {
        Self { ctx, args }
    }

    fn status(&self, ui: &mut dyn UserInterface) -> CommandResult {
        let snapshot = EnvironmentSnapshot::capture(self.ctx, &["gcloud", "gh"]);
        let cloud = check_cloud_auth(self.ctx, &snapshot);
        let git = check_git_auth(self.ctx, &snapshot);

        ui.show_header("Google Cloud");
        if !snapshot.has_tool("gcloud") {
            ui.warning("gcloud is not installed");
        } else if cloud.authenticated {
            ui.success(&format!(
                "Logged in as {} ({})",
                cloud.account.as_deref().unwrap_or("unknown account"),
                cloud.source
            ));
        } else {
            ui.warning(&format!("Not logged in ({})", cloud.source));
        }
        match &cloud.project_id {
            Some(project) => ui.message(&format!("Active project: {}", project)),
            None if snapshot.has_tool("gcloud") => ui.message("Active project: (unset)"),
            None => {}
        }
        if cloud.adc_present {
            ui.success("Application default credentials found");
        } else {
            ui.warning("Application default credentials not found");
        }

        ui.show_header("GitHub");
        if !snapshot.has_tool("gh") {
            ui.warning("gh is not installed");
        } else if git.authenticated {
            ui.success(&format!(
                "Logged in as {} ({})",
                git.account.as_deref().unwrap_or("unknown account"),
                git.source
            ));
        } else {
            ui.warning(&format!("Not logged in ({})", git.source));
        }

        if cloud.authenticated {
            CommandResult::success()
        } else {
            CommandResult::failure(1)
        }
    }

    fn login(&self, args: &LoginArgs, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ok = match args.provider {
            AuthProvider::Gcloud => {
                let snapshot = EnvironmentSnapshot::capture(self.ctx, &["gcloud"]);
                authenticate_cloud(self.ctx, &snapshot, ui)
            }
            AuthProvider::Github => {
                let snapshot = EnvironmentSnapshot::capture(self.ctx, &["gh"]);
                let method = if args.with_token {
                    let prompt = Prompt {
                        key: "gh_token".to_string(),
                        question: "GitHub token".to_string(),
                        prompt_type: PromptType::Password,
                        default: None,
                    };
                    let token = ui.prompt(&prompt)?.as_string();
                    let token = token.trim();
                    if token.is_empty() {
                        ui.error("No token given");
                        return Ok(CommandResult::failure(1));
                    }
                    GitLoginMethod::Token(token.to_string())
                } else {
                    GitLoginMethod::Browser
                };
                authenticate_git(self.ctx, &snapshot, ui, method)
            }
        };
        Ok(if ok {
            CommandResult::success()
        } else {
            CommandResult::failure(1)
        })
    }
}

impl Command for AuthCommand<'_, '_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &self.args.command {
            AuthSubcommand::Status => Ok(self.status(ui)),
            AuthSubcommand::Login(args) => self.login(args, ui),
        }
    }
}
