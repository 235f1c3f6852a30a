use super::{require_env, run_checked, AuthFile, SourceContext};
use crate::domain::ports::Source;
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio::process::Command;

const PACKAGES: &[&str] = &["github-to-sqlite"];
const SCRIPT: &str = "github-to-sqlite";
const DATA_POINTS: &[&str] = &["commits", "releases"];

/// Github repositories, commits and releases.
pub struct GithubSource {
    ctx: SourceContext,
}

impl GithubSource {
    pub fn new(ctx: SourceContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Source for GithubSource {
    fn name(&self) -> &'static str {
        "github"
    }

    fn description(&self) -> &'static str {
        "Github"
    }

    async fn install(&self) -> Result<()> {
        self.ctx.install_packages(PACKAGES).await
    }

    fn is_installed(&self) -> bool {
        self.ctx.script_path(SCRIPT).is_file()
    }

    async fn update(&self) -> Result<()> {
        let auth = AuthFile::write(
            self.ctx.auth_file_path(self.name()),
            &[(
                "github_personal_token",
                require_env("FIREHOSE_GITHUB_TOKEN")?,
            )],
        )?;

        let script = self.ctx.script_path(SCRIPT);
        let database = self.ctx.database(self.name());

        // Fetch repos associated with the user
        let mut command = Command::new(&script);
        command
            .arg("repos")
            .arg("--auth")
            .arg(auth.path())
            .arg(&database);
        run_checked(command).await?;

        // Fetch interesting data about the configured repos
        let repos = &self.ctx.config.github.repos;
        if repos.is_empty() {
            tracing::debug!("no repos configured, skipping commits and releases");
            return Ok(());
        }
        for data_point in DATA_POINTS {
            let mut command = Command::new(&script);
            command
                .arg(data_point)
                .arg("--auth")
                .arg(auth.path())
                .arg(&database)
                .args(repos);
            run_checked(command).await?;
        }
        Ok(())
    }
}
