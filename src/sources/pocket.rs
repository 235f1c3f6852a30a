use super::{require_env, run_checked, AuthFile, SourceContext};
use crate::domain::ports::Source;
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio::process::Command;

const PACKAGES: &[&str] = &["pocket-to-sqlite"];
const SCRIPT: &str = "pocket-to-sqlite";

/// Pocket reading list.
pub struct PocketSource {
    ctx: SourceContext,
}

impl PocketSource {
    pub fn new(ctx: SourceContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Source for PocketSource {
    fn name(&self) -> &'static str {
        "pocket"
    }

    fn description(&self) -> &'static str {
        "Pocket"
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
            &[
                (
                    "pocket_consumer_key",
                    require_env("FIREHOSE_POCKET_CONSUMER_KEY")?,
                ),
                (
                    "pocket_username",
                    require_env("FIREHOSE_POCKET_USERNAME")?,
                ),
                (
                    "pocket_access_token",
                    require_env("FIREHOSE_POCKET_ACCESS_TOKEN")?,
                ),
            ],
        )?;

        let mut command = Command::new(self.ctx.script_path(SCRIPT));
        command
            .arg("fetch")
            .arg("--auth")
            .arg(auth.path())
            .arg(self.ctx.database(self.name()));
        run_checked(command).await
    }
}
