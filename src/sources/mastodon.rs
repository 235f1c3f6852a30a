use super::{require_env, run_checked, AuthFile, SourceContext};
use crate::domain::ports::Source;
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio::process::Command;

const PACKAGES: &[&str] = &["mastodon-to-sqlite"];
const SCRIPT: &str = "mastodon-to-sqlite";
const DATA_POINTS: &[&str] = &[
    "bookmarks",
    "favourites",
    "followers",
    "followings",
    "statuses",
];

/// Mastodon account activity.
pub struct MastodonSource {
    ctx: SourceContext,
}

impl MastodonSource {
    pub fn new(ctx: SourceContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Source for MastodonSource {
    fn name(&self) -> &'static str {
        "mastodon"
    }

    fn description(&self) -> &'static str {
        "Mastodon"
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
                ("mastodon_domain", require_env("FIREHOSE_MASTODON_DOMAIN")?),
                (
                    "mastodon_access_token",
                    require_env("FIREHOSE_MASTODON_ACCESS_TOKEN")?,
                ),
            ],
        )?;

        let script = self.ctx.script_path(SCRIPT);
        let database = self.ctx.database(self.name());

        for data_point in DATA_POINTS {
            let mut command = Command::new(&script);
            command
                .arg(data_point)
                .arg("--auth")
                .arg(auth.path())
                .arg(&database);
            run_checked(command).await?;
        }
        Ok(())
    }
}
