use super::{run_checked, SourceContext};
use crate::domain::ports::Source;
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio::process::Command;

const PACKAGES: &[&str] = &["feed-to-sqlite"];
const SCRIPT: &str = "feed-to-sqlite";

/// RSS/Atom feeds, imported one table per feed.
pub struct FeedsSource {
    ctx: SourceContext,
}

impl FeedsSource {
    pub fn new(ctx: SourceContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Source for FeedsSource {
    fn name(&self) -> &'static str {
        "feeds"
    }

    fn description(&self) -> &'static str {
        "RSS feeds"
    }

    async fn install(&self) -> Result<()> {
        self.ctx.install_packages(PACKAGES).await
    }

    fn is_installed(&self) -> bool {
        self.ctx.script_path(SCRIPT).is_file()
    }

    async fn update(&self) -> Result<()> {
        let urls = &self.ctx.config.feeds.urls;
        if urls.is_empty() {
            tracing::warn!("no feed URLs configured, nothing to import");
            return Ok(());
        }

        let mut command = Command::new(self.ctx.script_path(SCRIPT));
        command.arg(self.ctx.database(self.name())).args(urls);
        run_checked(command).await
    }
}
