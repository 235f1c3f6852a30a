use super::{run_checked, SourceContext};
use crate::domain::ports::Source;
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio::process::Command;

const PACKAGES: &[&str] = &["healthkit-to-sqlite"];
const SCRIPT: &str = "healthkit-to-sqlite";

/// Apple Health export archive.
pub struct HealthkitSource {
    ctx: SourceContext,
}

impl HealthkitSource {
    pub fn new(ctx: SourceContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Source for HealthkitSource {
    fn name(&self) -> &'static str {
        "healthkit"
    }

    fn description(&self) -> &'static str {
        "Apple health data"
    }

    async fn install(&self) -> Result<()> {
        self.ctx.install_packages(PACKAGES).await
    }

    fn is_installed(&self) -> bool {
        self.ctx.script_path(SCRIPT).is_file()
    }

    async fn update(&self) -> Result<()> {
        let mut command = Command::new(self.ctx.script_path(SCRIPT));
        command
            .arg(&self.ctx.config.healthkit.export)
            .arg(self.ctx.database(self.name()));
        run_checked(command).await
    }
}
