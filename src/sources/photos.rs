use super::{home_dir, run_checked, SourceContext};
use crate::domain::ports::Source;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;

const PACKAGES: &[&str] = &["dogsheep-photos"];
const SCRIPT: &str = "dogsheep-photos";

/// Apple Photos library. Disabled until the importer handles large
/// libraries without timing out.
pub struct PhotosSource {
    ctx: SourceContext,
}

impl PhotosSource {
    pub fn new(ctx: SourceContext) -> Self {
        Self { ctx }
    }

    fn library(&self) -> Result<PathBuf> {
        match &self.ctx.config.photos.library {
            Some(path) => Ok(path.clone()),
            None => Ok(home_dir()?.join("Pictures/Photos Library.photoslibrary")),
        }
    }
}

#[async_trait]
impl Source for PhotosSource {
    fn name(&self) -> &'static str {
        "photos"
    }

    fn description(&self) -> &'static str {
        "Apple photos"
    }

    fn enabled(&self) -> bool {
        false
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
            .arg("apple-photos")
            .arg("--library")
            .arg(self.library()?)
            .arg(self.ctx.database(self.name()));
        run_checked(command).await
    }
}
