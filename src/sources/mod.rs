pub mod auth;
pub mod feeds;
pub mod firefox;
pub mod github;
pub mod healthkit;
pub mod mastodon;
pub mod photos;
pub mod pocket;

use crate::config::SourcesConfig;
use crate::domain::ports::Source;
use crate::utils::error::{FirehoseError, Result};
use std::path::PathBuf;
use tokio::process::Command;

pub use self::auth::AuthFile;

pub type Factory = fn(SourceContext) -> Box<dyn Source>;

/// Source registry. Adding a source means writing its adapter and
/// adding one row here.
pub const SOURCES: &[(&str, Factory)] = &[
    ("feeds", |ctx| Box::new(feeds::FeedsSource::new(ctx))),
    ("firefox", |ctx| Box::new(firefox::FirefoxSource::new(ctx))),
    ("github", |ctx| Box::new(github::GithubSource::new(ctx))),
    ("healthkit", |ctx| Box::new(healthkit::HealthkitSource::new(ctx))),
    ("mastodon", |ctx| Box::new(mastodon::MastodonSource::new(ctx))),
    ("photos", |ctx| Box::new(photos::PhotosSource::new(ctx))),
    ("pocket", |ctx| Box::new(pocket::PocketSource::new(ctx))),
];

pub fn get_source(name: &str, ctx: SourceContext) -> Result<Box<dyn Source>> {
    SOURCES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, factory)| factory(ctx))
        .ok_or_else(|| FirehoseError::UnknownSource {
            name: name.to_string(),
        })
}

pub fn source_names() -> impl Iterator<Item = &'static str> {
    SOURCES.iter().map(|(name, _)| *name)
}

/// Filesystem layout and settings shared by every source: where the
/// per-source databases live and where importer tools get installed.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub data_dir: PathBuf,
    pub venv: PathBuf,
    pub config: SourcesConfig,
}

impl SourceContext {
    pub fn new(data_dir: PathBuf, venv: PathBuf, config: SourcesConfig) -> Self {
        Self {
            data_dir,
            venv,
            config,
        }
    }

    pub fn database(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.db", name))
    }

    pub fn script_path(&self, script: &str) -> PathBuf {
        self.venv.join("bin").join(script)
    }

    pub fn auth_file_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("auth_{}.json", name))
    }

    /// Create the venv when missing, then install the importer packages
    /// into it.
    pub async fn install_packages(&self, packages: &[&str]) -> Result<()> {
        if !self.venv.is_dir() {
            let mut command = Command::new("python3");
            command.arg("-m").arg("venv").arg(&self.venv);
            run_checked(command).await?;
        }

        let pip = self.venv.join("bin").join("pip");
        for package in packages {
            tracing::debug!("installing {}", package);
            let mut command = Command::new(&pip);
            command.arg("install").arg(package);
            run_checked(command).await?;
        }
        Ok(())
    }
}

/// Run a subprocess to completion, capturing output. A non-zero exit
/// becomes a source error carrying the tail of stderr.
pub(crate) async fn run_checked(mut command: Command) -> Result<()> {
    let program = command.as_std().get_program().to_string_lossy().to_string();
    tracing::debug!("running {:?}", command.as_std());

    let output = command.output().await?;
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(FirehoseError::Source {
        message: format!("{} exited with {}: {}", program, output.status, stderr.trim()),
    })
}

pub(crate) fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| FirehoseError::Config {
        message: format!("environment variable {} is not set", name),
    })
}

pub(crate) fn home_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or_else(|| FirehoseError::Config {
            message: "HOME is not set".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> SourceContext {
        SourceContext::new(
            PathBuf::from("/tmp/firehose-test/data"),
            PathBuf::from("/tmp/firehose-test/venv"),
            SourcesConfig::default(),
        )
    }

    #[test]
    fn registry_resolves_every_name() {
        for (name, _) in SOURCES {
            let source = get_source(name, context()).unwrap();
            assert_eq!(source.name(), *name);
            assert!(!source.description().is_empty());
        }
    }

    #[test]
    fn registry_rejects_unknown_name() {
        let err = get_source("a-thoroughly-invalid-source", context()).err().unwrap();
        assert!(matches!(err, FirehoseError::UnknownSource { .. }));
    }

    #[test]
    fn source_names_match_registry() {
        let names: Vec<&str> = source_names().collect();
        assert_eq!(names.len(), SOURCES.len());
        assert!(names.contains(&"mastodon"));
    }

    #[test]
    fn only_photos_is_disabled() {
        for (name, _) in SOURCES {
            let source = get_source(name, context()).unwrap();
            assert_eq!(source.enabled(), *name != "photos");
        }
    }

    #[test]
    fn context_paths() {
        let ctx = context();
        assert_eq!(
            ctx.database("github"),
            PathBuf::from("/tmp/firehose-test/data/github.db")
        );
        assert_eq!(
            ctx.script_path("github-to-sqlite"),
            PathBuf::from("/tmp/firehose-test/venv/bin/github-to-sqlite")
        );
        assert_eq!(
            ctx.auth_file_path("github"),
            PathBuf::from("/tmp/firehose-test/data/auth_github.json")
        );
    }
}
