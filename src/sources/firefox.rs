use super::{home_dir, run_checked, SourceContext};
use crate::domain::ports::Source;
use crate::utils::error::{FirehoseError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;

/// Firefox "places" (history & bookmarks), copied straight out of the
/// default profile rather than imported by an external tool.
pub struct FirefoxSource {
    ctx: SourceContext,
}

impl FirefoxSource {
    pub fn new(ctx: SourceContext) -> Self {
        Self { ctx }
    }

    /// The platform-dependent Firefox application directory.
    fn firefox_dir() -> Result<PathBuf> {
        let home = home_dir()?;
        let candidates = [
            home.join("Library/Application Support/Firefox"),
            home.join(".mozilla/firefox"),
        ];
        candidates
            .iter()
            .find(|path| path.is_dir())
            .cloned()
            .ok_or_else(|| FirehoseError::Source {
                message: "unable to locate the Firefox application directory".to_string(),
            })
    }
}

/// Pull the default profile path out of `profiles.ini`: the `Default=`
/// entry of the first `[Install...]` section.
fn default_profile(ini: &str) -> Option<String> {
    let mut in_install_section = false;
    for line in ini.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_install_section = line.starts_with("[Install");
        } else if in_install_section {
            if let Some(value) = line.strip_prefix("Default=") {
                return Some(value.to_string());
            }
        }
    }
    None
}

#[async_trait]
impl Source for FirefoxSource {
    fn name(&self) -> &'static str {
        "firefox"
    }

    fn description(&self) -> &'static str {
        "Firefox \"places\" (history & bookmarks)"
    }

    // Nothing to install, the browser maintains the database itself.
    async fn install(&self) -> Result<()> {
        Ok(())
    }

    fn is_installed(&self) -> bool {
        true
    }

    async fn update(&self) -> Result<()> {
        let firefox_dir = Self::firefox_dir()?;
        let profile_config = firefox_dir.join("profiles.ini");

        if !profile_config.is_file() {
            return Err(FirehoseError::Source {
                message: format!(
                    "unable to determine profile, '{}' missing",
                    profile_config.display()
                ),
            });
        }

        let ini = tokio::fs::read_to_string(&profile_config).await?;
        let profile = default_profile(&ini).ok_or_else(|| FirehoseError::Source {
            message: format!("no default profile in '{}'", profile_config.display()),
        })?;

        let database = self.ctx.database(self.name());
        tokio::fs::copy(firefox_dir.join(profile).join("places.sqlite"), &database).await?;

        // The copy keeps Firefox's WAL journal mode; switch it off so
        // the query service can open the file read-only.
        let mut command = Command::new("sqlite3");
        command.arg(&database).arg("PRAGMA journal_mode=delete;");
        run_checked(command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_from_install_section() {
        let ini = "\
[Install4F96D1932A9F858E]
Default=Profiles/abcd1234.default-release
Locked=1

[Profile0]
Name=default
IsRelative=1
Path=Profiles/abcd1234.default-release
";
        assert_eq!(
            default_profile(ini).as_deref(),
            Some("Profiles/abcd1234.default-release")
        );
    }

    #[test]
    fn default_profile_ignores_other_sections() {
        let ini = "\
[General]
StartWithLastProfile=1

[Profile0]
Name=default
Default=1
";
        assert_eq!(default_profile(ini), None);
    }

    #[test]
    fn default_profile_empty_ini() {
        assert_eq!(default_profile(""), None);
    }
}
