use crate::utils::error::Result;
use async_trait::async_trait;

/// Contract every data source adapter fulfils.
///
/// A source owns one local database populated by an external importer
/// tool. The CLI only ever talks to this trait; how a source installs
/// and drives its importer is its own business.
#[async_trait]
pub trait Source: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn enabled(&self) -> bool {
        true
    }

    /// Install the importer tooling this source shells out to.
    async fn install(&self) -> Result<()>;

    fn is_installed(&self) -> bool;

    /// Refresh the local database from the upstream service.
    async fn update(&self) -> Result<()>;
}
