use std::time::Duration;

use async_trait::async_trait;

use crate::countdown::CountdownId;

/// Drives cancellable countdowns.
///
/// Implementations report one [`crate::countdown::CountdownTick`] per elapsed period
/// through whatever channel they were built with.
#[async_trait]
pub trait CountdownPort: Send + Sync {
    /// Starts a countdown of `ticks` periods, replacing any running countdown of the
    /// same kind.
    async fn start(&self, id: CountdownId, ticks: u32, period: Duration) -> anyhow::Result<()>;

    /// Cancels the countdown if it is still the one running. Unknown ids are ignored.
    async fn cancel(&self, id: CountdownId) -> anyhow::Result<()>;

    /// Cancels every running countdown.
    async fn cancel_all(&self) -> anyhow::Result<()>;
}
