//! Integration layer for arso_weather
//!
//! An integration owns its entities and reports to the host over a bounded
//! channel. The ARSO integration polls the agency's RSS feeds on a timer.

mod arso;
mod message;

use std::error::Error;

use async_trait::async_trait;
use tokio::sync::mpsc;

pub use arso::ArsoIntegration;
pub use arso::PollError;
pub use message::FromIntegrationMessage;

/// Capacity of the integration -> host channel
pub const CHANNEL_CAPACITY: usize = 256;

/// Channel types for messages FROM integrations TO the host
/// These are bounded channels to provide backpressure
pub type FromIntegrationSender = mpsc::Sender<FromIntegrationMessage>;
pub type FromIntegrationReceiver = mpsc::Receiver<FromIntegrationMessage>;

/// Create the integration -> host channel
pub fn channel() -> (FromIntegrationSender, FromIntegrationReceiver) {
    mpsc::channel(CHANNEL_CAPACITY)
}

/// Integration trait that all integrations must implement
#[async_trait]
pub trait Integration: Send + Sync {
    /// Get the name/identifier of this integration
    fn name(&self) -> &str;

    /// Set up the integration - announce entities, start polling, etc.
    ///
    /// The integration receives a sender to report events back to the host
    /// (discovery, state changes, etc.)
    async fn setup(&mut self, tx: FromIntegrationSender) -> Result<(), Box<dyn Error + Send>>;

    /// Shut down the integration gracefully
    async fn shutdown(&mut self) -> Result<(), Box<dyn Error + Send>>;
}
