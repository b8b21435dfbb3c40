use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::config::MessagingConfig;

use self::{gateway::GatewaySender, twilio::TwilioSender};

pub mod gateway;
pub mod twilio;

/// One outbound notification to the configured destination.
///
/// Returns the provider's message id once the provider accepted the message.
/// Implementations never retry.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReminderSender: Send + Sync {
    async fn send(&self, body: &str) -> anyhow::Result<String>;

    fn provider(&self) -> &'static str;
}

pub fn build_sender(config: &MessagingConfig, client: reqwest::Client) -> Box<dyn ReminderSender> {
    match config {
        MessagingConfig::Twilio(twilio) => Box::new(TwilioSender::new(twilio.clone(), client)),
        MessagingConfig::Gateway(gateway) => Box::new(GatewaySender::new(gateway.clone(), client)),
    }
}
