use async_trait::async_trait;
use serde::Deserialize;

use super::ReminderSender;
use crate::{config::TwilioConfig, constants::*};

#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: String,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TwilioError {
    code: Option<u64>,
    message: String,
}

/// `whatsapp:+911234567890` addressing, keeping an existing prefix
pub fn whatsapp_address(number: &str) -> String {
    if number.starts_with(WHATSAPP_ADDRESS_PREFIX) {
        number.to_string()
    } else {
        format!("{WHATSAPP_ADDRESS_PREFIX}{number}")
    }
}

/// WhatsApp messages through the Twilio Messages API
pub struct TwilioSender {
    config: TwilioConfig,
    client: reqwest::Client,
}

impl TwilioSender {
    pub fn new(config: TwilioConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            TWILIO_API_BASE, self.config.account_sid
        )
    }

    fn form(&self, body: &str) -> [(&'static str, String); 3] {
        [
            ("From", whatsapp_address(&self.config.from)),
            ("To", whatsapp_address(&self.config.to)),
            ("Body", body.to_string()),
        ]
    }
}

#[async_trait]
impl ReminderSender for TwilioSender {
    async fn send(&self, body: &str) -> anyhow::Result<String> {
        let res = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&self.form(body))
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return match serde_json::from_str::<TwilioError>(&text) {
                Ok(err) => Err(anyhow::anyhow!(
                    "twilio rejected message with {status} (code {:?}): {}",
                    err.code,
                    err.message
                )),
                Err(_) => Err(anyhow::anyhow!("twilio rejected message with {status}: {text}")),
            };
        }
        let message = res.json::<TwilioMessage>().await?;
        tracing::debug!(
            "twilio accepted message {} with status {:?}",
            message.sid,
            message.status
        );
        Ok(message.sid)
    }

    fn provider(&self) -> &'static str {
        "twilio"
    }
}
