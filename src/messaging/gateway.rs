use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ReminderSender;
use crate::config::GatewayConfig;

#[derive(Debug, Serialize)]
struct GatewayPayload<'a> {
    to: &'a str,
    message: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GatewayResponse {
    #[serde(alias = "messageId")]
    id: Option<String>,
}

/// Generic WhatsApp HTTP gateway taking `{"to", "message"}` JSON
pub struct GatewaySender {
    config: GatewayConfig,
    client: reqwest::Client,
}

impl GatewaySender {
    pub fn new(config: GatewayConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl ReminderSender for GatewaySender {
    async fn send(&self, body: &str) -> anyhow::Result<String> {
        let payload = GatewayPayload {
            to: &self.config.to,
            message: body,
        };
        let mut req = self.client.post(&self.config.url).json(&payload);
        if let Some(token) = self.config.token.as_ref() {
            req = req.bearer_auth(token);
        }
        let res = req.send().await?;
        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            anyhow::bail!("gateway rejected message with {status}: {text}");
        }
        // gateways differ in what they return; an id is optional
        let text = res.text().await.unwrap_or_default();
        let response = serde_json::from_str::<GatewayResponse>(&text).unwrap_or_default();
        Ok(response.id.unwrap_or_else(|| "accepted".to_string()))
    }

    fn provider(&self) -> &'static str {
        "gateway"
    }
}
