use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::{config::ServiceAccount, constants::*, utils::get_epoch_ts};

#[derive(Debug, Serialize, Deserialize)]
struct GoogleTokenClaims {
    iss: String,
    iat: u64,
    exp: u64,
    aud: String,
    scope: String,
}

impl GoogleTokenClaims {
    fn new(client_email: &str, scope: &str) -> Self {
        let ts = get_epoch_ts();
        Self {
            iss: client_email.to_string(),
            iat: ts,
            exp: ts + GOOGLE_TOKEN_LIFETIME_SECS,
            aud: GOOGLE_TOKEN_URL.to_string(),
            scope: scope.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
    expires_in: u64,
}

/// OAuth access token for a service account, refreshed shortly before expiry
pub struct GoogleAuthToken {
    account: ServiceAccount,
    scope: String,
    access_token: Option<String>,
    valid_till: Option<u64>,
    signing_key: Option<EncodingKey>,
}

impl GoogleAuthToken {
    pub fn new(account: ServiceAccount, scope: &str) -> Self {
        Self {
            account,
            scope: scope.to_string(),
            access_token: None,
            valid_till: None,
            signing_key: None,
        }
    }

    pub async fn get_access_token(&mut self, client: &reqwest::Client) -> anyhow::Result<String> {
        if self.is_new_token_required(get_epoch_ts()) {
            self.new_access_token(client).await?;
        }
        self.access_token
            .clone()
            .ok_or(anyhow::anyhow!("access_token not found"))
    }

    fn get_signing_key(&mut self) -> anyhow::Result<&EncodingKey> {
        if self.signing_key.is_none() {
            let key = EncodingKey::from_rsa_pem(self.account.private_key.as_bytes())?;
            self.signing_key = Some(key);
        }
        let signing_key = self
            .signing_key
            .as_ref()
            .ok_or(anyhow::anyhow!("signing_key not found"))?;
        Ok(signing_key)
    }

    fn is_new_token_required(&self, now: u64) -> bool {
        match (&self.access_token, self.valid_till) {
            (Some(_), Some(valid_till)) => now >= valid_till,
            _ => true,
        }
    }

    async fn new_access_token(&mut self, client: &reqwest::Client) -> anyhow::Result<()> {
        let signed_jwt = self.new_jwt()?;
        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", signed_jwt.as_str()),
        ];
        let res = client.post(GOOGLE_TOKEN_URL).form(&params).send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            anyhow::bail!("google token exchange failed with {status}: {body}");
        }
        let response = res.json::<GoogleTokenResponse>().await?;
        let ts = get_epoch_ts();
        let valid_till = (response.expires_in + ts).saturating_sub(GOOGLE_TOKEN_REFRESH_MARGIN_SECS);
        tracing::debug!("obtained google access token valid till {valid_till}");
        self.access_token = Some(response.access_token);
        self.valid_till = Some(valid_till);

        Ok(())
    }

    fn new_jwt(&mut self) -> anyhow::Result<String> {
        let claims = GoogleTokenClaims::new(&self.account.client_email, &self.scope);
        let key = self.get_signing_key()?;
        let header = Header::new(Algorithm::RS256);
        let jwt = encode(&header, &claims, key)?;
        Ok(jwt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> GoogleAuthToken {
        let account = ServiceAccount {
            client_email: "svc@project.iam.gserviceaccount.com".to_string(),
            private_key: "not a key".to_string(),
        };
        GoogleAuthToken::new(account, FIRESTORE_DATASTORE_SCOPE)
    }

    #[test]
    fn test_new_token_required_when_empty() {
        assert!(token().is_new_token_required(100));
    }

    #[test]
    fn test_cached_token_until_valid_till() {
        let mut t = token();
        t.access_token = Some("abc".to_string());
        t.valid_till = Some(1000);
        assert!(!t.is_new_token_required(999));
        assert!(t.is_new_token_required(1000));
    }

    #[test]
    fn test_invalid_private_key_fails() {
        let mut t = token();
        assert!(t.new_jwt().is_err());
    }

    #[test]
    fn test_claims() {
        let claims = GoogleTokenClaims::new("svc@x", FIRESTORE_DATASTORE_SCOPE);
        assert_eq!(claims.exp - claims.iat, GOOGLE_TOKEN_LIFETIME_SECS);
        assert_eq!(claims.aud, GOOGLE_TOKEN_URL);
        assert_eq!(claims.scope, FIRESTORE_DATASTORE_SCOPE);
    }
}
