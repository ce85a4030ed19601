//! HTTP adapter for the custody desk API.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kobo_shared::config::CustodyConfig;
use kobo_shared::types::UserId;

use super::client::{CustodyClient, DepositAddress, VerifiedDeposit};
use super::error::CustodyError;

/// Statuses the desk uses for deposits that have reached finality.
const SETTLED_STATUSES: [&str; 3] = ["success", "successful", "confirmed"];

/// Length at which error response bodies are cut off.
const MAX_ERROR_BODY: usize = 256;

/// Custody desk client over HTTP.
///
/// Requests carry the configured API key as a bearer token and a bounded
/// timeout; a timed-out verification is a processing failure for that one
/// event, not a worker failure.
pub struct HttpCustodyClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpCustodyClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &CustodyConfig) -> Result<Self, CustodyError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| CustodyError::Transport(err.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, CustodyError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let body: String = body.chars().take(MAX_ERROR_BODY).collect();
        Err(CustodyError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl CustodyClient for HttpCustodyClient {
    async fn verify_transaction(&self, reference: &str) -> Result<VerifiedDeposit, CustodyError> {
        let url = format!("{}/v1/transactions/{reference}", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|err| CustodyError::Transport(err.to_string()))?;
        let response = Self::check(response).await?;

        let payload: VerifyResponse = response
            .json()
            .await
            .map_err(|err| CustodyError::InvalidResponse(err.to_string()))?;
        payload.data.into_deposit()
    }

    async fn create_address(
        &self,
        owner_id: UserId,
        asset_type: &str,
    ) -> Result<DepositAddress, CustodyError> {
        let url = format!("{}/v1/addresses", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&CreateAddressRequest {
                label: owner_id.to_string(),
                asset_type,
            })
            .send()
            .await
            .map_err(|err| CustodyError::Transport(err.to_string()))?;
        let response = Self::check(response).await?;

        let payload: CreateAddressResponse = response
            .json()
            .await
            .map_err(|err| CustodyError::InvalidResponse(err.to_string()))?;
        payload.data.into_address()
    }
}

// ========== Wire shapes ==========

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    data: DepositPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DepositPayload {
    #[serde(rename = "ref")]
    reference: String,
    idempotency_key: String,
    label: String,
    address: String,
    asset_type: String,
    amount: Decimal,
    hash: String,
    status: String,
}

impl DepositPayload {
    fn into_deposit(self) -> Result<VerifiedDeposit, CustodyError> {
        let owner_id = self.label.parse::<UserId>().map_err(|_| {
            CustodyError::InvalidResponse(format!(
                "address label is not a user id: {}",
                self.label
            ))
        })?;
        let settled = SETTLED_STATUSES
            .iter()
            .any(|s| self.status.eq_ignore_ascii_case(s));

        Ok(VerifiedDeposit {
            reference: self.reference,
            idempotency_key: self.idempotency_key,
            owner_id,
            address: self.address,
            asset_type: self.asset_type,
            amount: self.amount,
            hash: self.hash,
            settled,
            provider_status: self.status,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAddressRequest<'a> {
    label: String,
    asset_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateAddressResponse {
    data: AddressPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressPayload {
    address: String,
    asset_type: String,
    label: String,
}

impl AddressPayload {
    fn into_address(self) -> Result<DepositAddress, CustodyError> {
        let owner_id = self.label.parse::<UserId>().map_err(|_| {
            CustodyError::InvalidResponse(format!(
                "address label is not a user id: {}",
                self.label
            ))
        })?;

        Ok(DepositAddress {
            address: self.address,
            asset_type: self.asset_type,
            owner_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn deposit_json(label: &str, status: &str) -> String {
        format!(
            r#"{{
                "data": {{
                    "ref": "cust-001",
                    "idempotencyKey": "idem-abc",
                    "label": "{label}",
                    "address": "0xdeadbeef",
                    "assetType": "USDT",
                    "amount": "125.5",
                    "hash": "0xfeed",
                    "status": "{status}"
                }}
            }}"#
        )
    }

    #[test]
    fn test_verify_payload_maps_to_settled_deposit() {
        let owner = Uuid::new_v4();
        let payload: VerifyResponse =
            serde_json::from_str(&deposit_json(&owner.to_string(), "Success")).unwrap();
        let deposit = payload.data.into_deposit().unwrap();

        assert_eq!(deposit.reference, "cust-001");
        assert_eq!(deposit.idempotency_key, "idem-abc");
        assert_eq!(deposit.owner_id.into_inner(), owner);
        assert_eq!(deposit.amount, dec!(125.5));
        assert!(deposit.settled);
        assert_eq!(deposit.provider_status, "Success");
    }

    #[test]
    fn test_unrecognized_status_is_not_settled() {
        let owner = Uuid::new_v4();
        let payload: VerifyResponse =
            serde_json::from_str(&deposit_json(&owner.to_string(), "awaiting_confirmations"))
                .unwrap();
        let deposit = payload.data.into_deposit().unwrap();

        assert!(!deposit.settled);
        assert_eq!(deposit.provider_status, "awaiting_confirmations");
    }

    #[test]
    fn test_bad_label_is_an_invalid_response() {
        let payload: VerifyResponse =
            serde_json::from_str(&deposit_json("not-a-uuid", "success")).unwrap();
        let err = payload.data.into_deposit().unwrap_err();

        assert!(matches!(err, CustodyError::InvalidResponse(_)));
    }

    #[test]
    fn test_address_payload_round_trip() {
        let owner = Uuid::new_v4();
        let json = format!(
            r#"{{"data": {{"address": "0xabc", "assetType": "USDC", "label": "{owner}"}}}}"#
        );
        let payload: CreateAddressResponse = serde_json::from_str(&json).unwrap();
        let address = payload.data.into_address().unwrap();

        assert_eq!(address.address, "0xabc");
        assert_eq!(address.asset_type, "USDC");
        assert_eq!(address.owner_id.into_inner(), owner);
    }
}
