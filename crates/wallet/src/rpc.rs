//! JSON-RPC wallet bridge.
//!
//! Forwards typed-data documents to an external wallet (a node, a browser
//! extension relay or a remote signer) with `eth_signTypedData_v4`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy_primitives::Address;
use anyhow::Context;
use async_trait::async_trait;
use hyperliquid_core::signing::{TypedDataDocument, TypedDataSigner};
use hyperliquid_core::types::address_to_wire;
use hyperliquid_core::{Error, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

/// A wallet reached over JSON-RPC.
pub struct RpcWallet {
    url: String,
    address: Address,
    http_client: reqwest::Client,
    next_id: AtomicU64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl RpcWallet {
    const METHOD: &'static str = "eth_signTypedData_v4";

    pub fn new(url: impl Into<String>, address: Address) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            url: url.into(),
            address,
            http_client,
            next_id: AtomicU64::new(1),
        })
    }

    /// Bridge for the `WALLET_RPC_URL` configured in `config`.
    pub fn from_config(config: &hyperliquid_core::config::Config, address: Address) -> anyhow::Result<Self> {
        let url = config
            .wallet_rpc_url
            .clone()
            .context("WALLET_RPC_URL is not configured")?;
        Self::new(url, address)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// `params` are the lowercase address and the document as a JSON string.
    fn request_body(&self, document: &TypedDataDocument) -> Result<Value> {
        let document_json = serde_json::to_string(&document.to_json()?)?;
        Ok(json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": Self::METHOD,
            "params": [address_to_wire(&self.address), document_json],
        }))
    }
}

/// Extracts the signature hex from a JSON-RPC response.
fn parse_response(response: RpcResponse) -> Result<String> {
    if let Some(error) = response.error {
        return Err(Error::SigningFailure {
            message: format!("wallet error {}: {}", error.code, error.message),
        });
    }

    match response.result {
        Some(Value::String(signature)) if signature.starts_with("0x") => Ok(signature),
        other => {
            warn!(result = ?other, "Wallet returned a malformed signature result");
            Err(Error::SigningFailure {
                message: "wallet returned no signature".to_string(),
            })
        }
    }
}

#[async_trait]
impl TypedDataSigner for RpcWallet {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_typed_data(&self, document: &TypedDataDocument) -> Result<String> {
        let body = self.request_body(document)?;
        debug!(
            url = %self.url,
            primary_type = %document.primary_type,
            "Requesting typed-data signature"
        );

        let response = self
            .http_client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::SigningFailure {
                message: format!("wallet request failed: {}", e),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            warn!(status, url = %self.url, "Wallet RPC returned an HTTP error");
            return Err(Error::SigningFailure {
                message: format!("wallet RPC returned HTTP {}", status),
            });
        }

        let response: RpcResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Wallet RPC response is not JSON-RPC");
            Error::SigningFailure {
                message: format!("malformed wallet response: {}", e),
            }
        })?;

        parse_response(response)
    }
}

impl std::fmt::Debug for RpcWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcWallet")
            .field("url", &self.url)
            .field("address", &address_to_wire(&self.address))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyperliquid_core::signing::{
        ActionCategory, LocalSigner, LocalWallet, RawHashSigner, SigningContext,
    };
    use hyperliquid_core::types::{Action, Chain};
    use axum::{http::StatusCode, routing::post, Json, Router};
    use tokio::net::TcpListener;

    // Test private key (DO NOT USE IN PRODUCTION - this is a well-known test key)
    const TEST_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn document() -> TypedDataDocument {
        SigningContext::new(Chain::Testnet)
            .prepare(&Action::typed("noop"), 1, ActionCategory::L1)
            .unwrap()
            .document
    }

    /// Mock JSON-RPC endpoint answering every request with `reply(request_body)`.
    async fn mock_rpc<F>(reply: F) -> String
    where
        F: Fn(Value) -> (StatusCode, Value) + Clone + Send + Sync + 'static,
    {
        let router = Router::new().route(
            "/",
            post(move |Json(request): Json<Value>| async move {
                let (status, body) = reply(request);
                (status, Json(body))
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        url
    }

    #[test]
    fn test_request_body_shape() {
        let wallet = RpcWallet::new("http://localhost:8545", Address::repeat_byte(0xab)).unwrap();
        let body = wallet.request_body(&document()).unwrap();

        assert_eq!(body["method"], "eth_signTypedData_v4");
        assert_eq!(body["params"][0], format!("0x{}", "ab".repeat(20)));

        let sent: Value = serde_json::from_str(body["params"][1].as_str().unwrap()).unwrap();
        assert_eq!(sent["primaryType"], "Agent");
        assert_eq!(sent["domain"]["chainId"], 1337);
    }

    #[test]
    fn test_parse_response() {
        let ok = RpcResponse {
            result: Some(Value::String("0xabc".to_string())),
            error: None,
        };
        assert_eq!(parse_response(ok).unwrap(), "0xabc");

        let rpc_error = RpcResponse {
            result: None,
            error: Some(RpcError {
                code: 4001,
                message: "User rejected the request".to_string(),
            }),
        };
        match parse_response(rpc_error) {
            Err(Error::SigningFailure { message }) => assert!(message.contains("4001")),
            other => panic!("unexpected result: {:?}", other),
        }

        let malformed = RpcResponse {
            result: Some(json!(42)),
            error: None,
        };
        assert!(matches!(
            parse_response(malformed),
            Err(Error::SigningFailure { .. })
        ));
    }

    #[tokio::test]
    async fn test_sign_through_rpc() {
        let signer = LocalSigner::from_hex(TEST_PRIVATE_KEY).unwrap();
        let local = LocalWallet::new(signer.clone());
        let address = signer.address();

        let url = mock_rpc(move |request| {
            assert_eq!(request["method"], "eth_signTypedData_v4");
            let doc_json = request["params"][1].as_str().unwrap().to_string();
            let document: TypedDataDocument = serde_json::from_str(&doc_json).unwrap();
            let hash = document.signing_hash().unwrap();
            let signature = signer.sign_hash(hash.as_slice()).unwrap().to_hex();
            (
                StatusCode::OK,
                json!({"jsonrpc": "2.0", "id": request["id"], "result": signature}),
            )
        })
        .await;

        let wallet = RpcWallet::new(url, address).unwrap();
        let ctx = SigningContext::new(Chain::Testnet);
        let action = Action::typed("noop");

        let via_rpc = ctx
            .sign_with_wallet(&wallet, &action, 5, ActionCategory::L1)
            .await
            .unwrap();
        let direct = ctx
            .sign_with_wallet(&local, &action, 5, ActionCategory::L1)
            .await
            .unwrap();
        assert_eq!(via_rpc, direct);
    }

    #[tokio::test]
    async fn test_http_error_is_signing_failure() {
        let url = mock_rpc(|_| (StatusCode::INTERNAL_SERVER_ERROR, json!({}))).await;
        let wallet = RpcWallet::new(url, Address::ZERO).unwrap();

        let err = wallet.sign_typed_data(&document()).await.unwrap_err();
        assert!(matches!(err, Error::SigningFailure { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_wallet() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let wallet = RpcWallet::new(url, Address::ZERO).unwrap();
        let err = wallet.sign_typed_data(&document()).await.unwrap_err();
        assert!(matches!(err, Error::SigningFailure { .. }));
    }
}
