//! Authenticated REST transport.
//!
//! `ExchangeClient` owns the credential and the HTTP connection and
//! performs signed GET/POST/DELETE calls with normalized outcomes. The
//! `ExchangeApi` trait is the seam the lifecycle and feed components are
//! written against, so tests can drive them with a scripted transport.

use crate::auth::{
    Credential, HEADER_KEY, HEADER_PASSPHRASE, HEADER_SIGN, HEADER_TIMESTAMP,
};
use crate::error::{ApiError, ClientError, ClientResult};
use crate::types::{Account, BookSnapshot, Order};
use reqwest::{header::CONTENT_TYPE, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Surface consumed by [`OrderLifecycle`](crate::OrderLifecycle) and
/// [`TickerFeed`](crate::TickerFeed).
#[allow(async_fn_in_trait)]
pub trait ExchangeApi {
    /// Issue a signed call against the exchange.
    ///
    /// A non-null `body` forces a POST; otherwise the call is a GET unless
    /// `method` is DELETE. `allow_404` marks HTTP 404 as a valid outcome
    /// for idempotent lookups and cancels.
    async fn call(
        &self,
        endpoint: &str,
        body: Option<&Value>,
        method: Method,
        allow_404: bool,
    ) -> ClientResult<Value>;
}

/// Signed REST client for the exchange.
#[derive(Clone)]
pub struct ExchangeClient {
    http: Client,
    base_url: String,
    credential: Credential,
}

impl ExchangeClient {
    /// Create a client against `base_url` with the given credential.
    pub fn new(base_url: impl Into<String>, credential: Credential) -> ClientResult<Self> {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Setup(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            credential,
        })
    }

    async fn dispatch(
        &self,
        endpoint: &str,
        body: Option<&Value>,
        method: Method,
        allow_404: bool,
    ) -> ClientResult<Value> {
        // The signed path includes the query string, exactly as sent.
        let path = format!("/{endpoint}");
        let url = format!("{}{endpoint}", self.base_url);

        let payload = match body {
            Some(value) => serde_json::to_string(value).map_err(|e| ClientError::Parse {
                endpoint: endpoint.to_string(),
                message: format!("request body serialization: {e}"),
            })?,
            None => String::new(),
        };

        // A body forces POST; DELETE passes through; everything else is GET.
        let method = if body.is_some() {
            Method::POST
        } else if method == Method::DELETE {
            Method::DELETE
        } else {
            Method::GET
        };

        let auth = self
            .credential
            .auth_headers(method.as_str(), &path, &payload)?;

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(HEADER_SIGN, auth.signature)
            .header(HEADER_TIMESTAMP, auth.timestamp)
            .header(HEADER_KEY, auth.key)
            .header(HEADER_PASSPHRASE, auth.passphrase)
            .header(CONTENT_TYPE, "application/json");
        if body.is_some() {
            request = request.body(payload.clone());
        }

        debug!(%url, %method, "issuing exchange request");

        let response = request.send().await.map_err(|e| ClientError::Transport {
            endpoint: endpoint.to_string(),
            source: e,
        })?;
        let status = response.status();
        let raw = response.text().await.map_err(|e| ClientError::Transport {
            endpoint: endpoint.to_string(),
            source: e,
        })?;

        if status == StatusCode::OK || (allow_404 && status == StatusCode::NOT_FOUND) {
            if raw.is_empty() {
                return Ok(Value::Object(Default::default()));
            }
            return serde_json::from_str(&raw).map_err(|e| ClientError::Parse {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            });
        }

        let server_message = serde_json::from_str::<Value>(&raw)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from));

        Err(ApiError {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            server_message,
            request_body: body.map(|_| payload),
            raw_response: raw,
        }
        .into())
    }

    fn parse<T: DeserializeOwned>(endpoint: &str, value: Value) -> ClientResult<T> {
        serde_json::from_value(value).map_err(|e| ClientError::Parse {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    /// Fetch all account balances.
    pub async fn accounts(&self) -> ClientResult<Vec<Account>> {
        let value = self.call("accounts", None, Method::GET, false).await?;
        Self::parse("accounts", value)
    }

    /// Fetch all open orders.
    pub async fn open_orders(&self) -> ClientResult<Vec<Order>> {
        let endpoint = "orders?status=open";
        let value = self.call(endpoint, None, Method::GET, false).await?;
        Self::parse(endpoint, value)
    }

    /// Fetch the order book at the given aggregation level.
    pub async fn book(&self, product_id: &str, level: u8) -> ClientResult<BookSnapshot> {
        let endpoint = format!("products/{product_id}/book?level={level}");
        let value = self.call(&endpoint, None, Method::GET, false).await?;
        Self::parse(&endpoint, value)
    }
}

impl ExchangeApi for ExchangeClient {
    async fn call(
        &self,
        endpoint: &str,
        body: Option<&Value>,
        method: Method,
        allow_404: bool,
    ) -> ClientResult<Value> {
        self.dispatch(endpoint, body, method, allow_404).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    const TEST_SECRET: &str = "c3VwZXItc2VjcmV0LWhtYWMta2V5LTAxMjM0NTY3ODk=";

    fn test_client(server: &mockito::ServerGuard) -> ExchangeClient {
        let credential = Credential::new("test-key", TEST_SECRET, "test-pass");
        ExchangeClient::new(server.url(), credential).unwrap()
    }

    #[tokio::test]
    async fn test_get_carries_auth_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/accounts")
            .match_header("CB-ACCESS-KEY", "test-key")
            .match_header("CB-ACCESS-PASSPHRASE", "test-pass")
            .match_header("CB-ACCESS-SIGN", Matcher::Regex("^[A-Za-z0-9+/=]+$".into()))
            .match_header("CB-ACCESS-TIMESTAMP", Matcher::Regex(r"^\d+$".into()))
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = test_client(&server);
        let value = client
            .call("accounts", None, Method::GET, false)
            .await
            .unwrap();

        assert_eq!(value, json!([]));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_body_forces_post_and_sends_exact_json() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({"product_id": "BTC-USD", "side": "buy"});
        let mock = server
            .mock("POST", "/orders")
            .match_body(Matcher::JsonString(body.to_string()))
            .with_status(200)
            .with_body(r#"{"id":"abc"}"#)
            .create_async()
            .await;

        let client = test_client(&server);
        let value = client
            .call("orders", Some(&body), Method::GET, false)
            .await
            .unwrap();

        assert_eq!(value["id"], "abc");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_allow_404_passes_body_through() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/orders/missing")
            .with_status(404)
            .with_body(r#"{"message":"NotFound"}"#)
            .create_async()
            .await;

        let client = test_client(&server);

        let allowed = client
            .call("orders/missing", None, Method::GET, true)
            .await
            .unwrap();
        assert_eq!(allowed["message"], "NotFound");

        let denied = client
            .call("orders/missing", None, Method::GET, false)
            .await;
        match denied {
            Err(ClientError::Api(api)) => assert_eq!(api.status, 404),
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_success_body_is_empty_object() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/orders/abc")
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        let client = test_client(&server);
        let value = client
            .call("orders/abc", None, Method::DELETE, true)
            .await
            .unwrap();

        assert_eq!(value, json!({}));
    }

    #[tokio::test]
    async fn test_server_error_yields_full_diagnostics() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/orders")
            .with_status(500)
            .with_body(r#"{"message":"Insufficient funds"}"#)
            .create_async()
            .await;

        let client = test_client(&server);
        let body = json!({"side": "buy"});
        let result = client.call("orders", Some(&body), Method::POST, false).await;

        match result {
            Err(ClientError::Api(api)) => {
                assert_eq!(api.status, 500);
                assert_eq!(api.server_message.as_deref(), Some("Insufficient funds"));
                assert_eq!(api.request_body.as_deref(), Some(r#"{"side":"buy"}"#));
                assert_eq!(api.raw_response, r#"{"message":"Insufficient funds"}"#);
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_accounts_parses_typed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/accounts")
            .with_status(200)
            .with_body(
                r#"[{"currency":"BTC","balance":"1.20000000","available":"1.00000000","hold":"0.20000000"},
                    {"currency":"USD","balance":"5000.00"}]"#,
            )
            .create_async()
            .await;

        let client = test_client(&server);
        let accounts = client.accounts().await.unwrap();

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].currency, "BTC");
        assert_eq!(accounts[1].balance.display_usd(), "5000.00");
    }

    #[tokio::test]
    async fn test_open_orders_signs_query_string() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/orders?status=open")
            .match_header("CB-ACCESS-SIGN", Matcher::Regex("^[A-Za-z0-9+/=]+$".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = test_client(&server);
        let orders = client.open_orders().await.unwrap();

        assert!(orders.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_payload_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/accounts")
            .with_status(200)
            .with_body(r#"{"not":"an array"}"#)
            .create_async()
            .await;

        let client = test_client(&server);
        let result = client.accounts().await;
        assert!(matches!(result, Err(ClientError::Parse { .. })));
    }
}
