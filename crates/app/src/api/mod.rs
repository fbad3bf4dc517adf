//! Order service client
//!
//! REST client for the order and catalog service. Requests carry the
//! session's bearer token; an unauthorized response clears the session.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{config::ApiConfig, session::SessionContext};

mod admin;
mod auth;
mod dashboard;
mod errors;
mod medicines;
mod models;
mod orders;

pub use errors::ApiError;
pub use models::{
    DashboardStats, MyStats, PasswordChange, ProfileUpdate, RegisterRequest, SearchResponse,
};

/// HTTP client for the order and catalog service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    session: SessionContext,
}

impl ApiClient {
    /// Create a client from configuration, sharing `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, session: SessionContext) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self::with_client(config.base_url(), http, session))
    }

    /// Create a client around an existing HTTP client.
    pub fn with_client(base_url: impl Into<String>, http: Client, session: SessionContext) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            session,
        }
    }

    /// Service base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Session shared with this client.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Download link for an order's invoice PDF. Nothing is fetched.
    pub fn invoice_download_url(&self, order_id: u64) -> String {
        format!("{}/api/invoices/{order_id}/download", self.base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    fn put(&self, path: &str) -> RequestBuilder {
        self.http.put(self.url(path))
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        self.http.delete(self.url(path))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.dispatch(request).await?;

        serde_json::from_str(&body).map_err(ApiError::Decode)
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.dispatch(request).await?;

        Ok(())
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let request = match self.session.token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let request = request.build()?;

        debug!(method = %request.method(), url = %request.url(), "dispatching request");

        let response = self.http.execute(request).await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.session.expire().await?;

            return Err(ApiError::SessionExpired);
        }

        if !status.is_success() {
            let text = match response.text().await {
                Ok(text) => text,
                Err(error) => {
                    debug!(%status, %error, "failed to read error body");
                    String::new()
                }
            };

            debug!(%status, "request failed");

            return Err(ApiError::Service {
                status: status.as_u16(),
                message: errors::service_message(status.as_u16(), &text),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::{Value, json};
    use wiremock::MockServer;

    use crate::session::{MemoryStorage, SessionContext, StorageError};

    use super::ApiClient;

    pub(crate) async fn client() -> Result<(MockServer, ApiClient), StorageError> {
        let server = MockServer::start().await;
        let session = SessionContext::restore(MemoryStorage::new())?;
        let client = ApiClient::with_client(server.uri(), reqwest::Client::new(), session);

        Ok((server, client))
    }

    pub(crate) fn user_json(role: &str) -> Value {
        json!({
            "id": 4,
            "name": "Asha",
            "email": "asha@example.com",
            "phone": "9000000004",
            "is_active": true,
            "role": role,
            "created_at": "2024-05-01T09:30:00"
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;
    use wiremock::{
        Mock, ResponseTemplate,
        matchers::{header, method, path},
    };

    use crate::session::{AuthResponse, TOKEN_KEY, USER_KEY};

    use super::{test_support::*, *};

    async fn sign_in(client: &ApiClient) -> TestResult {
        let auth: AuthResponse = serde_json::from_value(json!({
            "access_token": "token-1",
            "token_type": "bearer",
            "user": user_json("shopkeeper")
        }))?;

        client.session().lock().await.sign_in(auth)?;

        Ok(())
    }

    #[tokio::test]
    async fn requests_carry_bearer_token() -> TestResult {
        let (server, client) = client().await?;
        sign_in(&client).await?;

        Mock::given(method("GET"))
            .and(path("/api/dashboard/stats"))
            .and(header("authorization", "Bearer token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_orders": 12,
                "total_customers": 5,
                "total_medicines": 40,
                "low_stock_medicines": 3,
                "today_orders": 2,
                "total_revenue": 1520.5
            })))
            .expect(1)
            .mount(&server)
            .await;

        let stats = client.dashboard_stats().await?;

        assert_eq!(stats.low_stock_medicines, 3);

        Ok(())
    }

    #[tokio::test]
    async fn unauthorized_response_clears_session() -> TestResult {
        let (server, client) = client().await?;
        sign_in(&client).await?;

        Mock::given(method("GET"))
            .and(path("/api/orders/my"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "detail": "Could not validate credentials" })),
            )
            .mount(&server)
            .await;

        let result = client.my_orders().await;

        assert!(
            matches!(result, Err(ApiError::SessionExpired)),
            "expected SessionExpired, got {result:?}"
        );

        let session = client.session().lock().await;

        assert!(!session.is_authenticated());
        assert_eq!(session.storage().get(TOKEN_KEY)?, None);
        assert_eq!(session.storage().get(USER_KEY)?, None);

        Ok(())
    }

    #[tokio::test]
    async fn service_detail_is_surfaced() -> TestResult {
        let (server, client) = client().await?;

        Mock::given(method("GET"))
            .and(path("/api/orders/99"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Order not found" })))
            .mount(&server)
            .await;

        let error = client.get_order(99).await.err().ok_or("expected an error")?;

        assert_eq!(error.service_message(), Some("Order not found"));
        assert_eq!(error.to_string(), "Order not found");

        Ok(())
    }

    #[tokio::test]
    async fn missing_detail_falls_back_to_status_line() -> TestResult {
        let (server, client) = client().await?;

        Mock::given(method("GET"))
            .and(path("/api/dashboard/low-stock"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let error = client.low_stock().await.err().ok_or("expected an error")?;

        assert!(
            matches!(error, ApiError::Service { status: 503, .. }),
            "got {error:?}"
        );
        assert_eq!(error.to_string(), "Request failed with status 503");

        Ok(())
    }

    #[tokio::test]
    async fn invoice_url_is_built_without_a_request() -> TestResult {
        let (server, client) = client().await?;

        assert_eq!(
            client.invoice_download_url(17),
            format!("{}/api/invoices/17/download", server.uri())
        );

        Ok(())
    }
}
