//! User administration endpoints.

use crate::session::User;

use super::{ApiClient, ApiError, models::StatusUpdate};

impl ApiClient {
    /// Every account.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an expired session.
    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        self.send_json(self.get("/api/admin/users")).await
    }

    /// Enable or disable an account.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an unknown account.
    pub async fn set_user_active(&self, id: u64, is_active: bool) -> Result<(), ApiError> {
        self.send_empty(
            self.put(&format!("/api/admin/users/{id}/status"))
                .json(&StatusUpdate { is_active }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;
    use wiremock::{
        Mock, ResponseTemplate,
        matchers::{body_json, method, path},
    };

    use super::{super::test_support::*, *};

    #[tokio::test]
    async fn set_user_active_puts_status() -> TestResult {
        let (server, client) = client().await?;

        Mock::given(method("PUT"))
            .and(path("/api/admin/users/4/status"))
            .and(body_json(json!({ "is_active": false })))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json("customer")))
            .expect(1)
            .mount(&server)
            .await;

        client.set_user_active(4, false).await?;

        Ok(())
    }
}
