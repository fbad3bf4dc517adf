//! Account endpoints.

use crate::session::{AuthResponse, User};

use super::{
    ApiClient, ApiError,
    models::{LoginRequest, PasswordChange, ProfileUpdate, RegisterRequest},
};

impl ApiClient {
    /// Create an account and sign in as it.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure, a rejected request, or if the session cannot be stored.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        let auth: AuthResponse = self
            .send_json(self.post("/api/auth/register").json(request))
            .await?;

        self.store_sign_in(auth).await
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure, rejected credentials, or if the session cannot be stored.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let auth: AuthResponse = self
            .send_json(
                self.post("/api/auth/login")
                    .json(&LoginRequest { email, password }),
            )
            .await?;

        self.store_sign_in(auth).await
    }

    /// Sign out locally. The service keeps no session state.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be cleared from storage.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.session.lock().await.sign_out()?;

        Ok(())
    }

    /// Fetch the signed-in user and refresh the stored copy.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an expired session.
    pub async fn me(&self) -> Result<User, ApiError> {
        let user: User = self.send_json(self.get("/api/auth/me")).await?;

        self.session.lock().await.refresh_user(user.clone())?;

        Ok(user)
    }

    /// Change name or phone of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an expired session.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let user: User = self
            .send_json(self.put("/api/auth/profile").json(update))
            .await?;

        self.session.lock().await.refresh_user(user.clone())?;

        Ok(user)
    }

    /// Change the signed-in user's password.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure, a wrong current password, or an expired session.
    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        self.send_empty(self.put("/api/auth/change-password").json(change))
            .await
    }

    async fn store_sign_in(&self, auth: AuthResponse) -> Result<User, ApiError> {
        let user = auth.user.clone();

        self.session.lock().await.sign_in(auth)?;

        Ok(user)
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

    use crate::session::{Role, TOKEN_KEY, USER_KEY};

    use super::{super::test_support::*, *};

    #[tokio::test]
    async fn login_signs_in() -> TestResult {
        let (server, client) = client().await?;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({ "email": "asha@example.com", "password": "secret" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "token-2",
                "token_type": "bearer",
                "user": user_json("admin")
            })))
            .expect(1)
            .mount(&server)
            .await;

        let user = client.login("asha@example.com", "secret").await?;

        assert_eq!(user.role, Role::Admin);

        let session = client.session().lock().await;

        assert_eq!(session.token(), Some("token-2"));
        assert_eq!(session.storage().get(TOKEN_KEY)?.as_deref(), Some("token-2"));

        Ok(())
    }

    #[tokio::test]
    async fn register_sends_role_and_signs_in() -> TestResult {
        let (server, client) = client().await?;

        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .and(body_json(json!({
                "name": "Asha",
                "email": "asha@example.com",
                "phone": null,
                "password": "secret",
                "role": "customer"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "token-3",
                "token_type": "bearer",
                "user": user_json("customer")
            })))
            .expect(1)
            .mount(&server)
            .await;

        client
            .register(&RegisterRequest {
                name: "Asha".to_string(),
                email: "asha@example.com".to_string(),
                phone: None,
                password: "secret".to_string(),
                role: Role::Customer,
            })
            .await?;

        assert_eq!(client.session().token().await.as_deref(), Some("token-3"));

        Ok(())
    }

    #[tokio::test]
    async fn rejected_login_leaves_session_signed_out() -> TestResult {
        let (server, client) = client().await?;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "detail": "Incorrect email or password" })),
            )
            .mount(&server)
            .await;

        let result = client.login("asha@example.com", "wrong").await;

        assert!(matches!(result, Err(ApiError::SessionExpired)), "got {result:?}");
        assert_eq!(client.session().token().await, None);

        Ok(())
    }

    #[tokio::test]
    async fn profile_update_refreshes_stored_user() -> TestResult {
        let (server, client) = client().await?;

        let auth: AuthResponse = serde_json::from_value(json!({
            "access_token": "token-4",
            "user": user_json("customer")
        }))?;
        client.session().lock().await.sign_in(auth)?;

        let mut updated = user_json("customer");
        updated["phone"] = json!("9111111111");

        Mock::given(method("PUT"))
            .and(path("/api/auth/profile"))
            .and(body_json(json!({ "phone": "9111111111" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(updated))
            .expect(1)
            .mount(&server)
            .await;

        let user = client
            .update_profile(&ProfileUpdate {
                name: None,
                phone: Some("9111111111".to_string()),
            })
            .await?;

        assert_eq!(user.phone.as_deref(), Some("9111111111"));

        let session = client.session().lock().await;
        let stored = session.storage().get(USER_KEY)?.ok_or("user not stored")?;

        assert_eq!(serde_json::from_str::<User>(&stored)?, user);

        Ok(())
    }

    #[tokio::test]
    async fn password_change_sends_both_passwords() -> TestResult {
        let (server, client) = client().await?;

        Mock::given(method("PUT"))
            .and(path("/api/auth/change-password"))
            .and(body_json(json!({ "current_password": "secret", "new_password": "s3cret!" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Password changed" })))
            .expect(1)
            .mount(&server)
            .await;

        client
            .change_password(&PasswordChange {
                current_password: "secret".to_string(),
                new_password: "s3cret!".to_string(),
            })
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn wrong_current_password_is_reported() -> TestResult {
        let (server, client) = client().await?;

        Mock::given(method("PUT"))
            .and(path("/api/auth/change-password"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "detail": "Current password is incorrect" })),
            )
            .mount(&server)
            .await;

        let error = client
            .change_password(&PasswordChange {
                current_password: "wrong".to_string(),
                new_password: "s3cret!".to_string(),
            })
            .await
            .err()
            .ok_or("expected an error")?;

        assert_eq!(error.service_message(), Some("Current password is incorrect"));

        Ok(())
    }
}
