//! Order endpoints.

use medstore::orders::{Order, OrderRequest};

use super::{ApiClient, ApiError};

/// Page size used when listing every order.
const ORDER_LIST_LIMIT: u32 = 200;

impl ApiClient {
    /// Most recent orders across all customers.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an expired session.
    pub async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.send_json(
            self.get("/api/orders")
                .query(&[("limit", ORDER_LIST_LIMIT)]),
        )
        .await
    }

    /// Orders placed by the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an expired session.
    pub async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.send_json(self.get("/api/orders/my")).await
    }

    /// A single order.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an unknown order.
    pub async fn get_order(&self, id: u64) -> Result<Order, ApiError> {
        self.send_json(self.get(&format!("/api/orders/{id}"))).await
    }

    /// Submit an order.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or a rejected order.
    pub async fn create_order(&self, request: &OrderRequest) -> Result<Order, ApiError> {
        self.send_json(self.post("/api/orders").json(request)).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;
    use wiremock::{
        Mock, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    use super::{super::test_support::*, *};

    #[tokio::test]
    async fn list_requests_two_hundred() -> TestResult {
        let (server, client) = client().await?;

        Mock::given(method("GET"))
            .and(path("/api/orders"))
            .and(query_param("limit", "200"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 1,
                "order_number": "ORD-1",
                "status": "pending",
                "final_amount": 10.0
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let orders = client.list_orders().await?;

        assert_eq!(orders.len(), 1);

        Ok(())
    }
}
