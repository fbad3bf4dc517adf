//! Dashboard endpoints.

use medstore::medicines::Medicine;

use super::{ApiClient, ApiError, DashboardStats, MyStats};

impl ApiClient {
    /// Store-wide figures.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an expired session.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.send_json(self.get("/api/dashboard/stats")).await
    }

    /// Figures for the signed-in customer.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an expired session.
    pub async fn my_stats(&self) -> Result<MyStats, ApiError> {
        self.send_json(self.get("/api/dashboard/my-stats")).await
    }

    /// Medicines at or below their reorder level.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an expired session.
    pub async fn low_stock(&self) -> Result<Vec<Medicine>, ApiError> {
        self.send_json(self.get("/api/dashboard/low-stock")).await
    }
}
