//! Catalog endpoints.

use medstore::medicines::{Medicine, MedicineId, MedicineInput, MedicineUpdate};

use super::{
    ApiClient, ApiError,
    models::{SearchRequest, SearchResponse},
};

impl ApiClient {
    /// Page through the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an unexpected response body.
    pub async fn list_medicines(&self, skip: u32, limit: u32) -> Result<Vec<Medicine>, ApiError> {
        self.send_json(
            self.get("/api/medicines")
                .query(&[("skip", skip), ("limit", limit)]),
        )
        .await
    }

    /// Search the catalog by name.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an unexpected response body.
    pub async fn search_medicines(&self, query: &str, limit: usize) -> Result<SearchResponse, ApiError> {
        self.send_json(
            self.post("/api/medicines/search")
                .json(&SearchRequest { query, limit }),
        )
        .await
    }

    /// Medicines whose name matches `name`.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an unexpected response body.
    pub async fn medicines_by_name(&self, name: &str) -> Result<Vec<Medicine>, ApiError> {
        self.send_json(self.get("/api/medicines/by-name").query(&[("name", name)]))
            .await
    }

    /// Add a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or a rejected entry.
    pub async fn create_medicine(&self, medicine: &MedicineInput) -> Result<Medicine, ApiError> {
        self.send_json(self.post("/api/medicines").json(medicine))
            .await
    }

    /// Change fields of a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an unknown medicine.
    pub async fn update_medicine(
        &self,
        id: MedicineId,
        update: &MedicineUpdate,
    ) -> Result<Medicine, ApiError> {
        self.send_json(self.put(&format!("/api/medicines/{id}")).json(update))
            .await
    }

    /// Remove a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an unknown medicine.
    pub async fn delete_medicine(&self, id: MedicineId) -> Result<(), ApiError> {
        self.send_empty(self.delete(&format!("/api/medicines/{id}")))
            .await
    }
}
