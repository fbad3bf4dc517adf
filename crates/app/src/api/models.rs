//! Request and response bodies that only the client needs.

use medstore::medicines::Medicine;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::session::Role;

/// Account registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    /// Display name
    pub name: String,

    /// Login email
    pub email: String,

    /// Contact phone
    pub phone: Option<String>,

    /// Password
    pub password: String,

    /// Requested role
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub(super) struct LoginRequest<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

/// Profile fields to change; `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// New contact phone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Password change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordChange {
    /// Current password
    pub current_password: String,

    /// Replacement password
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchRequest<'a> {
    pub(super) query: &'a str,
    pub(super) limit: usize,
}

/// Catalog search result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResponse {
    /// Matching medicines
    #[serde(default)]
    pub medicines: Vec<Medicine>,

    /// Total matches, when reported
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Serialize)]
pub(super) struct StatusUpdate {
    pub(super) is_active: bool,
}

/// Store-wide figures for staff.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DashboardStats {
    /// Orders ever placed
    pub total_orders: u64,

    /// Known customers
    pub total_customers: u64,

    /// Catalog size
    pub total_medicines: u64,

    /// Medicines at or below their reorder level
    pub low_stock_medicines: u64,

    /// Orders placed today
    pub today_orders: u64,

    /// Invoiced revenue
    pub total_revenue: Decimal,
}

/// Figures for the signed-in customer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MyStats {
    /// Orders placed
    pub total_orders: u64,

    /// Orders still pending
    pub pending_orders: u64,

    /// Amount spent
    pub total_spent: Decimal,
}
