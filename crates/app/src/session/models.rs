//! Session models

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Account role; decides which areas of the store a user may reach.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Shops from the catalog and places their own orders.
    #[default]
    Customer,

    /// Runs the counter: manual orders, stock and all orders.
    Shopkeeper,

    /// Shopkeeper rights plus user management.
    Admin,
}

impl Role {
    /// Roles allowed on staff pages: all orders, catalog edits, low stock.
    pub const STAFF: [Self; 2] = [Self::Shopkeeper, Self::Admin];

    /// Roles allowed on user management.
    pub const ADMIN: [Self; 1] = [Self::Admin];

    /// Roles allowed on ordering pages: cart, manual order, chat order.
    pub const ORDERING: [Self; 3] = [Self::Customer, Self::Shopkeeper, Self::Admin];
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Customer => f.write_str("customer"),
            Self::Shopkeeper => f.write_str("shopkeeper"),
            Self::Admin => f.write_str("admin"),
        }
    }
}

/// Signed-in account as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account identifier
    pub id: u64,

    /// Display name
    pub name: String,

    /// Login email
    pub email: String,

    /// Contact phone
    #[serde(default)]
    pub phone: Option<String>,

    /// Whether the account may sign in
    #[serde(default = "default_active")]
    pub is_active: bool,

    /// Account role
    #[serde(default)]
    pub role: Role,

    /// Creation time as reported by the service
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_active() -> bool {
    true
}

/// Successful login or registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests
    pub access_token: String,

    /// Token scheme, always `bearer`
    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Account the token belongs to
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}
