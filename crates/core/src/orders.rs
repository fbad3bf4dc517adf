//! Orders

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::medicines::{Medicine, MedicineId, PackagingType};

/// Errors raised before an order is sent to the service.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required customer field is blank.
    #[error("customer {0} is required")]
    MissingCustomerField(CustomerField),

    /// No line is eligible for submission.
    #[error("order must contain at least one medicine")]
    NoItems,
}

/// Required customer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    /// Customer name
    Name,

    /// Customer phone number
    Phone,
}

impl Display for CustomerField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Name => f.write_str("name"),
            Self::Phone => f.write_str("phone"),
        }
    }
}

/// Where an order was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderSource {
    /// Placed by the customer from the cart.
    Online,

    /// Entered at the counter through the manual order form.
    WalkIn,

    /// Taken over the phone.
    Phone,
}

/// Lifecycle status reported by the order service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Awaiting confirmation
    Pending,

    /// Confirmed by the store
    Confirmed,

    /// Handed over
    Completed,

    /// Cancelled
    Cancelled,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Confirmed => f.write_str("confirmed"),
            Self::Completed => f.write_str("completed"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Language the order was taken in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(pub String);

impl Default for Language {
    fn default() -> Self {
        Self("english".to_string())
    }
}

/// Customer details captured alongside an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    /// Customer name
    pub name: String,

    /// Customer phone number
    pub phone: String,

    /// Delivery address
    #[serde(default)]
    pub address: Option<String>,
}

impl CustomerDetails {
    /// Customer details with the given name and phone and no address.
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            address: None,
        }
    }

    /// Sets the delivery address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Check that name and phone are present.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingCustomerField`] for the first blank field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingCustomerField(CustomerField::Name));
        }

        if self.phone.trim().is_empty() {
            return Err(ValidationError::MissingCustomerField(CustomerField::Phone));
        }

        Ok(())
    }

    fn address_or_none(&self) -> Option<String> {
        self.address
            .as_deref()
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .map(str::to_string)
    }
}

/// One line of an order creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemRequest {
    /// Medicine being ordered
    pub medicine_id: MedicineId,

    /// Units ordered
    pub quantity: u32,

    /// Packaging the units are sold in
    pub packaging_type: PackagingType,
}

/// Order creation request, shared by the cart and the manual order form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Customer name
    pub customer_name: String,

    /// Customer phone number
    pub customer_phone: String,

    /// Delivery address
    pub customer_address: Option<String>,

    /// Ordered lines
    pub items: Vec<OrderItemRequest>,

    /// Free-form notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Entry path of the order
    pub order_source: OrderSource,

    /// Language the order was taken in
    pub language_used: Language,
}

impl OrderRequest {
    /// Build a request from validated customer details and at least one line.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when a customer field is blank or `items` is empty.
    pub fn new(
        customer: &CustomerDetails,
        items: Vec<OrderItemRequest>,
        order_source: OrderSource,
        language_used: Language,
    ) -> Result<Self, ValidationError> {
        customer.validate()?;

        if items.is_empty() {
            return Err(ValidationError::NoItems);
        }

        Ok(Self {
            customer_name: customer.name.trim().to_string(),
            customer_phone: customer.phone.trim().to_string(),
            customer_address: customer.address_or_none(),
            items,
            notes: None,
            order_source,
            language_used,
        })
    }
}

/// Customer record attached to an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCustomer {
    /// Customer identifier
    pub id: u64,

    /// Customer name
    pub name: String,

    /// Customer phone number
    pub phone: String,

    /// Delivery address
    #[serde(default)]
    pub address: Option<String>,
}

/// Priced line of a created order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Line identifier
    pub id: u64,

    /// Medicine ordered
    pub medicine_id: MedicineId,

    /// Units ordered
    pub quantity: u32,

    /// Packaging the units are sold in
    #[serde(default)]
    pub packaging_type: PackagingType,

    /// Unit price charged
    pub price_per_unit: Decimal,

    /// Price charged for the line
    pub total_price: Decimal,

    /// Catalog entry, when the service expands it
    #[serde(default)]
    pub medicine: Option<Medicine>,
}

/// Invoice summary attached to an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    /// Invoice identifier
    pub id: u64,

    /// Human-readable invoice number
    pub invoice_number: String,

    /// Invoice total
    pub total_amount: Decimal,

    /// Payment status reported by the service
    pub payment_status: String,
}

/// Order as returned by the order service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier
    pub id: u64,

    /// Human-readable order number
    pub order_number: String,

    /// Lifecycle status
    pub status: OrderStatus,

    /// Sum of line totals
    #[serde(default)]
    pub total_amount: Decimal,

    /// Discount applied by the store
    #[serde(default)]
    pub discount_amount: Decimal,

    /// Tax charged
    #[serde(default)]
    pub tax_amount: Decimal,

    /// Amount payable
    pub final_amount: Decimal,

    /// Entry path of the order
    #[serde(default = "default_order_source")]
    pub order_source: OrderSource,

    /// Language the order was taken in
    #[serde(default)]
    pub language_used: Option<Language>,

    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,

    /// Order timestamp as reported by the service
    #[serde(default)]
    pub order_date: Option<String>,

    /// Customer the order belongs to
    #[serde(default)]
    pub customer: Option<OrderCustomer>,

    /// Priced lines
    #[serde(default)]
    pub order_items: Vec<OrderLine>,

    /// Invoice, once generated
    #[serde(default)]
    pub invoice: Option<InvoiceSummary>,
}

fn default_order_source() -> OrderSource {
    OrderSource::Phone
}
