//! Checkout
//!
//! Submission of the cart and of the manual order form, plus draft
//! persistence for the form.

use jiff::Timestamp;
use medstore::{
    builder::OrderBuilder,
    cart::Cart,
    drafts::Draft,
    orders::{CustomerDetails, Language, Order, ValidationError},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    api::ApiError,
    services::OrdersService,
    session::{DRAFT_KEY, SessionStorage, StorageError},
};

/// Shown when a manual order fails without a message from the service.
pub const MANUAL_ORDER_FALLBACK: &str = "Failed to place order.";

/// Shown when a cart order fails without a message from the service.
pub const CART_ORDER_FALLBACK: &str = "Failed to place order. Please try again.";

/// Errors raised while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The order was rejected locally; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The service refused the order or could not be reached.
    #[error("{0}")]
    Service(String),

    /// The session expired while submitting.
    #[error("session expired; sign in again")]
    SessionExpired,
}

impl CheckoutError {
    fn from_api(error: ApiError, fallback: &str) -> Self {
        match error {
            ApiError::SessionExpired => Self::SessionExpired,
            ApiError::Service { message, .. } => Self::Service(message),
            other => {
                warn!(error = %other, "order submission failed");
                Self::Service(fallback.to_string())
            }
        }
    }
}

/// Submit the cart as an online order. The cart is emptied only on success.
///
/// # Errors
///
/// - [`CheckoutError::Validation`]: a customer field is blank or the cart is empty.
/// - [`CheckoutError::Service`]: the service rejected the order.
/// - [`CheckoutError::SessionExpired`]: the session is no longer valid.
pub async fn place_cart_order<O>(
    cart: &mut Cart,
    customer: &CustomerDetails,
    language: Language,
    orders: &O,
) -> Result<Order, CheckoutError>
where
    O: OrdersService + ?Sized,
{
    let request = cart.order_request(customer, language)?;

    let order = orders
        .create_order(&request)
        .await
        .map_err(|error| CheckoutError::from_api(error, CART_ORDER_FALLBACK))?;

    cart.clear();

    info!(order_number = %order.order_number, items = request.items.len(), "cart order placed");

    Ok(order)
}

/// Submit the manual order form as a walk-in order. Rows that are not valid
/// are left out; the form is reset only on success.
///
/// # Errors
///
/// - [`CheckoutError::Validation`]: a customer field is blank or no row is valid.
/// - [`CheckoutError::Service`]: the service rejected the order.
/// - [`CheckoutError::SessionExpired`]: the session is no longer valid.
pub async fn place_manual_order<O>(
    builder: &mut OrderBuilder,
    customer: &CustomerDetails,
    language: Language,
    orders: &O,
) -> Result<Order, CheckoutError>
where
    O: OrdersService + ?Sized,
{
    let request = builder.order_request(customer, language)?;

    let order = orders
        .create_order(&request)
        .await
        .map_err(|error| CheckoutError::from_api(error, MANUAL_ORDER_FALLBACK))?;

    builder.reset();

    info!(order_number = %order.order_number, items = request.items.len(), "manual order placed");

    Ok(order)
}

/// Draft as persisted, with the time it was saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDraft {
    /// When the draft was saved
    pub saved_at: Timestamp,

    /// Saved form contents
    pub draft: Draft,
}

/// Save the form's customer and valid rows, replacing any earlier draft.
///
/// # Errors
///
/// Returns an error if the draft cannot be written.
pub fn save_draft(
    builder: &OrderBuilder,
    customer: &CustomerDetails,
    storage: &mut dyn SessionStorage,
) -> Result<StoredDraft, StorageError> {
    let stored = StoredDraft {
        saved_at: Timestamp::now(),
        draft: builder.save_draft(customer),
    };

    storage.set(DRAFT_KEY, &serde_json::to_string(&stored)?)?;

    info!(lines = stored.draft.lines.len(), "draft saved");

    Ok(stored)
}

/// The saved draft, if any.
///
/// # Errors
///
/// Returns an error if storage cannot be read or the draft is corrupt.
pub fn load_draft(storage: &dyn SessionStorage) -> Result<Option<StoredDraft>, StorageError> {
    storage
        .get(DRAFT_KEY)?
        .map(|draft| serde_json::from_str(&draft))
        .transpose()
        .map_err(StorageError::from)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use medstore::{
        builder::QueryOutcome,
        medicines::{Medicine, MedicineId, PackagingType},
        orders::{OrderSource, OrderStatus},
    };

    use crate::{services::MockOrdersService, session::MemoryStorage};

    use super::*;

    fn paracetamol() -> Medicine {
        Medicine::new(7, "Paracetamol 500mg", PackagingType::Strip, Decimal::new(250, 2), 10)
    }

    fn customer() -> CustomerDetails {
        CustomerDetails::new("Rajan Sharma", "9876543210")
    }

    fn order() -> Order {
        Order {
            id: 31,
            order_number: "ORD-20240501-0031".to_string(),
            status: OrderStatus::Pending,
            total_amount: Decimal::new(500, 2),
            discount_amount: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            final_amount: Decimal::new(500, 2),
            order_source: OrderSource::Online,
            language_used: None,
            notes: None,
            order_date: None,
            customer: None,
            order_items: Vec::new(),
            invoice: None,
        }
    }

    fn builder_with_selection(quantity: u32) -> Result<OrderBuilder, Box<dyn std::error::Error>> {
        let mut builder = OrderBuilder::new();
        let row = builder.rows().next().map(|(key, _)| key).ok_or("no rows")?;

        if let QueryOutcome::Search(ticket) = builder.set_query(row, "para")? {
            builder.apply_results(&ticket, vec![paracetamol()]);
        }

        builder.select(row, 0)?;
        builder.set_quantity(row, quantity)?;
        builder.add_row();

        Ok(builder)
    }

    #[tokio::test]
    async fn cart_order_clears_cart_on_success() -> TestResult {
        let mut cart = Cart::new();
        cart.add_item(&paracetamol(), PackagingType::Strip, 2)?;

        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .withf(|request| {
                request.order_source == OrderSource::Online
                    && request.items.len() == 1
                    && request.language_used == Language::default()
            })
            .return_once(|_| Ok(order()));

        let placed = place_cart_order(&mut cart, &customer(), Language::default(), &orders).await?;

        assert_eq!(placed.order_number, "ORD-20240501-0031");
        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn invalid_cart_order_never_reaches_service() {
        let mut cart = Cart::new();
        let mut orders = MockOrdersService::new();

        orders.expect_create_order().never();

        let result = place_cart_order(&mut cart, &customer(), Language::default(), &orders).await;

        assert!(
            matches!(result, Err(CheckoutError::Validation(ValidationError::NoItems))),
            "expected NoItems, got {result:?}"
        );
    }

    #[tokio::test]
    async fn rejected_cart_order_keeps_cart() -> TestResult {
        let mut cart = Cart::new();
        cart.add_item(&paracetamol(), PackagingType::Strip, 2)?;

        let mut orders = MockOrdersService::new();

        orders.expect_create_order().once().return_once(|_| {
            Err(ApiError::Service {
                status: 400,
                message: "Insufficient stock for Paracetamol 500mg".to_string(),
            })
        });

        let result = place_cart_order(&mut cart, &customer(), Language::default(), &orders).await;

        assert_eq!(
            result.err().map(|error| error.to_string()).as_deref(),
            Some("Insufficient stock for Paracetamol 500mg")
        );
        assert_eq!(cart.unit_count(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn undecodable_reply_uses_fallback_message() -> TestResult {
        let mut cart = Cart::new();
        cart.add_item(&paracetamol(), PackagingType::Strip, 1)?;

        let error = serde_json::from_str::<Order>("{}")
            .err()
            .ok_or("expected a decode error")?;

        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .return_once(move |_| Err(ApiError::Decode(error)));

        let result = place_cart_order(&mut cart, &customer(), Language::default(), &orders).await;

        assert_eq!(
            result.err().map(|error| error.to_string()).as_deref(),
            Some(CART_ORDER_FALLBACK)
        );

        Ok(())
    }

    #[tokio::test]
    async fn manual_order_sends_valid_rows_and_resets() -> TestResult {
        let mut builder = builder_with_selection(3)?;
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .withf(|request| {
                request.order_source == OrderSource::WalkIn
                    && request.items.len() == 1
                    && request.items.first().map(|item| (item.medicine_id, item.quantity))
                        == Some((MedicineId(7), 3))
            })
            .return_once(|_| Ok(order()));

        place_manual_order(&mut builder, &customer(), Language::default(), &orders).await?;

        assert_eq!(builder.len(), 1);
        assert_eq!(builder.valid_rows().count(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn manual_order_requires_customer_details() -> TestResult {
        let mut builder = builder_with_selection(1)?;
        let mut orders = MockOrdersService::new();

        orders.expect_create_order().never();

        let result = place_manual_order(
            &mut builder,
            &CustomerDetails::new("Rajan Sharma", ""),
            Language::default(),
            &orders,
        )
        .await;

        assert!(matches!(result, Err(CheckoutError::Validation(_))), "got {result:?}");
        assert_eq!(builder.valid_rows().count(), 1, "form is kept");

        Ok(())
    }

    #[tokio::test]
    async fn expired_session_is_reported() -> TestResult {
        let mut builder = builder_with_selection(1)?;
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .return_once(|_| Err(ApiError::SessionExpired));

        let result = place_manual_order(&mut builder, &customer(), Language::default(), &orders).await;

        assert!(matches!(result, Err(CheckoutError::SessionExpired)), "got {result:?}");

        Ok(())
    }

    #[test]
    fn draft_round_trips_through_storage() -> TestResult {
        let builder = builder_with_selection(2)?;
        let mut storage = MemoryStorage::new();

        assert_eq!(load_draft(&storage)?, None);

        let saved = save_draft(&builder, &customer(), &mut storage)?;
        let loaded = load_draft(&storage)?.ok_or("draft missing")?;

        assert_eq!(loaded, saved);
        assert_eq!(loaded.draft.estimate_total, Decimal::new(500, 2));

        Ok(())
    }
}
