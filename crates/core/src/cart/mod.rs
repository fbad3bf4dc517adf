//! Cart
//!
//! In-memory cart keyed by medicine and packaging. Adding a pair that is
//! already present merges into the existing line; quantities are kept within
//! `1..=stock` of the line's stock snapshot.

use thiserror::Error;

use crate::{
    medicines::{Medicine, MedicineId, PackagingType},
    orders::{CustomerDetails, Language, OrderItemRequest, OrderRequest, OrderSource, ValidationError},
    pricing::{Rupees, TotalPriceError, total_price},
};

mod line;

pub use line::{CartKey, CartLine};

/// Errors raised by cart mutations. A failed mutation leaves the cart unchanged.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CartError {
    /// Quantities start at one.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// The resulting quantity would exceed the stock snapshot.
    #[error("requested {requested} units but only {available} are available")]
    InsufficientStock {
        /// Quantity the line would have held
        requested: u32,

        /// Stock snapshot of the line
        available: u32,
    },

    /// No line exists for the medicine and packaging.
    #[error("no cart line for medicine {0} ({1})")]
    NotFound(MedicineId, PackagingType),
}

/// Shopping cart for the current checkout session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of `medicine` in `packaging`.
    ///
    /// Merges into an existing line for the same medicine and packaging,
    /// otherwise creates a line snapshotting name, unit price and stock.
    ///
    /// # Errors
    ///
    /// - [`CartError::ZeroQuantity`]: `quantity` is zero.
    /// - [`CartError::InsufficientStock`]: the resulting quantity exceeds the stock snapshot.
    pub fn add_item(
        &mut self,
        medicine: &Medicine,
        packaging: PackagingType,
        quantity: u32,
    ) -> Result<&CartLine, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let key = CartKey::new(medicine.id, packaging);

        if let Some(index) = self.position(key) {
            let line = self
                .lines
                .get_mut(index)
                .ok_or(CartError::NotFound(key.medicine_id, key.packaging))?;

            let merged = line.quantity().saturating_add(quantity);

            check_stock(merged, line.stock_quantity())?;

            line.set_quantity(merged);

            return Ok(line);
        }

        check_stock(quantity, medicine.stock_quantity)?;

        self.lines.push(CartLine::new(medicine, packaging, quantity));

        self.lines
            .last()
            .ok_or(CartError::NotFound(key.medicine_id, key.packaging))
    }

    /// Remove the line for the medicine and packaging, if present.
    pub fn remove_item(
        &mut self,
        medicine_id: MedicineId,
        packaging: PackagingType,
    ) -> Option<CartLine> {
        let index = self.position(CartKey::new(medicine_id, packaging))?;

        Some(self.lines.remove(index))
    }

    /// Set the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// - [`CartError::ZeroQuantity`]: `quantity` is zero.
    /// - [`CartError::InsufficientStock`]: `quantity` exceeds the line's stock snapshot.
    /// - [`CartError::NotFound`]: no line exists for the medicine and packaging.
    pub fn update_quantity(
        &mut self,
        medicine_id: MedicineId,
        packaging: PackagingType,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let line = self
            .line_mut(CartKey::new(medicine_id, packaging))
            .ok_or(CartError::NotFound(medicine_id, packaging))?;

        check_stock(quantity, line.stock_quantity())?;

        line.set_quantity(quantity);

        Ok(())
    }

    /// Add one unit to a line. Returns `false` when the line is missing or at its stock ceiling.
    pub fn increment(&mut self, key: CartKey) -> bool {
        let Some(line) = self.line_mut(key) else {
            return false;
        };

        if line.quantity() >= line.stock_quantity() {
            return false;
        }

        line.set_quantity(line.quantity() + 1);

        true
    }

    /// Take one unit off a line. Returns `false` when the line is missing or holds a single unit.
    pub fn decrement(&mut self, key: CartKey) -> bool {
        let Some(line) = self.line_mut(key) else {
            return false;
        };

        if line.quantity() <= 1 {
            return false;
        }

        line.set_quantity(line.quantity() - 1);

        true
    }

    /// Move a line to another packaging, merging into an existing line for that packaging.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotFound`]: no line exists for `from`.
    /// - [`CartError::InsufficientStock`]: merging would exceed the target line's stock snapshot.
    pub fn change_packaging(
        &mut self,
        medicine_id: MedicineId,
        from: PackagingType,
        to: PackagingType,
    ) -> Result<(), CartError> {
        let from_key = CartKey::new(medicine_id, from);
        let to_key = CartKey::new(medicine_id, to);

        let from_index = self
            .position(from_key)
            .ok_or(CartError::NotFound(medicine_id, from))?;

        if from == to {
            return Ok(());
        }

        let Some(to_index) = self.position(to_key) else {
            if let Some(line) = self.lines.get_mut(from_index) {
                line.set_packaging(to);
            }

            return Ok(());
        };

        let moved = self
            .lines
            .get(from_index)
            .map(CartLine::quantity)
            .ok_or(CartError::NotFound(medicine_id, from))?;

        let target = self
            .lines
            .get_mut(to_index)
            .ok_or(CartError::NotFound(medicine_id, to))?;

        let merged = target.quantity().saturating_add(moved);

        check_stock(merged, target.stock_quantity())?;

        target.set_quantity(merged);

        self.lines.remove(from_index);

        Ok(())
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of all line totals.
    ///
    /// # Errors
    ///
    /// Returns a `TotalPriceError` if there was a money arithmetic error.
    pub fn total(&self) -> Result<Rupees, TotalPriceError> {
        total_price(self.lines.iter().map(CartLine::total_price))
    }

    /// Lines in the order they were first added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Line for the given key.
    pub fn get(&self, key: CartKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.key() == key)
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    pub fn unit_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity())).sum()
    }

    /// Build the online order request for the cart's contents.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when a customer field is blank or the cart is empty.
    pub fn order_request(
        &self,
        customer: &CustomerDetails,
        language: Language,
    ) -> Result<OrderRequest, ValidationError> {
        let items = self
            .lines
            .iter()
            .map(|line| OrderItemRequest {
                medicine_id: line.medicine_id(),
                quantity: line.quantity(),
                packaging_type: line.packaging_type(),
            })
            .collect();

        OrderRequest::new(customer, items, OrderSource::Online, language)
    }

    fn position(&self, key: CartKey) -> Option<usize> {
        self.lines.iter().position(|line| line.key() == key)
    }

    fn line_mut(&mut self, key: CartKey) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.key() == key)
    }
}

fn check_stock(requested: u32, available: u32) -> Result<(), CartError> {
    if requested > available {
        return Err(CartError::InsufficientStock {
            requested,
            available,
        });
    }

    Ok(())
}
