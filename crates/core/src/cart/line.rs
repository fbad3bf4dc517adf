//! Cart Lines

use rust_decimal::Decimal;

use crate::{
    medicines::{Medicine, MedicineId, PackagingType},
    pricing::{Rupees, line_total},
};

/// Identity of a cart line: one line per medicine and packaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CartKey {
    /// Medicine on the line
    pub medicine_id: MedicineId,

    /// Packaging the line is sold in
    pub packaging: PackagingType,
}

impl CartKey {
    /// Create a key for the given medicine and packaging.
    pub fn new(medicine_id: MedicineId, packaging: PackagingType) -> Self {
        Self {
            medicine_id,
            packaging,
        }
    }
}

/// One purchasable line in the cart.
///
/// Name, unit price and stock are snapshots taken when the line was first
/// added; the line total is always derived from quantity and unit price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    key: CartKey,
    medicine_name: String,
    quantity: u32,
    price_per_unit: Decimal,
    stock_quantity: u32,
}

impl CartLine {
    pub(super) fn new(medicine: &Medicine, packaging: PackagingType, quantity: u32) -> Self {
        Self {
            key: CartKey::new(medicine.id, packaging),
            medicine_name: medicine.name.clone(),
            quantity,
            price_per_unit: medicine.price_per_unit,
            stock_quantity: medicine.stock_quantity,
        }
    }

    pub(super) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub(super) fn set_packaging(&mut self, packaging: PackagingType) {
        self.key.packaging = packaging;
    }

    /// Key identifying this line.
    pub fn key(&self) -> CartKey {
        self.key
    }

    /// Medicine on the line.
    pub fn medicine_id(&self) -> MedicineId {
        self.key.medicine_id
    }

    /// Packaging the line is sold in.
    pub fn packaging_type(&self) -> PackagingType {
        self.key.packaging
    }

    /// Medicine name at the time the line was added.
    pub fn medicine_name(&self) -> &str {
        &self.medicine_name
    }

    /// Units on the line.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price at the time the line was added.
    pub fn price_per_unit(&self) -> Decimal {
        self.price_per_unit
    }

    /// Stock available when the line was added; the quantity never exceeds it.
    pub fn stock_quantity(&self) -> u32 {
        self.stock_quantity
    }

    /// Price of the whole line.
    pub fn total_price(&self) -> Rupees {
        line_total(self.price_per_unit, self.quantity)
    }
}
