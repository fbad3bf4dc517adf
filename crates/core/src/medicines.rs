//! Medicines

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rust_decimal::Decimal;
use rusty_money::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::{self, Rupees};

/// Catalog identifier of a medicine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MedicineId(pub u64);

impl Display for MedicineId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl From<u64> for MedicineId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Unit of sale for a medicine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackagingType {
    /// Blister strip
    #[default]
    Strip,

    /// Bottle (syrups, drops)
    Bottle,

    /// Box
    Box,

    /// Loose tablets
    Loose,

    /// Tube (creams, gels)
    Tube,

    /// Vial (injectables)
    Vial,
}

impl PackagingType {
    /// Every packaging type, in catalog order.
    pub const ALL: [PackagingType; 6] = [
        PackagingType::Strip,
        PackagingType::Bottle,
        PackagingType::Box,
        PackagingType::Loose,
        PackagingType::Tube,
        PackagingType::Vial,
    ];

    /// Wire name of the packaging type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strip => "strip",
            Self::Bottle => "bottle",
            Self::Box => "box",
            Self::Loose => "loose",
            Self::Tube => "tube",
            Self::Vial => "vial",
        }
    }
}

impl Display for PackagingType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown packaging name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown packaging type '{0}'")]
pub struct UnknownPackagingType(pub String);

impl FromStr for PackagingType {
    type Err = UnknownPackagingType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalised = value.trim().to_ascii_lowercase();

        Self::ALL
            .into_iter()
            .find(|packaging| packaging.as_str() == normalised)
            .ok_or_else(|| UnknownPackagingType(value.to_string()))
    }
}

/// A medicine as returned by the catalog service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    /// Catalog identifier
    pub id: MedicineId,

    /// Display name
    pub name: String,

    /// Hindi display name, when the catalog has one
    #[serde(default)]
    pub name_hindi: Option<String>,

    /// Generic (salt) name
    #[serde(default)]
    pub generic_name: Option<String>,

    /// Manufacturer
    #[serde(default)]
    pub company: Option<String>,

    /// Therapeutic category
    #[serde(default)]
    pub category: Option<String>,

    /// Packaging the medicine is sold in by default
    #[serde(default)]
    pub default_packaging: PackagingType,

    /// Selling price of one unit
    pub price_per_unit: Decimal,

    /// Maximum retail price
    #[serde(default)]
    pub mrp: Option<Decimal>,

    /// Units currently in stock
    #[serde(default)]
    pub stock_quantity: u32,

    /// Stock level at or below which the medicine needs reordering
    #[serde(default = "default_reorder_level")]
    pub reorder_level: u32,

    /// Whether a prescription is needed
    #[serde(default)]
    pub prescription_required: bool,

    /// Shelf location in the store
    #[serde(default)]
    pub rack_location: Option<String>,
}

fn default_reorder_level() -> u32 {
    10
}

impl Medicine {
    /// Create a medicine with the fields the ordering flows rely on.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        default_packaging: PackagingType,
        price_per_unit: Decimal,
        stock_quantity: u32,
    ) -> Self {
        Self {
            id: MedicineId(id),
            name: name.into(),
            name_hindi: None,
            generic_name: None,
            company: None,
            category: None,
            default_packaging,
            price_per_unit,
            mrp: None,
            stock_quantity,
            reorder_level: default_reorder_level(),
            prescription_required: false,
            rack_location: None,
        }
    }

    /// Unit price as money.
    pub fn unit_price(&self) -> Rupees {
        Money::from_decimal(self.price_per_unit, pricing::currency())
    }

    /// Whether any units are available.
    pub fn is_in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Whether stock has fallen to the reorder level.
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.reorder_level
    }
}

/// Payload for creating a catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicineInput {
    /// Display name
    pub name: String,

    /// Hindi display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_hindi: Option<String>,

    /// Generic (salt) name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_name: Option<String>,

    /// Manufacturer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Therapeutic category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Selling price of one unit
    pub price_per_unit: Decimal,

    /// Maximum retail price
    pub mrp: Decimal,

    /// Units in stock
    pub stock_quantity: u32,

    /// Reorder threshold
    pub reorder_level: u32,

    /// Default packaging
    pub default_packaging: PackagingType,

    /// Whether a prescription is needed
    pub prescription_required: bool,

    /// Shelf location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rack_location: Option<String>,
}

/// Partial update of a catalog entry; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicineUpdate {
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Hindi display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_hindi: Option<String>,

    /// Selling price of one unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_unit: Option<Decimal>,

    /// Maximum retail price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mrp: Option<Decimal>,

    /// Units in stock
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<u32>,

    /// Reorder threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reorder_level: Option<u32>,

    /// Default packaging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_packaging: Option<PackagingType>,

    /// Therapeutic category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Shelf location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rack_location: Option<String>,
}
