//! Order Rows

use rust_decimal::Decimal;
use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::{
    medicines::{Medicine, MedicineId, PackagingType},
    pricing::{Rupees, line_total},
};

new_key_type! {
    /// Row Key
    pub struct RowKey;
}

/// Candidate list shown under a row's search field.
pub type Candidates = SmallVec<[Medicine; 8]>;

/// Where a row is in its search-and-select lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowState {
    /// Nothing typed, query too short, or the last search failed.
    #[default]
    Empty,

    /// A search for the current query is pending or in flight.
    Searching,

    /// Candidates for the current query are available.
    ResultsShown,

    /// A medicine has been picked.
    Selected,
}

/// Medicine picked for a row, copied from the chosen candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedMedicine {
    /// Medicine identifier
    pub id: MedicineId,

    /// Medicine name
    pub name: String,

    /// Packaging, locked to the medicine's default
    pub packaging: PackagingType,

    /// Stock available at selection time
    pub stock_quantity: u32,

    /// Unit price at selection time
    pub price_per_unit: Decimal,
}

impl From<&Medicine> for SelectedMedicine {
    fn from(medicine: &Medicine) -> Self {
        Self {
            id: medicine.id,
            name: medicine.name.clone(),
            packaging: medicine.default_packaging,
            stock_quantity: medicine.stock_quantity,
            price_per_unit: medicine.price_per_unit,
        }
    }
}

/// Handle for one search issued on behalf of a row.
///
/// Results are only applied while the ticket's generation is still the
/// row's latest; anything older is a stale response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub(super) row: RowKey,
    pub(super) generation: u64,
    pub(super) query: String,
}

impl SearchTicket {
    /// Row the search belongs to.
    pub fn row(&self) -> RowKey {
        self.row
    }

    /// Search generation of the row when the ticket was issued.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Text to search for.
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// One draft line of the manual order form.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRow {
    pub(super) query: String,
    pub(super) candidates: Candidates,
    pub(super) selected: Option<SelectedMedicine>,
    pub(super) quantity: u32,
    pub(super) state: RowState,
    pub(super) generation: u64,
}

impl Default for OrderRow {
    fn default() -> Self {
        Self {
            query: String::new(),
            candidates: SmallVec::new(),
            selected: None,
            quantity: 1,
            state: RowState::Empty,
            generation: 0,
        }
    }
}

impl OrderRow {
    /// Text typed in the medicine field.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current search candidates.
    pub fn candidates(&self) -> &[Medicine] {
        &self.candidates
    }

    /// Picked medicine, if any.
    pub fn selected(&self) -> Option<&SelectedMedicine> {
        self.selected.as_ref()
    }

    /// Packaging of the picked medicine.
    pub fn packaging(&self) -> Option<PackagingType> {
        self.selected.as_ref().map(|selected| selected.packaging)
    }

    /// Requested units.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Lifecycle state.
    pub fn state(&self) -> RowState {
        self.state
    }

    /// Whether the row can be submitted: a medicine is picked and the
    /// quantity is within `1..=stock`.
    pub fn is_valid(&self) -> bool {
        self.selected.as_ref().is_some_and(|selected| {
            self.quantity >= 1 && self.quantity <= selected.stock_quantity
        })
    }

    /// Price of the row, when a medicine is picked.
    pub fn line_total(&self) -> Option<Rupees> {
        self.selected
            .as_ref()
            .map(|selected| line_total(selected.price_per_unit, self.quantity))
    }
}
