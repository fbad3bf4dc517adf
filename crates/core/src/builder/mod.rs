//! Order Builder
//!
//! Row state for the multi-item manual order form. Each row moves through
//! `Empty -> Searching -> ResultsShown -> Selected`; editing the query of a
//! selected row drops the selection and starts over.

use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    drafts::{Draft, DraftLine},
    medicines::Medicine,
    orders::{CustomerDetails, Language, OrderItemRequest, OrderRequest, OrderSource, ValidationError},
    pricing::{Rupees, TotalPriceError, total_price},
};

mod row;

pub use row::{Candidates, OrderRow, RowKey, RowState, SearchTicket, SelectedMedicine};

/// Queries shorter than this many characters never reach the catalog.
pub const MIN_QUERY_CHARS: usize = 2;

/// Default cap on candidates shown per row.
pub const SEARCH_RESULT_LIMIT: usize = 8;

/// Raised when a quantity edit asks for more than the selected medicine's stock.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("requested {requested} units of {medicine}, but only {available} are available")]
pub struct StockWarning {
    /// Medicine name
    pub medicine: String,

    /// Quantity that was asked for
    pub requested: u32,

    /// Stock available at selection time
    pub available: u32,
}

/// Errors raised by row operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuilderError {
    /// The row is not part of the form.
    #[error("row is not part of the order")]
    UnknownRow,

    /// The candidate index is outside the row's candidate list.
    #[error("no candidate at index {0}")]
    NoSuchCandidate(usize),

    /// A quantity edit was rejected; the previous quantity is kept.
    #[error(transparent)]
    InsufficientStock(#[from] StockWarning),
}

/// Result of editing a row's query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The query is too short to search; candidates were cleared.
    Cleared,

    /// A search should be scheduled for this ticket.
    Search(SearchTicket),
}

/// Row collection of the manual order form. Always holds at least one row.
#[derive(Debug, Clone)]
pub struct OrderBuilder {
    rows: SlotMap<RowKey, OrderRow>,
    order: Vec<RowKey>,
    result_limit: usize,
}

impl Default for OrderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBuilder {
    /// Create a form with a single empty row.
    pub fn new() -> Self {
        Self::with_result_limit(SEARCH_RESULT_LIMIT)
    }

    /// Create a form that keeps at most `result_limit` candidates per row.
    pub fn with_result_limit(result_limit: usize) -> Self {
        let mut builder = Self {
            rows: SlotMap::with_key(),
            order: Vec::new(),
            result_limit,
        };

        builder.add_row();
        builder
    }

    /// Candidate cap applied to search results.
    pub fn result_limit(&self) -> usize {
        self.result_limit
    }

    /// Append an empty row.
    pub fn add_row(&mut self) -> RowKey {
        let key = self.rows.insert(OrderRow::default());
        self.order.push(key);
        key
    }

    /// Remove a row. Removing the only row replaces it with a fresh empty one.
    ///
    /// Returns `false` when the row is not part of the form.
    pub fn remove_row(&mut self, row: RowKey) -> bool {
        if self.rows.remove(row).is_none() {
            return false;
        }

        self.order.retain(|key| *key != row);

        if self.order.is_empty() {
            self.add_row();
        }

        true
    }

    /// Replace every row with a single empty one.
    pub fn reset(&mut self) {
        self.rows.clear();
        self.order.clear();
        self.add_row();
    }

    /// Rows in display order.
    pub fn rows(&self) -> impl Iterator<Item = (RowKey, &OrderRow)> {
        self.order
            .iter()
            .filter_map(|key| self.rows.get(*key).map(|row| (*key, row)))
    }

    /// Look up a row.
    pub fn row(&self, row: RowKey) -> Option<&OrderRow> {
        self.rows.get(row)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always `false`; the form keeps at least one row.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Record new text in a row's medicine field.
    ///
    /// Any selection and candidate list is dropped. Queries of at least
    /// [`MIN_QUERY_CHARS`] characters yield a ticket for a new search, which
    /// supersedes every earlier ticket for the row.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::UnknownRow`] when the row is not part of the form.
    pub fn set_query(
        &mut self,
        row: RowKey,
        text: impl Into<String>,
    ) -> Result<QueryOutcome, BuilderError> {
        let entry = self.rows.get_mut(row).ok_or(BuilderError::UnknownRow)?;
        let text = text.into();

        entry.generation = entry.generation.wrapping_add(1);
        entry.selected = None;
        entry.candidates.clear();

        if text.chars().count() < MIN_QUERY_CHARS {
            entry.query = text;
            entry.state = RowState::Empty;

            return Ok(QueryOutcome::Cleared);
        }

        entry.query.clone_from(&text);
        entry.state = RowState::Searching;

        Ok(QueryOutcome::Search(SearchTicket {
            row,
            generation: entry.generation,
            query: text,
        }))
    }

    /// Apply search results for a ticket.
    ///
    /// Returns `false`, leaving the row untouched, when the ticket is stale:
    /// the row was removed, its query changed, or a medicine was picked.
    pub fn apply_results(&mut self, ticket: &SearchTicket, results: Vec<Medicine>) -> bool {
        let limit = self.result_limit;

        let Some(entry) = self.current_searching_row(ticket) else {
            return false;
        };

        entry.candidates = results.into_iter().take(limit).collect();
        entry.state = RowState::ResultsShown;

        true
    }

    /// Record that the search for a ticket failed. Stale tickets are ignored.
    pub fn search_failed(&mut self, ticket: &SearchTicket) -> bool {
        let Some(entry) = self.current_searching_row(ticket) else {
            return false;
        };

        entry.candidates.clear();
        entry.state = RowState::Empty;

        true
    }

    /// Pick the candidate at `index` for a row.
    ///
    /// The row takes the medicine's id, name, default packaging, stock and
    /// unit price; the candidate list is discarded. The quantity already typed
    /// is kept, and a row whose quantity exceeds the new stock is not valid.
    ///
    /// # Errors
    ///
    /// - [`BuilderError::UnknownRow`]: the row is not part of the form.
    /// - [`BuilderError::NoSuchCandidate`]: `index` is outside the candidate list.
    pub fn select(&mut self, row: RowKey, index: usize) -> Result<&SelectedMedicine, BuilderError> {
        let entry = self.rows.get_mut(row).ok_or(BuilderError::UnknownRow)?;

        let selected = entry
            .candidates
            .get(index)
            .map(SelectedMedicine::from)
            .ok_or(BuilderError::NoSuchCandidate(index))?;

        entry.generation = entry.generation.wrapping_add(1);
        entry.query.clone_from(&selected.name);
        entry.candidates.clear();
        entry.state = RowState::Selected;

        Ok(&*entry.selected.insert(selected))
    }

    /// Set a row's quantity.
    ///
    /// # Errors
    ///
    /// - [`BuilderError::UnknownRow`]: the row is not part of the form.
    /// - [`BuilderError::InsufficientStock`]: `quantity` exceeds the selected
    ///   medicine's stock; the previous quantity is kept.
    pub fn set_quantity(&mut self, row: RowKey, quantity: u32) -> Result<(), BuilderError> {
        let entry = self.rows.get_mut(row).ok_or(BuilderError::UnknownRow)?;

        if let Some(selected) = &entry.selected
            && quantity > selected.stock_quantity
        {
            return Err(StockWarning {
                medicine: selected.name.clone(),
                requested: quantity,
                available: selected.stock_quantity,
            }
            .into());
        }

        entry.quantity = quantity;

        Ok(())
    }

    /// Set a row's quantity from raw field text; blank, zero or unparseable input counts as one.
    ///
    /// # Errors
    ///
    /// As for [`OrderBuilder::set_quantity`].
    pub fn set_quantity_text(&mut self, row: RowKey, text: &str) -> Result<(), BuilderError> {
        let quantity = text
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|quantity| *quantity > 0)
            .unwrap_or(1);

        self.set_quantity(row, quantity)
    }

    /// Rows eligible for submission, in display order.
    pub fn valid_rows(&self) -> impl Iterator<Item = &OrderRow> {
        self.rows().map(|(_, row)| row).filter(|row| row.is_valid())
    }

    /// Estimated price of all valid rows.
    ///
    /// # Errors
    ///
    /// Returns a `TotalPriceError` if there was a money arithmetic error.
    pub fn estimate_total(&self) -> Result<Rupees, TotalPriceError> {
        total_price(self.valid_rows().filter_map(OrderRow::line_total))
    }

    /// Units across all valid rows.
    pub fn unit_count(&self) -> u64 {
        self.valid_rows().map(|row| u64::from(row.quantity())).sum()
    }

    /// Build the walk-in order request from the customer and valid rows.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when a customer field is blank or no row is valid.
    pub fn order_request(
        &self,
        customer: &CustomerDetails,
        language: Language,
    ) -> Result<OrderRequest, ValidationError> {
        let items = self
            .valid_rows()
            .filter_map(|row| {
                row.selected().map(|selected| OrderItemRequest {
                    medicine_id: selected.id,
                    quantity: row.quantity(),
                    packaging_type: selected.packaging,
                })
            })
            .collect();

        OrderRequest::new(customer, items, OrderSource::WalkIn, language)
    }

    /// Snapshot the customer and valid rows as a draft.
    pub fn save_draft(&self, customer: &CustomerDetails) -> Draft {
        let lines = self
            .valid_rows()
            .filter_map(|row| {
                row.selected().map(|selected| DraftLine {
                    name: selected.name.clone(),
                    packaging: selected.packaging,
                    quantity: row.quantity(),
                    price_per_unit: selected.price_per_unit,
                })
            })
            .collect();

        Draft::new(customer.clone(), lines)
    }

    fn current_searching_row(&mut self, ticket: &SearchTicket) -> Option<&mut OrderRow> {
        self.rows.get_mut(ticket.row).filter(|entry| {
            entry.generation == ticket.generation && entry.state == RowState::Searching
        })
    }
}
