//! Drafts
//!
//! Snapshot of an unfinished manual order, persisted so the form can be
//! reviewed later.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    medicines::PackagingType,
    orders::CustomerDetails,
    pricing::{Rupees, line_total},
};

/// One saved line of a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftLine {
    /// Medicine name
    pub name: String,

    /// Packaging
    pub packaging: PackagingType,

    /// Requested units
    pub quantity: u32,

    /// Unit price when the draft was saved
    pub price_per_unit: Decimal,
}

impl DraftLine {
    /// Price of the line.
    pub fn total_price(&self) -> Rupees {
        line_total(self.price_per_unit, self.quantity)
    }
}

/// Saved manual order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    /// Customer details as typed
    pub customer: CustomerDetails,

    /// Valid lines at the time of saving
    pub lines: Vec<DraftLine>,

    /// Estimated total at the time of saving
    pub estimate_total: Decimal,
}

impl Draft {
    /// Create a draft, recording the estimated total of `lines`.
    pub fn new(customer: CustomerDetails, lines: Vec<DraftLine>) -> Self {
        let estimate_total = lines
            .iter()
            .map(|line| line.price_per_unit * Decimal::from(line.quantity))
            .sum();

        Self {
            customer,
            lines,
            estimate_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::Money;
    use serde_json::json;
    use testresult::TestResult;

    use crate::pricing;

    use super::*;

    fn draft() -> Draft {
        Draft::new(
            CustomerDetails::new("Rajan Sharma", "9876543210"),
            vec![
                DraftLine {
                    name: "Paracetamol 500mg".to_string(),
                    packaging: PackagingType::Strip,
                    quantity: 3,
                    price_per_unit: Decimal::new(250, 2),
                },
                DraftLine {
                    name: "Cough Syrup".to_string(),
                    packaging: PackagingType::Bottle,
                    quantity: 1,
                    price_per_unit: Decimal::new(8500, 2),
                },
            ],
        )
    }

    #[test]
    fn estimate_total_is_recorded_on_creation() {
        assert_eq!(draft().estimate_total, Decimal::new(9250, 2));
    }

    #[test]
    fn line_total_is_price_times_quantity() -> TestResult {
        let draft = draft();
        let line = draft.lines.first().ok_or("no lines")?;

        assert_eq!(line.total_price(), Money::from_minor(750, pricing::currency()));

        Ok(())
    }

    #[test]
    fn draft_round_trips_through_json() -> TestResult {
        let draft = draft();
        let value = serde_json::to_value(&draft)?;

        assert_eq!(
            value.pointer("/lines/1/packaging"),
            Some(&json!("bottle")),
            "packaging is stored lowercase"
        );
        assert_eq!(serde_json::from_value::<Draft>(value)?, draft);

        Ok(())
    }
}
