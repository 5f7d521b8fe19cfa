//! Aggregate statistics models.

use serde::Serialize;

use crate::models::Category;

/// The total cost for one category over a single calendar month.
///
/// Derived from stored expenses, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthStatistics {
    /// The category the total belongs to.
    pub category: Category,
    /// The sum of expense costs for the category within the month.
    pub total: f64,
    /// The "YYYY-MM" label of the month the total was computed over.
    pub month: String,
}
