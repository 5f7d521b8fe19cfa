//! The expense model and its API-facing companions.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    Error,
    models::{Category, Tag},
    month,
};

/// A single recorded purchase with name, cost, date, category and tags.
///
/// Expenses are immutable value carriers: they are constructed either from
/// API input (via [NewExpense], which assigns a fresh id) or reconstructed
/// from persisted rows. Updates write a new row and re-read.
///
/// Serializes as `{id, name, cost, date: "YYYY-MM-DD", category, tags}`;
/// the purchase date is held internally as epoch seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    /// The opaque id of the expense.
    pub id: String,
    /// What was purchased.
    pub name: String,
    /// How much the purchase cost.
    pub cost: f64,
    /// When the purchase happened, in seconds since the epoch.
    #[serde(rename = "date", serialize_with = "month::serialize_date_string")]
    pub purchase_date: i64,
    /// The category the expense belongs to.
    pub category: Category,
    /// The tags attached to the expense.
    pub tags: Vec<Tag>,
}

impl Expense {
    /// The purchase date as a "YYYY-MM-DD" string.
    pub fn purchase_date_string(&self) -> Result<String, Error> {
        month::format_timestamp(self.purchase_date)
    }
}

/// API input for creating an expense.
#[derive(Debug, Clone, Deserialize)]
pub struct NewExpense {
    /// What was purchased.
    pub name: String,
    /// How much the purchase cost.
    pub cost: f64,
    /// When the purchase happened, as "YYYY-MM-DD". Defaults to the current
    /// date when absent.
    #[serde(default)]
    pub purchase_date: Option<String>,
    /// The category the expense belongs to.
    pub category: Category,
    /// The tags attached to the expense.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl NewExpense {
    /// Convert the input into an [Expense] with a freshly generated id.
    ///
    /// # Errors
    /// Returns [Error::InvalidDateFormat] if `purchase_date` is present but
    /// malformed.
    pub fn into_expense(self) -> Result<Expense, Error> {
        let purchase_date = match &self.purchase_date {
            Some(date) => month::parse_date_string(date)?,
            None => OffsetDateTime::now_utc().unix_timestamp(),
        };

        Ok(Expense {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            cost: self.cost,
            purchase_date,
            category: self.category,
            tags: self.tags,
        })
    }
}

/// A partial set of column updates for an expense.
///
/// Only the present fields are written. The purchase date must already be
/// in epoch-second form; converting from the "YYYY-MM-DD" boundary format
/// is the caller's responsibility.
#[derive(Debug, Clone, Default)]
pub struct ExpenseChanges {
    /// A new name for the expense.
    pub name: Option<String>,
    /// A new cost for the expense.
    pub cost: Option<f64>,
    /// A new purchase date, in seconds since the epoch.
    pub purchase_date: Option<i64>,
    /// The id of a new category for the expense.
    pub category_id: Option<String>,
}

impl ExpenseChanges {
    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.cost.is_none()
            && self.purchase_date.is_none()
            && self.category_id.is_none()
    }
}

/// A deduplicated expense-name/category pair from the similarity search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarExpenseName {
    /// The expense name.
    pub name: String,
    /// The name of the category the expense was recorded under.
    pub category: String,
}

#[cfg(test)]
mod expense_tests {
    use serde_json::json;
    use time::OffsetDateTime;

    use crate::models::{Category, NewExpense, Tag};

    #[test]
    fn serializes_with_date_string_shape() {
        let expense = NewExpense {
            name: "Lunch".to_string(),
            cost: 12.5,
            purchase_date: Some("2024-03-15".to_string()),
            category: Category::new("cat-1", "Food"),
            tags: vec![Tag::new("tag-1", "work")],
        }
        .into_expense()
        .unwrap();

        let value = serde_json::to_value(&expense).unwrap();

        assert_eq!(value["name"], json!("Lunch"));
        assert_eq!(value["cost"], json!(12.5));
        assert_eq!(value["date"], json!("2024-03-15"));
        assert_eq!(value["category"], json!({"id": "cat-1", "name": "Food"}));
        assert_eq!(value["tags"], json!([{"id": "tag-1", "name": "work"}]));
        assert!(value.get("purchase_date").is_none());
    }

    #[test]
    fn missing_purchase_date_defaults_to_now() {
        let before = OffsetDateTime::now_utc().unix_timestamp();

        let expense = NewExpense {
            name: "Coffee".to_string(),
            cost: 4.0,
            purchase_date: None,
            category: Category::new("cat-1", "Food"),
            tags: vec![],
        }
        .into_expense()
        .unwrap();

        let after = OffsetDateTime::now_utc().unix_timestamp();
        assert!((before..=after).contains(&expense.purchase_date));
    }

    #[test]
    fn generates_a_fresh_id() {
        let input = NewExpense {
            name: "Coffee".to_string(),
            cost: 4.0,
            purchase_date: Some("2024-03-15".to_string()),
            category: Category::new("cat-1", "Food"),
            tags: vec![],
        };

        let first = input.clone().into_expense().unwrap();
        let second = input.into_expense().unwrap();

        assert_ne!(first.id, second.id);
    }
}
