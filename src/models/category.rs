//! The category model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single-valued classification label attached to an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The opaque id of the category.
    pub id: String,
    /// The display name of the category.
    pub name: String,
}

impl Category {
    /// Create a category with a known id, e.g. one reconstructed from
    /// storage.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Create a category from user input, assigning a fresh id.
    pub fn with_generated_id(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }
}
