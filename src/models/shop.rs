//! The shop model.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A shop where expenses were made.
///
/// Like [Tag](crate::models::Tag), equality and hashing are scoped to the
/// name field. The expense-shop linkage is reserved by the schema
/// (`expenses.shop_id`) but not yet wired into retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    /// The opaque id of the shop, if it has been persisted.
    #[serde(default)]
    pub id: Option<String>,
    /// The display name of the shop.
    pub name: String,
}

impl Shop {
    /// Create a shop.
    pub fn new(id: Option<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl PartialEq for Shop {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Shop {}

impl Hash for Shop {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

#[cfg(test)]
mod shop_tests {
    use super::Shop;

    #[test]
    fn shops_with_same_name_are_equal_regardless_of_id() {
        let first = Shop::new(Some("a".to_string()), "dairy");
        let second = Shop::new(None, "dairy");

        assert_eq!(first, second);
    }
}
