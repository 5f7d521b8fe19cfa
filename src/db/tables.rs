//! The table-name mapping shared by the provider, retriever and persister.

use crate::Error;

/// The names of the tables the application stores its data in.
///
/// Retrievers, persisters and the connection provider validate this mapping
/// eagerly at construction, before any query runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    /// The expenses table.
    pub expenses: String,
    /// The categories table.
    pub categories: String,
    /// The tags table.
    pub tags: String,
    /// The expense-tag join table.
    pub expense_tags: String,
    /// The shops table.
    pub shops: String,
    /// The recurring-expense suggestions table.
    pub suggestions: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            expenses: "expenses".to_string(),
            categories: "categories".to_string(),
            tags: "tags".to_string(),
            expense_tags: "expense_tags".to_string(),
            shops: "shops".to_string(),
            suggestions: "suggestions".to_string(),
        }
    }
}

impl TableNames {
    /// Check that every table name is present.
    ///
    /// # Errors
    /// Returns [Error::InvalidArgument] naming the first empty entry.
    pub fn validate(&self) -> Result<(), Error> {
        let entries = [
            (&self.expenses, "expenses"),
            (&self.categories, "categories"),
            (&self.tags, "tags"),
            (&self.expense_tags, "expense_tags"),
            (&self.shops, "shops"),
            (&self.suggestions, "suggestions"),
        ];

        for (value, key) in entries {
            if value.trim().is_empty() {
                return Err(Error::InvalidArgument(format!(
                    "table_names.{key} must be a non-empty string"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod table_names_tests {
    use crate::Error;

    use super::TableNames;

    #[test]
    fn default_mapping_is_valid() {
        assert_eq!(TableNames::default().validate(), Ok(()));
    }

    #[test]
    fn empty_entry_is_rejected() {
        let tables = TableNames {
            tags: "".to_string(),
            ..TableNames::default()
        };

        let result = tables.validate();

        assert!(
            matches!(result, Err(Error::InvalidArgument(ref message)) if message.contains("table_names.tags"))
        );
    }

    #[test]
    fn whitespace_entry_is_rejected() {
        let tables = TableNames {
            expenses: "  ".to_string(),
            ..TableNames::default()
        };

        assert!(matches!(tables.validate(), Err(Error::InvalidArgument(_))));
    }
}
