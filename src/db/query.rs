//! Named, parametrized statement templates keyed by operation type.
//!
//! Every value is a bound parameter; only table names from a validated
//! [TableNames] mapping are interpolated into statement text.

use super::tables::TableNames;

/// The statements the retriever and persister issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    /// Insert an expense row.
    SaveExpense,
    /// Insert a category row.
    SaveCategory,
    /// Insert a tag row.
    SaveTag,
    /// Insert an expense-tag relation row.
    SaveExpenseTag,
    /// Delete one expense-tag relation row.
    DeleteExpenseTag,
    /// Insert a shop row.
    SaveShop,
    /// Select one expense joined with its category.
    ExpenseById,
    /// Select expenses with purchase dates inside an inclusive range,
    /// newest first.
    ExpensesInRange,
    /// Select expenses whose name matches a LIKE pattern, newest first.
    ExpensesByName,
    /// Select the purchase date of the oldest stored expense.
    OldestPurchaseDate,
    /// Select every category, ordered by name.
    AllCategories,
    /// Select every tag, ordered by name.
    AllTags,
    /// Select the tags related to one expense.
    TagsForExpense,
    /// Select the tags matching a name literally.
    TagByName,
    /// Select name/category pairs whose name matches a LIKE pattern.
    SimilarExpenseNames,
    /// Select the most frequent (name, cost) group for a name.
    CommonExpenseCost,
    /// Select recurring-expense templates due in a month and not yet
    /// fulfilled inside its window.
    SuggestionsForMonth,
    /// Sum costs per category over an inclusive date range.
    StatisticsInRange,
}

impl Query {
    /// Render the statement template against a table-name mapping.
    pub fn sql(self, tables: &TableNames) -> String {
        match self {
            Query::SaveExpense => format!(
                "INSERT INTO {expenses} (expense_id, name, cost, purchase_date, category_id) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                expenses = tables.expenses
            ),
            Query::SaveCategory => format!(
                "INSERT INTO {categories} (category_id, name) VALUES (?1, ?2)",
                categories = tables.categories
            ),
            Query::SaveTag => format!(
                "INSERT INTO {tags} (tag_id, name) VALUES (?1, ?2)",
                tags = tables.tags
            ),
            Query::SaveExpenseTag => format!(
                "INSERT INTO {expense_tags} (expense_id, tag_id) VALUES (?1, ?2)",
                expense_tags = tables.expense_tags
            ),
            Query::DeleteExpenseTag => format!(
                "DELETE FROM {expense_tags} WHERE expense_id = ?1 AND tag_id = ?2",
                expense_tags = tables.expense_tags
            ),
            Query::SaveShop => format!(
                "INSERT INTO {shops} (shop_id, name) VALUES (?1, ?2)",
                shops = tables.shops
            ),
            Query::ExpenseById => format!(
                "{selection} WHERE {expenses}.expense_id = ?1",
                selection = expense_selection(tables),
                expenses = tables.expenses
            ),
            Query::ExpensesInRange => format!(
                "{selection} WHERE {expenses}.purchase_date BETWEEN ?1 AND ?2 \
                 ORDER BY {expenses}.purchase_date DESC",
                selection = expense_selection(tables),
                expenses = tables.expenses
            ),
            Query::ExpensesByName => format!(
                "{selection} WHERE {expenses}.name LIKE ?1 \
                 ORDER BY {expenses}.purchase_date DESC",
                selection = expense_selection(tables),
                expenses = tables.expenses
            ),
            Query::OldestPurchaseDate => format!(
                "SELECT purchase_date FROM {expenses} ORDER BY purchase_date ASC LIMIT 1",
                expenses = tables.expenses
            ),
            Query::AllCategories => format!(
                "SELECT category_id, name FROM {categories} ORDER BY name ASC",
                categories = tables.categories
            ),
            Query::AllTags => format!(
                "SELECT tag_id, name FROM {tags} ORDER BY name ASC",
                tags = tables.tags
            ),
            Query::TagsForExpense => format!(
                "SELECT {tags}.tag_id, {tags}.name FROM {tags} \
                 INNER JOIN {expense_tags} ON {expense_tags}.tag_id = {tags}.tag_id \
                 WHERE {expense_tags}.expense_id = ?1",
                tags = tables.tags,
                expense_tags = tables.expense_tags
            ),
            Query::TagByName => format!(
                "SELECT tag_id, name FROM {tags} WHERE name LIKE ?1",
                tags = tables.tags
            ),
            Query::SimilarExpenseNames => format!(
                "SELECT {expenses}.name, {categories}.name FROM {expenses} \
                 LEFT JOIN {categories} ON {expenses}.category_id = {categories}.category_id \
                 WHERE {expenses}.name LIKE ?1 \
                 ORDER BY {expenses}.name ASC",
                expenses = tables.expenses,
                categories = tables.categories
            ),
            Query::CommonExpenseCost => format!(
                "SELECT name, cost, COUNT(name) FROM {expenses} \
                 WHERE name LIKE ?1 \
                 GROUP BY name, cost \
                 ORDER BY COUNT(name) DESC \
                 LIMIT 1",
                expenses = tables.expenses
            ),
            Query::SuggestionsForMonth => format!(
                "SELECT {suggestions}.name, {suggestions}.cost, \
                 {categories}.category_id, {categories}.name FROM {suggestions} \
                 LEFT JOIN {categories} ON {suggestions}.category_id = {categories}.category_id \
                 WHERE {suggestions}.months REGEXP ?1 \
                 AND NOT EXISTS (SELECT 1 FROM {expenses} \
                 WHERE {expenses}.name = {suggestions}.name \
                 AND {expenses}.purchase_date BETWEEN ?2 AND ?3)",
                suggestions = tables.suggestions,
                categories = tables.categories,
                expenses = tables.expenses
            ),
            Query::StatisticsInRange => format!(
                "SELECT SUM({expenses}.cost), {categories}.category_id, {categories}.name \
                 FROM {expenses} \
                 LEFT JOIN {categories} ON {expenses}.category_id = {categories}.category_id \
                 WHERE {expenses}.purchase_date BETWEEN ?1 AND ?2 \
                 GROUP BY {categories}.name \
                 ORDER BY {categories}.name ASC",
                expenses = tables.expenses,
                categories = tables.categories
            ),
        }
    }
}

fn expense_selection(tables: &TableNames) -> String {
    format!(
        "SELECT {expenses}.expense_id, {expenses}.name, {expenses}.cost, \
         {expenses}.purchase_date, {categories}.category_id, {categories}.name \
         FROM {expenses} \
         LEFT JOIN {categories} ON {expenses}.category_id = {categories}.category_id",
        expenses = tables.expenses,
        categories = tables.categories
    )
}

#[cfg(test)]
mod query_tests {
    use crate::db::tables::TableNames;

    use super::Query;

    #[test]
    fn templates_use_the_table_name_mapping() {
        let tables = TableNames {
            expenses: "spend_log".to_string(),
            ..TableNames::default()
        };

        let sql = Query::ExpensesInRange.sql(&tables);

        assert!(sql.contains("FROM spend_log"));
        assert!(!sql.contains("FROM expenses"));
    }

    #[test]
    fn values_are_always_bound_parameters() {
        let tables = TableNames::default();

        for query in [
            Query::SaveExpense,
            Query::SaveCategory,
            Query::SaveTag,
            Query::SaveExpenseTag,
            Query::DeleteExpenseTag,
            Query::SaveShop,
            Query::ExpenseById,
            Query::ExpensesInRange,
            Query::ExpensesByName,
            Query::TagsForExpense,
            Query::TagByName,
            Query::SimilarExpenseNames,
            Query::CommonExpenseCost,
            Query::SuggestionsForMonth,
            Query::StatisticsInRange,
        ] {
            assert!(query.sql(&tables).contains("?1"), "{query:?} has no parameters");
        }
    }
}
