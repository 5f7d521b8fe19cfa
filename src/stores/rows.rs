//! Conversion from raw row tuples to domain models.

use rusqlite::types::Value;

use crate::{
    Error, escape,
    models::{Category, Expense, Tag},
};

/// Read a text column.
pub(super) fn text(row: &[Value], index: usize) -> Result<String, Error> {
    match row.get(index) {
        Some(Value::Text(value)) => Ok(value.clone()),
        _ => Err(Error::UnexpectedColumnType(index)),
    }
}

/// Read a numeric column as a float. Integer values are widened, since
/// SQLite stores integral REALs as integers.
pub(super) fn real(row: &[Value], index: usize) -> Result<f64, Error> {
    match row.get(index) {
        Some(Value::Real(value)) => Ok(*value),
        Some(Value::Integer(value)) => Ok(*value as f64),
        _ => Err(Error::UnexpectedColumnType(index)),
    }
}

/// Read a numeric column as an integer.
pub(super) fn integer(row: &[Value], index: usize) -> Result<i64, Error> {
    match row.get(index) {
        Some(Value::Integer(value)) => Ok(*value),
        Some(Value::Real(value)) => Ok(*value as i64),
        _ => Err(Error::UnexpectedColumnType(index)),
    }
}

/// Convert a `(category_id, name)` pair starting at `offset` into a
/// [Category], unescaping the stored name.
///
/// The `offset` supports reading a category out of a joined expense row.
pub(super) fn category_from_row(row: &[Value], offset: usize) -> Result<Category, Error> {
    Ok(Category::new(
        text(row, offset)?,
        escape::unescape(&text(row, offset + 1)?),
    ))
}

/// Convert a `(tag_id, name)` pair starting at `offset` into a [Tag],
/// unescaping the stored name.
pub(super) fn tag_from_row(row: &[Value], offset: usize) -> Result<Tag, Error> {
    Ok(Tag::new(
        text(row, offset)?,
        escape::unescape(&text(row, offset + 1)?),
    ))
}

/// Convert an expense row joined with its category into an [Expense].
///
/// Expects the column order `(expense_id, name, cost, purchase_date,
/// category_id, category_name)`. Tags start empty; the retriever attaches
/// them through the join relation.
pub(super) fn expense_from_row(row: &[Value]) -> Result<Expense, Error> {
    Ok(Expense {
        id: text(row, 0)?,
        name: escape::unescape(&text(row, 1)?),
        cost: real(row, 2)?,
        purchase_date: integer(row, 3)?,
        category: category_from_row(row, 4)?,
        tags: Vec::new(),
    })
}

#[cfg(test)]
mod row_tests {
    use rusqlite::types::Value;

    use crate::Error;

    use super::{expense_from_row, real, text};

    #[test]
    fn expense_row_is_converted_with_category_offset() {
        let row = vec![
            Value::Text("exp-1".to_string()),
            Value::Text("fish &amp; chips".to_string()),
            Value::Real(12.5),
            Value::Integer(1_710_460_800),
            Value::Text("cat-1".to_string()),
            Value::Text("Food".to_string()),
        ];

        let expense = expense_from_row(&row).unwrap();

        assert_eq!(expense.name, "fish & chips");
        assert_eq!(expense.category.id, "cat-1");
        assert_eq!(expense.category.name, "Food");
        assert!(expense.tags.is_empty());
    }

    #[test]
    fn integral_costs_are_widened_to_floats() {
        let row = vec![Value::Integer(4)];

        assert_eq!(real(&row, 0), Ok(4.0));
    }

    #[test]
    fn unexpected_column_types_are_rejected() {
        let row = vec![Value::Null];

        assert_eq!(text(&row, 0), Err(Error::UnexpectedColumnType(0)));
        assert_eq!(text(&row, 5), Err(Error::UnexpectedColumnType(5)));
    }
}
