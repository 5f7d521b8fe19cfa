//! Versioned schema migrations.
//!
//! The schema is evolved by an explicit, ordered migration list tracked
//! through `PRAGMA user_version`. Each step runs at most once per database
//! and creation steps are additionally guarded with `IF NOT EXISTS`, so
//! applying the list on every startup is safe.

use rusqlite::Connection;

use super::tables::TableNames;

/// One schema change, applied at most once per database.
pub(super) struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub sql: String,
}

/// The full migration list for a table-name mapping, oldest first.
pub(super) fn migrations(tables: &TableNames) -> Vec<Migration> {
    vec![
        Migration {
            version: 1,
            name: "create categories table",
            sql: format!(
                "CREATE TABLE IF NOT EXISTS {categories} (
                    category_id TEXT PRIMARY KEY,
                    name TEXT NOT NULL
                );",
                categories = tables.categories
            ),
        },
        Migration {
            version: 2,
            name: "create expenses table",
            sql: format!(
                "CREATE TABLE IF NOT EXISTS {expenses} (
                    expense_id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    cost REAL NOT NULL DEFAULT 0,
                    purchase_date INTEGER NOT NULL,
                    category_id TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_{expenses}_purchase_date
                    ON {expenses}(purchase_date);",
                expenses = tables.expenses
            ),
        },
        Migration {
            version: 3,
            name: "create tags table",
            sql: format!(
                "CREATE TABLE IF NOT EXISTS {tags} (
                    tag_id TEXT PRIMARY KEY,
                    name TEXT NOT NULL
                );",
                tags = tables.tags
            ),
        },
        Migration {
            version: 4,
            name: "create expense-tag join table",
            sql: format!(
                "CREATE TABLE IF NOT EXISTS {expense_tags} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    expense_id TEXT NOT NULL,
                    tag_id TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_{expense_tags}_expense_id
                    ON {expense_tags}(expense_id);",
                expense_tags = tables.expense_tags
            ),
        },
        Migration {
            version: 5,
            name: "create shops table",
            sql: format!(
                "CREATE TABLE IF NOT EXISTS {shops} (
                    shop_id TEXT PRIMARY KEY,
                    name TEXT NOT NULL
                );",
                shops = tables.shops
            ),
        },
        Migration {
            version: 6,
            name: "create suggestions table",
            sql: format!(
                "CREATE TABLE IF NOT EXISTS {suggestions} (
                    name TEXT NOT NULL,
                    category_id TEXT NOT NULL,
                    cost REAL NOT NULL DEFAULT 0,
                    months TEXT NOT NULL
                );",
                suggestions = tables.suggestions
            ),
        },
        Migration {
            version: 7,
            name: "add shop linkage column to expenses",
            sql: format!(
                "ALTER TABLE {expenses} ADD COLUMN shop_id TEXT;",
                expenses = tables.expenses
            ),
        },
    ]
}

/// Apply every migration newer than the database's recorded version.
pub(super) fn apply(connection: &Connection, tables: &TableNames) -> Result<(), rusqlite::Error> {
    let current: i64 = connection.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    for migration in migrations(tables) {
        if migration.version <= current {
            continue;
        }

        connection.execute_batch(&migration.sql)?;
        connection.pragma_update(None, "user_version", migration.version)?;
        tracing::debug!("applied migration {}: {}", migration.version, migration.name);
    }

    Ok(())
}

#[cfg(test)]
mod migration_tests {
    use rusqlite::Connection;

    use crate::db::tables::TableNames;

    use super::{apply, migrations};

    fn table_names(connection: &Connection) -> Vec<String> {
        connection
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .map(Result::unwrap)
            .collect()
    }

    fn column_names(connection: &Connection, table: &str) -> Vec<String> {
        connection
            .prepare(&format!("PRAGMA table_info({table})"))
            .unwrap()
            .query_map([], |row| row.get(1))
            .unwrap()
            .map(Result::unwrap)
            .collect()
    }

    #[test]
    fn apply_creates_every_required_table() {
        let connection = Connection::open_in_memory().unwrap();
        let tables = TableNames::default();

        apply(&connection, &tables).unwrap();

        let names = table_names(&connection);
        for required in [
            "categories",
            "expense_tags",
            "expenses",
            "shops",
            "suggestions",
            "tags",
        ] {
            assert!(names.iter().any(|name| name == required), "missing {required}");
        }
    }

    #[test]
    fn apply_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();
        let tables = TableNames::default();

        apply(&connection, &tables).unwrap();
        apply(&connection, &tables).unwrap();

        let version: i64 = connection
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        let latest = migrations(&tables).last().unwrap().version;
        assert_eq!(version, latest);
    }

    #[test]
    fn column_patch_is_applied_to_an_older_database() {
        let connection = Connection::open_in_memory().unwrap();
        let tables = TableNames::default();

        // Bring the database up to the version just before the column patch.
        for migration in migrations(&tables) {
            if migration.version >= 7 {
                break;
            }
            connection.execute_batch(&migration.sql).unwrap();
            connection
                .pragma_update(None, "user_version", migration.version)
                .unwrap();
        }
        assert!(!column_names(&connection, "expenses").contains(&"shop_id".to_string()));

        apply(&connection, &tables).unwrap();

        assert!(column_names(&connection, "expenses").contains(&"shop_id".to_string()));
    }

    #[test]
    fn apply_respects_custom_table_names() {
        let connection = Connection::open_in_memory().unwrap();
        let tables = TableNames {
            expenses: "spend_log".to_string(),
            ..TableNames::default()
        };

        apply(&connection, &tables).unwrap();

        let names = table_names(&connection);
        assert!(names.iter().any(|name| name == "spend_log"));
        assert!(!names.iter().any(|name| name == "expenses"));
    }
}
