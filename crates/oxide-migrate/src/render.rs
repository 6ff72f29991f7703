//! Command rendering.
//!
//! Each command becomes one [`Statement`]. The parameter table is created
//! here and handed to the query builder, so data commands get their values
//! bound rather than inlined. DDL has nothing to bind; column defaults are
//! written inline.

use oxide_query::expression::Expression;
use oxide_query::{col, Dialect, Operand, Param, ParameterTable, QueryBuilder};

use crate::command::{ColumnDef, ForeignKeyDef, MigrationCommand};
use crate::error::Result;
use crate::statement::Statement;

/// Prefix of statements a dialect cannot express. They are logged, never run.
pub const UNSUPPORTED_PREFIX: &str = "-- unsupported";

/// Renders one command.
///
/// # Errors
///
/// Fails if a data command's values cannot be compiled.
pub fn render(builder: &QueryBuilder, command: &MigrationCommand) -> Result<Statement> {
    let dialect = builder.dialect();
    let mut params = ParameterTable::new();

    let sql = match command {
        MigrationCommand::CreateTable { table, columns } => {
            let columns: Vec<String> = columns
                .iter()
                .map(|column| column_definition(dialect, column))
                .collect();
            format!(
                "CREATE TABLE {} ({})",
                dialect.quote_table_name(table),
                columns.join(", ")
            )
        }
        MigrationCommand::DropTable { table, .. } => {
            format!("DROP TABLE {}", dialect.quote_table_name(table))
        }
        MigrationCommand::RenameTable { from, to } => format!(
            "ALTER TABLE {} RENAME TO {}",
            dialect.quote_table_name(from),
            dialect.quote_table_name(to)
        ),
        MigrationCommand::AddColumn { table, column } => format!(
            "ALTER TABLE {} ADD COLUMN {}",
            dialect.quote_table_name(table),
            column_definition(dialect, column)
        ),
        MigrationCommand::DropColumn { table, column } => format!(
            "ALTER TABLE {} DROP COLUMN {}",
            dialect.quote_table_name(table),
            dialect.quote_simple_name(&column.name)
        ),
        MigrationCommand::RenameColumn { table, from, to } => format!(
            "ALTER TABLE {} RENAME COLUMN {} TO {}",
            dialect.quote_table_name(table),
            dialect.quote_simple_name(from),
            dialect.quote_simple_name(to)
        ),
        MigrationCommand::AlterColumn { table, column } => {
            if is_sqlite(dialect) {
                unsupported(command)
            } else {
                format!(
                    "ALTER TABLE {} ALTER COLUMN {} TYPE {}",
                    dialect.quote_table_name(table),
                    dialect.quote_simple_name(&column.name),
                    column.data_type
                )
            }
        }
        MigrationCommand::CreateIndex {
            name,
            table,
            columns,
            unique,
        } => format!(
            "CREATE {}INDEX {} ON {} ({})",
            if *unique { "UNIQUE " } else { "" },
            dialect.quote_simple_name(name),
            dialect.quote_table_name(table),
            quote_list(dialect, columns)
        ),
        MigrationCommand::DropIndex { name, .. } => {
            format!("DROP INDEX {}", dialect.quote_simple_name(name))
        }
        MigrationCommand::AddPrimaryKey {
            name,
            table,
            columns,
        } => {
            if is_sqlite(dialect) {
                unsupported(command)
            } else {
                format!(
                    "ALTER TABLE {} ADD CONSTRAINT {} PRIMARY KEY ({})",
                    dialect.quote_table_name(table),
                    dialect.quote_simple_name(name),
                    quote_list(dialect, columns)
                )
            }
        }
        MigrationCommand::DropPrimaryKey { name, table, .. } => {
            if is_sqlite(dialect) {
                unsupported(command)
            } else {
                drop_constraint(dialect, table, name)
            }
        }
        MigrationCommand::AddForeignKey(fk) => {
            if is_sqlite(dialect) {
                unsupported(command)
            } else {
                add_foreign_key(dialect, fk)
            }
        }
        MigrationCommand::DropForeignKey(fk) => {
            if is_sqlite(dialect) {
                unsupported(command)
            } else {
                drop_constraint(dialect, &fk.table, &fk.name)
            }
        }
        MigrationCommand::Insert { table, values } => {
            let columns: Vec<(&str, Operand)> = values
                .iter()
                .map(|(column, value)| (column.as_str(), Operand::Value(value.clone())))
                .collect();
            builder.insert(table, &columns, &mut params)?
        }
        MigrationCommand::Delete { table, conditions } => {
            let condition = conditions
                .iter()
                .map(|(column, value)| col(column).eq(value.clone()))
                .reduce(|all, next| all.and(next));
            builder.delete(table, condition.as_ref(), &mut params)?
        }
        MigrationCommand::Execute { sql, params: bound } => {
            let table = bound
                .iter()
                .map(|(name, value)| (name.clone(), Param::Value(value.clone())))
                .collect();
            let expression = Expression::with_params(sql.clone(), table);
            builder.compile(&expression.into(), &mut params)?
        }
    };

    Ok(Statement::new(sql, params))
}

/// Renders every command in order.
///
/// # Errors
///
/// See [`render`].
pub fn render_all(builder: &QueryBuilder, commands: &[MigrationCommand]) -> Result<Vec<Statement>> {
    commands
        .iter()
        .map(|command| render(builder, command))
        .collect()
}

fn is_sqlite(dialect: &dyn Dialect) -> bool {
    dialect.name() == "sqlite"
}

fn unsupported(command: &MigrationCommand) -> String {
    format!("{UNSUPPORTED_PREFIX}: {command}")
}

fn quote_list(dialect: &dyn Dialect, names: &[String]) -> String {
    names
        .iter()
        .map(|name| dialect.quote_simple_name(name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn column_definition(dialect: &dyn Dialect, column: &ColumnDef) -> String {
    let mut sql = format!(
        "{} {}",
        dialect.quote_simple_name(&column.name),
        column.data_type
    );

    if column.primary_key {
        sql.push_str(" PRIMARY KEY");
        if column.auto_increment {
            sql.push_str(if is_sqlite(dialect) {
                " AUTOINCREMENT"
            } else {
                " GENERATED BY DEFAULT AS IDENTITY"
            });
        }
    } else if column.not_null {
        sql.push_str(" NOT NULL");
    }

    if column.unique && !column.primary_key {
        sql.push_str(" UNIQUE");
    }

    if let Some(default) = &column.default {
        sql.push_str(" DEFAULT ");
        sql.push_str(&dialect.quote_value(default));
    }

    sql
}

fn add_foreign_key(dialect: &dyn Dialect, fk: &ForeignKeyDef) -> String {
    format!(
        "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {} ON UPDATE {}",
        dialect.quote_table_name(&fk.table),
        dialect.quote_simple_name(&fk.name),
        quote_list(dialect, &fk.columns),
        dialect.quote_table_name(&fk.ref_table),
        quote_list(dialect, &fk.ref_columns),
        fk.on_delete.as_sql(),
        fk.on_update.as_sql()
    )
}

fn drop_constraint(dialect: &dyn Dialect, table: &str, name: &str) -> String {
    format!(
        "ALTER TABLE {} DROP CONSTRAINT {}",
        dialect.quote_table_name(table),
        dialect.quote_simple_name(name)
    )
}
