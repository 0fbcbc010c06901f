//! INSERT, UPDATE and DELETE statements.

use tracing::debug;

use super::params::{Binder, SqlCommand};
use super::writer::QualifierWriter;
use super::Dialect;
use crate::ast::Qualifier;
use crate::error::CompileError;
use crate::schema::TableMetadata;
use crate::value::Value;

/// Renders an INSERT of `values` into `table`.
///
/// Values for database-generated columns are skipped. When the table has a
/// generated primary key, the dialect's key retrieval query is appended
/// after a `;`, so a dialect that cannot read generated keys rejects the
/// insert here.
pub fn compile_insert<D: Dialect + ?Sized>(
    dialect: &D,
    table: &TableMetadata,
    values: &[(&str, Value)],
) -> Result<SqlCommand, CompileError> {
    let retrieval = table
        .generated_key()
        .map(|key| dialect.key_retrieval(&table.name, &key.name))
        .transpose()?;

    let mut binder = Binder::new(dialect, table);
    let mut columns = Vec::new();
    let mut parameters = Vec::new();
    for (column, value) in values {
        if table.find_column(column).is_some_and(|c| c.generated) {
            continue;
        }
        parameters.push(binder.bind(column, value.clone())?);
        columns.push(dialect.identifier(column));
    }
    if columns.is_empty() {
        return Err(CompileError::EmptyCommand {
            statement: "INSERT",
            table: table.name.clone(),
        });
    }

    let mut sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        dialect.identifier(&table.name),
        columns.join(", "),
        parameters.join(", ")
    );
    if let Some(retrieval) = retrieval {
        sql.push_str("; ");
        sql.push_str(&retrieval.sql());
    }
    Ok(finish(dialect, "insert", binder, sql))
}

/// Renders an UPDATE of `assignments` on the rows of `table` matching
/// `qualifier` (every row when `None`).
pub fn compile_update<D: Dialect + ?Sized>(
    dialect: &D,
    table: &TableMetadata,
    assignments: &[(&str, Value)],
    qualifier: Option<&Qualifier>,
) -> Result<SqlCommand, CompileError> {
    if assignments.is_empty() {
        return Err(CompileError::EmptyCommand {
            statement: "UPDATE",
            table: table.name.clone(),
        });
    }
    let mut binder = Binder::new(dialect, table);
    let mut sets = Vec::with_capacity(assignments.len());
    for (column, value) in assignments {
        let parameter = binder.bind(column, value.clone())?;
        sets.push(format!("{} = {parameter}", dialect.identifier(column)));
    }
    let mut sql = format!(
        "UPDATE {} SET {}",
        dialect.identifier(&table.name),
        sets.join(", ")
    );
    push_where(&mut sql, &mut binder, qualifier)?;
    Ok(finish(dialect, "update", binder, sql))
}

/// Renders a DELETE of the rows of `table` matching `qualifier` (every row
/// when `None`).
pub fn compile_delete<D: Dialect + ?Sized>(
    dialect: &D,
    table: &TableMetadata,
    qualifier: Option<&Qualifier>,
) -> Result<SqlCommand, CompileError> {
    let mut binder = Binder::new(dialect, table);
    let mut sql = format!("DELETE FROM {}", dialect.identifier(&table.name));
    push_where(&mut sql, &mut binder, qualifier)?;
    Ok(finish(dialect, "delete", binder, sql))
}

fn push_where<D: Dialect + ?Sized>(
    sql: &mut String,
    binder: &mut Binder<'_, D>,
    qualifier: Option<&Qualifier>,
) -> Result<(), CompileError> {
    if let Some(qualifier) = qualifier {
        let fragment = qualifier.accept(&mut QualifierWriter::new(binder))?;
        sql.push_str(" WHERE ");
        sql.push_str(&fragment);
    }
    Ok(())
}

fn finish<D: Dialect + ?Sized>(
    dialect: &D,
    statement: &'static str,
    binder: Binder<'_, D>,
    sql: String,
) -> SqlCommand {
    let command = binder.into_command(sql);
    debug!(
        dialect = dialect.name(),
        statement,
        sql = %command.sql,
        parameters = command.parameters.len(),
        "compiled command"
    );
    command
}
