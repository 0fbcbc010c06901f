//! Renders qualifiers and fetch specifications to SQL.

use tracing::{debug, warn};

use super::params::{Binder, SqlCommand};
use super::{Dialect, RowLimit};
use crate::ast::{
    ClauseQualifier, ColumnQualifier, Conjunction, PathQualifier, Predicate, PredicateKind,
    PropertyQualifier, Qualifier, QualifierVisitor,
};
use crate::error::CompileError;
use crate::fetch::FetchSpecification;
use crate::schema::TableMetadata;
use crate::value::Value;

/// Writes WHERE fragments, binding comparison values as it goes.
pub struct QualifierWriter<'b, 'a, D: Dialect + ?Sized> {
    binder: &'b mut Binder<'a, D>,
}

impl<'b, 'a, D: Dialect + ?Sized> QualifierWriter<'b, 'a, D> {
    pub fn new(binder: &'b mut Binder<'a, D>) -> Self {
        Self { binder }
    }

    fn comparison(&mut self, column: &str, predicate: &Predicate) -> Result<String, CompileError> {
        let dialect = self.binder.dialect();
        let target = dialect.identifier(column);
        match (predicate.kind(), predicate.value()) {
            (PredicateKind::Equals, Value::Null) => Ok(format!("{target} IS NULL")),
            (PredicateKind::NotEqual, Value::Null) => Ok(format!("{target} IS NOT NULL")),
            (PredicateKind::Like, value) => {
                let parameter = self.binder.bind(column, value.clone())?;
                Ok(dialect.render_like(&target, &parameter))
            }
            (kind, value) => {
                let parameter = self.binder.bind_comparison(column, value.clone())?;
                Ok(format!("{target} {} {parameter}", kind.sql_operator()))
            }
        }
    }
}

impl<D: Dialect + ?Sized> QualifierVisitor for QualifierWriter<'_, '_, D> {
    type Output = String;
    type Error = CompileError;

    fn visit_column(&mut self, qualifier: &ColumnQualifier) -> Result<String, CompileError> {
        self.comparison(qualifier.column(), qualifier.predicate())
    }

    fn visit_property(&mut self, qualifier: &PropertyQualifier) -> Result<String, CompileError> {
        self.comparison(qualifier.property(), qualifier.predicate())
    }

    fn visit_path(&mut self, qualifier: &PathQualifier) -> Result<String, CompileError> {
        Err(CompileError::PathNotCompilable {
            path: qualifier.dotted(),
        })
    }

    fn visit_clause(&mut self, qualifier: &ClauseQualifier) -> Result<String, CompileError> {
        if qualifier.is_empty() {
            return Ok(String::from(match qualifier.conjunction() {
                Conjunction::And => "1 = 1",
                Conjunction::Or => "1 = 0",
            }));
        }
        let separator = format!(" {} ", qualifier.conjunction().sql_keyword());
        let parts = qualifier
            .children()
            .iter()
            .map(|child| child.accept(self).map(|sql| format!("({sql})")))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join(&separator))
    }
}

/// Renders `qualifier` as a WHERE fragment (without the keyword).
pub fn compile_qualifier<D: Dialect + ?Sized>(
    dialect: &D,
    qualifier: &Qualifier,
    table: &TableMetadata,
) -> Result<SqlCommand, CompileError> {
    let mut binder = Binder::new(dialect, table);
    let sql = qualifier.accept(&mut QualifierWriter::new(&mut binder))?;
    Ok(binder.into_command(sql))
}

/// Renders a full SELECT for `spec`.
pub fn compile_select<D: Dialect + ?Sized>(
    dialect: &D,
    spec: &FetchSpecification,
) -> Result<SqlCommand, CompileError> {
    let table = &spec.table;
    let limit = spec.limit();
    if limit == Some(0) {
        warn!(dialect = dialect.name(), table = %table.name, "compiling a fetch with a limit of 0");
    }
    let row_limit = dialect.row_limit();
    let mut binder = Binder::new(dialect, table);

    let mut sql = String::from("SELECT ");
    match (limit, row_limit) {
        (Some(n), RowLimit::Top) => sql.push_str(&format!("TOP {n} ")),
        (Some(n), RowLimit::First) => sql.push_str(&format!("FIRST {n} ")),
        _ => {}
    }

    if table.columns.is_empty() {
        sql.push('*');
    } else {
        let columns: Vec<String> = table
            .columns
            .iter()
            .map(|c| dialect.identifier(&c.name))
            .collect();
        sql.push_str(&columns.join(", "));
    }

    sql.push_str(" FROM ");
    sql.push_str(&dialect.identifier(&table.name));

    if let Some(qualifier) = &spec.qualifier {
        let fragment = qualifier.accept(&mut QualifierWriter::new(&mut binder))?;
        sql.push_str(" WHERE ");
        sql.push_str(&fragment);
    }

    if !spec.sort_orderings.is_empty() {
        let orderings: Vec<String> = spec
            .sort_orderings
            .iter()
            .map(|ordering| {
                let column = dialect.identifier(&ordering.column);
                let key = if ordering.direction.is_case_insensitive() {
                    format!("UPPER({column})")
                } else {
                    column
                };
                format!("{key} {}", ordering.direction.sql_keyword())
            })
            .collect();
        sql.push_str(" ORDER BY ");
        sql.push_str(&orderings.join(", "));
    }

    match (limit, row_limit) {
        (Some(n), RowLimit::Limit) => sql.push_str(&format!(" LIMIT {n}")),
        (Some(n), RowLimit::RowNum) => sql = format!("SELECT * FROM ({sql}) WHERE ROWNUM <= {n}"),
        _ => {}
    }

    let command = binder.into_command(sql);
    debug!(
        dialect = dialect.name(),
        sql = %command.sql,
        parameters = command.parameters.len(),
        "compiled select"
    );
    Ok(command)
}
