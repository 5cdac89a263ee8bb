use crate::{
    config::SqlConfig,
    error::InputError,
    filter::{Filter, placeholder},
    query::Statement,
    value::SqlValue,
};

/// `INSERT INTO table (a,b) VALUES ($1,$2)`; `values` align with `columns`.
#[must_use]
pub fn insert(table: &str, columns: &[&str], values: Vec<SqlValue>) -> Statement {
    let placeholders = (1..=columns.len())
        .map(placeholder)
        .collect::<Vec<_>>()
        .join(",");

    Statement::new(
        format!(
            "INSERT INTO {table} ({}) VALUES ({placeholders})",
            columns.join(",")
        ),
        values,
    )
}

/// Full-record overwrite keyed by `key`. Every column keeps the index of
/// its position in the layout, so the key's value stays where it is and
/// only moves from the SET list to the WHERE equality.
pub fn update_by_key(
    table: &str,
    columns: &[&str],
    values: Vec<SqlValue>,
    key: &str,
) -> Result<Statement, InputError> {
    let mut assignments = Vec::with_capacity(columns.len());
    let mut condition = None;

    for (i, column) in columns.iter().enumerate() {
        let assignment = format!("{column}={}", placeholder(i + 1));
        if *column == key {
            condition = Some(assignment);
        } else {
            assignments.push(assignment);
        }
    }

    let condition = condition.ok_or_else(|| InputError::MissingPrimaryKey {
        table: table.to_string(),
        column: key.to_string(),
    })?;

    Ok(Statement::new(
        format!(
            "UPDATE {table} SET {} WHERE {condition}",
            assignments.join(",")
        ),
        values,
    ))
}

/// Full-record overwrite of every row matching `filter`. The `key` column
/// is left out of the SET list, which is numbered from `$1`; the filter is
/// numbered after it.
pub fn update_where(
    table: &str,
    columns: &[&str],
    values: Vec<SqlValue>,
    key: &str,
    filter: &Filter,
    config: &SqlConfig,
) -> Result<Statement, InputError> {
    let (columns, mut values): (Vec<&str>, Vec<SqlValue>) = columns
        .iter()
        .copied()
        .zip(values)
        .filter(|(column, _)| *column != key)
        .unzip();

    let assignments = columns
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{column}={}", placeholder(i + 1)))
        .collect::<Vec<_>>()
        .join(",");

    let clause = filter.where_clause(values.len() + 1, config)?;
    values.extend(clause.args);

    Ok(Statement::new(
        format!("UPDATE {table} SET {assignments}{}", clause.sql),
        values,
    ))
}

/// `DELETE FROM table` restricted by `filter`; an empty filter matches
/// every row.
pub fn delete_where(
    table: &str,
    filter: &Filter,
    config: &SqlConfig,
) -> Result<Statement, InputError> {
    let clause = filter.where_clause(1, config)?;

    Ok(Statement::new(
        format!("DELETE FROM {table}{}", clause.sql),
        clause.args,
    ))
}
