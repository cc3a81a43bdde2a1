//! Shared plumbing for table CRUD services.
//!
//! Every entity service issues plain single-row inserts and updates. The
//! database owns integrity (unique business keys, foreign keys), so the
//! services only reject payloads that cannot form a row at all.

use sqlx::{Encode, Postgres, QueryBuilder, Type};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Business key for a new row: the supplied one, or a fresh UUID string.
#[must_use]
pub fn key_or_generate(supplied: Option<String>) -> String {
    supplied
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Trimmed non-empty value of a required text field.
///
/// # Errors
///
/// Returns [`RecordError::Invalid`] naming the field when it is blank.
pub fn required(field: &'static str, value: &str) -> Result<String, RecordError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RecordError::Invalid(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// [`required`] for a patch field: absent stays absent, present must be
/// non-blank and comes back trimmed.
///
/// # Errors
///
/// Returns [`RecordError::Invalid`] when the value is present but blank.
pub fn required_patch(field: &'static str, value: Option<&str>) -> Result<Option<String>, RecordError> {
    value.map(|value| required(field, value)).transpose()
}

/// Builds `UPDATE <table> SET ... WHERE <key> = $n RETURNING *` from the
/// fields a patch actually carries. `updated_at` is always refreshed, so a
/// patch with no fields still bumps the row.
pub struct UpdateBuilder<'args> {
    builder: QueryBuilder<'args, Postgres>,
    fields: usize,
}

impl<'args> UpdateBuilder<'args> {
    #[must_use]
    pub fn new(table: &'static str) -> Self {
        let mut builder = QueryBuilder::new("UPDATE ");
        builder.push(table).push(" SET updated_at = now()");
        Self { builder, fields: 0 }
    }

    /// Assign `column` when `value` is present; absent fields stay untouched.
    pub fn set<T>(&mut self, column: &'static str, value: Option<T>) -> &mut Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
    {
        if let Some(value) = value {
            self.builder.push(", ").push(column).push(" = ").push_bind(value);
            self.fields += 1;
        }
        self
    }

    /// Set a timestamp column to the database clock.
    pub fn stamp(&mut self, column: &'static str) -> &mut Self {
        self.builder.push(", ").push(column).push(" = now()");
        self
    }

    /// Number of patch fields assigned so far (stamps excluded).
    #[cfg(test)]
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields
    }

    #[must_use]
    pub fn finish(mut self, key_column: &'static str, key: &'args str) -> QueryBuilder<'args, Postgres> {
        tracing::debug!(key_column, key, fields = self.fields, "update built");
        self.builder
            .push(" WHERE ")
            .push(key_column)
            .push(" = ")
            .push_bind(key)
            .push(" RETURNING *");
        self.builder
    }
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
