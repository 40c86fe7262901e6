// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Column encodings shared by queries and mutations.
//!
//! Timestamps are stored as RFC 3339 text and dates as `YYYY-MM-DD`.
//! Counts and sizes are stored as `BIGINT`.

use num_traits::ToPrimitive;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};

use crate::error::PersistenceError;

pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| {
        PersistenceError::ReconstructionError(format!("Invalid timestamp '{value}': {e}"))
    })
}

pub fn format_date(value: Date) -> String {
    casebook_domain::format_iso_date(value)
}

pub fn parse_date(value: &str) -> Result<Date, PersistenceError> {
    casebook_domain::parse_iso_date(value)
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

pub fn to_count(value: i64, column: &str) -> Result<u32, PersistenceError> {
    value.to_u32().ok_or_else(|| {
        PersistenceError::ReconstructionError(format!("{column} out of range: {value}"))
    })
}

pub fn to_db_int<T: ToPrimitive + Copy + std::fmt::Display>(
    value: T,
    column: &str,
) -> Result<i64, PersistenceError> {
    value.to_i64().ok_or_else(|| {
        PersistenceError::SerializationError(format!("{column} out of range: {value}"))
    })
}

/// Parses one of the domain's string-form enums from a stored column.
pub fn parse_column<T>(value: &str) -> Result<T, PersistenceError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}
