// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case number formatting and the client-side fallback allocator.
//!
//! Case numbers have the form `<PREFIX>-<sequence>` with the sequence
//! zero-padded to five digits. The primary allocator is an atomic counter in
//! the database. When it is unavailable, `next_case_number_fallback` scans
//! the existing numbers for the highest sequence.
//!
//! The fallback is not safe under concurrent case creation: two callers can
//! observe the same maximum and compute the same next number. The unique
//! index on `(organization_id, case_number)` turns that race into an insert
//! failure rather than a duplicate.

use crate::error::DomainError;

/// Minimum number of digits in the sequence part.
pub const SEQUENCE_WIDTH: usize = 5;

/// A parsed case number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaseNumber {
    prefix: String,
    sequence: u64,
}

impl CaseNumber {
    /// Creates a case number from a prefix and sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix is invalid or the sequence is zero.
    pub fn new(prefix: &str, sequence: u64) -> Result<Self, DomainError> {
        let prefix: String = normalize_prefix(prefix)?;
        if sequence == 0 {
            return Err(DomainError::InvalidCaseNumber(format!("{prefix}-0")));
        }
        Ok(Self { prefix, sequence })
    }

    /// Parses `PREFIX-NNNNN`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a well-formed case number.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let (prefix, digits) = value
            .trim()
            .rsplit_once('-')
            .ok_or_else(|| DomainError::InvalidCaseNumber(value.to_string()))?;

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::InvalidCaseNumber(value.to_string()));
        }

        let sequence: u64 = digits
            .parse()
            .map_err(|_| DomainError::InvalidCaseNumber(value.to_string()))?;

        Self::new(prefix, sequence).map_err(|_| DomainError::InvalidCaseNumber(value.to_string()))
    }

    /// Returns the prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the sequence number.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the following case number with the same prefix.
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            prefix: self.prefix.clone(),
            sequence: self.sequence.saturating_add(1),
        }
    }
}

impl std::fmt::Display for CaseNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{:0width$}",
            self.prefix,
            self.sequence,
            width = SEQUENCE_WIDTH
        )
    }
}

/// Validates and normalizes a case number prefix.
///
/// Prefixes are 1 to 10 ASCII alphanumeric characters, stored uppercase.
///
/// # Errors
///
/// Returns `DomainError::InvalidCaseNumberPrefix` if the prefix is empty,
/// too long, or contains other characters.
pub fn normalize_prefix(prefix: &str) -> Result<String, DomainError> {
    let trimmed: &str = prefix.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidCaseNumberPrefix(String::from(
            "Prefix cannot be empty",
        )));
    }
    if trimmed.len() > 10 {
        return Err(DomainError::InvalidCaseNumberPrefix(format!(
            "Prefix '{trimmed}' is longer than 10 characters"
        )));
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DomainError::InvalidCaseNumberPrefix(format!(
            "Prefix '{trimmed}' must be alphanumeric"
        )));
    }
    Ok(trimmed.to_uppercase())
}

/// Formats a case number string from a prefix and sequence.
///
/// # Errors
///
/// Returns an error if the prefix is invalid or the sequence is zero.
pub fn format_case_number(prefix: &str, sequence: u64) -> Result<String, DomainError> {
    Ok(CaseNumber::new(prefix, sequence)?.to_string())
}

/// Computes the next case number from the existing ones.
///
/// Numbers with a different prefix or that do not parse are ignored.
/// With no matching numbers the sequence starts at 1.
///
/// # Errors
///
/// Returns an error if the prefix is invalid.
pub fn next_case_number_fallback<S: AsRef<str>>(
    prefix: &str,
    existing: &[S],
) -> Result<CaseNumber, DomainError> {
    let prefix: String = normalize_prefix(prefix)?;

    let highest: Option<CaseNumber> = existing
        .iter()
        .filter_map(|value| CaseNumber::parse(value.as_ref()).ok())
        .filter(|number| number.prefix() == prefix)
        .max_by_key(CaseNumber::sequence);

    highest.map_or_else(|| CaseNumber::new(&prefix, 1), |number| Ok(number.next()))
}
