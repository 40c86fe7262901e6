// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use casebook_domain::DomainError;
use thiserror::Error;

/// Errors raised while rendering, exporting or verifying a report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("invalid customization: {0}")]
    InvalidCustomization(#[from] DomainError),
    #[error("page layout leaves no room for body text ({lines_per_page} lines per page)")]
    LayoutTooSmall { lines_per_page: usize },
    #[error("unsupported export format '{0}'")]
    UnsupportedFormat(String),
    #[error("report has not been saved")]
    NotPersisted,
    #[error("report content hash mismatch: stored {stored}, computed {computed}")]
    IntegrityMismatch { stored: String, computed: String },
}
