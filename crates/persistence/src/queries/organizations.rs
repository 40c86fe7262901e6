// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use casebook_domain::Organization;
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::diesel_schema::organizations;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = organizations)]
struct OrganizationRow {
    organization_id: i64,
    name: String,
    address: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    website: Option<String>,
    logo_url: Option<String>,
    case_number_prefix: String,
}

/// Retrieves an organization's profile.
///
/// # Errors
///
/// Returns `OrganizationNotFound` if no organization has this id.
pub fn get_organization(
    conn: &mut SqliteConnection,
    organization_id: i64,
) -> Result<Organization, PersistenceError> {
    let row: OrganizationRow = organizations::table
        .filter(organizations::organization_id.eq(organization_id))
        .select(OrganizationRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::OrganizationNotFound(organization_id))?;

    Ok(Organization {
        organization_id: Some(row.organization_id),
        name: row.name,
        address: row.address,
        phone: row.phone,
        email: row.email,
        website: row.website,
        logo_url: row.logo_url,
        case_number_prefix: row.case_number_prefix,
    })
}
