// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use casebook_domain::Organization;
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewOrganization;
use crate::diesel_schema;
use crate::error::PersistenceError;

/// Inserts an organization. Its case-number sequence starts at 1.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_organization(
    conn: &mut SqliteConnection,
    organization: &Organization,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(diesel_schema::organizations::table)
        .values(&NewOrganization {
            name: &organization.name,
            address: organization.address.as_deref(),
            phone: organization.phone.as_deref(),
            email: organization.email.as_deref(),
            website: organization.website.as_deref(),
            logo_url: organization.logo_url.as_deref(),
            case_number_prefix: &organization.case_number_prefix,
        })
        .execute(conn)?;

    let organization_id: i64 = get_last_insert_rowid(conn)?;
    debug!(organization_id, name = %organization.name, "Inserted organization");
    Ok(organization_id)
}
