//! Grants as configured in a project, built from the `show grants` result.

use std::collections::BTreeMap;

use crate::core::value::ResultTable;
use crate::error::{AdapterError, Result};

/// Privileges that cannot be configured and are never reported.
const UNSUPPORTED_PRIVILEGES: [&str; 3] = ["INDEX", "READ", "WRITE"];

/// Privilege → grantees, in the shape of a `grants` config.
pub type GrantsDict = BTreeMap<String, Vec<String>>;

/// Translate a grants query result into a [`GrantsDict`].
///
/// Reads the `grantor` and `privilege` columns. Grantees keep their row
/// order.
///
/// A row whose grantor or privilege is NULL names no grant that could be
/// configured, so it is left out of the dict rather than rejected.
pub fn standardize_grants_dict(table: &ResultTable) -> Result<GrantsDict> {
    let column = |name: &str| {
        table.column_index(name).ok_or_else(|| {
            AdapterError::InvalidInput(format!("grants result has no \"{}\" column", name))
        })
    };
    let grantee_idx = column("grantor")?;
    let privilege_idx = column("privilege")?;

    let mut grants = GrantsDict::new();
    for row in &table.rows {
        let grantee = row.get(grantee_idx).and_then(Option::as_deref);
        let privilege = row.get(privilege_idx).and_then(Option::as_deref);
        let (Some(grantee), Some(privilege)) = (grantee, privilege) else {
            continue;
        };
        if UNSUPPORTED_PRIVILEGES.contains(&privilege) {
            continue;
        }
        grants
            .entry(privilege.to_string())
            .or_default()
            .push(grantee.to_string());
    }
    Ok(grants)
}
