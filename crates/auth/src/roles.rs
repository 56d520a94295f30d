//! Role-code mapping and the super-admin override set.

use stockroom_core::RoleCode;

/// UI role code → backend role code. Lookup is case-insensitive because
/// `RoleCode` is already upper-cased on construction.
const ROLE_CODE_TABLE: &[(&str, &str)] = &[
    ("ADMIN", "ADMIN"),
    ("SUPER_ADMIN", "SUPER_ADMIN"),
    ("SUPERADMIN", "SUPER_ADMIN"),
    ("STUDENT", "STUDENTS"),
    ("STUDENTS", "STUDENTS"),
    ("TEACHER", "TEACHERS"),
    ("TEACHERS", "TEACHERS"),
    ("STAFF", "STAFF"),
    ("STOREKEEPER", "STORE_KEEPER"),
    ("STORE_KEEPER", "STORE_KEEPER"),
    ("PRINCIPAL", "PRINCIPAL"),
    ("ACCOUNTANT", "ACCOUNTANT"),
];

/// Backend role codes that bypass privilege resolution entirely.
const SUPER_ADMIN_CODES: &[&str] = &["SUPER_ADMIN", "ADMIN"];

/// Map a UI role code to the backend's role code.
///
/// Unmapped codes pass through (already upper-cased by `RoleCode`).
pub fn map_role_code(code: &RoleCode) -> RoleCode {
    match ROLE_CODE_TABLE.iter().find(|(ui, _)| *ui == code.as_str()) {
        Some((_, backend)) => RoleCode::new(backend).unwrap_or_else(|_| code.clone()),
        None => {
            tracing::debug!(role_code = %code, "role code has no mapping; passing through");
            code.clone()
        }
    }
}

/// Map every role code, dropping duplicates while keeping first-seen order.
pub fn map_role_codes(codes: &[RoleCode]) -> Vec<RoleCode> {
    let mut mapped: Vec<RoleCode> = Vec::with_capacity(codes.len());
    for code in codes {
        let backend = map_role_code(code);
        if !mapped.contains(&backend) {
            mapped.push(backend);
        }
    }
    mapped
}

pub fn is_super_admin(code: &RoleCode) -> bool {
    SUPER_ADMIN_CODES.contains(&code.as_str())
}
