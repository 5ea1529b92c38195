//! The fixed catalog of claims that can be granted to users.

pub const CREATE_ROLE: &str = "Create Role";
pub const EDIT_ROLE: &str = "Edit Role";
pub const DELETE_ROLE: &str = "Delete Role";

pub const ALL: [&str; 3] = [CREATE_ROLE, EDIT_ROLE, DELETE_ROLE];

/// Value stored alongside a granted catalog claim.
pub const GRANTED: &str = "true";

pub fn is_known(claim_type: &str) -> bool {
    ALL.contains(&claim_type)
}
