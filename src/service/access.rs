use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error as ThisError;

use crate::error::SchoolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    Cashier,
}

#[derive(Debug, ThisError)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::Admin => "ADMIN",
            Role::Cashier => "CASHIER",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }

    /// Whether an account holding `self` may create, edit or delete an
    /// account holding `target`.
    pub fn can_manage(&self, target: Role) -> bool {
        match self {
            Role::SuperAdmin => true,
            Role::Admin => target == Role::Cashier,
            Role::Cashier => false,
        }
    }

    /// Whether `self` sees an account with role `target` in user listings.
    pub fn can_view(&self, target: Role) -> bool {
        match self {
            Role::SuperAdmin => true,
            Role::Admin => target != Role::SuperAdmin,
            Role::Cashier => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            "ADMIN" => Ok(Role::Admin),
            "CASHIER" => Ok(Role::Cashier),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Fails with 403 unless the role may perform school-wide admin writes.
pub fn require_admin(role: Role) -> Result<(), SchoolError> {
    if role.is_admin() {
        Ok(())
    } else {
        Err(SchoolError::forbidden("admin role required"))
    }
}

pub fn require_manage(actor: Role, target: Role) -> Result<(), SchoolError> {
    if actor.can_manage(target) {
        Ok(())
    } else {
        Err(SchoolError::forbidden(format!(
            "{actor} may not manage {target} accounts"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_manages_only_cashiers() {
        assert!(Role::Admin.can_manage(Role::Cashier));
        assert!(!Role::Admin.can_manage(Role::Admin));
        assert!(!Role::Admin.can_manage(Role::SuperAdmin));
        assert!(Role::SuperAdmin.can_manage(Role::SuperAdmin));
        assert!(!Role::Cashier.can_manage(Role::Cashier));
    }

    #[test]
    fn visibility_hides_super_admins_from_admins() {
        assert!(Role::Admin.can_view(Role::Admin));
        assert!(!Role::Admin.can_view(Role::SuperAdmin));
        assert!(!Role::Cashier.can_view(Role::Cashier));
    }

    #[test]
    fn round_trips_wire_names() {
        for role in [Role::SuperAdmin, Role::Admin, Role::Cashier] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
            assert_eq!(
                serde_json::to_string(&role).unwrap(),
                format!("\"{}\"", role.as_str())
            );
        }
        assert!("OWNER".parse::<Role>().is_err());
    }

    #[test]
    fn cashier_is_not_admin() {
        assert!(require_admin(Role::Cashier).is_err());
        assert!(require_admin(Role::Admin).is_ok());
    }
}
