//! Dashboard navigation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
}

const COMMON: [NavItem; 4] = [
    NavItem {
        label: "Overview",
        href: "/dashboard",
    },
    NavItem {
        label: "Heritage Sites",
        href: "/dashboard/sites",
    },
    NavItem {
        label: "Add Location",
        href: "/dashboard/locations/new",
    },
    NavItem {
        label: "Profile",
        href: "/dashboard/profile",
    },
];

const USER_MANAGEMENT: NavItem = NavItem {
    label: "User Management",
    href: "/dashboard/users",
};

/// Navigation entries visible to `role`.
pub fn navigation(role: Role) -> Vec<NavItem> {
    let mut items = COMMON.to_vec();
    match role {
        Role::User => {}
        Role::Admin => items.push(USER_MANAGEMENT),
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_has_no_management_entry() {
        let items = navigation(Role::User);
        assert_eq!(items.len(), COMMON.len());
        assert!(!items.contains(&USER_MANAGEMENT));
    }

    #[test]
    fn test_admin_gets_user_management() {
        let items = navigation(Role::Admin);
        assert_eq!(items.len(), COMMON.len() + 1);
        assert_eq!(items.last(), Some(&USER_MANAGEMENT));
        assert_eq!(&items[..COMMON.len()], &COMMON[..]);
    }

    #[test]
    fn test_role_wire_format() {
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert!(serde_json::from_str::<Role>("\"root\"").is_err());
    }
}
