//! Role-dependent sidebar menu.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    /// Anything but "admin" is a regular user
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.trim().eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::User
        })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NavItem {
    pub name: &'static str,
    pub href: &'static str,
}

impl NavItem {
    const fn new(name: &'static str, href: &'static str) -> Self {
        Self { name, href }
    }
}

const DASHBOARD: NavItem = NavItem::new("Dashboard", "/");
const UPLOAD: NavItem = NavItem::new("Upload Data", "/upload");
const ANALYTICS: NavItem = NavItem::new("Analytics", "/analytics");
const USERS: NavItem = NavItem::new("User Directory", "/users");
const SETTINGS: NavItem = NavItem::new("Settings", "/settings");

/// Ordered menu for a role. Admins get the user directory before settings.
pub fn nav_items(role: Role) -> Vec<NavItem> {
    match role {
        Role::User => vec![DASHBOARD, UPLOAD, ANALYTICS, SETTINGS],
        Role::Admin => vec![DASHBOARD, UPLOAD, ANALYTICS, USERS, SETTINGS],
    }
}
