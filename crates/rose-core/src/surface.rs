//! # Operating Surfaces
//!
//! The shop runs two clients: the phone at the counter (mobile) and the
//! back-office browser. Each sees a different set of screens.
//!
//! ```text
//! ┌──────────────┬────────────────┬───────────┬───────────┐
//! │ Surface      │ Point of Sale  │ Reporting │ Admin     │
//! ├──────────────┼────────────────┼───────────┼───────────┤
//! │ Mobile       │       ✓        │     ✓     │           │
//! │ Browser      │                │     ✓     │     ✓     │
//! └──────────────┴────────────────┴───────────┴───────────┘
//! ```
//!
//! The capability set is computed once and handed to whoever composes the
//! screens (the router, the tab bar); nothing else checks the platform.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// Where the client runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Surface {
    #[default]
    Mobile,
    Browser,
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Mobile => write!(f, "mobile"),
            Surface::Browser => write!(f, "browser"),
        }
    }
}

impl FromStr for Surface {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mobile" | "native" => Ok(Surface::Mobile),
            "browser" | "web" => Ok(Surface::Browser),
            _ => Err(ValidationError::NotAllowed {
                field: "surface".to_string(),
                allowed: vec!["mobile".to_string(), "browser".to_string()],
            }),
        }
    }
}

/// Screens available on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Capabilities {
    pub point_of_sale: bool,
    pub reporting: bool,
    pub admin: bool,
}

impl Capabilities {
    pub fn for_surface(surface: Surface) -> Self {
        match surface {
            Surface::Mobile => Capabilities {
                point_of_sale: true,
                reporting: true,
                admin: false,
            },
            Surface::Browser => Capabilities {
                point_of_sale: false,
                reporting: true,
                admin: true,
            },
        }
    }
}

impl From<Surface> for Capabilities {
    fn from(surface: Surface) -> Self {
        Capabilities::for_surface(surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_per_surface() {
        let mobile = Capabilities::for_surface(Surface::Mobile);
        assert!(mobile.point_of_sale && mobile.reporting && !mobile.admin);

        let browser: Capabilities = Surface::Browser.into();
        assert!(!browser.point_of_sale && browser.reporting && browser.admin);
    }

    #[test]
    fn test_surface_parsing() {
        assert_eq!("web".parse::<Surface>().unwrap(), Surface::Browser);
        assert_eq!("Mobile".parse::<Surface>().unwrap(), Surface::Mobile);
        assert!("desktop".parse::<Surface>().is_err());
        assert_eq!(Surface::Browser.to_string(), "browser");
    }
}
