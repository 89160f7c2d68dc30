//! # Role Capabilities
//!
//! Role-based access is a pure function from role to capability set,
//! evaluated once per screen render. Screens and actions check membership
//! instead of comparing role strings inline.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::UserRole;

/// Something a signed-in user may be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    /// View the dashboard and its statistics.
    AccessDashboard,
    /// Operate the point-of-sale screen.
    AccessPos,
    /// Browse products and variants.
    ViewInventory,
    /// Create/edit/delete products, variants, and categories.
    ManageInventory,
    /// Generate printable product code sheets.
    GenerateProductCodes,
    /// View sales and financial reports.
    ViewReports,
    /// Invite and manage employees.
    ManageTeam,
    /// Create and edit store locations.
    ManageStores,
    /// Edit business-wide settings (currency, tax, receipts).
    ManageBusinessSettings,
}

/// Capabilities granted to each role.
///
/// Cashiers run the sales floor; managers add back-office operations;
/// owners additionally control stores and business settings.
pub fn allowed_capabilities(role: UserRole) -> &'static [Capability] {
    use Capability::*;

    match role {
        UserRole::Cashier => &[AccessDashboard, AccessPos, ViewInventory, GenerateProductCodes],
        UserRole::Manager => &[
            AccessDashboard,
            AccessPos,
            ViewInventory,
            ManageInventory,
            GenerateProductCodes,
            ViewReports,
            ManageTeam,
        ],
        UserRole::Owner => &[
            AccessDashboard,
            AccessPos,
            ViewInventory,
            ManageInventory,
            GenerateProductCodes,
            ViewReports,
            ManageTeam,
            ManageStores,
            ManageBusinessSettings,
        ],
    }
}

/// Convenience membership check.
#[inline]
pub fn is_allowed(role: UserRole, capability: Capability) -> bool {
    allowed_capabilities(role).contains(&capability)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_can_sell() {
        for role in [UserRole::Owner, UserRole::Manager, UserRole::Cashier] {
            assert!(is_allowed(role, Capability::AccessPos));
        }
    }

    #[test]
    fn test_cashier_is_sales_floor_only() {
        assert!(!is_allowed(UserRole::Cashier, Capability::ViewReports));
        assert!(!is_allowed(UserRole::Cashier, Capability::ManageTeam));
        assert!(!is_allowed(UserRole::Cashier, Capability::ManageInventory));
        assert!(!is_allowed(UserRole::Cashier, Capability::ManageStores));
    }

    #[test]
    fn test_manager_lacks_owner_controls() {
        assert!(is_allowed(UserRole::Manager, Capability::ViewReports));
        assert!(is_allowed(UserRole::Manager, Capability::ManageTeam));
        assert!(!is_allowed(UserRole::Manager, Capability::ManageStores));
        assert!(!is_allowed(UserRole::Manager, Capability::ManageBusinessSettings));
    }

    #[test]
    fn test_owner_has_everything() {
        let owner = allowed_capabilities(UserRole::Owner);
        for role in [UserRole::Manager, UserRole::Cashier] {
            for cap in allowed_capabilities(role) {
                assert!(owner.contains(cap));
            }
        }
    }
}
