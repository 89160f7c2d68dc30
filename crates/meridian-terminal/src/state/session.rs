//! # Session Context
//!
//! The authenticated session as an explicit object handed to the flows that
//! need it. There is no ambient "current user"; ownership and lifecycle are
//! the terminal's.

use std::sync::RwLock;

use meridian_core::capability::{allowed_capabilities, is_allowed, Capability};
use meridian_core::types::{Store, User, UserRole};

/// Who is operating this terminal and where.
///
/// ## Store Resolution
/// Users pinned to a store sell there. Unpinned users (typically owners)
/// must pick a store before checkout; the picked store also supplies the
/// receipt address block.
#[derive(Debug)]
pub struct SessionContext {
    user: User,
    selected_store: RwLock<Option<Store>>,
}

impl SessionContext {
    /// Creates a session for an authenticated user.
    pub fn new(user: User) -> Self {
        SessionContext {
            user,
            selected_store: RwLock::new(None),
        }
    }

    /// The authenticated user.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// The user's role.
    pub fn role(&self) -> UserRole {
        self.user.role
    }

    /// Capabilities this session's role grants.
    pub fn capabilities(&self) -> &'static [Capability] {
        allowed_capabilities(self.user.role)
    }

    /// Checks a single capability.
    pub fn can(&self, capability: Capability) -> bool {
        is_allowed(self.user.role, capability)
    }

    /// Selects the store this terminal sells from.
    pub fn select_store(&self, store: Store) {
        if let Ok(mut selected) = self.selected_store.write() {
            *selected = Some(store);
        }
    }

    /// The selected store's details, when one has been picked.
    pub fn selected_store(&self) -> Option<Store> {
        self.selected_store
            .read()
            .ok()
            .and_then(|s| s.clone())
    }

    /// The store id checkout should bill against: the explicit selection
    /// first, the user's pinned store otherwise.
    pub fn store_id(&self) -> Option<String> {
        self.selected_store()
            .map(|s| s.id)
            .or_else(|| self.user.store_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole, store_id: Option<&str>) -> User {
        User {
            id: "u1".to_string(),
            email: "cashier@example.com".to_string(),
            first_name: "Alex".to_string(),
            last_name: "Kim".to_string(),
            role,
            store_id: store_id.map(str::to_string),
            is_active: true,
        }
    }

    fn store(id: &str) -> Store {
        Store {
            id: id.to_string(),
            name: "Downtown".to_string(),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
            phone: "555-0100".to_string(),
            email: None,
            is_active: true,
        }
    }

    #[test]
    fn test_pinned_user_has_store_without_selection() {
        let session = SessionContext::new(user(UserRole::Cashier, Some("s1")));
        assert_eq!(session.store_id().as_deref(), Some("s1"));
        assert!(session.selected_store().is_none());
    }

    #[test]
    fn test_unpinned_user_needs_selection() {
        let session = SessionContext::new(user(UserRole::Owner, None));
        assert!(session.store_id().is_none());

        session.select_store(store("s2"));
        assert_eq!(session.store_id().as_deref(), Some("s2"));
    }

    #[test]
    fn test_selection_overrides_pin() {
        let session = SessionContext::new(user(UserRole::Manager, Some("s1")));
        session.select_store(store("s2"));
        assert_eq!(session.store_id().as_deref(), Some("s2"));
    }

    #[test]
    fn test_capabilities_follow_role() {
        let session = SessionContext::new(user(UserRole::Cashier, None));
        assert!(session.can(Capability::AccessPos));
        assert!(!session.can(Capability::ViewReports));
        assert!(!session.capabilities().contains(&Capability::ManageStores));
    }
}
