//! # State Module
//!
//! Dependency-injected state objects for the active POS session.
//!
//! ## Why Multiple State Types?
//! Instead of a single `AppState` struct containing everything,
//! we use separate state types. This approach:
//!
//! 1. **Better Separation of Concerns**: Each state type has a single responsibility
//! 2. **Easier Testing**: Can inject individual states with fakes
//! 3. **Clearer Flow Signatures**: Flows declare exactly what state they need
//! 4. **Reduced Contention**: Independent states don't block each other
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      PosTerminal                                │   │
//! │  │  owns and wires every state object at start, tears down on     │   │
//! │  │  shutdown; nothing lives in module-level globals               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │  CartState   │  │SettingsState │  │  SessionContext  │              │
//! │  │              │  │              │  │                  │              │
//! │  │  Arc<Mutex<  │  │  RwLock<     │  │  user            │              │
//! │  │    Cart      │  │   Business   │  │  store selection │              │
//! │  │  >>          │  │   Settings>  │  │                  │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CartState: Protected by Arc<Mutex<T>> for exclusive access          │
//! │  • SettingsState: read-mostly RwLock, replaced on refresh              │
//! │  • SessionContext: user immutable, store selection behind RwLock       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod session;
mod settings;

pub use cart::CartState;
pub use session::SessionContext;
pub use settings::SettingsState;
