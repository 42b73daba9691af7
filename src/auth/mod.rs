//! Authentication module: credential storage and session lifecycle.
//!
//! This module provides:
//! - `TokenStore`: self-healing persistence for the bearer/refresh pair
//! - `SessionManager`: bootstrap, login, and logout orchestration
//! - storage backends (file, OS keychain, in-memory)
//!
//! Tokens are validated structurally on every read; corrupted or expired
//! material is deleted the moment it is detected.

pub mod claims;
pub mod keychain;
pub mod session;
pub mod storage;
pub mod store;

pub use keychain::KeyringStorage;
pub use session::{SessionManager, SessionState};
pub use storage::{FileStorage, MemoryStorage, TokenStorage};
pub use store::{StoreHealth, StoreStatus, TokenStore};
