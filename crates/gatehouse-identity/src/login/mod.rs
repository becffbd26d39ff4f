//! Login Aggregate
//!
//! Credential records bound to a person, with failed-attempt lockout.

pub mod entity;
pub mod lockout;
pub mod memory;
pub mod repository;
pub mod service;

// Re-export main types
pub use entity::{UserLogin, IMPERSONATION_PREFIX};
pub use lockout::LockoutPolicy;
pub use memory::MemoryLoginRepository;
pub use repository::LoginRepository;
pub use service::{AuthOutcome, LoginService};
