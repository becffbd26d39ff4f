//! Gatehouse Identity
//!
//! Credential lifecycle management:
//! - Login records bound to a person, with create/lookup/update operations
//! - Pluggable authentication strategies (internal password or external)
//! - Failed-attempt lockout policy driven by runtime settings
//! - Encrypted, time-limited confirmation codes
//! - Current-user resolution with an impersonation path
//!
//! ## Module Organization (Aggregate-based)
//!
//! Each aggregate contains:
//! - `entity` - Domain entities
//! - `repository` - Data access ports and adapters
//! - `service` - Operations (where applicable)

// Core aggregates
pub mod confirmation;
pub mod login;
pub mod resolver;
pub mod strategy;

// Policy helpers
pub mod password;
pub mod settings;

// Shared infrastructure
pub mod shared;

// Re-export common types from shared
pub use shared::error::{IdentityError, Result};

// Re-export main entity types for convenience
pub use login::entity::{UserLogin, IMPERSONATION_PREFIX};
pub use resolver::{Person, RequestContext};

// Re-export ports
pub use login::repository::LoginRepository;
pub use resolver::PersonDirectory;
pub use settings::SettingsProvider;
pub use strategy::{AuthStrategy, ServiceKind};

// Re-export services
pub use confirmation::cipher::{AesGcmTokenCipher, CipherError, TokenCipher};
pub use confirmation::codec::ConfirmationCodec;
pub use login::lockout::LockoutPolicy;
pub use login::memory::MemoryLoginRepository;
pub use login::service::{AuthOutcome, LoginService};
pub use password::PasswordRules;
pub use resolver::activity::{ActivityConsumer, ActivityEvent, ActivityTracker};
pub use resolver::{CurrentUserResolver, MemoryPersonDirectory};
pub use settings::{EnvSettings, MemorySettings};
pub use strategy::argon2::{Argon2Config, Argon2Strategy};
pub use strategy::StrategyRegistry;
