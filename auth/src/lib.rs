//! Password hashing library
//!
//! Provides the credential hashing primitive used by the planner server:
//! - Argon2id hashing with a fresh random salt per call
//! - PHC string output, so salt and cost parameters travel with the hash
//! - Verification that never fails on malformed input
//!
//! Services define their own hashing port and adapt this implementation to it.
//!
//! # Examples
//!
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_params(1024, 1, 1).unwrap();
//! let first = hasher.hash("my_password").unwrap();
//! let second = hasher.hash("my_password").unwrap();
//!
//! assert_ne!(first, second);
//! assert!(hasher.verify("my_password", &first));
//! assert!(hasher.verify("my_password", &second));
//! assert!(!hasher.verify("my_password", "not-a-phc-string"));
//! ```

pub mod password;

pub use password::PasswordError;
pub use password::PasswordHasher;
