pub mod user;

pub use user::SqliteCredentialStore;
