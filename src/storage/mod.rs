pub mod credentials;

pub use credentials::{CredentialStore, DEFAULT_SETTINGS_PATH};
