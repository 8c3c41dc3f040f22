use crate::domain::errors::{StorageError, StorageResult};
use crate::domain::models::{ConfigState, CredentialRecord};
use ini::{Ini, ParseOption};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_SETTINGS_PATH: &str = "settings/config.ini";

const SECTION: &str = "settings";
const KEY_EMAIL: &str = "email";
const KEY_PASSWORD: &str = "password";
const KEY_EMAIL_PASS: &str = "email_pass";
const KEY_USER_DATA_DIR: &str = "user_data_dir";

/// INI-backed store for the single Quotex credential record.
///
/// The file holds one `[settings]` section with `email`, `password`,
/// `email_pass` and `user_data_dir`. Field contents are not validated.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved record. A missing file is `Unconfigured`; its parent
    /// directory is created so a later save can succeed.
    pub fn load(&self) -> StorageResult<ConfigState> {
        if !self.path.exists() {
            self.ensure_parent_dir()?;
            log::debug!("No settings file at {}", self.path.display());
            return Ok(ConfigState::Unconfigured);
        }

        let conf = Ini::load_from_file_opt(&self.path, read_options()).map_err(|e| {
            StorageError::Parse(format!("{}: {}", self.path.display(), e))
        })?;

        let Some(section) = conf.section(Some(SECTION)) else {
            log::warn!(
                "Settings file {} has no [{}] section",
                self.path.display(),
                SECTION
            );
            return Ok(ConfigState::Unconfigured);
        };

        let fields = (
            section.get(KEY_EMAIL),
            section.get(KEY_PASSWORD),
            section.get(KEY_EMAIL_PASS),
            section.get(KEY_USER_DATA_DIR),
        );

        match fields {
            (Some(email), Some(password), Some(email_pass), Some(user_data_dir)) => Ok(
                ConfigState::Configured(CredentialRecord::new(
                    email,
                    password,
                    email_pass,
                    user_data_dir,
                )),
            ),
            _ => {
                log::warn!(
                    "Settings file {} is missing credential keys, treating as unconfigured",
                    self.path.display()
                );
                Ok(ConfigState::Unconfigured)
            }
        }
    }

    /// Overwrite the stored record
    pub fn save(&self, record: &CredentialRecord) -> StorageResult<()> {
        self.ensure_parent_dir()?;

        let mut conf = Ini::new();
        conf.with_section(Some(SECTION))
            .set(KEY_EMAIL, record.email.as_str())
            .set(KEY_PASSWORD, record.password.as_str())
            .set(KEY_EMAIL_PASS, record.email_pass.as_str())
            .set(KEY_USER_DATA_DIR, record.session_dir.to_string_lossy());

        conf.write_to_file(&self.path)?;
        log::info!("Saved credentials for {} to {}", record.email, self.path.display());
        Ok(())
    }

    /// Remove the stored record. Returns whether a file was removed.
    pub fn clear(&self) -> StorageResult<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::info!("Removed settings file {}", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn ensure_parent_dir(&self) -> StorageResult<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent)?;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

// Quotes are literal characters in a password, not INI syntax.
fn read_options() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        ..ParseOption::default()
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new(DEFAULT_SETTINGS_PATH)
    }
}
