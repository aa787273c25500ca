//! Persisted login session: OS keychain first, then `~/.linkhub/session.json`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AuthError;
use crate::provider::LoginSession;

const DEFAULT_KEYRING_SERVICE: &str = "linkhub-cli";
const KEYRING_USER: &str = "lark-session";
const SESSION_FILE_NAME: &str = "session.json";

/// Keyring service name. `LINKHUB_KEYRING_SERVICE` overrides it so tests
/// never touch a real login.
fn keyring_service() -> String {
    std::env::var("LINKHUB_KEYRING_SERVICE")
        .unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string())
}

/// Store a session in the OS keychain, falling back to the session file.
///
/// # Errors
///
/// Returns `AuthError::TokenStoreError` if serialization or both backends fail.
pub fn store(session: &LoginSession) -> Result<(), AuthError> {
    let json = serde_json::to_string(session)
        .map_err(|e| AuthError::TokenStoreError(format!("serialize session: {e}")))?;
    match keyring::Entry::new(&keyring_service(), KEYRING_USER) {
        Ok(entry) => match entry.set_password(&json) {
            Ok(()) => Ok(()),
            Err(error) => {
                tracing::warn!(%error, "keyring store failed; falling back to file");
                store_file_at(&session_path()?, &json)
            }
        },
        Err(error) => {
            tracing::warn!(%error, "keyring unavailable; falling back to file");
            store_file_at(&session_path()?, &json)
        }
    }
}

/// Load the stored session. Priority: keyring, then file.
#[must_use]
pub fn load() -> Option<LoginSession> {
    load_with_source().map(|(session, _)| session)
}

/// Load the stored session together with the backend it came from.
#[must_use]
pub fn load_with_source() -> Option<(LoginSession, &'static str)> {
    if let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER)
        && let Ok(json) = entry.get_password()
        && let Some(session) = decode(&json)
    {
        return Some((session, "keyring"));
    }
    let path = session_path().ok()?;
    load_file_at(&path).map(|session| (session, "file"))
}

/// Delete the stored session from keyring and file.
///
/// # Errors
///
/// Returns `AuthError::TokenStoreError` if the session file cannot be removed.
pub fn delete() -> Result<(), AuthError> {
    if let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER) {
        let _ = entry.delete_credential();
    }
    delete_file_at(&session_path()?)
}

// --- Private file helpers ---

fn session_path() -> Result<PathBuf, AuthError> {
    dirs::home_dir()
        .map(|h| h.join(".linkhub").join(SESSION_FILE_NAME))
        .ok_or_else(|| {
            AuthError::TokenStoreError("home directory not found, cannot store session".into())
        })
}

fn decode(json: &str) -> Option<LoginSession> {
    if json.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(json) {
        Ok(session) => Some(session),
        Err(error) => {
            tracing::warn!(%error, "ignoring unreadable stored session");
            None
        }
    }
}

fn store_file_at(path: &Path, json: &str) -> Result<(), AuthError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AuthError::TokenStoreError(format!("mkdir {}: {e}", parent.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
            }
        }
    }
    fs::write(path, json)
        .map_err(|e| AuthError::TokenStoreError(format!("write {}: {e}", path.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| AuthError::TokenStoreError(format!("chmod {}: {e}", path.display())))?;
    }

    Ok(())
}

fn load_file_at(path: &Path) -> Option<LoginSession> {
    fs::read_to_string(path).ok().as_deref().and_then(decode)
}

fn delete_file_at(path: &Path) -> Result<(), AuthError> {
    if path.exists() {
        fs::remove_file(path).map_err(|e| {
            AuthError::TokenStoreError(format!("failed to delete {}: {e}", path.display()))
        })?;
    }
    Ok(())
}
