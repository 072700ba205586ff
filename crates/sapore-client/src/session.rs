//! # Session & Token Storage
//!
//! The backend hands out a JWT at login. The console keeps exactly one
//! token string under a fixed key and sends it with every request.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Session Lifecycle                               │
//! │                                                                         │
//! │  sapore login                                                           │
//! │     │  POST /users/login { email, password }                            │
//! │     ▼                                                                   │
//! │  token ──► decode_claims (no signature check) ──► CurrentUser          │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  SessionStore.set("santsapore.token", token)                            │
//! │     │                                                                   │
//! │     ▼  every request                                                    │
//! │  SessionStore.get(...) ──► Authorization: Bearer <token>                │
//! │     │                                                                   │
//! │     ▼  401 / 403                                                        │
//! │  SessionStore.remove(...) ──► "Sessão expirada"                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Token Verification
//! The console never verifies signatures: it has no key, and the backend
//! checks every request anyway. Claims are read for display only.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

use crate::error::{ClientError, ClientResult};

/// Key the login token is stored under.
pub const TOKEN_KEY: &str = "santsapore.token";

// =============================================================================
// Store
// =============================================================================

/// A small persistent key/value store for session data.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> ClientResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;
    fn remove(&self, key: &str) -> ClientResult<()>;
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> ClientError {
    ClientError::Io("session store lock poisoned".to_string())
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }
}

/// A JSON object on disk, rewritten whole on every change.
///
/// A missing file reads as empty.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileSessionStore {
    pub fn open(path: impl Into<PathBuf>) -> ClientResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            debug!(?path, "Session file not found, starting empty");
            BTreeMap::new()
        };

        Ok(FileSessionStore {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

// =============================================================================
// Claims
// =============================================================================

/// Claims the backend puts in its login token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's e-mail or id. Empty when the token has none.
    #[serde(default)]
    pub sub: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Expiry, seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Reads a token's claims without checking its signature, expiry or
/// audience. The backend is the verifier.
pub fn decode_claims(token: &str) -> ClientResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

/// The logged-in operator, as far as the token says.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentUser {
    pub subject: String,
    pub name: Option<String>,
    pub role: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl CurrentUser {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }

    /// Name if the token carries one, else the subject.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.subject)
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        CurrentUser {
            subject: claims.sub,
            name: claims.name,
            role: claims.role,
            expires_at: claims.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single()),
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// Shared handle to the token store. Cheap to clone.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Session { store }
    }

    /// A session that forgets everything on exit.
    pub fn in_memory() -> Self {
        Session::new(Arc::new(MemorySessionStore::new()))
    }

    /// A session persisted at `path`.
    pub fn file(path: impl Into<PathBuf>) -> ClientResult<Self> {
        Ok(Session::new(Arc::new(FileSessionStore::open(path)?)))
    }

    pub fn token(&self) -> ClientResult<Option<String>> {
        self.store.get(TOKEN_KEY)
    }

    /// Stores a freshly issued token, rejecting one that is not a JWT.
    pub fn set_token(&self, token: &str) -> ClientResult<CurrentUser> {
        let user = CurrentUser::from(decode_claims(token)?);
        self.store.set(TOKEN_KEY, token)?;
        info!(user = %user.display_name(), "Session started");
        Ok(user)
    }

    pub fn clear(&self) -> ClientResult<()> {
        self.store.remove(TOKEN_KEY)?;
        info!("Session cleared");
        Ok(())
    }

    /// The user the stored token belongs to, if any.
    pub fn current_user(&self) -> ClientResult<Option<CurrentUser>> {
        match self.token()? {
            Some(token) => Ok(Some(CurrentUser::from(decode_claims(&token)?))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    /// Issues a token the way the backend would.
    fn issue_token(sub: &str, exp: i64) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            name: Some("Ana Souza".to_string()),
            role: Some("ADMIN".to_string()),
            exp: Some(exp),
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"backend-secret")).unwrap()
    }

    #[test]
    fn test_decode_claims_ignores_signature_and_expiry() {
        let token = issue_token("ana@santsapore.com.br", 1_000);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub, "ana@santsapore.com.br");
        assert_eq!(claims.exp, Some(1_000));

        let user = CurrentUser::from(claims);
        assert_eq!(user.display_name(), "Ana Souza");
        assert!(user.is_expired(Utc::now()));
    }

    #[test]
    fn test_audience_claim_is_accepted() {
        let claims = serde_json::json!({
            "sub": "ana",
            "aud": "santsapore-web",
            "exp": 4_102_444_800i64,
        });
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"backend-secret")).unwrap();

        assert_eq!(decode_claims(&token).unwrap().sub, "ana");

        let session = Session::in_memory();
        let user = session.set_token(&token).unwrap();
        assert_eq!(user.subject, "ana");
        assert_eq!(session.token().unwrap(), Some(token));
        assert_eq!(session.current_user().unwrap().unwrap().subject, "ana");
    }

    #[test]
    fn test_token_without_subject() {
        let claims = serde_json::json!({ "name": "Ana Souza", "aud": ["web", "console"] });
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"backend-secret")).unwrap();

        let user = Session::in_memory().set_token(&token).unwrap();
        assert_eq!(user.subject, "");
        assert_eq!(user.display_name(), "Ana Souza");
        assert_eq!(user.expires_at, None);
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(matches!(decode_claims("not-a-jwt"), Err(ClientError::InvalidToken(_))));

        let session = Session::in_memory();
        assert!(session.set_token("not-a-jwt").is_err());
        assert_eq!(session.token().unwrap(), None);
    }

    #[test]
    fn test_memory_session_round_trip() {
        let session = Session::in_memory();
        assert!(session.current_user().unwrap().is_none());

        let token = issue_token("ana", 4_102_444_800);
        session.set_token(&token).unwrap();
        assert_eq!(session.token().unwrap().as_deref(), Some(token.as_str()));
        assert_eq!(session.current_user().unwrap().unwrap().subject, "ana");

        session.clear().unwrap();
        assert_eq!(session.token().unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_under_fixed_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("session.json");
        let token = issue_token("ana", 4_102_444_800);

        Session::file(&path).unwrap().set_token(&token).unwrap();

        let raw: BTreeMap<String, String> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw.get(TOKEN_KEY), Some(&token));

        let reopened = Session::file(&path).unwrap();
        assert_eq!(reopened.token().unwrap(), Some(token));
        reopened.clear().unwrap();
        assert_eq!(Session::file(&path).unwrap().token().unwrap(), None);
    }
}
