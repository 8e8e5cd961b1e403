//! Session lifecycle over a key-value store.
//!
//! # Responsibility
//! - Check credentials, issue sessions, persist and restore them.
//!
//! # Invariants
//! - Persisting the session is the only side effect of login/register;
//!   removing it is the only side effect of logout.
//! - Failed logins never write storage.
//! - Passwords are never persisted or logged.
//! - A corrupt persisted record is removed during `restore`.

use crate::clock::{Clock, SystemClock};
use crate::model::session::Session;
use crate::repo::kv_repo::{KeyValueStore, KvError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

/// Storage key holding the serialized session record.
pub const SESSION_KEY: &str = "user";
/// The single accepted login pair until a real credential check exists.
pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "password";
const DEMO_USER_ID: u64 = 1;
const DEMO_USER_NAME: &str = "Demo User";

#[derive(Debug)]
pub enum AuthError {
    InvalidCredentials,
    Storage(KvError),
    /// Session could not be encoded for storage.
    Encode(String),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "Invalid credentials"),
            Self::Storage(err) => write!(f, "session storage failed: {err}"),
            Self::Encode(message) => write!(f, "session encoding failed: {message}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<KvError> for AuthError {
    fn from(value: KvError) -> Self {
        Self::Storage(value)
    }
}

/// Auth use-case service; owns the current in-memory session.
pub struct AuthService<S: KeyValueStore> {
    store: S,
    clock: Arc<dyn Clock>,
    current: Option<Session>,
}

impl<S: KeyValueStore> AuthService<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            current: None,
        }
    }

    /// Loads the persisted session, if any. Call once at startup.
    pub fn restore(&mut self) -> Result<Option<Session>, AuthError> {
        let Some(raw) = self.store.get(SESSION_KEY)? else {
            self.current = None;
            info!("event=session_restore module=auth status=ok found=false");
            return Ok(None);
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => {
                info!(
                    "event=session_restore module=auth status=ok found=true user_id={}",
                    session.id
                );
                self.current = Some(session.clone());
                Ok(Some(session))
            }
            Err(err) => {
                warn!(
                    "event=session_restore module=auth status=error error_code=corrupt_session error={err}"
                );
                self.store.remove(SESSION_KEY)?;
                self.current = None;
                Ok(None)
            }
        }
    }

    /// Checks credentials and persists a session on success.
    pub fn login(&mut self, email: &str, password: &str) -> Result<Session, AuthError> {
        if email.trim() != DEMO_EMAIL || password != DEMO_PASSWORD {
            warn!("event=login module=auth status=error error_code=invalid_credentials");
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session {
            id: DEMO_USER_ID,
            email: DEMO_EMAIL.to_string(),
            name: DEMO_USER_NAME.to_string(),
            token: issue_token(),
        };
        self.persist(session, "login")
    }

    /// Creates an account and signs it in. Always accepted.
    pub fn register(
        &mut self,
        name: &str,
        email: &str,
        _password: &str,
    ) -> Result<Session, AuthError> {
        let id = u64::try_from(self.clock.now().timestamp_millis()).unwrap_or_default();
        let session = Session {
            id,
            email: email.trim().to_string(),
            name: name.trim().to_string(),
            token: issue_token(),
        };
        self.persist(session, "register")
    }

    /// Drops the current session and its persisted record.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.current = None;
        self.store.remove(SESSION_KEY)?;
        info!("event=logout module=auth status=ok");
        Ok(())
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Underlying storage, for inspection by callers and tests.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self, session: Session, event: &str) -> Result<Session, AuthError> {
        let encoded =
            serde_json::to_string(&session).map_err(|err| AuthError::Encode(err.to_string()))?;
        self.store.set(SESSION_KEY, &encoded)?;
        info!(
            "event={event} module=auth status=ok user_id={}",
            session.id
        );
        self.current = Some(session.clone());
        Ok(session)
    }
}

fn issue_token() -> String {
    Uuid::new_v4().simple().to_string()
}
