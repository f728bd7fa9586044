//! Credential service
//!
//! Bridges plaintext credentials and HTTP-level trust tokens:
//! - Password hashing and verification (delegates to [`crate::services::password`])
//! - Session token generation from the OS random source
//! - A concurrent, time-bounded session registry (token -> session)
//! - The `session_token` cookie that carries the token
//!
//! # Expiry
//!
//! Sessions live for [`SESSION_TTL_HOURS`] from creation. The TTL is absolute:
//! reading a session does not extend it. An expired session is evicted the
//! first time it is looked up; [`AuthService::purge_expired`] can additionally
//! be run on a timer, but the read path enforces the TTL on its own.
//!
//! # Locking
//!
//! The registry is one `RwLock<HashMap>`. Lookups share the read lock;
//! create, delete and eviction take the write lock. Guards are held only for
//! the map operation itself, and never across password hashing.

use axum::http::{header, HeaderMap};
use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::{DateTime, Utc};
use data_encoding::BASE64URL;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::{Session, SESSION_TTL_HOURS};
use crate::services::password;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE_NAME: &str = "session_token";

/// Number of random bytes in a session token
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Cookie lifetime in seconds, matching the session TTL
pub const SESSION_COOKIE_MAX_AGE: i64 = SESSION_TTL_HOURS * 60 * 60;

/// Error types for credential operations
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    /// The OS random source failed
    #[error("Random source unavailable: {0}")]
    Entropy(String),

    /// Password hashing failed
    #[error("Password hashing failed: {0}")]
    Hashing(#[from] anyhow::Error),
}

/// Generate a new session token.
///
/// 32 bytes from the OS CSPRNG, encoded as padded base64url (44 characters).
pub fn generate_session_token() -> Result<String, AuthServiceError> {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AuthServiceError::Entropy(e.to_string()))?;
    Ok(BASE64URL.encode(&bytes))
}

/// Find a cookie value by name across all `Cookie` headers
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then_some(value)
        })
}

/// Process-lifetime map of token -> session
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    // The map is never left half-updated, so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Session>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Session>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert a session under its token
    pub fn insert(&self, session: Session) {
        self.write().insert(session.token.clone(), session);
    }

    /// Look up a session as of `now`, evicting it if it has expired
    pub fn get_at(&self, token: &str, now: DateTime<Utc>) -> Option<Session> {
        {
            let sessions = self.read();
            match sessions.get(token) {
                None => return None,
                Some(session) if !session.is_expired_at(now) => return Some(session.clone()),
                Some(_) => {}
            }
        }

        let mut sessions = self.write();
        if sessions
            .get(token)
            .is_some_and(|session| session.is_expired_at(now))
        {
            sessions.remove(token);
            tracing::debug!("Evicted expired session");
        }
        None
    }

    /// Remove a session; missing tokens are ignored
    pub fn remove(&self, token: &str) -> bool {
        self.write().remove(token).is_some()
    }

    /// Remove every session expired as of `now`, returning how many were dropped
    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.write();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        before - sessions.len()
    }

    /// Whether an entry exists for `token`, expired or not
    pub fn contains(&self, token: &str) -> bool {
        self.read().contains_key(token)
    }

    /// Number of entries, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

/// Credential service owning the session registry
#[derive(Debug)]
pub struct AuthService {
    sessions: SessionRegistry,
    secure_cookie: bool,
}

impl Default for AuthService {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthService {
    /// Create a credential service that issues `Secure` cookies
    pub fn new() -> Self {
        Self::with_secure_cookie(true)
    }

    /// Create a credential service with an explicit `Secure` cookie setting.
    ///
    /// Only development setups served over plain HTTP should pass `false`.
    pub fn with_secure_cookie(secure_cookie: bool) -> Self {
        if !secure_cookie {
            tracing::warn!("Session cookies will be sent without the Secure flag");
        }
        Self {
            sessions: SessionRegistry::new(),
            secure_cookie,
        }
    }

    /// Access the underlying registry
    pub fn registry(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Hash a password for storage
    pub fn hash_password(&self, password: &str) -> Result<String, AuthServiceError> {
        Ok(password::hash_password(password)?)
    }

    /// Check a password against a stored hash
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        password::verify_password(password, hash)
    }

    /// Generate a new session token
    pub fn generate_token(&self) -> Result<String, AuthServiceError> {
        generate_session_token()
    }

    /// Start a new session for `username` and return its token.
    ///
    /// Every call yields a distinct session; a user may hold several.
    pub fn create_session(&self, username: &str) -> Result<String, AuthServiceError> {
        let token = generate_session_token()?;
        self.sessions.insert(Session::new(token.clone(), username));
        tracing::debug!("Created session for user '{}'", username);
        Ok(token)
    }

    /// Look up a live session by token
    pub fn get_session(&self, token: &str) -> Option<Session> {
        self.sessions.get_at(token, Utc::now())
    }

    /// End a session. Idempotent.
    pub fn delete_session(&self, token: &str) {
        if self.sessions.remove(token) {
            tracing::debug!("Deleted session");
        }
    }

    /// Resolve the session named by the request's `session_token` cookie
    pub fn session_from_headers(&self, headers: &HeaderMap) -> Option<Session> {
        let token = cookie_value(headers, SESSION_COOKIE_NAME)?;
        self.get_session(token)
    }

    /// `Set-Cookie` value that hands `token` to the client
    pub fn session_cookie(&self, token: &str) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            SESSION_COOKIE_NAME, token, SESSION_COOKIE_MAX_AGE
        );
        if self.secure_cookie {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// `Set-Cookie` value that tells the client to drop the session cookie
    pub fn clear_session_cookie(&self) -> String {
        format!("{}=; Path=/; Max-Age=-1; HttpOnly", SESSION_COOKIE_NAME)
    }

    /// Evict all expired sessions
    pub fn purge_expired(&self) -> usize {
        self.sessions.purge_expired_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Duration;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn backdate(service: &AuthService, token: &str, age: Duration) {
        let mut sessions = service.sessions.write();
        let session = sessions.get_mut(token).expect("session should exist");
        session.created_at = Utc::now() - age;
    }

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_generate_token_format() {
        let token = generate_session_token().unwrap();
        assert_eq!(token.len(), 44);
        assert_eq!(BASE64URL.decode(token.as_bytes()).unwrap().len(), SESSION_TOKEN_BYTES);
        assert!(!token.contains('+') && !token.contains('/'));
    }

    #[test]
    fn test_generate_token_unique() {
        let tokens: HashSet<String> = (0..5000)
            .map(|_| generate_session_token().unwrap())
            .collect();
        assert_eq!(tokens.len(), 5000);
    }

    #[test]
    fn test_create_and_get_session() {
        let service = AuthService::new();
        let token = service.create_session("alice").unwrap();

        let session = service.get_session(&token).expect("session should exist");
        assert_eq!(session.username, "alice");
        assert_eq!(session.token, token);
    }

    #[test]
    fn test_get_unknown_session() {
        let service = AuthService::new();
        assert!(service.get_session("no-such-token").is_none());
        assert!(service.get_session("").is_none());
    }

    #[test]
    fn test_same_user_gets_independent_sessions() {
        let service = AuthService::new();
        let first = service.create_session("alice").unwrap();
        let second = service.create_session("alice").unwrap();
        assert_ne!(first, second);

        service.delete_session(&first);
        assert!(service.get_session(&first).is_none());
        assert_eq!(service.get_session(&second).unwrap().username, "alice");
    }

    #[test]
    fn test_delete_session() {
        let service = AuthService::new();
        let token = service.create_session("alice").unwrap();

        service.delete_session(&token);
        assert!(service.get_session(&token).is_none());

        // Idempotent
        service.delete_session(&token);
        service.delete_session("never-existed");
    }

    #[test]
    fn test_expired_session_is_evicted_on_read() {
        let service = AuthService::new();
        let token = service.create_session("alice").unwrap();
        backdate(&service, &token, Duration::hours(25));

        assert!(service.registry().contains(&token));
        assert!(service.get_session(&token).is_none());
        assert!(!service.registry().contains(&token));
    }

    #[test]
    fn test_read_does_not_extend_ttl() {
        let service = AuthService::new();
        let token = service.create_session("alice").unwrap();
        backdate(&service, &token, Duration::hours(23));

        let session = service.get_session(&token).unwrap();
        let later = session.created_at + Duration::hours(24) + Duration::seconds(1);
        assert!(service.registry().get_at(&token, later).is_none());
        assert!(!service.registry().contains(&token));
    }

    #[test]
    fn test_purge_expired() {
        let service = AuthService::new();
        let stale = service.create_session("alice").unwrap();
        let fresh = service.create_session("bob").unwrap();
        backdate(&service, &stale, Duration::hours(30));

        assert_eq!(service.purge_expired(), 1);
        assert_eq!(service.registry().len(), 1);
        assert!(service.get_session(&fresh).is_some());
    }

    #[test]
    fn test_session_from_headers() {
        let service = AuthService::new();
        let token = service.create_session("testuser").unwrap();

        let headers = headers_with_cookie(&format!("theme=dark; session_token={}", token));
        let session = service.session_from_headers(&headers).expect("session should exist");
        assert_eq!(session.username, "testuser");

        assert!(service.session_from_headers(&HeaderMap::new()).is_none());
        assert!(service
            .session_from_headers(&headers_with_cookie("session=other"))
            .is_none());
    }

    #[test]
    fn test_cookie_value_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("b=2; session_token=xyz=="));
        assert_eq!(cookie_value(&headers, "session_token"), Some("xyz=="));
        assert_eq!(cookie_value(&headers, "a"), Some("1"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_session_cookie_format() {
        let service = AuthService::with_secure_cookie(false);
        assert_eq!(
            service.session_cookie("test-token"),
            "session_token=test-token; Path=/; Max-Age=86400; HttpOnly; SameSite=Lax"
        );

        let secure = AuthService::new();
        assert_eq!(
            secure.session_cookie("test-token"),
            "session_token=test-token; Path=/; Max-Age=86400; HttpOnly; SameSite=Lax; Secure"
        );
    }

    #[test]
    fn test_clear_session_cookie_format() {
        let service = AuthService::new();
        assert_eq!(
            service.clear_session_cookie(),
            "session_token=; Path=/; Max-Age=-1; HttpOnly"
        );
    }

    #[test]
    fn test_hash_and_verify_through_service() {
        let service = AuthService::new();
        let hash = service.hash_password("testpassword").unwrap();
        assert_ne!(hash, "testpassword");
        assert!(service.verify_password("testpassword", &hash));
        assert!(!service.verify_password("wrongpassword", &hash));
    }

    #[test]
    fn test_concurrent_create_and_get() {
        let service = Arc::new(AuthService::new());

        let handles: Vec<_> = (0..16)
            .map(|worker| {
                let service = service.clone();
                std::thread::spawn(move || {
                    let username = format!("user-{}", worker);
                    let mut tokens = Vec::new();
                    for _ in 0..200 {
                        let token = service.create_session(&username).unwrap();
                        let session = service.get_session(&token).expect("fresh session");
                        assert_eq!(session.username, username);
                        tokens.push(token);
                    }
                    (username, tokens)
                })
            })
            .collect();

        let mut all_tokens = HashSet::new();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for (username, tokens) in &results {
            for token in tokens {
                assert!(all_tokens.insert(token.clone()), "duplicate token issued");
                assert_eq!(&service.get_session(token).unwrap().username, username);
            }
        }
        assert_eq!(service.registry().len(), 16 * 200);
    }
}
