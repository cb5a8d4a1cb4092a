use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Access/refresh credentials as issued by `/auth/login` and `/auth/refresh`.
///
/// Always replaced as a whole; nothing ever updates one half of a pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Both halves present. Anything else is treated as "no session".
    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"access_token\":\"[REDACTED]\",\"refresh_token\":\"[REDACTED]\"}}"
        )
    }
}

/// Holder of the current session's token pair.
///
/// Implementations must never expose a partial pair: `get` returns either a
/// complete pair or `None`, and `set` replaces both values at once.
#[cfg_attr(test, mockall::automock)]
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<TokenPair>;
    fn set(&self, pair: &TokenPair);
    fn clear(&self);
}

/// In-process store. Counts writes so callers can assert on them.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    pair: RwLock<Option<TokenPair>>,
    sets: AtomicUsize,
    clears: AtomicUsize,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pair(pair: TokenPair) -> Self {
        Self {
            pair: RwLock::new(Some(pair)),
            ..Self::default()
        }
    }

    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<TokenPair> {
        self.pair.read().clone().filter(TokenPair::is_complete)
    }

    fn set(&self, pair: &TokenPair) {
        if !pair.is_complete() {
            debug!("Refusing to store an incomplete token pair");
            return;
        }
        *self.pair.write() = Some(pair.clone());
        self.sets.fetch_add(1, Ordering::SeqCst);
    }

    fn clear(&self) {
        *self.pair.write() = None;
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}

/// Store for contexts with no persistent session (server-side rendering,
/// one-off scripts). Reads are always empty and writes go nowhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessTokenStore;

impl TokenStore for HeadlessTokenStore {
    fn get(&self) -> Option<TokenPair> {
        None
    }

    fn set(&self, _pair: &TokenPair) {}

    fn clear(&self) {}
}
