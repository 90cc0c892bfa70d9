//! Bearer-token store with reload-on-miss.
//!
//! The token file can be edited out of band (tokens appended or revoked).
//! Instead of polling it, a failed lookup triggers exactly one synchronous
//! reload and retry, so the store is at most one file read behind.

use std::{
    io,
    path::PathBuf,
    sync::RwLock,
};

use scriptgate_core::TokenSet;

/// Where the raw token text comes from.
pub trait TokenSource: Send + Sync {
    /// Read the full token text.
    ///
    /// # Errors
    /// Returns the underlying I/O error if the source cannot be read.
    fn read(&self) -> io::Result<String>;
}

/// Reads tokens from a newline-delimited file.
#[derive(Debug, Clone)]
pub struct FileTokenSource {
    path: PathBuf,
}

impl FileTokenSource {
    /// Create a source for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenSource for FileTokenSource {
    fn read(&self) -> io::Result<String> {
        std::fs::read_to_string(&self.path)
    }
}

/// Thread-safe holder of the authorized token set.
///
/// Readers share the lock; a reload parses the new set outside the lock and
/// swaps it in under the write lock, so no reader ever sees a partial set.
pub struct TokenStore {
    source: Box<dyn TokenSource>,
    tokens: RwLock<TokenSet>,
}

impl TokenStore {
    /// Create an empty store backed by `source`. Call [`load`](Self::load)
    /// to populate it.
    #[must_use]
    pub fn new(source: impl TokenSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            tokens: RwLock::new(TokenSet::new()),
        }
    }

    /// Re-read the source and replace the whole set.
    ///
    /// On failure the previous set stays installed and a warning is logged.
    ///
    /// # Errors
    /// Returns the I/O error from the source. Callers may ignore it; it is
    /// never fatal.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    pub fn load(&self) -> io::Result<usize> {
        let text = self.source.read().inspect_err(|e| {
            tracing::warn!(error = %e, "failed to load tokens; keeping previous set");
        })?;
        let fresh = TokenSet::parse(&text);
        let count = fresh.len();

        {
            #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
            let mut tokens = self.tokens.write().expect("token store write lock poisoned");
            *tokens = fresh;
        }

        tracing::info!(count, "tokens loaded");
        Ok(count)
    }

    /// Pure lookup against the installed set.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        self.tokens
            .read()
            .expect("token store read lock poisoned")
            .contains(token)
    }

    /// Lookup with a single reload-and-retry on miss.
    #[must_use]
    pub fn authorize(&self, token: &str) -> bool {
        if self.contains(token) {
            return true;
        }
        tracing::debug!("token miss; reloading token source");
        // A failed reload is already logged and leaves the old set in place.
        let _ = self.load();
        self.contains(token)
    }

    /// Number of tokens currently installed.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        self.tokens.read().expect("token store read lock poisoned").len()
    }

    /// Returns `true` if no tokens are installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").field("len", &self.len()).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    use super::*;

    /// In-memory source that counts reads and can be edited or broken.
    #[derive(Clone, Default)]
    struct FakeSource {
        text: Arc<Mutex<Option<String>>>,
        reads: Arc<AtomicUsize>,
    }

    impl FakeSource {
        fn with(text: &str) -> Self {
            let source = Self::default();
            source.set(Some(text));
            source
        }

        fn set(&self, text: Option<&str>) {
            *self.text.lock().expect("fake source lock") = text.map(str::to_owned);
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl TokenSource for FakeSource {
        fn read(&self) -> io::Result<String> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.text
                .lock()
                .expect("fake source lock")
                .clone()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "token file missing"))
        }
    }

    #[test]
    fn load_installs_parsed_tokens() {
        let store = TokenStore::new(FakeSource::with("abc\n\n def \n"));
        assert_eq!(store.load().ok(), Some(2));
        assert!(store.contains("abc"));
        assert!(store.contains("def"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn failed_load_keeps_previous_set() {
        let source = FakeSource::with("abc\n");
        let store = TokenStore::new(source.clone());
        assert!(store.load().is_ok());

        source.set(None);
        assert!(store.load().is_err(), "missing source must surface an error");
        assert!(store.contains("abc"), "previous set must survive a failed load");
    }

    #[test]
    fn authorize_hit_does_not_reload() {
        let source = FakeSource::with("abc\n");
        let store = TokenStore::new(source.clone());
        assert!(store.load().is_ok());
        let before = source.reads();

        assert!(store.authorize("abc"));
        assert_eq!(source.reads(), before, "a hit must not touch the source");
    }

    #[test]
    fn authorize_miss_reloads_exactly_once() {
        let source = FakeSource::with("abc\n");
        let store = TokenStore::new(source.clone());
        assert!(store.load().is_ok());
        let before = source.reads();

        assert!(!store.authorize("nope"));
        assert_eq!(source.reads(), before + 1, "a miss must reload exactly once");
    }

    #[test]
    fn authorize_picks_up_appended_token() {
        let source = FakeSource::with("abc\n");
        let store = TokenStore::new(source.clone());
        assert!(store.load().is_ok());

        source.set(Some("abc\nfresh\n"));
        assert!(store.authorize("fresh"), "appended token must be accepted after reload");
    }

    #[test]
    fn authorize_rejects_revoked_token() {
        let source = FakeSource::with("abc\nold\n");
        let store = TokenStore::new(source.clone());
        assert!(store.load().is_ok());

        source.set(Some("abc\n"));
        // Still cached: revocation takes effect on the next reload.
        assert!(store.authorize("old"));
        assert!(!store.authorize("missing"));
        assert!(!store.authorize("old"), "revoked token must fail after a reload");
    }

    #[test]
    fn reload_is_atomic_under_concurrent_readers() {
        const SIZE: usize = 64;
        let set_a: String = (0..SIZE).map(|i| format!("a{i}\n")).collect();
        let set_b: String = (0..SIZE).map(|i| format!("b{i}\n")).collect();

        let source = FakeSource::with(&set_a);
        let store = Arc::new(TokenStore::new(source.clone()));
        assert!(store.load().is_ok());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..2_000 {
                        assert_eq!(store.len(), SIZE, "reader observed a partial set");
                    }
                })
            })
            .collect();

        for i in 0..200 {
            source.set(Some(if i % 2 == 0 { set_b.as_str() } else { set_a.as_str() }));
            assert!(store.load().is_ok());
        }

        for reader in readers {
            assert!(reader.join().is_ok(), "reader thread panicked");
        }
    }
}
