use super::Session;
use super::store::SessionStore;
use crate::config::ExplorerConfig;
use crate::error::{Result, TreescopeError};
use crate::grammar::GrammarRegistry;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use treescope_api::{DocumentResolver, OpenDocument, SessionState};

pub type SharedSession = Arc<Mutex<Session>>;

/// All open sessions of the process, one per document URI.
///
/// Sessions share a single grammar registry, so opening several documents
/// of the same language loads its grammar once.
pub struct SessionManager {
    config: ExplorerConfig,
    registry: Arc<GrammarRegistry>,
    store: SessionStore,
    sessions: DashMap<String, SharedSession>,
}

impl SessionManager {
    pub fn new(config: ExplorerConfig) -> Self {
        let registry = Arc::new(GrammarRegistry::new(&config));
        Self::with_registry(config, registry)
    }

    pub fn with_registry(config: ExplorerConfig, registry: Arc<GrammarRegistry>) -> Self {
        let store = SessionStore::from_config(&config);
        Self {
            config,
            registry,
            store,
            sessions: DashMap::new(),
        }
    }

    pub fn registry(&self) -> &Arc<GrammarRegistry> {
        &self.registry
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn get(&self, uri: &str) -> Option<SharedSession> {
        self.sessions.get(uri).map(|s| Arc::clone(s.value()))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn uris(&self) -> Vec<String> {
        self.sessions.iter().map(|s| s.key().clone()).collect()
    }

    /// Open an explorer for `document`, or reveal the one already open.
    ///
    /// Fails with `GrammarUnavailable` when no grammar can be loaded for the
    /// document's language; no session is created in that case.
    pub async fn open(&self, document: OpenDocument) -> Result<SharedSession> {
        if let Some(existing) = self.get(&document.uri) {
            tracing::debug!("Revealing existing session for {}", document.uri);
            return Ok(existing);
        }

        let state = SessionState::new(document.uri.clone());
        self.create(state, document).await
    }

    async fn create(&self, state: SessionState, document: OpenDocument) -> Result<SharedSession> {
        let grammar = self.registry.get_grammar(&document.language).await?;
        let session = Session::resume(state, document.text, grammar, &self.config)?;

        // Another task may have opened the same document while the grammar
        // was loading; keep whichever landed first.
        let shared = match self.sessions.entry(document.uri) {
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => Arc::clone(&entry.insert(Arc::new(Mutex::new(session)))),
        };
        Ok(shared)
    }

    /// Close the session of `uri`, returning its final view state.
    pub async fn close(&self, uri: &str) -> Option<SessionState> {
        let (_, session) = self.sessions.remove(uri)?;
        let state = session.lock().await.state().clone();
        tracing::info!("Closed session for {}", uri);
        Some(state)
    }

    /// Persist the view state of `uri` and close its session.
    pub async fn suspend(&self, uri: &str) -> Result<PathBuf> {
        let state = self
            .close(uri)
            .await
            .ok_or_else(|| TreescopeError::Internal(format!("no open session for {}", uri)))?;
        self.store.save(&state)
    }

    /// Rebuild a session from saved state.
    ///
    /// The document must still resolve through `resolver`. Any failure is
    /// logged and the resume is skipped.
    pub async fn resume(
        &self,
        state: SessionState,
        resolver: &dyn DocumentResolver,
    ) -> Option<SharedSession> {
        let uri = state.doc_uri.clone();
        if let Err(e) = url::Url::parse(&uri) {
            tracing::warn!("Not resuming session with invalid document URI {:?}: {}", uri, e);
            return None;
        }

        let document = match resolver.open_document(&uri).await {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!("Not resuming session for {}: {}", uri, e);
                return None;
            }
        };

        if let Some(existing) = self.get(&uri) {
            return Some(existing);
        }

        match self.create(state, document).await {
            Ok(session) => {
                tracing::info!("Resumed session for {}", uri);
                Some(session)
            }
            Err(e) => {
                tracing::warn!("Failed to resume session for {}: {}", uri, e);
                None
            }
        }
    }

    /// Resume `uri` from the on-disk store, if state was saved for it.
    pub async fn resume_saved(
        &self,
        uri: &str,
        resolver: &dyn DocumentResolver,
    ) -> Option<SharedSession> {
        let state = match self.store.load(uri) {
            Ok(Some(state)) => state,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read saved state for {}: {}", uri, e);
                return None;
            }
        };
        let session = self.resume(state, resolver).await;
        if session.is_some() {
            if let Err(e) = self.store.remove(uri) {
                tracing::warn!("Failed to remove saved state for {}: {}", uri, e);
            }
        }
        session
    }
}
