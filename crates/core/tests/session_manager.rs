use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use treescope_api::{
    ApiError, ApiResult, DocumentResolver, LanguageId, OpenDocument, SessionState, ViewEvent,
    ViewRequest,
};
use treescope_core::grammar::GrammarFetcher;
use treescope_core::{ExplorerConfig, GrammarRegistry, SessionManager, TreescopeError};

struct OfflineFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl GrammarFetcher for OfflineFetcher {
    async fn fetch(&self, file_name: &str) -> treescope_core::Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(TreescopeError::Internal(format!("offline: {}", file_name)))
    }
}

#[derive(Default)]
struct Workspace {
    documents: HashMap<String, OpenDocument>,
}

impl Workspace {
    fn with(mut self, uri: &str, language: LanguageId, text: &str) -> Self {
        self.documents.insert(
            uri.to_string(),
            OpenDocument {
                uri: uri.to_string(),
                language,
                text: text.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl DocumentResolver for Workspace {
    async fn open_document(&self, uri: &str) -> ApiResult<OpenDocument> {
        self.documents
            .get(uri)
            .cloned()
            .ok_or_else(|| ApiError::DocumentNotFound(uri.to_string()))
    }
}

struct Fixture {
    _temp: tempfile::TempDir,
    fetcher: Arc<OfflineFetcher>,
    manager: SessionManager,
}

fn fixture() -> Fixture {
    let temp = tempfile::TempDir::new().unwrap();
    let config = ExplorerConfig::default()
        .with_grammar_dir(temp.path().join("grammars"))
        .with_state_dir(temp.path().join("sessions"));
    let fetcher = Arc::new(OfflineFetcher {
        calls: AtomicUsize::new(0),
    });
    let registry = Arc::new(GrammarRegistry::with_fetcher(
        config.grammar_dir.clone(),
        fetcher.clone(),
    ));
    Fixture {
        _temp: temp,
        fetcher,
        manager: SessionManager::with_registry(config, registry),
    }
}

fn document(uri: &str, language: LanguageId, text: &str) -> OpenDocument {
    OpenDocument {
        uri: uri.to_string(),
        language,
        text: text.to_string(),
    }
}

const JS_URI: &str = "file:///work/app.js";
const JAVA_URI: &str = "file:///work/App.java";

#[tokio::test]
async fn test_open_reveals_existing_session() {
    let fx = fixture();
    let first = fx
        .manager
        .open(document(JS_URI, LanguageId::JAVASCRIPT, "let x = 1;"))
        .await
        .unwrap();
    let second = fx
        .manager
        .open(document(JS_URI, LanguageId::JAVASCRIPT, "ignored"))
        .await
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(fx.manager.len(), 1);
    assert_eq!(second.lock().await.text(), "let x = 1;");
}

#[tokio::test]
async fn test_sessions_share_grammar() {
    let fx = fixture();
    let a = fx
        .manager
        .open(document(JS_URI, LanguageId::JAVASCRIPT, "let a;"))
        .await
        .unwrap();
    let b = fx
        .manager
        .open(document("file:///work/b.js", LanguageId::JAVASCRIPT, "let b;"))
        .await
        .unwrap();

    let (a, b) = (a.lock().await, b.lock().await);
    assert!(Arc::ptr_eq(a.grammar(), b.grammar()));
    assert_eq!(fx.manager.registry().loaded_count(), 1);
}

#[tokio::test]
async fn test_unavailable_grammar_creates_no_session() {
    let fx = fixture();
    let err = fx
        .manager
        .open(document("file:///work/main.go", LanguageId::new("go"), "package main"))
        .await
        .unwrap_err();

    assert!(matches!(err, TreescopeError::GrammarUnavailable { .. }));
    assert!(fx.manager.is_empty());
    assert_eq!(fx.fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_close_returns_final_state() {
    let fx = fixture();
    let session = fx
        .manager
        .open(document(JAVA_URI, LanguageId::JAVA, "class App {}"))
        .await
        .unwrap();
    session
        .lock()
        .await
        .handle_view_request(ViewRequest::QueryNode("(identifier) @id".into()));

    let state = fx.manager.close(JAVA_URI).await.unwrap();
    assert_eq!(state.doc_uri, JAVA_URI);
    assert_eq!(state.query_text, "(identifier) @id");
    assert!(fx.manager.get(JAVA_URI).is_none());
    assert!(fx.manager.close(JAVA_URI).await.is_none());
}

#[tokio::test]
async fn test_suspend_and_resume_saved() {
    let fx = fixture();
    let workspace = Workspace::default().with(JS_URI, LanguageId::JAVASCRIPT, "let x = 1;");
    let session = fx
        .manager
        .open(document(JS_URI, LanguageId::JAVASCRIPT, "let x = 1;"))
        .await
        .unwrap();
    {
        let mut session = session.lock().await;
        session.handle_view_request(ViewRequest::ShowAnonymousNodes(true));
        session.handle_view_request(ViewRequest::EnableQuery(true));
        session.handle_view_request(ViewRequest::QueryNode("(number) @n".into()));
    }

    let path = fx.manager.suspend(JS_URI).await.unwrap();
    assert!(path.exists());
    assert!(fx.manager.is_empty());

    let resumed = fx.manager.resume_saved(JS_URI, &workspace).await.unwrap();
    let mut resumed = resumed.lock().await;
    assert!(resumed.state().show_anonymous_nodes);
    assert_eq!(resumed.state().nodes.len(), 8);

    let events = resumed.handle_view_request(ViewRequest::EnableQuery(true));
    let ViewEvent::QueryDone(captures) = &events[1] else {
        panic!("expected queryDone, got {:?}", events);
    };
    assert_eq!(captures[0].node.text, "1");
    assert!(!path.exists());
}

#[tokio::test]
async fn test_resume_skips_vanished_document() {
    let fx = fixture();
    let workspace = Workspace::default();

    let resumed = fx
        .manager
        .resume(SessionState::new("file:///gone.js"), &workspace)
        .await;
    assert!(resumed.is_none());
    assert!(fx.manager.is_empty());
}

#[tokio::test]
async fn test_resume_skips_invalid_uri() {
    let fx = fixture();
    let workspace = Workspace::default().with("not a uri", LanguageId::JAVASCRIPT, "let x;");

    let resumed = fx
        .manager
        .resume(SessionState::new("not a uri"), &workspace)
        .await;
    assert!(resumed.is_none());
}

#[tokio::test]
async fn test_resume_uses_current_document_text() {
    let fx = fixture();
    let workspace = Workspace::default().with(JS_URI, LanguageId::JAVASCRIPT, "let renamed = 2;");
    let mut state = SessionState::new(JS_URI);
    state.set_enable_node_mapping(true);

    let session = fx.manager.resume(state, &workspace).await.unwrap();
    let session = session.lock().await;
    assert!(session.state().enable_node_mapping);
    assert!(
        session
            .state()
            .nodes
            .iter()
            .any(|n| n.kind == "identifier" && n.text == "renamed")
    );
}

#[tokio::test]
async fn test_concurrent_opens_converge() {
    let fx = Arc::new(fixture());
    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let fx = fx.clone();
            tokio::spawn(async move {
                fx.manager
                    .open(document(JS_URI, LanguageId::JAVASCRIPT, "let x = 1;"))
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut sessions = Vec::new();
    for task in tasks {
        sessions.push(task.await.unwrap());
    }
    assert!(sessions.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(fx.manager.len(), 1);
}
