use super::fetch::{GrammarFetcher, HttpGrammarFetcher};
use super::naming::{library_file_name, resource_name};
use super::{Grammar, builtin_language, loader};
use crate::config::ExplorerConfig;
use crate::error::{Result, TreescopeError};
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use treescope_api::LanguageId;

/// Load-once grammar cache shared by every session of the process.
///
/// Each language id owns a single `OnceCell`, so concurrent requests for the
/// same uncached language wait on one load instead of racing downloads.
/// Loaded grammars are never evicted.
pub struct GrammarRegistry {
    grammar_dir: PathBuf,
    fetcher: Arc<dyn GrammarFetcher>,
    use_builtins: bool,
    loaded: DashMap<LanguageId, Arc<OnceCell<Arc<Grammar>>>>,
}

impl GrammarRegistry {
    pub fn new(config: &ExplorerConfig) -> Self {
        Self::with_fetcher(
            config.grammar_dir.clone(),
            Arc::new(HttpGrammarFetcher::new(config.grammar_base_url.clone())),
        )
    }

    pub fn with_fetcher(grammar_dir: PathBuf, fetcher: Arc<dyn GrammarFetcher>) -> Self {
        Self {
            grammar_dir,
            fetcher,
            use_builtins: true,
            loaded: DashMap::new(),
        }
    }

    /// Always go through the grammar directory, even for compiled-in grammars.
    pub fn without_builtins(mut self) -> Self {
        self.use_builtins = false;
        self
    }

    pub fn grammar_dir(&self) -> &Path {
        &self.grammar_dir
    }

    pub fn is_loaded(&self, language: &LanguageId) -> bool {
        self.loaded
            .get(language)
            .is_some_and(|cell| cell.initialized())
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.iter().filter(|cell| cell.initialized()).count()
    }

    /// Get the grammar for `language`, loading or downloading it on first use.
    pub async fn get_grammar(&self, language: &LanguageId) -> Result<Arc<Grammar>> {
        let cell = Arc::clone(self.loaded.entry(language.clone()).or_default().value());
        let grammar = cell.get_or_try_init(|| self.load(language)).await?;
        Ok(Arc::clone(grammar))
    }

    async fn load(&self, language: &LanguageId) -> Result<Arc<Grammar>> {
        let resource = resource_name(language);

        if self.use_builtins {
            if let Some(ts_language) = builtin_language(&resource) {
                tracing::info!("Using builtin grammar {} for {}", resource, language);
                return Ok(Arc::new(Grammar::builtin(
                    language.clone(),
                    resource,
                    ts_language,
                )));
            }
        }

        let path = self.grammar_dir.join(library_file_name(&resource));
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            self.download(&resource, &path)
                .await
                .map_err(|e| TreescopeError::grammar_unavailable(language.as_str(), e))?;
        }

        let (library, ts_language) = loader::load_library(&path, &resource)?;
        tree_sitter::Parser::new()
            .set_language(&ts_language)
            .map_err(|e| TreescopeError::grammar_unavailable(language.as_str(), e))?;

        tracing::info!("Loaded grammar {} from {}", resource, path.display());
        Ok(Arc::new(Grammar::from_library(
            language.clone(),
            resource,
            ts_language,
            path,
            library,
        )))
    }

    async fn download(&self, resource: &str, path: &Path) -> Result<()> {
        let file_name = library_file_name(resource);
        let bytes = self.fetcher.fetch(&file_name).await?;

        tokio::fs::create_dir_all(&self.grammar_dir).await?;
        // Write next to the target and rename so a reader never sees a partial file.
        let partial = path.with_extension("part");
        tokio::fs::write(&partial, &bytes).await?;
        tokio::fs::rename(&partial, path).await?;

        tracing::info!("Saved grammar {} to {}", resource, path.display());
        Ok(())
    }
}
