use std::path::{Path, PathBuf};
use std::sync::Arc;

use filesystem::{
    resolve_path_from, CancellationToken, MatchSet, SearchContext, SearchMode, SearchRequest,
    SearchStatus,
};

use crate::config::{AlfredConfig, AmbiguityPolicy};
use crate::error::{CoreError, CoreResult};
use crate::tools::platform::{Launcher, SystemLauncher};

/// Everything a tool call needs: the search pool, the base directory for
/// relative paths, the loaded config and the launcher used to open paths.
///
/// Built once at startup and passed by reference to every dispatch.
pub struct ToolContext {
    search: SearchContext,
    working_dir: PathBuf,
    config: AlfredConfig,
    launcher: Arc<dyn Launcher>,
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("search", &self.search)
            .field("working_dir", &self.working_dir)
            .field("config", &self.config)
            .finish()
    }
}

impl ToolContext {
    pub fn new(config: AlfredConfig) -> CoreResult<Self> {
        Self::with_launcher(config, Arc::new(SystemLauncher))
    }

    pub fn with_launcher(config: AlfredConfig, launcher: Arc<dyn Launcher>) -> CoreResult<Self> {
        let search = SearchContext::new(&config.search)?;
        let working_dir = match &config.working_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(|error| {
                CoreError::Internal(format!("unable to read current directory: {error}"))
            })?,
        };
        log::debug!(
            "tool context ready working_dir={} search_root={}",
            working_dir.display(),
            config.search_root
        );
        Ok(Self {
            search,
            working_dir,
            config,
            launcher,
        })
    }

    pub fn config(&self) -> &AlfredConfig {
        &self.config
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn search_context(&self) -> &SearchContext {
        &self.search
    }

    pub(crate) fn launcher(&self) -> &dyn Launcher {
        self.launcher.as_ref()
    }

    /// Resolves a caller-supplied path or location alias against the
    /// working directory.
    pub fn resolve(&self, raw: &str) -> CoreResult<PathBuf> {
        if raw.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "path must not be empty".to_string(),
            ));
        }
        Ok(resolve_path_from(raw, &self.working_dir))
    }

    /// The directory a search starts from: the explicit location if given,
    /// otherwise the configured search root.
    pub fn search_root(&self, raw: Option<&str>) -> CoreResult<PathBuf> {
        match raw.filter(|value| !value.trim().is_empty()) {
            Some(value) => self.resolve(value),
            None => self.resolve(&self.config.search_root),
        }
    }

    /// Runs a search bounded by the configured timeout.
    pub fn search(&self, request: &SearchRequest) -> MatchSet {
        let cancel = match self.config.search_timeout() {
            Some(timeout) => CancellationToken::with_timeout(timeout),
            None => CancellationToken::new(),
        };
        self.search.search(request, &cancel)
    }

    /// Finds the single entry named `target` under `root`.
    ///
    /// Runs an exhaustive search so ambiguity can be detected, then applies
    /// the configured [`AmbiguityPolicy`].
    pub fn locate(&self, target: &str, mode: SearchMode, root: &Path) -> CoreResult<PathBuf> {
        let request = SearchRequest::new(root, target)
            .mode(mode)
            .max_concurrency(self.search.default_concurrency());
        let matches = self.search(&request);

        if matches.status == SearchStatus::Cancelled {
            return Err(CoreError::Cancelled(format!(
                "search for '{target}' under {} did not finish",
                root.display()
            )));
        }
        if matches.is_ambiguous() && self.config.ambiguity == AmbiguityPolicy::Refuse {
            return Err(CoreError::Ambiguous {
                target: target.to_string(),
                paths: matches.paths,
            });
        }
        match matches.paths.into_iter().next() {
            Some(path) => Ok(path),
            None => Err(CoreError::NotFound(format!(
                "no {} named '{target}' under {}",
                mode_noun(mode),
                root.display()
            ))),
        }
    }
}

fn mode_noun(mode: SearchMode) -> &'static str {
    match mode {
        SearchMode::File => "file",
        SearchMode::Folder => "folder",
        SearchMode::Either => "file or folder",
    }
}
