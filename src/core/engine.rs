//! The `Resolver`: owns all per-run state (file cache, cycle-group cache,
//! compiled patterns) and drives file-level recursion.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use regex::Regex;

use crate::core::callgraph::CallGraphAnalyzer;
use crate::core::directive::DirectiveParser;
use crate::core::error::ResolveError;
use crate::core::extractor::FunctionExtractor;
use crate::core::scanner::BlockScanner;
use crate::core::types::{lexically_normalize, CycleKey, YulFunction};

/// How deep the self/import recursion may go before we assume a
/// misconfigured project rather than a legitimate dependency chain.
const DEFAULT_RECURSION_LIMIT: usize = 256;

pub struct Resolver {
    pub(crate) root_dir: PathBuf,
    pub(crate) file_cache: HashMap<PathBuf, String>,
    pub(crate) cycle_groups: HashMap<CycleKey, IndexMap<String, YulFunction>>,
    pub(crate) scanner: BlockScanner,
    pub(crate) extractor: FunctionExtractor,
    pub(crate) callgraph: CallGraphAnalyzer,
    pub(crate) directives: DirectiveParser,
    pub(crate) host_import: Regex,
    pub(crate) recursion_limit: usize,
    pub(crate) verbose: bool,
}

impl Resolver {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            file_cache: HashMap::new(),
            cycle_groups: HashMap::new(),
            scanner: BlockScanner::new(),
            extractor: FunctionExtractor::new(),
            callgraph: CallGraphAnalyzer::new(),
            directives: DirectiveParser::new(),
            host_import: Regex::new(r#"(import\s+(?:.*?\s+from\s+)?["'])([^"']*?)\.presl(["'])"#)
                .expect("static pattern"),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            verbose: false,
        }
    }

    /// Print a debug line for every import the cycle-group unifier has to
    /// give up on, instead of resolving it silently.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Resolve a single `.presl` file to its fully-rewritten `.post.sol`
    /// content, following every import transitively.
    pub fn process_file(&mut self, path: &Path) -> Result<String, ResolveError> {
        let mut stack = Vec::new();
        self.process_file_at(path, &mut stack, None, 0)
    }

    pub(crate) fn process_file_at(
        &mut self,
        path: &Path,
        stack: &mut Vec<PathBuf>,
        cycle_group: Option<&CycleKey>,
        depth: usize,
    ) -> Result<String, ResolveError> {
        if depth > self.recursion_limit {
            return Err(ResolveError::RecursionLimit {
                name: path.display().to_string(),
                location: "file processing stack".to_string(),
            });
        }

        let path = self.normalize_file_path(path);

        // Circular dependency: `path` is already on the stack we're unwinding
        // through. Collect the cycle membership, unify it once, and fall
        // through to process this file as a member of that group.
        let mut active_cycle_group = cycle_group.cloned();
        if let Some(pos) = stack.iter().position(|p| *p == path) {
            let cycle_files: CycleKey = stack[pos..].iter().cloned().collect();
            if !self.cycle_groups.contains_key(&cycle_files) {
                let unified = self.unify_cycle_group(&cycle_files, stack, depth + 1)?;
                self.cycle_groups.insert(cycle_files.clone(), unified);
            }

            if let Some(cached) = self.file_cache.get(&path) {
                return Ok(cached.clone());
            }

            active_cycle_group.get_or_insert(cycle_files);
        }

        if let Some(cached) = self.file_cache.get(&path) {
            return Ok(cached.clone());
        }

        let content = fs::read_to_string(&path).map_err(|e| ResolveError::read_file(&path, e))?;

        stack.push(path.clone());

        let blocks = self.scanner.find_blocks(&content);
        let mut rewritten = content.clone();
        for block in blocks.into_iter().rev() {
            let processed =
                self.rewrite_block(&block.inner, &path, stack, active_cycle_group.as_ref(), depth + 1)?;
            let before = &rewritten[..block.start];
            let after = &rewritten[block.end..];
            rewritten = format!("{before}assembly {{\n{processed}\n    }}{after}");
        }

        if let Some(pos) = stack.iter().position(|p| *p == path) {
            stack.remove(pos);
        }

        let rewritten = self
            .host_import
            .replace_all(&rewritten, "$1$2.post.sol$3")
            .into_owned();

        self.file_cache.insert(path.clone(), rewritten.clone());
        Ok(rewritten)
    }

    /// Make `path` absolute (relative to the run's root directory) and
    /// lexically normalized, so the same logical file always maps to the
    /// same cache/stack/cycle-group key regardless of how it was spelled.
    pub(crate) fn normalize_file_path(&self, path: &Path) -> PathBuf {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root_dir.join(path)
        };
        lexically_normalize(&absolute)
    }

    /// `true` for files this resolver rewrites recursively; anything else
    /// (plain `.sol`, etc.) is read verbatim when imported.
    pub(crate) fn is_preprocessable(path: &Path) -> bool {
        path.extension().and_then(|ext| ext.to_str()) == Some("presl")
    }

    /// Every subroutine defined anywhere in `content`'s assembly blocks.
    /// Later blocks win on a name collision; this is deliberately more
    /// permissive than the cycle-group union, which does check for
    /// conflicting signatures.
    pub(crate) fn extract_all_from_content(
        &self,
        content: &str,
        source_file: &Path,
    ) -> IndexMap<String, YulFunction> {
        let mut all = IndexMap::new();
        for block in self.scanner.find_blocks(content) {
            for (name, func) in self.extractor.extract(&block.inner, source_file) {
                all.insert(name, func);
            }
        }
        all
    }

    pub(crate) fn cycle_files_containing<'a>(&'a self, path: &Path) -> Option<&'a CycleKey> {
        self.cycle_groups.keys().find(|key| key.contains(path))
    }
}
