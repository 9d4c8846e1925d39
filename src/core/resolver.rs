//! Import Resolver.
//!
//! Resolves a single `// import <name> from <location>` request. `self`
//! imports search the current file's own assembly blocks; everything else
//! resolves to a target path. Ordinarily that's the requested subroutine's
//! dependency closure, but a target that turns out to be part of a
//! circular dependency returns that cycle's *entire* unified subroutine
//! set instead — every member of a cycle is potentially interdependent
//! with every other, not just with the one name asked for.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::core::engine::Resolver;
use crate::core::error::ResolveError;
use crate::core::types::{lexically_normalize, CycleKey, YulFunction};

impl Resolver {
    pub(crate) fn resolve_import(
        &mut self,
        name: &str,
        location: &str,
        current_file: &Path,
        stack: &mut Vec<PathBuf>,
        cycle_group: Option<&CycleKey>,
        depth: usize,
    ) -> Result<IndexMap<String, YulFunction>, ResolveError> {
        if depth > self.recursion_limit {
            return Err(ResolveError::RecursionLimit {
                name: name.to_string(),
                location: location.to_string(),
            });
        }

        if location.trim().eq_ignore_ascii_case("self") {
            return self.resolve_self(name, current_file, stack, cycle_group, depth);
        }

        let target = self.resolve_import_path(location, current_file);

        if let Some(active) = cycle_group {
            if active.contains(&target) {
                if let Some(universe) = self.cycle_groups.get(active) {
                    return closure_or_not_found(name, &target, universe, &self.callgraph);
                }
            }
        }

        let content = if Resolver::is_preprocessable(&target) {
            self.process_file_at(&target, stack, cycle_group, depth + 1)?
        } else {
            fs::read_to_string(&target).map_err(|e| ResolveError::read_file(&target, e))?
        };

        if let Some(cycle_key) = self.cycle_files_containing(&target).cloned() {
            let universe = self
                .cycle_groups
                .get(&cycle_key)
                .expect("key just looked up");
            // Unlike the closure taken above when already inside the same
            // active cycle, a target reached from outside it returns the
            // cycle's entire subroutine set: every member is potentially
            // interdependent with every other, not just with `name`.
            return if universe.contains_key(name) {
                Ok(universe.clone())
            } else {
                Err(ResolveError::function_not_found(
                    name,
                    target.display().to_string(),
                    universe.keys().cloned(),
                ))
            };
        }

        let universe = self.extract_all_from_content(&content, &target);
        closure_or_not_found(name, &target, &universe, &self.callgraph)
    }

    fn resolve_self(
        &mut self,
        name: &str,
        current_file: &Path,
        stack: &mut Vec<PathBuf>,
        cycle_group: Option<&CycleKey>,
        depth: usize,
    ) -> Result<IndexMap<String, YulFunction>, ResolveError> {
        let content = fs::read_to_string(current_file)
            .map_err(|e| ResolveError::read_file(current_file, e))?;

        let mut all_functions = IndexMap::new();
        let mut external_deps = IndexMap::new();

        for block in self.scanner.find_blocks(&content) {
            for (fname, func) in self.extractor.extract(&block.inner, current_file) {
                all_functions.insert(fname, func);
            }

            for line in block.inner.split('\n') {
                let Some(directive) = self.directives.parse(line) else {
                    continue;
                };
                if directive.is_self() {
                    continue;
                }
                for ext_name in &directive.names {
                    match self.resolve_import(
                        ext_name,
                        &directive.location,
                        current_file,
                        stack,
                        cycle_group,
                        depth + 1,
                    ) {
                        Ok(resolved) => {
                            for (n, f) in resolved {
                                external_deps.insert(n, f);
                            }
                        }
                        Err(e) if self.verbose => {
                            eprintln!("debug: suppressed self-import error for '{ext_name}': {e}");
                        }
                        Err(_) => {}
                    }
                }
            }
        }

        if !all_functions.contains_key(name) {
            return Err(ResolveError::function_not_found(
                name,
                current_file.display().to_string(),
                all_functions.keys().cloned(),
            ));
        }

        let mut universe = all_functions;
        for (n, f) in external_deps {
            universe.insert(n, f);
        }

        Ok(self.callgraph.dependency_closure(name, &universe))
    }

    pub(crate) fn resolve_import_path(&self, location: &str, current_file: &Path) -> PathBuf {
        let trimmed = location.trim();
        if let Some(rest) = trimmed.strip_prefix('/') {
            // No further lexical normalization here, matching the original
            // implementation's `root_dir / import_path.lstrip("/")`.
            self.root_dir.join(rest)
        } else {
            let joined = current_file
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(trimmed);
            lexically_normalize(&joined)
        }
    }

    /// Build the unified subroutine set for a strongly-connected group of
    /// files: every local definition (conflicting signatures under the same
    /// name are a hard error) plus every subroutine those files import from
    /// outside the group (failures there are swallowed, optionally logged
    /// under `--verbose`).
    pub(crate) fn unify_cycle_group(
        &mut self,
        cycle_files: &CycleKey,
        stack: &mut Vec<PathBuf>,
        depth: usize,
    ) -> Result<IndexMap<String, YulFunction>, ResolveError> {
        let mut unified: IndexMap<String, YulFunction> = IndexMap::new();
        let mut blocks_by_file = Vec::new();

        for file in cycle_files {
            if !file.exists() {
                continue;
            }
            let content =
                fs::read_to_string(file).map_err(|e| ResolveError::read_file(file, e))?;
            let blocks = self.scanner.find_blocks(&content);
            for block in &blocks {
                for (fname, func) in self.extractor.extract(&block.inner, file) {
                    match unified.get(&fname) {
                        Some(existing) if existing.signature != func.signature => {
                            return Err(ResolveError::SignatureConflict {
                                name: fname,
                                existing: existing.signature.clone(),
                                new: func.signature,
                            });
                        }
                        Some(_) => {}
                        None => {
                            unified.insert(fname, func);
                        }
                    }
                }
            }
            blocks_by_file.push((file.clone(), blocks));
        }

        for (file, blocks) in blocks_by_file {
            for block in blocks {
                for line in block.inner.split('\n') {
                    let Some(directive) = self.directives.parse(line) else {
                        continue;
                    };
                    if directive.is_self() {
                        continue;
                    }
                    let target = self.resolve_import_path(&directive.location, &file);
                    if cycle_files.contains(&target) {
                        continue;
                    }
                    for ext_name in &directive.names {
                        match self.resolve_import(
                            ext_name,
                            &directive.location,
                            &file,
                            stack,
                            None,
                            depth + 1,
                        ) {
                            Ok(resolved) => {
                                for (n, f) in resolved {
                                    unified.entry(n).or_insert(f);
                                }
                            }
                            Err(e) if self.verbose => {
                                eprintln!(
                                    "debug: suppressed cycle-external import error for '{ext_name}': {e}"
                                );
                            }
                            Err(_) => {}
                        }
                    }
                }
            }
        }

        Ok(unified)
    }
}

fn closure_or_not_found(
    name: &str,
    location: &Path,
    universe: &IndexMap<String, YulFunction>,
    callgraph: &crate::core::callgraph::CallGraphAnalyzer,
) -> Result<IndexMap<String, YulFunction>, ResolveError> {
    if !universe.contains_key(name) {
        return Err(ResolveError::function_not_found(
            name,
            location.display().to_string(),
            universe.keys().cloned(),
        ));
    }
    Ok(callgraph.dependency_closure(name, universe))
}
