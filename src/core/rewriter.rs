//! Block Rewriter.
//!
//! Turns one `assembly { … }` block's inner text into its resolved form:
//! import directives disappear, the subroutines they named (plus their
//! transitive dependencies) are spliced in, and anything not truly local to
//! this block is wrapped in a coverage-exclusion sentinel pair.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::core::engine::Resolver;
use crate::core::error::ResolveError;
use crate::core::types::{CycleKey, YulFunction};

impl Resolver {
    pub(crate) fn rewrite_block(
        &mut self,
        block: &str,
        current_file: &Path,
        stack: &mut Vec<PathBuf>,
        cycle_group: Option<&CycleKey>,
        depth: usize,
    ) -> Result<String, ResolveError> {
        let local_functions = self.extractor.extract(block, current_file);

        let mut imported: IndexMap<String, YulFunction> = IndexMap::new();
        let mut result_lines: Vec<&str> = Vec::new();

        for line in block.split('\n') {
            let Some(directive) = self.directives.parse(line) else {
                result_lines.push(line);
                continue;
            };

            for name in &directive.names {
                let resolved = self.resolve_import(
                    name,
                    &directive.location,
                    current_file,
                    stack,
                    cycle_group,
                    depth + 1,
                )?;
                for (fname, func) in resolved {
                    merge_with_conflict_check(&mut imported, fname, func)?;
                }
            }
        }

        let current_cycle_key = cycle_group.filter(|cg| cg.contains(current_file));
        if let Some(key) = current_cycle_key {
            if let Some(cycle_functions) = self.cycle_groups.get(key) {
                for (fname, func) in cycle_functions {
                    imported.entry(fname.clone()).or_insert_with(|| func.clone());
                }
            }
        }

        let filtered_lines = excise_shadowed_locals(&result_lines, &local_functions, &imported, &self.extractor);

        Ok(emit(&imported, &local_functions, &filtered_lines))
    }
}

fn merge_with_conflict_check(
    imported: &mut IndexMap<String, YulFunction>,
    name: String,
    func: YulFunction,
) -> Result<(), ResolveError> {
    if let Some(existing) = imported.get(&name) {
        if existing.signature != func.signature {
            return Err(ResolveError::SignatureConflict {
                name,
                existing: existing.signature.clone(),
                new: func.signature,
            });
        }
        return Ok(());
    }
    imported.insert(name, func);
    Ok(())
}

/// Remove the text of every subroutine that is both defined locally in this
/// block and present in `imported` — it will be re-emitted from the
/// canonical copy in `imported`, so leaving the local text in place would
/// duplicate it.
fn excise_shadowed_locals(
    lines: &[&str],
    local_functions: &IndexMap<String, YulFunction>,
    imported: &IndexMap<String, YulFunction>,
    extractor: &crate::core::extractor::FunctionExtractor,
) -> Vec<String> {
    if local_functions.is_empty() || imported.is_empty() {
        return lines.iter().map(|l| l.to_string()).collect();
    }

    let mut filtered = Vec::new();
    let mut skip_until = 0usize;

    for (idx, line) in lines.iter().enumerate() {
        if idx < skip_until {
            continue;
        }

        if line.trim_start().starts_with("function") {
            if let Some(name) = extractor.match_name(line) {
                if imported.contains_key(&name) && local_functions.contains_key(&name) {
                    let mut brace_count =
                        line.matches('{').count() as i32 - line.matches('}').count() as i32;
                    skip_until = idx + 1;
                    while skip_until < lines.len() && brace_count > 0 {
                        brace_count += lines[skip_until].matches('{').count() as i32
                            - lines[skip_until].matches('}').count() as i32;
                        skip_until += 1;
                    }
                    continue;
                }
            }
        }

        filtered.push(line.to_string());
    }

    filtered
}

fn emit(
    imported: &IndexMap<String, YulFunction>,
    local_functions: &IndexMap<String, YulFunction>,
    filtered_lines: &[String],
) -> String {
    if imported.is_empty() {
        return filtered_lines.join("\n");
    }

    let mut func_lines: Vec<String> = Vec::new();
    for func in imported.values() {
        let is_truly_local = local_functions.contains_key(&func.name);

        if !is_truly_local {
            func_lines.push(sentinel_start(&func.name));
        }
        if !func.pre_annotations.is_empty() {
            func_lines.push(func.pre_annotations.clone());
        }
        func_lines.push(func.full_text.clone());
        if !func.post_annotations.is_empty() {
            func_lines.push(func.post_annotations.clone());
        }
        if !is_truly_local {
            func_lines.push(sentinel_stop(&func.name));
        }
    }

    format!("{}\n{}", func_lines.join("\n"), filtered_lines.join("\n"))
}

fn sentinel_start(name: &str) -> String {
    format!(
        "            function exclude_coverage_start_{name}() {{}} // solhint-disable-line no-empty-blocks"
    )
}

fn sentinel_stop(name: &str) -> String {
    format!(
        "            function exclude_coverage_stop_{name}() {{}} // solhint-disable-line no-empty-blocks"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn func(name: &str, source: &str) -> YulFunction {
        YulFunction::new(
            name,
            format!("function {name}()"),
            "",
            format!("function {name}() {{ }}"),
            "",
            "",
            PathBuf::from(source),
        )
    }

    #[test]
    fn emits_nothing_extra_when_no_imports() {
        let imported = IndexMap::new();
        let local = IndexMap::new();
        let lines = vec!["result := add(x, 1)".to_string()];
        assert_eq!(emit(&imported, &local, &lines), "result := add(x, 1)");
    }

    #[test]
    fn wraps_non_local_imports_in_sentinels() {
        let mut imported = IndexMap::new();
        imported.insert("helper".to_string(), func("helper", "utils.presl"));
        let local = IndexMap::new();
        let out = emit(&imported, &local, &[]);
        assert!(out.contains("exclude_coverage_start_helper"));
        assert!(out.contains("exclude_coverage_stop_helper"));
    }

    #[test]
    fn does_not_wrap_truly_local_functions() {
        let mut imported = IndexMap::new();
        imported.insert("helper".to_string(), func("helper", "x.presl"));
        let mut local = IndexMap::new();
        local.insert("helper".to_string(), func("helper", "x.presl"));
        let out = emit(&imported, &local, &[]);
        assert!(!out.contains("exclude_coverage_start_helper"));
    }

    #[test]
    fn excises_shadowed_local_definition() {
        let extractor = crate::core::extractor::FunctionExtractor::new();
        let lines = vec!["function helper() {", "    x := 1", "}", "other();"];
        let mut local = IndexMap::new();
        local.insert("helper".to_string(), func("helper", "x.presl"));
        let mut imported = IndexMap::new();
        imported.insert("helper".to_string(), func("helper", "other.presl"));
        let filtered = excise_shadowed_locals(&lines, &local, &imported, &extractor);
        assert_eq!(filtered, vec!["other();".to_string()]);
    }
}
