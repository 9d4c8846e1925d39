//! Call-Graph Analyzer.
//!
//! Purely syntactic: a callee token is any identifier immediately followed
//! by `(`. Names not present in the supplied universe are ignored, which is
//! how built-ins, locals, and host-language tokens are filtered out. This
//! over-approximates inside string literals and comments by design.

use std::collections::HashSet;

use indexmap::IndexMap;
use regex::Regex;

use crate::core::types::YulFunction;

pub struct CallGraphAnalyzer {
    call_pattern: Regex,
}

impl CallGraphAnalyzer {
    pub fn new() -> Self {
        Self {
            call_pattern: Regex::new(r"\b(\w+)\s*\(").expect("static pattern"),
        }
    }

    /// Names from `universe` that appear as callees in `body`, in first
    /// occurrence order.
    pub fn called_names(
        &self,
        body: &str,
        universe: &IndexMap<String, YulFunction>,
    ) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for caps in self.call_pattern.captures_iter(body) {
            let name = &caps[1];
            if universe.contains_key(name) && seen.insert(name.to_string()) {
                out.push(name.to_string());
            }
        }
        out
    }

    /// `name` plus every name transitively reachable through syntactic call
    /// identifiers, restricted to `universe`. Terminates via a visited set
    /// (fixed-point iteration).
    pub fn dependency_closure(
        &self,
        name: &str,
        universe: &IndexMap<String, YulFunction>,
    ) -> IndexMap<String, YulFunction> {
        let mut result = IndexMap::new();
        if !universe.contains_key(name) {
            return result;
        }

        let mut to_process = vec![name.to_string()];
        let mut processed: HashSet<String> = HashSet::new();

        while let Some(current) = to_process.pop() {
            if processed.contains(&current) {
                continue;
            }
            processed.insert(current.clone());

            if let Some(func) = universe.get(&current) {
                result.insert(current.clone(), func.clone());
                for called in self.called_names(&func.body, universe) {
                    if !processed.contains(&called) {
                        to_process.push(called);
                    }
                }
            }
        }

        result
    }
}

impl Default for CallGraphAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
