//! Function Extractor.
//!
//! Parses `function … { … }` definitions out of an `assembly { … }` block's
//! inner text, tolerating multi-line signatures and pairing annotation
//! comments with the definition they belong to.

use std::path::Path;

use indexmap::IndexMap;
use regex::Regex;

use crate::core::annotations::{collect_post_annotations, collect_pre_annotations};
use crate::core::types::YulFunction;

pub struct FunctionExtractor {
    function_name: Regex,
}

impl FunctionExtractor {
    pub fn new() -> Self {
        Self {
            function_name: Regex::new(r"function\s+(\w+)").expect("static pattern"),
        }
    }

    /// Extract the identifier from a `function <name>` line, if present.
    /// Used both during extraction and by the rewriter to recognize a
    /// `function` header when excising a locally-shadowed definition.
    pub fn match_name(&self, line: &str) -> Option<String> {
        self.function_name
            .captures(line)
            .map(|caps| caps[1].to_string())
    }

    /// Extract every subroutine definition from `block` (the inner text of
    /// one `assembly { … }` region). Last write wins per name within the
    /// block — duplicate names inside one block are not a defined error.
    ///
    /// Line splitting is on `\n` exactly, not a platform-aware line
    /// iterator, to keep brace-balancing and annotation-lookahead indices
    /// stable regardless of line-ending convention.
    pub fn extract(&self, block: &str, source_file: &Path) -> IndexMap<String, YulFunction> {
        let lines: Vec<&str> = block.split('\n').collect();
        let mut functions = IndexMap::new();
        let mut i = 0usize;

        while i < lines.len() {
            let line = lines[i];

            if !line.trim_start().starts_with("function") {
                i += 1;
                continue;
            }

            let pre_comment_lines = collect_pre_annotations(&lines, i);

            let Some(caps) = self.function_name.captures(line) else {
                i += 1;
                continue;
            };
            let func_name = caps[1].to_string();

            let mut sig_lines = vec![line];
            while i < lines.len() && !lines[i].contains('{') {
                i += 1;
                if i < lines.len() {
                    sig_lines.push(lines[i]);
                }
            }
            if i >= lines.len() {
                break;
            }

            let signature_text = sig_lines.join(" ");
            let Some(brace_pos) = signature_text.find('{') else {
                i += 1;
                continue;
            };
            let signature = normalize_whitespace(signature_text[..brace_pos].trim());

            let mut brace_count =
                lines[i].matches('{').count() as i32 - lines[i].matches('}').count() as i32;
            let mut func_lines: Vec<&str> = sig_lines.clone();
            i += 1;

            while i < lines.len() && brace_count > 0 {
                func_lines.push(lines[i]);
                brace_count += lines[i].matches('{').count() as i32 - lines[i].matches('}').count() as i32;
                i += 1;
            }

            let has_disable_start = pre_comment_lines
                .iter()
                .any(|l| l.contains("slither-disable-start"));
            let (consumed, post_comment_lines) =
                collect_post_annotations(&lines, i, has_disable_start);
            i += consumed;

            let full_text = func_lines.join("\n");
            let body = func_lines[sig_lines.len()..].join("\n");
            let pre_annotations = pre_comment_lines.join("\n");
            let post_annotations = post_comment_lines.join("\n");

            functions.insert(
                func_name.clone(),
                YulFunction::new(
                    func_name,
                    signature,
                    body,
                    full_text,
                    pre_annotations,
                    post_annotations,
                    source_file.to_path_buf(),
                ),
            );
        }

        functions
    }
}

impl Default for FunctionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
