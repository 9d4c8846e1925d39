//! Block Scanner.
//!
//! Locates every `assembly { … }` region honoring nested braces. Purely
//! syntactic: string, character, and comment awareness is not attempted, so
//! a host-language comment containing the literal text `assembly {` will
//! confuse the scanner. This is a deliberate limitation, not an oversight.

use regex::Regex;

use crate::core::types::Block;

/// Compiled once and reused by the resolver for every file it scans.
pub struct BlockScanner {
    assembly_start: Regex,
}

impl BlockScanner {
    pub fn new() -> Self {
        Self {
            assembly_start: Regex::new(r"assembly\s*\{").expect("static pattern"),
        }
    }

    /// Find every `assembly { … }` region in `content`, in source order.
    /// Blocks do not overlap. An unclosed block silently ends the scan: no
    /// further blocks are reported past that point.
    pub fn find_blocks(&self, content: &str) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut pos = 0usize;

        while let Some(m) = self.assembly_start.find_at(content, pos) {
            let start = m.start();
            let body_start = m.end();

            let bytes = content.as_bytes();
            let mut depth = 1i32;
            let mut i = body_start;
            while i < bytes.len() && depth > 0 {
                match bytes[i] {
                    b'{' => depth += 1,
                    b'}' => depth -= 1,
                    _ => {}
                }
                i += 1;
            }

            if depth == 0 {
                let inner = content[body_start..i - 1].to_string();
                blocks.push(Block {
                    start,
                    end: i,
                    inner,
                });
                pos = i;
            } else {
                break;
            }
        }

        blocks
    }
}

impl Default for BlockScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_single_block() {
        let scanner = BlockScanner::new();
        let src = "contract C {\n    function f() public {\n        assembly {\n            mstore(0, 1)\n        }\n    }\n}";
        let blocks = scanner.find_blocks(src);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].inner.contains("mstore(0, 1)"));
    }

    #[test]
    fn handles_nested_braces() {
        let scanner = BlockScanner::new();
        let src = "assembly { if eq(x, 0) { y := 1 } }";
        let blocks = scanner.find_blocks(src);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].inner.trim(), "if eq(x, 0) { y := 1 }");
    }

    #[test]
    fn finds_multiple_blocks_in_order() {
        let scanner = BlockScanner::new();
        let src = "assembly { a() } code(); assembly { b() }";
        let blocks = scanner.find_blocks(src);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].inner.trim(), "a()");
        assert_eq!(blocks[1].inner.trim(), "b()");
        assert!(blocks[0].end <= blocks[1].start);
    }

    #[test]
    fn unclosed_block_ends_scan_silently() {
        let scanner = BlockScanner::new();
        let src = "assembly { a() } assembly { b(";
        let blocks = scanner.find_blocks(src);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].inner.trim(), "a()");
    }

    #[test]
    fn no_assembly_blocks() {
        let scanner = BlockScanner::new();
        assert!(scanner.find_blocks("contract C {}").is_empty());
    }
}
