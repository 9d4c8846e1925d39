//! Annotation-comment pairing for subroutine definitions.
//!
//! `slither-disable-start`/`slither-disable-next-line` comments immediately
//! above a `function` line travel with it as `pre_annotations`; a matching
//! `slither-disable-end` is looked for afterwards and travels as
//! `post_annotations`. Pairing is purely textual and local to one scan —
//! there is no attempt to match a `-start` in one file to an `-end` in
//! another.

/// Walk upward from `function_line_idx` (exclusive) collecting leading
/// annotation lines. Stops at the first `slither-disable-end` (it belongs to
/// the previous definition) or the first non-blank, non-annotation line.
/// Blank lines are skipped over but not collected.
///
/// Returns the collected lines in source order.
pub fn collect_pre_annotations(lines: &[&str], function_line_idx: usize) -> Vec<String> {
    let mut collected: Vec<String> = Vec::new();
    let mut j = function_line_idx as isize - 1;

    while j >= 0 {
        let idx = j as usize;
        let trimmed = lines[idx].trim();

        if trimmed.starts_with("//") && trimmed.contains("slither-disable") {
            if trimmed.contains("slither-disable-end") {
                break;
            }
            collected.insert(0, lines[idx].to_string());
            j -= 1;
        } else if trimmed.is_empty() {
            j -= 1;
        } else {
            break;
        }
    }

    collected
}

/// Walk forward from `after_idx` looking for a `slither-disable-end` comment
/// that closes a region opened in the pre-annotations. `has_disable_start`
/// widens the lookahead window (20 lines instead of 5) and allows skipping
/// over arbitrary content, not just blank lines, while searching for the
/// match.
///
/// Returns `(lines consumed, collected lines)`; `lines consumed` is 0 if no
/// matching `-end` was found within the window.
pub fn collect_post_annotations(
    lines: &[&str],
    after_idx: usize,
    has_disable_start: bool,
) -> (usize, Vec<String>) {
    let max_lookahead = if has_disable_start { 20 } else { 5 };
    let mut temp = after_idx;

    while temp < lines.len() && temp - after_idx < max_lookahead {
        let trimmed = lines[temp].trim();
        if trimmed.starts_with("//") && trimmed.contains("slither-disable-end") {
            return (temp + 1 - after_idx, vec![lines[temp].to_string()]);
        } else if trimmed.is_empty() || has_disable_start {
            temp += 1;
        } else {
            break;
        }
    }

    (0, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_disable_next_line() {
        let text = vec!["// slither-disable-next-line reentrancy", "function f() {"];
        let pre = collect_pre_annotations(&text, 1);
        assert_eq!(pre, vec!["// slither-disable-next-line reentrancy"]);
    }

    #[test]
    fn stops_at_prior_disable_end() {
        let text = vec![
            "function g() { }",
            "// slither-disable-end reentrancy",
            "function f() {",
        ];
        let pre = collect_pre_annotations(&text, 2);
        assert!(pre.is_empty());
    }

    #[test]
    fn skips_blank_lines_without_collecting_them() {
        let text = vec!["// slither-disable-start x", "", "function f() {"];
        let pre = collect_pre_annotations(&text, 2);
        assert_eq!(pre, vec!["// slither-disable-start x"]);
    }

    #[test]
    fn post_annotation_narrow_window_without_start() {
        let text = vec!["}", "", "// slither-disable-end x"];
        let (consumed, collected) = collect_post_annotations(&text, 1, false);
        assert_eq!(consumed, 2);
        assert_eq!(collected, vec!["// slither-disable-end x"]);
    }

    #[test]
    fn post_annotation_stops_on_unrelated_content_without_start() {
        let text = vec!["}", "other_code();", "// slither-disable-end x"];
        let (consumed, collected) = collect_post_annotations(&text, 1, false);
        assert_eq!(consumed, 0);
        assert!(collected.is_empty());
    }

    #[test]
    fn post_annotation_wide_window_with_start_skips_content() {
        let text = vec!["}", "other_code();", "more();", "// slither-disable-end x"];
        let (consumed, collected) = collect_post_annotations(&text, 1, true);
        assert_eq!(consumed, 3);
        assert_eq!(collected, vec!["// slither-disable-end x"]);
    }
}
