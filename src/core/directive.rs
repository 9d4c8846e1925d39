//! Import directive parsing:
//! `// import <name>[, <name>…] from <location>`

use regex::Regex;

/// A parsed `// import … from …` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDirective {
    pub names: Vec<String>,
    pub location: String,
}

impl ImportDirective {
    /// `location` is either the literal `self` (case-insensitive) or a
    /// path token with no embedded whitespace.
    pub fn is_self(&self) -> bool {
        self.location.trim().eq_ignore_ascii_case("self")
    }
}

pub struct DirectiveParser {
    pattern: Regex,
}

impl DirectiveParser {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"//\s*import\s+([\w\s,]+)\s+from\s+(\S+)").expect("static pattern"),
        }
    }

    /// Parse the first directive found on `line`, if any.
    pub fn parse(&self, line: &str) -> Option<ImportDirective> {
        let caps = self.pattern.captures(line)?;
        let names = caps[1]
            .split(',')
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>();
        if names.is_empty() {
            return None;
        }
        Some(ImportDirective {
            names,
            location: caps[2].to_string(),
        })
    }
}

impl Default for DirectiveParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_import() {
        let parser = DirectiveParser::new();
        let d = parser.parse("// import add5 from utils.presl").unwrap();
        assert_eq!(d.names, vec!["add5"]);
        assert_eq!(d.location, "utils.presl");
        assert!(!d.is_self());
    }

    #[test]
    fn parses_multiple_comma_separated_names() {
        let parser = DirectiveParser::new();
        let d = parser
            .parse("// import add, multiply from math.presl")
            .unwrap();
        assert_eq!(d.names, vec!["add", "multiply"]);
    }

    #[test]
    fn recognizes_self_case_insensitively() {
        let parser = DirectiveParser::new();
        let d = parser.parse("// import helperFunc from Self").unwrap();
        assert!(d.is_self());
    }

    #[test]
    fn non_directive_line_returns_none() {
        let parser = DirectiveParser::new();
        assert!(parser.parse("result := add(x, 5)").is_none());
    }

    #[test]
    fn tolerates_no_space_after_slashes() {
        let parser = DirectiveParser::new();
        let d = parser.parse("//import foo from bar.presl").unwrap();
        assert_eq!(d.names, vec!["foo"]);
    }
}
