//! Data model shared by every component of the resolver.

use std::path::{Path, PathBuf};

/// One parsed `function … { … }` definition found inside an `assembly { … }`
/// block.
///
/// Two subroutines are equal iff their [`signature`](YulFunction::signature)
/// is equal — see [`YulFunction::eq`].
#[derive(Debug, Clone)]
pub struct YulFunction {
    pub name: String,
    /// Normalized text from `function` up to (but excluding) the opening
    /// body brace, whitespace-collapsed.
    pub signature: String,
    /// Text between the signature's opening brace and its matching close
    /// brace.
    pub body: String,
    /// Verbatim text of the whole definition, signature and body together.
    pub full_text: String,
    /// Leading annotation comments that open a region (see `core::annotations`).
    pub pre_annotations: String,
    /// The single trailing annotation comment that closes that region, if any.
    pub post_annotations: String,
    /// The file this definition physically appears in.
    pub source_file: PathBuf,
}

impl YulFunction {
    pub fn new(
        name: impl Into<String>,
        signature: impl Into<String>,
        body: impl Into<String>,
        full_text: impl Into<String>,
        pre_annotations: impl Into<String>,
        post_annotations: impl Into<String>,
        source_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            signature: signature.into(),
            body: body.into(),
            full_text: full_text.into(),
            pre_annotations: pre_annotations.into(),
            post_annotations: post_annotations.into(),
            source_file: source_file.into(),
        }
    }
}

impl PartialEq for YulFunction {
    fn eq(&self, other: &Self) -> bool {
        self.signature == other.signature
    }
}
impl Eq for YulFunction {}

/// One `assembly { … }` region located by the block scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Byte offset of the `assembly` keyword that opened this block.
    pub start: usize,
    /// Byte offset just past the block's closing `}`.
    pub end: usize,
    /// Text strictly between the outermost braces.
    pub inner: String,
}

/// A set of file paths forming a strongly connected component in the
/// file-level import graph. `BTreeSet` gives both the canonical iteration
/// order and the `Hash`/`Eq` impls needed to key the cycle-group cache.
pub type CycleKey = std::collections::BTreeSet<PathBuf>;

/// Lexically normalize a path (collapse `.` and `..`) without touching the
/// filesystem, since an import target may not exist on disk yet when this
/// is called. `resolve_import_path` relies on this for relative imports.
pub fn lexically_normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            Component::CurDir => {}
            other => out.push(other),
        }
    }
    out
}
