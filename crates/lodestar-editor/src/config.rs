//! Read options.

pub use lodestar_ini::FormatHint;

/// Options for [`FileManager`](crate::FileManager) reads.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Reader selection (default: auto-detect)
    pub format: FormatHint,

    /// Keep trailing `;` comments on text options (default: false)
    ///
    /// Only [`FileManager::read_blocks`](crate::FileManager::read_blocks)
    /// returns them; records carry no comments, so mapping drops them.
    pub keep_comments: bool,

    /// Fail on child occurrences that precede their parent instead of only
    /// counting them (default: false)
    pub strict_child_order: bool,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the format hint
    pub fn format(mut self, format: FormatHint) -> Self {
        self.format = format;
        self
    }

    /// Keep text comments
    pub fn keep_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    /// Enable strict child ordering
    pub fn strict_child_order(mut self, strict: bool) -> Self {
        self.strict_child_order = strict;
        self
    }
}
