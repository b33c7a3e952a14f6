//! Raw block/option model shared by the text and binary formats.

use lodestar_common::CiKey;

/// A single option line as read from a file.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawOption {
    /// The value text, exactly as it appeared after the `=` (trimmed).
    pub value: String,
    /// For a nested child value re-flattened from an editor record, the
    /// name of the parent option the value belongs to.
    pub parent_option_name: Option<String>,
    /// Position of this option among all options of its block.
    pub sequence_index: usize,
    /// Trailing `;` comment, kept only when the reader is asked to.
    pub comment: Option<String>,
}

impl RawOption {
    /// Create an option holding `value` at `sequence_index`.
    pub fn new(value: impl Into<String>, sequence_index: usize) -> Self {
        Self {
            value: value.into(),
            parent_option_name: None,
            sequence_index,
            comment: None,
        }
    }
}

/// Ordered multimap of option name to options.
///
/// Options are stored in file order; lookups by name are ASCII
/// case-insensitive and return every occurrence in that order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawOptions {
    entries: Vec<(CiKey, RawOption)>,
}

impl RawOptions {
    /// Create an empty option list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an option under `key`.
    pub fn push(&mut self, key: impl Into<CiKey>, option: RawOption) {
        self.entries.push((key.into(), option));
    }

    /// Every occurrence of `key`, in file order.
    pub fn get<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a RawOption> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k.matches(key))
            .map(|(_, option)| option)
    }

    /// Whether at least one option is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k.matches(key))
    }

    /// Distinct option names in order of first appearance.
    pub fn keys(&self) -> Vec<&CiKey> {
        let mut keys: Vec<&CiKey> = Vec::new();
        for (key, _) in &self.entries {
            if !keys.iter().any(|k| *k == key) {
                keys.push(key);
            }
        }
        keys
    }

    /// All options in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&CiKey, &RawOption)> {
        self.entries.iter().map(|(k, option)| (k, option))
    }

    /// Total number of options, counting repeats.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no options.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A named `[Block]` with its options.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawBlock {
    /// Block name, as spelled inside the brackets.
    pub name: String,
    /// Options in file order.
    pub options: RawOptions,
}

impl RawBlock {
    /// Create an empty block.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: RawOptions::new(),
        }
    }

    /// Append `key = value`, numbering it after the options already present.
    pub fn push(&mut self, key: impl Into<CiKey>, value: impl Into<String>) -> &mut RawOption {
        let index = self.options.len();
        self.push_option(key, RawOption::new(value, index))
    }

    /// Append a prepared option and return it for further tweaks.
    pub fn push_option(&mut self, key: impl Into<CiKey>, option: RawOption) -> &mut RawOption {
        self.options.push(key, option);
        let last = self.options.entries.len() - 1;
        &mut self.options.entries[last].1
    }

    /// Builder-style [`RawBlock::push`].
    pub fn with(mut self, key: impl Into<CiKey>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_index_counts_whole_block() {
        let block = RawBlock::new("Object")
            .with("nickname", "Li01_01")
            .with("pos", "0, 0, 0")
            .with("nickname", "dup");

        let indices: Vec<_> = block.options.get("NICKNAME").map(|o| o.sequence_index).collect();
        assert_eq!(indices, [0, 2]);
        assert_eq!(block.options.get("pos").next().unwrap().sequence_index, 1);
    }

    #[test]
    fn test_keys_in_first_appearance_order() {
        let block = RawBlock::new("Zone")
            .with("shape", "SPHERE")
            .with("Nickname", "Zone_Li01")
            .with("shape", "BOX")
            .with("nickname", "again");

        let keys: Vec<_> = block.options.keys().into_iter().map(CiKey::as_str).collect();
        assert_eq!(keys, ["shape", "Nickname"]);
        assert!(block.options.contains_key("NICKNAME"));
        assert!(!block.options.contains_key("pos"));
    }

    #[test]
    fn test_iter_preserves_interleaving() {
        let block = RawBlock::new("A").with("a", "1").with("b", "2").with("a", "3");
        let flat: Vec<_> = block
            .options
            .iter()
            .map(|(k, o)| format!("{}={}", k, o.value))
            .collect();
        assert_eq!(flat, ["a=1", "b=2", "a=3"]);
    }
}
