//! Schema model and lookups.

use std::fmt;
use std::path::Path;

use glob::{MatchOptions, Pattern};
use lodestar_common::{CiKey, FxHashMap};

use crate::{Error, Result};

/// How an option's values are meant to be read.
///
/// Values are always stored as text; the kind only tells consumers which
/// typed accessor fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OptionKind {
    #[default]
    String,
    Int,
    Float,
    Bool,
    /// Three comma-separated floats.
    Point,
    /// Three comma-separated 0-255 integers.
    Rgb,
    /// Comma-separated strings.
    StringArray,
    /// A path relative to the data directory.
    Path,
}

impl OptionKind {
    /// Parse the name used in template files, ignoring ASCII case.
    pub fn parse(name: &str) -> Option<Self> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "string" => OptionKind::String,
            "int" => OptionKind::Int,
            "float" => OptionKind::Float,
            "bool" => OptionKind::Bool,
            "point" => OptionKind::Point,
            "rgb" => OptionKind::Rgb,
            "stringarray" | "string_array" => OptionKind::StringArray,
            "path" => OptionKind::Path,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OptionKind::String => "string",
            OptionKind::Int => "int",
            OptionKind::Float => "float",
            OptionKind::Bool => "bool",
            OptionKind::Point => "point",
            OptionKind::Rgb => "rgb",
            OptionKind::StringArray => "stringarray",
            OptionKind::Path => "path",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared option.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaOption {
    pub name: String,
    /// Keep every occurrence instead of only the last one.
    pub multiple: bool,
    /// Set when this option is the nested child of the option declared
    /// right before it.
    pub parent: Option<String>,
    /// Legacy names searched, in order, when `name` is absent.
    pub rename_from: Vec<String>,
    pub kind: OptionKind,
}

impl SchemaOption {
    /// A single-valued string option.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            multiple: false,
            parent: None,
            rename_from: Vec::new(),
            kind: OptionKind::String,
        }
    }

    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    pub fn child_of(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Add alternate names from a comma-separated list.
    pub fn rename_from(mut self, names: &str) -> Self {
        self.rename_from.extend(
            names
                .split(',')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_owned),
        );
        self
    }

    pub fn kind(mut self, kind: OptionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether `name` is this option's name, ignoring ASCII case.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Whether this option is nested under another.
    pub fn is_child(&self) -> bool {
        self.parent.is_some()
    }
}

/// A declared block and its options in declaration order.
#[derive(Debug, Clone)]
pub struct SchemaBlock {
    pub name: String,
    /// The block may appear more than once in a file.
    pub multiple: bool,
    /// Option whose first value names a record.
    pub identifier: Option<String>,
    options: Vec<SchemaOption>,
    index: FxHashMap<CiKey, usize>,
}

impl SchemaBlock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            multiple: false,
            identifier: None,
            options: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    pub fn identifier(mut self, option: impl Into<String>) -> Self {
        self.identifier = Some(option.into());
        self
    }

    /// Append an option.
    ///
    /// A child option must name the option declared right before it, and
    /// that option must not itself be a child: nesting is one level deep.
    pub fn push(&mut self, option: SchemaOption) -> Result<()> {
        if let Some(parent) = &option.parent {
            let valid = self
                .options
                .last()
                .is_some_and(|prev| prev.is_named(parent) && !prev.is_child());
            if !valid {
                return Err(Error::UnknownParent {
                    block: self.name.clone(),
                    option: option.name,
                    parent: parent.clone(),
                });
            }
        }
        self.index
            .entry(CiKey::new(option.name.as_str()))
            .or_insert(self.options.len());
        self.options.push(option);
        Ok(())
    }

    /// Builder form of [`SchemaBlock::push`].
    pub fn with(mut self, option: SchemaOption) -> Result<Self> {
        self.push(option)?;
        Ok(self)
    }

    /// Options in declaration order.
    pub fn options(&self) -> &[SchemaOption] {
        &self.options
    }

    pub fn option(&self, index: usize) -> Option<&SchemaOption> {
        self.options.get(index)
    }

    /// Find an option and its declaration index.
    pub fn find_option(&self, name: &str) -> Option<(&SchemaOption, usize)> {
        let index = *self.index.get(&CiKey::new(name))?;
        Some((&self.options[index], index))
    }

    /// Index of the child declared right after option `index`, if any.
    pub fn child_of(&self, index: usize) -> Option<usize> {
        let parent = self.options.get(index)?;
        let child = self.options.get(index + 1)?;
        child
            .parent
            .as_deref()
            .is_some_and(|p| parent.is_named(p))
            .then_some(index + 1)
    }

    /// Declaration index of the identifier option.
    pub fn identifier_index(&self) -> Option<usize> {
        self.find_option(self.identifier.as_deref()?).map(|(_, index)| index)
    }

    pub fn is_identifier(&self, option: &str) -> bool {
        self.identifier.as_deref().is_some_and(|id| id.eq_ignore_ascii_case(option))
    }
}

/// The schema of one kind of configuration file.
#[derive(Debug, Clone)]
pub struct SchemaFile {
    pub name: String,
    search_paths: Vec<Pattern>,
    blocks: Vec<SchemaBlock>,
    index: FxHashMap<CiKey, usize>,
}

impl SchemaFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            search_paths: Vec::new(),
            blocks: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Add a glob pattern for data paths of this kind, e.g.
    /// `universe/systems/*/*.ini`. Backslashes are accepted as separators.
    pub fn add_search_path(&mut self, pattern: &str) -> Result<()> {
        let normalized = pattern.trim().replace('\\', "/");
        let pattern = Pattern::new(&normalized).map_err(|e| Error::InvalidValue {
            attribute: "paths",
            value: normalized.clone(),
            reason: e.to_string(),
        })?;
        self.search_paths.push(pattern);
        Ok(())
    }

    /// Append a block. When two blocks share a name, lookups find the first.
    pub fn push(&mut self, block: SchemaBlock) {
        self.index
            .entry(CiKey::new(block.name.as_str()))
            .or_insert(self.blocks.len());
        self.blocks.push(block);
    }

    /// Builder form of [`SchemaFile::push`].
    pub fn with(mut self, block: SchemaBlock) -> Self {
        self.push(block);
        self
    }

    /// Find a block and its declaration index.
    pub fn find_block(&self, name: &str) -> Option<(&SchemaBlock, usize)> {
        let index = *self.index.get(&CiKey::new(name))?;
        Some((&self.blocks[index], index))
    }

    pub fn block(&self, index: usize) -> Option<&SchemaBlock> {
        self.blocks.get(index)
    }

    /// Blocks in declaration order.
    pub fn blocks(&self) -> &[SchemaBlock] {
        &self.blocks
    }

    pub fn search_paths(&self) -> impl Iterator<Item = &str> {
        self.search_paths.iter().map(Pattern::as_str)
    }

    /// Whether any search pattern matches a trailing part of `path`.
    pub fn matches_path(&self, path: &Path) -> bool {
        let normalized = path.to_string_lossy().replace('\\', "/");
        let options = MatchOptions {
            case_sensitive: false,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        let mut tail = normalized.as_str();
        loop {
            if self.search_paths.iter().any(|p| p.matches_with(tail, options)) {
                return true;
            }
            match tail.find('/') {
                Some(slash) => tail = &tail[slash + 1..],
                None => return false,
            }
        }
    }
}

/// Every known file schema.
///
/// Loaded once and shared read-only; it is `Send + Sync`.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    files: Vec<SchemaFile>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, file: SchemaFile) {
        self.files.push(file);
    }

    pub fn with(mut self, file: SchemaFile) -> Self {
        self.push(file);
        self
    }

    pub fn files(&self) -> &[SchemaFile] {
        &self.files
    }

    /// Find a file schema by name, ignoring ASCII case.
    pub fn file(&self, name: &str) -> Option<&SchemaFile> {
        self.files.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// The first file schema whose search paths match `path`.
    pub fn file_for_path(&self, path: impl AsRef<Path>) -> Option<&SchemaFile> {
        let path = path.as_ref();
        self.files.iter().find(|f| f.matches_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_block() -> SchemaBlock {
        SchemaBlock::new("Object")
            .identifier("nickname")
            .with(SchemaOption::new("nickname"))
            .and_then(|b| b.with(SchemaOption::new("base").multiple(true)))
            .and_then(|b| b.with(SchemaOption::new("loadout").child_of("base").multiple(true)))
            .and_then(|b| b.with(SchemaOption::new("pos").kind(OptionKind::Point)))
            .unwrap()
    }

    #[test]
    fn test_find_block_case_insensitive() {
        let file = SchemaFile::new("Systems").with(SchemaBlock::new("Zone")).with(object_block());
        let (block, index) = file.find_block("OBJECT").unwrap();
        assert_eq!(block.name, "Object");
        assert_eq!(index, 1);
        assert!(file.find_block("LightSource").is_none());
    }

    #[test]
    fn test_find_option_and_child() {
        let block = object_block();
        let (option, index) = block.find_option("Base").unwrap();
        assert!(option.multiple);
        assert_eq!(index, 1);
        assert_eq!(block.child_of(1), Some(2));
        assert_eq!(block.child_of(0), None);
        assert_eq!(block.child_of(3), None);
        assert_eq!(block.identifier_index(), Some(0));
        assert!(block.is_identifier("NICKNAME"));
    }

    #[test]
    fn test_child_must_follow_parent() {
        let mut block = SchemaBlock::new("Object");
        block.push(SchemaOption::new("base")).unwrap();
        block.push(SchemaOption::new("pos")).unwrap();
        let err = block.push(SchemaOption::new("loadout").child_of("base")).unwrap_err();
        assert!(matches!(err, Error::UnknownParent { parent, .. } if parent == "base"));
    }

    #[test]
    fn test_no_grandchildren() {
        let mut block = SchemaBlock::new("Object");
        block.push(SchemaOption::new("a")).unwrap();
        block.push(SchemaOption::new("b").child_of("a")).unwrap();
        assert!(block.push(SchemaOption::new("c").child_of("b")).is_err());
    }

    #[test]
    fn test_rename_from_list() {
        let option = SchemaOption::new("dock_with").rename_from(" dock, ,docking ");
        assert_eq!(option.rename_from, ["dock", "docking"]);
    }

    #[test]
    fn test_file_for_path() {
        let mut systems = SchemaFile::new("Systems");
        systems.add_search_path("universe\\systems\\*\\*.ini").unwrap();
        let mut universe = SchemaFile::new("Universe");
        universe.add_search_path("universe/universe.ini").unwrap();
        let catalog = SchemaCatalog::new().with(systems).with(universe);

        let found = catalog.file_for_path("C:\\Game\\DATA\\UNIVERSE\\Systems\\Li01\\li01.ini");
        assert_eq!(found.map(|f| f.name.as_str()), Some("Systems"));
        let found = catalog.file_for_path("/data/universe/universe.ini");
        assert_eq!(found.map(|f| f.name.as_str()), Some("Universe"));
        assert!(catalog.file_for_path("/data/universe/systems/li01.ini").is_none());
        assert!(catalog.file("systems").is_some());
    }

    #[test]
    fn test_option_kind_names() {
        for kind in [OptionKind::Int, OptionKind::StringArray, OptionKind::Rgb] {
            assert_eq!(OptionKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(OptionKind::parse("POINT"), Some(OptionKind::Point));
        assert_eq!(OptionKind::parse("vector"), None);
    }

    #[test]
    fn test_catalog_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SchemaCatalog>();
    }
}
