//! File-level entry points: read, map and write configuration files and
//! open asset containers.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use lodestar_ini::{parse_blocks, RawBlock, TextReader, TextWriter};
use lodestar_template::{SchemaCatalog, SchemaFile};
use lodestar_utf::UtfTree;

use crate::{EditorRecord, Error, FormatHint, MapReport, ReadOptions, RecordMapper, Result};

/// Reads and writes configuration files through a shared schema catalog.
#[derive(Debug, Clone)]
pub struct FileManager {
    catalog: Arc<SchemaCatalog>,
    options: ReadOptions,
}

impl FileManager {
    pub fn new(catalog: Arc<SchemaCatalog>) -> Self {
        Self {
            catalog,
            options: ReadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ReadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// The schema file whose search paths match `path`.
    pub fn schema_for(&self, path: &Path) -> Result<&SchemaFile> {
        self.catalog
            .file_for_path(path)
            .ok_or_else(|| Error::NoSchema { path: path.to_owned() })
    }

    /// The schema file with the given name.
    pub fn schema_named(&self, name: &str) -> Result<&SchemaFile> {
        self.catalog
            .file(name)
            .ok_or_else(|| Error::UnknownSchema(name.to_owned()))
    }

    /// Read a configuration file into raw blocks with the configured format.
    pub fn read_blocks<P: AsRef<Path>>(&self, path: P) -> Result<Vec<RawBlock>> {
        self.read_blocks_as(path, self.options.format)
    }

    /// Read a configuration file into raw blocks with an explicit format.
    ///
    /// With [`FormatHint::Auto`] the data is tried as BINI first; anything
    /// that is not BINI is read as text.
    pub fn read_blocks_as<P: AsRef<Path>>(&self, path: P, hint: FormatHint) -> Result<Vec<RawBlock>> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let text = TextReader::new().keep_comments(self.options.keep_comments);
        tracing::trace!(path = %path.display(), ?hint, "reading config");
        Ok(parse_blocks(&data, hint, text)?)
    }

    /// Read a configuration file and map it through the schema matching
    /// its path.
    pub fn read_config<P: AsRef<Path>>(&self, path: P) -> Result<Vec<EditorRecord>> {
        self.read_config_with_report(path).map(|(records, _)| records)
    }

    /// [`FileManager::read_config`] plus the mapping report.
    pub fn read_config_with_report<P: AsRef<Path>>(&self, path: P) -> Result<(Vec<EditorRecord>, MapReport)> {
        let path = path.as_ref();
        let schema = self.schema_for(path)?;
        self.read_config_as(path, schema)
    }

    /// Read a configuration file and map it through an explicit schema.
    pub fn read_config_as<P: AsRef<Path>>(
        &self,
        path: P,
        schema: &SchemaFile,
    ) -> Result<(Vec<EditorRecord>, MapReport)> {
        let blocks = self.read_blocks(path)?;
        RecordMapper::new(schema)
            .strict_child_order(self.options.strict_child_order)
            .map_with_report(&blocks)
    }

    /// Unmap records and write them as a text file, replacing its contents.
    pub fn write_config<P: AsRef<Path>>(&self, path: P, records: &[EditorRecord]) -> Result<()> {
        let blocks = RecordMapper::unmap(records);
        TextWriter::write_file(&blocks, path)?;
        Ok(())
    }

    /// Open a UTF asset container.
    pub fn read_asset<P: AsRef<Path>>(&self, path: P) -> Result<UtfTree> {
        Ok(UtfTree::open(path)?)
    }
}
