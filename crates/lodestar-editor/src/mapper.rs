//! Projection of raw blocks onto schema-shaped editor records and back.

use std::collections::HashSet;

use lodestar_common::CiKey;
use lodestar_ini::{RawBlock, RawOption};
use lodestar_template::{SchemaBlock, SchemaFile, SchemaOption};

use crate::{EditorEntry, EditorOption, EditorRecord, Error, Result};

/// What a mapping pass left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapReport {
    /// Raw blocks whose name the schema does not declare.
    pub dropped_blocks: Vec<String>,
    /// `(block, key)` pairs no schema option consumed.
    pub dropped_options: Vec<(String, String)>,
    /// Child occurrences attached to a parent occurrence that follows them.
    pub misordered_children: usize,
}

impl MapReport {
    /// Whether every raw block and option made it into a record.
    pub fn is_clean(&self) -> bool {
        self.dropped_blocks.is_empty() && self.dropped_options.is_empty() && self.misordered_children == 0
    }
}

/// Maps raw blocks through one schema file.
///
/// # Example
///
/// ```
/// use lodestar_editor::RecordMapper;
/// use lodestar_ini::TextReader;
/// use lodestar_template::SchemaCatalog;
///
/// let catalog = SchemaCatalog::from_xml(
///     r#"<Template><File name="Solar"><Block name="Solar" identifier="nickname">
///         <Option name="nickname"/><Option name="solar_radius"/>
///     </Block></File></Template>"#,
/// ).unwrap();
/// let blocks = TextReader::new().parse_str("[Solar]\nnickname = Li01\nsolar_radius = 456\n");
///
/// let records = RecordMapper::new(catalog.file("Solar").unwrap()).map(&blocks).unwrap();
/// assert_eq!(records[0].display_name(), Some("Li01"));
/// assert_eq!(records[0].value("solar_radius").unwrap().value, "456");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RecordMapper<'a> {
    schema: &'a SchemaFile,
    strict_child_order: bool,
}

impl<'a> RecordMapper<'a> {
    pub fn new(schema: &'a SchemaFile) -> Self {
        Self {
            schema,
            strict_child_order: false,
        }
    }

    /// Fail with [`Error::ChildOrder`] instead of counting mis-ordered
    /// child occurrences.
    pub fn strict_child_order(mut self, strict: bool) -> Self {
        self.strict_child_order = strict;
        self
    }

    /// Map raw blocks to records. Blocks and options the schema does not
    /// declare are dropped.
    pub fn map(&self, blocks: &[RawBlock]) -> Result<Vec<EditorRecord>> {
        self.map_with_report(blocks).map(|(records, _)| records)
    }

    /// Map raw blocks and report what was dropped.
    pub fn map_with_report(&self, blocks: &[RawBlock]) -> Result<(Vec<EditorRecord>, MapReport)> {
        let mut report = MapReport::default();
        let mut records = Vec::with_capacity(blocks.len());

        for raw in blocks {
            let Some((schema_block, block_index)) = self.schema.find_block(&raw.name) else {
                report.dropped_blocks.push(raw.name.clone());
                continue;
            };
            records.push(self.map_block(raw, schema_block, block_index, &mut report)?);
        }

        if !report.is_clean() {
            tracing::debug!(
                schema = %self.schema.name,
                dropped_blocks = report.dropped_blocks.len(),
                dropped_options = report.dropped_options.len(),
                misordered_children = report.misordered_children,
                "mapping dropped data"
            );
        }
        Ok((records, report))
    }

    fn map_block(
        &self,
        raw: &RawBlock,
        schema_block: &SchemaBlock,
        block_index: usize,
        report: &mut MapReport,
    ) -> Result<EditorRecord> {
        let mut record = EditorRecord::new(&schema_block.name, block_index);
        let mut consumed: HashSet<CiKey> = HashSet::new();
        let options = schema_block.options();

        let mut index = 0;
        while index < options.len() {
            let schema_option = &options[index];
            let child_index = schema_block.child_of(index);
            let mut option = EditorOption::new(&schema_option.name, index);

            let (key, occurrences) = lookup(raw, schema_option);
            if let Some(key) = key {
                consumed.insert(CiKey::new(key));
            }

            let children = match child_index {
                Some(child) => {
                    let child_option = &options[child];
                    option.child_name = Some(child_option.name.clone());
                    let (child_key, children) = lookup(raw, child_option);
                    // Children are only kept when there is a parent to hold them.
                    if let (Some(child_key), false) = (child_key, occurrences.is_empty()) {
                        consumed.insert(CiKey::new(child_key));
                    }
                    Some(children)
                }
                None => None,
            };

            if schema_option.multiple {
                let mut cursor = 0;
                for (k, occurrence) in occurrences.iter().enumerate() {
                    let mut entry = EditorEntry::from_raw(&occurrence.value);
                    if let Some(children) = &children {
                        let next = occurrences.get(k + 1).map(|o| o.sequence_index);
                        let mut values = Vec::new();
                        while let Some(child) = children.get(cursor) {
                            if next.is_some_and(|next| child.sequence_index >= next) {
                                break;
                            }
                            if child.sequence_index < occurrence.sequence_index {
                                self.misordered(raw, schema_block, child, report)?;
                            }
                            values.push(child.value.clone());
                            cursor += 1;
                        }
                        entry.child_values = Some(values);
                    }
                    option.values.push(entry);
                }
            } else if let Some(last) = occurrences.last() {
                let mut entry = EditorEntry::from_raw(&last.value);
                if let Some(children) = &children {
                    entry.child_values = Some(children.iter().map(|c| c.value.clone()).collect());
                }
                option.values.push(entry);
            }

            if schema_block.is_identifier(&schema_option.name) {
                record.identifier_option_index = Some(record.options.len());
            }
            record.options.push(option);
            index = child_index.map_or(index + 1, |child| child + 1);
        }

        for key in raw.options.keys() {
            if !consumed.contains(key) {
                report.dropped_options.push((raw.name.clone(), key.as_str().to_owned()));
            }
        }
        Ok(record)
    }

    fn misordered(
        &self,
        raw: &RawBlock,
        schema_block: &SchemaBlock,
        child: &RawOption,
        report: &mut MapReport,
    ) -> Result<()> {
        if self.strict_child_order {
            let option = raw
                .options
                .iter()
                .find(|(_, o)| o.sequence_index == child.sequence_index)
                .map(|(key, _)| key.as_str().to_owned())
                .unwrap_or_default();
            return Err(Error::ChildOrder {
                block: schema_block.name.clone(),
                option,
                sequence_index: child.sequence_index,
            });
        }
        report.misordered_children += 1;
        Ok(())
    }

    /// Flatten records back to raw blocks.
    ///
    /// Each entry becomes one option under its option's name, followed by
    /// its child values under the child's name. Placeholder options write
    /// nothing and [`EMPTY_MARKER`](crate::EMPTY_MARKER) is written as an
    /// empty value.
    pub fn unmap(records: &[EditorRecord]) -> Vec<RawBlock> {
        records
            .iter()
            .map(|record| {
                let mut block = RawBlock::new(&record.name);
                for option in &record.options {
                    for entry in &option.values {
                        block.push(option.name.as_str(), entry.raw_value());
                        let (Some(child_name), Some(children)) = (&option.child_name, &entry.child_values) else {
                            continue;
                        };
                        for value in children {
                            block.push(child_name.as_str(), value.as_str()).parent_option_name =
                                Some(option.name.clone());
                        }
                    }
                }
                block
            })
            .collect()
    }
}

/// Occurrences of an option, falling back to the first legacy name that
/// has any. Returns the key that matched.
fn lookup<'r>(raw: &'r RawBlock, option: &'r SchemaOption) -> (Option<&'r str>, Vec<&'r RawOption>) {
    std::iter::once(&option.name)
        .chain(&option.rename_from)
        .map(|name| (name.as_str(), raw.options.get(name).collect::<Vec<_>>()))
        .find(|(_, occurrences)| !occurrences.is_empty())
        .map_or((None, Vec::new()), |(name, occurrences)| (Some(name), occurrences))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodestar_ini::TextReader;

    fn schema() -> SchemaFile {
        let object = SchemaBlock::new("Object")
            .identifier("nickname")
            .with(SchemaOption::new("nickname"))
            .and_then(|b| b.with(SchemaOption::new("dock_with").rename_from("dock, docking")))
            .and_then(|b| b.with(SchemaOption::new("base").multiple(true)))
            .and_then(|b| b.with(SchemaOption::new("loadout").child_of("base").multiple(true)))
            .and_then(|b| b.with(SchemaOption::new("visit")))
            .unwrap();
        SchemaFile::new("Systems").with(object)
    }

    fn map(text: &str) -> (Vec<EditorRecord>, MapReport) {
        let blocks = TextReader::new().parse_str(text);
        RecordMapper::new(&schema()).map_with_report(&blocks).unwrap()
    }

    #[test]
    fn test_options_follow_schema_order() {
        let (records, report) = map("[object]\nvisit = 1\nNICKNAME = Li01_01\n");
        let record = &records[0];
        assert_eq!(record.name, "Object");
        let names: Vec<_> = record.options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["nickname", "dock_with", "base", "visit"]);
        assert_eq!(record.options[2].child_name.as_deref(), Some("loadout"));
        assert_eq!(record.options[3].schema_option_index, 4);
        assert_eq!(record.identifier_option_index, Some(0));
        assert!(record.options[1].is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_rename_uses_first_hit_only() {
        let (records, report) = map("[Object]\ndocking = b\ndock = a\n");
        assert_eq!(records[0].value("dock_with").unwrap().value, "a");
        assert_eq!(report.dropped_options, [("Object".to_owned(), "docking".to_owned())]);
    }

    #[test]
    fn test_canonical_name_wins_over_rename() {
        let (records, _) = map("[Object]\ndock = a\ndock_with = b\n");
        assert_eq!(records[0].value("dock_with").unwrap().value, "b");
    }

    #[test]
    fn test_unknown_blocks_reported() {
        let (records, report) = map("[Zone]\nnickname = z\n\n[Object]\nnickname = o\nextra = 1\n");
        assert_eq!(records.len(), 1);
        assert_eq!(report.dropped_blocks, ["Zone"]);
        assert_eq!(report.dropped_options, [("Object".to_owned(), "extra".to_owned())]);
    }

    #[test]
    fn test_orphan_children_reported() {
        let (records, report) = map("[Object]\nloadout = gun\n");
        assert!(records[0].option("base").unwrap().is_empty());
        assert_eq!(report.dropped_options, [("Object".to_owned(), "loadout".to_owned())]);
    }

    #[test]
    fn test_child_before_parent() {
        let text = "[Object]\nloadout = early\nbase = b1\nloadout = l1\n";
        let (records, report) = map(text);
        let base = records[0].option("base").unwrap();
        assert_eq!(base.values[0].child_values.as_deref(), Some(&["early".to_owned(), "l1".to_owned()][..]));
        assert_eq!(report.misordered_children, 1);

        let blocks = TextReader::new().parse_str(text);
        let schema = schema();
        let err = RecordMapper::new(&schema)
            .strict_child_order(true)
            .map(&blocks)
            .unwrap_err();
        assert!(matches!(err, Error::ChildOrder { sequence_index: 0, ref option, .. } if option == "loadout"));
    }

    #[test]
    fn test_unmap_flattens_children() {
        let (records, _) = map("[Object]\nnickname = o\nbase = b1\nloadout = l1\nbase = b2\nvisit =\n");
        let blocks = RecordMapper::unmap(&records);
        let flat: Vec<_> = blocks[0]
            .options
            .iter()
            .map(|(k, o)| (k.as_str(), o.value.as_str(), o.parent_option_name.as_deref()))
            .collect();
        assert_eq!(
            flat,
            [
                ("nickname", "o", None),
                ("base", "b1", None),
                ("loadout", "l1", Some("base")),
                ("base", "b2", None),
                ("visit", "", None),
            ]
        );
        let sequence: Vec<_> = blocks[0].options.iter().map(|(_, o)| o.sequence_index).collect();
        assert_eq!(sequence, [0, 1, 2, 3, 4]);
    }
}
