//! Load a [`SchemaCatalog`] from template XML.

use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::{Error, OptionKind, Result, SchemaBlock, SchemaCatalog, SchemaFile, SchemaOption};

impl SchemaCatalog {
    /// Read and load a template file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let xml = fs::read_to_string(path)?;
        Self::from_xml(&xml)
    }

    /// Load a catalog from template XML.
    ///
    /// # Example
    ///
    /// ```
    /// use lodestar_template::SchemaCatalog;
    ///
    /// let xml = r#"<Template>
    ///     <File name="Universe" paths="universe/universe.ini">
    ///         <Block name="system" multiple="true" identifier="nickname">
    ///             <Option name="nickname"/>
    ///             <Option name="file" kind="path"/>
    ///         </Block>
    ///     </File>
    /// </Template>"#;
    ///
    /// let catalog = SchemaCatalog::from_xml(xml).unwrap();
    /// let file = catalog.file_for_path("DATA/UNIVERSE/universe.ini").unwrap();
    /// let (block, _) = file.find_block("System").unwrap();
    /// assert_eq!(block.options().len(), 2);
    /// ```
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut catalog = SchemaCatalog::new();
        let mut file: Option<SchemaFile> = None;
        let mut block: Option<SchemaBlock> = None;

        loop {
            let (element, is_empty) = match reader.read_event() {
                Ok(Event::Start(e)) => (e, false),
                Ok(Event::Empty(e)) => (e, true),
                Ok(Event::End(e)) => {
                    match e.name().as_ref() {
                        b"Block" => {
                            if let (Some(file), Some(block)) = (file.as_mut(), block.take()) {
                                file.push(block);
                            }
                        }
                        b"File" => {
                            if let Some(file) = file.take() {
                                catalog.push(file);
                            }
                        }
                        _ => {}
                    }
                    continue;
                }
                Ok(Event::Eof) => break,
                Ok(_) => continue, // declarations, comments, text
                Err(e) => return Err(Error::Xml(format!("XML parse error: {}", e))),
            };

            let tag = String::from_utf8_lossy(element.name().as_ref()).into_owned();
            match tag.as_str() {
                "Template" => {}
                "File" if file.is_none() => {
                    let mut new_file = SchemaFile::new(required(&element, "File", "name")?);
                    if let Some(paths) = attribute(&element, "paths")? {
                        for pattern in paths.split([',', ';']).filter(|p| !p.trim().is_empty()) {
                            new_file.add_search_path(pattern)?;
                        }
                    }
                    if is_empty {
                        catalog.push(new_file);
                    } else {
                        file = Some(new_file);
                    }
                }
                "Block" if file.is_some() && block.is_none() => {
                    let mut new_block = SchemaBlock::new(required(&element, "Block", "name")?)
                        .multiple(flag(&element, "multiple")?);
                    new_block.identifier = attribute(&element, "identifier")?;
                    match (is_empty, file.as_mut()) {
                        (true, Some(file)) => file.push(new_block),
                        _ => block = Some(new_block),
                    }
                }
                "Option" if block.is_some() => {
                    let option = read_option(&element)?;
                    if let Some(block) = block.as_mut() {
                        block.push(option)?;
                    }
                }
                _ => {
                    let parent = if block.is_some() {
                        "Block"
                    } else if file.is_some() {
                        "File"
                    } else {
                        "Template"
                    };
                    return Err(Error::UnexpectedElement {
                        element: tag,
                        parent: parent.to_owned(),
                    });
                }
            }
        }

        tracing::debug!(files = catalog.files().len(), "loaded schema catalog");
        Ok(catalog)
    }
}

fn read_option(element: &BytesStart<'_>) -> Result<SchemaOption> {
    let mut option = SchemaOption::new(required(element, "Option", "name")?).multiple(flag(element, "multiple")?);
    option.parent = attribute(element, "parent")?;
    if let Some(rename) = attribute(element, "rename")? {
        option = option.rename_from(&rename);
    }
    if let Some(kind) = attribute(element, "kind")? {
        option.kind = OptionKind::parse(&kind).ok_or_else(|| Error::InvalidValue {
            attribute: "kind",
            value: kind.clone(),
            reason: "unknown option kind".into(),
        })?;
    }
    Ok(option)
}

/// Unescaped attribute value, trimmed; empty values count as absent.
fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| Error::Xml(e.to_string()))?;
        if attr.key.as_ref() == name.as_bytes() {
            let value = attr.unescape_value().map_err(|e| Error::Xml(e.to_string()))?;
            let value = value.trim();
            return Ok((!value.is_empty()).then(|| value.to_owned()));
        }
    }
    Ok(None)
}

fn required(element: &BytesStart<'_>, tag: &'static str, name: &'static str) -> Result<String> {
    attribute(element, name)?.ok_or(Error::MissingAttribute {
        element: tag,
        attribute: name,
    })
}

fn flag(element: &BytesStart<'_>, name: &'static str) -> Result<bool> {
    match attribute(element, name)?.as_deref() {
        None => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(false),
        Some(v) => Err(Error::InvalidValue {
            attribute: name,
            value: v.to_owned(),
            reason: "expected true or false".into(),
        }),
    }
}
