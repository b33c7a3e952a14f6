//! Text `[Block]` / `key = value` reader and writer.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use lodestar_common::decode_text;

use crate::{RawBlock, RawOption, Result};

/// Line-oriented reader for text configuration files.
///
/// Malformed lines are skipped rather than reported: lines without `=`,
/// options before the first block header and options with an empty key.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReader {
    keep_comments: bool,
}

impl TextReader {
    /// Create a reader that discards comments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep trailing `;` comments on the options they follow.
    pub fn keep_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    /// Read and parse a file.
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<Vec<RawBlock>> {
        let data = fs::read(path)?;
        Ok(self.parse(&data))
    }

    /// Parse raw file bytes.
    pub fn parse(&self, data: &[u8]) -> Vec<RawBlock> {
        self.parse_str(&decode_text(data))
    }

    /// Parse already-decoded text.
    pub fn parse_str(&self, text: &str) -> Vec<RawBlock> {
        let mut blocks = Vec::new();
        let mut current: Option<RawBlock> = None;

        for line in text.lines() {
            let (content, comment) = split_comment(line);
            let content = content.trim();
            if content.is_empty() {
                continue;
            }

            if content.len() >= 2 && content.starts_with('[') && content.ends_with(']') {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
                current = Some(RawBlock::new(content[1..content.len() - 1].trim()));
                continue;
            }

            let (Some(block), Some((key, value))) = (current.as_mut(), content.split_once('=')) else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }

            let option = block.push(key, value.trim());
            if self.keep_comments {
                option.comment = comment.map(|c| c.trim_end().to_owned());
            }
        }

        if let Some(block) = current {
            blocks.push(block);
        }
        blocks
    }
}

/// Split a line at its first `;` that is not preceded by a backslash.
fn split_comment(line: &str) -> (&str, Option<&str>) {
    let bytes = line.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b';' && (i == 0 || bytes[i - 1] != b'\\') {
            return (&line[..i], Some(&line[i + 1..]));
        }
    }
    (line, None)
}

/// Serializer for text configuration files.
///
/// Blocks are separated by one blank line, options are written one per
/// line in stored order as `key = value`, and the output ends right after
/// the last option of the last block.
pub struct TextWriter;

impl TextWriter {
    /// Render blocks to a string.
    pub fn to_string(blocks: &[RawBlock]) -> String {
        let mut out = String::new();
        for (i, block) in blocks.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "[{}]", block.name);
            for (key, option) in block.options.iter() {
                write_option(&mut out, key.as_str(), option);
            }
        }
        out
    }

    /// Write blocks to any writer.
    pub fn write<W: Write>(blocks: &[RawBlock], writer: &mut W) -> io::Result<()> {
        writer.write_all(Self::to_string(blocks).as_bytes())
    }

    /// Write blocks to a file, replacing its contents.
    pub fn write_file<P: AsRef<Path>>(blocks: &[RawBlock], path: P) -> Result<()> {
        fs::write(path, Self::to_string(blocks))?;
        Ok(())
    }
}

fn write_option(out: &mut String, key: &str, option: &RawOption) {
    out.push_str(key);
    out.push_str(" =");
    if !option.value.is_empty() {
        out.push(' ');
        out.push_str(&option.value);
    }
    if let Some(comment) = &option.comment {
        out.push_str(" ;");
        out.push_str(comment);
    }
    out.push('\n');
}
