//! Serialization of collection documents and file output.

use crate::collection::CollectionDocument;
use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use serde_json::ser::Formatter;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Indentation of pretty-printed output
const PRETTY_INDENT: &[u8] = b"    ";

/// JSON formatter producing the layout Postman and apiDoc tooling has always been fed.
///
/// On one line, items are separated by `, ` and keys by `: `. With an indent, every item
/// sits on its own line. Non-ASCII characters are always written as `\uXXXX` escapes.
#[derive(Debug, Clone)]
pub struct DumpFormatter<'a> {
    indent: Option<&'a [u8]>,
    current_indent: usize,
    has_value: bool,
}

impl<'a> DumpFormatter<'a> {
    /// Single-line output
    pub fn compact() -> Self {
        Self {
            indent: None,
            current_indent: 0,
            has_value: false,
        }
    }

    /// One item per line, nested levels indented by `indent`
    pub fn indented(indent: &'a [u8]) -> Self {
        Self {
            indent: Some(indent),
            current_indent: 0,
            has_value: false,
        }
    }

    fn begin_item<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        match self.indent {
            Some(indent) => {
                let separator: &[u8] = if first { b"\n" } else { b",\n" };
                writer.write_all(separator)?;
                write_indent(writer, self.current_indent, indent)
            }
            None if first => Ok(()),
            None => writer.write_all(b", "),
        }
    }

    fn open<W>(&mut self, writer: &mut W, bracket: &[u8]) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.current_indent += 1;
        self.has_value = false;
        writer.write_all(bracket)
    }

    fn close<W>(&mut self, writer: &mut W, bracket: &[u8]) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.current_indent -= 1;
        if let (Some(indent), true) = (self.indent, self.has_value) {
            writer.write_all(b"\n")?;
            write_indent(writer, self.current_indent, indent)?;
        }
        writer.write_all(bracket)
    }
}

impl Formatter for DumpFormatter<'_> {
    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.open(writer, b"[")
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.close(writer, b"]")
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.begin_item(writer, first)
    }

    fn end_array_value<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.has_value = true;
        Ok(())
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.open(writer, b"{")
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.close(writer, b"}")
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.begin_item(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn end_object_value<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.has_value = true;
        Ok(())
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..index])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = index + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

fn write_indent<W>(writer: &mut W, depth: usize, indent: &[u8]) -> io::Result<()>
where
    W: ?Sized + Write,
{
    for _ in 0..depth {
        writer.write_all(indent)?;
    }
    Ok(())
}

/// Serialize any value with the given formatter
pub fn to_string_with<T>(value: &T, formatter: DumpFormatter) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value
        .serialize(&mut serializer)
        .context("Failed to serialize value to JSON")?;
    String::from_utf8(out).context("Serialized JSON is not valid UTF-8")
}

/// Serializes a collection document to single-line JSON.
///
/// Keys appear in the document's declaration order.
pub fn serialize_json(doc: &CollectionDocument) -> Result<String> {
    debug!("Serializing collection document to JSON");
    to_string_with(doc, DumpFormatter::compact())
        .context("Failed to serialize collection document to JSON")
}

/// Serializes a collection document to indented JSON with sorted keys.
///
/// Every object's keys are sorted, at every level, and nested values are indented by four
/// spaces, so the output diffs cleanly between runs.
pub fn serialize_json_pretty(doc: &CollectionDocument) -> Result<String> {
    debug!("Serializing collection document to indented JSON");
    // serde_json::Map is ordered by key unless preserve_order is enabled
    let value = serde_json::to_value(doc).context("Failed to convert collection document")?;
    to_string_with(&value, DumpFormatter::indented(PRETTY_INDENT))
        .context("Failed to serialize collection document to JSON")
}

/// Writes string content to a file.
///
/// Creates the file if it doesn't exist, or overwrites it if it does. Missing parent
/// directories are created.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
