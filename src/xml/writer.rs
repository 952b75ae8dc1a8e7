//! Serializes a document back to indented markup.
//!
//! The writer never emits an XML declaration. Elements holding text are
//! written on one line; elements holding only elements and comments put
//! each child on its own indented line.

use crate::error::{Error, ErrorKind, Result};
use crate::xml::model::{Content, Document, Element};
use crate::xml::parser::{is_name_char, is_name_start};

/// Configuration options for writing
#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// Number of spaces per indentation level
    pub indent_spaces: usize,
    /// Line terminator placed between lines
    pub newline: &'static str,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_spaces: 2,
            newline: "\n",
        }
    }
}

pub fn serialize(doc: &Document) -> Result<String> {
    serialize_with_config(doc, &FormatConfig::default())
}

pub fn serialize_with_config(doc: &Document, config: &FormatConfig) -> Result<String> {
    let mut output = String::new();
    write_element(&doc.root, 0, config, &mut output)?;
    Ok(output)
}

fn write_element(
    element: &Element,
    indent: usize,
    config: &FormatConfig,
    output: &mut String,
) -> Result<()> {
    check_name(&element.name)?;

    output.push('<');
    output.push_str(&element.name);
    for (key, value) in &element.attributes {
        check_name(key)?;
        output.push(' ');
        output.push_str(key);
        output.push_str("=\"");
        output.push_str(&escape_attribute(value));
        output.push('"');
    }

    if element.children.is_empty() {
        output.push_str(" />");
        return Ok(());
    }
    output.push('>');

    let inline = element
        .children
        .iter()
        .any(|child| matches!(child, Content::Text(_)));

    for child in &element.children {
        if !inline {
            output.push_str(config.newline);
            push_indent(indent + 1, config, output);
        }
        match child {
            Content::Element(child) => write_element(child, indent + 1, config, output)?,
            Content::Text(text) => output.push_str(&escape_text(text)),
            Content::Comment(comment) => {
                output.push_str("<!--");
                output.push_str(comment);
                output.push_str("-->");
            }
        }
    }

    if !inline {
        output.push_str(config.newline);
        push_indent(indent, config, output);
    }
    output.push_str("</");
    output.push_str(&element.name);
    output.push('>');
    Ok(())
}

fn push_indent(level: usize, config: &FormatConfig, output: &mut String) {
    output.push_str(&" ".repeat(level * config.indent_spaces));
}

fn check_name(name: &str) -> Result<()> {
    let mut bytes = name.bytes();
    let valid = bytes.next().is_some_and(is_name_start) && bytes.all(is_name_char);
    if valid {
        Ok(())
    } else {
        Err(Error::with_message(
            ErrorKind::Serialization,
            format!("invalid xml name '{name}'"),
        ))
    }
}

fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(input: &str) -> String {
    escape_text(input).replace('"', "&quot;")
}
