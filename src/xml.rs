//! XML document model, parser and writer

pub mod config;
pub mod cursor;
pub mod model;
pub mod parser;
pub mod writer;

pub use config::ParserConfig;
pub use model::{Content, Document, Element, NodePath};
pub use parser::Parser;
pub use writer::{serialize, serialize_with_config, FormatConfig};

use crate::error::Result;

/// Default namespace declared by every legacy MSBuild project file
pub const MSBUILD_NAMESPACE: &str = "http://schemas.microsoft.com/developer/msbuild/2003";

/// Remove the literal `xmlns="..."` declaration for the MSBuild namespace.
///
/// Purely textual: the declaration is a fixed literal, and dropping it lets
/// name-only queries match without namespace qualification.
pub fn strip_default_namespace(text: &str) -> String {
    text.replace(&format!("xmlns=\"{MSBUILD_NAMESPACE}\""), "")
}

/// Parse a legacy project file's text into a document
pub fn parse_project(text: &str) -> Result<Document> {
    parse_project_with_config(text, ParserConfig::default())
}

pub fn parse_project_with_config(text: &str, config: ParserConfig) -> Result<Document> {
    let stripped = strip_default_namespace(text);
    Parser::with_config(stripped.as_bytes(), config).parse()
}
