//! projup: migrates legacy MSBuild project files to the SDK-style format
//!
//! This crate provides functionality to:
//! - Parse legacy `.csproj` files into a mutable XML tree
//! - Rewrite the tree through an ordered set of passes (imports, items,
//!   properties, references, target framework)
//! - Convert every C# project listed in a `.sln` manifest
//! - Preview the result next to the input or overwrite it in place
//!
//! # Examples
//! ```
//! use projup::{ProjectConverter, RewriteRules};
//!
//! # fn main() -> projup::Result<()> {
//! let legacy = r#"<Project ToolsVersion="14.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
//!   <PropertyGroup>
//!     <TargetFrameworkVersion>v4.6</TargetFrameworkVersion>
//!   </PropertyGroup>
//! </Project>"#;
//!
//! let rules = RewriteRules::default();
//! let converted = ProjectConverter::new("App.csproj", &rules).convert_str(legacy)?;
//! assert!(converted.starts_with(r#"<Project Sdk="Microsoft.NET.Sdk">"#));
//! assert!(converted.contains("<TargetFramework>net46</TargetFramework>"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

use std::path::Path;

use tracing::instrument;

pub mod convert;
pub mod error;
pub mod project;
pub mod solution;
pub mod xml;

// Re-exports
pub use convert::{Conversion, Outcome};
pub use error::{Error, ErrorKind, Result};
pub use project::{
    package_from_hint_path, PackageId, Pass, ProjectConverter, RewriteRules, SaveMode,
    UnmappedFramework,
};
pub use solution::{MemberFailure, SolutionConverter, SolutionReport};

/// Convert a `.csproj` or `.sln` with the given rules
#[instrument(skip(rules))]
pub fn convert_file(path: &Path, mode: SaveMode, rules: &RewriteRules) -> Result<Outcome> {
    Conversion::from_path(path)?.run(mode, rules)
}
