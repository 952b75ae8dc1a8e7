//! Picks the converter for a path from its extension

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Error, ErrorKind, Result};
use crate::project::{ProjectConverter, RewriteRules, SaveMode};
use crate::solution::{SolutionConverter, SolutionReport};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Conversion {
    /// A single `.csproj`
    Project(PathBuf),
    /// A `.sln` manifest whose member projects are converted
    Solution(PathBuf),
}

/// What a conversion produced
#[derive(Debug)]
pub enum Outcome {
    /// Path the converted project was written to
    Project(PathBuf),
    Solution(SolutionReport),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        match self {
            Self::Project(_) => true,
            Self::Solution(report) => report.is_success(),
        }
    }
}

impl Conversion {
    /// Resolve the conversion for an existing file
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(Error::file_not_found(path));
        }
        Self::from_extension(path)
    }

    /// Resolve by extension alone, case-insensitively
    pub fn from_extension(path: PathBuf) -> Result<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "csproj" => Ok(Self::Project(path)),
            "sln" => Ok(Self::Solution(path)),
            _ => {
                warn!(path = %path.display(), "unsupported file type");
                Err(Error::new(ErrorKind::UnsupportedFileType { extension }))
            }
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Project(path) | Self::Solution(path) => path,
        }
    }

    pub fn run(&self, mode: SaveMode, rules: &RewriteRules) -> Result<Outcome> {
        match self {
            Self::Project(path) => ProjectConverter::new(path, rules)
                .convert_and_save(mode)
                .map(Outcome::Project),
            Self::Solution(path) => SolutionConverter::new(path, rules)
                .convert_and_save(mode)
                .map(Outcome::Solution),
        }
    }
}
