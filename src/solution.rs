//! Solution manifest conversion.
//!
//! A solution lists its projects on lines like
//! `Project("{FAE04EC0-...}") = "App", "src\App\App.csproj", "{5B2C...}"`.
//! Every listed C# project is converted on its own; one member failing does
//! not stop the others.

use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR_STR};

use tracing::{error, info, instrument};

use crate::error::{Error, Result};
use crate::project::{ProjectConverter, RewriteRules, SaveMode};

const PROJECT_LINE_PREFIX: &str = "Project";
const PROJECT_EXTENSION: &str = "csproj";

/// A member project that could not be converted
#[derive(Debug)]
pub struct MemberFailure {
    pub project: PathBuf,
    pub error: Error,
}

/// Per-member results of converting a solution
#[derive(Debug, Default)]
pub struct SolutionReport {
    /// Output paths of the members that converted
    pub converted: Vec<PathBuf>,
    pub failures: Vec<MemberFailure>,
}

impl SolutionReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Relative project path declared on a manifest line, if the line declares one
pub fn project_path_from_line(line: &str) -> Option<&str> {
    if !line.starts_with(PROJECT_LINE_PREFIX) {
        return None;
    }
    let (_, fields) = line.split_once('=')?;
    let field = fields.split(',').nth(1)?.trim();
    let unquoted = field
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(field);

    let is_project = Path::new(unquoted)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PROJECT_EXTENSION));
    is_project.then_some(unquoted)
}

/// Absolute paths of the C# projects listed in `manifest`, resolved against `base_dir`
pub fn member_projects(manifest: &str, base_dir: &Path) -> Vec<PathBuf> {
    manifest
        .lines()
        .filter_map(project_path_from_line)
        .map(|relative| base_dir.join(relative.replace('\\', MAIN_SEPARATOR_STR)))
        .collect()
}

/// Converts every project listed in a solution manifest
#[derive(Debug)]
pub struct SolutionConverter<'r> {
    path: PathBuf,
    rules: &'r RewriteRules,
}

impl<'r> SolutionConverter<'r> {
    pub fn new(path: impl Into<PathBuf>, rules: &'r RewriteRules) -> Self {
        Self {
            path: path.into(),
            rules,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Convert the listed projects in order. Only failing to read the
    /// manifest itself is an error; member failures land in the report.
    #[instrument(skip(self), fields(solution = %self.path.display()))]
    pub fn convert_and_save(&self, mode: SaveMode) -> Result<SolutionReport> {
        if !self.path.is_file() {
            return Err(Error::file_not_found(&self.path));
        }
        let manifest = fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, &e))?;
        let base_dir = self.path.parent().unwrap_or_else(|| Path::new(""));
        let members = member_projects(&manifest, base_dir);
        info!(members = members.len(), "converting solution");

        let mut report = SolutionReport::default();
        for project in members {
            match ProjectConverter::new(&project, self.rules).convert_and_save(mode) {
                Ok(output) => report.converted.push(output),
                Err(err) => {
                    error!(
                        project = %project.display(),
                        solution = %self.path.display(),
                        "failed to convert project: {err}"
                    );
                    report.failures.push(MemberFailure {
                        project,
                        error: err,
                    });
                }
            }
        }
        Ok(report)
    }
}
