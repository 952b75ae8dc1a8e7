use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::error::{Error, Result};
use crate::project::passes::RewriteContext;
use crate::project::pipeline;
use crate::project::rules::RewriteRules;
use crate::xml::{self, Document};

/// Suffix appended to the full file name when previewing
pub const PREVIEW_SUFFIX: &str = ".converted";

/// Where converted output goes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveMode {
    /// Write `<path>.converted` next to the input
    Preview,
    /// Replace the input file
    Overwrite,
}

impl SaveMode {
    pub fn target_for(self, path: &Path) -> PathBuf {
        match self {
            Self::Overwrite => path.to_path_buf(),
            Self::Preview => {
                let mut target = path.as_os_str().to_owned();
                target.push(PREVIEW_SUFFIX);
                PathBuf::from(target)
            }
        }
    }
}

/// Converts one legacy project file
#[derive(Debug)]
pub struct ProjectConverter<'r> {
    path: PathBuf,
    project_name: String,
    rules: &'r RewriteRules,
}

impl<'r> ProjectConverter<'r> {
    pub fn new(path: impl Into<PathBuf>, rules: &'r RewriteRules) -> Self {
        let path = path.into();
        let project_name = project_name(&path);
        Self {
            path,
            project_name,
            rules,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name up to its last `.`
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Rewrite project text without touching the filesystem
    pub fn convert_str(&self, text: &str) -> Result<String> {
        let mut doc = xml::parse_project(text)?;
        self.rewrite(&mut doc)?;
        xml::serialize(&doc)
    }

    pub fn rewrite(&self, doc: &mut Document) -> Result<()> {
        let ctx = RewriteContext::new(&self.project_name, self.rules);
        pipeline::run(&mut doc.root, &ctx)
    }

    /// Convert the file and write the result, returning where it went
    #[instrument(skip(self), fields(project = %self.path.display()))]
    pub fn convert_and_save(&self, mode: SaveMode) -> Result<PathBuf> {
        if !self.path.is_file() {
            return Err(Error::file_not_found(&self.path));
        }

        let text = fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, &e))?;
        debug!(bytes = text.len(), "read project");

        let converted = self.convert_str(&text)?;

        let target = mode.target_for(&self.path);
        fs::write(&target, converted).map_err(|e| Error::io(&target, &e))?;
        info!(output = %target.display(), "converted project");
        Ok(target)
    }
}

fn project_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.rsplit_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => file_name,
    }
}
