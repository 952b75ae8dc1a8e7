//! Ordered execution of the rewrite passes

use tracing::debug_span;

use crate::error::Result;
use crate::project::passes::{self, RewriteContext};
use crate::xml::Element;

/// One step of the rewrite, in the order [`Pass::ALL`] runs them
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    ProjectAttributes,
    Imports,
    Chooses,
    TargetFramework,
    CompileItems,
    EmbeddedResources,
    ContentItems,
    NoneItems,
    RedundantProperties,
    PackageReferences,
    ProjectReferences,
    References,
    MsTest,
    EmptyElements,
}

impl Pass {
    /// Later passes depend on the tree earlier ones leave behind; empty
    /// element cleanup has to come last.
    pub const ALL: [Self; 14] = [
        Self::ProjectAttributes,
        Self::Imports,
        Self::Chooses,
        Self::TargetFramework,
        Self::CompileItems,
        Self::EmbeddedResources,
        Self::ContentItems,
        Self::NoneItems,
        Self::RedundantProperties,
        Self::PackageReferences,
        Self::ProjectReferences,
        Self::References,
        Self::MsTest,
        Self::EmptyElements,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::ProjectAttributes => "project-attributes",
            Self::Imports => "imports",
            Self::Chooses => "chooses",
            Self::TargetFramework => "target-framework",
            Self::CompileItems => "compile-items",
            Self::EmbeddedResources => "embedded-resources",
            Self::ContentItems => "content-items",
            Self::NoneItems => "none-items",
            Self::RedundantProperties => "redundant-properties",
            Self::PackageReferences => "package-references",
            Self::ProjectReferences => "project-references",
            Self::References => "references",
            Self::MsTest => "mstest",
            Self::EmptyElements => "empty-elements",
        }
    }

    pub fn apply(self, root: &mut Element, ctx: &RewriteContext<'_>) -> Result<()> {
        match self {
            Self::ProjectAttributes => passes::rewrite_project_attributes(root, ctx),
            Self::Imports => passes::prune_imports(root, ctx),
            Self::Chooses => passes::prune_chooses(root, ctx),
            Self::TargetFramework => passes::rewrite_target_framework(root, ctx),
            Self::CompileItems => passes::prune_compile_items(root, ctx),
            Self::EmbeddedResources => passes::prune_embedded_resources(root, ctx),
            Self::ContentItems => passes::prune_content_items(root, ctx),
            Self::NoneItems => passes::prune_none_items(root, ctx),
            Self::RedundantProperties => passes::prune_redundant_properties(root, ctx),
            Self::PackageReferences => passes::rewrite_package_references(root, ctx),
            Self::ProjectReferences => passes::normalize_project_references(root, ctx),
            Self::References => passes::normalize_references(root, ctx),
            Self::MsTest => passes::migrate_mstest(root, ctx),
            Self::EmptyElements => passes::prune_empty_elements(root, ctx),
        }
    }
}

/// Run every pass over `root`, stopping at the first failure
pub fn run(root: &mut Element, ctx: &RewriteContext<'_>) -> Result<()> {
    for pass in Pass::ALL {
        let _span = debug_span!("pass", name = pass.name()).entered();
        pass.apply(root, ctx)?;
    }
    Ok(())
}
