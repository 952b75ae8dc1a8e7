//! Legacy project file rewriting

pub mod converter;
pub mod inference;
pub mod passes;
pub mod pipeline;
pub mod rules;

pub use converter::{ProjectConverter, SaveMode, PREVIEW_SUFFIX};
pub use inference::{package_from_hint_path, PackageId};
pub use passes::RewriteContext;
pub use pipeline::Pass;
pub use rules::{RewriteRules, UnmappedFramework};
