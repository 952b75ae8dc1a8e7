//! Lookup tables and fixed names driving the rewrite passes.
//!
//! Everything a pass compares against lives in [`RewriteRules`], so tests can
//! swap tables without touching the passes themselves.

use indexmap::IndexMap;

use crate::project::inference::PackageId;

/// Element and attribute names of the MSBuild project schema
pub mod names {
    pub const IMPORT: &str = "Import";
    pub const CHOOSE: &str = "Choose";
    pub const ITEM_GROUP: &str = "ItemGroup";
    pub const COMPILE: &str = "Compile";
    pub const EMBEDDED_RESOURCE: &str = "EmbeddedResource";
    pub const CONTENT: &str = "Content";
    pub const NONE: &str = "None";
    pub const TARGET_FRAMEWORK_VERSION: &str = "TargetFrameworkVersion";
    pub const TARGET_FRAMEWORK: &str = "TargetFramework";
    pub const REFERENCE: &str = "Reference";
    pub const HINT_PATH: &str = "HintPath";
    pub const PACKAGE_REFERENCE: &str = "PackageReference";
    pub const PROJECT_REFERENCE: &str = "ProjectReference";

    pub const SDK_ATTR: &str = "Sdk";
    pub const PROJECT_ATTR: &str = "Project";
    pub const INCLUDE_ATTR: &str = "Include";
    pub const VERSION_ATTR: &str = "Version";
}

pub const STANDARD_SDK: &str = "Microsoft.NET.Sdk";
pub const WEB_SDK: &str = "Microsoft.NET.Sdk.Web";
pub const WEB_APPLICATION_TARGETS: &str = "Microsoft.WebApplication.targets";

pub const OBSOLETE_IMPORTS: [&str; 4] = [
    "Microsoft.Common.props",
    "Microsoft.CSharp.targets",
    WEB_APPLICATION_TARGETS,
    "Microsoft.TestTools.targets",
];

pub const TARGET_FRAMEWORKS: [(&str, &str); 3] =
    [("v4.5.1", "net451"), ("v4.5.2", "net452"), ("v4.6", "net46")];

pub const REDUNDANT_PROPERTIES: [&str; 20] = [
    "Configuration",
    "Platform",
    "OutputType",
    "AppDesignerFolder",
    "RootNamespace",
    "AssemblyName",
    "Optimize",
    "ProjectGuid",
    "ProjectTypeGuids",
    "FileAlignment",
    "OutputPath",
    "ErrorReport",
    "WarningLevel",
    "NuGetPackageImportStamp",
    "TargetFrameworkProfile",
    "TestProjectType",
    "IsCodedUITest",
    "ReferencePath",
    "VSToolsPath",
    "VisualStudioVersion",
];

/// Properties only redundant when their value repeats the project name
pub const NAME_BOUND_PROPERTIES: [&str; 2] = ["RootNamespace", "AssemblyName"];

pub const MSTEST_FRAMEWORK: &str = "Microsoft.VisualStudio.QualityTools.UnitTestFramework";

pub const MSTEST_PACKAGES: [(&str, &str); 3] = [
    ("Microsoft.NET.Test.Sdk", "15.3.0"),
    ("MSTest.TestAdapter", "1.1.18"),
    ("MSTest.TestFramework", "1.1.18"),
];

/// What to write when a `TargetFrameworkVersion` has no known moniker
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnmappedFramework {
    /// Emit an empty `TargetFramework`
    #[default]
    Empty,
    /// Carry the legacy version string over unchanged
    KeepOriginal,
    /// Abort the conversion of this project
    Fail,
}

/// Replacement of the legacy MSTest assembly reference with packages
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsTestMigration {
    pub framework_reference: String,
    pub packages: Vec<PackageId>,
}

impl Default for MsTestMigration {
    fn default() -> Self {
        Self {
            framework_reference: MSTEST_FRAMEWORK.to_string(),
            packages: MSTEST_PACKAGES
                .iter()
                .map(|(name, version)| PackageId::new(*name, *version))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewriteRules {
    pub standard_sdk: String,
    pub web_sdk: String,
    /// Import path fragment marking a web application
    pub web_application_target: String,
    /// Import path fragments whose imports are dropped
    pub obsolete_imports: Vec<String>,
    /// Legacy `vX.Y.Z` version to target framework moniker
    pub target_frameworks: IndexMap<String, String>,
    pub unmapped_framework: UnmappedFramework,
    pub redundant_properties: Vec<String>,
    pub name_bound_properties: Vec<String>,
    /// `None` leaves MSTest references alone
    pub mstest: Option<MsTestMigration>,
}

impl Default for RewriteRules {
    fn default() -> Self {
        Self {
            standard_sdk: STANDARD_SDK.to_string(),
            web_sdk: WEB_SDK.to_string(),
            web_application_target: WEB_APPLICATION_TARGETS.to_string(),
            obsolete_imports: to_strings(&OBSOLETE_IMPORTS),
            target_frameworks: TARGET_FRAMEWORKS
                .iter()
                .map(|(legacy, moniker)| (legacy.to_string(), moniker.to_string()))
                .collect(),
            unmapped_framework: UnmappedFramework::default(),
            redundant_properties: to_strings(&REDUNDANT_PROPERTIES),
            name_bound_properties: to_strings(&NAME_BOUND_PROPERTIES),
            mstest: None,
        }
    }
}

impl RewriteRules {
    pub fn with_unmapped_framework(mut self, policy: UnmappedFramework) -> Self {
        self.unmapped_framework = policy;
        self
    }

    pub fn with_mstest_migration(mut self) -> Self {
        self.mstest = Some(MsTestMigration::default());
        self
    }

    pub fn is_name_bound(&self, property: &str) -> bool {
        self.name_bound_properties.iter().any(|name| name == property)
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
