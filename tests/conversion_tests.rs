#![allow(clippy::panic_in_result_fn)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]

use std::fs;
use std::path::{Path, PathBuf};

use projup::{
    convert_file, ErrorKind, Outcome, ProjectConverter, RewriteRules, SaveMode, SolutionConverter,
    UnmappedFramework,
};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    let path = fixture(name);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read file: {}", path.display()))
}

fn convert(name: &str, text: &str) -> String {
    let rules = RewriteRules::default();
    ProjectConverter::new(name, &rules).convert_str(text).unwrap()
}

fn write_project(dir: &Path, relative: &str, text: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, text).unwrap();
    path
}

const MINIMAL: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="14.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <PropertyGroup>
    <TargetFrameworkVersion>v4.6</TargetFrameworkVersion>
  </PropertyGroup>
</Project>"#;

#[test]
fn test_library_fixture() {
    let converted = convert("Legacy.csproj", &read_fixture("Legacy.csproj"));
    assert_eq!(converted, read_fixture("Legacy.expected.csproj").trim_end());
}

#[test]
fn test_web_fixture() {
    let converted = convert("WebApp.csproj", &read_fixture("WebApp.csproj"));
    assert_eq!(
        converted,
        "<Project Sdk=\"Microsoft.NET.Sdk.Web\">\n  <PropertyGroup>\n    <TargetFramework>net46</TargetFramework>\n  </PropertyGroup>\n  <ItemGroup>\n    <Folder Include=\"App_Data\\\" />\n  </ItemGroup>\n</Project>"
    );
}

#[test]
fn test_duplicate_newtonsoft_references_collapse() {
    let legacy = r#"<Project ToolsVersion="15.0">
  <ItemGroup>
    <Reference Include="Newtonsoft.Json, Version=10.0.0.0">
      <HintPath>..\packages\Newtonsoft.Json.10.0.3\lib\net45\Newtonsoft.Json.dll</HintPath>
    </Reference>
  </ItemGroup>
  <ItemGroup>
    <Reference Include="Newtonsoft.Json">
      <HintPath>..\..\packages\Newtonsoft.Json.10.0.3\lib\net45\Newtonsoft.Json.dll</HintPath>
    </Reference>
  </ItemGroup>
</Project>"#;

    let converted = convert("App.csproj", legacy);
    assert_eq!(
        converted
            .matches(r#"<PackageReference Include="Newtonsoft.Json" Version="10.0.3" />"#)
            .count(),
        1
    );
    assert!(!converted.contains("<Reference"));
    assert!(!converted.contains("HintPath"));
    // The group left empty by the duplicate goes too
    assert_eq!(converted.matches("<ItemGroup>").count(), 1);
}

#[test]
fn test_compile_only_item_group_disappears() {
    let legacy = r#"<Project>
  <PropertyGroup><TargetFrameworkVersion>v4.5.1</TargetFrameworkVersion></PropertyGroup>
  <ItemGroup>
    <Compile Include="Program.cs" />
  </ItemGroup>
</Project>"#;

    let converted = convert("App.csproj", legacy);
    assert!(!converted.contains("ItemGroup"));
    assert!(!converted.contains("Compile"));
    assert!(converted.contains("<TargetFramework>net451</TargetFramework>"));
}

#[test]
fn test_assembly_name_pruned_only_when_matching_file_name() {
    let legacy = "<Project><PropertyGroup><AssemblyName>Billing</AssemblyName><RootNamespace>Acme.Billing</RootNamespace></PropertyGroup></Project>";

    let same = convert("Billing.csproj", legacy);
    assert!(!same.contains("AssemblyName"));
    assert!(same.contains("<RootNamespace>Acme.Billing</RootNamespace>"));

    let other = convert("Invoices.csproj", legacy);
    assert!(other.contains("<AssemblyName>Billing</AssemblyName>"));
}

#[test]
fn test_unmapped_framework_leaves_no_target_framework() {
    // Known gap: v3.5 has no moniker, the empty element is then cleaned up
    let legacy = "<Project><PropertyGroup><TargetFrameworkVersion>v3.5</TargetFrameworkVersion></PropertyGroup></Project>";
    assert_eq!(convert("App.csproj", legacy), r#"<Project Sdk="Microsoft.NET.Sdk" />"#);

    let keep = RewriteRules::default().with_unmapped_framework(UnmappedFramework::KeepOriginal);
    let kept = ProjectConverter::new("App.csproj", &keep).convert_str(legacy).unwrap();
    assert!(kept.contains("<TargetFramework>v3.5</TargetFramework>"));

    let fail = RewriteRules::default().with_unmapped_framework(UnmappedFramework::Fail);
    let err = ProjectConverter::new("App.csproj", &fail)
        .convert_str(legacy)
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Rewrite);
}

#[test]
fn test_mstest_migration_through_pipeline() {
    let legacy = r#"<Project>
  <ItemGroup>
    <Reference Include="Microsoft.VisualStudio.QualityTools.UnitTestFramework, Version=10.1.0.0, Culture=neutral, PublicKeyToken=b03f5f7f11d50a3a" />
    <Reference Include="System" />
  </ItemGroup>
  <Import Project="$(VSToolsPath)\TeamTest\Microsoft.TestTools.targets" Condition="Exists('$(VSToolsPath)\TeamTest\Microsoft.TestTools.targets')" />
</Project>"#;

    let plain = convert("Tests.csproj", legacy);
    assert!(plain.contains(r#"<Reference Include="Microsoft.VisualStudio.QualityTools.UnitTestFramework" />"#));
    assert!(!plain.contains("TestTools"));

    let rules = RewriteRules::default().with_mstest_migration();
    let migrated = ProjectConverter::new("Tests.csproj", &rules)
        .convert_str(legacy)
        .unwrap();
    assert_eq!(
        migrated,
        "<Project Sdk=\"Microsoft.NET.Sdk\">\n  <ItemGroup>\n    <PackageReference Include=\"Microsoft.NET.Test.Sdk\" Version=\"15.3.0\" />\n    <PackageReference Include=\"MSTest.TestAdapter\" Version=\"1.1.18\" />\n    <PackageReference Include=\"MSTest.TestFramework\" Version=\"1.1.18\" />\n    <Reference Include=\"System\" />\n  </ItemGroup>\n</Project>"
    );
}

#[test]
fn test_converting_converted_output_is_stable() {
    for name in ["Legacy.csproj", "WebApp.csproj"] {
        let once = convert(name, &read_fixture(name));
        let twice = convert(name, &once);
        assert_eq!(once, twice, "{name} changed on a second run");
    }
}

#[test]
fn test_local_hint_path_reference_is_stable() {
    let legacy = r#"<Project>
  <ItemGroup>
    <Reference Include="System" />
    <Reference Include="Newtonsoft.Json">
      <HintPath>..\packages\Newtonsoft.Json.10.0.3\lib\net45\Newtonsoft.Json.dll</HintPath>
    </Reference>
  </ItemGroup>
  <ItemGroup>
    <Reference Include="Local">
      <HintPath>..\bin\Local.dll</HintPath>
    </Reference>
    <Folder Include="x\" />
  </ItemGroup>
</Project>"#;

    let once = convert("App.csproj", legacy);
    let twice = convert("App.csproj", &once);
    assert_eq!(once, twice);
    assert!(once.contains(
        "  <ItemGroup>\n    <Reference Include=\"Local\">\n      <HintPath>..\\bin\\Local.dll</HintPath>\n    </Reference>\n    <Folder Include=\"x\\\" />\n  </ItemGroup>"
    ));
}

#[test]
fn test_preview_writes_next_to_input() {
    let dir = TempDir::new().unwrap();
    let project = write_project(dir.path(), "App.csproj", MINIMAL);

    let rules = RewriteRules::default();
    let outcome = convert_file(&project, SaveMode::Preview, &rules).unwrap();
    let Outcome::Project(output) = outcome else {
        panic!("expected a project outcome");
    };

    assert_eq!(output, dir.path().join("App.csproj.converted"));
    assert_eq!(fs::read_to_string(&project).unwrap(), MINIMAL);
    assert!(fs::read_to_string(&output).unwrap().starts_with(r#"<Project Sdk="Microsoft.NET.Sdk">"#));
}

#[test]
fn test_overwrite_replaces_input() {
    let dir = TempDir::new().unwrap();
    let project = write_project(dir.path(), "App.csproj", MINIMAL);

    let rules = RewriteRules::default();
    let output = ProjectConverter::new(&project, &rules)
        .convert_and_save(SaveMode::Overwrite)
        .unwrap();

    assert_eq!(output, project);
    assert!(!dir.path().join("App.csproj.converted").exists());
    assert_eq!(
        fs::read_to_string(&project).unwrap(),
        "<Project Sdk=\"Microsoft.NET.Sdk\">\n  <PropertyGroup>\n    <TargetFramework>net46</TargetFramework>\n  </PropertyGroup>\n</Project>"
    );
}

#[test]
fn test_malformed_project_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let project = write_project(dir.path(), "Broken.csproj", "<Project><PropertyGroup></Project>");

    let rules = RewriteRules::default();
    let err = convert_file(&project, SaveMode::Preview, &rules).unwrap_err();
    assert!(err.is_parse());
    assert!(!dir.path().join("Broken.csproj.converted").exists());
}

#[test]
fn test_unsupported_and_missing_inputs() {
    let dir = TempDir::new().unwrap();
    let notes = write_project(dir.path(), "notes.txt", "hello");
    let rules = RewriteRules::default();

    let err = convert_file(&notes, SaveMode::Preview, &rules).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::UnsupportedFileType {
            extension: "txt".to_string()
        }
    );

    let missing = dir.path().join("Missing.csproj");
    let err = convert_file(&missing, SaveMode::Preview, &rules).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::FileNotFound { .. }));
}

#[test]
fn test_solution_with_missing_member_keeps_going() {
    let dir = TempDir::new().unwrap();
    write_project(dir.path(), "src/App/App.csproj", MINIMAL);
    write_project(dir.path(), "src/Lib/Lib.csproj", MINIMAL);
    let manifest = r#"
Microsoft Visual Studio Solution File, Format Version 12.00
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "App", "src\App\App.csproj", "{00000000-0000-0000-0000-000000000001}"
EndProject
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "Gone", "src\Gone\Gone.csproj", "{00000000-0000-0000-0000-000000000002}"
EndProject
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "Lib", "src\Lib\Lib.csproj", "{00000000-0000-0000-0000-000000000003}"
EndProject
Global
EndGlobal
"#;
    let solution = write_project(dir.path(), "All.sln", manifest);

    let rules = RewriteRules::default();
    let report = SolutionConverter::new(&solution, &rules)
        .convert_and_save(SaveMode::Preview)
        .unwrap();

    assert_eq!(
        report.converted,
        [
            dir.path().join("src/App/App.csproj.converted"),
            dir.path().join("src/Lib/Lib.csproj.converted"),
        ]
    );
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].project.ends_with("src/Gone/Gone.csproj"));
    assert!(matches!(
        report.failures[0].error.kind(),
        ErrorKind::FileNotFound { .. }
    ));
    assert!(!report.is_success());
    assert!(report.converted.iter().all(|path| path.is_file()));
}

#[test]
fn test_solution_dispatch_overwrites_members() {
    let dir = TempDir::new().unwrap();
    let project = write_project(dir.path(), "App/App.csproj", MINIMAL);
    let solution = write_project(
        dir.path(),
        "App.sln",
        "Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"App\", \"App\\App.csproj\", \"{00000000-0000-0000-0000-000000000001}\"\nEndProject\n",
    );

    let rules = RewriteRules::default();
    let outcome = convert_file(&solution, SaveMode::Overwrite, &rules).unwrap();
    assert!(outcome.is_success());
    assert!(fs::read_to_string(&project)
        .unwrap()
        .contains("<TargetFramework>net46</TargetFramework>"));
}
