//! Values derived from the legacy markup rather than read from it directly

use std::fmt;

use crate::project::rules::{names, RewriteRules};
use crate::xml::Element;

/// A NuGet package identity recovered from a reference
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PackageId {
    pub name: String,
    pub version: String,
}

impl PackageId {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// Recover a package from a hint path such as
/// `..\packages\Newtonsoft.Json.10.0.3\lib\net45\Newtonsoft.Json.dll`.
///
/// The segment before the first `lib` segment is the package folder. Its
/// leading non-numeric dot-segments form the name and its longest trailing
/// run of numeric dot-segments forms the version. Returns `None` when there
/// is no folder before `lib` or either half comes out empty.
pub fn package_from_hint_path(hint_path: &str) -> Option<PackageId> {
    let segments: Vec<&str> = hint_path.split('\\').collect();
    let lib = segments.iter().position(|segment| *segment == "lib")?;
    let folder = segments.get(lib.checked_sub(1)?)?;
    let parts: Vec<&str> = folder.split('.').collect();

    let name: Vec<&str> = parts
        .iter()
        .copied()
        .take_while(|part| !is_numeric(part))
        .collect();

    let mut version: Vec<&str> = parts
        .iter()
        .rev()
        .copied()
        .take_while(|part| is_numeric(part))
        .collect();
    version.reverse();

    if name.is_empty() || version.is_empty() {
        return None;
    }

    Some(PackageId::new(name.join("."), version.join(".")))
}

fn is_numeric(segment: &str) -> bool {
    segment.parse::<i32>().is_ok()
}

/// Short assembly name of an identity string such as
/// `System.Web, Version=4.0.0.0, Culture=neutral`. Spaces are ignored;
/// `None` when the value has no qualifiers to drop.
pub fn short_assembly_name(include: &str) -> Option<String> {
    let compact: String = include.chars().filter(|c| *c != ' ').collect();
    let mut parts = compact.split(',');
    let first = parts.next()?;
    parts.next()?;
    Some(first.to_string())
}

/// Whether the project imports the legacy web application targets
pub fn is_web_application(root: &Element, rules: &RewriteRules) -> bool {
    root.elements()
        .filter(|element| element.name == names::IMPORT)
        .filter_map(|import| import.attribute(names::PROJECT_ATTR))
        .any(|project| project.contains(rules.web_application_target.as_str()))
}
