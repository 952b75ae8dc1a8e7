//! The individual rewrite passes.
//!
//! Every pass takes the `Project` root and the shared [`RewriteContext`] and
//! mutates the tree in place. Passes are no-ops when the constructs they look
//! for are absent, and skip nodes missing the attribute they key on.

use std::collections::HashSet;

use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{Error, ErrorKind, Result};
use crate::project::inference::{
    is_web_application, package_from_hint_path, short_assembly_name, PackageId,
};
use crate::project::rules::{names, RewriteRules, UnmappedFramework};
use crate::xml::{Content, Element, NodePath};

/// State shared by every pass over one project
#[derive(Debug, Clone, Copy)]
pub struct RewriteContext<'a> {
    /// File name of the project without its extension
    pub project_name: &'a str,
    pub rules: &'a RewriteRules,
}

impl<'a> RewriteContext<'a> {
    pub const fn new(project_name: &'a str, rules: &'a RewriteRules) -> Self {
        Self {
            project_name,
            rules,
        }
    }
}

/// Replace the root's attributes with a single `Sdk` attribute
pub fn rewrite_project_attributes(root: &mut Element, ctx: &RewriteContext<'_>) -> Result<()> {
    let rules = ctx.rules;
    // An already converted web project has lost its web import
    let already_web = root.attribute(names::SDK_ATTR) == Some(rules.web_sdk.as_str());
    let web = already_web || is_web_application(root, rules);

    root.clear_attributes();
    let sdk = if web { &rules.web_sdk } else { &rules.standard_sdk };
    root.set_attribute(names::SDK_ATTR, sdk.as_str());
    debug!(sdk = %sdk, "set project sdk");
    Ok(())
}

/// Drop direct `Import` children that pull in legacy build logic
pub fn prune_imports(root: &mut Element, ctx: &RewriteContext<'_>) -> Result<()> {
    let obsolete = &ctx.rules.obsolete_imports;
    let doomed: Vec<NodePath> = root
        .children_named(names::IMPORT)
        .into_iter()
        .filter(|path| {
            root.get(path)
                .and_then(|import| import.attribute(names::PROJECT_ATTR))
                .is_some_and(|project| obsolete.iter().any(|legacy| project.contains(legacy.as_str())))
        })
        .collect();

    let removed = root.remove_all(doomed);
    debug!(removed, "pruned imports");
    Ok(())
}

/// Drop every direct `Choose` child
pub fn prune_chooses(root: &mut Element, _ctx: &RewriteContext<'_>) -> Result<()> {
    let chooses = root.children_named(names::CHOOSE);
    let removed = root.remove_all(chooses);
    debug!(removed, "pruned choose blocks");
    Ok(())
}

/// Replace `TargetFrameworkVersion` with `TargetFramework` in place
pub fn rewrite_target_framework(root: &mut Element, ctx: &RewriteContext<'_>) -> Result<()> {
    let mut found = root.descendants_named(names::TARGET_FRAMEWORK_VERSION);
    if found.len() > 1 {
        return Err(Error::with_message(
            ErrorKind::Rewrite,
            format!(
                "expected at most one {} element, found {}",
                names::TARGET_FRAMEWORK_VERSION,
                found.len()
            ),
        ));
    }
    let Some(path) = found.pop() else {
        return Ok(());
    };

    let version = root.get(&path).map(Element::text).unwrap_or_default();
    let moniker = match ctx.rules.target_frameworks.get(&version) {
        Some(moniker) => moniker.clone(),
        None => match ctx.rules.unmapped_framework {
            UnmappedFramework::Empty => {
                warn!(version = %version, "no target framework known, leaving it empty");
                String::new()
            }
            UnmappedFramework::KeepOriginal => {
                warn!(version = %version, "no target framework known, keeping legacy version");
                version.clone()
            }
            UnmappedFramework::Fail => {
                return Err(Error::with_message(
                    ErrorKind::Rewrite,
                    format!("no target framework known for version '{version}'"),
                ));
            }
        },
    };

    debug!(from = %version, to = %moniker, "rewrote target framework");
    root.replace(&path, Element::new(names::TARGET_FRAMEWORK).with_text(moniker));
    Ok(())
}

/// Remove every `ItemGroup` that directly holds an `item` element.
///
/// SDK projects enumerate these items implicitly, so the whole group goes.
pub fn prune_item_groups(root: &mut Element, item: &str) -> usize {
    let groups: Vec<NodePath> = root
        .descendants_named(item)
        .iter()
        .filter_map(NodePath::parent)
        .filter(|parent| is_item_group(root, parent))
        .collect();
    root.remove_all(groups)
}

/// Remove `item` elements that sit directly in an `ItemGroup`, leaving the group
pub fn prune_items(root: &mut Element, item: &str) -> usize {
    let items: Vec<NodePath> = root
        .descendants_named(item)
        .into_iter()
        .filter(|path| path.parent().is_some_and(|parent| is_item_group(root, &parent)))
        .collect();
    root.remove_all(items)
}

fn is_item_group(root: &Element, path: &NodePath) -> bool {
    root.get(path)
        .is_some_and(|element| element.name == names::ITEM_GROUP)
}

pub fn prune_compile_items(root: &mut Element, _ctx: &RewriteContext<'_>) -> Result<()> {
    let removed = prune_item_groups(root, names::COMPILE);
    debug!(removed, "pruned compile item groups");
    Ok(())
}

pub fn prune_embedded_resources(root: &mut Element, _ctx: &RewriteContext<'_>) -> Result<()> {
    let removed = prune_item_groups(root, names::EMBEDDED_RESOURCE);
    debug!(removed, "pruned embedded resource item groups");
    Ok(())
}

pub fn prune_content_items(root: &mut Element, _ctx: &RewriteContext<'_>) -> Result<()> {
    let removed = prune_items(root, names::CONTENT);
    debug!(removed, "pruned content items");
    Ok(())
}

pub fn prune_none_items(root: &mut Element, _ctx: &RewriteContext<'_>) -> Result<()> {
    let removed = prune_items(root, names::NONE);
    debug!(removed, "pruned none items");
    Ok(())
}

/// Remove properties the SDK infers. `RootNamespace` and `AssemblyName` stay
/// unless they just repeat the project name.
pub fn prune_redundant_properties(root: &mut Element, ctx: &RewriteContext<'_>) -> Result<()> {
    let mut doomed = Vec::new();
    for property in &ctx.rules.redundant_properties {
        let name_bound = ctx.rules.is_name_bound(property);
        for path in root.descendants_named(property) {
            let redundant = !name_bound
                || root
                    .get(&path)
                    .is_some_and(|element| element.text() == ctx.project_name);
            if redundant {
                doomed.push(path);
            }
        }
    }

    let removed = root.remove_all(doomed);
    debug!(removed, "pruned redundant properties");
    Ok(())
}

/// Turn hint-path references into deduplicated `PackageReference`s.
///
/// The first reference resolving to a package name is replaced in place; any
/// later reference resolving to the same name is removed. The container of
/// the first resolved reference is then re-sorted by element name. Rich
/// references that resolve to no package never pick the container, so they
/// stay put on a second run.
pub fn rewrite_package_references(root: &mut Element, _ctx: &RewriteContext<'_>) -> Result<()> {
    let references: Vec<NodePath> = root
        .descendants_named(names::REFERENCE)
        .into_iter()
        .filter(|path| root.get(path).is_some_and(Element::has_child_elements))
        .collect();

    let mut packages: IndexMap<String, (PackageId, NodePath)> = IndexMap::new();
    let mut duplicates = Vec::new();
    for path in references {
        let package = root
            .get(&path)
            .and_then(|reference| reference.child_named(names::HINT_PATH))
            .and_then(|hint| package_from_hint_path(&hint.text()));
        let Some(package) = package else {
            continue;
        };

        match packages.entry(package.name.clone()) {
            Entry::Occupied(first) => {
                debug!(package = %package, kept = %first.get().0, "dropping duplicate reference");
                duplicates.push(path);
            }
            Entry::Vacant(slot) => {
                slot.insert((package, path));
            }
        }
    }

    let Some(container) = packages.values().next().and_then(|(_, path)| path.parent()) else {
        return Ok(());
    };

    for (package, path) in packages.values() {
        root.replace(path, package_reference(package));
    }
    let removed = root.remove_all(duplicates);

    if let Some(group) = root.get_mut(&container) {
        group.sort_elements_by_name();
    }
    debug!(packages = packages.len(), removed, "rewrote package references");
    Ok(())
}

fn package_reference(package: &PackageId) -> Element {
    Element::new(names::PACKAGE_REFERENCE)
        .with_attribute(names::INCLUDE_ATTR, package.name.as_str())
        .with_attribute(names::VERSION_ATTR, package.version.as_str())
}

/// Strip `ProjectReference` elements down to their `Include` attribute
pub fn normalize_project_references(root: &mut Element, _ctx: &RewriteContext<'_>) -> Result<()> {
    let mut rewritten = 0_usize;
    for path in root.descendants_named(names::PROJECT_REFERENCE) {
        let include = root
            .get(&path)
            .and_then(|reference| reference.attribute(names::INCLUDE_ATTR))
            .map(str::to_string);
        let Some(include) = include else {
            continue;
        };

        let fresh = Element::new(names::PROJECT_REFERENCE).with_attribute(names::INCLUDE_ATTR, include);
        if root.replace(&path, fresh).is_some() {
            rewritten += 1;
        }
    }
    debug!(rewritten, "normalized project references");
    Ok(())
}

/// Reduce assembly identity strings in `Reference Include` to the short name,
/// then re-sort the container of the first reference
pub fn normalize_references(root: &mut Element, _ctx: &RewriteContext<'_>) -> Result<()> {
    let references = root.descendants_named(names::REFERENCE);
    let Some(container) = references.first().and_then(NodePath::parent) else {
        return Ok(());
    };

    for path in &references {
        let Some(reference) = root.get_mut(path) else {
            continue;
        };
        let short = reference
            .attribute(names::INCLUDE_ATTR)
            .and_then(short_assembly_name);
        if let Some(short) = short {
            reference.set_attribute(names::INCLUDE_ATTR, short);
        }
    }

    if let Some(group) = root.get_mut(&container) {
        group.sort_elements_by_name();
    }
    Ok(())
}

/// Swap the legacy MSTest assembly reference for the MSTest packages.
///
/// Only runs when the rules carry an MSTest migration. Packages already
/// referenced anywhere in the project are not added twice.
pub fn migrate_mstest(root: &mut Element, ctx: &RewriteContext<'_>) -> Result<()> {
    let Some(mstest) = &ctx.rules.mstest else {
        return Ok(());
    };

    let framework = mstest.framework_reference.as_str();
    let targets: Vec<NodePath> = root
        .descendants_named(names::REFERENCE)
        .into_iter()
        .filter(|path| {
            root.get(path)
                .and_then(|reference| reference.attribute(names::INCLUDE_ATTR))
                == Some(framework)
        })
        .collect();
    let Some(container) = targets.first().and_then(NodePath::parent) else {
        return Ok(());
    };

    let existing: HashSet<String> = root
        .descendants_named(names::PACKAGE_REFERENCE)
        .iter()
        .filter_map(|path| root.get(path))
        .filter_map(|package| package.attribute(names::INCLUDE_ATTR))
        .map(str::to_string)
        .collect();

    root.remove_all(targets);
    let Some(group) = root.get_mut(&container) else {
        return Ok(());
    };
    for package in &mstest.packages {
        if !existing.contains(&package.name) {
            group.children.push(Content::Element(package_reference(package)));
        }
    }
    group.sort_elements_by_name();
    debug!("migrated mstest reference");
    Ok(())
}

/// Remove elements with no child elements, no text and no attributes.
///
/// Descendants are visited in reverse document order, so a container emptied
/// by removing its children is itself removed.
pub fn prune_empty_elements(root: &mut Element, _ctx: &RewriteContext<'_>) -> Result<()> {
    let removed = prune_dead_leaves(root);
    debug!(removed, "pruned empty elements");
    Ok(())
}

fn prune_dead_leaves(element: &mut Element) -> usize {
    let mut removed = 0;
    for index in (0..element.children.len()).rev() {
        let dead = match element.children.get_mut(index) {
            Some(Content::Element(child)) => {
                removed += prune_dead_leaves(child);
                is_dead_leaf(child)
            }
            _ => false,
        };
        if dead {
            element.children.remove(index);
            removed += 1;
        }
    }
    removed
}

fn is_dead_leaf(element: &Element) -> bool {
    !element.has_child_elements() && !element.has_attributes() && element.text().is_empty()
}
