//! Mutable, order-preserving XML tree

use indexmap::IndexMap;

/// XML document
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub root: Element,
}

/// XML element
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Content>,
}

/// XML content node
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Element(Element),
    Text(String),
    Comment(String),
}

/// Position of an element relative to the element it was queried from.
///
/// Each entry indexes into the `children` of the element at the previous
/// depth. The empty path addresses the query root itself. Ordering of paths
/// is document order (pre-order), so sorting a set of paths in reverse gives
/// an order in which removing each one never invalidates the ones after it.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Path of the containing element, `None` for the root
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    fn split_last(&self) -> Option<(usize, &[usize])> {
        self.0.split_last().map(|(last, rest)| (*last, rest))
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(Content::Element(child));
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn clear_attributes(&mut self) {
        self.attributes.clear();
    }

    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Replace all content with a single text node; empty text leaves no node
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.children.clear();
        if !text.is_empty() {
            self.children.push(Content::Text(text));
        }
    }

    /// Concatenated text of this element and all of its descendants
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Content::Text(text) => out.push_str(text),
                Content::Element(element) => element.collect_text(out),
                Content::Comment(_) => {}
            }
        }
    }

    /// Direct child elements in document order
    pub fn elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|child| match child {
            Content::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn has_child_elements(&self) -> bool {
        self.elements().next().is_some()
    }

    /// First direct child element named `name`
    pub fn child_named(&self, name: &str) -> Option<&Self> {
        self.elements().find(|element| element.name == name)
    }

    /// Paths of direct child elements named `name`
    pub fn children_named(&self, name: &str) -> Vec<NodePath> {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(index, child)| match child {
                Content::Element(element) if element.name == name => {
                    Some(NodePath::root().child(index))
                }
                _ => None,
            })
            .collect()
    }

    /// Paths of all descendant elements, depth-first in document order
    pub fn descendants(&self) -> Vec<NodePath> {
        let mut out = Vec::new();
        self.collect_descendants(&NodePath::root(), &mut |_| true, &mut out);
        out
    }

    /// Paths of descendant elements named `name`, depth-first in document order
    pub fn descendants_named(&self, name: &str) -> Vec<NodePath> {
        let mut out = Vec::new();
        self.collect_descendants(
            &NodePath::root(),
            &mut |element| element.name == name,
            &mut out,
        );
        out
    }

    fn collect_descendants(
        &self,
        at: &NodePath,
        matches: &mut dyn FnMut(&Self) -> bool,
        out: &mut Vec<NodePath>,
    ) {
        for (index, child) in self.children.iter().enumerate() {
            if let Content::Element(element) = child {
                let path = at.child(index);
                if matches(element) {
                    out.push(path.clone());
                }
                element.collect_descendants(&path, matches, out);
            }
        }
    }

    pub fn get(&self, path: &NodePath) -> Option<&Self> {
        let mut current = self;
        for index in path.indices() {
            current = match current.children.get(*index) {
                Some(Content::Element(element)) => element,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn get_mut(&mut self, path: &NodePath) -> Option<&mut Self> {
        let mut current = self;
        for index in path.indices() {
            current = match current.children.get_mut(*index) {
                Some(Content::Element(element)) => element,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Detach the element at `path`. The root cannot be removed.
    pub fn remove(&mut self, path: &NodePath) -> Option<Self> {
        let (index, parent) = path.split_last()?;
        let parent = self.get_mut(&NodePath::from_indices(parent.to_vec()))?;
        if !matches!(parent.children.get(index), Some(Content::Element(_))) {
            return None;
        }
        match parent.children.remove(index) {
            Content::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Remove every element in `paths`, returning how many were detached.
    ///
    /// Paths are processed in reverse document order, so each removal only
    /// shifts siblings that have already been handled.
    pub fn remove_all(&mut self, mut paths: Vec<NodePath>) -> usize {
        paths.sort_unstable();
        paths.dedup();
        let mut removed = 0;
        for path in paths.iter().rev() {
            if self.remove(path).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Put `replacement` where the element at `path` was, returning the old one
    pub fn replace(&mut self, path: &NodePath, replacement: Self) -> Option<Self> {
        if path.is_root() {
            return Some(std::mem::replace(self, replacement));
        }
        let (index, parent) = path.split_last()?;
        let parent = self.get_mut(&NodePath::from_indices(parent.to_vec()))?;
        let slot = parent.children.get_mut(index)?;
        if !matches!(slot, Content::Element(_)) {
            return None;
        }
        match std::mem::replace(slot, Content::Element(replacement)) {
            Content::Element(old) => Some(old),
            _ => None,
        }
    }

    /// Rebuild the children as the child elements alone, stably ordered by name.
    ///
    /// Text and comments directly inside the element are dropped.
    pub fn sort_elements_by_name(&mut self) {
        let mut elements: Vec<Self> = std::mem::take(&mut self.children)
            .into_iter()
            .filter_map(|child| match child {
                Content::Element(element) => Some(element),
                _ => None,
            })
            .collect();
        elements.sort_by(|a, b| a.name.cmp(&b.name));
        self.children = elements.into_iter().map(Content::Element).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("Project")
            .with_child(
                Element::new("PropertyGroup")
                    .with_child(Element::new("AssemblyName").with_text("App"))
                    .with_child(Element::new("OutputType").with_text("Exe")),
            )
            .with_child(
                Element::new("ItemGroup")
                    .with_child(Element::new("Reference").with_attribute("Include", "System"))
                    .with_child(Element::new("Compile").with_attribute("Include", "a.cs")),
            )
    }

    #[test]
    fn test_descendants_are_document_ordered() {
        let root = sample();
        let names: Vec<String> = root
            .descendants()
            .iter()
            .filter_map(|path| root.get(path))
            .map(|element| element.name.clone())
            .collect();
        assert_eq!(
            names,
            [
                "PropertyGroup",
                "AssemblyName",
                "OutputType",
                "ItemGroup",
                "Reference",
                "Compile"
            ]
        );
    }

    #[test]
    fn test_parent_lookup() {
        let root = sample();
        let compile = root.descendants_named("Compile");
        let parent = compile
            .first()
            .and_then(NodePath::parent)
            .and_then(|path| root.get(&path).map(|e| e.name.clone()));
        assert_eq!(parent.as_deref(), Some("ItemGroup"));
        assert_eq!(NodePath::root().parent(), None);
    }

    #[test]
    fn test_remove_all_keeps_later_paths_valid() {
        let mut root = sample();
        let mut paths = root.descendants_named("AssemblyName");
        paths.extend(root.descendants_named("ItemGroup"));
        paths.extend(root.descendants_named("Compile"));
        assert_eq!(root.remove_all(paths), 3);
        assert_eq!(root.descendants().len(), 2);
        assert!(root.descendants_named("OutputType").len() == 1);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut root = sample();
        let paths = root.descendants_named("Reference");
        let path = paths.first().cloned().unwrap_or_default();
        let old = root.replace(&path, Element::new("PackageReference"));
        assert_eq!(old.map(|e| e.name), Some("Reference".to_string()));
        assert_eq!(root.descendants_named("PackageReference"), vec![path]);
    }

    #[test]
    fn test_text_concatenates_descendants() {
        let mut element = Element::new("A");
        element.children.push(Content::Text("x".into()));
        element.children.push(Content::Comment("ignored".into()));
        element
            .children
            .push(Content::Element(Element::new("B").with_text("y")));
        assert_eq!(element.text(), "xy");
        element.set_text("");
        assert!(element.children.is_empty());
    }

    #[test]
    fn test_sort_is_stable_by_name() {
        let mut group = Element::new("ItemGroup")
            .with_child(Element::new("Reference").with_attribute("Include", "b"))
            .with_child(Element::new("PackageReference").with_attribute("Include", "z"))
            .with_child(Element::new("Reference").with_attribute("Include", "a"));
        group.children.push(Content::Comment("dropped".into()));
        group.sort_elements_by_name();
        let order: Vec<(&str, Option<&str>)> = group
            .elements()
            .map(|e| (e.name.as_str(), e.attribute("Include")))
            .collect();
        assert_eq!(
            order,
            [
                ("PackageReference", Some("z")),
                ("Reference", Some("b")),
                ("Reference", Some("a"))
            ]
        );
        assert_eq!(group.children.len(), 3);
    }

    #[test]
    fn test_sort_keeps_container_attributes() {
        let mut group = Element::new("ItemGroup")
            .with_attribute("Condition", "'$(Configuration)' == 'Debug'")
            .with_child(Element::new("Reference").with_attribute("Include", "System"))
            .with_child(Element::new("PackageReference").with_attribute("Include", "Dapper"));
        group.children.push(Content::Text("stray".into()));
        group.sort_elements_by_name();

        assert_eq!(group.attribute("Condition"), Some("'$(Configuration)' == 'Debug'"));
        assert_eq!(group.attributes.len(), 1);
        assert!(group
            .children
            .iter()
            .all(|child| matches!(child, Content::Element(_))));
        assert_eq!(group.text(), "");
    }
}
