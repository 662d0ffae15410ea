//! Element tree storage and operations
//!
//! Elements live once in a flat table keyed by ID. Containers keep an ordered
//! list of child IDs and every element records its parent, so lookups are
//! direct and a node can never be owned by two parents.

use crate::{
    Element, ElementId, ElementPatch, ElementSpec, ModelError, MoveError, Result, SelectOption,
    StyleDefaults, StyleRecord,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

/// Sentinel naming the top-level element sequence
pub const ROOT_CONTAINER: &str = "root";

/// Alternate top-level sentinel used by the workspace drop zone
pub const WORKSPACE_CONTAINER: &str = "workspace";

/// A sequence of elements that can be the source or target of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerRef {
    /// The top-level sequence
    Root,
    /// The children of a row or column
    Element(ElementId),
}

impl ContainerRef {
    /// Parse `"root"`, `"workspace"` or an element ID
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ROOT_CONTAINER | WORKSPACE_CONTAINER => Some(ContainerRef::Root),
            other => ElementId::parse(other).map(ContainerRef::Element),
        }
    }

    fn element_id(&self) -> Option<ElementId> {
        match self {
            ContainerRef::Root => None,
            ContainerRef::Element(id) => Some(*id),
        }
    }
}

impl From<ElementId> for ContainerRef {
    fn from(id: ElementId) -> Self {
        ContainerRef::Element(id)
    }
}

impl std::fmt::Display for ContainerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerRef::Root => f.write_str(ROOT_CONTAINER),
            ContainerRef::Element(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for ContainerRef {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| MoveError::UnknownContainer(s.to_string()).into())
    }
}

impl Serialize for ContainerRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContainerRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The template's element tree
#[derive(Debug, Clone, PartialEq)]
pub struct ElementTree {
    pub(crate) nodes: HashMap<ElementId, Element>,
    /// Top-level elements in rendering order
    pub(crate) roots: Vec<ElementId>,
    /// Counter value for the next allocated ID
    pub(crate) next_id: u64,
}

impl ElementTree {
    /// Create an empty tree whose first element will be `element-1`
    pub fn new() -> Self {
        Self::with_next_id(1)
    }

    /// Create an empty tree continuing from an existing counter
    pub fn with_next_id(next_id: u64) -> Self {
        Self {
            nodes: HashMap::new(),
            roots: Vec::new(),
            next_id: next_id.max(1),
        }
    }

    /// Counter value that the next added element will use
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Total number of elements at every depth
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level element IDs in order
    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Find an element at any depth
    pub fn find_element_by_id(&self, id: ElementId) -> Option<&Element> {
        self.get(id)
    }

    /// Ordered child IDs of a container
    pub fn children_of(&self, container: ContainerRef) -> Result<&[ElementId]> {
        match container {
            ContainerRef::Root => Ok(&self.roots),
            ContainerRef::Element(id) => {
                let element = self.nodes.get(&id).ok_or(ModelError::ElementNotFound(id))?;
                if !element.is_container() {
                    return Err(ModelError::NotAContainer {
                        id,
                        element_type: element.element_type(),
                    });
                }
                Ok(element.children())
            }
        }
    }

    /// Depth of an element; top-level elements have depth 1
    pub fn depth(&self, id: ElementId) -> Option<usize> {
        let mut depth = 1;
        let mut current = self.nodes.get(&id)?;
        while let Some(parent) = current.parent() {
            current = self.nodes.get(&parent)?;
            depth += 1;
        }
        Some(depth)
    }

    /// Check whether `id` sits somewhere below `ancestor`
    pub fn is_descendant_of(&self, id: ElementId, ancestor: ElementId) -> bool {
        let mut current = self.nodes.get(&id).and_then(|el| el.parent());
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.nodes.get(&parent).and_then(|el| el.parent());
        }
        false
    }

    /// The element and all of its descendants, in pre-order
    pub fn subtree_ids(&self, id: ElementId) -> Vec<ElementId> {
        let mut ids = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(element) = self.nodes.get(&current) {
                ids.push(current);
                stack.extend(element.children().iter().rev().copied());
            }
        }
        ids
    }

    /// Iterate over every element in document reading order
    pub fn iter_preorder(&self) -> PreorderIter<'_> {
        PreorderIter {
            tree: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a new element at the end of `target` (a row/column) or at the top level.
    ///
    /// Fails without consuming an ID when `target` is unknown or not a container.
    pub fn add_element(
        &mut self,
        spec: ElementSpec,
        target: Option<ElementId>,
        defaults: &StyleDefaults,
    ) -> Result<ElementId> {
        let id = ElementId::from_raw(self.next_id);

        match target {
            Some(target_id) => {
                let parent = self
                    .nodes
                    .get_mut(&target_id)
                    .ok_or(ModelError::ElementNotFound(target_id))?;
                if !parent.is_container() {
                    return Err(ModelError::NotAContainer {
                        id: target_id,
                        element_type: parent.element_type(),
                    });
                }
                parent.children_mut().push(id);
            }
            None => self.roots.push(id),
        }

        let mut element = Element::new(id, spec, StyleRecord::element_default(defaults));
        element.set_parent(target);
        self.nodes.insert(id, element);
        self.next_id += 1;
        Ok(id)
    }

    /// Merge a property patch into one element
    pub fn update_element_properties(&mut self, id: ElementId, patch: &ElementPatch) -> Result<()> {
        let element = self.nodes.get_mut(&id).ok_or(ModelError::ElementNotFound(id))?;
        element.apply_patch(patch)
    }

    /// Merge a style patch into one element's style record
    pub fn update_element_styles(&mut self, id: ElementId, patch: &StyleRecord) -> Result<()> {
        let element = self.nodes.get_mut(&id).ok_or(ModelError::ElementNotFound(id))?;
        element.styles.apply_patch(patch);
        Ok(())
    }

    /// Mutable access to a select element's option list
    pub fn select_options_mut(&mut self, id: ElementId) -> Result<&mut Vec<SelectOption>> {
        let element = self.nodes.get_mut(&id).ok_or(ModelError::ElementNotFound(id))?;
        element.options_mut()
    }

    /// Remove an element and everything below it.
    ///
    /// Returns the removed IDs in pre-order, starting with `id`.
    pub fn remove_element(&mut self, id: ElementId) -> Result<Vec<ElementId>> {
        let parent = self
            .nodes
            .get(&id)
            .ok_or(ModelError::ElementNotFound(id))?
            .parent();

        let removed = self.subtree_ids(id);
        match parent.and_then(|parent_id| self.nodes.get_mut(&parent_id)) {
            Some(parent) => parent.children_mut().retain(|child| *child != id),
            None => self.roots.retain(|root| *root != id),
        }
        for removed_id in &removed {
            self.nodes.remove(removed_id);
        }
        Ok(removed)
    }

    /// Move the element at `source_index` of `source` to `dest_index` of `dest`.
    ///
    /// Both containers and both indices are validated before anything changes.
    /// For a reorder within one container, `dest_index` addresses the sequence
    /// after the element has been taken out.
    pub fn move_element(
        &mut self,
        source: ContainerRef,
        dest: ContainerRef,
        source_index: usize,
        dest_index: usize,
    ) -> Result<ElementId> {
        let source_len = self.move_endpoint(source)?.len();
        let dest_len = self.move_endpoint(dest)?.len();

        let moving = *self
            .move_endpoint(source)?
            .get(source_index)
            .ok_or(MoveError::SourceIndexOutOfBounds {
                index: source_index,
                len: source_len,
            })?;

        let max_dest = if source == dest { source_len - 1 } else { dest_len };
        if dest_index > max_dest {
            return Err(MoveError::DestinationIndexOutOfBounds {
                index: dest_index,
                max: max_dest,
            }
            .into());
        }

        if let Some(dest_id) = dest.element_id() {
            if dest_id == moving || self.is_descendant_of(dest_id, moving) {
                return Err(MoveError::IntoOwnDescendant(moving).into());
            }
        }

        self.sequence_mut(source)?.remove(source_index);
        self.sequence_mut(dest)?.insert(dest_index, moving);
        if let Some(element) = self.nodes.get_mut(&moving) {
            element.set_parent(dest.element_id());
        }
        Ok(moving)
    }

    fn move_endpoint(&self, container: ContainerRef) -> Result<&[ElementId]> {
        match container {
            ContainerRef::Root => Ok(&self.roots),
            ContainerRef::Element(id) => {
                let element = self
                    .nodes
                    .get(&id)
                    .ok_or_else(|| MoveError::UnknownContainer(id.to_string()))?;
                if !element.is_container() {
                    return Err(MoveError::NotAContainer(id).into());
                }
                Ok(element.children())
            }
        }
    }

    fn sequence_mut(&mut self, container: ContainerRef) -> Result<&mut Vec<ElementId>> {
        match container {
            ContainerRef::Root => Ok(&mut self.roots),
            ContainerRef::Element(id) => self
                .nodes
                .get_mut(&id)
                .map(|element| element.children_mut())
                .ok_or_else(|| MoveError::UnknownContainer(id.to_string()).into()),
        }
    }

    // =========================================================================
    // Integrity
    // =========================================================================

    /// Verify the structural invariants of the tree:
    /// every element is reachable exactly once, parent links match the
    /// containing sequence, only containers have children, and every ID is
    /// below the allocation counter.
    pub fn check_integrity(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let mut stack: Vec<(ElementId, Option<ElementId>)> =
            self.roots.iter().map(|id| (*id, None)).collect();

        while let Some((id, expected_parent)) = stack.pop() {
            let element = self
                .nodes
                .get(&id)
                .ok_or_else(|| ModelError::MalformedTree(format!("dangling reference to {}", id)))?;
            if !seen.insert(id) {
                return Err(ModelError::MalformedTree(format!("{} appears more than once", id)));
            }
            if element.parent() != expected_parent {
                return Err(ModelError::MalformedTree(format!("{} has a stale parent link", id)));
            }
            if !element.is_container() && !element.children().is_empty() {
                return Err(ModelError::MalformedTree(format!(
                    "{} is a {} but has children",
                    id,
                    element.element_type()
                )));
            }
            if id.raw() >= self.next_id {
                return Err(ModelError::MalformedTree(format!(
                    "{} is not below the id counter {}",
                    id, self.next_id
                )));
            }
            stack.extend(element.children().iter().map(|child| (*child, Some(id))));
        }

        if seen.len() != self.nodes.len() {
            return Err(ModelError::MalformedTree(format!(
                "{} elements are unreachable",
                self.nodes.len() - seen.len()
            )));
        }
        Ok(())
    }
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order iterator over a tree
pub struct PreorderIter<'a> {
    tree: &'a ElementTree,
    stack: Vec<ElementId>,
}

impl<'a> Iterator for PreorderIter<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Some(element) = self.tree.nodes.get(&id) {
                self.stack.extend(element.children().iter().rev().copied());
                return Some(element);
            }
        }
        None
    }
}
