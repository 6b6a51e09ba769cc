//! Dashboard tool layout: grouping and relatedness.
//!
//! DESIGN
//! ======
//! The registry is a fixed, ordered table of tool descriptors. Grouping is a
//! pure function of that table and the focused tool id:
//!
//! - without a resolvable focus every tool lands in the group its size hint
//!   names (`Large` primary, `Medium` secondary, `Small` tertiary);
//! - with focus on tool F, F moves to primary and F's related tools are
//!   promoted to at least secondary;
//! - inside a group the focused tool comes first, then related tools, then
//!   the rest, each in registry order.
//!
//! Focus may name an id that is not in the registry. That is not an error;
//! it simply matches nothing.

mod registry;

use std::collections::HashSet;

pub use registry::{DASHBOARD_TOOLS, builtin_registry};

/// Size/priority hint carried by each descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToolSize {
    Large,
    Medium,
    Small,
}

impl ToolSize {
    fn default_group(self) -> Group {
        match self {
            Self::Large => Group::Primary,
            Self::Medium => Group::Secondary,
            Self::Small => Group::Tertiary,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Large => "large",
            Self::Medium => "medium",
            Self::Small => "small",
        }
    }
}

/// Static description of one dashboard tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub id: &'static str,
    pub title: &'static str,
    pub href: &'static str,
    pub icon: &'static str,
    /// Ids highlighted when this tool has focus.
    pub related: &'static [&'static str],
    pub size: ToolSize,
}

impl ToolDescriptor {
    #[must_use]
    pub fn lists_as_related(&self, id: &str) -> bool {
        self.related.contains(&id)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate tool id `{0}`")]
    DuplicateId(String),
    #[error("tool at position {0} has an empty id")]
    EmptyId(usize),
}

/// Ordered set of tool descriptors with unique ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registry {
    tools: Vec<ToolDescriptor>,
}

impl Registry {
    /// # Errors
    ///
    /// Rejects empty and duplicate ids.
    pub fn new(tools: impl IntoIterator<Item = ToolDescriptor>) -> Result<Self, RegistryError> {
        let tools: Vec<ToolDescriptor> = tools.into_iter().collect();
        let mut seen = HashSet::with_capacity(tools.len());
        for (position, tool) in tools.iter().enumerate() {
            if tool.id.is_empty() {
                return Err(RegistryError::EmptyId(position));
            }
            if !seen.insert(tool.id) {
                return Err(RegistryError::DuplicateId(tool.id.to_owned()));
            }
        }
        Ok(Self { tools })
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Group {
    Primary,
    Secondary,
    Tertiary,
}

/// Partition of the registry for display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutGroups {
    pub primary: Vec<ToolDescriptor>,
    pub secondary: Vec<ToolDescriptor>,
    pub tertiary: Vec<ToolDescriptor>,
}

impl LayoutGroups {
    #[must_use]
    pub fn group(&self, group: Group) -> &[ToolDescriptor] {
        match group {
            Group::Primary => &self.primary,
            Group::Secondary => &self.secondary,
            Group::Tertiary => &self.tertiary,
        }
    }

    /// Which group holds `id`, if any.
    #[must_use]
    pub fn group_of(&self, id: &str) -> Option<Group> {
        [Group::Primary, Group::Secondary, Group::Tertiary]
            .into_iter()
            .find(|g| self.group(*g).iter().any(|t| t.id == id))
    }

    /// All tools, primary first.
    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.primary.iter().chain(&self.secondary).chain(&self.tertiary)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.primary.len() + self.secondary.len() + self.tertiary.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition `registry` around an optional focused tool id.
#[must_use]
pub fn compute_groups(registry: &Registry, focus: Option<&str>) -> LayoutGroups {
    let focused = focus.and_then(|id| registry.get(id));

    // (group, rank within group, registry position)
    let mut placed: Vec<(Group, u8, usize, ToolDescriptor)> = registry
        .iter()
        .enumerate()
        .map(|(position, tool)| {
            let hinted = tool.size.default_group();
            let (group, rank) = match focused {
                Some(f) if f.id == tool.id => (Group::Primary, 0),
                Some(f) if f.lists_as_related(tool.id) => (hinted.min(Group::Secondary), 1),
                _ => (hinted, 2),
            };
            (group, rank, position, *tool)
        })
        .collect();
    placed.sort_by_key(|(group, rank, position, _)| (*group, *rank, *position));

    let mut groups = LayoutGroups::default();
    for (group, _, _, tool) in placed {
        match group {
            Group::Primary => groups.primary.push(tool),
            Group::Secondary => groups.secondary.push(tool),
            Group::Tertiary => groups.tertiary.push(tool),
        }
    }
    groups
}

/// `true` iff `focus` resolves to a registry entry listing `tool` as related.
#[must_use]
pub fn is_related(registry: &Registry, tool: &ToolDescriptor, focus: Option<&str>) -> bool {
    focus
        .and_then(|id| registry.get(id))
        .is_some_and(|f| f.lists_as_related(tool.id))
}

/// Registry plus the current focus.
#[derive(Clone, Debug)]
pub struct LayoutEngine {
    registry: Registry,
    focused: Option<String>,
}

impl LayoutEngine {
    /// New engine with no focus.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self { registry, focused: None }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn focused_tool(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Focus any id; unknown ids are kept and simply match nothing.
    pub fn set_focused_tool(&mut self, id: impl Into<String>) {
        let id = id.into();
        if self.registry.get(&id).is_none() {
            tracing::debug!(tool = %id, "focus set to unknown tool");
        }
        self.focused = Some(id);
    }

    pub fn clear_focus(&mut self) {
        self.focused = None;
    }

    #[must_use]
    pub fn groups(&self) -> LayoutGroups {
        compute_groups(&self.registry, self.focused_tool())
    }

    #[must_use]
    pub fn is_related(&self, tool: &ToolDescriptor) -> bool {
        is_related(&self.registry, tool, self.focused_tool())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
