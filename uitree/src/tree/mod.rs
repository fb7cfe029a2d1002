//! Component arena and ownership base.
//!
//! The [`Tree`] owns every [`Component`] and is the only way to mutate one.
//! Two relations are kept over the same node set:
//! - containment (`container` / `controls`): logical composition
//! - parentage (`parent` / `children`): structural placement after
//!   control-parent redirection
//!
//! A default owner ("master") is created with every tree. Components built
//! without an owner are registered with it so that system-wide broadcasts
//! can still reach them; see [`Tree::broadcast_to_ownerless`].

mod containment;
mod lifecycle;

use std::collections::HashMap;

use crate::component::{Component, ComponentId};
use crate::config::TreeConfig;
use crate::error::{TreeError, TreeResult};
use crate::layout::LayoutFactory;
use crate::render::RenderBackend;

pub struct Tree {
    pub(crate) components: HashMap<ComponentId, Component>,
    pub(crate) master: ComponentId,
    pub(crate) config: TreeConfig,
    pub(crate) layouts: HashMap<String, LayoutFactory>,
    pub(crate) backend: Option<Box<dyn RenderBackend>>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        let master = ComponentId::next();
        let mut component = Component::new(master, config.control_parent_name.clone());
        component.name = Some(config.master_name.clone());

        let mut components = HashMap::new();
        components.insert(master, component);

        log::debug!("[tree] created with default owner {}", master);

        Self {
            components,
            master,
            config,
            layouts: HashMap::new(),
            backend: None,
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// The default owner for ownerless components.
    pub fn master(&self) -> ComponentId {
        self.master
    }

    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(&id)
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.components.contains_key(&id)
    }

    /// Number of live components, the default owner included.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    // =========================================================================
    // Ownership
    // =========================================================================

    /// Find a component owned by `owner` with the given name.
    ///
    /// When several owned components share a name the most recently created
    /// one wins.
    pub fn find_named(&self, owner: ComponentId, name: &str) -> Option<ComponentId> {
        let owner = self.components.get(&owner)?;
        owner.owned.iter().rev().copied().find(|id| {
            self.components
                .get(id)
                .is_some_and(|c| c.name.as_deref() == Some(name))
        })
    }

    /// The owner that client components declared inside `id` are given.
    ///
    /// Components owned by a real owner pass that owner on, so that nested
    /// declarations are all reachable by name from the same place.
    pub(crate) fn instance_owner(&self, id: ComponentId) -> ComponentId {
        match self.components.get(&id).and_then(|c| c.owner) {
            Some(owner) if owner != self.master => owner,
            _ => id,
        }
    }

    pub(crate) fn register_owned(&mut self, owner: ComponentId, id: ComponentId) {
        if let Some(owner) = self.components.get_mut(&owner) {
            owner.owned.push(id);
        }
    }

    pub(crate) fn unregister_owned(&mut self, owner: ComponentId, id: ComponentId) {
        if let Some(owner) = self.components.get_mut(&owner) {
            owner.owned.retain(|&o| o != id);
        }
    }

    // =========================================================================
    // Internal access
    // =========================================================================

    pub(crate) fn node(&self, id: ComponentId) -> TreeResult<&Component> {
        self.components
            .get(&id)
            .ok_or(TreeError::UnknownComponent(id))
    }

    pub(crate) fn node_mut(&mut self, id: ComponentId) -> TreeResult<&mut Component> {
        self.components
            .get_mut(&id)
            .ok_or(TreeError::UnknownComponent(id))
    }

    /// Checks that every component sits in at most one `controls` list and
    /// one `children` list, and that those lists agree with its own links.
    #[cfg(debug_assertions)]
    pub(crate) fn debug_check_membership(&self, id: ComponentId) {
        let Some(component) = self.components.get(&id) else {
            return;
        };

        let in_controls: Vec<ComponentId> = self
            .components
            .values()
            .filter(|c| c.controls.contains(&id))
            .map(|c| c.id)
            .collect();
        let in_children: Vec<ComponentId> = self
            .components
            .values()
            .filter(|c| c.children.contains(&id))
            .map(|c| c.id)
            .collect();

        debug_assert!(
            in_controls.len() <= 1,
            "{} appears in the controls of {:?}",
            id,
            in_controls
        );
        debug_assert!(
            in_children.len() <= 1,
            "{} appears in the children of {:?}",
            id,
            in_children
        );
        debug_assert_eq!(
            in_controls.first().copied(),
            component.container,
            "{} container does not match controls membership",
            id
        );
    }

    #[cfg(not(debug_assertions))]
    pub(crate) fn debug_check_membership(&self, _id: ComponentId) {}
}
