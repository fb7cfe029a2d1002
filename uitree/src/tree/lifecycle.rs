//! Component creation and two-phase destruction.

use std::mem;

use super::Tree;
use crate::component::{Component, ComponentId, ComponentSpec};
use crate::error::{TreeError, TreeResult};

impl Tree {
    // =========================================================================
    // Creation
    // =========================================================================

    /// Create a component, and everything its spec declares, from `spec`.
    ///
    /// Order of events:
    /// 1. chrome parts are created, owned and contained by the new component
    /// 2. the control parent is discovered among them
    /// 3. client components are created and redirected to the control parent
    /// 4. the component attaches to its container, if any
    /// 5. the initial layout is instantiated
    pub fn create(&mut self, spec: ComponentSpec) -> TreeResult<ComponentId> {
        self.validate_spec(&spec)?;
        Ok(self.instantiate(spec, None, None))
    }

    /// Create `specs` as components owned and contained by `id`, then
    /// rediscover its control parent.
    pub fn create_components(
        &mut self,
        id: ComponentId,
        specs: Vec<ComponentSpec>,
    ) -> TreeResult<Vec<ComponentId>> {
        self.node(id)?;
        for spec in &specs {
            self.validate_spec(spec)?;
        }

        let created = specs
            .into_iter()
            .map(|spec| self.instantiate(spec, Some(id), Some(id)))
            .collect();
        self.discover_control_parent(id);
        Ok(created)
    }

    fn validate_spec(&self, spec: &ComponentSpec) -> TreeResult<()> {
        if let Some(owner) = spec.owner {
            self.node(owner)?;
        }
        if let Some(container) = spec.container {
            self.node(container)?;
        }
        for nested in spec.chrome.iter().chain(&spec.components) {
            self.validate_spec(nested)?;
        }
        Ok(())
    }

    fn instantiate(
        &mut self,
        spec: ComponentSpec,
        default_owner: Option<ComponentId>,
        default_container: Option<ComponentId>,
    ) -> ComponentId {
        let ComponentSpec {
            name,
            owner,
            container,
            control_parent_name,
            layout_kind,
            is_chrome,
            prepend,
            chrome,
            components,
            handlers,
            on_destroy,
        } = spec;

        let id = ComponentId::next();
        let owner = owner.or(default_owner).or_else(|| {
            self.config.register_ownerless.then_some(self.master)
        });

        let control_parent_name =
            control_parent_name.unwrap_or_else(|| self.config.control_parent_name.clone());
        let mut component = Component::new(id, control_parent_name);
        component.name = name;
        component.owner = owner;
        component.is_chrome = is_chrome;
        component.prepend = prepend;
        component.layout_kind = layout_kind;
        component.handlers = handlers.into_iter().collect();
        component.on_destroy = on_destroy;

        log::debug!(
            "[lifecycle] creating {} ({:?}) owner={:?}",
            id,
            component.name,
            owner
        );
        self.components.insert(id, component);
        if let Some(owner) = owner {
            self.register_owned(owner, id);
        }

        for part in chrome {
            self.instantiate(part, Some(id), Some(id));
        }
        self.discover_control_parent(id);

        if !components.is_empty() {
            let client_owner = self.instance_owner(id);
            for client in components {
                self.instantiate(client, Some(client_owner), Some(id));
            }
            self.discover_control_parent(id);
        }

        let container = container.or(default_container);
        if let Some(node) = self.components.get_mut(&id) {
            node.container = container;
        }
        self.container_changed(id, None, container);
        self.debug_check_membership(id);

        self.layout_kind_changed(id);
        id
    }

    // =========================================================================
    // Destruction
    // =========================================================================

    /// Destroy `id` and the components it is responsible for.
    ///
    /// Destroy callbacks run first, while the subtree is intact. Client
    /// controls are then destroyed, the component leaves its container, and
    /// the base pass destroys owned components and remaining chrome controls
    /// before the layout is released and the component is unregistered from
    /// its owner.
    pub fn destroy(&mut self, id: ComponentId) -> TreeResult<()> {
        if id == self.master {
            return Err(TreeError::DefaultOwner);
        }
        let callbacks = mem::take(&mut self.node_mut(id)?.on_destroy);
        log::debug!("[lifecycle] destroying {}", id);
        for callback in callbacks {
            callback(self, id);
        }

        // Client pass
        self.destroy_client_controls(id);
        self.set_container(id, None)?;

        // Base pass
        self.destroy_owned(id);
        let remaining = self.get_controls(id).to_vec();
        self.destroy_each(&remaining);
        for child in self.get_children(id).to_vec() {
            self.set_parent(child, None);
        }

        if let Some(mut layout) = self.components.get_mut(&id).and_then(|c| c.layout.take()) {
            layout.destroy(self);
        }

        let Some(component) = self.components.remove(&id) else {
            return Ok(());
        };
        if let Some(owner) = component.owner {
            self.unregister_owned(owner, id);
        }
        for other in self.components.values_mut() {
            if other.control_parent == Some(id) {
                other.control_parent = None;
            }
        }
        Ok(())
    }

    /// Destroy every non-chrome control of `id`.
    pub fn destroy_client_controls(&mut self, id: ComponentId) {
        let clients = self.get_client_controls(id);
        self.destroy_each(&clients);
    }

    fn destroy_owned(&mut self, id: ComponentId) {
        let owned = self.get(id).map(|c| c.owned.clone()).unwrap_or_default();
        self.destroy_each(&owned);
    }

    fn destroy_each(&mut self, ids: &[ComponentId]) {
        for &id in ids {
            // An earlier destroy in the batch may already have taken it.
            if !self.contains(id) {
                continue;
            }
            if let Err(e) = self.destroy(id) {
                log::warn!("[lifecycle] failed to destroy {}: {}", id, e);
            }
        }
    }
}
