//! Containment engine: containers, controls, parents and children.
//!
//! `set_container` drives `add_control`, which drives `add_child`, which
//! drives the derived `parent`. Parent reassignment removes the component
//! from its old parent's `children`.

use std::mem;

use super::Tree;
use crate::component::ComponentId;
use crate::error::{TreeError, TreeResult};

impl Tree {
    // =========================================================================
    // Containment
    // =========================================================================

    /// Change the logical container of `id`.
    ///
    /// Always runs the full detach-then-attach sequence, even when `container`
    /// is the current container.
    pub fn set_container(
        &mut self,
        id: ComponentId,
        container: Option<ComponentId>,
    ) -> TreeResult<()> {
        if id == self.master && container.is_some() {
            return Err(TreeError::DefaultOwner);
        }
        self.node(id)?;
        if let Some(container) = container {
            self.node(container)?;
            if self.would_cycle(id, container) {
                return Err(TreeError::ContainmentCycle {
                    child: id,
                    container,
                });
            }
        }

        let old = mem::replace(&mut self.node_mut(id)?.container, container);
        log::trace!("[containment] {} container {:?} -> {:?}", id, old, container);
        self.container_changed(id, old, container);
        self.debug_check_membership(id);
        Ok(())
    }

    pub(super) fn container_changed(
        &mut self,
        id: ComponentId,
        old: Option<ComponentId>,
        new: Option<ComponentId>,
    ) {
        if let Some(old) = old {
            self.detach_control(old, id);
        }
        if let Some(new) = new {
            self.attach_control(new, id);
        }
    }

    /// True when `container`, or the node `id` would actually be attached
    /// to, is `id` or sits below it in either hierarchy.
    fn would_cycle(&self, id: ComponentId, container: ComponentId) -> bool {
        if self.is_descendant_of(container, id) {
            return true;
        }
        if self.is_descendant_of(self.resolve_attachment_point(container), id) {
            return true;
        }
        let mut current = Some(container);
        let mut steps = 0;
        while let Some(c) = current {
            if c == id {
                return true;
            }
            steps += 1;
            if steps > self.components.len() {
                break;
            }
            current = self.components.get(&c).and_then(|c| c.container);
        }
        false
    }

    /// Add `control` to the controls of `container`.
    ///
    /// This is the step [`Tree::set_container`] takes; calling it directly
    /// reassigns the control's container so both relations stay in sync.
    pub fn add_control(&mut self, container: ComponentId, control: ComponentId) -> TreeResult<()> {
        self.set_container(control, Some(container))
    }

    /// Remove `control` from the controls of `container` and from its
    /// structural parent.
    ///
    /// Returns the index it had in `controls`, or `None` if it was not there.
    pub fn remove_control(
        &mut self,
        container: ComponentId,
        control: ComponentId,
    ) -> Option<usize> {
        let index = self.detach_control(container, control)?;
        if let Some(c) = self.components.get_mut(&control) {
            if c.container == Some(container) {
                c.container = None;
            }
        }
        self.debug_check_membership(control);
        Some(index)
    }

    fn attach_control(&mut self, container: ComponentId, control: ComponentId) {
        let Some(node) = self.components.get_mut(&container) else {
            return;
        };
        debug_assert!(
            !node.controls.contains(&control),
            "{} is already a control of {}",
            control,
            container
        );
        node.controls.push(control);
        self.add_child(container, control);
    }

    fn detach_control(&mut self, container: ComponentId, control: ComponentId) -> Option<usize> {
        let index = self.index_of_control(container, control)?;
        self.set_parent(control, None);
        if let Some(node) = self.components.get_mut(&container) {
            node.controls.remove(index);
        }
        Some(index)
    }

    // =========================================================================
    // Parentage
    // =========================================================================

    /// Follow control-parent links from `id` to the node that actually
    /// receives children.
    pub fn resolve_attachment_point(&self, id: ComponentId) -> ComponentId {
        let mut current = id;
        let mut steps = 0;
        loop {
            let next = self.components.get(&current).and_then(|c| c.control_parent);
            let Some(next) =
                next.filter(|next| *next != current && self.components.contains_key(next))
            else {
                break;
            };
            steps += 1;
            if steps > self.components.len() {
                log::warn!("[containment] control-parent chain from {} loops", id);
                break;
            }
            current = next;
        }
        current
    }

    /// Place `child` structurally under `parent`, or under the node its
    /// control-parent chain resolves to.
    pub fn add_child(&mut self, parent: ComponentId, child: ComponentId) {
        let target = self.resolve_attachment_point(parent);
        if target != parent {
            log::trace!(
                "[containment] {} redirected from {} to {}",
                child,
                parent,
                target
            );
        }
        if !self.components.contains_key(&target) || !self.components.contains_key(&child) {
            return;
        }

        self.set_parent(child, Some(target));
        // Re-adding to the same parent moves rather than duplicates.
        self.remove_child(target, child);
        if let Some(node) = self.components.get_mut(&target) {
            if node.prepend {
                node.children.insert(0, child);
            } else {
                node.children.push(child);
            }
        }
    }

    /// Remove `child` from the children of `parent`.
    ///
    /// Leaves the child's `container` and `parent` untouched.
    pub fn remove_child(&mut self, parent: ComponentId, child: ComponentId) -> Option<usize> {
        let node = self.components.get_mut(&parent)?;
        let index = node.children.iter().position(|&c| c == child)?;
        node.children.remove(index);
        Some(index)
    }

    pub(crate) fn set_parent(&mut self, id: ComponentId, parent: Option<ComponentId>) {
        let Some(node) = self.components.get_mut(&id) else {
            return;
        };
        let old = mem::replace(&mut node.parent, parent);
        if let Some(old) = old {
            if Some(old) != parent {
                self.remove_child(old, id);
            }
        }
    }

    // =========================================================================
    // Control parent
    // =========================================================================

    /// Resolve the control parent from the owned component named by
    /// `control_parent_name`, keeping the previous value if none matches.
    pub fn discover_control_parent(&mut self, id: ComponentId) {
        let Some(name) = self.components.get(&id).map(|c| c.control_parent_name.clone()) else {
            return;
        };
        if let Some(found) = self.find_named(id, &name) {
            if let Some(node) = self.components.get_mut(&id) {
                node.control_parent = Some(found);
            }
        }
    }

    /// Assign the control parent directly.
    ///
    /// Only affects children added afterwards.
    pub fn set_control_parent(
        &mut self,
        id: ComponentId,
        control_parent: Option<ComponentId>,
    ) -> TreeResult<()> {
        if let Some(target) = control_parent {
            self.node(target)?;
        }
        self.node_mut(id)?.control_parent = control_parent;
        Ok(())
    }

    /// Change the control-parent name and rediscover.
    pub fn set_control_parent_name(
        &mut self,
        id: ComponentId,
        name: impl Into<String>,
    ) -> TreeResult<()> {
        self.node_mut(id)?.control_parent_name = name.into();
        self.discover_control_parent(id);
        Ok(())
    }

    pub fn set_prepend(&mut self, id: ComponentId, prepend: bool) -> TreeResult<()> {
        self.node_mut(id)?.prepend = prepend;
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// A component counts as its own descendant.
    pub fn is_descendant_of(&self, id: ComponentId, ancestor: ComponentId) -> bool {
        let mut current = Some(id);
        let mut steps = 0;
        while let Some(c) = current {
            if c == ancestor {
                return self.components.contains_key(&ancestor);
            }
            steps += 1;
            if steps > self.components.len() {
                break;
            }
            current = self.components.get(&c).and_then(|c| c.parent);
        }
        false
    }

    pub fn get_controls(&self, id: ComponentId) -> &[ComponentId] {
        self.components
            .get(&id)
            .map(|c| c.controls.as_slice())
            .unwrap_or(&[])
    }

    /// Controls that are not chrome, in controls order.
    pub fn get_client_controls(&self, id: ComponentId) -> Vec<ComponentId> {
        self.get_controls(id)
            .iter()
            .copied()
            .filter(|c| self.components.get(c).is_some_and(|c| !c.is_chrome))
            .collect()
    }

    pub fn get_children(&self, id: ComponentId) -> &[ComponentId] {
        self.components
            .get(&id)
            .map(|c| c.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn index_of_control(&self, container: ComponentId, control: ComponentId) -> Option<usize> {
        self.get_controls(container).iter().position(|&c| c == control)
    }

    pub fn index_of_client_control(
        &self,
        container: ComponentId,
        control: ComponentId,
    ) -> Option<usize> {
        self.get_client_controls(container)
            .iter()
            .position(|&c| c == control)
    }

    pub fn index_of_child(&self, parent: ComponentId, child: ComponentId) -> Option<usize> {
        self.get_children(parent).iter().position(|&c| c == child)
    }

    pub fn index_in_container(&self, id: ComponentId) -> Option<usize> {
        let container = self.components.get(&id)?.container?;
        self.index_of_control(container, id)
    }

    pub fn client_index_in_container(&self, id: ComponentId) -> Option<usize> {
        let container = self.components.get(&id)?.container?;
        self.index_of_client_control(container, id)
    }
}
