//! Layout binding.
//!
//! A component holds at most one layout collaborator, selected by its
//! `layout_kind`. Kinds resolve through the tree's own registry first, then
//! through kinds registered process-wide with `inventory`:
//!
//! ```ignore
//! inventory::submit! {
//!     uitree::LayoutRegistration::new("fit", |target| Box::new(FitLayout::new(target)))
//! }
//! ```
//!
//! The collaborator's geometry is its own business; the tree only decides
//! when it is built, flowed, reflowed and destroyed.

use std::rc::Rc;

use crate::component::ComponentId;
use crate::error::TreeResult;
use crate::tree::Tree;

/// An object that arranges the children of one component.
///
/// Built by a factory that receives the target component's id.
pub trait Layout {
    /// Arrangement pass run while the component renders.
    fn flow(&mut self, _tree: &Tree) {}

    /// Re-arrangement pass run after a resize.
    fn reflow(&mut self, _tree: &Tree) {}

    /// Called once before the layout is dropped.
    fn destroy(&mut self, _tree: &Tree) {}
}

pub type LayoutFactory = Rc<dyn Fn(ComponentId) -> Box<dyn Layout>>;

/// Process-wide layout kind registration entry for inventory.
pub struct LayoutRegistration {
    /// Kind name matched against `layout_kind`.
    pub kind: &'static str,
    /// Factory building the layout for a target component.
    pub factory: fn(ComponentId) -> Box<dyn Layout>,
}

impl LayoutRegistration {
    pub const fn new(kind: &'static str, factory: fn(ComponentId) -> Box<dyn Layout>) -> Self {
        Self { kind, factory }
    }
}

inventory::collect!(LayoutRegistration);

/// Get all process-wide layout kinds.
pub fn registered_layouts() -> impl Iterator<Item = &'static LayoutRegistration> {
    inventory::iter::<LayoutRegistration>()
}

impl Tree {
    /// Register a layout kind for this tree. Replaces an earlier
    /// registration of the same kind and shadows process-wide ones.
    pub fn register_layout(
        &mut self,
        kind: impl Into<String>,
        factory: impl Fn(ComponentId) -> Box<dyn Layout> + 'static,
    ) {
        self.layouts.insert(kind.into(), Rc::new(factory));
    }

    /// Whether `kind` resolves to a layout in this tree.
    pub fn has_layout_kind(&self, kind: &str) -> bool {
        self.layouts.contains_key(kind) || registered_layouts().any(|r| r.kind == kind)
    }

    fn build_layout(&self, kind: &str, target: ComponentId) -> Option<Box<dyn Layout>> {
        if kind.is_empty() {
            return None;
        }
        if let Some(factory) = self.layouts.get(kind) {
            return Some(factory(target));
        }
        if let Some(registration) = registered_layouts().find(|r| r.kind == kind) {
            return Some((registration.factory)(target));
        }
        log::debug!("[layout] unknown layout kind '{}' for {}", kind, target);
        None
    }

    pub fn set_layout_kind(&mut self, id: ComponentId, kind: impl Into<String>) -> TreeResult<()> {
        self.node_mut(id)?.layout_kind = kind.into();
        self.layout_kind_changed(id);
        Ok(())
    }

    /// Replace the layout of `id` with one built from its current kind,
    /// re-rendering if the component has already been rendered.
    pub fn layout_kind_changed(&mut self, id: ComponentId) {
        if let Some(mut old) = self.components.get_mut(&id).and_then(|c| c.layout.take()) {
            old.destroy(self);
        }

        let Some(kind) = self.components.get(&id).map(|c| c.layout_kind.clone()) else {
            return;
        };
        let layout = self.build_layout(&kind, id);
        let Some(node) = self.components.get_mut(&id) else {
            return;
        };
        node.layout = layout;

        if node.generated {
            if let Err(e) = self.render(id) {
                log::warn!("[layout] re-render of {} failed: {}", id, e);
            }
        }
    }

    /// Run the layout's arrangement pass, if a layout is attached.
    pub fn flow(&mut self, id: ComponentId) {
        self.with_layout(id, |layout, tree| layout.flow(tree));
    }

    /// Run the layout's re-arrangement pass, if a layout is attached.
    pub fn reflow(&mut self, id: ComponentId) {
        self.with_layout(id, |layout, tree| layout.reflow(tree));
    }

    fn with_layout(&mut self, id: ComponentId, f: impl FnOnce(&mut dyn Layout, &Tree)) {
        let Some(mut layout) = self.components.get_mut(&id).and_then(|c| c.layout.take()) else {
            return;
        };
        f(layout.as_mut(), &*self);
        if let Some(node) = self.components.get_mut(&id) {
            node.layout.get_or_insert(layout);
        }
    }
}
