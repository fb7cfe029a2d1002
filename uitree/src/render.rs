//! Seam for concrete rendering backends.

use crate::component::ComponentId;
use crate::error::TreeResult;
use crate::tree::Tree;

/// A concrete backend (terminal, DOM, canvas) that turns components into
/// output. The tree decides when to render; the backend decides how.
pub trait RenderBackend {
    fn render(&mut self, tree: &Tree, id: ComponentId);
}

impl Tree {
    /// Install the backend used by [`Tree::render`], returning the old one.
    pub fn set_backend(
        &mut self,
        backend: impl RenderBackend + 'static,
    ) -> Option<Box<dyn RenderBackend>> {
        self.backend.replace(Box::new(backend))
    }

    pub fn take_backend(&mut self) -> Option<Box<dyn RenderBackend>> {
        self.backend.take()
    }

    /// Render `id` and its structural subtree.
    ///
    /// Each component in the subtree is flowed pre-order, the backend (if
    /// any) renders `id`, and the whole subtree is marked generated.
    pub fn render(&mut self, id: ComponentId) -> TreeResult<()> {
        self.node(id)?;
        let subtree = self.structural_subtree(id);

        for &component in &subtree {
            self.flow(component);
        }

        if let Some(mut backend) = self.backend.take() {
            backend.render(self, id);
            self.backend.get_or_insert(backend);
        }

        for component in subtree {
            if let Some(node) = self.components.get_mut(&component) {
                node.generated = true;
            }
        }
        log::debug!("[render] rendered {}", id);
        Ok(())
    }

    /// `id` followed by its children, pre-order.
    pub(crate) fn structural_subtree(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            assert!(
                order.len() < self.components.len(),
                "structural hierarchy below {} is not a tree",
                id
            );
            order.push(current);
            stack.extend(self.get_children(current).iter().rev());
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use crate::{ComponentSpec, Tree};

    #[test]
    #[should_panic(expected = "is not a tree")]
    fn test_subtree_walk_rejects_loop() {
        let mut tree = Tree::new();
        let a = tree.create(ComponentSpec::new()).unwrap();
        let b = tree.create(ComponentSpec::new().container(a)).unwrap();
        tree.components.get_mut(&b).unwrap().children.push(a);

        tree.structural_subtree(a);
    }
}
