use std::fmt;

use super::{ComponentId, DestroyCallback};
use crate::broadcast::{into_handler, Handler, IntoReply, Message, MessageKind};
use crate::tree::Tree;

/// Declarative description of a component and its sub-components.
///
/// `chrome` entries are framework-internal parts owned by the new component
/// itself, so they can be found by name (e.g. as the control parent).
/// `components` entries are client children; they are owned by the instance
/// owner and redirected to the control parent once it is discovered.
#[derive(Default)]
pub struct ComponentSpec {
    pub name: Option<String>,
    pub owner: Option<ComponentId>,
    pub container: Option<ComponentId>,
    pub control_parent_name: Option<String>,
    pub layout_kind: String,
    pub is_chrome: bool,
    pub prepend: bool,
    pub chrome: Vec<ComponentSpec>,
    pub components: Vec<ComponentSpec>,
    pub handlers: Vec<(MessageKind, Handler)>,
    pub on_destroy: Vec<DestroyCallback>,
}

impl ComponentSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a spec with a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new().name(name)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn owner(mut self, owner: ComponentId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn container(mut self, container: ComponentId) -> Self {
        self.container = Some(container);
        self
    }

    pub fn control_parent_name(mut self, name: impl Into<String>) -> Self {
        self.control_parent_name = Some(name.into());
        self
    }

    pub fn layout_kind(mut self, kind: impl Into<String>) -> Self {
        self.layout_kind = kind.into();
        self
    }

    /// Mark this component as framework-internal.
    pub fn as_chrome(mut self) -> Self {
        self.is_chrome = true;
        self
    }

    /// Insert new children at the head instead of the tail.
    pub fn prepend(mut self, prepend: bool) -> Self {
        self.prepend = prepend;
        self
    }

    /// Add a chrome part, owned by the component being described.
    pub fn chrome(mut self, spec: ComponentSpec) -> Self {
        self.chrome.push(spec.as_chrome());
        self
    }

    /// Add a client component.
    pub fn child(mut self, spec: ComponentSpec) -> Self {
        self.components.push(spec);
        self
    }

    pub fn children(mut self, specs: impl IntoIterator<Item = ComponentSpec>) -> Self {
        self.components.extend(specs);
        self
    }

    /// Intercept messages of `kind`. The handler replaces forwarding to
    /// controls; call [`Tree::broadcast_to_controls`] from it to continue.
    pub fn handler<R: IntoReply>(
        mut self,
        kind: MessageKind,
        handler: impl Fn(&mut Tree, ComponentId, &Message) -> R + 'static,
    ) -> Self {
        self.handlers.push((kind, into_handler(handler)));
        self
    }

    pub fn on_destroy(mut self, callback: impl FnOnce(&Tree, ComponentId) + 'static) -> Self {
        self.on_destroy.push(Box::new(callback));
        self
    }
}

impl fmt::Debug for ComponentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentSpec")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("container", &self.container)
            .field("control_parent_name", &self.control_parent_name)
            .field("layout_kind", &self.layout_kind)
            .field("is_chrome", &self.is_chrome)
            .field("prepend", &self.prepend)
            .field("chrome", &self.chrome)
            .field("components", &self.components)
            .finish_non_exhaustive()
    }
}
