mod spec;

pub use spec::ComponentSpec;

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::broadcast::{Handler, MessageKind};
use crate::layout::Layout;
use crate::tree::Tree;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Unique identifier for a component.
///
/// Ids are never reused, so an id held after its component was destroyed
/// simply stops resolving.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ComponentId(u64);

impl ComponentId {
    pub(crate) fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Callback run when a component starts being destroyed.
pub type DestroyCallback = Box<dyn FnOnce(&Tree, ComponentId)>;

/// A node in the component tree.
///
/// Components live in a [`Tree`] and are only mutated through it; this
/// record exposes read access to the containment state.
pub struct Component {
    // Identity and ownership
    pub(crate) id: ComponentId,
    pub(crate) name: Option<String>,
    pub(crate) owner: Option<ComponentId>,
    pub(crate) owned: Vec<ComponentId>,

    // Containment
    pub(crate) container: Option<ComponentId>,
    pub(crate) parent: Option<ComponentId>,
    pub(crate) control_parent_name: String,
    pub(crate) control_parent: Option<ComponentId>,
    pub(crate) controls: Vec<ComponentId>,
    pub(crate) children: Vec<ComponentId>,
    pub(crate) is_chrome: bool,
    pub(crate) prepend: bool,

    // Layout and rendering
    pub(crate) layout_kind: String,
    pub(crate) layout: Option<Box<dyn Layout>>,
    pub(crate) generated: bool,

    // Dispatch
    pub(crate) handlers: HashMap<MessageKind, Handler>,
    pub(crate) on_destroy: Vec<DestroyCallback>,
}

impl Component {
    pub(crate) fn new(id: ComponentId, control_parent_name: String) -> Self {
        Self {
            id,
            name: None,
            owner: None,
            owned: Vec::new(),
            container: None,
            parent: None,
            control_parent_name,
            control_parent: None,
            controls: Vec::new(),
            children: Vec::new(),
            is_chrome: false,
            prepend: false,
            layout_kind: String::new(),
            layout: None,
            generated: false,
            handlers: HashMap::new(),
            on_destroy: Vec::new(),
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Owner used for named lookup and lifecycle notification.
    pub fn owner(&self) -> Option<ComponentId> {
        self.owner
    }

    /// Components owned by this one, in creation order.
    pub fn owned(&self) -> &[ComponentId] {
        &self.owned
    }

    /// Logical container.
    pub fn container(&self) -> Option<ComponentId> {
        self.container
    }

    /// Structural parent after control-parent redirection.
    pub fn parent(&self) -> Option<ComponentId> {
        self.parent
    }

    pub fn control_parent_name(&self) -> &str {
        &self.control_parent_name
    }

    pub fn control_parent(&self) -> Option<ComponentId> {
        self.control_parent
    }

    pub fn controls(&self) -> &[ComponentId] {
        &self.controls
    }

    pub fn children(&self) -> &[ComponentId] {
        &self.children
    }

    pub fn is_chrome(&self) -> bool {
        self.is_chrome
    }

    pub fn prepend(&self) -> bool {
        self.prepend
    }

    pub fn layout_kind(&self) -> &str {
        &self.layout_kind
    }

    pub fn has_layout(&self) -> bool {
        self.layout.is_some()
    }

    /// Whether this component has completed at least one render pass.
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Whether a handler override is installed for `kind`.
    pub fn handles(&self, kind: &MessageKind) -> bool {
        self.handlers.contains_key(kind)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("container", &self.container)
            .field("parent", &self.parent)
            .field("control_parent", &self.control_parent)
            .field("controls", &self.controls)
            .field("children", &self.children)
            .field("is_chrome", &self.is_chrome)
            .field("layout_kind", &self.layout_kind)
            .field("generated", &self.generated)
            .finish_non_exhaustive()
    }
}
