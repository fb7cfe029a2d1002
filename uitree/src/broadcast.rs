//! Message broadcast through the controls hierarchy.
//!
//! A message is delivered to one component at a time:
//! 1. If the component has a handler for the message kind, the handler runs
//!    and the message goes no further unless the handler forwards it with
//!    [`Tree::broadcast_to_controls`].
//! 2. `Resize` without an override runs [`Tree::resize_handler`], which
//!    reflows and then forwards.
//! 3. Anything else is forwarded to every control, depth-first, in
//!    controls order.
//!
//! Forwarding iterates a snapshot of the controls list. Controls destroyed
//! by an earlier handler in the same pass are skipped; controls added
//! during the pass are not visited by it.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::component::ComponentId;
use crate::error::TreeResult;
use crate::tree::Tree;

/// Kind of a broadcast message, used to select handler overrides.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// The component (or the host surface) changed size.
    Resize,
    /// Application-defined message.
    Custom(String),
}

impl MessageKind {
    pub fn custom(name: impl Into<String>) -> Self {
        MessageKind::Custom(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            MessageKind::Resize => "resize",
            MessageKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A message with an optional payload shared by every recipient.
#[derive(Clone)]
pub struct Message {
    pub kind: MessageKind,
    payload: Option<Rc<dyn Any>>,
}

impl Message {
    pub fn new(kind: MessageKind) -> Self {
        Self {
            kind,
            payload: None,
        }
    }

    pub fn resize() -> Self {
        Self::new(MessageKind::Resize)
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self::new(MessageKind::custom(name))
    }

    pub fn with_payload<T: Any>(mut self, payload: T) -> Self {
        self.payload = Some(Rc::new(payload));
        self
    }

    /// The payload, if there is one of type `T`.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref()?.downcast_ref::<T>()
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("kind", &self.kind)
            .field("has_payload", &self.payload.is_some())
            .finish()
    }
}

/// Value a handler hands back to the caller of [`Tree::broadcast_message`].
#[derive(Clone)]
pub struct Reply(Rc<dyn Any>);

impl Reply {
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl PartialEq for Reply {
    /// Replies are equal when they share the same value.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Reply(..)")
    }
}

/// Conversion from a handler's return value into an optional [`Reply`].
pub trait IntoReply {
    fn into_reply(self) -> Option<Reply>;
}

impl IntoReply for () {
    fn into_reply(self) -> Option<Reply> {
        None
    }
}

impl IntoReply for Reply {
    fn into_reply(self) -> Option<Reply> {
        Some(self)
    }
}

impl IntoReply for Option<Reply> {
    fn into_reply(self) -> Option<Reply> {
        self
    }
}

/// Handler override for one message kind on one component.
pub type Handler = Rc<dyn Fn(&mut Tree, ComponentId, &Message) -> Option<Reply>>;

/// Wrap a closure into a [`Handler`].
pub(crate) fn into_handler<R: IntoReply>(
    handler: impl Fn(&mut Tree, ComponentId, &Message) -> R + 'static,
) -> Handler {
    Rc::new(move |tree, id, message| handler(tree, id, message).into_reply())
}

/// Outcome of delivering a message to one component.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchResult {
    /// A handler (override or the default resize handler) took the message,
    /// with whatever the override returned.
    Handled(Option<Reply>),
    /// No handler; the message was forwarded to the controls.
    Forwarded,
    /// The component does not exist.
    NotDelivered,
}

impl DispatchResult {
    pub fn is_handled(&self) -> bool {
        matches!(self, DispatchResult::Handled(_))
    }

    /// The reply returned by the handler, if any.
    pub fn reply(&self) -> Option<&Reply> {
        match self {
            DispatchResult::Handled(reply) => reply.as_ref(),
            _ => None,
        }
    }
}

impl Tree {
    /// Install a handler override for `kind` on `id`, replacing any
    /// previous one.
    pub fn set_handler<R: IntoReply>(
        &mut self,
        id: ComponentId,
        kind: MessageKind,
        handler: impl Fn(&mut Tree, ComponentId, &Message) -> R + 'static,
    ) -> TreeResult<()> {
        self.node_mut(id)?.handlers.insert(kind, into_handler(handler));
        Ok(())
    }

    /// Remove the handler override for `kind`. Returns whether there was one.
    pub fn remove_handler(&mut self, id: ComponentId, kind: &MessageKind) -> bool {
        self.components
            .get_mut(&id)
            .is_some_and(|c| c.handlers.remove(kind).is_some())
    }

    /// Deliver `message` to `id`, letting a handler intercept it.
    ///
    /// An intercepting handler's return value comes back in
    /// [`DispatchResult::Handled`].
    pub fn broadcast_message(&mut self, id: ComponentId, message: &Message) -> DispatchResult {
        let Some(component) = self.components.get(&id) else {
            return DispatchResult::NotDelivered;
        };

        if let Some(handler) = component.handlers.get(&message.kind).cloned() {
            log::trace!("[broadcast] {} handled by {}", message.kind, id);
            return DispatchResult::Handled(handler(self, id, message));
        }

        if message.kind == MessageKind::Resize {
            self.resize_handler(id);
            return DispatchResult::Handled(None);
        }

        self.broadcast_to_controls(id, message);
        DispatchResult::Forwarded
    }

    /// Deliver `message` to every control of `id`, in controls order.
    pub fn broadcast_to_controls(&mut self, id: ComponentId, message: &Message) {
        let controls = self.get_controls(id).to_vec();
        for control in controls {
            if self.contains(control) {
                self.broadcast_message(control, message);
            }
        }
    }

    /// Notify `id` that it was resized.
    pub fn resized(&mut self, id: ComponentId) -> DispatchResult {
        self.broadcast_message(id, &Message::resize())
    }

    /// Default resize handling: reflow this component, then pass the resize
    /// on to its controls.
    ///
    /// Overrides that still want the default behaviour can call this.
    pub fn resize_handler(&mut self, id: ComponentId) {
        self.reflow(id);
        self.broadcast_to_controls(id, &Message::resize());
    }

    /// Deliver `message` to every root component registered with the
    /// default owner. Returns how many roots received it.
    pub fn broadcast_to_ownerless(&mut self, message: &Message) -> usize {
        let roots: Vec<ComponentId> = self
            .get(self.master)
            .map(|m| m.owned.clone())
            .unwrap_or_default()
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(|c| c.container.is_none()))
            .collect();

        log::debug!(
            "[broadcast] {} to {} ownerless roots",
            message.kind,
            roots.len()
        );

        let mut delivered = 0;
        for root in roots {
            if self.broadcast_message(root, message) != DispatchResult::NotDelivered {
                delivered += 1;
            }
        }
        delivered
    }
}
