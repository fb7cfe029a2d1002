pub mod broadcast;
pub mod component;
pub mod config;
pub mod error;
pub mod layout;
pub mod render;
pub mod tree;

pub use broadcast::{DispatchResult, Handler, IntoReply, Message, MessageKind, Reply};
pub use component::{Component, ComponentId, ComponentSpec, DestroyCallback};
pub use config::TreeConfig;
pub use error::{TreeError, TreeResult};
pub use layout::{registered_layouts, Layout, LayoutFactory, LayoutRegistration};
pub use render::RenderBackend;
pub use tree::Tree;
