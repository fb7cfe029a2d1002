//! Error types for tree mutations.

use thiserror::Error;

use crate::component::ComponentId;

/// Errors returned by tree operations that address components by id.
///
/// Ordinary absence (no layout, no control parent, no handler, a control
/// that is not in a list) is never an error; those report `None` or a
/// no-op instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The id does not name a live component.
    #[error("Component {0} does not exist")]
    UnknownComponent(ComponentId),

    /// Attaching would make a component its own ancestor.
    #[error("Component {child} cannot be contained by {container}, which is itself or one of its descendants")]
    ContainmentCycle {
        /// The component being attached.
        child: ComponentId,
        /// The requested container.
        container: ComponentId,
    },

    /// The default owner cannot be destroyed or placed in a container.
    #[error("The default owner cannot be destroyed or contained")]
    DefaultOwner,
}

pub type TreeResult<T> = Result<T, TreeError>;
