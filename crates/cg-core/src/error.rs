//! Error taxonomy.
//!
//! Only programmer and configuration mistakes are errors. Routine negative
//! outcomes of the interaction state machine (collision, out of bounds, no
//! drop target, edge released in empty space) are plain `bool`/no-op branches.

use crate::id::ElementId;
use crate::model::ElementType;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    // ── Configuration ──
    /// No template registered for `(type, label)`.
    UnregisteredElement {
        element_type: ElementType,
        label: String,
    },
    /// The connection extension needs at least one connection template.
    NoConnectionType,
    /// A module was addressed by a name nobody registered.
    UnregisteredModule(String),
    /// Configuration or data could not be decoded.
    InvalidData(String),

    // ── Invariant violations ──
    UnknownElement(ElementId),
    /// The element is not attached anywhere in the scene.
    Detached(ElementId),
    NotAComponent(ElementId),
    NotAConnection(ElementId),
    /// The component was configured without a container.
    NoContainer(ElementId),
    /// Nesting `element` into `container` would make it its own ancestor.
    NestingCycle {
        element: ElementId,
        container: ElementId,
    },
    /// The resize edge was read while the component was not resizing.
    NotResizing(ElementId),
    /// A port reference does not resolve to a port on a live component.
    OrphanPort { component: ElementId, index: usize },
    /// Every positive `u32` id has been handed out.
    IdsExhausted,
}

impl GridError {
    /// Configuration errors are fixed by changing setup, not call sites.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnregisteredElement { .. }
                | Self::NoConnectionType
                | Self::UnregisteredModule(_)
                | Self::InvalidData(_)
        )
    }
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnregisteredElement {
                element_type,
                label,
            } => write!(
                f,
                "No element type registered for type \"{}\" and label \"{}\"",
                element_type.as_str(),
                label
            ),
            Self::NoConnectionType => write!(f, "No connection types registered"),
            Self::UnregisteredModule(name) => write!(f, "Module \"{name}\" is not registered"),
            Self::InvalidData(msg) => write!(f, "Invalid data: {msg}"),
            Self::UnknownElement(id) => write!(f, "Element {id} does not exist"),
            Self::Detached(id) => write!(f, "Element {id} has no parent element"),
            Self::NotAComponent(id) => write!(f, "Element {id} is not a component"),
            Self::NotAConnection(id) => write!(f, "Element {id} is not a connection"),
            Self::NoContainer(id) => write!(f, "Component {id} has no container"),
            Self::NestingCycle { element, container } => write!(
                f,
                "Cannot place {element} inside the container of {container}"
            ),
            Self::NotResizing(id) => write!(f, "Component {id} is not resizing"),
            Self::OrphanPort { component, index } => {
                write!(f, "No component owns port {index} of {component}")
            }
            Self::IdsExhausted => write!(f, "No element ids left"),
        }
    }
}

impl std::error::Error for GridError {}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidData(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GridError>;
