pub mod config;
pub mod data;
pub mod error;
pub mod geometry;
pub mod id;
pub mod model;
pub mod registry;

pub use config::{CollisionRules, ContainerInsets, GridConfig, ZoomConfig};
pub use data::{AppData, ConnectionData, ElementData, ElementRecord, GridData, ModuleData};
pub use error::{GridError, Result};
pub use geometry::{Position, Rect, Rgb, Size, Vector};
pub use id::{ElementId, IdAllocator};
pub use model::*;
pub use registry::{ComponentTemplate, ConnectionTemplate, ElementRegistry, ElementTemplate};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
