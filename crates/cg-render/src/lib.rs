pub mod hit;
pub mod project;
pub mod surface;

pub use hit::{HitTarget, hit_test};
pub use project::{Projector, ViewParams};
pub use surface::{BoxMeasure, HeadlessSurface, Measure, Surface, SurfaceNode};
