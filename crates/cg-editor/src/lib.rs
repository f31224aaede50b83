pub mod canvas;
pub mod component;
pub mod extensions;
pub mod host;
pub mod input;
pub mod shortcuts;
pub mod tools;
pub mod viewport;

pub use canvas::{Canvas, CanvasState};
pub use component::{AcceptDrops, DropPolicy, DropWith, RejectDrops};
pub use extensions::CanvasExtension;
pub use extensions::collision::CollisionExtension;
pub use extensions::connections::ConnectionExtension;
pub use host::{AppModule, CLICK_RADIUS, Host, RoutedEvent};
pub use input::{InputEvent, KeyEvent, Modifiers, PointerEvent};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::ToolKind;
pub use viewport::ViewTransform;
