//! Maps of a placement run: mailboxes coloured by load, laid out by name
//! where possible, joined by hardware and application edges.

pub mod attr;
pub mod graph;
pub mod position;
pub mod render;

pub use graph::{MapGraph, MapOptions};
pub use position::{GridPosition, Layout};
pub use render::{GraphvizRenderer, RenderError, Renderer};
