//! Terminal output.
//!
//! - **render**: prompt-line redisplay and log/redraw arbitration

pub mod render;

pub use render::Renderer;
