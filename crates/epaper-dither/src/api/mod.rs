//! Pipeline entry point: the [`Renderer`] builder and [`RenderError`].

mod builder;
mod error;

pub use builder::{RenderOutput, Renderer, PANEL_HEIGHT, PANEL_WIDTH};
pub use error::RenderError;
