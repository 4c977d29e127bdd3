#![allow(clippy::too_many_arguments, clippy::collapsible_if, clippy::collapsible_else_if)]
// Software renderer: BSP walk, walls, floors and ceilings, sprites and the
// 8-bit framebuffer they are drawn into.

mod bsp;
pub mod data;
mod draw;
mod plane;
mod segs;
pub mod sky;
mod things;
pub mod video;
pub mod view;

#[cfg(test)]
mod testutil;

pub use video::{player_palette, rgba_bytes, Framebuffer};
pub use view::{FrameStats, Renderer, ViewWindow};
