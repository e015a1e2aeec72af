use nalgebra::Matrix4;

use crate::{
    config::Visibility,
    scene::{NodeId, NodeKind},
};

/// Drawable node in world space.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderItem {
    pub node: NodeId,
    pub name: String,
    pub kind: NodeKind,
    /// Node frame to world.
    pub transform: Matrix4<f32>,
    /// Colour as `0xRRGGBB`, `None` for asset nodes which carry their own.
    pub color: Option<u32>,
    pub opacity: f32,
}

/// Everything needed to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderFrame {
    /// Visible nodes, parents before children.
    pub items: Vec<RenderItem>,
    pub line_thickness: f32,
    pub visibility: Visibility,
}

pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame);
}
