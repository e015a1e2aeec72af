use nalgebra::{Point3, UnitQuaternion, Vector3};
use ur3_core::math::{midpoint, FrameRotation};

use crate::scene::{Node, NodeId, NodeKind, Scene};

use super::chain::LinkChain;

/// Where a hitbox sits relative to its segment.
enum Placement {
    /// Move along the local axes.
    Offset([f32; 3]),
    /// Center between two anchors, then a local nudge.
    Between(usize, usize, [f32; 3]),
}

struct HitboxLayout {
    name: &'static str,
    size: [f32; 3],
    /// Rotation about the local x axis, applied before placement.
    tilt: f32,
    placement: Placement,
    /// Owning segment. Hitboxes without one are kept detached.
    segment: Option<&'static str>,
}

const HITBOXES: [HitboxLayout; 5] = [
    HitboxLayout {
        name: "base",
        size: [0.11, 0.22, 0.13],
        tilt: 0.0,
        placement: Placement::Offset([0.0, 0.11, 0.0]),
        segment: Some("link0"),
    },
    HitboxLayout {
        name: "elbow",
        size: [0.115, 0.395, 0.095],
        tilt: std::f32::consts::FRAC_PI_2,
        placement: Placement::Between(2, 3, [0.0, 0.0, 0.0]),
        segment: Some("link1_1"),
    },
    HitboxLayout {
        name: "wrist",
        size: [0.095, 0.09, 0.29],
        tilt: 0.0,
        placement: Placement::Between(4, 5, [0.0, 0.0, 0.0]),
        segment: Some("link2"),
    },
    HitboxLayout {
        name: "wrist2",
        size: [0.08, 0.168, 0.095],
        tilt: 0.0,
        placement: Placement::Between(6, 7, [0.0, 0.005, 0.0]),
        segment: Some("link4"),
    },
    // TODO: Attach once the wrist 3 geometry has been measured on the mesh.
    HitboxLayout {
        name: "wrist3",
        size: [0.08, 0.085, 0.13],
        tilt: 0.0,
        placement: Placement::Offset([0.0, 0.01, -0.015]),
        segment: None,
    },
];

/// Placeholder collision volume.
#[derive(Clone, Debug, PartialEq)]
pub struct Hitbox {
    pub name: &'static str,
    pub node: NodeId,
    pub size: Vector3<f32>,
}

/// World space snapshot of a hitbox for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct HitboxVolume {
    pub name: &'static str,
    pub node: NodeId,
    pub center: Point3<f32>,
    pub orientation: UnitQuaternion<f32>,
    pub half_extents: Vector3<f32>,
    pub visible: bool,
    /// Whether the volume is attached to the arm.
    pub attached: bool,
}

/// Create the hitboxes and attach them to the skeleton.
pub(crate) fn build(scene: &mut Scene, chain: &LinkChain, visible: bool) -> Vec<Hitbox> {
    let anchors = chain.anchors();

    HITBOXES
        .iter()
        .map(|layout| {
            let size = Vector3::from(layout.size);

            let mut node = Node::new(format!("hitbox_{}", layout.name), NodeKind::Cuboid { size })
                .set_visible(visible);
            node.rotation = UnitQuaternion::about_x(layout.tilt);

            match layout.placement {
                Placement::Offset(offset) => node.translate(Vector3::from(offset)),
                Placement::Between(from, to, nudge) => {
                    node.position = midpoint(&anchors[from], &anchors[to]).coords;
                    node.translate(Vector3::from(nudge));
                }
            }

            let id = match layout.segment.and_then(|name| chain.segment(name)) {
                Some(segment) => scene.add_child(segment, node),
                None => scene.add_detached(node),
            };

            Hitbox {
                name: layout.name,
                node: id,
                size,
            }
        })
        .collect()
}

impl Hitbox {
    pub fn volume(&self, scene: &Scene) -> HitboxVolume {
        HitboxVolume {
            name: self.name,
            node: self.node,
            center: scene.world_position(self.node),
            orientation: scene.world_rotation(self.node),
            half_extents: self.size / 2.0,
            visible: scene.is_visible(self.node),
            attached: scene.node(self.node).parent().is_some(),
        }
    }
}
