use nalgebra::{Point3, Unit, Vector3};
use serde::Deserialize;
use ur3_core::{math::axis_between, Joint};

use crate::scene::{Node, NodeId, NodeKind, Scene};

/// Tool marker cube edge length.
const MARKER_SIZE: f32 = 0.02;

/// Fixed link dimensions of the arm in meters.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    /// Height of the shoulder above the base (d0).
    pub base_height: f32,
    /// Shoulder to elbow length (a1).
    pub upper_arm: f32,
    /// Elbow to wrist length (a2).
    pub forearm: f32,
    /// Wrist 1 to wrist 2 offset, used sideways and downwards (d3).
    pub wrist_offset: f32,
    /// Wrist 3 to tool flange offset (d5).
    pub tool_offset: f32,
    /// Sideways offset of the shoulder socket.
    pub shoulder_offset: f32,
    /// Step back of the elbow socket towards the center line.
    pub socket_offset: f32,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            base_height: 0.15185,
            upper_arm: 0.24365,
            forearm: 0.21325,
            wrist_offset: 0.08535,
            tool_offset: 0.0819,
            shoulder_offset: 0.12,
            socket_offset: 0.093,
        }
    }
}

impl Dimensions {
    fn validate(&self) -> crate::Result {
        for (name, value) in [
            ("base_height", self.base_height),
            ("upper_arm", self.upper_arm),
            ("forearm", self.forearm),
            ("wrist_offset", self.wrist_offset),
            ("tool_offset", self.tool_offset),
            ("shoulder_offset", self.shoulder_offset),
            ("socket_offset", self.socket_offset),
        ] {
            if !value.is_finite() {
                return Err(crate::Error::InvalidDimension { name, value });
            }
        }

        Ok(())
    }

    /// Skeleton anchor points, base first.
    ///
    /// Each anchor is the previous one moved along a single principal axis.
    pub fn anchors(&self) -> [Point3<f32>; 9] {
        let p0 = Point3::origin();
        let p1 = p0 + Vector3::y() * self.base_height;
        let p2 = p1 + Vector3::x() * self.shoulder_offset;
        let p3 = p2 + Vector3::z() * self.upper_arm;
        let p4 = p3 - Vector3::x() * self.socket_offset;
        let p5 = p4 + Vector3::z() * self.forearm;
        let p6 = p5 + Vector3::x() * self.wrist_offset;
        let p7 = p6 - Vector3::y() * self.wrist_offset;
        let p8 = p7 + Vector3::x() * self.tool_offset;

        [p0, p1, p2, p3, p4, p5, p6, p7, p8]
    }
}

/// Skeleton segment names with their anchor indices.
///
/// Link 1 bends around the shoulder socket and is drawn as three segments.
const SEGMENTS: [(&str, usize, usize); 8] = [
    ("link0", 0, 1),
    ("link1_1", 1, 2),
    ("link1_2", 2, 3),
    ("link1_3", 3, 4),
    ("link2", 4, 5),
    ("link3", 5, 6),
    ("link4", 6, 7),
    ("link5", 7, 8),
];

/// Per joint: moved segment, axis anchor pair and pivot anchor.
const PIVOTS: [(Joint, usize, (usize, usize), usize); 5] = [
    (Joint::Shoulder, 1, (1, 2), 1),
    (Joint::Elbow, 4, (3, 4), 4),
    (Joint::Wrist1, 5, (5, 6), 5),
    (Joint::Wrist2, 6, (6, 7), 6),
    (Joint::Wrist3, 7, (7, 8), 7),
];

/// Link rotated by a joint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointLink {
    /// Node to rotate.
    pub node: NodeId,
    /// Pivot in the frame of the node's parent.
    pub pivot: Point3<f32>,
    /// Rotation axis in the frame of the node's parent.
    pub axis: Unit<Vector3<f32>>,
}

/// Kinematic skeleton of the arm.
///
/// Segments are chained parent to child, so rotating a segment carries every
/// segment after it. All segments are created with their geometry in rest
/// coordinates and an identity transform, which makes every frame coincide
/// with the chain root at rest.
#[derive(Clone, Debug)]
pub struct LinkChain {
    anchors: [Point3<f32>; 9],
    segments: [NodeId; 8],
    marker: NodeId,
    joints: [JointLink; 6],
}

impl LinkChain {
    /// Build the skeleton below `parent`, or as a scene root when `None`.
    ///
    /// Fails without touching the scene when a dimension is not finite or
    /// when the dimensions collapse a joint axis.
    pub fn build(
        scene: &mut Scene,
        parent: Option<NodeId>,
        dimensions: &Dimensions,
    ) -> crate::Result<Self> {
        dimensions.validate()?;

        let anchors = dimensions.anchors();

        let mut axes = [Vector3::y_axis(); 6];
        for (joint, _, (from, to), _) in PIVOTS {
            axes[joint.index()] = axis_between(&anchors[from], &anchors[to])
                .ok_or(crate::Error::DegenerateGeometry { joint })?;
        }

        let mut segments = Vec::with_capacity(SEGMENTS.len());
        for (name, origin, end) in SEGMENTS {
            let node = Node::new(
                name,
                NodeKind::Segment {
                    origin: anchors[origin],
                    end: anchors[end],
                },
            );

            let id = match (segments.last(), parent) {
                (Some(previous), _) => scene.add_child(*previous, node),
                (None, Some(parent)) => scene.add_child(parent, node),
                (None, None) => scene.add_root(node),
            };
            segments.push(id);
        }

        let segments: [NodeId; 8] = std::array::from_fn(|idx| segments[idx]);

        let marker = scene.add_child(
            segments[7],
            Node::new(
                "tool",
                NodeKind::Cuboid {
                    size: Vector3::repeat(MARKER_SIZE),
                },
            )
            .set_position(anchors[8].coords),
        );

        let mut joints = [JointLink {
            node: segments[0],
            pivot: anchors[0],
            axis: Vector3::y_axis(),
        }; 6];
        for (joint, segment, _, pivot) in PIVOTS {
            joints[joint.index()] = JointLink {
                node: segments[segment],
                pivot: anchors[pivot],
                axis: axes[joint.index()],
            };
        }

        log::debug!(
            "Link chain built with {} segments, tool at [{:.3}, {:.3}, {:.3}]",
            segments.len(),
            anchors[8].x,
            anchors[8].y,
            anchors[8].z
        );

        Ok(Self {
            anchors,
            segments,
            marker,
            joints,
        })
    }

    /// Node, pivot and axis of a joint.
    ///
    /// The base entry names the chain root with its own vertical axis; the
    /// base rotates that frame directly rather than about the pivot.
    #[inline]
    pub fn joint(&self, joint: Joint) -> &JointLink {
        &self.joints[joint.index()]
    }

    /// First segment, parent of the whole skeleton.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.segments[0]
    }

    #[inline]
    pub fn segments(&self) -> &[NodeId] {
        &self.segments
    }

    /// Segment by name.
    pub fn segment(&self, name: &str) -> Option<NodeId> {
        SEGMENTS
            .iter()
            .position(|(segment, _, _)| *segment == name)
            .map(|idx| self.segments[idx])
    }

    /// Tool marker at the end of the chain.
    #[inline]
    pub fn marker(&self) -> NodeId {
        self.marker
    }

    /// Anchor points at rest.
    #[inline]
    pub fn anchors(&self) -> &[Point3<f32>; 9] {
        &self.anchors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_anchors() {
        let anchors = Dimensions::default().anchors();

        assert!((anchors[1] - Point3::new(0.0, 0.15185, 0.0)).norm() < EPSILON);
        assert!((anchors[4] - Point3::new(0.027, 0.15185, 0.24365)).norm() < EPSILON);
        assert!((anchors[8] - Point3::new(0.19425, 0.0665, 0.4569)).norm() < EPSILON);
    }

    #[test]
    fn test_unit_axes() {
        let mut scene = Scene::new();
        let chain = LinkChain::build(&mut scene, None, &Dimensions::default()).unwrap();

        for joint in Joint::ALL {
            assert!((chain.joint(joint).axis.norm() - 1.0).abs() < EPSILON);
        }

        assert_eq!(scene.len(), 9);
        assert_eq!(scene.roots(), &[chain.root()]);
    }

    #[test]
    fn test_joint_table() {
        let mut scene = Scene::new();
        let chain = LinkChain::build(&mut scene, None, &Dimensions::default()).unwrap();
        let anchors = chain.anchors();

        let shoulder = chain.joint(Joint::Shoulder);
        assert_eq!(shoulder.node, chain.segment("link1_1").unwrap());
        assert_eq!(shoulder.pivot, anchors[1]);
        assert!((shoulder.axis.into_inner() - Vector3::new(-1.0, 0.0, 0.0)).norm() < EPSILON);

        let elbow = chain.joint(Joint::Elbow);
        assert_eq!(elbow.node, chain.segment("link2").unwrap());
        assert_eq!(elbow.pivot, anchors[4]);
        assert!((elbow.axis.into_inner() - Vector3::new(1.0, 0.0, 0.0)).norm() < EPSILON);

        let wrist2 = chain.joint(Joint::Wrist2);
        assert!((wrist2.axis.into_inner() - Vector3::new(0.0, 1.0, 0.0)).norm() < EPSILON);

        assert_eq!(chain.joint(Joint::Base).node, chain.root());
    }

    #[test]
    fn test_segments_chained() {
        let mut scene = Scene::new();
        let chain = LinkChain::build(&mut scene, None, &Dimensions::default()).unwrap();

        for pair in chain.segments().windows(2) {
            assert_eq!(scene.node(pair[1]).parent(), Some(pair[0]));
        }
        assert_eq!(scene.node(chain.marker()).parent(), Some(chain.segments()[7]));
    }

    #[test]
    fn test_degenerate_geometry() {
        let mut scene = Scene::new();
        let dimensions = Dimensions {
            shoulder_offset: 0.0,
            ..Default::default()
        };

        let result = LinkChain::build(&mut scene, None, &dimensions);

        assert!(matches!(
            result,
            Err(crate::Error::DegenerateGeometry {
                joint: Joint::Shoulder
            })
        ));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_invalid_dimension() {
        let mut scene = Scene::new();
        let dimensions = Dimensions {
            forearm: f32::NAN,
            ..Default::default()
        };

        assert!(matches!(
            LinkChain::build(&mut scene, None, &dimensions),
            Err(crate::Error::InvalidDimension {
                name: "forearm",
                ..
            })
        ));
    }
}
