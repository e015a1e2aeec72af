use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};

use crate::scene::{NodeId, Scene};

/// Frame in which the pivot point is expressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointReference {
    /// Same frame as the node position, that is the parent frame.
    Parent,
    /// World space.
    World,
}

/// Rigid rotation of a node about a pivot point.
///
/// The rotation is incremental: applying it rotates the node further from
/// wherever it currently is. Both the node position and its own orientation
/// are rotated, so the node keeps its shape relative to the pivot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PivotRotation {
    /// Point the node rotates about.
    pub point: Point3<f32>,
    /// Rotation axis.
    pub axis: Unit<Vector3<f32>>,
    /// Rotation angle in radians, right-hand rule about the axis.
    pub theta: f32,
    /// Frame of the pivot point.
    pub reference: PointReference,
}

impl PivotRotation {
    /// Construct a rotation with the pivot in the parent frame.
    pub fn parent(point: Point3<f32>, axis: Unit<Vector3<f32>>, theta: f32) -> Self {
        Self {
            point,
            axis,
            theta,
            reference: PointReference::Parent,
        }
    }

    /// Construct a rotation with the pivot in world space.
    pub fn world(point: Point3<f32>, axis: Unit<Vector3<f32>>, theta: f32) -> Self {
        Self {
            point,
            axis,
            theta,
            reference: PointReference::World,
        }
    }

    /// Rotation that undoes this one.
    pub fn inverse(&self) -> Self {
        Self {
            theta: -self.theta,
            ..*self
        }
    }

    /// Apply the rotation to a node in place.
    pub fn apply(&self, scene: &mut Scene, node: NodeId) -> crate::Result {
        let parent = scene.node(node).parent();
        let mut position = Point3::from(scene.node(node).position);

        if self.reference == PointReference::World {
            if let Some(parent) = parent {
                position = scene.local_to_world(parent, &position);
            }
        }

        position = ur3_core::math::rotate_point_about(&position, &self.point, &self.axis, self.theta);

        if self.reference == PointReference::World {
            if let Some(parent) = parent {
                position = scene.world_to_local(parent, &position)?;
            }
        }

        let target = scene.node_mut(node);
        target.position = position.coords;
        target.rotation *= UnitQuaternion::from_axis_angle(&self.axis, self.theta);

        Ok(())
    }
}

impl std::fmt::Display for PivotRotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} pivot [{:.3}, {:.3}, {:.3}] axis [{:.3}, {:.3}, {:.3}] {:.3}rad",
            self.reference,
            self.point.x,
            self.point.y,
            self.point.z,
            self.axis.x,
            self.axis.y,
            self.axis.z,
            self.theta
        )
    }
}

/// Rotate a node by `theta` about `axis` through `point`.
///
/// When `point_is_world` is set the pivot is taken in world space and the
/// node position is converted through its parent frame.
pub fn rotate_about_point(
    scene: &mut Scene,
    node: NodeId,
    point: Point3<f32>,
    axis: Unit<Vector3<f32>>,
    theta: f32,
    point_is_world: bool,
) -> crate::Result {
    let rotation = if point_is_world {
        PivotRotation::world(point, axis, theta)
    } else {
        PivotRotation::parent(point, axis, theta)
    };

    rotation.apply(scene, node)
}
