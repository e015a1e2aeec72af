//! Scene arena.
//!
//! All nodes live in a single vector owned by the [`Scene`] and refer to each
//! other through [`NodeId`] indices. A node stores its transform relative to
//! its parent; world transforms are derived on demand by walking the
//! ancestors. Nodes are never removed, so an id stays valid for the lifetime
//! of the scene that issued it.

use nalgebra::{Matrix4, Point3, Translation3, Unit, UnitQuaternion, Vector3};

/// Stable handle to a node in a [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Transform only.
    Group,
    /// Skeleton line between two points in the node's local frame.
    Segment {
        origin: Point3<f32>,
        end: Point3<f32>,
    },
    /// Box volume centered on the node origin.
    Cuboid { size: Vector3<f32> },
    /// Imported asset node, optionally referencing an asset mesh.
    Mesh { mesh: Option<usize> },
}

#[derive(Clone, Debug)]
pub struct Node {
    name: String,
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Position relative to the parent frame.
    pub position: Vector3<f32>,
    /// Orientation relative to the parent frame.
    pub rotation: UnitQuaternion<f32>,
    pub scale: Vector3<f32>,
    pub visible: bool,
}

impl Node {
    /// Construct a new node at the parent origin.
    pub fn new(name: impl ToString, kind: NodeKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            parent: None,
            children: Vec::new(),
            position: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            visible: true,
        }
    }

    pub fn set_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    pub fn set_rotation(mut self, rotation: UnitQuaternion<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn set_scale(mut self, scale: Vector3<f32>) -> Self {
        self.scale = scale;
        self
    }

    pub fn set_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Move the node along its own axes.
    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.position += self.rotation * offset;
    }

    /// Rotate the node about an axis expressed in its own frame.
    pub fn rotate_on_axis(&mut self, axis: &Unit<Vector3<f32>>, angle: f32) {
        self.rotation *= UnitQuaternion::from_axis_angle(axis, angle);
    }

    /// Transform from the node frame into the parent frame.
    pub fn local_matrix(&self) -> Matrix4<f32> {
        Translation3::from(self.position).to_homogeneous()
            * self.rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, parent: Option<NodeId>, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());

        node.parent = parent;
        node.children.clear();
        self.nodes.push(node);

        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }

        id
    }

    /// Insert a node at the top of the scene hierarchy.
    pub fn add_root(&mut self, node: Node) -> NodeId {
        let id = self.insert(None, node);
        self.roots.push(id);
        id
    }

    /// Insert a node as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        self.insert(Some(parent), node)
    }

    /// Insert a node that belongs to no hierarchy.
    ///
    /// Detached nodes are owned by the scene but are never reached from its
    /// roots, so they are never rendered.
    pub fn add_detached(&mut self, node: Node) -> NodeId {
        self.insert(None, node)
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    #[inline]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk the subtree below `root` in pre-order, `root` included.
    pub fn descendants(&self, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![root];

        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.node(id).children.iter().rev());
            Some(id)
        })
    }

    /// Find the first node in the subtree of `root` with the given name.
    pub fn find_by_name(&self, root: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(root).find(|id| self.node(*id).name == name)
    }

    #[inline]
    pub fn local_matrix(&self, id: NodeId) -> Matrix4<f32> {
        self.node(id).local_matrix()
    }

    /// Transform from the node frame into world space.
    pub fn world_matrix(&self, id: NodeId) -> Matrix4<f32> {
        let mut transform = self.local_matrix(id);
        let mut parent = self.node(id).parent;

        while let Some(ancestor) = parent {
            transform = self.local_matrix(ancestor) * transform;
            parent = self.node(ancestor).parent;
        }

        transform
    }

    /// World orientation of the node, scale excluded.
    pub fn world_rotation(&self, id: NodeId) -> UnitQuaternion<f32> {
        let mut rotation = self.node(id).rotation;
        let mut parent = self.node(id).parent;

        while let Some(ancestor) = parent {
            rotation = self.node(ancestor).rotation * rotation;
            parent = self.node(ancestor).parent;
        }

        rotation
    }

    /// Convert a point in the node frame to world space.
    pub fn local_to_world(&self, id: NodeId, point: &Point3<f32>) -> Point3<f32> {
        self.world_matrix(id).transform_point(point)
    }

    /// Convert a world space point into the node frame.
    pub fn world_to_local(&self, id: NodeId, point: &Point3<f32>) -> crate::Result<Point3<f32>> {
        let inverse = self
            .world_matrix(id)
            .try_inverse()
            .ok_or(crate::Error::SingularTransform(id))?;

        Ok(inverse.transform_point(point))
    }

    /// World position of the node origin.
    #[inline]
    pub fn world_position(&self, id: NodeId) -> Point3<f32> {
        self.local_to_world(id, &Point3::origin())
    }

    /// Whether the node and all of its ancestors are visible.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);

        while let Some(node) = current {
            if !self.node(node).visible {
                return false;
            }
            current = self.node(node).parent;
        }

        true
    }
}
