//! glTF asset import.
//!
//! Only the node hierarchy is imported: names, local transforms and mesh
//! references. Geometry stays with whatever renders the frame.

use std::path::Path;

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::scene::{Node, NodeId, NodeKind, Scene};

/// Node as found in the asset.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetNode {
    pub name: String,
    pub translation: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub scale: Vector3<f32>,
    pub mesh: Option<usize>,
    /// Indices into [`Asset::nodes`].
    pub children: Vec<usize>,
}

/// Parsed asset node hierarchy.
#[derive(Clone, Debug)]
pub struct Asset {
    name: String,
    nodes: Vec<AssetNode>,
    roots: Vec<usize>,
}

impl Asset {
    /// Read a glTF or GLB file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        log::debug!("Loading asset {}", path.display());

        let bytes = std::fs::read(path)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "asset".to_string());

        Self::from_slice(name, &bytes)
    }

    /// Parse a glTF or GLB document.
    pub fn from_slice(name: impl ToString, bytes: &[u8]) -> crate::Result<Self> {
        let gltf = gltf::Gltf::from_slice(bytes)?;

        let nodes: Vec<AssetNode> = gltf
            .nodes()
            .map(|node| {
                let (translation, [x, y, z, w], scale) = node.transform().decomposed();

                AssetNode {
                    name: node.name().unwrap_or_default().to_string(),
                    translation: Vector3::from(translation),
                    rotation: UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z)),
                    scale: Vector3::from(scale),
                    mesh: node.mesh().map(|mesh| mesh.index()),
                    children: node.children().map(|child| child.index()).collect(),
                }
            })
            .collect();

        let roots: Vec<usize> = match gltf.default_scene().or_else(|| gltf.scenes().next()) {
            Some(scene) => scene.nodes().map(|node| node.index()).collect(),
            None => (0..nodes.len())
                .filter(|idx| !nodes.iter().any(|node| node.children.contains(idx)))
                .collect(),
        };

        validate_hierarchy(&nodes, &roots)?;

        let asset = Self {
            name: name.to_string(),
            nodes,
            roots,
        };

        log::debug!(
            "Asset '{}' has {} nodes, {} at the top",
            asset.name,
            asset.nodes.len(),
            asset.roots.len()
        );

        Ok(asset)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn nodes(&self) -> &[AssetNode] {
        &self.nodes
    }

    /// Copy the node hierarchy into the scene below a new group root.
    pub fn import(&self, scene: &mut Scene) -> NodeId {
        let root = scene.add_root(Node::new(&self.name, NodeKind::Group));

        let mut stack: Vec<(usize, NodeId)> =
            self.roots.iter().rev().map(|idx| (*idx, root)).collect();

        while let Some((idx, parent)) = stack.pop() {
            let node = &self.nodes[idx];

            let id = scene.add_child(
                parent,
                Node::new(&node.name, NodeKind::Mesh { mesh: node.mesh })
                    .set_position(node.translation)
                    .set_rotation(node.rotation)
                    .set_scale(node.scale),
            );

            stack.extend(node.children.iter().rev().map(|child| (*child, id)));
        }

        root
    }
}

/// Every node reachable from the roots must be reached exactly once.
///
/// Rejects cycles and nodes shared between parents, either of which would
/// make the import walk unbounded or duplicate subtrees.
fn validate_hierarchy(nodes: &[AssetNode], roots: &[usize]) -> crate::Result {
    let mut visited = vec![false; nodes.len()];
    let mut stack = roots.to_vec();

    while let Some(idx) = stack.pop() {
        let Some(seen) = visited.get_mut(idx) else {
            return Err(crate::Error::InvalidAsset(format!(
                "node {} does not exist",
                idx
            )));
        };
        if *seen {
            return Err(crate::Error::InvalidAsset(format!(
                "node {} is reached more than once",
                idx
            )));
        }
        *seen = true;

        stack.extend(&nodes[idx].children);
    }

    Ok(())
}
