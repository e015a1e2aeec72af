//! UR3 robot aggregate.
//!
//! The robot owns the scene holding both the kinematic skeleton and the
//! imported mesh. Joint requests arrive as absolute angles and are applied to
//! both: the mesh joint is set directly, the skeleton is rotated by the
//! increment since the previous request.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use ur3_core::{math::FrameRotation, Joint};

use crate::{
    asset::Asset,
    config::{RobotConfig, Visibility},
    control::{ControlCommand, SLIDER_RANGE},
    pivot::PivotRotation,
    runtime::{RenderFrame, RenderItem},
    scene::{NodeId, NodeKind, Scene},
};

mod chain;
mod hitbox;
mod state;

pub use chain::{Dimensions, JointLink, LinkChain};
pub use hitbox::{Hitbox, HitboxVolume};
pub use state::JointAngleState;

/// Named nodes of the imported robot mesh.
#[derive(Clone, Debug)]
pub struct RobotMesh {
    root: NodeId,
    joints: [NodeId; 6],
    /// Joint orientations at import.
    rest: [UnitQuaternion<f32>; 6],
}

impl RobotMesh {
    /// Locate the robot root and its joints below `asset_root`.
    ///
    /// The robot root is searched for in the asset nodes only, never the group
    /// root itself. Joints are searched for below the robot root only.
    pub fn locate(scene: &Scene, asset_root: NodeId, config: &RobotConfig) -> crate::Result<Self> {
        let root = scene
            .node(asset_root)
            .children()
            .iter()
            .find_map(|top| scene.find_by_name(*top, &config.root_node))
            .ok_or_else(|| crate::Error::MissingNode(config.root_node.clone()))?;

        let mut joints = [root; 6];
        for (slot, name) in joints.iter_mut().zip(&config.joint_nodes) {
            *slot = scene
                .find_by_name(root, name)
                .ok_or_else(|| crate::Error::MissingNode(name.clone()))?;
        }

        let rest = joints.map(|joint| scene.node(joint).rotation);

        Ok(Self { root, joints, rest })
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn joint(&self, joint: Joint) -> NodeId {
        self.joints[joint.index()]
    }

    /// Set the absolute angle of a mesh joint about its local vertical axis.
    fn set_angle(&self, scene: &mut Scene, joint: Joint, value: f32) {
        let idx = joint.index();
        let node = scene.node_mut(self.joints[idx]);

        node.rotation = self.rest[idx];
        node.rotate_on_axis(&Vector3::y_axis(), value);
    }
}

pub struct Robot {
    scene: Scene,
    chain: LinkChain,
    hitboxes: Vec<Hitbox>,
    /// Hitboxes reported by the last collision pass.
    touched: Vec<&'static str>,
    mesh: RobotMesh,
    angles: JointAngleState,
    base_angle: f32,
    visibility: Visibility,
    config: RobotConfig,
}

impl Robot {
    /// Build the skeleton, import the asset and attach the hitboxes.
    ///
    /// Fails when the dimensions are invalid or when the asset lacks any of
    /// the configured nodes.
    pub fn new(asset: &Asset, config: RobotConfig) -> crate::Result<Self> {
        let mut scene = Scene::new();

        let chain = LinkChain::build(&mut scene, None, &config.dimensions)?;

        let asset_root = asset.import(&mut scene);
        let mesh = RobotMesh::locate(&scene, asset_root, &config)?;

        let visibility = config.visibility;
        let hitboxes = hitbox::build(&mut scene, &chain, visibility.hitboxes);

        scene.node_mut(mesh.root()).visible = visibility.robot;
        scene.node_mut(chain.root()).visible = visibility.link_chain;

        log::debug!(
            "Robot '{}' ready with {} hitboxes, {} scene nodes",
            config.root_node,
            hitboxes.len(),
            scene.len()
        );

        Ok(Self {
            scene,
            chain,
            hitboxes,
            touched: Vec::new(),
            mesh,
            angles: JointAngleState::new(),
            base_angle: 0.0,
            visibility,
            config,
        })
    }

    /// Set a joint to an absolute angle in radians.
    ///
    /// The base turns the whole skeleton about its vertical axis. The other
    /// joints rotate their link about the joint pivot by the difference with
    /// the previous request, signed by the configured rotation sense.
    pub fn set_joint(&mut self, joint: Joint, value: f32) -> crate::Result {
        if !SLIDER_RANGE.contains(&value) {
            log::debug!("{} angle {:.3} is outside the slider range", joint, value);
        }

        match self.angles.update(joint, value) {
            Some(delta) => {
                let link = self.chain.joint(joint);
                let theta = self.config.sense.get(joint).apply(delta);

                PivotRotation::parent(link.pivot, link.axis, theta).apply(&mut self.scene, link.node)?;
            }
            None => {
                self.scene.node_mut(self.chain.root()).rotation = UnitQuaternion::about_y(value);
                self.base_angle = value;
            }
        }

        self.mesh.set_angle(&mut self.scene, joint, value);

        log::trace!("{} set to {:.3}rad", joint, value);

        Ok(())
    }

    /// Set all joints, base first.
    pub fn move_to(&mut self, pose: [f32; 6]) -> crate::Result {
        for (joint, value) in Joint::ALL.into_iter().zip(pose) {
            self.set_joint(joint, value)?;
        }

        Ok(())
    }

    /// Move to the configured home pose.
    pub fn home(&mut self) -> crate::Result {
        self.move_to(self.config.home)
    }

    /// Flip hitbox visibility, returns the new state.
    pub fn toggle_hitboxes(&mut self) -> bool {
        self.visibility.hitboxes = !self.visibility.hitboxes;

        for hitbox in &self.hitboxes {
            self.scene.node_mut(hitbox.node).visible = self.visibility.hitboxes;
        }

        self.visibility.hitboxes
    }

    /// Flip robot mesh visibility, returns the new state.
    pub fn toggle_robot(&mut self) -> bool {
        self.visibility.robot = !self.visibility.robot;
        self.scene.node_mut(self.mesh.root()).visible = self.visibility.robot;
        self.visibility.robot
    }

    /// Flip skeleton visibility, returns the new state.
    ///
    /// Only the first segment is touched; the rest of the skeleton and the
    /// hitboxes attached to it follow through inheritance.
    pub fn toggle_link_chain(&mut self) -> bool {
        self.visibility.link_chain = !self.visibility.link_chain;
        self.scene.node_mut(self.chain.root()).visible = self.visibility.link_chain;
        self.visibility.link_chain
    }

    /// Apply a control surface command.
    pub fn handle(&mut self, command: &ControlCommand) -> crate::Result {
        match command {
            ControlCommand::SetJoint(command) => self.set_joint(command.joint, command.angle)?,
            ControlCommand::Move(pose) => self.move_to(*pose)?,
            ControlCommand::Home => self.home()?,
            ControlCommand::ToggleHitboxes => {
                let visible = self.toggle_hitboxes();
                log::info!("Hitboxes {}", shown(visible));
            }
            ControlCommand::ToggleRobot => {
                let visible = self.toggle_robot();
                log::info!("Robot {}", shown(visible));
            }
            ControlCommand::ToggleLinkChain => {
                let visible = self.toggle_link_chain();
                log::info!("Link chain {}", shown(visible));
            }
            ControlCommand::Status => {
                let effector = self.effector_position();

                log::info!("Base={:.2}rad {}", self.base_angle, self.angles);
                log::info!(
                    "Effector: [{:.3}, {:.3}, {:.3}]",
                    effector.x,
                    effector.y,
                    effector.z
                );
            }
        }

        Ok(())
    }

    /// Last applied absolute angle of a joint.
    pub fn joint_angle(&self, joint: Joint) -> f32 {
        self.angles.angle(joint).unwrap_or(self.base_angle)
    }

    /// Last applied absolute angles, base first.
    pub fn joint_angles(&self) -> [f32; 6] {
        Joint::ALL.map(|joint| self.joint_angle(joint))
    }

    /// World position of the tool marker.
    pub fn effector_position(&self) -> Point3<f32> {
        self.scene.world_position(self.chain.marker())
    }

    /// World space snapshot of every hitbox.
    pub fn hitbox_volumes(&self) -> Vec<HitboxVolume> {
        self.hitboxes
            .iter()
            .map(|hitbox| hitbox.volume(&self.scene))
            .collect()
    }

    /// Record the hitboxes touched in the last collision pass.
    pub fn set_touched(&mut self, touched: Vec<&'static str>) {
        self.touched = touched;
    }

    /// Capture everything a renderer needs to draw one frame.
    ///
    /// Only nodes reachable from a scene root through visible nodes are
    /// included.
    pub fn render_frame(&self) -> RenderFrame {
        let style = &self.config.style;
        let mut items = Vec::new();

        let mut stack: Vec<NodeId> = self.scene.roots().iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = self.scene.node(id);
            if !node.visible {
                continue;
            }

            let (color, opacity) = match node.kind() {
                NodeKind::Segment { .. } => (Some(style.line_color), 1.0),
                NodeKind::Cuboid { .. } if id == self.chain.marker() => {
                    (Some(style.marker_color), 1.0)
                }
                NodeKind::Cuboid { .. } => {
                    let touched = self
                        .hitboxes
                        .iter()
                        .any(|hitbox| hitbox.node == id && self.touched.contains(&hitbox.name));

                    if touched {
                        (Some(style.hitbox_color_touched), style.hitbox_opacity)
                    } else {
                        (Some(style.hitbox_color), style.hitbox_opacity)
                    }
                }
                NodeKind::Group | NodeKind::Mesh { .. } => (None, 1.0),
            };

            items.push(RenderItem {
                node: id,
                name: node.name().to_string(),
                kind: node.kind().clone(),
                transform: self.scene.world_matrix(id),
                color,
                opacity,
            });

            stack.extend(node.children().iter().rev());
        }

        RenderFrame {
            items,
            line_thickness: style.line_thickness,
            visibility: self.visibility,
        }
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn chain(&self) -> &LinkChain {
        &self.chain
    }

    #[inline]
    pub fn mesh(&self) -> &RobotMesh {
        &self.mesh
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn config(&self) -> &RobotConfig {
        &self.config
    }
}

fn shown(visible: bool) -> &'static str {
    if visible {
        "shown"
    } else {
        "hidden"
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;
    use crate::asset::tests::ARM;

    const EPSILON: f32 = 1e-4;

    fn robot() -> Robot {
        robot_with(RobotConfig::default())
    }

    fn robot_with(config: RobotConfig) -> Robot {
        let asset = Asset::from_slice("ur3", ARM.as_bytes()).unwrap();
        Robot::new(&asset, config).unwrap()
    }

    fn segment_end(robot: &Robot, name: &str) -> Point3<f32> {
        let id = robot.chain().segment(name).unwrap();
        match robot.scene().node(id).kind() {
            NodeKind::Segment { end, .. } => robot.scene().local_to_world(id, end),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_missing_node() {
        let asset = Asset::from_slice("ur3", ARM.replace("Joint_4", "Joint_X").as_bytes()).unwrap();

        assert!(matches!(
            Robot::new(&asset, RobotConfig::default()),
            Err(crate::Error::MissingNode(name)) if name == "Joint_4"
        ));

        let config = RobotConfig {
            root_node: "UR5".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            Robot::new(&asset, config),
            Err(crate::Error::MissingNode(name)) if name == "UR5"
        ));
    }

    #[test]
    fn test_asset_named_like_root() {
        let asset = Asset::from_slice("UR3", ARM.as_bytes()).unwrap();
        let robot = Robot::new(&asset, RobotConfig::default()).unwrap();

        let root = robot.scene().node(robot.mesh().root());
        assert_eq!(root.name(), "UR3");
        assert!(matches!(root.kind(), NodeKind::Mesh { .. }));

        let group = root.parent().unwrap();
        assert!(matches!(robot.scene().node(group).kind(), NodeKind::Mesh { .. }));
        assert!(matches!(
            robot.scene().node(robot.scene().node(group).parent().unwrap()).kind(),
            NodeKind::Group
        ));
    }

    #[test]
    fn test_shoulder_end_to_end() {
        let mut robot = robot();
        let anchors = *robot.chain().anchors();

        let base_before = robot.scene().world_matrix(robot.chain().root());

        robot.set_joint(Joint::Shoulder, FRAC_PI_2).unwrap();

        // Shoulder axis is -x with inverse sense, so the arm turns by +π/2
        // about x: the upper arm swings from +z to -y.
        let elbow = segment_end(&robot, "link1_2");
        let expected = Point3::new(0.12, anchors[1].y - 0.24365, 0.0);
        assert!((elbow - expected).norm() < EPSILON);

        // The shoulder pivot itself stays put.
        assert!((segment_end(&robot, "link0") - anchors[1]).norm() < EPSILON);
        assert_eq!(robot.scene().world_matrix(robot.chain().root()), base_before);
        assert_eq!(robot.joint_angle(Joint::Shoulder), FRAC_PI_2);
    }

    #[test]
    fn test_sense_follows_config() {
        let mut config = RobotConfig::default();
        config.sense.shoulder = ur3_core::RotationSense::Direct;

        let mut robot = robot_with(config);
        robot.set_joint(Joint::Shoulder, FRAC_PI_2).unwrap();

        let elbow = segment_end(&robot, "link1_2");
        assert!((elbow - Point3::new(0.12, 0.15185 + 0.24365, 0.0)).norm() < EPSILON);
    }

    #[test]
    fn test_incremental_equivalence() {
        let mut stepped = robot();
        for value in [0.3, -1.2, 0.9, 0.5] {
            stepped.set_joint(Joint::Elbow, value).unwrap();
            stepped.set_joint(Joint::Wrist1, value * 2.0).unwrap();
        }

        let mut direct = robot();
        direct.set_joint(Joint::Elbow, 0.5).unwrap();
        direct.set_joint(Joint::Wrist1, 1.0).unwrap();

        let stepped_tool = stepped.effector_position();
        let direct_tool = direct.effector_position();
        assert!((stepped_tool - direct_tool).norm() < EPSILON);
        assert_eq!(stepped.joint_angles(), direct.joint_angles());
    }

    #[test]
    fn test_return_to_rest() {
        let mut robot = robot();
        let rest = robot.effector_position();

        robot.move_to([0.4, -1.0, 1.3, -0.7, 2.0, 0.1]).unwrap();
        assert!((robot.effector_position() - rest).norm() > EPSILON);

        robot.move_to([0.0; 6]).unwrap();
        assert!((robot.effector_position() - rest).norm() < EPSILON);
    }

    #[test]
    fn test_base_rotation() {
        let mut robot = robot();
        let rest = robot.effector_position();

        robot.set_joint(Joint::Base, FRAC_PI_2).unwrap();
        robot.set_joint(Joint::Base, FRAC_PI_2).unwrap();

        let expected = UnitQuaternion::about_y(FRAC_PI_2) * rest;
        assert!((robot.effector_position() - expected).norm() < EPSILON);
        assert_eq!(robot.joint_angle(Joint::Base), FRAC_PI_2);
    }

    #[test]
    fn test_mesh_joint_absolute() {
        let mut robot = robot();
        let joint2 = robot.mesh().joint(Joint::Shoulder);
        let rest = robot.scene().node(joint2).rotation;

        robot.set_joint(Joint::Shoulder, 0.4).unwrap();
        robot.set_joint(Joint::Shoulder, 0.4).unwrap();

        let expected = rest * UnitQuaternion::about_y(0.4);
        assert!(robot.scene().node(joint2).rotation.angle_to(&expected) < EPSILON);
    }

    #[test]
    fn test_home() {
        let config = RobotConfig {
            home: [0.0, -FRAC_PI_2, 0.0, -FRAC_PI_2, 0.0, 0.0],
            ..Default::default()
        };
        let mut robot = robot_with(config);

        robot.handle(&ControlCommand::Home).unwrap();

        assert_eq!(robot.joint_angles(), [0.0, -FRAC_PI_2, 0.0, -FRAC_PI_2, 0.0, 0.0]);
    }

    #[test]
    fn test_out_of_range_applied() {
        let mut robot = robot();

        robot.set_joint(Joint::Wrist2, 4.0).unwrap();

        assert_eq!(robot.joint_angle(Joint::Wrist2), 4.0);
    }

    #[test]
    fn test_double_toggle() {
        let mut robot = robot();
        let initial = robot.visibility();

        robot.handle(&ControlCommand::ToggleHitboxes).unwrap();
        robot.handle(&ControlCommand::ToggleRobot).unwrap();
        robot.handle(&ControlCommand::ToggleLinkChain).unwrap();

        assert!(robot.visibility().hitboxes);
        assert!(!robot.visibility().robot);
        assert!(!robot.visibility().link_chain);
        assert!(!robot.scene().is_visible(robot.mesh().joint(Joint::Wrist3)));

        robot.toggle_hitboxes();
        robot.toggle_robot();
        robot.toggle_link_chain();

        assert_eq!(robot.visibility(), initial);
        assert!(robot.hitbox_volumes().iter().all(|volume| !volume.visible));
        assert!(robot.scene().is_visible(robot.mesh().joint(Joint::Wrist3)));
    }

    #[test]
    fn test_toggle_with_logging_off() {
        log::set_max_level(log::LevelFilter::Off);

        let mut robot = robot();

        robot.handle(&ControlCommand::ToggleHitboxes).unwrap();
        robot.handle(&ControlCommand::ToggleRobot).unwrap();
        robot.handle(&ControlCommand::ToggleLinkChain).unwrap();

        assert_eq!(
            robot.visibility(),
            Visibility {
                hitboxes: true,
                robot: false,
                link_chain: false,
            }
        );
        assert!(!robot.scene().node(robot.mesh().root()).visible);
        assert!(!robot.scene().node(robot.chain().root()).visible);
    }

    #[test]
    fn test_chain_hides_attached_hitboxes() {
        let mut robot = robot();
        robot.toggle_hitboxes();

        assert!(robot.hitbox_volumes()[0].visible);

        robot.toggle_link_chain();

        let volumes = robot.hitbox_volumes();
        assert!(volumes.iter().filter(|volume| volume.attached).all(|volume| !volume.visible));
    }

    #[test]
    fn test_render_frame() {
        let mut robot = robot();

        let frame = robot.render_frame();
        assert!(frame.items.iter().all(|item| !item.name.starts_with("hitbox_")));
        assert!(frame.items.iter().any(|item| item.name == "UR3"));
        assert_eq!(
            frame
                .items
                .iter()
                .filter(|item| matches!(item.kind, NodeKind::Segment { .. }))
                .count(),
            8
        );

        robot.toggle_hitboxes();
        robot.set_touched(vec!["wrist"]);
        robot.toggle_robot();

        let frame = robot.render_frame();
        let style = &robot.config().style;

        let wrist = frame.items.iter().find(|item| item.name == "hitbox_wrist").unwrap();
        assert_eq!(wrist.color, Some(style.hitbox_color_touched));
        let base = frame.items.iter().find(|item| item.name == "hitbox_base").unwrap();
        assert_eq!(base.color, Some(style.hitbox_color));
        assert_eq!(base.opacity, style.hitbox_opacity);

        // Detached hitbox is never reachable.
        assert!(frame.items.iter().all(|item| item.name != "hitbox_wrist3"));
        assert!(frame.items.iter().all(|item| item.name != "UR3"));
    }

    #[test]
    fn test_effector_at_rest() {
        let robot = robot();

        let tool = robot.effector_position();
        assert!((tool - Point3::new(0.19425, 0.0665, 0.4569)).norm() < EPSILON);
        assert!((tool - robot.chain().anchors()[8]).norm() < EPSILON);
    }
}
