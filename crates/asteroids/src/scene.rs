//! Scene contract between the generator and an external renderer.
//!
//! The generator places the asteroid at the origin rotated by the state's
//! phase, the camera on the equator at the approach angle and the light on
//! the +x axis. Coordinates are then mirrored in z to match the renderer's
//! left-handed frame, which is why the sky vector points along -z.

use std::path::Path;

use asteroid_config::{RenderConfig, ViewConfig};
use glam::{DQuat, DVec3};
use icq::PolygonModel;
use serde::{Deserialize, Serialize};

use crate::error::SampleError;
use crate::spatial_state::SpatialState;

const MIRROR_Z: DVec3 = DVec3::new(1.0, 1.0, -1.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub vertices: Vec<DVec3>,
    pub triangles: Vec<[u32; 3]>,
    pub normals: Option<Vec<DVec3>>,
    pub camera_position: DVec3,
    pub camera_target: DVec3,
    pub sky: DVec3,
    pub light_position: DVec3,
    pub light_color: [f64; 3],
    pub object_color: [f64; 3],
    pub background_color: [f64; 3],
    pub width: u32,
    pub height: u32,
    pub antialiasing: f64,
}

/// Point on the equator at `radius` and longitude `phi`.
fn equatorial(radius: f64, phi: f64) -> DVec3 {
    let (sin_phi, cos_phi) = phi.sin_cos();
    DVec3::new(radius * cos_phi, radius * sin_phi, 0.0)
}

impl SceneDescription {
    pub fn new(
        model: &PolygonModel,
        state: &SpatialState,
        view: &ViewConfig,
        render: &RenderConfig,
    ) -> Self {
        let axis = state.rotation_axis.normalize_or_zero();
        let rotation = if axis == DVec3::ZERO {
            DQuat::IDENTITY
        } else {
            DQuat::from_axis_angle(axis, state.phase)
        };

        let vertices = model
            .positions
            .iter()
            .map(|&p| (rotation * p) * MIRROR_Z)
            .collect();
        let normals = model
            .normals
            .as_ref()
            .map(|normals| normals.iter().map(|&n| (rotation * n) * MIRROR_Z).collect());

        let brightness = view.light_brightness;
        Self {
            vertices,
            triangles: model.triangles.clone(),
            normals,
            camera_position: equatorial(state.distance, state.approach_angle) * MIRROR_Z,
            camera_target: DVec3::ZERO,
            sky: DVec3::NEG_Z,
            light_position: equatorial(view.light_distance, 0.0) * MIRROR_Z,
            light_color: [brightness; 3],
            object_color: render.object_color,
            background_color: render.background_color,
            width: render.width,
            height: render.height,
            antialiasing: render.antialiasing,
        }
    }
}

/// Turns a scene into an image file.
pub trait Renderer {
    fn render(&self, scene: &SceneDescription, output: &Path) -> Result<(), SampleError>;
}
