//! Shared configuration for asteroid generation
//!
//! This crate provides the single source of truth for sampler parameters,
//! viewing geometry and render settings used across the generators. Every
//! section has a `Default` built from the `DEFAULT_*` constants and can be
//! overridden from JSON; missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default RNG seed for reproducible batches
pub const DEFAULT_SEED: u64 = 42;

/// Default radius of the ball asteroids are sculpted from
pub const DEFAULT_BASE_RADIUS: f64 = 15.0;

/// Default refinement passes before harmonic sculpting (Q = 16)
pub const DEFAULT_HARMONIC_BASE_RESOLUTION: usize = 4;
/// Default ratio between a harmonic's feature size and the mesh feature size
pub const DEFAULT_RESOLUTION_MARGIN: f64 = 4.0;
pub const DEFAULT_NUM_PERTURBATIONS: usize = 15;
/// Default success probability of the geometric degree distribution
pub const DEFAULT_DEGREE_DECAY: f64 = 0.15;
pub const DEFAULT_MAGNITUDE_DECAY: f64 = 0.35;

/// Default refinement passes before cone sculpting (Q = 64)
pub const DEFAULT_CONE_BASE_RESOLUTION: usize = 6;
pub const DEFAULT_NUM_CONES: usize = 200;
pub const DEFAULT_CONE_RADIUS_RANGE: [f64; 2] = [0.4, 1.0];
pub const DEFAULT_CONE_MAGNITUDE_RANGE: [f64; 2] = [-0.33, 0.33];
/// Default fillet radii as fractions of the cone radius
pub const DEFAULT_TOP_FILLET: f64 = 0.25;
pub const DEFAULT_BASE_FILLET: f64 = 0.25;

pub const DEFAULT_SPIKE_RESOLUTION_POWER: usize = 2;
pub const DEFAULT_NUM_SPIKES: usize = 1;
pub const DEFAULT_SPIKABLE_FACES: [usize; 3] = [1, 4, 5];
pub const DEFAULT_SPIKE_SIZE: f64 = 0.1;
/// Most refinement passes any sampler may start from; Q = 1024 is 6.3M raw vertices
pub const MAX_RESOLUTION_POWER: usize = 10;

pub const DEFAULT_DISTANCES: [f64; 1] = [50.0];
pub const DEFAULT_NUM_CONDITIONS: usize = 1;
pub const DEFAULT_NUM_PHASES: usize = 8;
pub const DEFAULT_LIGHT_DISTANCE: f64 = 1000.0;
pub const DEFAULT_LIGHT_BRIGHTNESS: f64 = 2.0;
/// Default approach angle range; `[0, 0]` keeps the Sun behind the camera
pub const DEFAULT_APPROACH_RANGE: [f64; 2] = [0.0, 0.0];

pub const DEFAULT_RENDER_WIDTH: u32 = 600;
pub const DEFAULT_RENDER_HEIGHT: u32 = 600;
pub const DEFAULT_ANTIALIASING: f64 = 0.01;
pub const DEFAULT_OBJECT_COLOR: [f64; 3] = [0.5, 0.5, 0.5];
pub const DEFAULT_BACKGROUND_COLOR: [f64; 3] = [0.0, 0.0, 0.0];

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_passes(field: &'static str, passes: usize) -> Result<(), ConfigError> {
    if passes > MAX_RESOLUTION_POWER {
        return Err(invalid(field, format!("must be at most {}", MAX_RESOLUTION_POWER)));
    }
    Ok(())
}

fn check_range(field: &'static str, range: [f64; 2]) -> Result<(), ConfigError> {
    if !range.iter().all(|v| v.is_finite()) || range[0] > range[1] {
        return Err(invalid(field, format!("{:?} is not an ordered finite range", range)));
    }
    Ok(())
}

/// Spherical-harmonic asteroid sampler parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonicsConfig {
    pub base_radius: f64,
    /// Refinement passes from the unit cube
    pub base_resolution: usize,
    pub resolution_margin: f64,
    pub num_perturbations: usize,
    pub degree_decay: f64,
    pub magnitude_decay: f64,
}

impl Default for HarmonicsConfig {
    fn default() -> Self {
        Self {
            base_radius: DEFAULT_BASE_RADIUS,
            base_resolution: DEFAULT_HARMONIC_BASE_RESOLUTION,
            resolution_margin: DEFAULT_RESOLUTION_MARGIN,
            num_perturbations: DEFAULT_NUM_PERTURBATIONS,
            degree_decay: DEFAULT_DEGREE_DECAY,
            magnitude_decay: DEFAULT_MAGNITUDE_DECAY,
        }
    }
}

impl HarmonicsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_radius > 0.0) {
            return Err(invalid("harmonics.base_radius", "must be positive"));
        }
        check_passes("harmonics.base_resolution", self.base_resolution)?;
        if !(self.resolution_margin > 0.0) {
            return Err(invalid("harmonics.resolution_margin", "must be positive"));
        }
        if !(self.degree_decay > 0.0 && self.degree_decay <= 1.0) {
            return Err(invalid("harmonics.degree_decay", "must be in (0, 1]"));
        }
        if !(self.magnitude_decay >= 0.0) {
            return Err(invalid("harmonics.magnitude_decay", "must be non-negative"));
        }
        Ok(())
    }
}

/// Cone-field asteroid sampler parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConesConfig {
    pub base_radius: f64,
    pub base_resolution: usize,
    pub num_cones: usize,
    /// Angular radius range on the unit sphere; avoid zero radii
    pub radius_range: [f64; 2],
    pub magnitude_range: [f64; 2],
    pub top_fillet: f64,
    pub base_fillet: f64,
}

impl Default for ConesConfig {
    fn default() -> Self {
        Self {
            base_radius: DEFAULT_BASE_RADIUS,
            base_resolution: DEFAULT_CONE_BASE_RESOLUTION,
            num_cones: DEFAULT_NUM_CONES,
            radius_range: DEFAULT_CONE_RADIUS_RANGE,
            magnitude_range: DEFAULT_CONE_MAGNITUDE_RANGE,
            top_fillet: DEFAULT_TOP_FILLET,
            base_fillet: DEFAULT_BASE_FILLET,
        }
    }
}

impl ConesConfig {
    /// Per-cone magnitude decay; the last cone keeps `1 / num_cones` of its magnitude.
    pub fn magnitude_decay(&self) -> f64 {
        if self.num_cones == 0 {
            0.0
        } else {
            1.0 / self.num_cones as f64
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_radius > 0.0) {
            return Err(invalid("cones.base_radius", "must be positive"));
        }
        check_passes("cones.base_resolution", self.base_resolution)?;
        check_range("cones.radius_range", self.radius_range)?;
        if self.radius_range[0] <= 0.0 {
            return Err(invalid("cones.radius_range", "radii must be positive"));
        }
        check_range("cones.magnitude_range", self.magnitude_range)?;
        if !(self.top_fillet >= 0.0 && self.base_fillet >= 0.0 && self.top_fillet + self.base_fillet < 1.0) {
            return Err(invalid(
                "cones.top_fillet",
                "fillets must be non-negative and sum to less than 1",
            ));
        }
        Ok(())
    }
}

/// Spiked asteroid sampler parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpikesConfig {
    /// Refinement passes from the unit cube (Q = 2^power)
    pub resolution_power: usize,
    pub num_spikes: usize,
    /// Faces spikes may be placed on
    pub spikable_faces: Vec<usize>,
    pub spike_size: f64,
}

impl Default for SpikesConfig {
    fn default() -> Self {
        Self {
            resolution_power: DEFAULT_SPIKE_RESOLUTION_POWER,
            num_spikes: DEFAULT_NUM_SPIKES,
            spikable_faces: DEFAULT_SPIKABLE_FACES.to_vec(),
            spike_size: DEFAULT_SPIKE_SIZE,
        }
    }
}

impl SpikesConfig {
    /// Interior vertices available for spikes, saturating at `usize::MAX`.
    pub fn capacity(&self) -> usize {
        let Some(q) = u32::try_from(self.resolution_power)
            .ok()
            .and_then(|power| 1usize.checked_shl(power))
        else {
            return usize::MAX;
        };
        let mut faces = self.spikable_faces.clone();
        faces.sort_unstable();
        faces.dedup();
        let interior = q.saturating_sub(1);
        faces.len().saturating_mul(interior).saturating_mul(interior)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution_power == 0 {
            return Err(invalid("spikes.resolution_power", "Q = 1 has no interior vertices"));
        }
        check_passes("spikes.resolution_power", self.resolution_power)?;
        if self.spikable_faces.is_empty() || self.spikable_faces.iter().any(|&f| f >= 6) {
            return Err(invalid("spikes.spikable_faces", "must list faces in 0..6"));
        }
        if self.num_spikes > self.capacity() {
            return Err(invalid(
                "spikes.num_spikes",
                format!("{} spikes exceed {} interior vertices", self.num_spikes, self.capacity()),
            ));
        }
        if !self.spike_size.is_finite() {
            return Err(invalid("spikes.spike_size", "must be finite"));
        }
        Ok(())
    }
}

/// Viewing geometry: conditions, camera distances and rotation phases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub distances: Vec<f64>,
    /// Rotation axis / approach angle pairs per asteroid
    pub num_conditions: usize,
    pub num_phases: usize,
    pub light_distance: f64,
    pub light_brightness: f64,
    pub approach_range: [f64; 2],
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            distances: DEFAULT_DISTANCES.to_vec(),
            num_conditions: DEFAULT_NUM_CONDITIONS,
            num_phases: DEFAULT_NUM_PHASES,
            light_distance: DEFAULT_LIGHT_DISTANCE,
            light_brightness: DEFAULT_LIGHT_BRIGHTNESS,
            approach_range: DEFAULT_APPROACH_RANGE,
        }
    }
}

impl ViewConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.distances.iter().any(|d| !(*d > 0.0)) {
            return Err(invalid("view.distances", "must be positive"));
        }
        if self.num_phases == 0 {
            return Err(invalid("view.num_phases", "must be at least 1"));
        }
        if !(self.light_distance > 0.0) {
            return Err(invalid("view.light_distance", "must be positive"));
        }
        check_range("view.approach_range", self.approach_range)
    }
}

/// Raster output settings handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub antialiasing: f64,
    pub object_color: [f64; 3],
    pub background_color: [f64; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_RENDER_WIDTH,
            height: DEFAULT_RENDER_HEIGHT,
            antialiasing: DEFAULT_ANTIALIASING,
            object_color: DEFAULT_OBJECT_COLOR,
            background_color: DEFAULT_BACKGROUND_COLOR,
        }
    }
}

impl RenderConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid("render.width", "image must not be empty"));
        }
        Ok(())
    }
}

/// Complete generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub harmonics: HarmonicsConfig,
    pub cones: ConesConfig,
    pub spikes: SpikesConfig,
    pub view: ViewConfig,
    pub render: RenderConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            harmonics: HarmonicsConfig::default(),
            cones: ConesConfig::default(),
            spikes: SpikesConfig::default(),
            view: ViewConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Parse from JSON; absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.harmonics.validate()?;
        self.cones.validate()?;
        self.spikes.validate()?;
        self.view.validate()?;
        self.render.validate()
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
