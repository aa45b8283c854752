//! Body descriptors and their serialized configuration form

use serde::{Deserialize, Serialize};

/// Ring geometry attached to a body
#[derive(Debug, Clone, PartialEq)]
pub struct RingDescriptor {
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Carried for completeness; ring orientation is fixed relative to its body.
    pub tilt_rate: f32,
    pub texture: Option<String>,
}

/// Validated, immutable description of one body
///
/// Angular rates are radians per frame. The central body has
/// `distance == 0.0` and `revolution_rate == 0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDescriptor {
    pub radius: f32,
    pub distance: f32,
    pub axial_rate: f32,
    pub revolution_rate: f32,
    pub ring: Option<RingDescriptor>,
    pub initial_phase: f32,
    pub texture: Option<String>,
}

/// Ring as it appears in a configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RingConfig {
    pub inner_radius: f32,
    pub outer_radius: f32,
    #[serde(default)]
    pub tilt_rate: f32,
    #[serde(default)]
    pub texture: Option<String>,
}

/// Body as it appears in a configuration file
///
/// `initial_phase` is optional; missing phases are drawn once when the
/// table is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyConfig {
    pub name: String,
    pub radius: f32,
    #[serde(default)]
    pub distance: f32,
    #[serde(default)]
    pub axial_rate: f32,
    #[serde(default)]
    pub revolution_rate: f32,
    #[serde(default)]
    pub initial_phase: Option<f32>,
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub ring: Option<RingConfig>,
}

impl BodyConfig {
    pub fn new(name: impl Into<String>, radius: f32) -> Self {
        Self {
            name: name.into(),
            radius,
            distance: 0.0,
            axial_rate: 0.0,
            revolution_rate: 0.0,
            initial_phase: None,
            texture: None,
            ring: None,
        }
    }

    pub fn orbit(mut self, distance: f32, revolution_rate: f32) -> Self {
        self.distance = distance;
        self.revolution_rate = revolution_rate;
        self
    }

    pub fn spin(mut self, axial_rate: f32) -> Self {
        self.axial_rate = axial_rate;
        self
    }

    pub fn phase(mut self, initial_phase: f32) -> Self {
        self.initial_phase = Some(initial_phase);
        self
    }

    pub fn texture(mut self, path: impl Into<String>) -> Self {
        self.texture = Some(path.into());
        self
    }

    pub fn ring(mut self, ring: RingConfig) -> Self {
        self.ring = Some(ring);
        self
    }
}

/// The whole star system: one central body and any number of orbiting bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    pub central: BodyConfig,
    #[serde(default)]
    pub orbiting: Vec<BodyConfig>,
}
