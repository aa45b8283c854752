//! Read-only table of validated body descriptors

use std::collections::HashSet;

use crate::bodies::descriptor::{BodyConfig, BodyDescriptor, RingDescriptor, SystemConfig};
use crate::bodies::phase::PhaseSource;
use crate::error::{ConfigError, ConfigResult};

/// A descriptor together with its identifier
#[derive(Debug, Clone, PartialEq)]
pub struct BodyEntry {
    pub name: String,
    pub descriptor: BodyDescriptor,
}

/// Body identifier to descriptor mapping, fully populated at startup
#[derive(Debug, Clone)]
pub struct BodyTable {
    central: BodyEntry,
    orbiting: Vec<BodyEntry>,
}

impl BodyTable {
    /// Validate a system configuration and resolve every initial phase
    ///
    /// Bodies with an explicit `initial_phase` keep it; the rest draw one
    /// from `phases` in declaration order.
    pub fn from_config(config: &SystemConfig, phases: &mut PhaseSource) -> ConfigResult<Self> {
        let mut seen = HashSet::new();

        let central_config = &config.central;
        check_body(central_config)?;
        if central_config.distance != 0.0 || central_config.revolution_rate != 0.0 {
            return Err(ConfigError::CentralBodyOrbits(central_config.name.clone()));
        }
        seen.insert(central_config.name.as_str());
        let central = BodyEntry {
            name: central_config.name.clone(),
            descriptor: descriptor_from(central_config, 0.0),
        };

        let mut orbiting = Vec::with_capacity(config.orbiting.len());
        for body in &config.orbiting {
            check_body(body)?;
            if !seen.insert(body.name.as_str()) {
                return Err(ConfigError::DuplicateBody(body.name.clone()));
            }
            let phase = match body.initial_phase {
                Some(phase) => phase,
                None => phases.next_phase()?,
            };
            orbiting.push(BodyEntry {
                name: body.name.clone(),
                descriptor: descriptor_from(body, phase),
            });
        }

        Ok(Self { central, orbiting })
    }

    pub fn central(&self) -> &BodyEntry {
        &self.central
    }

    pub fn orbiting(&self) -> &[BodyEntry] {
        &self.orbiting
    }

    /// Central body first, then orbiting bodies in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &BodyEntry> {
        std::iter::once(&self.central).chain(self.orbiting.iter())
    }

    pub fn get(&self, name: &str) -> Option<&BodyDescriptor> {
        self.iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.descriptor)
    }

    pub fn len(&self) -> usize {
        1 + self.orbiting.len()
    }
}

fn check_body(body: &BodyConfig) -> ConfigResult<()> {
    let name = || body.name.clone();
    let finite = [
        ("radius", body.radius),
        ("distance", body.distance),
        ("axial rate", body.axial_rate),
        ("revolution rate", body.revolution_rate),
        ("initial phase", body.initial_phase.unwrap_or(0.0)),
    ];
    for (field, value) in finite {
        if !value.is_finite() {
            return Err(ConfigError::NonFinite { name: name(), field });
        }
    }
    if body.radius <= 0.0 {
        return Err(ConfigError::NonPositiveRadius {
            name: name(),
            radius: body.radius,
        });
    }
    if body.distance < 0.0 {
        return Err(ConfigError::NegativeDistance {
            name: name(),
            distance: body.distance,
        });
    }

    if let Some(ring) = &body.ring {
        for (field, value) in [
            ("ring inner radius", ring.inner_radius),
            ("ring outer radius", ring.outer_radius),
            ("ring tilt rate", ring.tilt_rate),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name: name(), field });
            }
        }
        if ring.inner_radius <= 0.0 {
            return Err(ConfigError::NonPositiveRingRadius {
                name: name(),
                inner: ring.inner_radius,
            });
        }
        if ring.outer_radius <= ring.inner_radius {
            return Err(ConfigError::MalformedRing {
                name: name(),
                inner: ring.inner_radius,
                outer: ring.outer_radius,
            });
        }
    }
    Ok(())
}

fn descriptor_from(body: &BodyConfig, initial_phase: f32) -> BodyDescriptor {
    BodyDescriptor {
        radius: body.radius,
        distance: body.distance,
        axial_rate: body.axial_rate,
        revolution_rate: body.revolution_rate,
        ring: body.ring.as_ref().map(|ring| RingDescriptor {
            inner_radius: ring.inner_radius,
            outer_radius: ring.outer_radius,
            tilt_rate: ring.tilt_rate,
            texture: ring.texture.clone(),
        }),
        initial_phase,
        texture: body.texture.clone(),
    }
}
