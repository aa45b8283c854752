//! Built-in star system: the Sun and the eight planets

use crate::bodies::descriptor::{BodyConfig, RingConfig, SystemConfig};

fn planet(name: &str, radius: f32, distance: f32, rotation: f32, revolution: f32) -> BodyConfig {
    BodyConfig::new(name, radius)
        .orbit(distance, revolution)
        .spin(rotation)
        .texture(format!("textures/{}.jpg", name))
}

fn ring(inner_radius: f32, outer_radius: f32, tilt_rate: f32, texture: &str) -> RingConfig {
    RingConfig {
        inner_radius,
        outer_radius,
        tilt_rate,
        texture: Some(texture.to_string()),
    }
}

/// Scale model used when no configuration file is present
///
/// Radii and distances are scene units, rates are radians per frame.
pub fn solar_system() -> SystemConfig {
    SystemConfig {
        central: BodyConfig::new("sun", 15.0)
            .spin(0.0008)
            .texture("textures/sun.jpg"),
        orbiting: vec![
            planet("mercury", 2.8, 25.0, 0.0038, 0.02),
            planet("venus", 4.8, 40.0, -0.002, 0.013),
            planet("earth", 5.0, 60.0, 0.1571, 0.009),
            planet("mars", 3.2, 75.0, 0.0107, 0.006),
            planet("jupiter", 9.0, 100.0, 0.65, 0.0057),
            planet("saturn", 7.6, 125.0, 0.5568, 0.0055).ring(ring(
                9.0,
                12.0,
                0.5,
                "textures/saturn_ring.png",
            )),
            planet("uranus", 6.6, 145.0, 0.0003, 0.0053).ring(ring(
                8.0,
                10.5,
                0.0004,
                "textures/uranus_ring.png",
            )),
            planet("neptune", 6.0, 165.0, 0.0003, 0.0051),
        ],
    }
}
