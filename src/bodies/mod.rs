//! Body descriptor table
//!
//! Static per-body configuration (radius, orbit distance, angular rates,
//! rings) validated once at startup.

pub mod defaults;
pub mod descriptor;
pub mod phase;
pub mod table;

pub use descriptor::{BodyConfig, BodyDescriptor, RingConfig, RingDescriptor, SystemConfig};
pub use phase::PhaseSource;
pub use table::{BodyEntry, BodyTable};
