pub mod gate;
pub mod manifest;
pub mod registry;

pub use gate::CapabilityGate;
pub use manifest::{DeclaredCapabilities, Manifest, ManifestError};
pub use registry::CapabilityRegistry;
