// Purpose - utilization to note mapping

pub mod clamp;
pub mod generator;
pub mod policy;

pub use clamp::clamp;
pub use generator::{derive_note, IndexPolicies, NoteGenerator, Voice};
pub use policy::IndexPolicy;
