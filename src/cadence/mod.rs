//! Focus-mode prompt cadence.

pub mod engine;
pub mod policy;

pub use engine::PromptCadenceEngine;
pub use policy::CadencePolicy;
