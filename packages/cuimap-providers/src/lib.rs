pub mod morphology;
pub mod translation;
