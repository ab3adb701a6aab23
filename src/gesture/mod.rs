pub mod applier;
pub mod classifier;
pub mod gesture_model;
