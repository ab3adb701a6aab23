pub mod form_model;
pub mod stats;
pub mod submission;
