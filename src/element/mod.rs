pub mod element_model;
pub mod registry;
pub mod text_field;
