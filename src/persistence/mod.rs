pub mod file_store;
pub mod http_store;
pub mod repository;
pub mod wire;
