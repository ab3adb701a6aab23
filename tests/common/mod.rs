pub mod fixtures;
pub mod http_stub;
