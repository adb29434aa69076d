pub mod data_uri;
pub mod domain;
pub mod error;
pub mod protocol;
