pub mod prelude;

pub mod file_models;
pub mod posts;
