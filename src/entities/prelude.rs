pub use super::file_models::Entity as FileModels;
pub use super::posts::Entity as Posts;
