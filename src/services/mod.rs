pub mod jsonapi_service;
pub mod record_store;
pub mod resolver;
