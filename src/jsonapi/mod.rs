//! JSON:API document shapes and the mapping between records and documents.

pub mod deserializer;
pub mod document;
pub mod include;
pub mod links;
pub mod serializer;

pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";
