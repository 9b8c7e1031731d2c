pub mod content_negotiation;
pub mod request_id;
