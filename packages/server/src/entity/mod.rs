pub mod content_document;
pub mod inquiry;
