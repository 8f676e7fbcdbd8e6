#![warn(clippy::pedantic)]

pub mod decoder;
pub mod error;
pub mod value;

pub use decoder::{DecodeMode, MIN_DOCUMENT_LEN, decode_document};
pub use error::BsonError;
pub use value::{BsonValue, Document};
