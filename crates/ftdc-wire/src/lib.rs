#![warn(clippy::pedantic)]

pub mod error;
pub mod reader;
pub mod varint;

pub use error::WireError;
pub use reader::ByteReader;
pub use varint::{MAX_VARINT_BYTES, decode_varint, encode_varint};
