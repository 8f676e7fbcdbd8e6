#![warn(clippy::pedantic)]

pub mod archive;
pub mod chunk;
pub mod decompression;
pub mod delta;
pub mod error;
pub mod reference;
pub mod samples;
pub mod streaming;

pub use archive::{ArchiveDecoder, decode_archive};
pub use chunk::Envelope;
pub use decompression::MAX_CHUNK_DECOMPRESSED_SIZE;
pub use delta::MAX_SAMPLE_SLOTS;
pub use error::DecodeError;
pub use samples::{SampleBatch, SampleRecord};
pub use streaming::StreamingDecoder;
