//! Postgres `COPY` value codec and streaming pipeline.

pub mod codec;
pub mod pipeline;

pub use codec::{POSTGRES_COPY_NULL_VALUE, decode_copy_value, encode_copy_value};
pub use pipeline::CopyPipeline;
