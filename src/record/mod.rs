// src/record/mod.rs

//! The decoded unit of the engine's output stream and a builder for
//! locally-produced records.

mod builder;
mod model;

pub use builder::RecordBuilder;
pub use model::{Channel, Level, PRODUCER_NAME, Record, TIME_FORMAT, decode_line};
