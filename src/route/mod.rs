// src/route/mod.rs

//! The log router: level thresholding and channel-based routing of decoded
//! records, one at a time.

mod router;

pub use router::{Disposition, LogRouter, format_line};
