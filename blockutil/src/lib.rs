//! Plumbing shared by the block tools: logging, timing, and reading/writing JSON documents.

#[macro_use]
extern crate log;

mod io;
pub mod logger;
mod time;

pub use crate::io::{read_json, write_json};
pub use crate::time::{elapsed_seconds, prettyprint_time, prettyprint_usize, Timer};

// How often to print progress for long loops
const PROGRESS_FREQUENCY_SECONDS: f64 = 0.2;
