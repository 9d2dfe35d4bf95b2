//! The contents of this crate need to be organized better:
//!
//! - Timer (a mix of logging and profiling)
//! - true utility functions (collections, prettyprinting)
//! - JSON (de)serialization helpers

#[macro_use]
extern crate log;

mod collections;
mod io;
pub mod logger;
mod time;
mod utils;

pub use crate::collections::{Counter, MultiMap};
pub use crate::io::{
    deserialize_btreemap, deserialize_multimap, from_json, read_json, serialize_btreemap,
    serialize_multimap, to_json, write_json,
};
pub use crate::time::{elapsed_seconds, prettyprint_time, Timer};
pub use crate::utils::{plain_list_names, prettyprint_usize};

const PROGRESS_FREQUENCY_SECONDS: f64 = 0.2;
