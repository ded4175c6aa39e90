//! Per-robot motion planning and execution.
//!
//! [`find_path`](path::find_path) is the uniform-cost search every plan is
//! built from; [`Robot`] wraps it in the reactive state machine that takes
//! a robot through pickup, drop, and recall while dodging hazards it has
//! personally observed.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod path;
pub mod robot;

pub use path::find_path;
pub use robot::{Arrival, Robot};
