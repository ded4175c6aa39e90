//! The warehouse floor: a bounded 2D grid with static obstacles.
//!
//! [`Grid`] answers the three questions every planner asks — is this cell
//! on the floor, is it shelving, who are its neighbours — and nothing
//! else. Obstacles are added during setup and fixed for the rest of a
//! simulation run.
//!
//! The [`layout`] module generates realistic floors: shelving rows with
//! aisle gaps plus random clutter, deterministic under a fixed seed.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod layout;

pub use error::GridError;
pub use grid::Grid;
pub use layout::LayoutParams;
