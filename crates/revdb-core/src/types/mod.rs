//! Core types for revdb.

mod application;
mod filter;

pub use application::*;
pub use filter::*;
