//! patrol-router: per-group patrol route optimization.
//!
//! Partitions enforcement locations into patrol groups, solves a fixed-start
//! visiting order per group over a travel-duration matrix, and grounds each
//! order in real directions as a full and a condensed route.

pub mod config;
pub mod error;
pub mod haversine;
pub mod location;
pub mod materializer;
pub mod matrix;
pub mod ors;
pub mod pipeline;
pub mod polyline;
pub mod retry;
pub mod route;
pub mod solver;
pub mod store;
pub mod traits;
