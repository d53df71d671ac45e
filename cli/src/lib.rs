//! Command-line host for the request pipeline.
//!
//! # Overview
//! Performs the I/O the core leaves out: flag parsing, reading the request
//! file, executing the HTTP round-trip with ureq and writing the response.
//!
//! # Design
//! - `args` seeds a `RequestConfig`; the core's descriptor parser then
//!   applies the input's directives on top.
//! - `transport::UreqTransport` implements the core's `Transport` trait.
//! - `app::execute` returns either a `Completion` or a `Failure`, both
//!   carrying the exit-code policy, and leaves process exit to `main`.

pub mod app;
pub mod args;
pub mod io;
pub mod logging;
pub mod transport;

pub use app::{execute, Completion, Failure};
pub use args::Args;
pub use transport::UreqTransport;
