#[macro_use]
extern crate tracing;

pub mod cli;
pub mod cnf;
pub mod drain;
pub mod net;
pub mod telemetry;
