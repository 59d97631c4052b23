#[macro_use]
extern crate tracing;

#[macro_use]
mod mac;

pub mod cache;
pub mod cnf;
pub mod ctx;
pub mod err;
pub mod fnc;
pub mod obs;
pub mod rpc;
pub mod series;
