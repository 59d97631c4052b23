use crate::cnf::{LOGO, release};
use crate::{net, telemetry};
use anyhow::Result;
use clap::Args;
use std::net::IpAddr;

#[derive(Args, Debug)]
pub struct StartCommandArguments {
	#[arg(help = "The interface to bind the listeners to")]
	#[arg(long = "bind", env = "PYRITE_BIND", default_value = "127.0.0.1")]
	pub bind: IpAddr,
	#[arg(help = "The port for the newline-delimited text listener (TCP)")]
	#[arg(long = "line-port", env = "PYRITE_LINE_PORT")]
	pub line_port: Option<u16>,
	#[arg(help = "The port for the newline-delimited text listener (UDP)")]
	#[arg(long = "udp-port", env = "PYRITE_UDP_PORT")]
	pub udp_port: Option<u16>,
	#[arg(help = "The port for the length-prefixed batched listener (TCP)")]
	#[arg(long = "batch-port", env = "PYRITE_BATCH_PORT")]
	pub batch_port: Option<u16>,
	#[arg(help = "The port for the cache query handler (TCP)")]
	#[arg(long = "query-port", env = "PYRITE_QUERY_PORT")]
	pub query_port: Option<u16>,
	#[arg(help = "The number of pending datapoints at which ingestion pauses")]
	#[arg(long = "max-cache-size", env = "PYRITE_MAX_CACHE_SIZE", default_value = "1000000")]
	pub max_cache_size: u64,
	#[arg(help = "The logging level")]
	#[arg(long = "log", env = "PYRITE_LOG", default_value = "info")]
	#[arg(value_parser = ["error", "warn", "info", "debug", "trace"])]
	pub log: String,
}

pub fn init(args: StartCommandArguments) -> Result<()> {
	// Start the logging subsystem before anything else speaks
	telemetry::init(&args.log)?;
	// Output the startup banner
	println!("{LOGO}");
	info!("Starting {}", release());
	// All listeners share one multi-threaded reactor
	let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
	runtime.block_on(net::init(args))
}
