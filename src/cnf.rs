pub const LOGO: &str = r"
 .-------------------------------.
 |  pyrite - a metrics pipeline  |
 '-------------------------------'
";

pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The release identifier reported on startup
pub fn release() -> String {
	format!("{PKG_NAME} {PKG_VERSION}")
}
