use tracing_subscriber::EnvFilter;

const CRATES: &[&str] = &["btfexport", "btfexport_cli"];

/// Install the stderr subscriber: `warn` everywhere, `debug` for our crates when verbose.
pub fn init(verbose: bool) {
	let filter = if verbose {
		let allowlist: Vec<String> = CRATES.iter().map(|krate| format!("{krate}=debug")).collect();
		EnvFilter::new(format!("warn,{}", allowlist.join(",")))
	} else {
		EnvFilter::new("warn")
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();
}
