use std::ffi::OsString;

/// Long options that may also be spelled with a single dash.
const LONG_FLAGS: &[&str] = &["target", "dereference", "as-map", "verbose", "pretty", "help", "version"];

/// Rewrite `-flag` and `-flag=value` to their `--` form for every known long option.
///
/// Arguments after a bare `--` are left untouched.
pub fn normalize_long_flags<I>(args: I) -> Vec<OsString>
where
	I: IntoIterator<Item = OsString>,
{
	let mut out = Vec::new();
	let mut passthrough = false;

	for arg in args {
		if passthrough {
			out.push(arg);
			continue;
		}
		if arg == "--" {
			passthrough = true;
			out.push(arg);
			continue;
		}

		let rewritten = arg.to_str().and_then(single_dash_long).map(OsString::from);
		out.push(rewritten.unwrap_or(arg));
	}

	out
}

fn single_dash_long(arg: &str) -> Option<String> {
	let body = arg.strip_prefix('-')?;
	if body.starts_with('-') {
		return None;
	}
	let name = body.split_once('=').map_or(body, |(name, _)| name);
	LONG_FLAGS.contains(&name).then(|| format!("-{arg}"))
}
