//! End-to-end runs of the `btfexport` binary on synthetic inputs.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use btfexport_testkit::{BtfBuilder, INT_SIGNED, LINKAGE_GLOBAL, elf_with_btf_section};
use serde_json::{Value, json};

fn scenario_blob() -> Vec<u8> {
	let mut builder = BtfBuilder::new();
	let int = builder.int("int", 4, INT_SIGNED);
	builder.structure("Foo", 6, &[("v1", int, 0)]);
	builder.build()
}

/// `1 int`, `2 const int`, `3 const int *`, `4 struct holder { p; p; }`, `5 struct holder *`, `6 proto`, `7 func use_holder`.
fn wrapped_blob() -> Vec<u8> {
	let mut builder = BtfBuilder::new();
	let int = builder.int("int", 4, INT_SIGNED);
	let konst = builder.constant(int);
	let ptr = builder.pointer(konst);
	let holder = builder.structure("holder", 16, &[("p", ptr, 0), ("p", int, 64)]);
	let holder_ptr = builder.pointer(holder);
	let proto = builder.func_proto(int, &[("h", holder_ptr)]);
	builder.func("use_holder", proto, LINKAGE_GLOBAL);
	builder.build()
}

fn write_input(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
	let path = dir.join(name);
	std::fs::write(&path, bytes).expect("input writes");
	path
}

fn btfexport(args: &[&str], input: &Path) -> Output {
	Command::new(env!("CARGO_BIN_EXE_btfexport"))
		.args(args)
		.arg(input)
		.output()
		.expect("binary runs")
}

fn read_output(input: &Path) -> Value {
	let mut path = input.as_os_str().to_owned();
	path.push(".json");
	let bytes = std::fs::read(PathBuf::from(path)).expect("output exists");
	serde_json::from_slice(&bytes).expect("output is json")
}

#[test]
fn full_dump_of_raw_blob() {
	let dir = tempfile::tempdir().expect("tempdir");
	let input = write_input(dir.path(), "vmlinux", &scenario_blob());

	let out = btfexport(&[], &input);
	assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

	let value = read_output(&input);
	let kinds: Vec<&str> = value
		.as_array()
		.expect("dump is an array")
		.iter()
		.map(|node| node["type_name"].as_str().expect("type_name"))
		.collect();
	assert_eq!(kinds, ["void", "int", "struct"]);
}

#[test]
fn closure_from_elf_target_with_single_dash_flags() {
	let dir = tempfile::tempdir().expect("tempdir");
	let input = write_input(dir.path(), "prog.o", &elf_with_btf_section(&scenario_blob()));

	let out = btfexport(&["-target", "struct:Foo"], &input);
	assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

	assert_eq!(
		read_output(&input),
		json!({
			"1": {"type_name": "int", "name": "int", "size": 4, "encoding": "signed"},
			"2": {"type_name": "struct", "size": 6, "name": "Foo", "members": [{"name": "v1", "type": 1, "offset": 0, "bit_field_size": 0, "size": 4}]},
		})
	);
}

#[test]
fn dereference_and_map_options_shape_the_closure() {
	let dir = tempfile::tempdir().expect("tempdir");
	let input = write_input(dir.path(), "wrapped", &wrapped_blob());

	let out = btfexport(&["--target", "use_holder"], &input);
	assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
	let plain = read_output(&input);
	let mut keys: Vec<u32> = plain.as_object().expect("closure").keys().map(|key| key.parse().expect("numeric key")).collect();
	keys.sort_unstable();
	assert_eq!(keys, [1, 2, 3, 4, 5, 6, 7]);
	assert_eq!(plain["3"]["target_type"], 2);
	assert_eq!(plain["4"]["members"].as_array().map(Vec::len), Some(2));

	let out = btfexport(&["-target", "use_holder", "-dereference"], &input);
	assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
	let deref = read_output(&input);
	assert_eq!(deref["3"]["target_type"], 1);
	assert!(deref.get("2").is_none(), "const wrapper is skipped");

	let out = btfexport(&["-target", "use_holder", "-dereference", "-as-map"], &input);
	assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
	let keyed = read_output(&input);
	assert_eq!(keyed["4"]["members_map"]["p"]["type"], 1, "last duplicate wins");
	assert!(keyed["4"].get("members").is_none());
	assert!(keyed.get("3").is_none(), "overwritten member drops its pointer");
}

#[test]
fn pretty_output_parses_to_same_document() {
	let dir = tempfile::tempdir().expect("tempdir");
	let compact_input = write_input(dir.path(), "compact", &scenario_blob());
	let pretty_input = write_input(dir.path(), "pretty", &scenario_blob());

	assert!(btfexport(&[], &compact_input).status.success());
	assert!(btfexport(&["--pretty", "--verbose"], &pretty_input).status.success());
	assert_eq!(read_output(&compact_input), read_output(&pretty_input));
}

#[test]
fn missing_target_exits_with_error() {
	let dir = tempfile::tempdir().expect("tempdir");
	let input = write_input(dir.path(), "vmlinux", &scenario_blob());

	let out = btfexport(&["-target", "struct:Bar"], &input);
	assert_eq!(out.status.code(), Some(1));
	let stderr = String::from_utf8_lossy(&out.stderr);
	assert!(stderr.contains("error: target not found: struct:Bar"), "stderr: {stderr}");

	let mut output = input.as_os_str().to_owned();
	output.push(".json");
	assert!(!PathBuf::from(output).exists(), "no partial output");
}

#[test]
fn bad_category_and_bad_input_are_reported() {
	let dir = tempfile::tempdir().expect("tempdir");
	let input = write_input(dir.path(), "vmlinux", &scenario_blob());
	let out = btfexport(&["-target", "klass:Foo"], &input);
	assert_eq!(out.status.code(), Some(1));
	assert!(String::from_utf8_lossy(&out.stderr).contains("bad category klass"));

	let junk = write_input(dir.path(), "junk", b"not an object");
	let out = btfexport(&[], &junk);
	assert_eq!(out.status.code(), Some(1));
	assert!(String::from_utf8_lossy(&out.stderr).starts_with("error: "));
}

#[test]
fn blank_target_list_is_rejected() {
	let dir = tempfile::tempdir().expect("tempdir");
	let input = write_input(dir.path(), "vmlinux", &scenario_blob());

	for list in [",", " ", ", ,"] {
		let out = btfexport(&["-target", list], &input);
		assert_eq!(out.status.code(), Some(1), "target list {list:?}");
		assert!(String::from_utf8_lossy(&out.stderr).contains("error: invalid target"), "target list {list:?}");
	}

	let mut output = input.as_os_str().to_owned();
	output.push(".json");
	assert!(!PathBuf::from(output).exists(), "no fallback dump");
}
