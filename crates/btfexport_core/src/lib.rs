//! Load BTF type information from ELF objects or raw blobs and export it as JSON.

/// BTF loading, the type store, and the JSON export engine.
pub mod btf;
