//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `scriptorium_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use scriptorium_core::TypeRegistry;

fn main() {
    let registry = TypeRegistry::standard();
    println!(
        "scriptorium_core version={}",
        scriptorium_core::core_version()
    );
    println!("scriptorium_core registered_tags={}", registry.len());
}
