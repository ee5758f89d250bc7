//! Build script for the storefront crate.
//!
//! Content-hashes the stylesheet so templates can reference an immutable,
//! cache-friendly filename.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let css_path = Path::new(&manifest_dir).join("static/css/main.css");

    println!("cargo:rerun-if-changed={}", css_path.display());

    // The stylesheet may be absent in a fresh checkout; leave the hash empty
    // instead of failing the build.
    let Ok(content) = fs::read(&css_path) else {
        println!("cargo:warning=static/css/main.css not found, CSS_HASH left empty");
        println!("cargo:rustc-env=CSS_HASH=");
        return;
    };

    let digest = format!("{:x}", Sha256::digest(&content));
    let short_hash = digest.get(..8).unwrap_or_default();
    println!("cargo:rustc-env=CSS_HASH={short_hash}");

    // Keep a copy under the hashed name next to the plain one.
    let derived_dir = Path::new(&manifest_dir).join("static/css/derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create derived CSS directory");

    let derived_path = derived_dir.join(format!("main.{short_hash}.css"));
    fs::copy(&css_path, &derived_path).expect("Failed to copy CSS to derived directory");
}
