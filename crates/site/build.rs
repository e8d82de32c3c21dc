//! Build script for the site crate.
//!
//! Computes a content hash of the main stylesheet so templates can emit
//! a cache-busting query string.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    hash_css();
}

/// Hash static/css/main.css and expose the short digest as `CSS_HASH`.
///
/// Sets the `CSS_HASH` environment variable for use with `env!("CSS_HASH")`.
fn hash_css() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let css_path = Path::new(&manifest_dir).join("static/css/main.css");

    // Tell Cargo to rerun if main.css changes
    println!("cargo:rerun-if-changed={}", css_path.display());

    let content = match fs::read(&css_path) {
        Ok(content) => content,
        Err(e) => {
            // CSS might not exist yet during initial build
            println!("cargo:warning=Could not read main.css: {e}");
            println!("cargo:rustc-env=CSS_HASH=dev");
            return;
        }
    };

    // First 8 chars of SHA256 are plenty for cache busting
    let mut hasher = Sha256::new();
    hasher.update(&content);
    let digest = format!("{:x}", hasher.finalize());
    let short = digest.get(..8).unwrap_or("dev");

    println!("cargo:rustc-env=CSS_HASH={short}");
}
