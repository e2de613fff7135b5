//! Test vector types for envelope compatibility tests.
//!
//! Vectors are JSON files under `tests/vectors/`; key paths inside them
//! are relative to the `tests/` directory.

// Some fields are only read by a subset of the tests
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// A test vector suite (top-level JSON structure).
#[derive(Debug, Deserialize)]
pub struct TestVectorSuite<T> {
    pub name: String,
    pub tests: Vec<T>,
}

/// Test vector for envelopes produced by another implementation.
#[derive(Debug, Deserialize)]
pub struct LegacyTestVector {
    pub name: String,
    #[serde(rename = "expect-fail")]
    pub expect_fail: bool,
    #[serde(default)]
    pub comment: Option<String>,
    /// Path to the PKCS#1 PEM public key
    #[serde(rename = "public-key")]
    pub public_key: String,
    /// Path to the PKCS#1 PEM private key
    #[serde(rename = "private-key")]
    pub private_key: String,
    /// Signed envelope (base64)
    pub signed: String,
    /// Sealed envelope (base64)
    pub sealed: String,
    /// Expected JSON payload of the signed envelope (null for fail tests)
    pub payload: Option<serde_json::Value>,
    /// Expected plaintext of the sealed envelope (null for fail tests)
    pub plaintext: Option<String>,
}

/// Root of the `tests/` directory.
pub fn tests_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests")
}

/// Loads a vector suite from `tests/vectors/{file}`.
pub fn load_vectors<T: DeserializeOwned>(file: &str) -> TestVectorSuite<T> {
    let path = tests_dir().join("vectors").join(file);
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {e}", path.display()))
}

/// Reads a fixture file relative to `tests/`.
pub fn read_fixture(relative: &str) -> String {
    let path = tests_dir().join(relative);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
}
