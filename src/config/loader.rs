// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ParamsFile, RawParamsFile};
use crate::errors::Result;

/// Load a parameter file from a given path and return the raw `RawParamsFile`.
///
/// This only performs TOML deserialization; it does **not** perform range
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawParamsFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let raw: RawParamsFile = toml::from_str(&contents)?;

    Ok(raw)
}

/// Load a parameter file from path and run validation.
///
/// This is the recommended entry point:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks parameter ranges (alpha/beta/gamma, threshold, k).
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ParamsFile> {
    let raw = load_from_path(&path)?;
    let params = ParamsFile::try_from(raw)?;
    Ok(params)
}

/// Default config path: `Readydag.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Readydag.toml")
}
