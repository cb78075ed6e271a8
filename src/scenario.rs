//! Loading and checking scenarios before they reach the estimator.
//!
//! A scenario file holds every [`ClusterInputs`] field at the top level and an
//! optional `pricing` table:
//!
//! ```toml
//! source_hosts = 10
//! source_sockets = 2
//! # ...
//! redundancy_level = "n+1"
//! target_license = "pro"
//!
//! [pricing]
//! target_pro_per_core = 420.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::model::ClusterInputs;
use crate::pricing::{self, PriceBook};

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported scenario format {0:?} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ScenarioError>;

/// Inputs plus the prices to evaluate them against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(flatten)]
    pub inputs: ClusterInputs,
    #[serde(default)]
    pub pricing: PriceBook,
}

impl Scenario {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Reads a scenario, picking the parser from the file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
        debug!(path = %path.display(), format = ?ext, "loading scenario");
        match ext.as_deref() {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(ScenarioError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ScenarioError {
    ScenarioError::InvalidInput {
        field,
        reason: reason.into(),
    }
}

fn non_negative(field: &'static str, x: f64) -> Result<()> {
    if !x.is_finite() || x < 0.0 {
        return Err(invalid(field, format!("must be a finite value >= 0, got {}", x)));
    }
    Ok(())
}

/// Rejects inputs that would push the estimator into its degenerate cases
/// (zero legacy cost, non-positive node capacity, out-of-range growth).
pub fn validate(inputs: &ClusterInputs) -> Result<()> {
    if inputs.source_hosts == 0 {
        return Err(invalid("source_hosts", "must be > 0"));
    }
    if inputs.source_sockets == 0 {
        return Err(invalid("source_sockets", "must be > 0"));
    }
    non_negative("source_ram", inputs.source_ram)?;
    non_negative("source_usable_storage", inputs.source_usable_storage)?;
    non_negative("growth_factor", inputs.growth_factor)?;
    if inputs.growth_factor > 50.0 {
        return Err(invalid(
            "growth_factor",
            format!("must be within 0..=50, got {}", inputs.growth_factor),
        ));
    }
    non_negative("target_ram", inputs.target_ram)?;
    non_negative("target_raw_storage", inputs.target_raw_storage)?;

    let (cvm_cores, cvm_ram) = pricing::cvm_reservation(inputs.apply_cvm_overhead);
    let node_cores =
        u64::from(inputs.target_cores_per_socket) * u64::from(pricing::TARGET_SOCKETS_PER_NODE);
    if node_cores <= u64::from(cvm_cores) {
        return Err(invalid(
            "target_cores_per_socket",
            format!(
                "a node has {} cores, not more than the {} reserved for the CVM",
                node_cores, cvm_cores
            ),
        ));
    }
    if inputs.target_ram <= cvm_ram {
        return Err(invalid(
            "target_ram",
            format!(
                "{} GB is not more than the {} GB reserved for the CVM",
                inputs.target_ram, cvm_ram
            ),
        ));
    }
    if inputs.target_raw_storage <= 0.0 {
        return Err(invalid("target_raw_storage", "must be > 0"));
    }
    Ok(())
}
