//! Configuration loading and representation.
//!
//! Values come from the process environment; missing optional values fall back to
//! defaults with a warning.

use std::path::PathBuf;

use taxclass_classification::RegistryConfig;
use taxclass_core::CompanyId;

use crate::error::InfraError;

pub const SNAPSHOT_VAR: &str = "TAXCLASS_SNAPSHOT";
pub const OUTPUT_VAR: &str = "TAXCLASS_OUTPUT";
pub const DEFAULT_COMPANY_VAR: &str = "TAXCLASS_DEFAULT_COMPANY";

/// Settings for one backfill run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackfillConfig {
    pub snapshot_path: PathBuf,
    pub output_path: PathBuf,
    pub registry: RegistryConfig,
}

impl BackfillConfig {
    /// Read the process environment. `snapshot_arg` (the first CLI argument) takes
    /// precedence over `TAXCLASS_SNAPSHOT`.
    pub fn from_env(snapshot_arg: Option<String>) -> Result<Self, InfraError> {
        Self::from_lookup(snapshot_arg, |key| std::env::var(key).ok())
    }

    pub fn from_lookup(
        snapshot_arg: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, InfraError> {
        let snapshot_path = snapshot_arg
            .or_else(|| lookup(SNAPSHOT_VAR))
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| {
                InfraError::Config(format!(
                    "no snapshot given (pass a path or set {SNAPSHOT_VAR})"
                ))
            })?;

        let output_path = match lookup(OUTPUT_VAR).filter(|s| !s.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => {
                tracing::warn!("{OUTPUT_VAR} not set; the snapshot will be rewritten in place");
                snapshot_path.clone()
            }
        };

        let default_company = match lookup(DEFAULT_COMPANY_VAR).filter(|s| !s.trim().is_empty()) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<CompanyId>()
                    .map_err(|e| InfraError::Config(format!("{DEFAULT_COMPANY_VAR}: {e}")))?,
            ),
            None => None,
        };

        Ok(Self {
            snapshot_path,
            output_path,
            registry: RegistryConfig { default_company },
        })
    }
}
