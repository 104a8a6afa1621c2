//! # Settings
//!
//! Loads the engine configuration from a TOML file.
//!
//! ## Resolution order
//!
//! 1. `--config <path>` on the command line
//! 2. `WORKLOAD_CONFIG` environment variable
//! 3. Built-in defaults
//!
//! Every key is optional; missing keys keep their default. Unknown keys are
//! rejected so that typos do not silently fall back to defaults.
//!
//! ```toml
//! staff_effort_multiplier = "3.31"
//! effort_multiplier = "2.788"
//! contingency_buffer = "0.10"
//! capacity_contingency = "0.10"
//! nominal_fte_hours = 800
//! delivery_basis = "programme"
//!
//! [nominal_annual_hours]
//! AEF_TEACHING = 1362
//! ```

use std::path::{Path, PathBuf};
use workload_core::{EngineConfig, WorkloadError};

/// Maximum configuration file size (64 KB).
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

/// Get the configuration path from `WORKLOAD_CONFIG`, if set and non-empty.
pub fn get_config_path_from_env() -> Option<PathBuf> {
    std::env::var("WORKLOAD_CONFIG")
        .ok()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
}

/// Parse and validate a TOML configuration document.
pub fn parse_config(text: &str) -> Result<EngineConfig, WorkloadError> {
    let config: EngineConfig =
        toml::from_str(text).map_err(|e| WorkloadError::invalid_config("config", e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Read a configuration file.
pub fn load_config_file(path: &Path) -> Result<EngineConfig, WorkloadError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        WorkloadError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
    })?;
    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(WorkloadError::invalid_config(
            "config",
            format!(
                "file size {} bytes exceeds maximum {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            ),
        ));
    }

    let text = std::fs::read_to_string(path).map_err(|e| {
        WorkloadError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
    })?;
    parse_config(&text)
}

/// Resolve the configuration from the command line, the environment, or defaults.
pub fn resolve_config(cli_path: Option<&Path>) -> Result<EngineConfig, WorkloadError> {
    let path = cli_path.map(Path::to_path_buf).or_else(get_config_path_from_env);

    match path {
        Some(path) => {
            tracing::info!("Loading engine configuration from {:?}", path);
            load_config_file(&path)
        }
        None => {
            tracing::debug!("No configuration file, using defaults");
            Ok(EngineConfig::default())
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use workload_core::{DeliveryBasis, StaffCategory};

    #[test]
    fn empty_document_is_default() {
        let config = parse_config("").expect("parse");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn overrides_apply() {
        let config = parse_config(
            r#"
            staff_effort_multiplier = "3.5"
            delivery_basis = "per_student"

            [nominal_annual_hours]
            AEF_TEACHING = 1362
            "#,
        )
        .expect("parse");

        assert_eq!(config.staff_effort_multiplier, Decimal::new(35, 1));
        assert_eq!(config.delivery_basis, DeliveryBasis::PerStudent);
        assert_eq!(
            config.annual_hours(StaffCategory::AefTeaching),
            Decimal::from(1362)
        );
        assert_eq!(config.annual_hours(StaffCategory::Al), Decimal::from(1053));
    }

    #[test]
    fn unknown_key_rejected() {
        let result = parse_config("staff_effort = 3");
        assert!(matches!(result, Err(WorkloadError::InvalidConfig { .. })));
    }

    #[test]
    fn out_of_range_rejected() {
        let result = parse_config("contingency_buffer = \"1.5\"");
        assert!(matches!(
            result,
            Err(WorkloadError::InvalidConfig { ref field, .. }) if field == "contingency_buffer"
        ));
    }

    #[test]
    fn explicit_path_is_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("engine.toml");
        std::fs::write(&path, "nominal_fte_hours = 750\n").expect("write");

        let config = resolve_config(Some(&path)).expect("resolve");
        assert_eq!(config.nominal_fte_hours, Decimal::from(750));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_config_file(Path::new("/nonexistent/engine.toml"));
        assert!(matches!(result, Err(WorkloadError::IoError(_))));
    }
}
