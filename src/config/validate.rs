// src/config/validate.rs

use crate::config::model::{ParamsFile, RawParamsFile};
use crate::errors::{ReadinessError, Result};

impl TryFrom<RawParamsFile> for ParamsFile {
    type Error = ReadinessError;

    fn try_from(raw: RawParamsFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_params(&raw)?;
        Ok(ParamsFile::new_unchecked(raw.parameters, raw.clustering))
    }
}

fn validate_raw_params(raw: &RawParamsFile) -> Result<()> {
    validate_stage_weight("alpha", raw.parameters.alpha)?;
    validate_stage_weight("beta", raw.parameters.beta)?;
    validate_stage_weight("gamma", raw.parameters.gamma)?;

    if !(0.0..=1.0).contains(&raw.parameters.threshold) {
        return Err(ReadinessError::ConfigError(format!(
            "[parameters].threshold must be in [0, 1] (got {})",
            raw.parameters.threshold
        )));
    }

    if raw.clustering.k == 0 {
        return Err(ReadinessError::ConfigError(
            "[clustering].k must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_stage_weight(name: &str, value: f64) -> Result<()> {
    if !(0.0..=5.0).contains(&value) {
        return Err(ReadinessError::ConfigError(format!(
            "[parameters].{name} must be in [0, 5] (got {value})"
        )));
    }
    Ok(())
}
