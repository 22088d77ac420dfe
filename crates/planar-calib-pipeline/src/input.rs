use crate::{CalibrationBuilder, CalibrationConfig, CalibrationResult};
use anyhow::{Context, Result};
use planar_calib_core::Pt2;
use serde::{Deserialize, Serialize};

/// Serializable calibration input: the model points and, for every view, the
/// observed image points in model order.
///
/// In JSON every point is a `[x, y]` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationInput {
    pub model: Vec<Pt2>,
    pub views: Vec<Vec<Pt2>>,
}

impl CalibrationInput {
    /// Builder holding this model and all views.
    pub fn to_builder(&self, config: CalibrationConfig) -> Result<CalibrationBuilder> {
        let mut builder = CalibrationBuilder::new(self.model.clone()).with_config(config);
        for (idx, view) in self.views.iter().enumerate() {
            builder
                .add_view(view.clone())
                .with_context(|| format!("invalid view {idx}"))?;
        }
        Ok(builder)
    }
}

/// One-shot calibration of a [`CalibrationInput`].
pub fn run_calibration(
    input: &CalibrationInput,
    config: &CalibrationConfig,
) -> Result<CalibrationResult> {
    input.to_builder(config.clone())?.build()
}
