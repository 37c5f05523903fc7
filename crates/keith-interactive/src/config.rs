use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Padding added on both sides of the band when a level has a single layer.
pub const DEFAULT_SINGLE_LAYER_PADDING: f64 = 10.0;

/// Which constraint family a drop produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintMode {
    /// Pin the node to a layer and/or a position inside the layer.
    #[default]
    Absolute,
    /// Order the node relative to an in-layer neighbour.
    Relative,
}

impl std::str::FromStr for ConstraintMode {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "absolute" => Ok(Self::Absolute),
            "relative" => Ok(Self::Relative),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractiveOptions {
    pub single_layer_padding: f64,
    pub mode: ConstraintMode,
}

impl Default for InteractiveOptions {
    fn default() -> Self {
        Self {
            single_layer_padding: DEFAULT_SINGLE_LAYER_PADDING,
            mode: ConstraintMode::Absolute,
        }
    }
}

impl InteractiveOptions {
    pub fn relative() -> Self {
        Self {
            mode: ConstraintMode::Relative,
            ..Default::default()
        }
    }

    /// Parses options from JSON. Missing keys keep their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
