//! Common label stock sizes.

use crate::error::{LabelError, Result};

/// Key of the pseudo-preset that means "use width/height as given"
pub const CUSTOM_PRESET: &str = "custom";

/// Key of the preset selected when nothing else is configured
pub const DEFAULT_PRESET: &str = "standard-plant";

/// A named label stock size, width x height in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPreset {
    pub key: &'static str,
    pub name: &'static str,
    pub width_mm: f64,
    pub height_mm: f64,
}

impl LabelPreset {
    /// Human readable size, e.g. "70 x 35 mm / 2.76 x 1.38 in"
    pub fn size_text(&self) -> String {
        format!(
            "{} x {} mm / {:.2} x {:.2} in",
            self.width_mm,
            self.height_mm,
            self.width_mm / 25.4,
            self.height_mm / 25.4
        )
    }
}

pub const PRESETS: &[LabelPreset] = &[
    LabelPreset { key: "cryovial", name: "Cryovial", width_mm: 25.0, height_mm: 12.0 },
    LabelPreset { key: "small-label", name: "Small Label", width_mm: 67.0, height_mm: 25.0 },
    LabelPreset { key: "wristband", name: "Wristband Label", width_mm: 254.0, height_mm: 25.0 },
    LabelPreset { key: "small-plant-tag", name: "Small Plant Tag", width_mm: 50.0, height_mm: 25.0 },
    LabelPreset { key: "cryobox", name: "Cryobox / Tube", width_mm: 30.0, height_mm: 15.0 },
    LabelPreset { key: "general-purpose", name: "General Purpose", width_mm: 76.0, height_mm: 25.0 },
    LabelPreset { key: "food", name: "Food Label", width_mm: 76.0, height_mm: 51.0 },
    LabelPreset { key: "tag", name: "Tag Label", width_mm: 57.0, height_mm: 102.0 },
    LabelPreset { key: "standard-plant", name: "Standard Plant Label", width_mm: 70.0, height_mm: 35.0 },
    LabelPreset { key: "large-field", name: "Large Field Label", width_mm: 90.0, height_mm: 45.0 },
    LabelPreset { key: "shipping", name: "Shipping Label", width_mm: 102.0, height_mm: 152.0 },
    LabelPreset { key: "square", name: "Square Label", width_mm: 51.0, height_mm: 51.0 },
];

/// Find a preset by key (case-insensitive)
pub fn find_preset(key: &str) -> Result<&'static LabelPreset> {
    PRESETS
        .iter()
        .find(|p| p.key.eq_ignore_ascii_case(key))
        .ok_or_else(|| LabelError::UnknownPreset(key.to_string()))
}

/// Preset keys in cycling order, with `custom` first
pub fn preset_keys() -> Vec<&'static str> {
    std::iter::once(CUSTOM_PRESET)
        .chain(PRESETS.iter().map(|p| p.key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_preset_exists() {
        let preset = find_preset(DEFAULT_PRESET).unwrap();
        assert_eq!((preset.width_mm, preset.height_mm), (70.0, 35.0));
    }

    #[test]
    fn test_preset_keys_are_unique() {
        let keys: HashSet<&str> = PRESETS.iter().map(|p| p.key).collect();
        assert_eq!(keys.len(), PRESETS.len());
        assert!(!keys.contains(CUSTOM_PRESET));
    }

    #[test]
    fn test_find_preset_is_case_insensitive() {
        assert_eq!(find_preset("CryoVial").unwrap().key, "cryovial");
        assert!(matches!(
            find_preset("envelope"),
            Err(LabelError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_size_text() {
        let preset = find_preset("general-purpose").unwrap();
        assert_eq!(preset.size_text(), "76 x 25 mm / 2.99 x 0.98 in");
    }
}
