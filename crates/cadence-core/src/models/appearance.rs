//! Presentation preferences persisted alongside the team settings.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Color theme of the front-end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    ProfessionalBlue,
    GreenNature,
    PurpleCorporate,
    OrangeEnergy,
    DarkMode,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::ProfessionalBlue,
        Theme::GreenNature,
        Theme::PurpleCorporate,
        Theme::OrangeEnergy,
        Theme::DarkMode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::ProfessionalBlue => "professional-blue",
            Theme::GreenNature => "green-nature",
            Theme::PurpleCorporate => "purple-corporate",
            Theme::OrangeEnergy => "orange-energy",
            Theme::DarkMode => "dark-mode",
        }
    }

    /// Human readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Theme::ProfessionalBlue => "Professional Blue",
            Theme::GreenNature => "Green Nature",
            Theme::PurpleCorporate => "Purple Corporate",
            Theme::OrangeEnergy => "Orange Energy",
            Theme::DarkMode => "Dark Mode",
        }
    }

    /// Primary accent color as a hex string.
    pub fn primary(&self) -> &'static str {
        match self {
            Theme::ProfessionalBlue => "#2563eb",
            Theme::GreenNature => "#059669",
            Theme::PurpleCorporate => "#7c3aed",
            Theme::OrangeEnergy => "#ea580c",
            Theme::DarkMode => "#3b82f6",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("Invalid theme: {s}"))
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Base font size of the front-end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        }
    }

    /// Scale relative to the medium size.
    pub fn scale(&self) -> f32 {
        match self {
            FontSize::Small => 0.875,
            FontSize::Medium => 1.0,
            FontSize::Large => 1.125,
        }
    }
}

impl FromStr for FontSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(FontSize::Small),
            "medium" => Ok(FontSize::Medium),
            "large" => Ok(FontSize::Large),
            _ => Err(format!("Invalid font size: {s}")),
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
