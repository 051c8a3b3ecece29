//! Theme system for consistent styling.
//!
//! Themes can be loaded from TOML. Every key is optional; anything left out
//! is taken from the preset named by `base` (light when absent).
//!
//! ```
//! use spa_core::{Color, Theme};
//!
//! let theme = Theme::from_toml(r##"
//!     name = "Settings"
//!     base = "dark"
//!
//!     [colors]
//!     primary = "#ff0000"
//!
//!     [typography]
//!     body_size = 14.0
//! "##).expect("valid theme");
//!
//! assert_eq!(theme.name, "Settings");
//! assert_eq!(theme.colors.primary, Color::rgb(1.0, 0.0, 0.0));
//! assert_eq!(theme.colors.surface, Theme::dark().colors.surface);
//! assert_eq!(theme.typography.body_size, 14.0);
//! ```

use crate::color::{Color, ColorParseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a theme document.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// The document is not valid TOML or has the wrong shape
    #[error("invalid theme document: {0}")]
    Parse(#[from] toml::de::Error),
    /// A color entry is not a valid hex color
    #[error("invalid color for '{key}': {source}")]
    Color {
        /// Palette key holding the bad value
        key: &'static str,
        /// Underlying parse error
        source: ColorParseError,
    },
    /// `base` names a preset that does not exist
    #[error("unknown base theme '{0}' (expected 'light' or 'dark')")]
    UnknownBase(String),
}

/// A color palette for theming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPalette {
    /// Primary brand color
    pub primary: Color,
    /// Surface/background color
    pub surface: Color,
    /// Raised surface used for popups and highlighted rows
    pub surface_variant: Color,
    /// Text on surface
    pub on_surface: Color,
    /// Border/outline color
    pub outline: Color,
    /// Color for disabled content
    pub disabled: Color,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::light()
    }
}

impl ColorPalette {
    /// Create a light color palette.
    #[must_use]
    pub fn light() -> Self {
        Self {
            primary: Color::new(0.2, 0.47, 0.96, 1.0),
            surface: Color::WHITE,
            surface_variant: Color::new(0.93, 0.94, 0.97, 1.0),
            on_surface: Color::new(0.13, 0.13, 0.13, 1.0),
            outline: Color::new(0.8, 0.8, 0.8, 1.0),
            disabled: Color::new(0.7, 0.7, 0.7, 1.0),
        }
    }

    /// Create a dark color palette.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            primary: Color::new(0.51, 0.71, 1.0, 1.0),
            surface: Color::new(0.14, 0.14, 0.14, 1.0),
            surface_variant: Color::new(0.22, 0.23, 0.26, 1.0),
            on_surface: Color::WHITE,
            outline: Color::new(0.4, 0.4, 0.4, 1.0),
            disabled: Color::new(0.45, 0.45, 0.45, 1.0),
        }
    }
}

/// Typography settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    /// Body text size in pixels
    pub body_size: f32,
}

impl Default for Typography {
    fn default() -> Self {
        Self { body_size: 16.0 }
    }
}

/// Spacing scale based on a single unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    /// Base unit in pixels
    pub unit: f32,
}

impl Default for Spacing {
    fn default() -> Self {
        Self { unit: 4.0 }
    }
}

impl Spacing {
    /// Spacing for `multiplier` units.
    #[must_use]
    pub fn get(&self, multiplier: f32) -> f32 {
        self.unit * multiplier
    }

    /// Small spacing (2 units).
    #[must_use]
    pub fn sm(&self) -> f32 {
        self.get(2.0)
    }

    /// Medium spacing (4 units).
    #[must_use]
    pub fn md(&self) -> f32 {
        self.get(4.0)
    }
}

/// Complete theme definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Theme name
    pub name: String,
    /// Color palette
    pub colors: ColorPalette,
    /// Typography
    pub typography: Typography,
    /// Spacing
    pub spacing: Spacing,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    /// Create a light theme.
    #[must_use]
    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            colors: ColorPalette::light(),
            typography: Typography::default(),
            spacing: Spacing::default(),
        }
    }

    /// Create a dark theme.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            name: "Dark".to_string(),
            colors: ColorPalette::dark(),
            typography: Typography::default(),
            spacing: Spacing::default(),
        }
    }

    /// Create a theme with a custom name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Load a theme from a TOML document.
    pub fn from_toml(src: &str) -> Result<Self, ThemeError> {
        let file: ThemeFile = toml::from_str(src)?;

        let mut theme = match file.base.as_deref() {
            None | Some("light") => Self::light(),
            Some("dark") => Self::dark(),
            Some(other) => return Err(ThemeError::UnknownBase(other.to_string())),
        };

        if let Some(name) = file.name {
            theme.name = name;
        }

        let palette = &mut theme.colors;
        let colors = file.colors;
        for (key, value, slot) in [
            ("primary", colors.primary, &mut palette.primary),
            ("surface", colors.surface, &mut palette.surface),
            (
                "surface_variant",
                colors.surface_variant,
                &mut palette.surface_variant,
            ),
            ("on_surface", colors.on_surface, &mut palette.on_surface),
            ("outline", colors.outline, &mut palette.outline),
            ("disabled", colors.disabled, &mut palette.disabled),
        ] {
            if let Some(hex) = value {
                *slot = Color::from_hex(&hex).map_err(|source| ThemeError::Color { key, source })?;
            }
        }

        if let Some(size) = file.typography.body_size {
            theme.typography.body_size = size;
        }
        if let Some(unit) = file.spacing.unit {
            theme.spacing.unit = unit;
        }

        Ok(theme)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ThemeFile {
    name: Option<String>,
    base: Option<String>,
    #[serde(default)]
    colors: PaletteFile,
    #[serde(default)]
    typography: TypographyFile,
    #[serde(default)]
    spacing: SpacingFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PaletteFile {
    primary: Option<String>,
    surface: Option<String>,
    surface_variant: Option<String>,
    on_surface: Option<String>,
    outline: Option<String>,
    disabled: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TypographyFile {
    body_size: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SpacingFile {
    unit: Option<f32>,
}
