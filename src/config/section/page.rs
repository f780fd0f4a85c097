//! `[page]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [page]
//! size = "A4"                 # A0-A6, Letter, Legal, Tabloid, Ledger
//! print_background = true
//! header = "<div></div>"      # Chrome header template
//! footer = "<div><span class=\"pageNumber\"></span></div>"
//!
//! [page.margin]
//! top = "20mm"
//! bottom = "25mm"
//! left = "10mm"
//! right = "10mm"
//! ```

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Footer showing only the current page number, right aligned.
pub const DEFAULT_FOOTER: &str = r#"<div id="footer-template" style="padding-bottom: 10px; font-family: Arial, Helvetica, sans-serif; width: 100%; padding-right: 30px; font-size: 8pt !important; text-align: right;"><span class="pageNumber"></span></div>"#;

/// Empty header.
pub const DEFAULT_HEADER: &str = "<div></div>";

/// Page layout for the captured artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub size: PaperSize,
    pub margin: MarginConfig,
    pub header: String,
    pub footer: String,
    pub print_background: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            size: PaperSize::A4,
            margin: MarginConfig::default(),
            header: DEFAULT_HEADER.into(),
            footer: DEFAULT_FOOTER.into(),
            print_background: true,
        }
    }
}

/// Page margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginConfig {
    pub top: Length,
    pub bottom: Length,
    pub left: Length,
    pub right: Length,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            top: Length::mm(20.0),
            bottom: Length::mm(25.0),
            left: Length::mm(10.0),
            right: Length::mm(10.0),
        }
    }
}

// ============================================================================
// Length
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Mm,
    Cm,
    In,
    Px,
}

impl LengthUnit {
    const fn suffix(self) -> &'static str {
        match self {
            Self::Mm => "mm",
            Self::Cm => "cm",
            Self::In => "in",
            Self::Px => "px",
        }
    }

    /// How many of this unit make one inch.
    const fn per_inch(self) -> f64 {
        match self {
            Self::Mm => 25.4,
            Self::Cm => 2.54,
            Self::In => 1.0,
            Self::Px => 96.0,
        }
    }
}

/// A CSS length such as `20mm` or `50px`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub const fn mm(value: f64) -> Self {
        Self {
            value,
            unit: LengthUnit::Mm,
        }
    }

    pub fn to_inches(self) -> f64 {
        self.value / self.unit.per_inch()
    }
}

impl FromStr for Length {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ConfigError::Length(s.to_owned());

        let split = s
            .find(|c: char| c.is_ascii_alphabetic())
            .ok_or_else(invalid)?;
        let (number, suffix) = s.split_at(split);

        let unit = match suffix.to_ascii_lowercase().as_str() {
            "mm" => LengthUnit::Mm,
            "cm" => LengthUnit::Cm,
            "in" => LengthUnit::In,
            "px" => LengthUnit::Px,
            _ => return Err(invalid()),
        };
        let value: f64 = number.trim().parse().map_err(|_| invalid())?;
        if !value.is_finite() || value < 0.0 {
            return Err(invalid());
        }

        Ok(Self { value, unit })
    }
}

impl TryFrom<String> for Length {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Length> for String {
    fn from(length: Length) -> Self {
        length.to_string()
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

// ============================================================================
// PaperSize
// ============================================================================

/// Named paper formats, matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PaperSize {
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    Letter,
    Legal,
    Tabloid,
    Ledger,
}

impl PaperSize {
    pub const ALL: [Self; 11] = [
        Self::A0,
        Self::A1,
        Self::A2,
        Self::A3,
        Self::A4,
        Self::A5,
        Self::A6,
        Self::Letter,
        Self::Legal,
        Self::Tabloid,
        Self::Ledger,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::A0 => "A0",
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::A3 => "A3",
            Self::A4 => "A4",
            Self::A5 => "A5",
            Self::A6 => "A6",
            Self::Letter => "Letter",
            Self::Legal => "Legal",
            Self::Tabloid => "Tabloid",
            Self::Ledger => "Ledger",
        }
    }

    /// Width and height in inches.
    pub const fn inches(self) -> (f64, f64) {
        match self {
            Self::A0 => (33.1, 46.8),
            Self::A1 => (23.4, 33.1),
            Self::A2 => (16.54, 23.4),
            Self::A3 => (11.7, 16.54),
            Self::A4 => (8.27, 11.7),
            Self::A5 => (5.83, 8.27),
            Self::A6 => (4.13, 5.83),
            Self::Letter => (8.5, 11.0),
            Self::Legal => (8.5, 14.0),
            Self::Tabloid => (11.0, 17.0),
            Self::Ledger => (17.0, 11.0),
        }
    }
}

impl FromStr for PaperSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|size| size.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::Paper(s.to_owned()))
    }
}

impl TryFrom<String> for PaperSize {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PaperSize> for String {
    fn from(size: PaperSize) -> Self {
        size.name().to_owned()
    }
}
