//! Theme descriptors — one enum, one derived style struct, computed once.

use colored::Color;
use serde::{Deserialize, Serialize};

/// User-selectable accent palette. The lowercase identifiers match the
/// persisted settings record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeColor {
    #[default]
    Emerald,
    Indigo,
    Rose,
    Amber,
}

/// Display attributes derived from a [`ThemeColor`].
#[derive(Debug, Clone, Copy)]
pub struct ThemeStyle {
    pub label: &'static str,
    pub accent: Color,
}

impl ThemeColor {
    pub const ALL: [ThemeColor; 4] = [
        ThemeColor::Emerald,
        ThemeColor::Indigo,
        ThemeColor::Rose,
        ThemeColor::Amber,
    ];

    pub fn style(self) -> ThemeStyle {
        match self {
            ThemeColor::Emerald => ThemeStyle {
                label: "emerald",
                accent: Color::TrueColor { r: 16, g: 185, b: 129 },
            },
            ThemeColor::Indigo => ThemeStyle {
                label: "indigo",
                accent: Color::TrueColor { r: 99, g: 102, b: 241 },
            },
            ThemeColor::Rose => ThemeStyle {
                label: "rose",
                accent: Color::TrueColor { r: 244, g: 63, b: 94 },
            },
            ThemeColor::Amber => ThemeStyle {
                label: "amber",
                accent: Color::TrueColor { r: 245, g: 158, b: 11 },
            },
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "emerald" => Some(ThemeColor::Emerald),
            "indigo" => Some(ThemeColor::Indigo),
            "rose" => Some(ThemeColor::Rose),
            "amber" => Some(ThemeColor::Amber),
            _ => None,
        }
    }
}
