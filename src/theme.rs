//! Theme system for the TUI.
//!
//! Semantic color roles mapped to ratatui `Style` values, with a Dark and a
//! Light palette. Kept deliberately small: the forum list has few visual
//! roles.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from config (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Dark => Palette::dark(),
            Self::Light => Palette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Palette — semantic roles to Style
// ============================================================================

/// Styles for every visual role in the forum list screen.
#[derive(Debug, Clone)]
pub struct Palette {
    pub section_header: Style,
    pub forum: Style,
    pub forum_selected: Style,
    pub favorite_star: Style,
    pub expand_indicator: Style,
    pub separator: Style,
    pub border: Style,
    pub border_focused: Style,
    pub status_bar: Style,
    pub help_title: Style,
    pub help_key: Style,
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            section_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            forum: Style::default(),
            forum_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            favorite_star: Style::default().fg(Color::Yellow),
            expand_indicator: Style::default().fg(Color::Gray),
            separator: Style::default().fg(Color::DarkGray),
            border: Style::default(),
            border_focused: Style::default().fg(Color::Cyan),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            help_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            help_key: Style::default().fg(Color::Yellow),
        }
    }

    pub fn light() -> Self {
        Self {
            section_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            forum: Style::default().fg(Color::Black),
            forum_selected: Style::default().bg(Color::LightBlue).fg(Color::Black),
            favorite_star: Style::default().fg(Color::Magenta),
            expand_indicator: Style::default().fg(Color::DarkGray),
            separator: Style::default().fg(Color::Gray),
            border: Style::default().fg(Color::Black),
            border_focused: Style::default().fg(Color::Blue),
            status_bar: Style::default().bg(Color::Gray).fg(Color::Black),
            help_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            help_key: Style::default().fg(Color::Magenta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_parses_case_insensitively() {
        assert_eq!(ThemeVariant::from_str_name("Dark"), Some(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::from_str_name("LIGHT"), Some(ThemeVariant::Light));
        assert_eq!(ThemeVariant::from_str_name("solarized"), None);
    }

    #[test]
    fn cycle_covers_all_variants() {
        assert_eq!(ThemeVariant::Dark.next(), ThemeVariant::Light);
        assert_eq!(ThemeVariant::Light.next(), ThemeVariant::Dark);
    }
}
