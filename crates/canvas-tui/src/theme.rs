//! Color themes for the canvas.

use ratatui::style::Color;

/// Theme name identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeName {
    #[default]
    Default,
    /// Enhanced contrast
    Dark,
    /// For bright terminals
    Light,
}

impl ThemeName {
    /// All available themes in cycle order.
    pub fn all() -> &'static [ThemeName] {
        &[ThemeName::Default, ThemeName::Dark, ThemeName::Light]
    }

    /// Get the next theme in the cycle.
    pub fn next(&self) -> ThemeName {
        let themes = Self::all();
        let current_idx = themes.iter().position(|t| t == self).unwrap_or(0);
        themes[(current_idx + 1) % themes.len()]
    }

    /// Get the display name for this theme.
    pub fn display_name(&self) -> &'static str {
        match self {
            ThemeName::Default => "Default",
            ThemeName::Dark => "Dark",
            ThemeName::Light => "Light",
        }
    }

    /// Parse a theme name from the config value.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" => Some(ThemeName::Default),
            "dark" => Some(ThemeName::Dark),
            "light" => Some(ThemeName::Light),
            _ => None,
        }
    }
}

/// Color palette for a theme.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    /// Panel titles and focused borders
    pub header: Color,
    /// Hotkey hints
    pub hotkey: Color,
    /// Normal text
    pub text: Color,
    /// Secondary text (timestamps, hints, idle agents)
    pub text_dim: Color,
    /// Unfocused borders
    pub border_dim: Color,
    /// Running banner background
    pub running_bg: Color,
    /// Running banner and active agent text
    pub running_fg: Color,
    /// Idle toolbar buttons and badge
    pub idle_bg: Color,
    /// Settings dialog and debug panel background
    pub overlay_bg: Color,
    /// Debug panel heading
    pub debug_heading: Color,
}

/// Complete theme definition.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,
    pub colors: ThemeColors,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            name: ThemeName::Default,
            colors: ThemeColors {
                header: Color::Cyan,
                hotkey: Color::Yellow,
                text: Color::White,
                text_dim: Color::Gray,
                border_dim: Color::DarkGray,
                running_bg: Color::Green,
                running_fg: Color::White,
                idle_bg: Color::DarkGray,
                overlay_bg: Color::Black,
                debug_heading: Color::Yellow,
            },
        }
    }

    pub fn dark_theme() -> Self {
        Self {
            name: ThemeName::Dark,
            colors: ThemeColors {
                header: Color::LightBlue,
                hotkey: Color::LightYellow,
                text: Color::White,
                text_dim: Color::DarkGray,
                border_dim: Color::Black,
                running_bg: Color::Rgb(0, 120, 60),
                running_fg: Color::LightGreen,
                idle_bg: Color::Rgb(40, 40, 40),
                overlay_bg: Color::Rgb(10, 10, 10),
                debug_heading: Color::LightYellow,
            },
        }
    }

    pub fn light_theme() -> Self {
        Self {
            name: ThemeName::Light,
            colors: ThemeColors {
                header: Color::Blue,
                hotkey: Color::DarkGray,
                text: Color::Black,
                text_dim: Color::DarkGray,
                border_dim: Color::Gray,
                running_bg: Color::Green,
                running_fg: Color::Black,
                idle_bg: Color::Gray,
                overlay_bg: Color::White,
                debug_heading: Color::Blue,
            },
        }
    }

    /// Get a theme by name.
    pub fn by_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Default => Self::default_theme(),
            ThemeName::Dark => Self::dark_theme(),
            ThemeName::Light => Self::light_theme(),
        }
    }

    /// Theme named in the config, or the default one.
    pub fn from_config(name: &str) -> Self {
        Self::by_name(ThemeName::parse(name).unwrap_or_default())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_name_cycle() {
        assert_eq!(ThemeName::Default.next(), ThemeName::Dark);
        assert_eq!(ThemeName::Dark.next(), ThemeName::Light);
        assert_eq!(ThemeName::Light.next(), ThemeName::Default);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(ThemeName::parse("DARK"), Some(ThemeName::Dark));
        assert_eq!(ThemeName::parse("cyberpunk"), None);
    }

    #[test]
    fn test_every_config_theme_parses() {
        for name in canvas_core::config::THEMES {
            assert!(ThemeName::parse(name).is_some(), "{name}");
        }
    }

    #[test]
    fn test_from_config_falls_back() {
        assert_eq!(Theme::from_config("light").name, ThemeName::Light);
        assert_eq!(Theme::from_config("unknown").name, ThemeName::Default);
    }
}
