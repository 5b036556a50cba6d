use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::graphml::{self, GraphDocument};
use crate::error::ParseError;

/// Resolved colour scheme of the host environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

/// Theme requested by configuration or the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Auto,
    Light,
    Dark,
}

impl std::fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemePreference::Auto => write!(f, "auto"),
            ThemePreference::Light => write!(f, "light"),
            ThemePreference::Dark => write!(f, "dark"),
        }
    }
}

/// Every colour the builder, the search restyle and the surfaces use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub subreddit_background: &'static str,
    pub subreddit_border: &'static str,
    pub crosspost_background: &'static str,
    pub crosspost_border: &'static str,
    pub from_edge: &'static str,
    pub to_edge: &'static str,
    pub background: &'static str,
    pub border: &'static str,
    pub text: &'static str,
    pub muted_text: &'static str,
    pub highlight_background: &'static str,
    pub highlight_border: &'static str,
    pub dimmed_node: &'static str,
    pub dimmed_edge: &'static str,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            subreddit_background: "#818cf8",
            subreddit_border: "#4338ca",
            crosspost_background: "#ef4444",
            crosspost_border: "#b91c1c",
            from_edge: "#059669",
            to_edge: "#d97706",
            background: "#f1f5f9",
            border: "#e2e8f0",
            text: "#1f2937",
            muted_text: "#64748b",
            highlight_background: "#a78bfa",
            highlight_border: "#7c3aed",
            dimmed_node: "#e2e8f0",
            dimmed_edge: "#cbd5e1",
        }
    }

    pub fn dark() -> Self {
        Self {
            subreddit_background: "#6366f1",
            subreddit_border: "#4f46e5",
            crosspost_background: "#f87171",
            crosspost_border: "#dc2626",
            from_edge: "#10b981",
            to_edge: "#f59e0b",
            background: "#1f2937",
            border: "#374151",
            text: "#f9fafb",
            muted_text: "#9ca3af",
            highlight_background: "#8b5cf6",
            highlight_border: "#7c3aed",
            dimmed_node: "#4b5563",
            dimmed_edge: "#6b7280",
        }
    }

    pub fn for_scheme(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Light => Self::light(),
            ColorScheme::Dark => Self::dark(),
        }
    }
}

/// Host capabilities the graph logic needs, injected so it runs without a
/// browser or a terminal.
pub trait Environment {
    /// Parse a graph description into records
    fn parse(&self, text: &str) -> Result<GraphDocument, ParseError>;

    /// The colour scheme the user prefers
    fn color_scheme(&self) -> ColorScheme;
}

/// Environment backed by the GraphML parser and the terminal's colours
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment {
    pub preference: ThemePreference,
}

impl SystemEnvironment {
    pub fn new(preference: ThemePreference) -> Self {
        Self { preference }
    }
}

impl Environment for SystemEnvironment {
    fn parse(&self, text: &str) -> Result<GraphDocument, ParseError> {
        graphml::parse_graphml(text)
    }

    fn color_scheme(&self) -> ColorScheme {
        match self.preference {
            ThemePreference::Light => ColorScheme::Light,
            ThemePreference::Dark => ColorScheme::Dark,
            ThemePreference::Auto => {
                scheme_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
            }
        }
    }
}

/// Interpret the `COLORFGBG` convention ("fg;bg"): background colours 0-6
/// and 8 are dark. Unknown or missing values fall back to light.
fn scheme_from_colorfgbg(value: Option<&str>) -> ColorScheme {
    let background = value
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok());

    match background {
        Some(0..=6) | Some(8) => ColorScheme::Dark,
        _ => ColorScheme::Light,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorfgbg_dark_background() {
        assert_eq!(scheme_from_colorfgbg(Some("15;0")), ColorScheme::Dark);
        assert_eq!(scheme_from_colorfgbg(Some("7;default;8")), ColorScheme::Dark);
    }

    #[test]
    fn test_colorfgbg_light_or_missing() {
        assert_eq!(scheme_from_colorfgbg(Some("0;15")), ColorScheme::Light);
        assert_eq!(scheme_from_colorfgbg(Some("garbage")), ColorScheme::Light);
        assert_eq!(scheme_from_colorfgbg(None), ColorScheme::Light);
    }

    #[test]
    fn test_explicit_preference_wins() {
        let env = SystemEnvironment::new(ThemePreference::Dark);
        assert_eq!(env.color_scheme(), ColorScheme::Dark);
        assert_eq!(Palette::for_scheme(env.color_scheme()), Palette::dark());
    }

    #[test]
    fn test_theme_preference_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            theme: ThemePreference,
        }
        let w: Wrapper = toml::from_str(r#"theme = "dark""#).unwrap();
        assert_eq!(w.theme, ThemePreference::Dark);
    }
}
