//! Theme data model: built-in palettes and resolution from config.
//!
//! Two built-in palettes (dark and light) plus custom color overrides from
//! the config file.

use ratatui::style::Color;

use crate::config::{ThemeColorsConfig, ThemeConfig};

// ── Runtime theme colors ─────────────────────────────────────────────────────

/// All runtime colors used in the UI.
///
/// Constructed from a config-level `ThemeConfig` via `resolve_theme()`.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Tree panel
    pub tree_fg: Color,
    pub tree_selected_bg: Color,
    pub tree_selected_fg: Color,
    pub tree_dir_fg: Color,
    pub tree_file_fg: Color,
    pub tree_guide_fg: Color,
    pub tree_size_fg: Color,
    pub download_fg: Color,

    // Overview panel
    pub gauge_fg: Color,
    pub gauge_bg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,

    // Borders & chrome
    pub border_fg: Color,
    pub border_focused_fg: Color,

    // Semantic colors (not configurable, consistent across themes)
    pub error_fg: Color,
    pub warning_fg: Color,
    pub success_fg: Color,
    pub info_fg: Color,
    pub accent_fg: Color,
    pub dim_fg: Color,
}

// ── Built-in palettes ────────────────────────────────────────────────────────

/// Dark theme using Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(205, 214, 244),          // #cdd6f4 (text)
        tree_selected_bg: Color::Rgb(69, 71, 90),    // #45475a (surface1)
        tree_selected_fg: Color::Rgb(205, 214, 244), // #cdd6f4
        tree_dir_fg: Color::Rgb(137, 180, 250),      // #89b4fa (blue)
        tree_file_fg: Color::Rgb(205, 214, 244),     // #cdd6f4
        tree_guide_fg: Color::Rgb(88, 91, 112),      // #585b70 (surface2)
        tree_size_fg: Color::Rgb(166, 173, 200),     // #a6adc8 (subtext0)
        download_fg: Color::Rgb(148, 226, 213),      // #94e2d5 (teal)

        gauge_fg: Color::Rgb(166, 227, 161), // #a6e3a1 (green)
        gauge_bg: Color::Rgb(49, 50, 68),    // #313244 (surface0)

        status_bg: Color::Rgb(30, 30, 46), // #1e1e2e (base)
        status_fg: Color::Rgb(205, 214, 244),

        border_fg: Color::Rgb(88, 91, 112),           // #585b70 (surface2)
        border_focused_fg: Color::Rgb(137, 180, 250), // #89b4fa (blue)

        error_fg: Color::Rgb(243, 139, 168),   // #f38ba8 (red)
        warning_fg: Color::Rgb(249, 226, 175), // #f9e2af (yellow)
        success_fg: Color::Rgb(166, 227, 161), // #a6e3a1 (green)
        info_fg: Color::Rgb(137, 180, 250),    // #89b4fa (blue)
        accent_fg: Color::Rgb(203, 166, 247),  // #cba6f7 (mauve)
        dim_fg: Color::Rgb(108, 112, 134),     // #6c7086
    }
}

/// Light theme using Catppuccin Latte palette.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(76, 79, 105),            // #4c4f69 (text)
        tree_selected_bg: Color::Rgb(204, 208, 218), // #ccd0da (surface1)
        tree_selected_fg: Color::Rgb(76, 79, 105),
        tree_dir_fg: Color::Rgb(30, 102, 245), // #1e66f5 (blue)
        tree_file_fg: Color::Rgb(76, 79, 105),
        tree_guide_fg: Color::Rgb(172, 176, 190), // #acb0be (surface2)
        tree_size_fg: Color::Rgb(108, 111, 133),  // #6c6f85 (subtext0)
        download_fg: Color::Rgb(23, 146, 153),    // #179299 (teal)

        gauge_fg: Color::Rgb(64, 160, 43),    // #40a02b (green)
        gauge_bg: Color::Rgb(230, 233, 239),  // #e6e9ef (surface0)

        status_bg: Color::Rgb(239, 241, 245), // #eff1f5 (base)
        status_fg: Color::Rgb(76, 79, 105),

        border_fg: Color::Rgb(172, 176, 190), // #acb0be (surface2)
        border_focused_fg: Color::Rgb(30, 102, 245),

        error_fg: Color::Rgb(210, 15, 57),    // #d20f39 (red)
        warning_fg: Color::Rgb(223, 142, 29), // #df8e1d (yellow)
        success_fg: Color::Rgb(64, 160, 43),  // #40a02b (green)
        info_fg: Color::Rgb(30, 102, 245),
        accent_fg: Color::Rgb(136, 57, 239), // #8839ef (mauve)
        dim_fg: Color::Rgb(156, 160, 176),
    }
}

// ── Color parsing ────────────────────────────────────────────────────────────

/// Parse a hex color string like `"#aabbcc"` into a `ratatui::style::Color`.
/// Returns `None` for malformed input.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Overwrite `slot` when `hex` is present and valid.
fn override_color(slot: &mut Color, hex: Option<&str>) {
    if let Some(color) = hex.and_then(parse_hex_color) {
        *slot = color;
    }
}

// ── Theme resolution ─────────────────────────────────────────────────────────

/// Resolve the final `ThemeColors` from config.
///
/// - `"dark"` (default): dark Catppuccin palette
/// - `"light"`: light Catppuccin palette
/// - `"custom"`: start from dark palette, then override with custom hex values
pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    let scheme = config.scheme.as_deref().unwrap_or("dark");
    match scheme {
        "light" => light_theme(),
        "custom" => {
            let mut theme = dark_theme();
            if let Some(custom) = &config.custom {
                apply_custom_colors(&mut theme, custom);
            }
            theme
        }
        _ => dark_theme(),
    }
}

/// Apply custom hex color overrides on top of an existing theme.
fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    override_color(&mut theme.tree_fg, custom.tree_fg.as_deref());
    override_color(&mut theme.tree_selected_bg, custom.tree_selected_bg.as_deref());
    override_color(&mut theme.tree_selected_fg, custom.tree_selected_fg.as_deref());
    override_color(&mut theme.tree_dir_fg, custom.tree_dir_fg.as_deref());
    override_color(&mut theme.tree_file_fg, custom.tree_file_fg.as_deref());
    override_color(&mut theme.tree_guide_fg, custom.tree_guide_fg.as_deref());
    override_color(&mut theme.tree_size_fg, custom.tree_size_fg.as_deref());
    override_color(&mut theme.download_fg, custom.download_fg.as_deref());
    override_color(&mut theme.gauge_fg, custom.gauge_fg.as_deref());
    override_color(&mut theme.gauge_bg, custom.gauge_bg.as_deref());
    override_color(&mut theme.status_bg, custom.status_bg.as_deref());
    override_color(&mut theme.status_fg, custom.status_fg.as_deref());
    override_color(&mut theme.border_fg, custom.border_fg.as_deref());
    override_color(&mut theme.border_focused_fg, custom.border_focused_fg.as_deref());
    override_color(&mut theme.error_fg, custom.error_fg.as_deref());
    override_color(&mut theme.warning_fg, custom.warning_fg.as_deref());
    override_color(&mut theme.success_fg, custom.success_fg.as_deref());
    override_color(&mut theme.info_fg, custom.info_fg.as_deref());
    override_color(&mut theme.accent_fg, custom.accent_fg.as_deref());
    override_color(&mut theme.dim_fg, custom.dim_fg.as_deref());
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color_valid() {
        assert_eq!(parse_hex_color("#ff0000"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_hex_color("#1a1b26"), Some(Color::Rgb(26, 27, 38)));
        assert_eq!(parse_hex_color("00ff00"), Some(Color::Rgb(0, 255, 0)));
    }

    #[test]
    fn test_parse_hex_color_invalid() {
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn test_resolve_default_is_dark() {
        let theme = resolve_theme(&ThemeConfig::default());
        assert_eq!(theme.tree_dir_fg, Color::Rgb(137, 180, 250));
    }

    #[test]
    fn test_resolve_light_theme() {
        let config = ThemeConfig {
            scheme: Some("light".to_string()),
            custom: None,
        };
        assert_eq!(resolve_theme(&config).tree_dir_fg, Color::Rgb(30, 102, 245));
    }

    #[test]
    fn test_resolve_custom_overrides() {
        let config = ThemeConfig {
            scheme: Some("custom".to_string()),
            custom: Some(ThemeColorsConfig {
                gauge_fg: Some("#ff8800".to_string()),
                tree_fg: Some("#c0caf5".to_string()),
                border_fg: Some("not-a-color".to_string()),
                ..Default::default()
            }),
        };
        let theme = resolve_theme(&config);
        assert_eq!(theme.gauge_fg, Color::Rgb(255, 136, 0));
        assert_eq!(theme.tree_fg, Color::Rgb(192, 202, 245));
        // Invalid hex and unset values keep the dark palette.
        assert_eq!(theme.border_fg, Color::Rgb(88, 91, 112));
        assert_eq!(theme.tree_dir_fg, Color::Rgb(137, 180, 250));
    }

    #[test]
    fn test_custom_overrides_size_download_and_gauge_colors() {
        let config = ThemeConfig {
            scheme: Some("custom".to_string()),
            custom: Some(ThemeColorsConfig {
                tree_size_fg: Some("#010203".to_string()),
                download_fg: Some("#040506".to_string()),
                gauge_bg: Some("#070809".to_string()),
                dim_fg: Some("#0a0b0c".to_string()),
                ..Default::default()
            }),
        };
        let theme = resolve_theme(&config);
        assert_eq!(theme.tree_size_fg, Color::Rgb(1, 2, 3));
        assert_eq!(theme.download_fg, Color::Rgb(4, 5, 6));
        assert_eq!(theme.gauge_bg, Color::Rgb(7, 8, 9));
        assert_eq!(theme.dim_fg, Color::Rgb(10, 11, 12));
        assert_eq!(theme.gauge_fg, dark_theme().gauge_fg);
    }

    #[test]
    fn test_unknown_scheme_falls_back_to_dark() {
        let config = ThemeConfig {
            scheme: Some("neon".to_string()),
            custom: None,
        };
        assert_eq!(resolve_theme(&config).tree_dir_fg, Color::Rgb(137, 180, 250));
    }
}
