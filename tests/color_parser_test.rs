use csvdash::config::{chart_rgb, AppConfig, ColorParser, Theme};
use ratatui::style::Color;

// Helper to ensure NO_COLOR is not set for color parsing tests
fn ensure_colors_enabled() {
    std::env::remove_var("NO_COLOR");
}

#[test]
fn test_parse_terminal_names() {
    ensure_colors_enabled();
    let parser = ColorParser::new();

    assert_eq!(parser.parse("red").unwrap(), Color::Red);
    assert_eq!(parser.parse("CYAN").unwrap(), Color::Cyan);
    assert_eq!(parser.parse("  yellow ").unwrap(), Color::Yellow);
    assert_eq!(parser.parse("bright_red").unwrap(), Color::Indexed(9));
    assert_eq!(parser.parse("dark gray").unwrap(), Color::Indexed(8));
    assert_eq!(parser.parse("light_gray").unwrap(), Color::Indexed(7));
    assert_eq!(parser.parse("indexed(236)").unwrap(), Color::Indexed(236));
}

#[test]
fn test_parse_category_colors() {
    ensure_colors_enabled();
    let parser = ColorParser::new();

    // Category names in the demo data double as CSS colors
    for name in ["orange", "purple", "pink", "teal", "brown"] {
        assert!(parser.parse(name).is_ok(), "{} should parse", name);
    }
    assert!(parser.parse("#8884d8").is_ok());
    assert!(parser.parse("#FF0000").is_ok());
}

#[test]
fn test_parse_invalid_colors() {
    ensure_colors_enabled();
    let parser = ColorParser::new();

    assert!(parser.parse("#ff00").is_err());
    assert!(parser.parse("ff0000").is_err());
    assert!(parser.parse("#gggggg").is_err());
    assert!(parser.parse("indexed(999)").is_err());
    assert!(parser
        .parse("chartreuse-ish")
        .unwrap_err()
        .to_string()
        .contains("Unknown color"));
}

#[test]
fn test_chart_rgb_for_export() {
    assert_eq!(chart_rgb("red"), Some((255, 0, 0)));
    assert_eq!(chart_rgb("#8884d8"), Some((0x88, 0x84, 0xd8)));
    assert_eq!(chart_rgb(" Orange "), Some((255, 165, 0)));
    assert_eq!(chart_rgb("no such color"), None);
}

#[test]
fn test_data_color_falls_back_to_series_color() {
    ensure_colors_enabled();
    let mut config = AppConfig::default();
    config.theme.colors.primary_chart_series_color = "magenta".to_string();
    let theme = Theme::from_config(&config.theme).unwrap();

    assert_eq!(theme.data_color("blue"), Color::Blue);
    assert_eq!(theme.data_color("not a color"), Color::Magenta);
    assert_eq!(theme.data_color(""), Color::Magenta);
}

#[test]
fn test_theme_has_every_configured_color() {
    let theme = Theme::from_config(&AppConfig::default().theme).unwrap();
    for name in [
        "keybind_hints",
        "throbber",
        "chart_cursor",
        "success",
        "error",
        "table_header_bg",
        "sidebar_selected",
    ] {
        assert!(theme.get_optional(name).is_some(), "missing {}", name);
    }
    assert_eq!(theme.get_optional("background"), None);
}
