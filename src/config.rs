use color_eyre::eyre::eyre;
use color_eyre::Result;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use supports_color::Stream;

use crate::registry::{
    default_cross_visualizations, default_datasets, CrossVisualizationConfig, DatasetConfig,
    ALL_KEY,
};
use csvdash_cli::{Args, ExportFormat};

/// Manages config directory and config file operations
#[derive(Clone)]
pub struct ConfigManager {
    pub(crate) config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);

        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get path to a specific config file within the config directory
    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Generate default configuration template as a string
    pub fn generate_default_config(&self) -> String {
        DEFAULT_CONFIG_TEMPLATE.to_string()
    }

    /// Write default configuration to config file
    pub fn write_default_config(&self, force: bool) -> Result<PathBuf> {
        let config_path = self.config_path("config.toml");

        if config_path.exists() && !force {
            return Err(eyre!(
                "Config file already exists at {}. Use --force to overwrite.",
                config_path.display()
            ));
        }

        self.ensure_config_dir()?;
        std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;

        Ok(config_path)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration format version (for future compatibility)
    pub version: String,
    pub display: DisplayConfig,
    pub loading: LoadingConfig,
    pub export: ExportConfig,
    pub theme: ThemeConfig,
    pub debug: DebugConfig,
    /// Dataset registry, in display order
    pub datasets: Vec<DatasetConfig>,
    /// Visualizations of the cross-dataset view
    pub all: Vec<CrossVisualizationConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Rows per table page for tables that don't set their own
    pub page_size: usize,
    pub event_poll_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
    /// Timeout for fetching http(s) sources
    pub timeout_secs: u64,
    pub load_all_on_start: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// "png" or "svg"
    pub format: String,
    /// Directory charts are written to by the export key
    pub dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    pub colors: ColorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub keybind_hints: String,
    pub keybind_labels: String,
    pub throbber: String,
    pub primary_chart_series_color: String,
    pub chart_cursor: String,
    pub success: String,
    pub error: String,
    pub dimmed: String,
    pub controls_bg: String,
    pub text_primary: String,
    pub text_secondary: String,
    pub table_header: String,
    pub table_header_bg: String,
    pub alternate_row_color: String,
    pub sidebar_border: String,
    pub sidebar_selected: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DebugConfig {
    pub enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            display: DisplayConfig::default(),
            loading: LoadingConfig::default(),
            export: ExportConfig::default(),
            theme: ThemeConfig::default(),
            debug: DebugConfig::default(),
            datasets: default_datasets(),
            all: default_cross_visualizations(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: crate::widgets::datatable::DEFAULT_PAGE_SIZE,
            event_poll_interval_ms: 25,
        }
    }
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            load_all_on_start: false,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: "png".to_string(),
            dir: PathBuf::from("exports"),
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            keybind_hints: "cyan".to_string(),
            keybind_labels: "light_gray".to_string(),
            throbber: "cyan".to_string(),
            primary_chart_series_color: "#8884d8".to_string(),
            chart_cursor: "yellow".to_string(),
            success: "green".to_string(),
            error: "red".to_string(),
            dimmed: "dark_gray".to_string(),
            controls_bg: "indexed(235)".to_string(),
            text_primary: "white".to_string(),
            text_secondary: "gray".to_string(),
            table_header: "white".to_string(),
            table_header_bg: "indexed(236)".to_string(),
            alternate_row_color: "indexed(234)".to_string(),
            sidebar_border: "dark_gray".to_string(),
            sidebar_selected: "cyan".to_string(),
        }
    }
}

// Configuration loading and merging
impl AppConfig {
    /// Load configuration from all layers (default → user config file)
    pub fn load(app_name: &str) -> Result<Self> {
        let config_manager = ConfigManager::new(app_name)?;
        let config_path = config_manager.config_path("config.toml");
        if config_path.exists() {
            Self::load_file(&config_path)
        } else {
            let config = AppConfig::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load defaults merged with the config file at `path`. The file must exist.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre!("Failed to read config file at {}: {}", path.display(), e))?;
        let user_config: AppConfig = toml::from_str(&content)
            .map_err(|e| eyre!("Failed to parse config file at {}: {}", path.display(), e))?;

        let mut config = AppConfig::default();
        config.merge(user_config);
        config.validate()?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence).
    ///
    /// Scalars are taken when they differ from the default. A registry given in
    /// `other` replaces this one wholesale rather than being merged entry by entry.
    pub fn merge(&mut self, other: AppConfig) {
        let default = AppConfig::default();
        if other.version != default.version {
            self.version = other.version;
        }

        self.display.merge(other.display);
        self.loading.merge(other.loading);
        self.export.merge(other.export);
        self.theme.colors.merge(other.theme.colors);
        self.debug.merge(other.debug);

        if other.datasets != default.datasets {
            self.datasets = other.datasets;
        }
        if other.all != default.all {
            self.all = other.all;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.version.starts_with("0.1") {
            return Err(eyre!(
                "Unsupported config version: {}. Expected 0.1.x",
                self.version
            ));
        }

        if self.display.page_size == 0 {
            return Err(eyre!("page_size must be greater than 0"));
        }
        if self.display.event_poll_interval_ms == 0 {
            return Err(eyre!("event_poll_interval_ms must be greater than 0"));
        }
        if self.loading.timeout_secs == 0 {
            return Err(eyre!("timeout_secs must be greater than 0"));
        }
        self.export_format()?;

        let parser = ColorParser::new();
        self.theme.colors.validate(&parser)?;

        let mut seen = HashSet::new();
        for dataset in &self.datasets {
            if dataset.key.trim().is_empty() {
                return Err(eyre!("Dataset key must not be empty"));
            }
            if dataset.key == ALL_KEY {
                return Err(eyre!(
                    "Dataset key '{}' is reserved for the cross-dataset view",
                    ALL_KEY
                ));
            }
            if !seen.insert(dataset.key.as_str()) {
                return Err(eyre!("Duplicate dataset key: '{}'", dataset.key));
            }
            if dataset.source.trim().is_empty() {
                return Err(eyre!("Dataset '{}' has an empty source", dataset.key));
            }
        }

        Ok(())
    }

    /// Apply command-line overrides. An ad-hoc `--dataset` replaces a registry
    /// entry with the same key, otherwise it is appended.
    pub fn apply_args(&mut self, args: &Args) {
        for dataset in &args.datasets {
            let entry = DatasetConfig::ad_hoc(&dataset.key, &dataset.source);
            match self.datasets.iter_mut().find(|c| c.key == dataset.key) {
                Some(existing) => *existing = entry,
                None => self.datasets.push(entry),
            }
        }
        if let Some(page_size) = args.page_size {
            self.display.page_size = page_size;
        }
        if let Some(format) = args.export_format {
            self.export.format = format.extension().to_string();
        }
        if args.load_all {
            self.loading.load_all_on_start = true;
        }
        if args.debug {
            self.debug.enabled = true;
        }
    }

    pub fn export_format(&self) -> Result<ExportFormat> {
        ExportFormat::from_name(&self.export.format).ok_or_else(|| {
            eyre!(
                "Invalid export format: {}. Must be 'png' or 'svg'",
                self.export.format
            )
        })
    }
}

impl DisplayConfig {
    pub fn merge(&mut self, other: Self) {
        let default = DisplayConfig::default();
        if other.page_size != default.page_size {
            self.page_size = other.page_size;
        }
        if other.event_poll_interval_ms != default.event_poll_interval_ms {
            self.event_poll_interval_ms = other.event_poll_interval_ms;
        }
    }
}

impl LoadingConfig {
    pub fn merge(&mut self, other: Self) {
        let default = LoadingConfig::default();
        if other.timeout_secs != default.timeout_secs {
            self.timeout_secs = other.timeout_secs;
        }
        if other.load_all_on_start != default.load_all_on_start {
            self.load_all_on_start = other.load_all_on_start;
        }
    }
}

impl ExportConfig {
    pub fn merge(&mut self, other: Self) {
        let default = ExportConfig::default();
        if other.format != default.format {
            self.format = other.format;
        }
        if other.dir != default.dir {
            self.dir = other.dir;
        }
    }
}

impl DebugConfig {
    pub fn merge(&mut self, other: Self) {
        if other.enabled {
            self.enabled = true;
        }
    }
}

/// Applies `$m!(field)` to every color of [`ColorConfig`].
macro_rules! for_each_color {
    ($m:ident) => {
        $m!(keybind_hints);
        $m!(keybind_labels);
        $m!(throbber);
        $m!(primary_chart_series_color);
        $m!(chart_cursor);
        $m!(success);
        $m!(error);
        $m!(dimmed);
        $m!(controls_bg);
        $m!(text_primary);
        $m!(text_secondary);
        $m!(table_header);
        $m!(table_header_bg);
        $m!(alternate_row_color);
        $m!(sidebar_border);
        $m!(sidebar_selected);
    };
}

impl ColorConfig {
    /// Validate all color strings can be parsed
    fn validate(&self, parser: &ColorParser) -> Result<()> {
        macro_rules! validate_color {
            ($field:ident) => {
                parser.parse(&self.$field).map_err(|e| {
                    eyre!("Invalid color value for '{}': {}", stringify!($field), e)
                })?;
            };
        }
        for_each_color!(validate_color);
        Ok(())
    }

    pub fn merge(&mut self, other: Self) {
        let default = ColorConfig::default();
        macro_rules! merge_color {
            ($field:ident) => {
                if other.$field != default.$field {
                    self.$field = other.$field.clone();
                }
            };
        }
        for_each_color!(merge_color);
    }
}

/// Color parser with terminal capability detection
#[derive(Debug, Clone)]
pub struct ColorParser {
    supports_true_color: bool,
    supports_256: bool,
    no_color: bool,
}

impl ColorParser {
    /// Create a new ColorParser with automatic terminal capability detection
    pub fn new() -> Self {
        let no_color = std::env::var("NO_COLOR").is_ok();
        let support = supports_color::on(Stream::Stdout);

        Self {
            supports_true_color: support.as_ref().map(|s| s.has_16m).unwrap_or(false),
            supports_256: support.as_ref().map(|s| s.has_256).unwrap_or(false),
            no_color,
        }
    }

    /// Parse a color string (hex, indexed, terminal or CSS name) into a terminal color
    pub fn parse(&self, s: &str) -> Result<Color> {
        if self.no_color {
            return Ok(Color::Reset);
        }

        let trimmed = s.trim();

        if trimmed.starts_with('#') && trimmed.len() == 7 {
            let (r, g, b) = parse_hex(trimmed)?;
            return Ok(self.convert_rgb_to_terminal_color(r, g, b));
        }

        // "indexed(236)" for an explicit 256-color palette entry
        if trimmed.to_lowercase().starts_with("indexed(") && trimmed.ends_with(')') {
            let num_str = &trimmed[8..trimmed.len() - 1];
            let num = num_str.parse::<u8>().map_err(|_| {
                eyre!(
                    "Invalid indexed color: '{}'. Expected format: indexed(0-255)",
                    trimmed
                )
            })?;
            return Ok(Color::Indexed(num));
        }

        let lower = trimmed.to_lowercase();
        match lower.as_str() {
            "black" => Ok(Color::Black),
            "red" => Ok(Color::Red),
            "green" => Ok(Color::Green),
            "yellow" => Ok(Color::Yellow),
            "blue" => Ok(Color::Blue),
            "magenta" => Ok(Color::Magenta),
            "cyan" => Ok(Color::Cyan),
            "white" => Ok(Color::White),

            "bright_black" | "bright black" => Ok(Color::Indexed(8)),
            "bright_red" | "bright red" => Ok(Color::Indexed(9)),
            "bright_green" | "bright green" => Ok(Color::Indexed(10)),
            "bright_yellow" | "bright yellow" => Ok(Color::Indexed(11)),
            "bright_blue" | "bright blue" => Ok(Color::Indexed(12)),
            "bright_magenta" | "bright magenta" => Ok(Color::Indexed(13)),
            "bright_cyan" | "bright cyan" => Ok(Color::Indexed(14)),
            "bright_white" | "bright white" => Ok(Color::Indexed(15)),

            "gray" | "grey" => Ok(Color::Indexed(8)),
            "dark_gray" | "dark gray" | "dark_grey" | "dark grey" => Ok(Color::Indexed(8)),
            "light_gray" | "light gray" | "light_grey" | "light grey" => Ok(Color::Indexed(7)),

            "reset" => Ok(Color::Reset),

            other => match css_named_rgb(other) {
                Some((r, g, b)) => Ok(self.convert_rgb_to_terminal_color(r, g, b)),
                None => Err(eyre!(
                    "Unknown color name: '{}'. Supported: basic ANSI colors (red, blue, etc.), \
                     bright variants (bright_red, etc.), CSS color names (orange, purple, etc.), \
                     or hex colors (#ff0000)",
                    trimmed
                )),
            },
        }
    }

    /// Convert RGB values to appropriate terminal color based on capabilities
    fn convert_rgb_to_terminal_color(&self, r: u8, g: u8, b: u8) -> Color {
        if self.supports_true_color {
            Color::Rgb(r, g, b)
        } else if self.supports_256 {
            Color::Indexed(rgb_to_256_color(r, g, b))
        } else {
            rgb_to_basic_ansi(r, g, b)
        }
    }
}

impl Default for ColorParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse hex color string (#ff0000) to RGB components
fn parse_hex(s: &str) -> Result<(u8, u8, u8)> {
    if !s.starts_with('#') || s.len() != 7 || !s.is_ascii() {
        return Err(eyre!(
            "Invalid hex color format: '{}'. Expected format: #rrggbb",
            s
        ));
    }

    let r = u8::from_str_radix(&s[1..3], 16)
        .map_err(|_| eyre!("Invalid red component in hex color: {}", s))?;
    let g = u8::from_str_radix(&s[3..5], 16)
        .map_err(|_| eyre!("Invalid green component in hex color: {}", s))?;
    let b = u8::from_str_radix(&s[5..7], 16)
        .map_err(|_| eyre!("Invalid blue component in hex color: {}", s))?;

    Ok((r, g, b))
}

/// RGB of a CSS color name (lowercase). Covers the basic keywords plus the names
/// commonly found in categorical data.
pub fn css_named_rgb(name: &str) -> Option<(u8, u8, u8)> {
    let rgb = match name {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "lime" => (0, 255, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" | "aqua" => (0, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "violet" => (238, 130, 238),
        "pink" => (255, 192, 203),
        "brown" => (165, 42, 42),
        "gray" | "grey" => (128, 128, 128),
        "silver" => (192, 192, 192),
        "maroon" => (128, 0, 0),
        "navy" => (0, 0, 128),
        "teal" => (0, 128, 128),
        "olive" => (128, 128, 0),
        "gold" => (255, 215, 0),
        "indigo" => (75, 0, 130),
        "turquoise" => (64, 224, 208),
        "coral" => (255, 127, 80),
        "salmon" => (250, 128, 114),
        "tan" => (210, 180, 140),
        "beige" => (245, 245, 220),
        _ => return None,
    };
    Some(rgb)
}

/// RGB for a chart color string: `#rrggbb` or a CSS color name (case-insensitive).
pub fn chart_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let trimmed = color.trim();
    if trimmed.starts_with('#') {
        parse_hex(trimmed).ok()
    } else {
        css_named_rgb(&trimmed.to_lowercase())
    }
}

/// Convert RGB to nearest 256-color palette index
/// Uses standard xterm 256-color palette
pub fn rgb_to_256_color(r: u8, g: u8, b: u8) -> u8 {
    let max_diff = r.max(g).max(b) as i16 - r.min(g).min(b) as i16;
    if max_diff < 10 {
        // Grayscale ramp (232-255)
        let gray = (r as u16 + g as u16 + b as u16) / 3;
        if gray < 8 {
            return 16;
        } else if gray > 247 {
            return 231;
        } else {
            return 232 + ((gray - 8) * 24 / 240) as u8;
        }
    }

    // 6x6x6 color cube (16-231)
    let r_idx = (r as u16 * 5 / 255) as u8;
    let g_idx = (g as u16 * 5 / 255) as u8;
    let b_idx = (b as u16 * 5 / 255) as u8;

    16 + 36 * r_idx + 6 * g_idx + b_idx
}

/// Convert RGB to nearest basic ANSI color (8 colors)
pub fn rgb_to_basic_ansi(r: u8, g: u8, b: u8) -> Color {
    let r_bright = r > 128;
    let g_bright = g > 128;
    let b_bright = b > 128;

    let max_diff = r.max(g).max(b) as i16 - r.min(g).min(b) as i16;
    if max_diff < 30 {
        let avg = (r as u16 + g as u16 + b as u16) / 3;
        return if avg < 64 { Color::Black } else { Color::White };
    }

    match (r_bright, g_bright, b_bright) {
        (false, false, false) => Color::Black,
        (true, false, false) => Color::Red,
        (false, true, false) => Color::Green,
        (true, true, false) => Color::Yellow,
        (false, false, true) => Color::Blue,
        (true, false, true) => Color::Magenta,
        (false, true, true) => Color::Cyan,
        (true, true, true) => Color::White,
    }
}

/// Theme containing parsed colors ready for use
#[derive(Debug, Clone)]
pub struct Theme {
    pub colors: HashMap<String, Color>,
    parser: ColorParser,
}

impl Theme {
    /// Create a Theme from a ThemeConfig by parsing all color strings
    pub fn from_config(config: &ThemeConfig) -> Result<Self> {
        let parser = ColorParser::new();
        let mut colors = HashMap::new();

        macro_rules! insert_color {
            ($field:ident) => {
                colors.insert(
                    stringify!($field).to_string(),
                    parser.parse(&config.colors.$field)?,
                );
            };
        }
        for_each_color!(insert_color);

        Ok(Self { colors, parser })
    }

    /// Get a color by name, returns Reset if not found
    pub fn get(&self, name: &str) -> Color {
        self.colors.get(name).copied().unwrap_or(Color::Reset)
    }

    pub fn get_optional(&self, name: &str) -> Option<Color> {
        self.colors.get(name).copied()
    }

    /// Terminal color for a color string coming from data (chart segments and
    /// series). Unparseable names fall back to the primary series color.
    pub fn data_color(&self, color: &str) -> Color {
        self.parser
            .parse(color)
            .unwrap_or_else(|_| self.get("primary_chart_series_color"))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default()).unwrap_or_else(|_| Self {
            colors: HashMap::new(),
            parser: ColorParser::new(),
        })
    }
}

// Default configuration template
const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../config/default.toml");

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ColorParser {
        ColorParser {
            supports_true_color: true,
            supports_256: true,
            no_color: false,
        }
    }

    #[test]
    fn parses_css_names_from_data() {
        let p = parser();
        assert_eq!(p.parse("purple").unwrap(), Color::Rgb(128, 0, 128));
        assert_eq!(p.parse("Orange").unwrap(), Color::Rgb(255, 165, 0));
        assert_eq!(p.parse("red").unwrap(), Color::Red);
        assert!(p.parse("not-a-color").is_err());
    }

    #[test]
    fn chart_rgb_accepts_hex_and_names() {
        assert_eq!(chart_rgb("#8884d8"), Some((0x88, 0x84, 0xd8)));
        assert_eq!(chart_rgb("Yellow"), Some((255, 255, 0)));
        assert_eq!(chart_rgb("#zzzzzz"), None);
        assert_eq!(chart_rgb("plaid"), None);
    }

    #[test]
    fn merge_replaces_registry_and_changed_scalars() {
        let mut config = AppConfig::default();
        let other = AppConfig {
            display: DisplayConfig {
                page_size: 5,
                ..DisplayConfig::default()
            },
            datasets: vec![DatasetConfig::ad_hoc("a", "a.csv")],
            ..AppConfig::default()
        };
        config.merge(other);
        assert_eq!(config.display.page_size, 5);
        assert_eq!(config.display.event_poll_interval_ms, 25);
        assert_eq!(config.datasets.len(), 1);
        assert_eq!(config.all, default_cross_visualizations());
    }

    #[test]
    fn validate_rejects_bad_registry() {
        let mut config = AppConfig::default();
        config.datasets.push(DatasetConfig::ad_hoc("colorDemo", "x.csv"));
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.datasets = vec![DatasetConfig::ad_hoc(ALL_KEY, "x.csv")];
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.datasets = vec![DatasetConfig::ad_hoc("a", " ")];
        assert!(config.validate().is_err());
    }

    #[test]
    fn cli_overrides_apply_on_top() {
        use clap::Parser;
        let args = Args::try_parse_from([
            "csvdash",
            "--dataset",
            "colorDemo=other.csv",
            "--dataset",
            "extra=extra.csv",
            "--page-size",
            "7",
            "--export-format",
            "svg",
        ])
        .unwrap();
        let mut config = AppConfig::default();
        config.apply_args(&args);
        assert_eq!(config.datasets.len(), 3);
        assert_eq!(config.datasets[0].source, "other.csv");
        assert_eq!(config.datasets[2].key, "extra");
        assert_eq!(config.display.page_size, 7);
        assert_eq!(config.export_format().unwrap(), ExportFormat::Svg);
        config.validate().unwrap();
    }

    #[test]
    fn data_color_falls_back_to_series_color() {
        let theme = Theme::default();
        assert_eq!(
            theme.data_color("plaid"),
            theme.get("primary_chart_series_color")
        );
    }
}
