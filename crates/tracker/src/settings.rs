use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

/// Smallest allowed render distance, in blocks.
pub const MIN_RENDER_DISTANCE: u32 = 16;
/// Largest allowed render distance, in blocks.
pub const MAX_RENDER_DISTANCE: u32 = 256;

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (0 = transparent).
    pub a: u8,
}

impl Rgba {
    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Scale alpha by `factor` (clamped to 0..=1), truncating toward zero.
    pub fn faded(self, factor: f64) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        self.with_alpha((f64::from(self.a) * factor) as u8)
    }
}

/// Which parts of an outline box get drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShapeMode {
    /// Edges only.
    Lines,
    /// Filled faces only.
    Sides,
    /// Faces and edges.
    #[default]
    Both,
}

impl ShapeMode {
    /// Whether faces are drawn.
    pub fn draws_sides(self) -> bool {
        matches!(self, Self::Sides | Self::Both)
    }

    /// Whether edges are drawn.
    pub fn draws_lines(self) -> bool {
        matches!(self, Self::Lines | Self::Both)
    }
}

/// Output toggles and message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Send messages in chat when going through a portal.
    pub chat_messages: bool,
    /// Append messages to the portal log file.
    pub log_to_file: bool,
    /// Include coordinates in entry messages.
    pub show_coordinates: bool,
    /// Include the dimension name in entry messages.
    pub show_dimension: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            chat_messages: true,
            log_to_file: true,
            show_coordinates: true,
            show_dimension: true,
        }
    }
}

/// ESP outline options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Draw outlines over portals that have been visited.
    pub render_portals: bool,
    /// How the boxes are drawn.
    pub shape_mode: ShapeMode,
    /// Fill color.
    pub side_color: Rgba,
    /// Edge color.
    pub line_color: Rgba,
    /// Maximum distance (blocks) at which portals are drawn.
    pub render_distance: u32,
    /// Fade alpha linearly with distance.
    pub fade_distance: bool,
    /// Draw never-entered portals with the unused color pair.
    pub highlight_unused: bool,
    /// Fill color for never-entered portals.
    pub unused_side_color: Rgba,
    /// Edge color for never-entered portals.
    pub unused_line_color: Rgba,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            render_portals: true,
            shape_mode: ShapeMode::Both,
            side_color: Rgba::new(0, 0, 0, 50),
            line_color: Rgba::new(0, 0, 0, 255),
            render_distance: 64,
            fade_distance: true,
            highlight_unused: false,
            unused_side_color: Rgba::new(255, 0, 0, 30),
            unused_line_color: Rgba::new(255, 0, 0, 100),
        }
    }
}

/// Individual render options, for hosts that build a settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOption {
    /// [`RenderSettings::render_portals`].
    RenderPortals,
    /// [`RenderSettings::shape_mode`].
    ShapeMode,
    /// [`RenderSettings::side_color`].
    SideColor,
    /// [`RenderSettings::line_color`].
    LineColor,
    /// [`RenderSettings::render_distance`].
    RenderDistance,
    /// [`RenderSettings::fade_distance`].
    FadeDistance,
    /// [`RenderSettings::highlight_unused`].
    HighlightUnused,
    /// [`RenderSettings::unused_side_color`].
    UnusedSideColor,
    /// [`RenderSettings::unused_line_color`].
    UnusedLineColor,
}

impl RenderSettings {
    /// Set the render distance, clamped to the supported range.
    pub fn set_render_distance(&mut self, distance: u32) {
        self.render_distance = distance.clamp(MIN_RENDER_DISTANCE, MAX_RENDER_DISTANCE);
    }

    /// Whether an option has any effect given the other current values.
    pub fn is_visible(&self, option: RenderOption) -> bool {
        match option {
            RenderOption::RenderPortals => true,
            RenderOption::UnusedSideColor | RenderOption::UnusedLineColor => {
                self.render_portals && self.highlight_unused
            }
            _ => self.render_portals,
        }
    }

    /// Fill/edge colors for a portal, before distance fading.
    pub fn colors_for(&self, unused: bool) -> (Rgba, Rgba) {
        if self.highlight_unused && unused {
            (self.unused_side_color, self.unused_line_color)
        } else {
            (self.side_color, self.line_color)
        }
    }
}

/// All configuration for the portal tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
    /// Output and message options.
    pub general: GeneralSettings,
    /// ESP options.
    pub render: RenderSettings,
}

impl PortalSettings {
    /// Load settings from `path`, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        let mut settings = match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<PortalSettings>(&contents) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    PortalSettings::default()
                }
            },
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                PortalSettings::default()
            }
        };
        let requested = settings.render.render_distance;
        settings.render.set_render_distance(requested);
        if settings.render.render_distance != requested {
            warn!(
                requested,
                clamped = settings.render.render_distance,
                "render_distance out of range"
            );
        }
        settings
    }

    /// Save settings to `path` as TOML.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}
