//! TOML configuration for wavegrid
//!
//! Every section is optional; missing fields fall back to the defaults of the
//! classic demo (a 50×50 grid of light-blue spheres on a red background).

use std::path::Path;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::wave::WaveParams;
use crate::Result;

/// Largest grid accepted, in cells
pub const MAX_GRID_CELLS: usize = 1 << 20;

/// Largest sphere tessellation accepted; keeps `(s + 1)^2` vertex indices in `u32`
pub const MAX_SPHERE_SEGMENTS: u32 = 1024;

/// An sRGB color parsed from `#rgb` or `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };

    /// Parse a hex color string
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| Error::Config(format!("color '{hex}' must start with '#'")))?;
        if !digits.is_ascii() {
            return Err(Error::Config(format!("invalid hex color '{hex}'")));
        }
        let parse = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|_| Error::Config(format!("invalid hex color '{hex}'")))
        };
        let (r, g, b) = match digits.len() {
            3 => {
                let expand = |i: usize| parse(&digits[i..i + 1].repeat(2));
                (expand(0)?, expand(1)?, expand(2)?)
            }
            6 => (parse(&digits[0..2])?, parse(&digits[2..4])?, parse(&digits[4..6])?),
            _ => return Err(Error::Config(format!("invalid hex color '{hex}'"))),
        };
        Ok(Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        })
    }

    /// Convert to linear light, for shading on an sRGB surface
    pub fn to_linear(self) -> [f32; 3] {
        fn channel(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        [channel(self.r), channel(self.g), channel(self.b)]
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Grid dimensions and layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    /// World-space distance between neighbouring spheres
    pub spacing: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 50,
            cols: 50,
            spacing: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Simplex seed; a random seed is drawn when absent
    pub seed: Option<u32>,
}

/// Sphere geometry, material and clear color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub sphere_radius: f32,
    pub sphere_segments: u32,
    pub sphere_color: String,
    pub background: String,
    pub roughness: f32,
    pub metalness: f32,
    pub msaa: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            sphere_radius: 0.07,
            sphere_segments: 50,
            sphere_color: "#70BEF9".to_string(),
            background: "#CB2E3D".to_string(),
            roughness: 1.0,
            metalness: 0.0,
            msaa: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub enable_rotate: bool,
    pub enable_pan: bool,
    pub enable_zoom: bool,
}

impl CameraConfig {
    pub fn eye(&self) -> Point3<f32> {
        Point3::from(self.position)
    }

    pub fn look_at(&self) -> Point3<f32> {
        Point3::from(self.target)
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 30.0,
            near: 1.0,
            far: 2000.0,
            position: [0.0, 50.0, 50.0],
            target: [0.0, 0.0, 0.0],
            enable_rotate: true,
            enable_pan: true,
            enable_zoom: true,
        }
    }
}

/// One ambient light and one spot light aimed at the origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub ambient_color: String,
    pub ambient_intensity: f32,
    pub spot_color: String,
    pub spot_intensity: f32,
    /// Range of the spot light; 0 disables distance falloff
    pub spot_distance: f32,
    pub spot_position: [f32; 3],
    /// Point the spot light is aimed at
    pub spot_target: [f32; 3],
    /// Half-angle of the spot cone
    pub spot_angle_degrees: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            ambient_color: "#ffffff".to_string(),
            ambient_intensity: 1.0,
            spot_color: "#ffffff".to_string(),
            spot_intensity: 1.0,
            spot_distance: 1000.0,
            spot_position: [0.0, 10.0, 60.0],
            spot_target: [0.0, 0.0, 0.0],
            spot_angle_degrees: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "wavegrid".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub grid: GridConfig,
    pub wave: WaveParams,
    pub noise: NoiseConfig,
    pub scene: SceneConfig,
    pub camera: CameraConfig,
    pub lights: LightConfig,
    pub window: WindowConfig,
}

impl WaveConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: WaveConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject configurations the updater or renderer cannot use
    pub fn validate(&self) -> Result<()> {
        if self.grid.rows == 0 || self.grid.cols == 0 {
            return Err(Error::Config(format!(
                "grid must have at least one cell, got {}x{}",
                self.grid.rows, self.grid.cols
            )));
        }
        match self.grid.rows.checked_mul(self.grid.cols) {
            Some(cells) if cells <= MAX_GRID_CELLS => {}
            _ => {
                return Err(Error::Config(format!(
                    "grid of {}x{} exceeds {MAX_GRID_CELLS} cells",
                    self.grid.rows, self.grid.cols
                )))
            }
        }
        if !(self.grid.spacing.is_finite() && self.grid.spacing > 0.0) {
            return Err(Error::Config("grid.spacing must be positive".to_string()));
        }

        let [d0, d1] = self.wave.distance_domain;
        if d0 == d1 || !d0.is_finite() || !d1.is_finite() {
            return Err(Error::Config(format!(
                "wave.distance_domain [{d0}, {d1}] must be a non-empty interval"
            )));
        }
        let finite = [self.wave.phase_step, self.wave.crest]
            .iter()
            .chain(&self.wave.offset_range)
            .chain(&self.wave.noise_scale)
            .all(|v| v.is_finite());
        if !finite {
            return Err(Error::Config("wave parameters must be finite".to_string()));
        }

        if !(self.scene.sphere_radius.is_finite() && self.scene.sphere_radius > 0.0) {
            return Err(Error::Config("scene.sphere_radius must be positive".to_string()));
        }
        if !(3..=MAX_SPHERE_SEGMENTS).contains(&self.scene.sphere_segments) {
            return Err(Error::Config(format!(
                "scene.sphere_segments must be in 3..={MAX_SPHERE_SEGMENTS}, got {}",
                self.scene.sphere_segments
            )));
        }
        Rgb::from_hex(&self.scene.sphere_color)?;
        Rgb::from_hex(&self.scene.background)?;
        Rgb::from_hex(&self.lights.ambient_color)?;
        Rgb::from_hex(&self.lights.spot_color)?;

        let camera = &self.camera;
        if !(camera.near > 0.0 && camera.near < camera.far) {
            return Err(Error::Config(format!(
                "camera clip planes must satisfy 0 < near < far, got near={} far={}",
                camera.near, camera.far
            )));
        }
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(Error::Config(format!(
                "camera.fov_degrees must be in (0, 180), got {}",
                camera.fov_degrees
            )));
        }
        if camera.position == camera.target {
            return Err(Error::Config("camera.position and camera.target coincide".to_string()));
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(Error::Config("window size must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Load and validate a configuration file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<WaveConfig> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    let config = WaveConfig::from_toml_str(&source)
        .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
    tracing::info!(
        "Loaded config from {} ({}x{} grid)",
        path.display(),
        config.grid.rows,
        config.grid.cols
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = WaveConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid.rows, 50);
        assert_relative_eq!(config.wave.phase_step, 0.06);
        assert_eq!(config.noise.seed, None);
    }

    #[test]
    fn test_partial_document() {
        let config = WaveConfig::from_toml_str(
            r#"
            [grid]
            rows = 10

            [noise]
            seed = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.grid.rows, 10);
        assert_eq!(config.grid.cols, 50);
        assert_eq!(config.noise.seed, Some(5));
        assert_eq!(config.scene, SceneConfig::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = WaveConfig::default();
        config.noise.seed = Some(11);
        config.wave.crest = 2.0;
        let text = config.to_toml_string().unwrap();
        assert_eq!(WaveConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_empty_grid() {
        let err = WaveConfig::from_toml_str("[grid]\nrows = 0").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_oversized_grid() {
        let err = WaveConfig::from_toml_str("[grid]\nrows = 4294967296\ncols = 4294967296").unwrap_err();
        assert!(err.to_string().contains("exceeds"));

        let err = WaveConfig::from_toml_str("[grid]\nrows = 2048\ncols = 1024").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        assert!(WaveConfig::from_toml_str("[grid]\nrows = 1024\ncols = 1024").is_ok());
    }

    #[test]
    fn test_rejects_oversized_segments() {
        let err = WaveConfig::from_toml_str("[scene]\nsphere_segments = 70000").unwrap_err();
        assert!(err.to_string().contains("sphere_segments"));
        assert!(WaveConfig::from_toml_str("[scene]\nsphere_segments = 1025").is_err());
        assert!(WaveConfig::from_toml_str("[scene]\nsphere_segments = 1024").is_ok());
        assert!(WaveConfig::from_toml_str("[scene]\nsphere_segments = 2").is_err());
    }

    #[test]
    fn test_rejects_degenerate_domain() {
        let err = WaveConfig::from_toml_str("[wave]\ndistance_domain = [3.0, 3.0]").unwrap_err();
        assert!(err.to_string().contains("distance_domain"));
    }

    #[test]
    fn test_rejects_bad_clip_planes() {
        let err = WaveConfig::from_toml_str("[camera]\nnear = 10.0\nfar = 5.0").unwrap_err();
        assert!(err.to_string().contains("near"));
    }

    #[test]
    fn test_rejects_bad_color() {
        assert!(WaveConfig::from_toml_str("[scene]\nsphere_color = \"blue\"").is_err());
        assert!(WaveConfig::from_toml_str("[scene]\nbackground = \"#12345\"").is_err());
    }

    #[test]
    fn test_malformed_toml() {
        let err = WaveConfig::from_toml_str("[grid\nrows = 1").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_hex_colors() {
        let c = Rgb::from_hex("#70BEF9").unwrap();
        assert_relative_eq!(c.r, 0x70 as f32 / 255.0);
        assert_relative_eq!(c.g, 0xBE as f32 / 255.0);
        assert_relative_eq!(c.b, 0xF9 as f32 / 255.0);
        assert_eq!(Rgb::from_hex("#fff").unwrap(), Rgb::WHITE);
        assert!(Rgb::from_hex("fff").is_err());
        assert!(Rgb::from_hex("#ggg").is_err());
    }

    #[test]
    fn test_linear_conversion() {
        let [r, g, b] = Rgb::WHITE.to_linear();
        assert_relative_eq!(r, 1.0, epsilon = 1e-6);
        assert_relative_eq!(g, 1.0, epsilon = 1e-6);
        assert_relative_eq!(b, 1.0, epsilon = 1e-6);
        let [dark, _, _] = Rgb::from_hex("#808080").unwrap().to_linear();
        assert!(dark < 0.5 && dark > 0.2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config("/definitely/not/here/wavegrid.toml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
