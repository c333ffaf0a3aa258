use crate::deblender::DeblendParams;
use crate::footprint::Footprint;
use crate::image::{MaskedImage, Plane};
use crate::types::Peak;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct DemoConfig {
    pub input: InputConfig,
    /// Region to deblend; the whole image when absent.
    #[serde(default)]
    pub footprint: Option<Footprint>,
    pub peaks: Vec<Peak>,
    #[serde(default)]
    pub params: DeblendParams,
    pub output: DemoOutputConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum InputConfig {
    /// Grayscale image on disk, scaled to `[0, 1]`.
    Image {
        path: PathBuf,
        #[serde(default)]
        variance: f32,
    },
    Synthetic(SyntheticBlend),
}

/// Sum of circular Gaussians on a flat background.
#[derive(Debug, Deserialize)]
pub struct SyntheticBlend {
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub background: f32,
    #[serde(default)]
    pub variance: f32,
    pub sources: Vec<GaussianSource>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GaussianSource {
    pub x: f32,
    pub y: f32,
    pub amplitude: f32,
    pub sigma: f32,
}

impl SyntheticBlend {
    pub fn render(&self) -> Result<MaskedImage<f32>, String> {
        let mut plane = Plane::filled(self.width, self.height, self.background);
        for y in 0..self.height {
            for x in 0..self.width {
                let v: f32 = self
                    .sources
                    .iter()
                    .map(|s| {
                        let r2 = (x as f32 - s.x).powi(2) + (y as f32 - s.y).powi(2);
                        s.amplitude * (-0.5 * r2 / (s.sigma * s.sigma)).exp()
                    })
                    .sum();
                plane.set(x, y, self.background + v);
            }
        }
        MaskedImage::from_image(0, 0, plane, self.variance)
            .map_err(|e| format!("Invalid synthetic image: {e}"))
    }
}

#[derive(Debug, Deserialize)]
pub struct DemoOutputConfig {
    /// Directory receiving one PNG per deblended peak.
    pub children_dir: PathBuf,
    pub report_json: PathBuf,
}

impl DemoConfig {
    /// Configured footprint, or the full image box.
    pub fn resolve_footprint(&self, image: &MaskedImage<f32>) -> Footprint {
        self.footprint
            .clone()
            .unwrap_or_else(|| Footprint::from_bbox(&image.bbox()))
    }

    pub fn load_image(&self, base: &Path) -> Result<MaskedImage<f32>, String> {
        match &self.input {
            InputConfig::Image { path, variance } => {
                let path = if path.is_relative() {
                    base.join(path)
                } else {
                    path.clone()
                };
                crate::image::io::load_grayscale_image(&path, *variance)
            }
            InputConfig::Synthetic(blend) => blend.render(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<DemoConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

pub fn parse_config(data: &str) -> Result<DemoConfig, serde_json::Error> {
    serde_json::from_str(data)
}
