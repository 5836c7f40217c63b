use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScoringConfig {
    /// これ未満の可視度のジョイントが 1 つでもあれば採点しない
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: f32,
    /// これ未満の長さのボーンは方向なし
    #[serde(default = "default_bone_epsilon")]
    pub bone_epsilon: f32,
    /// 共分散の特異値比がこれ未満なら整列不能として採点しない
    #[serde(default = "default_condition_tolerance")]
    pub condition_tolerance: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RenderConfig {
    /// 正方形キャンバスの一辺（ピクセル）
    #[serde(default = "default_canvas_size")]
    pub canvas_size: u32,
    #[serde(default = "default_point_radius")]
    pub point_radius: i32,
    #[serde(default = "default_line_width")]
    pub line_width: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewConfig {
    /// ドラッグ 1 ピクセルあたりの回転角（度）
    #[serde(default = "default_degrees_per_pixel")]
    pub degrees_per_pixel: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// ライブ入力のフレームレート
    #[serde(default = "default_fps")]
    pub fps: f32,
    /// 未検出がこの秒数を超えて続いたら不在扱い
    #[serde(default = "default_undetected_grace_secs")]
    pub undetected_grace_secs: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// env_logger のフィルタ (e.g. "info", "motion_coach=debug")
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_visibility_threshold() -> f32 { 0.5 }
fn default_bone_epsilon() -> f32 { 1e-6 }
fn default_condition_tolerance() -> f32 { 1e-4 }
fn default_canvas_size() -> u32 { 512 }
fn default_point_radius() -> i32 { 3 }
fn default_line_width() -> i32 { 2 }
fn default_degrees_per_pixel() -> f32 { 0.5 }
fn default_fps() -> f32 { 30.0 }
fn default_undetected_grace_secs() -> f32 { 1.0 }
fn default_log_level() -> String { "info".to_string() }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: default_visibility_threshold(),
            bone_epsilon: default_bone_epsilon(),
            condition_tolerance: default_condition_tolerance(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas_size: default_canvas_size(),
            point_radius: default_point_radius(),
            line_width: default_line_width(),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            degrees_per_pixel: default_degrees_per_pixel(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            undetected_grace_secs: default_undetected_grace_secs(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config")?;
        Ok(config)
    }

    /// 読み込みに失敗したらデフォルト値で続行
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{:#}; using default configuration", e);
                Self::default()
            }
        }
    }
}
