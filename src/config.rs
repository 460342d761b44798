use std::path::PathBuf;

use egui::Color32;
use serde::{Deserialize, Deserializer, Serialize};

use crate::geometry::hit_testing::RESIZE_HANDLE_SIZE;
use crate::geometry::{DEFAULT_WELD_DISTANCE, MIN_CROP_SIZE};
use crate::lifecycle::{DestroyCallback, ReadyCallback};

/// Stroke settings shared by the pen and the shape tools.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: Color32,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub color: Color32,
    pub size: f32,
    /// Initial wrap width of a new text box.
    pub box_width: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color32::RED,
            size: 20.0,
            box_width: 200.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MosaicStyle {
    pub width: f32,
    /// Side of the repeating grey tile, in pixels.
    pub tile: u32,
}

impl Default for MosaicStyle {
    fn default() -> Self {
        Self {
            width: 20.0,
            tile: 10,
        }
    }
}

/// Configuration of a screenshot instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // missing keys fall back to the defaults below
pub struct SnipOptions {
    /// Edge weld distance; `false` in JSON disables welding.
    #[serde(deserialize_with = "weld_distance")]
    pub auto_weld: Option<f32>,
    /// Skip the rubber-band step and select the whole host.
    pub auto_full: bool,
    pub ok_color: Color32,
    pub cancel_color: Color32,
    pub btn_color: Color32,
    pub btn_size: f32,
    /// Show the save-to-disk button.
    pub save_btn: bool,
    /// Smaller selections fall back to the whole host.
    pub min_size: f32,
    pub handle_size: f32,
    pub pen: LineStyle,
    pub shape: LineStyle,
    pub arrow_head: f32,
    pub text: TextStyle,
    pub mosaic: MosaicStyle,
    /// Where saved screenshots go on native targets; the working directory if unset.
    pub save_dir: Option<PathBuf>,
}

impl Default for SnipOptions {
    fn default() -> Self {
        Self {
            auto_weld: Some(DEFAULT_WELD_DISTANCE),
            auto_full: false,
            ok_color: Color32::from_rgb(76, 175, 80),
            cancel_color: Color32::from_rgb(244, 67, 54),
            btn_color: Color32::WHITE,
            btn_size: 24.0,
            save_btn: true,
            min_size: MIN_CROP_SIZE,
            handle_size: RESIZE_HANDLE_SIZE,
            pen: LineStyle {
                color: Color32::RED,
                width: 3.0,
            },
            shape: LineStyle {
                color: Color32::RED,
                width: 2.0,
            },
            arrow_head: 12.0,
            text: TextStyle::default(),
            mosaic: MosaicStyle::default(),
            save_dir: None,
        }
    }
}

impl SnipOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// The weld distance actually in effect.
    pub fn weld_distance(&self) -> Option<f32> {
        self.auto_weld.filter(|distance| *distance > 0.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WeldSetting {
    Enabled(bool),
    Distance(f32),
}

fn weld_distance<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<WeldSetting>::deserialize(deserializer)? {
        None | Some(WeldSetting::Enabled(false)) => None,
        Some(WeldSetting::Enabled(true)) => Some(DEFAULT_WELD_DISTANCE),
        Some(WeldSetting::Distance(distance)) if distance > 0.0 => Some(distance),
        Some(WeldSetting::Distance(_)) => None,
    })
}

/// Notifications a host can attach to an instance.
#[derive(Default)]
pub struct SnipCallbacks {
    /// Fires once when the source image is ready.
    pub on_ready: Option<ReadyCallback>,
    /// Fires exactly once on teardown, with the exported image if there is one.
    pub on_destroy: Option<DestroyCallback>,
}

impl std::fmt::Debug for SnipCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnipCallbacks")
            .field("on_ready", &self.on_ready.is_some())
            .field("on_destroy", &self.on_destroy.is_some())
            .finish()
    }
}

impl SnipCallbacks {
    pub fn on_ready(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_ready = Some(Box::new(callback));
        self
    }

    pub fn on_destroy(
        mut self,
        callback: impl FnOnce(Option<crate::export::ImageBlob>) + 'static,
    ) -> Self {
        self.on_destroy = Some(Box::new(callback));
        self
    }
}
