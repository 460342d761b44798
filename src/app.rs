use std::path::PathBuf;
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use parking_lot::Mutex;

use crate::capture::{CaptureOptions, capture_element};
use crate::config::{SnipCallbacks, SnipOptions};
use crate::export::ImageBlob;
use crate::image::ImageSource;
use crate::widget::{Host, Snip};

/// What the next snip starts from.
#[derive(Debug, Clone)]
enum BaseImage {
    Path(PathBuf),
    Pixels(RgbaImage),
}

impl Default for BaseImage {
    fn default() -> Self {
        BaseImage::Pixels(gradient(640, 480))
    }
}

impl BaseImage {
    fn source(&self) -> ImageSource {
        match self {
            BaseImage::Path(path) => ImageSource::Path(path.clone()),
            BaseImage::Pixels(pixels) => ImageSource::Pixels(pixels.clone()),
        }
    }
}

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            160,
            255,
        ])
    })
}

/// Slot the destroy callback writes the outcome of a snip into.
type ResultSlot = Arc<Mutex<Option<Option<ImageBlob>>>>;

/// Demo app: snips an image, or the app window itself.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct SnipApp {
    options: SnipOptions,
    #[serde(skip)]
    base: BaseImage,
    #[serde(skip)]
    snip: Option<Snip>,
    #[serde(skip)]
    want_snip: bool,
    #[serde(skip)]
    capturing: bool,
    #[serde(skip)]
    result: ResultSlot,
    #[serde(skip)]
    last_result: Option<String>,
}

impl Default for SnipApp {
    fn default() -> Self {
        Self {
            options: SnipOptions::default(),
            base: BaseImage::default(),
            snip: None,
            want_snip: true,
            capturing: false,
            result: Arc::new(Mutex::new(None)),
            last_result: None,
        }
    }
}

impl SnipApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, image: Option<PathBuf>) -> Self {
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        if let Some(path) = image {
            log::info!("snipping {}", path.display());
            app.base = BaseImage::Path(path);
        }
        app
    }

    fn start_snip(&mut self, ctx: &egui::Context, rect: egui::Rect) {
        let slot = self.result.clone();
        let callbacks = SnipCallbacks::default()
            .on_ready(|| log::debug!("snip ready"))
            .on_destroy(move |blob| *slot.lock() = Some(blob));
        let host = Host::new(egui::Id::new("snip_host"), rect);

        match Snip::new(ctx, host, self.base.source(), self.options.clone(), callbacks) {
            Ok(snip) => self.snip = Some(snip),
            Err(err) => {
                self.result.lock().take();
                self.last_result = Some(format!("could not start: {err}"));
            }
        }
    }

    fn collect_result(&mut self) {
        let Some(outcome) = self.result.lock().take() else {
            return;
        };
        self.last_result = Some(match outcome {
            Some(blob) => format!("exported {} × {} ({} bytes)", blob.width, blob.height, blob.png.len()),
            None => "cancelled".to_owned(),
        });
        self.snip = None;
    }

    fn collect_window_capture(&mut self, ctx: &egui::Context) {
        if !self.capturing {
            return;
        }
        let shot = ctx.input(|input| {
            input.events.iter().find_map(|event| match event {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        let Some(shot) = shot else {
            ctx.request_repaint();
            return;
        };
        self.capturing = false;

        let captured = capture_element(
            &shot,
            ctx.screen_rect(),
            ctx.pixels_per_point(),
            &CaptureOptions::default(),
        )
        .and_then(|blob| blob.decode());
        match captured {
            Ok(pixels) => {
                self.base = BaseImage::Pixels(pixels);
                self.want_snip = true;
            }
            Err(err) => {
                log::error!("window capture failed: {err}");
                self.last_result = Some(format!("window capture failed: {err}"));
            }
        }
    }
}

impl eframe::App for SnipApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.collect_result();
        self.collect_window_capture(ctx);

        egui::TopBottomPanel::top("snip_top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let idle = self.snip.is_none() && !self.capturing;
                if ui.add_enabled(idle, egui::Button::new("New snip")).clicked() {
                    self.want_snip = true;
                }
                if ui
                    .add_enabled(idle, egui::Button::new("Snip this window"))
                    .clicked()
                {
                    self.capturing = true;
                    ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(Default::default()));
                }
                ui.separator();
                ui.checkbox(&mut self.options.auto_full, "Select all");
                ui.checkbox(&mut self.options.save_btn, "Save button");
                if let Some(result) = &self.last_result {
                    ui.separator();
                    ui.label(result);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            if self.want_snip && self.snip.is_none() && !self.capturing {
                self.want_snip = false;
                self.start_snip(ctx, rect);
            }
            match self.snip.as_mut() {
                Some(snip) => snip.show(ui),
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.label("Press \"New snip\" to start");
                    });
                }
            }
        });
    }
}
