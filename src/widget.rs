//! The screenshot widget: one instance bound to one host area.

use egui::{
    Color32, Context, CursorIcon, Id, Pos2, Rect, Sense, Stroke, TextureHandle, TextureOptions, Ui,
    ViewportCommand,
};
use image::RgbaImage;

use crate::annotation::{AnnotationSession, ObjectCanvas, ToolKind, ToolStyles};
use crate::capture::{color_image_to_rgba, crop_physical, render_crop};
use crate::config::{SnipCallbacks, SnipOptions};
use crate::error::SnipError;
use crate::export::{ExportJob, ExportTarget, ImageBlob};
use crate::geometry::CropRect;
use crate::image::{ImageLoad, ImageSource, SourceImage};
use crate::input::{InputEvent, InputHandler, KeyCommand, PointerEvent};
use crate::lifecycle::{Lifecycle, QueueMode, Status};
use crate::selection::{SelectionController, SelectionEffect};
use crate::widgets::{ResizeHandle, Toolbar, ToolbarAction, paint_size_readout};

/// Frames to wait for a requested screenshot before exporting without annotations.
pub const SCREENSHOT_TIMEOUT_FRAMES: u32 = 30;

const MASK_COLOR: Color32 = Color32::from_black_alpha(120);
const BORDER_COLOR: Color32 = Color32::from_rgb(30, 120, 255);

/// The area a widget instance lives in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Host {
    pub id: Id,
    /// Content box in screen coordinates.
    pub rect: Rect,
}

impl Host {
    pub fn new(id: Id, rect: Rect) -> Self {
        Self { id, rect }
    }

    pub fn is_valid(&self) -> bool {
        self.rect.is_finite() && self.rect.width() > 0.0 && self.rect.height() > 0.0
    }

    fn marker_id(&self) -> Id {
        self.id.with("eframe_snip::bound")
    }

    /// Whether a live instance currently owns this host.
    pub fn is_bound(&self, ctx: &Context) -> bool {
        ctx.data(|data| data.get_temp::<bool>(self.marker_id()))
            .unwrap_or(false)
    }
}

/// Work that needs the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadyTask {
    RegenerateCrop,
}

#[derive(Debug)]
enum ExportState {
    Idle,
    /// Waiting for a chrome-free frame to be captured.
    AwaitingScreenshot {
        target: ExportTarget,
        requested: bool,
        frames: u32,
    },
    Running(ExportJob),
}

/// A screenshot capture and annotation session over a host area.
pub struct Snip {
    ctx: Context,
    host: Host,
    options: SnipOptions,
    lifecycle: Lifecycle<ReadyTask>,
    load: Option<ImageLoad>,
    image: Option<SourceImage>,
    selection: SelectionController,
    crop: Option<RgbaImage>,
    toolbar_visible: bool,
    toolbar_rect: Option<Rect>,
    annotation: Option<AnnotationSession<ObjectCanvas>>,
    input: InputHandler,
    export: ExportState,
    owns_marker: bool,
    image_texture: Option<TextureHandle>,
    crop_texture: Option<TextureHandle>,
}

impl std::fmt::Debug for Snip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snip")
            .field("host", &self.host)
            .field("status", &self.lifecycle.status())
            .field("rect", &self.selection.rect())
            .field("selection", &self.selection.state())
            .field("active_tool", &self.active_tool())
            .field("export", &self.export)
            .finish_non_exhaustive()
    }
}

impl Snip {
    /// Binds a new instance to `host`.
    ///
    /// On error the half-built instance is destroyed first, so `on_destroy`
    /// still runs (without a payload).
    pub fn new(
        ctx: &Context,
        host: Host,
        source: ImageSource,
        options: SnipOptions,
        callbacks: SnipCallbacks,
    ) -> Result<Self, SnipError> {
        let mut lifecycle = Lifecycle::new(callbacks.on_ready, callbacks.on_destroy);

        let checked = if !host.is_valid() {
            Err(SnipError::InvalidHost(host.rect))
        } else if host.is_bound(ctx) {
            Err(SnipError::HostAlreadyBound(host.id))
        } else {
            source.validate()
        };
        if let Err(err) = checked {
            log::error!("cannot create screenshot instance: {err}");
            lifecycle.destroy(None);
            return Err(err);
        }

        ctx.data_mut(|data| data.insert_temp(host.marker_id(), true));
        lifecycle.set_status(Status::WaitForImage);

        let selection = SelectionController::new(host.rect, &options);
        let mut snip = Self {
            ctx: ctx.clone(),
            host,
            options,
            lifecycle,
            load: Some(source.load()),
            image: None,
            selection,
            crop: None,
            toolbar_visible: false,
            toolbar_rect: None,
            annotation: None,
            input: InputHandler::new(),
            export: ExportState::Idle,
            owns_marker: true,
            image_texture: None,
            crop_texture: None,
        };
        snip.apply_selection_effects();
        snip.poll();
        Ok(snip)
    }

    pub fn status(&self) -> Status {
        self.lifecycle.status()
    }

    pub fn is_destroyed(&self) -> bool {
        self.lifecycle.is_destroyed()
    }

    pub fn options(&self) -> &SnipOptions {
        &self.options
    }

    pub fn host(&self) -> Host {
        self.host
    }

    /// The loaded source image.
    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    /// The current rendering of the crop region.
    pub fn crop(&self) -> Option<&RgbaImage> {
        self.crop.as_ref()
    }

    /// The drawing canvas, once annotation started.
    pub fn canvas(&self) -> Option<&ObjectCanvas> {
        self.annotation.as_ref().map(|session| session.surface())
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// The crop rectangle, host-local.
    pub fn rect(&self) -> CropRect {
        self.selection.rect()
    }

    pub fn active_tool(&self) -> Option<ToolKind> {
        self.annotation
            .as_ref()
            .and_then(|session| session.active_tool())
    }

    pub fn is_annotating(&self) -> bool {
        self.annotation.is_some()
    }

    pub fn is_exporting(&self) -> bool {
        !matches!(self.export, ExportState::Idle)
    }

    pub fn toolbar_visible(&self) -> bool {
        self.toolbar_visible && self.crop.is_some() && !self.selection.is_dragging()
    }

    /// Advances image loading and a running export. Called by [`Snip::show`].
    pub fn poll(&mut self) {
        if self.is_destroyed() {
            return;
        }

        if let Some(load) = self.load.as_mut() {
            match load.poll() {
                Some(Ok(pixels)) => {
                    self.load = None;
                    log::info!("source image {}x{} loaded", pixels.width(), pixels.height());
                    self.image = Some(SourceImage::new(pixels, self.host.rect.size()));
                    for task in self.lifecycle.set_status(Status::Ready) {
                        self.run(task);
                    }
                }
                Some(Err(err)) => {
                    self.load = None;
                    log::error!("failed to load source image: {err}");
                    self.destroy(None);
                    return;
                }
                None => self.ctx.request_repaint(),
            }
        }

        if let ExportState::Running(job) = &mut self.export {
            match job.poll() {
                Some(Ok(blob)) => {
                    self.destroy(Some(blob));
                }
                Some(Err(err)) => {
                    log::error!("export failed: {err}");
                    self.destroy(None);
                }
                None => self.ctx.request_repaint(),
            }
        }
    }

    fn apply_selection_effects(&mut self) {
        for effect in self.selection.take_effects() {
            match effect {
                SelectionEffect::Invalidate => {
                    self.crop = None;
                    self.crop_texture = None;
                    self.toolbar_visible = false;
                }
                SelectionEffect::Regenerate => {
                    if let Some(task) = self
                        .lifecycle
                        .when_ready(ReadyTask::RegenerateCrop, QueueMode::Replace)
                    {
                        self.run(task);
                    }
                }
            }
        }
    }

    fn run(&mut self, task: ReadyTask) {
        match task {
            ReadyTask::RegenerateCrop => {
                if self.annotation.is_some() {
                    return;
                }
                let Some(image) = self.image.as_ref() else {
                    return;
                };
                let rect = self.selection.rect();
                log::debug!("rendering crop {rect:?}");
                self.crop = Some(render_crop(image, &rect));
                self.crop_texture = None;
                self.toolbar_visible = true;
            }
        }
    }

    /// Feeds one pointer event; returns whether it was used.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        if self.is_destroyed() || self.is_exporting() {
            return false;
        }
        if let PointerEvent::Down { pos, .. } = event {
            if self.toolbar_rect.is_some_and(|rect| rect.contains(*pos)) {
                return false;
            }
        }

        if let Some(session) = self.annotation.as_mut() {
            return session.handle_pointer(event);
        }
        let used = self.selection.handle_pointer(event);
        self.apply_selection_effects();
        used
    }

    pub fn handle_key(&mut self, key: KeyCommand) {
        if self.is_destroyed() {
            return;
        }
        match key {
            KeyCommand::Cancel => {
                if matches!(self.export, ExportState::Running(_)) {
                    log::debug!("export already running, ignoring cancel");
                    return;
                }
                log::info!("cancelled");
                self.destroy(None);
            }
            KeyCommand::Confirm => self.confirm(),
            KeyCommand::Delete => {
                if let Some(session) = self.annotation.as_mut() {
                    session.delete_selected();
                }
            }
            KeyCommand::Backspace => {
                if let Some(session) = self.annotation.as_mut() {
                    session.backspace();
                }
            }
        }
    }

    /// Typed text, for the text tool.
    pub fn handle_text(&mut self, text: &str) -> bool {
        if self.is_exporting() {
            return false;
        }
        self.annotation
            .as_mut()
            .is_some_and(|session| session.handle_text(text))
    }

    /// Toggles a drawing tool; the first call freezes the crop region for good.
    pub fn toggle_tool(&mut self, tool: ToolKind) {
        if self.is_destroyed() || self.is_exporting() {
            return;
        }
        if self.annotation.is_none() && !self.start_annotation() {
            return;
        }
        if let Some(session) = self.annotation.as_mut() {
            session.toggle_tool(tool);
        }
    }

    fn start_annotation(&mut self) -> bool {
        if !self.lifecycle.is_ready() || self.selection.is_dragging() {
            return false;
        }
        let Some(crop) = self.crop.clone() else {
            log::warn!("no crop to annotate yet");
            return false;
        };
        self.selection.freeze();
        let region = self.selection.screen_rect();
        self.annotation = Some(AnnotationSession::start(
            ObjectCanvas::new(region),
            crop,
            region,
            ToolStyles::from(&self.options),
        ));
        true
    }

    /// Exports to the clipboard, falling back to a file.
    pub fn confirm(&mut self) {
        self.export(ExportTarget::Clipboard);
    }

    /// Exports to a file (a download on the web).
    pub fn save(&mut self) {
        self.export(ExportTarget::File);
    }

    fn export(&mut self, target: ExportTarget) {
        if self.is_destroyed() || self.is_exporting() {
            return;
        }
        let Some(crop) = self.crop.as_ref() else {
            log::warn!("nothing selected to export");
            return;
        };

        match self.annotation.as_mut() {
            None => {
                log::info!("exporting {target:?}");
                self.export = ExportState::Running(ExportJob::spawn(
                    crop.clone(),
                    target,
                    self.options.save_dir.clone(),
                ));
            }
            Some(session) => {
                log::info!("exporting annotated crop {target:?}");
                session.stop();
                self.export = ExportState::AwaitingScreenshot {
                    target,
                    requested: false,
                    frames: 0,
                };
            }
        }
        self.toolbar_visible = false;
        self.ctx.request_repaint();
    }

    /// Tears everything down and fires `on_destroy` once; later calls do nothing.
    pub fn destroy(&mut self, payload: Option<ImageBlob>) -> bool {
        if self.is_destroyed() {
            return false;
        }
        self.selection.stop();
        if let Some(mut session) = self.annotation.take() {
            session.stop();
        }
        self.load = None;
        self.crop = None;
        self.toolbar_visible = false;
        self.toolbar_rect = None;
        self.export = ExportState::Idle;
        self.image_texture = None;
        self.crop_texture = None;
        if self.owns_marker {
            let marker = self.host.marker_id();
            self.ctx.data_mut(|data| data.remove::<bool>(marker));
            self.owns_marker = false;
        }
        self.lifecycle.destroy(payload)
    }

    /// Handles this frame's input and paints the widget.
    pub fn show(&mut self, ui: &mut Ui) {
        self.poll();
        if self.is_destroyed() {
            return;
        }

        let events = ui.ctx().input(|input| input.events.clone());
        self.advance_export(&events);

        for event in self.input.process_events(&events) {
            match event {
                InputEvent::Pointer(pointer) => {
                    self.handle_pointer(&pointer);
                }
                InputEvent::Text(text) => {
                    self.handle_text(&text);
                }
                InputEvent::Key(key) => self.handle_key(key),
            }
            if self.is_destroyed() {
                return;
            }
        }

        self.paint(ui);
    }

    fn advance_export(&mut self, events: &[egui::Event]) {
        let ExportState::AwaitingScreenshot {
            target,
            requested,
            frames,
        } = &mut self.export
        else {
            return;
        };
        let target = *target;

        if !*requested {
            // This frame is painted without chrome; the shot arrives in a later frame.
            self.ctx
                .send_viewport_cmd(ViewportCommand::Screenshot(Default::default()));
            *requested = true;
            self.ctx.request_repaint();
            return;
        }

        let shot = events.iter().find_map(|event| match event {
            egui::Event::Screenshot { image, .. } => Some(image.clone()),
            _ => None,
        });
        let pixels = match shot {
            Some(image) => Some(crop_physical(
                &color_image_to_rgba(&image),
                self.selection.screen_rect(),
                self.ctx.pixels_per_point(),
            )),
            None => {
                *frames += 1;
                if *frames > SCREENSHOT_TIMEOUT_FRAMES {
                    log::warn!("no screenshot after {frames} frames, exporting without annotations");
                    self.crop.clone()
                } else {
                    self.ctx.request_repaint();
                    return;
                }
            }
        };

        match pixels {
            Some(pixels) => {
                self.export = ExportState::Running(ExportJob::spawn(
                    pixels,
                    target,
                    self.options.save_dir.clone(),
                ));
                self.ctx.request_repaint();
            }
            None => {
                log::error!("nothing to export");
                self.destroy(None);
            }
        }
    }

    fn paint(&mut self, ui: &mut Ui) {
        let ctx = ui.ctx().clone();
        let host = self.host.rect;
        let painter = ui.painter_at(host);
        let response = ui.interact(host, self.host.id.with("eframe_snip::area"), Sense::hover());

        if self.image_texture.is_none() {
            if let Some(image) = self.image.as_ref() {
                self.image_texture = Some(ctx.load_texture(
                    "snip-source",
                    image.to_color_image(),
                    TextureOptions::LINEAR,
                ));
            }
        }
        if let Some(texture) = &self.image_texture {
            painter.image(
                texture.id(),
                host,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        let has_rect = self.selection.has_selection() || self.selection.is_dragging();
        let crop = self.selection.screen_rect();
        let chrome = matches!(self.export, ExportState::Idle);

        if !has_rect {
            painter.rect_filled(host, 0.0, MASK_COLOR);
        } else {
            for shade in mask_around(host, crop) {
                painter.rect_filled(shade, 0.0, MASK_COLOR);
            }
        }

        if let Some(session) = self.annotation.as_mut() {
            session.surface_mut().paint(&ctx, &painter, chrome);
        } else if let Some(pixels) = self.crop.as_ref() {
            let texture = self.crop_texture.get_or_insert_with(|| {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [pixels.width() as usize, pixels.height() as usize],
                    pixels.as_raw(),
                );
                ctx.load_texture("snip-crop", image, TextureOptions::LINEAR)
            });
            painter.image(
                texture.id(),
                crop,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        if !chrome {
            self.toolbar_rect = None;
            return;
        }

        if has_rect {
            painter.rect_stroke(crop, 0.0, Stroke::new(1.0, BORDER_COLOR));
        }

        if !self.selection.is_frozen() {
            for (direction, _) in self.selection.handle_rects() {
                ResizeHandle::on_rect(direction, crop, self.options.handle_size)
                    .show(ui, self.host.id);
            }
            if has_rect {
                if let Some(readout) = self.selection.readout() {
                    paint_size_readout(&painter, readout, host.min);
                }
            }
        }

        if self.toolbar_visible() {
            let toolbar = Toolbar::new(&self.options, self.active_tool());
            let rect = toolbar.layout(crop, host);
            self.toolbar_rect = Some(rect);
            if let Some(action) = toolbar.show(ui, rect, self.host.id.with("eframe_snip::toolbar"))
            {
                self.on_toolbar(action);
            }
        } else {
            self.toolbar_rect = None;
        }

        if response.hovered() {
            ui.ctx().set_cursor_icon(self.cursor(ui.ctx()));
        }
    }

    fn cursor(&self, ctx: &Context) -> CursorIcon {
        let Some(pointer) = ctx.pointer_hover_pos() else {
            return CursorIcon::Default;
        };
        if let Some(session) = self.annotation.as_ref() {
            return if session.region().contains(pointer) {
                session.surface().cursor().icon()
            } else {
                CursorIcon::Default
            };
        }
        if !self.selection.has_selection() {
            return CursorIcon::Crosshair;
        }
        if let Some((direction, _)) = self
            .selection
            .handle_rects()
            .into_iter()
            .find(|(_, rect)| rect.contains(pointer))
        {
            return direction.cursor_icon();
        }
        if self.selection.screen_rect().contains(pointer) {
            CursorIcon::Move
        } else {
            CursorIcon::Default
        }
    }

    fn on_toolbar(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::Toggle(tool) => self.toggle_tool(tool),
            ToolbarAction::Save => self.save(),
            ToolbarAction::Cancel => {
                log::info!("cancelled from toolbar");
                self.destroy(None);
            }
            ToolbarAction::Confirm => self.confirm(),
        }
    }
}

impl Drop for Snip {
    fn drop(&mut self) {
        self.destroy(None);
    }
}

/// The four rects of `outer` not covered by `inner`.
fn mask_around(outer: Rect, inner: Rect) -> [Rect; 4] {
    [
        Rect::from_min_max(outer.min, Pos2::new(outer.max.x, inner.min.y)),
        Rect::from_min_max(Pos2::new(outer.min.x, inner.max.y), outer.max),
        Rect::from_min_max(
            Pos2::new(outer.min.x, inner.min.y),
            Pos2::new(inner.min.x, inner.max.y),
        ),
        Rect::from_min_max(
            Pos2::new(inner.max.x, inner.min.y),
            Pos2::new(outer.max.x, inner.max.y),
        ),
    ]
}
