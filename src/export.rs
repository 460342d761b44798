use std::io::Cursor;
use std::path::PathBuf;

use base64::Engine as _;
use futures::channel::oneshot;
use image::{ImageFormat, RgbaImage};

use crate::error::ExportError;

/// An encoded PNG of the edited region.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl std::fmt::Debug for ImageBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBlob")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.png.len())
            .finish()
    }
}

impl ImageBlob {
    pub fn encode(image: &RgbaImage) -> Result<Self, image::ImageError> {
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(Self {
            width: image.width(),
            height: image.height(),
            png,
        })
    }

    pub fn decode(&self) -> Result<RgbaImage, image::ImageError> {
        Ok(image::load_from_memory_with_format(&self.png, ImageFormat::Png)?.to_rgba8())
    }

    pub fn to_data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png)
        )
    }
}

/// Where a confirmed export goes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    /// Clipboard, falling back to a file when the clipboard is unavailable.
    Clipboard,
    File,
}

/// A destination for the exported image.
pub trait ExportSink {
    fn name(&self) -> &'static str;

    fn deliver(&mut self, image: &RgbaImage, blob: &ImageBlob) -> Result<(), ExportError>;
}

/// Tries `primary`, then `fallback`; reports which sink took the image.
pub fn deliver_with_fallback(
    primary: &mut dyn ExportSink,
    fallback: &mut dyn ExportSink,
    image: &RgbaImage,
    blob: &ImageBlob,
) -> Result<&'static str, ExportError> {
    match primary.deliver(image, blob) {
        Ok(()) => Ok(primary.name()),
        Err(err) => {
            log::warn!(
                "{} export failed ({err}), falling back to {}",
                primary.name(),
                fallback.name()
            );
            fallback.deliver(image, blob)?;
            Ok(fallback.name())
        }
    }
}

/// Writes the image to the system clipboard.
#[derive(Debug, Default)]
pub struct ClipboardSink;

#[cfg(not(target_arch = "wasm32"))]
impl ExportSink for ClipboardSink {
    fn name(&self) -> &'static str {
        "clipboard"
    }

    fn deliver(&mut self, image: &RgbaImage, _blob: &ImageBlob) -> Result<(), ExportError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|err| ExportError::Clipboard(err.to_string()))?;
        let data = arboard::ImageData {
            width: image.width() as usize,
            height: image.height() as usize,
            bytes: std::borrow::Cow::Borrowed(image.as_raw()),
        };
        clipboard
            .set_image(data)
            .map_err(|err| ExportError::Clipboard(err.to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl ExportSink for ClipboardSink {
    fn name(&self) -> &'static str {
        "clipboard"
    }

    fn deliver(&mut self, _image: &RgbaImage, _blob: &ImageBlob) -> Result<(), ExportError> {
        Err(ExportError::Unsupported("image clipboard"))
    }
}

/// Saves the PNG to disk (native) or as a browser download (web).
#[derive(Debug, Clone, Default)]
pub struct FileSink {
    pub dir: Option<PathBuf>,
}

impl FileSink {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    pub fn file_name() -> String {
        format!("screenshot-{}.png", timestamp_secs())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ExportSink for FileSink {
    fn name(&self) -> &'static str {
        "file"
    }

    fn deliver(&mut self, _image: &RgbaImage, blob: &ImageBlob) -> Result<(), ExportError> {
        let dir = self.dir.clone().unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(Self::file_name());
        std::fs::write(&path, &blob.png)?;
        log::info!("saved screenshot to {}", path.display());
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
impl ExportSink for FileSink {
    fn name(&self) -> &'static str {
        "download"
    }

    fn deliver(&mut self, _image: &RgbaImage, blob: &ImageBlob) -> Result<(), ExportError> {
        use eframe::wasm_bindgen::JsCast as _;

        let failed = |_| ExportError::Unsupported("browser download");

        let bytes = js_sys::Uint8Array::from(blob.png.as_slice());
        let parts = js_sys::Array::of1(&bytes);
        let options = web_sys::BlobPropertyBag::new();
        options.set_type("image/png");
        let js_blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(failed)?;
        let url = web_sys::Url::create_object_url_with_blob(&js_blob).map_err(failed)?;

        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or(ExportError::Unsupported("browser download"))?;
        let anchor = document
            .create_element("a")
            .map_err(failed)?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|_| ExportError::Unsupported("browser download"))?;
        anchor.set_href(&url);
        anchor.set_download(&Self::file_name());
        anchor.click();
        web_sys::Url::revoke_object_url(&url).map_err(failed)?;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn timestamp_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(target_arch = "wasm32")]
fn timestamp_secs() -> u64 {
    (js_sys::Date::now() / 1000.0) as u64
}

/// Encodes and delivers `image`, returning the blob that was delivered.
pub fn run_export(
    image: &RgbaImage,
    target: ExportTarget,
    save_dir: Option<PathBuf>,
) -> Result<ImageBlob, ExportError> {
    let blob = ImageBlob::encode(image)?;
    let mut file = FileSink::new(save_dir);
    let delivered_to = match target {
        ExportTarget::Clipboard => {
            deliver_with_fallback(&mut ClipboardSink, &mut file, image, &blob)?
        }
        ExportTarget::File => {
            file.deliver(image, &blob)?;
            file.name()
        }
    };
    log::info!(
        "exported {}x{} screenshot to {delivered_to}",
        blob.width,
        blob.height
    );
    Ok(blob)
}

/// An export running off the UI thread; poll it once per frame.
#[derive(Debug)]
pub struct ExportJob {
    receiver: oneshot::Receiver<Result<ImageBlob, ExportError>>,
}

impl ExportJob {
    pub fn spawn(image: RgbaImage, target: ExportTarget, save_dir: Option<PathBuf>) -> Self {
        let (sender, receiver) = oneshot::channel();

        #[cfg(not(target_arch = "wasm32"))]
        std::thread::spawn(move || {
            let _ = sender.send(run_export(&image, target, save_dir));
        });

        #[cfg(target_arch = "wasm32")]
        {
            let _ = sender.send(run_export(&image, target, save_dir));
        }

        Self { receiver }
    }

    /// `None` while still running.
    pub fn poll(&mut self) -> Option<Result<ImageBlob, ExportError>> {
        match self.receiver.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(ExportError::Cancelled)),
        }
    }
}
