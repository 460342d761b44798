use std::path::PathBuf;

use egui::Vec2;
use futures::channel::oneshot;
use image::RgbaImage;

use crate::error::SnipError;

/// The base image as it is displayed inside the host.
#[derive(Clone)]
pub struct SourceImage {
    pixels: RgbaImage,
    display_size: Vec2,
}

impl std::fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceImage")
            .field("natural", &self.natural_size())
            .field("display_size", &self.display_size)
            .finish()
    }
}

impl SourceImage {
    pub fn new(pixels: RgbaImage, display_size: Vec2) -> Self {
        Self {
            pixels,
            display_size,
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Intrinsic pixel size.
    pub fn natural_size(&self) -> [u32; 2] {
        [self.pixels.width(), self.pixels.height()]
    }

    pub fn display_size(&self) -> Vec2 {
        self.display_size
    }

    /// Natural pixels per displayed pixel, per axis.
    pub fn scale(&self) -> Vec2 {
        let [w, h] = self.natural_size();
        Vec2::new(
            w as f32 / self.display_size.x.max(f32::EPSILON),
            h as f32 / self.display_size.y.max(f32::EPSILON),
        )
    }

    pub fn to_color_image(&self) -> egui::ColorImage {
        let [w, h] = self.natural_size();
        egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], self.pixels.as_raw())
    }
}

/// Where the base image comes from.
pub enum ImageSource {
    /// Already decoded pixels.
    Pixels(RgbaImage),
    /// Encoded PNG/JPEG bytes.
    Encoded(Vec<u8>),
    /// A file on disk.
    Path(PathBuf),
    /// Pixels the host will deliver later.
    Deferred(oneshot::Receiver<Result<RgbaImage, SnipError>>),
}

impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageSource::Pixels(pixels) => f
                .debug_tuple("Pixels")
                .field(&(pixels.width(), pixels.height()))
                .finish(),
            ImageSource::Encoded(bytes) => f.debug_tuple("Encoded").field(&bytes.len()).finish(),
            ImageSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            ImageSource::Deferred(_) => f.write_str("Deferred"),
        }
    }
}

impl ImageSource {
    /// Fails for sources that cannot possibly produce an image.
    pub fn validate(&self) -> Result<(), SnipError> {
        match self {
            ImageSource::Pixels(pixels) if pixels.width() == 0 || pixels.height() == 0 => {
                Err(SnipError::EmptyImage)
            }
            ImageSource::Encoded(bytes) if bytes.is_empty() => Err(SnipError::MissingImage),
            ImageSource::Path(path) if path.as_os_str().is_empty() => Err(SnipError::MissingImage),
            _ => Ok(()),
        }
    }

    /// Starts loading; already decoded pixels come back immediately.
    pub fn load(self) -> ImageLoad {
        match self {
            ImageSource::Pixels(pixels) => ImageLoad::Loaded(Some(pixels)),
            ImageSource::Deferred(receiver) => ImageLoad::Waiting(receiver),
            ImageSource::Encoded(bytes) => ImageLoad::spawn(move || decode(&bytes)),
            ImageSource::Path(path) => ImageLoad::spawn(move || {
                let bytes = std::fs::read(&path)?;
                decode(&bytes)
            }),
        }
    }
}

fn decode(bytes: &[u8]) -> Result<RgbaImage, SnipError> {
    let pixels = non_empty(image::load_from_memory(bytes)?.to_rgba8())?;
    log::debug!("decoded image {}x{}", pixels.width(), pixels.height());
    Ok(pixels)
}

fn non_empty(pixels: RgbaImage) -> Result<RgbaImage, SnipError> {
    if pixels.width() == 0 || pixels.height() == 0 {
        return Err(SnipError::EmptyImage);
    }
    Ok(pixels)
}

/// An image that may still be loading.
#[derive(Debug)]
pub enum ImageLoad {
    Loaded(Option<RgbaImage>),
    Waiting(oneshot::Receiver<Result<RgbaImage, SnipError>>),
}

impl ImageLoad {
    fn spawn<F>(job: F) -> Self
    where
        F: FnOnce() -> Result<RgbaImage, SnipError> + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();

        #[cfg(not(target_arch = "wasm32"))]
        std::thread::spawn(move || {
            let _ = sender.send(job());
        });

        #[cfg(target_arch = "wasm32")]
        {
            let _ = sender.send(job());
        }

        ImageLoad::Waiting(receiver)
    }

    /// `None` while loading; the result is handed out exactly once.
    pub fn poll(&mut self) -> Option<Result<RgbaImage, SnipError>> {
        match self {
            ImageLoad::Loaded(pixels) => pixels.take().map(Ok),
            ImageLoad::Waiting(receiver) => match receiver.try_recv() {
                Ok(Some(result)) => Some(result.and_then(non_empty)),
                Ok(None) => None,
                Err(oneshot::Canceled) => Some(Err(SnipError::LoadCancelled)),
            },
        }
    }
}
