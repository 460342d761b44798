use eframe_snip::error::ExportError;
use eframe_snip::export::{
    ExportJob, ExportSink, ExportTarget, FileSink, ImageBlob, deliver_with_fallback, run_export,
};
use image::{Rgba, RgbaImage};

struct MockSink {
    name: &'static str,
    fail: bool,
    delivered: usize,
}

impl MockSink {
    fn new(name: &'static str, fail: bool) -> Self {
        Self {
            name,
            fail,
            delivered: 0,
        }
    }
}

impl ExportSink for MockSink {
    fn name(&self) -> &'static str {
        self.name
    }

    fn deliver(&mut self, _image: &RgbaImage, _blob: &ImageBlob) -> Result<(), ExportError> {
        if self.fail {
            return Err(ExportError::Unsupported("mock"));
        }
        self.delivered += 1;
        Ok(())
    }
}

fn sample() -> RgbaImage {
    RgbaImage::from_pixel(6, 4, Rgba([10, 20, 30, 255]))
}

fn temp_dir() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("eframe-snip-test-{}", uuid::Uuid::new_v4()))
}

#[test]
fn test_blob_encodes_png() {
    let blob = ImageBlob::encode(&sample()).unwrap();
    assert_eq!((blob.width, blob.height), (6, 4));
    assert_eq!(&blob.png[1..4], b"PNG");
    assert_eq!(blob.decode().unwrap(), sample());
    assert!(blob.to_data_url().starts_with("data:image/png;base64,iVBOR"));
}

#[test]
fn test_primary_sink_wins() {
    let blob = ImageBlob::encode(&sample()).unwrap();
    let mut clipboard = MockSink::new("clipboard", false);
    let mut file = MockSink::new("file", false);

    let used = deliver_with_fallback(&mut clipboard, &mut file, &sample(), &blob).unwrap();
    assert_eq!(used, "clipboard");
    assert_eq!((clipboard.delivered, file.delivered), (1, 0));
}

#[test]
fn test_failed_clipboard_falls_back() {
    let blob = ImageBlob::encode(&sample()).unwrap();
    let mut clipboard = MockSink::new("clipboard", true);
    let mut file = MockSink::new("file", false);

    let used = deliver_with_fallback(&mut clipboard, &mut file, &sample(), &blob).unwrap();
    assert_eq!(used, "file");
    assert_eq!(file.delivered, 1);
}

#[test]
fn test_both_sinks_failing_is_an_error() {
    let blob = ImageBlob::encode(&sample()).unwrap();
    let mut clipboard = MockSink::new("clipboard", true);
    let mut file = MockSink::new("file", true);

    let result = deliver_with_fallback(&mut clipboard, &mut file, &sample(), &blob);
    assert!(matches!(result, Err(ExportError::Unsupported(_))));
}

#[test]
fn test_file_export_writes_png() {
    let dir = temp_dir();
    let blob = run_export(&sample(), ExportTarget::File, Some(dir.clone())).unwrap();

    let written: Vec<_> = std::fs::read_dir(&dir).unwrap().flatten().collect();
    assert_eq!(written.len(), 1);
    let name = written[0].file_name().into_string().unwrap();
    assert!(name.starts_with("screenshot-") && name.ends_with(".png"));
    assert_eq!(std::fs::read(written[0].path()).unwrap(), blob.png);

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_file_name_pattern() {
    let name = FileSink::file_name();
    let secs = name
        .strip_prefix("screenshot-")
        .and_then(|rest| rest.strip_suffix(".png"))
        .unwrap();
    assert!(secs.parse::<u64>().is_ok());
}

#[test]
fn test_export_job_completes() {
    let dir = temp_dir();
    let mut job = ExportJob::spawn(sample(), ExportTarget::File, Some(dir.clone()));

    let mut result = None;
    for _ in 0..500 {
        result = job.poll();
        if result.is_some() {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(10));
    }
    let blob = result.expect("export did not finish").unwrap();
    assert_eq!((blob.width, blob.height), (6, 4));

    std::fs::remove_dir_all(dir).ok();
}
