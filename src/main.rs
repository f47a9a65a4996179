use photo_detect_overlay::annotations::image_ref::ImageRef;
use photo_detect_overlay::config::Config;
use photo_detect_overlay::error::DetectionFailure;
use photo_detect_overlay::image_utils::image_io::read_image_as_rgb8;
use photo_detect_overlay::image_utils::overlay::render_overlay;
use photo_detect_overlay::object_detection::client::DetectionClient;
use photo_detect_overlay::presentation::session::{DetectionSession, RunOutcome};
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photo_detect_overlay=info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let image_path = PathBuf::from(
        args.next()
            .ok_or("usage: photo-detect-overlay <image> [recorded-responses.json]")?,
    );
    let config = Config::from_env()?;
    info!(
        viewport_width = config.viewport.width(),
        viewport_height = config.viewport.height(),
        "configuration loaded"
    );

    let client = build_client(&config, args.next().map(PathBuf::from))?;
    let session = DetectionSession::new(client, config.viewport);
    let image = ImageRef::from_path(&image_path)?;

    match session.run(image).await {
        RunOutcome::Displayed(state) => {
            info!("Latency: {}s", state.latency_seconds);
            for (i, rect) in state.detections.iter().enumerate() {
                info!(
                    "box {i}: top={} left={} width={} height={}",
                    rect.top, rect.left, rect.width, rect.height
                );
            }
            let source = read_image_as_rgb8(&image_path)?;
            if let Some(overlay) = render_overlay(&source, &state) {
                overlay.save(&config.overlay_output)?;
                info!("Overlay written to {}", config.overlay_output.display());
            }
        }
        RunOutcome::NoDetection(failure) => {
            warn!(reason = %failure.reason, "{}", DetectionFailure::USER_MESSAGE);
        }
        RunOutcome::Superseded => {}
    }
    Ok(())
}

#[cfg(feature = "onnx")]
fn build_client(
    config: &Config,
    _recorded: Option<PathBuf>,
) -> Result<DetectionClient, Box<dyn Error>> {
    use photo_detect_overlay::object_detection::object_detection_utils::read_classes_txt_file;
    use photo_detect_overlay::object_detection::yolov11_bounding_box::Yolov11BoundingBox;

    check_exists(&config.model_path)?;
    check_exists(&config.classes_path)?;
    let model = Yolov11BoundingBox::new(
        &config.model_path,
        read_classes_txt_file(&config.classes_path)?,
        640,
        640,
        config.label_policy,
        config.nms_iou_threshold,
    )?;
    Ok(DetectionClient::new(model))
}

#[cfg(not(feature = "onnx"))]
fn build_client(
    _config: &Config,
    recorded: Option<PathBuf>,
) -> Result<DetectionClient, Box<dyn Error>> {
    use photo_detect_overlay::object_detection::recorded::RecordedDetector;

    let recorded = recorded.ok_or("built without `onnx`: pass recorded detector responses")?;
    check_exists(&recorded)?;
    Ok(DetectionClient::new(RecordedDetector::from_path(&recorded)?))
}

fn check_exists(path: &Path) -> Result<(), Box<dyn Error>> {
    if !path.exists() {
        return Err(format!("Path does not exist, or cannot be read: {:?}", path).into());
    }
    Ok(())
}
