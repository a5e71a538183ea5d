use crate::{
    config::{validate_api_token, HfConfig},
    error::{HfError, Result},
    hf::backend::InferenceBackend,
    models::{GenerationOutcome, ImageGenerationRequest},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Local;
use image::DynamicImage;
use serde_json::json;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Denoising strength applied to every image-to-image request.
const IMG2IMG_STRENGTH: f32 = 0.7;

/// Length of the prompt prefix carried into the filename.
const FILENAME_PROMPT_CHARS: usize = 20;

#[derive(Clone)]
pub struct ImageClient {
    backend: Arc<dyn InferenceBackend>,
    api_token: Option<String>,
    output_dir: PathBuf,
}

impl ImageClient {
    pub fn new(backend: Arc<dyn InferenceBackend>, config: &HfConfig) -> Self {
        ImageClient {
            backend,
            api_token: config.api_token.clone(),
            output_dir: config.output_dir(),
        }
    }

    /// Dispatch one generation request. This is the error boundary: every
    /// failure mode comes back as a failure outcome, nothing is raised.
    pub async fn generate(&self, request: ImageGenerationRequest) -> GenerationOutcome {
        match self.try_generate(&request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Image generation failed: {}", e);
                GenerationOutcome::failed(&e)
            }
        }
    }

    async fn try_generate(&self, request: &ImageGenerationRequest) -> Result<GenerationOutcome> {
        if !validate_api_token(self.api_token.as_deref()) {
            return Err(HfError::ConfigError(
                "Hugging Face API token is missing or blank".into(),
            ));
        }
        // Checked above, token is present.
        let api_token = self.api_token.as_deref().unwrap_or_default();

        request.validate()?;

        let payload = if request.is_image_to_image() {
            Self::image_to_image_payload(request)?
        } else {
            Self::text_to_image_payload(request)
        };

        log::info!("Generating image with model: {}", request.model_id);

        let bytes = self
            .backend
            .invoke(&request.model_id, api_token, payload)
            .await?;

        let image = image::load_from_memory(&bytes)
            .map_err(|e| HfError::ImageError(format!("Undecodable response bitmap: {}", e)))?;

        let filename = build_filename(&request.prompt);
        let file_path = self.save_image(&image, &filename)?;

        let saved_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or(filename);

        let message = format!(
            "✅ Image generated successfully!\n📁 Saved as: {}\n📏 Size: {}x{}",
            saved_name,
            image.width(),
            image.height()
        );

        Ok(GenerationOutcome::succeeded(message, image, file_path))
    }

    fn text_to_image_payload(request: &ImageGenerationRequest) -> serde_json::Value {
        let mut parameters = json!({
            "guidance_scale": request.guidance_scale,
            "num_inference_steps": request.steps,
            "width": request.width,
            "height": request.height,
        });
        if let Some(ref negative) = request.negative_prompt {
            parameters["negative_prompt"] = json!(negative);
        }
        if let Some(seed) = request.seed {
            parameters["seed"] = json!(seed);
        }

        json!({
            "inputs": request.prompt,
            "parameters": parameters,
        })
    }

    fn image_to_image_payload(request: &ImageGenerationRequest) -> Result<serde_json::Value> {
        let source_bytes = request
            .source_image
            .as_deref()
            .ok_or_else(|| HfError::RequestError("Missing source image".into()))?;

        let source = image::load_from_memory(source_bytes)
            .map_err(|e| HfError::ImageError(format!("Undecodable source image: {}", e)))?;

        // Normalize to RGB8 before re-encoding for the wire.
        let normalized = DynamicImage::ImageRgb8(source.to_rgb8());
        let mut encoded = Cursor::new(Vec::new());
        normalized
            .write_to(&mut encoded, image::ImageFormat::Png)
            .map_err(|e| HfError::ImageError(format!("Source image re-encode failed: {}", e)))?;

        let mut parameters = json!({
            "prompt": request.prompt,
            "guidance_scale": request.guidance_scale,
            "num_inference_steps": request.steps,
            "strength": IMG2IMG_STRENGTH,
        });
        if let Some(ref negative) = request.negative_prompt {
            parameters["negative_prompt"] = json!(negative);
        }
        if let Some(seed) = request.seed {
            parameters["seed"] = json!(seed);
        }

        Ok(json!({
            "inputs": BASE64.encode(encoded.into_inner()),
            "parameters": parameters,
        }))
    }

    /// Write the bitmap before the outcome is constructed; a success outcome
    /// always references a file that exists.
    fn save_image(&self, image: &DynamicImage, filename: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            HfError::IoError(format!(
                "Could not create output directory {}: {}",
                self.output_dir.display(),
                e
            ))
        })?;

        let mut file_path = self.output_dir.join(filename);
        if file_path.exists() {
            // Same-second generation with the same prompt prefix; never
            // silently overwrite.
            let tag = Uuid::new_v4().simple().to_string();
            let stem = filename.trim_end_matches(".png");
            file_path = self.output_dir.join(format!("{}-{}.png", stem, &tag[..6]));
        }

        image
            .save(&file_path)
            .map_err(|e| HfError::IoError(format!("Could not write {}: {}", file_path.display(), e)))?;

        log::info!("Saved image to {}", file_path.display());
        Ok(file_path)
    }
}

/// `img_{YYYYMMDD_HHMMSS}_{sanitized-prompt-prefix}.png`, sortable lexically
/// by generation time.
fn build_filename(prompt: &str) -> String {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    format!("img_{}_{}.png", timestamp, sanitize_prompt(prompt))
}

/// First 20 characters of the prompt, restricted to alphanumerics, spaces,
/// hyphens and underscores, trimmed, spaces mapped to underscores.
fn sanitize_prompt(prompt: &str) -> String {
    prompt
        .chars()
        .take(FILENAME_PROMPT_CHARS)
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim()
        .replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hf::backend::InferenceBackend;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubBackend {
        calls: AtomicUsize,
        response: std::result::Result<Vec<u8>, String>,
    }

    impl StubBackend {
        fn returning_png(width: u32, height: u32) -> Self {
            StubBackend {
                calls: AtomicUsize::new(0),
                response: Ok(png_bytes(width, height)),
            }
        }

        fn failing(message: &str) -> Self {
            StubBackend {
                calls: AtomicUsize::new(0),
                response: Err(message.to_string()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl InferenceBackend for StubBackend {
        async fn invoke(
            &self,
            _model_id: &str,
            _api_token: &str,
            _payload: serde_json::Value,
        ) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(bytes) => Ok(bytes.clone()),
                Err(message) => Err(HfError::BackendError(message.clone())),
            }
        }
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
        let mut cursor = Cursor::new(Vec::new());
        img.write_to(&mut cursor, image::ImageFormat::Png).unwrap();
        cursor.into_inner()
    }

    fn temp_output_dir() -> PathBuf {
        std::env::temp_dir().join(format!("rimagen-test-{}", Uuid::new_v4().simple()))
    }

    fn client_with(
        backend: Arc<StubBackend>,
        token: Option<&str>,
        output_dir: &PathBuf,
    ) -> ImageClient {
        let mut config = HfConfig::new().with_output_dir(output_dir.clone());
        if let Some(token) = token {
            config = config.with_token(token);
        }
        ImageClient::new(backend, &config)
    }

    #[test]
    fn test_sanitize_prompt() {
        assert_eq!(sanitize_prompt("a dog! #1 @home"), "a_dog_1_home");
        assert_eq!(sanitize_prompt("a red car"), "a_red_car");
        assert_eq!(
            sanitize_prompt("a very long prompt that keeps going"),
            "a_very_long_prompt_t"
        );
        assert_eq!(sanitize_prompt("!!!"), "");
    }

    #[test]
    fn test_filename_shape() {
        let filename = build_filename("a red car");
        assert!(filename.starts_with("img_"));
        assert!(filename.ends_with("_a_red_car.png"));
        // img_ + YYYYMMDD_HHMMSS
        assert_eq!(filename.len(), "img_YYYYMMDD_HHMMSS_a_red_car.png".len());
    }

    #[tokio::test]
    async fn test_blank_token_fails_without_backend_call() {
        let backend = Arc::new(StubBackend::returning_png(512, 512));
        let dir = temp_output_dir();
        let client = client_with(backend.clone(), Some(""), &dir);

        let outcome = client
            .generate(ImageGenerationRequest::new("a red car", "id-A"))
            .await;

        assert!(!outcome.success);
        assert!(outcome.image.is_none());
        assert!(outcome.file_path.is_none());
        assert_eq!(backend.call_count(), 0);
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_missing_token_fails_without_backend_call() {
        let backend = Arc::new(StubBackend::returning_png(512, 512));
        let dir = temp_output_dir();
        let client = client_with(backend.clone(), None, &dir);

        let outcome = client
            .generate(ImageGenerationRequest::new("a red car", "id-A"))
            .await;

        assert!(!outcome.success);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_request_fails_without_backend_call() {
        let backend = Arc::new(StubBackend::returning_png(512, 512));
        let dir = temp_output_dir();
        let client = client_with(backend.clone(), Some("hf_valid"), &dir);

        let mut request = ImageGenerationRequest::new("a red car", "id-A");
        request.width = 256;
        let outcome = client.generate(request).await;

        assert!(!outcome.success);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_successful_text_to_image_dispatch() {
        let backend = Arc::new(StubBackend::returning_png(512, 512));
        let dir = temp_output_dir();
        let client = client_with(backend.clone(), Some("hf_valid"), &dir);

        let outcome = client
            .generate(ImageGenerationRequest::new("a red car", "id-A"))
            .await;

        assert!(outcome.success, "{}", outcome.message);
        assert!(outcome.message.contains("512x512"));
        assert_eq!(backend.call_count(), 1);

        let path = outcome.file_path.expect("success carries a path");
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("img_"));
        assert!(name.ends_with("_a_red_car.png"));

        // The saved bytes decode back to the returned bitmap.
        let reloaded = image::open(&path).unwrap();
        let returned = outcome.image.expect("success carries the bitmap");
        assert_eq!((reloaded.width(), reloaded.height()), (returned.width(), returned.height()));
        assert_eq!(reloaded.to_rgb8().into_raw(), returned.to_rgb8().into_raw());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_backend_error_surfaces_in_message() {
        let backend = Arc::new(StubBackend::failing("503: model is loading"));
        let dir = temp_output_dir();
        let client = client_with(backend.clone(), Some("hf_valid"), &dir);

        let outcome = client
            .generate(ImageGenerationRequest::new("a red car", "id-A"))
            .await;

        assert!(!outcome.success);
        assert!(outcome.message.contains("model is loading"));
        assert!(outcome.file_path.is_none());
    }

    #[tokio::test]
    async fn test_malformed_source_image_fails_before_backend() {
        let backend = Arc::new(StubBackend::returning_png(512, 512));
        let dir = temp_output_dir();
        let client = client_with(backend.clone(), Some("hf_valid"), &dir);

        let mut request = ImageGenerationRequest::new("restyle this", "id-A");
        request.source_image = Some(vec![0xde, 0xad, 0xbe, 0xef]);
        let outcome = client.generate(request).await;

        assert!(!outcome.success);
        assert!(outcome.message.contains("source image"));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_image_to_image_dispatch() {
        let backend = Arc::new(StubBackend::returning_png(768, 512));
        let dir = temp_output_dir();
        let client = client_with(backend.clone(), Some("hf_valid"), &dir);

        let mut request = ImageGenerationRequest::new("restyle this", "id-A");
        request.source_image = Some(png_bytes(64, 64));
        let outcome = client.generate(request).await;

        assert!(outcome.success, "{}", outcome.message);
        assert!(outcome.message.contains("768x512"));
        assert_eq!(backend.call_count(), 1);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_colliding_filename_gets_unique_suffix() {
        let backend = Arc::new(StubBackend::returning_png(16, 16));
        let dir = temp_output_dir();
        let client = client_with(backend, Some("hf_valid"), &dir);
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(16, 16));

        let filename = "img_20250101_120000_a_red_car.png";
        let first = client.save_image(&img, filename).unwrap();
        let second = client.save_image(&img, filename).unwrap();

        assert_eq!(first, dir.join(filename));
        assert_ne!(second, first);
        assert!(first.exists());
        assert!(second.exists());

        let name = second.file_name().unwrap().to_string_lossy().into_owned();
        let tag = name
            .trim_start_matches("img_20250101_120000_a_red_car-")
            .trim_end_matches(".png");
        assert_eq!(tag.len(), 6);
        assert!(tag.chars().all(|c| c.is_ascii_hexdigit()));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_repeat_dispatch_never_overwrites() {
        let backend = Arc::new(StubBackend::returning_png(512, 512));
        let dir = temp_output_dir();
        let client = client_with(backend, Some("hf_valid"), &dir);

        let first = client
            .generate(ImageGenerationRequest::new("a red car", "id-A"))
            .await;
        let second = client
            .generate(ImageGenerationRequest::new("a red car", "id-A"))
            .await;

        assert!(first.success && second.success);
        assert_ne!(first.file_path, second.file_path);
        let files = std::fs::read_dir(&dir).unwrap().count();
        assert_eq!(files, 2);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_text_to_image_payload_shape() {
        let mut request = ImageGenerationRequest::new("a red car", "id-A");
        request.negative_prompt = Some("blurry".into());
        request.seed = Some(42);
        let payload = ImageClient::text_to_image_payload(&request);

        assert_eq!(payload["inputs"], "a red car");
        assert_eq!(payload["parameters"]["num_inference_steps"], 28);
        assert_eq!(payload["parameters"]["negative_prompt"], "blurry");
        assert_eq!(payload["parameters"]["seed"], 42);
        assert_eq!(payload["parameters"]["width"], 512);
    }

    #[test]
    fn test_image_to_image_payload_shape() {
        let mut request = ImageGenerationRequest::new("restyle this", "id-A");
        request.source_image = Some(png_bytes(32, 32));
        let payload = ImageClient::image_to_image_payload(&request).unwrap();

        assert!(payload["inputs"].is_string());
        assert_eq!(payload["parameters"]["prompt"], "restyle this");
        let strength = payload["parameters"]["strength"].as_f64().unwrap();
        assert!((strength - 0.7).abs() < 1e-6);
        // Dimensions are not sent in image-to-image mode.
        assert!(payload["parameters"].get("width").is_none());
    }
}
