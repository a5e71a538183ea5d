use crate::error::{HfError, Result};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Dimensions accepted by the hosted diffusion endpoints.
pub const ALLOWED_DIMENSIONS: [u32; 4] = [512, 640, 768, 1024];

pub const MAX_STEPS: u32 = 150;
pub const MAX_GUIDANCE_SCALE: f32 = 30.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub steps: u32,
    pub guidance_scale: f32,
    pub width: u32,
    pub height: u32,
    /// Absent means the backend chooses randomly.
    pub seed: Option<u64>,
    /// Present switches the request to image-to-image mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_image: Option<Vec<u8>>,
    pub model_id: String,
}

impl ImageGenerationRequest {
    pub fn new(prompt: impl Into<String>, model_id: impl Into<String>) -> Self {
        ImageGenerationRequest {
            prompt: prompt.into(),
            negative_prompt: None,
            steps: 28,
            guidance_scale: 7.5,
            width: 512,
            height: 512,
            seed: None,
            source_image: None,
            model_id: model_id.into(),
        }
    }

    pub fn is_image_to_image(&self) -> bool {
        self.source_image.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(HfError::RequestError("Prompt must not be empty".into()));
        }
        if self.steps == 0 || self.steps > MAX_STEPS {
            return Err(HfError::RequestError(format!(
                "Step count {} outside allowed range 1..={}",
                self.steps, MAX_STEPS
            )));
        }
        if !(self.guidance_scale > 0.0 && self.guidance_scale <= MAX_GUIDANCE_SCALE) {
            return Err(HfError::RequestError(format!(
                "Guidance scale {} outside allowed range (0, {}]",
                self.guidance_scale, MAX_GUIDANCE_SCALE
            )));
        }
        if !ALLOWED_DIMENSIONS.contains(&self.width) {
            return Err(HfError::RequestError(format!(
                "Width {} not one of {:?}",
                self.width, ALLOWED_DIMENSIONS
            )));
        }
        if !ALLOWED_DIMENSIONS.contains(&self.height) {
            return Err(HfError::RequestError(format!(
                "Height {} not one of {:?}",
                self.height, ALLOWED_DIMENSIONS
            )));
        }
        Ok(())
    }
}

/// Outcome of one dispatch. Constructed once, never mutated; the dispatcher
/// hands ownership straight to the caller.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub success: bool,
    pub message: String,
    pub image: Option<DynamicImage>,
    pub file_path: Option<PathBuf>,
}

impl GenerationOutcome {
    pub fn succeeded(message: String, image: DynamicImage, file_path: PathBuf) -> Self {
        GenerationOutcome {
            success: true,
            message,
            image: Some(image),
            file_path: Some(file_path),
        }
    }

    pub fn failed(error: &HfError) -> Self {
        GenerationOutcome {
            success: false,
            message: format!("❌ Generation failed: {}", error),
            image: None,
            file_path: None,
        }
    }
}
