//! RImagen — a Rust client for the Hugging Face Inference API.
//!
//! The library wraps the hosted text-to-image endpoints behind an explicit
//! result type: every dispatch returns a [`GenerationOutcome`] carrying a
//! human-readable message and, on success, the decoded bitmap plus the path
//! of the PNG it was saved under.

pub mod catalog;
pub mod config;
pub mod error;
pub mod hf;
pub mod history;
pub mod logger;
pub mod models;

pub use catalog::{all_models, display_name, example_prompts, model_id_for, model_info, ModelCatalogEntry};
pub use config::{validate_api_token, HfConfig};
pub use error::{HfError, Result};
pub use hf::{HfClient, HttpBackend, ImageClient, InferenceBackend};
pub use history::{GenerationHistory, HistoryEntry};
pub use models::{GenerationOutcome, ImageGenerationRequest};
