use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// One row of the static model table. Defined at process start, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelCatalogEntry {
    pub model_id: String,
    pub display_name: String,
    pub license: String,
    pub status: String,
    pub description: String,
}

impl ModelCatalogEntry {
    fn new(
        model_id: &str,
        display_name: &str,
        license: &str,
        status: &str,
        description: &str,
    ) -> Self {
        ModelCatalogEntry {
            model_id: model_id.to_string(),
            display_name: display_name.to_string(),
            license: license.to_string(),
            status: status.to_string(),
            description: description.to_string(),
        }
    }
}

static CATALOG: Lazy<Vec<ModelCatalogEntry>> = Lazy::new(|| {
    vec![
        ModelCatalogEntry::new(
            "black-forest-labs/FLUX.1-schnell",
            "FLUX.1-schnell",
            "Apache 2.0",
            "✅ Fully Free",
            "Fast generation with high quality",
        ),
        ModelCatalogEntry::new(
            "runwayml/stable-diffusion-v1-5",
            "Stable Diffusion v1.5",
            "CreativeML Open RAIL-M",
            "✅ Generally Free",
            "Most tested and reliable model",
        ),
        ModelCatalogEntry::new(
            "stabilityai/stable-diffusion-2-1",
            "Stable Diffusion v2.1",
            "CreativeML Open RAIL-M",
            "✅ Generally Free",
            "Enhanced version with better prompt understanding",
        ),
        ModelCatalogEntry::new(
            "CompVis/stable-diffusion-v1-4",
            "Stable Diffusion v1.4",
            "CreativeML Open RAIL-M",
            "✅ Generally Free",
            "Original stable diffusion model",
        ),
        ModelCatalogEntry::new(
            "prompthero/openjourney-v4",
            "OpenJourney v4",
            "CreativeML Open RAIL-M",
            "✅ Free for most uses",
            "Great for artistic and stylized images",
        ),
        ModelCatalogEntry::new(
            "black-forest-labs/FLUX.1-dev",
            "FLUX.1-dev",
            "Non-commercial",
            "⚠️ Personal Use Only",
            "Premium quality, slower generation",
        ),
    ]
});

/// All catalog entries in table order (UI dropdown source).
pub fn all_models() -> &'static [ModelCatalogEntry] {
    &CATALOG
}

/// Total lookup: unknown identifiers yield a placeholder entry, never an error.
pub fn model_info(model_id: &str) -> ModelCatalogEntry {
    CATALOG
        .iter()
        .find(|entry| entry.model_id == model_id)
        .cloned()
        .unwrap_or_else(|| {
            ModelCatalogEntry::new(
                model_id,
                model_id,
                "Unknown",
                "❓ Check model page",
                "No information available",
            )
        })
}

/// Display name for a model identifier, falling back to the identifier itself.
pub fn display_name(model_id: &str) -> String {
    CATALOG
        .iter()
        .find(|entry| entry.model_id == model_id)
        .map(|entry| entry.display_name.clone())
        .unwrap_or_else(|| model_id.to_string())
}

/// Identifier for a known display name.
pub fn model_id_for(display_name: &str) -> Option<String> {
    CATALOG
        .iter()
        .find(|entry| entry.display_name == display_name)
        .map(|entry| entry.model_id.clone())
}

/// Starter prompts for inspiration.
pub fn example_prompts() -> Vec<&'static str> {
    vec![
        "a red sports car on a mountain road at sunset",
        "a cute robot reading a book in a cozy library",
        "a magical forest with glowing mushrooms and fireflies",
        "a cyberpunk city street with neon lights at night",
        "a peaceful zen garden with koi pond and cherry blossoms",
        "a space astronaut floating among colorful nebulae",
        "a steampunk airship flying over Victorian London",
        "a dragon perched on a castle tower during a thunderstorm",
    ]
}
