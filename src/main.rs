use rimagen::{
    catalog, logger, GenerationHistory, HfClient, HfConfig, ImageGenerationRequest,
};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file first
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded successfully"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    logger::init_with_config(
        logger::LoggerConfig::development().with_level(logger::LogLevel::Debug),
    )?;

    log::info!("🔍 Checking Hugging Face environment...");

    match env::var("HF_API_TOKEN") {
        Ok(token) if !token.trim().is_empty() => {
            log::info!("✅ HF API token found in environment");
            let preview: String = token.chars().take(5).collect();
            log::debug!("Token starts with: {}...", preview);
        }
        _ => {
            log::warn!("⚠️  No HF_API_TOKEN set");
            log::error!("❌ Generation requests will fail until a token is provided");
        }
    }

    let config = HfConfig::from_env();
    log::info!("📁 Output directory: {}", config.output_dir().display());

    let client = HfClient::new(config);
    let mut history = GenerationHistory::new();

    log::info!("📋 Available models:");
    for entry in catalog::all_models() {
        log::info!(
            "   {} — {} ({})",
            entry.display_name,
            entry.description,
            entry.status
        );
    }

    let prompt = catalog::example_prompts()[0];
    let model_id = "black-forest-labs/FLUX.1-schnell";
    log::info!("🎨 Generating: \"{}\" with {}", prompt, model_id);

    let outcome = client
        .image()
        .generate(ImageGenerationRequest::new(prompt, model_id))
        .await;

    println!("{}", outcome.message);

    if let Some(image) = outcome.image {
        history.record(image, prompt, catalog::display_name(model_id));
        log::info!("🗂️  History now holds {} generation(s)", history.len());
    }

    Ok(())
}
