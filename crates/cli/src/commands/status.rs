//! `convo status` — show the effective configuration.

use anyhow::Context;
use convo_config::AppConfig;

pub async fn run() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load config")?;
    let tools = convo_tools::default_registry();

    println!("🤖 Convo Status");
    println!("===============");
    println!("  Config dir:      {}", AppConfig::config_dir().display());
    println!("  Provider:        {}", config.default_provider);
    println!("  Model:           {}", config.default_model);
    println!("  Temperature:     {}", config.default_temperature);
    println!("  Tool iterations: {}", config.max_tool_iterations);
    println!("  System prompt:   {}", config.system_prompt);
    println!("  Log file:        {}", config.log_file.display());
    println!("  Tools:           {} built in", tools.len());
    println!(
        "  API key:         {}",
        if config.has_api_key() {
            "configured"
        } else {
            "missing"
        }
    );

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `convo onboard` first");
    }

    Ok(())
}
