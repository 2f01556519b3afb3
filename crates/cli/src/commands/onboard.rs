//! `convo onboard` — first-time setup.

use anyhow::Context;
use convo_config::AppConfig;

pub async fn run() -> anyhow::Result<()> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("🤖 Convo — First-Time Setup");
    println!("===========================\n");

    if config_dir.exists() {
        println!("  Config directory exists: {}", config_dir.display());
    } else {
        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create {}", config_dir.display()))?;
        println!("✅ Created config directory: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("✅ Created config.toml at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Edit {} and add your API key", config_path.display());
    println!("      (or set OPENROUTER_API_KEY — get one at https://openrouter.ai/keys)");
    println!("   2. Run: convo chat");
    println!("   3. Start chatting!\n");

    Ok(())
}
