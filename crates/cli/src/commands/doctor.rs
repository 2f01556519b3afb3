//! `convo doctor` — diagnose configuration and provider health.
//!
//! Every check reports and moves on; the command itself never fails on a
//! bad environment, it only describes it.

use convo_config::AppConfig;

pub async fn run() -> anyhow::Result<()> {
    println!("🩺 Convo Doctor — Diagnostics");
    println!("=============================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file — run `convo onboard` (environment variables still apply)");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            println!("\n  ⚠️  1 issue found. See above for details.");
            return Ok(());
        }
    };

    if config.has_api_key() {
        println!("  ✅ API key configured");
    } else {
        println!("  ⚠️  No API key — set OPENROUTER_API_KEY or add api_key to config.toml");
        issues += 1;
    }

    let router = convo_providers::build_from_config(&config);
    match router.default() {
        Some(provider) => match provider.health_check().await {
            Ok(true) => {
                println!("  ✅ Provider '{}' reachable", config.default_provider);
                match provider.list_models().await {
                    Ok(models) => println!("  ✅ {} models advertised", models.len()),
                    Err(e) => {
                        println!("  ⚠️  Could not list models: {e}");
                        issues += 1;
                    }
                }
            }
            Ok(false) => {
                println!("  ⚠️  Provider '{}' unreachable", config.default_provider);
                issues += 1;
            }
            Err(e) => {
                println!(
                    "  ⚠️  Provider '{}' unreachable: {e}",
                    config.default_provider
                );
                issues += 1;
            }
        },
        None => {
            println!("  ❌ No default provider configured");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
