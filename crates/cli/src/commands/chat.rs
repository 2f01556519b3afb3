//! `convo chat` — interactive or single-message chat mode.
//!
//! The interactive loop reads lines from stdin, treats `/`-prefixed input as
//! commands, and hands everything else to the chat session. Command and chat
//! failures print an error line and re-prompt; nothing short of EOF or
//! `/quit` exits the loop.

use std::io::Write as _;
use std::sync::Arc;

use anyhow::{Context, bail};
use convo_agent::{ChatSession, TranscriptLogger};
use convo_config::AppConfig;
use convo_core::event::{DomainEvent, EventBus};
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(message: Option<String>) -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load config")?;

    // Check for the API key early, with actionable instructions.
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    OPENROUTER_API_KEY=sk-or-v1-...   (recommended)");
        eprintln!("    OPENAI_API_KEY=sk-...             (for OpenAI direct)");
        eprintln!("    CONVO_API_KEY=sk-...              (generic)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!(
            "    {}",
            AppConfig::config_dir().join("config.toml").display()
        );
        eprintln!();
        eprintln!("  Get an OpenRouter key at: https://openrouter.ai/keys");
        eprintln!();
        bail!("No API key found. See above for setup instructions.");
    }

    let router = convo_providers::build_from_config(&config);
    let provider = router.default().context("No default provider configured")?;
    let tools = Arc::new(convo_tools::default_registry());
    let event_bus = Arc::new(EventBus::default());

    let mut session = ChatSession::new(
        provider,
        &config.default_model,
        tools,
        &config.system_prompt,
        event_bus.clone(),
    )
    .with_temperature(config.default_temperature)
    .with_max_tokens(config.default_max_tokens)
    .with_max_iterations(config.max_tool_iterations)
    .with_transcript(TranscriptLogger::new(&config.log_file));

    if let Some(text) = message {
        // Single message mode
        let reply = session.chat(&text).await?;
        println!("{reply}");
        return Ok(());
    }

    run_interactive(&mut session, &config, event_bus).await
}

async fn run_interactive(
    session: &mut ChatSession,
    config: &AppConfig,
    event_bus: Arc<EventBus>,
) -> anyhow::Result<()> {
    println!();
    println!("🤖 Convo — Conversational AI Agent");
    println!("  Provider: {}", config.default_provider);
    println!("  Model:    {}", session.model());
    println!(
        "Loaded {} tools: {}",
        session.tools().len(),
        session.tools().names().join(", ")
    );
    println!("Type your message or use commands (type /help for commands)");
    println!("{}", "-".repeat(50));

    spawn_tool_feedback(event_bus);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("\n👤 You: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break; // EOF
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match ReplInput::parse(input) {
            ReplInput::Chat(text) => {
                print!("🤖 Assistant: ");
                std::io::stdout().flush()?;
                match session.chat(text).await {
                    Ok(reply) => println!("{reply}"),
                    Err(e) => println!("\n❌ Error: {e}"),
                }
            }
            ReplInput::Help => print_help(),
            ReplInput::System(Some(prompt)) => {
                session.set_system_prompt(prompt);
                let shown: String = prompt.chars().take(50).collect();
                println!("✅ System prompt updated: {shown}...");
            }
            ReplInput::System(None) => {
                println!("❌ Please provide a system prompt: /system <prompt>");
            }
            ReplInput::Reset => {
                session.reset();
                println!("🔄 Conversation reset");
            }
            ReplInput::Tools => {
                let registry = session.tools();
                println!("\n🔧 Available tools ({}):", registry.len());
                for def in registry.definitions() {
                    let summary = def.description.lines().next().unwrap_or("");
                    println!("  - {}: {summary}", def.name);
                }
            }
            ReplInput::Model(Some(model)) => {
                session.set_model(model);
                println!("✅ Model changed to: {model}");
            }
            ReplInput::Model(None) => {
                println!("❌ Please provide a model name: /model <model_name>");
            }
            ReplInput::Status => {
                println!("\n📊 Status:");
                println!("  Model: {}", session.model());
                println!(
                    "  System Prompt: {}",
                    session.conversation().system_prompt()
                );
                println!("  Tools: {} loaded", session.tools().len());
                println!("  Conversation: {}", session.conversation().summary());
            }
            ReplInput::Quit => break,
            ReplInput::Unknown(name) => println!("❌ Unknown command: {name}"),
        }
    }

    println!("\n👋 Goodbye!");
    Ok(())
}

/// Print live tool feedback while the session is thinking.
fn spawn_tool_feedback(event_bus: Arc<EventBus>) {
    let mut events = event_bus.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event.as_ref() {
                DomainEvent::ToolCallRequested {
                    tool_name,
                    arguments,
                    ..
                } => {
                    println!("\n🔧 Executing tool: {tool_name}");
                    println!("   Arguments: {arguments}");
                }
                DomainEvent::ToolExecuted {
                    tool_name,
                    success,
                    duration_ms,
                    ..
                } => {
                    if *success {
                        println!("   Done: {tool_name} ({duration_ms} ms)");
                    } else {
                        println!("   Failed: {tool_name} ({duration_ms} ms)");
                    }
                }
                _ => {}
            }
        }
    });
}

fn print_help() {
    println!("\n📋 Available Commands:");
    println!("  /help          - Show this help message");
    println!("  /system <text> - Set new system prompt");
    println!("  /reset         - Reset conversation");
    println!("  /tools         - List available tools");
    println!("  /model <name>  - Change model");
    println!("  /status        - Show current status");
    println!("  /quit          - Exit the program");
}

/// One parsed line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum ReplInput<'a> {
    Chat(&'a str),
    Help,
    System(Option<&'a str>),
    Reset,
    Tools,
    Model(Option<&'a str>),
    Status,
    Quit,
    Unknown(&'a str),
}

impl<'a> ReplInput<'a> {
    /// Parse a trimmed, non-empty input line.
    fn parse(input: &'a str) -> Self {
        if matches!(input, "exit" | "quit") {
            return Self::Quit;
        }
        let Some(rest) = input.strip_prefix('/') else {
            return Self::Chat(input);
        };

        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };
        let arg = (!args.is_empty()).then_some(args);

        match name.to_lowercase().as_str() {
            "help" => Self::Help,
            "system" => Self::System(arg),
            "reset" => Self::Reset,
            "tools" => Self::Tools,
            "model" => Self::Model(arg),
            "status" => Self::Status,
            "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(name),
        }
    }
}
