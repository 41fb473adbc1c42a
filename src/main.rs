mod agent;
mod brain;
mod executor;
mod status;
mod voice;

use agent::{AgentConfig, AgentLoop};
use brain::{Brain, BrainConfig};
use clap::Parser;
use executor::{Executor, ExecutorConfig};
use rustyline::history::FileHistory;
use rustyline::Editor;
use status::{Mode, StatusCell};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::fmt;
use voice::{Voice, VoiceConfig};

/// CLI arguments
#[derive(Debug, Parser)]
#[command(name = "commandly")]
#[command(about = "Voice/text-driven desktop assistant")]
struct Args {
    /// Run a single request and exit
    #[arg(long)]
    once: Option<String>,

    /// Transcribe an audio file and run the result as a request
    #[arg(long)]
    transcribe: Option<PathBuf>,

    /// Speak responses aloud
    #[arg(long)]
    speak: bool,

    /// History file path
    #[arg(long)]
    history_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_max_level(Level::INFO)
        .with_target(true)
        .init();

    let args = Args::parse();

    // Initialize config
    let brain_config = BrainConfig::from_env()?;
    let executor_config = ExecutorConfig::from_env();
    let agent_config = AgentConfig::from_env();

    info!(
        model = %brain_config.default_model,
        sandbox_root = %executor_config.sandbox_root.display(),
        allow_write = executor_config.capabilities.allow_write,
        full_control = executor_config.capabilities.full_control,
        "Configuration loaded"
    );

    let status = StatusCell::new();

    let brain = Brain::new(brain_config)?;
    info!(model = brain.default_model(), "Brain initialized");

    let executor = Executor::init(executor_config, status.clone())?;
    info!("Executor initialized");

    let agent = AgentLoop::new(brain, executor, agent_config, status.clone());

    // Voice is optional; failures here disable speech rather than abort
    let voice = if args.speak || args.transcribe.is_some() {
        match VoiceConfig::from_env().and_then(Voice::new) {
            Ok(voice) => Some(voice),
            Err(e) => {
                warn!(error = %e, "voice unavailable");
                None
            }
        }
    } else {
        None
    };

    if let Some(path) = args.transcribe {
        return run_transcribed(&agent, voice.as_ref(), &status, &path).await;
    }

    if let Some(text) = args.once {
        respond(&agent, voice.as_ref(), &text).await;
        return Ok(());
    }

    run_repl(&agent, voice.as_ref(), args.history_file).await
}

/// One-shot: transcribe an audio file, then handle the result
async fn run_transcribed(
    agent: &AgentLoop<Brain>,
    voice: Option<&Voice>,
    status: &StatusCell,
    path: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let voice = voice.ok_or("voice is not configured")?;

    status.set(Mode::Listening);
    let text = voice.transcribe(path).await?;
    status.set(Mode::Idle);

    if text.is_empty() {
        println!("No speech detected.");
        return Ok(());
    }

    println!("> {}", text);
    respond(agent, Some(voice), &text).await;
    Ok(())
}

/// Handle one request and present the reply
async fn respond(agent: &AgentLoop<Brain>, voice: Option<&Voice>, text: &str) {
    let reply = agent.handle(text).await;
    println!("{}", reply);

    if let Some(voice) = voice {
        if let Err(e) = voice.speak(&reply).await {
            warn!(error = %e, "speech failed");
        }
    }
}

/// Interactive loop with persistent history
async fn run_repl(
    agent: &AgentLoop<Brain>,
    voice: Option<&Voice>,
    history_file: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let history_file = history_file.unwrap_or_else(|| {
        dirs::home_dir()
            .map(|p| p.join(".commandly_history"))
            .unwrap_or_else(|| PathBuf::from(".commandly_history"))
    });

    let mut rl: Editor<(), FileHistory> = Editor::new()?;

    if history_file.exists()
        && let Err(e) = rl.load_history(&history_file)
    {
        eprintln!("[warning] Failed to load history: {}", e);
    }

    println!("commandly v{}", env!("CARGO_PKG_VERSION"));
    println!("Type your request and press Enter. Ctrl+D to quit.");
    println!();

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(input);
                respond(agent, voice, input).await;
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                // Ctrl+C - cancel current input, continue
                println!("^C");
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                // Ctrl+D - exit
                break;
            }
            Err(e) => {
                eprintln!("[error] Readline error: {}", e);
                break;
            }
        }
    }

    if let Err(e) = rl.save_history(&history_file) {
        eprintln!("[warning] Failed to save history: {}", e);
    }

    println!("\nGoodbye!");
    Ok(())
}
