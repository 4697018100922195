//! promptline-demo - interactive console demonstration
//!
//! Runs a promptline console on the current terminal: type with full line
//! editing and history while a background ticker logs above the prompt.
//! Type `exit` (or press Ctrl+C twice) to quit.

use std::env;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use crossterm::terminal;
use tracing_subscriber::{fmt, EnvFilter};

use promptline::{Console, Options};

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Demo configuration
struct Config {
    /// Prompt override
    prompt: Option<String>,
    /// Options file (TOML)
    config_file: Option<PathBuf>,
    /// Disable the background ticker
    quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: None,
            config_file: None,
            quiet: false,
        }
    }
}

fn print_version() {
    eprintln!("promptline-demo {}", VERSION);
}

fn print_help() {
    eprintln!("promptline-demo {} - interactive console demonstration", VERSION);
    eprintln!();
    eprintln!("Usage: promptline-demo [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -p, --prompt <TEXT>   Prompt text (default \"> \")");
    eprintln!("  -c, --config <FILE>   Load options from a TOML file");
    eprintln!("  -q, --quiet           Disable the background ticker");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Keys:");
    eprintln!("  Left/Right, Home/End  Move the cursor");
    eprintln!("  Ctrl+Left/Right       Jump by word");
    eprintln!("  Up/Down               Browse history");
    eprintln!("  Delete/Backspace      Delete forward/backward");
    eprintln!("  Ctrl+C (twice)        Quit");
    eprintln!();
    eprintln!("Type 'exit' to quit.");
}

fn parse_args() -> Result<Config, String> {
    let args: Vec<String> = env::args().collect();
    let mut config = Config::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-p" | "--prompt" => {
                i += 1;
                let value = args.get(i).ok_or("--prompt requires a value")?;
                config.prompt = Some(value.clone());
            }
            "-c" | "--config" => {
                i += 1;
                let value = args.get(i).ok_or("--config requires a value")?;
                config.config_file = Some(PathBuf::from(value));
            }
            "-q" | "--quiet" => {
                config.quiet = true;
            }
            other => {
                return Err(format!("unknown option: {}", other));
            }
        }
        i += 1;
    }

    Ok(config)
}

enum Event {
    /// Raw bytes read from stdin
    Input(Vec<u8>),
    /// Background ticker fired
    Tick(u64),
}

fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {}", message);
            eprintln!("Try 'promptline-demo --help'.");
            std::process::exit(1);
        }
    };

    let mut options = match &config.config_file {
        Some(path) => Options::load_from(path)
            .with_context(|| format!("loading options from {}", path.display()))?,
        None => Options::default(),
    };
    if let Some(prompt) = config.prompt {
        options.prompt = prompt;
    }

    let (console, lines) = Console::new(options, io::stdout())?;
    terminal::enable_raw_mode().context("enabling raw terminal mode")?;
    let result = run(console, lines, config.quiet);
    terminal::disable_raw_mode().context("restoring terminal mode")?;
    result
}

fn run(
    mut console: Console<io::Stdout>,
    lines: mpsc::Receiver<String>,
    quiet: bool,
) -> anyhow::Result<()> {
    console.start()?;

    let (tx, events) = mpsc::channel::<Event>();

    // Reader thread: raw stdin bytes, chunk by chunk
    let input_tx = tx.clone();
    thread::spawn(move || {
        let mut stdin = io::stdin();
        let mut buffer = [0u8; 1024];
        loop {
            match stdin.read(&mut buffer) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if input_tx.send(Event::Input(buffer[..n].to_vec())).is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Ticker thread: periodic log traffic above the prompt
    if !quiet {
        let tick_tx = tx;
        thread::spawn(move || {
            let mut n = 0;
            loop {
                thread::sleep(Duration::from_secs(2));
                n += 1;
                if tick_tx.send(Event::Tick(n)).is_err() {
                    break;
                }
            }
        });
    }

    // All console access stays on this thread; the channels only carry
    // events into it.
    loop {
        match events.recv() {
            Ok(Event::Input(bytes)) => console.process_bytes(&bytes)?,
            Ok(Event::Tick(n)) => console.log(&format!("[ticker] tick #{}", n))?,
            Err(_) => break,
        }

        for line in lines.try_iter() {
            if line.trim() == "exit" {
                console.log("bye")?;
                return Ok(());
            }
            console.log(&format!("Received: {}", line))?;
        }
    }

    Ok(())
}
