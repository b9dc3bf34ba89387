use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use persona_affect_matrix::modules::terminal::LogLevel;
use persona_affect_matrix::{ChatSession, Console, EngineConfig, FileBlobStore};

#[derive(Debug, Parser)]
#[command(name = "affect-terminal", about = "Inspect and edit a persona's emotional state")]
struct Args {
    /// Directory holding the persisted state
    #[arg(long, default_value = ".affect")]
    store_dir: PathBuf,

    /// Optional engine config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let mut session = ChatSession::open(config, FileBlobStore::new(&args.store_dir));
    let mut console = Console::new();

    println!("Persona affect terminal. Type 'help' for commands, 'exit' to quit.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let applied = session.pump_crazy_mode()?;
        if applied > 0 {
            println!("(crazy mode applied {} update(s))", applied);
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        for entry in console.execute(line, &mut session) {
            match entry.level {
                LogLevel::Input => {}
                LogLevel::Error => eprintln!("error: {}", entry.text),
                _ => println!("{}", entry.text),
            }
        }
    }

    session.stop_crazy_mode();
    Ok(())
}
