//! Command line entry point.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::Parser;

use mainmenu_converter::services::convert::{self, ConvertConfig, ConvertRequest};
use mainmenu_converter::types::ConvertError;

const DEFAULT_IDENTIFIER: &str = "Default";

/// Converts a Skyrim main menu replacer mod into a Main Menu Design
/// Replacer addon archive.
#[derive(Debug, Parser)]
#[command(name = "mainmenu-converter", version, about)]
struct Args {
    /// Mod archive to convert (.zip, .7z or .rar).
    archive: Option<PathBuf>,

    /// Addon name; prompted for when omitted.
    #[arg(short, long)]
    name: Option<String>,

    /// Where to write the addon archive (defaults to the input's directory).
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Parent directory for the scratch workspace.
    #[arg(long, value_name = "DIR")]
    scratch_dir: Option<PathBuf>,

    /// Password for encrypted archives.
    #[arg(long)]
    password: Option<String>,

    /// Print the conversion report as JSON instead of the usual chatter.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let interactive = io::stdin().is_terminal();
    let json = args.json;

    match run(args, interactive) {
        Ok(()) => {
            if !json {
                println!("Done!");
                if interactive {
                    thread::sleep(Duration::from_millis(500));
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("ERROR: {err}");
            if interactive {
                pause_for_enter();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args, interactive: bool) -> anyhow::Result<()> {
    let archive = args
        .archive
        .ok_or_else(|| ConvertError::InvalidInput("no mod archive specified".into()))?;
    // A bad archive path has to fail before the name prompt.
    ConvertRequest::new(&archive, DEFAULT_IDENTIFIER).validate()?;

    let identifier = resolve_identifier(args.name, interactive)?;
    let request = ConvertRequest::new(archive, identifier);
    let config = ConvertConfig {
        output_dir: args.output_dir,
        scratch_root: args.scratch_dir,
        password: args.password,
    };

    let report = convert::run(&request, &config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

/// Picks the addon name from the flag, an interactive prompt, or one line
/// of piped input. Blank or missing input falls back to `Default`, and
/// anything unusable in a file name is adjusted.
fn resolve_identifier(flag: Option<String>, interactive: bool) -> anyhow::Result<String> {
    let raw = match flag {
        Some(name) => name,
        None if interactive => dialoguer::Input::<String>::new()
            .with_prompt("Please enter a name for this main menu background")
            .default(DEFAULT_IDENTIFIER.into())
            .interact_text()?,
        None => {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line
        }
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_IDENTIFIER.to_string());
    }
    let safe = sanitize_filename::sanitize(trimmed);
    if safe != trimmed {
        log::warn!("addon name {trimmed:?} adjusted to {safe:?} for use in file names");
    }
    if safe.is_empty() {
        return Ok(DEFAULT_IDENTIFIER.to_string());
    }
    Ok(safe)
}

fn pause_for_enter() {
    print!("Press Enter to exit...");
    io::stdout().flush().ok();
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).ok();
}
