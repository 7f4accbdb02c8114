use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use zcalc::calculator::{CalcResult, copy_to_clipboard, ignored_chars, looks_like_expression};
use zcalc::config::Config;
use zcalc::keypad::KeypadState;

/// A keypad calculator. Without a subcommand, reads one expression per line
/// from stdin.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config file to use instead of the default location.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Copy successful results to the clipboard.
    #[arg(long, global = true)]
    copy: bool,

    /// Show results with thousand separators.
    #[arg(long, global = true)]
    group: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate an expression such as "2+3*4".
    Eval { expression: String },
    /// Press keypad keys in order and print the display, e.g. "12+3=".
    Keys { keys: String },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("zcalc: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let mut config = Config::load(args.config.as_deref())?;
    config.group_digits |= args.group;
    config.copy_result |= args.copy;

    match args.command {
        Some(Command::Eval { expression }) => {
            let result = calculate(&expression, &config);
            println!("{}", result.display());
            if matches!(result, CalcResult::Error { .. }) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Command::Keys { keys }) => {
            let state = KeypadState::new().press_all(&keys);
            println!("{}", state.display);
            let numeric = state.display.parse::<f64>().is_ok_and(f64::is_finite);
            copy_if_enabled(&state.display, &config, numeric);
        }
        None => repl(&config)?,
    }

    Ok(ExitCode::SUCCESS)
}

/// Evaluate `expression`, warning about input the tokenizer skips.
fn calculate(expression: &str, config: &Config) -> CalcResult {
    let ignored = ignored_chars(expression);
    if !ignored.is_empty() {
        tracing::warn!(?ignored, "ignoring characters that are not part of an expression");
    } else if !looks_like_expression(expression) {
        tracing::info!(expression, "input has no operator");
    }

    let result = CalcResult::new(expression, config.group_digits);
    if let Some(text) = result.clipboard() {
        copy_if_enabled(text, config, true);
    }
    result
}

fn copy_if_enabled(text: &str, config: &Config, numeric: bool) {
    if !config.copy_result || !numeric {
        return;
    }
    if let Err(e) = copy_to_clipboard(text) {
        tracing::warn!(error = %e, "could not copy result");
    }
}

fn repl(config: &Config) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut last: Option<CalcResult> = None;

    loop {
        write!(stdout, "{}", config.prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?
            == 0
        {
            break;
        }

        match line.trim() {
            "" => continue,
            ":q" | ":quit" => break,
            ":copy" => match last.as_ref().and_then(|r| r.clipboard()) {
                Some(text) => match copy_to_clipboard(text) {
                    Ok(()) => writeln!(stdout, "copied {}", text)?,
                    Err(e) => writeln!(stdout, "{}", e)?,
                },
                None => writeln!(stdout, "nothing to copy")?,
            },
            expression => {
                let result = calculate(expression, config);
                writeln!(stdout, "{}", result.display())?;
                last = Some(result);
            }
        }
    }

    Ok(())
}
