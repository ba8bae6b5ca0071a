//! REPL configuration
//!
//! Command line flags win over environment variables, which win over defaults.

use clap::{Parser, ValueEnum};

pub const PROMPT_VAR: &str = "RECKON_PROMPT";
pub const OUTPUT_VAR: &str = "RECKON_OUTPUT";

const DEFAULT_PROMPT: &str = "> ";

const REPL_HELP: &str = "\
Commands (one per line on stdin):
  let <name> = <expr>   evaluate and store a variable
  <expr>                evaluate and print
  vars                  list variables
  help [name]           list functions or describe one
  exit                  quit

Environment:
  RECKON_PROMPT   prompt text (default \"> \")
  RECKON_OUTPUT   text | json (default text)
  RUST_LOG        log filter (default warn)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// reckon-cli evaluates arithmetic expressions read line by line from stdin.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, after_help = REPL_HELP)]
pub struct Args {
    /// Output format for results and errors.
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Shorthand for `--output json`.
    #[arg(long, conflicts_with = "output")]
    json: bool,

    /// Prompt shown before each line when stdin is a terminal.
    #[arg(short, long)]
    prompt: Option<String>,

    /// Never show a prompt.
    #[arg(long, conflicts_with = "prompt")]
    no_prompt: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `None` disables the prompt
    pub prompt: Option<String>,
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: Some(DEFAULT_PROMPT.to_string()),
            output: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Merge parsed flags with the process environment
    pub fn from_env(args: Args) -> Result<Self, String> {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    pub fn resolve<F>(args: Args, env: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(prompt) = env(PROMPT_VAR) {
            config.prompt = Some(prompt);
        }
        if let Some(output) = env(OUTPUT_VAR) {
            config.output = OutputFormat::from_str(output.trim(), true)
                .map_err(|_| format!("{}: expected 'text' or 'json', got '{}'", OUTPUT_VAR, output))?;
        }

        if let Some(output) = args.output {
            config.output = output;
        }
        if args.json {
            config.output = OutputFormat::Json;
        }
        if let Some(prompt) = args.prompt {
            config.prompt = Some(prompt);
        }
        if args.no_prompt {
            config.prompt = None;
        }

        Ok(config)
    }
}
