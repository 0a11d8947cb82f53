use anyhow::Context;
use clap::{Parser, Subcommand};
use hysio_core::{
    detect_red_flags, map_to_hhsb, search_codes, summarise, validate_codes, Answers,
    ValidationResult,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hysio")]
#[command(about = "Hysio DCSPH codes, red flags and HHSB from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one or more DCSPH codes
    Validate {
        /// Four-digit codes, e.g. 7920
        #[arg(required = true)]
        codes: Vec<String>,
    },
    /// Search the DCSPH knowledge base
    Search {
        /// Text to match against code, description and category
        query: String,
        /// Maximum number of results
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Detect red flags in a JSON answers file
    RedFlags {
        /// Path to a JSON object of questionnaire answers
        answers: PathBuf,
    },
    /// Render an HHSB note from a JSON answers file
    Hhsb {
        /// Path to a JSON object of questionnaire answers
        answers: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Validate { codes }) => {
            for result in validate_codes(codes.as_slice()) {
                println!("{}", describe(&result));
            }
        }
        Some(Commands::Search { query, limit }) => {
            let found = search_codes(&query, limit);
            if found.is_empty() {
                println!("No codes found.");
            }
            for entry in found {
                println!("{}  {} ({})", entry.code, entry.description, entry.category);
            }
        }
        Some(Commands::RedFlags { answers }) => {
            let answers = read_answers(&answers)?;
            let summary = summarise(&detect_red_flags(&answers));
            if summary.flags.is_empty() {
                println!("No red flags detected.");
            }
            for flag in &summary.flags {
                println!(
                    "[{:?}] {} ({}: {})",
                    flag.severity, flag.label, flag.field, flag.matched_text
                );
            }
            if summary.requires_immediate_attention {
                println!("Requires immediate attention.");
            }
        }
        Some(Commands::Hhsb { answers }) => {
            let answers = read_answers(&answers)?;
            let document = map_to_hhsb(&answers, &detect_red_flags(&answers))?;
            print!("{}", document.render_text());
        }
        None => {
            println!("Use 'hysio --help' for commands");
        }
    }

    Ok(())
}

fn read_answers(path: &Path) -> anyhow::Result<Answers> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading answers from {}", path.display()))?;
    parse_answers(&raw).with_context(|| format!("parsing answers in {}", path.display()))
}

fn parse_answers(raw: &str) -> anyhow::Result<Answers> {
    Ok(serde_json::from_str(raw)?)
}

fn describe(result: &ValidationResult) -> String {
    if result.is_valid {
        return format!(
            "{}  valid    {} ({})",
            result.code,
            result.description.as_deref().unwrap_or_default(),
            result.category.as_deref().unwrap_or_default()
        );
    }

    let mut line = format!("{}  invalid  {}", result.code, result.reasons.join("; "));
    if !result.suggestions.is_empty() {
        line.push_str(&format!(" (try {})", result.suggestions.join(", ")));
    }
    line
}
