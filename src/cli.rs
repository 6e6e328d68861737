//! Terminal front end: argument parsing, REPL commands, transcript rendering.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Parser;

use crate::config::{self, CompletionConfig};
use crate::models::{DisplayMessage, DisplayRole, Language};
use crate::pipeline::chat::MedicalAssistant;
use crate::pipeline::completion::CompletionError;
use crate::pipeline::extraction::{build_ocr_engine, DocumentExtractor, PdfTextExtractor};
use crate::session::ChatSession;

#[derive(Parser, Debug)]
#[command(
    name = "labchat",
    version,
    about = "Ask questions about medical lab reports, typed or uploaded as PDF/PNG/JPEG"
)]
pub struct Cli {
    /// Chat completions endpoint
    #[arg(long, default_value = config::DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Model identifier sent with every request
    #[arg(long, default_value = config::DEFAULT_MODEL)]
    pub model: String,

    /// Response language (English or Hindi)
    #[arg(long, default_value = "English")]
    pub language: String,

    /// Sampling temperature
    #[arg(long, default_value_t = config::DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    /// HTTP timeout for the completion request, in seconds
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Tesseract data directory (overrides TESSDATA_PREFIX discovery)
    #[arg(long)]
    pub tessdata: Option<PathBuf>,
}

impl Cli {
    pub fn completion_config(&self, api_key: String) -> CompletionConfig {
        CompletionConfig::new(api_key)
            .with_endpoint(&self.endpoint)
            .with_model(&self.model)
            .with_temperature(self.temperature)
            .with_timeout_secs(self.timeout_secs)
    }
}

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Ask(String),
    Upload(PathBuf),
    Language(String),
    Clear,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_command(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplCommand::Empty;
    }
    if !trimmed.starts_with('/') {
        return ReplCommand::Ask(line.trim_end_matches(['\r', '\n']).to_string());
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (trimmed, ""),
    };

    match cmd {
        "/file" | "/upload" if !arg.is_empty() => ReplCommand::Upload(PathBuf::from(arg)),
        "/lang" | "/language" if !arg.is_empty() => ReplCommand::Language(arg.to_string()),
        "/clear" => ReplCommand::Clear,
        "/help" => ReplCommand::Help,
        "/quit" | "/exit" => ReplCommand::Quit,
        _ => ReplCommand::Unknown(trimmed.to_string()),
    }
}

/// Render the display list as a plain-text transcript.
pub fn render_transcript(messages: &[DisplayMessage]) -> String {
    let mut out = String::new();
    for msg in messages {
        let label = match msg.role {
            DisplayRole::User => "You",
            DisplayRole::Assistant => "Assistant",
        };
        out.push_str(&format!("{label}: {}\n\n", msg.content.trim_end()));
    }
    out
}

const HELP: &str = "Commands:
  <text>             ask a question
  /file <path>       upload a PDF, PNG or JPEG lab report
  /lang <language>   English or Hindi
  /clear             start over
  /quit              exit
";

/// Run the REPL until `/quit` or end of input.
pub fn run_repl<R: BufRead, W: Write>(
    session: &mut ChatSession,
    input: R,
    mut output: W,
) -> std::io::Result<()> {
    writeln!(output, "{} v{}. Type /help for commands.", config::APP_NAME, config::APP_VERSION)?;
    writeln!(
        output,
        "This assistant explains lab results; it does not diagnose. Always consult a doctor.\n"
    )?;

    for line in input.lines() {
        let line = line?;
        let display = match parse_command(&line) {
            ReplCommand::Empty => continue,
            ReplCommand::Quit => break,
            ReplCommand::Help => {
                write!(output, "{HELP}")?;
                continue;
            }
            ReplCommand::Unknown(cmd) => {
                writeln!(output, "Unknown command: {cmd}. Type /help.")?;
                continue;
            }
            ReplCommand::Language(label) => {
                match session.set_language(&label) {
                    Some(lang) => writeln!(output, "Language set to {}.", lang.label())?,
                    None => writeln!(output, "Unrecognized language '{label}', replies will not be language-hinted.")?,
                }
                continue;
            }
            ReplCommand::Clear => session.clear().to_vec(),
            ReplCommand::Ask(text) => session.submit_text(&text).to_vec(),
            ReplCommand::Upload(path) => session.upload_path(&path).to_vec(),
        };
        write!(output, "{}", render_transcript(&display))?;
        output.flush()?;
    }
    Ok(())
}

/// Wire up the production session from parsed arguments.
pub fn build_session(cli: &Cli, api_key: String) -> Result<ChatSession, CompletionError> {
    let config = cli.completion_config(api_key);
    let assistant = MedicalAssistant::from_config(&config)?;
    let extractor = DocumentExtractor::new(
        build_ocr_engine(cli.tessdata.as_deref()),
        Box::new(PdfTextExtractor),
    );

    let mut session = ChatSession::new(extractor, assistant);
    if session.set_language(&cli.language).is_none() {
        tracing::warn!(
            language = %cli.language,
            supported = ?Language::ALL.map(|l| l.label()),
            "Unrecognized --language, no hint will be sent"
        );
    }
    Ok(session)
}
