use super::list::format_requests_table;
use super::GlobalOptions;
use crate::error::CliError;
use fundreq_agents::{ControllerError, ExtractionOutcome, InteractionController, SpeechCapture};
use shared_types::{FormField, LanguageMode, RequestFields};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

const ARABIC_EXAMPLE: &str =
    "أحتاج إلى طلب 500 ريال للمشروع 223 المسمى جامعة أبها لشراء بعض الأدوات";
const ENGLISH_EXAMPLE: &str =
    "I need to request 500 riyals for project 223 named Abha University to buy some tools";

const HELP: &str = "\
Type your request as a sentence, or use one of these commands:
  :voice                 capture one utterance from the microphone
  :lang <mode>           switch voice language (english, arabic, mixed)
  :form                  show the current request form
  :set <field> <value>   edit a field (project_number, project_name, amount, reason)
  :submit                check the form and show the summary to confirm
  :confirm               save the request
  :clear                 forget the conversation and discard the form
  :history               show what has been said so far
  :list                  show saved requests
  :help                  show this help
  :quit                  leave the session";

/// One line of REPL input
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Utterance(String),
    Voice,
    Language(LanguageMode),
    Form,
    Set { field: FormField, value: String },
    Submit,
    Confirm,
    Clear,
    History,
    List,
    Help,
    Quit,
    /// A known command used wrongly, with the message to show
    Invalid(String),
    Unknown(String),
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn parse_repl_line(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }

    let Some(command) = line.strip_prefix(':') else {
        return ReplCommand::Utterance(line.to_string());
    };

    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name.to_lowercase().as_str() {
        "voice" | "v" => ReplCommand::Voice,
        "lang" | "language" => match rest.parse::<LanguageMode>() {
            Ok(mode) => ReplCommand::Language(mode),
            Err(e) => ReplCommand::Invalid(e.to_string()),
        },
        "form" | "f" => ReplCommand::Form,
        "set" => {
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            match field.parse::<FormField>() {
                Ok(field) => ReplCommand::Set {
                    field,
                    value: value.to_string(),
                },
                Err(e) => ReplCommand::Invalid(e),
            }
        }
        "submit" | "s" => ReplCommand::Submit,
        "confirm" | "c" => ReplCommand::Confirm,
        "clear" => ReplCommand::Clear,
        "history" | "h" => ReplCommand::History,
        "list" | "l" => ReplCommand::List,
        "help" | "?" => ReplCommand::Help,
        "quit" | "q" | "exit" => ReplCommand::Quit,
        other => ReplCommand::Unknown(other.to_string()),
    }
}

pub fn example_sentences(language: LanguageMode) -> Vec<&'static str> {
    match language {
        LanguageMode::English => vec![ENGLISH_EXAMPLE],
        LanguageMode::Arabic => vec![ARABIC_EXAMPLE],
        LanguageMode::Mixed => vec![ARABIC_EXAMPLE, ENGLISH_EXAMPLE],
    }
}

/// Labels for the missing-field keys the model reported, keeping unknown keys as-is
pub fn missing_field_labels(missing: &[String]) -> String {
    missing
        .iter()
        .map(|key| {
            key.parse::<FormField>()
                .map(|field| field.label().to_string())
                .unwrap_or_else(|_| key.clone())
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_form(fields: &RequestFields) -> String {
    let amount = if fields.amount == 0.0 {
        String::new()
    } else {
        fields.amount.to_string()
    };
    format!(
        "  Project Number: {}\n  Project Name:   {}\n  Amount:         {}\n  Reason:         {}",
        fields.project_number, fields.project_name, amount, fields.reason
    )
}

/// REPL state around one [`InteractionController`]
pub struct ReplSession {
    controller: InteractionController,
    speech: Option<Arc<dyn SpeechCapture>>,
    language: LanguageMode,
}

impl ReplSession {
    pub fn new(
        controller: InteractionController,
        speech: Option<Arc<dyn SpeechCapture>>,
        language: LanguageMode,
    ) -> Self {
        Self {
            controller,
            speech,
            language,
        }
    }

    pub fn language(&self) -> LanguageMode {
        self.language
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn write_banner<W: Write>(&self, out: &mut W) -> Result<(), CliError> {
        writeln!(out, "fundreq - project money requests")?;
        writeln!(out, "Voice language: {}", self.language.label())?;
        if self.speech.is_none() {
            writeln!(
                out,
                "Voice input is off. Set [speech] program in the config file to enable it."
            )?;
        }
        writeln!(out, "Example:")?;
        for example in example_sentences(self.language) {
            writeln!(out, "  {}", example)?;
        }
        writeln!(out, "Type :help for commands.")?;
        Ok(())
    }

    /// Run one command; only output failures are returned as errors
    pub async fn handle<W: Write>(
        &mut self,
        command: ReplCommand,
        out: &mut W,
    ) -> Result<Flow, CliError> {
        match command {
            ReplCommand::Empty => {}
            ReplCommand::Utterance(text) => {
                let result = self.controller.submit_text(&text).await;
                self.report_extraction(result, out)?;
            }
            ReplCommand::Voice => match self.speech.clone() {
                Some(speech) => {
                    writeln!(out, "Listening ({})...", self.language.label())?;
                    out.flush()?;
                    let result = self
                        .controller
                        .capture_voice(speech.as_ref(), self.language)
                        .await;
                    self.report_extraction(result, out)?;
                }
                None => writeln!(
                    out,
                    "Voice input is not configured. Set [speech] program in the config file."
                )?,
            },
            ReplCommand::Language(mode) => {
                self.language = mode;
                writeln!(out, "Voice language set to {}.", mode.label())?;
                for example in example_sentences(mode) {
                    writeln!(out, "  {}", example)?;
                }
            }
            ReplCommand::Form => {
                writeln!(out, "{}", render_form(&self.controller.current_fields()))?;
            }
            ReplCommand::Set { field, value } => match self.controller.edit_field(field, &value) {
                Ok(()) => writeln!(out, "{}", render_form(&self.controller.current_fields()))?,
                Err(e) => writeln!(out, "{}", e)?,
            },
            ReplCommand::Submit => match self.controller.submit() {
                Ok(summary) => {
                    writeln!(out, "{}", summary)?;
                    writeln!(out, "Type :confirm to save or :set to make changes.")?;
                }
                Err(e) => writeln!(out, "{}", e)?,
            },
            ReplCommand::Confirm => match self.controller.confirm().await {
                Ok(saved) => {
                    info!(id = saved.id, "Request saved");
                    writeln!(out, "Request saved successfully! (id {})", saved.id)?;
                }
                Err(e) => writeln!(out, "{}", e)?,
            },
            ReplCommand::Clear => {
                self.controller.clear_memory();
                writeln!(out, "Conversation memory cleared.")?;
            }
            ReplCommand::History => {
                let history = self.controller.history();
                if history.is_empty() {
                    writeln!(out, "Nothing said yet.")?;
                }
                for (i, utterance) in history.iter().enumerate() {
                    writeln!(out, "{}. {}", i + 1, utterance)?;
                }
            }
            ReplCommand::List => match self.controller.list_requests().await {
                Ok(requests) => write!(out, "{}", format_requests_table(&requests))?,
                Err(e) => writeln!(out, "{}", e)?,
            },
            ReplCommand::Help => writeln!(out, "{}", HELP)?,
            ReplCommand::Quit => return Ok(Flow::Quit),
            ReplCommand::Invalid(message) => writeln!(out, "{}", message)?,
            ReplCommand::Unknown(name) => {
                writeln!(out, "Unknown command ':{}'. Type :help for commands.", name)?
            }
        }
        Ok(Flow::Continue)
    }

    fn report_extraction<W: Write>(
        &self,
        result: Result<ExtractionOutcome, ControllerError>,
        out: &mut W,
    ) -> Result<(), CliError> {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(error = %e, "Input not turned into a draft");
                writeln!(out, "{}", e)?;
                return Ok(());
            }
        };

        writeln!(out, "Heard: {}", outcome.utterance)?;
        if let Some(translated) = &outcome.translated_text {
            writeln!(out, "Translated text: {}", translated)?;
        }
        writeln!(out, "{}", render_form(&self.controller.current_fields()))?;
        if outcome.is_complete() {
            writeln!(out, "All details found. Type :submit to review.")?;
        } else {
            writeln!(
                out,
                "Missing information: {}. Add more details or use :set.",
                missing_field_labels(&outcome.missing_fields)
            )?;
        }
        Ok(())
    }
}

/// Interactive request session on stdin/stdout
pub async fn run_session(options: &GlobalOptions, language: LanguageMode) -> Result<(), CliError> {
    let ctx = options.load()?;
    let store = ctx.open_store()?;
    let factory = ctx.session_factory()?;
    let controller = factory.create_controller(store);
    let speech = ctx
        .config
        .speech_capture()
        .map(|capture| Arc::new(capture) as Arc<dyn SpeechCapture>);

    let mut session = ReplSession::new(controller, speech, language);
    let mut stdout = std::io::stdout();
    session.write_banner(&mut stdout)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        if session.handle(parse_repl_line(&line), &mut stdout).await? == Flow::Quit {
            break;
        }
    }

    info!("Session ended");
    Ok(())
}
