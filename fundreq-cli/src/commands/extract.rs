use super::GlobalOptions;
use crate::error::CliError;
use fundreq_agents::ExtractionError;

/// Extract fields from a single sentence and print the draft as JSON. Nothing is saved.
pub async fn extract_once(options: &GlobalOptions, text: &str) -> Result<(), CliError> {
    let ctx = options.load()?;
    let extractor = ctx.session_factory()?.create_extractor();

    let draft = extractor
        .try_extract(text, "")
        .await
        .map_err(|e| match e {
            ExtractionError::EmptyInput => {
                CliError::Command("Please enter some text first.".to_string())
            }
            other => CliError::Llm(other.to_string()),
        })?;

    println!("{}", serde_json::to_string_pretty(&draft)?);
    Ok(())
}
