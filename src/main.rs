use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

use speech_llm::{config, llm, speech_synthesizer, SILENT_AUDIO};

const SYSTEM_PROMPT: &str =
    "You are a helpful voice assistant. Answer in one or two short spoken sentences.";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    config::init()?;
    let config = config::get().context("CONFIG is not initialized")?;

    let model = llm::build(config)?;
    let synth = speech_synthesizer(config)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let prompt = line.trim();

        if prompt.is_empty() {
            continue;
        }

        let reply = model.generate(SYSTEM_PROMPT, prompt).await;
        println!("{reply}");

        let audio = synth.synthesize(&reply, None).await;
        let extension = if audio == SILENT_AUDIO { "wav" } else { "mp3" };
        let path = Path::new(&config.output_path).join(format!("{}.{extension}", Uuid::new_v4()));

        tokio::fs::write(&path, &audio)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::info!("wrote {} bytes to {}", audio.len(), path.display());
    }

    Ok(())
}
