//! Interactive chat session
//!
//! A thin readline loop over the pipeline; every line is handled as one
//! independent request (no conversation memory).

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::pipeline::ChatPipeline;

/// Run the interactive chat loop until EOF, interrupt, or `exit`
pub async fn run_interactive(pipeline: &ChatPipeline, user_id: &str) -> Result<()> {
    let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

    println!("TubePilot interactive chat. Type a request, or 'exit' to quit.");

    loop {
        let readline = rl.readline(&format!("{} ", ">".bright_green()));

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    break;
                }
                let _ = rl.add_history_entry(line);

                let response = pipeline.handle(user_id, line).await;
                match serde_json::to_string_pretty(&response) {
                    Ok(json) => println!("{json}"),
                    Err(e) => eprintln!("Failed to render response: {e}"),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Readline error: {e}");
                break;
            }
        }
    }

    Ok(())
}
