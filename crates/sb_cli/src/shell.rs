use std::io::{BufRead, Write};
use tracing::{error, info};
use sb_core::{Dataset, Error, ModelDescriptor, Result};
use sb_inference::prompt::format_chat_prompt;
use sb_inference::ModelClient;
use sb_storage::{load_dataset, DatasetStore};

/// One trimmed line, or `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt<W: Write>(output: &mut W, text: &str) -> Result<()> {
    write!(output, "{}", text)?;
    output.flush()?;
    Ok(())
}

pub fn print_models<W: Write>(models: &[ModelDescriptor], output: &mut W) -> Result<()> {
    writeln!(output, "Available models:")?;
    for (i, model) in models.iter().enumerate() {
        let max_len = model
            .max_model_len
            .map(|len| len.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        writeln!(
            output,
            "{} - {} - {} - Max model len: {}",
            i,
            model.id,
            model.root.as_deref().unwrap_or(&model.id),
            max_len
        )?;
    }
    Ok(())
}

/// Ask the user to pick one of the served models.
///
/// Empty input picks `default_model` when the server lists it. Anything
/// unparseable re-prompts; running out of input gives up.
pub async fn choose_model<R: BufRead, W: Write>(
    client: &ModelClient,
    default_model: &str,
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    let models = client.list_models().await;
    if models.is_empty() {
        error!("No models available.");
        return Err(Error::InvalidInput("No model selected".to_string()));
    }
    print_models(&models, output)?;
    let default = models.iter().position(|m| m.id == default_model);

    loop {
        let hint = match default {
            Some(i) => format!(" [{}]", i),
            None => String::new(),
        };
        prompt(output, &format!("\nEnter the number of the model you want to use{}: ", hint))?;
        let Some(choice) = read_line(input)? else {
            return Err(Error::InvalidInput("No model selected".to_string()));
        };

        let index = match (choice.is_empty(), default) {
            (true, Some(i)) => Some(i),
            _ => choice.parse::<usize>().ok().filter(|i| *i < models.len()),
        };
        match index {
            Some(i) => {
                let selected = models[i].id.clone();
                info!("🧠 Selected model: {}", selected);
                return Ok(selected);
            }
            None => writeln!(output, "Invalid choice. Please enter a valid number.")?,
        }
    }
}

/// Ask the user to pick a dataset file from the data directory and load it.
pub fn choose_dataset<R: BufRead, W: Write>(
    store: &DatasetStore,
    input: &mut R,
    output: &mut W,
) -> Result<Dataset> {
    let datasets = store.list()?;
    if datasets.is_empty() {
        return Err(Error::InvalidInput(format!(
            "No dataset selected: no datasets found in {}",
            store.config().data_dir.display()
        )));
    }

    writeln!(output, "Available datasets:")?;
    for (i, path) in datasets.iter().enumerate() {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        writeln!(output, "{}. {}", i, name)?;
    }
    prompt(output, "Choose a dataset by number: ")?;

    let path = read_line(input)?
        .and_then(|choice| choice.parse::<usize>().ok())
        .and_then(|i| datasets.get(i))
        .ok_or_else(|| Error::InvalidInput("No dataset selected".to_string()))?;
    let dataset = load_dataset(path)?;
    info!("📚 Loaded dataset: {}", dataset.dataset_name);
    Ok(dataset)
}

/// Single-turn chat loop; every line is answered without conversation history.
pub async fn chat_repl<R: BufRead, W: Write>(
    client: &ModelClient,
    model: &str,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    info!("💬 Starting chat with model: {}", model);
    writeln!(output, "Type 'exit' or 'quit' to end the chat.")?;
    loop {
        prompt(output, "\nYou: ")?;
        let Some(line) = read_line(input)? else {
            break;
        };
        if matches!(line.to_lowercase().as_str(), "exit" | "quit") {
            writeln!(output, "Exiting chat.")?;
            break;
        }
        if let Some(reply) = client.generate(&format_chat_prompt(&line), model).await {
            writeln!(output, "Assistant: {}", reply)?;
        }
    }
    Ok(())
}
