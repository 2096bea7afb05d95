mod text;

use clap::{Parser, Subcommand, ValueEnum};
use component_pageflow::{
    PageflowConfig, build_summary, describe_question, list_conditions, new_form, submit_answer,
};
use pageflow_spec::{DisplayLine, Form, services::NOTIFY_SERVICE};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Medical page-flow helper",
    long_about = "Lists conditions, records answers and builds localized summaries for page-flow forms"
)]
struct Cli {
    /// JSON configuration file.
    #[arg(long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,
    /// Directory holding pageflow-<service>.json and <condition>-<service>.json resources.
    #[arg(long, global = true, value_name = "DIR")]
    resources: Option<PathBuf>,
    /// Log aggregation steps to stderr.
    #[arg(long, global = true, alias = "debug")]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List the conditions offered by a service.
    Conditions {
        #[arg(long, default_value = NOTIFY_SERVICE)]
        service: String,
    },
    /// Start a new form for a condition and write it as JSON.
    New {
        #[arg(long)]
        condition: String,
        #[arg(long, default_value = NOTIFY_SERVICE)]
        service: String,
        /// Session language (defaults to the configured language).
        #[arg(long)]
        language: Option<String>,
        /// Write the form here instead of stdout.
        #[arg(long, value_name = "FORM")]
        out: Option<PathBuf>,
    },
    /// Show a question of a form.
    Question {
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
        #[arg(long)]
        id: String,
    },
    /// Answer a question and store the result back into the form file.
    Answer {
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
        #[arg(long)]
        id: String,
        /// Raw answer; repeat for multi-choice questions.
        #[arg(long = "value", value_name = "VALUE", required = true)]
        values: Vec<String>,
    },
    /// Build the summary of a form.
    Summary {
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the JSON schema of the form model.
    Schema,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    let config = load_config(cli.config.as_deref(), cli.resources)?;

    match cli.command {
        Command::Conditions { service } => run_conditions(&config, &service),
        Command::New {
            condition,
            service,
            language,
            out,
        } => run_new(&config, &service, &condition, language.as_deref(), out),
        Command::Question { form, id } => run_question(&form, &id),
        Command::Answer { form, id, values } => run_answer(&config, &form, &id, values),
        Command::Summary { form, format } => run_summary(&config, &form, format),
        Command::Schema => run_schema(),
    }
}

fn init_tracing(verbose: bool) -> CliResult<()> {
    let level = if verbose { "debug" } else { "info" };
    // `pageflow` also matches the `pageflow_spec` target.
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!("pageflow={level},component_pageflow={level}"))
    })?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}

fn load_config(path: Option<&Path>, resources: Option<PathBuf>) -> CliResult<String> {
    let mut config = match path {
        Some(path) => PageflowConfig::from_json(&fs::read_to_string(path)?)?,
        None => PageflowConfig::default(),
    };
    if resources.is_some() {
        config.resource_dir = resources;
    }
    Ok(serde_json::to_string(&config)?)
}

/// Parses a component response, turning `{"error": ...}` into a CLI error.
fn parse_response(payload: &str) -> CliResult<Value> {
    let value: Value = serde_json::from_str(payload)?;
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Err(message.into());
    }
    Ok(value)
}

fn run_conditions(config: &str, service: &str) -> CliResult<()> {
    let response = parse_response(&list_conditions(config, service))?;
    for condition in response["conditions"].as_array().into_iter().flatten() {
        if let Some(id) = condition.as_str() {
            println!("{}", id);
        }
    }
    Ok(())
}

fn run_new(
    config: &str,
    service: &str,
    condition: &str,
    language: Option<&str>,
    out: Option<PathBuf>,
) -> CliResult<()> {
    let form = parse_response(&new_form(config, service, condition, language))?;
    let pretty = serde_json::to_string_pretty(&form)?;
    match out {
        Some(path) => {
            fs::write(&path, pretty)?;
            println!("Created form at {}", path.display());
        }
        None => println!("{}", pretty),
    }
    Ok(())
}

fn run_question(form_path: &Path, id: &str) -> CliResult<()> {
    let form_json = fs::read_to_string(form_path)?;
    let question = parse_response(&describe_question(&form_json, id))?;
    println!("{}", text::describe_question(&question));
    Ok(())
}

fn run_answer(config: &str, form_path: &Path, id: &str, values: Vec<String>) -> CliResult<()> {
    let form_json = fs::read_to_string(form_path)?;
    let answers = serde_json::to_string(&values)?;
    let response = parse_response(&submit_answer(config, &form_json, id, &answers))?;

    if response["status"] == "error" {
        let validation = &response["validation"];
        return Err(format!(
            "{}: {}",
            validation["code"].as_str().unwrap_or("ValidationError"),
            validation["message"].as_str().unwrap_or("invalid answer")
        )
        .into());
    }

    fs::write(form_path, serde_json::to_string_pretty(&response["form"])?)?;
    tracing::debug!(question = id, form = %form_path.display(), "form updated");
    match response["decision"].as_str() {
        Some(decision) => println!("Recorded {} = {}", id, decision),
        None => println!("Recorded {}", id),
    }
    Ok(())
}

fn run_summary(config: &str, form_path: &Path, format: OutputFormat) -> CliResult<()> {
    let form_json = fs::read_to_string(form_path)?;
    let response = parse_response(&build_summary(config, &form_json))?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Text => {
            let lines: Vec<DisplayLine> = serde_json::from_value(response["lines"].clone())?;
            println!("{}", text::render_summary(&lines));
        }
    }
    Ok(())
}

fn run_schema() -> CliResult<()> {
    let schema = schemars::schema_for!(Form);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
