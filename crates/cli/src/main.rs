//! BMI predictor command line front end
//!
//! Presents the health form in a terminal: numeric fields and selectors are
//! flags, running `predict` is the action, and the result and status strings
//! are printed.

use anyhow::{bail, Context, Result};
use bmi_core::model::{artifact_hash_hex, read_artifact_bounded};
use bmi_core::{
    default_backend, Alcohol, BmiConfig, Diet, Exercise, FormOption, FormSession, Gender,
    LogFormat, ModelState, NumericField, Outcome, RawInputs,
};
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "bmi-predict")]
#[command(about = "Predict BMI from personal health metrics", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Model artifact, overrides the configured path
    #[arg(long, value_name = "PATH")]
    model: Option<PathBuf>,

    /// Log filter, overrides the configured level
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one prediction from the given form values
    Predict(FormArgs),
    /// Fill the form line by line and predict repeatedly
    Interactive,
    /// List selector options and field units
    Options,
    /// Print the BLAKE3 digest of the model artifact
    Hash,
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
struct FormArgs {
    /// Age (yrs)
    #[arg(long)]
    age: String,
    /// Height (cm)
    #[arg(long)]
    height: String,
    /// Weight (kg)
    #[arg(long)]
    weight: String,
    /// Sleep per night (hrs)
    #[arg(long)]
    sleep: String,
    /// Male | Other
    #[arg(long, default_value_t = Gender::default())]
    gender: Gender,
    /// Low | Moderate | High
    #[arg(long, default_value_t = Alcohol::default())]
    alcohol: Alcohol,
    /// Average | Good | Excellent
    #[arg(long, default_value_t = Diet::default())]
    diet: Diet,
    /// 1-2 | 3-5 | Daily
    #[arg(long, default_value_t = Exercise::default())]
    exercise: Exercise,
    /// Smoker
    #[arg(long)]
    smoker: bool,
    /// Has a chronic disease
    #[arg(long)]
    chronic_disease: bool,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

impl From<&FormArgs> for RawInputs {
    fn from(args: &FormArgs) -> Self {
        RawInputs {
            age: args.age.clone(),
            height: args.height.clone(),
            weight: args.weight.clone(),
            sleep_hours: args.sleep.clone(),
            gender: args.gender,
            is_smoker: args.smoker,
            alcohol: args.alcohol,
            diet: args.diet,
            exercise: args.exercise,
            has_chronic_disease: args.chronic_disease,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = BmiConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(model) = &cli.model {
        config.model.path = model.clone();
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    init_logging(&config)?;
    config.validate().context("invalid configuration")?;

    match cli.command {
        Commands::Predict(args) => handle_predict(&config, &args),
        Commands::Interactive => handle_interactive(&config),
        Commands::Options => handle_options(),
        Commands::Hash => handle_hash(&config),
        Commands::Config => handle_config(&config),
    }
}

fn init_logging(config: &BmiConfig) -> Result<()> {
    let level = match config.logging.level.trim() {
        "" => "info",
        level => level,
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match config.logging.format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().compact().with_writer(io::stderr))
            .try_init()?,
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(io::stderr))
            .try_init()?,
    }

    Ok(())
}

fn load_model(config: &BmiConfig) -> ModelState {
    let backend = default_backend();
    info!(
        "Loading model {} with {}",
        config.model.path.display(),
        backend.name()
    );
    ModelState::load(&config.model, backend.as_ref())
}

fn handle_predict(config: &BmiConfig, args: &FormArgs) -> Result<()> {
    let model = load_model(config);
    let mut session = FormSession::with_inputs(RawInputs::from(args));
    let outcome = session.predict(&model);

    if args.json {
        let mut report = serde_json::to_value(session.display())?;
        if let Outcome::Predicted(prediction) = &outcome {
            report["bmi"] = serde_json::json!(prediction.bmi);
            report["category"] = serde_json::json!(prediction.category);
        }
        if let Outcome::Failed(err) = &outcome {
            report["error"] = serde_json::json!({
                "kind": err.kind(),
                "message": err.to_string(),
            });
        }
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_display(&session);
        if let Outcome::Failed(err) = &outcome {
            eprintln!("{}", err);
        }
    }

    Ok(())
}

fn print_display(session: &FormSession) {
    println!("{}", session.display().result);
    println!("{}", session.display().status);
}

const INTERACTIVE_HELP: &str = "\
Commands:
  age|height|weight|sleep <value>
  gender|alcohol|diet|exercise <option>
  smoker|chronic on|off
  predict
  show
  quit";

fn handle_interactive(config: &BmiConfig) -> Result<()> {
    let model = load_model(config);
    let mut session = FormSession::new();

    println!("{}", INTERACTIVE_HELP);
    print_display(&session);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        stdout.flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else { continue };
        let value = parts.collect::<Vec<_>>().join(" ");

        debug!(command, value = %value, "Form command");
        match apply_command(&mut session, command, &value) {
            Ok(Step::Continue) => {}
            Ok(Step::Predict) => {
                session.predict(&model);
                print_display(&session);
            }
            Ok(Step::Show) => {
                println!("{:#?}", session.inputs());
                print_display(&session);
            }
            Ok(Step::Quit) => break,
            Err(err) => println!("{}", err),
        }
    }

    Ok(())
}

enum Step {
    Continue,
    Predict,
    Show,
    Quit,
}

fn apply_command(session: &mut FormSession, command: &str, value: &str) -> Result<Step> {
    let field = match command {
        "age" => Some(NumericField::Age),
        "height" => Some(NumericField::Height),
        "weight" => Some(NumericField::Weight),
        "sleep" => Some(NumericField::Sleep),
        _ => None,
    };
    if let Some(field) = field {
        session.set_text(field, value);
        return Ok(Step::Continue);
    }

    match command {
        "gender" => session.set_gender(value.parse().map_err(anyhow::Error::msg)?),
        "alcohol" => session.set_alcohol(value.parse().map_err(anyhow::Error::msg)?),
        "diet" => session.set_diet(value.parse().map_err(anyhow::Error::msg)?),
        "exercise" => session.set_exercise(value.parse().map_err(anyhow::Error::msg)?),
        "smoker" => session.set_smoker(parse_toggle(value)?),
        "chronic" => session.set_chronic_disease(parse_toggle(value)?),
        "predict" => return Ok(Step::Predict),
        "show" => return Ok(Step::Show),
        "quit" | "exit" => return Ok(Step::Quit),
        "help" => println!("{}", INTERACTIVE_HELP),
        other => bail!("unknown command {:?}, type `help`", other),
    }

    Ok(Step::Continue)
}

fn parse_toggle(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" | "1" => Ok(true),
        "off" | "no" | "false" | "0" => Ok(false),
        other => bail!("expected on or off, got {:?}", other),
    }
}

fn handle_options() -> Result<()> {
    for field in NumericField::ALL {
        println!("{:<10} {}", field.title(), field.unit());
    }
    print_options::<Gender>();
    print_options::<Alcohol>();
    print_options::<Diet>();
    print_options::<Exercise>();
    println!("{:<10} on/off", "Smoker");
    println!("{:<10} on/off", "Chronic");
    Ok(())
}

fn print_options<T: FormOption>() {
    println!("{:<10} {}", T::TITLE, T::labels().join(" | "));
}

fn handle_hash(config: &BmiConfig) -> Result<()> {
    let digest = artifact_digest(config)?;
    println!("{}  {}", digest, config.model.path.display());
    Ok(())
}

fn artifact_digest(config: &BmiConfig) -> Result<String> {
    let bytes = read_artifact_bounded(&config.model)
        .with_context(|| format!("failed to read {}", config.model.path.display()))?;
    Ok(artifact_hash_hex(&bytes))
}

fn handle_config(config: &BmiConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_args_parse() {
        let cli = Cli::try_parse_from([
            "bmi-predict",
            "predict",
            "--age",
            "30",
            "--height",
            "175",
            "--weight",
            "70",
            "--sleep",
            "7",
            "--alcohol",
            "moderate",
            "--exercise",
            "3-5",
            "--smoker",
        ])
        .unwrap();

        let Commands::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        let raw = RawInputs::from(&args);
        assert_eq!(raw.age, "30");
        assert_eq!(raw.gender, Gender::Male);
        assert_eq!(raw.alcohol, Alcohol::Moderate);
        assert_eq!(raw.exercise, Exercise::ThreeToFive);
        assert!(raw.is_smoker);
        assert!(!raw.has_chronic_disease);
    }

    #[test]
    fn test_unknown_option_rejected() {
        let result = Cli::try_parse_from([
            "bmi-predict",
            "predict",
            "--age",
            "30",
            "--height",
            "175",
            "--weight",
            "70",
            "--sleep",
            "7",
            "--diet",
            "junk",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_command() {
        let mut session = FormSession::new();
        assert!(matches!(
            apply_command(&mut session, "weight", "81.5").unwrap(),
            Step::Continue
        ));
        apply_command(&mut session, "diet", "Excellent").unwrap();
        apply_command(&mut session, "chronic", "on").unwrap();

        assert_eq!(session.inputs().weight, "81.5");
        assert_eq!(session.inputs().diet, Diet::Excellent);
        assert!(session.inputs().has_chronic_disease);

        assert!(matches!(
            apply_command(&mut session, "predict", "").unwrap(),
            Step::Predict
        ));
        assert!(apply_command(&mut session, "gender", "robot").is_err());
        assert!(apply_command(&mut session, "smoker", "maybe").is_err());
        assert!(apply_command(&mut session, "dance", "").is_err());
    }

    #[test]
    fn test_hash_honours_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bodexmodel.tflite");
        std::fs::write(&path, [7u8; 256]).unwrap();

        let mut config = BmiConfig::default();
        config.model.path = path;
        config.model.expected_blake3 = Some("0".repeat(64));
        assert_eq!(artifact_digest(&config).unwrap(), artifact_hash_hex(&[7u8; 256]));

        config.model.max_size_bytes = 128;
        let err = artifact_digest(&config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<bmi_core::BmiError>(),
            Some(bmi_core::BmiError::Integrity(_))
        ));
    }

    #[test]
    fn test_predict_without_runtime_reports_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = BmiConfig::default();
        config.model.path = dir.path().join("missing.tflite");

        let model = load_model(&config);
        let mut session = FormSession::new();
        for (field, text) in NumericField::ALL.iter().zip(["30", "175", "70", "7"]) {
            session.set_text(*field, text);
        }
        session.predict(&model);
        assert_eq!(session.display().result, "?");
        assert_eq!(session.display().status, "Model Unavailable");
    }
}
