mod config;
mod controller;
mod export;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{GeminiClient, ModelBackend, SceneEditor, Studio};
use shared::domain::{EditMode, EditRequest, ExplanationContext, SceneResult, Style};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};

use config::{load_settings, Settings};
use controller::{
    commands::{parse_command, SessionCommand, HELP},
    events::{UiError, UiErrorContext},
};

#[derive(Parser, Debug)]
#[command(name = "mnemonic-studio", about = "Visual mnemonic scenes from medical text")]
struct Cli {
    /// Config file (defaults to ./mnemonic.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// context-aware or context-free; overrides the configured mode.
    #[arg(long)]
    edit_mode: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one scene and save it.
    Generate {
        #[arg(long)]
        style: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(required = true, trailing_var_arg = true)]
        topic: Vec<String>,
    },
    /// Edit a local image once. `--title` and `--point` supply the
    /// explanation context for context-aware edits.
    Edit {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        title: Option<String>,
        #[arg(long = "point")]
        points: Vec<String>,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(required = true, trailing_var_arg = true)]
        instruction: Vec<String>,
    },
    /// Interactive generate/edit loop over stdin.
    Session {
        #[arg(long)]
        style: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => return Err(startup_failure(format!("{err:#}"))),
    };
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .with_writer(std::io::stderr)
        .init();

    if let Some(raw) = cli.edit_mode.as_deref() {
        match EditMode::parse(raw) {
            Some(mode) => settings.edit_mode = mode,
            None => {
                return Err(startup_failure(format!(
                    "unknown edit mode '{raw}' (use context-aware or context-free)"
                )))
            }
        }
    }

    let backend = match build_backend(&settings) {
        Ok(backend) => backend,
        Err(err) => return Err(startup_failure(format!("{err:#}"))),
    };
    info!(
        base_url = %settings.api_base_url,
        text_model = %settings.text_model,
        image_model = %settings.image_model,
        edit_model = %settings.edit_model,
        edit_mode = settings.edit_mode.label(),
        "studio ready"
    );

    match cli.command {
        Command::Generate { style, out, topic } => {
            let style = resolve_style(style.as_deref(), settings.default_style);
            let mut studio = Studio::new(backend, settings.edit_mode);
            let scene = match studio.generate(&topic.join(" "), style).await {
                Ok(scene) => scene,
                Err(err) => {
                    let ui = UiError::from_studio(UiErrorContext::Generate, &err);
                    report(&ui);
                    return Err(err.into());
                }
            };
            print_scene(scene);
            save(scene, out.as_deref(), &settings)?;
        }
        Command::Edit {
            image,
            title,
            points,
            out,
            instruction,
        } => {
            run_single_edit(
                backend,
                &settings,
                image,
                title,
                points,
                out,
                &instruction.join(" "),
            )
            .await?;
        }
        Command::Session { style } => {
            let style = resolve_style(style.as_deref(), settings.default_style);
            run_session(Studio::new(backend, settings.edit_mode), style, &settings).await?;
        }
    }

    Ok(())
}

fn build_backend(settings: &Settings) -> Result<Arc<dyn ModelBackend>> {
    let client = GeminiClient::new(settings.gemini_config()?)?;
    Ok(Arc::new(client))
}

fn startup_failure(message: String) -> anyhow::Error {
    let ui = UiError::from_message(UiErrorContext::Startup, message);
    eprintln!("{}", ui.banner());
    anyhow::anyhow!(ui.message().to_string())
}

fn report(ui: &UiError) {
    error!(
        category = ?ui.category(),
        context = ?ui.context(),
        detail = ui.message(),
        "operation failed"
    );
    eprintln!("{}", ui.banner());
}

fn resolve_style(raw: Option<&str>, default: Style) -> Style {
    let Some(raw) = raw else {
        return default;
    };
    if Style::parse_known(raw).is_none() {
        warn!(requested = raw, fallback = %Style::FALLBACK, "unknown style");
    }
    Style::from_tag(raw)
}

fn print_scene(scene: &SceneResult) {
    println!("{}", scene.explanation_key());
}

fn save(
    scene: &SceneResult,
    requested: Option<&std::path::Path>,
    settings: &Settings,
) -> Result<()> {
    match export::save_scene(scene, requested, &settings.output_dir) {
        Ok(path) => {
            println!("saved {}", path.display());
            Ok(())
        }
        Err(err) => {
            report(&UiError::from_message(UiErrorContext::Export, format!("{err:#}")));
            Err(err)
        }
    }
}

async fn run_single_edit(
    backend: Arc<dyn ModelBackend>,
    settings: &Settings,
    image: PathBuf,
    title: Option<String>,
    points: Vec<String>,
    out: Option<PathBuf>,
    instruction: &str,
) -> Result<()> {
    let base_image = match export::read_image_as_data_uri(&image) {
        Ok(uri) => uri,
        Err(err) => {
            report(&UiError::from_message(UiErrorContext::Edit, format!("{err:#}")));
            return Err(err);
        }
    };

    let context = match (settings.edit_mode, title) {
        (EditMode::ContextAware, Some(title)) => Some(ExplanationContext {
            title,
            explanation_points: points,
        }),
        (EditMode::ContextAware, None) => {
            warn!("context-aware edit without --title; sending the instruction as-is");
            None
        }
        (EditMode::ContextFree, _) => None,
    };
    let request = EditRequest {
        base_image,
        instruction: instruction.to_string(),
        context,
    };
    info!(mode = request.mode().label(), image = %image.display(), "editing image");

    let result = match SceneEditor::new(backend).edit(&request).await {
        Ok(result) => result,
        Err(err) => {
            let err = client_core::error::StudioError::from(err);
            report(&UiError::from_studio(UiErrorContext::Edit, &err));
            return Err(err.into());
        }
    };

    let scene = match request.context {
        Some(mut context) => {
            context.explanation_points.extend(result.appended_explanation_point.clone());
            SceneResult {
                title: context.title,
                explanation_points: context.explanation_points,
                image: result.image,
            }
        }
        None => SceneResult {
            title: image
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Edited scene".to_string()),
            explanation_points: Vec::new(),
            image: result.image,
        },
    };
    if let Some(point) = &result.appended_explanation_point {
        println!("new explanation point: {point}");
    }
    if let Some(note) = &result.model_note {
        println!("model note: {note}");
    }
    save(&scene, out.as_deref(), settings)
}

async fn run_session(mut studio: Studio, mut style: Style, settings: &Settings) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");

    loop {
        let prompt = format!("[{} | {}] > ", style, studio.state().edit_mode().label());
        stdout.write_all(prompt.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        tracing::debug!(command = command.name(), "session command");

        match command {
            SessionCommand::Generate { topic } => {
                println!("generating...");
                match studio.generate(&topic, style).await {
                    Ok(scene) => print_scene(scene),
                    Err(err) => report(&UiError::from_studio(UiErrorContext::Generate, &err)),
                }
            }
            SessionCommand::Edit { instruction } => {
                println!("editing...");
                let edited = match studio.edit(&instruction).await {
                    Ok(scene) => {
                        print_scene(scene);
                        true
                    }
                    Err(err) => {
                        report(&UiError::from_studio(UiErrorContext::Edit, &err));
                        false
                    }
                };
                if let Some(note) = studio.state().model_note().filter(|_| edited) {
                    println!("model note: {note}");
                }
            }
            SessionCommand::SetStyle {
                style: next,
                recognized,
            } => {
                if !recognized {
                    println!("unknown style, using {next}");
                }
                style = next;
            }
            SessionCommand::SetMode(mode) => {
                studio.set_edit_mode(mode);
                println!("edit mode: {}", mode.label());
            }
            SessionCommand::Show => match studio.state().scene() {
                Some(scene) => print_scene(scene),
                None => println!("no scene yet; use 'generate <text>'"),
            },
            SessionCommand::Save { path } => match studio.state().scene() {
                Some(scene) => {
                    // Export failures are already reported; the session continues.
                    let _ = save(scene, path.as_deref(), settings);
                }
                None => println!("no scene to save"),
            },
            SessionCommand::Help => println!("{HELP}"),
            SessionCommand::Quit => break,
        }
    }

    Ok(())
}
