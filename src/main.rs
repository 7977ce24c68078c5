#![allow(non_snake_case)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use RustyBear_Skeleton::environment::config::Config;
use RustyBear_Skeleton::logging;
use RustyBear_Skeleton::render::renderer::TraceBackend;

#[derive(Parser)]
#[command(name = "skeleton", about = "Build, animate and inspect joint hierarchies")]
struct Cli {
    /// Editor configuration, created with defaults when missing.
    #[arg(long, default_value = "config/config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a hierarchy file and print every joint with its family.
    Inspect { file: PathBuf },
    /// Build a three joint arm, play it forward headlessly and save the end pose.
    Demo {
        #[arg(long)]
        out: Option<PathBuf>,
        /// Playback slider value in seconds (0.5 to 3). Each playback runs half of it.
        #[arg(long)]
        duration: Option<f32>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = Config::new(&cli.config).into_editor_config();
    logging::init(logging::level_from_str(&config.log_level));

    match cli.command {
        Commands::Inspect { file } => match RustyBear_Skeleton::inspect(config, &file) {
            Ok(editor) => {
                for (id, node) in editor.scene().joints() {
                    if let Some(family) = editor.family(id) {
                        println!(
                            "{} at {} rotated {} | {}",
                            node.name,
                            editor.scene().world_position(id).unwrap_or(node.position),
                            node.rotation,
                            family
                        );
                    }
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Could not inspect {}. {}", file.display(), e);
                ExitCode::FAILURE
            }
        },
        Commands::Demo { out, duration } => {
            if let Some(seconds) = duration {
                config.set_playback_duration(seconds);
            }
            let out = out.unwrap_or_else(|| config.hierarchy_file.clone());

            let mut backend = TraceBackend::default();
            let editor = match RustyBear_Skeleton::demo_session(config, &mut backend) {
                Ok(editor) => editor,
                Err(e) => {
                    log::error!("Demo failed. {}", e);
                    return ExitCode::FAILURE;
                }
            };
            log::info!("Drew {} primitives and {} lines", backend.primitives(), backend.lines);

            match editor.save(&out) {
                Ok(_) => ExitCode::SUCCESS,
                Err(e) => {
                    log::error!("Could not save {}. {}", out.display(), e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}
