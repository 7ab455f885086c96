//! The `graypipe process` command.

use std::path::PathBuf;

use clap::Args;
use graypipe_core::{shutdown_channel, Config, ImageProcessor};

/// Arguments for the `process` command.
#[derive(Args, Debug, Default)]
pub struct ProcessArgs {
    /// Image files or directories to process (defaults to `paths.inputs` from config)
    pub inputs: Vec<PathBuf>,

    /// Execution mode: "concurrent" or "sequential" (anything else runs concurrently)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Directory prefix replaced when deriving output paths
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Directory output paths are rewritten into
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Capacity of each hand-off queue between stages
    #[arg(long)]
    pub buffer_size: Option<usize>,

    /// Longest edge of the resized output
    #[arg(long)]
    pub max_dimension: Option<u32>,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub summary_json: bool,
}

/// Apply command-line overrides on top of the loaded config and re-validate.
pub fn apply_overrides(args: &ProcessArgs, config: &mut Config) -> anyhow::Result<()> {
    if let Some(mode) = &args.mode {
        config.pipeline.mode = mode.clone();
    }
    if let Some(dir) = &args.input_dir {
        config.paths.input_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.paths.output_dir = dir.clone();
    }
    if let Some(size) = args.buffer_size {
        config.pipeline.buffer_size = size;
    }
    if let Some(bound) = args.max_dimension {
        config.resize.max_dimension = bound;
    }
    config.validate()?;
    Ok(())
}

/// Execute the process command.
pub async fn execute(args: ProcessArgs, mut config: Config) -> anyhow::Result<()> {
    apply_overrides(&args, &mut config)?;
    let processor = ImageProcessor::new(&config);

    let inputs = if args.inputs.is_empty() {
        config.inputs()
    } else {
        args.inputs.clone()
    };
    if inputs.is_empty() {
        tracing::warn!("No inputs given on the command line or in paths.inputs");
        return Ok(());
    }

    let paths = processor.expand_inputs(&inputs);
    tracing::info!(
        "Processing {} image(s) in {} mode",
        paths.len(),
        processor.mode()
    );

    let (trigger, signal) = shutdown_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight work");
            trigger.trigger();
        }
    });

    let summary = processor.run(paths, signal).await?;

    if summary.interrupted {
        tracing::warn!(
            "Run interrupted: {} of {} input(s) saved",
            summary.saved,
            summary.inputs
        );
    }
    if args.summary_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
