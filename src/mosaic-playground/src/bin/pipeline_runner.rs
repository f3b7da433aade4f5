//! Pipeline Runner - run filter pipelines against demo data
//!
//! Builds the demo registry, then preflights or executes a pipeline
//! described in JSON (or the built-in demo pipeline) and prints the
//! resulting structure and diagnostics.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package mosaic-playground --bin pipeline-runner -- --help
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;

use common_config::MosaicConfig;
use common_error::{MosaicError, MosaicResult};
use mosaic_core::{DataArrayPath, DataContainerArray};
use mosaic_filters::PipelineDefinition;

use mosaic_playground::{
    create_demo_registry, demo_pipeline, init_logging, print_array_preview, print_divider,
    print_header, print_report,
};

/// Pipeline Runner CLI.
#[derive(Parser, Debug)]
#[command(name = "pipeline-runner")]
#[command(about = "Validate and execute Mosaic pipelines against demo data")]
#[command(version)]
struct Args {
    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the built-in demo pipeline
    Demo,

    /// Print the structure of the demo registry
    Structure {
        /// Print as JSON instead of a tree
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print the demo pipeline as JSON
    Example,

    /// Run a pipeline file against the demo registry
    Run {
        /// Pipeline definition (JSON)
        pipeline: PathBuf,

        /// Engine configuration (JSON) replacing the one in the pipeline file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only validate; leave the registry untouched
        #[arg(long, default_value_t = false)]
        preflight_only: bool,

        /// Arrays to preview afterwards, as `container|matrix|array`
        #[arg(short, long, num_args = 1..)]
        show: Vec<String>,
    },
}

fn main() -> MosaicResult<()> {
    let args = Args::parse();
    let _logger = init_logging(args.verbose);

    match args.command {
        Commands::Demo => {
            let shown = ["Image|CellData|Gray_RGB", "Strip|FaceData|Area"].map(String::from);
            run_definition(demo_pipeline(), false, &shown)?;
        }
        Commands::Structure { json } => {
            show_structure(json)?;
        }
        Commands::Example => {
            println!("{}", demo_pipeline().to_json_string()?);
        }
        Commands::Run {
            pipeline,
            config,
            preflight_only,
            show,
        } => {
            let mut definition = PipelineDefinition::from_json_file(&pipeline)?;
            if let Some(path) = config {
                definition.config = MosaicConfig::from_json_file(path)?;
            }
            info!("Loaded {} filters from {}", definition.filters.len(), pipeline.display());
            run_definition(definition, preflight_only, &show)?;
        }
    }

    Ok(())
}

fn show_structure(json: bool) -> MosaicResult<()> {
    let registry = create_demo_registry()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&registry.structure())?);
    } else {
        print_header("Demo Registry");
        print!("{}", registry.structure_tree());
    }
    Ok(())
}

fn run_definition(
    definition: PipelineDefinition,
    preflight_only: bool,
    show: &[String],
) -> MosaicResult<()> {
    let mut registry = create_demo_registry()?;
    let mut pipeline = definition.into_pipeline();

    print_header(&format!("Preflight ({} filters)", pipeline.len()));
    for (i, name) in pipeline.filter_names().iter().enumerate() {
        println!("{:>3}. {name}", i + 1);
    }
    print_divider();
    let (report, scratch) = pipeline.preflight(&registry);
    print_report(&report);
    if !report.is_success() {
        return Err(MosaicError::execution(format!(
            "preflight failed with code {}",
            report.error_code()
        )));
    }
    if preflight_only {
        print_header("Structure After Preflight");
        print!("{}", scratch.structure_tree());
        return Ok(());
    }

    print_header("Execute");
    let report = pipeline.execute(&mut registry, None)?;
    print_report(&report);

    print_header("Structure After Execute");
    print!("{}", registry.structure_tree());
    preview_arrays(&registry, show)?;

    if report.is_success() {
        Ok(())
    } else {
        Err(MosaicError::execution(format!(
            "pipeline failed with code {}",
            report.error_code()
        )))
    }
}

fn preview_arrays(registry: &DataContainerArray, show: &[String]) -> MosaicResult<()> {
    for text in show {
        let path: DataArrayPath = text.parse()?;
        print_header(&format!("Array {path}"));
        print_array_preview(registry.resolve_array(&path)?, 8);
    }
    Ok(())
}
