use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use bsg::logger::init_logger;
use bsg::{
    generate, ArtifactSink, DirectorySink, GeneratorConfig, MemoryGraph, MemorySink,
    TracingChannel,
};

/// Generate component sources from a behavior model
#[derive(Debug, Parser)]
#[command(name = "bsg", version, about)]
struct Cli {
    /// JSON model document (`{"nodes": [...]}`)
    #[arg(long, short = 'm')]
    model: PathBuf,

    /// Path of the node whose subtree is generated
    #[arg(long, short = 'r', default_value = bsg::ROOT_PATH)]
    root: String,

    /// Write the artifact below this directory instead of keeping it in memory
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,

    /// JSON generator configuration
    #[arg(long, short = 'c', env = "BSG_CONFIG")]
    config: Option<PathBuf>,

    /// Tera template replacing the built-in component template
    #[arg(long, short = 't')]
    template: Option<PathBuf>,

    #[arg(long)]
    artifact_name: Option<String>,

    #[arg(long, short = 'v')]
    verbose: bool,

    #[arg(long, short = 'q')]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Generation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> bsg::Result<()> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::from_file(path).await?,
        None => GeneratorConfig::default(),
    };
    if let Some(template) = cli.template {
        config.template = Some(template);
    }
    if let Some(name) = cli.artifact_name {
        config.artifact_name = name;
    }

    let graph = MemoryGraph::from_file(&cli.model).await?;
    let sink: Box<dyn ArtifactSink> = match cli.out {
        Some(out) => Box::new(DirectorySink::new(out)),
        None => Box::new(MemorySink::new()),
    };

    let result = generate(&graph, &cli.root, sink.as_ref(), &TracingChannel, &config).await?;

    for file in &result.files {
        println!("{}", file);
    }
    println!("content hash:  {}", result.content_hash);
    println!("artifact hash: {}", result.artifact_hash);

    Ok(())
}
