use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use plugpack::{logger, pipeline, GlobalOpts};

#[derive(Parser)]
#[command(name = "plugpack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Hybrid application plugin packager",
    long_about = "Packages a hybrid application (script bundle plus optional compiled native extension) into a single distributable plugin archive."
)]
struct Cli {
    /// Project root to package (defaults to the current directory)
    root: Option<PathBuf>,

    #[command(flatten)]
    global: GlobalOpts,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_with_verbosity(cli.global.verbosity_level()) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    if cli.global.verbosity_level() >= 2 {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    let root = cli.root.unwrap_or_else(|| PathBuf::from("."));

    match pipeline::run(&root) {
        Ok(dist_path) => {
            logger::success(&format!("Plugin packaged: {}", dist_path.display()));
        }
        Err(e) => {
            logger::error(&e.to_string());
            logger::show_log_path();
            std::process::exit(1);
        }
    }
}
