mod verbose;

use clap::{FromArgMatches as _, IntoApp as _, Parser, Subcommand};
use tracing_error::ErrorLayer;
use tracing_subscriber::{prelude::*, EnvFilter, Registry};
use twelf::Layer;

use storyfront_common::Conf;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    #[clap(flatten)]
    verbose: verbose::Verbosity,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the post grid, the story viewer and the posts proxy
    Serve,
    /// Write every post as a JSON line to stdout
    Export {
        /// Stop after this many pages
        #[clap(long)]
        pages: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<(), storyfront_common::Report> {
    storyfront_common::install()?;

    let matches = Cli::command().args(&Conf::clap_args()).get_matches();
    let cli = Cli::from_arg_matches(&matches)?;
    let conf = Conf::with_layers(&[
        Layer::Json("storyfront.json".into()),
        Layer::Toml("storyfront.toml".into()),
        Layer::Env(Some("STORYFRONT_".to_string())),
        Layer::Clap(matches),
    ])?;

    let subscriber = Registry::default()
        .with(ErrorLayer::default())
        .with(tracing_subscriber::fmt::Layer::default().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(cli.verbose.log_level_filter().into()));

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Serve => storyfront_command_serve::run(&conf).await?,
        Commands::Export { pages } => storyfront_command_export::run(&conf, pages).await?,
    }

    Ok(())
}
