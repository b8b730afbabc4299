//! Deflector CLI entry point.

use clap::Parser;

use deflector::cli::commands::{article, ask, chunk, init, reindex, search};
use deflector::cli::context::load_config;
use deflector::cli::{handle_error, init_logging, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    let _logger = match init_logging(&config.logging) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Init(args) => init::execute(args, config, cli.json).await,
        Commands::Ask(args) => ask::execute(args, config, cli.json).await,
        Commands::Article(args) => article::execute(args, config, cli.json).await,
        Commands::Search(args) => search::execute(args, config, cli.json).await,
        Commands::Reindex(args) => reindex::execute(args, config, cli.json).await,
        Commands::Chunk(args) => chunk::execute(args, config, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
