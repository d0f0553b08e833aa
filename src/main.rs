mod cli;
mod db;
mod error;
mod extractor;
mod fmt;
mod intake;
mod models;
mod settings;
mod store;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Ingest { file } => cli::ingest::run(&file),
        Commands::List { category, limit } => cli::list::run(category.as_deref(), limit),
        Commands::Show { id } => cli::show::run(id),
        Commands::Export { category, output } => cli::export::run(category.as_deref(), &output),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
