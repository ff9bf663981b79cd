use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use marquee_model::MovieId;

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "marquee", version)]
#[command(
    about = "Aggregate film metadata from TMDB into one enriched JSON record"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to marquee.toml (defaults to ./marquee.toml or ./config/marquee.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to a .env file loaded before reading the environment
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Worker pool size (overrides config)
    #[arg(long, global = true, value_parser = parse_capacity)]
    pub pool_capacity: Option<usize>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Aggregate a single movie by TMDB id
    Movie {
        #[arg(value_parser = parse_movie_id)]
        id: MovieId,
    },
    /// Aggregate one page of popular movies
    Popular {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Search movies by title and aggregate one page of results
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

fn parse_movie_id(raw: &str) -> Result<MovieId, String> {
    let value: u64 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a movie id"))?;
    MovieId::new(value).ok_or_else(|| "movie id must be positive".to_string())
}

fn parse_capacity(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("pool capacity must be at least 1".to_string()),
        Ok(value) => Ok(value),
        Err(_) => Err(format!("'{raw}' is not a pool capacity")),
    }
}
