use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use movie_explorer::config::Configuration;
use movie_explorer::debounce::Debouncer;
use movie_explorer::details::{DetailsState, MovieDetailsLoader};
use movie_explorer::favorites::Favorites;
use movie_explorer::http::HttpClient;
use movie_explorer::omdb::OmdbClient;
use movie_explorer::search::{MovieSearch, SearchState};
use movie_explorer::storage::FileStore;
use movie_explorer::trailer::TrailerResolver;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search movies by title
    Search {
        query: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Show full details for an IMDb id
    Details {
        id: String,
        /// Also resolve a trailer link
        #[arg(short, long)]
        trailer: bool,
    },
    /// Resolve a trailer link for a title
    Trailer {
        title: String,
        #[arg(short, long, default_value = "")]
        year: String,
    },
    /// Manage the favorites list
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Read queries from stdin, searching once typing settles
    Interactive,
}

#[derive(Subcommand)]
enum FavoritesAction {
    List,
    Add { id: String },
    Remove { id: String },
    Toggle { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(&cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = Configuration::load(&cli.config)?;
    let http = HttpClient::new()?;
    let omdb = OmdbClient::new(http.clone(), &config.omdb)?;

    match cli.command {
        Command::Search { query, page } => {
            let search = MovieSearch::new(omdb);
            search.search(&query, page).await;
            print_search(&search.state());
        }
        Command::Details { id, trailer } => {
            let loader = MovieDetailsLoader::new(omdb);
            loader.fetch_details(&id).await;
            let state = loader.state();
            print_details(&state);

            if let (true, Some(details)) = (trailer, state.details.as_ref()) {
                let resolver = TrailerResolver::from_config(http, &config.youtube)?;
                resolver.resolve_trailer(&details.title, &details.year).await;
                print_trailer(resolver.trailer_url());
            }
        }
        Command::Trailer { title, year } => {
            let resolver = TrailerResolver::from_config(http, &config.youtube)?;
            resolver.resolve_trailer(&title, &year).await;
            print_trailer(resolver.trailer_url());
        }
        Command::Favorites { action } => {
            let mut favorites = Favorites::new(FileStore::new(config.data_dir()));
            run_favorites(&mut favorites, action, omdb).await?;
        }
        Command::Interactive => run_interactive(&config, omdb).await?,
    }

    Ok(())
}

async fn run_favorites(
    favorites: &mut Favorites<FileStore>,
    action: FavoritesAction,
    omdb: OmdbClient,
) -> Result<()> {
    match action {
        FavoritesAction::List => {}
        FavoritesAction::Remove { id } => favorites.remove(&id),
        FavoritesAction::Toggle { id } if favorites.is_favorite(&id) => favorites.remove(&id),
        FavoritesAction::Add { id } if favorites.is_favorite(&id) => {
            info!("'{}' is already a favorite", id);
        }
        FavoritesAction::Add { id } | FavoritesAction::Toggle { id } => {
            let loader = MovieDetailsLoader::new(omdb);
            loader.fetch_details(&id).await;
            let state = loader.state();
            let Some(details) = state.details else {
                bail!("cannot add '{}': {}", id, state.error_message);
            };
            favorites.add(&details.summary());
        }
    }

    println!("{} favorite(s)", favorites.count());
    for entry in favorites.entries() {
        println!(
            "  {}  {} ({})  added {}",
            entry.movie.id,
            entry.movie.title,
            entry.movie.year,
            entry.added_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}

async fn run_interactive(config: &Configuration, omdb: OmdbClient) -> Result<()> {
    let search = Arc::new(MovieSearch::new(omdb));
    let delay = config.debounce_delay();
    info!("Interactive search, debounce {:?}; end input to quit", delay);

    let debounced = {
        let search = Arc::clone(&search);
        Debouncer::new(delay, move |query: String| {
            let search = Arc::clone(&search);
            async move {
                search.search(&query, 1).await;
                print_search(&search.state());
            }
        })
    };

    let mut pending = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        debug!("Input: {:?}", line);
        pending = Some(debounced.call(line));
    }

    // Nothing can supersede the last call now, so its task runs the search and prints.
    if let Some(last) = pending {
        last.await?;
    }
    Ok(())
}

fn print_search(state: &SearchState) {
    if state.has_error {
        println!("{}", state.error_message);
        return;
    }
    let pagination = state.pagination();
    println!(
        "Page {}/{} ({} results)",
        pagination.current_page, pagination.total_pages, pagination.total_results
    );
    for movie in &state.results {
        println!("  {}  {} ({})", movie.id, movie.title, movie.year);
    }
}

fn print_details(state: &DetailsState) {
    let Some(details) = &state.details else {
        println!("{}", state.error_message);
        return;
    };
    println!("{} ({}) [{}]", details.title, details.year, details.id);
    println!("  {} | {} | {}", details.rated, details.runtime, details.genre);
    println!("  Director: {}", details.director);
    println!("  Cast: {}", details.actors);
    for rating in &details.ratings {
        println!("  {}: {}", rating.source, rating.value);
    }
    if let Some(box_office) = &details.box_office {
        println!("  Box office: {}", box_office);
    }
    println!("  Poster: {}", details.poster_url);
    println!();
    println!("{}", details.plot);
}

fn print_trailer(url: Option<String>) {
    if let Some(url) = url {
        println!("Trailer: {}", url);
    }
}
