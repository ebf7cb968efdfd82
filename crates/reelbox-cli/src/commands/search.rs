use clap::Args;
use comfy_table::{Cell, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};

use reelbox_core::config::ReelboxConfig;
use reelbox_core::models::movie::{MediaType, Movie};
use reelbox_library::Repository;
use reelbox_omdb::{MetadataClient, SearchFilters, SearchPage};
use reelbox_search::{run_search, Debouncer, SearchQuery};

#[derive(Args)]
pub struct SearchArgs {
    /// Title to search for (omit with --interactive)
    query: Option<String>,
    /// Restrict to movie, series or episode
    #[arg(long = "type")]
    media_type: Option<String>,
    /// Restrict to a release year
    #[arg(long)]
    year: Option<u16>,
    /// Result page (10 results per page)
    #[arg(long)]
    page: Option<u32>,
    /// Read queries line by line from stdin and search as they settle
    #[arg(long, short)]
    interactive: bool,
}

pub async fn run(args: SearchArgs, api_key: Option<&str>) -> anyhow::Result<()> {
    let config = ReelboxConfig::load()?;
    let repo = super::open_repository(&config)?;
    let client = super::metadata_client(&config, api_key)?;

    let media_type = args
        .media_type
        .as_deref()
        .map(str::parse::<MediaType>)
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;
    let filters = SearchFilters {
        media_type,
        year: args.year,
        page: args.page,
    };

    if args.interactive {
        return interactive(client.as_ref(), &repo, &config, filters).await;
    }

    let text = args
        .query
        .ok_or_else(|| anyhow::anyhow!("a query is required unless --interactive is set"))?;
    let query = SearchQuery::new(text).with_filters(filters);
    if !query.is_searchable(config.min_query_len) {
        anyhow::bail!(
            "Query must be at least {} characters long",
            config.min_query_len
        );
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")?
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.set_message(format!("searching \"{}\"", query.text.trim()));
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    let result = run_search(client.as_ref(), &query, config.min_query_len).await;
    spinner.finish_and_clear();

    print_page(&result?, &repo);
    Ok(())
}

async fn interactive(
    client: &dyn MetadataClient,
    repo: &Repository,
    config: &ReelboxConfig,
    filters: SearchFilters,
) -> anyhow::Result<()> {
    let (debouncer, mut settled) = Debouncer::new(config.debounce());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprintln!("Type a title and press enter; Ctrl-D quits.");

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(text) => debouncer.push(text),
                None => break,
            },
            Some(text) = settled.recv() => {
                let query = SearchQuery::new(text).with_filters(filters.clone());
                if query.is_searchable(config.min_query_len) {
                    match run_search(client, &query, config.min_query_len).await {
                        Ok(page) => print_page(&page, repo),
                        Err(e) => eprintln!("Failed to fetch movies: {e}"),
                    }
                }
            }
        }
    }
    Ok(())
}

fn print_page(page: &SearchPage, repo: &Repository) {
    if page.is_empty() {
        println!("No results found.");
        return;
    }
    println!("{}", results_table(&page.movies, repo));
    println!(
        "{} of {} results",
        page.movies.len(),
        page.total_results
    );
}

/// Result listing; the last column names the collection holding each title.
pub fn results_table(movies: &[Movie], repo: &Repository) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["IMDB ID", "TITLE", "YEAR", "TYPE", "COLLECTION"]);
    for movie in movies {
        let collection = match repo.find_collection_containing(&movie.imdb_id) {
            Some(c) => Cell::new(&c.name).fg(Color::Green),
            None => Cell::new("—"),
        };
        table.add_row(vec![
            Cell::new(&movie.imdb_id),
            Cell::new(movie.display_title()),
            Cell::new(movie.year.as_deref().unwrap_or("—")),
            Cell::new(movie.media_type.as_deref().unwrap_or("—")),
            collection,
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelbox_store::{CollectionStore, MemoryKvStore};

    #[test]
    fn test_results_table_marks_collected_titles() {
        let mut repo = Repository::open(CollectionStore::new(Box::new(MemoryKvStore::new())))
            .with_sink(Box::new(reelbox_core::notify::NullSink));
        repo.create_collection("Favorites", vec![Movie::new("tt001", "Alien")])
            .unwrap();

        let movies = vec![Movie::new("tt001", "Alien"), Movie::new("tt002", "Aliens")];
        let rendered = results_table(&movies, &repo).to_string();
        assert!(rendered.contains("Favorites"));
        assert!(rendered.contains("Aliens"));
        assert_eq!(results_table(&movies, &repo).row_iter().count(), 2);
    }
}
