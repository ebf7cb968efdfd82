use chrono::Local;
use clap::Subcommand;
use comfy_table::{Cell, Color, Table};

use reelbox_core::config::ReelboxConfig;
use reelbox_core::models::collection::Collection;
use reelbox_core::notify::NotificationSink;
use reelbox_library::Repository;

use super::Reported;
use crate::notify::ConsoleSink;

#[derive(Subcommand)]
pub enum CollectionAction {
    /// List collections
    List,
    /// Show the titles in a collection
    Show {
        /// Collection name
        name: String,
    },
    /// Create a collection
    Create {
        /// Collection name
        name: String,
        /// Seed the collection with this title, moving it out of any other collection
        #[arg(long = "with")]
        with_movie: Option<String>,
    },
    /// Delete a collection (its titles are not deleted elsewhere)
    Delete {
        /// Collection name
        name: String,
    },
    /// Add a title to a collection, moving it if it is in another one
    Add {
        /// Collection name
        name: String,
        /// IMDb id
        id: String,
    },
    /// Remove a title from a collection
    Remove {
        /// Collection name
        name: String,
        /// IMDb id
        id: String,
    },
    /// Move a title into a new collection
    Move {
        /// IMDb id
        id: String,
        /// Name of the collection to create
        new_name: String,
    },
    /// Print a shareable summary of a collection
    Share {
        /// Collection name
        name: String,
    },
}

pub async fn run(action: CollectionAction, api_key: Option<&str>) -> anyhow::Result<()> {
    let config = ReelboxConfig::load()?;
    let mut repo = super::open_repository(&config)?;

    match action {
        CollectionAction::List => {
            if repo.list_collections().is_empty() {
                println!("No collections yet. Use `reelbox collection create` to make one.");
                return Ok(());
            }
            println!("{}", collections_table(repo.list_collections()));
            println!(
                "\n{} collections, {} titles total",
                repo.list_collections().len(),
                repo.total_movies()
            );
        }
        CollectionAction::Show { name } => {
            let collection = find(&repo, &name)?;
            println!("{} ({})", collection.name, collection.movies.len());
            if let Some(created) = collection.created_at {
                println!(
                    "Created {}",
                    created.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                );
            }
            if collection.movies.is_empty() {
                println!("  (empty)");
            }
            for movie in &collection.movies {
                println!(
                    "  {:<12} {} ({})",
                    movie.imdb_id,
                    movie.display_title(),
                    movie.year.as_deref().unwrap_or("?")
                );
            }
        }
        CollectionAction::Create { name, with_movie } => match with_movie {
            Some(id) => {
                let movie = super::resolve_movie(&repo, &config, api_key, &id).await?;
                repo.move_to_new_collection(movie, &name)
                    .map_err(Reported::from)?;
            }
            None => {
                repo.create_collection(&name, Vec::new())
                    .map_err(Reported::from)?;
            }
        },
        CollectionAction::Delete { name } => {
            let id = find(&repo, &name)?.id.clone();
            repo.delete_collection(&id).map_err(Reported::from)?;
        }
        CollectionAction::Add { name, id } => {
            let target = find(&repo, &name)?;
            if let Some(existing) = target.get(&id) {
                let message = format!(
                    "\"{}\" is already in this collection",
                    existing.display_title()
                );
                ConsoleSink.notify_failure(&message);
                return Err(Reported(message).into());
            }
            let target_id = target.id.clone();

            let movie = super::resolve_movie(&repo, &config, api_key, &id).await?;
            let outcome = repo
                .add_to_collection(&target_id, movie)
                .map_err(Reported::from)?;
            tracing::debug!(?outcome, collection = %target_id, "add finished");
        }
        CollectionAction::Remove { name, id } => {
            let collection_id = find(&repo, &name)?.id.clone();
            if repo
                .remove_from_collection(&collection_id, &id)
                .map_err(Reported::from)?
                .is_none()
            {
                println!("'{id}' is not in \"{name}\"; nothing to remove");
            }
        }
        CollectionAction::Move { id, new_name } => {
            let movie = super::resolve_movie(&repo, &config, api_key, &id).await?;
            repo.move_to_new_collection(movie, &new_name)
                .map_err(Reported::from)?;
        }
        CollectionAction::Share { name } => {
            println!("{}", find(&repo, &name)?.share_text());
        }
    }

    Ok(())
}

fn find<'a>(repo: &'a Repository, name: &str) -> anyhow::Result<&'a Collection> {
    repo.find_by_name(name)
        .ok_or_else(|| anyhow::anyhow!("Collection '{}' not found", name))
}

/// Overview of all collections in creation order.
pub fn collections_table(collections: &[Collection]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["NAME", "TITLES", "LATEST", "ID"]);
    for collection in collections {
        let latest = collection
            .movies
            .last()
            .map(|m| m.display_title().to_string())
            .unwrap_or_else(|| "—".to_string());
        let count = if collection.movies.is_empty() {
            Cell::new("0").fg(Color::DarkGrey)
        } else {
            Cell::new(collection.movies.len().to_string())
        };
        table.add_row(vec![
            Cell::new(&collection.name).fg(Color::Cyan),
            count,
            Cell::new(latest),
            Cell::new(collection.id.as_str()),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelbox_core::models::movie::Movie;

    #[test]
    fn test_collections_table_rows() {
        let collections = vec![
            Collection::new("Favorites", vec![Movie::new("tt1", "Alien"), Movie::new("tt2", "Heat")]),
            Collection::new("Empty", Vec::new()),
        ];
        let rendered = collections_table(&collections).to_string();
        assert!(rendered.contains("Favorites"));
        assert!(rendered.contains("Heat"));
        assert!(rendered.contains("Empty"));
    }
}
