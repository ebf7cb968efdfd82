use clap::Args;
use reelbox_core::config::ReelboxConfig;
use reelbox_core::models::movie::{present, Movie};

#[derive(Args)]
pub struct MovieArgs {
    /// IMDb id (e.g. tt0078748)
    id: String,
}

pub async fn run(args: MovieArgs, api_key: Option<&str>) -> anyhow::Result<()> {
    let config = ReelboxConfig::load()?;
    let repo = super::open_repository(&config)?;
    let client = super::metadata_client(&config, api_key)?;

    let movie = client
        .fetch_by_id(&args.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Movie not found"))?;

    print!("{}", render_details(&movie));
    match repo.find_collection_containing(&movie.imdb_id) {
        Some(collection) => println!("Collection:  {}", collection.name),
        None => println!("Collection:  none (use `reelbox collection add`)"),
    }
    Ok(())
}

/// Detail view for a single title. Missing and `N/A` fields are skipped.
pub fn render_details(movie: &Movie) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: Option<&str>| {
        if let Some(v) = present(value) {
            out.push_str(&format!("{label:<12} {v}\n"));
        }
    };

    line("Title:", Some(movie.display_title()));
    line("Year:", movie.year.as_deref());
    line("Type:", movie.media_type.as_deref());
    line("Runtime:", movie.runtime.as_deref());
    line("Genre:", movie.genre.as_deref());
    line("Director:", movie.director.as_deref());
    line("Actors:", movie.actors.as_deref());
    line("IMDb:", movie.imdb_rating.as_deref());
    line("Poster:", movie.poster_url());
    line("Plot:", movie.plot.as_deref());

    if let Some(ratings) = &movie.ratings {
        for rating in ratings {
            out.push_str(&format!("{:<12} {} ({})\n", "Rating:", rating.value, rating.source));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelbox_core::models::movie::Rating;

    #[test]
    fn test_render_skips_missing_fields() {
        let mut movie = Movie::new("tt0078748", "Alien");
        movie.year = Some("1979".into());
        movie.poster = Some("N/A".into());
        movie.ratings = Some(vec![Rating {
            source: "Rotten Tomatoes".into(),
            value: "93%".into(),
        }]);

        let text = render_details(&movie);
        assert!(text.contains("Title:       Alien"));
        assert!(text.contains("Year:        1979"));
        assert!(text.contains("93% (Rotten Tomatoes)"));
        assert!(!text.contains("Poster"));
        assert!(!text.contains("Plot"));
    }
}
