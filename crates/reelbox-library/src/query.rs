use reelbox_core::models::collection::{name_key, Collection, CollectionId};

/// The collection holding `movie_id`, if any.
pub fn find_collection_containing<'a>(
    collections: &'a [Collection],
    movie_id: &str,
) -> Option<&'a Collection> {
    collections.iter().find(|c| c.contains(movie_id))
}

pub fn is_in_any_collection(collections: &[Collection], movie_id: &str) -> bool {
    find_collection_containing(collections, movie_id).is_some()
}

pub fn find_collection<'a>(
    collections: &'a [Collection],
    id: &CollectionId,
) -> Option<&'a Collection> {
    collections.iter().find(|c| &c.id == id)
}

/// Lookup by name under the same trim + case-fold policy used at creation.
pub fn find_by_name<'a>(collections: &'a [Collection], name: &str) -> Option<&'a Collection> {
    let key = name_key(name);
    collections.iter().find(|c| name_key(&c.name) == key)
}

pub fn total_movies(collections: &[Collection]) -> usize {
    collections.iter().map(|c| c.movies.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelbox_core::models::movie::Movie;

    fn fixture() -> Vec<Collection> {
        vec![
            Collection::new("Favorites", vec![Movie::new("tt001", "A")]),
            Collection::new("Watchlist", vec![Movie::new("tt002", "B"), Movie::new("tt003", "C")]),
        ]
    }

    #[test]
    fn test_find_containing() {
        let cols = fixture();
        assert_eq!(
            find_collection_containing(&cols, "tt003").map(|c| c.name.as_str()),
            Some("Watchlist")
        );
        assert!(find_collection_containing(&cols, "tt999").is_none());
        assert!(is_in_any_collection(&cols, "tt001"));
        assert!(!is_in_any_collection(&cols, "tt999"));
    }

    #[test]
    fn test_find_by_name_and_id() {
        let cols = fixture();
        let fav = find_by_name(&cols, " favorites ").unwrap();
        assert_eq!(find_collection(&cols, &fav.id).unwrap().name, "Favorites");
        assert!(find_by_name(&cols, "Fav").is_none());
        assert!(find_collection(&cols, &CollectionId::from("missing")).is_none());
    }

    #[test]
    fn test_total_movies() {
        assert_eq!(total_movies(&fixture()), 3);
        assert_eq!(total_movies(&[]), 0);
    }
}
