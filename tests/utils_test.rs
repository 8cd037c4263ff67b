use chrono::Utc;
use serde_json::{Value, json};
use spodl::management::TokenManager;
use spodl::spotify::playlist::{ResolveError, collect_page_items, extract_playlist_id};
use spodl::types::{Credential, Token, TrackDescriptor};
use spodl::utils::*;

// Helper function to create a test track descriptor
fn create_test_track(title: &str, artists: &[&str]) -> TrackDescriptor {
    TrackDescriptor {
        title: title.to_string(),
        artists: artists.iter().map(|a| a.to_string()).collect(),
    }
}

// Helper function to create a playlist item as the tracks endpoint returns it
fn create_playlist_item(name: &str, artists: &[&str]) -> Value {
    json!({
        "track": {
            "name": name,
            "artists": artists.iter().map(|a| json!({ "name": a })).collect::<Vec<_>>(),
        }
    })
}

#[test]
fn test_sanitize_file_component() {
    // Unsafe characters become underscores
    assert_eq!(sanitize_file_component("AC/DC"), "AC_DC");
    assert_eq!(sanitize_file_component("a\\b:c*d?e\"f<g>h|i"), "a_b_c_d_e_f_g_h_i");

    // Spaces, dashes and unicode pass through untouched
    assert_eq!(sanitize_file_component("Song A - Artist X"), "Song A - Artist X");
    assert_eq!(sanitize_file_component("Mötley Crüe"), "Mötley Crüe");

    // Control characters are replaced as well
    assert_eq!(sanitize_file_component("a\nb\tc"), "a_b_c");
}

#[test]
fn test_search_query() {
    let track = create_test_track("Song B", &["Artist Y", "Artist Z"]);
    assert_eq!(search_query(&track), "Song B Artist Y Artist Z");

    let track = create_test_track("Song A", &["Artist X"]);
    assert_eq!(search_query(&track), "Song A Artist X");
}

#[test]
fn test_output_file_name() {
    let track = create_test_track("Song A", &["Artist X"]);
    assert_eq!(output_file_name(&track), "Song A - Artist X.mp3");

    // Multiple artists are joined with spaces
    let track = create_test_track("Song B", &["Artist Y", "Artist Z"]);
    assert_eq!(output_file_name(&track), "Song B - Artist Y Artist Z.mp3");
}

#[test]
fn test_output_file_name_sanitizes_components() {
    let track = create_test_track("What/Ever?", &["AC/DC"]);
    assert_eq!(output_file_name(&track), "What_Ever_ - AC_DC.mp3");
}

#[test]
fn test_extract_playlist_id_valid_urls() {
    // Query parameters after the identifier are ignored
    let id = extract_playlist_id(
        "https://open.spotify.com/playlist/28oszO2MY6o97B3yYFkiWO?si=6c6496aa66f842d7&pt=a0e5e4e2",
    )
    .unwrap();
    assert_eq!(id, "28oszO2MY6o97B3yYFkiWO");

    // The marker may sit anywhere in the path
    let id = extract_playlist_id("https://open.spotify.com/user/someone/playlist/abc123").unwrap();
    assert_eq!(id, "abc123");

    // Trailing segments after the identifier are ignored
    let id = extract_playlist_id("https://open.spotify.com/playlist/abc123/tracks").unwrap();
    assert_eq!(id, "abc123");
}

#[test]
fn test_extract_playlist_id_invalid_references() {
    // No playlist marker in the path
    let result = extract_playlist_id("https://open.spotify.com/album/xyz");
    assert!(matches!(result, Err(ResolveError::InvalidReference(_))));

    // Marker present but nothing follows it
    let result = extract_playlist_id("https://open.spotify.com/playlist");
    assert!(matches!(result, Err(ResolveError::InvalidReference(_))));

    // Marker followed by an empty segment only
    let result = extract_playlist_id("https://open.spotify.com/playlist/");
    assert!(matches!(result, Err(ResolveError::InvalidReference(_))));

    // Not a well-formed URL at all
    let result = extract_playlist_id("not a playlist url");
    assert!(matches!(result, Err(ResolveError::InvalidReference(_))));
}

#[test]
fn test_collect_page_items_skips_malformed_items() {
    let items = vec![
        create_playlist_item("Song A", &["Artist X"]),
        // Missing track name
        json!({ "track": { "artists": [{ "name": "Artist Y" }] } }),
        // Artists is not an array
        json!({ "track": { "name": "Song B", "artists": "Artist Z" } }),
        // No track object at all (removed or unavailable item)
        json!({ "track": null }),
        create_playlist_item("Song C", &["Artist W"]),
    ];

    let (tracks, skipped) = collect_page_items(&items);

    assert_eq!(tracks.len(), 2);
    assert_eq!(skipped, 3);
    assert_eq!(tracks[0].title, "Song A");
    assert_eq!(tracks[1].title, "Song C");
}

#[test]
fn test_collect_page_items_preserves_order_and_duplicates() {
    let items = vec![
        create_playlist_item("Song A", &["Artist X"]),
        create_playlist_item("Song B", &["Artist Y"]),
        create_playlist_item("Song A", &["Artist X"]),
    ];

    let (tracks, skipped) = collect_page_items(&items);

    // Duplicates are preserved, not deduplicated
    assert_eq!(skipped, 0);
    let titles: Vec<&str> = tracks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Song A", "Song B", "Song A"]);
}

#[test]
fn test_collect_page_items_filters_empty_artist_names() {
    // Empty artist names are dropped, the rest is kept
    let items = vec![json!({
        "track": {
            "name": "Song A",
            "artists": [{ "name": "" }, { "name": "Artist X" }],
        }
    })];

    let (tracks, skipped) = collect_page_items(&items);
    assert_eq!(skipped, 0);
    assert_eq!(tracks[0].artists, vec!["Artist X"]);

    // An item whose artists are all unusable is skipped
    let items = vec![json!({
        "track": {
            "name": "Song B",
            "artists": [{ "name": "" }, {}],
        }
    })];

    let (tracks, skipped) = collect_page_items(&items);
    assert!(tracks.is_empty());
    assert_eq!(skipped, 1);
}

#[test]
fn test_credential_expiry() {
    let token = Token {
        access_token: "abc".to_string(),
        token_type: "Bearer".to_string(),
        expires_in: 3600,
    };
    let credential = Credential::from_token(token, 1_000_000);

    // Expiry is obtained-at plus lifetime in milliseconds
    assert_eq!(credential.expires_at_ms, 1_000_000 + 3_600_000);

    // Valid strictly before the expiry instant, invalid from then on
    assert!(credential.is_valid(1_000_000));
    assert!(credential.is_valid(1_000_000 + 3_599_999));
    assert!(!credential.is_valid(1_000_000 + 3_600_000));
    assert!(!credential.is_valid(2_000_000_000));
}

#[test]
fn test_credential_authorization_header() {
    let credential = Credential {
        access_token: "abc".to_string(),
        token_type: "Bearer".to_string(),
        expires_at_ms: 0,
    };
    assert_eq!(credential.authorization(), "Bearer abc");
}

#[tokio::test]
async fn test_token_manager_reuses_valid_credential() {
    let now = Utc::now().timestamp_millis() as u64;
    let manager = TokenManager::with_credential(Credential {
        access_token: "cached".to_string(),
        token_type: "Bearer".to_string(),
        expires_at_ms: now + 60_000,
    });

    // Both calls must come out of the cache; a second exchange would fail
    // here anyway since no credentials are configured.
    let first = manager.acquire().await.unwrap();
    let second = manager.acquire().await.unwrap();

    assert_eq!(first.access_token, "cached");
    assert_eq!(second.access_token, "cached");
}
