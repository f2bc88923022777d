use std::env;
use std::fs;

use common::{Album, AlbumType, Disc, Track};
use grouping::{group_and_sort_albums, Sha256Hasher};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let input_path = args
        .next()
        .or_else(|| env::var("LIBRARY_JSON").ok())
        .ok_or("LIBRARY_JSON not set and no input argument")?;
    let output_path = args.next().or_else(|| env::var("OUTPUT_JSON").ok());

    let raw = fs::read_to_string(&input_path)?;
    let albums = parse_input(&raw)?;
    info!("Loaded {} input albums from {}", albums.len(), input_path);

    let regrouped = group_and_sort_albums(&Sha256Hasher, albums).await?;

    let discs: u32 = regrouped.iter().map(|album| album.no_of_discs).sum();
    let tracks: u32 = regrouped.iter().map(|album| album.no_of_tracks).sum();
    println!(
        "Regrouped: {} albums, {} discs, {} tracks",
        regrouped.len(),
        discs,
        tracks
    );

    let json = serde_json::to_string_pretty(&regrouped)?;
    match output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{}", json),
    }

    Ok(())
}

// Accepts either nested albums or a flat track list; a flat list gets
// wrapped in one synthetic album before regrouping.
fn parse_input(raw: &str) -> Result<Vec<Album>, serde_json::Error> {
    match serde_json::from_str::<Vec<Album>>(raw) {
        Ok(albums) => Ok(albums),
        Err(_) => {
            let tracks: Vec<Track> = serde_json::from_str(raw)?;
            Ok(vec![Album {
                hash: String::new(),
                name: String::new(),
                album_artist: String::new(),
                no_of_discs: 1,
                no_of_tracks: tracks.len() as u32,
                album_type: AlbumType::default(),
                discs: vec![Disc { no: 1, tracks }],
            }])
        }
    }
}
