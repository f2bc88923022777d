use std::collections::{HashMap, HashSet};
use std::future::Future;

use common::{Album, AlbumType, Disc, Position, Track};
use sha2::{Digest, Sha256};
use tracing::info;

// Case-insensitive substring markers that flag an album as a soundtrack.
const SOUNDTRACK_INDICATORS: [&str; 4] = ["soundtrack", "ost", "原声", "原创"];

/// Capability that derives album identity digests. Injected so tests can
/// swap in a deterministic stub; production uses [`Sha256Hasher`].
pub trait IdentityHasher {
    fn digest(&self, text: &str) -> impl Future<Output = String> + Send;
}

/// SHA-256 over the UTF-8 bytes of the input, lower-case hex.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Hasher;

impl IdentityHasher for Sha256Hasher {
    async fn digest(&self, text: &str) -> String {
        format!("{:x}", Sha256::digest(text.as_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupingError {
    NegativeDiscNumber { filename: String, no: i32 },
    NegativeTrackNumber { filename: String, no: i32 },
}

impl std::fmt::Display for GroupingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupingError::NegativeDiscNumber { filename, no } => {
                write!(f, "negative disc number {} on {}", no, filename)
            }
            GroupingError::NegativeTrackNumber { filename, no } => {
                write!(f, "negative track number {} on {}", no, filename)
            }
        }
    }
}

impl std::error::Error for GroupingError {}

/// Picks the track number to assign on a disc.
///
/// A non-positive preference appends after the tracks already placed. An
/// explicit free number is kept as-is; a taken number falls back to the
/// smallest positive number not yet used on the disc. The used set only
/// covers tracks placed so far, so the outcome depends on input order.
pub fn resolve_track_number(tracks_on_disc: &[Track], preferred: i32) -> i32 {
    if preferred <= 0 {
        return tracks_on_disc.len() as i32 + 1;
    }
    let used: HashSet<i32> = tracks_on_disc.iter().map(|track| track.track.no).collect();
    if !used.contains(&preferred) {
        return preferred;
    }
    let mut candidate = 1;
    while used.contains(&candidate) {
        candidate += 1;
    }
    candidate
}

/// Checks the album title, and optionally the filename, for a soundtrack
/// marker (case-insensitive substring).
pub fn is_soundtrack_indicator(title: &str, filename: Option<&str>) -> bool {
    let title = title.to_lowercase();
    if SOUNDTRACK_INDICATORS
        .iter()
        .any(|marker| title.contains(marker))
    {
        return true;
    }
    match filename {
        Some(filename) => {
            let filename = filename.to_lowercase();
            SOUNDTRACK_INDICATORS
                .iter()
                .any(|marker| filename.contains(marker))
        }
        None => false,
    }
}

/// First matching rule wins: soundtrack marker in the name, then fewer
/// than two tracks means a single, otherwise a regular album. The other
/// [`AlbumType`] values are only ever set by manual override.
pub fn classify_album(album: &Album) -> AlbumType {
    if is_soundtrack_indicator(&album.name, None) {
        AlbumType::Soundtrack
    } else if album.no_of_tracks < 2 {
        AlbumType::Single
    } else {
        AlbumType::Album
    }
}

/// Rebuilds the album/disc/track hierarchy from scratch.
///
/// Flattens the input in album/disc/track order, folds every track into an
/// accumulator keyed by `digest(album + album_artist)`, resolves disc and
/// track numbering against tracks placed earlier in the pass, classifies
/// each album, and sorts discs and tracks. Albums come back in
/// first-seen-hash order. The input is consumed; output containers share
/// nothing with it.
pub async fn group_and_sort_albums<H: IdentityHasher>(
    hasher: &H,
    input: Vec<Album>,
) -> Result<Vec<Album>, GroupingError> {
    let mut flat = Vec::new();
    for album in input {
        for disc in album.discs {
            for track in disc.tracks {
                if track.disc.no < 0 {
                    return Err(GroupingError::NegativeDiscNumber {
                        no: track.disc.no,
                        filename: track.filename,
                    });
                }
                if track.track.no < 0 {
                    return Err(GroupingError::NegativeTrackNumber {
                        no: track.track.no,
                        filename: track.filename,
                    });
                }
                flat.push(track);
            }
        }
    }
    info!("Regrouping {} tracks", flat.len());

    let mut albums: Vec<Album> = Vec::new();
    let mut by_hash: HashMap<String, usize> = HashMap::new();

    for mut track in flat {
        let album_hash = hasher
            .digest(&format!("{}{}", track.album, track.album_artist))
            .await;
        let slot = match by_hash.get(&album_hash) {
            Some(&slot) => slot,
            None => {
                albums.push(Album {
                    hash: album_hash.clone(),
                    name: track.album.clone(),
                    album_artist: track.album_artist.clone(),
                    no_of_discs: 0,
                    no_of_tracks: 0,
                    album_type: AlbumType::default(),
                    discs: Vec::new(),
                });
                by_hash.insert(album_hash, albums.len() - 1);
                albums.len() - 1
            }
        };
        let album = &mut albums[slot];

        // Disc number 0 means unspecified and lands on disc 1.
        let disc_no = if track.disc.no == 0 { 1 } else { track.disc.no };
        let disc_slot = match album.discs.iter().position(|disc| disc.no == disc_no) {
            Some(slot) => slot,
            None => {
                album.discs.push(Disc {
                    no: disc_no,
                    tracks: Vec::new(),
                });
                album.no_of_discs += 1;
                album.discs.len() - 1
            }
        };
        let disc = &mut album.discs[disc_slot];

        track.track.no = resolve_track_number(&disc.tracks, track.track.no);
        track.disc = Position {
            no: disc_no,
            of: None,
        };
        disc.tracks.push(track);
        album.no_of_tracks += 1;
    }

    for album in &mut albums {
        album.album_type = classify_album(album);
        album.discs.sort_by_key(|disc| disc.no);
        for disc in &mut album.discs {
            // Stable sort; ties from unresolved duplicates keep input order.
            disc.tracks
                .sort_by_key(|track| (track.disc.no, track.track.no));
        }
    }

    info!("Built {} albums", albums.len());
    Ok(albums)
}
