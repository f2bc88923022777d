use serde::{Deserialize, Serialize};

/// Disc or track position within a release. `no == 0` means unspecified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub no: i32,
    #[serde(default)]
    pub of: Option<i32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Picture {
    pub format: String,
    pub data: Vec<u8>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Track {
    pub filename: String,
    pub hash: String,
    pub album: String,
    pub album_artist: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub artists: Vec<String>,
    pub title: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub bits_per_sample: Option<u16>,
    #[serde(default)]
    pub sample_rate: Option<u32>,
    pub disc: Position,
    pub track: Position,
    #[serde(default)]
    pub pictures: Vec<Picture>,
    #[serde(default)]
    pub is_instrumental: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Disc {
    pub no: i32,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlbumType {
    #[default]
    Album,
    Single,
    Soundtrack,
    Compilation,
    Live,
    Remix,
    Other,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Album {
    pub hash: String,
    pub name: String,
    pub album_artist: String,
    pub no_of_discs: u32,
    pub no_of_tracks: u32,
    #[serde(default)]
    pub album_type: AlbumType,
    #[serde(default)]
    pub discs: Vec<Disc>,
}
