use serde::Serialize;

use entities::{album, artist, track};
use queries::SearchResults;

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub artists: Vec<artist::Model>,
    pub albums: Vec<AlbumHit>,
    pub tracks: Vec<TrackHit>,
}

#[derive(Serialize)]
pub struct AlbumHit {
    #[serde(flatten)]
    pub album: album::Model,
    pub artist_name: Option<String>,
}

#[derive(Serialize)]
pub struct TrackHit {
    #[serde(flatten)]
    pub track: track::Model,
    pub album_title: Option<String>,
}

impl From<SearchResults> for SearchResponse {
    fn from(results: SearchResults) -> Self {
        SearchResponse {
            query: results.query,
            artists: results.artists,
            albums: results
                .albums
                .into_iter()
                .map(|(album, artist)| AlbumHit {
                    album,
                    artist_name: artist.map(|a| a.name),
                })
                .collect(),
            tracks: results
                .tracks
                .into_iter()
                .map(|(track, album)| TrackHit {
                    track,
                    album_title: album.map(|a| a.title),
                })
                .collect(),
        }
    }
}
