//! Demo catalog generator
//!
//! Produces a plausible catalog for exercising the gallery without real data.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{Map, Value};

use crate::album::Album;
use crate::time::to_iso;

pub const COUNTRIES: &[&str] = &[
    "Argentina", "USA", "UK", "Brasil", "Japón", "Alemania", "Francia", "España", "Canadá",
    "Australia",
];

pub const TAGS: &[&str] = &[
    "Rock", "Pop", "Indie", "Jazz", "Electrónica", "Hip Hop", "Folk", "Metal", "Clásica",
    "Ambient", "Soul", "R&B",
];

const ARTISTS: &[&str] = &[
    "The Beatles", "Pink Floyd", "Radiohead", "Gustavo Cerati", "Charly García",
    "Luis Alberto Spinetta", "Tame Impala", "Daft Punk", "Kendrick Lamar", "David Bowie",
    "Queen", "Led Zeppelin", "Nirvana", "Metallica", "The Strokes",
    "Arctic Monkeys", "Gorillaz", "Coldplay", "Red Hot Chili Peppers", "Foo Fighters",
    "Soda Stereo", "Babasonicos", "Los Abuelos de la Nada", "Sumo", "Virus",
    "Frank Ocean", "Tyler, The Creator", "Kanye West", "Drake", "The Weeknd",
];

const TITLES: &[&str] = &[
    "Abbey Road", "Dark Side of the Moon", "OK Computer", "Bocanada", "Clics Modernos",
    "Artaud", "Currents", "Random Access Memories", "To Pimp a Butterfly", "Blackstar",
    "A Night at the Opera", "IV", "Nevermind", "Master of Puppets", "Is This It",
    "AM", "Demon Days", "Parachutes", "Californication", "The Colour and the Shape",
    "Doble Vida", "Jessico", "Vasos y Besos", "Llegando los Monos", "Locura",
    "Blonde", "IGOR", "My Beautiful Dark Twisted Fantasy", "Take Care", "After Hours",
];

/// First day the catalog could have been added to
pub fn project_start() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

fn random_between<R: Rng>(rng: &mut R, start: DateTime<Utc>, end: DateTime<Utc>) -> DateTime<Utc> {
    let span = (end - start).num_milliseconds();
    if span <= 0 {
        return start;
    }
    start + Duration::milliseconds(rng.gen_range(0..=span))
}

/// Generate `count` albums with ids `1..=count`
pub fn mock_albums<R: Rng>(rng: &mut R, count: usize, now: DateTime<Utc>) -> Vec<Album> {
    let start = project_start();

    (0..count)
        .map(|i| {
            let artist = ARTISTS.choose(rng).copied().unwrap_or_default();
            let title = TITLES.choose(rng).copied().unwrap_or_default();
            let title = if rng.gen_bool(0.2) {
                format!("{} (Deluxe)", title)
            } else {
                title.to_string()
            };

            let date_added = random_between(rng, start, now);
            let last_updated = random_between(rng, date_added, now);

            let tag_count = if rng.gen_bool(0.5) { 2 } else { 1 };
            let tags = TAGS
                .choose_multiple(rng, tag_count)
                .map(|t| t.to_string())
                .collect();

            let mut extra = Map::new();
            extra.insert("lastUpdated".to_string(), Value::String(to_iso(last_updated)));

            Album {
                id: i as i64 + 1,
                artist: artist.to_string(),
                title,
                cover_url: Some(format!("https://picsum.photos/seed/{}/300/300", i)),
                country: COUNTRIES.choose(rng).map(|c| c.to_string()),
                year: Some(rng.gen_range(1960..=2023)),
                tags: Some(tags),
                date_added: Some(to_iso(date_added)),
                extra,
            }
        })
        .collect()
}
