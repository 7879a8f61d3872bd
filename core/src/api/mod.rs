mod client;
mod image_cache;

pub use client::{parse_creature, ApiEndpoints, CreatureSource, PokeApiClient};
pub use image_cache::{ImageCache, DEFAULT_IMAGE_CAPACITY};

/// Creature endpoint of the public PokeAPI
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2/pokemon";

/// Official artwork directory; files are named `<id>.png`
pub const DEFAULT_ARTWORK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";
