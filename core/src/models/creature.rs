use serde::{Deserialize, Serialize};

/// A creature record as presented on a card. Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Creature {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
    pub image_url: String,
}

impl Creature {
    /// Create a creature, deriving its artwork URL from the id
    pub fn new(id: u32, name: impl Into<String>, types: Vec<String>, artwork_base: &str) -> Self {
        Self {
            id,
            name: name.into(),
            types,
            image_url: artwork_url(artwork_base, id),
        }
    }

    /// Comma separated type list, e.g. `electric, flying`
    pub fn types_label(&self) -> String {
        self.types.join(", ")
    }
}

/// `<artwork_base>/<id>.png`
pub fn artwork_url(artwork_base: &str, id: u32) -> String {
    format!("{}/{}.png", artwork_base.trim_end_matches('/'), id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creature_creation() {
        let creature = Creature::new(
            25,
            "Pikachu",
            vec!["electric".to_string()],
            "https://img.example/artwork/",
        );
        assert_eq!(creature.id, 25);
        assert_eq!(creature.name, "Pikachu");
        assert_eq!(creature.image_url, "https://img.example/artwork/25.png");
    }

    #[test]
    fn test_types_label() {
        let creature = Creature::new(
            6,
            "Charizard",
            vec!["fire".to_string(), "flying".to_string()],
            "https://img.example",
        );
        assert_eq!(creature.types_label(), "fire, flying");
    }
}
