use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Creature;

/// The persisted form of a creature the user swiped right on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LikedCreature {
    pub id: u32,
    pub name: String,
    pub image_url: String,
    pub types: Vec<String>,
    /// Absent in records written before the timestamp was tracked
    #[serde(default)]
    pub liked_at: Option<DateTime<Utc>>,
}

impl LikedCreature {
    /// Derive the liked record from a fetched creature
    pub fn from_creature(creature: &Creature) -> Self {
        Self {
            id: creature.id,
            name: creature.name.clone(),
            image_url: creature.image_url.clone(),
            types: creature.types.clone(),
            liked_at: Some(Utc::now()),
        }
    }
}

impl From<&Creature> for LikedCreature {
    fn from(creature: &Creature) -> Self {
        Self::from_creature(creature)
    }
}
