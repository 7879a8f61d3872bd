use std::collections::HashSet;

use log::{debug, warn};
use rand::Rng;

use crate::api::CreatureSource;
use crate::models::Creature;
use crate::{Error, Result};

/// Highest creature id drawn by default
pub const DEFAULT_MAX_ID: u32 = 898;

/// Draws attempted before accepting an already-seen creature
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Bounds for the random draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    pub max_id: u32,
    pub max_attempts: u32,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_id: DEFAULT_MAX_ID,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl FetchPolicy {
    pub fn validate(&self) -> Result<()> {
        if self.max_id == 0 {
            return Err(Error::InvalidInput("max_id must be at least 1".to_string()));
        }
        if self.max_attempts == 0 {
            return Err(Error::InvalidInput("max_attempts must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Fetch a random creature, preferring ids not in `seen`.
///
/// Each attempt draws a fresh id in `1..=max_id`. A seen id or a failed
/// request moves on to the next draw. Once `max_attempts` draws are used up
/// the last creature that was fetched is returned even though it was seen;
/// only when every attempt failed is the last error returned.
pub async fn random_creature<S, R>(
    source: &S,
    seen: &HashSet<u32>,
    policy: &FetchPolicy,
    rng: &mut R,
) -> Result<Creature>
where
    S: CreatureSource + ?Sized,
    R: Rng,
{
    policy.validate()?;

    let mut last_creature = None;
    let mut last_error = None;

    for attempt in 1..=policy.max_attempts {
        let id = rng.gen_range(1..=policy.max_id);
        match source.fetch_creature(id).await {
            Ok(creature) if !seen.contains(&id) => {
                source.warm_image(&creature);
                return Ok(creature);
            }
            Ok(creature) => {
                debug!("draw {}/{}: creature {} already seen", attempt, policy.max_attempts, id);
                last_creature = Some(creature);
            }
            Err(e) => {
                warn!("draw {}/{}: fetching creature {} failed: {}", attempt, policy.max_attempts, id, e);
                last_error = Some(e);
            }
        }
    }

    match last_creature {
        Some(creature) => {
            source.warm_image(&creature);
            Ok(creature)
        }
        None => Err(last_error
            .unwrap_or_else(|| Error::Api("no creature could be fetched".to_string()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSource {
        calls: Mutex<Vec<u32>>,
        warmed: Mutex<Vec<u32>>,
        failing: HashSet<u32>,
        fail_all: bool,
    }

    #[async_trait]
    impl CreatureSource for FakeSource {
        async fn fetch_creature(&self, id: u32) -> Result<Creature> {
            self.calls.lock().unwrap().push(id);
            if self.fail_all || self.failing.contains(&id) {
                return Err(Error::Api(format!("HTTP 500 while fetching creature {}", id)));
            }
            Ok(Creature::new(id, format!("Creature {}", id), vec!["normal".to_string()], "https://img"))
        }

        fn warm_image(&self, creature: &Creature) {
            self.warmed.lock().unwrap().push(creature.id);
        }
    }

    fn policy(max_id: u32) -> FetchPolicy {
        FetchPolicy {
            max_id,
            max_attempts: 10,
        }
    }

    #[tokio::test]
    async fn test_returns_first_unseen_draw() {
        let source = FakeSource::default();
        let mut rng = StdRng::seed_from_u64(7);

        let creature = random_creature(&source, &HashSet::new(), &policy(151), &mut rng)
            .await
            .unwrap();

        let calls = source.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(creature.id, calls[0]);
        assert!(creature.id >= 1 && creature.id <= 151);
        assert_eq!(*source.warmed.lock().unwrap(), vec![creature.id]);
    }

    #[tokio::test]
    async fn test_exhausted_retries_return_last_draw() {
        let source = FakeSource::default();
        let seen: HashSet<u32> = (1..=20).collect();
        let mut rng = StdRng::seed_from_u64(42);

        let creature = random_creature(&source, &seen, &policy(20), &mut rng)
            .await
            .unwrap();

        let calls = source.calls.lock().unwrap();
        assert_eq!(calls.len(), 10);
        assert_eq!(creature.id, calls[9]);
        assert!(seen.contains(&creature.id));
    }

    #[tokio::test]
    async fn test_skips_seen_ids() {
        let source = FakeSource::default();
        // Only id 3 is unseen, so whatever is returned must be 3 unless the
        // draws run out first.
        let seen: HashSet<u32> = [1, 2].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(1);
        let narrow = FetchPolicy {
            max_id: 3,
            max_attempts: 50,
        };

        let creature = random_creature(&source, &seen, &narrow, &mut rng)
            .await
            .unwrap();
        assert_eq!(creature.id, 3);
    }

    #[tokio::test]
    async fn test_failures_are_retried() {
        let source = FakeSource {
            failing: (1..=5).collect(),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let narrow = FetchPolicy {
            max_id: 6,
            max_attempts: 100,
        };

        let creature = random_creature(&source, &HashSet::new(), &narrow, &mut rng)
            .await
            .unwrap();
        assert_eq!(creature.id, 6);
    }

    #[tokio::test]
    async fn test_all_attempts_failing_returns_error() {
        let source = FakeSource {
            fail_all: true,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(9);

        let result = random_creature(&source, &HashSet::new(), &policy(151), &mut rng).await;

        assert!(matches!(result, Err(Error::Api(_))));
        assert_eq!(source.calls.lock().unwrap().len(), 10);
        assert!(source.warmed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_policy() {
        let source = FakeSource::default();
        let mut rng = StdRng::seed_from_u64(0);
        let bad = FetchPolicy {
            max_id: 0,
            max_attempts: 10,
        };
        let result = random_creature(&source, &HashSet::new(), &bad, &mut rng).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(source.calls.lock().unwrap().is_empty());
    }
}
