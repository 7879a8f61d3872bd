// Example: Basic usage of the swipedex-core library (no network needed)
use std::fs;
use std::sync::Arc;
use std::time::Duration;

use swipedex_core::models::*;
use swipedex_core::session::*;
use swipedex_core::storage::*;
use swipedex_core::swipe::*;

const FRAME: Duration = Duration::from_millis(16);
const ARTWORK: &str = swipedex_core::api::DEFAULT_ARTWORK_BASE;

fn main() -> swipedex_core::Result<()> {
    let data_dir = "basic_usage_swipedex";
    fs::remove_dir_all(data_dir).ok(); // Clean up previous run

    println!("--- Basic Usage of swipedex-core ---");

    // ========== Open the collection ==========
    println!("\n1. Opening collection store...");
    let storage = Arc::new(JsonFileStorage::new(data_dir));
    let mut store = CollectionStore::open(storage.clone())?;
    println!("   ✓ {} liked so far", store.liked().len());

    // ========== Start a session ==========
    println!("\n2. Starting a browse session...");
    let swipe = SwipeController::new(SwipeConfig::default().with_width(400.0));
    let mut session = BrowseSession::new(swipe);
    println!("   ✓ Requested slots: {:?}", session.start());

    // Fetch results would normally arrive from PokeApiClient
    let requests = session.fulfill(
        Slot::Current,
        Creature::new(25, "pikachu", vec!["electric".to_string()], ARTWORK),
        &mut store,
    );
    println!("   ✓ Card on screen, now requesting {:?}", requests);
    session.fulfill(
        Slot::Next,
        Creature::new(1, "bulbasaur", vec!["grass".to_string(), "poison".to_string()], ARTWORK),
        &mut store,
    );
    if let Some(current) = session.current() {
        println!("   ✓ On screen: #{} {} [{}]", current.id, current.name, current.types_label());
    }

    // ========== Drag past the threshold ==========
    println!("\n3. Dragging right by 200...");
    session.begin_drag()?;
    session.update_drag(200.0, 12.0);
    let visuals = session.swipe().visuals();
    println!(
        "   rotation {:.1}°, like {:.2}, nope {:.2}",
        visuals.rotation_deg, visuals.like_opacity, visuals.nope_opacity
    );
    println!("   ✓ Release: {:?}", session.release()?);
    let requests = run_until_idle(&mut session, &mut store);
    println!("   ✓ Committed, now requesting {:?}", requests);

    // ========== Fling left with the keyboard ==========
    println!("\n4. Flinging left...");
    session.fling(Direction::Left)?;
    run_until_idle(&mut session, &mut store);

    // ========== Inspect the collection ==========
    println!("\n5. Collection state:");
    for liked in store.liked() {
        println!("   ♥ #{} {} ({})", liked.id, liked.name, liked.types.join(", "));
    }
    let mut seen: Vec<u32> = store.seen().iter().copied().collect();
    seen.sort_unstable();
    println!("   seen: {:?}", seen);

    // Dropping the store waits for the last flush
    drop(store);
    let reopened = CollectionStore::open(storage)?;
    println!("   ✓ Reopened with {} liked", reopened.liked().len());

    println!("\n--- Done ---");
    Ok(())
}

fn run_until_idle(session: &mut BrowseSession, store: &mut CollectionStore) -> Vec<Slot> {
    let mut requests = Vec::new();
    while session.swipe().is_transitioning() {
        requests.extend(session.tick(FRAME, store));
    }
    requests
}
