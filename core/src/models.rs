mod creature;
mod liked;

pub use creature::Creature;
pub use liked::LikedCreature;

/// Turn an API slug such as `mr-mime` into a display name (`Mr-mime`).
pub fn display_name(slug: &str) -> String {
    let trimmed = slug.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
