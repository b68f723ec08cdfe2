//! Template-based short story generator.

use rand::prelude::IndexedRandom;

/// Hints the dispatcher passes for "tell me a story".
pub const STORY_HINTS: [&str; 4] = [
    "young prince",
    "magical forest",
    "an evil dragon",
    "outsmarting the dragon using clever tricks",
];

/// A story with `{slot}` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoryTemplate(&'static str);

pub const TEMPLATES: [StoryTemplate; 3] = [
    StoryTemplate(
        "Once upon a time, there was a {character} who was {adjective}. One day, they discovered {discovery}. This discovery led them on a journey to {destination}, where they encountered {obstacle}. With determination and courage, they overcame the obstacle and {resolution}.",
    ),
    StoryTemplate(
        "In a distant land, a {character} set out on an adventure to {goal}. Along the way, they faced many challenges, including {challenge}. But through wisdom and bravery, they succeeded in {achievement}. Their journey became a legend, known far and wide as the {story_name}.",
    ),
    StoryTemplate(
        "A {adjective} {character} found themselves caught in an unexpected situation. While trying to {action}, they stumbled upon {discovery}. This started a chain of events that led to {unexpected_turn}. In the end, they learned {lesson}, and their life was changed forever.",
    ),
];

/// A slot is filled with `present` when its keyword occurs in any hint,
/// otherwise with `absent`.
struct Slot {
    name: &'static str,
    keyword: &'static str,
    present: &'static str,
    absent: &'static str,
}

const SLOTS: [Slot; 13] = [
    Slot { name: "character", keyword: "knight", present: "knight", absent: "hero" },
    Slot { name: "adjective", keyword: "brave", present: "brave", absent: "kind" },
    Slot { name: "discovery", keyword: "treasure", present: "a hidden treasure", absent: "a powerful artifact" },
    Slot { name: "destination", keyword: "castle", present: "a distant castle", absent: "an enchanted forest" },
    Slot { name: "obstacle", keyword: "dragon", present: "a dangerous dragon", absent: "an evil sorcerer" },
    Slot { name: "resolution", keyword: "legend", present: "became a legend", absent: "defeated the dark forces" },
    Slot { name: "goal", keyword: "evil", present: "defeat the evil forces", absent: "find a rare artifact" },
    Slot { name: "challenge", keyword: "terrain", present: "treacherous terrain", absent: "a fierce monster" },
    Slot { name: "achievement", keyword: "kingdom", present: "saving the kingdom", absent: "finding the treasure" },
    Slot { name: "story_name", keyword: "knight", present: "The Brave Knight's Quest", absent: "The Hero's Journey" },
    Slot { name: "action", keyword: "fight", present: "fight the sorcerer", absent: "seek the hidden treasure" },
    Slot { name: "unexpected_turn", keyword: "cursed", present: "they realized the treasure was cursed", absent: "they were betrayed by an ally" },
    Slot { name: "lesson", keyword: "courage", present: "the true meaning of courage", absent: "the importance of friendship" },
];

impl StoryTemplate {
    /// Fills every slot from the hints.
    pub fn fill(self, hints: &[&str]) -> String {
        let hints = hints.join(" ").to_lowercase();
        SLOTS.iter().fold(self.0.to_string(), |story, slot| {
            let value = if hints.contains(slot.keyword) {
                slot.present
            } else {
                slot.absent
            };
            story.replace(&format!("{{{}}}", slot.name), value)
        })
    }
}

/// Picks a random template and fills it from the hints.
pub fn generate_story(hints: &[&str]) -> String {
    let template = TEMPLATES
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(TEMPLATES[0]);
    template.fill(hints)
}
