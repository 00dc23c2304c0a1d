//! The six element tags orbs carry and spells are forged from

use serde::{Deserialize, Serialize};

/// Element tag
///
/// Ordering follows the tag's name so that a sorted pair of elements yields
/// the canonical combination key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Ice,
    Wind,
    Earth,
    Lightning,
    Shadow,
}

impl Element {
    pub const ALL: [Element; 6] = [
        Element::Fire,
        Element::Ice,
        Element::Wind,
        Element::Earth,
        Element::Lightning,
        Element::Shadow,
    ];

    /// Wire tag of this element
    pub fn tag(&self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Ice => "ice",
            Element::Wind => "wind",
            Element::Earth => "earth",
            Element::Lightning => "lightning",
            Element::Shadow => "shadow",
        }
    }
}

impl PartialOrd for Element {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Element {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.tag().cmp(other.tag())
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
