//! Spell forging - turning one or two elements into a player-owned spell

use serde::{Deserialize, Serialize};

use crate::core::types::SpellId;
use crate::spells::catalog::{lookup, SpellDefinition};
use crate::spells::element::Element;

/// A crafted spell held in one of a player's slots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spell {
    pub id: SpellId,
    pub name: String,
    pub elements: Vec<Element>,
    pub max_charges: u32,
    pub current_charges: u32,
    pub cooldown_seconds: f32,
    /// Seconds until the next charge returns (0 when idle)
    pub current_cooldown: f32,
    pub duration: f32,
    pub radius: f32,
    pub damage_per_second: f32,
}

impl Spell {
    /// Fresh instance of a catalog entry: full charges, no cooldown
    pub fn from_definition(def: &SpellDefinition) -> Self {
        Self {
            id: SpellId::new(),
            name: def.name.to_string(),
            elements: def.elements.to_vec(),
            max_charges: def.max_charges,
            current_charges: def.max_charges,
            cooldown_seconds: def.cooldown_seconds,
            current_cooldown: 0.0,
            duration: def.duration,
            radius: def.radius,
            damage_per_second: def.damage_per_second,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.current_charges > 0 && self.current_cooldown == 0.0
    }

    /// Spend a charge and start the cooldown
    pub fn consume_charge(&mut self) {
        self.current_charges = self.current_charges.saturating_sub(1);
        self.current_cooldown = self.cooldown_seconds;
    }

    /// Advance cooldown by `dt` seconds, regenerating charges
    ///
    /// When the cooldown runs out one charge returns. If the spell is still
    /// short of full the cooldown re-arms for the next charge.
    pub fn regenerate(&mut self, dt: f32) {
        if self.current_cooldown <= 0.0 {
            return;
        }

        self.current_cooldown = (self.current_cooldown - dt).max(0.0);
        if self.current_cooldown == 0.0 && self.current_charges < self.max_charges {
            self.current_charges += 1;
            if self.current_charges < self.max_charges {
                self.current_cooldown = self.cooldown_seconds;
            }
        }
    }
}

/// Forge a spell from one or two elements
///
/// Returns None when the elements do not name a catalog entry. Order of a
/// pair does not matter.
pub fn forge_spell(elements: &[Element]) -> Option<Spell> {
    lookup(elements).map(Spell::from_definition)
}

/// Check if elements can make a valid spell
pub fn is_valid_combination(elements: &[Element]) -> bool {
    lookup(elements).is_some()
}

/// Display name the elements would forge into
pub fn get_spell_name(elements: &[Element]) -> Option<&'static str> {
    lookup(elements).map(|def| def.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Element::*;

    #[test]
    fn test_forge_steam_eruption() {
        let spell = forge_spell(&[Fire, Ice]).unwrap();
        assert_eq!(spell.name, "Steam Eruption");
        assert_eq!(spell.max_charges, 2);
        assert_eq!(spell.current_charges, 2);
        assert_eq!(spell.current_cooldown, 0.0);
        assert_eq!(spell.elements, vec![Fire, Ice]);
    }

    #[test]
    fn test_forge_gives_fresh_ids() {
        let a = forge_spell(&[Fire]).unwrap();
        let b = forge_spell(&[Fire]).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_forge_rejects_bad_lengths() {
        assert!(forge_spell(&[]).is_none());
        assert!(forge_spell(&[Fire, Ice, Wind]).is_none());
        assert!(!is_valid_combination(&[]));
        assert!(get_spell_name(&[Fire, Ice, Wind]).is_none());
    }

    #[test]
    fn test_spell_name_preview() {
        assert_eq!(get_spell_name(&[Wind, Earth]), Some("Sandstorm"));
        assert_eq!(get_spell_name(&[Shadow]), Some("Dark Pool"));
        assert_eq!(get_spell_name(&[Wind, Shadow]), None);
    }

    #[test]
    fn test_consume_charge_starts_cooldown() {
        let mut spell = forge_spell(&[Fire, Ice]).unwrap();
        assert!(spell.is_ready());
        spell.consume_charge();
        assert_eq!(spell.current_charges, 1);
        assert_eq!(spell.current_cooldown, 7.0);
        assert!(!spell.is_ready());
    }

    #[test]
    fn test_regenerate_chains_until_full() {
        let mut spell = forge_spell(&[Fire]).unwrap();
        spell.current_charges = 0;
        spell.current_cooldown = spell.cooldown_seconds;

        spell.regenerate(5.0);
        assert_eq!(spell.current_charges, 1);
        assert_eq!(spell.current_cooldown, 5.0);

        spell.regenerate(5.0);
        assert_eq!(spell.current_charges, 2);
        assert_eq!(spell.current_cooldown, 0.0);

        spell.regenerate(5.0);
        assert_eq!(spell.current_charges, 2);
    }

    #[test]
    fn test_regenerate_idle_spell_is_noop() {
        let mut spell = forge_spell(&[Fire]).unwrap();
        spell.regenerate(1.0);
        assert_eq!(spell.current_charges, 2);
        assert_eq!(spell.current_cooldown, 0.0);
    }
}
