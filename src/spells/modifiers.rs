//! Sigils (picked once per match) and bonuses (picked between rounds)

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::spells::forge::Spell;

/// Passive modifier a player picks before the first round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Sigil {
    Cascade,
    /// Every cast leaves a weaker delayed copy of its zone
    Echo,
    /// Forged spells last longer
    Stability,
    Fracture,
    Harvest,
    /// Forged spells hold an extra charge but recover slower
    Greed,
}

pub const STABILITY_DURATION_MULT: f32 = 1.3;
pub const GREED_COOLDOWN_MULT: f32 = 1.25;

impl Sigil {
    /// Apply this sigil's forge-time effect to a freshly forged spell
    pub fn apply_on_forge(&self, spell: &mut Spell) {
        match self {
            Sigil::Stability => {
                spell.duration *= STABILITY_DURATION_MULT;
            }
            Sigil::Greed => {
                spell.max_charges += 1;
                spell.current_charges += 1;
                spell.cooldown_seconds *= GREED_COOLDOWN_MULT;
            }
            Sigil::Cascade | Sigil::Echo | Sigil::Fracture | Sigil::Harvest => {}
        }
    }
}

/// Round bonus picked during `bonusSelect`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Bonus {
    PowerSurge,
    QuickCast,
    /// Tracked for forging; has no immediate effect
    ForgeMastery,
}

pub const QUICK_CAST_COOLDOWN_MULT: f32 = 0.8;

impl Bonus {
    /// Apply the bonus to one randomly chosen spell, if the player has any
    ///
    /// Returns the index of the affected spell.
    pub fn apply<R: Rng + ?Sized>(&self, spells: &mut [Spell], rng: &mut R) -> Option<usize> {
        if matches!(self, Bonus::ForgeMastery) || spells.is_empty() {
            return None;
        }

        let idx = rng.gen_range(0..spells.len());
        let spell = &mut spells[idx];
        match self {
            Bonus::PowerSurge => {
                spell.max_charges += 1;
                spell.current_charges += 1;
            }
            Bonus::QuickCast => {
                spell.cooldown_seconds *= QUICK_CAST_COOLDOWN_MULT;
            }
            Bonus::ForgeMastery => {}
        }
        Some(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spells::element::Element;
    use crate::spells::forge::forge_spell;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_stability_extends_duration() {
        let mut spell = forge_spell(&[Element::Fire]).unwrap();
        Sigil::Stability.apply_on_forge(&mut spell);
        assert!((spell.duration - 5.2).abs() < 1e-4);
        assert_eq!(spell.max_charges, 2);
    }

    #[test]
    fn test_greed_adds_charge_and_slows_cooldown() {
        let mut spell = forge_spell(&[Element::Fire, Element::Ice]).unwrap();
        Sigil::Greed.apply_on_forge(&mut spell);
        assert_eq!(spell.max_charges, 3);
        assert_eq!(spell.current_charges, 3);
        assert!((spell.cooldown_seconds - 8.75).abs() < 1e-4);
    }

    #[test]
    fn test_passive_sigils_leave_spell_alone() {
        let base = forge_spell(&[Element::Wind]).unwrap();
        for sigil in [Sigil::Cascade, Sigil::Echo, Sigil::Fracture, Sigil::Harvest] {
            let mut spell = base.clone();
            sigil.apply_on_forge(&mut spell);
            assert_eq!(spell.max_charges, base.max_charges);
            assert_eq!(spell.duration, base.duration);
            assert_eq!(spell.cooldown_seconds, base.cooldown_seconds);
        }
    }

    #[test]
    fn test_power_surge_hits_one_spell() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut spells = vec![
            forge_spell(&[Element::Fire]).unwrap(),
            forge_spell(&[Element::Ice]).unwrap(),
        ];
        let idx = Bonus::PowerSurge.apply(&mut spells, &mut rng).unwrap();
        assert_eq!(spells[idx].max_charges, 3);
        assert_eq!(spells[1 - idx].max_charges, 2);
    }

    #[test]
    fn test_quick_cast_shortens_cooldown() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut spells = vec![forge_spell(&[Element::Earth]).unwrap()];
        assert_eq!(Bonus::QuickCast.apply(&mut spells, &mut rng), Some(0));
        assert!((spells[0].cooldown_seconds - 4.8).abs() < 1e-4);
    }

    #[test]
    fn test_bonus_without_spells_or_effect() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(Bonus::PowerSurge.apply(&mut [], &mut rng), None);
        let mut spells = vec![forge_spell(&[Element::Earth]).unwrap()];
        assert_eq!(Bonus::ForgeMastery.apply(&mut spells, &mut rng), None);
    }

    #[test]
    fn test_sigil_wire_names() {
        assert_eq!(serde_json::to_string(&Sigil::Stability).unwrap(), "\"stability\"");
        assert_eq!(serde_json::to_string(&Bonus::PowerSurge).unwrap(), "\"powerSurge\"");
    }
}
