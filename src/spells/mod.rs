//! Spell crafting - element tags, the combination catalog, forging and the
//! sigil/bonus modifiers applied to forged spells.
//!
//! Everything here is pure: the catalog is static data and forging only
//! reads it.

pub mod catalog;
pub mod element;
pub mod forge;
pub mod modifiers;

pub use catalog::{combination_key, SpellDefinition, BASIC_SPELLS, COMBINED_SPELLS};
pub use element::Element;
pub use forge::{forge_spell, get_spell_name, is_valid_combination, Spell};
pub use modifiers::{Bonus, Sigil};
