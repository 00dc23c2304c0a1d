//! Spell definitions and the combination catalog
//!
//! Six single-element spells and eight two-element combinations. Two-element
//! entries store their elements in canonical (sorted) order, so a lookup only
//! has to sort the requested pair.

use crate::spells::element::Element;

/// Static catalog entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpellDefinition {
    pub name: &'static str,
    pub elements: &'static [Element],
    pub max_charges: u32,
    pub cooldown_seconds: f32,
    /// Lifetime of the zone a cast creates, in seconds
    pub duration: f32,
    pub radius: f32,
    pub damage_per_second: f32,
}

use Element::*;

pub static BASIC_SPELLS: [SpellDefinition; 6] = [
    SpellDefinition {
        name: "Ember Ground",
        elements: &[Fire],
        max_charges: 2,
        cooldown_seconds: 5.0,
        duration: 4.0,
        radius: 40.0,
        damage_per_second: 8.0,
    },
    SpellDefinition {
        name: "Frost Patch",
        elements: &[Ice],
        max_charges: 2,
        cooldown_seconds: 5.0,
        duration: 5.0,
        radius: 45.0,
        damage_per_second: 3.0,
    },
    SpellDefinition {
        name: "Gust Field",
        elements: &[Wind],
        max_charges: 3,
        cooldown_seconds: 4.0,
        duration: 3.0,
        radius: 50.0,
        damage_per_second: 2.0,
    },
    SpellDefinition {
        name: "Stone Wall",
        elements: &[Earth],
        max_charges: 2,
        cooldown_seconds: 6.0,
        duration: 6.0,
        radius: 35.0,
        damage_per_second: 0.0,
    },
    SpellDefinition {
        name: "Static Field",
        elements: &[Lightning],
        max_charges: 2,
        cooldown_seconds: 6.0,
        duration: 3.0,
        radius: 35.0,
        damage_per_second: 10.0,
    },
    SpellDefinition {
        name: "Dark Pool",
        elements: &[Shadow],
        max_charges: 2,
        cooldown_seconds: 5.0,
        duration: 4.0,
        radius: 40.0,
        damage_per_second: 5.0,
    },
];

pub static COMBINED_SPELLS: [SpellDefinition; 8] = [
    SpellDefinition {
        name: "Steam Eruption",
        elements: &[Fire, Ice],
        max_charges: 2,
        cooldown_seconds: 7.0,
        duration: 5.0,
        radius: 55.0,
        damage_per_second: 6.0,
    },
    SpellDefinition {
        name: "Flame Wave",
        elements: &[Fire, Wind],
        max_charges: 2,
        cooldown_seconds: 6.0,
        duration: 2.0,
        radius: 60.0,
        damage_per_second: 12.0,
    },
    SpellDefinition {
        name: "Plasma Storm",
        elements: &[Fire, Lightning],
        max_charges: 1,
        cooldown_seconds: 8.0,
        duration: 3.0,
        radius: 45.0,
        damage_per_second: 15.0,
    },
    SpellDefinition {
        name: "Blizzard",
        elements: &[Ice, Wind],
        max_charges: 2,
        cooldown_seconds: 7.0,
        duration: 6.0,
        radius: 65.0,
        damage_per_second: 4.0,
    },
    SpellDefinition {
        name: "Frozen Void",
        elements: &[Ice, Shadow],
        max_charges: 1,
        cooldown_seconds: 8.0,
        duration: 5.0,
        radius: 50.0,
        damage_per_second: 3.0,
    },
    SpellDefinition {
        name: "Sandstorm",
        elements: &[Earth, Wind],
        max_charges: 2,
        cooldown_seconds: 6.0,
        duration: 4.0,
        radius: 55.0,
        damage_per_second: 7.0,
    },
    SpellDefinition {
        name: "Seismic Shock",
        elements: &[Earth, Lightning],
        max_charges: 2,
        cooldown_seconds: 7.0,
        duration: 4.0,
        radius: 50.0,
        damage_per_second: 9.0,
    },
    SpellDefinition {
        name: "Shadow Lightning",
        elements: &[Lightning, Shadow],
        max_charges: 2,
        cooldown_seconds: 6.0,
        duration: 2.0,
        radius: 40.0,
        damage_per_second: 11.0,
    },
];

/// Canonical key of an element pair: the two tags in sorted order
pub fn combination_key(a: Element, b: Element) -> (Element, Element) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Single-element entry for `element`
pub fn basic(element: Element) -> Option<&'static SpellDefinition> {
    BASIC_SPELLS.iter().find(|def| def.elements == [element])
}

/// Two-element entry for the pair, in either order
pub fn combined(a: Element, b: Element) -> Option<&'static SpellDefinition> {
    let (first, second) = combination_key(a, b);
    COMBINED_SPELLS
        .iter()
        .find(|def| def.elements == [first, second])
}

/// Catalog entry for one or two elements; anything else has none
pub fn lookup(elements: &[Element]) -> Option<&'static SpellDefinition> {
    match *elements {
        [single] => basic(single),
        [a, b] => combined(a, b),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_element_has_a_basic_spell() {
        for element in Element::ALL {
            assert!(basic(element).is_some(), "{element} has no basic spell");
        }
    }

    #[test]
    fn test_combined_entries_are_canonical() {
        for def in COMBINED_SPELLS.iter() {
            assert_eq!(def.elements.len(), 2);
            assert!(def.elements[0] < def.elements[1], "{} not sorted", def.name);
        }
    }

    #[test]
    fn test_combination_lookup_either_order() {
        let a = combined(Ice, Fire).unwrap();
        let b = combined(Fire, Ice).unwrap();
        assert_eq!(a.name, "Steam Eruption");
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_combinations() {
        assert!(combined(Fire, Shadow).is_none());
        assert!(combined(Fire, Fire).is_none());
        assert!(lookup(&[]).is_none());
        assert!(lookup(&[Fire, Ice, Wind]).is_none());
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = BASIC_SPELLS
            .iter()
            .chain(COMBINED_SPELLS.iter())
            .map(|def| def.name)
            .collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 14);
    }
}
