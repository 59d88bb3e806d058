use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::models::wanted_person::{PersonKey, WantedPerson};

/// Collapses records sharing a [`PersonKey`].
///
/// The last record seen for a key wins, and it takes the position at which
/// that key was first seen, so the output order is stable across runs.
pub fn dedupe_persons<I>(items: I) -> Vec<WantedPerson>
where
    I: IntoIterator<Item = WantedPerson>,
{
    let mut positions: HashMap<PersonKey, usize> = HashMap::new();
    let mut deduped: Vec<WantedPerson> = Vec::new();

    for person in items {
        match positions.entry(person.key()) {
            Entry::Occupied(slot) => deduped[*slot.get()] = person,
            Entry::Vacant(slot) => {
                slot.insert(deduped.len());
                deduped.push(person);
            }
        }
    }

    deduped
}
