//! User selection state, from which queries are derived

use crate::{
    query::{self, Query},
    result::Dimension,
};

/// What the user selected and is pointing at along each dimension
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Selection {
    /// Selected and hovered values, indexed by [`slot_index()`]
    slots: [Slot; 4],

    /// Bumped to force a different serialization without changing selections
    invalidation_id: u64,
}
//
impl Default for Selection {
    fn default() -> Self {
        Self {
            slots: Default::default(),
            invalidation_id: 1,
        }
    }
}
//
impl Selection {
    /// Start with nothing selected or hovered
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a value along some dimension
    pub fn select(&mut self, dimension: Dimension, value: impl Into<Box<str>>) {
        self.slot_mut(dimension).selected = Some(value.into());
    }

    /// Select a value, or clear the selection if that value was selected
    pub fn toggle(&mut self, dimension: Dimension, value: &str) {
        let slot = self.slot_mut(dimension);
        if slot.selected.as_deref() == Some(value) {
            slot.selected = None;
        } else {
            slot.selected = Some(value.into());
        }
    }

    /// Currently selected value along some dimension
    pub fn selected(&self, dimension: Dimension) -> Option<&str> {
        self.slot(dimension).selected.as_deref()
    }

    /// Clear the selection along some dimension
    pub fn clear(&mut self, dimension: Dimension) {
        self.slot_mut(dimension).selected = None;
    }

    /// Clear selections along every dimension
    pub fn clear_all(&mut self) {
        for dimension in Dimension::ALL {
            self.clear(dimension);
        }
    }

    /// Record which value is being hovered along some dimension
    pub fn hover(&mut self, dimension: Dimension, value: impl Into<Box<str>>) {
        self.slot_mut(dimension).hovering = Some(value.into());
    }

    /// Value being hovered along some dimension
    pub fn hovering(&self, dimension: Dimension) -> Option<&str> {
        self.slot(dimension).hovering.as_deref()
    }

    /// Record that nothing is hovered along some dimension
    pub fn clear_hovering(&mut self, dimension: Dimension) {
        self.slot_mut(dimension).hovering = None;
    }

    /// Force the next serialization to differ from previous ones
    pub fn invalidate(&mut self) {
        self.invalidation_id += 1;
    }

    /// Build a query which applies the current selections
    ///
    /// The selected category becomes a pre-category filter, so that the
    /// group statistics can be computed for another `category`.
    pub fn query(&self, category: Option<&str>) -> Query {
        Query::new(
            category,
            self.selected(Dimension::Categories),
            self.selected(Dimension::Countries),
            self.selected(Dimension::Tags),
            self.selected(Dimension::Keywords),
        )
    }

    /// Snapshot identifier of this selection state
    ///
    /// Two states with the same serialization display the same thing.
    pub fn serialize(&self) -> String {
        let mut id = String::new();
        for slot in &self.slots {
            for value in [&slot.selected, &slot.hovering] {
                match value {
                    Some(value) => query::push_escaped(&mut id, value),
                    None => id.push_str(query::UNSET),
                }
                id.push(query::ID_SEPARATOR);
            }
        }
        id.push_str(&self.invalidation_id.to_string());
        id
    }

    /// State along some dimension
    fn slot(&self, dimension: Dimension) -> &Slot {
        &self.slots[slot_index(dimension)]
    }

    /// Mutable state along some dimension
    fn slot_mut(&mut self, dimension: Dimension) -> &mut Slot {
        &mut self.slots[slot_index(dimension)]
    }
}

/// Selection state along one dimension
#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Slot {
    selected: Option<Box<str>>,
    hovering: Option<Box<str>>,
}

/// Position of a dimension's state within [`Selection::slots`]
fn slot_index(dimension: Dimension) -> usize {
    match dimension {
        Dimension::Categories => 0,
        Dimension::Countries => 1,
        Dimension::Tags => 2,
        Dimension::Keywords => 3,
    }
}
