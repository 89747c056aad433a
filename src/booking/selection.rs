//! Multi-select service picker.
//!
//! Catalog services toggle on and off. Full House Work covers everything, so
//! picking it clears every other entry and picking anything else clears it.
//! Free-text "other" entries are appended (never toggled, since they are
//! never rendered as buttons).

use serde::{Deserialize, Serialize};

use super::model::{ServiceId, ServiceItem};
use crate::error::BookingError;

/// What a selection operation did, for the confirmation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Added,
    Removed,
    /// The covers-everything service replaced the whole selection.
    Exclusive,
    /// An identical "other" entry was already present.
    Unchanged,
}

/// Ordered set of selected services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    items: Vec<ServiceItem>,
}

impl Selection {
    pub fn items(&self) -> &[ServiceItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn contains(&self, item: &ServiceItem) -> bool {
        self.items.contains(item)
    }

    pub fn contains_service(&self, id: ServiceId) -> bool {
        self.contains(&ServiceItem::Catalog(id))
    }

    /// Toggle a catalog service.
    pub fn toggle(&mut self, id: ServiceId) -> SelectionChange {
        if id.covers_everything() {
            self.items = vec![ServiceItem::Catalog(id)];
            return SelectionChange::Exclusive;
        }

        self.drop_covers_everything();

        let item = ServiceItem::Catalog(id);
        if let Some(pos) = self.items.iter().position(|i| *i == item) {
            self.items.remove(pos);
            SelectionChange::Removed
        } else {
            self.items.push(item);
            SelectionChange::Added
        }
    }

    /// Append a free-text service description (already validated).
    pub fn add_other(&mut self, description: String) -> SelectionChange {
        self.drop_covers_everything();

        let item = ServiceItem::Other(description);
        if self.items.contains(&item) {
            return SelectionChange::Unchanged;
        }
        self.items.push(item);
        SelectionChange::Added
    }

    /// Check the selection can be submitted.
    pub fn finish(&self) -> Result<(), BookingError> {
        if self.items.is_empty() {
            return Err(BookingError::EmptySelection);
        }
        Ok(())
    }

    /// Canonical labels joined for display and for the request record.
    pub fn joined(&self) -> String {
        self.items
            .iter()
            .map(ServiceItem::canonical_label)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn drop_covers_everything(&mut self) {
        self.items.retain(|i| !i.covers_everything());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut sel = Selection::default();
        assert_eq!(sel.toggle(ServiceId::Cooking), SelectionChange::Added);
        assert!(sel.contains_service(ServiceId::Cooking));
        assert_eq!(sel.toggle(ServiceId::Cooking), SelectionChange::Removed);
        assert!(sel.is_empty());
    }

    #[test]
    fn toggle_twice_restores_previous_selection() {
        let mut sel = Selection::default();
        sel.toggle(ServiceId::Laundry);
        sel.toggle(ServiceId::PetCare);
        let before = sel.clone();

        sel.toggle(ServiceId::Gardening);
        sel.toggle(ServiceId::Gardening);
        assert_eq!(sel, before);

        sel.toggle(ServiceId::Laundry);
        sel.toggle(ServiceId::Laundry);
        // Re-adding moves the entry to the end; membership is what matters.
        assert_eq!(sel.len(), before.len());
        assert!(sel.contains_service(ServiceId::Laundry));
        assert!(sel.contains_service(ServiceId::PetCare));
    }

    #[test]
    fn covers_everything_clears_others() {
        let mut sel = Selection::default();
        sel.toggle(ServiceId::HouseCleaning);
        sel.toggle(ServiceId::ChildCare);
        sel.add_other("Ironing".into());

        assert_eq!(sel.toggle(ServiceId::FullHouseWork), SelectionChange::Exclusive);
        assert_eq!(sel.items(), &[ServiceItem::Catalog(ServiceId::FullHouseWork)]);
    }

    #[test]
    fn selecting_other_service_exits_covers_everything() {
        let mut sel = Selection::default();
        sel.toggle(ServiceId::FullHouseWork);

        assert_eq!(sel.toggle(ServiceId::ElderCare), SelectionChange::Added);
        assert_eq!(sel.items(), &[ServiceItem::Catalog(ServiceId::ElderCare)]);
    }

    #[test]
    fn covers_everything_is_idempotent() {
        let mut sel = Selection::default();
        sel.toggle(ServiceId::FullHouseWork);
        assert_eq!(sel.toggle(ServiceId::FullHouseWork), SelectionChange::Exclusive);
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn other_entry_appends_and_exits_covers_everything() {
        let mut sel = Selection::default();
        sel.toggle(ServiceId::FullHouseWork);

        assert_eq!(sel.add_other("Window washing".into()), SelectionChange::Added);
        assert_eq!(sel.items(), &[ServiceItem::Other("Window washing".into())]);

        assert_eq!(sel.add_other("Window washing".into()), SelectionChange::Unchanged);
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn preserves_insertion_order() {
        let mut sel = Selection::default();
        sel.toggle(ServiceId::Gardening);
        sel.add_other("Ironing".into());
        sel.toggle(ServiceId::HouseCleaning);
        assert_eq!(sel.joined(), "Gardening, Other: Ironing, House Cleaning");
    }

    #[test]
    fn finish_requires_an_entry() {
        let mut sel = Selection::default();
        assert_eq!(sel.finish(), Err(BookingError::EmptySelection));
        sel.toggle(ServiceId::PetCare);
        assert!(sel.finish().is_ok());
    }
}
