use crate::model::board::Board;
use crate::model::card::{Card, CardId, CardValue};
use std::collections::BTreeMap;

/// What the opponent has seen face-up and not yet seen matched, grouped by value.
///
/// Keys iterate in ascending value order, which makes triplet lookups stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpponentMemory {
    seen: BTreeMap<CardValue, Vec<CardId>>,
}

impl OpponentMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the card was not already known.
    pub fn remember(&mut self, card: &Card) -> bool {
        let known = self.seen.entry(card.value()).or_default();
        if known.contains(&card.id()) {
            return false;
        }
        known.push(card.id());
        true
    }

    pub fn forget(&mut self, value: CardValue) {
        self.seen.remove(&value);
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }

    pub fn known_for(&self, value: CardValue) -> &[CardId] {
        self.seen.get(&value).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn knows(&self, id: CardId) -> bool {
        self.seen.values().any(|ids| ids.contains(&id))
    }

    /// Number of remembered identities across all values.
    pub fn len(&self) -> usize {
        self.seen.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First value with three remembered, unmatched cards.
    pub fn find_triplet(&self, board: &Board) -> Option<[CardId; 3]> {
        self.seen.values().find_map(|ids| {
            let mut live = ids
                .iter()
                .copied()
                .filter(|id| board.card(*id).is_some_and(|card| !card.is_matched()));
            Some([live.next()?, live.next()?, live.next()?])
        })
    }

    /// A remembered card of `value` that is still face-down and not in `exclude`.
    pub fn find_partner(
        &self,
        board: &Board,
        value: CardValue,
        exclude: &[CardId],
    ) -> Option<CardId> {
        self.known_for(value).iter().copied().find(|id| {
            !exclude.contains(id)
                && board
                    .card(*id)
                    .is_some_and(|card| !card.is_revealed_like() && !card.is_matched())
        })
    }
}
