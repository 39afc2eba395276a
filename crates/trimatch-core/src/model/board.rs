use crate::config::{CARDS_PER_MATCH, GameConfig, MIN_DISTINCT_VALUES};
use crate::error::SetupError;
use crate::model::card::{Card, CardId, CardValue, GridPos};
use crate::model::layout::{BoardLayout, Point};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

/// Every card of one game, in row-major scan order.
#[derive(Debug, Clone)]
pub struct Board {
    rows: u8,
    cols: u8,
    cards: Vec<Card>,
    selection: Vec<CardId>,
}

impl Board {
    /// Values `1..=n`, three of each, shuffled with `rng`.
    pub fn generate<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Result<Self, SetupError> {
        config.validate()?;

        let mut values: Vec<CardValue> = (1..=config.distinct_values())
            .flat_map(|value| std::iter::repeat_n(value, CARDS_PER_MATCH as usize))
            .collect();
        values.shuffle(rng);

        Self::from_values(config.rows, config.cols, &values)
    }

    pub fn generate_with_seed(config: &GameConfig, seed: u64) -> Result<Self, SetupError> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::generate(config, &mut rng)
    }

    /// Builds a board from an explicit row-major value layout.
    pub fn from_values(rows: u8, cols: u8, values: &[CardValue]) -> Result<Self, SetupError> {
        GameConfig::with_grid(rows, cols).validate()?;

        let expected = usize::from(rows) * usize::from(cols);
        if values.len() != expected {
            return Err(SetupError::LayoutSize {
                expected,
                found: values.len(),
            });
        }

        let mut counts: BTreeMap<CardValue, usize> = BTreeMap::new();
        for &value in values {
            *counts.entry(value).or_default() += 1;
        }
        if let Some((&value, &count)) = counts
            .iter()
            .find(|&(_, &count)| count != CARDS_PER_MATCH as usize)
        {
            return Err(SetupError::BrokenTriplet { value, count });
        }
        if counts.len() < usize::from(MIN_DISTINCT_VALUES) {
            return Err(SetupError::TooFewValues {
                values: counts.len() as u16,
                min: MIN_DISTINCT_VALUES,
            });
        }

        let cards = values
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                let pos = GridPos::new((index / usize::from(cols)) as u8, (index % usize::from(cols)) as u8);
                Card::new(CardId::new(index as u16), pos, value)
            })
            .collect();

        Ok(Self {
            rows,
            cols,
            cards,
            selection: Vec::new(),
        })
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub(crate) fn cards_mut(&mut self) -> &mut [Card] {
        &mut self.cards
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.index())
    }

    pub fn card_at_cell(&self, pos: GridPos) -> Option<&Card> {
        if pos.row >= self.rows || pos.col >= self.cols {
            return None;
        }
        self.cards
            .get(usize::from(pos.row) * usize::from(self.cols) + usize::from(pos.col))
    }

    /// Card under a pointer position, if any.
    pub fn card_at(&self, point: Point, layout: &BoardLayout) -> Option<&Card> {
        layout
            .cell_at(point, self.rows, self.cols)
            .and_then(|pos| self.card_at_cell(pos))
    }

    pub fn value_of(&self, id: CardId) -> Option<CardValue> {
        self.card(id).map(Card::value)
    }

    /// Flips a hidden card face-up and records it as the newest selection.
    pub fn flip_up(&mut self, id: CardId) -> bool {
        let Some(card) = self.cards.get_mut(id.index()) else {
            return false;
        };
        if !card.flip_up() {
            return false;
        }
        self.selection.retain(|selected| *selected != id);
        self.selection.push(id);
        true
    }

    pub fn flip_down(&mut self, id: CardId) -> bool {
        self.cards
            .get_mut(id.index())
            .is_some_and(Card::flip_down)
    }

    pub fn set_matched(&mut self, id: CardId) -> bool {
        self.cards
            .get_mut(id.index())
            .is_some_and(Card::set_matched)
    }

    /// Face-up, unmatched cards in the order they were flipped.
    pub fn selected_cards(&self) -> Vec<&Card> {
        self.selection
            .iter()
            .filter_map(|id| self.card(*id))
            .filter(|card| card.is_revealed_like() && !card.is_matched())
            .collect()
    }

    pub fn selected_ids(&self) -> Vec<CardId> {
        self.selected_cards().into_iter().map(Card::id).collect()
    }

    pub(crate) fn prune_selection(&mut self) {
        let cards = &self.cards;
        self.selection.retain(|id| {
            cards
                .get(id.index())
                .is_some_and(|card| card.is_revealed_like() && !card.is_matched())
        });
    }

    /// Hidden cards, minus `exclude`, in scan order.
    pub fn hidden_cards(&self, exclude: &[CardId]) -> Vec<CardId> {
        self.cards
            .iter()
            .filter(|card| card.is_hidden() && !exclude.contains(&card.id()))
            .map(Card::id)
            .collect()
    }

    pub fn is_animating(&self) -> bool {
        self.cards.iter().any(Card::is_animating)
    }

    pub fn all_matched(&self) -> bool {
        self.cards
            .iter()
            .all(|card| matches!(card.face(), crate::model::card::CardFace::Matched))
    }

    pub fn matched_count(&self) -> usize {
        self.cards.iter().filter(|card| card.is_matched()).count()
    }

    pub fn ids_with_value(&self, value: CardValue) -> Vec<CardId> {
        self.cards
            .iter()
            .filter(|card| card.value() == value)
            .map(Card::id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::card::CardFace;

    fn sequential(rows: u8, cols: u8) -> Vec<CardValue> {
        let n = u16::from(rows) * u16::from(cols) / 3;
        (1..=n).flat_map(|v| [v, v, v]).collect()
    }

    #[test]
    fn generated_board_holds_each_value_three_times() {
        for seed in 0..16 {
            let board = Board::generate_with_seed(&GameConfig::default(), seed).unwrap();
            assert_eq!(board.len(), 36);
            assert_eq!(board.len() % 3, 0);
            for value in 1..=12 {
                assert_eq!(board.ids_with_value(value).len(), 3, "seed {seed} value {value}");
            }
        }
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let config = GameConfig::default();
        let a = Board::generate_with_seed(&config, 42).unwrap();
        let b = Board::generate_with_seed(&config, 42).unwrap();
        let c = Board::generate_with_seed(&config, 43).unwrap();
        let values = |board: &Board| board.cards().iter().map(Card::value).collect::<Vec<_>>();
        assert_eq!(values(&a), values(&b));
        assert_ne!(values(&a), values(&c));
    }

    #[test]
    fn generation_rejects_invalid_config_before_building() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = Board::generate(&GameConfig::with_grid(4, 4), &mut rng).unwrap_err();
        assert!(matches!(err, SetupError::NotDivisibleByThree { cards: 16, .. }));
    }

    #[test]
    fn from_values_checks_triplets_and_size() {
        assert!(matches!(
            Board::from_values(3, 3, &[1, 1, 1, 2, 2, 2, 3, 3]),
            Err(SetupError::LayoutSize { expected: 9, found: 8 })
        ));
        assert_eq!(
            Board::from_values(3, 3, &[1, 1, 1, 1, 2, 2, 3, 3, 3]).unwrap_err(),
            SetupError::BrokenTriplet { value: 1, count: 4 }
        );
    }

    #[test]
    fn cards_are_placed_in_scan_order() {
        let board = Board::from_values(3, 4, &sequential(3, 4)).unwrap();
        let card = board.card_at_cell(GridPos::new(1, 2)).unwrap();
        assert_eq!(card.id(), CardId::new(6));
        assert_eq!(card.value(), 3);
        assert!(board.card_at_cell(GridPos::new(3, 0)).is_none());
    }

    #[test]
    fn card_at_uses_layout_hit_test() {
        let board = Board::from_values(3, 3, &sequential(3, 3)).unwrap();
        let layout = BoardLayout::new(Point::default(), 100, 10);
        let card = board.card_at(Point::new(230, 120), &layout).unwrap();
        assert_eq!(card.pos(), GridPos::new(1, 2));
        assert!(board.card_at(Point::new(2, 2), &layout).is_none());
    }

    #[test]
    fn selection_keeps_flip_order_not_grid_order() {
        let mut board = Board::from_values(3, 3, &sequential(3, 3)).unwrap();
        assert!(board.flip_up(CardId::new(8)));
        assert!(board.flip_up(CardId::new(0)));
        assert!(board.flip_up(CardId::new(4)));
        assert!(!board.flip_up(CardId::new(4)));
        assert_eq!(
            board.selected_ids(),
            vec![CardId::new(8), CardId::new(0), CardId::new(4)]
        );
        assert_eq!(board.hidden_cards(&[CardId::new(1)]).len(), 5);
    }

    #[test]
    fn all_matched_requires_terminal_state() {
        let mut board = Board::from_values(3, 3, &sequential(3, 3)).unwrap();
        assert!(!board.all_matched());
        for card in board.cards_mut() {
            card.replace_face(CardFace::MatchedFading(50));
        }
        assert!(!board.all_matched());
        assert_eq!(board.matched_count(), 9);
        for card in board.cards_mut() {
            card.replace_face(CardFace::Matched);
        }
        assert!(board.all_matched());
    }
}
