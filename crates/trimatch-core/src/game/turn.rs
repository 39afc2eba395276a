use crate::config::GameConfig;
use crate::memory::{OpponentMemory, OpponentPlanner};
use crate::model::board::Board;
use crate::model::card::{CardId, CardValue};
use crate::model::clock::AnimationClock;
use crate::model::player::{Actor, GameMode};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;

const SELECTIONS_PER_TURN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    pub continue_turn: bool,
    pub points_awarded: u32,
}

impl TurnResult {
    pub const MATCH: TurnResult = TurnResult {
        continue_turn: true,
        points_awarded: 1,
    };
    pub const MISS: TurnResult = TurnResult {
        continue_turn: false,
        points_awarded: 0,
    };
    /// Nothing could be selected at all.
    pub const NO_OP: TurnResult = TurnResult {
        continue_turn: true,
        points_awarded: 0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    AwaitingSelections,
    Judging,
    Resolved(TurnResult),
}

/// Everything a turn reads or writes, lent by the session for one call.
pub struct TurnContext<'a> {
    pub board: &'a mut Board,
    pub memory: &'a mut OpponentMemory,
    pub clock: &'a AnimationClock,
    pub config: &'a GameConfig,
    pub mode: GameMode,
    pub rng: &'a mut dyn RngCore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// Waiting for picks. `cooldown` counts ticks until the opponent may pick again.
    Selecting { cooldown: u32 },
    MatchPause { ticks_left: u32, value: CardValue },
    Fading { value: CardValue },
    Holding { ticks_left: u32 },
    FlippingBack,
    Done(TurnResult),
}

/// Runs one turn: three selections, a judgement, then either a fade-out or a flip-back.
///
/// Nothing here blocks. `advance` performs a single tick and must be called until it
/// reports `Resolved`.
#[derive(Debug, Clone)]
pub struct TurnController {
    actor: Actor,
    stage: Stage,
    judged: Vec<CardId>,
    planner: Option<OpponentPlanner>,
    ticks: u32,
}

impl TurnController {
    pub fn new(actor: Actor) -> Self {
        Self {
            actor,
            stage: Stage::Selecting { cooldown: 0 },
            judged: Vec::with_capacity(SELECTIONS_PER_TURN),
            planner: matches!(actor, Actor::Opponent).then(OpponentPlanner::new),
            ticks: 0,
        }
    }

    pub fn actor(&self) -> Actor {
        self.actor
    }

    pub fn phase(&self) -> TurnPhase {
        match self.stage {
            Stage::Selecting { .. } => TurnPhase::AwaitingSelections,
            Stage::Done(result) => TurnPhase::Resolved(result),
            _ => TurnPhase::Judging,
        }
    }

    /// Cards being judged (or flipped back), once selection has ended.
    pub fn judged(&self) -> &[CardId] {
        &self.judged
    }

    /// True while a human still has cards to choose.
    pub fn wants_human_selection(&self, board: &Board) -> bool {
        matches!(self.actor, Actor::Human)
            && matches!(self.stage, Stage::Selecting { .. })
            && board.selected_cards().len() < SELECTIONS_PER_TURN
    }

    /// Human selection. Stale or surplus selections are dropped and return false.
    pub fn select(&mut self, ctx: &mut TurnContext<'_>, id: CardId) -> bool {
        if !self.wants_human_selection(ctx.board) {
            return false;
        }
        if !ctx.board.flip_up(id) {
            return false;
        }
        if ctx.mode.shares_memory() {
            if let Some(card) = ctx.board.card(id) {
                ctx.memory.remember(card);
            }
        }
        debug!(target: "trimatch_core::turn", card = %id, "human selection");
        true
    }

    /// One tick: steps the animation clock, then the turn.
    pub fn advance(&mut self, ctx: &mut TurnContext<'_>) -> TurnPhase {
        if let Stage::Done(result) = self.stage {
            return TurnPhase::Resolved(result);
        }

        self.ticks += 1;
        let animating = ctx.clock.tick(ctx.board);

        self.stage = match self.stage {
            Stage::Selecting { cooldown } => self.advance_selection(ctx, animating, cooldown),
            Stage::MatchPause { ticks_left: 0, value } => self.mark_matched(ctx, value),
            Stage::MatchPause { ticks_left, value } => Stage::MatchPause {
                ticks_left: ticks_left - 1,
                value,
            },
            Stage::Fading { .. } | Stage::FlippingBack if animating => self.stage,
            Stage::Fading { value } => {
                if ctx.mode.shares_memory() {
                    ctx.memory.forget(value);
                }
                Stage::Done(TurnResult::MATCH)
            }
            Stage::Holding { ticks_left: 0 } => self.flip_back(ctx),
            Stage::Holding { ticks_left } => Stage::Holding {
                ticks_left: ticks_left - 1,
            },
            Stage::FlippingBack => Stage::Done(TurnResult::MISS),
            Stage::Done(result) => Stage::Done(result),
        };

        if let Stage::Done(result) = self.stage {
            debug!(
                target: "trimatch_core::turn",
                actor = ?self.actor,
                continue_turn = result.continue_turn,
                points = result.points_awarded,
                ticks = self.ticks,
                "turn resolved"
            );
        }

        self.phase()
    }

    fn advance_selection(
        &mut self,
        ctx: &mut TurnContext<'_>,
        animating: bool,
        cooldown: u32,
    ) -> Stage {
        let selected = ctx.board.selected_ids();
        if selected.len() >= SELECTIONS_PER_TURN {
            let ready = selected[..SELECTIONS_PER_TURN]
                .iter()
                .all(|id| ctx.board.card(*id).is_some_and(|card| card.is_revealed()));
            if !ready {
                return Stage::Selecting { cooldown };
            }
            self.judged = selected[..SELECTIONS_PER_TURN].to_vec();
            return self.judge(ctx);
        }

        let Some(planner) = self.planner.as_mut() else {
            return Stage::Selecting { cooldown: 0 };
        };

        // Each opponent pick waits for the previous card to finish turning, then a short pause.
        if animating {
            return Stage::Selecting { cooldown };
        }
        if cooldown > 0 {
            return Stage::Selecting {
                cooldown: cooldown - 1,
            };
        }

        match planner.next_pick(ctx.board, ctx.memory, &mut *ctx.rng) {
            Some(pick) => {
                if ctx.board.flip_up(pick.card) && ctx.mode.shares_memory() {
                    if let Some(card) = ctx.board.card(pick.card) {
                        ctx.memory.remember(card);
                    }
                }
                Stage::Selecting {
                    cooldown: ctx.config.pick_delay_ticks,
                }
            }
            None if selected.is_empty() => {
                debug!(target: "trimatch_core::turn", "opponent found nothing to flip");
                Stage::Done(TurnResult::NO_OP)
            }
            None => {
                debug!(
                    target: "trimatch_core::turn",
                    flipped = selected.len(),
                    "opponent ran out of cards mid-turn"
                );
                self.judged = selected;
                self.flip_back(ctx)
            }
        }
    }

    fn judge(&mut self, ctx: &mut TurnContext<'_>) -> Stage {
        let values: Vec<CardValue> = self
            .judged
            .iter()
            .filter_map(|id| ctx.board.value_of(*id))
            .collect();
        let matched =
            values.len() == SELECTIONS_PER_TURN && values.windows(2).all(|w| w[0] == w[1]);

        debug!(
            target: "trimatch_core::turn",
            actor = ?self.actor,
            values = ?values,
            matched,
            "judging selection"
        );

        match (matched, self.actor) {
            (true, Actor::Opponent) if ctx.config.match_pause_ticks > 0 => Stage::MatchPause {
                ticks_left: ctx.config.match_pause_ticks - 1,
                value: values[0],
            },
            (true, _) => self.mark_matched(ctx, values[0]),
            (false, _) => {
                let delay = ctx.config.mismatch_delay_ticks;
                self.hold(ctx, delay)
            }
        }
    }

    /// Keeps a miss on show for `delay` ticks, counting the judging tick.
    fn hold(&self, ctx: &mut TurnContext<'_>, delay: u32) -> Stage {
        match delay {
            0 => self.flip_back(ctx),
            delay => Stage::Holding {
                ticks_left: delay - 1,
            },
        }
    }

    fn flip_back(&self, ctx: &mut TurnContext<'_>) -> Stage {
        for &id in &self.judged {
            ctx.board.flip_down(id);
        }
        Stage::FlippingBack
    }

    fn mark_matched(&self, ctx: &mut TurnContext<'_>, value: CardValue) -> Stage {
        for &id in &self.judged {
            ctx.board.set_matched(id);
        }
        Stage::Fading { value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Fixture {
        board: Board,
        memory: OpponentMemory,
        clock: AnimationClock,
        config: GameConfig,
        mode: GameMode,
        rng: StdRng,
    }

    impl Fixture {
        fn new(mode: GameMode) -> Self {
            let config = GameConfig::with_grid(3, 3);
            Self {
                board: Board::from_values(3, 3, &[1, 2, 3, 1, 2, 3, 1, 2, 3]).unwrap(),
                memory: OpponentMemory::new(),
                clock: AnimationClock::from_config(&config),
                config,
                mode,
                rng: StdRng::seed_from_u64(5),
            }
        }

        fn ctx(&mut self) -> TurnContext<'_> {
            TurnContext {
                board: &mut self.board,
                memory: &mut self.memory,
                clock: &self.clock,
                config: &self.config,
                mode: self.mode,
                rng: &mut self.rng,
            }
        }

        fn run(&mut self, turn: &mut TurnController) -> TurnResult {
            for _ in 0..1_000 {
                if let TurnPhase::Resolved(result) = turn.advance(&mut self.ctx()) {
                    return result;
                }
            }
            panic!("turn did not resolve");
        }
    }

    fn ids(indices: &[u16]) -> Vec<CardId> {
        indices.iter().map(|&i| CardId::new(i)).collect()
    }

    #[test]
    fn matching_triple_scores_and_fades_out() {
        let mut fx = Fixture::new(GameMode::VsOpponent);
        let mut turn = TurnController::new(Actor::Human);
        for id in ids(&[0, 3, 6]) {
            assert!(turn.select(&mut fx.ctx(), id));
        }

        assert_eq!(fx.run(&mut turn), TurnResult::MATCH);
        for id in ids(&[0, 3, 6]) {
            assert!(matches!(
                fx.board.card(id).unwrap().face(),
                crate::model::card::CardFace::Matched
            ));
        }
        assert!(fx.memory.known_for(1).is_empty());
    }

    #[test]
    fn mismatch_flips_back_and_switches() {
        let mut fx = Fixture::new(GameMode::VsPlayer);
        let mut turn = TurnController::new(Actor::Human);
        for id in ids(&[0, 1, 3]) {
            assert!(turn.select(&mut fx.ctx(), id));
        }

        assert_eq!(fx.run(&mut turn), TurnResult::MISS);
        for id in ids(&[0, 1, 3]) {
            assert!(fx.board.card(id).unwrap().is_hidden());
        }
        assert!(fx.memory.is_empty(), "hot-seat games never feed the opponent");
    }

    #[test]
    fn mismatch_waits_for_display_delay() {
        let mut fx = Fixture::new(GameMode::VsPlayer);
        fx.config.mismatch_delay_ticks = 5;
        let mut turn = TurnController::new(Actor::Human);
        for id in ids(&[0, 1, 3]) {
            turn.select(&mut fx.ctx(), id);
        }
        fx.run(&mut turn);
        // Judged on the tick the flip completes, shown for 5 ticks, then 10 to hide.
        assert_eq!(turn.ticks, 10 + 5 + 10);
    }

    #[test]
    fn mismatch_without_delay_flips_back_on_the_judging_tick() {
        let mut fx = Fixture::new(GameMode::VsPlayer);
        fx.config = fx.config.without_delays();
        let mut turn = TurnController::new(Actor::Human);
        for id in ids(&[0, 1, 3]) {
            turn.select(&mut fx.ctx(), id);
        }
        assert_eq!(fx.run(&mut turn), TurnResult::MISS);
        assert_eq!(turn.ticks, 10 + 10);
    }

    #[test]
    fn match_pause_holds_for_the_configured_ticks() {
        let mut fx = Fixture::new(GameMode::VsOpponent);
        fx.config.match_pause_ticks = 5;
        fx.config.pick_delay_ticks = 0;
        for id in ids(&[2, 5, 8]) {
            let card = fx.board.card(id).unwrap().clone();
            fx.memory.remember(&card);
        }
        let mut turn = TurnController::new(Actor::Opponent);
        let mut judged_at = None;
        for _ in 0..1_000 {
            turn.advance(&mut fx.ctx());
            if judged_at.is_none() && turn.phase() == TurnPhase::Judging {
                judged_at = Some(turn.ticks);
            }
            if fx.board.matched_count() > 0 {
                break;
            }
        }
        assert_eq!(fx.board.matched_count(), 3);
        assert_eq!(turn.ticks - judged_at.unwrap(), 5);
    }

    #[test]
    fn opponent_running_out_mid_turn_flips_back_as_a_miss() {
        let mut fx = Fixture::new(GameMode::VsOpponent);
        let spent = ids(&[0, 1, 2, 3, 4, 5, 6]);
        for &id in &spent {
            fx.board.flip_up(id);
        }
        fx.clock.settle(&mut fx.board);
        for &id in &spent {
            fx.board.set_matched(id);
        }
        fx.clock.settle(&mut fx.board);

        let mut turn = TurnController::new(Actor::Opponent);
        assert_eq!(fx.run(&mut turn), TurnResult::MISS);

        let mut flipped = turn.judged().to_vec();
        flipped.sort();
        assert_eq!(flipped, ids(&[7, 8]));
        for id in ids(&[7, 8]) {
            assert!(fx.board.card(id).unwrap().is_hidden());
        }
        assert!(!fx.board.is_animating());
    }

    #[test]
    fn surplus_and_stale_selections_are_ignored() {
        let mut fx = Fixture::new(GameMode::VsOpponent);
        let mut turn = TurnController::new(Actor::Human);
        assert!(turn.select(&mut fx.ctx(), CardId::new(0)));
        assert!(!turn.select(&mut fx.ctx(), CardId::new(0)));
        assert!(turn.select(&mut fx.ctx(), CardId::new(1)));
        assert!(turn.select(&mut fx.ctx(), CardId::new(2)));
        assert!(!turn.select(&mut fx.ctx(), CardId::new(4)));
        assert!(fx.board.card(CardId::new(4)).unwrap().is_hidden());
        assert_eq!(fx.memory.len(), 3);
    }

    #[test]
    fn judging_waits_until_all_three_are_revealed() {
        let mut fx = Fixture::new(GameMode::VsPlayer);
        let mut turn = TurnController::new(Actor::Human);
        for id in ids(&[0, 3, 6]) {
            turn.select(&mut fx.ctx(), id);
        }
        for _ in 0..9 {
            assert_eq!(turn.advance(&mut fx.ctx()), TurnPhase::AwaitingSelections);
        }
        assert_eq!(turn.advance(&mut fx.ctx()), TurnPhase::Judging);
    }

    #[test]
    fn human_selection_is_refused_on_opponent_turn() {
        let mut fx = Fixture::new(GameMode::VsOpponent);
        let mut turn = TurnController::new(Actor::Opponent);
        assert!(!turn.select(&mut fx.ctx(), CardId::new(0)));
    }

    #[test]
    fn opponent_plays_remembered_triplet() {
        let mut fx = Fixture::new(GameMode::VsOpponent);
        for id in ids(&[2, 5, 8]) {
            let card = fx.board.card(id).unwrap().clone();
            fx.memory.remember(&card);
        }
        let mut turn = TurnController::new(Actor::Opponent);

        assert_eq!(fx.run(&mut turn), TurnResult::MATCH);
        assert_eq!(turn.judged(), ids(&[2, 5, 8]).as_slice());
        assert!(fx.memory.is_empty());
        assert_eq!(fx.board.matched_count(), 3);
    }

    #[test]
    fn opponent_with_nothing_to_flip_resolves_as_no_op() {
        let mut fx = Fixture::new(GameMode::VsOpponent);
        let all = fx.board.hidden_cards(&[]);
        for &id in &all {
            fx.board.flip_up(id);
        }
        fx.clock.settle(&mut fx.board);
        for &id in &all {
            fx.board.set_matched(id);
        }
        fx.clock.settle(&mut fx.board);
        let mut turn = TurnController::new(Actor::Opponent);
        assert_eq!(fx.run(&mut turn), TurnResult::NO_OP);
    }

    #[test]
    fn opponent_turn_always_resolves_on_fresh_board() {
        for seed in 0..8 {
            let mut fx = Fixture::new(GameMode::VsOpponent);
            fx.rng = StdRng::seed_from_u64(seed);
            let mut turn = TurnController::new(Actor::Opponent);
            let result = fx.run(&mut turn);
            assert!(result == TurnResult::MATCH || result == TurnResult::MISS);
            assert_eq!(fx.memory.len() >= 3, result == TurnResult::MISS);
            assert!(!fx.board.is_animating());
        }
    }
}
