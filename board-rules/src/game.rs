//! 对局控制
//!
//! 回合 / 连跳状态机与悔棋栈：
//! - 谁在走棋、是否有棋子被锁定在连跳中、何时结束回合
//! - 每步走法都记录被改动格子的原状态，悔棋时逆序回放

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::board::{Board, SquareDiff};
use crate::chess;
use crate::draughts;
use crate::error::{ConfigError, Result, RulesError};
use crate::layout::Layout;
use crate::legality;
use crate::moves::{Move, MoveKind};
use crate::piece::{Piece, PieceType, Side, Square};
use crate::variant::{Ruleset, Variant};

/// 对局结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// 跳棋家族：对方无子可走
    Win { winner: Side },
    /// 国际象棋：将死
    Checkmate { winner: Side },
    /// 国际象棋：无子可走但未被将军
    Stalemate,
}

/// 连跳锁定：被锁定的棋子及其上一步离开的格子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLock {
    pub square: Square,
    pub parent: Option<Square>,
}

/// 悔棋栈中的一项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedMove {
    pub mv: Move,
    diff: Vec<SquareDiff>,
    prior_player: Side,
    prior_lock: Option<ChainLock>,
    prior_turn: u32,
}

fn fresh_rng() -> ChaCha8Rng {
    ChaCha8Rng::from_entropy()
}

/// 一局游戏
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    variant: Variant,
    board: Board,
    cur_player: Side,
    /// 已完成的回合数
    turn: u32,
    locked: Option<ChainLock>,
    undo_stack: Vec<AppliedMove>,
    /// 当前合法走法总数（缓存）
    move_count: usize,
    outcome: Option<Outcome>,
    #[serde(skip, default = "fresh_rng")]
    rng: ChaCha8Rng,
}

impl Game {
    /// 创建新对局（随机先手）
    pub fn new(variant: Variant) -> std::result::Result<Self, ConfigError> {
        Self::with_rng(variant, fresh_rng(), None)
    }

    /// 使用固定种子创建对局，先手可复现
    pub fn with_seed(variant: Variant, seed: u64) -> std::result::Result<Self, ConfigError> {
        Self::with_rng(variant, ChaCha8Rng::seed_from_u64(seed), None)
    }

    /// 从指定布局开始，由 `first` 先走
    pub fn from_layout(variant: &Variant, rows: &[&str], first: Side) -> std::result::Result<Self, ConfigError> {
        Self::with_rng(variant.with_layout(rows), fresh_rng(), Some(first))
    }

    fn with_rng(variant: Variant, rng: ChaCha8Rng, first: Option<Side>) -> std::result::Result<Self, ConfigError> {
        let mut game = Self {
            variant,
            board: Board::empty(),
            cur_player: Side::Near,
            turn: 0,
            locked: None,
            undo_stack: Vec::new(),
            move_count: 0,
            outcome: None,
            rng,
        };
        match first {
            Some(side) => game.start(side)?,
            None => game.new_game()?,
        }
        Ok(game)
    }

    /// 开始新的一局：重置布局、随机先手、清空锁定和悔棋栈
    ///
    /// 变体配置无效时（例如反序列化得到的坏布局）返回错误，对局保持不变。
    pub fn new_game(&mut self) -> std::result::Result<(), ConfigError> {
        let first = if self.rng.gen_bool(0.5) { Side::Near } else { Side::Far };
        self.start(first)
    }

    fn start(&mut self, first: Side) -> std::result::Result<(), ConfigError> {
        let placements = self.variant.validate()?;
        self.board = Layout::build_board(&placements);
        self.cur_player = first;
        self.turn = 0;
        self.locked = None;
        self.undo_stack.clear();
        self.outcome = None;
        if self.variant.ruleset == Ruleset::Chess {
            self.refresh_check_state(&mut Vec::new());
        }
        info!(variant = %self.variant.name, first = ?first, "new game");
        self.compute_moves(true);
        self.detect_game_over();
        Ok(())
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// 获取格子上的棋子，越界时返回哨兵
    pub fn piece_at(&self, square: Square) -> &Piece {
        self.board.get(square)
    }

    pub fn cur_player(&self) -> Side {
        self.cur_player
    }

    /// 已完成的回合数
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// 正在连跳（或等待升变）的棋子
    pub fn locked(&self) -> Option<ChainLock> {
        self.locked
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// 当前合法走法总数
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// 已执行的走法（最早的在前）
    pub fn history(&self) -> &[AppliedMove] {
        &self.undo_stack
    }

    pub fn advancement(&self, rank: usize, side: Side) -> usize {
        side.advancement(rank)
    }

    pub fn rank_for_king(&self, side: Side) -> usize {
        side.rank_for_king()
    }

    /// 指定玩家的国际象棋王是否被将军
    pub fn is_in_check(&self, side: Side) -> bool {
        self.variant.ruleset == Ruleset::Chess && legality::is_in_check(&self.board, side)
    }

    pub fn is_square_attacked(&self, square: Square, by: Side) -> bool {
        legality::is_square_attacked(&self.board, square, by)
    }

    /// 生成指定格子上棋子的走法，不修改棋盘
    ///
    /// `chain_parent` 仅在连跳中设置，表示上一步离开的格子。
    pub fn compute_moves_for_square(&self, square: Square, chain_parent: Option<Square>) -> Vec<Move> {
        match self.variant.ruleset {
            Ruleset::Draughts => draughts::generate(&self.board, &self.variant.config, square, chain_parent),
            Ruleset::Chess => chess::generate(&mut self.board.positions(), square),
        }
    }

    /// 重新生成所有走法，返回合法走法总数；`refresh` 为 false 时直接返回缓存
    pub fn compute_moves(&mut self, refresh: bool) -> usize {
        if !refresh {
            return self.move_count;
        }
        self.board.clear_moves();

        let generated: Vec<(Square, Vec<Move>)> = match self.locked {
            Some(lock) => vec![(lock.square, self.chain_moves(lock))],
            None => {
                let squares = self.board.squares_of(self.cur_player);
                match self.variant.ruleset {
                    Ruleset::Draughts => squares
                        .into_iter()
                        .map(|sq| (sq, draughts::generate(&self.board, &self.variant.config, sq, None)))
                        .collect(),
                    Ruleset::Chess => {
                        let mut scratch = self.board.positions();
                        squares
                            .into_iter()
                            .map(|sq| (sq, chess::generate(&mut scratch, sq)))
                            .collect()
                    }
                }
            }
        };

        self.move_count = 0;
        for (square, moves) in generated {
            self.move_count += moves.len();
            if let Some(piece) = self.board.get_mut(square) {
                piece.moves = moves;
            }
        }
        trace!(player = ?self.cur_player, count = self.move_count, "computed moves");
        self.move_count
    }

    /// 锁定棋子的后续走法
    fn chain_moves(&self, lock: ChainLock) -> Vec<Move> {
        let mut moves = self.compute_moves_for_square(lock.square, lock.parent);
        if self.variant.ruleset == Ruleset::Draughts {
            moves.retain(Move::is_jump);
            // 不强制跳吃时可以主动停下
            if !self.variant.config.mandatory_jumps {
                let piece = self.board.get(lock.square);
                moves.push(Move::end(piece.side, lock.square, piece.kind));
            }
        }
        moves
    }

    /// 获取当前合法走法
    ///
    /// 有锁定棋子时只返回它的走法；否则合并己方所有棋子的走法，走法少的棋子排在前面。
    pub fn get_moves(&self) -> Vec<Move> {
        if let Some(lock) = self.locked {
            return self.board.get(lock.square).moves().to_vec();
        }
        let mut pieces: Vec<&Piece> = self
            .board
            .iter()
            .map(|(_, piece)| piece)
            .filter(|piece| piece.belongs_to(self.cur_player) && piece.num_moves() > 0)
            .collect();
        pieces.sort_by_key(|piece| piece.num_moves());
        pieces.into_iter().flat_map(|piece| piece.moves().iter().copied()).collect()
    }

    /// 执行走法
    ///
    /// 返回 `Some(outcome)` 表示这一步结束了对局（只会出现一次）。
    pub fn execute_move(&mut self, mv: &Move) -> Result<Option<Outcome>> {
        if self.outcome.is_some() {
            return Err(RulesError::GameOver);
        }
        if mv.side != self.cur_player {
            return Err(RulesError::NotYourTurn {
                expected: self.cur_player,
                actual: mv.side,
            });
        }
        if !self.get_moves().contains(mv) {
            return Err(RulesError::IllegalMove {
                description: mv.to_string(),
            });
        }

        debug!(%mv, "execute move");
        let prior_player = self.cur_player;
        let prior_lock = self.locked;
        let prior_turn = self.turn;

        self.locked = None;
        self.board.clear_moves();
        let mut diff = self.board.apply(mv);

        match self.continuation(mv) {
            Some(lock) => self.locked = Some(lock),
            None => self.advance_turn(&mut diff),
        }

        self.undo_stack.push(AppliedMove {
            mv: *mv,
            diff,
            prior_player,
            prior_lock,
            prior_turn,
        });
        self.compute_moves(true);
        Ok(self.detect_game_over())
    }

    /// 主动结束当前连跳
    pub fn end_turn(&mut self) -> Result<Option<Outcome>> {
        let end = self
            .get_moves()
            .into_iter()
            .find(|mv| mv.kind == MoveKind::End)
            .ok_or(RulesError::NoChainToEnd)?;
        self.execute_move(&end)
    }

    /// 撤销最近一步，返回被撤销的走法
    pub fn undo(&mut self) -> Result<Move> {
        let applied = self.undo_stack.pop().ok_or(RulesError::NothingToUndo)?;
        self.board.clear_moves();
        self.board.revert(&applied.diff);
        self.cur_player = applied.prior_player;
        self.locked = applied.prior_lock;
        self.turn = applied.prior_turn;
        self.outcome = None;
        self.compute_moves(true);
        debug!(mv = %applied.mv, "undo move");
        Ok(applied.mv)
    }

    /// 走完一步后是否继续锁定同一棋子
    fn continuation(&self, mv: &Move) -> Option<ChainLock> {
        match (self.variant.ruleset, mv.kind) {
            (_, MoveKind::End | MoveKind::Swap | MoveKind::Castle) => None,
            (Ruleset::Draughts, _) => {
                // 成王结束本回合
                if !mv.is_jump() || mv.start_type != mv.next_type {
                    return None;
                }
                let lock = ChainLock {
                    square: mv.end,
                    parent: Some(mv.start),
                };
                let more = self
                    .compute_moves_for_square(lock.square, lock.parent)
                    .iter()
                    .any(Move::is_jump);
                more.then_some(lock)
            }
            (Ruleset::Chess, _) => (self.board.get(mv.end).kind == PieceType::PawnToBePromoted).then_some(ChainLock {
                square: mv.end,
                parent: None,
            }),
        }
    }

    /// 换到下一位玩家
    fn advance_turn(&mut self, diff: &mut Vec<SquareDiff>) {
        self.cur_player = self.cur_player.opponent();
        self.turn += 1;
        if self.variant.ruleset != Ruleset::Chess {
            return;
        }

        // 过路兵资格只保留一个回合
        for square in self.board.squares_of(self.cur_player) {
            if self.board.get(square).kind == PieceType::PawnEnPassant {
                self.board.write(square, PieceType::Pawn, self.cur_player, diff);
            }
        }
        self.refresh_check_state(diff);
    }

    /// 更新双方王的被将军显示状态
    fn refresh_check_state(&mut self, diff: &mut Vec<SquareDiff>) {
        for side in Side::ALL {
            let Some(king) = self.board.find_king(side) else {
                continue;
            };
            let checked = side == self.cur_player && legality::is_in_check(&self.board, side);
            let kind = self.board.get(king).kind;
            let wanted = kind.with_check(checked);
            if wanted != kind {
                self.board.write(king, wanted, side, diff);
            }
        }
    }

    /// 当前玩家无子可走时结束对局
    fn detect_game_over(&mut self) -> Option<Outcome> {
        if self.locked.is_some() || self.move_count > 0 {
            return None;
        }
        let winner = self.cur_player.opponent();
        let outcome = match self.variant.ruleset {
            Ruleset::Draughts => Outcome::Win { winner },
            Ruleset::Chess if self.is_in_check(self.cur_player) => Outcome::Checkmate { winner },
            Ruleset::Chess => Outcome::Stalemate,
        };
        info!(?outcome, turn = self.turn, "game over");
        self.outcome = Some(outcome);
        Some(outcome)
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:?} {}", self.variant.name, self.cur_player, Layout::render(&self.board))
    }
}
