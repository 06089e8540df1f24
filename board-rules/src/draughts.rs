//! 跳棋家族走法生成
//!
//! checkers / dama / draughts 共用本生成器，差异全部来自 [`VariantConfig`]。

use crate::board::Board;
use crate::constants::{MAX_SLIDE_DISTANCE, MOVE_LIST_CAPACITY};
use crate::moves::{Capture, Move};
use crate::piece::{Piece, PieceType, Square};
use crate::variant::VariantConfig;

/// 四个斜向
const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// 生成指定格子上棋子的走法
///
/// `chain_parent` 仅在连跳过程中设置：此时不生成普通移动，且不能跳回刚离开的格子。
pub(crate) fn generate(
    board: &Board,
    config: &VariantConfig,
    square: Square,
    chain_parent: Option<Square>,
) -> Vec<Move> {
    let piece = board.get(square);
    if !piece.kind.is_checker_family() {
        return Vec::new();
    }

    let mut moves = Vec::with_capacity(MOVE_LIST_CAPACITY);
    let is_king = piece.kind == PieceType::CheckerKing;

    for (dr, dc) in DIAGONALS {
        let forward = dr == piece.side.forward();
        let step = Step {
            board,
            config,
            piece,
            square,
            chain_parent,
            can_slide: is_king || forward,
            can_jump: is_king || forward || config.men_jump_backwards,
        };
        if is_king && config.flying_kings {
            step.flying(dr, dc, &mut moves);
        } else {
            step.single(dr, dc, &mut moves);
        }
    }

    // 有跳必跳：存在跳跃时去掉普通移动
    if config.mandatory_jumps && moves.iter().any(Move::is_jump) {
        moves.retain(Move::is_jump);
    }
    moves
}

/// 单个方向上的生成上下文
struct Step<'a> {
    board: &'a Board,
    config: &'a VariantConfig,
    piece: &'a Piece,
    square: Square,
    chain_parent: Option<Square>,
    can_slide: bool,
    can_jump: bool,
}

impl Step<'_> {
    /// 走一格或跳一格
    fn single(&self, dr: i8, dc: i8, moves: &mut Vec<Move>) {
        let adjacent = self.square.offset(dr, dc);
        let target = self.board.get(adjacent);

        if target.is_empty() {
            if self.chain_parent.is_none() && self.can_slide {
                moves.push(Move::slide(self.piece.side, self.square, adjacent, self.piece.kind, self.next_type(adjacent)));
            }
        } else if target.is_occupied() && self.can_jump {
            self.try_jump(adjacent, target, adjacent.offset(dr, dc), moves);
        }
    }

    /// 飞王：沿斜线滑行任意距离，遇到第一个障碍停止
    fn flying(&self, dr: i8, dc: i8, moves: &mut Vec<Move>) {
        let mut current = self.square.offset(dr, dc);
        let mut distance = 1;
        while distance <= MAX_SLIDE_DISTANCE && self.board.get(current).is_empty() {
            if self.chain_parent.is_none() {
                moves.push(Move::slide(self.piece.side, self.square, current, self.piece.kind, self.piece.kind));
            }
            current = current.offset(dr, dc);
            distance += 1;
        }

        let target = self.board.get(current);
        if !target.is_occupied() {
            return;
        }
        // 被跳棋子之后的每个空格都可以落子，直到下一个障碍
        let mut landing = current.offset(dr, dc);
        while self.board.get(landing).is_empty() {
            self.try_jump(current, target, landing, moves);
            landing = landing.offset(dr, dc);
        }
    }

    fn try_jump(&self, over: Square, target: &Piece, landing: Square, moves: &mut Vec<Move>) {
        if !self.board.get(landing).is_empty() || Some(landing) == self.chain_parent {
            return;
        }
        let side = self.piece.side;
        let next_type = self.next_type(landing);
        if target.is_opponent_of(side) {
            let capture = Capture {
                square: over,
                side: target.side,
                kind: target.kind,
            };
            moves.push(Move::jump_capture(side, self.square, landing, self.piece.kind, next_type, capture));
        } else if self.config.can_jump_own_piece {
            moves.push(Move::jump(side, self.square, landing, self.piece.kind, next_type));
        }
    }

    /// 普通子到达对方底线成王
    fn next_type(&self, end: Square) -> PieceType {
        if self.piece.kind == PieceType::Checker && end.rank as usize == self.piece.side.rank_for_king() {
            PieceType::CheckerKing
        } else {
            self.piece.kind
        }
    }
}
