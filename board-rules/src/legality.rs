//! 国际象棋王的安全检查
//!
//! 包含格子受攻击查询，以及“模拟走子 -> 检查 -> 精确还原”的合法性过滤。

use crate::board::Board;
use crate::constants::MAX_SLIDE_DISTANCE;
use crate::moves::{Move, MoveKind};
use crate::piece::{PieceType, Side, Square};

pub(crate) const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
pub(crate) const DIAGONAL: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
pub(crate) const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];
pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// 检查 `square` 是否被 `by` 方攻击
pub fn is_square_attacked(board: &Board, square: Square, by: Side) -> bool {
    let attacker = |sq: Square, test: fn(PieceType) -> bool| {
        let piece = board.get(sq);
        piece.belongs_to(by) && test(piece.kind)
    };

    if KNIGHT_OFFSETS
        .iter()
        .any(|&(dr, dc)| attacker(square.offset(dr, dc), |k| k == PieceType::Knight))
    {
        return true;
    }

    // 兵从前进方向斜着攻击，反推兵所在的格子
    let back = -by.forward();
    if [-1, 1]
        .iter()
        .any(|&dc| attacker(square.offset(back, dc), |k| k.is_pawn()))
    {
        return true;
    }

    if ALL_DIRECTIONS
        .iter()
        .any(|&(dr, dc)| attacker(square.offset(dr, dc), |k| k.is_chess_king()))
    {
        return true;
    }

    let rook_like = |k: PieceType| k.is_rook() || k == PieceType::Queen;
    let bishop_like = |k: PieceType| k == PieceType::Bishop || k == PieceType::Queen;
    ORTHOGONAL
        .iter()
        .any(|&(dr, dc)| ray_hits(board, square, dr, dc, by, rook_like))
        || DIAGONAL
            .iter()
            .any(|&(dr, dc)| ray_hits(board, square, dr, dc, by, bishop_like))
}

/// 沿射线找到第一个棋子，判断是否为指定攻击者
fn ray_hits(board: &Board, from: Square, dr: i8, dc: i8, by: Side, test: impl Fn(PieceType) -> bool) -> bool {
    let mut current = from;
    for _ in 0..MAX_SLIDE_DISTANCE {
        current = current.offset(dr, dc);
        let piece = board.get(current);
        if piece.is_empty() {
            continue;
        }
        return piece.belongs_to(by) && test(piece.kind);
    }
    false
}

/// 检查指定玩家的王是否被将军
pub fn is_in_check(board: &Board, side: Side) -> bool {
    match board.find_king(side) {
        Some(king) => is_square_attacked(board, king, side.opponent()),
        None => false,
    }
}

/// 过滤掉会让己方王被攻击的走法
///
/// `scratch` 必须与当前棋盘的棋子布局一致；每个候选走法模拟后都会被精确还原，
/// 因此调用前后 `scratch` 不变。升变换子不改变王的安全，直接保留。
pub(crate) fn filter_legal(scratch: &mut Board, candidates: Vec<Move>) -> Vec<Move> {
    candidates
        .into_iter()
        .filter(|mv| {
            if mv.kind == MoveKind::Swap || !mv.has_destination() {
                return true;
            }
            let diff = scratch.apply(mv);
            let safe = !is_in_check(scratch, mv.side);
            scratch.revert(&diff);
            safe
        })
        .collect()
}
