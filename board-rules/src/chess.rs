//! 国际象棋走法生成

use crate::board::Board;
use crate::constants::{MAX_SLIDE_DISTANCE, MOVE_LIST_CAPACITY};
use crate::legality::{filter_legal, is_square_attacked, ALL_DIRECTIONS, DIAGONAL, KNIGHT_OFFSETS, ORTHOGONAL};
use crate::moves::{Capture, Move, RookMove};
use crate::piece::{Piece, PieceType, Square};

/// 兵升变可选的类型
pub const PROMOTION_TYPES: [PieceType; 4] = [PieceType::Rook, PieceType::Knight, PieceType::Bishop, PieceType::Queen];

/// 棋子的移动方式：方向表 + 最大步数
struct Movement {
    directions: &'static [(i8, i8)],
    max_distance: i8,
}

fn movement(kind: PieceType) -> Option<Movement> {
    let (directions, max_distance): (&'static [(i8, i8)], i8) = match kind {
        PieceType::Knight => (&KNIGHT_OFFSETS[..], 1),
        PieceType::Bishop => (&DIAGONAL[..], MAX_SLIDE_DISTANCE),
        PieceType::Rook | PieceType::RookIdle => (&ORTHOGONAL[..], MAX_SLIDE_DISTANCE),
        PieceType::Queen => (&ALL_DIRECTIONS[..], MAX_SLIDE_DISTANCE),
        k if k.is_chess_king() => (&ALL_DIRECTIONS[..], 1),
        _ => return None,
    };
    Some(Movement {
        directions,
        max_distance,
    })
}

/// 生成指定格子上棋子的合法走法
///
/// `scratch` 为与当前棋盘布局一致的草稿棋盘，用于模拟走子检查王的安全；返回时保持不变。
pub(crate) fn generate(scratch: &mut Board, square: Square) -> Vec<Move> {
    let candidates = pseudo_legal(scratch, square);
    filter_legal(scratch, candidates)
}

/// 生成伪合法走法（不考虑己方王是否被攻击，王车易位除外）
pub(crate) fn pseudo_legal(board: &Board, square: Square) -> Vec<Move> {
    let piece = board.get(square);
    let mut moves = Vec::with_capacity(MOVE_LIST_CAPACITY);
    if !piece.is_occupied() || piece.kind.is_checker_family() {
        return moves;
    }

    if piece.kind == PieceType::PawnToBePromoted {
        for next_type in PROMOTION_TYPES {
            moves.push(Move::swap(piece.side, square, piece.kind, next_type));
        }
        return moves;
    }

    if piece.kind.is_pawn() {
        pawn_moves(board, square, piece, &mut moves);
        return moves;
    }

    if let Some(movement) = movement(piece.kind) {
        for &(dr, dc) in movement.directions {
            for distance in 1..=movement.max_distance {
                let to = square.offset(dr * distance, dc * distance);
                let target = board.get(to);
                if target.is_empty() {
                    moves.push(Move::slide(piece.side, square, to, piece.kind, piece.kind.moved()));
                    continue;
                }
                if target.is_opponent_of(piece.side) {
                    moves.push(capture_move(piece, square, to, target, to, piece.kind.moved()));
                }
                break;
            }
        }
    }

    if piece.kind == PieceType::KingIdle {
        castle_moves(board, square, piece, &mut moves);
    }
    moves
}

fn capture_move(piece: &Piece, from: Square, to: Square, target: &Piece, at: Square, next_type: PieceType) -> Move {
    let capture = Capture {
        square: at,
        side: target.side,
        kind: target.kind,
    };
    Move::jump_capture(piece.side, from, to, piece.kind, next_type, capture)
}

/// 兵：单步 / 双步前进、斜吃、吃过路兵
fn pawn_moves(board: &Board, square: Square, piece: &Piece, moves: &mut Vec<Move>) {
    let side = piece.side;
    let forward = side.forward();
    let advance_type = |to: Square| {
        if to.rank as usize == side.rank_for_king() {
            PieceType::PawnToBePromoted
        } else {
            PieceType::Pawn
        }
    };

    let one = square.offset(forward, 0);
    if board.get(one).is_empty() {
        moves.push(Move::slide(side, square, one, piece.kind, advance_type(one)));

        let two = one.offset(forward, 0);
        if piece.kind == PieceType::PawnIdle && board.get(two).is_empty() {
            moves.push(Move::jump(side, square, two, piece.kind, PieceType::PawnEnPassant));
        }
    }

    for dc in [-1, 1] {
        let to = square.offset(forward, dc);
        let target = board.get(to);
        if target.is_opponent_of(side) {
            moves.push(capture_move(piece, square, to, target, to, advance_type(to)));
            continue;
        }

        // 吃过路兵：旁边是刚前进两格的对方兵
        let beside = square.offset(0, dc);
        let passed = board.get(beside);
        if target.is_empty() && passed.is_opponent_of(side) && passed.kind == PieceType::PawnEnPassant {
            moves.push(capture_move(piece, square, to, passed, beside, advance_type(to)));
        }
    }
}

/// 王车易位：王和车都未移动，中间全空，王经过和到达的格子（包括起点）都不受攻击
fn castle_moves(board: &Board, square: Square, king: &Piece, moves: &mut Vec<Move>) {
    let opponent = king.side.opponent();
    for dc in [-1i8, 1] {
        let mut rook_square = square.offset(0, dc);
        let mut distance = 1;
        while board.get(rook_square).is_empty() {
            rook_square = rook_square.offset(0, dc);
            distance += 1;
        }
        let rook = board.get(rook_square);
        if !rook.belongs_to(king.side) || rook.kind != PieceType::RookIdle || distance < 3 {
            continue;
        }

        let path = [square, square.offset(0, dc), square.offset(0, 2 * dc)];
        if path.iter().any(|&sq| is_square_attacked(board, sq, opponent)) {
            continue;
        }
        let rook_move = RookMove {
            start: rook_square,
            end: square.offset(0, dc),
        };
        moves.push(Move::castle(king.side, square, square.offset(0, 2 * dc), king.kind, rook_move));
    }
}
