//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::constants::{COLUMNS, RANKS};
use crate::moves::{Move, MoveKind};
use crate::piece::{Piece, PieceType, Side, Square};

/// 棋盘外格子统一返回的哨兵
static UNAVAILABLE: Piece = Piece::unavailable();

/// 被改动格子的原状态，用于精确撤销
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareDiff {
    pub square: Square,
    pub side: Side,
    pub kind: PieceType,
}

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// RANKS x COLUMNS，索引为 rank * COLUMNS + col
    squares: Vec<Piece>,
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: vec![Piece::empty(); RANKS * COLUMNS],
        }
    }

    /// 获取指定格子的棋子，越界时返回“不可用”哨兵
    pub fn get(&self, square: Square) -> &Piece {
        match square.to_index() {
            Some(index) => &self.squares[index],
            None => &UNAVAILABLE,
        }
    }

    pub(crate) fn get_mut(&mut self, square: Square) -> Option<&mut Piece> {
        square.to_index().map(|index| &mut self.squares[index])
    }

    /// 放置棋子（越界时忽略），该格的走法列表被清空
    pub fn set(&mut self, square: Square, kind: PieceType, side: Side) {
        if let Some(piece) = self.get_mut(square) {
            *piece = Piece::new(kind, side);
        }
    }

    /// 清空格子
    pub fn clear(&mut self, square: Square) {
        self.set(square, PieceType::Empty, Side::Near);
    }

    /// 遍历所有格子
    pub fn iter(&self) -> impl Iterator<Item = (Square, &Piece)> + '_ {
        self.squares.iter().enumerate().filter_map(|(index, piece)| {
            Square::from_index(index).map(|square| (square, piece))
        })
    }

    /// 获取指定玩家所有棋子所在的格子
    pub fn squares_of(&self, side: Side) -> Vec<Square> {
        self.iter()
            .filter(|(_, piece)| piece.belongs_to(side))
            .map(|(square, _)| square)
            .collect()
    }

    /// 统计指定玩家的棋子数量
    pub fn count(&self, side: Side) -> usize {
        self.iter().filter(|(_, piece)| piece.belongs_to(side)).count()
    }

    /// 查找指定玩家的国际象棋王
    pub fn find_king(&self, side: Side) -> Option<Square> {
        self.iter()
            .find(|(_, piece)| piece.belongs_to(side) && piece.kind.is_chess_king())
            .map(|(square, _)| square)
    }

    /// 只复制棋子布局（不含走法列表），用作模拟走子的草稿棋盘
    pub(crate) fn positions(&self) -> Board {
        Board {
            squares: self.squares.iter().map(|piece| Piece::new(piece.kind, piece.side)).collect(),
        }
    }

    /// 清空所有棋子的走法列表
    pub(crate) fn clear_moves(&mut self) {
        for piece in &mut self.squares {
            piece.moves.clear();
        }
    }

    /// 写入格子并记录原状态
    pub(crate) fn write(&mut self, square: Square, kind: PieceType, side: Side, diff: &mut Vec<SquareDiff>) {
        let prior = self.get(square);
        if prior.is_unavailable() {
            return;
        }
        diff.push(SquareDiff {
            square,
            side: prior.side,
            kind: prior.kind,
        });
        self.set(square, kind, side);
    }

    /// 执行走法的棋盘效果（不检查规则），返回可用于撤销的差异
    pub(crate) fn apply(&mut self, mv: &Move) -> Vec<SquareDiff> {
        let mut diff = Vec::with_capacity(4);
        match mv.kind {
            MoveKind::Slide | MoveKind::Jump | MoveKind::JumpCapture => {
                if let Some(capture) = mv.capture {
                    self.write(capture.square, PieceType::Empty, Side::Near, &mut diff);
                }
                self.write(mv.start, PieceType::Empty, Side::Near, &mut diff);
                self.write(mv.end, mv.next_type, mv.side, &mut diff);
            }
            MoveKind::Swap => {
                self.write(mv.start, mv.next_type, mv.side, &mut diff);
            }
            MoveKind::Castle => {
                self.write(mv.start, PieceType::Empty, Side::Near, &mut diff);
                self.write(mv.end, mv.next_type, mv.side, &mut diff);
                if let Some(rook) = mv.castle_rook {
                    let rook_type = self.get(rook.start).kind.moved();
                    self.write(rook.start, PieceType::Empty, Side::Near, &mut diff);
                    self.write(rook.end, rook_type, mv.side, &mut diff);
                }
            }
            MoveKind::End => {}
        }
        diff
    }

    /// 按逆序回放差异，恢复到走法之前的棋盘
    pub(crate) fn revert(&mut self, diff: &[SquareDiff]) {
        for entry in diff.iter().rev() {
            self.set(entry.square, entry.kind, entry.side);
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}
