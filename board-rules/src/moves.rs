//! 走法记录

use serde::{Deserialize, Serialize};

use crate::piece::{PieceType, Side, Square};

/// 走法类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// 普通移动（国际象棋的非吃子移动也归为此类）
    Slide,
    /// 不吃子的跳跃（跳过己方棋子，或兵前进两格）
    Jump,
    /// 吃子
    JumpCapture,
    /// 原地换类型（兵升变）
    Swap,
    /// 王车易位
    Castle,
    /// 主动结束连跳
    End,
}

/// 被吃掉的棋子快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capture {
    pub square: Square,
    pub side: Side,
    pub kind: PieceType,
}

/// 王车易位中车的移动
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RookMove {
    pub start: Square,
    pub end: Square,
}

/// 走法
///
/// 创建后不可变；`start_type` 与 `next_type` 记录走子棋子移动前后的类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub side: Side,
    pub kind: MoveKind,
    pub start: Square,
    pub end: Square,
    pub start_type: PieceType,
    pub next_type: PieceType,
    pub capture: Option<Capture>,
    pub castle_rook: Option<RookMove>,
}

impl Move {
    fn base(kind: MoveKind, side: Side, start: Square, end: Square, start_type: PieceType, next_type: PieceType) -> Self {
        Self {
            side,
            kind,
            start,
            end,
            start_type,
            next_type,
            capture: None,
            castle_rook: None,
        }
    }

    pub fn slide(side: Side, start: Square, end: Square, start_type: PieceType, next_type: PieceType) -> Self {
        Self::base(MoveKind::Slide, side, start, end, start_type, next_type)
    }

    pub fn jump(side: Side, start: Square, end: Square, start_type: PieceType, next_type: PieceType) -> Self {
        Self::base(MoveKind::Jump, side, start, end, start_type, next_type)
    }

    /// 创建吃子走法
    pub fn jump_capture(
        side: Side,
        start: Square,
        end: Square,
        start_type: PieceType,
        next_type: PieceType,
        capture: Capture,
    ) -> Self {
        let mut mv = Self::base(MoveKind::JumpCapture, side, start, end, start_type, next_type);
        mv.capture = Some(capture);
        mv
    }

    /// 创建原地升变走法
    pub fn swap(side: Side, square: Square, start_type: PieceType, next_type: PieceType) -> Self {
        Self::base(MoveKind::Swap, side, square, square, start_type, next_type)
    }

    /// 创建王车易位走法（start/end 为王的格子）
    pub fn castle(side: Side, start: Square, end: Square, start_type: PieceType, rook: RookMove) -> Self {
        let mut mv = Self::base(MoveKind::Castle, side, start, end, start_type, start_type.moved());
        mv.castle_rook = Some(rook);
        mv
    }

    /// 创建结束连跳的合成走法
    pub fn end(side: Side, square: Square, kind: PieceType) -> Self {
        Self::base(MoveKind::End, side, square, square, kind, kind)
    }

    /// 是否为跳跃（包括吃子）
    pub fn is_jump(&self) -> bool {
        matches!(self.kind, MoveKind::Jump | MoveKind::JumpCapture)
    }

    pub fn is_capture(&self) -> bool {
        self.capture.is_some()
    }

    /// 是否有真正的落点（结束连跳与原地升变没有）
    pub fn has_destination(&self) -> bool {
        !matches!(self.kind, MoveKind::End | MoveKind::Swap)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            MoveKind::End => write!(f, "{:?} end at {}", self.side, self.start),
            MoveKind::Swap => write!(f, "{:?} {:?} -> {:?} at {}", self.side, self.start_type, self.next_type, self.start),
            _ => {
                write!(f, "{:?} {:?} {} -> {}", self.side, self.kind, self.start, self.end)?;
                if let Some(capture) = self.capture {
                    write!(f, " x{}", capture.square)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_castle_marks_king_moved() {
        let rook = RookMove {
            start: Square::new(7, 7),
            end: Square::new(7, 5),
        };
        let mv = Move::castle(Side::Near, Square::new(7, 4), Square::new(7, 6), PieceType::KingIdle, rook);
        assert_eq!(mv.next_type, PieceType::King);
        assert_eq!(mv.castle_rook, Some(rook));
        assert!(mv.has_destination());
    }

    #[test]
    fn test_move_predicates() {
        let capture = Capture {
            square: Square::new(4, 3),
            side: Side::Far,
            kind: PieceType::Checker,
        };
        let mv = Move::jump_capture(
            Side::Near,
            Square::new(5, 4),
            Square::new(3, 2),
            PieceType::Checker,
            PieceType::Checker,
            capture,
        );
        assert!(mv.is_jump());
        assert!(mv.is_capture());
        assert_eq!(mv.to_string(), "Near JumpCapture (5, 4) -> (3, 2) x(4, 3)");

        let end = Move::end(Side::Near, Square::new(3, 2), PieceType::Checker);
        assert!(!end.has_destination());
        assert!(!end.is_jump());
    }
}
