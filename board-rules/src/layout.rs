//! 布局格式解析和生成
//!
//! 一行对应一个 rank（从 rank 0 开始），用 `/` 或独立字符串分隔：
//! - 数字表示连续空格数
//! - 大写字母为 0 号玩家（Near），小写字母为 1 号玩家（Far）
//! - 跳棋家族：`c` 普通子，`k` 王
//! - 国际象棋：`p n b r q k`，兵、车、王均以未移动状态放置
//!
//! 示例（国际象棋初始局面）：
//! `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR`

use crate::board::Board;
use crate::constants::{COLUMNS, RANKS};
use crate::error::ConfigError;
use crate::piece::{PieceType, Side, Square};
use crate::variant::Ruleset;

/// 布局中的一个棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub square: Square,
    pub side: Side,
    pub kind: PieceType,
}

/// 布局格式处理
pub struct Layout;

impl Layout {
    /// 解析 `/` 分隔的布局字符串
    pub fn parse_str(ruleset: Ruleset, layout: &str) -> Result<Vec<Placement>, ConfigError> {
        let rows: Vec<&str> = layout.split('/').collect();
        Self::parse(ruleset, &rows)
    }

    /// 解析按 rank 排列的布局行
    pub fn parse<S: AsRef<str>>(ruleset: Ruleset, rows: &[S]) -> Result<Vec<Placement>, ConfigError> {
        if rows.len() != RANKS {
            return Err(ConfigError::RowCount {
                expected: RANKS,
                actual: rows.len(),
            });
        }

        let mut placements = Vec::new();
        for (rank, row) in rows.iter().enumerate() {
            let mut col = 0usize;
            for ch in row.as_ref().chars() {
                if let Some(run) = ch.to_digit(10) {
                    col += run as usize;
                    continue;
                }
                let kind = Self::piece_from_char(ruleset, ch).ok_or(ConfigError::UnknownPiece { ch, rank })?;
                let side = if ch.is_ascii_uppercase() { Side::Near } else { Side::Far };
                if col < COLUMNS {
                    placements.push(Placement {
                        square: Square::new(rank as i8, col as i8),
                        side,
                        kind,
                    });
                }
                col += 1;
            }
            if col != COLUMNS {
                return Err(ConfigError::RowWidth {
                    rank,
                    width: col,
                    expected: COLUMNS,
                });
            }
        }
        Ok(placements)
    }

    /// 把布局放到空棋盘上
    pub fn build_board(placements: &[Placement]) -> Board {
        let mut board = Board::empty();
        for placement in placements {
            board.set(placement.square, placement.kind, placement.side);
        }
        board
    }

    /// 生成布局字符串（子状态不保留）
    pub fn render(board: &Board) -> String {
        let mut rows = Vec::with_capacity(RANKS);
        for rank in 0..RANKS {
            let mut row = String::new();
            let mut empty = 0;
            for col in 0..COLUMNS {
                let piece = board.get(Square::new(rank as i8, col as i8));
                match Self::piece_to_char(piece.kind) {
                    Some(c) => {
                        if empty > 0 {
                            row.push_str(&empty.to_string());
                            empty = 0;
                        }
                        row.push(if piece.side == Side::Near { c.to_ascii_uppercase() } else { c });
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }
        rows.join("/")
    }

    fn piece_from_char(ruleset: Ruleset, ch: char) -> Option<PieceType> {
        let kind = match (ruleset, ch.to_ascii_lowercase()) {
            (Ruleset::Draughts, 'c') => PieceType::Checker,
            (Ruleset::Draughts, 'k') => PieceType::CheckerKing,
            (Ruleset::Chess, 'p') => PieceType::PawnIdle,
            (Ruleset::Chess, 'n') => PieceType::Knight,
            (Ruleset::Chess, 'b') => PieceType::Bishop,
            (Ruleset::Chess, 'r') => PieceType::RookIdle,
            (Ruleset::Chess, 'q') => PieceType::Queen,
            (Ruleset::Chess, 'k') => PieceType::KingIdle,
            _ => return None,
        };
        Some(kind)
    }

    fn piece_to_char(kind: PieceType) -> Option<char> {
        let c = match kind {
            PieceType::Empty | PieceType::Unavailable => return None,
            PieceType::Checker => 'c',
            PieceType::CheckerKing => 'k',
            PieceType::Pawn | PieceType::PawnIdle | PieceType::PawnEnPassant | PieceType::PawnToBePromoted => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook | PieceType::RookIdle => 'r',
            PieceType::Queen => 'q',
            PieceType::King | PieceType::KingIdle | PieceType::KingChecked | PieceType::KingCheckedIdle => 'k',
        };
        Some(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHESS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    #[test]
    fn test_parse_chess() {
        let placements = Layout::parse_str(Ruleset::Chess, CHESS).unwrap();
        assert_eq!(placements.len(), 32);

        let board = Layout::build_board(&placements);
        assert_eq!(board.get(Square::new(7, 4)).kind, PieceType::KingIdle);
        assert_eq!(board.get(Square::new(7, 4)).side, Side::Near);
        assert_eq!(board.get(Square::new(1, 0)).kind, PieceType::PawnIdle);
        assert_eq!(board.get(Square::new(1, 0)).side, Side::Far);
        assert_eq!(board.get(Square::new(0, 7)).kind, PieceType::RookIdle);
    }

    #[test]
    fn test_render_round_trip() {
        let board = Layout::build_board(&Layout::parse_str(Ruleset::Chess, CHESS).unwrap());
        assert_eq!(Layout::render(&board), CHESS);
    }

    #[test]
    fn test_invalid_layouts() {
        assert_eq!(
            Layout::parse_str(Ruleset::Draughts, "8/8/8"),
            Err(ConfigError::RowCount { expected: 8, actual: 3 })
        );
        assert_eq!(
            Layout::parse_str(Ruleset::Draughts, "7/8/8/8/8/8/8/8"),
            Err(ConfigError::RowWidth {
                rank: 0,
                width: 7,
                expected: 8
            })
        );
        // 跳棋规则集中没有后
        assert_eq!(
            Layout::parse_str(Ruleset::Draughts, "q7/8/8/8/8/8/8/8"),
            Err(ConfigError::UnknownPiece { ch: 'q', rank: 0 })
        );
    }
}
