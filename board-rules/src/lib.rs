//! 回合制棋类规则引擎
//!
//! 包含:
//! - 棋子、棋盘、格子等核心数据结构
//! - 跳棋家族（checkers / dama / draughts）与国际象棋的走法生成
//! - 国际象棋王的安全检查（模拟走子后精确还原）
//! - 回合 / 连跳状态机与悔棋栈
//! - 变体配置与布局文本格式

mod board;
mod chess;
mod constants;
mod draughts;
mod error;
mod game;
mod layout;
mod legality;
mod moves;
mod piece;
mod variant;

pub use board::{Board, SquareDiff};
pub use chess::PROMOTION_TYPES;
pub use constants::*;
pub use error::{ConfigError, Result, RulesError};
pub use game::{AppliedMove, ChainLock, Game, Outcome};
pub use layout::{Layout, Placement};
pub use legality::{is_in_check, is_square_attacked};
pub use moves::{Capture, Move, MoveKind, RookMove};
pub use piece::{Piece, PieceType, Side, Square};
pub use variant::{Ruleset, Variant, VariantConfig};
