//! 错误类型定义

use thiserror::Error;

use crate::piece::Side;

/// 对局操作错误
///
/// 这些错误都属于调用方误用：出现时当前操作立即中止，棋局状态保持不变。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// 游戏已结束，必须先调用 `new_game`
    #[error("Game is already over")]
    GameOver,

    /// 不是该玩家的回合
    #[error("Not your turn: expected {expected:?}, got {actual:?}")]
    NotYourTurn { expected: Side, actual: Side },

    /// 走法不在当前合法走法集合中
    #[error("Illegal move: {description}")]
    IllegalMove { description: String },

    /// 悔棋栈为空
    #[error("Nothing to undo")]
    NothingToUndo,

    /// 当前没有可以主动结束的连跳
    #[error("No capture chain can be ended now")]
    NoChainToEnd,
}

/// 变体配置错误（构造阶段）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 布局行数不对
    #[error("Layout must have {expected} rows, got {actual}")]
    RowCount { expected: usize, actual: usize },

    /// 某一行宽度不对
    #[error("Layout row {rank} has width {width} (expected {expected})")]
    RowWidth { rank: usize, width: usize, expected: usize },

    /// 无法识别的布局字符
    #[error("Unknown layout character '{ch}' at rank {rank}")]
    UnknownPiece { ch: char, rank: usize },

    /// 国际象棋规则集不支持跳吃类配置
    #[error("Jump predicates are not defined for the chess ruleset")]
    JumpRulesOnChess,

    /// 某方在初始布局中没有棋子
    #[error("Layout places no pieces for {side:?}")]
    EmptySide { side: Side },
}

/// 对局操作结果类型
pub type Result<T> = std::result::Result<T, RulesError>;
