//! 棋子与格子定义

use serde::{Deserialize, Serialize};

use crate::constants::{COLUMNS, NUM_PLAYERS, RANKS};
use crate::moves::Move;

/// 棋子类型
///
/// 西洋跳棋家族与国际象棋共用同一套类型；国际象棋的兵、车、王带有
/// “未移动 / 已移动 / 特殊”子状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    /// 空格
    Empty,
    /// 棋盘外的哨兵
    Unavailable,
    /// 跳棋普通子（man）
    Checker,
    /// 跳棋王
    CheckerKing,
    /// 已移动过的兵
    Pawn,
    /// 未移动过的兵（可以前进两格）
    PawnIdle,
    /// 刚刚前进两格的兵（下一回合可以被吃过路兵）
    PawnEnPassant,
    /// 到达底线、等待选择升变的兵
    PawnToBePromoted,
    /// 马
    Knight,
    /// 象
    Bishop,
    /// 已移动过的车
    Rook,
    /// 未移动过的车（可以参与王车易位）
    RookIdle,
    /// 后
    Queen,
    /// 已移动过的王（未被将军）
    King,
    /// 未移动过的王（未被将军）
    KingIdle,
    /// 已移动过的王（被将军）
    KingChecked,
    /// 未移动过的王（被将军）
    KingCheckedIdle,
}

impl PieceType {
    pub fn is_empty(&self) -> bool {
        *self == PieceType::Empty
    }

    pub fn is_unavailable(&self) -> bool {
        *self == PieceType::Unavailable
    }

    /// 格子上是否有真实棋子
    pub fn is_occupied(&self) -> bool {
        !matches!(self, PieceType::Empty | PieceType::Unavailable)
    }

    /// 是否属于跳棋家族
    pub fn is_checker_family(&self) -> bool {
        matches!(self, PieceType::Checker | PieceType::CheckerKing)
    }

    pub fn is_pawn(&self) -> bool {
        matches!(
            self,
            PieceType::Pawn | PieceType::PawnIdle | PieceType::PawnEnPassant | PieceType::PawnToBePromoted
        )
    }

    pub fn is_rook(&self) -> bool {
        matches!(self, PieceType::Rook | PieceType::RookIdle)
    }

    pub fn is_chess_king(&self) -> bool {
        matches!(
            self,
            PieceType::King | PieceType::KingIdle | PieceType::KingChecked | PieceType::KingCheckedIdle
        )
    }

    /// 是否为“王”（跳棋王或国际象棋王），用于评估
    pub fn is_king(&self) -> bool {
        *self == PieceType::CheckerKing || self.is_chess_king()
    }

    /// 是否处于未移动状态
    pub fn is_idle(&self) -> bool {
        matches!(
            self,
            PieceType::PawnIdle | PieceType::RookIdle | PieceType::KingIdle | PieceType::KingCheckedIdle
        )
    }

    pub fn is_checked(&self) -> bool {
        matches!(self, PieceType::KingChecked | PieceType::KingCheckedIdle)
    }

    /// 移动一次之后的类型
    pub fn moved(&self) -> PieceType {
        match self {
            PieceType::PawnIdle | PieceType::PawnEnPassant => PieceType::Pawn,
            PieceType::RookIdle => PieceType::Rook,
            PieceType::KingIdle | PieceType::KingChecked | PieceType::KingCheckedIdle => PieceType::King,
            other => *other,
        }
    }

    /// 设置王的被将军显示状态，保留未移动子状态；非王类型原样返回
    pub fn with_check(&self, checked: bool) -> PieceType {
        match (self, checked) {
            (PieceType::King | PieceType::KingChecked, false) => PieceType::King,
            (PieceType::King | PieceType::KingChecked, true) => PieceType::KingChecked,
            (PieceType::KingIdle | PieceType::KingCheckedIdle, false) => PieceType::KingIdle,
            (PieceType::KingIdle | PieceType::KingCheckedIdle, true) => PieceType::KingCheckedIdle,
            (other, _) => *other,
        }
    }

    /// 子力分值（用于 AI 评估）
    pub fn value(&self) -> i32 {
        match self {
            PieceType::Empty | PieceType::Unavailable => 0,
            PieceType::Checker => 100,
            PieceType::CheckerKing => 175,
            PieceType::Pawn | PieceType::PawnIdle | PieceType::PawnEnPassant => 100,
            PieceType::PawnToBePromoted => 900,
            PieceType::Knight => 300,
            PieceType::Bishop => 325,
            PieceType::Rook | PieceType::RookIdle => 500,
            PieceType::Queen => 900,
            // 王不会被吃掉，不计子力
            PieceType::King | PieceType::KingIdle | PieceType::KingChecked | PieceType::KingCheckedIdle => 0,
        }
    }
}

/// 玩家（座位）
///
/// `Near` 为 0 号玩家，初始位于高 rank 一侧，向 rank 0 前进；
/// `Far` 为 1 号玩家，初始位于 rank 0 一侧，向高 rank 前进。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Near,
    Far,
}

impl Side {
    /// 所有玩家，按座位顺序
    pub const ALL: [Side; NUM_PLAYERS] = [Side::Near, Side::Far];

    /// 座位编号
    pub fn index(&self) -> usize {
        match self {
            Side::Near => 0,
            Side::Far => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Side> {
        Self::ALL.get(index).copied()
    }

    /// 获取下一位玩家
    pub fn opponent(&self) -> Side {
        match self {
            Side::Near => Side::Far,
            Side::Far => Side::Near,
        }
    }

    /// 前进方向（rank 增量）
    pub fn forward(&self) -> i8 {
        match self {
            Side::Near => -1,
            Side::Far => 1,
        }
    }

    /// 升变 / 成王所在的 rank
    pub fn rank_for_king(&self) -> usize {
        match self {
            Side::Near => 0,
            Side::Far => RANKS - 1,
        }
    }

    /// 距离起始底线的推进距离
    pub fn advancement(&self, rank: usize) -> usize {
        match self {
            Side::Near => RANKS - 1 - rank,
            Side::Far => rank,
        }
    }
}

/// 棋盘格子 (rank, column)
///
/// 坐标可以越界；越界的格子在棋盘上对应“不可用”哨兵棋子。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub rank: i8,
    pub col: i8,
}

impl Square {
    pub const fn new(rank: i8, col: i8) -> Self {
        Self { rank, col }
    }

    /// 检查格子是否在棋盘内
    pub fn is_on_board(&self) -> bool {
        self.rank >= 0 && (self.rank as usize) < RANKS && self.col >= 0 && (self.col as usize) < COLUMNS
    }

    /// 获取偏移后的格子（可能越界）
    pub fn offset(&self, d_rank: i8, d_col: i8) -> Square {
        Square::new(self.rank + d_rank, self.col + d_col)
    }

    /// 转换为数组索引
    pub fn to_index(&self) -> Option<usize> {
        if self.is_on_board() {
            Some(self.rank as usize * COLUMNS + self.col as usize)
        } else {
            None
        }
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < RANKS * COLUMNS {
            Some(Square::new((index / COLUMNS) as i8, (index % COLUMNS) as i8))
        } else {
            None
        }
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.rank, self.col)
    }
}

/// 棋子
///
/// 每个棋子持有一份仅对当前局面有效的候选走法列表。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub side: Side,
    pub kind: PieceType,
    #[serde(default)]
    pub(crate) moves: Vec<Move>,
}

impl Piece {
    /// 创建新棋子
    pub fn new(kind: PieceType, side: Side) -> Self {
        Self { side, kind, moves: Vec::new() }
    }

    pub fn empty() -> Self {
        Self::new(PieceType::Empty, Side::Near)
    }

    pub const fn unavailable() -> Self {
        Self {
            side: Side::Near,
            kind: PieceType::Unavailable,
            moves: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_empty()
    }

    pub fn is_unavailable(&self) -> bool {
        self.kind.is_unavailable()
    }

    pub fn is_occupied(&self) -> bool {
        self.kind.is_occupied()
    }

    /// 是否是指定玩家的棋子
    pub fn belongs_to(&self, side: Side) -> bool {
        self.is_occupied() && self.side == side
    }

    /// 是否是指定玩家的对手棋子
    pub fn is_opponent_of(&self, side: Side) -> bool {
        self.is_occupied() && self.side != side
    }

    /// 当前局面下的候选走法
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn num_moves(&self) -> usize {
        self.moves.len()
    }
}

impl Default for Piece {
    fn default() -> Self {
        Self::empty()
    }
}
