//! 规则引擎常量定义

/// 棋盘行数（rank）
pub const RANKS: usize = 8;

/// 棋盘列数（column）
pub const COLUMNS: usize = 8;

/// 玩家数量
pub const NUM_PLAYERS: usize = 2;

/// 滑行棋子的最大步数（车、象、后以及飞王）
pub const MAX_SLIDE_DISTANCE: i8 = if RANKS > COLUMNS { RANKS as i8 } else { COLUMNS as i8 };

/// 每个棋子走法列表的预分配容量
pub const MOVE_LIST_CAPACITY: usize = 16;
