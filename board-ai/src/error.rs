//! 搜索错误类型

use board_rules::RulesError;
use thiserror::Error;

/// 搜索错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// 执行或撤销走法失败，说明搜索与对局状态不同步
    #[error("Rules engine rejected a search step: {0}")]
    Rules(#[from] RulesError),

    #[error("Invalid search config: {reason}")]
    InvalidConfig { reason: String },
}

pub type Result<T> = std::result::Result<T, SearchError>;
