//! 回合制棋类 AI 引擎
//!
//! 包含:
//! - 棋局评估函数
//! - 决策树
//! - Minimax (negamax) 搜索，连跳不消耗深度
//! - 时间限制与协作式取消

mod error;
mod evaluate;
mod search;
mod tree;

pub use error::{Result, SearchError};
pub use evaluate::{Evaluator, WeightedEvaluator, WIN_SCORE};
pub use search::{AiEngine, CancelFlag, Difficulty, SearchConfig};
pub use tree::DecisionNode;
