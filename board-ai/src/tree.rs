//! 决策树
//!
//! 节点只保存走法和分值，不保存局面；搜索在同一个 [`Game`](board_rules::Game)
//! 上执行 / 撤销走法来构建整棵树。

use board_rules::{Move, Side};
use serde::{Deserialize, Serialize};

/// 决策树节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionNode {
    /// 到达本节点的走法，根节点为 `None`
    pub mv: Option<Move>,
    /// 走出 `mv` 的玩家，`value` 以他的视角计算；根节点为搜索方
    pub player: Side,
    pub value: i64,
    pub children: Vec<DecisionNode>,
}

impl DecisionNode {
    pub fn root(player: Side) -> Self {
        Self {
            mv: None,
            player,
            value: 0,
            children: Vec::new(),
        }
    }

    pub fn new(mv: Move, player: Side) -> Self {
        Self {
            mv: Some(mv),
            player,
            value: 0,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// 整棵子树的节点数（含自身）
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(DecisionNode::size).sum::<usize>()
    }

    /// 子树的最大深度，叶子为 0
    pub fn depth(&self) -> usize {
        self.children.iter().map(|child| child.depth() + 1).max().unwrap_or(0)
    }

    /// 子节点按分值从高到低排序（稳定排序，同分保持生成顺序）
    pub fn sort_children(&mut self) {
        self.children.sort_by(|a, b| b.value.cmp(&a.value));
    }

    /// 对轮到走棋的一方最好的子节点（同分取最早生成的）
    pub fn best_child(&self) -> Option<&DecisionNode> {
        self.children
            .iter()
            .reduce(|best, child| if child.value > best.value { child } else { best })
    }

    /// 从子节点回溯分值
    ///
    /// 子节点的分值以 `to_move` 的视角计算；`to_move` 与本节点玩家不同时翻转符号。
    pub(crate) fn back_up(&mut self, to_move: Side) {
        if let Some(best) = self.best_child().map(|child| child.value) {
            self.value = if to_move == self.player { best } else { -best };
        }
    }
}
