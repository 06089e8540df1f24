//! 变体配置
//!
//! 跳棋家族（checkers / dama / draughts）共用一个走法生成器，只通过谓词
//! 配置和初始布局区分；国际象棋使用独立的生成算法。

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::layout::{Layout, Placement};
use crate::piece::Side;

/// 走法生成算法族
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ruleset {
    /// 跳棋家族
    Draughts,
    /// 国际象棋
    Chess,
}

/// 跳棋家族的规则谓词
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VariantConfig {
    /// 有跳必跳
    pub mandatory_jumps: bool,
    /// 普通子可以向后跳吃
    pub men_jump_backwards: bool,
    /// 可以跳过己方棋子（不吃子）
    pub can_jump_own_piece: bool,
    /// 王可以沿斜线走任意距离
    pub flying_kings: bool,
}

impl VariantConfig {
    /// 美式跳棋：不强制跳吃
    pub fn checkers() -> Self {
        Self::default()
    }

    pub fn dama() -> Self {
        Self {
            mandatory_jumps: true,
            ..Self::default()
        }
    }

    pub fn draughts() -> Self {
        Self {
            mandatory_jumps: true,
            men_jump_backwards: true,
            can_jump_own_piece: false,
            flying_kings: true,
        }
    }

    /// 国际象棋不使用任何跳吃谓词
    pub fn chess() -> Self {
        Self::default()
    }

    fn has_jump_rules(&self) -> bool {
        self.mandatory_jumps || self.men_jump_backwards || self.can_jump_own_piece || self.flying_kings
    }
}

/// 游戏变体：规则集 + 谓词配置 + 初始布局
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    pub ruleset: Ruleset,
    pub config: VariantConfig,
    /// 初始布局，每个 rank 一行
    pub layout: Vec<String>,
}

const CHECKERS_LAYOUT: [&str; 8] = [
    "1c1c1c1c", "c1c1c1c1", "1c1c1c1c", "8", "8", "C1C1C1C1", "1C1C1C1C", "C1C1C1C1",
];

// 意式棋盘的深色格与美式相反
const DAMA_LAYOUT: [&str; 8] = [
    "c1c1c1c1", "1c1c1c1c", "c1c1c1c1", "8", "8", "1C1C1C1C", "C1C1C1C1", "1C1C1C1C",
];

const CHESS_LAYOUT: [&str; 8] = [
    "rnbqkbnr", "pppppppp", "8", "8", "8", "8", "PPPPPPPP", "RNBQKBNR",
];

impl Variant {
    /// 自定义变体
    pub fn custom<S: Into<String>>(name: S, ruleset: Ruleset, config: VariantConfig, layout: &[&str]) -> Self {
        Self {
            name: name.into(),
            ruleset,
            config,
            layout: layout.iter().map(|row| row.to_string()).collect(),
        }
    }

    pub fn checkers() -> Self {
        Self::custom("checkers", Ruleset::Draughts, VariantConfig::checkers(), &CHECKERS_LAYOUT)
    }

    pub fn dama() -> Self {
        Self::custom("dama", Ruleset::Draughts, VariantConfig::dama(), &DAMA_LAYOUT)
    }

    pub fn draughts() -> Self {
        Self::custom("draughts", Ruleset::Draughts, VariantConfig::draughts(), &CHECKERS_LAYOUT)
    }

    pub fn chess() -> Self {
        Self::custom("chess", Ruleset::Chess, VariantConfig::chess(), &CHESS_LAYOUT)
    }

    /// 同一变体换一个布局（用于残局或测试局面）
    pub fn with_layout(&self, layout: &[&str]) -> Self {
        Self::custom(self.name.clone(), self.ruleset, self.config, layout)
    }

    /// 校验配置并解析初始布局
    pub fn validate(&self) -> Result<Vec<Placement>, ConfigError> {
        if self.ruleset == Ruleset::Chess && self.config.has_jump_rules() {
            return Err(ConfigError::JumpRulesOnChess);
        }
        let placements = Layout::parse(self.ruleset, &self.layout)?;
        for side in Side::ALL {
            if !placements.iter().any(|p| p.side == side) {
                return Err(ConfigError::EmptySide { side });
            }
        }
        Ok(placements)
    }
}
