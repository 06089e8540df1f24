//! 搜索引擎
//!
//! 在对局上深度优先展开决策树：执行走法、递归、撤销，不复制局面。
//! 连跳 / 升变等同一玩家的后续步骤不消耗深度，换人时按 negamax 翻转符号。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use board_rules::{Game, Move};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SearchError};
use crate::evaluate::{Evaluator, WeightedEvaluator};
use crate::tree::DecisionNode;

/// AI 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// 搜索配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub difficulty: Difficulty,
    /// 换人的层数，连跳不计入
    pub max_depth: u8,
    pub time_limit_ms: u64,
    /// 同一玩家连续走子的上限，防止可跳己方棋子时无限连跳
    pub max_chain_steps: u8,
    /// 随机选择一个根节点走法的概率
    pub random_pick_chance: f64,
    /// 随机数种子，`None` 时使用系统熵
    pub seed: Option<u64>,
}

impl SearchConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                difficulty,
                max_depth: 2,
                time_limit_ms: 500,
                max_chain_steps: 12,
                random_pick_chance: 0.3,
                seed: None,
            },
            Difficulty::Medium => Self {
                difficulty,
                max_depth: 3,
                time_limit_ms: 2000,
                max_chain_steps: 12,
                random_pick_chance: 0.0,
                seed: None,
            },
            Difficulty::Hard => Self {
                difficulty,
                max_depth: 5,
                time_limit_ms: 5000,
                max_chain_steps: 12,
                random_pick_chance: 0.0,
                seed: None,
            },
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(SearchError::InvalidConfig {
                reason: "max_depth must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.random_pick_chance) {
            return Err(SearchError::InvalidConfig {
                reason: format!("random_pick_chance {} is outside [0, 1]", self.random_pick_chance),
            });
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Medium)
    }
}

/// 协作式取消标志，可跨线程克隆共享
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// AI 引擎
pub struct AiEngine<E: Evaluator = WeightedEvaluator> {
    config: SearchConfig,
    evaluator: E,
    cancel: CancelFlag,
    rng: ChaCha8Rng,
    nodes_searched: u64,
}

impl AiEngine<WeightedEvaluator> {
    /// 使用默认评估器创建
    pub fn new(config: SearchConfig) -> Result<Self> {
        Self::with_evaluator(config, WeightedEvaluator::default())
    }

    /// 从难度创建（预设配置总是有效的）
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::build(SearchConfig::from_difficulty(difficulty), WeightedEvaluator::default())
    }
}

fn rng_for(config: &SearchConfig) -> ChaCha8Rng {
    match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// 单次搜索的截止条件
struct Limits {
    deadline: Instant,
    cancel: CancelFlag,
}

impl Limits {
    fn reached(&self) -> bool {
        self.cancel.is_cancelled() || Instant::now() >= self.deadline
    }
}

impl<E: Evaluator> AiEngine<E> {
    pub fn with_evaluator(config: SearchConfig, evaluator: E) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, evaluator))
    }

    fn build(config: SearchConfig, evaluator: E) -> Self {
        let rng = rng_for(&config);
        Self {
            config,
            evaluator,
            cancel: CancelFlag::new(),
            rng,
            nodes_searched: 0,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// 取消标志的句柄，可交给其他线程调用 [`CancelFlag::cancel`]
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// 上一次搜索展开的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// 为当前玩家构建决策树
    ///
    /// 返回时对局恢复到调用前的状态。超时或被取消时返回已经展开的部分，
    /// 未展开的节点使用静态评估。
    pub fn build_tree(&mut self, game: &mut Game) -> Result<DecisionNode> {
        self.nodes_searched = 0;
        let limits = Limits {
            deadline: Instant::now() + Duration::from_millis(self.config.time_limit_ms),
            cancel: self.cancel.clone(),
        };
        let mut root = DecisionNode::root(game.cur_player());
        self.expand(game, &mut root, self.config.max_depth, 0, &limits)?;
        root.sort_children();
        debug!(
            nodes = self.nodes_searched,
            tree_depth = root.depth(),
            value = root.value,
            "search finished"
        );
        Ok(root)
    }

    /// 搜索最佳走法，对局已结束时返回 `None`
    pub fn search(&mut self, game: &mut Game) -> Result<Option<Move>> {
        if game.is_game_over() {
            return Ok(None);
        }
        let moves = game.get_moves();
        if moves.len() <= 1 {
            return Ok(moves.first().copied());
        }

        if self.rng.gen_bool(self.config.random_pick_chance) {
            if let Some(mv) = moves.choose(&mut self.rng) {
                debug!(%mv, "random pick");
                return Ok(Some(*mv));
            }
        }

        let root = self.build_tree(game)?;
        // 一个子节点都没展开时退回第一个合法走法
        Ok(root.best_child().and_then(|child| child.mv).or(moves.first().copied()))
    }

    fn expand(
        &mut self,
        game: &mut Game,
        node: &mut DecisionNode,
        depth: u8,
        chain_steps: u8,
        limits: &Limits,
    ) -> Result<()> {
        self.nodes_searched += 1;
        if depth == 0 || game.is_game_over() || limits.reached() {
            node.value = self.evaluator.evaluate(game, node.player);
            return Ok(());
        }

        let to_move = game.cur_player();
        for mv in game.get_moves() {
            game.execute_move(&mv)?;
            let mut child = DecisionNode::new(mv, to_move);
            let same_player = game.cur_player() == to_move && !game.is_game_over();

            let expanded = if !same_player {
                self.expand(game, &mut child, depth - 1, 0, limits)
            } else if chain_steps < self.config.max_chain_steps {
                self.expand(game, &mut child, depth, chain_steps + 1, limits)
            } else {
                self.nodes_searched += 1;
                child.value = self.evaluator.evaluate(game, to_move);
                Ok(())
            };
            // 无论递归是否出错都先撤销，保证执行 / 撤销成对
            game.undo()?;
            expanded?;

            node.children.push(child);
            if limits.reached() {
                break;
            }
        }

        node.back_up(to_move);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_rules::{MoveKind, Outcome, Ruleset, Side, Square, Variant, VariantConfig};

    const EMPTY: &str = "8";

    fn engine(depth: u8) -> AiEngine {
        let config = SearchConfig {
            max_depth: depth,
            time_limit_ms: 60_000,
            ..SearchConfig::from_difficulty(Difficulty::Medium).with_seed(11)
        };
        AiEngine::new(config).unwrap()
    }

    #[test]
    fn test_difficulty_config() {
        let easy = SearchConfig::from_difficulty(Difficulty::Easy);
        assert_eq!(easy.max_depth, 2);
        assert!(easy.random_pick_chance > 0.0);

        let medium = SearchConfig::default();
        assert_eq!(medium.difficulty, Difficulty::Medium);
        assert_eq!(medium.random_pick_chance, 0.0);

        let hard = SearchConfig::from_difficulty(Difficulty::Hard);
        assert!(hard.max_depth > medium.max_depth);
        assert!(hard.time_limit_ms > medium.time_limit_ms);
    }

    #[test]
    fn test_invalid_config() {
        let zero_depth = SearchConfig {
            max_depth: 0,
            ..SearchConfig::default()
        };
        assert!(matches!(AiEngine::new(zero_depth), Err(SearchError::InvalidConfig { .. })));

        let bad_chance = SearchConfig {
            random_pick_chance: 1.5,
            ..SearchConfig::default()
        };
        assert!(AiEngine::new(bad_chance).is_err());
    }

    #[test]
    fn test_search_takes_free_capture() {
        let mut game = Game::from_layout(
            &Variant::checkers(),
            &["7c", EMPTY, EMPTY, EMPTY, "3c4", "4C3", EMPTY, EMPTY],
            Side::Near,
        )
        .unwrap();
        let mv = engine(2).search(&mut game).unwrap().unwrap();
        assert_eq!(mv.kind, MoveKind::JumpCapture);
        assert_eq!(mv.end, Square::new(3, 2));
    }

    #[test]
    fn test_search_finds_mate_in_one() {
        let mut game = Game::from_layout(
            &Variant::chess(),
            &["k7", EMPTY, "1K6", EMPTY, EMPTY, EMPTY, EMPTY, "7Q"],
            Side::Near,
        )
        .unwrap();
        let mv = engine(2).search(&mut game).unwrap().unwrap();
        assert_eq!(game.execute_move(&mv), Ok(Some(Outcome::Checkmate { winner: Side::Near })));
    }

    #[test]
    fn test_search_leaves_game_unchanged() {
        let mut game = Game::with_seed(Variant::draughts(), 4).unwrap();
        let board = game.board().clone();
        let player = game.cur_player();

        let mut engine = engine(3);
        let root = engine.build_tree(&mut game).unwrap();

        assert_eq!(game.board(), &board);
        assert_eq!(game.cur_player(), player);
        assert!(!game.can_undo());
        assert_eq!(root.children.len(), game.get_moves().len());
        assert_eq!(engine.nodes_searched() as usize, root.size());
    }

    #[test]
    fn test_chain_steps_do_not_consume_depth() {
        // 第一跳之后仍由 Near 走，第二跳在同一层展开
        let mut game = Game::from_layout(
            &Variant::dama(),
            &["7c", EMPTY, "3c4", "8", "3c4", "4C3", EMPTY, EMPTY],
            Side::Near,
        )
        .unwrap();
        let root = engine(1).build_tree(&mut game).unwrap();

        assert_eq!(root.children.len(), 1);
        let first = &root.children[0];
        assert_eq!(first.mv.unwrap().end, Square::new(3, 2));
        assert_eq!(first.children.len(), 1);
        let second = &first.children[0];
        assert_eq!(second.mv.unwrap().end, Square::new(1, 4));
        assert!(second.is_leaf());
        assert_eq!(second.player, Side::Near);
        // 两跳吃掉两个子，链上分值不翻转
        assert_eq!(first.value, second.value);
        assert!(root.value > 0);
    }

    #[test]
    fn test_chain_step_limit() {
        // 可以跳己方棋子时，王绕着四个己方棋子能一直连跳下去
        let config = VariantConfig {
            can_jump_own_piece: true,
            ..VariantConfig::checkers()
        };
        let variant = Variant::custom("self-jump", Ruleset::Draughts, config, &[]);
        let mut game = Game::from_layout(
            &variant,
            &["c7", EMPTY, "4K3", "3C1C2", EMPTY, "3C1C2", EMPTY, EMPTY],
            Side::Near,
        )
        .unwrap();
        let board = game.board().clone();
        let search = SearchConfig {
            max_depth: 1,
            max_chain_steps: 3,
            time_limit_ms: 60_000,
            ..SearchConfig::default()
        };
        let root = AiEngine::new(search).unwrap().build_tree(&mut game).unwrap();

        // 首跳 + 3 次后续连跳
        assert_eq!(root.depth(), 4);
        assert_eq!(game.board(), &board);
        assert!(!game.can_undo());
    }

    #[test]
    fn test_cancel_before_search() {
        let mut game = Game::with_seed(Variant::checkers(), 2).unwrap();
        let mut engine = engine(3);
        let flag = engine.cancel_flag();
        flag.cancel();

        let mv = engine.search(&mut game).unwrap();
        assert_eq!(mv, game.get_moves().first().copied());
        assert_eq!(engine.nodes_searched(), 1);

        flag.reset();
        engine.search(&mut game).unwrap();
        assert!(engine.nodes_searched() > 1);
    }

    #[test]
    fn test_random_pick_is_seeded() {
        let config = SearchConfig {
            max_depth: 1,
            random_pick_chance: 1.0,
            ..SearchConfig::from_difficulty(Difficulty::Easy).with_seed(99)
        };
        let mut game = Game::with_seed(Variant::chess(), 1).unwrap();
        let mut first = AiEngine::new(config.clone()).unwrap();
        let a = first.search(&mut game).unwrap();
        let b = AiEngine::new(config).unwrap().search(&mut game).unwrap();
        assert_eq!(a, b);
        assert!(game.get_moves().contains(&a.unwrap()));
        // 随机选择时不构建决策树
        assert_eq!(first.nodes_searched(), 0);
    }

    #[test]
    fn test_from_difficulty_uses_preset() {
        let engine = AiEngine::from_difficulty(Difficulty::Hard);
        assert_eq!(engine.config(), &SearchConfig::from_difficulty(Difficulty::Hard));
        assert_eq!(engine.nodes_searched(), 0);
        assert!(!engine.cancel_flag().is_cancelled());
    }

    #[test]
    fn test_search_on_finished_game() {
        let mut game = Game::from_layout(
            &Variant::checkers(),
            &[EMPTY, EMPTY, EMPTY, "3c4", "4C3", EMPTY, EMPTY, EMPTY],
            Side::Near,
        )
        .unwrap();
        let jump = game.get_moves().into_iter().find(|m| m.is_jump()).unwrap();
        game.execute_move(&jump).unwrap();
        assert_eq!(engine(2).search(&mut game), Ok(None));
    }
}
