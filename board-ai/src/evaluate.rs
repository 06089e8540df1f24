//! 棋局评估函数

use board_rules::{Game, Outcome, PieceType, Side};
use serde::{Deserialize, Serialize};

/// 终局分值，远大于任何子力差
pub const WIN_SCORE: i64 = 1_000_000;

/// 评估器
///
/// 返回值以 `side` 的视角计算，正值对 `side` 有利。
/// 搜索按 negamax 翻转符号，因此实现必须满足
/// `evaluate(game, side) == -evaluate(game, side.opponent())`。
pub trait Evaluator {
    fn evaluate(&self, game: &Game, side: Side) -> i64;
}

/// 加权评估：子力 + 王的数量 + 前进程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedEvaluator {
    /// 乘在 [`PieceType::value`] 上的系数
    pub material: i64,
    /// 每个跳棋王的额外分
    pub king: i64,
    /// 普通子 / 兵每前进一行的分值
    pub advancement: i64,
}

impl Default for WeightedEvaluator {
    fn default() -> Self {
        Self {
            material: 1,
            king: 50,
            advancement: 5,
        }
    }
}

impl WeightedEvaluator {
    /// 单方得分（不含终局判断）
    pub fn side_score(&self, game: &Game, side: Side) -> i64 {
        let mut score = 0;
        for (square, piece) in game.board().iter() {
            if !piece.belongs_to(side) {
                continue;
            }
            score += self.material * piece.kind.value() as i64;
            if piece.kind == PieceType::CheckerKing {
                score += self.king;
            }
            if piece.kind == PieceType::Checker || piece.kind.is_pawn() {
                score += self.advancement * game.advancement(square.rank as usize, side) as i64;
            }
        }
        score
    }
}

impl Evaluator for WeightedEvaluator {
    fn evaluate(&self, game: &Game, side: Side) -> i64 {
        match game.outcome() {
            Some(Outcome::Win { winner }) | Some(Outcome::Checkmate { winner }) => {
                if winner == side {
                    WIN_SCORE
                } else {
                    -WIN_SCORE
                }
            }
            Some(Outcome::Stalemate) => 0,
            None => self.side_score(game, side) - self.side_score(game, side.opponent()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_rules::{Square, Variant};

    const EMPTY: &str = "8";

    #[test]
    fn test_initial_positions_are_balanced() {
        let evaluator = WeightedEvaluator::default();
        for variant in [Variant::checkers(), Variant::dama(), Variant::draughts(), Variant::chess()] {
            let game = Game::with_seed(variant, 5).unwrap();
            assert_eq!(evaluator.evaluate(&game, Side::Near), 0, "{}", game.variant().name);
        }
    }

    #[test]
    fn test_material_advantage() {
        // Near 多一个王
        let game = Game::from_layout(
            &Variant::checkers(),
            &["1c6", EMPTY, EMPTY, EMPTY, EMPTY, EMPTY, "3C4", "K7"],
            Side::Near,
        )
        .unwrap();
        let evaluator = WeightedEvaluator::default();
        let near = evaluator.evaluate(&game, Side::Near);
        assert!(near > 0, "Near 多子应该领先: {}", near);
        assert_eq!(evaluator.evaluate(&game, Side::Far), -near);
    }

    #[test]
    fn test_advancement_bonus() {
        let evaluator = WeightedEvaluator::default();
        let advanced = Game::from_layout(
            &Variant::checkers(),
            &["c7", EMPTY, "3C4", EMPTY, EMPTY, EMPTY, EMPTY, EMPTY],
            Side::Near,
        )
        .unwrap();
        let home = Game::from_layout(
            &Variant::checkers(),
            &["c7", EMPTY, EMPTY, EMPTY, EMPTY, EMPTY, EMPTY, "3C4"],
            Side::Near,
        )
        .unwrap();
        assert!(evaluator.evaluate(&advanced, Side::Near) > evaluator.evaluate(&home, Side::Near));
    }

    #[test]
    fn test_terminal_scores() {
        let evaluator = WeightedEvaluator::default();
        let mut game = Game::from_layout(
            &Variant::checkers(),
            &[EMPTY, EMPTY, EMPTY, "3c4", "4C3", EMPTY, EMPTY, EMPTY],
            Side::Near,
        )
        .unwrap();
        let jump = game
            .get_moves()
            .into_iter()
            .find(|m| m.end == Square::new(2, 2))
            .unwrap();
        game.execute_move(&jump).unwrap();

        assert_eq!(evaluator.evaluate(&game, Side::Near), WIN_SCORE);
        assert_eq!(evaluator.evaluate(&game, Side::Far), -WIN_SCORE);
    }

    #[test]
    fn test_chess_material() {
        // Near 多一个后
        let game = Game::from_layout(
            &Variant::chess(),
            &["4k3", EMPTY, EMPTY, EMPTY, EMPTY, EMPTY, EMPTY, "3QK3"],
            Side::Near,
        )
        .unwrap();
        let score = WeightedEvaluator::default().evaluate(&game, Side::Near);
        assert_eq!(score, PieceType::Queen.value() as i64);
    }
}
