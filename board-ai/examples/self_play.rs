//! AI 自我对弈
//!
//! 运行方式:
//! ```bash
//! cargo run -p board-ai --example self_play -- checkers
//! ```

use board_ai::{AiEngine, Difficulty, SearchConfig};
use board_rules::{Game, Variant};

const MAX_PLIES: u32 = 200;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let name = std::env::args().nth(1).unwrap_or_else(|| "checkers".to_string());
    let variant = match name.as_str() {
        "dama" => Variant::dama(),
        "draughts" => Variant::draughts(),
        "chess" => Variant::chess(),
        _ => Variant::checkers(),
    };

    let mut game = Game::with_seed(variant, 2024)?;
    let mut engine = AiEngine::new(SearchConfig::from_difficulty(Difficulty::Medium).with_seed(2024))?;

    println!("=== {} 自我对弈 ===\n", game.variant().name);
    let mut plies = 0;
    while plies < MAX_PLIES {
        let Some(mv) = engine.search(&mut game)? else {
            break;
        };
        game.execute_move(&mv)?;
        plies += 1;
        println!("{:>3}. {}  (节点数 {})", plies, mv, engine.nodes_searched());
    }

    println!("\n终局: {}", game);
    match game.outcome() {
        Some(outcome) => println!("结果: {:?}", outcome),
        None => println!("达到 {} 步上限，未分胜负", MAX_PLIES),
    }
    Ok(())
}
