//! Debug script to print the player meta stats and the enemies of one chapter

use chapter_sim::battle::damage;
use chapter_sim::config::{GameConfig, StatKind};
use chapter_sim::day::DailyEvent;
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: {} <config> [chapter]", args[0]);
        std::process::exit(2);
    }

    let config = match GameConfig::from_file(&args[1]) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    println!("\n=== PLAYER META STATS ===");
    for kind in StatKind::ALL {
        let s = config.player_stat(kind);
        println!(
            "  {:<7} initial {:>5}  growth {:>4}  cost {:>5} + {:>4}/level",
            kind.key(),
            s.initial_value,
            s.bonus_growth,
            s.cost_base,
            s.cost_growth
        );
    }

    let chapters: Vec<u32> = match args.get(2).map(|s| s.parse::<u32>()) {
        Some(Ok(n)) => vec![n],
        Some(Err(_)) => {
            eprintln!("chapter must be a positive integer, got '{}'", args[2]);
            std::process::exit(2);
        }
        None => (1..=config.get_total_chapters()).collect(),
    };

    let atk = config.player_stat(StatKind::Atk).initial_value;
    let def = config.player_stat(StatKind::Def).initial_value;

    for chapter_num in chapters {
        let days = config.get_chapter_config(chapter_num);
        println!("\n=== CHAPTER {} ({} days) ===", chapter_num, days.len());
        for day in days {
            match &day.event {
                DailyEvent::Battle(enemy) => println!(
                    "  day {:>3}: battle {:<12} atk {:>4}  def {:>4}  hp {:>5}  | dmg dealt {:>4}  taken {:>4}  gold {}",
                    day.day_num,
                    enemy.enemy_type,
                    enemy.attack,
                    enemy.defense,
                    enemy.max_hp,
                    damage(atk, enemy.defense),
                    damage(enemy.attack, def),
                    day.gold_reward
                ),
                other => println!(
                    "  day {:>3}: {:<19} {:>5}  gold {}",
                    day.day_num,
                    other.event_type(),
                    other.param(),
                    day.gold_reward
                ),
            }
        }
    }
}
