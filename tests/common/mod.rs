#![allow(dead_code)]

use chapter_sim::log::{EventLog, LogEvent};

pub const TIMERS: &str = r#"
timers:
  - { event_type: increase_atk, event_time_cost: 2 }
  - { event_type: increase_def, event_time_cost: 2 }
  - { event_type: increase_max_hp, event_time_cost: 2 }
  - { event_type: restore_hp, event_time_cost: 2 }
  - { event_type: battle_player_turn, event_time_cost: 1 }
  - { event_type: battle_enemy_turn, event_time_cost: 1 }
  - { event_type: meta_progression, event_time_cost: 5 }
"#;

pub const PROFILES: &str = r#"
player_behavior:
  - { player_type: casual, simulate: "FALSE", sessions_per_day: 2, session_time: 5 }
  - { player_type: hardcore, simulate: "TRUE", sessions_per_day: 4, session_time: 1000000000 }
"#;

/// Player 10/5/50 against one slime, the canonical smoke test
pub fn slime_yaml() -> String {
    format!(
        r#"
player:
  - {{ stat_name: atk, stat_initial_value: 10, stat_meta_bonus_base: 1, stat_meta_bonus_exp: 1, stat_meta_cost_base: 100, stat_meta_cost_exp: 10 }}
  - {{ stat_name: def, stat_initial_value: 5, stat_meta_bonus_base: 1, stat_meta_bonus_exp: 1, stat_meta_cost_base: 100, stat_meta_cost_exp: 10 }}
  - {{ stat_name: max_hp, stat_initial_value: 50, stat_meta_bonus_base: 1, stat_meta_bonus_exp: 1, stat_meta_cost_base: 100, stat_meta_cost_exp: 10 }}
enemies:
  - {{ enemy_type: slime, enemy_atk: 3, enemy_def: 2, enemy_max_hp: 20 }}
chapters:
  - {{ chapter_num: 1, day_num: 1, daily_event: battle, daily_event_param: slime, gold_reward: 10 }}
{PROFILES}{TIMERS}"#
    )
}

/// Three chapters that need a few economy rounds to get through
pub fn campaign_yaml() -> String {
    format!(
        r#"
player:
  - {{ stat_name: atk, stat_initial_value: 10, stat_meta_bonus_base: 3, stat_meta_bonus_exp: 3, stat_meta_cost_base: 5, stat_meta_cost_exp: 2 }}
  - {{ stat_name: def, stat_initial_value: 2, stat_meta_bonus_base: 1, stat_meta_bonus_exp: 1, stat_meta_cost_base: 8, stat_meta_cost_exp: 4 }}
  - {{ stat_name: max_hp, stat_initial_value: 40, stat_meta_bonus_base: 10, stat_meta_bonus_exp: 10, stat_meta_cost_base: 6, stat_meta_cost_exp: 3 }}
enemies:
  - {{ enemy_type: slime, enemy_atk: 4, enemy_def: 1, enemy_max_hp: 15 }}
  - {{ enemy_type: orc, enemy_atk: 9, enemy_def: 3, enemy_max_hp: 40 }}
  - {{ enemy_type: troll, enemy_atk: 14, enemy_def: 6, enemy_max_hp: 90 }}
chapters:
  - {{ chapter_num: 1, day_num: 1, daily_event: battle, daily_event_param: slime, gold_reward: 8 }}
  - {{ chapter_num: 1, day_num: 2, daily_event: increase_def, daily_event_param: 1, gold_reward: 2 }}
  - {{ chapter_num: 2, day_num: 1, daily_event: restore_hp, daily_event_param: 10, gold_reward: 3 }}
  - {{ chapter_num: 2, day_num: 2, daily_event: battle, daily_event_param: orc, gold_reward: 15 }}
  - {{ chapter_num: 3, day_num: 1, daily_event: increase_atk, daily_event_param: 2, gold_reward: 4 }}
  - {{ chapter_num: 3, day_num: 2, daily_event: battle, daily_event_param: troll, gold_reward: 40 }}
{PROFILES}{TIMERS}"#
    )
}

/// (rounds_done, chapter_level, victory) of every round record, in order
pub fn rounds(log: &EventLog) -> Vec<(u32, u32, bool)> {
    log.iter()
        .filter_map(|e| match e.event {
            LogEvent::RoundCompleted {
                rounds_done,
                chapter_level,
                victory,
            } => Some((rounds_done, chapter_level, victory)),
            _ => None,
        })
        .collect()
}
