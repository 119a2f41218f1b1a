mod common;

use chapter_sim::config::{EngineSettings, GameConfig, StatKind};
use chapter_sim::day::DailyEvent;
use chapter_sim::log::{ActionKind, LogEvent};
use chapter_sim::simulation::simulate;
use chapter_sim::SimError;
use common::{campaign_yaml, slime_yaml, PROFILES, TIMERS};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_yaml_file() {
    let file = write_temp(".yaml", &campaign_yaml());
    let config = GameConfig::from_file(file.path()).unwrap();

    assert_eq!(config.get_total_chapters(), 3);
    assert_eq!(config.player_stat(StatKind::MaxHp).initial_value, 40);
    assert_eq!(config.selected_behavior().name, "hardcore");
    assert_eq!(config.enemies().len(), 3);
}

#[test]
fn loads_json_file_with_same_content() {
    let value: serde_yaml::Value = serde_yaml::from_str(&campaign_yaml()).unwrap();
    let json = serde_json::to_string(&value).unwrap();
    let file = write_temp(".json", &json);

    let from_json = GameConfig::from_file(file.path()).unwrap();
    let from_yaml = GameConfig::from_yaml(&campaign_yaml()).unwrap();

    for n in 1..=3 {
        assert_eq!(from_json.get_chapter_config(n), from_yaml.get_chapter_config(n));
    }
    assert_eq!(from_json.time_costs(), from_yaml.time_costs());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = GameConfig::from_file(dir.path().join("nope.yaml")).unwrap_err();
    assert!(matches!(err, SimError::Io(_)));
}

#[test]
fn chapter_rows_may_come_in_any_order() {
    let yaml = format!(
        r#"
player:
  - {{ stat_name: max_hp, stat_initial_value: 50, stat_meta_bonus_exp: 1, stat_meta_cost_base: 1, stat_meta_cost_exp: 1 }}
  - {{ stat_name: def, stat_initial_value: 5, stat_meta_bonus_exp: 1, stat_meta_cost_base: 1, stat_meta_cost_exp: 1 }}
  - {{ stat_name: atk, stat_initial_value: 10, stat_meta_bonus_exp: 1, stat_meta_cost_base: 1, stat_meta_cost_exp: 1 }}
enemies:
  - {{ enemy_type: Slime, atk: 3, def: 2, max_hp: 20 }}
chapters:
  - {{ chapter_num: 2, day_num: 1, daily_event: battle, daily_event_param: slime, gold_reward: 1 }}
  - {{ chapter_num: 1, day_num: 3, daily_event: restore_hp, daily_event_param: 4, gold_reward: 1 }}
  - {{ chapter_num: 1, day_num: 1, daily_event: increase_max_hp, daily_event_param: 7, gold_reward: 1 }}
{PROFILES}{TIMERS}"#
    );
    let config = GameConfig::from_yaml(&yaml).unwrap();

    let chapter1 = config.get_chapter_config(1);
    assert_eq!(chapter1[0].event, DailyEvent::IncreaseMaxHp(7));
    assert_eq!(chapter1[1].event, DailyEvent::RestoreHp(4));
    assert!(config.get_chapter_config(2)[0].is_battle());
    assert_eq!(config.player_stat(StatKind::Atk).initial_value, 10);
}

#[test]
fn load_time_errors_name_the_problem() {
    let base = campaign_yaml();

    let bad_event = base.replace("daily_event: restore_hp", "daily_event: nap");
    assert!(matches!(
        GameConfig::from_yaml(&bad_event).unwrap_err(),
        SimError::UnknownEventType { chapter_num: 2, day_num: 1, .. }
    ));

    let bad_enemy = base.replace("daily_event_param: orc", "daily_event_param: dragon");
    assert!(matches!(
        GameConfig::from_yaml(&bad_enemy).unwrap_err(),
        SimError::UnknownEnemy { .. }
    ));

    let gap = base
        .replace("chapter_num: 2, day_num: 1", "chapter_num: 4, day_num: 1")
        .replace("chapter_num: 2, day_num: 2", "chapter_num: 4, day_num: 2");
    assert!(matches!(GameConfig::from_yaml(&gap).unwrap_err(), SimError::ChapterGap(2)));

    let no_timer = base.replace("  - { event_type: meta_progression, event_time_cost: 5 }\n", "");
    assert!(matches!(
        GameConfig::from_yaml(&no_timer).unwrap_err(),
        SimError::MissingTimeCost("meta_progression")
    ));

    let two_selected = base.replace("simulate: \"FALSE\"", "simulate: \"TRUE\"");
    assert!(matches!(
        GameConfig::from_yaml(&two_selected).unwrap_err(),
        SimError::MultipleSimulatedProfiles(_)
    ));

    let bad_number = base.replace("daily_event_param: 10,", "daily_event_param: \"ten\",");
    assert!(matches!(
        GameConfig::from_yaml(&bad_number).unwrap_err(),
        SimError::MalformedField { table: "chapters", .. }
    ));
}

#[test]
fn extreme_amounts_load_and_simulate_without_overflow() {
    let yaml = slime_yaml().replace(
        "  - { chapter_num: 1, day_num: 1, daily_event: battle",
        "  - { chapter_num: 1, day_num: 1, daily_event: increase_atk, daily_event_param: 9223372036854775807, gold_reward: 0 }\n  \
         - { chapter_num: 1, day_num: 2, daily_event: restore_hp, daily_event_param: 9223372036854775807, gold_reward: 0 }\n  \
         - { chapter_num: 1, day_num: 3, daily_event: battle",
    );
    let config = GameConfig::from_yaml(&yaml).unwrap();
    assert_eq!(config.get_chapter_config(1)[1].event, DailyEvent::RestoreHp(i64::MAX));

    let report = simulate(&config, EngineSettings::default()).unwrap();
    assert_eq!(report.summary.chapters_cleared, 1);
    assert_eq!(report.log.count(ActionKind::PlayerAttack), 1);
    assert_eq!(report.log.count(ActionKind::EnemyAttack), 0);

    let hp: Vec<i64> = report
        .log
        .filter(ActionKind::DayCompleted)
        .filter_map(|e| match e.event {
            LogEvent::DayCompleted { player_hp, .. } => Some(player_hp),
            _ => None,
        })
        .collect();
    assert_eq!(hp, vec![50, 50, 50]);
}

#[test]
fn zero_engine_ceilings_are_rejected() {
    for table in ["engine: { max_rounds: 0 }", "engine: { max_battle_rounds: 0 }"] {
        let yaml = format!("{}\n{}", table, campaign_yaml());
        match GameConfig::from_yaml(&yaml).unwrap_err() {
            SimError::MalformedField { table, field, .. } => {
                assert_eq!(table, "engine");
                assert!(yaml.contains(&field));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
