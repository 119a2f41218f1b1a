//! Configuration tables for the chapter simulator
//!
//! The balance data comes as five row tables (player stats, enemies, chapters,
//! player behavior profiles, action timers), the same shape as the design
//! spreadsheet. Rows are deserialized into raw structs, then validated once into
//! a [`GameConfig`] so the engine never has to look anything up by column name.

use crate::day::{DailyEvent, DayEvent};
use crate::error::{Result, SimError};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

/// One of the three upgradable player attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Atk,
    Def,
    MaxHp,
}

impl StatKind {
    /// Declaration order, also the tie-break order of the upgrade policy.
    pub const ALL: [StatKind; 3] = [StatKind::Atk, StatKind::Def, StatKind::MaxHp];

    pub fn key(self) -> &'static str {
        match self {
            StatKind::Atk => "atk",
            StatKind::Def => "def",
            StatKind::MaxHp => "max_hp",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            StatKind::Atk => 0,
            StatKind::Def => 1,
            StatKind::MaxHp => 2,
        }
    }
}

// Custom deserializer for case-insensitive matching
impl<'de> Deserialize<'de> for StatKind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.trim().to_lowercase().as_str() {
            "atk" | "attack" => Ok(StatKind::Atk),
            "def" | "defense" => Ok(StatKind::Def),
            "max_hp" | "maxhp" | "hp" => Ok(StatKind::MaxHp),
            _ => Err(serde::de::Error::unknown_variant(&s, &["atk", "def", "max_hp"])),
        }
    }
}

/// Accepts `true`/`false` as well as the spreadsheet's `"TRUE"`/`"FALSE"` strings
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Text(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" | "" => Ok(false),
            _ => Err(serde::de::Error::invalid_value(
                serde::de::Unexpected::Str(&s),
                &"TRUE or FALSE",
            )),
        },
    }
}

/// Raw `daily_event_param` cell: an amount for stat/heal events, an enemy name for battles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw rows, as they come out of YAML/JSON
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStatRow {
    pub stat_name: StatKind,
    #[serde(alias = "initial_value")]
    pub stat_initial_value: i64,
    #[serde(alias = "bonus_base", default)]
    pub stat_meta_bonus_base: i64,
    #[serde(alias = "bonus_growth")]
    pub stat_meta_bonus_exp: i64,
    #[serde(alias = "cost_base")]
    pub stat_meta_cost_base: i64,
    #[serde(alias = "cost_growth")]
    pub stat_meta_cost_exp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyRow {
    pub enemy_type: String,
    #[serde(alias = "atk")]
    pub enemy_atk: i64,
    #[serde(alias = "def")]
    pub enemy_def: i64,
    #[serde(alias = "max_hp")]
    pub enemy_max_hp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterRow {
    pub chapter_num: u32,
    pub day_num: u32,
    pub daily_event: String,
    #[serde(default)]
    pub daily_event_param: Option<ParamValue>,
    #[serde(default)]
    pub gold_reward: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorRow {
    pub player_type: String,
    #[serde(deserialize_with = "deserialize_flag", default)]
    pub simulate: bool,
    pub sessions_per_day: u32,
    pub session_time: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerRow {
    #[serde(alias = "action")]
    pub event_type: String,
    #[serde(alias = "time_cost")]
    pub event_time_cost: f64,
}

/// The five tables exactly as provided, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTables {
    pub player: Vec<PlayerStatRow>,
    pub enemies: Vec<EnemyRow>,
    pub chapters: Vec<ChapterRow>,
    pub player_behavior: Vec<BehaviorRow>,
    pub timers: Vec<TimerRow>,
    #[serde(default)]
    pub engine: Option<EngineSettings>,
}

// ---------------------------------------------------------------------------
// Validated projections
// ---------------------------------------------------------------------------

/// Growth curve of one upgradable stat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatConfig {
    pub kind: StatKind,
    pub initial_value: i64,
    pub bonus_base: i64,
    pub bonus_growth: i64,
    pub cost_base: i64,
    pub cost_growth: i64,
}

/// Base stats of one enemy type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyConfig {
    pub enemy_type: String,
    pub attack: i64,
    pub defense: i64,
    pub max_hp: i64,
}

/// How long and how often a player type plays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorProfile {
    pub name: String,
    pub simulate: bool,
    pub sessions_per_day: u32,
    pub session_time: f64,
}

/// Every action of the engine that consumes play time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimedAction {
    IncreaseAtk,
    IncreaseDef,
    IncreaseMaxHp,
    RestoreHp,
    BattlePlayerTurn,
    BattleEnemyTurn,
    MetaProgression,
}

impl TimedAction {
    pub const ALL: [TimedAction; 7] = [
        TimedAction::IncreaseAtk,
        TimedAction::IncreaseDef,
        TimedAction::IncreaseMaxHp,
        TimedAction::RestoreHp,
        TimedAction::BattlePlayerTurn,
        TimedAction::BattleEnemyTurn,
        TimedAction::MetaProgression,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TimedAction::IncreaseAtk => "increase_atk",
            TimedAction::IncreaseDef => "increase_def",
            TimedAction::IncreaseMaxHp => "increase_max_hp",
            TimedAction::RestoreHp => "restore_hp",
            TimedAction::BattlePlayerTurn => "battle_player_turn",
            TimedAction::BattleEnemyTurn => "battle_enemy_turn",
            TimedAction::MetaProgression => "meta_progression",
        }
    }
}

/// Time cost per [`TimedAction`], all keys guaranteed present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeCosts {
    costs: [f64; 7],
}

impl TimeCosts {
    pub fn cost(&self, action: TimedAction) -> f64 {
        self.costs[action as usize]
    }

    /// Same cost for every action (handy for tests and quick configs)
    pub fn uniform(cost: f64) -> Self {
        Self { costs: [cost; 7] }
    }

    fn from_rows(rows: &[TimerRow]) -> Result<Self> {
        let mut costs = [0.0; 7];
        for action in TimedAction::ALL {
            let row = rows
                .iter()
                .find(|r| r.event_type.trim().eq_ignore_ascii_case(action.key()))
                .ok_or(SimError::MissingTimeCost(action.key()))?;
            if !row.event_time_cost.is_finite() || row.event_time_cost < 0.0 {
                return Err(SimError::malformed(
                    "timers",
                    action.key(),
                    format!("time cost must be a non-negative number, got {}", row.event_time_cost),
                ));
            }
            costs[action as usize] = row.event_time_cost;
        }
        Ok(Self { costs })
    }
}

/// Loop-safety thresholds of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Hard ceiling on chapter attempts in one run
    pub max_rounds: u32,
    /// Hard ceiling on rounds in one battle
    pub max_battle_rounds: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_rounds: 1000,
            max_battle_rounds: 100_000,
        }
    }
}

impl EngineSettings {
    /// A zero ceiling would abort every run before it starts
    pub fn validate(&self) -> Result<()> {
        if self.max_rounds == 0 {
            return Err(SimError::malformed("engine", "max_rounds", "must be at least 1"));
        }
        if self.max_battle_rounds == 0 {
            return Err(SimError::malformed("engine", "max_battle_rounds", "must be at least 1"));
        }
        Ok(())
    }
}

/// Fully validated configuration snapshot, immutable for the duration of a run
#[derive(Debug, Clone)]
pub struct GameConfig {
    player_stats: [StatConfig; 3],
    enemies: Vec<EnemyConfig>,
    chapters: Vec<Vec<DayEvent>>,
    behaviors: Vec<BehaviorProfile>,
    selected_behavior: usize,
    time_costs: TimeCosts,
    engine: EngineSettings,
}

impl GameConfig {
    /// Load a configuration from a YAML or JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let path_str = path.as_ref().to_string_lossy().to_lowercase();

        // Check if it's JSON or YAML
        if path_str.ends_with(".json") {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let tables: RawTables = serde_yaml::from_str(yaml)?;
        Self::from_tables(tables)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let tables: RawTables = serde_json::from_str(json)?;
        Self::from_tables(tables)
    }

    /// Validate raw tables. Malformed rows are rejected here, never at first use.
    pub fn from_tables(tables: RawTables) -> Result<Self> {
        let player_stats = parse_player_stats(&tables.player)?;
        let enemies = parse_enemies(&tables.enemies)?;
        let chapters = parse_chapters(&tables.chapters, &enemies)?;
        let (behaviors, selected_behavior) = parse_behaviors(&tables.player_behavior)?;
        let time_costs = TimeCosts::from_rows(&tables.timers)?;
        let engine = tables.engine.unwrap_or_default();
        engine.validate()?;

        Ok(Self {
            player_stats,
            enemies,
            chapters,
            behaviors,
            selected_behavior,
            time_costs,
            engine,
        })
    }

    /// Number of chapters, which are numbered `1..=total`
    pub fn get_total_chapters(&self) -> u32 {
        self.chapters.len() as u32
    }

    /// Ordered day events of one chapter; empty for an out-of-range number
    pub fn get_chapter_config(&self, chapter_num: u32) -> &[DayEvent] {
        chapter_num
            .checked_sub(1)
            .and_then(|i| self.chapters.get(i as usize))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn player_stat(&self, kind: StatKind) -> &StatConfig {
        &self.player_stats[kind.index()]
    }

    pub fn enemy(&self, enemy_type: &str) -> Option<&EnemyConfig> {
        find_enemy(&self.enemies, enemy_type)
    }

    pub fn enemies(&self) -> &[EnemyConfig] {
        &self.enemies
    }

    /// The single profile flagged `simulate=TRUE`
    pub fn selected_behavior(&self) -> &BehaviorProfile {
        &self.behaviors[self.selected_behavior]
    }

    pub fn behavior(&self, name: &str) -> Result<&BehaviorProfile> {
        self.behaviors
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| SimError::UnknownProfile(name.to_string()))
    }

    pub fn behaviors(&self) -> &[BehaviorProfile] {
        &self.behaviors
    }

    pub fn time_costs(&self) -> &TimeCosts {
        &self.time_costs
    }

    /// Engine settings from the optional `engine` table, defaults otherwise
    pub fn engine_settings(&self) -> EngineSettings {
        self.engine
    }
}

fn find_enemy<'a>(enemies: &'a [EnemyConfig], enemy_type: &str) -> Option<&'a EnemyConfig> {
    let wanted = enemy_type.trim();
    enemies.iter().find(|e| e.enemy_type.eq_ignore_ascii_case(wanted))
}

fn parse_player_stats(rows: &[PlayerStatRow]) -> Result<[StatConfig; 3]> {
    let mut found: [Option<StatConfig>; 3] = [None, None, None];

    for row in rows {
        let kind = row.stat_name;
        if found[kind.index()].is_some() {
            return Err(SimError::DuplicateStat(kind.key()));
        }
        if row.stat_meta_cost_base < 0 || row.stat_meta_cost_exp < 0 {
            return Err(SimError::malformed(
                "player",
                kind.key(),
                "meta cost base and growth must be non-negative",
            ));
        }
        found[kind.index()] = Some(StatConfig {
            kind,
            initial_value: row.stat_initial_value,
            bonus_base: row.stat_meta_bonus_base,
            bonus_growth: row.stat_meta_bonus_exp,
            cost_base: row.stat_meta_cost_base,
            cost_growth: row.stat_meta_cost_exp,
        });
    }

    let [atk, def, max_hp] = found;
    Ok([
        atk.ok_or(SimError::MissingStat(StatKind::Atk.key()))?,
        def.ok_or(SimError::MissingStat(StatKind::Def.key()))?,
        max_hp.ok_or(SimError::MissingStat(StatKind::MaxHp.key()))?,
    ])
}

fn parse_enemies(rows: &[EnemyRow]) -> Result<Vec<EnemyConfig>> {
    let mut enemies: Vec<EnemyConfig> = Vec::with_capacity(rows.len());

    for row in rows {
        let name = row.enemy_type.trim();
        if name.is_empty() {
            return Err(SimError::malformed("enemies", "enemy_type", "enemy type must not be empty"));
        }
        if find_enemy(&enemies, name).is_some() {
            return Err(SimError::malformed("enemies", name, "enemy type is defined more than once"));
        }
        if row.enemy_max_hp <= 0 {
            return Err(SimError::malformed(
                "enemies",
                name,
                format!("enemy_max_hp must be positive, got {}", row.enemy_max_hp),
            ));
        }
        enemies.push(EnemyConfig {
            enemy_type: name.to_string(),
            attack: row.enemy_atk,
            defense: row.enemy_def,
            max_hp: row.enemy_max_hp,
        });
    }

    Ok(enemies)
}

fn parse_amount(row: &ChapterRow) -> Result<i64> {
    let field = format!("daily_event_param (chapter {}, day {})", row.chapter_num, row.day_num);
    match &row.daily_event_param {
        Some(ParamValue::Int(v)) => Ok(*v),
        Some(ParamValue::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| SimError::malformed("chapters", field, format!("expected an integer, got '{}'", s))),
        None => Err(SimError::malformed("chapters", field, "missing amount")),
    }
}

fn parse_day(row: &ChapterRow, enemies: &[EnemyConfig]) -> Result<DayEvent> {
    let event = match row.daily_event.trim().to_lowercase().as_str() {
        "increase_atk" => DailyEvent::IncreaseAtk(parse_amount(row)?),
        "increase_def" => DailyEvent::IncreaseDef(parse_amount(row)?),
        "increase_max_hp" => DailyEvent::IncreaseMaxHp(parse_amount(row)?),
        "restore_hp" => DailyEvent::RestoreHp(parse_amount(row)?),
        "battle" => {
            let name = match &row.daily_event_param {
                Some(ParamValue::Text(s)) => s.clone(),
                Some(ParamValue::Int(v)) => v.to_string(),
                None => String::new(),
            };
            let enemy = find_enemy(enemies, &name).ok_or_else(|| SimError::UnknownEnemy {
                enemy: name.clone(),
                chapter_num: row.chapter_num,
                day_num: row.day_num,
            })?;
            DailyEvent::Battle(enemy.clone())
        }
        _ => {
            return Err(SimError::UnknownEventType {
                event: row.daily_event.clone(),
                chapter_num: row.chapter_num,
                day_num: row.day_num,
            })
        }
    };

    if row.gold_reward < 0 {
        return Err(SimError::malformed(
            "chapters",
            format!("gold_reward (chapter {}, day {})", row.chapter_num, row.day_num),
            "gold reward must be non-negative",
        ));
    }

    Ok(DayEvent::new(row.chapter_num, row.day_num, event, row.gold_reward))
}

fn parse_chapters(rows: &[ChapterRow], enemies: &[EnemyConfig]) -> Result<Vec<Vec<DayEvent>>> {
    // (chapter, day) ordering comes from the keys, not from row order
    let mut by_chapter: BTreeMap<u32, BTreeMap<u32, DayEvent>> = BTreeMap::new();

    for row in rows {
        if row.chapter_num == 0 {
            return Err(SimError::malformed("chapters", "chapter_num", "chapters are numbered from 1"));
        }
        let day = parse_day(row, enemies)?;
        let days = by_chapter.entry(row.chapter_num).or_default();
        if days.insert(row.day_num, day).is_some() {
            return Err(SimError::malformed(
                "chapters",
                format!("day_num (chapter {}, day {})", row.chapter_num, row.day_num),
                "day is defined more than once",
            ));
        }
    }

    let total = match by_chapter.keys().next_back() {
        Some(&last) => last,
        None => return Err(SimError::Config("chapters table is empty".to_string())),
    };

    (1..=total)
        .map(|n| {
            by_chapter
                .remove(&n)
                .map(|days| days.into_values().collect())
                .ok_or(SimError::ChapterGap(n))
        })
        .collect()
}

fn parse_behaviors(rows: &[BehaviorRow]) -> Result<(Vec<BehaviorProfile>, usize)> {
    let mut names = HashSet::new();
    let mut behaviors = Vec::with_capacity(rows.len());

    for row in rows {
        let name = row.player_type.trim().to_string();
        if !names.insert(name.clone()) {
            return Err(SimError::malformed("player_behavior", name, "player type is defined more than once"));
        }
        if row.sessions_per_day == 0 {
            return Err(SimError::malformed("player_behavior", name, "sessions_per_day must be at least 1"));
        }
        if !row.session_time.is_finite() || row.session_time <= 0.0 {
            return Err(SimError::malformed(
                "player_behavior",
                name,
                format!("session_time must be positive, got {}", row.session_time),
            ));
        }
        behaviors.push(BehaviorProfile {
            name,
            simulate: row.simulate,
            sessions_per_day: row.sessions_per_day,
            session_time: row.session_time,
        });
    }

    let flagged: Vec<usize> = behaviors
        .iter()
        .enumerate()
        .filter(|(_, b)| b.simulate)
        .map(|(i, _)| i)
        .collect();

    match flagged.as_slice() {
        [] => Err(SimError::NoSimulatedProfile),
        [one] => Ok((behaviors, *one)),
        many => Err(SimError::MultipleSimulatedProfiles(
            many.iter().map(|&i| behaviors[i].name.clone()).collect(),
        )),
    }
}
