//! Structured event log, the single output artifact of a simulation run
//!
//! Records are appended in simulation order and never mutated afterwards.
//! Each record carries the play-time stamp it was written at, a tagged event
//! payload (the `action` field picks which other fields exist), and a
//! human-readable message.

use crate::config::{ParamValue, StatKind};
use crate::error::Result;
use crate::timer::TimeStamp;
use serde::{Deserialize, Serialize};

/// Discriminant of [`LogEvent`], for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    RoundCompleted,
    MetaStatLevelUp,
    DayCompleted,
    ChapterVictory,
    ChapterDefeat,
    PlayerAttack,
    EnemyAttack,
    BattleVictory,
    BattleDefeat,
    PlayerNewSession,
    PlayerNewDay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LogEvent {
    RoundCompleted {
        rounds_done: u32,
        chapter_level: u32,
        victory: bool,
    },
    MetaStatLevelUp {
        stat_name: StatKind,
        new_level: u32,
        cost: i64,
        gold_left: i64,
    },
    DayCompleted {
        chapter_num: u32,
        day_num: u32,
        event_type: String,
        event_param: ParamValue,
        player_hp: i64,
        player_max_hp: i64,
        player_atk: i64,
        player_def: i64,
    },
    ChapterVictory {
        chapter_num: u32,
    },
    ChapterDefeat {
        chapter_num: u32,
    },
    PlayerAttack {
        enemy_type: String,
        damage: i64,
        enemy_hp: i64,
    },
    EnemyAttack {
        enemy_type: String,
        damage: i64,
        player_hp: i64,
    },
    BattleVictory {
        enemy_type: String,
        player_hp: i64,
    },
    BattleDefeat {
        enemy_type: String,
        enemy_hp: i64,
    },
    PlayerNewSession {
        session_num: u32,
        day_num: u32,
    },
    PlayerNewDay {
        day_num: u32,
    },
}

impl LogEvent {
    pub fn kind(&self) -> ActionKind {
        match self {
            LogEvent::RoundCompleted { .. } => ActionKind::RoundCompleted,
            LogEvent::MetaStatLevelUp { .. } => ActionKind::MetaStatLevelUp,
            LogEvent::DayCompleted { .. } => ActionKind::DayCompleted,
            LogEvent::ChapterVictory { .. } => ActionKind::ChapterVictory,
            LogEvent::ChapterDefeat { .. } => ActionKind::ChapterDefeat,
            LogEvent::PlayerAttack { .. } => ActionKind::PlayerAttack,
            LogEvent::EnemyAttack { .. } => ActionKind::EnemyAttack,
            LogEvent::BattleVictory { .. } => ActionKind::BattleVictory,
            LogEvent::BattleDefeat { .. } => ActionKind::BattleDefeat,
            LogEvent::PlayerNewSession { .. } => ActionKind::PlayerNewSession,
            LogEvent::PlayerNewDay { .. } => ActionKind::PlayerNewDay,
        }
    }

    pub fn message(&self) -> String {
        match self {
            LogEvent::RoundCompleted {
                rounds_done,
                chapter_level,
                victory,
            } => format!(
                "Round {} completed: Chapter {} ended in {}",
                rounds_done,
                chapter_level,
                if *victory { "Victory" } else { "Defeat" }
            ),
            LogEvent::MetaStatLevelUp { stat_name, new_level, .. } => {
                format!("Stat {} leveled up to {}", stat_name.key(), new_level)
            }
            LogEvent::DayCompleted {
                chapter_num,
                day_num,
                event_type,
                ..
            } => format!(
                "Day {} completed for Chapter {} with event {}",
                day_num, chapter_num, event_type
            ),
            LogEvent::ChapterVictory { chapter_num } => {
                format!("Chapter {} completed with victory", chapter_num)
            }
            LogEvent::ChapterDefeat { chapter_num } => {
                format!("Chapter {} completed with defeat", chapter_num)
            }
            LogEvent::PlayerAttack { enemy_type, damage, .. } => {
                format!("Player attacked {} for {} damage", enemy_type, damage)
            }
            LogEvent::EnemyAttack { enemy_type, damage, .. } => {
                format!("{} attacked player for {} damage", enemy_type, damage)
            }
            LogEvent::BattleVictory { enemy_type, .. } => format!("Battle won against {}", enemy_type),
            LogEvent::BattleDefeat { enemy_type, .. } => format!("Battle lost against {}", enemy_type),
            LogEvent::PlayerNewSession { session_num, day_num } => {
                format!("Player started new session {} on day {}", session_num, day_num)
            }
            LogEvent::PlayerNewDay { day_num } => format!("Player started new day {}", day_num),
        }
    }
}

/// One appended record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub day: u32,
    pub day_session: u32,
    pub session_time: f64,
    #[serde(flatten)]
    pub event: LogEvent,
    pub message: String,
}

impl LogEntry {
    pub fn kind(&self) -> ActionKind {
        self.event.kind()
    }
}

/// Append-only, ordered record of everything a run did
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, at: TimeStamp, event: LogEvent) {
        let message = event.message();
        tracing::trace!(day = at.day, session = at.day_session, "{}", message);
        self.entries.push(LogEntry {
            day: at.day,
            day_session: at.day_session,
            session_time: at.session_time,
            event,
            message,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    pub fn filter(&self, kind: ActionKind) -> impl Iterator<Item = &LogEntry> + '_ {
        self.entries.iter().filter(move |e| e.kind() == kind)
    }

    pub fn count(&self, kind: ActionKind) -> usize {
        self.filter(kind).count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// One JSON object per line, the format dashboards stream in
    pub fn to_json_lines(&self) -> Result<String> {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&serde_json::to_string(entry)?);
            out.push('\n');
        }
        Ok(out)
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a LogEntry;
    type IntoIter = std::slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
