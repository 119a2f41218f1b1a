//! Error types for configuration loading and simulation runs

use thiserror::Error;

/// Everything that can abort a simulation run.
///
/// Configuration variants are raised while loading and validating the tables.
/// The invariant variants (`RoundLimitExceeded`, `BattleStalemate`,
/// `BattleRoundLimit`) are raised mid-run and signal a miscalibrated config.
/// `RunFinished` means a finished `Model` was stepped again.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unknown event type '{event}' (chapter {chapter_num}, day {day_num})")]
    UnknownEventType {
        event: String,
        chapter_num: u32,
        day_num: u32,
    },

    #[error("unknown enemy type '{enemy}' (chapter {chapter_num}, day {day_num})")]
    UnknownEnemy {
        enemy: String,
        chapter_num: u32,
        day_num: u32,
    },

    #[error("player stat '{0}' is missing from the player table")]
    MissingStat(&'static str),

    #[error("player stat '{0}' is defined more than once")]
    DuplicateStat(&'static str),

    #[error("no player behavior profile is flagged simulate=TRUE")]
    NoSimulatedProfile,

    #[error("more than one player behavior profile is flagged simulate=TRUE: {0:?}")]
    MultipleSimulatedProfiles(Vec<String>),

    #[error("unknown player behavior profile '{0}'")]
    UnknownProfile(String),

    #[error("action time cost '{0}' is missing from the timers table")]
    MissingTimeCost(&'static str),

    #[error("malformed field '{field}' in {table} table: {reason}")]
    MalformedField {
        table: &'static str,
        field: String,
        reason: String,
    },

    #[error("chapter {0} has no days configured (chapters must be numbered 1..=N)")]
    ChapterGap(u32),

    #[error("possible infinite loop: {rounds} rounds played, still stuck on chapter {chapter_level}")]
    RoundLimitExceeded { rounds: u32, chapter_level: u32 },

    #[error(
        "battle stalemate against {enemy_type}: player atk {player_attack} vs def {enemy_defense}, \
         enemy atk {enemy_attack} vs def {player_defense}, neither side can deal damage"
    )]
    BattleStalemate {
        enemy_type: String,
        player_attack: i64,
        enemy_defense: i64,
        enemy_attack: i64,
        player_defense: i64,
    },

    #[error("battle against {enemy_type} exceeded {rounds} rounds")]
    BattleRoundLimit { enemy_type: String, rounds: u32 },

    #[error("run already finished: all {total_chapters} chapters cleared in {rounds} rounds")]
    RunFinished { rounds: u32, total_chapters: u32 },
}

impl SimError {
    /// True for the mid-run invariant violations, false for load-time problems.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            SimError::RoundLimitExceeded { .. }
                | SimError::BattleStalemate { .. }
                | SimError::BattleRoundLimit { .. }
        )
    }

    pub(crate) fn malformed(table: &'static str, field: impl Into<String>, reason: impl Into<String>) -> Self {
        SimError::MalformedField {
            table,
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
