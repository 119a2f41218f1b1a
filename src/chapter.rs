//! One attempt at one chapter

use crate::context::RunContext;
use crate::day::DayEvent;
use crate::error::Result;
use crate::log::LogEvent;
use crate::meta::PlayerMetaProgression;
use crate::player::PlayerCharacter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChapterOutcome {
    Victory,
    Defeat,
}

impl ChapterOutcome {
    pub fn is_victory(self) -> bool {
        self == ChapterOutcome::Victory
    }
}

/// The ordered days of a chapter plus the character playing them.
///
/// A new Chapter is built for every round, even when retrying the same chapter
/// number: the character always starts from the current meta stat values at
/// full HP.
#[derive(Debug, Clone)]
pub struct Chapter {
    pub chapter_num: u32,
    pub days: Vec<DayEvent>,
    pub player_character: PlayerCharacter,
}

impl Chapter {
    pub fn initialize(chapter_num: u32, days: &[DayEvent], meta: &PlayerMetaProgression) -> Self {
        Self {
            chapter_num,
            days: days.to_vec(),
            player_character: PlayerCharacter::from_meta(meta),
        }
    }

    /// Play the days in order, stopping at the first day the player dies on
    pub fn simulate(&mut self, meta: &mut PlayerMetaProgression, ctx: &mut RunContext) -> Result<ChapterOutcome> {
        let mut outcome = ChapterOutcome::Victory;

        for day in &self.days {
            day.simulate(&mut self.player_character, meta, ctx)?;
            if self.player_character.is_dead() {
                outcome = ChapterOutcome::Defeat;
                break;
            }
        }

        match outcome {
            ChapterOutcome::Victory => ctx.record(LogEvent::ChapterVictory {
                chapter_num: self.chapter_num,
            }),
            ChapterOutcome::Defeat => ctx.record(LogEvent::ChapterDefeat {
                chapter_num: self.chapter_num,
            }),
        }

        tracing::debug!(
            chapter = self.chapter_num,
            ?outcome,
            player_hp = self.player_character.hp,
            "chapter attempt finished"
        );

        Ok(outcome)
    }
}
