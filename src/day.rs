//! Scripted daily events and their resolution

use crate::battle::{resolve_battle, BattleOutcome};
use crate::config::{EnemyConfig, ParamValue, TimedAction};
use crate::context::RunContext;
use crate::enemy::EnemyCharacter;
use crate::error::Result;
use crate::log::LogEvent;
use crate::meta::PlayerMetaProgression;
use crate::player::PlayerCharacter;

/// What happens on a day. Battles carry the stats of the enemy to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DailyEvent {
    IncreaseAtk(i64),
    IncreaseDef(i64),
    IncreaseMaxHp(i64),
    RestoreHp(i64),
    Battle(EnemyConfig),
}

impl DailyEvent {
    /// Name used in the chapter table and the log
    pub fn event_type(&self) -> &'static str {
        match self {
            DailyEvent::IncreaseAtk(_) => "increase_atk",
            DailyEvent::IncreaseDef(_) => "increase_def",
            DailyEvent::IncreaseMaxHp(_) => "increase_max_hp",
            DailyEvent::RestoreHp(_) => "restore_hp",
            DailyEvent::Battle(_) => "battle",
        }
    }

    pub fn param(&self) -> ParamValue {
        match self {
            DailyEvent::IncreaseAtk(v)
            | DailyEvent::IncreaseDef(v)
            | DailyEvent::IncreaseMaxHp(v)
            | DailyEvent::RestoreHp(v) => ParamValue::Int(*v),
            DailyEvent::Battle(enemy) => ParamValue::Text(enemy.enemy_type.clone()),
        }
    }
}

/// One configured day of a chapter. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEvent {
    pub chapter_num: u32,
    pub day_num: u32,
    pub event: DailyEvent,
    pub gold_reward: i64,
}

impl DayEvent {
    pub fn new(chapter_num: u32, day_num: u32, event: DailyEvent, gold_reward: i64) -> Self {
        Self {
            chapter_num,
            day_num,
            event,
            gold_reward,
        }
    }

    pub fn is_battle(&self) -> bool {
        matches!(self.event, DailyEvent::Battle(_))
    }

    /// Apply the event to the player and the economy.
    ///
    /// The day record is written first and carries the stats the player
    /// enters the day with. Stat and heal events always pay their gold;
    /// battles pay only if the player survives.
    pub fn simulate(
        &self,
        player: &mut PlayerCharacter,
        meta: &mut PlayerMetaProgression,
        ctx: &mut RunContext,
    ) -> Result<()> {
        ctx.record(LogEvent::DayCompleted {
            chapter_num: self.chapter_num,
            day_num: self.day_num,
            event_type: self.event.event_type().to_string(),
            event_param: self.event.param(),
            player_hp: player.hp,
            player_max_hp: player.max_hp,
            player_atk: player.attack,
            player_def: player.defense,
        });

        match &self.event {
            DailyEvent::IncreaseAtk(amount) => {
                player.modify_atk(*amount);
                meta.add_gold(self.gold_reward);
                ctx.spend(TimedAction::IncreaseAtk);
            }
            DailyEvent::IncreaseDef(amount) => {
                player.modify_def(*amount);
                meta.add_gold(self.gold_reward);
                ctx.spend(TimedAction::IncreaseDef);
            }
            DailyEvent::IncreaseMaxHp(amount) => {
                player.modify_max_hp(*amount);
                meta.add_gold(self.gold_reward);
                ctx.spend(TimedAction::IncreaseMaxHp);
            }
            DailyEvent::RestoreHp(amount) => {
                player.modify_hp(*amount);
                meta.add_gold(self.gold_reward);
                ctx.spend(TimedAction::RestoreHp);
            }
            DailyEvent::Battle(enemy_config) => {
                let mut enemy = EnemyCharacter::from_config(enemy_config);
                let report = resolve_battle(player, &mut enemy, ctx)?;
                if report.outcome == BattleOutcome::PlayerVictory {
                    meta.add_gold(self.gold_reward);
                }
            }
        }

        Ok(())
    }
}
