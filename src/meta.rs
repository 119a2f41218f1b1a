//! Meta progression: permanent stat upgrades bought with gold between attempts

use crate::config::{StatConfig, StatKind, TimedAction};
use crate::context::RunContext;
use crate::log::LogEvent;

/// One upgradable player attribute with linear value and cost curves
#[derive(Debug, Clone, PartialEq)]
pub struct MetaStat {
    pub name: StatKind,
    pub initial_value: i64,
    pub bonus_base: i64,
    pub bonus_growth: i64,
    pub cost_base: i64,
    pub cost_growth: i64,
    level: u32,
}

impl MetaStat {
    pub fn from_config(config: &StatConfig) -> Self {
        Self {
            name: config.kind,
            initial_value: config.initial_value,
            bonus_base: config.bonus_base,
            bonus_growth: config.bonus_growth,
            cost_base: config.cost_base,
            cost_growth: config.cost_growth,
            level: 0,
        }
    }

    /// `initial_value + bonus_growth * level`, saturating
    pub fn get_value(&self) -> i64 {
        self.initial_value
            .saturating_add(self.bonus_growth.saturating_mul(i64::from(self.level)))
    }

    /// Value gained by the next level-up
    pub fn get_bonus_increment(&self) -> i64 {
        self.bonus_growth
    }

    /// `cost_base + cost_growth * level`, saturating
    pub fn get_cost(&self) -> i64 {
        self.cost_base
            .saturating_add(self.cost_growth.saturating_mul(i64::from(self.level)))
    }

    /// Unconditional; affordability is the caller's job
    pub fn level_up(&mut self) {
        self.level += 1;
    }

    pub fn get_level(&self) -> u32 {
        self.level
    }
}

/// Gold balance, the three meta stats, and the chapter the player is on
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerMetaProgression {
    stats: [MetaStat; 3],
    gold: i64,
    chapter_level: u32,
    gold_earned: i64,
    gold_spent: i64,
}

impl PlayerMetaProgression {
    pub fn new(atk: &StatConfig, def: &StatConfig, max_hp: &StatConfig) -> Self {
        Self {
            stats: [
                MetaStat::from_config(atk),
                MetaStat::from_config(def),
                MetaStat::from_config(max_hp),
            ],
            gold: 0,
            chapter_level: 1,
            gold_earned: 0,
            gold_spent: 0,
        }
    }

    pub fn stat(&self, kind: StatKind) -> &MetaStat {
        &self.stats[kind.index()]
    }

    pub fn stats(&self) -> &[MetaStat; 3] {
        &self.stats
    }

    pub fn gold(&self) -> i64 {
        self.gold
    }

    pub fn gold_earned(&self) -> i64 {
        self.gold_earned
    }

    pub fn gold_spent(&self) -> i64 {
        self.gold_spent
    }

    pub fn chapter_level(&self) -> u32 {
        self.chapter_level
    }

    pub fn add_gold(&mut self, value: i64) {
        self.gold = self.gold.saturating_add(value);
        self.gold_earned = self.gold_earned.saturating_add(value);
    }

    /// Index of the cheapest stat; ties go to the first in atk, def, max_hp order
    fn cheapest_index(&self) -> usize {
        let mut best = 0;
        for (i, stat) in self.stats.iter().enumerate().skip(1) {
            if stat.get_cost() < self.stats[best].get_cost() {
                best = i;
            }
        }
        best
    }

    pub fn get_cheapest_stat(&self) -> &MetaStat {
        &self.stats[self.cheapest_index()]
    }

    /// One economy step: buy the cheapest upgrade if affordable, then spend the
    /// meta-progression time. Returns the stat that was levelled, if any.
    pub fn simulate(&mut self, ctx: &mut RunContext) -> Option<StatKind> {
        let idx = self.cheapest_index();
        let cost = self.stats[idx].get_cost();

        let upgraded = if self.gold >= cost {
            self.gold -= cost;
            self.gold_spent = self.gold_spent.saturating_add(cost);
            let stat = &mut self.stats[idx];
            stat.level_up();
            ctx.record(LogEvent::MetaStatLevelUp {
                stat_name: stat.name,
                new_level: stat.get_level(),
                cost,
                gold_left: self.gold,
            });
            Some(stat.name)
        } else {
            None
        };

        ctx.spend(TimedAction::MetaProgression);
        upgraded
    }

    pub fn chapter_level_up(&mut self) {
        self.chapter_level += 1;
    }
}
