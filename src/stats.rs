//! Run summaries and sweep aggregates

use crate::config::StatKind;
use crate::error::SimError;
use crate::log::{ActionKind, EventLog, LogEvent};
use crate::meta::PlayerMetaProgression;
use crate::timer::Timer;
use serde::Serialize;
use std::collections::BTreeMap;

/// Meta levels bought per stat
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatLevels {
    pub atk: u32,
    pub def: u32,
    pub max_hp: u32,
}

impl StatLevels {
    pub fn from_meta(meta: &PlayerMetaProgression) -> Self {
        Self {
            atk: meta.stat(StatKind::Atk).get_level(),
            def: meta.stat(StatKind::Def).get_level(),
            max_hp: meta.stat(StatKind::MaxHp).get_level(),
        }
    }

    pub fn total(&self) -> u32 {
        self.atk + self.def + self.max_hp
    }
}

/// Headline numbers of one finished run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub rounds_done: u32,
    pub chapters_cleared: u32,
    /// Chapter number -> rounds spent on it, the winning attempt included
    pub attempts_per_chapter: BTreeMap<u32, u32>,
    pub defeats: u32,
    pub battles_won: u32,
    pub battles_lost: u32,
    pub final_levels: StatLevels,
    pub final_gold: i64,
    pub gold_earned: i64,
    pub gold_spent: i64,
    pub days_elapsed: u32,
}

impl RunSummary {
    /// Derive the summary from the log plus the end-of-run economy and clock
    pub fn from_run(log: &EventLog, meta: &PlayerMetaProgression, timer: &Timer, rounds_done: u32) -> Self {
        let mut attempts_per_chapter = BTreeMap::new();
        let mut defeats = 0;

        for entry in log.filter(ActionKind::RoundCompleted) {
            if let LogEvent::RoundCompleted {
                chapter_level, victory, ..
            } = entry.event
            {
                *attempts_per_chapter.entry(chapter_level).or_insert(0) += 1;
                if !victory {
                    defeats += 1;
                }
            }
        }

        Self {
            rounds_done,
            chapters_cleared: meta.chapter_level() - 1,
            attempts_per_chapter,
            defeats,
            battles_won: log.count(ActionKind::BattleVictory) as u32,
            battles_lost: log.count(ActionKind::BattleDefeat) as u32,
            final_levels: StatLevels::from_meta(meta),
            final_gold: meta.gold(),
            gold_earned: meta.gold_earned(),
            gold_spent: meta.gold_spent(),
            days_elapsed: timer.get_day(),
        }
    }
}

/// Everything one run produced
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub profile: String,
    pub summary: RunSummary,
    pub log: EventLog,
}

/// One row of a sweep: a summary, or the reason the profile aborted
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResult {
    pub profile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RunSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProfileResult {
    pub fn is_ok(&self) -> bool {
        self.summary.is_some()
    }
}

/// Aggregated results across behavior profiles
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepSummary {
    pub profiles: Vec<ProfileResult>,
    pub completed: usize,
    pub failed: usize,
    pub min_rounds: u32,
    pub max_rounds: u32,
    pub avg_rounds: f64,
    pub avg_days: f64,
}

impl SweepSummary {
    /// Aggregate per-profile outcomes; min/max/avg only count finished runs
    pub fn from_results(results: Vec<(String, Result<SimReport, SimError>)>) -> Self {
        let profiles: Vec<ProfileResult> = results
            .into_iter()
            .map(|(profile, result)| match result {
                Ok(report) => ProfileResult {
                    profile,
                    summary: Some(report.summary),
                    error: None,
                },
                Err(e) => ProfileResult {
                    profile,
                    summary: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();

        let finished: Vec<&RunSummary> = profiles.iter().filter_map(|p| p.summary.as_ref()).collect();
        let n = finished.len();
        if n == 0 {
            return Self {
                failed: profiles.len(),
                profiles,
                ..Default::default()
            };
        }

        let rounds: Vec<u32> = finished.iter().map(|s| s.rounds_done).collect();
        let min_rounds = rounds.iter().copied().min().unwrap_or(0);
        let max_rounds = rounds.iter().copied().max().unwrap_or(0);
        let avg_rounds = rounds.iter().map(|&r| r as f64).sum::<f64>() / n as f64;
        let avg_days = finished.iter().map(|s| s.days_elapsed as f64).sum::<f64>() / n as f64;

        Self {
            completed: n,
            failed: profiles.len() - n,
            profiles,
            min_rounds,
            max_rounds,
            avg_rounds,
            avg_days,
        }
    }
}
