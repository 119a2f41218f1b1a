//! Core simulation engine: the round loop, single runs and profile sweeps

use crate::chapter::{Chapter, ChapterOutcome};
use crate::config::{BehaviorProfile, EngineSettings, GameConfig, StatKind};
use crate::context::RunContext;
use crate::error::{Result, SimError};
use crate::log::{EventLog, LogEvent};
use crate::meta::PlayerMetaProgression;
use crate::stats::{RunSummary, SimReport, SweepSummary};
use rayon::prelude::*;

/// One full playthrough for one behavior profile.
///
/// Owns the economy and the run context exclusively. Chapters are attempted in
/// order; a defeat retries the same chapter next round after one economy step.
#[derive(Debug)]
pub struct Model<'a> {
    config: &'a GameConfig,
    profile: String,
    meta: PlayerMetaProgression,
    ctx: RunContext,
    rounds_done: u32,
}

impl<'a> Model<'a> {
    pub fn initialize(config: &'a GameConfig, profile: &BehaviorProfile, settings: EngineSettings) -> Self {
        let meta = PlayerMetaProgression::new(
            config.player_stat(StatKind::Atk),
            config.player_stat(StatKind::Def),
            config.player_stat(StatKind::MaxHp),
        );
        Self {
            config,
            profile: profile.name.clone(),
            meta,
            ctx: RunContext::new(profile, config.time_costs().clone(), settings),
            rounds_done: 0,
        }
    }

    pub fn rounds_done(&self) -> u32 {
        self.rounds_done
    }

    pub fn meta(&self) -> &PlayerMetaProgression {
        &self.meta
    }

    pub fn log(&self) -> &EventLog {
        self.ctx.log()
    }

    /// True once every chapter has been cleared
    pub fn is_finished(&self) -> bool {
        self.meta.chapter_level() > self.config.get_total_chapters()
    }

    /// Play one round: a chapter attempt followed by one economy step.
    /// Fails with `RunFinished` once every chapter has been cleared.
    pub fn step(&mut self) -> Result<ChapterOutcome> {
        if self.is_finished() {
            return Err(SimError::RunFinished {
                rounds: self.rounds_done,
                total_chapters: self.config.get_total_chapters(),
            });
        }

        let chapter_level = self.meta.chapter_level();
        let max_rounds = self.ctx.settings().max_rounds;

        self.rounds_done += 1;
        if self.rounds_done > max_rounds {
            return Err(SimError::RoundLimitExceeded {
                rounds: max_rounds,
                chapter_level,
            });
        }

        let days = self.config.get_chapter_config(chapter_level);
        let mut chapter = Chapter::initialize(chapter_level, days, &self.meta);
        let outcome = chapter.simulate(&mut self.meta, &mut self.ctx)?;

        self.meta.simulate(&mut self.ctx);

        self.ctx.record(LogEvent::RoundCompleted {
            rounds_done: self.rounds_done,
            chapter_level,
            victory: outcome.is_victory(),
        });

        if outcome.is_victory() {
            self.meta.chapter_level_up();
        }

        Ok(outcome)
    }

    /// Run rounds until every chapter is cleared or an invariant breaks
    pub fn simulate(mut self) -> Result<SimReport> {
        let total = self.config.get_total_chapters();
        tracing::info!(profile = %self.profile, chapters = total, "simulation started");

        while !self.is_finished() {
            if let Err(e) = self.step() {
                tracing::info!(
                    profile = %self.profile,
                    rounds = self.rounds_done,
                    error = %e,
                    "simulation aborted"
                );
                return Err(e);
            }
        }

        let summary = RunSummary::from_run(self.ctx.log(), &self.meta, self.ctx.timer(), self.rounds_done);
        tracing::info!(
            profile = %self.profile,
            rounds = summary.rounds_done,
            days = summary.days_elapsed,
            "simulation finished"
        );

        Ok(SimReport {
            profile: self.profile,
            summary,
            log: self.ctx.into_log(),
        })
    }
}

/// Run the profile flagged `simulate=TRUE`
pub fn simulate(config: &GameConfig, settings: EngineSettings) -> Result<SimReport> {
    Model::initialize(config, config.selected_behavior(), settings).simulate()
}

/// Run a named profile, regardless of its `simulate` flag
pub fn simulate_profile(config: &GameConfig, name: &str, settings: EngineSettings) -> Result<SimReport> {
    let profile = config.behavior(name)?;
    Model::initialize(config, profile, settings).simulate()
}

/// Run every profile on the rayon pool, results in config order
pub fn run_profiles_parallel(config: &GameConfig, settings: EngineSettings) -> Vec<(String, Result<SimReport>)> {
    config
        .behaviors()
        .par_iter()
        .map(|profile| {
            let result = Model::initialize(config, profile, settings).simulate();
            (profile.name.clone(), result)
        })
        .collect()
}

/// Run every profile one after another
pub fn run_profiles_sequential(config: &GameConfig, settings: EngineSettings) -> Vec<(String, Result<SimReport>)> {
    config
        .behaviors()
        .iter()
        .map(|profile| {
            let result = Model::initialize(config, profile, settings).simulate();
            (profile.name.clone(), result)
        })
        .collect()
}

/// Run every profile and aggregate. A failing profile is reported in its row
/// and does not stop the others.
pub fn sweep_profiles(config: &GameConfig, settings: EngineSettings, parallel: bool) -> SweepSummary {
    let results = if parallel {
        run_profiles_parallel(config, settings)
    } else {
        run_profiles_sequential(config, settings)
    };

    for (profile, result) in &results {
        if let Err(e) = result {
            tracing::warn!(%profile, error = %e, "profile run failed");
        }
    }

    SweepSummary::from_results(results)
}
