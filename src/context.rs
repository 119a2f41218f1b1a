//! Per-run plumbing shared by every component: clock, behavior, time costs, log

use crate::config::{BehaviorProfile, EngineSettings, TimeCosts, TimedAction};
use crate::log::{EventLog, LogEvent};
use crate::timer::{PlayerBehavior, SessionChange, Timer};

/// Everything one run mutates besides the economy and the characters.
///
/// Owned by exactly one Model and handed down by `&mut` to chapters, days and
/// battles. Not shared between runs; parallel sweeps build one per profile.
#[derive(Debug, Clone)]
pub struct RunContext {
    timer: Timer,
    behavior: PlayerBehavior,
    time_costs: TimeCosts,
    settings: EngineSettings,
    log: EventLog,
}

impl RunContext {
    pub fn new(profile: &BehaviorProfile, time_costs: TimeCosts, settings: EngineSettings) -> Self {
        Self {
            timer: Timer::new(),
            behavior: PlayerBehavior::from_profile(profile),
            time_costs,
            settings,
            log: EventLog::new(),
        }
    }

    /// Append a record stamped with the current play time
    pub fn record(&mut self, event: LogEvent) {
        self.log.push(self.timer.snapshot(), event);
    }

    /// Consume the configured time for an action, rolling sessions/days as needed
    pub fn spend(&mut self, action: TimedAction) {
        let cost = self.time_costs.cost(action);
        match self.behavior.time_spent(&mut self.timer, cost) {
            Some(SessionChange::NewSession { session_num, day_num }) => {
                self.record(LogEvent::PlayerNewSession { session_num, day_num })
            }
            Some(SessionChange::NewDay { day_num }) => self.record(LogEvent::PlayerNewDay { day_num }),
            None => {}
        }
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn behavior(&self) -> &PlayerBehavior {
        &self.behavior
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn into_log(self) -> EventLog {
        self.log
    }
}

#[cfg(test)]
pub(crate) fn test_context() -> RunContext {
    let profile = BehaviorProfile {
        name: "test".to_string(),
        simulate: true,
        sessions_per_day: 1,
        session_time: 1_000_000.0,
    };
    RunContext::new(&profile, TimeCosts::uniform(1.0), EngineSettings::default())
}
