//! In-game clock and the player behavior that drives its sessions and days

use crate::config::BehaviorProfile;
use serde::{Deserialize, Serialize};

/// Point in simulated play time, stamped on every log record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeStamp {
    pub day: u32,
    pub day_session: u32,
    pub session_time: f64,
}

/// Simulated day, session within the day, and time elapsed in the session.
/// Only moves forward; a fresh Timer is created for each run.
#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    day: u32,
    day_session: u32,
    session_time: f64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    pub fn new() -> Self {
        Self {
            day: 1,
            day_session: 1,
            session_time: 0.0,
        }
    }

    pub fn get_day(&self) -> u32 {
        self.day
    }

    pub fn get_day_session(&self) -> u32 {
        self.day_session
    }

    pub fn get_session_time(&self) -> f64 {
        self.session_time
    }

    pub fn add_time(&mut self, time: f64) {
        self.session_time += time;
    }

    pub fn new_session(&mut self) {
        self.day_session += 1;
        self.session_time = 0.0;
    }

    pub fn new_day(&mut self) {
        self.day += 1;
        self.day_session = 1;
        self.session_time = 0.0;
    }

    pub fn snapshot(&self) -> TimeStamp {
        TimeStamp {
            day: self.day,
            day_session: self.day_session,
            session_time: self.session_time,
        }
    }
}

/// What a session check did to the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    NewSession { session_num: u32, day_num: u32 },
    NewDay { day_num: u32 },
}

/// Controls how much time the player spends in the game
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerBehavior {
    pub player_type: String,
    pub session_time: f64,
    pub sessions_per_day: u32,
}

impl PlayerBehavior {
    pub fn from_profile(profile: &BehaviorProfile) -> Self {
        Self {
            player_type: profile.name.clone(),
            session_time: profile.session_time,
            sessions_per_day: profile.sessions_per_day,
        }
    }

    /// Once the session runs past the profile's session length, start the next
    /// session, or the next day if this was the last session of the day.
    pub fn check_session(&self, timer: &mut Timer) -> Option<SessionChange> {
        if timer.get_session_time() <= self.session_time {
            return None;
        }

        if timer.get_day_session() >= self.sessions_per_day {
            timer.new_day();
            Some(SessionChange::NewDay {
                day_num: timer.get_day(),
            })
        } else {
            timer.new_session();
            Some(SessionChange::NewSession {
                session_num: timer.get_day_session(),
                day_num: timer.get_day(),
            })
        }
    }

    pub fn time_spent(&self, timer: &mut Timer, time: f64) -> Option<SessionChange> {
        timer.add_time(time);
        self.check_session(timer)
    }
}
