//! Enemy instances spawned from the enemy table

use crate::config::EnemyConfig;

/// A single enemy, created fresh for every battle and dropped afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnemyCharacter {
    pub enemy_type: String,
    pub attack: i64,
    pub defense: i64,
    pub hp: i64,
    pub max_hp: i64,
}

impl EnemyCharacter {
    pub fn from_config(config: &EnemyConfig) -> Self {
        Self {
            enemy_type: config.enemy_type.clone(),
            attack: config.attack,
            defense: config.defense,
            hp: config.max_hp,
            max_hp: config.max_hp,
        }
    }

    // Same modifier surface as the player, for enemy buff/debuff events.
    pub fn modify_atk(&mut self, value: i64) {
        self.attack = self.attack.saturating_add(value);
    }

    pub fn modify_def(&mut self, value: i64) {
        self.defense = self.defense.saturating_add(value);
    }

    /// Capped at max HP, not floored
    pub fn modify_hp(&mut self, value: i64) {
        self.hp = self.hp.saturating_add(value).min(self.max_hp);
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }
}
