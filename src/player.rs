//! The player's combat stats for one chapter attempt

use crate::config::StatKind;
use crate::meta::PlayerMetaProgression;

/// Mutable combat-stat bundle, rebuilt from the meta stats at the start of every
/// chapter attempt and thrown away when the attempt ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCharacter {
    pub attack: i64,
    pub defense: i64,
    pub hp: i64,
    pub max_hp: i64,
}

impl PlayerCharacter {
    /// Fresh character at full health
    pub fn new(attack: i64, defense: i64, max_hp: i64) -> Self {
        Self {
            attack,
            defense,
            hp: max_hp,
            max_hp,
        }
    }

    /// Character built from the current meta stat values
    pub fn from_meta(meta: &PlayerMetaProgression) -> Self {
        Self::new(
            meta.stat(StatKind::Atk).get_value(),
            meta.stat(StatKind::Def).get_value(),
            meta.stat(StatKind::MaxHp).get_value(),
        )
    }

    pub fn modify_atk(&mut self, value: i64) {
        self.attack = self.attack.saturating_add(value);
    }

    pub fn modify_def(&mut self, value: i64) {
        self.defense = self.defense.saturating_add(value);
    }

    /// Heals are capped at max HP; damage is not floored, HP may go negative.
    /// Saturates at the `i64` range instead of wrapping.
    pub fn modify_hp(&mut self, value: i64) {
        self.hp = self.hp.saturating_add(value).min(self.max_hp);
    }

    /// Raises the cap only; current HP is left where it is
    pub fn modify_max_hp(&mut self, value: i64) {
        self.max_hp = self.max_hp.saturating_add(value);
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }
}
