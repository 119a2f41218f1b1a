//! Turn-based battle between the player and one enemy
//!
//! Each round the player strikes first for `max(0, atk - enemy def)`; if the
//! enemy survives it strikes back for `max(0, enemy atk - def)`. The battle
//! ends the moment either side reaches HP <= 0. No randomness is involved, so
//! the outcome is fully determined by the starting stats.

use crate::config::TimedAction;
use crate::context::RunContext;
use crate::enemy::EnemyCharacter;
use crate::error::{Result, SimError};
use crate::log::LogEvent;
use crate::player::PlayerCharacter;
use serde::{Deserialize, Serialize};

/// How a battle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    PlayerVictory,
    PlayerDefeat,
}

/// Result of one resolved battle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    /// Rounds started, including the final one
    pub rounds: u32,
}

/// Damage dealt by an attacker with `attack` to a defender with `defense`
#[inline]
pub fn damage(attack: i64, defense: i64) -> i64 {
    attack.saturating_sub(defense).max(0)
}

/// Fight until one side dies.
///
/// A round in which both sides deal zero damage is a stalemate and aborts the
/// run, since stats cannot change mid-battle. `max_battle_rounds` from the
/// engine settings caps battles that would take absurdly long.
pub fn resolve_battle(
    player: &mut PlayerCharacter,
    enemy: &mut EnemyCharacter,
    ctx: &mut RunContext,
) -> Result<BattleReport> {
    let max_rounds = ctx.settings().max_battle_rounds;
    let mut rounds = 0;

    tracing::debug!(
        enemy = %enemy.enemy_type,
        player_atk = player.attack,
        player_def = player.defense,
        player_hp = player.hp,
        "battle started"
    );

    loop {
        if rounds >= max_rounds {
            return Err(SimError::BattleRoundLimit {
                enemy_type: enemy.enemy_type.clone(),
                rounds,
            });
        }
        rounds += 1;

        // Player attacks enemy
        let damage_to_enemy = damage(player.attack, enemy.defense);
        enemy.modify_hp(-damage_to_enemy);
        ctx.record(LogEvent::PlayerAttack {
            enemy_type: enemy.enemy_type.clone(),
            damage: damage_to_enemy,
            enemy_hp: enemy.hp,
        });
        ctx.spend(TimedAction::BattlePlayerTurn);

        if enemy.is_dead() {
            ctx.record(LogEvent::BattleVictory {
                enemy_type: enemy.enemy_type.clone(),
                player_hp: player.hp,
            });
            return Ok(BattleReport {
                outcome: BattleOutcome::PlayerVictory,
                rounds,
            });
        }

        // Enemy attacks player
        let damage_to_player = damage(enemy.attack, player.defense);
        player.modify_hp(-damage_to_player);
        ctx.record(LogEvent::EnemyAttack {
            enemy_type: enemy.enemy_type.clone(),
            damage: damage_to_player,
            player_hp: player.hp,
        });
        ctx.spend(TimedAction::BattleEnemyTurn);

        if player.is_dead() {
            ctx.record(LogEvent::BattleDefeat {
                enemy_type: enemy.enemy_type.clone(),
                enemy_hp: enemy.hp,
            });
            return Ok(BattleReport {
                outcome: BattleOutcome::PlayerDefeat,
                rounds,
            });
        }

        if damage_to_enemy == 0 && damage_to_player == 0 {
            return Err(SimError::BattleStalemate {
                enemy_type: enemy.enemy_type.clone(),
                player_attack: player.attack,
                enemy_defense: enemy.defense,
                enemy_attack: enemy.attack,
                player_defense: player.defense,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BehaviorProfile, EngineSettings, EnemyConfig, TimeCosts};
    use crate::context::test_context;
    use crate::log::ActionKind;
    use proptest::prelude::*;

    fn enemy(attack: i64, defense: i64, max_hp: i64) -> EnemyCharacter {
        EnemyCharacter::from_config(&EnemyConfig {
            enemy_type: "slime".to_string(),
            attack,
            defense,
            max_hp,
        })
    }

    fn enemy_hp_trace(ctx: &RunContext) -> Vec<i64> {
        ctx.log()
            .iter()
            .filter_map(|e| match &e.event {
                LogEvent::PlayerAttack { enemy_hp, .. } => Some(*enemy_hp),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn player_wins_against_weak_slime() {
        let mut ctx = test_context();
        let mut player = PlayerCharacter::new(10, 5, 50);
        let mut slime = enemy(3, 2, 20);

        let report = resolve_battle(&mut player, &mut slime, &mut ctx).unwrap();

        assert_eq!(report.outcome, BattleOutcome::PlayerVictory);
        assert_eq!(report.rounds, 3);
        assert_eq!(enemy_hp_trace(&ctx), vec![12, 4, -4]);
        // slime attack 3 cannot get through defense 5
        assert_eq!(player.hp, 50);
        assert_eq!(ctx.log().count(ActionKind::EnemyAttack), 2);
        assert_eq!(ctx.log().count(ActionKind::BattleVictory), 1);
        assert_eq!(ctx.log().count(ActionKind::BattleDefeat), 0);
    }

    #[test]
    fn enemy_strikes_back_until_dead() {
        let mut ctx = test_context();
        let mut player = PlayerCharacter::new(10, 5, 50);
        let mut orc = enemy(6, 2, 20);

        let report = resolve_battle(&mut player, &mut orc, &mut ctx).unwrap();

        assert_eq!(report.outcome, BattleOutcome::PlayerVictory);
        let player_hp: Vec<i64> = ctx
            .log()
            .iter()
            .filter_map(|e| match &e.event {
                LogEvent::EnemyAttack { player_hp, .. } => Some(*player_hp),
                _ => None,
            })
            .collect();
        assert_eq!(player_hp, vec![49, 48]);
        assert_eq!(player.hp, 48);
    }

    #[test]
    fn player_loses_against_strong_enemy() {
        let mut ctx = test_context();
        let mut player = PlayerCharacter::new(3, 0, 10);
        let mut boss = enemy(12, 1, 100);

        let report = resolve_battle(&mut player, &mut boss, &mut ctx).unwrap();

        assert_eq!(report.outcome, BattleOutcome::PlayerDefeat);
        assert_eq!(report.rounds, 1);
        assert_eq!(player.hp, -2);
        assert_eq!(boss.hp, 98);
        let last = ctx.log().iter().last().unwrap();
        assert_eq!(
            last.event,
            LogEvent::BattleDefeat {
                enemy_type: "slime".to_string(),
                enemy_hp: 98
            }
        );
    }

    #[test]
    fn zero_damage_on_both_sides_is_a_stalemate() {
        let mut ctx = test_context();
        let mut player = PlayerCharacter::new(5, 10, 50);
        let mut wall = enemy(5, 10, 50);

        let err = resolve_battle(&mut player, &mut wall, &mut ctx).unwrap_err();
        assert!(matches!(err, SimError::BattleStalemate { .. }));
        assert!(err.is_invariant_violation());
        // exactly one round was played before giving up
        assert_eq!(ctx.log().count(ActionKind::PlayerAttack), 1);
    }

    #[test]
    fn one_sided_zero_damage_still_terminates() {
        let mut ctx = test_context();
        let mut player = PlayerCharacter::new(1, 0, 10);
        let mut golem = enemy(4, 50, 10);

        let report = resolve_battle(&mut player, &mut golem, &mut ctx).unwrap();
        assert_eq!(report.outcome, BattleOutcome::PlayerDefeat);
        assert_eq!(report.rounds, 3);
    }

    #[test]
    fn round_ceiling_aborts_long_battles() {
        let profile = BehaviorProfile {
            name: "test".to_string(),
            simulate: true,
            sessions_per_day: 1,
            session_time: 1e9,
        };
        let settings = EngineSettings {
            max_battle_rounds: 5,
            ..Default::default()
        };
        let mut ctx = RunContext::new(&profile, TimeCosts::uniform(0.0), settings);
        let mut player = PlayerCharacter::new(3, 0, 1000);
        let mut sponge = enemy(1, 2, 1000);

        let err = resolve_battle(&mut player, &mut sponge, &mut ctx).unwrap_err();
        assert!(matches!(err, SimError::BattleRoundLimit { rounds: 5, .. }));
    }

    #[test]
    fn damage_saturates_at_extremes() {
        assert_eq!(damage(i64::MAX, i64::MIN), i64::MAX);
        assert_eq!(damage(i64::MIN, i64::MAX), 0);
        assert_eq!(damage(10, 2), 8);
    }

    #[test]
    fn extreme_stats_resolve_without_overflow() {
        let mut ctx = test_context();
        let mut player = PlayerCharacter::new(i64::MIN, i64::MIN, 10);
        let mut foe = enemy(i64::MAX, 0, i64::MAX);

        let report = resolve_battle(&mut player, &mut foe, &mut ctx).unwrap();
        assert_eq!(report.outcome, BattleOutcome::PlayerDefeat);
        assert_eq!(report.rounds, 1);
        assert_eq!(player.hp, 10 - i64::MAX);
        assert_eq!(foe.hp, i64::MAX);

        let mut ctx = test_context();
        let mut player = PlayerCharacter::new(i64::MAX, 0, 10);
        let mut foe = enemy(0, i64::MIN, i64::MAX);
        let report = resolve_battle(&mut player, &mut foe, &mut ctx).unwrap();
        assert_eq!(report.outcome, BattleOutcome::PlayerVictory);
        assert_eq!(foe.hp, 0);
    }

    proptest! {
        #[test]
        fn battles_end_within_bound(
            p_atk in 0i64..30, p_def in 0i64..30, p_hp in 1i64..200,
            e_atk in 0i64..30, e_def in 0i64..30, e_hp in 1i64..200,
        ) {
            let to_enemy = damage(p_atk, e_def);
            let to_player = damage(e_atk, p_def);
            prop_assume!(to_enemy > 0 || to_player > 0);

            let mut ctx = test_context();
            let mut player = PlayerCharacter::new(p_atk, p_def, p_hp);
            let mut foe = enemy(e_atk, e_def, e_hp);
            let report = resolve_battle(&mut player, &mut foe, &mut ctx).unwrap();

            let ceil = |hp: i64, d: i64| (hp + d.max(1) - 1) / d.max(1);
            let bound = ceil(e_hp, to_enemy) + ceil(p_hp, to_player);
            prop_assert!(i64::from(report.rounds) <= bound);

            match report.outcome {
                BattleOutcome::PlayerVictory => prop_assert!(foe.is_dead() && !player.is_dead()),
                BattleOutcome::PlayerDefeat => prop_assert!(player.is_dead() && !foe.is_dead()),
            }
        }

        #[test]
        fn both_sides_harmless_always_stalemates(
            atk in 0i64..20, extra_def in 0i64..20, hp in 1i64..100,
        ) {
            let mut ctx = test_context();
            let mut player = PlayerCharacter::new(atk, atk + extra_def, hp);
            let mut foe = enemy(atk, atk + extra_def, hp);
            let stalemate = matches!(
                resolve_battle(&mut player, &mut foe, &mut ctx),
                Err(SimError::BattleStalemate { .. })
            );
            prop_assert!(stalemate);
        }
    }
}
