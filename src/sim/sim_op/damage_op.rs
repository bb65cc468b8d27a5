use crate::constants::MAX_DAMAGE;
use crate::reactor::FissionReactor;
use crate::sim::TickContext;
use crate::sim::meltdown::trigger_meltdown;
use crate::sim::sim_op::{ReactorOp, ReactorOpHandle};
use log::{info, warn};

/// Structural damage from heat, the safety lockout and the meltdown trial
pub struct DamageOp;

impl DamageOp {
    pub fn new() -> DamageOp {
        DamageOp
    }

    pub fn handle() -> ReactorOpHandle {
        ReactorOpHandle::new(Box::new(DamageOp::new()))
    }

    /// Damage after one tick at `temp`, clamped to `[0, MAX_DAMAGE]`
    pub fn next_damage(damage: f64, temp: f64, min_temp: f64, max_temp: f64) -> f64 {
        let next = if temp > min_temp {
            damage + temp.min(max_temp) / (min_temp * 10.0)
        } else {
            damage - (min_temp - temp) / (min_temp * 100.0)
        };
        next.clamp(0.0, MAX_DAMAGE)
    }

    fn latch_force_disabled(reactor: &mut FissionReactor, ctx: &mut TickContext<'_>) {
        warn!(
            "Fission reactor force disabled at {:.1}K with {:.1}% damage",
            reactor.temperature(),
            reactor.damage
        );
        reactor.force_disabled = true;
        reactor.active = false;
        ctx.report.force_disabled = true;
    }
}

impl ReactorOp for DamageOp {
    fn name(&self) -> &str {
        "Damage"
    }

    fn update(&mut self, reactor: &mut FissionReactor, ctx: &mut TickContext<'_>) {
        let temp = reactor.temperature();
        let min_temp = reactor.config.min_damage_temperature_k;
        reactor.damage = Self::next_damage(
            reactor.damage,
            temp,
            min_temp,
            reactor.config.max_damage_temperature_k,
        );

        if reactor.damage >= MAX_DAMAGE && temp >= min_temp {
            if reactor.force_disabled && reactor.config.meltdowns_enabled {
                // meltdowns were re-enabled while locked out; the meltdown is owed
                reactor.force_disabled = false;
                ctx.report.meltdown = Some(trigger_meltdown(reactor, ctx));
            } else {
                let chance = reactor.damage / MAX_DAMAGE * reactor.config.meltdown_chance;
                if ctx.random.next_unit() < chance {
                    if reactor.config.meltdowns_enabled {
                        ctx.report.meltdown = Some(trigger_meltdown(reactor, ctx));
                    } else if !reactor.force_disabled {
                        Self::latch_force_disabled(reactor, ctx);
                    }
                }
            }
        } else if reactor.damage < MAX_DAMAGE && temp < min_temp && reactor.force_disabled {
            info!("Fission reactor safety lockout cleared");
            reactor.force_disabled = false;
        }

        ctx.report.damage_state = reactor.damage_state();
    }
}
