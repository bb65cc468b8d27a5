// Drill: run an uncooled reactor flat out until it melts down, printing a
// status line every few seconds of game time.
//
// RUST_LOG=info cargo run --example meltdown_drill [seed]

use colored::Colorize;
use fission_core::config::ReactorConfig;
use fission_core::host::{Bounds, Position, StructureInfo};
use fission_core::random::RngSource;
use fission_core::reactor::DamageState;
use fission_core::sim::{ReactorSimulation, TickContext};
use fission_core::substance::SubstanceId;
use fission_core::temp_utils::kelvin_to_celsius;
use fission_core::test_support::{RecordingCache, RecordingRouter, RecordingSink};

const MAX_TICKS: u64 = 20 * 60 * 10;
const STATUS_EVERY: u64 = 100;

fn main() {
    env_logger::init();
    let seed: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    println!("{}", "☢️  Fission Reactor Meltdown Drill".bold());
    println!("==================================");
    println!("seed {}: 5×5×5 casing, 9 assemblies, a little water, burn rate maxed", seed);

    let mut sim = ReactorSimulation::new();
    let reactor = sim.form(
        StructureInfo {
            volume: 125,
            fuel_assemblies: 9,
            surface_area: 36,
            bounds: Bounds::new([0, 0, 0], [4, 4, 4]),
        },
        ReactorConfig::default(),
    );
    reactor.insert_fuel(72_000);
    reactor.insert_coolant(SubstanceId::Water, 20_000);
    let max = reactor.max_burn_rate();
    reactor.set_rate_limit(max);
    if let Err(e) = reactor.activate() {
        eprintln!("could not start the reactor: {}", e);
        return;
    }

    let mut rng = RngSource::seeded(seed);
    let mut sampler = RngSource::seeded(seed.wrapping_add(1));
    let mut sink = RecordingSink::with_entities(vec![(1, Position::new(2.5, 2.5, 2.5))]);
    let mut router = RecordingRouter::new(u64::MAX, 500);
    let mut cache = RecordingCache::default();

    for _ in 0..MAX_TICKS {
        let report = sim.tick(
            TickContext::new(&mut rng)
                .with_sampler(&mut sampler)
                .with_radiation(&mut sink)
                .with_outputs(&mut router)
                .with_cache(&mut cache),
        );
        let Some(reactor) = sim.reactor() else {
            break;
        };

        if report.tick % STATUS_EVERY == 0 || report.meltdown.is_some() {
            let state = match report.damage_state {
                DamageState::Safe => "SAFE".green(),
                DamageState::Dangerous => "DANGER".red().bold(),
                DamageState::ForceDisabled => "LOCKED".yellow(),
            };
            println!(
                "  t={:>5} {:<6} {:>8.1}°C  damage {:>3}%  fuel {:>6}  waste out {:>5}  steam {:>6}",
                report.tick,
                state,
                kelvin_to_celsius(reactor.temperature()),
                reactor.damage_percent(),
                reactor.fuel_tank().stored(),
                router.waste[0].received,
                reactor.heated_coolant_tank().stored(),
            );
        }

        if let Some(meltdown) = report.meltdown {
            println!();
            println!(
                "{} after {} ticks: dose {:.1} released at ({:.1}, {:.1}, {:.1})",
                "MELTDOWN".red().bold(),
                report.tick,
                meltdown.dose,
                meltdown.center.x,
                meltdown.center.y,
                meltdown.center.z
            );
            break;
        }
    }

    println!();
    println!("entity dose received: {:.2}", sink.total_entity_dose(1));
    println!("cache syncs: {}", cache.synced.len());
    sim.log_timing_report();
}
