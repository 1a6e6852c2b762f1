// src/main.rs

use log::info;
use workshop_sim::io::reporting::{self, StepRecord};
use workshop_sim::strategy::implementations::RestockHeuristic;
use workshop_sim::{Policy, SimConfig, WorkshopSim};

fn main() {
    env_logger::init();

    println!("=== Workshop Production-Line Simulation ===");

    // 1. SETUP CONFIGURATION
    // The defaults model one week of minute-by-minute operation.
    let config = SimConfig::default();
    let minutes_per_day = config.minutes_per_day;

    // 2. INITIALIZE SIMULATION AND POLICY
    // The engine only defines the action consequences; the policy driving it
    // is an external collaborator. Swap in any other `Policy` here.
    let mut sim = WorkshopSim::new(config.clone());
    let mut policy = RestockHeuristic::new(&config);

    let seed = 42;
    let mut observation = sim.reset(Some(seed));
    println!("Running one episode of {} minutes (seed {})...", config.max_time, seed);

    // 3. RUN ONE EPISODE
    let mut history: Vec<StepRecord> = Vec::with_capacity(config.max_time as usize);
    loop {
        let mask = sim.action_mask();
        let action = policy.select_action(&observation, &mask);
        let outcome = sim.step(action);

        history.push(StepRecord::capture(&sim, outcome.reward));

        if sim.time() % minutes_per_day == 0 {
            let (backlog_p1, backlog_p2) = sim.backlogs();
            info!(
                "day {}: cumulative reward {:.1}, backlog ({}, {}), stock raw {}",
                sim.time() / minutes_per_day,
                sim.episode_reward(),
                backlog_p1,
                backlog_p2,
                sim.stock().raw
            );
        }

        observation = outcome.observation;
        if outcome.terminated {
            break;
        }
    }

    // 4. EXPORT RESULTS
    let output_file = "episode_log.csv";
    match reporting::write_episode_log(output_file, &history) {
        Ok(_) => println!("Success! {} rows written to ./{}", history.len(), output_file),
        Err(e) => eprintln!("Error writing CSV: {}", e),
    }

    // 5. PRINT EPISODE SUMMARY
    let (backlog_p1, backlog_p2) = sim.backlogs();
    println!("\n=== Episode Summary ===");
    println!("Total reward: {:.2}", sim.episode_reward());
    println!("Final backlog: P1 = {}, P2 = {}", backlog_p1, backlog_p2);
    println!(
        "Final stock: raw = {}, P1 = {}, P2 inter = {}, P2 = {}",
        sim.stock().raw,
        sim.stock().p1,
        sim.stock().p2_inter,
        sim.stock().p2
    );

    println!("\nSimulation Complete.");
}
