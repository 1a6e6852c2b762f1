// src/io/reporting.rs

use crate::simulation::engine::WorkshopSim;
use serde::Serialize;
use std::error::Error;
use std::path::Path;

// We make this Serialize so we can write it to CSV later
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub minute: u32,
    pub action_id: usize,
    pub action_kind: String,
    pub batch_size: u32,
    pub reward: f32,
    pub raw: u32,
    pub p1: u32,
    pub p2_inter: u32,
    pub p2: u32,
    pub backlog_p1: u32,
    pub backlog_p2: u32,
    pub in_transit: u32,
    pub episode_reward: f32,
}

impl StepRecord {
    /// Snapshots the engine state right after a step.
    pub fn capture(sim: &WorkshopSim, reward: f32) -> Self {
        let action = sim.last_action();
        let stock = sim.stock();
        let (backlog_p1, backlog_p2) = sim.backlogs();

        Self {
            minute: sim.time(),
            action_id: action.id,
            action_kind: format!("{:?}", action.kind),
            batch_size: action.k,
            reward,
            raw: stock.raw,
            p1: stock.p1,
            p2_inter: stock.p2_inter,
            p2: stock.p2,
            backlog_p1,
            backlog_p2,
            in_transit: sim.in_transit(),
            episode_reward: sim.episode_reward(),
        }
    }
}

/// Writes an episode log to a CSV file.
///
/// # Arguments
/// * `file_path` - The path to save the file (e.g., "episode_log.csv").
/// * `data` - One record per simulated minute.
pub fn write_episode_log(file_path: &str, data: &[StepRecord]) -> Result<(), Box<dyn Error>> {
    let path = Path::new(file_path);

    let mut wtr = csv::Writer::from_path(path)?;

    for record in data {
        wtr.serialize(record)?;
    }

    // Flush the buffer to ensure all data is written
    wtr.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::config::SimConfig;

    #[test]
    fn capture_reflects_the_engine_state() {
        let mut sim = WorkshopSim::new(SimConfig::default());
        sim.reset(Some(31));
        let out = sim.step(150); // order one raw unit

        let record = StepRecord::capture(&sim, out.reward);
        assert_eq!(record.minute, 1);
        assert_eq!(record.action_id, 150);
        assert_eq!(record.action_kind, "OrderRaw");
        assert_eq!(record.batch_size, 1);
        assert_eq!(record.reward, -1.0);
        assert_eq!(record.in_transit, 1);
    }

    #[test]
    fn records_serialize_to_csv_rows() {
        let mut sim = WorkshopSim::new(SimConfig::default());
        sim.reset(Some(32));
        let out = sim.step(200);
        let record = StepRecord::capture(&sim, out.reward);

        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.serialize(&record).unwrap();
        let bytes = wtr.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("minute,action_id,action_kind"));
        assert!(text.contains("Wait"));
    }
}
