//! Per-slot records of a run and their CSV reports.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::core::common::UavId;
use crate::error::SimulationError;
use crate::sweep::SweepResult;

/// State of one UAV after an applied slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotRecord {
    pub uav: UavId,
    /// Zero-based index of the slot.
    pub slot: u64,
    /// Whether at least one replica of each service runs on the UAV, in catalog order.
    pub services_deployed: Vec<bool>,
    /// Wh left after the slot.
    pub battery: f64,
    /// Wh drawn during the slot.
    pub energy: f64,
    /// Percent of the CPU budget.
    pub cpu_utilization: f64,
    pub ram_usage: f64,
    pub downlink_data_rate: f64,
    pub uplink_data_rate: f64,
}

fn slot_records_header(service_count: usize) -> Vec<String> {
    let mut header = vec!["uav".to_string(), "step".to_string()];
    header.extend((0..service_count).map(|service| format!("service_{}", service)));
    header.extend(
        [
            "battery",
            "step_consumption",
            "cpu_utilization",
            "ram_usage",
            "downlink_data_rate",
            "uplink_data_rate",
        ]
        .iter()
        .map(|column| column.to_string()),
    );
    header
}

/// Writes one row per UAV and applied slot. Deployment flags are written as 0 or 1.
pub fn write_slot_records<W: Write>(
    records: &[SlotRecord],
    service_count: usize,
    out: W,
) -> Result<(), SimulationError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(slot_records_header(service_count))?;

    for record in records {
        let mut row = vec![record.uav.to_string(), record.slot.to_string()];
        row.extend(
            record
                .services_deployed
                .iter()
                .map(|deployed| (*deployed as u8).to_string()),
        );
        row.extend(
            [
                record.battery,
                record.energy,
                record.cpu_utilization,
                record.ram_usage,
                record.downlink_data_rate,
                record.uplink_data_rate,
            ]
            .iter()
            .map(|value| value.to_string()),
        );
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the endurance of every simulated fleet size.
pub fn write_endurance<W: Write>(results: &[SweepResult], out: W) -> Result<(), SimulationError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["No of UAVs", "Time slots"])?;
    for result in results {
        writer.write_record([
            result.summary.fleet_size.to_string(),
            result.summary.endurance.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `endurance.csv` and one `fleet_<fleet size>.csv` per run into `dir`.
pub fn write_reports(
    dir: &Path,
    results: &[SweepResult],
    service_count: usize,
) -> Result<(), SimulationError> {
    std::fs::create_dir_all(dir)?;
    write_endurance(results, File::create(dir.join("endurance.csv"))?)?;
    for result in results {
        let path = dir.join(format!("fleet_{}.csv", result.summary.fleet_size));
        write_slot_records(&result.records, service_count, File::create(path)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{write_slot_records, SlotRecord};

    #[test]
    fn test_slot_records_csv() {
        let records = vec![SlotRecord {
            uav: 1,
            slot: 0,
            services_deployed: vec![true, false],
            battery: 40.5,
            energy: 0.5,
            cpu_utilization: 25.0,
            ram_usage: 1.0,
            downlink_data_rate: 2.0,
            uplink_data_rate: 0.0,
        }];
        let mut out = Vec::new();
        write_slot_records(&records, 2, &mut out).unwrap();

        let csv = String::from_utf8(out).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            Some("uav,step,service_0,service_1,battery,step_consumption,cpu_utilization,ram_usage,downlink_data_rate,uplink_data_rate"),
            lines.next()
        );
        assert_eq!(Some("1,0,1,0,40.5,0.5,25,1,2,0"), lines.next());
        assert_eq!(None, lines.next());
    }
}
