//! Run averaging and variant filtering
//!
//! The benchmark program repeats every (DataStructure, N) configuration
//! several times. Charts are drawn from one averaged row per configuration.

use crate::types::{AggregatedRecord, BenchmarkRecord};
use std::collections::BTreeMap;

/// Running sums for one (DataStructure, N) group
#[derive(Debug, Default)]
struct GroupSums {
    insertion_time_us: f64,
    avg_search_time_ns: f64,
    height: f64,
    extras: BTreeMap<String, (f64, usize)>,
    runs: usize,
}

impl GroupSums {
    fn add(&mut self, record: &BenchmarkRecord) {
        self.insertion_time_us += record.insertion_time_us;
        self.avg_search_time_ns += record.avg_search_time_ns;
        self.height += record.height;
        for (column, value) in &record.extras {
            let entry = self.extras.entry(column.clone()).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
        self.runs += 1;
    }

    fn into_record(self, data_structure: String, n: u64) -> AggregatedRecord {
        let runs = self.runs as f64;
        AggregatedRecord {
            data_structure,
            n,
            insertion_time_us: self.insertion_time_us / runs,
            avg_search_time_ns: self.avg_search_time_ns / runs,
            height: self.height / runs,
            extras: self
                .extras
                .into_iter()
                .map(|(column, (sum, count))| (column, sum / count as f64))
                .collect(),
            runs: self.runs,
        }
    }
}

/// Average all runs sharing a (DataStructure, N) key
///
/// Produces exactly one row per distinct key, ordered by label and then by N.
/// Every numeric column is replaced by the arithmetic mean over the group.
pub fn aggregate(records: &[BenchmarkRecord]) -> Vec<AggregatedRecord> {
    let mut groups: BTreeMap<(String, u64), GroupSums> = BTreeMap::new();

    for record in records {
        groups
            .entry((record.data_structure.clone(), record.n))
            .or_default()
            .add(record);
    }

    log::debug!(
        "Aggregated {} rows into {} (DataStructure, N) groups",
        records.len(),
        groups.len()
    );

    groups
        .into_iter()
        .map(|((data_structure, n), sums)| sums.into_record(data_structure, n))
        .collect()
}

/// Drop every row whose label is in `excluded`
pub fn exclude_variants<S: AsRef<str>>(
    records: &[AggregatedRecord],
    excluded: &[S],
) -> Vec<AggregatedRecord> {
    records
        .iter()
        .filter(|r| !excluded.iter().any(|e| e.as_ref() == r.data_structure))
        .cloned()
        .collect()
}

/// Distinct variant labels, in table order
pub fn variants(records: &[AggregatedRecord]) -> Vec<&str> {
    let mut labels: Vec<&str> = Vec::new();
    for record in records {
        if !labels.contains(&record.data_structure.as_str()) {
            labels.push(&record.data_structure);
        }
    }
    labels
}
