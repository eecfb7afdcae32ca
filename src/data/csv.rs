//! Sample-data CSV reader
//!
//! Reads observation rows from a headered CSV file so the scoring stage can
//! run against offline sample data instead of the freshly extracted set.

use std::path::Path;

use crate::error::Result;
use super::observation::DemandObservation;

/// Read up to `limit` observations from a CSV file with a header row whose
/// column names match the observation fields.
pub fn read_sample_observations(path: &Path, limit: usize) -> Result<Vec<DemandObservation>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut observations = Vec::new();

    for record in reader.deserialize() {
        let obs: DemandObservation = record?;
        observations.push(obs);
        if observations.len() == limit {
            break;
        }
    }

    Ok(observations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_sample_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "id,year,month,day,hour,weekday,count").unwrap();
        writeln!(file, "2,2019,1,1,4,3,4").unwrap();
        writeln!(file, "5,2019,1,2,9,4,12").unwrap();
        writeln!(file, "5,2019,1,3,9,5,7").unwrap();

        let observations = read_sample_observations(&path, 2).unwrap();
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0], DemandObservation::sample());
        assert_eq!(observations[1].count, 12.0);
    }

    #[test]
    fn test_missing_field_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "id,year,month\n2,2019,1\n").unwrap();
        assert!(read_sample_observations(&path, 10).is_err());
    }
}
