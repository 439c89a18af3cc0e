//! CSV-based assumption loader
//!
//! Loads planning assumptions from `planning_assumptions.csv` (`key,value` rows)

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

/// Default path to the assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data";

/// File name looked up inside the assumptions directory
pub const ASSUMPTIONS_FILE: &str = "planning_assumptions.csv";

/// Load assumption overrides from the given directory
/// Returns HashMap<key, value>
pub fn load_assumption_values(path: &Path) -> Result<HashMap<String, f64>> {
    let file = File::open(path.join(ASSUMPTIONS_FILE))?;
    load_assumption_values_from_reader(file)
}

/// Load assumption overrides from any reader
pub fn load_assumption_values_from_reader<R: Read>(reader: R) -> Result<HashMap<String, f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut values = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let key = record[0].to_string();
        let value: f64 = record[1].parse()?;
        values.insert(key, value);
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_reader() {
        let data = "key,value\n# scenario rates\noptimistic_rate, 0.09\ninflation,0.025\n";
        let values = load_assumption_values_from_reader(data.as_bytes()).unwrap();

        assert_eq!(values.len(), 2);
        assert_eq!(values["optimistic_rate"], 0.09);
        assert_eq!(values["inflation"], 0.025);
    }

    #[test]
    fn test_load_rejects_non_numeric() {
        let data = "key,value\ninflation,three percent\n";
        assert!(load_assumption_values_from_reader(data.as_bytes()).is_err());
    }

    #[test]
    fn test_load_default_assumptions() {
        let result = load_assumption_values(Path::new(DEFAULT_ASSUMPTIONS_PATH));
        assert!(result.is_ok(), "Failed to load assumptions: {:?}", result.err());

        let values = result.unwrap();
        assert_eq!(values["expected_rate"], 0.06);
        assert_eq!(values["retirement_age"], 65.0);
    }
}
