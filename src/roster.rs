use crate::consist::{ProductLoad, Train, TrainCar};
use crate::error::ConsistError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Starting consist description, read from a TOML file at startup.
#[derive(Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub cars: Vec<CarData>,
}

#[derive(Deserialize)]
pub struct CarData {
    pub length: f64,
    pub weight: f64,
    pub load: Option<LoadData>,
}

#[derive(Deserialize)]
pub struct LoadData {
    pub name: String,
    pub weight: f64,
    pub value: f64,
    #[serde(default)]
    pub dangerous: bool,
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read roster file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse roster file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid roster entry: {0}")]
    Invalid(#[from] ConsistError),
}

impl Roster {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Roster, RosterError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Builds a train by inserting the cars in file order; the cursor ends up
    /// on the last car.
    pub fn build(&self) -> Result<Train, RosterError> {
        let mut train = Train::new();
        for data in &self.cars {
            let mut car = TrainCar::new(data.length, data.weight);
            if let Some(load) = &data.load {
                car.set_load(Some(ProductLoad::new(
                    load.name.clone(),
                    load.weight,
                    load.value,
                    load.dangerous,
                )?));
            }
            train.insert_after_cursor(car)?;
        }
        Ok(train)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [[cars]]
        length = 20.0
        weight = 30.0

        [cars.load]
        name = "Ore"
        weight = 100.0
        value = 5000.0

        [[cars]]
        length = 15.0
        weight = 25.0

        [[cars]]
        length = 18.0
        weight = 22.0

        [cars.load]
        name = "Fuel"
        weight = 40.0
        value = 9000.0
        dangerous = true
    "#;

    #[test]
    fn builds_train_from_toml() {
        let roster: Roster = toml::from_str(SAMPLE).unwrap();
        let train = roster.build().unwrap();
        assert_eq!(train.size(), 3);
        assert_eq!(train.total_length(), 53.0);
        assert_eq!(train.total_weight(), 217.0);
        assert_eq!(train.total_value(), 14000.0);
        assert_eq!(train.dangerous_cars(), 1);
        // cursor seeded on the last car of the file
        assert_eq!(train.cursor_car().unwrap().length(), 18.0);
    }

    #[test]
    fn dangerous_flag_defaults_to_false() {
        let roster: Roster = toml::from_str(SAMPLE).unwrap();
        let first = roster.cars[0].load.as_ref().unwrap();
        assert!(!first.dangerous);
    }

    #[test]
    fn invalid_load_surfaces_consist_error() {
        let bad = r#"
            [[cars]]
            length = 20.0
            weight = 30.0

            [cars.load]
            name = "Ore"
            weight = -1.0
            value = 100.0
        "#;
        let roster: Roster = toml::from_str(bad).unwrap();
        assert!(matches!(roster.build(), Err(RosterError::Invalid(_))));
    }

    #[test]
    fn empty_file_builds_empty_train() {
        let roster: Roster = toml::from_str("").unwrap();
        let train = roster.build().unwrap();
        assert_eq!(train.size(), 0);
    }
}
