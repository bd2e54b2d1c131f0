use crate::error::{ConsistError, Result};

/// A product load carried by a single car: name, weight in tons, value in
/// dollars, and whether the cargo is classified as dangerous.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductLoad {
    name: String,
    weight: f64,
    value: f64,
    dangerous: bool,
}

impl ProductLoad {
    /// Rejects non-positive weights and negative values; nothing is clamped.
    pub fn new(name: impl Into<String>, weight: f64, value: f64, dangerous: bool) -> Result<Self> {
        check_weight(weight)?;
        check_value(value)?;
        Ok(ProductLoad {
            name: name.into(),
            weight,
            value,
            dangerous,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_dangerous(&self) -> bool {
        self.dangerous
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_weight(&mut self, weight: f64) -> Result<()> {
        check_weight(weight)?;
        self.weight = weight;
        Ok(())
    }

    pub fn set_value(&mut self, value: f64) -> Result<()> {
        check_value(value)?;
        self.value = value;
        Ok(())
    }

    pub fn set_dangerous(&mut self, dangerous: bool) {
        self.dangerous = dangerous;
    }
}

fn check_weight(weight: f64) -> Result<()> {
    if weight > 0.0 {
        Ok(())
    } else {
        Err(ConsistError::invalid("The load weight must be greater than 0!"))
    }
}

fn check_value(value: f64) -> Result<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConsistError::invalid("The load value cannot be negative!"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_load_echoes_fields() {
        let load = ProductLoad::new("Ore", 100.0, 5000.0, false).unwrap();
        assert_eq!(load.name(), "Ore");
        assert_eq!(load.weight(), 100.0);
        assert_eq!(load.value(), 5000.0);
        assert!(!load.is_dangerous());
    }

    #[test]
    fn construction_rejects_bad_values() {
        let cases = [(0.0, 100.0), (-3.5, 100.0), (10.0, -0.01)];
        for (weight, value) in cases {
            let result = ProductLoad::new("Coal", weight, value, false);
            assert!(matches!(result, Err(ConsistError::InvalidArgument(_))));
        }
        // zero value is allowed, zero weight is not
        assert!(ProductLoad::new("Scrap", 1.0, 0.0, false).is_ok());
    }

    #[test]
    fn setters_revalidate() {
        let mut load = ProductLoad::new("Fuel", 40.0, 900.0, true).unwrap();
        assert!(load.set_weight(-1.0).is_err());
        assert!(load.set_value(-1.0).is_err());
        assert_eq!(load.weight(), 40.0);
        assert_eq!(load.value(), 900.0);

        load.set_weight(55.0).unwrap();
        load.set_value(0.0).unwrap();
        load.set_dangerous(false);
        load.set_name("Diesel");
        assert_eq!(load.weight(), 55.0);
        assert_eq!(load.value(), 0.0);
        assert!(!load.is_dangerous());
        assert_eq!(load.name(), "Diesel");
    }
}
