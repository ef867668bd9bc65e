use std::str::FromStr;

use crate::{context::ContextState, types::err::OptionError};

/// A tunable value, with its name and permitted range.
#[derive(Clone, Debug)]
pub struct ConfigOption<T> {
    pub name: &'static str,
    pub min: T,
    pub max: T,
    /// The latest state of a solver in which the option may be changed.
    pub max_state: ContextState,
    pub value: T,
}

impl<T: Clone> ConfigOption<T> {
    pub fn min_max(&self) -> (T, T) {
        (self.min.clone(), self.max.clone())
    }
}

impl<T: Clone + PartialOrd + FromStr> ConfigOption<T> {
    /// Parses `value` and updates the option if the value is within range.
    pub fn set_from_str(&mut self, value: &str) -> Result<(), OptionError> {
        let parsed = match T::from_str(value.trim()) {
            Ok(parsed) => parsed,
            Err(_) => return Err(OptionError::UnparsableValue(self.name.to_string())),
        };
        if parsed < self.min || parsed > self.max {
            return Err(OptionError::OutOfRange(self.name.to_string()));
        }
        self.value = parsed;
        Ok(())
    }
}

/// Reads a boolean from `0`/`1` as well as `false`/`true`.
pub fn parse_switch(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

impl ConfigOption<bool> {
    pub fn set_switch(&mut self, value: &str) -> Result<(), OptionError> {
        match parse_switch(value) {
            Some(switch) => {
                self.value = switch;
                Ok(())
            }
            None => Err(OptionError::UnparsableValue(self.name.to_string())),
        }
    }
}
