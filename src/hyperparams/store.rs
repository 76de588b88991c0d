use std::collections::HashMap;
use std::fmt;

use log::warn;

use crate::hyperparams::spec::{HyperparamKind, HyperparamSpec, HyperparamValue};

/// Raised when coercing the store's string-form values to their declared
/// kinds fails.
#[derive(Debug, Clone, PartialEq)]
pub enum HyperparamError {
    /// A Number-kind field holds a string that does not parse as `f64`.
    NotNumeric { name: String, value: String },
}

impl fmt::Display for HyperparamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotNumeric { name, value } => {
                write!(f, "hyperparameter '{}' is not a number: '{}'", name, value)
            }
        }
    }
}

impl std::error::Error for HyperparamError {}

/// Coerced, typed values for every declared hyperparameter.
#[derive(Debug, Clone)]
pub struct HyperparamValues {
    values: HashMap<String, HyperparamValue>,
}

impl HyperparamValues {
    pub fn get(&self, name: &str) -> Option<&HyperparamValue> {
        self.values.get(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(HyperparamValue::as_number)
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.values.get(name).and_then(HyperparamValue::as_boolean)
    }
}

/// Holds one editable string-form value per declared hyperparameter,
/// seeded from the spec defaults.
///
/// Writes are raw overwrites with no validation; all coercion happens in
/// [`HyperparamStore::values`]. Number kinds parse strictly as `f64` and
/// reject unparsable input with [`HyperparamError::NotNumeric`] rather than
/// letting `NaN` leak into model construction. Boolean kinds read as the
/// truthiness of the non-empty string.
#[derive(Debug, Clone)]
pub struct HyperparamStore {
    specs: Vec<HyperparamSpec>,
    edits: HashMap<String, String>,
}

impl HyperparamStore {
    pub fn new(specs: Vec<HyperparamSpec>) -> HyperparamStore {
        let edits = specs
            .iter()
            .map(|spec| (spec.name.clone(), spec.default.seed_string()))
            .collect();
        HyperparamStore { specs, edits }
    }

    /// The declared specs, in declaration order.
    pub fn specs(&self) -> &[HyperparamSpec] {
        &self.specs
    }

    /// The current string form of a field, as last written.
    pub fn get_value(&self, name: &str) -> Option<&str> {
        self.edits.get(name).map(String::as_str)
    }

    /// Overwrites a field's string form. Unknown names are ignored.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        match self.edits.get_mut(name) {
            Some(slot) => *slot = value.into(),
            None => warn!("ignoring edit to undeclared hyperparameter '{}'", name),
        }
    }

    /// Coerces every field to its declared kind.
    pub fn values(&self) -> Result<HyperparamValues, HyperparamError> {
        let mut values = HashMap::with_capacity(self.specs.len());
        for spec in &self.specs {
            let raw = self.edits.get(&spec.name).map(String::as_str).unwrap_or("");
            let value = match spec.kind {
                HyperparamKind::Number => {
                    let parsed: f64 = raw.trim().parse().map_err(|_| HyperparamError::NotNumeric {
                        name: spec.name.clone(),
                        value: raw.to_owned(),
                    })?;
                    HyperparamValue::Number(parsed)
                }
                HyperparamKind::Boolean => HyperparamValue::Boolean(!raw.is_empty()),
            };
            values.insert(spec.name.clone(), value);
        }
        Ok(HyperparamValues { values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> HyperparamStore {
        HyperparamStore::new(vec![
            HyperparamSpec::number("learning_rate", "Learning Rate", 0.1),
            HyperparamSpec::boolean("use_bias", "Use Bias", false),
            HyperparamSpec::boolean("shuffle", "Shuffle", true),
        ])
    }

    #[test]
    fn defaults_round_trip_through_coercion() {
        let values = store().values().unwrap();
        assert_eq!(values.number("learning_rate"), Some(0.1));
        assert_eq!(values.boolean("use_bias"), Some(false));
        assert_eq!(values.boolean("shuffle"), Some(true));
    }

    #[test]
    fn edited_number_is_parsed_on_read() {
        let mut st = store();
        st.set_value("learning_rate", "0.05");
        assert_eq!(st.get_value("learning_rate"), Some("0.05"));
        assert_eq!(st.values().unwrap().number("learning_rate"), Some(0.05));
    }

    #[test]
    fn unparsable_number_is_rejected() {
        let mut st = store();
        st.set_value("learning_rate", "abc");
        let err = st.values().unwrap_err();
        assert_eq!(
            err,
            HyperparamError::NotNumeric {
                name: "learning_rate".to_owned(),
                value: "abc".to_owned(),
            }
        );
    }

    #[test]
    fn boolean_reads_truthiness_of_non_empty_string() {
        let mut st = store();
        st.set_value("use_bias", "anything");
        assert_eq!(st.values().unwrap().boolean("use_bias"), Some(true));
        st.set_value("use_bias", "");
        assert_eq!(st.values().unwrap().boolean("use_bias"), Some(false));
    }

    #[test]
    fn unknown_name_is_ignored() {
        let mut st = store();
        st.set_value("momentum", "0.9");
        assert_eq!(st.get_value("momentum"), None);
        assert!(st.values().is_ok());
    }

    #[test]
    fn kind_mismatch_reads_as_none() {
        let values = store().values().unwrap();
        assert_eq!(values.boolean("learning_rate"), None);
        assert_eq!(values.number("use_bias"), None);
    }
}
