//! Form submission

use serde_json::{Map, Value};

/// A single submitted form field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormField {
    /// The field name as submitted, e.g. `phone_number`
    pub name: String,

    /// The field value as text
    pub value: String,
}

impl FormField {
    /// Creates a new form field
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A form submission to relay
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    /// Label of the form the submission came from, e.g. "Join Us"
    pub source: String,

    /// The subject of the notification
    pub subject: String,

    /// The submitted fields, in submission order
    pub fields: Vec<FormField>,
}

impl Submission {
    /// Creates a new submission
    pub fn new(source: &str, subject: &str, fields: Vec<FormField>) -> Self {
        Self {
            source: source.to_string(),
            subject: subject.to_string(),
            fields,
        }
    }

    /// Creates a submission from a JSON object, keeping the object's key order.
    ///
    /// Strings are taken verbatim, `null` becomes an empty string and any
    /// other value is written as compact JSON.
    pub fn from_json(source: &str, subject: &str, form_data: Map<String, Value>) -> Self {
        let fields = form_data
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };

                FormField { name, value }
            })
            .collect();

        Self::new(source, subject, fields)
    }
}
