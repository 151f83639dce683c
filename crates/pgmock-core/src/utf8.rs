//! Text values that Postgres can store.
//!
//! Postgres rejects NUL characters in `text`, so label values carrying one
//! are sanitized on construction by substituting [`NULL_CHAR_SANITIZE`].

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SqlError};
use crate::value::{TextEncoder, Value, ValueSetter};

/// Replacement for `'\0'` in stored text.
pub const NULL_CHAR_SANITIZE: char = '\u{FFFE}';

/// Replace every NUL character with [`NULL_CHAR_SANITIZE`].
pub fn sanitize(s: &str) -> Cow<'_, str> {
    if s.contains('\0') {
        Cow::Owned(s.replace('\0', &NULL_CHAR_SANITIZE.to_string()))
    } else {
        Cow::Borrowed(s)
    }
}

/// A sanitized text value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Utf8Text(String);

impl Utf8Text {
    pub fn new(s: &str) -> Self {
        Self(sanitize(s).into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Utf8Text {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<Utf8Text> for String {
    fn from(t: Utf8Text) -> Self {
        t.0
    }
}

impl ValueSetter for Utf8Text {
    fn set(&mut self, src: &Value) -> Result<()> {
        match src {
            Value::String(s) => *self = Self::new(s),
            Value::Utf8Text(t) => *self = t.clone(),
            other => {
                return Err(SqlError::conversion(format!(
                    "cannot convert {} to utf8 text",
                    other.kind()
                )))
            }
        }
        Ok(())
    }
}

impl TextEncoder for Utf8Text {
    fn encode_text(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// A one-dimensional array of sanitized text values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Utf8TextArray(Vec<Utf8Text>);

impl Utf8TextArray {
    pub fn new<S: AsRef<str>>(items: &[S]) -> Self {
        Self(items.iter().map(|s| Utf8Text::new(s.as_ref())).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Utf8Text> {
        self.0.iter()
    }

    /// Element strings, in order.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|t| t.as_str().to_owned()).collect()
    }
}

impl ValueSetter for Utf8TextArray {
    fn set(&mut self, src: &Value) -> Result<()> {
        match src {
            Value::StringArray(items) => *self = Self::new(items.as_slice()),
            Value::Utf8TextArray(a) => *self = a.clone(),
            other => {
                return Err(SqlError::conversion(format!(
                    "cannot convert {} to utf8 text array",
                    other.kind()
                )))
            }
        }
        Ok(())
    }
}

impl TextEncoder for Utf8TextArray {
    /// Postgres array literal with every element quoted.
    fn encode_text(&self) -> Result<String> {
        let mut out = String::from("{");
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push('"');
            for c in item.as_str().chars() {
                if c == '"' || c == '\\' {
                    out.push('\\');
                }
                out.push(c);
            }
            out.push('"');
        }
        out.push('}');
        Ok(out)
    }
}
