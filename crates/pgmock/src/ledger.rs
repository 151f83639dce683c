//! Ledger entries and the rules for matching a call against one.
//!
//! A ledger is an ordered `Vec<SqlQuery>`. It can be built in code or loaded
//! from a JSON file:
//!
//! ```json
//! [
//!   {
//!     "sql": "SELECT id FROM series WHERE name = $1",
//!     "args": [{"kind": "string", "value": "cpu"}],
//!     "results": [[{"kind": "int64", "value": 7}]]
//!   },
//!   {
//!     "sql": "DELETE FROM series",
//!     "err": {"kind": "database", "code": "42501", "message": "permission denied"}
//!   }
//! ]
//! ```

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use pgmock_core::{CommandTag, RowResults, SqlError, Value};

use crate::error::Result;
use crate::failure::Failure;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// One expected call and the response to give it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlQuery {
    pub sql: String,
    #[serde(default)]
    pub args: Vec<Value>,
    /// Compare sequence arguments as multisets.
    #[serde(default)]
    pub args_unordered: bool,
    #[serde(default)]
    pub results: RowResults,
    #[serde(default)]
    pub err: Option<SqlError>,
}

impl SqlQuery {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            args: Vec::new(),
            args_unordered: false,
            results: Vec::new(),
            err: None,
        }
    }

    pub fn args<I, V>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn args_unordered(mut self) -> Self {
        self.args_unordered = true;
        self
    }

    pub fn results(mut self, results: RowResults) -> Self {
        self.results = results;
        self
    }

    /// Respond to an exec with this command tag.
    pub fn tag(self, tag: &str) -> Self {
        self.results(vec![vec![Value::CommandTag(CommandTag::new(tag))]])
    }

    pub fn err(mut self, err: SqlError) -> Self {
        self.err = Some(err);
        self
    }
}

/// Parse a ledger from JSON text.
pub fn from_json(json: &str) -> Result<Vec<SqlQuery>> {
    Ok(serde_json::from_str(json)?)
}

/// Load a ledger from a JSON file.
pub fn from_path(path: impl AsRef<Path>) -> Result<Vec<SqlQuery>> {
    let json = std::fs::read_to_string(path)?;
    from_json(&json)
}

/// Collapse every whitespace run to a single space.
pub fn normalize(sql: &str) -> String {
    WHITESPACE.replace_all(sql, " ").into_owned()
}

/// Compare incoming arguments with an entry's declared ones.
///
/// A count mismatch stops the comparison.
pub(crate) fn check_args(
    index: usize,
    sql: &str,
    entry: &SqlQuery,
    args: &[Value],
) -> Vec<Failure> {
    if entry.args.len() != args.len() {
        return vec![Failure::ArgCount {
            index,
            sql: sql.to_owned(),
            expected: entry.args.len(),
            got: args.len(),
        }];
    }

    let mut failures = Vec::new();
    for (position, (expected, got)) in entry.args.iter().zip(args).enumerate() {
        let matched = match expected.text_encoder() {
            Some(expected_enc) => {
                let encoded = got
                    .text_encoder()
                    .ok_or_else(|| format!("argument of kind {} has no text encoding", got.kind()))
                    .and_then(|got_enc| {
                        let e = expected_enc.encode_text().map_err(|e| e.to_string())?;
                        let g = got_enc.encode_text().map_err(|e| e.to_string())?;
                        Ok(e == g)
                    });
                match encoded {
                    Ok(matched) => matched,
                    Err(message) => {
                        failures.push(Failure::ArgEncoding {
                            index,
                            position,
                            message,
                        });
                        continue;
                    }
                }
            }
            None if entry.args_unordered => elements_match(expected, got),
            None => expected == got,
        };

        if !matched {
            failures.push(Failure::ArgMismatch {
                index,
                sql: sql.to_owned(),
                position,
                expected: expected.clone(),
                got: got.clone(),
            });
        }
    }
    failures
}

/// Multiset equality for sequence values of the same kind; plain equality
/// otherwise.
fn elements_match(expected: &Value, got: &Value) -> bool {
    if expected.kind() != got.kind() {
        return false;
    }
    let (Some(expected), Some(got)) = (expected.elements(), got.elements()) else {
        return expected == got;
    };
    if expected.len() != got.len() {
        return false;
    }

    let mut remaining: Vec<Option<Value>> = got.into_iter().map(Some).collect();
    expected.iter().all(|e| {
        match remaining.iter_mut().find(|slot| slot.as_ref() == Some(e)) {
            Some(slot) => {
                *slot = None;
                true
            }
            None => false,
        }
    })
}

/// The command tag of an exec result.
///
/// An empty result yields the empty tag. Anything but one row holding one
/// command tag is a shape problem.
pub(crate) fn command_tag(results: &RowResults) -> std::result::Result<CommandTag, &'static str> {
    match results.as_slice() {
        [] => Ok(CommandTag::default()),
        [row] => match row.as_slice() {
            [Value::CommandTag(tag)] => Ok(tag.clone()),
            [_] => Err("return value is not a command tag"),
            _ => Err("wrong number of return values"),
        },
        _ => Err("too many return rows"),
    }
}
