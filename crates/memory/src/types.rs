use serde::Serialize;
use serde_json::{Map, Value};
use tabgate_core::{GateError, Result};

/// Non-empty key/value payload destined for one storage area.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsObject(Map<String, Value>);

impl SettingsObject {
    pub fn new(items: Map<String, Value>) -> Result<Self> {
        if items.is_empty() {
            return Err(GateError::InvalidArgument(
                "settings object must contain at least one key".to_string(),
            ));
        }
        Ok(Self(items))
    }

    pub fn single(key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut items = Map::new();
        items.insert(key.into(), value.into());
        Self(items)
    }

    /// Anything that serializes to a non-empty JSON object.
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        match serde_json::to_value(value)? {
            Value::Object(items) => Self::new(items),
            other => Err(GateError::InvalidArgument(format!(
                "settings must be a key/value object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl TryFrom<Value> for SettingsObject {
    type Error = GateError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_serializable(&value)
    }
}

/// Which keys to read back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyQuery {
    /// No filter: every stored key in the area.
    All,
    Key(String),
    Keys(Vec<String>),
}

impl KeyQuery {
    /// Host key filter. An empty filter means "every key".
    pub(crate) fn into_filter(self) -> Result<Vec<String>> {
        match self {
            KeyQuery::All => Ok(Vec::new()),
            // An empty single key carries no filter, same as omitting it.
            KeyQuery::Key(key) if key.is_empty() => Ok(Vec::new()),
            KeyQuery::Key(key) => Ok(vec![key]),
            KeyQuery::Keys(keys) if keys.is_empty() => Err(GateError::InvalidArgument(
                "key list must not be empty".to_string(),
            )),
            KeyQuery::Keys(keys) => Ok(keys),
        }
    }
}

impl From<&str> for KeyQuery {
    fn from(key: &str) -> Self {
        KeyQuery::Key(key.to_string())
    }
}

impl From<String> for KeyQuery {
    fn from(key: String) -> Self {
        KeyQuery::Key(key)
    }
}

impl From<Vec<String>> for KeyQuery {
    fn from(keys: Vec<String>) -> Self {
        KeyQuery::Keys(keys)
    }
}

impl From<&[&str]> for KeyQuery {
    fn from(keys: &[&str]) -> Self {
        KeyQuery::Keys(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for KeyQuery {
    fn from(keys: [&str; N]) -> Self {
        KeyQuery::Keys(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl<Q: Into<KeyQuery>> From<Option<Q>> for KeyQuery {
    fn from(query: Option<Q>) -> Self {
        query.map(Into::into).unwrap_or(KeyQuery::All)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
