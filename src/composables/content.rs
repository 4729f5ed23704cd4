use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use rand::Rng;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

pub type Formatter = Box<dyn Fn(&Value) -> Value>;
pub type Formatters = HashMap<String, Formatter>;

/// JSON type a schema entry can demand of a content field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    String,
    Number,
    Boolean,
    /// Objects, arrays and null.
    Object,
    /// The key is absent.
    Undefined,
}

impl ContentType {
    fn matches(self, value: Option<&Value>) -> bool {
        match (self, value) {
            (ContentType::String, Some(Value::String(_))) => true,
            (ContentType::Number, Some(Value::Number(_))) => true,
            (ContentType::Boolean, Some(Value::Bool(_))) => true,
            (ContentType::Object, Some(Value::Object(_) | Value::Array(_) | Value::Null)) => true,
            (ContentType::Undefined, None) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContentRule {
    pub required: bool,
    pub kind: Option<ContentType>,
    pub pattern: Option<Regex>,
}

pub type ContentSchema = BTreeMap<String, ContentRule>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentStats {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
}

/// In-memory content blob: usually an array of `{ id, type, .. }` items, but
/// any JSON value is accepted and the list operations simply do nothing on
/// non-arrays.
#[derive(Debug, Clone)]
pub struct ContentStore {
    content_data: Value,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for ContentStore {
    fn default() -> Self {
        Self {
            content_data: Value::Object(Map::new()),
            is_loading: false,
            error: None,
        }
    }
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &Value {
        &self.content_data
    }

    pub fn set_content(&mut self, data: Value) {
        self.content_data = data;
    }

    /// Shallow merge of `updates` over the current data. An array is spread
    /// into index keys first.
    pub fn update_content(&mut self, updates: Map<String, Value>) {
        let mut merged = match std::mem::take(&mut self.content_data) {
            Value::Object(map) => map,
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item))
                .collect(),
            _ => Map::new(),
        };
        merged.extend(updates);
        self.content_data = Value::Object(merged);
    }

    pub fn get_content_by_type(&self, kind: &str) -> Vec<&Value> {
        self.items()
            .iter()
            .filter(|item| item.get("type").and_then(Value::as_str) == Some(kind))
            .collect()
    }

    pub fn get_content_by_id(&self, id: &str) -> Option<&Value> {
        self.items().iter().find(|item| has_id(item, id))
    }

    /// Appends `item` when the content is a list. Returns whether it was added.
    pub fn add_content(&mut self, item: Value) -> bool {
        match &mut self.content_data {
            Value::Array(items) => {
                items.push(item);
                true
            }
            _ => false,
        }
    }

    pub fn remove_content(&mut self, id: &str) -> Option<Value> {
        let Value::Array(items) = &mut self.content_data else {
            return None;
        };
        let index = items.iter().position(|item| has_id(item, id))?;
        Some(items.remove(index))
    }

    pub fn content_stats(&self) -> ContentStats {
        let Value::Array(items) = &self.content_data else {
            return ContentStats::default();
        };
        let mut by_type = BTreeMap::new();
        for item in items {
            let kind = match item.get("type") {
                Some(Value::String(kind)) => kind.clone(),
                Some(other) => other.to_string(),
                None => "undefined".to_string(),
            };
            *by_type.entry(kind).or_insert(0) += 1;
        }
        ContentStats {
            total: items.len(),
            by_type,
        }
    }

    fn items(&self) -> &[Value] {
        match &self.content_data {
            Value::Array(items) => items,
            _ => &[],
        }
    }
}

fn has_id(item: &Value, id: &str) -> bool {
    item.get("id").and_then(Value::as_str) == Some(id)
}

/// `{prefix}-{epoch millis}-{9 random base-36 characters}`.
pub fn generate_unique_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), suffix)
}

/// Rebuilds `content`, passing the value under any key that has a formatter
/// through it and recursing everywhere else.
pub fn format_content(content: &Value, formatters: &Formatters) -> Value {
    match content {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| format_content(item, formatters))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let formatted = match formatters.get(key) {
                        Some(formatter) => formatter(value),
                        None => format_content(value, formatters),
                    };
                    (key.clone(), formatted)
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

pub fn validate_content(content: &Value, schema: Option<&ContentSchema>) -> bool {
    let Some(schema) = schema else {
        return true;
    };

    schema.iter().all(|(key, rule)| {
        let value = content.get(key);
        if rule.required && !is_truthy(value) {
            return false;
        }
        if let Some(kind) = rule.kind {
            if !kind.matches(value) {
                return false;
            }
        }
        if let Some(pattern) = &rule.pattern {
            if !pattern.is_match(&display_value(value)) {
                return false;
            }
        }
        true
    })
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().map_or(true, |n| n != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// String form used for pattern checks, following JavaScript's `String(value)`.
fn display_value(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(value) => js_string(value),
    }
}

fn js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => match number.as_i64() {
            Some(int) => int.to_string(),
            None => number.as_f64().map(|float| float.to_string()).unwrap_or_default(),
        },
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => js_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}
