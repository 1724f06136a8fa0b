// SPDX-License-Identifier: MIT OR Apache-2.0
//! Socket templates, socket types and literal values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Socket direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Input socket
    Input,
    /// Output socket
    Output,
}

/// Data type carried by a socket, as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocketType {
    /// Scalar float value
    Value,
    /// Integer value
    Int,
    /// Boolean value
    Boolean,
    /// 3D vector
    Vector,
    /// Color (RGBA)
    Rgba,
    /// Text value
    String,
    /// Shader closure
    Shader,
    /// Any other host type
    Custom(String),
}

impl SocketType {
    /// Parse a raw host type name (`VALUE`, `RGBA`, `Color`, ...)
    pub fn from_host_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "VALUE" | "FLOAT" => Self::Value,
            "INT" => Self::Int,
            "BOOLEAN" | "BOOL" => Self::Boolean,
            "VECTOR" => Self::Vector,
            "RGBA" | "COLOR" => Self::Rgba,
            "STRING" => Self::String,
            "SHADER" => Self::Shader,
            _ => Self::Custom(name.to_string()),
        }
    }

    /// Host-facing type name
    pub fn host_name(&self) -> &str {
        match self {
            Self::Value => "VALUE",
            Self::Int => "INT",
            Self::Boolean => "BOOLEAN",
            Self::Vector => "VECTOR",
            Self::Rgba => "RGBA",
            Self::String => "STRING",
            Self::Shader => "SHADER",
            Self::Custom(name) => name,
        }
    }

    /// Vector-typed sockets route arithmetic to vector math
    pub fn is_vector(&self) -> bool {
        matches!(self, Self::Vector | Self::Rgba)
    }

    /// Scalar-typed sockets route arithmetic to scalar math
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Value | Self::Int | Self::Boolean)
    }
}

impl fmt::Display for SocketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.host_name())
    }
}

/// Literal value held by a socket or a configuration field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SocketValue {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i32),
    /// Float
    Float(f32),
    /// 3D vector
    Vector([f32; 3]),
    /// Color
    Color([f32; 4]),
    /// Untyped tuple literal, shaped on assignment
    Tuple(Vec<f32>),
    /// String (also used for enum-like fields such as `operation`)
    String(String),
}

impl SocketValue {
    /// Short name of the value variant, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Vector(_) => "vector",
            Self::Color(_) => "color",
            Self::Tuple(_) => "tuple",
            Self::String(_) => "string",
        }
    }

    /// Components of the value when it is numeric
    pub fn components(&self) -> Option<Vec<f32>> {
        match self {
            Self::Bool(b) => Some(vec![if *b { 1.0 } else { 0.0 }]),
            Self::Int(i) => Some(vec![*i as f32]),
            Self::Float(x) => Some(vec![*x]),
            Self::Vector(v) => Some(v.to_vec()),
            Self::Color(c) => Some(c.to_vec()),
            Self::Tuple(t) => Some(t.clone()),
            Self::String(_) => None,
        }
    }

    /// Whether a value of this variant may be stored where `other` is expected
    pub fn same_shape(&self, other: &SocketValue) -> bool {
        match (self, other) {
            (Self::Int(_), Self::Float(_)) | (Self::Float(_), Self::Int(_)) => true,
            (Self::Tuple(_), Self::Vector(_) | Self::Color(_)) => true,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }

    /// Shape the value for a socket of the given type.
    ///
    /// Scalars broadcast into vector and color sockets, tuples are truncated
    /// (or zero-padded) to the socket's component count, anything assigned to
    /// a string socket is stringified. The second element describes the
    /// coercion when one took place.
    pub fn coerce_to(self, socket_type: &SocketType) -> (SocketValue, Option<TypeCoercionNotice>) {
        let original = self.clone();
        let coerced = match (socket_type, self) {
            (SocketType::Rgba, value @ SocketValue::Color(_)) => value,
            (SocketType::Rgba, value) => match value.components() {
                Some(c) => SocketValue::Color(shape::<4>(&c)),
                None => value,
            },
            (SocketType::Vector, value @ SocketValue::Vector(_)) => value,
            (SocketType::Vector, value) => match value.components() {
                Some(c) => SocketValue::Vector(shape::<3>(&c)),
                None => value,
            },
            (SocketType::String, value @ SocketValue::String(_)) => value,
            (SocketType::String, value) => SocketValue::String(value.to_string()),
            (SocketType::Value, value @ SocketValue::Float(_)) => value,
            (SocketType::Value, value) => match value.components() {
                Some(c) if !c.is_empty() => SocketValue::Float(c[0]),
                _ => value,
            },
            (_, value) => value,
        };

        let notice = (coerced != original).then(|| TypeCoercionNotice {
            socket_type: socket_type.clone(),
            from: original,
            to: coerced.clone(),
        });
        (coerced, notice)
    }
}

/// Broadcast a single component or truncate/pad a tuple to `N` components
fn shape<const N: usize>(components: &[f32]) -> [f32; N] {
    let mut out = [0.0; N];
    if components.len() == 1 {
        out = [components[0]; N];
    } else {
        for (slot, c) in out.iter_mut().zip(components) {
            *slot = *c;
        }
    }
    out
}

impl fmt::Display for SocketValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
            value => {
                let parts: Vec<String> = value
                    .components()
                    .unwrap_or_default()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                write!(f, "({})", parts.join(", "))
            }
        }
    }
}

impl From<f32> for SocketValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<i32> for SocketValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for SocketValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<[f32; 3]> for SocketValue {
    fn from(value: [f32; 3]) -> Self {
        Self::Vector(value)
    }
}

impl From<[f32; 4]> for SocketValue {
    fn from(value: [f32; 4]) -> Self {
        Self::Color(value)
    }
}

impl From<Vec<f32>> for SocketValue {
    fn from(value: Vec<f32>) -> Self {
        Self::Tuple(value)
    }
}

impl From<&str> for SocketValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for SocketValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// A literal was reshaped to fit the socket it was assigned to
#[derive(Debug, Clone, PartialEq)]
pub struct TypeCoercionNotice {
    /// Declared type of the receiving socket
    pub socket_type: SocketType,
    /// Value as given
    pub from: SocketValue,
    /// Value as stored
    pub to: SocketValue,
}

impl fmt::Display for TypeCoercionNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "coerced {} to {} for {} socket", self.from, self.to, self.socket_type)
    }
}

/// Immutable description of one socket of a node kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocketTemplate {
    /// Position within the node kind's inputs or outputs
    pub index: usize,
    /// Deduplicated identifier used for lookups
    pub name: String,
    /// Raw host-facing name
    pub identifier: String,
    /// Declared type
    pub socket_type: SocketType,
    /// Default value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<SocketValue>,
    /// Minimum value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f32>,
    /// Maximum value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f32>,
}

impl SocketTemplate {
    /// Create a template; the lookup name is derived from the identifier
    pub fn new(index: usize, identifier: impl Into<String>, socket_type: SocketType) -> Self {
        let identifier = identifier.into();
        Self {
            index,
            name: lookup_name(&identifier),
            identifier,
            socket_type,
            default: None,
            min: None,
            max: None,
        }
    }

    /// Set the default value
    pub fn with_default(mut self, value: impl Into<SocketValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Set the value range
    pub fn with_range(mut self, min: Option<f32>, max: Option<f32>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Positional alias (`i0`, `o2`, ...)
    pub fn alias(&self, direction: Direction) -> String {
        match direction {
            Direction::Input => format!("i{}", self.index),
            Direction::Output => format!("o{}", self.index),
        }
    }
}

/// Lower-case the identifier and replace spaces with underscores
pub fn lookup_name(identifier: &str) -> String {
    identifier.to_lowercase().replace(' ', "_")
}

/// Suffix every colliding name with an increasing counter starting at 1.
///
/// Names that occur once are left untouched, so `[Value, Value, Fac]` becomes
/// `[value1, value2, fac]`. Counters skip names already present, so
/// `[Value, Value, Value1]` becomes `[value2, value3, value1]`.
pub fn dedupe_names(templates: &mut [SocketTemplate]) {
    let mut totals: indexmap::IndexMap<String, usize> = indexmap::IndexMap::new();
    for template in templates.iter() {
        *totals.entry(template.name.clone()).or_default() += 1;
    }

    let mut taken: indexmap::IndexSet<String> = totals
        .iter()
        .filter(|(_, count)| **count == 1)
        .map(|(name, _)| name.clone())
        .collect();
    let mut seen: indexmap::IndexMap<String, usize> = indexmap::IndexMap::new();
    for template in templates.iter_mut() {
        if totals.get(&template.name).copied().unwrap_or(0) > 1 {
            let counter = seen.entry(template.name.clone()).or_default();
            let mut candidate;
            loop {
                *counter += 1;
                candidate = format!("{}{}", template.name, counter);
                if !taken.contains(&candidate) {
                    break;
                }
            }
            taken.insert(candidate.clone());
            template.name = candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_broadcasts_into_color() {
        let (value, notice) = SocketValue::Int(5).coerce_to(&SocketType::Rgba);
        assert_eq!(value, SocketValue::Color([5.0, 5.0, 5.0, 5.0]));
        assert!(notice.is_some());
    }

    #[test]
    fn test_tuple_truncates_to_vector() {
        let tuple = SocketValue::Tuple(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let (value, _) = tuple.coerce_to(&SocketType::Vector);
        assert_eq!(value, SocketValue::Vector([1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_short_tuple_is_zero_padded() {
        let (value, _) = SocketValue::Tuple(vec![0.5, 0.25]).coerce_to(&SocketType::Rgba);
        assert_eq!(value, SocketValue::Color([0.5, 0.25, 0.0, 0.0]));
    }

    #[test]
    fn test_string_socket_stringifies() {
        let (value, notice) = SocketValue::Float(1.5).coerce_to(&SocketType::String);
        assert_eq!(value, SocketValue::String("1.5".to_string()));
        assert!(notice.is_some());
    }

    #[test]
    fn test_matching_value_is_not_a_coercion() {
        let (value, notice) = SocketValue::Float(2.0).coerce_to(&SocketType::Value);
        assert_eq!(value, SocketValue::Float(2.0));
        assert!(notice.is_none());

        let (_, notice) = SocketValue::Bool(true).coerce_to(&SocketType::Shader);
        assert!(notice.is_none());
    }

    #[test]
    fn test_dedupe_names() {
        let mut templates = vec![
            SocketTemplate::new(0, "Value", SocketType::Value),
            SocketTemplate::new(1, "Value", SocketType::Value),
            SocketTemplate::new(2, "Fac", SocketType::Value),
            SocketTemplate::new(3, "Value", SocketType::Value),
        ];
        dedupe_names(&mut templates);
        let names: Vec<_> = templates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["value1", "value2", "fac", "value3"]);
        assert_eq!(templates[0].identifier, "Value");
    }

    #[test]
    fn test_dedupe_skips_existing_names() {
        let mut templates = vec![
            SocketTemplate::new(0, "Value", SocketType::Value),
            SocketTemplate::new(1, "Value", SocketType::Value),
            SocketTemplate::new(2, "Value1", SocketType::Value),
        ];
        dedupe_names(&mut templates);
        let names: Vec<_> = templates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["value2", "value3", "value1"]);
    }

    #[test]
    fn test_lookup_name() {
        assert_eq!(lookup_name("Base Color"), "base_color");
        assert_eq!(SocketType::from_host_name("Color"), SocketType::Rgba);
        assert!(SocketType::Rgba.is_vector());
        assert!(SocketType::Value.is_scalar());
    }
}
