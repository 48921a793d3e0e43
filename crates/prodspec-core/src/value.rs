use derive_more::Display;
use prodspec_schema::types::Primitive;

///
/// Value
///
/// Scalar attribute value. Every primitive has a default (`false`, `0`, empty
/// text); an attribute holding its default is considered unset.
///

#[derive(Clone, Debug, Display, Eq, Hash, PartialEq)]
pub enum Value {
    #[display("{_0}")]
    Bool(bool),

    #[display("{_0}")]
    Int(i64),

    #[display("{_0}")]
    Text(String),
}

impl Value {
    /// Default value of a primitive.
    #[must_use]
    pub const fn default_for(primitive: Primitive) -> Self {
        match primitive {
            Primitive::Bool => Self::Bool(false),
            Primitive::Int => Self::Int(0),
            Primitive::Text => Self::Text(String::new()),
        }
    }

    #[must_use]
    pub const fn primitive(&self) -> Primitive {
        match self {
            Self::Bool(_) => Primitive::Bool,
            Self::Int(_) => Primitive::Int,
            Self::Text(_) => Primitive::Text,
        }
    }

    #[must_use]
    pub const fn is_default(&self) -> bool {
        match self {
            Self::Bool(b) => !*b,
            Self::Int(i) => *i == 0,
            Self::Text(s) => s.is_empty(),
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i.into())
    }
}

impl From<u16> for Value {
    fn from(i: u16) -> Self {
        Self::Int(i.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_detected_per_primitive() {
        for primitive in [Primitive::Bool, Primitive::Int, Primitive::Text] {
            let value = Value::default_for(primitive);
            assert!(value.is_default());
            assert_eq!(value.primitive(), primitive);
        }

        assert!(!Value::from(true).is_default());
        assert!(!Value::from(1400_i64).is_default());
        assert!(!Value::from("x").is_default());
    }

    #[test]
    fn display_shows_the_bare_value() {
        assert_eq!(Value::from(1472_i64).to_string(), "1472");
        assert_eq!(Value::from("br1").to_string(), "br1");
        assert_eq!(Value::from(true).to_string(), "true");
    }
}
