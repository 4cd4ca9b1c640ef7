//! Constant RDF term values carried by `Expr::Constant`.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

/// XML Schema datatype IRIs.
pub mod xsd {
    pub const NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
    pub const SHORT: &str = "http://www.w3.org/2001/XMLSchema#short";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
}

/// Datatype of language-tagged strings.
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// A fully evaluated term.
///
/// `TypeError` is the type-error sentinel: a value, not a failure. It compares
/// equal only to itself and propagates through enclosing function calls.
///
/// Equality is structural: doubles compare by bit pattern, so `NaN` equals
/// itself. Value equality with numeric promotion goes through [`Numeric`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeValue {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    /// Plain string, i.e. xsd:string
    String(String),
    LangString {
        value: String,
        lang: String,
    },
    /// Literal of any other datatype, including ill-typed lexical forms
    Typed {
        lexical: String,
        datatype: String,
    },
    Iri(String),
    TypeError,
}

/// Numeric view of a literal, used for comparison and arithmetic.
#[derive(Debug, Clone, Copy)]
pub enum Numeric {
    Integer(i64),
    Double(f64),
}

impl Numeric {
    pub fn as_f64(self) -> f64 {
        match self {
            Numeric::Integer(n) => n as f64,
            Numeric::Double(d) => d,
        }
    }
}

impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Numeric::Integer(a), Numeric::Integer(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl PartialOrd for Numeric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Numeric::Integer(a), Numeric::Integer(b)) => a.partial_cmp(b),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl NodeValue {
    pub fn string(value: impl Into<String>) -> Self {
        NodeValue::String(value.into())
    }

    pub fn lang_string(value: impl Into<String>, lang: impl Into<String>) -> Self {
        NodeValue::LangString {
            value: value.into(),
            lang: lang.into(),
        }
    }

    pub fn iri(value: impl Into<String>) -> Self {
        NodeValue::Iri(value.into())
    }

    /// Build a typed literal without canonicalisation.
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        NodeValue::Typed {
            lexical: lexical.into(),
            datatype: datatype.into(),
        }
    }

    /// Build a literal from its lexical form and datatype IRI.
    ///
    /// xsd:string, xsd:boolean, xsd:integer and xsd:double map onto their
    /// dedicated variants when the lexical form is valid. Everything else,
    /// ill-typed forms included, becomes `NodeValue::Typed`.
    pub fn from_lexical(lexical: &str, datatype: &str) -> Self {
        match datatype {
            xsd::STRING => NodeValue::String(lexical.to_string()),
            xsd::BOOLEAN => match lexical.trim() {
                "true" | "1" => NodeValue::Boolean(true),
                "false" | "0" => NodeValue::Boolean(false),
                _ => NodeValue::typed(lexical, datatype),
            },
            xsd::INTEGER => match lexical.trim().parse::<i64>() {
                Ok(n) => NodeValue::Integer(n),
                Err(_) => NodeValue::typed(lexical, datatype),
            },
            xsd::DOUBLE => match parse_double(lexical) {
                Some(d) => NodeValue::Double(d),
                None => NodeValue::typed(lexical, datatype),
            },
            _ => NodeValue::typed(lexical, datatype),
        }
    }

    pub fn is_type_error(&self) -> bool {
        matches!(self, NodeValue::TypeError)
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, NodeValue::Iri(_))
    }

    pub fn is_literal(&self) -> bool {
        !matches!(self, NodeValue::Iri(_) | NodeValue::TypeError)
    }

    /// The lexical form of a literal, or the IRI text of an IRI.
    ///
    /// The type-error sentinel has an empty lexical form.
    pub fn lexical_form(&self) -> Cow<'_, str> {
        match self {
            NodeValue::Boolean(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            NodeValue::Integer(n) => Cow::Owned(n.to_string()),
            NodeValue::Double(d) => Cow::Owned(format_double(*d)),
            NodeValue::String(s) => Cow::Borrowed(s),
            NodeValue::LangString { value, .. } => Cow::Borrowed(value),
            NodeValue::Typed { lexical, .. } => Cow::Borrowed(lexical),
            NodeValue::Iri(iri) => Cow::Borrowed(iri),
            NodeValue::TypeError => Cow::Borrowed(""),
        }
    }

    /// Datatype IRI of a literal; `None` for IRIs and the sentinel.
    pub fn datatype(&self) -> Option<&str> {
        match self {
            NodeValue::Boolean(_) => Some(xsd::BOOLEAN),
            NodeValue::Integer(_) => Some(xsd::INTEGER),
            NodeValue::Double(_) => Some(xsd::DOUBLE),
            NodeValue::String(_) => Some(xsd::STRING),
            NodeValue::LangString { .. } => Some(RDF_LANG_STRING),
            NodeValue::Typed { datatype, .. } => Some(datatype),
            NodeValue::Iri(_) | NodeValue::TypeError => None,
        }
    }

    /// Language tag of a literal; empty for untagged literals.
    pub fn lang(&self) -> Option<&str> {
        match self {
            NodeValue::LangString { lang, .. } => Some(lang),
            NodeValue::Iri(_) | NodeValue::TypeError => None,
            _ => Some(""),
        }
    }

    /// Numeric value of numeric literals, including numeric `Typed` literals
    /// such as xsd:int or xsd:decimal.
    pub fn numeric(&self) -> Option<Numeric> {
        match self {
            NodeValue::Integer(n) => Some(Numeric::Integer(*n)),
            NodeValue::Double(d) => Some(Numeric::Double(*d)),
            NodeValue::Typed { lexical, datatype } => match datatype.as_str() {
                xsd::INT | xsd::LONG | xsd::SHORT | xsd::INTEGER => {
                    lexical.trim().parse().ok().map(Numeric::Integer)
                }
                xsd::DECIMAL | xsd::FLOAT | xsd::DOUBLE => {
                    parse_double(lexical).map(Numeric::Double)
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// String value of xsd:string and language-tagged literals.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NodeValue::String(s) => Some(s),
            NodeValue::LangString { value, .. } => Some(value),
            _ => None,
        }
    }
}

impl PartialEq for NodeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NodeValue::Boolean(a), NodeValue::Boolean(b)) => a == b,
            (NodeValue::Integer(a), NodeValue::Integer(b)) => a == b,
            (NodeValue::Double(a), NodeValue::Double(b)) => a.to_bits() == b.to_bits(),
            (NodeValue::String(a), NodeValue::String(b)) => a == b,
            (
                NodeValue::LangString { value: a, lang: la },
                NodeValue::LangString { value: b, lang: lb },
            ) => a == b && la == lb,
            (
                NodeValue::Typed {
                    lexical: a,
                    datatype: da,
                },
                NodeValue::Typed {
                    lexical: b,
                    datatype: db,
                },
            ) => a == b && da == db,
            (NodeValue::Iri(a), NodeValue::Iri(b)) => a == b,
            (NodeValue::TypeError, NodeValue::TypeError) => true,
            _ => false,
        }
    }
}

impl From<Numeric> for NodeValue {
    fn from(value: Numeric) -> Self {
        match value {
            Numeric::Integer(n) => NodeValue::Integer(n),
            Numeric::Double(d) => NodeValue::Double(d),
        }
    }
}

impl fmt::Display for NodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeValue::Boolean(b) => write!(f, "{}", b),
            NodeValue::Integer(n) => write!(f, "{}", n),
            NodeValue::Double(d) => write!(f, "\"{}\"^^<{}>", format_double(*d), xsd::DOUBLE),
            NodeValue::String(s) => write!(f, "\"{}\"", escape(s)),
            NodeValue::LangString { value, lang } => write!(f, "\"{}\"@{}", escape(value), lang),
            NodeValue::Typed { lexical, datatype } => {
                write!(f, "\"{}\"^^<{}>", escape(lexical), datatype)
            }
            NodeValue::Iri(iri) => write!(f, "<{}>", iri),
            NodeValue::TypeError => write!(f, "typeError()"),
        }
    }
}

fn parse_double(lexical: &str) -> Option<f64> {
    match lexical.trim() {
        "INF" | "+INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        other => other.parse().ok(),
    }
}

fn format_double(d: f64) -> String {
    if d.is_nan() {
        "NaN".to_string()
    } else if d.is_infinite() {
        let text = if d > 0.0 { "INF" } else { "-INF" };
        text.to_string()
    } else if d.fract() == 0.0 && d.abs() < 1e15 {
        format!("{:.1}", d)
    } else {
        d.to_string()
    }
}

fn escape(s: &str) -> Cow<'_, str> {
    if s.contains(|c| matches!(c, '"' | '\\' | '\n' | '\r')) {
        Cow::Owned(
            s.replace('\\', "\\\\")
                .replace('"', "\\\"")
                .replace('\n', "\\n")
                .replace('\r', "\\r"),
        )
    } else {
        Cow::Borrowed(s)
    }
}
