//! CQL data types and a nom parser for their textual form.
//!
//! ```text
//! map<text, frozen<list<int>>>
//! ─┬─ ─┬──  ──┬───────────────
//!  │   │      └── value type (frozen collection)
//!  │   └── key type
//!  └── collection kind
//! ```

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    multi::separated_list1,
    sequence::{delimited, preceded, separated_pair, terminated, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::error::{CqlError, CqlResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CqlType {
    Ascii,
    BigInt,
    Blob,
    Boolean,
    Counter,
    Date,
    Decimal,
    Double,
    Duration,
    Float,
    Inet,
    Int,
    SmallInt,
    Text,
    Time,
    Timestamp,
    TimeUuid,
    TinyInt,
    Uuid,
    Varchar,
    VarInt,
    List(Box<CqlType>),
    Set(Box<CqlType>),
    Map(Box<CqlType>, Box<CqlType>),
    Tuple(Vec<CqlType>),
    Frozen(Box<CqlType>),
    /// User-defined type referenced by name.
    Udt(String),
}

impl CqlType {
    pub fn list(element: CqlType) -> Self {
        CqlType::List(Box::new(element))
    }

    pub fn set(element: CqlType) -> Self {
        CqlType::Set(Box::new(element))
    }

    pub fn map(key: CqlType, value: CqlType) -> Self {
        CqlType::Map(Box::new(key), Box::new(value))
    }

    pub fn frozen(self) -> Self {
        match self {
            frozen @ CqlType::Frozen(_) => frozen,
            other => CqlType::Frozen(Box::new(other)),
        }
    }

    /// The type behind any `frozen<>` wrapper.
    pub fn unfrozen(&self) -> &CqlType {
        match self {
            CqlType::Frozen(inner) => inner.unfrozen(),
            other => other,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(
            self.unfrozen(),
            CqlType::List(_) | CqlType::Set(_) | CqlType::Map(_, _)
        )
    }

    pub fn is_list(&self) -> bool {
        matches!(self.unfrozen(), CqlType::List(_))
    }

    /// Types a counter column may be declared with.
    pub fn is_counter_compatible(&self) -> bool {
        matches!(self, CqlType::BigInt | CqlType::Counter)
    }

    /// Freeze the map key or the set/list element.
    pub fn with_frozen_key(self) -> Self {
        match self {
            CqlType::Map(k, v) => CqlType::Map(Box::new(k.frozen()), v),
            CqlType::Set(e) => CqlType::Set(Box::new(e.frozen())),
            CqlType::List(e) => CqlType::List(Box::new(e.frozen())),
            other => other,
        }
    }

    /// Freeze the map value or the list element.
    pub fn with_frozen_value(self) -> Self {
        match self {
            CqlType::Map(k, v) => CqlType::Map(k, Box::new(v.frozen())),
            CqlType::List(e) => CqlType::List(Box::new(e.frozen())),
            other => other,
        }
    }
}

impl std::fmt::Display for CqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CqlType::Ascii => write!(f, "ascii"),
            CqlType::BigInt => write!(f, "bigint"),
            CqlType::Blob => write!(f, "blob"),
            CqlType::Boolean => write!(f, "boolean"),
            CqlType::Counter => write!(f, "counter"),
            CqlType::Date => write!(f, "date"),
            CqlType::Decimal => write!(f, "decimal"),
            CqlType::Double => write!(f, "double"),
            CqlType::Duration => write!(f, "duration"),
            CqlType::Float => write!(f, "float"),
            CqlType::Inet => write!(f, "inet"),
            CqlType::Int => write!(f, "int"),
            CqlType::SmallInt => write!(f, "smallint"),
            CqlType::Text => write!(f, "text"),
            CqlType::Time => write!(f, "time"),
            CqlType::Timestamp => write!(f, "timestamp"),
            CqlType::TimeUuid => write!(f, "timeuuid"),
            CqlType::TinyInt => write!(f, "tinyint"),
            CqlType::Uuid => write!(f, "uuid"),
            CqlType::Varchar => write!(f, "varchar"),
            CqlType::VarInt => write!(f, "varint"),
            CqlType::List(e) => write!(f, "list<{}>", e),
            CqlType::Set(e) => write!(f, "set<{}>", e),
            CqlType::Map(k, v) => write!(f, "map<{}, {}>", k, v),
            CqlType::Tuple(items) => {
                write!(f, "tuple<")?;
                for (i, t) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", t)?;
                }
                write!(f, ">")
            }
            CqlType::Frozen(inner) => write!(f, "frozen<{}>", inner),
            CqlType::Udt(name) => write!(f, "{}", name),
        }
    }
}

impl std::str::FromStr for CqlType {
    type Err = CqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cql_type(s)
    }
}

impl TryFrom<String> for CqlType {
    type Error = CqlError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        parse_cql_type(&s)
    }
}

impl From<CqlType> for String {
    fn from(t: CqlType) -> Self {
        t.to_string()
    }
}

/// Parse a complete CQL type string.
pub fn parse_cql_type(input: &str) -> CqlResult<CqlType> {
    let input = input.trim();

    match terminated(cql_type, multispace0)(input) {
        Ok(("", t)) => Ok(t),
        Ok((remaining, _)) => Err(CqlError::parse(
            input.len() - remaining.len(),
            format!("Unexpected trailing content: '{}'", remaining),
        )),
        Err(e) => Err(CqlError::parse(0, format!("Parse failed: {:?}", e))),
    }
}

/// Parse one type, possibly parameterised.
fn cql_type(input: &str) -> IResult<&str, CqlType> {
    let (input, _) = multispace0(input)?;
    let (input, name) = parse_identifier(input)?;
    let (input, _) = multispace0(input)?;

    match name.to_ascii_lowercase().as_str() {
        "list" => {
            let (input, e) = one_param(input)?;
            Ok((input, CqlType::list(e)))
        }
        "set" => {
            let (input, e) = one_param(input)?;
            Ok((input, CqlType::set(e)))
        }
        "frozen" => {
            let (input, e) = one_param(input)?;
            Ok((input, e.frozen()))
        }
        "map" => {
            let (input, (k, v)) = two_params(input)?;
            Ok((input, CqlType::map(k, v)))
        }
        "tuple" => {
            let (input, items) = many_params(input)?;
            Ok((input, CqlType::Tuple(items)))
        }
        scalar => {
            let ty = scalar_type(scalar).unwrap_or_else(|| CqlType::Udt(name.to_string()));
            Ok((input, ty))
        }
    }
}

fn scalar_type(name: &str) -> Option<CqlType> {
    Some(match name {
        "ascii" => CqlType::Ascii,
        "bigint" => CqlType::BigInt,
        "blob" => CqlType::Blob,
        "boolean" => CqlType::Boolean,
        "counter" => CqlType::Counter,
        "date" => CqlType::Date,
        "decimal" => CqlType::Decimal,
        "double" => CqlType::Double,
        "duration" => CqlType::Duration,
        "float" => CqlType::Float,
        "inet" => CqlType::Inet,
        "int" => CqlType::Int,
        "smallint" => CqlType::SmallInt,
        "text" => CqlType::Text,
        "time" => CqlType::Time,
        "timestamp" => CqlType::Timestamp,
        "timeuuid" => CqlType::TimeUuid,
        "tinyint" => CqlType::TinyInt,
        "uuid" => CqlType::Uuid,
        "varchar" => CqlType::Varchar,
        "varint" => CqlType::VarInt,
        _ => return None,
    })
}

/// Parse a type name or a (keyspace-qualified) UDT name.
fn parse_identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '.')(input)
}

fn comma(input: &str) -> IResult<&str, char> {
    delimited(multispace0, char(','), multispace0)(input)
}

fn close(input: &str) -> IResult<&str, char> {
    preceded(multispace0, char('>'))(input)
}

fn one_param(input: &str) -> IResult<&str, CqlType> {
    delimited(char('<'), cql_type, close)(input)
}

fn two_params(input: &str) -> IResult<&str, (CqlType, CqlType)> {
    delimited(char('<'), separated_pair(cql_type, comma, cql_type), close)(input)
}

fn many_params(input: &str) -> IResult<&str, Vec<CqlType>> {
    let (input, (_, items, _)) =
        tuple((char('<'), separated_list1(comma, cql_type), close))(input)?;
    Ok((input, items))
}
