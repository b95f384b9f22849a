// Shape Descriptors & Service Definitions

use std::fmt;

/// Static description of a JSON value's structure.
///
/// Shapes drive the codec: the wire form never decides how a value is
/// interpreted. `Int64`/`Uint64` mark WireInteger fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Any JSON value, carried through untouched
    Any,
    Bool,
    String,
    /// Ordinary JSON number (not a WireInteger)
    Number,
    /// Signed 64-bit WireInteger
    Int64,
    /// Unsigned 64-bit WireInteger
    Uint64,
    /// String restricted to a fixed set of variants
    Enum(&'static [&'static str]),
    Array(&'static Shape),
    /// Object with string keys and uniformly shaped values
    Map(&'static Shape),
    /// Struct with named fields
    Object(&'static [Field]),
}

/// A named field of an object shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
    pub optional: bool,
}

impl Field {
    pub const fn required(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            optional: false,
        }
    }

    pub const fn optional(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            optional: true,
        }
    }
}

/// Shape of an argument-less call or an empty return value.
pub const EMPTY: Shape = Shape::Object(&[]);

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Any => write!(f, "any"),
            Shape::Bool => write!(f, "bool"),
            Shape::String => write!(f, "string"),
            Shape::Number => write!(f, "number"),
            Shape::Int64 => write!(f, "int64"),
            Shape::Uint64 => write!(f, "uint64"),
            Shape::Enum(_) => write!(f, "enum"),
            Shape::Array(inner) => write!(f, "[]{}", inner),
            Shape::Map(inner) => write!(f, "map<string,{}>", inner),
            Shape::Object(_) => write!(f, "object"),
        }
    }
}

/// One method of a service: name plus argument and return shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodDef {
    pub name: &'static str,
    pub args: Shape,
    pub returns: Shape,
}

/// Build-time description of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceDefinition {
    pub name: &'static str,
    pub schema_name: &'static str,
    pub schema_version: &'static str,
    pub methods: &'static [MethodDef],
}

impl ServiceDefinition {
    pub fn method(&self, name: &str) -> Option<&'static MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Value of the protocol header identifying this schema.
    ///
    /// Format: `webrpc@<core version>;<schema>@<schema version>`
    pub fn header_value(&self) -> String {
        format!(
            "webrpc@v{};{}@{}",
            crate::VERSION,
            self.schema_name,
            self.schema_version
        )
    }
}

/// Parsed form of the protocol header value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaHeader {
    pub webrpc_version: String,
    pub schema_name: String,
    pub schema_version: String,
}

impl SchemaHeader {
    /// Parse `webrpc@<v>;<schema>@<v>`. Extra `;`-separated entries
    /// (generator tags) are ignored; the schema is the last entry.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.split(';').map(str::trim);
        let (proto, webrpc_version) = parts.next()?.split_once('@')?;
        if proto != "webrpc" {
            return None;
        }
        let (schema_name, schema_version) = parts.last()?.split_once('@')?;
        Some(Self {
            webrpc_version: webrpc_version.to_string(),
            schema_name: schema_name.to_string(),
            schema_version: schema_version.to_string(),
        })
    }
}
