#![deny(missing_docs)]

//! # OpenAPI Models
//!
//! Intermediate Representation (IR) structures for parsed OpenAPI parameters
//! and their schemas.
//!
//! These structs are produced once from the YAML contract and are read-only
//! for the duration of every validation pass.

use crate::validation::structural::Compiled;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// The source location of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    /// Path.
    Path,
    /// Query.
    Query,
    /// Header.
    Header,
    /// Cookie.
    Cookie,
}

impl ParamLocation {
    /// Parses the `in` field of a Parameter Object.
    ///
    /// Returns `None` for locations this crate does not model (e.g. the
    /// OAS 3.2 `querystring`).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            "cookie" => Some(Self::Cookie),
            _ => None,
        }
    }

    /// The lowercase name used in the contract.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
        }
    }

    /// Human label used as a prefix in violation messages (e.g. "Cookie").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Path => "Path",
            Self::Query => "Query",
            Self::Header => "Header",
            Self::Cookie => "Cookie",
        }
    }
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter serialization style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamStyle {
    /// `matrix`
    Matrix,
    /// `label`
    Label,
    /// `form`
    Form,
    /// `cookie` (OAS 3.2)
    Cookie,
    /// `simple`
    #[default]
    Simple,
    /// `spaceDelimited`
    SpaceDelimited,
    /// `pipeDelimited`
    PipeDelimited,
    /// `deepObject`
    DeepObject,
}

/// A parameter declared by an operation (or its path item).
///
/// Identity is the `(name, location)` pair; names are case-sensitive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    /// Parameter name in the source.
    pub name: String,
    /// Location.
    #[serde(rename = "in")]
    pub location: ParamLocation,
    /// Declared schema. `None` when the parameter uses `content` or omits a schema.
    pub schema: Option<SchemaDescriptor>,
    /// Serialization style (defaults resolved per location).
    pub style: ParamStyle,
    /// Explode modifier (defaults resolved per style).
    pub explode: bool,
    /// Whether the parameter is required.
    pub required: bool,
    /// Whether the parameter is deprecated.
    pub deprecated: bool,
}

impl Parameter {
    /// Creates a parameter with the location's default style and explode.
    pub fn new(name: impl Into<String>, location: ParamLocation) -> Self {
        let style = default_style(location);
        Self {
            name: name.into(),
            location,
            schema: None,
            style,
            explode: default_explode(style),
            required: location == ParamLocation::Path,
            deprecated: false,
        }
    }

    /// Attaches a schema.
    pub fn with_schema(mut self, schema: SchemaDescriptor) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Overrides the explode modifier.
    pub fn with_explode(mut self, explode: bool) -> Self {
        self.explode = explode;
        self
    }

    /// Whether collection values arrive as repeated instances rather than
    /// one delimited string.
    pub fn is_exploded(&self) -> bool {
        self.explode
    }
}

/// Default serialization style for a location (OAS 3.x).
pub fn default_style(location: ParamLocation) -> ParamStyle {
    match location {
        ParamLocation::Query | ParamLocation::Cookie => ParamStyle::Form,
        ParamLocation::Path | ParamLocation::Header => ParamStyle::Simple,
    }
}

/// Default explode value for a style: only `form` and `cookie` explode.
pub fn default_explode(style: ParamStyle) -> bool {
    matches!(style, ParamStyle::Form | ParamStyle::Cookie)
}

/// A primitive or structural kind asserted by a schema's `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `object`
    Object,
    /// `array`
    Array,
    /// `string`
    String,
    /// `null`
    Null,
}

impl TypeTag {
    /// Parses a JSON Schema type name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            "string" => Some(Self::String),
            "null" => Some(Self::Null),
            _ => None,
        }
    }

    /// The JSON Schema type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `items` keyword of an array schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Items {
    /// A nested schema each element must satisfy.
    Schema(Box<SchemaDescriptor>),
    /// A boolean schema (`items: true` / `items: false`).
    Bool(bool),
}

impl Items {
    /// Returns the nested schema when `items` is not a boolean schema.
    pub fn as_schema(&self) -> Option<&SchemaDescriptor> {
        match self {
            Items::Schema(schema) => Some(schema),
            Items::Bool(_) => None,
        }
    }
}

/// The validation-relevant view of one parameter schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDescriptor {
    /// Declared types, in declaration order.
    pub types: Vec<TypeTag>,
    /// Allowed values, rendered as strings.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Nested item schema for arrays.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,
    /// The schema with local `$ref`s inlined, as handed to structural validation.
    #[serde(skip)]
    pub raw: Value,
    /// Compiled form of `raw`, present on object-typed schemas once the
    /// document has been indexed.
    #[serde(skip)]
    pub compiled: Option<Compiled>,
}

impl SchemaDescriptor {
    /// Creates a descriptor declaring the given types and nothing else.
    pub fn of_types(types: impl IntoIterator<Item = TypeTag>) -> Self {
        let types: Vec<TypeTag> = types.into_iter().collect();
        let raw = match types.as_slice() {
            [single] => serde_json::json!({ "type": single.as_str() }),
            many => serde_json::json!({
                "type": many.iter().map(TypeTag::as_str).collect::<Vec<_>>()
            }),
        };
        Self {
            types,
            enum_values: None,
            items: None,
            raw,
            compiled: None,
        }
    }

    /// Adds an enum constraint.
    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if let Value::Object(obj) = &mut self.raw {
            obj.insert("enum".into(), serde_json::json!(values));
        }
        self.enum_values = Some(values);
        self
    }

    /// Adds an item schema.
    pub fn with_items(mut self, items: SchemaDescriptor) -> Self {
        if let Value::Object(obj) = &mut self.raw {
            obj.insert("items".into(), items.raw.clone());
        }
        self.items = Some(Items::Schema(Box::new(items)));
        self
    }

    /// Whether the schema declares the given type.
    pub fn declares(&self, tag: TypeTag) -> bool {
        self.types.contains(&tag)
    }

    /// The item schema, when `items` is present and not a boolean schema.
    pub fn item_schema(&self) -> Option<&SchemaDescriptor> {
        self.items.as_ref().and_then(Items::as_schema)
    }
}
