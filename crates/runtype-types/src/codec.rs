//! # Descriptor Codec
//!
//! Rebuilds a descriptor graph from the document [`Type::to_json`] produces,
//! so descriptors can be persisted or exchanged as JSON or YAML.
//!
//! ## Recursion
//!
//! A `TypeReference` document carries only a name. While decoding the body
//! of a `TypeAlias`, that alias is in scope; references resolve to the
//! innermost enclosing alias of the same name, recreating the recursive
//! graph. A reference to a name that is not in scope is an error.
//!
//! ## Constraints
//!
//! Predicates are code, not data. Documents carry constraint names, which
//! are resolved through a [`ConstraintRegistry`].
//!
//! Custom descriptors and symbol-keyed properties have no document form
//! that can be decoded.

use serde_json::Value as Json;

use runtype_core::PropertyKey;

use crate::constraint::{Constraint, ConstraintRegistry};
use crate::error::DescriptorError;
use crate::types::{FunctionType, FunctionTypeParam, ObjectType, ObjectTypeProperty, Type, TypeAlias};

/// Decode a descriptor document.
///
/// # Errors
///
/// [`DescriptorError`] if the document names an unknown kind, lacks or
/// mistypes a field, references an alias that is not in scope, or names an
/// unregistered constraint.
pub fn type_from_json(document: &Json, registry: &ConstraintRegistry) -> Result<Type, DescriptorError> {
    Decoder {
        registry,
        scope: Vec::new(),
    }
    .decode(document)
}

/// Parse JSON text, then decode it.
///
/// # Errors
///
/// [`DescriptorError::Json`] for malformed text, otherwise as
/// [`type_from_json`].
pub fn type_from_json_str(text: &str, registry: &ConstraintRegistry) -> Result<Type, DescriptorError> {
    let document: Json = serde_json::from_str(text)?;
    type_from_json(&document, registry)
}

/// Parse YAML text, then decode it.
///
/// # Errors
///
/// [`DescriptorError::Yaml`] for malformed text, otherwise as
/// [`type_from_json`].
pub fn type_from_yaml_str(text: &str, registry: &ConstraintRegistry) -> Result<Type, DescriptorError> {
    let document: Json = serde_yaml::from_str(text)?;
    type_from_json(&document, registry)
}

struct Decoder<'r> {
    registry: &'r ConstraintRegistry,
    /// Enclosing aliases, outermost first, with their back-edge references.
    scope: Vec<(String, Type)>,
}

fn field<'d>(document: &'d Json, kind: &str, name: &'static str) -> Result<&'d Json, DescriptorError> {
    document.get(name).ok_or_else(|| DescriptorError::MissingField {
        kind: kind.to_string(),
        field: name,
    })
}

fn invalid(kind: &str, field: &'static str, reason: &str) -> DescriptorError {
    DescriptorError::InvalidField {
        kind: kind.to_string(),
        field,
        reason: reason.to_string(),
    }
}

fn string_field<'d>(document: &'d Json, kind: &str, name: &'static str) -> Result<&'d str, DescriptorError> {
    field(document, kind, name)?
        .as_str()
        .ok_or_else(|| invalid(kind, name, "expected a string"))
}

/// Absent means `false`.
fn flag(document: &Json, kind: &str, name: &'static str) -> Result<bool, DescriptorError> {
    match document.get(name) {
        None | Some(Json::Null) => Ok(false),
        Some(value) => value
            .as_bool()
            .ok_or_else(|| invalid(kind, name, "expected a boolean")),
    }
}

fn array_field<'d>(document: &'d Json, kind: &str, name: &'static str) -> Result<&'d Vec<Json>, DescriptorError> {
    field(document, kind, name)?
        .as_array()
        .ok_or_else(|| invalid(kind, name, "expected an array"))
}

impl Decoder<'_> {
    fn decode(&mut self, document: &Json) -> Result<Type, DescriptorError> {
        let kind = document
            .get("typeName")
            .and_then(Json::as_str)
            .ok_or_else(|| DescriptorError::MissingField {
                kind: "descriptor".to_string(),
                field: "typeName",
            })?;
        let ty = match kind {
            "AnyType" => Type::any(),
            "VoidType" => Type::void(),
            "NullLiteralType" => Type::null(),
            "BooleanType" => Type::boolean(),
            "NumberType" => Type::number(),
            "StringType" => Type::string(),
            "SymbolType" => Type::symbol(),
            "BooleanLiteralType" => {
                let value = field(document, kind, "value")?
                    .as_bool()
                    .ok_or_else(|| invalid(kind, "value", "expected a boolean"))?;
                Type::boolean_literal(value)
            }
            "NumberLiteralType" => {
                let value = match field(document, kind, "value")? {
                    Json::Number(n) => n.as_f64(),
                    Json::String(s) => match s.as_str() {
                        "Infinity" => Some(f64::INFINITY),
                        "-Infinity" => Some(f64::NEG_INFINITY),
                        "NaN" => Some(f64::NAN),
                        _ => None,
                    },
                    _ => None,
                }
                .ok_or_else(|| invalid(kind, "value", "expected a number, Infinity, -Infinity or NaN"))?;
                Type::number_literal(value)
            }
            "StringLiteralType" => Type::string_literal(string_field(document, kind, "value")?),
            "ArrayType" => Type::array(self.decode(field(document, kind, "elementType")?)?),
            "NullableType" => Type::nullable(self.decode(field(document, kind, "type")?)?),
            "IntersectionType" => Type::intersection(self.decode_all(array_field(document, kind, "types")?)?),
            "UnionType" => Type::union(self.decode_all(array_field(document, kind, "types")?)?),
            "ObjectType" => {
                let properties = array_field(document, kind, "properties")?
                    .iter()
                    .map(|p| self.decode_property(p))
                    .collect::<Result<Vec<_>, _>>()?;
                let object = ObjectType::new(properties);
                let object = if flag(document, kind, "exact")? {
                    object.exact()
                } else {
                    object
                };
                Type::Object(std::sync::Arc::new(object))
            }
            "ObjectTypeProperty" => Type::property(self.decode_property(document)?),
            "FunctionType" => Type::function(self.decode_function(document)?),
            "ConstrainedType" => {
                let name = string_field(document, kind, "name")?;
                let inner = self.decode(field(document, kind, "type")?)?;
                let constraints = self.constraints(document, kind)?;
                inner.constrain(name, constraints)
            }
            "TypeAlias" => self.decode_alias(document)?,
            "TypeReference" => {
                let name = string_field(document, kind, "name")?;
                self.scope
                    .iter()
                    .rev()
                    .find(|(alias, _)| alias == name)
                    .map(|(_, reference)| reference.clone())
                    .ok_or_else(|| DescriptorError::UnresolvedReference(name.to_string()))?
            }
            other => return Err(DescriptorError::UnknownTypeName(other.to_string())),
        };
        Ok(ty)
    }

    fn decode_all(&mut self, documents: &[Json]) -> Result<Vec<Type>, DescriptorError> {
        documents.iter().map(|d| self.decode(d)).collect()
    }

    fn decode_alias(&mut self, document: &Json) -> Result<Type, DescriptorError> {
        let kind = "TypeAlias";
        let name = string_field(document, kind, "name")?.to_string();
        let body = field(document, kind, "type")?;
        let alias = TypeAlias::try_recursive(name.clone(), |reference| {
            self.scope.push((name.clone(), reference));
            let inner = self.decode(body);
            self.scope.pop();
            inner
        })?;
        tracing::debug!(alias = %name, "decoded type alias");
        Ok(alias)
    }

    fn decode_property(&mut self, document: &Json) -> Result<ObjectTypeProperty, DescriptorError> {
        let kind = "ObjectTypeProperty";
        if flag(document, kind, "symbolKey")? {
            return Err(invalid(kind, "key", "symbol keys cannot be decoded"));
        }
        let key = match field(document, kind, "key")? {
            Json::String(s) => PropertyKey::from(s.as_str()),
            Json::Number(n) => n
                .as_u64()
                .and_then(|i| usize::try_from(i).ok())
                .map(PropertyKey::Index)
                .ok_or_else(|| invalid(kind, "key", "expected a non-negative integer"))?,
            _ => return Err(invalid(kind, "key", "expected a string or an index")),
        };
        let value = self.decode(field(document, kind, "value")?)?;
        let mut property = ObjectTypeProperty::new(key, value);
        if flag(document, kind, "optional")? {
            property = property.optional();
        }
        if flag(document, kind, "static")? {
            property = property.static_member();
        }
        let constraints = self.constraints(document, kind)?;
        Ok(property.with_constraints(constraints))
    }

    fn decode_param(&mut self, document: &Json) -> Result<FunctionTypeParam, DescriptorError> {
        let kind = "FunctionTypeParam";
        let name = string_field(document, kind, "name")?;
        let value = self.decode(field(document, kind, "type")?)?;
        let param = FunctionTypeParam::new(name, value);
        Ok(if flag(document, kind, "optional")? {
            param.optional()
        } else {
            param
        })
    }

    fn decode_function(&mut self, document: &Json) -> Result<FunctionType, DescriptorError> {
        let kind = "FunctionType";
        let params = array_field(document, kind, "params")?
            .iter()
            .map(|p| self.decode_param(p))
            .collect::<Result<Vec<_>, _>>()?;
        let returns = self.decode(field(document, kind, "returnType")?)?;
        let function = FunctionType::new(params, returns);
        Ok(match document.get("rest") {
            Some(rest) if !rest.is_null() => function.with_rest(self.decode_param(rest)?),
            _ => function,
        })
    }

    /// Constraint names resolved through the registry. Absent means none.
    fn constraints(&self, document: &Json, kind: &str) -> Result<Vec<Constraint>, DescriptorError> {
        let Some(names) = document.get("constraints") else {
            return Ok(Vec::new());
        };
        let names = names
            .as_array()
            .ok_or_else(|| invalid(kind, "constraints", "expected an array of names"))?;
        names
            .iter()
            .map(|name| {
                let name = name
                    .as_str()
                    .ok_or_else(|| invalid(kind, "constraints", "expected an array of names"))?;
                self.registry
                    .get(name)
                    .cloned()
                    .ok_or_else(|| DescriptorError::UnknownConstraint(name.to_string()))
            })
            .collect()
    }
}
