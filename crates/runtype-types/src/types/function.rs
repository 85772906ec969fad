//! # Function Descriptors
//!
//! `(a: A, b?: B, ...rest: R) => T`. A function value is accepted when it
//! is callable and does not declare more parameters than the descriptor
//! allows (`ERR_EXPECT_ARITY`); a rest parameter lifts the bound.
//!
//! Arguments and return values cannot be checked by inspecting the
//! function itself. [`FunctionType::validate_arguments`] and
//! [`FunctionType::validate_return`] check them at call sites; return-value
//! errors are located under the reserved return slot of the path.

use std::fmt;
use std::sync::Arc;

use runtype_core::{IdentifierPath, PathSegment, Value};

use crate::compare::{compare_types, TypeRelation};
use crate::messages::ErrorCode;
use crate::types::Type;
use crate::validation::{no_errors, one_error, ErrorIter, Validation};

#[derive(Debug, Clone)]
pub struct FunctionTypeParam {
    name: String,
    value: Type,
    optional: bool,
}

impl FunctionTypeParam {
    pub fn new(name: impl Into<String>, value: Type) -> Self {
        Self {
            name: name.into(),
            value,
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Type {
        &self.value
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    fn accepts_argument(&self, ctx: &Validation, argument: &Value) -> bool {
        (self.optional && argument.is_undefined()) || self.value.accepts_with(ctx, argument)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "type": self.value.to_json(),
            "optional": self.optional,
        })
    }
}

impl fmt::Display for FunctionTypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.optional { "?" } else { "" };
        write!(f, "{}{marker}: {}", self.name, self.value)
    }
}

#[derive(Debug, Clone)]
pub struct FunctionType {
    params: Vec<FunctionTypeParam>,
    rest: Option<FunctionTypeParam>,
    returns: Type,
}

impl FunctionType {
    pub fn new(params: impl IntoIterator<Item = FunctionTypeParam>, returns: Type) -> Self {
        Self {
            params: params.into_iter().collect(),
            rest: None,
            returns,
        }
    }

    /// Accept any number of trailing arguments of `param`'s type.
    pub fn with_rest(mut self, param: FunctionTypeParam) -> Self {
        self.rest = Some(param);
        self
    }

    pub fn params(&self) -> &[FunctionTypeParam] {
        &self.params
    }

    pub fn rest(&self) -> Option<&FunctionTypeParam> {
        self.rest.as_ref()
    }

    pub fn returns(&self) -> &Type {
        &self.returns
    }

    pub fn errors<'a>(self: &Arc<Self>, ctx: &'a Validation, path: IdentifierPath, input: Value) -> ErrorIter<'a> {
        let this = Type::Function(Arc::clone(self));
        let Value::Function(function) = &input else {
            return one_error(ctx.error(path, &this, ErrorCode::ExpectFunction, &[]));
        };
        if self.rest.is_none() && function.arity() > self.params.len() {
            let bound = self.params.len().to_string();
            return one_error(ctx.error(path, &this, ErrorCode::ExpectArity, &[&bound]));
        }
        no_errors()
    }

    pub fn accepts(&self, input: &Value) -> bool {
        match input {
            Value::Function(function) => self.rest.is_some() || function.arity() <= self.params.len(),
            _ => false,
        }
    }

    /// Validate call arguments. Errors are located at the argument index.
    pub fn validate_arguments(&self, arguments: &[Value]) -> Validation {
        let mut ctx = Validation::new(Value::array(arguments.iter().cloned()));
        let mut errors = Vec::new();
        for (i, argument) in arguments.iter().enumerate() {
            let Some(param) = self.params.get(i).or(self.rest.as_ref()) else {
                break;
            };
            if param.optional && argument.is_undefined() {
                continue;
            }
            errors.extend(param.value.errors(&ctx, vec![PathSegment::from(i)], argument.clone()));
        }
        for (i, param) in self.params.iter().enumerate().skip(arguments.len()) {
            if !param.accepts_argument(&ctx, &Value::Undefined) {
                errors.extend(param.value.errors(&ctx, vec![PathSegment::from(i)], Value::Undefined));
            }
        }
        ctx.errors = errors;
        ctx
    }

    /// Validate a return value at the path `[ReturnType]`.
    pub fn validate_return(&self, output: Value) -> Validation {
        let mut ctx = Validation::new(output.clone());
        let errors: Vec<_> = self
            .returns
            .errors(&ctx, vec![PathSegment::ReturnType], output)
            .collect();
        ctx.errors = errors;
        ctx
    }

    /// Return type covariant, parameters compared position by position.
    pub fn compare_with(&self, other: &Type) -> TypeRelation {
        let Type::Function(other) = other else {
            return TypeRelation::Incompatible;
        };
        // Runtime acceptance is decided by arity alone.
        if self.rest.is_none() && (other.rest.is_some() || other.params.len() > self.params.len()) {
            return TypeRelation::Incompatible;
        }
        let mut is_greater = self.rest.is_some() && other.rest.is_none();
        match compare_types(&self.returns, &other.returns) {
            TypeRelation::Incompatible => return TypeRelation::Incompatible,
            TypeRelation::Subsumes => is_greater = true,
            TypeRelation::Equivalent => {}
        }
        for (i, param) in self.params.iter().enumerate() {
            let Some(other_param) = other.params.get(i).or(other.rest.as_ref()) else {
                return TypeRelation::Incompatible;
            };
            match compare_types(&param.value, &other_param.value) {
                TypeRelation::Incompatible => return TypeRelation::Incompatible,
                TypeRelation::Subsumes => is_greater = true,
                TypeRelation::Equivalent => {}
            }
        }
        if is_greater {
            TypeRelation::Subsumes
        } else {
            TypeRelation::Equivalent
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let params: Vec<_> = self.params.iter().map(FunctionTypeParam::to_json).collect();
        let mut json = serde_json::json!({
            "typeName": "FunctionType",
            "params": params,
            "returnType": self.returns.to_json(),
        });
        if let Some(rest) = &self.rest {
            json["rest"] = rest.to_json();
        }
        json
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        if let Some(rest) = &self.rest {
            if !self.params.is_empty() {
                f.write_str(", ")?;
            }
            write!(f, "...{rest}")?;
        }
        write!(f, ") => {}", self.returns)
    }
}
