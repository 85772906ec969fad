//! # Runtime Values
//!
//! The untyped data that descriptors validate. `Value` is a small dynamic
//! value model with JavaScript-like shape:
//!
//! - primitives (`Undefined`, `Null`, `Bool`, `Number`, `String`, `Symbol`)
//!   compare by value;
//! - reference variants (`Object`, `Array`, `Map`, `Function`) are shared
//!   handles that compare by identity and may form cycles.
//!
//! ## Absent vs. Undefined
//!
//! [`Value::get`] returns `Undefined` for a missing key, exactly like a
//! property read. [`Value::has`] answers whether the key exists at all, so
//! "truly absent" and "present but undefined" stay distinguishable.
//!
//! ## Static Members
//!
//! An object may carry a constructor ([`FunctionRef`]). Properties declared
//! on the constructor are the object's *static* members. Reading the key
//! `constructor` on an object without an own property of that name yields
//! the constructor handle.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::identity::{Symbol, ValueId};
use crate::path::PropertyKey;

/// A dynamic runtime value.
#[derive(Clone)]
pub enum Value {
    /// The absent value.
    Undefined,
    /// The null value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A double-precision number.
    Number(f64),
    /// An immutable string.
    String(Rc<str>),
    /// A symbol-like identifier.
    Symbol(Symbol),
    /// A plain object or class instance.
    Object(ObjectRef),
    /// An array.
    Array(ArrayRef),
    /// An associative structure keyed by arbitrary values.
    Map(MapRef),
    /// A callable, possibly carrying static properties.
    Function(FunctionRef),
}

// ─── Property storage ────────────────────────────────────────────────

/// Insertion-ordered property table shared by objects and functions.
#[derive(Default)]
struct PropertyTable {
    entries: Vec<(PropertyKey, Value)>,
}

impl PropertyTable {
    fn get(&self, key: &PropertyKey) -> Option<Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    fn contains(&self, key: &PropertyKey) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    fn set(&mut self, key: PropertyKey, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    fn keys(&self) -> Vec<PropertyKey> {
        self.entries.iter().map(|(k, _)| k.clone()).collect()
    }

    fn entries(&self) -> Vec<(PropertyKey, Value)> {
        self.entries.clone()
    }
}

// ─── Object ──────────────────────────────────────────────────────────

struct ObjectData {
    properties: PropertyTable,
    constructor: Option<FunctionRef>,
}

/// Shared handle to an object.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<ObjectData>>);

impl ObjectRef {
    /// Create an empty plain object (no constructor).
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(ObjectData {
            properties: PropertyTable::default(),
            constructor: None,
        })))
    }

    /// Create an empty instance of the given constructor.
    pub fn with_constructor(constructor: &FunctionRef) -> Self {
        let object = Self::new();
        object.set_constructor(constructor);
        object
    }

    /// Set (or overwrite) an own property.
    pub fn set(&self, key: impl Into<PropertyKey>, value: impl Into<Value>) -> &Self {
        self.0.borrow_mut().properties.set(key.into(), value.into());
        self
    }

    /// Read an own property.
    pub fn get_own(&self, key: &PropertyKey) -> Option<Value> {
        self.0.borrow().properties.get(key)
    }

    /// Whether an own property with this key exists.
    pub fn has_own(&self, key: &PropertyKey) -> bool {
        self.0.borrow().properties.contains(key)
    }

    /// Own property keys in insertion order.
    pub fn keys(&self) -> Vec<PropertyKey> {
        self.0.borrow().properties.keys()
    }

    /// Own properties in insertion order.
    pub fn entries(&self) -> Vec<(PropertyKey, Value)> {
        self.0.borrow().properties.entries()
    }

    /// The constructor this object is an instance of, if any.
    pub fn constructor(&self) -> Option<FunctionRef> {
        self.0.borrow().constructor.clone()
    }

    /// Make this object an instance of `constructor`.
    pub fn set_constructor(&self, constructor: &FunctionRef) {
        self.0.borrow_mut().constructor = Some(constructor.clone());
    }

    /// Identity of this object.
    pub fn id(&self) -> ValueId {
        ValueId(Rc::as_ptr(&self.0) as *const () as usize)
    }
}

impl Default for ObjectRef {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Function ────────────────────────────────────────────────────────

struct FunctionData {
    name: String,
    arity: usize,
    properties: PropertyTable,
}

/// Shared handle to a callable. Its own properties are static members.
#[derive(Clone)]
pub struct FunctionRef(Rc<RefCell<FunctionData>>);

impl FunctionRef {
    /// Create a function with a name and declared parameter count.
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self(Rc::new(RefCell::new(FunctionData {
            name: name.into(),
            arity,
            properties: PropertyTable::default(),
        })))
    }

    pub fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    pub fn arity(&self) -> usize {
        self.0.borrow().arity
    }

    /// Set (or overwrite) a static property.
    pub fn set(&self, key: impl Into<PropertyKey>, value: impl Into<Value>) -> &Self {
        self.0.borrow_mut().properties.set(key.into(), value.into());
        self
    }

    pub fn get_own(&self, key: &PropertyKey) -> Option<Value> {
        self.0.borrow().properties.get(key)
    }

    pub fn has_own(&self, key: &PropertyKey) -> bool {
        self.0.borrow().properties.contains(key)
    }

    pub fn keys(&self) -> Vec<PropertyKey> {
        self.0.borrow().properties.keys()
    }

    pub fn id(&self) -> ValueId {
        ValueId(Rc::as_ptr(&self.0) as *const () as usize)
    }
}

// ─── Array ───────────────────────────────────────────────────────────

/// Shared handle to an array.
#[derive(Clone)]
pub struct ArrayRef(Rc<RefCell<Vec<Value>>>);

impl ArrayRef {
    pub fn new(items: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(items)))
    }

    pub fn push(&self, value: impl Into<Value>) {
        self.0.borrow_mut().push(value.into());
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Snapshot of the current elements.
    pub fn items(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    pub fn id(&self) -> ValueId {
        ValueId(Rc::as_ptr(&self.0) as *const () as usize)
    }
}

// ─── Map ─────────────────────────────────────────────────────────────

/// Shared handle to an associative structure. Keys match by strict equality.
#[derive(Clone)]
pub struct MapRef(Rc<RefCell<Vec<(Value, Value)>>>);

impl MapRef {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Vec::new())))
    }

    /// Insert or replace the entry for `key`.
    pub fn insert(&self, key: impl Into<Value>, value: impl Into<Value>) -> &Self {
        let key = key.into();
        let value = value.into();
        let mut entries = self.0.borrow_mut();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => entries.push((key, value)),
        }
        drop(entries);
        self
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        self.0
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.0.borrow().clone()
    }

    pub fn id(&self) -> ValueId {
        ValueId(Rc::as_ptr(&self.0) as *const () as usize)
    }
}

impl Default for MapRef {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Value API ───────────────────────────────────────────────────────

impl Value {
    /// Build a plain object from key/value pairs.
    pub fn object<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<PropertyKey>,
        V: Into<Value>,
    {
        let object = ObjectRef::new();
        for (key, value) in entries {
            object.set(key, value);
        }
        Value::Object(object)
    }

    /// Build an instance of `constructor` from key/value pairs.
    pub fn instance<K, V>(constructor: &FunctionRef, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<PropertyKey>,
        V: Into<Value>,
    {
        let object = ObjectRef::with_constructor(constructor);
        for (key, value) in entries {
            object.set(key, value);
        }
        Value::Object(object)
    }

    /// Build an array.
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(ArrayRef::new(items.into_iter().collect()))
    }

    /// Build a map from key/value pairs.
    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let map = MapRef::new();
        for (key, value) in entries {
            map.insert(key, value);
        }
        Value::Map(map)
    }

    /// Build a function value.
    pub fn function(name: impl Into<String>, arity: usize) -> Self {
        Value::Function(FunctionRef::new(name, arity))
    }

    /// `typeof`-style kind name.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null | Value::Object(_) | Value::Array(_) | Value::Map(_) => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Function(_) => "function",
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// `null` or `undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Non-null value of kind `object` (objects, arrays, maps).
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_) | Value::Map(_))
    }

    /// Object or function: anything that can hold properties.
    pub fn is_object_like(&self) -> bool {
        self.is_object() || matches!(self, Value::Function(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Identity of reference values; `None` for primitives.
    pub fn identity(&self) -> Option<ValueId> {
        match self {
            Value::Object(o) => Some(o.id()),
            Value::Array(a) => Some(a.id()),
            Value::Map(m) => Some(m.id()),
            Value::Function(f) => Some(f.id()),
            _ => None,
        }
    }

    /// The constructor of a class instance.
    pub fn constructor(&self) -> Option<FunctionRef> {
        match self {
            Value::Object(o) => o.constructor(),
            _ => None,
        }
    }

    /// Property read. Missing keys read as `Undefined`.
    pub fn get(&self, key: &PropertyKey) -> Value {
        match self {
            Value::Object(o) => match o.get_own(key) {
                Some(v) => v,
                None if key.is_named("constructor") => {
                    o.constructor().map(Value::Function).unwrap_or(Value::Undefined)
                }
                None => Value::Undefined,
            },
            Value::Function(f) => match f.get_own(key) {
                Some(v) => v,
                None if key.is_named("name") => Value::from(f.name()),
                None if key.is_named("length") => Value::Number(f.arity() as f64),
                None => Value::Undefined,
            },
            Value::Array(a) => match key {
                PropertyKey::Index(i) => a.get(*i).unwrap_or(Value::Undefined),
                k if k.is_named("length") => Value::Number(a.len() as f64),
                _ => Value::Undefined,
            },
            Value::String(s) if key.is_named("length") => {
                Value::Number(s.chars().count() as f64)
            }
            _ => Value::Undefined,
        }
    }

    /// Whether `key` exists on this value (own property or built-in member).
    pub fn has(&self, key: &PropertyKey) -> bool {
        match self {
            Value::Object(o) => {
                o.has_own(key) || (key.is_named("constructor") && o.constructor().is_some())
            }
            Value::Function(f) => {
                f.has_own(key) || key.is_named("name") || key.is_named("length")
            }
            Value::Array(a) => match key {
                PropertyKey::Index(i) => *i < a.len(),
                k => k.is_named("length"),
            },
            _ => false,
        }
    }

    /// Associative lookup: map entries for maps, property reads otherwise.
    pub fn lookup(&self, key: &PropertyKey) -> Value {
        match self {
            Value::Map(m) => m.get(&key.to_value()).unwrap_or(Value::Undefined),
            other => other.get(key),
        }
    }
}

/// Strict equality: primitives by value, references by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (a, b) => match (a.identity(), b.identity()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Symbol(s) => write!(f, "{s:?}"),
            // Shallow on purpose: reference values may be cyclic.
            Value::Object(o) => write!(f, "Object({})", o.id()),
            Value::Array(a) => write!(f, "Array({})", a.id()),
            Value::Map(m) => write!(f, "Map({})", m.id()),
            Value::Function(func) => write!(f, "Function({:?})", func.name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::Symbol(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}

impl From<ArrayRef> for Value {
    fn from(a: ArrayRef) -> Self {
        Value::Array(a)
    }
}

impl From<MapRef> for Value {
    fn from(m: MapRef) -> Self {
        Value::Map(m)
    }
}

impl From<FunctionRef> for Value {
    fn from(f: FunctionRef) -> Self {
        Value::Function(f)
    }
}
