use std::fmt;
use std::rc::Rc;

/// A fixed-width unsigned integer value.
///
/// Two `Bits` values only describe the same hardware if both their values and their bit widths match, so equality compares both.
///
/// # Panics
///
/// Constructing a `Bits` value panics if `bit_width` is zero, or if `value` doesn't fit into `bit_width` bits.
///
/// # Examples
///
/// ```
/// use khvhdl::*;
///
/// let byte = Bits::new(0xffu32, 8);
/// assert_eq!(byte.bit_width(), 8);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Bits {
    value: u128,
    bit_width: u32,
}

impl Bits {
    pub fn new<V: Into<u128>>(value: V, bit_width: u32) -> Bits {
        let value = value.into();
        if bit_width == 0 || bit_width > 128 {
            panic!(
                "Cannot create a bit vector with {} bit(s). Bit vectors must be between 1 and 128 bits wide.",
                bit_width
            );
        }
        let required_bits = 128 - value.leading_zeros();
        if required_bits > bit_width {
            panic!("Cannot fit the specified value '{}' into the specified bit width '{}'. The value '{}' requires a bit width of at least {} bit(s).", value, bit_width, value, required_bits);
        }
        Bits { value, bit_width }
    }

    pub fn value(&self) -> u128 {
        self.value
    }

    pub fn bit_width(&self) -> u32 {
        self.bit_width
    }
}

/// An enumerated type, shared between all [`Value`]s holding one of its items.
#[derive(Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EnumType {
    pub(crate) name: String,
    pub(crate) items: Vec<String>,
}

impl EnumType {
    /// Creates an enumerated type called `name` with the given `items`.
    ///
    /// # Examples
    ///
    /// ```
    /// use khvhdl::*;
    ///
    /// let state = EnumType::new("state", &["idle", "busy"]);
    /// let idle = EnumType::item(&state, "idle");
    /// ```
    pub fn new(name: impl Into<String>, items: &[&str]) -> Rc<EnumType> {
        Rc::new(EnumType {
            name: name.into(),
            items: items.iter().map(|item| item.to_string()).collect(),
        })
    }

    /// Returns a [`Value`] holding the item called `item` of `ty`.
    ///
    /// # Panics
    ///
    /// Panics if `ty` has no item called `item`.
    pub fn item(ty: &Rc<EnumType>, item: &str) -> Value {
        match ty.items.iter().position(|i| i == item) {
            Some(index) => Value::Enum(EnumItem {
                ty: ty.clone(),
                index,
            }),
            _ => panic!(
                "Enumerated type \"{}\" has no item called \"{}\".",
                ty.name, item
            ),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name used for this type in generated VHDL.
    pub(crate) fn vhdl_name(&self) -> String {
        format!("t_enum_{}", self.name)
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct EnumItem {
    pub(crate) ty: Rc<EnumType>,
    pub(crate) index: usize,
}

impl EnumItem {
    pub fn name(&self) -> &str {
        &self.ty.items[self.index]
    }
}

/// A value held by a [`Signal`](crate::Signal) or passed to a block parameter.
///
/// `Value` implements `From` for `bool`, Rust's integer types and [`Bits`], so API entry points that take `impl Into<Value>` accept literals directly.
/// Plain integers convert to [`Value::Int`]; use [`Bits`] for fixed-width values.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Value {
    /// Contains a single bit
    Bool(bool),
    /// Contains an integer without a declared width
    Int(i128),
    /// Contains a fixed-width unsigned integer
    Bits(Bits),
    /// Contains an item of an enumerated type
    Enum(EnumItem),
}

impl Value {
    /// Equality as the design language sees it: numeric values compare by value regardless of representation, so `Bits::new(3u32, 4)`, `3` and `Bits::new(3u32, 8)` are all equal.
    /// Enum items compare by type and item.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self.numeric_value(), other.numeric_value()) {
            (Some(lhs), Some(rhs)) => lhs == rhs,
            (None, None) => self == other,
            _ => false,
        }
    }

    pub fn is_fixed_width(&self) -> bool {
        matches!(self, Value::Bits(_))
    }

    pub fn bit_width(&self) -> Option<u32> {
        match self {
            Value::Bool(_) => Some(1),
            Value::Bits(bits) => Some(bits.bit_width),
            _ => None,
        }
    }

    pub(crate) fn numeric_value(&self) -> Option<i128> {
        match *self {
            Value::Bool(value) => Some(value as i128),
            Value::Int(value) => Some(value),
            Value::Bits(bits) => Some(bits.value as i128),
            Value::Enum(_) => None,
        }
    }

    pub(crate) fn enum_type(&self) -> Option<&Rc<EnumType>> {
        match self {
            Value::Enum(item) => Some(&item.ty),
            _ => None,
        }
    }

    /// Returns the default value of the same type, used when a signal's storage is released.
    pub(crate) fn reset(&self) -> Value {
        match self {
            Value::Bool(_) => Value::Bool(false),
            Value::Int(_) => Value::Int(0),
            Value::Bits(bits) => Value::Bits(Bits {
                value: 0,
                bit_width: bits.bit_width,
            }),
            Value::Enum(item) => Value::Enum(EnumItem {
                ty: item.ty.clone(),
                index: 0,
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(value) => write!(f, "{}", value),
            Value::Int(value) => write!(f, "{}", value),
            Value::Bits(bits) => write!(f, "{}'{}", bits.bit_width, bits.value),
            Value::Enum(item) => write!(f, "{}", item.name()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Int(value as _)
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Int(value as _)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value as _)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as _)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Int(value as _)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value as _)
    }
}

impl From<Bits> for Value {
    fn from(value: Bits) -> Self {
        Value::Bits(value)
    }
}
