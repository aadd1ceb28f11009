//! Typed command parameters.
//!
//! Each command declares a `ParamSchema`, an ordered list of field types.
//! The raw parameter string is split on whitespace and every token must
//! convert to its field type; the number of converted fields must equal the
//! command's expected argument count.

use arrayvec::ArrayString;
use heapless::Vec;
use thiserror::Error;

pub const MAX_PARAMS: usize = 8;
pub const MAX_STR_PARAM_LEN: usize = 64;

pub type StrParam = ArrayString<MAX_STR_PARAM_LEN>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("parameters are missing")]
    Missing,
    #[error("parameters are not valid UTF-8")]
    NotUtf8,
    #[error("expected {expected} parameters, found {found}")]
    CountMismatch { expected: usize, found: usize },
    #[error("parameter {index} ({token:?}) is not a valid {field}")]
    TypeMismatch {
        index: usize,
        field: FieldSpec,
        token: StrParam,
    },
    #[error("parameter {index} exceeds {} bytes", MAX_STR_PARAM_LEN)]
    TokenTooLong { index: usize },
    #[error("schema has more than {} fields", MAX_PARAMS)]
    SchemaTooLong,
    #[error("unknown field specifier {0:?} in descriptor")]
    BadDescriptor(StrParam),
    #[error("parameter {index} is not a {expected}")]
    WrongAccess { index: usize, expected: FieldSpec },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSpec {
    Unsigned,
    Signed,
    Float,
    Str,
}

impl FieldSpec {
    pub fn descriptor(self) -> &'static str {
        match self {
            FieldSpec::Unsigned => "%u",
            FieldSpec::Signed => "%d",
            FieldSpec::Float => "%f",
            FieldSpec::Str => "%s",
        }
    }

    fn from_descriptor(token: &str) -> Option<Self> {
        match token {
            "%u" => Some(FieldSpec::Unsigned),
            "%d" | "%i" => Some(FieldSpec::Signed),
            "%f" => Some(FieldSpec::Float),
            "%s" => Some(FieldSpec::Str),
            _ => None,
        }
    }
}

impl core::fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            FieldSpec::Unsigned => "unsigned integer",
            FieldSpec::Signed => "signed integer",
            FieldSpec::Float => "float",
            FieldSpec::Str => "string",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSchema {
    fields: Vec<FieldSpec, MAX_PARAMS>,
}

impl ParamSchema {
    /// Schema for commands that take their parameters as raw bytes.
    pub fn raw() -> Self {
        Self::default()
    }

    pub fn new(fields: &[FieldSpec]) -> Result<Self, ParamError> {
        let fields = Vec::from_slice(fields).map_err(|()| ParamError::SchemaTooLong)?;
        Ok(Self { fields })
    }

    /// Parse a compact descriptor such as `"%u %d"`.
    pub fn from_descriptor(descriptor: &str) -> Result<Self, ParamError> {
        let mut fields = Vec::new();
        for token in descriptor.split_whitespace() {
            let spec = FieldSpec::from_descriptor(token)
                .ok_or_else(|| ParamError::BadDescriptor(truncated(token)))?;
            fields.push(spec).map_err(|_| ParamError::SchemaTooLong)?;
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl core::fmt::Display for ParamSchema {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(field.descriptor())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Str(StrParam),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    values: Vec<ParamValue, MAX_PARAMS>,
}

impl ParsedArgs {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[ParamValue] {
        &self.values
    }

    pub fn unsigned(&self, index: usize) -> Result<u64, ParamError> {
        match self.values.get(index) {
            Some(ParamValue::Unsigned(v)) => Ok(*v),
            _ => Err(ParamError::WrongAccess { index, expected: FieldSpec::Unsigned }),
        }
    }

    pub fn signed(&self, index: usize) -> Result<i64, ParamError> {
        match self.values.get(index) {
            Some(ParamValue::Signed(v)) => Ok(*v),
            _ => Err(ParamError::WrongAccess { index, expected: FieldSpec::Signed }),
        }
    }

    pub fn float(&self, index: usize) -> Result<f64, ParamError> {
        match self.values.get(index) {
            Some(ParamValue::Float(v)) => Ok(*v),
            _ => Err(ParamError::WrongAccess { index, expected: FieldSpec::Float }),
        }
    }

    pub fn string(&self, index: usize) -> Result<&str, ParamError> {
        match self.values.get(index) {
            Some(ParamValue::Str(v)) => Ok(v.as_str()),
            _ => Err(ParamError::WrongAccess { index, expected: FieldSpec::Str }),
        }
    }
}

/// Extract the fields of `schema` from `params`.
///
/// Fails with `ParamError::Missing` when there is no parameter string at
/// all; every other failure means the string was malformed.
pub fn parse_params(
    schema: &ParamSchema,
    params: Option<&str>,
    expected: usize,
) -> Result<ParsedArgs, ParamError> {
    let Some(raw) = params else {
        tracing::error!("params is null!");
        return Err(ParamError::Missing);
    };

    let result = parse_tokens(schema, raw, expected);
    if let Err(ref e) = result {
        tracing::warn!(params = raw, "invalid args: {}", e);
    }
    result
}

/// Same as `parse_params` for raw parameter bytes.
pub fn parse_param_bytes(
    schema: &ParamSchema,
    params: Option<&[u8]>,
    expected: usize,
) -> Result<ParsedArgs, ParamError> {
    match params.map(core::str::from_utf8) {
        None => parse_params(schema, None, expected),
        Some(Ok(text)) => parse_params(schema, Some(text), expected),
        Some(Err(_)) => {
            tracing::warn!(len = params.map_or(0, <[u8]>::len), "invalid args: not UTF-8");
            Err(ParamError::NotUtf8)
        }
    }
}

fn parse_tokens(schema: &ParamSchema, raw: &str, expected: usize) -> Result<ParsedArgs, ParamError> {
    let mut args = ParsedArgs::default();
    let mut tokens = raw.split_whitespace();

    for (index, field) in schema.fields().iter().enumerate() {
        let Some(token) = tokens.next() else {
            break;
        };
        let value = convert(index, *field, token)?;
        // Schema length is bounded by MAX_PARAMS, so this cannot overflow
        let _ = args.values.push(value);
    }

    let extra = tokens.count();
    if extra > 0 {
        return Err(ParamError::CountMismatch {
            expected,
            found: args.len() + extra,
        });
    }

    if args.len() != expected {
        return Err(ParamError::CountMismatch {
            expected,
            found: args.len(),
        });
    }

    Ok(args)
}

fn convert(index: usize, field: FieldSpec, token: &str) -> Result<ParamValue, ParamError> {
    let mismatch = || ParamError::TypeMismatch {
        index,
        field,
        token: truncated(token),
    };

    match field {
        FieldSpec::Unsigned => token.parse().map(ParamValue::Unsigned).map_err(|_| mismatch()),
        FieldSpec::Signed => token.parse().map(ParamValue::Signed).map_err(|_| mismatch()),
        FieldSpec::Float => token
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(ParamValue::Float)
            .ok_or_else(mismatch),
        FieldSpec::Str => StrParam::from(token)
            .map(ParamValue::Str)
            .map_err(|_| ParamError::TokenTooLong { index }),
    }
}

fn truncated(token: &str) -> StrParam {
    let mut out = StrParam::new();
    for c in token.chars() {
        if out.try_push(c).is_err() {
            break;
        }
    }
    out
}
