//! Move type-string parsing.
//!
//! Chain responses carry fully qualified type strings such as
//! `0x2::sui::SUI` or `0xabc::pair::LPCoin<0x2::sui::SUI, 0xdef::trump::TRUMP>`.
//! This module turns them into a [`TypeTag`] tree and derives the display
//! names the UI shows.

use crate::error::{DomainError, Result};
use crate::math::IntegerWidth;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Symbol of the chain's native coin.
pub const NATIVE_SYMBOL: &str = "SUI";

static STRUCT_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:0x)?([0-9a-fA-F]{1,64})::([A-Za-z_][A-Za-z0-9_]*)::([A-Za-z_][A-Za-z0-9_]*)$")
        .expect("static regex")
});

/// A parsed Move type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Bool,
    Integer(IntegerWidth),
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(StructTag),
}

/// A struct type: `address::module::Name<params>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructTag {
    /// `0x`-prefixed, 64 lowercase hex digits.
    pub address: String,
    pub module: String,
    pub name: String,
    pub type_params: Vec<TypeTag>,
}

/// Pads an address to its canonical `0x` + 64 hex digit form.
pub fn normalize_address(address: &str) -> String {
    let body = address.trim().trim_start_matches("0x").to_ascii_lowercase();
    format!("0x{:0>64}", body)
}

fn invalid(input: &str, reason: impl Into<String>) -> DomainError {
    DomainError::InvalidTypeTag {
        input: input.to_string(),
        reason: reason.into(),
    }
}

/// Splits `a, b<c, d>, e` at top-level commas.
fn split_params(input: &str) -> Result<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in input.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| invalid(input, "unbalanced `>`"))?;
            }
            ',' if depth == 0 => {
                parts.push(input[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(invalid(input, "unbalanced `<`"));
    }
    parts.push(input[start..].trim());
    if parts.iter().any(|p| p.is_empty()) {
        return Err(invalid(input, "empty type parameter"));
    }
    Ok(parts)
}

/// Parses a type string.
pub fn parse_type_tag(input: &str) -> Result<TypeTag> {
    let s = input.trim();
    match s {
        "bool" => return Ok(TypeTag::Bool),
        "address" => return Ok(TypeTag::Address),
        "signer" => return Ok(TypeTag::Signer),
        _ => {}
    }
    if let Ok(width) = s.parse::<IntegerWidth>() {
        return Ok(TypeTag::Integer(width));
    }
    if let Some(inner) = s.strip_prefix("vector<") {
        let inner = inner
            .strip_suffix('>')
            .ok_or_else(|| invalid(input, "unterminated vector"))?;
        return Ok(TypeTag::Vector(Box::new(parse_type_tag(inner)?)));
    }
    parse_struct_tag(s).map(TypeTag::Struct)
}

/// Parses a struct type string, generics included.
pub fn parse_struct_tag(input: &str) -> Result<StructTag> {
    let s = input.trim();
    let (head, params) = match s.find('<') {
        Some(lt) => {
            let body = s[lt + 1..]
                .strip_suffix('>')
                .ok_or_else(|| invalid(input, "unterminated type parameters"))?;
            let params = split_params(body)?
                .into_iter()
                .map(parse_type_tag)
                .collect::<Result<Vec<_>>>()?;
            (&s[..lt], params)
        }
        None => (s, Vec::new()),
    };

    let caps = STRUCT_HEAD
        .captures(head)
        .ok_or_else(|| invalid(input, "expected address::module::Name"))?;
    Ok(StructTag {
        address: normalize_address(&caps[1]),
        module: caps[2].to_string(),
        name: caps[3].to_string(),
        type_params: params,
    })
}

impl FromStr for TypeTag {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        parse_type_tag(s)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Integer(width) => write!(f, "{}", width),
            Self::Address => f.write_str("address"),
            Self::Signer => f.write_str("signer"),
            Self::Vector(inner) => write!(f, "vector<{}>", inner),
            Self::Struct(tag) => write!(f, "{}", tag),
        }
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.name)?;
        if !self.type_params.is_empty() {
            let params: Vec<String> = self.type_params.iter().map(|p| p.to_string()).collect();
            write!(f, "<{}>", params.join(", "))?;
        }
        Ok(())
    }
}

impl StructTag {
    /// Whether this is the native `0x2::sui::SUI` coin.
    pub fn is_native_coin(&self) -> bool {
        self.address == normalize_address("0x2") && self.module == "sui" && self.name == NATIVE_SYMBOL
    }

    /// `address::module::Name` without type parameters.
    pub fn base_type(&self) -> String {
        format!("{}::{}::{}", self.address, self.module, self.name)
    }
}

/// Whether `type_str` is the native coin, in any address padding.
pub fn is_native_coin(type_str: &str) -> bool {
    parse_struct_tag(type_str).is_ok_and(|tag| tag.is_native_coin())
}

/// Whether a symbol names the native coin.
pub fn is_native_symbol(symbol: &str) -> bool {
    symbol.eq_ignore_ascii_case(NATIVE_SYMBOL)
}

/// Canonical form of a type string; the raw input when it does not parse.
pub fn normalize_type_string(type_str: &str) -> String {
    parse_type_tag(type_str)
        .map(|tag| tag.to_string())
        .unwrap_or_else(|_| type_str.to_string())
}

/// Last path segment of a coin type: `0x2::sui::SUI` -> `SUI`.
///
/// Strings that are not struct types come back unchanged.
pub fn coin_symbol(type_str: &str) -> String {
    match parse_struct_tag(type_str) {
        Ok(tag) => tag.name,
        Err(_) => type_str.to_string(),
    }
}

/// Identifies the LP coin type of the farm's pair contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LpPattern {
    /// Package that defines the pair module; any package when `None`.
    pub package: Option<String>,
    pub module: String,
    pub struct_name: String,
}

impl Default for LpPattern {
    fn default() -> Self {
        Self {
            package: None,
            module: "pair".to_string(),
            struct_name: "LPCoin".to_string(),
        }
    }
}

impl LpPattern {
    /// Pattern restricted to one package.
    pub fn for_package(package: &str) -> Self {
        Self {
            package: Some(normalize_address(package)),
            ..Self::default()
        }
    }

    fn matches(&self, tag: &StructTag) -> bool {
        tag.module == self.module
            && tag.name == self.struct_name
            && tag.type_params.len() == 2
            && self.package.as_ref().is_none_or(|p| *p == tag.address)
    }
}

/// An LP coin type split into its two underlying coins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LpTokenType {
    /// Underlying coin types in display order.
    pub token0: String,
    pub token1: String,
    pub symbol0: String,
    pub symbol1: String,
    /// `"A-B LP"`.
    pub display_name: String,
}

/// Orders two symbols for display: native coin first, otherwise alphabetical.
pub fn order_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    match (is_native_symbol(a), is_native_symbol(b)) {
        (false, true) => (b, a),
        (true, false) => (a, b),
        _ if b < a => (b, a),
        _ => (a, b),
    }
}

/// Parses an LP coin type matching `pattern`.
pub fn parse_lp_type(type_str: &str, pattern: &LpPattern) -> Option<LpTokenType> {
    let tag = parse_struct_tag(type_str).ok()?;
    if !pattern.matches(&tag) {
        return None;
    }

    let (TypeTag::Struct(a), TypeTag::Struct(b)) = (&tag.type_params[0], &tag.type_params[1]) else {
        return None;
    };
    let first_is_a = order_pair(&a.name, &b.name).0 == a.name.as_str();
    let (first, second) = if first_is_a { (a, b) } else { (b, a) };

    Some(LpTokenType {
        token0: first.to_string(),
        token1: second.to_string(),
        symbol0: first.name.clone(),
        symbol1: second.name.clone(),
        display_name: format!("{}-{} LP", first.name, second.name),
    })
}

/// Display name for any pool coin: LP pairs get `"A-B LP"`, other coins
/// their symbol, unparseable strings the raw input.
pub fn display_name(type_str: &str, pattern: &LpPattern) -> String {
    parse_lp_type(type_str, pattern)
        .map(|lp| lp.display_name)
        .unwrap_or_else(|| coin_symbol(type_str))
}

/// Order-independent key for a set of symbols: sorted and `-`-joined.
pub fn pair_key<S: AsRef<str>>(symbols: &[S]) -> String {
    let mut sorted: Vec<&str> = symbols.iter().map(|s| s.as_ref()).collect();
    sorted.sort_unstable();
    sorted.join("-")
}
