use regex::Regex;


/// A predicate over a single raw field value
pub trait Validator {
    /// Whether the value satisfies the rule
    fn is_valid(&self, value: &str) -> bool;

    /// Human-readable description of the rule, used in error text
    fn message(&self) -> String;
}

/// Full-match regex validator
///
/// The pattern is anchored on both ends, so `is_valid` only accepts values
/// the whole of which match. Character classes such as `\w` are Unicode-aware.
pub struct RegexValidator {
    pattern: Regex,
    message: String,
}

impl RegexValidator {
    /// Build a validator from a pattern and its rule description
    ///
    /// Fails only if `pattern` is not a valid regex.
    pub fn new(pattern: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(&format!("^(?:{})$", pattern))?,
            message: message.into(),
        })
    }
}

impl Validator for RegexValidator {
    fn is_valid(&self, value: &str) -> bool {
        self.pattern.is_match(value)
    }

    fn message(&self) -> String {
        self.message.clone()
    }
}

/// Characters allowed in an RFC2822 atom, plus the dot
const ATOM_CHARS: &str = r"\w!#$%&'*+,\-./=?^_`{|}~";

/// Validates `Display Name <local@domain>` addresses
///
/// Accepts only the common shape from RFC2822 section 3.4: a phrase of atom
/// characters and spaces followed by an angle-bracketed addr-spec. Comments
/// and quoted strings are not supported.
pub struct NameAddrValidator {
    inner: RegexValidator,
}

impl NameAddrValidator {
    pub fn new() -> Self {
        let phrase = format!(" *[{a}][{a} ]*", a = ATOM_CHARS);
        let addr_spec = format!("[{a}]+@[{a}]+", a = ATOM_CHARS);
        let name_addr = format!("{}<{}> *", phrase, addr_spec);

        let inner = RegexValidator::new(
            &name_addr,
            "should be a valid RFC2822 name_addr, such as John Doe <jdoe@somedomain.org>",
        )
        .expect("valid regex");

        Self { inner }
    }
}

impl Default for NameAddrValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for NameAddrValidator {
    fn is_valid(&self, value: &str) -> bool {
        self.inner.is_valid(value)
    }

    fn message(&self) -> String {
        self.inner.message()
    }
}

/// Membership in a fixed set of values
pub struct ListValidator {
    valid_values: &'static [&'static str],
}

impl ListValidator {
    pub const fn new(valid_values: &'static [&'static str]) -> Self {
        Self { valid_values }
    }
}

impl Validator for ListValidator {
    fn is_valid(&self, value: &str) -> bool {
        self.valid_values.contains(&value)
    }

    fn message(&self) -> String {
        let mut msg = String::from("valid values are");
        for value in self.valid_values {
            msg.push_str(&format!(" \"{}\"", value));
        }
        msg
    }
}

/// Like [`ListValidator`], but one leading `-` is stripped before the check
pub struct DashListValidator {
    inner: ListValidator,
}

impl DashListValidator {
    pub const fn new(valid_values: &'static [&'static str]) -> Self {
        Self {
            inner: ListValidator::new(valid_values),
        }
    }
}

impl Validator for DashListValidator {
    fn is_valid(&self, value: &str) -> bool {
        let value = value.strip_prefix('-').unwrap_or(value);
        self.inner.is_valid(value)
    }

    fn message(&self) -> String {
        format!("{} optionally prefixed with '-'", self.inner.message())
    }
}

/// Boolean lexicon: `y`, `yes`, `1` are true and `n`, `no`, `0` are false
///
/// Matching is exact and case-sensitive.
pub struct BoolValidator;

impl BoolValidator {
    /// Tri-state conversion; `None` means the value is not in the lexicon
    pub fn convert(&self, value: &str) -> Option<bool> {
        match value {
            "y" | "yes" | "1" => Some(true),
            "n" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl Validator for BoolValidator {
    fn is_valid(&self, value: &str) -> bool {
        self.convert(value).is_some()
    }

    fn message(&self) -> String {
        "boolean value expected".to_string()
    }
}
