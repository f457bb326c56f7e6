mod namespace;
mod output;


pub use namespace::{NAMESPACES, lookup_namespace};
pub use output::serialize;

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Metadata about one test, as described by a testinfo.desc file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestInfo {
    /// Full test name, e.g. "/desktop/evolution/mail"
    pub test_name: Option<String>,
    /// First segment of the name after the leading slash
    pub test_name_root_ns: Option<String>,
    /// Remainder of the name below the root namespace
    pub test_name_under_root_ns: Option<String>,
    pub test_description: Option<String>,
    pub test_archs: Vec<String>,
    pub owner: Option<String>,
    pub test_version: Option<String>,
    pub releases: Vec<String>,
    pub priority: Option<String>,
    pub destructive: Option<bool>,
    pub license: Option<String>,
    pub confidential: Option<bool>,
    /// Expected run time in seconds
    pub avg_test_time: Option<u64>,
    /// Absolute path below the tests root
    pub test_path: Option<String>,
    pub requires: Vec<String>,
    pub rhtsrequires: Vec<String>,
    pub runfor: Vec<String>,
    pub bugs: Vec<u64>,
    pub types: Vec<String>,
    /// Raw text of every accepted NeedProperty line
    pub needs: Vec<String>,
    pub need_properties: Vec<NeedProperty>,
    pub siteconfig: Vec<SiteConfig>,
    pub kickstart: Option<String>,
    pub options: Vec<String>,
    pub environment: Environment,
    pub provides: Vec<String>,
}

impl TestInfo {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the test name and derive its namespace parts
    ///
    /// Names that do not begin with `/` are stored as-is with no derived parts.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();

        match split_namespace(&name) {
            Some((root_ns, under_root_ns)) => {
                self.test_name_root_ns = Some(root_ns);
                self.test_name_under_root_ns = Some(under_root_ns);
            }
            None => {
                self.test_name_root_ns = None;
                self.test_name_under_root_ns = None;
            }
        }

        self.test_name = Some(name);
    }

    /// Resolve a SiteConfig argument to an absolute path
    ///
    /// Absolute arguments are returned verbatim. Relative ones are joined
    /// onto the test name, and need the name to be known.
    pub fn siteconfig_path(&self, arg: &str) -> Option<String> {
        if arg.starts_with('/') {
            return Some(arg.to_string());
        }

        self.test_name
            .as_ref()
            .map(|name| format!("{}/{}", name, arg))
    }
}

/// Split "/root/rest/of/name" into ("root", "rest/of/name")
pub fn split_namespace(name: &str) -> Option<(String, String)> {
    let rest = name.strip_prefix('/')?;
    let mut frags = rest.splitn(2, '/');
    let root_ns = frags.next().unwrap_or_default().to_string();
    let under_root_ns = frags.next().unwrap_or_default().to_string();
    Some((root_ns, under_root_ns))
}

/// Comparison operator of a NeedProperty line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Comparison {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
}

impl Comparison {
    pub fn as_str(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Comparison {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Comparison::Eq),
            ">" => Ok(Comparison::Gt),
            ">=" => Ok(Comparison::Ge),
            "<" => Ok(Comparison::Lt),
            "<=" => Ok(Comparison::Le),
            other => Err(format!("unknown comparison operator \"{}\"", other)),
        }
    }
}

/// A host property the test needs, e.g. `PROCESSORS > 1`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeedProperty {
    pub name: String,
    pub op: Comparison,
    pub value: String,
}

impl NeedProperty {
    pub fn new(name: impl Into<String>, op: Comparison, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            op,
            value: value.into(),
        }
    }
}

impl fmt::Display for NeedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.op, self.value)
    }
}

/// An externally supplied configuration value the test expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteConfig {
    /// Absolute path of the value
    pub path: String,
    pub description: String,
}

impl SiteConfig {
    pub fn new(path: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            description: description.into(),
        }
    }
}

/// Environment variables in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Environment {
    vars: Vec<(String, String)>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert a variable, returning false if the key was already present
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.vars.push((key, value.into()));
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
