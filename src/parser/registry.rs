use super::handlers;
use super::{ParseError, Parser};
use crate::record::TestInfo;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Handler for one recognised field, given the trimmed value
pub type FieldHandler = fn(&mut Parser<'_>, Field, &str) -> Result<(), ParseError>;

/// Every field name the parser recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Description,
    Notify,
    Owner,
    TestVersion,
    License,
    Releases,
    Architectures,
    RhtsOptions,
    Environment,
    Priority,
    Destructive,
    Confidential,
    TestTime,
    Type,
    Bug,
    Bugs,
    Path,
    RunFor,
    Requires,
    RhtsRequires,
    NeedProperty,
    Need,
    Want,
    WantProperty,
    Kickstart,
    Provides,
}

/// Field name -> (field, handler) dispatch table
static FIELD_TABLE: LazyLock<HashMap<&'static str, (Field, FieldHandler)>> = LazyLock::new(|| {
    Field::ALL
        .iter()
        .map(|&field| (field.key(), (field, field.handler())))
        .collect()
});

/// Fields that must hold a value once the whole file has been read
pub const MANDATORY_FIELDS: &[Field] = &[
    Field::Name,
    Field::Description,
    Field::Path,
    Field::TestTime,
    Field::TestVersion,
    Field::License,
    Field::Owner,
];

impl Field {
    pub const ALL: &'static [Field] = &[
        Field::Name,
        Field::Description,
        Field::Notify,
        Field::Owner,
        Field::TestVersion,
        Field::License,
        Field::Releases,
        Field::Architectures,
        Field::RhtsOptions,
        Field::Environment,
        Field::Priority,
        Field::Destructive,
        Field::Confidential,
        Field::TestTime,
        Field::Type,
        Field::Bug,
        Field::Bugs,
        Field::Path,
        Field::RunFor,
        Field::Requires,
        Field::RhtsRequires,
        Field::NeedProperty,
        Field::Need,
        Field::Want,
        Field::WantProperty,
        Field::Kickstart,
        Field::Provides,
    ];

    /// Look up a field by its exact, case-sensitive name
    pub fn from_key(key: &str) -> Option<Field> {
        lookup(key).map(|(field, _)| field)
    }

    /// The field name as written in the file
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Description => "Description",
            Field::Notify => "Notify",
            Field::Owner => "Owner",
            Field::TestVersion => "TestVersion",
            Field::License => "License",
            Field::Releases => "Releases",
            Field::Architectures => "Architectures",
            Field::RhtsOptions => "RhtsOptions",
            Field::Environment => "Environment",
            Field::Priority => "Priority",
            Field::Destructive => "Destructive",
            Field::Confidential => "Confidential",
            Field::TestTime => "TestTime",
            Field::Type => "Type",
            Field::Bug => "Bug",
            Field::Bugs => "Bugs",
            Field::Path => "Path",
            Field::RunFor => "RunFor",
            Field::Requires => "Requires",
            Field::RhtsRequires => "RhtsRequires",
            Field::NeedProperty => "NeedProperty",
            Field::Need => "Need",
            Field::Want => "Want",
            Field::WantProperty => "WantProperty",
            Field::Kickstart => "Kickstart",
            Field::Provides => "Provides",
        }
    }

    pub(super) fn handler(self) -> FieldHandler {
        match self {
            Field::Name => handlers::handle_name,
            Field::Description
            | Field::Owner
            | Field::TestVersion
            | Field::License
            | Field::Priority => handlers::handle_unique_string,
            Field::Notify => handlers::handle_deprecated,
            Field::Need | Field::Want | Field::WantProperty => {
                handlers::handle_deprecated_for_needproperty
            }
            Field::Releases => handlers::handle_releases,
            Field::Architectures => handlers::handle_archs,
            Field::RhtsOptions => handlers::handle_options,
            Field::Environment => handlers::handle_environment,
            Field::Destructive | Field::Confidential => handlers::handle_bool,
            Field::TestTime => handlers::handle_testtime,
            Field::Bug | Field::Bugs => handlers::handle_bug,
            Field::Path => handlers::handle_path,
            Field::Type
            | Field::RunFor
            | Field::Requires
            | Field::RhtsRequires
            | Field::Provides => handlers::handle_append_list,
            Field::NeedProperty => handlers::handle_needproperty,
            Field::Kickstart => handlers::handle_kickstart,
        }
    }

    /// Whether `info` holds a value for this field
    ///
    /// Empty strings and a zero TestTime count as unset. Deprecated fields
    /// are never stored.
    pub fn is_set(self, info: &TestInfo) -> bool {
        let has_text = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());

        match self {
            Field::Name => has_text(&info.test_name),
            Field::Description => has_text(&info.test_description),
            Field::Owner => has_text(&info.owner),
            Field::TestVersion => has_text(&info.test_version),
            Field::License => has_text(&info.license),
            Field::Priority => has_text(&info.priority),
            Field::Path => has_text(&info.test_path),
            Field::Kickstart => has_text(&info.kickstart),
            Field::TestTime => info.avg_test_time.is_some_and(|secs| secs > 0),
            Field::Destructive => info.destructive.is_some(),
            Field::Confidential => info.confidential.is_some(),
            Field::Releases => !info.releases.is_empty(),
            Field::Architectures => !info.test_archs.is_empty(),
            Field::RhtsOptions => !info.options.is_empty(),
            Field::Environment => !info.environment.is_empty(),
            Field::Type => !info.types.is_empty(),
            Field::Bug | Field::Bugs => !info.bugs.is_empty(),
            Field::RunFor => !info.runfor.is_empty(),
            Field::Requires => !info.requires.is_empty(),
            Field::RhtsRequires => !info.rhtsrequires.is_empty(),
            Field::NeedProperty => !info.need_properties.is_empty(),
            Field::Provides => !info.provides.is_empty(),
            Field::Notify | Field::Need | Field::Want | Field::WantProperty => false,
        }
    }
}

/// Find the field and handler registered for `key`
pub fn lookup(key: &str) -> Option<(Field, FieldHandler)> {
    FIELD_TABLE.get(key).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_is_in_the_table() {
        for &field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert_eq!(FIELD_TABLE.len(), Field::ALL.len());
    }

    #[test]
    fn test_unknown_and_miscased_keys() {
        assert_eq!(Field::from_key("Nmae"), None);
        assert_eq!(Field::from_key("name"), None);
        assert_eq!(Field::from_key(""), None);
    }
}
