//! One handler per recognised field.
//!
//! Handlers share the signature in [`FieldHandler`](super::registry::FieldHandler):
//! they receive the parser, the field being handled and its trimmed value,
//! update the record and report problems through the parser's sink.
//!
//! Unique fields follow store-then-validate: the first value is stored even
//! when its validator rejects it, and later occurrences are reported and
//! dropped.

use super::registry::Field;
use super::vocab::{TESTS_ROOT, VALID_ARCHITECTURES, VALID_OPTIONS, VALID_PRIORITIES};
use super::{DiagnosticKind, ParseError, Parser};
use crate::record::{Comparison, NeedProperty, TestInfo};
use crate::validator::{
    BoolValidator, DashListValidator, ListValidator, NameAddrValidator, RegexValidator,
    Validator,
};
use regex::Regex;
use std::sync::LazyLock;

static OWNER_VALIDATOR: LazyLock<NameAddrValidator> = LazyLock::new(NameAddrValidator::new);

static TEST_VERSION_VALIDATOR: LazyLock<RegexValidator> = LazyLock::new(|| {
    RegexValidator::new(
        r"[A-Za-z0-9\.]*",
        "can only contain numbers, letters and the dot symbol",
    )
    .expect("valid regex")
});

static ENV_KEY_VALIDATOR: LazyLock<RegexValidator> = LazyLock::new(|| {
    RegexValidator::new(
        r"[A-Za-z_][A-Za-z0-9_]*",
        "Can contain only letters, numbers and underscore.",
    )
    .expect("valid regex")
});

static TEST_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)(.*)$").expect("valid regex"));

static BUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]*$").expect("valid regex"));

static NEED_PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9]*)\s+(=|>|>=|<|<=)\s+([A-Z:a-z0-9]*)$").expect("valid regex")
});

// ============================================================================
// Shared policies
// ============================================================================

fn invalid_value(value: &str, field: Field, validator: &dyn Validator) -> String {
    format!(
        "\"{}\" is not a valid {} field ({})",
        value,
        field.key(),
        validator.message()
    )
}

fn already_defined(p: &mut Parser<'_>, field: Field) -> Result<(), ParseError> {
    p.error(
        DiagnosticKind::DuplicateField,
        format!("{} field already defined", field.key()),
    )
}

/// Store into an unset slot, or report a duplicate and leave the slot alone
///
/// A slot holding an empty value counts as unset, matching the mandatory
/// check. Returns whether the value was stored.
fn store_unique<T>(
    p: &mut Parser<'_>,
    field: Field,
    slot: impl FnOnce(&mut TestInfo) -> &mut Option<T>,
    value: T,
) -> Result<bool, ParseError> {
    if field.is_set(&p.info) {
        already_defined(p, field)?;
        return Ok(false);
    }

    *slot(&mut p.info) = Some(value);
    Ok(true)
}

fn string_slot(info: &mut TestInfo, field: Field) -> &mut Option<String> {
    match field {
        Field::Description => &mut info.test_description,
        Field::Owner => &mut info.owner,
        Field::TestVersion => &mut info.test_version,
        Field::Priority => &mut info.priority,
        _ => &mut info.license,
    }
}

fn string_validator(field: Field) -> Option<&'static dyn Validator> {
    static PRIORITY_VALIDATOR: ListValidator = ListValidator::new(VALID_PRIORITIES);

    match field {
        Field::Owner => Some(&*OWNER_VALIDATOR),
        Field::TestVersion => Some(&*TEST_VERSION_VALIDATOR),
        Field::Priority => Some(&PRIORITY_VALIDATOR),
        _ => None,
    }
}

fn list_slot(info: &mut TestInfo, field: Field) -> &mut Vec<String> {
    match field {
        Field::Type => &mut info.types,
        Field::RunFor => &mut info.runfor,
        Field::RhtsRequires => &mut info.rhtsrequires,
        Field::Provides => &mut info.provides,
        _ => &mut info.requires,
    }
}

/// Warn once if some entries are negated with `-` and some are not
fn check_negation(
    p: &mut Parser<'_>,
    field: Field,
    entries: &[String],
    what: &str,
) -> Result<(), ParseError> {
    let negated = entries.iter().filter(|e| e.starts_with('-')).count();
    if negated > 0 && negated < entries.len() {
        return p.warning(
            DiagnosticKind::MixedNegation,
            format!(
                "{} field lists both negated and non-negated {} (should be all negated, or all non-negated)",
                field.key(),
                what
            ),
        );
    }
    Ok(())
}

fn tokens(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

// ============================================================================
// Handlers
// ============================================================================

pub(super) fn handle_name(p: &mut Parser<'_>, field: Field, value: &str) -> Result<(), ParseError> {
    if field.is_set(&p.info) {
        return already_defined(p, field);
    }

    p.info.set_name(value);

    if !value.starts_with('/') {
        return p.error(
            DiagnosticKind::InvalidValue,
            "Name field does not begin with a forward-slash",
        );
    }
    Ok(())
}

/// Description, Owner, TestVersion, License and Priority
pub(super) fn handle_unique_string(
    p: &mut Parser<'_>,
    field: Field,
    value: &str,
) -> Result<(), ParseError> {
    if !store_unique(p, field, |info| string_slot(info, field), value.to_string())? {
        return Ok(());
    }

    if let Some(validator) = string_validator(field) {
        if !validator.is_valid(value) {
            return p.error(
                DiagnosticKind::InvalidValue,
                invalid_value(value, field, validator),
            );
        }
    }
    Ok(())
}

/// Destructive and Confidential
pub(super) fn handle_bool(p: &mut Parser<'_>, field: Field, value: &str) -> Result<(), ParseError> {
    let validator = BoolValidator;
    let Some(flag) = validator.convert(value) else {
        return p.error(
            DiagnosticKind::InvalidValue,
            invalid_value(value, field, &validator),
        );
    };

    store_unique(
        p,
        field,
        |info| match field {
            Field::Destructive => &mut info.destructive,
            _ => &mut info.confidential,
        },
        flag,
    )
    .map(|_| ())
}

pub(super) fn handle_releases(
    p: &mut Parser<'_>,
    field: Field,
    value: &str,
) -> Result<(), ParseError> {
    if field.is_set(&p.info) {
        return already_defined(p, field);
    }

    let releases = tokens(value);
    p.info.releases = releases.clone();
    check_negation(p, field, &releases, "release names")
}

pub(super) fn handle_archs(p: &mut Parser<'_>, field: Field, value: &str) -> Result<(), ParseError> {
    if field.is_set(&p.info) {
        return already_defined(p, field);
    }

    let archs = tokens(value);
    p.info.test_archs = archs.clone();

    let validator = ListValidator::new(VALID_ARCHITECTURES);
    for arch in &archs {
        let bare = arch.trim_start_matches('-');
        if !validator.is_valid(bare) {
            p.error(
                DiagnosticKind::InvalidValue,
                format!(
                    "\"{}\" is not a valid value for Architecture; {}",
                    bare,
                    validator.message()
                ),
            )?;
        }
    }

    check_negation(p, field, &archs, "architectures")
}

/// RhtsOptions: only the first occurrence populates the list
///
/// Invalid options are reported and skipped; valid ones on the same line
/// are kept.
pub(super) fn handle_options(
    p: &mut Parser<'_>,
    field: Field,
    value: &str,
) -> Result<(), ParseError> {
    if field.is_set(&p.info) {
        return already_defined(p, field);
    }

    let validator = DashListValidator::new(VALID_OPTIONS);
    for option in value.split_whitespace() {
        if !validator.is_valid(option) {
            p.error(
                DiagnosticKind::InvalidValue,
                invalid_value(option, field, &validator),
            )?;
            continue;
        }
        p.info.options.push(option.to_string());
    }
    Ok(())
}

/// Environment: one `KEY=VALUE` per line, keys unique across the file
pub(super) fn handle_environment(
    p: &mut Parser<'_>,
    field: Field,
    value: &str,
) -> Result<(), ParseError> {
    let Some((key, val)) = value.split_once('=') else {
        return p.error(
            DiagnosticKind::InvalidValue,
            format!(
                "Malformed {} field not matching KEY=VALUE pattern",
                field.key()
            ),
        );
    };

    if p.info.environment.contains_key(key) {
        return p.error(
            DiagnosticKind::DuplicateField,
            format!("{}: Duplicate entry for \"{}\"", field.key(), key),
        );
    }

    if !ENV_KEY_VALIDATOR.is_valid(key) {
        return p.error(
            DiagnosticKind::InvalidValue,
            format!(
                "\"{}\" is not a valid key for {} field ({})",
                key,
                field.key(),
                ENV_KEY_VALIDATOR.message()
            ),
        );
    }

    p.info.environment.insert(key, val);
    Ok(())
}

/// TestTime: digits with an optional `m` or `h` suffix, stored as seconds
pub(super) fn handle_testtime(
    p: &mut Parser<'_>,
    field: Field,
    value: &str,
) -> Result<(), ParseError> {
    if field.is_set(&p.info) {
        return already_defined(p, field);
    }

    let parsed = TEST_TIME_RE.captures(value).and_then(|caps| {
        let digits = caps[1].parse::<u64>().ok()?;
        Some((digits, caps.get(2).map_or("", |m| m.as_str()).to_string()))
    });

    let Some((digits, suffix)) = parsed else {
        return p.error(
            DiagnosticKind::InvalidValue,
            format!("Malformed {} field", field.key()),
        );
    };

    let multiplier = match suffix.as_str() {
        "" => 1,
        "m" => 60,
        "h" => 3600,
        _ => {
            p.info.avg_test_time = Some(digits);
            return p.warning(
                DiagnosticKind::UnitSuffix,
                "TestTime unit is not valid, should be m (minutes) or h (hours)",
            );
        }
    };

    let Some(seconds) = digits.checked_mul(multiplier) else {
        return p.error(
            DiagnosticKind::InvalidValue,
            format!("Malformed {} field", field.key()),
        );
    };

    p.info.avg_test_time = Some(seconds);
    if seconds < 60 {
        return p.warning(
            DiagnosticKind::ShortDuration,
            "TestTime should not be less than a minute",
        );
    }
    Ok(())
}

/// Path: relative paths are placed below the tests root
///
/// A repeated Path is reported, and the new value is still checked, but
/// the first value is kept.
pub(super) fn handle_path(p: &mut Parser<'_>, field: Field, value: &str) -> Result<(), ParseError> {
    let duplicate = field.is_set(&p.info);
    if duplicate {
        already_defined(p, field)?;
    }

    let absolute_path = if value.starts_with(TESTS_ROOT) {
        value.to_string()
    } else {
        if value.starts_with('/') {
            p.error(
                DiagnosticKind::InvalidValue,
                "Path field is absolute but is not below /mnt/tests",
            )?;
        }
        format!("{}{}", TESTS_ROOT, value)
    };

    if !duplicate {
        p.info.test_path = Some(absolute_path);
    }
    Ok(())
}

/// Type, RunFor, Requires, RhtsRequires and Provides accumulate across lines
pub(super) fn handle_append_list(
    p: &mut Parser<'_>,
    field: Field,
    value: &str,
) -> Result<(), ParseError> {
    list_slot(&mut p.info, field).extend(tokens(value));
    Ok(())
}

/// Bug and Bugs: each token must be a positive integer
pub(super) fn handle_bug(p: &mut Parser<'_>, _field: Field, value: &str) -> Result<(), ParseError> {
    for bug in value.split_whitespace() {
        match bug.parse::<u64>().ok().filter(|_| BUG_RE.is_match(bug)) {
            Some(id) => p.info.bugs.push(id),
            None => p.error(
                DiagnosticKind::InvalidValue,
                format!("\"{}\" is not a valid Bug value (should be numeric)", bug),
            )?,
        }
    }
    Ok(())
}

pub(super) fn handle_needproperty(
    p: &mut Parser<'_>,
    field: Field,
    value: &str,
) -> Result<(), ParseError> {
    let property = NEED_PROPERTY_RE.captures(value).and_then(|caps| {
        let op = caps[2].parse::<Comparison>().ok()?;
        Some(NeedProperty::new(&caps[1], op, &caps[3]))
    });

    match property {
        Some(property) => {
            p.info.needs.push(value.to_string());
            p.info.need_properties.push(property);
            Ok(())
        }
        None => p.error(
            DiagnosticKind::InvalidValue,
            format!(
                "\"{}\" is not a valid {} field; must be of the form PROPERTYNAME {{=|>|>=|<|<=}} PROPERTYVALUE",
                value,
                field.key()
            ),
        ),
    }
}

/// Kickstart: last occurrence wins
pub(super) fn handle_kickstart(
    p: &mut Parser<'_>,
    _field: Field,
    value: &str,
) -> Result<(), ParseError> {
    p.info.kickstart = Some(value.to_string());
    Ok(())
}

/// Notify: accepted but ignored
pub(super) fn handle_deprecated(
    p: &mut Parser<'_>,
    field: Field,
    _value: &str,
) -> Result<(), ParseError> {
    p.warning(
        DiagnosticKind::DeprecatedField,
        format!("{} field is deprecated", field.key()),
    )
}

/// Need, Want and WantProperty: superseded by NeedProperty
pub(super) fn handle_deprecated_for_needproperty(
    p: &mut Parser<'_>,
    field: Field,
    _value: &str,
) -> Result<(), ParseError> {
    p.error(
        DiagnosticKind::DeprecatedField,
        format!("{} field is deprecated.  Use NeedProperty instead", field.key()),
    )
}
