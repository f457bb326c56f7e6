//! Read-only vocabularies the field handlers check against.
//!
//! These could be populated from a package database; for now they are fixed.

/// Every test lives below this directory on the test host
pub const TESTS_ROOT: &str = "/mnt/tests/";

pub const VALID_ARCHITECTURES: &[&str] = &[
    "ia64", "x86_64", "ppc", "ppc64", "ppc64le", "s390", "s390x", "i386", "aarch64", "arm",
    "armhfp",
];

pub const VALID_PRIORITIES: &[&str] = &["Low", "Medium", "Normal", "High", "Manual"];

pub const VALID_OPTIONS: &[&str] = &["Compatible", "CompatService", "StrongerAVC"];
