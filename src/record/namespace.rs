/// Known namespaces and the packages filed under each, in lookup order
pub const NAMESPACES: &[(&str, &[&str])] = &[
    (
        "desktop",
        &["evolution", "openoffice.org", "poppler", "shared-mime-info"],
    ),
    ("tools", &["gcc"]),
    ("CoreOS", &["rpm"]),
    ("cluster", &[]),
    ("rhn", &[]),
];

/// Find the namespace a package belongs to
///
/// Returns the first namespace listing the package, or `None` if no
/// namespace does.
pub fn lookup_namespace(package_name: &str) -> Option<&'static str> {
    NAMESPACES
        .iter()
        .find(|(_, packages)| packages.contains(&package_name))
        .map(|(namespace, _)| *namespace)
}
