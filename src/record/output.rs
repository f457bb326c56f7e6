use super::TestInfo;
use std::io::{self, Write};

/// Render a record as canonical testinfo.desc lines
///
/// Fields are emitted in a fixed order and unset or empty fields are left
/// out entirely. Lines carry no trailing newline.
pub fn serialize(info: &TestInfo) -> Vec<String> {
    let mut out = Lines::default();

    out.string("Name", &info.test_name);
    out.string("Description", &info.test_description);
    out.list("Architectures", &info.test_archs);
    out.string("Owner", &info.owner);
    out.string("TestVersion", &info.test_version);
    out.list("Releases", &info.releases);
    out.string("Priority", &info.priority);
    out.boolean("Destructive", info.destructive);
    out.string("License", &info.license);
    out.boolean("Confidential", info.confidential);
    out.string("TestTime", &info.avg_test_time.map(|secs| secs.to_string()));
    out.string("Path", &info.test_path);
    out.list("Requires", &info.requires);
    out.list("RhtsRequires", &info.rhtsrequires);
    out.list("RunFor", &info.runfor);
    out.list("Bugs", &info.bugs);
    out.list("Type", &info.types);
    out.list("RhtsOptions", &info.options);

    for (key, value) in info.environment.iter() {
        if !value.is_empty() {
            out.push("Environment", &format!("{}={}", key, value));
        }
    }

    out.list("Provides", &info.provides);

    for property in &info.need_properties {
        out.push("NeedProperty", &property.to_string());
    }

    out.lines.extend(info.siteconfig_lines());
    out.lines
}

#[derive(Default)]
struct Lines {
    lines: Vec<String>,
}

impl Lines {
    fn push(&mut self, field: &str, value: &str) {
        self.lines.push(format!("{}: {}", field, value));
    }

    fn string(&mut self, field: &str, value: &Option<String>) {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            self.push(field, value);
        }
    }

    fn list<T: ToString>(&mut self, field: &str, values: &[T]) {
        if !values.is_empty() {
            let joined: Vec<String> = values.iter().map(ToString::to_string).collect();
            self.push(field, &joined.join(" "));
        }
    }

    fn boolean(&mut self, field: &str, value: Option<bool>) {
        if let Some(value) = value {
            self.push(field, if value { "yes" } else { "no" });
        }
    }
}

impl TestInfo {
    /// SiteConfig declarations, relative to the test name where possible
    ///
    /// Paths below `<name>/` lose that prefix; all other paths are written
    /// out as absolute declarations.
    pub fn siteconfig_lines(&self) -> Vec<String> {
        let prefix = self
            .test_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(|name| format!("{}/", name));

        self.siteconfig
            .iter()
            .map(|entry| {
                let arg = prefix
                    .as_deref()
                    .and_then(|p| entry.path.strip_prefix(p))
                    .unwrap_or(&entry.path);
                format!("SiteConfig({}): {}", arg, entry.description)
            })
            .collect()
    }

    /// The canonical text as one blob, each line terminated by `\n`
    pub fn to_desc_string(&self) -> String {
        serialize(self)
            .into_iter()
            .map(|line| line + "\n")
            .collect()
    }

    /// Write the canonical text to `writer`
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for line in serialize(self) {
            writeln!(writer, "{}", line)?;
        }
        Ok(())
    }
}
