//! Release descriptor text formatting.
//!
//! The field order and key strings in both documents are consumed by
//! package-management clients and must not be reordered or relabeled.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;

/// Timestamp format used for the `Date:` field (RFC-1123 style, UTC).
const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S UTC";

/// The per-directory descriptor fragment written next to each index.
#[derive(Debug, Clone)]
pub struct ComponentRelease {
    /// Archive (release) name.
    pub archive: String,
    /// Repository origin, also used as the label.
    pub origin: String,
    /// Display version.
    pub version: String,
    /// Component name.
    pub component: String,
    /// Architecture tag.
    pub architecture: String,
}

impl fmt::Display for ComponentRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Archive: {}", self.archive)?;
        writeln!(f, "Origin: {}", self.origin)?;
        writeln!(f, "Label: {}", self.origin)?;
        writeln!(f, "Version: {}", self.version)?;
        writeln!(f, "Component: {}", self.component)?;
        writeln!(f, "Architecture: {}", self.architecture)
    }
}

/// The top-level release descriptor for one distribution.
#[derive(Debug, Clone)]
pub struct ReleaseDescriptor {
    /// Repository origin, also used as the label.
    pub origin: String,
    /// Suite and codename.
    pub suite: String,
    /// Display version.
    pub version: String,
    /// Generation time.
    pub date: DateTime<Utc>,
    /// Architectures present in the indexed tree.
    pub architectures: BTreeSet<String>,
    /// Components present in the pool.
    pub components: BTreeSet<String>,
    /// Multi-algorithm checksum table, embedded verbatim.
    pub checksums: String,
}

impl ReleaseDescriptor {
    fn join(set: &BTreeSet<String>) -> String {
        set.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
    }
}

impl fmt::Display for ReleaseDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Origin: {}", self.origin)?;
        writeln!(f, "Label: {}", self.origin)?;
        writeln!(f, "Suite: {}", self.suite)?;
        writeln!(f, "Version: {}", self.version)?;
        writeln!(f, "Codename: {}", self.suite)?;
        writeln!(f, "Date: {}", self.date.format(DATE_FORMAT))?;
        writeln!(f, "Architectures: {}", Self::join(&self.architectures))?;
        writeln!(f, "Components: {}", Self::join(&self.components))?;
        writeln!(
            f,
            "Description: {} {} {} ({})",
            self.origin,
            self.suite,
            self.version,
            self.date.format("%Y-%m-%d")
        )?;
        f.write_str(&self.checksums)?;
        if !self.checksums.ends_with('\n') {
            writeln!(f)?;
        }
        Ok(())
    }
}
