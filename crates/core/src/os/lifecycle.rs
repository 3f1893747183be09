use crate::types::OsStatus;
use OsStatus::{Active, Eol, Extended};

const GREEN: &str = "#10b981";
const AMBER: &str = "#f59e0b";
const RED: &str = "#ef4444";
pub const UNKNOWN_COLOR: &str = "#6b7280";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleEntry {
    pub status: OsStatus,
    /// ISO calendar date support ends.
    pub end_of_life: &'static str,
    /// Display name of the recommended target, or `Current`.
    pub upgrade_target: &'static str,
    pub display_color: &'static str,
}

const fn entry(
    status: OsStatus,
    end_of_life: &'static str,
    upgrade_target: &'static str,
) -> LifecycleEntry {
    let display_color = match status {
        OsStatus::Active => GREEN,
        OsStatus::Extended => AMBER,
        OsStatus::Eol => RED,
        OsStatus::Unknown => UNKNOWN_COLOR,
    };
    LifecycleEntry {
        status,
        end_of_life,
        upgrade_target,
        display_color,
    }
}

/// Canonical OS key to lifecycle data.
pub static LIFECYCLE_TABLE: &[(&str, LifecycleEntry)] = &[
    ("windows server 2025", entry(Active, "2034-10-13", "Current")),
    ("windows server 2022", entry(Active, "2031-10-13", "Windows Server 2025")),
    ("windows server 2019", entry(Active, "2029-01-09", "Windows Server 2022")),
    ("windows server 2016", entry(Extended, "2027-01-12", "Windows Server 2022")),
    ("windows server 2012 r2", entry(Eol, "2023-10-10", "Windows Server 2022")),
    ("windows server 2012", entry(Eol, "2023-10-10", "Windows Server 2022")),
    ("windows server 2008 r2", entry(Eol, "2020-01-14", "Windows Server 2022")),
    ("rhel 9", entry(Active, "2032-05-31", "Current")),
    ("rhel 8", entry(Active, "2029-05-31", "RHEL 9")),
    ("rhel 7", entry(Extended, "2024-06-30", "RHEL 8")),
    ("rhel 6", entry(Eol, "2020-11-30", "RHEL 8")),
    ("centos 8", entry(Eol, "2021-12-31", "RHEL 8")),
    ("centos 7", entry(Extended, "2024-06-30", "RHEL 8")),
    ("centos 6", entry(Eol, "2020-11-30", "RHEL 8")),
    ("ubuntu 22.04", entry(Active, "2032-04-01", "Current")),
    ("ubuntu 20.04", entry(Active, "2030-04-01", "Ubuntu 22.04")),
    ("ubuntu 18.04", entry(Extended, "2028-04-01", "Ubuntu 22.04")),
    ("ubuntu 16.04", entry(Eol, "2021-04-01", "Ubuntu 22.04")),
    ("debian 12", entry(Active, "2028-06-01", "Current")),
    ("debian 11", entry(Active, "2026-06-01", "Debian 12")),
    ("debian 10", entry(Extended, "2024-06-01", "Debian 11")),
];

/// Fallback patterns, tried in order against the raw OS text.
///
/// R2 releases must precede their base release: `windows.*2012` also matches
/// "Windows Server 2012 R2".
pub static NORMALIZATION_RULES: &[(&str, &str)] = &[
    (r"(?i)windows.*2025", "windows server 2025"),
    (r"(?i)windows.*2022", "windows server 2022"),
    (r"(?i)windows.*2019", "windows server 2019"),
    (r"(?i)windows.*2016", "windows server 2016"),
    (r"(?i)windows.*2012\s*r2", "windows server 2012 r2"),
    (r"(?i)windows.*2012", "windows server 2012"),
    (r"(?i)windows.*2008\s*r2", "windows server 2008 r2"),
    (r"(?i)rhel.*9", "rhel 9"),
    (r"(?i)rhel.*8", "rhel 8"),
    (r"(?i)rhel.*7", "rhel 7"),
    (r"(?i)rhel.*6", "rhel 6"),
    (r"(?i)centos.*8", "centos 8"),
    (r"(?i)centos.*7", "centos 7"),
    (r"(?i)centos.*6", "centos 6"),
    (r"(?i)ubuntu.*22\.04", "ubuntu 22.04"),
    (r"(?i)ubuntu.*20\.04", "ubuntu 20.04"),
    (r"(?i)ubuntu.*18\.04", "ubuntu 18.04"),
    (r"(?i)ubuntu.*16\.04", "ubuntu 16.04"),
    (r"(?i)debian.*12", "debian 12"),
    (r"(?i)debian.*11", "debian 11"),
    (r"(?i)debian.*10", "debian 10"),
];
