//! Package-manager command snippets.
//!
//! Posts write a single install command and readers pick their package manager.
//! `<PackageManagerTabs installCommand="npm install foo" />` in MDX expands to one
//! snippet per manager.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

static MANAGER_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(npm|yarn|pnpm|bun)\s+").expect("prefix pattern is valid"));

static INSTALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(install|i)\s+").expect("install pattern is valid"));

static UNINSTALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(uninstall|remove|rm)\s+").expect("uninstall pattern is valid")
});

static TABS_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<PackageManagerTabs\b([^>]*?)/>").expect("tabs tag pattern is valid")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\w+)=(?:"([^"]*)"|'([^']*)'|\{"([^"]*)"\}|\{'([^']*)'\})"#)
        .expect("attribute pattern is valid")
});

/// A JavaScript package manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PackageManager {
    #[default]
    Pnpm,
    Npm,
    Yarn,
    Bun,
}

impl PackageManager {
    /// All managers, in tab order.
    pub const ALL: [PackageManager; 4] = [Self::Pnpm, Self::Npm, Self::Yarn, Self::Bun];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pnpm => "pnpm",
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Bun => "bun",
        }
    }

    fn add_verb(&self) -> &'static str {
        match self {
            Self::Npm => "install",
            Self::Pnpm | Self::Yarn | Self::Bun => "add",
        }
    }

    fn remove_verb(&self) -> &'static str {
        match self {
            Self::Npm => "uninstall",
            Self::Pnpm | Self::Yarn | Self::Bun => "remove",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PackageManager {
    type Err = UnknownPackageManager;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pnpm" => Ok(Self::Pnpm),
            "npm" => Ok(Self::Npm),
            "yarn" => Ok(Self::Yarn),
            "bun" => Ok(Self::Bun),
            _ => Err(UnknownPackageManager(s.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown package manager: {0} (expected pnpm, npm, yarn or bun)")]
pub struct UnknownPackageManager(pub String);

/// Rewrite a command for the given package manager.
///
/// Install and uninstall commands get the manager's own verb; anything else just
/// swaps the leading manager name.
pub fn convert_command(command: &str, manager: PackageManager) -> String {
    let clean = MANAGER_PREFIX_RE.replace(command, "");
    let clean = clean.trim();

    if clean.starts_with("install ") || clean.starts_with("i ") {
        let packages = INSTALL_RE.replace(clean, "");
        return format!("{} {} {}", manager, manager.add_verb(), packages);
    }

    if clean.starts_with("uninstall ") || clean.starts_with("remove ") || clean.starts_with("rm ")
    {
        let packages = UNINSTALL_RE.replace(clean, "");
        return format!("{} {} {}", manager, manager.remove_verb(), packages);
    }

    format!("{} {}", manager, clean)
}

/// A `<PackageManagerTabs />` element found in post content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManagerTabs {
    pub install_command: String,
    pub uninstall_command: Option<String>,
}

impl PackageManagerTabs {
    /// The snippet shown under one manager's tab.
    pub fn snippet_for(&self, manager: PackageManager) -> String {
        std::iter::once(self.install_command.as_str())
            .chain(self.uninstall_command.as_deref())
            .map(|cmd| convert_command(cmd, manager))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// A tabs element and the byte range it occupies in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabsMatch {
    pub start: usize,
    pub end: usize,
    pub tabs: PackageManagerTabs,
}

/// Find every `<PackageManagerTabs ... />` element in `content`.
///
/// Elements without an `installCommand` attribute are ignored.
pub fn find_tabs(content: &str) -> Vec<TabsMatch> {
    TABS_TAG_RE
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let tabs = parse_attributes(&caps[1])?;
            Some(TabsMatch {
                start: whole.start(),
                end: whole.end(),
                tabs,
            })
        })
        .collect()
}

fn parse_attributes(attrs: &str) -> Option<PackageManagerTabs> {
    let mut install = None;
    let mut uninstall = None;

    for caps in ATTR_RE.captures_iter(attrs) {
        let value = (2..=5)
            .find_map(|i| caps.get(i))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        match &caps[1] {
            "installCommand" => install = Some(value),
            "uninstallCommand" if !value.is_empty() => uninstall = Some(value),
            _ => {}
        }
    }

    Some(PackageManagerTabs {
        install_command: install?,
        uninstall_command: uninstall,
    })
}
