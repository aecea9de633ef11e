//! Configuration categories and their header grammar
//!
//! Each category the merge engine manages has a small grammar:
//!
//! - a coarse header rule, used by the block extractor to find candidate
//!   blocks (case-insensitive, anchored at the start of a line);
//! - a strict identifier rule, used by the identifier resolver to pull the
//!   stable key out of a header;
//! - whether a body may contain blank lines;
//! - whether the management marker may sit on the header line itself, for
//!   categories whose entries are single lines.
//!
//! The grammar is data, not code: the extractor and the resolver are the same
//! for every category.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// One of the configuration categories managed by the merge engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// `interface LoopbackN` blocks
    Loopbacks,
    /// `interface GigabitEthernetN.M` blocks
    SubInterfaces,
    /// `ip prefix-list PL_BGP_*` entries
    PrefixLists,
    /// `route-map RM_BGP_*` sequences
    RouteMaps,
    /// The `router bgp` process block
    Bgp,
}

/// How the identifier of a category is derived from the strict header match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierRule {
    /// The first capture group of the identifier pattern
    Capture,
    /// A fixed identifier; the category has exactly one logical block
    Fixed(&'static str),
}

/// Header grammar of a category
#[derive(Debug)]
pub struct Grammar {
    /// Coarse rule: does this line start a block of the category?
    pub header: Regex,
    /// Strict rule: the full header shape, with the identifier captured
    pub identifier: Regex,
    pub rule: IdentifierRule,
    /// Whether blank lines followed by more indented lines stay in the body
    pub blank_lines_in_body: bool,
    /// Whether the marker counts on the header line (bodiless entries)
    pub marker_in_header: bool,
}

fn grammar(header: &str, identifier: &str, rule: IdentifierRule, blank: bool) -> Grammar {
    Grammar {
        header: Regex::new(header).unwrap(),
        identifier: Regex::new(identifier).unwrap(),
        rule,
        blank_lines_in_body: blank,
        marker_in_header: false,
    }
}

static LOOPBACKS: LazyLock<Grammar> = LazyLock::new(|| {
    grammar(
        r"(?i)^interface\s+Loopback",
        r"(?i)^interface\s+Loopback(\d+)\s*$",
        IdentifierRule::Capture,
        false,
    )
});

static SUB_INTERFACES: LazyLock<Grammar> = LazyLock::new(|| {
    grammar(
        r"(?i)^interface\s+GigabitEthernet\d+\.",
        r"(?i)^interface\s+GigabitEthernet(\d+\.\d+)\s*$",
        IdentifierRule::Capture,
        false,
    )
});

static PREFIX_LISTS: LazyLock<Grammar> = LazyLock::new(|| Grammar {
    marker_in_header: true,
    ..grammar(
        r"(?i)^ip\s+prefix-list\s+PL_BGP_",
        r"(?i)^ip\s+prefix-list\s+(PL_BGP_\S+)(?:\s+.*)?$",
        IdentifierRule::Capture,
        false,
    )
});

static ROUTE_MAPS: LazyLock<Grammar> = LazyLock::new(|| {
    grammar(
        r"(?i)^route-map\s+RM_BGP_",
        r"(?i)^route-map\s+(RM_BGP_\S+)(?:\s+(?:permit|deny))?(?:\s+\d+)?\s*$",
        IdentifierRule::Capture,
        false,
    )
});

static BGP: LazyLock<Grammar> = LazyLock::new(|| {
    grammar(
        r"(?i)^router\s+bgp\b",
        r"(?i)^router\s+bgp\s+\d+(?:\.\d+)?\s*$",
        IdentifierRule::Fixed("default"),
        true,
    )
});

impl Category {
    /// All categories in pipeline order
    pub const ALL: [Category; 5] = [
        Category::Loopbacks,
        Category::SubInterfaces,
        Category::PrefixLists,
        Category::RouteMaps,
        Category::Bgp,
    ];

    /// The name used on the command line and in configuration files
    pub fn name(self) -> &'static str {
        match self {
            Category::Loopbacks => "loopbacks",
            Category::SubInterfaces => "sub-interfaces",
            Category::PrefixLists => "prefix-lists",
            Category::RouteMaps => "route-maps",
            Category::Bgp => "bgp",
        }
    }

    /// File name of the rendered fragment for this category
    pub fn fragment_file(self) -> &'static str {
        match self {
            Category::Loopbacks => "loopbacks_final",
            Category::SubInterfaces => "interfaces_final",
            Category::PrefixLists => "pl_final",
            Category::RouteMaps => "rm_final",
            Category::Bgp => "bgp_final",
        }
    }

    pub fn grammar(self) -> &'static Grammar {
        match self {
            Category::Loopbacks => &LOOPBACKS,
            Category::SubInterfaces => &SUB_INTERFACES,
            Category::PrefixLists => &PREFIX_LISTS,
            Category::RouteMaps => &ROUTE_MAPS,
            Category::Bgp => &BGP,
        }
    }

    /// Whether `line` starts a block of this category
    pub fn matches_header(self, line: &str) -> bool {
        self.grammar().header.is_match(line)
    }

    /// Whether at most one block of this category is modelled per device
    pub fn is_singleton(self) -> bool {
        matches!(self.grammar().rule, IdentifierRule::Fixed(_))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Category::ALL
            .into_iter()
            .find(|category| category.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Category::ALL.iter().map(|c| c.name()).collect();
                format!("unknown category '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}
