//! UK postcode clean-up and the static postcode-to-region table.

use regex::Regex;
use std::sync::LazyLock;

/// Region used when no rule in the table matches.
pub const OTHER_REGION: &str = "Other";

static POSTCODE_IN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([A-Z]{1,2}[0-9][A-Z0-9]?)\s*([0-9][A-Z]{2})\b")
        .expect("postcode pattern compiles")
});

static FULL_POSTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z]{1,2}[0-9][A-Z0-9]?)([0-9][A-Z]{2})$").expect("postcode pattern compiles")
});

static OUTWARD_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{1,2}[0-9][A-Z0-9]?$").expect("outward pattern compiles")
});

/// Normalise a stored postcode: upper case, a single space before the inward code.
///
/// Values that do not look like a postcode are upper-cased and whitespace
/// collapsed, but otherwise kept as entered. Blank input gives `None`.
pub fn normalize(raw: &str) -> Option<String> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    if compact.is_empty() {
        return None;
    }
    if let Some(caps) = FULL_POSTCODE.captures(&compact) {
        return Some(format!("{} {}", &caps[1], &caps[2]));
    }
    if OUTWARD_ONLY.is_match(&compact) {
        return Some(compact);
    }
    Some(raw.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase())
}

/// Pull the first postcode-shaped substring out of a free-text address.
pub fn extract_from_address(address: &str) -> Option<String> {
    POSTCODE_IN_TEXT
        .captures(address)
        .map(|caps| format!("{} {}", caps[1].to_uppercase(), caps[2].to_uppercase()))
}

/// The dedicated postcode field wins when it looks like a postcode.
///
/// A field holding something else (say "N/A") only wins when the address has
/// no postcode either; it is then kept as entered.
pub fn resolve(postcode: Option<&str>, address: Option<&str>) -> Option<String> {
    match postcode.and_then(normalize) {
        Some(code) if is_postcode_shaped(&code) => Some(code),
        field => address.and_then(extract_from_address).or(field),
    }
}

fn is_postcode_shaped(code: &str) -> bool {
    let compact: String = code.chars().filter(|c| !c.is_whitespace()).collect();
    FULL_POSTCODE.is_match(&compact) || OUTWARD_ONLY.is_match(&compact)
}

/// Which part of a postcode a rule matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixRule {
    /// Postcode area letters, e.g. `B`.
    Area(&'static str),
    /// Inclusive range of district numbers in an area, e.g. `WS1`..`WS15`.
    Districts { area: &'static str, from: u32, to: u32 },
    /// A single sector of a district, e.g. `B74 2`.
    Sector { area: &'static str, district: u32, sector: u32 },
}

impl PrefixRule {
    /// Higher wins when several rules match the same postcode.
    fn specificity(&self) -> u8 {
        match self {
            PrefixRule::Area(_) => 1,
            PrefixRule::Districts { .. } => 2,
            PrefixRule::Sector { .. } => 3,
        }
    }

    fn matches(&self, parts: &PostcodeParts) -> bool {
        match *self {
            PrefixRule::Area(area) => parts.area == area,
            PrefixRule::Districts { area, from, to } => {
                parts.area == area && parts.district.is_some_and(|d| (from..=to).contains(&d))
            }
            PrefixRule::Sector { area, district, sector } => {
                parts.area == area && parts.district == Some(district) && parts.sector == Some(sector)
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RegionRule {
    pub rule: PrefixRule,
    pub region: &'static str,
}

pub const REGION_TABLE: &[RegionRule] = &[
    RegionRule { rule: PrefixRule::Districts { area: "WS", from: 1, to: 15 }, region: "Walsall" },
    RegionRule { rule: PrefixRule::Sector { area: "B", district: 74, sector: 2 }, region: "Streetly" },
    RegionRule { rule: PrefixRule::Sector { area: "B", district: 74, sector: 3 }, region: "Streetly" },
    RegionRule { rule: PrefixRule::Districts { area: "B", from: 72, to: 76 }, region: "Sutton Coldfield" },
    RegionRule { rule: PrefixRule::Area("B"), region: "Birmingham" },
    RegionRule { rule: PrefixRule::Area("WV"), region: "Wolverhampton" },
    RegionRule { rule: PrefixRule::Area("DY"), region: "Dudley" },
];

struct PostcodeParts<'a> {
    area: &'a str,
    district: Option<u32>,
    sector: Option<u32>,
}

fn split(postcode: &str) -> PostcodeParts<'_> {
    let mut halves = postcode.split_whitespace();
    let outward = halves.next().unwrap_or("");
    let inward = halves.next().unwrap_or("");

    let letters_end = outward
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(outward.len());
    let area = &outward[..letters_end];
    let digits: String = outward[letters_end..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();

    PostcodeParts {
        area,
        district: digits.parse().ok(),
        sector: inward.chars().next().and_then(|c| c.to_digit(10)),
    }
}

/// Region for a normalised postcode, using the most specific matching rule.
pub fn region_for(postcode: &str) -> &'static str {
    region_in(REGION_TABLE, postcode)
}

pub fn region_in(table: &[RegionRule], postcode: &str) -> &'static str {
    let upper = postcode.trim().to_uppercase();
    let parts = split(&upper);
    table
        .iter()
        .filter(|r| r.rule.matches(&parts))
        .max_by_key(|r| r.rule.specificity())
        .map(|r| r.region)
        .unwrap_or(OTHER_REGION)
}
