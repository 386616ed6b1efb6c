//! Managed record lines.
//!
//! A managed line has the exact shape `<host>\tIN\t<A|AAAA>\t<address>`.
//! Everything else in a zone fragment is opaque and passed through as-is.

use std::fmt;
use std::net::IpAddr;

use crate::error::ValidationError;

/// DNS record type of a managed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
}

impl RecordKind {
    /// Both managed kinds, in the order they are matched.
    pub const ALL: [Self; 2] = [Self::A, Self::Aaaa];

    /// Record type as written in the zone file.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated address and the record kind derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRecord {
    pub address: IpAddr,
    pub kind: RecordKind,
}

impl AddressRecord {
    /// Classify an address.
    ///
    /// Anything with a 4-byte form is an `A` record, including IPv4-mapped
    /// IPv6 addresses, which are stored and written as dotted quads.
    pub fn new(address: IpAddr) -> Self {
        let address = match address {
            IpAddr::V6(v6) => v6.to_ipv4_mapped().map_or(IpAddr::V6(v6), IpAddr::V4),
            v4 @ IpAddr::V4(_) => v4,
        };
        let kind = if address.is_ipv4() {
            RecordKind::A
        } else {
            RecordKind::Aaaa
        };
        Self { address, kind }
    }

    /// Zone file line for this record, newline-terminated.
    pub fn to_line(&self, host: &str) -> String {
        format!("{}{}\n", managed_prefix(host, self.kind), self.address)
    }
}

/// Line prefix that marks a managed record of `kind` for `host`.
pub fn managed_prefix(host: &str, kind: RecordKind) -> String {
    format!("{host}\tIN\t{kind}\t")
}

/// If `line` is a managed record for `host`, return the address part.
fn managed_value<'a>(line: &'a str, host: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(host)?.strip_prefix("\tIN\t")?;
    RecordKind::ALL
        .iter()
        .find_map(|kind| rest.strip_prefix(kind.as_str())?.strip_prefix('\t'))
}

/// Returns true if `line` is an A or AAAA record line for `host`.
pub fn is_managed_line(line: &str, host: &str) -> bool {
    managed_value(line, host).is_some()
}

/// Addresses currently published for `host`, in file order.
///
/// Used for display only: values are returned as written, without
/// validation, and non-matching lines are skipped.
pub fn extract_managed_addresses(content: &str, host: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| managed_value(line, host))
        .map(str::to_owned)
        .collect()
}

/// Parse newline-separated address text into records.
///
/// Lines are trimmed and blank lines skipped. Parsing stops at the first
/// token that is not an IP address.
pub fn parse_and_classify(raw: &str) -> Result<Vec<AddressRecord>, ValidationError> {
    let mut records = Vec::new();

    for line in raw.split('\n') {
        let token = line.trim();
        if token.is_empty() {
            continue;
        }
        let address: IpAddr = token
            .parse()
            .map_err(|_| ValidationError::InvalidAddress(token.to_owned()))?;
        records.push(AddressRecord::new(address));
    }

    if records.is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    Ok(records)
}

/// Render records as zone file lines, one per record, in input order.
pub fn render(host: &str, records: &[AddressRecord]) -> String {
    records.iter().map(|record| record.to_line(host)).collect()
}

/// Remove every managed line for `host`, keeping all other lines in order.
///
/// The result is joined with `\n`, so a trailing newline in `content`
/// survives as a trailing newline here.
pub fn strip_managed(content: &str, host: &str) -> String {
    content
        .split('\n')
        .filter(|line| !is_managed_line(line, host))
        .collect::<Vec<_>>()
        .join("\n")
}
