//! Feature identifiers.
//!
//! A feature id encodes the owning genome, the feature type and a sequence
//! number: `fig|83333.1.peg.4`. Genome ids are themselves two dotted numbers
//! (species and genome), so the type is always the third dotted component
//! after the `fig|` prefix.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Feature type assumed for a bare number in a spreadsheet cell.
pub const DEFAULT_FEATURE_TYPE: &str = "peg";

/// Prefix shared by every feature id.
const FID_PREFIX: &str = "fig|";

fn fid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^fig\|(\d+\.\d+)\.(\w+)\.(\d+)$").expect("feature id pattern is valid")
    })
}

/// A parsed feature identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeatureId {
    /// Genome id, `species.genome`.
    pub genome: String,
    /// Feature type, e.g. `peg` or `rna`.
    pub ftype: String,
    /// Sequence number within the genome and type.
    pub number: u64,
}

impl FeatureId {
    /// Builds the full feature id for a spreadsheet cell token.
    ///
    /// A token containing a `.` is read as `<type>.<number>`; anything else
    /// is a number of the default type. Returns the id and the feature type.
    pub fn from_cell_token(genome_id: &str, token: &str, default_type: &str) -> (String, String) {
        match token.split_once('.') {
            Some((ftype, _)) => (
                format!("{FID_PREFIX}{genome_id}.{token}"),
                ftype.to_string(),
            ),
            None => (
                format!("{FID_PREFIX}{genome_id}.{default_type}.{token}"),
                default_type.to_string(),
            ),
        }
    }

    /// Parses a feature id, returning `None` if it is not well formed.
    pub fn parse(id: &str) -> Option<FeatureId> {
        let caps = fid_pattern().captures(id)?;
        let number = caps[3].parse().ok()?;
        Some(FeatureId {
            genome: caps[1].to_string(),
            ftype: caps[2].to_string(),
            number,
        })
    }
}

impl FromStr for FeatureId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureId::parse(s).ok_or_else(|| CoreError::InvalidFeatureId { id: s.to_string() })
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}.{}.{}", FID_PREFIX, self.genome, self.ftype, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_peg_id() {
        let fid: FeatureId = "fig|83333.1.peg.4135".parse().unwrap();
        assert_eq!(fid.genome, "83333.1");
        assert_eq!(fid.ftype, "peg");
        assert_eq!(fid.number, 4135);
        assert_eq!(fid.to_string(), "fig|83333.1.peg.4135");
    }

    #[test]
    fn parse_rna_id() {
        let fid = FeatureId::parse("fig|100226.1.rna.7").unwrap();
        assert_eq!(fid.ftype, "rna");
        assert_eq!(fid.number, 7);
    }

    #[test]
    fn reject_malformed_ids() {
        assert!(FeatureId::parse("fig|83333.1.peg").is_none());
        assert!(FeatureId::parse("83333.1.peg.4").is_none());
        assert!(FeatureId::parse("fig|83333.peg.4").is_none());
        assert!(FeatureId::parse("fig|83333.1.peg.4x").is_none());
        assert_eq!(
            "bogus".parse::<FeatureId>(),
            Err(CoreError::InvalidFeatureId { id: "bogus".into() })
        );
    }

    #[test]
    fn cell_token_defaults_to_peg() {
        let (fid, ftype) = FeatureId::from_cell_token("123.4", "6", DEFAULT_FEATURE_TYPE);
        assert_eq!(fid, "fig|123.4.peg.6");
        assert_eq!(ftype, "peg");
    }

    #[test]
    fn cell_token_with_type() {
        let (fid, ftype) = FeatureId::from_cell_token("123.4", "rna.7", DEFAULT_FEATURE_TYPE);
        assert_eq!(fid, "fig|123.4.rna.7");
        assert_eq!(ftype, "rna");
    }
}
