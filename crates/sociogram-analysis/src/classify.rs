//! Friendship-type classification.
//!
//! A student's unique-neighbor connection count maps to one of five ordered
//! buckets:
//!
//! | connections | type |
//! |---|---|
//! | 0 | `isolated` |
//! | 1–2 | `few-friends` |
//! | 3–5 | `average` |
//! | 6–8 | `many-friends` |
//! | 9+ | `social-star` |
//!
//! The thresholds are fixed. [`FriendshipDistribution`] always reports all
//! five buckets, zero counts included.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::normalize::NormalizedGraph;

/// Classification bucket, ordered from least to most connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FriendshipType {
    Isolated,
    FewFriends,
    Average,
    ManyFriends,
    SocialStar,
}

impl FriendshipType {
    /// All buckets in ascending order.
    pub const ALL: [Self; 5] = [
        Self::Isolated,
        Self::FewFriends,
        Self::Average,
        Self::ManyFriends,
        Self::SocialStar,
    ];

    /// Bucket for a unique-neighbor count.
    #[must_use]
    pub const fn from_connections(connections: usize) -> Self {
        match connections {
            0 => Self::Isolated,
            1..=2 => Self::FewFriends,
            3..=5 => Self::Average,
            6..=8 => Self::ManyFriends,
            _ => Self::SocialStar,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Isolated => "isolated",
            Self::FewFriends => "few-friends",
            Self::Average => "average",
            Self::ManyFriends => "many-friends",
            Self::SocialStar => "social-star",
        }
    }
}

impl fmt::Display for FriendshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Histogram of friendship types over a class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendshipDistribution {
    pub isolated: usize,
    #[serde(rename = "few-friends")]
    pub few_friends: usize,
    pub average: usize,
    #[serde(rename = "many-friends")]
    pub many_friends: usize,
    #[serde(rename = "social-star")]
    pub social_star: usize,
}

impl FriendshipDistribution {
    /// Count one more student of type `kind`.
    pub const fn record(&mut self, kind: FriendshipType) {
        match kind {
            FriendshipType::Isolated => self.isolated += 1,
            FriendshipType::FewFriends => self.few_friends += 1,
            FriendshipType::Average => self.average += 1,
            FriendshipType::ManyFriends => self.many_friends += 1,
            FriendshipType::SocialStar => self.social_star += 1,
        }
    }

    #[must_use]
    pub const fn count(&self, kind: FriendshipType) -> usize {
        match kind {
            FriendshipType::Isolated => self.isolated,
            FriendshipType::FewFriends => self.few_friends,
            FriendshipType::Average => self.average,
            FriendshipType::ManyFriends => self.many_friends,
            FriendshipType::SocialStar => self.social_star,
        }
    }

    /// Number of students counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.isolated + self.few_friends + self.average + self.many_friends + self.social_star
    }
}

impl FromIterator<FriendshipType> for FriendshipDistribution {
    fn from_iter<I: IntoIterator<Item = FriendshipType>>(iter: I) -> Self {
        let mut dist = Self::default();
        for kind in iter {
            dist.record(kind);
        }
        dist
    }
}

/// Classify every student in `ng` by unique-neighbor count.
#[must_use]
pub fn classify(ng: &NormalizedGraph) -> HashMap<String, FriendshipType> {
    (0..ng.node_count())
        .map(|i| {
            (
                ng.student_id(i).to_string(),
                FriendshipType::from_connections(ng.degree(i)),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::normalized;

    #[test]
    fn bucket_boundaries() {
        let cases = [
            (0, FriendshipType::Isolated),
            (1, FriendshipType::FewFriends),
            (2, FriendshipType::FewFriends),
            (3, FriendshipType::Average),
            (5, FriendshipType::Average),
            (6, FriendshipType::ManyFriends),
            (8, FriendshipType::ManyFriends),
            (9, FriendshipType::SocialStar),
            (40, FriendshipType::SocialStar),
        ];
        for (connections, expected) in cases {
            assert_eq!(
                FriendshipType::from_connections(connections),
                expected,
                "{connections} connections"
            );
        }
    }

    #[test]
    fn buckets_are_ordered() {
        let mut sorted = FriendshipType::ALL;
        sorted.sort();
        assert_eq!(sorted, FriendshipType::ALL);
        assert!(FriendshipType::Isolated < FriendshipType::SocialStar);
    }

    #[test]
    fn serializes_kebab_case() {
        let json = serde_json::to_string(&FriendshipType::FewFriends).expect("serialize");
        assert_eq!(json, "\"few-friends\"");
        assert_eq!(FriendshipType::SocialStar.to_string(), "social-star");
    }

    #[test]
    fn distribution_always_has_five_keys() {
        let value = serde_json::to_value(FriendshipDistribution::default()).expect("serialize");
        let obj = value.as_object().expect("object");
        assert_eq!(obj.len(), 5);
        for kind in FriendshipType::ALL {
            assert_eq!(obj[kind.as_str()], 0, "{kind}");
        }
    }

    #[test]
    fn parallel_nominations_count_once() {
        let ng = normalized(&["A", "B", "C"], &[("A", "B"), ("A", "B"), ("B", "A")]);
        let types = classify(&ng);
        assert_eq!(types["A"], FriendshipType::FewFriends);
        assert_eq!(types["C"], FriendshipType::Isolated);

        let dist: FriendshipDistribution = types.values().copied().collect();
        assert_eq!(dist.total(), 3);
        assert_eq!(dist.count(FriendshipType::FewFriends), 2);
        assert_eq!(dist.isolated, 1);
    }
}
