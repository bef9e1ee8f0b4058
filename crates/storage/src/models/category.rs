use std::fmt;

use serde::{Serialize, Serializer};

use super::Gender;

/// Age bracket used to group racers for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgeBucket {
    Under6,
    From6,
    From10,
    From14,
    From18,
    From31,
    From45,
}

impl AgeBucket {
    /// Youngest first; results are published in this order.
    pub const ALL: [AgeBucket; 7] = [
        AgeBucket::Under6,
        AgeBucket::From6,
        AgeBucket::From10,
        AgeBucket::From14,
        AgeBucket::From18,
        AgeBucket::From31,
        AgeBucket::From45,
    ];

    pub fn for_age(age: i32) -> Self {
        match age {
            i32::MIN..=5 => AgeBucket::Under6,
            6..=9 => AgeBucket::From6,
            10..=13 => AgeBucket::From10,
            14..=17 => AgeBucket::From14,
            18..=30 => AgeBucket::From18,
            31..=44 => AgeBucket::From31,
            _ => AgeBucket::From45,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            AgeBucket::Under6 => "U6",
            AgeBucket::From6 => "6",
            AgeBucket::From10 => "10",
            AgeBucket::From14 => "14",
            AgeBucket::From18 => "18",
            AgeBucket::From31 => "31",
            AgeBucket::From45 => "45",
        }
    }
}

/// Race category such as `M10` or `FU6`: gender prefix plus age bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Category {
    pub gender: Gender,
    pub bucket: AgeBucket,
}

impl Category {
    pub fn new(age: i32, gender: Gender) -> Self {
        Self {
            gender,
            bucket: AgeBucket::for_age(age),
        }
    }

    /// Category pairs in publication order: MU6, FU6, M6, F6, ...
    pub fn publication_order() -> impl Iterator<Item = Category> {
        AgeBucket::ALL.into_iter().flat_map(|bucket| {
            [Gender::Male, Gender::Female]
                .into_iter()
                .map(move |gender| Category { gender, bucket })
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.gender.prefix(), self.bucket.suffix())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
