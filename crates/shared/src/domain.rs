use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_newtype!(WishId);
id_newtype!(GradeSubmissionId);

/// Letter grade scale used by the grade-prediction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LetterGrade {
    A,
    AB,
    B,
    BC,
    C,
    D,
    E,
}

impl LetterGrade {
    pub const ALL: [LetterGrade; 7] = [
        LetterGrade::A,
        LetterGrade::AB,
        LetterGrade::B,
        LetterGrade::BC,
        LetterGrade::C,
        LetterGrade::D,
        LetterGrade::E,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LetterGrade::A => "A",
            LetterGrade::AB => "AB",
            LetterGrade::B => "B",
            LetterGrade::BC => "BC",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::E => "E",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown letter grade '{0}'")]
pub struct UnknownLetterGrade(pub String);

impl FromStr for LetterGrade {
    type Err = UnknownLetterGrade;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        LetterGrade::ALL
            .into_iter()
            .find(|grade| grade.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownLetterGrade(raw.to_string()))
    }
}
