//! Fixed content the flow is built around: quiz options, course list and the
//! messages shown to the user.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Course {
    pub name: &'static str,
    pub sks: u32,
}

pub const SEMESTER_COURSES: [Course; 7] = [
    Course {
        name: "Kriptografi",
        sks: 3,
    },
    Course {
        name: "Machine Learning",
        sks: 3,
    },
    Course {
        name: "Cyber Security",
        sks: 3,
    },
    Course {
        name: "Desain Interaksi",
        sks: 2,
    },
    Course {
        name: "MPTI",
        sks: 3,
    },
    Course {
        name: "Karier, Etika, dan KWU (ini apadeh?)",
        sks: 2,
    },
    Course {
        name: "Dan matkul lain yg kamu ambil nanti😯",
        sks: 100,
    },
];

pub const WISH_REQUIRED_MESSAGE: &str = "hehehe ini harus diisi 🤓☝️";
pub const GRADES_INCOMPLETE_MESSAGE: &str = "isi dulu indeks nilainya 😏";
pub const WISH_ACCEPTED_NOTICE: &str =
    "Aaaamiiin (gatau kmu masukin asal atau ga tapi aamiinin aja dulu)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizChoice {
    Smiling,
    Neutral,
    Winking,
}

impl QuizChoice {
    /// Display order on the quiz screen.
    pub const ALL: [QuizChoice; 3] = [QuizChoice::Smiling, QuizChoice::Neutral, QuizChoice::Winking];

    pub fn emoji(self) -> &'static str {
        match self {
            QuizChoice::Smiling => "😊",
            QuizChoice::Neutral => "😐",
            QuizChoice::Winking => "😜",
        }
    }

    pub fn is_correct(self) -> bool {
        self == QuizChoice::Neutral
    }

    pub fn from_emoji(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        QuizChoice::ALL.into_iter().find(|choice| choice.emoji() == raw)
    }
}

impl fmt::Display for QuizChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.emoji())
    }
}
