use serde::{Deserialize, Serialize};
use std::fmt;

/// A navigable page section. Only these anchors exist on the page, so any
/// other identifier coming out of a reply stream is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Contact,
    Education,
    Skills,
    Experience,
    Projects,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Contact,
        Section::Education,
        Section::Skills,
        Section::Experience,
        Section::Projects,
    ];

    /// DOM anchor id of the section.
    pub fn anchor(&self) -> &'static str {
        match self {
            Section::Contact => "contact",
            Section::Education => "education",
            Section::Skills => "skills",
            Section::Experience => "experience",
            Section::Projects => "projects",
        }
    }

    /// Text shown on the source badge.
    pub fn label(&self) -> &'static str {
        match self {
            Section::Contact => "Contact",
            Section::Education => "Education",
            Section::Skills => "Skills",
            Section::Experience => "Experience",
            Section::Projects => "Projects",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.anchor())
    }
}

impl std::str::FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Section::ALL
            .into_iter()
            .find(|section| section.anchor().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown section: {}", s))
    }
}
