//! Resume / biodata preview.
//!
//! Six text fields are mirrored one-way into a preview. The preview is
//! recomputed in full on every edit; an empty field shows its placeholder,
//! anything else (whitespace included) is shown exactly as typed.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("unknown resume field '{0}'")]
pub struct UnknownField(pub String);

/// The fixed set of resume fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeField {
    Name,
    Job,
    Contact,
    Address,
    Education,
    Experience,
}

impl ResumeField {
    pub const ALL: [ResumeField; 6] = [
        ResumeField::Name,
        ResumeField::Job,
        ResumeField::Contact,
        ResumeField::Address,
        ResumeField::Education,
        ResumeField::Experience,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ResumeField::Name => "name",
            ResumeField::Job => "job",
            ResumeField::Contact => "contact",
            ResumeField::Address => "address",
            ResumeField::Education => "education",
            ResumeField::Experience => "experience",
        }
    }

    /// Placeholder shown while the field is empty.
    pub fn placeholder(self) -> &'static str {
        match self {
            ResumeField::Name => "Your Name",
            ResumeField::Job => "Designation",
            ResumeField::Contact => "Phone | Email",
            ResumeField::Address => "Address will appear here...",
            ResumeField::Education => "Education Details...",
            ResumeField::Experience => "Experience Details...",
        }
    }
}

impl fmt::Display for ResumeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ResumeField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResumeField::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Raw field text as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumeInput {
    fields: BTreeMap<ResumeField, String>,
}

impl ResumeInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: ResumeField, text: &str) {
        self.fields.insert(field, text.to_string());
    }

    pub fn get(&self, field: ResumeField) -> &str {
        self.fields.get(&field).map(String::as_str).unwrap_or("")
    }
}

/// What the preview displays for each field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeView {
    pub name: String,
    pub job: String,
    pub contact: String,
    pub address: String,
    pub education: String,
    pub experience: String,
}

impl ResumeView {
    /// Derive the full view from the current input.
    pub fn mirror(input: &ResumeInput) -> Self {
        let show = |field: ResumeField| {
            let text = input.get(field);
            if text.is_empty() {
                field.placeholder().to_string()
            } else {
                text.to_string()
            }
        };
        Self {
            name: show(ResumeField::Name),
            job: show(ResumeField::Job),
            contact: show(ResumeField::Contact),
            address: show(ResumeField::Address),
            education: show(ResumeField::Education),
            experience: show(ResumeField::Experience),
        }
    }

    pub fn get(&self, field: ResumeField) -> &str {
        match field {
            ResumeField::Name => &self.name,
            ResumeField::Job => &self.job,
            ResumeField::Contact => &self.contact,
            ResumeField::Address => &self.address,
            ResumeField::Education => &self.education,
            ResumeField::Experience => &self.experience,
        }
    }
}

/// Input plus the view derived from it, refreshed on every edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeMirror {
    input: ResumeInput,
    view: ResumeView,
}

impl Default for ResumeMirror {
    fn default() -> Self {
        let input = ResumeInput::new();
        let view = ResumeView::mirror(&input);
        Self { input, view }
    }
}

impl ResumeMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one edit and recompute the whole view.
    pub fn edit(&mut self, field: ResumeField, text: &str) -> &ResumeView {
        self.input.set(field, text);
        self.view = ResumeView::mirror(&self.input);
        &self.view
    }

    pub fn view(&self) -> &ResumeView {
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_job_shows_placeholder() {
        let mirror = ResumeMirror::new();
        assert_eq!(mirror.view().job, "Designation");
    }

    #[test]
    fn typed_job_is_mirrored() {
        let mut mirror = ResumeMirror::new();
        assert_eq!(mirror.edit(ResumeField::Job, "Engineer").job, "Engineer");
    }

    #[test]
    fn clearing_field_restores_placeholder() {
        let mut mirror = ResumeMirror::new();
        mirror.edit(ResumeField::Name, "Priya");
        assert_eq!(mirror.edit(ResumeField::Name, "").name, "Your Name");
    }

    #[test]
    fn whitespace_is_shown_raw() {
        let mut mirror = ResumeMirror::new();
        assert_eq!(mirror.edit(ResumeField::Address, "  ").address, "  ");
    }

    #[test]
    fn edit_does_not_touch_other_fields() {
        let mut mirror = ResumeMirror::new();
        mirror.edit(ResumeField::Education, "B.Sc");
        let view = mirror.edit(ResumeField::Contact, "98200 00000");
        assert_eq!(view.education, "B.Sc");
        assert_eq!(view.contact, "98200 00000");
        assert_eq!(view.experience, "Experience Details...");
    }

    #[test]
    fn all_placeholders() {
        let view = ResumeView::mirror(&ResumeInput::new());
        let shown: Vec<&str> = ResumeField::ALL.iter().map(|f| view.get(*f)).collect();
        assert_eq!(
            shown,
            vec![
                "Your Name",
                "Designation",
                "Phone | Email",
                "Address will appear here...",
                "Education Details...",
                "Experience Details...",
            ]
        );
    }

    #[test]
    fn field_keys_roundtrip() {
        for field in ResumeField::ALL {
            assert_eq!(field.key().parse::<ResumeField>().unwrap(), field);
        }
        assert!("hobbies".parse::<ResumeField>().is_err());
    }
}
