//! Training-time categorical code tables.
//!
//! Every categorical form field is a closed enum whose discriminant is the integer the
//! classifier was trained on. The codes are not alphabetical and must never be reordered;
//! `TABLE` lists each field in the order the form displays it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Shared surface of the closed-domain enums so rendering and lookups can stay generic.
pub trait Categorical: Copy + PartialEq + fmt::Debug + 'static {
    const FIELD: CategoricalField;

    fn all() -> &'static [Self];
    fn label(self) -> &'static str;
    fn code(self) -> u8;
    fn from_label(raw: &str) -> Option<Self>;
}

macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident => $field:ident {
            $( $variant:ident = $code:literal => $label:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[repr(u8)]
        pub enum $name {
            $(
                #[serde(rename = $label $(, alias = $alias)*)]
                $variant = $code,
            )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];
            pub const TABLE: &'static [(&'static str, u8)] = &[$(($label, $code)),+];

            pub const fn code(self) -> u8 {
                self as u8
            }

            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            pub fn from_label(raw: &str) -> Option<Self> {
                match raw.trim() {
                    $($label $(| $alias)* => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl Categorical for $name {
            const FIELD: CategoricalField = CategoricalField::$field;

            fn all() -> &'static [Self] {
                Self::ALL
            }

            fn label(self) -> &'static str {
                $name::label(self)
            }

            fn code(self) -> u8 {
                $name::code(self)
            }

            fn from_label(raw: &str) -> Option<Self> {
                $name::from_label(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

categorical! {
    /// Candidate location identifier.
    City => City {
        City1 = 0 => "city_1",
        City2 = 1 => "city_2",
        City3 = 2 => "city_3",
    }
}

categorical! {
    Gender => Gender {
        Male = 1 => "Male",
        Female = 0 => "Female",
        Other = 2 => "Other",
    }
}

categorical! {
    /// Whether the candidate has experience relevant to the role.
    RelevantExperience => RelevantExperience {
        Has = 1 => "Has relevent experience" | "Has",
        Lacks = 0 => "No relevent experience" | "None",
    }
}

categorical! {
    EnrolledUniversity => EnrolledUniversity {
        NoEnrollment = 0 => "no_enrollment" | "NoEnrollment",
        FullTime = 1 => "Full time course" | "FullTime",
        PartTime = 2 => "Part time course" | "PartTime",
    }
}

categorical! {
    EducationLevel => EducationLevel {
        Graduate = 1 => "Graduate",
        Masters = 2 => "Masters",
        Phd = 3 => "PhD",
        Unknown = 0 => "Unknown",
    }
}

categorical! {
    MajorDiscipline => MajorDiscipline {
        Stem = 5 => "STEM",
        Business = 0 => "Business Degree" | "Business",
        Arts = 1 => "Arts",
        Humanities = 2 => "Humanities",
        Other = 3 => "Other",
        Unknown = 4 => "Unknown",
    }
}

categorical! {
    /// Headcount bracket of the candidate's most recent employer.
    CompanySize => CompanySize {
        Unknown = 8 => "Unknown",
        Under10 = 0 => "<10",
        From10To49 = 1 => "10/49",
        From50To99 = 2 => "50-99",
        From100To500 = 3 => "100-500",
        From500To999 = 4 => "500-999",
        From1000To4999 = 5 => "1000-4999",
        From5000To9999 = 6 => "5000-9999",
        Over10000 = 7 => "10000+",
    }
}

categorical! {
    CompanyType => CompanyType {
        Unknown = 0 => "Unknown",
        Private = 4 => "Private",
        Public = 5 => "Public",
        Ngo = 2 => "NGO",
        Startup = 6 => "Startup",
        Other = 1 => "Other",
    }
}

/// Names the categorical inputs of a candidate profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    City,
    Gender,
    #[serde(rename = "relevent_experience", alias = "relevant_experience")]
    RelevantExperience,
    EnrolledUniversity,
    EducationLevel,
    MajorDiscipline,
    CompanySize,
    CompanyType,
}

impl CategoricalField {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::City,
            Self::Gender,
            Self::RelevantExperience,
            Self::EnrolledUniversity,
            Self::EducationLevel,
            Self::MajorDiscipline,
            Self::CompanySize,
            Self::CompanyType,
        ]
    }

    /// Column name used by the training dataset.
    pub const fn name(self) -> &'static str {
        match self {
            Self::City => "city",
            Self::Gender => "gender",
            Self::RelevantExperience => "relevent_experience",
            Self::EnrolledUniversity => "enrolled_university",
            Self::EducationLevel => "education_level",
            Self::MajorDiscipline => "major_discipline",
            Self::CompanySize => "company_size",
            Self::CompanyType => "company_type",
        }
    }

    pub fn from_name(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "relevant_experience" => Some(Self::RelevantExperience),
            other => Self::ordered()
                .into_iter()
                .find(|field| field.name() == other),
        }
    }

    pub const fn table(self) -> &'static [(&'static str, u8)] {
        match self {
            Self::City => City::TABLE,
            Self::Gender => Gender::TABLE,
            Self::RelevantExperience => RelevantExperience::TABLE,
            Self::EnrolledUniversity => EnrolledUniversity::TABLE,
            Self::EducationLevel => EducationLevel::TABLE,
            Self::MajorDiscipline => MajorDiscipline::TABLE,
            Self::CompanySize => CompanySize::TABLE,
            Self::CompanyType => CompanyType::TABLE,
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raised when a label has no entry in its field's code table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("'{value}' is not in the {field} code table")]
    DomainViolation {
        field: CategoricalField,
        value: String,
    },
}

/// Look up the training-time code for `value` in `field`'s table.
///
/// Labels outside the closed domain are rejected; there is no fallback code.
pub fn encode(field: CategoricalField, value: &str) -> Result<u8, EncodingError> {
    let code = match field {
        CategoricalField::City => lookup::<City>(value),
        CategoricalField::Gender => lookup::<Gender>(value),
        CategoricalField::RelevantExperience => lookup::<RelevantExperience>(value),
        CategoricalField::EnrolledUniversity => lookup::<EnrolledUniversity>(value),
        CategoricalField::EducationLevel => lookup::<EducationLevel>(value),
        CategoricalField::MajorDiscipline => lookup::<MajorDiscipline>(value),
        CategoricalField::CompanySize => lookup::<CompanySize>(value),
        CategoricalField::CompanyType => lookup::<CompanyType>(value),
    };

    code.ok_or_else(|| EncodingError::DomainViolation {
        field,
        value: value.to_string(),
    })
}

fn lookup<T: Categorical>(value: &str) -> Option<u8> {
    T::from_label(value).map(T::code)
}
