//! Form values for the "add entry" and "add patient" modals.
//!
//! The values are raw user input and belong to the caller, so a failed submission never loses
//! them. `validate` turns them into the payload the backend expects.

use crate::error::{FormError, FormResult};
use patientor_core::{
    Discharge, EntryKind, EntryType, Gender, HealthCheckRating, IsoDate, NewEntry, NewPatient,
    NonEmptyText, SickLeave,
};

/// Raw input of the "add entry" form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFormValues {
    pub entry_type: EntryType,
    pub description: String,
    pub date: String,
    pub specialist: String,
    pub diagnosis_codes: Vec<String>,
    pub health_check_rating: Option<u8>,
    pub discharge_date: String,
    pub discharge_criteria: String,
    pub employer_name: String,
    pub sick_leave_start: String,
    pub sick_leave_end: String,
}

impl Default for EntryFormValues {
    fn default() -> Self {
        Self {
            entry_type: EntryType::HealthCheck,
            description: String::new(),
            date: String::new(),
            specialist: String::new(),
            diagnosis_codes: Vec::new(),
            health_check_rating: None,
            discharge_date: String::new(),
            discharge_criteria: String::new(),
            employer_name: String::new(),
            sick_leave_start: String::new(),
            sick_leave_end: String::new(),
        }
    }
}

impl EntryFormValues {
    /// Check the input and build a `NewEntry`.
    ///
    /// Text fields are trimmed. Diagnosis codes are trimmed, blanks dropped and duplicates
    /// removed keeping the first occurrence.
    pub fn validate(&self) -> FormResult<NewEntry> {
        let description = required("description", &self.description)?;
        let specialist = required("specialist", &self.specialist)?;
        let date = date("date", &self.date)?;

        if self.entry_type != EntryType::HealthCheck && self.health_check_rating.is_some() {
            return Err(FormError::RatingNotAllowed(self.entry_type));
        }

        let kind = match self.entry_type {
            EntryType::HealthCheck => EntryKind::HealthCheck {
                health_check_rating: self
                    .health_check_rating
                    .map(|r| HealthCheckRating::try_from(r).map_err(|_| FormError::InvalidRating(r)))
                    .transpose()?,
            },
            EntryType::Hospital => EntryKind::Hospital {
                discharge: self.discharge()?,
            },
            EntryType::OccupationalHealthcare => EntryKind::OccupationalHealthcare {
                employer_name: optional(&self.employer_name),
                sick_leave: self.sick_leave()?,
            },
        };

        let mut codes: Vec<String> = Vec::new();
        for code in self.diagnosis_codes.iter().map(|c| c.trim()) {
            if !code.is_empty() && !codes.iter().any(|c| c == code) {
                codes.push(code.to_owned());
            }
        }

        Ok(NewEntry {
            description: description.into_string(),
            date: date.to_string(),
            specialist: specialist.into_string(),
            diagnosis_codes: (!codes.is_empty()).then_some(codes),
            kind,
        })
    }

    fn discharge(&self) -> FormResult<Option<Discharge>> {
        match (optional(&self.discharge_date), optional(&self.discharge_criteria)) {
            (None, None) => Ok(None),
            (Some(d), Some(criteria)) => Ok(Some(Discharge {
                date: date("discharge date", &d)?.to_string(),
                criteria,
            })),
            _ => Err(FormError::IncompleteDischarge),
        }
    }

    fn sick_leave(&self) -> FormResult<Option<SickLeave>> {
        match (optional(&self.sick_leave_start), optional(&self.sick_leave_end)) {
            (None, None) => Ok(None),
            (Some(start), Some(end)) => {
                let start = date("sick leave start", &start)?;
                let end = date("sick leave end", &end)?;
                if end < start {
                    return Err(FormError::SickLeaveEndsBeforeStart);
                }
                Ok(Some(SickLeave {
                    start_date: start.to_string(),
                    end_date: end.to_string(),
                }))
            }
            _ => Err(FormError::IncompleteSickLeave),
        }
    }
}

/// Raw input of the "add patient" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientFormValues {
    pub name: String,
    pub occupation: String,
    pub gender: String,
    pub ssn: String,
    pub date_of_birth: String,
}

impl PatientFormValues {
    pub fn validate(&self) -> FormResult<NewPatient> {
        let name = required("name", &self.name)?;
        let occupation = required("occupation", &self.occupation)?;
        let gender: Gender = self
            .gender
            .parse()
            .map_err(|_| FormError::InvalidGender(self.gender.clone()))?;
        let date_of_birth = optional(&self.date_of_birth)
            .map(|d| date("date of birth", &d))
            .transpose()?;

        Ok(NewPatient {
            name: name.into_string(),
            occupation: occupation.into_string(),
            gender,
            ssn: optional(&self.ssn),
            date_of_birth: date_of_birth.map(|d| d.to_string()),
        })
    }
}

fn required(field: &'static str, value: &str) -> FormResult<NonEmptyText> {
    NonEmptyText::new(value).map_err(|_| FormError::Missing(field))
}

fn optional(value: &str) -> Option<String> {
    NonEmptyText::new(value).ok().map(NonEmptyText::into_string)
}

fn date(field: &'static str, value: &str) -> FormResult<IsoDate> {
    if value.trim().is_empty() {
        return Err(FormError::Missing(field));
    }
    IsoDate::parse(value).map_err(|_| FormError::InvalidDate {
        field,
        value: value.trim().to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(entry_type: EntryType) -> EntryFormValues {
        EntryFormValues {
            entry_type,
            description: " Yearly control visit. ".into(),
            date: "2019-10-20".into(),
            specialist: "MD House".into(),
            ..EntryFormValues::default()
        }
    }

    #[test]
    fn builds_health_check_entry() {
        let values = EntryFormValues {
            health_check_rating: Some(2),
            diagnosis_codes: vec!["Z57.1".into(), " ".into(), " Z57.1 ".into(), "M24.2".into()],
            ..base(EntryType::HealthCheck)
        };
        let entry = values.validate().unwrap();
        assert_eq!(entry.description, "Yearly control visit.");
        assert_eq!(
            entry.kind,
            EntryKind::HealthCheck {
                health_check_rating: Some(HealthCheckRating::HighRisk)
            }
        );
        assert_eq!(
            entry.diagnosis_codes,
            Some(vec!["Z57.1".to_string(), "M24.2".to_string()])
        );
    }

    #[test]
    fn requires_description_and_specialist() {
        let values = EntryFormValues {
            description: "   ".into(),
            ..base(EntryType::Hospital)
        };
        assert_eq!(values.validate(), Err(FormError::Missing("description")));

        let values = EntryFormValues {
            specialist: String::new(),
            ..base(EntryType::Hospital)
        };
        assert_eq!(values.validate(), Err(FormError::Missing("specialist")));
    }

    #[test]
    fn rejects_bad_date() {
        let values = EntryFormValues {
            date: "20.10.2019".into(),
            ..base(EntryType::HealthCheck)
        };
        assert!(matches!(
            values.validate(),
            Err(FormError::InvalidDate { field: "date", .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_rating() {
        let values = EntryFormValues {
            health_check_rating: Some(4),
            ..base(EntryType::HealthCheck)
        };
        assert_eq!(values.validate(), Err(FormError::InvalidRating(4)));
    }

    #[test]
    fn rating_only_on_health_checks() {
        let values = EntryFormValues {
            health_check_rating: Some(1),
            ..base(EntryType::OccupationalHealthcare)
        };
        assert_eq!(
            values.validate(),
            Err(FormError::RatingNotAllowed(EntryType::OccupationalHealthcare))
        );
    }

    #[test]
    fn hospital_discharge_needs_both_fields() {
        let values = EntryFormValues {
            discharge_date: "2015-01-16".into(),
            ..base(EntryType::Hospital)
        };
        assert_eq!(values.validate(), Err(FormError::IncompleteDischarge));

        let values = EntryFormValues {
            discharge_date: "2015-01-16".into(),
            discharge_criteria: "Thumb has healed.".into(),
            ..base(EntryType::Hospital)
        };
        let entry = values.validate().unwrap();
        assert_eq!(
            entry.kind,
            EntryKind::Hospital {
                discharge: Some(Discharge {
                    date: "2015-01-16".into(),
                    criteria: "Thumb has healed.".into()
                })
            }
        );
    }

    #[test]
    fn sick_leave_must_be_ordered() {
        let values = EntryFormValues {
            employer_name: "HyPD".into(),
            sick_leave_start: "2019-08-28".into(),
            sick_leave_end: "2019-08-05".into(),
            ..base(EntryType::OccupationalHealthcare)
        };
        assert_eq!(values.validate(), Err(FormError::SickLeaveEndsBeforeStart));
    }

    #[test]
    fn validation_leaves_values_untouched() {
        let values = EntryFormValues {
            date: "bad".into(),
            ..base(EntryType::HealthCheck)
        };
        let before = values.clone();
        assert!(values.validate().is_err());
        assert_eq!(values, before);
    }

    #[test]
    fn builds_new_patient() {
        let values = PatientFormValues {
            name: "Martin Riggs".into(),
            occupation: "Cop".into(),
            gender: "male".into(),
            ssn: " ".into(),
            date_of_birth: "1979-01-30".into(),
        };
        let patient = values.validate().unwrap();
        assert_eq!(patient.gender, Gender::Male);
        assert!(patient.ssn.is_none());
        assert_eq!(patient.date_of_birth.as_deref(), Some("1979-01-30"));
    }

    #[test]
    fn new_patient_rejects_unknown_gender() {
        let values = PatientFormValues {
            name: "Martin Riggs".into(),
            occupation: "Cop".into(),
            gender: "robot".into(),
            ..PatientFormValues::default()
        };
        assert_eq!(
            values.validate(),
            Err(FormError::InvalidGender("robot".into()))
        );
    }
}
