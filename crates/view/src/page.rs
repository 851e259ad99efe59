//! Renderable model of the patient page.
//!
//! Built from the store by [`PatientPage::build`]; `Display` renders it as plain text.

use patientor_core::{Entry, EntryType, Gender, HealthCheckRating, Patient, Store};
use std::fmt;

/// The patient summary table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub occupation: String,
    pub health_rating: Option<HealthCheckRating>,
}

/// A diagnosis code resolved against the catalog. Missing codes keep blank fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisLookup {
    pub code: String,
    pub name: Option<String>,
    pub latin: Option<String>,
}

/// One entry in the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryBlock {
    pub id: String,
    pub entry_type: EntryType,
    pub date: String,
    pub description: String,
    pub specialist: String,
    pub diagnoses: Vec<DiagnosisLookup>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientPage {
    pub summary: SummaryRow,
    pub entries: Vec<EntryBlock>,
}

impl PatientPage {
    /// Build the page for `patient` from the store.
    ///
    /// Every entry in the store's entry table is shown, oldest first (ties broken by id).
    pub fn build(patient: &Patient, store: &Store) -> Self {
        let mut entries: Vec<&Entry> = store.entries().values().collect();
        // ISO dates order correctly as strings.
        entries.sort_by(|a, b| a.date().cmp(b.date()).then_with(|| a.id.cmp(&b.id)));

        let health_rating = latest_health_rating(entries.iter().copied());

        let entries = entries
            .into_iter()
            .map(|entry| EntryBlock {
                id: entry.id.clone(),
                entry_type: entry.entry_type(),
                date: entry.date().to_owned(),
                description: entry.description().to_owned(),
                specialist: entry.specialist().to_owned(),
                diagnoses: entry
                    .diagnosis_codes()
                    .iter()
                    .map(|code| lookup(store, code))
                    .collect(),
            })
            .collect();

        Self {
            summary: SummaryRow {
                id: patient.id.clone(),
                name: patient.name.clone(),
                gender: patient.gender,
                occupation: patient.occupation.clone(),
                health_rating,
            },
            entries,
        }
    }
}

/// Rating of the most recent health check that carries one.
pub fn latest_health_rating<'a>(
    entries: impl IntoIterator<Item = &'a Entry>,
) -> Option<HealthCheckRating> {
    entries
        .into_iter()
        .filter_map(|e| e.details.kind.health_check_rating().map(|r| (e, r)))
        .max_by(|(a, _), (b, _)| a.date().cmp(b.date()).then_with(|| a.id.cmp(&b.id)))
        .map(|(_, rating)| rating)
}

fn lookup(store: &Store, code: &str) -> DiagnosisLookup {
    let diagnosis = store.diagnosis(code);
    DiagnosisLookup {
        code: code.to_owned(),
        name: diagnosis.map(|d| d.name.clone()),
        latin: diagnosis.and_then(|d| d.latin.clone()),
    }
}

/// Hearts for a rating: four for `Healthy`, one for `CriticalRisk`.
pub fn rating_bar(rating: HealthCheckRating) -> String {
    let filled = 4 - usize::from(u8::from(rating));
    let mut bar = "♥".repeat(filled);
    bar.push_str(&"♡".repeat(4 - filled));
    bar
}

impl fmt::Display for SummaryRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rating = match self.health_rating {
            Some(r) => format!("{} {}", rating_bar(r), r.description()),
            None => "no rating recorded".to_owned(),
        };
        let headers = ["Name", "Gender", "Occupation", "Health Rating"];
        let cells = [
            self.name.as_str(),
            self.gender.symbol(),
            self.occupation.as_str(),
            rating.as_str(),
        ];
        let widths: Vec<usize> = headers
            .iter()
            .zip(cells.iter())
            .map(|(h, c)| h.chars().count().max(c.chars().count()))
            .collect();

        write_row(f, &headers, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let rule: Vec<&str> = rule.iter().map(String::as_str).collect();
        write_row(f, &rule, &widths)?;
        write_row(f, &cells, &widths)
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[&str], widths: &[usize]) -> fmt::Result {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    writeln!(f, "| {} |", line.join(" | "))
}

impl fmt::Display for EntryBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "date: {}", self.date)?;
        writeln!(f, "type: {}", self.entry_type)?;
        writeln!(f, "description: {}", self.description)?;
        writeln!(f, "specialist: {}", self.specialist)?;
        if !self.diagnoses.is_empty() {
            writeln!(f, "diagnoses:")?;
            for d in &self.diagnoses {
                writeln!(
                    f,
                    "  {} name: {} latin: {}",
                    d.code,
                    d.name.as_deref().unwrap_or(""),
                    d.latin.as_deref().unwrap_or("")
                )?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for PatientPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Patient page")?;
        writeln!(f)?;
        write!(f, "{}", self.summary)?;
        writeln!(f)?;
        writeln!(f, "Entries")?;
        if self.entries.is_empty() {
            writeln!(f, "(none)")?;
        }
        for (i, entry) in self.entries.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "entry {}:", i + 1)?;
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}
