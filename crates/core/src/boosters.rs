//! Booster Doses
//!
//! Rules for chaining a new dose to the previous, still open dose of the same vaccine.

use crate::{
    ids::VaccinationId,
    records::vaccinations::{Vaccination, VaccinationUpdate},
};

/// Whether recording `dose_number` should close a previous dose.
#[must_use]
pub fn requires_chain(dose_number: u32) -> bool {
    dose_number > 1
}

/// The open dose directly preceding `dose_number` of `vaccine_name`.
///
/// Vaccine names are compared exactly. When several records match, the latest application date
/// wins, then the highest id.
pub fn find_previous_dose<'a>(
    records: &'a [Vaccination],
    vaccine_name: &str,
    dose_number: u32,
) -> Option<&'a Vaccination> {
    let previous = dose_number.checked_sub(1)?;

    records
        .iter()
        .filter(|record| {
            record.vaccine_name == vaccine_name
                && record.dose_number == previous
                && !record.is_completed
        })
        .max_by_key(|record| (record.application_date, record.id))
}

/// Observation appended to the dose closed by booster `dose_number`.
#[must_use]
pub fn booster_note(dose_number: u32, booster: VaccinationId) -> String {
    format!("Aplicación de refuerzo dosis {dose_number} de la vacunación ID {booster}.")
}

/// Append `note` to existing observations, separated by a blank line.
#[must_use]
pub fn append_observation(existing: Option<&str>, note: &str) -> String {
    match existing.map(str::trim_end).filter(|text| !text.is_empty()) {
        Some(text) => format!("{text}\n\n{note}"),
        None => note.to_owned(),
    }
}

/// Update completing `previous` because booster `dose_number` was recorded as `booster`.
#[must_use]
pub fn complete_previous(
    previous: &Vaccination,
    dose_number: u32,
    booster: VaccinationId,
) -> VaccinationUpdate {
    let note = booster_note(dose_number, booster);

    VaccinationUpdate {
        is_completed: true,
        observations: Some(append_observation(
            previous.observations.as_deref(),
            &note,
        )),
        ..VaccinationUpdate::from(previous)
    }
}
