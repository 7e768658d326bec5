//! Caller-side view of one student record.

use serde::Deserialize;
use serde_json::{Map, Value};

/// A scalar field as submitted by the caller. `None` when the key is missing
/// or explicitly `null`; values are kept as-is (string or number).
pub type Field = Option<Value>;

/// One student's attributes, as submitted under `students`.
///
/// Every member is optional; which ones matter depends on the action.
/// Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StudentInput {
    // identifiers
    pub student_id: Field,
    pub local_id: Field,
    pub id: Field,
    pub dcid: Field,
    pub username: Field,

    // name
    pub first_name: Field,
    pub middle_name: Field,
    pub last_name: Field,

    // enrollment, INSERT only
    pub enroll_status_code: Field,
    pub status_code: Field,
    pub grade_level: Field,
    pub entry_date: Field,
    pub exit_date: Field,
    pub school_number: Field,
    pub school_id: Field,

    // addresses
    pub physical_street: Field,
    pub physical_city: Field,
    pub physical_state_province: Field,
    pub physical_state: Field,
    pub physical_postal_code: Field,
    pub physical_grid_location: Field,
    pub mailing_street: Field,
    pub mailing_city: Field,
    pub mailing_state_province: Field,
    pub mailing_state: Field,
    pub mailing_postal_code: Field,
    pub mailing_grid_location: Field,

    // contacts
    pub emergency_phone1: Field,
    pub emergency_contact_name1: Field,
    pub emergency_phone2: Field,
    pub emergency_contact_name2: Field,
    pub doctor_phone: Field,
    pub doctor_name: Field,
    pub guardian_email: Field,
    pub guardian_fax: Field,
    pub mother: Field,
    pub father: Field,

    // demographics
    pub gender: Field,
    pub birth_date: Field,
    pub projected_graduation_year: Field,
    pub ssn: Field,

    // schedule setup
    pub home_room: Field,
    pub next_school: Field,
    pub sched_next_year_grade: Field,

    // initial enrollment
    pub school_entry_date: Field,
    pub school_entry_grade_level: Field,
    pub district_entry_date: Field,
    pub district_entry_grade_level: Field,

    pub email: Field,
    pub mobile: Field,

    // database extensions
    pub u_studentsuserfields: Option<Map<String, Value>>,
    pub u_students_extension: Option<Map<String, Value>>,
}

/// Postal address fields sharing a `physical_` or `mailing_` prefix.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AddressInput<'a> {
    pub street: &'a Field,
    pub city: &'a Field,
    /// `<prefix>_state_province`, falling back to the short `<prefix>_state`.
    pub state_province: &'a Field,
    pub postal_code: &'a Field,
    pub grid_location: &'a Field,
}

impl StudentInput {
    pub(crate) fn physical_address(&self) -> AddressInput<'_> {
        AddressInput {
            street: &self.physical_street,
            city: &self.physical_city,
            state_province: either(&self.physical_state_province, &self.physical_state),
            postal_code: &self.physical_postal_code,
            grid_location: &self.physical_grid_location,
        }
    }

    pub(crate) fn mailing_address(&self) -> AddressInput<'_> {
        AddressInput {
            street: &self.mailing_street,
            city: &self.mailing_city,
            state_province: either(&self.mailing_state_province, &self.mailing_state),
            postal_code: &self.mailing_postal_code,
            grid_location: &self.mailing_grid_location,
        }
    }
}

impl AddressInput<'_> {
    pub(crate) fn any_present(&self) -> bool {
        [
            self.street,
            self.city,
            self.state_province,
            self.postal_code,
            self.grid_location,
        ]
        .iter()
        .any(|f| f.is_some())
    }
}

fn either<'a>(first: &'a Field, second: &'a Field) -> &'a Field {
    if first.is_some() {
        first
    } else {
        second
    }
}
