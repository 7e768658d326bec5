//! Per-record mapping from caller attributes to the endpoint's student shape.
//!
//! # Design
//! Every output member is an `Option` (or a struct of them) and nothing is
//! skipped at serialization time. Absent members serialize as `null` and the
//! single [`prune_empty`](super::prune::prune_empty) pass removes them,
//! together with sub-objects that end up empty.

use serde::Serialize;
use serde_json::Value;

use super::extension::{extension_data, ExtensionData};
use super::input::{AddressInput, Field, StudentInput};
use super::scalar_text;
use crate::error::{ApiError, Result};
use crate::types::Action;

/// One student as the bulk endpoint expects it, before pruning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRecord {
    pub action: Action,
    pub client_uid: String,
    pub student_username: Field,
    pub local_id: Option<i64>,
    pub id: Field,
    pub name: Name,
    pub school_enrollment: Option<SchoolEnrollment>,
    pub address: Address,
    pub contact: Contact,
    pub demographics: Demographics,
    pub schedule_setup: ScheduleSetup,
    pub initial_enrollment: InitialEnrollment,
    pub contact_info: Option<ContactInfo>,
    pub phone: Option<Phone>,
    #[serde(rename = "_extension_data")]
    pub extension_data: Option<ExtensionData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Name {
    pub first_name: Field,
    pub middle_name: Field,
    pub last_name: Field,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchoolEnrollment {
    pub enroll_status_code: Field,
    pub status_code: Field,
    pub grade_level: Field,
    pub entry_date: Field,
    pub exit_date: Field,
    pub school_number: Field,
    pub school_id: Field,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Address {
    pub physical: Option<PostalAddress>,
    pub mailing: Option<PostalAddress>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostalAddress {
    pub street: Field,
    pub city: Field,
    pub state_province: Field,
    pub postal_code: Field,
    pub grid_location: Field,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Contact {
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
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Demographics {
    pub gender: Field,
    pub birth_date: Field,
    pub projected_graduation_year: Field,
    pub ssn: Field,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScheduleSetup {
    pub home_room: Field,
    pub next_school: Field,
    pub sched_next_year_grade: Field,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InitialEnrollment {
    pub school_entry_date: Field,
    pub school_entry_grade_level: Field,
    pub district_entry_date: Field,
    pub district_entry_grade_level: Field,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactInfo {
    pub email: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Phone {
    pub main: PhoneNumber,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhoneNumber {
    pub number: Value,
}

impl StudentRecord {
    /// Map one caller record for `action`.
    pub fn from_input(action: Action, kid: &StudentInput) -> Result<Self> {
        let client_uid = kid.student_id.as_ref().map(scalar_text).unwrap_or_default();
        if client_uid.is_empty() {
            return Err(ApiError::invalid(
                "every student needs a non-empty student_id (used as client_uid)",
            ));
        }

        let mut record = StudentRecord {
            action,
            client_uid,
            student_username: kid.username.clone(),
            local_id: None,
            id: None,
            name: Name::default(),
            school_enrollment: None,
            address: Address {
                physical: postal_address(kid.physical_address()),
                mailing: postal_address(kid.mailing_address()),
            },
            contact: contact(kid),
            demographics: Demographics {
                gender: kid.gender.clone(),
                birth_date: kid.birth_date.clone(),
                projected_graduation_year: kid.projected_graduation_year.clone(),
                ssn: kid.ssn.clone(),
            },
            schedule_setup: ScheduleSetup {
                home_room: kid.home_room.clone(),
                next_school: kid.next_school.clone(),
                sched_next_year_grade: kid.sched_next_year_grade.clone(),
            },
            initial_enrollment: InitialEnrollment {
                school_entry_date: kid.school_entry_date.clone(),
                school_entry_grade_level: kid.school_entry_grade_level.clone(),
                district_entry_date: kid.district_entry_date.clone(),
                district_entry_grade_level: kid.district_entry_grade_level.clone(),
            },
            contact_info: kid.email.clone().map(|email| ContactInfo { email }),
            phone: kid.mobile.clone().map(|number| Phone {
                main: PhoneNumber { number },
            }),
            extension_data: extension_data(
                kid.u_studentsuserfields.as_ref(),
                kid.u_students_extension.as_ref(),
            ),
        };

        match action {
            Action::Insert => {
                let source = kid.local_id.as_ref().or(kid.student_id.as_ref());
                record.local_id = source.map(coerce_integer).transpose()?;

                // a new account needs both names, so one implies the other
                if kid.first_name.is_some() || kid.last_name.is_some() {
                    record.name.first_name = kid.first_name.clone();
                    record.name.last_name = kid.last_name.clone();
                }
                record.name.middle_name = kid.middle_name.clone();

                record.school_enrollment = Some(school_enrollment(kid));
            }
            Action::Update => {
                record.id = kid.id.clone().or_else(|| kid.dcid.clone());
                if record.id.is_none() {
                    tracing::warn!(
                        client_uid = %record.client_uid,
                        "UPDATE record carries neither id nor dcid"
                    );
                }
                record.name = Name {
                    first_name: kid.first_name.clone(),
                    middle_name: kid.middle_name.clone(),
                    last_name: kid.last_name.clone(),
                };
            }
        }

        Ok(record)
    }
}

fn school_enrollment(kid: &StudentInput) -> SchoolEnrollment {
    let mut enrollment = SchoolEnrollment {
        grade_level: kid.grade_level.clone(),
        entry_date: kid.entry_date.clone(),
        exit_date: kid.exit_date.clone(),
        school_number: kid.school_number.clone(),
        school_id: kid.school_id.clone(),
        ..SchoolEnrollment::default()
    };
    // enroll_status_code and status_code are mutually exclusive
    if kid.enroll_status_code.is_some() {
        enrollment.enroll_status_code = kid.enroll_status_code.clone();
    } else {
        enrollment.status_code = kid.status_code.clone();
    }
    enrollment
}

fn postal_address(input: AddressInput<'_>) -> Option<PostalAddress> {
    if !input.any_present() {
        return None;
    }
    Some(PostalAddress {
        street: input.street.clone(),
        city: input.city.clone(),
        state_province: input.state_province.clone(),
        postal_code: input.postal_code.clone(),
        grid_location: input.grid_location.clone(),
    })
}

fn contact(kid: &StudentInput) -> Contact {
    let (emergency_phone1, emergency_contact_name1) =
        both(&kid.emergency_phone1, &kid.emergency_contact_name1);
    let (emergency_phone2, emergency_contact_name2) =
        both(&kid.emergency_phone2, &kid.emergency_contact_name2);
    let (doctor_phone, doctor_name) = both(&kid.doctor_phone, &kid.doctor_name);

    Contact {
        emergency_phone1,
        emergency_contact_name1,
        emergency_phone2,
        emergency_contact_name2,
        doctor_phone,
        doctor_name,
        guardian_email: kid.guardian_email.clone(),
        guardian_fax: kid.guardian_fax.clone(),
        mother: kid.mother.clone(),
        father: kid.father.clone(),
    }
}

/// A phone/name pair is only sent whole.
fn both(phone: &Field, name: &Field) -> (Field, Field) {
    match (phone, name) {
        (Some(p), Some(n)) => (Some(p.clone()), Some(n.clone())),
        _ => (None, None),
    }
}

fn coerce_integer(value: &Value) -> Result<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    };
    parsed.ok_or_else(|| ApiError::invalid(format!("local_id must be an integer, got {value}")))
}
