use anyhow::anyhow;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use madrasa_domain::attendance::AttendanceStatus;
use madrasa_domain::date::{month_bounds, parse_day};
use madrasa_domain::id::{AttendanceId, ClassId, StudentId};
use madrasa_domain::sort::Sort;
use madrasa_domain::validate::FieldErrors;

use super::{day, id, parsed};
use crate::domain::form::{AttendanceForm, AttendanceQuery, present};
use crate::domain::repository::{AttendanceRepository, StudentRepository};
use crate::domain::types::{Attendance, AttendanceFilter, AttendanceView, StudentView};
use crate::error::RegistryError;

// ── Query parameters ─────────────────────────────────────────────────────────

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, RegistryError> {
    present(value).ok_or(RegistryError::MissingParameter(name))
}

pub fn query_id<T: From<Uuid>>(value: &Option<String>, name: &'static str) -> Result<T, RegistryError> {
    let raw = required(value, name)?;
    raw.parse::<Uuid>()
        .map(T::from)
        .map_err(|_| RegistryError::invalid(name, format!("{name} must be a valid id")))
}

fn query_day(value: &Option<String>, name: &'static str) -> Result<NaiveDate, RegistryError> {
    let raw = required(value, name)?;
    parse_day(raw).ok_or_else(|| RegistryError::invalid(name, format!("{name} must be a valid date")))
}

fn query_number<T: std::str::FromStr>(
    value: &Option<String>,
    name: &'static str,
) -> Result<T, RegistryError> {
    let raw = required(value, name)?;
    raw.parse::<T>()
        .map_err(|_| RegistryError::invalid(name, format!("{name} must be a number")))
}

/// `classId` + `date`: every mark in a class on one day.
pub fn class_on_date(query: &AttendanceQuery) -> Result<AttendanceFilter, RegistryError> {
    let class = query_id(&query.class_id, "classId")?;
    let date = query_day(&query.date, "date")?;
    Ok(AttendanceFilter {
        class: Some(class),
        from: Some(date),
        to: Some(date),
        ..Default::default()
    })
}

/// `studentId` + `classId` + `date`: a single mark.
pub fn student_in_class_on_date(query: &AttendanceQuery) -> Result<AttendanceFilter, RegistryError> {
    let student = query_id(&query.student_id, "studentId")?;
    let class = query_id(&query.class_id, "classId")?;
    let date = query_day(&query.date, "date")?;
    Ok(AttendanceFilter {
        student: Some(student),
        class: Some(class),
        from: Some(date),
        to: Some(date),
    })
}

/// `studentId` + `classId`: a student's marks within one class.
pub fn student_in_class(query: &AttendanceQuery) -> Result<AttendanceFilter, RegistryError> {
    let student = query_id(&query.student_id, "studentId")?;
    let class = query_id(&query.class_id, "classId")?;
    Ok(AttendanceFilter {
        student: Some(student),
        class: Some(class),
        ..Default::default()
    })
}

/// `classId` + `startDate` + `endDate`, optionally narrowed by `studentId`.
/// Both ends are inclusive.
pub fn date_range(query: &AttendanceQuery) -> Result<AttendanceFilter, RegistryError> {
    let class = query_id(&query.class_id, "classId")?;
    let from = query_day(&query.start_date, "startDate")?;
    let to = query_day(&query.end_date, "endDate")?;
    let student = match present(&query.student_id) {
        Some(_) => Some(query_id(&query.student_id, "studentId")?),
        None => None,
    };
    if from > to {
        return Err(RegistryError::invalid(
            "endDate",
            "endDate must not be before startDate",
        ));
    }
    Ok(AttendanceFilter {
        student,
        class: Some(class),
        from: Some(from),
        to: Some(to),
    })
}

/// `studentId` + `month` (1-12) + `year`: one calendar month for one student.
pub fn monthly(query: &AttendanceQuery) -> Result<AttendanceFilter, RegistryError> {
    let student = query_id(&query.student_id, "studentId")?;
    let month: u32 = query_number(&query.month, "month")?;
    let year: i32 = query_number(&query.year, "year")?;
    let (from, to) = month_bounds(year, month)
        .ok_or_else(|| RegistryError::invalid("month", "month must be between 1 and 12"))?;
    Ok(AttendanceFilter {
        student: Some(student),
        from: Some(from),
        to: Some(to),
        ..Default::default()
    })
}

// ── CreateAttendance ─────────────────────────────────────────────────────────

pub struct CreateAttendanceUseCase<R: AttendanceRepository> {
    pub repo: R,
}

impl<R: AttendanceRepository> CreateAttendanceUseCase<R> {
    pub async fn execute(&self, form: AttendanceForm) -> Result<AttendanceView, RegistryError> {
        for (name, value) in [
            ("student", &form.student),
            ("class", &form.class),
            ("date", &form.date),
            ("status", &form.status),
        ] {
            required(value, name)?;
        }

        let e = &mut FieldErrors::new();
        let fields = (
            id::<StudentId>(e, "student", &form.student),
            id::<ClassId>(e, "class", &form.class),
            day(e, "date", &form.date),
            parsed::<AttendanceStatus>(e, "status", &form.status),
        );
        let (Some(student_id), Some(class_id), Some(date), Some(status)) = fields else {
            return Err(std::mem::take(e).into());
        };

        if let Some(existing) = self.repo.find_for_student_on(student_id, date).await? {
            return Err(self.already_marked(existing).await?);
        }

        let now = Utc::now();
        let attendance = Attendance {
            id: AttendanceId::generate(),
            student_id,
            class_id,
            date,
            status,
            created_at: now,
            updated_at: now,
        };
        if !self.repo.create(&attendance).await? {
            // Lost a race with a concurrent insert for the same student and day.
            let existing = self
                .repo
                .find_for_student_on(student_id, date)
                .await?
                .ok_or_else(|| anyhow!("attendance insert conflicted but no row was found"))?;
            return Err(self.already_marked(existing).await?);
        }

        tracing::debug!(id = %attendance.id, student = %student_id, %date, "attendance recorded");
        self.repo
            .find(attendance.id)
            .await?
            .ok_or(RegistryError::AttendanceNotFound)
    }

    /// `AttendanceExists` carrying the existing record with its student and class resolved.
    async fn already_marked(&self, existing: Attendance) -> Result<RegistryError, RegistryError> {
        let view = match self.repo.find(existing.id).await? {
            Some(view) => view,
            None => AttendanceView {
                attendance: existing,
                student: None,
                class: None,
            },
        };
        Ok(RegistryError::AttendanceExists(Box::new(view)))
    }
}

// ── GetAttendance ────────────────────────────────────────────────────────────

pub struct GetAttendanceUseCase<R: AttendanceRepository> {
    pub repo: R,
}

impl<R: AttendanceRepository> GetAttendanceUseCase<R> {
    pub async fn execute(&self, id: AttendanceId) -> Result<AttendanceView, RegistryError> {
        self.repo
            .find(id)
            .await?
            .ok_or(RegistryError::AttendanceNotFound)
    }
}

// ── FindAttendance ───────────────────────────────────────────────────────────

/// Single-record lookup. An empty match is `AttendanceNotFound`.
pub struct FindAttendanceUseCase<R: AttendanceRepository> {
    pub repo: R,
}

impl<R: AttendanceRepository> FindAttendanceUseCase<R> {
    pub async fn execute(&self, filter: AttendanceFilter) -> Result<AttendanceView, RegistryError> {
        self.repo
            .list(filter, Sort::Asc)
            .await?
            .into_iter()
            .next()
            .ok_or(RegistryError::AttendanceNotFound)
    }
}

// ── ListAttendance ───────────────────────────────────────────────────────────

/// Filtered read. An empty match is `NoAttendanceRecords`, never an empty list.
pub struct ListAttendanceUseCase<R: AttendanceRepository> {
    pub repo: R,
}

impl<R: AttendanceRepository> ListAttendanceUseCase<R> {
    pub async fn execute(
        &self,
        filter: AttendanceFilter,
        order: Sort,
    ) -> Result<Vec<AttendanceView>, RegistryError> {
        let records = self.repo.list(filter, order).await?;
        if records.is_empty() {
            return Err(RegistryError::NoAttendanceRecords);
        }
        Ok(records)
    }
}

// ── StudentAttendanceHistory ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct StudentAttendanceHistory {
    pub student_name: String,
    /// Newest first.
    pub records: Vec<AttendanceView>,
}

pub struct StudentAttendanceHistoryUseCase<A: AttendanceRepository, S: StudentRepository> {
    pub attendance: A,
    pub students: S,
}

impl<A: AttendanceRepository, S: StudentRepository> StudentAttendanceHistoryUseCase<A, S> {
    pub async fn execute(&self, student: StudentId) -> Result<StudentAttendanceHistory, RegistryError> {
        let view = self
            .students
            .find(student)
            .await?
            .ok_or(RegistryError::StudentNotFound)?;
        let filter = AttendanceFilter {
            student: Some(student),
            ..Default::default()
        };
        let records = self.attendance.list(filter, Sort::Desc).await?;
        if records.is_empty() {
            return Err(RegistryError::NoAttendanceRecords);
        }
        Ok(StudentAttendanceHistory {
            student_name: view.student.name,
            records,
        })
    }
}

// ── ClassRoster ──────────────────────────────────────────────────────────────

/// Students enrolled in a class, for the attendance sheet.
pub struct ClassRosterUseCase<S: StudentRepository> {
    pub repo: S,
}

impl<S: StudentRepository> ClassRosterUseCase<S> {
    pub async fn execute(&self, class: ClassId) -> Result<Vec<StudentView>, RegistryError> {
        let students = self.repo.list(Some(class)).await?;
        if students.is_empty() {
            return Err(RegistryError::NoStudentsInClass);
        }
        Ok(students)
    }
}

// ── UpdateAttendanceStatus ───────────────────────────────────────────────────

/// Only the status moves; student, class and date are fixed at creation.
pub struct UpdateAttendanceStatusUseCase<R: AttendanceRepository> {
    pub repo: R,
}

impl<R: AttendanceRepository> UpdateAttendanceStatusUseCase<R> {
    pub async fn execute(
        &self,
        id: AttendanceId,
        form: AttendanceForm,
    ) -> Result<AttendanceView, RegistryError> {
        required(&form.status, "status")?;
        let mut errors = FieldErrors::new();
        let Some(status) = parsed::<AttendanceStatus>(&mut errors, "status", &form.status) else {
            return Err(errors.into());
        };
        if !self.repo.update_status(id, status).await? {
            return Err(RegistryError::AttendanceNotFound);
        }
        self.repo
            .find(id)
            .await?
            .ok_or(RegistryError::AttendanceNotFound)
    }
}

// ── DeleteAttendance ─────────────────────────────────────────────────────────

pub struct DeleteAttendanceUseCase<R: AttendanceRepository> {
    pub repo: R,
}

impl<R: AttendanceRepository> DeleteAttendanceUseCase<R> {
    pub async fn execute(&self, id: AttendanceId) -> Result<(), RegistryError> {
        if !self.repo.delete(id).await? {
            return Err(RegistryError::AttendanceNotFound);
        }
        Ok(())
    }
}
