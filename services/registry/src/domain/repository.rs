#![allow(async_fn_in_trait)]

use bytes::Bytes;

use madrasa_domain::attendance::AttendanceStatus;
use madrasa_domain::id::{
    AttendanceId, ClassId, DepartmentId, StipendId, StudentId, SubjectId, TeacherId,
};
use madrasa_domain::sort::Sort;

use crate::domain::types::{
    Attendance, AttendanceFilter, AttendanceView, Class, ClassView, Department, DocumentSlot,
    Stipend, Student, StudentUniqueField, StudentView, Subject, Teacher, TeacherUniqueField,
    TeacherView, User,
};
use crate::error::RegistryError;

/// Repository for students. Reads resolve class and department.
pub trait StudentRepository: Send + Sync {
    async fn find(&self, id: StudentId) -> Result<Option<StudentView>, RegistryError>;

    /// All students, optionally restricted to one class.
    async fn list(&self, class: Option<ClassId>) -> Result<Vec<StudentView>, RegistryError>;

    /// Whether another student (other than `except`) holds `value` in `field`.
    async fn field_taken(
        &self,
        field: StudentUniqueField,
        value: &str,
        except: Option<StudentId>,
    ) -> Result<bool, RegistryError>;

    /// Insert. A unique violation surfaces as `DuplicateField`.
    async fn create(&self, student: &Student) -> Result<(), RegistryError>;

    /// Overwrite every column. A unique violation surfaces as `DuplicateField`.
    async fn update(&self, student: &Student) -> Result<(), RegistryError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: StudentId) -> Result<bool, RegistryError>;
}

/// Repository for teachers. Reads resolve the subject.
pub trait TeacherRepository: Send + Sync {
    async fn find(&self, id: TeacherId) -> Result<Option<TeacherView>, RegistryError>;
    async fn list(&self, subject: Option<SubjectId>) -> Result<Vec<TeacherView>, RegistryError>;

    /// Email comparison is case-insensitive.
    async fn field_taken(
        &self,
        field: TeacherUniqueField,
        value: &str,
        except: Option<TeacherId>,
    ) -> Result<bool, RegistryError>;

    async fn create(&self, teacher: &Teacher) -> Result<(), RegistryError>;
    async fn update(&self, teacher: &Teacher) -> Result<(), RegistryError>;
    async fn delete(&self, id: TeacherId) -> Result<bool, RegistryError>;
}

/// Repository for classes. Reads resolve teacher and department.
pub trait ClassRepository: Send + Sync {
    async fn find(&self, id: ClassId) -> Result<Option<ClassView>, RegistryError>;
    async fn list(&self, department: Option<DepartmentId>) -> Result<Vec<ClassView>, RegistryError>;
    async fn create(&self, class: &Class) -> Result<(), RegistryError>;
    async fn update(&self, class: &Class) -> Result<(), RegistryError>;
    async fn delete(&self, id: ClassId) -> Result<bool, RegistryError>;
}

/// Repository for departments. Names are unique by normalized, case-folded key.
pub trait DepartmentRepository: Send + Sync {
    async fn find(&self, id: DepartmentId) -> Result<Option<Department>, RegistryError>;
    async fn list(&self) -> Result<Vec<Department>, RegistryError>;
    async fn name_taken(
        &self,
        name_key: &str,
        except: Option<DepartmentId>,
    ) -> Result<bool, RegistryError>;
    /// A unique violation surfaces as `DepartmentExists`.
    async fn create(&self, department: &Department) -> Result<(), RegistryError>;
    async fn update(&self, department: &Department) -> Result<(), RegistryError>;
    async fn delete(&self, id: DepartmentId) -> Result<bool, RegistryError>;
}

/// Repository for subjects. Names are unique by normalized, case-folded key.
pub trait SubjectRepository: Send + Sync {
    async fn find(&self, id: SubjectId) -> Result<Option<Subject>, RegistryError>;
    async fn list(&self) -> Result<Vec<Subject>, RegistryError>;
    async fn name_taken(
        &self,
        name_key: &str,
        except: Option<SubjectId>,
    ) -> Result<bool, RegistryError>;
    /// A unique violation surfaces as `SubjectExists`.
    async fn create(&self, subject: &Subject) -> Result<(), RegistryError>;
    async fn update(&self, subject: &Subject) -> Result<(), RegistryError>;
    async fn delete(&self, id: SubjectId) -> Result<bool, RegistryError>;
}

/// Repository for stipend schemes.
pub trait StipendRepository: Send + Sync {
    async fn find(&self, id: StipendId) -> Result<Option<Stipend>, RegistryError>;
    /// Ordered by name ascending.
    async fn list(&self) -> Result<Vec<Stipend>, RegistryError>;
    async fn name_taken(
        &self,
        name_key: &str,
        except: Option<StipendId>,
    ) -> Result<bool, RegistryError>;
    /// A unique violation surfaces as `StipendExists`.
    async fn create(&self, stipend: &Stipend) -> Result<(), RegistryError>;
    async fn update(&self, stipend: &Stipend) -> Result<(), RegistryError>;
    async fn delete(&self, id: StipendId) -> Result<bool, RegistryError>;
}

/// Repository for attendance marks. `(student, date)` is unique.
pub trait AttendanceRepository: Send + Sync {
    async fn find(&self, id: AttendanceId) -> Result<Option<AttendanceView>, RegistryError>;

    async fn find_for_student_on(
        &self,
        student: StudentId,
        date: chrono::NaiveDate,
    ) -> Result<Option<Attendance>, RegistryError>;

    /// Records matching `filter`, ordered by date in `order`.
    async fn list(
        &self,
        filter: AttendanceFilter,
        order: Sort,
    ) -> Result<Vec<AttendanceView>, RegistryError>;

    /// Insert. Returns `false` when the student already has a mark for that date.
    async fn create(&self, attendance: &Attendance) -> Result<bool, RegistryError>;

    /// Overwrite the status only. Returns `true` if a row was updated.
    async fn update_status(
        &self,
        id: AttendanceId,
        status: AttendanceStatus,
    ) -> Result<bool, RegistryError>;

    async fn delete(&self, id: AttendanceId) -> Result<bool, RegistryError>;
}

/// Repository for back-office accounts.
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, RegistryError>;
    async fn email_taken(&self, email: &str) -> Result<bool, RegistryError>;
    /// A unique violation surfaces as `DuplicateField { field: "email" }`.
    async fn create(&self, user: &User) -> Result<(), RegistryError>;
}

/// Storage for uploaded student files.
pub trait FileStore: Send + Sync {
    /// Write `bytes` under a fresh collision-free name built from `stem`, the
    /// slot tag and `extension`. Returns the generated filename.
    async fn store(
        &self,
        slot: DocumentSlot,
        stem: &str,
        extension: &str,
        bytes: Bytes,
    ) -> Result<String, RegistryError>;

    /// Returns `true` if a file was removed.
    async fn remove(&self, slot: DocumentSlot, filename: &str) -> Result<bool, RegistryError>;
}

/// One-way password hashing. Implementations must not block the calling task.
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, RegistryError>;
}
