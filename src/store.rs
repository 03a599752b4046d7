use std::collections::BTreeSet;

use uuid::Uuid;

use crate::editable::CommitSink;
use crate::model::{
    AttendanceRecord, AttendanceStatus, Book, HolderType, IdCard, InventoryItem, Notice, PayDraft,
    PayStatus, SalaryPayment, SchoolClass, Student, Subject, Teacher,
};

/// The in-memory source of truth. Ordered `Vec`s with stable identity; the
/// demo collections are small enough that lookups are linear scans.
#[derive(Debug, Default)]
pub struct Store {
    pub classes: Vec<SchoolClass>,
    pub subjects: Vec<Subject>,
    pub students: Vec<Student>,
    pub teachers: Vec<Teacher>,
    pub salaries: Vec<SalaryPayment>,
    pub attendance: Vec<AttendanceRecord>,
    pub inventory: Vec<InventoryItem>,
    pub books: Vec<Book>,
    pub id_cards: Vec<IdCard>,
    pub notices: Vec<Notice>,
}

impl Store {
    pub fn class(&self, id: &str) -> Option<&SchoolClass> {
        self.classes.iter().find(|c| c.id == id)
    }

    /// Dangling foreign keys resolve to an empty name, never an error.
    pub fn class_name(&self, id: &str) -> &str {
        self.class(id).map(|c| c.name.as_str()).unwrap_or("")
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn teacher(&self, id: &str) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == id)
    }

    pub fn teacher_name(&self, id: &str) -> String {
        self.teacher(id).map(|t| t.display_name()).unwrap_or_default()
    }

    pub fn holder_name(&self, holder_type: HolderType, holder_id: &str) -> String {
        match holder_type {
            HolderType::Student => self
                .student(holder_id)
                .map(|s| s.display_name())
                .unwrap_or_default(),
            HolderType::Staff => self.teacher_name(holder_id),
        }
    }

    /// Classes a teacher owns: where they are the class-teacher, plus classes
    /// of subjects they teach.
    pub fn owned_class_ids(&self, teacher_id: &str) -> BTreeSet<String> {
        let mut owned: BTreeSet<String> = self
            .classes
            .iter()
            .filter(|c| c.class_teacher_id == teacher_id)
            .map(|c| c.id.clone())
            .collect();
        owned.extend(
            self.subjects
                .iter()
                .filter(|s| s.teacher_id == teacher_id)
                .map(|s| s.class_id.clone()),
        );
        owned
    }

    pub fn active_teachers(&self) -> Vec<&Teacher> {
        self.teachers.iter().filter(|t| t.active).collect()
    }

    pub fn attendance_for(&self, teacher_id: &str, date: &str) -> Option<&AttendanceRecord> {
        self.attendance
            .iter()
            .find(|r| r.teacher_id == teacher_id && r.date == date)
    }

    pub fn salary_for(&self, teacher_id: &str, month: &str) -> Option<&SalaryPayment> {
        self.salaries
            .iter()
            .find(|p| p.teacher_id == teacher_id && p.month == month)
    }

    fn upsert_attendance(&mut self, date: &str, teacher_id: &str, status: AttendanceStatus) {
        if let Some(existing) = self
            .attendance
            .iter_mut()
            .find(|r| r.teacher_id == teacher_id && r.date == date)
        {
            existing.status = status;
            return;
        }
        self.attendance.push(AttendanceRecord {
            id: Uuid::new_v4().to_string(),
            teacher_id: teacher_id.to_string(),
            date: date.to_string(),
            status,
        });
    }

    fn upsert_salary(&mut self, month: &str, teacher_id: &str, draft: PayDraft) {
        if let Some(existing) = self
            .salaries
            .iter_mut()
            .find(|p| p.teacher_id == teacher_id && p.month == month)
        {
            existing.amount = draft.amount;
            existing.status = draft.status;
            return;
        }
        self.salaries.push(SalaryPayment {
            id: Uuid::new_v4().to_string(),
            teacher_id: teacher_id.to_string(),
            month: month.to_string(),
            amount: draft.amount,
            status: draft.status,
        });
    }
}

/// Commits a marked attendance day into the store.
pub struct AttendanceCommit<'a> {
    pub store: &'a mut Store,
}

impl CommitSink<AttendanceStatus> for AttendanceCommit<'_> {
    fn commit(&mut self, date: &str, rows: &[(String, AttendanceStatus)]) -> Result<(), String> {
        for (teacher_id, status) in rows {
            self.store.upsert_attendance(date, teacher_id, *status);
        }
        Ok(())
    }
}

/// Commits a payroll run into the store.
pub struct PayrollCommit<'a> {
    pub store: &'a mut Store,
}

impl CommitSink<PayDraft> for PayrollCommit<'_> {
    fn commit(&mut self, month: &str, rows: &[(String, PayDraft)]) -> Result<(), String> {
        for (teacher_id, draft) in rows {
            self.store.upsert_salary(month, teacher_id, *draft);
        }
        Ok(())
    }
}

/// Default payroll row for a month: the committed payment if one exists,
/// otherwise pending at the teacher's monthly salary.
pub fn payroll_default(store: &Store, teacher: &Teacher, month: &str) -> PayDraft {
    match store.salary_for(&teacher.id, month) {
        Some(p) => PayDraft {
            amount: p.amount,
            status: p.status,
        },
        None => PayDraft {
            amount: teacher.monthly_salary,
            status: PayStatus::Pending,
        },
    }
}

/// Default attendance row for a date: the committed record if one exists,
/// otherwise present.
pub fn attendance_default(store: &Store, teacher_id: &str, date: &str) -> AttendanceStatus {
    store
        .attendance_for(teacher_id, date)
        .map(|r| r.status)
        .unwrap_or(AttendanceStatus::Present)
}
