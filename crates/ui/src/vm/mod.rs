mod builder_vm;
mod dashboard_vm;
mod exam_vm;
mod result_vm;
mod time_fmt;

pub use builder_vm::{BuilderFailureVm, FieldErrorVm, field_label, map_field_errors, submit_draft};
pub use dashboard_vm::{
    StudentExamCardVm, StudentExamStatus, TeacherExamRowVm, load_student_dashboard,
    map_student_dashboard, map_teacher_dashboard, student_status,
};
pub use exam_vm::{
    ExamIntent, ExamScreenVm, ExamVm, OptionState, OptionVm, PrimaryAction, start_exam,
};
pub use result_vm::{
    EXCELLENT_MESSAGE, GOOD_EFFORT_MESSAGE, GREAT_MESSAGE, ResultVm, score_message,
};
pub use time_fmt::{format_datetime, format_seconds_remaining, format_window};
