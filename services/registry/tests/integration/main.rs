mod attendance_test;
mod catalogue_test;
mod helpers;
mod student_test;
