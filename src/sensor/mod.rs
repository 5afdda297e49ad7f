pub mod bmx280;
