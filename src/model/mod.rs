pub mod calendar;
pub mod employee;
pub mod leave_balance;
pub mod leave_request;
pub mod leave_type;
pub mod role;
pub mod work_schedule;
