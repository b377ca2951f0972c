use crate::api::calendar::{CalendarFilter, CreateCalendarEntry};
use crate::api::employee::{
    CreateEmployee, EmployeeListResponse, EmployeeQuery, UpdateEmployee,
};
use crate::api::leave_balance::{BalanceFilter, BalanceResponse, UpdateBalance};
use crate::api::leave_request::{
    CreateLeave, DecisionNotes, LeaveFilter, LeaveListResponse, LeaveResponse, PreviewQuery,
    UpdateLeave,
};
use crate::api::work_schedule::CreateWorkSchedule;
use crate::leave::recalc::RecalcSummary;
use crate::leave::workdays::{WorkdayComputation, WorkdayPreview};
use crate::model::calendar::{CalendarEntry, ScopeType};
use crate::model::employee::Employee;
use crate::model::leave_balance::LeaveBalance;
use crate::model::leave_request::LeaveStatus;
use crate::model::leave_type::LeaveType;
use crate::model::work_schedule::WorkSchedule;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Management API",
        version = "1.0.0",
        description = r#"
## Schedule-based Leave Management

This API manages leave requests, work schedules, holiday calendars and leave
balances for an organization.

### 🔹 Key Features
- **Leave Requests**
  - Submit, approve/reject/cancel, edit and delete leave requests
  - Workdays are computed from the employee's work schedule, excluding
    applicable holidays/closures, and split per calendar year
- **Leave Balances**
  - Per-year balances maintained automatically on every approval decision
  - Bulk per-year recalculation for drift repair
- **Holiday Calendar**
  - Company-wide, department, job-title and employee-scoped closures
- **Work Schedules**
  - Weekday-set schedules assignable to employees

### 🔐 Security
Most endpoints are protected using **JWT Bearer authentication**.
Only authorized roles such as **Admin** or **HR** can access sensitive operations.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::update_leave,
        crate::api::leave_request::delete_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::cancel_leave,
        crate::api::leave_request::preview_workdays,
        crate::api::leave_request::list_leave_types,

        crate::api::leave_balance::list_balances,
        crate::api::leave_balance::update_balance,
        crate::api::leave_balance::recalculate_year,

        crate::api::calendar::list_calendar,
        crate::api::calendar::create_calendar_entry,
        crate::api::calendar::delete_calendar_entry,

        crate::api::work_schedule::list_schedules,
        crate::api::work_schedule::get_schedule,
        crate::api::work_schedule::create_schedule,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee
    ),
    components(
        schemas(
            LeaveFilter,
            LeaveResponse,
            LeaveListResponse,
            CreateLeave,
            UpdateLeave,
            DecisionNotes,
            PreviewQuery,
            LeaveStatus,
            WorkdayComputation,
            WorkdayPreview,
            BalanceFilter,
            BalanceResponse,
            UpdateBalance,
            LeaveBalance,
            LeaveType,
            RecalcSummary,
            CalendarFilter,
            CreateCalendarEntry,
            CalendarEntry,
            ScopeType,
            CreateWorkSchedule,
            WorkSchedule,
            CreateEmployee,
            UpdateEmployee,
            EmployeeQuery,
            Employee,
            EmployeeListResponse
        )
    ),
    tags(
        (name = "Leave", description = "Leave request APIs"),
        (name = "Balance", description = "Leave balance APIs"),
        (name = "Calendar", description = "Holiday/closure calendar APIs"),
        (name = "Schedule", description = "Work schedule APIs"),
        (name = "Employee", description = "Employee management APIs"),
    )
)]
pub struct ApiDoc;
