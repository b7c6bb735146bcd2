//! Behavioural tests for the aggregate services over the in-memory gateway.

use std::sync::Arc;

use chrono::NaiveDate;

use hr_backend::domain::department::{Department, DepartmentId};
use hr_backend::domain::department_service::{DepartmentService, GatewayDepartmentLookup};
use hr_backend::domain::employee::EmployeeId;
use hr_backend::domain::employee_service::EmployeeService;
use hr_backend::domain::error::ErrorCode;
use hr_backend::domain::history::JobTitle;
use hr_backend::domain::ports::{
    AssignmentInput, DepartmentCommand, DepartmentQuery, EmployeeCommand, EmployeeQuery,
    EmployeeUpdate, HistoryInput, NewDepartment, NewEmployee, SalaryInput, TitleInput,
};
use hr_backend::outbound::persistence::MemoryHrStore;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn dept_id(raw: &str) -> DepartmentId {
    DepartmentId::new(raw).expect("valid department id")
}

fn title(raw: &str) -> JobTitle {
    JobTitle::new(raw).expect("valid title")
}

struct Harness {
    employees: EmployeeService<MemoryHrStore>,
    departments: DepartmentService<MemoryHrStore>,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryHrStore::new());
    Harness {
        employees: EmployeeService::new(Arc::clone(&store), Arc::new(GatewayDepartmentLookup)),
        departments: DepartmentService::new(store),
    }
}

async fn seed_department(harness: &Harness, raw_id: &str, name: &str) -> Department {
    harness
        .departments
        .create(NewDepartment {
            id: dept_id(raw_id),
            name: name.into(),
            active: None,
            created_by: 1,
        })
        .await
        .expect("department created")
}

fn employee_input(history: HistoryInput) -> NewEmployee {
    NewEmployee {
        birth_date: date(1990, 4, 2),
        first_name: "Ada".into(),
        last_name: Some("Lovelace".into()),
        gender: "F".into(),
        hire_date: date(2020, 1, 6),
        active: None,
        created_by: 1,
        history,
    }
}

fn employee_update(history: HistoryInput) -> EmployeeUpdate {
    EmployeeUpdate {
        birth_date: date(1990, 4, 2),
        first_name: "Ada".into(),
        last_name: Some("Lovelace".into()),
        gender: "F".into(),
        hire_date: date(2020, 1, 6),
        active: None,
        updated_by: 2,
        history,
    }
}

fn salary(from: NaiveDate, amount: i64) -> SalaryInput {
    SalaryInput {
        from_date: from,
        amount,
        to_date: date(2026, 1, 1),
    }
}

#[tokio::test]
async fn a_created_aggregate_round_trips_through_get_by_id() {
    let harness = harness();
    seed_department(&harness, "d001", "Research").await;

    let history = HistoryInput {
        assignments: vec![AssignmentInput {
            department: dept_id("d001"),
            from_date: date(2024, 1, 1),
            to_date: date(2025, 1, 1),
        }],
        salaries: vec![salary(date(2024, 1, 1), 60_000), salary(date(2025, 1, 1), 65_000)],
        titles: vec![TitleInput {
            title: title("Engineer"),
            from_date: date(2024, 1, 1),
            to_date: date(2026, 1, 1),
        }],
    };

    let created = harness
        .employees
        .create(employee_input(history))
        .await
        .expect("create succeeds");
    let fetched = harness
        .employees
        .get_by_id(created.id)
        .await
        .expect("fetch succeeds");

    assert_eq!(fetched, created);
    assert_eq!(fetched.profile.first_name, "Ada");
    assert!(fetched.profile.active, "active defaults to true");
    assert_eq!(fetched.assignments.len(), 1);
    assert_eq!(fetched.salaries.len(), 2);
    assert_eq!(fetched.titles.len(), 1);
    assert_eq!(fetched.audit.created_by, 1);
    assert_eq!(fetched.audit.updated_by, 1);
}

#[tokio::test]
async fn update_replaces_the_collections_wholesale() {
    let harness = harness();
    seed_department(&harness, "d001", "Research").await;

    let created = harness
        .employees
        .create(employee_input(HistoryInput {
            assignments: vec![AssignmentInput {
                department: dept_id("d001"),
                from_date: date(2024, 1, 1),
                to_date: date(2025, 1, 1),
            }],
            salaries: vec![salary(date(2024, 1, 1), 60_000), salary(date(2025, 1, 1), 65_000)],
            titles: Vec::new(),
        }))
        .await
        .expect("create succeeds");

    let updated = harness
        .employees
        .update(
            created.id,
            employee_update(HistoryInput {
                assignments: Vec::new(),
                salaries: vec![salary(date(2023, 6, 1), 55_000)],
                titles: Vec::new(),
            }),
        )
        .await
        .expect("update succeeds");

    assert_eq!(updated.salaries.len(), 1, "only the new period remains");
    assert_eq!(updated.salaries[0].id().from_date(), date(2023, 6, 1));
    assert_eq!(updated.salaries[0].amount, 55_000);
    assert!(
        updated.assignments.is_empty(),
        "an omitted list deletes every prior period"
    );
}

#[tokio::test]
async fn an_update_may_recreate_a_previously_held_period() {
    let harness = harness();
    let created = harness
        .employees
        .create(employee_input(HistoryInput {
            salaries: vec![salary(date(2024, 1, 1), 60_000)],
            ..HistoryInput::default()
        }))
        .await
        .expect("create succeeds");

    let updated = harness
        .employees
        .update(
            created.id,
            employee_update(HistoryInput {
                salaries: vec![salary(date(2024, 1, 1), 60_000)],
                ..HistoryInput::default()
            }),
        )
        .await
        .expect("repeating a prior period recreates it");
    assert_eq!(updated.salaries.len(), 1);
}

#[tokio::test]
async fn delete_cascades_to_every_history() {
    let harness = harness();
    seed_department(&harness, "d001", "Research").await;

    let created = harness
        .employees
        .create(employee_input(HistoryInput {
            assignments: vec![AssignmentInput {
                department: dept_id("d001"),
                from_date: date(2024, 1, 1),
                to_date: date(2025, 1, 1),
            }],
            salaries: vec![salary(date(2024, 1, 1), 60_000)],
            titles: vec![TitleInput {
                title: title("Engineer"),
                from_date: date(2024, 1, 1),
                to_date: date(2025, 1, 1),
            }],
        }))
        .await
        .expect("create succeeds");

    let deleted = harness
        .employees
        .delete(created.id)
        .await
        .expect("delete succeeds");
    assert!(deleted);

    let error = harness
        .employees
        .get_by_id(created.id)
        .await
        .expect_err("employee is gone");
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert!(
        harness
            .employees
            .get_all()
            .await
            .expect("scan succeeds")
            .is_empty()
    );
}

#[tokio::test]
async fn department_ids_are_case_insensitive_everywhere() {
    let harness = harness();
    let created = seed_department(&harness, "D001", "Research").await;
    assert_eq!(created.id.as_str(), "d001", "stored lowercased");

    let via_lower = harness
        .departments
        .get_by_id(dept_id("d001"))
        .await
        .expect("lowercase lookup succeeds");
    let via_upper = harness
        .departments
        .get_by_id(dept_id("D001"))
        .await
        .expect("uppercase lookup succeeds");
    assert_eq!(via_lower, via_upper);

    let employee = harness
        .employees
        .create(employee_input(HistoryInput {
            assignments: vec![AssignmentInput {
                department: dept_id("D001"),
                from_date: date(2024, 1, 1),
                to_date: date(2025, 1, 1),
            }],
            ..HistoryInput::default()
        }))
        .await
        .expect("create succeeds");
    assert_eq!(employee.assignments[0].id().department().as_str(), "d001");
}

#[tokio::test]
async fn a_missing_department_is_an_error_not_an_empty_success() {
    let harness = harness();
    let error = harness
        .departments
        .get_by_id(dept_id("zzzz"))
        .await
        .expect_err("not found");
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Department with id zzzz does not exist");
}

#[tokio::test]
async fn the_active_flag_falls_back_only_when_omitted() {
    let harness = harness();
    let created = harness
        .employees
        .create(employee_input(HistoryInput::default()))
        .await
        .expect("create succeeds");
    assert!(created.profile.active);

    let untouched = harness
        .employees
        .update(created.id, employee_update(HistoryInput::default()))
        .await
        .expect("update succeeds");
    assert!(untouched.profile.active, "omitted flag keeps the old value");

    let mut explicit = employee_update(HistoryInput::default());
    explicit.active = Some(false);
    let deactivated = harness
        .employees
        .update(created.id, explicit)
        .await
        .expect("update succeeds");
    assert!(!deactivated.profile.active, "an explicit false overwrites");

    let still_inactive = harness
        .employees
        .update(created.id, employee_update(HistoryInput::default()))
        .await
        .expect("update succeeds");
    assert!(!still_inactive.profile.active);
}

#[tokio::test]
async fn a_failing_sub_record_aborts_the_whole_create() {
    let harness = harness();
    seed_department(&harness, "d001", "Research").await;
    seed_department(&harness, "d002", "Sales").await;

    let error = harness
        .employees
        .create(employee_input(HistoryInput {
            assignments: vec![
                AssignmentInput {
                    department: dept_id("d001"),
                    from_date: date(2024, 1, 1),
                    to_date: date(2025, 1, 1),
                },
                AssignmentInput {
                    department: dept_id("d002"),
                    from_date: date(2024, 1, 1),
                    to_date: date(2025, 1, 1),
                },
                AssignmentInput {
                    department: dept_id("d003"),
                    from_date: date(2024, 1, 1),
                    to_date: date(2025, 1, 1),
                },
            ],
            ..HistoryInput::default()
        }))
        .await
        .expect_err("the third assignment references a missing department");
    assert_eq!(error.code(), ErrorCode::NotFound);

    assert!(
        harness
            .employees
            .get_all()
            .await
            .expect("scan succeeds")
            .is_empty(),
        "no partial employee row survives the failed create"
    );
}

#[tokio::test]
async fn duplicate_period_identities_in_one_input_fail_the_operation() {
    let harness = harness();
    let error = harness
        .employees
        .create(employee_input(HistoryInput {
            salaries: vec![salary(date(2024, 1, 1), 60_000), salary(date(2024, 1, 1), 70_000)],
            ..HistoryInput::default()
        }))
        .await
        .expect_err("the second period reuses the identity of the first");
    assert_eq!(error.code(), ErrorCode::Internal);

    assert!(
        harness
            .employees
            .get_all()
            .await
            .expect("scan succeeds")
            .is_empty()
    );
}

#[tokio::test]
async fn employees_list_in_ascending_id_order() {
    let harness = harness();
    for _ in 0..3 {
        harness
            .employees
            .create(employee_input(HistoryInput::default()))
            .await
            .expect("create succeeds");
    }

    let all = harness.employees.get_all().await.expect("scan succeeds");
    let ids: Vec<_> = all.iter().map(|e| e.id).collect();
    assert_eq!(
        ids,
        vec![EmployeeId::new(1), EmployeeId::new(2), EmployeeId::new(3)]
    );
}

#[tokio::test]
async fn an_empty_store_lists_no_employees() {
    let harness = harness();
    let all = harness.employees.get_all().await.expect("scan succeeds");
    assert!(all.is_empty());
}

#[tokio::test]
async fn updates_touch_only_the_update_side_of_the_audit_trail() {
    let harness = harness();
    let created = harness
        .employees
        .create(employee_input(HistoryInput::default()))
        .await
        .expect("create succeeds");

    let updated = harness
        .employees
        .update(created.id, employee_update(HistoryInput::default()))
        .await
        .expect("update succeeds");

    assert_eq!(updated.audit.created_by, created.audit.created_by);
    assert_eq!(updated.audit.created_at, created.audit.created_at);
    assert_eq!(updated.audit.updated_by, 2);
    assert!(updated.audit.updated_at >= created.audit.updated_at);
}

#[tokio::test]
async fn mutating_a_missing_employee_is_not_found() {
    let harness = harness();
    let ghost = EmployeeId::new(41);

    let update_error = harness
        .employees
        .update(ghost, employee_update(HistoryInput::default()))
        .await
        .expect_err("nothing to update");
    assert_eq!(update_error.code(), ErrorCode::NotFound);

    let delete_error = harness
        .employees
        .delete(ghost)
        .await
        .expect_err("nothing to delete");
    assert_eq!(delete_error.code(), ErrorCode::NotFound);
    assert_eq!(
        delete_error.message(),
        "Employee with id 41 does not exist"
    );
}

#[tokio::test]
async fn creating_a_department_twice_is_a_conflict() {
    let harness = harness();
    seed_department(&harness, "d001", "Research").await;

    let error = harness
        .departments
        .create(NewDepartment {
            id: dept_id("D001"),
            name: "Research Again".into(),
            active: None,
            created_by: 1,
        })
        .await
        .expect_err("identity already taken, whatever the capitalisation");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn departments_list_in_ascending_id_order() {
    let harness = harness();
    for raw in ["d003", "d001", "d002"] {
        seed_department(&harness, raw, "Anything").await;
    }
    let all = harness.departments.get_all().await.expect("scan succeeds");
    let ids: Vec<_> = all.iter().map(|d| d.id.as_str().to_owned()).collect();
    assert_eq!(ids, ["d001", "d002", "d003"]);
}
