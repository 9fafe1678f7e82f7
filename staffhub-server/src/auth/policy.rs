//! 授权策略表
//!
//! 每个业务操作对应一条声明式规则 ([`Operation::capability`])，
//! 所有入口在修改或读取数据之前调用 [`authorize`]。
//! 角色不符返回所需角色，归属不符返回被违反的规则。

use shared::error::{AppError, AppResult};
use shared::models::Role;

use crate::security_log;

/// 已解析的调用者 (令牌 + 员工目录)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: i64,
    pub role: Role,
    pub company: String,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// 授权能力
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// 管理员
    Admin,
    /// 普通员工
    Employee,
    /// 任意已登录用户
    AnyAuthenticated,
    /// 任务的被指派人
    Assignee,
    /// 创建任务的管理员
    Creator,
    /// 资源所属员工
    Owner,
    /// 资源所属员工，或同公司管理员
    OwnerOrCompanyAdmin,
}

/// 受保护的业务操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ManageEmployees,
    AssignTask,
    ListCompanyTasks,
    ListEmployeeTasks,
    ListMyTasks,
    ViewTask,
    UpdateTaskStatus,
    DeleteTask,
    StartShift,
    EndShift,
    UpdateWorkSummary,
    ViewShift,
    ListShifts,
    CurrentShift,
}

impl Operation {
    /// 策略表
    pub const fn capability(self) -> Capability {
        match self {
            Operation::ManageEmployees => Capability::Admin,
            Operation::AssignTask => Capability::Admin,
            Operation::ListCompanyTasks => Capability::Admin,
            Operation::ListEmployeeTasks => Capability::Admin,
            Operation::ListMyTasks => Capability::AnyAuthenticated,
            Operation::ViewTask => Capability::Assignee,
            Operation::UpdateTaskStatus => Capability::Assignee,
            Operation::DeleteTask => Capability::Creator,
            Operation::StartShift => Capability::Employee,
            Operation::EndShift => Capability::Owner,
            Operation::UpdateWorkSummary => Capability::Owner,
            Operation::ViewShift => Capability::OwnerOrCompanyAdmin,
            Operation::ListShifts => Capability::AnyAuthenticated,
            Operation::CurrentShift => Capability::AnyAuthenticated,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Operation::ManageEmployees => "manage_employees",
            Operation::AssignTask => "assign_task",
            Operation::ListCompanyTasks => "list_company_tasks",
            Operation::ListEmployeeTasks => "list_employee_tasks",
            Operation::ListMyTasks => "list_my_tasks",
            Operation::ViewTask => "view_task",
            Operation::UpdateTaskStatus => "update_task_status",
            Operation::DeleteTask => "delete_task",
            Operation::StartShift => "start_shift",
            Operation::EndShift => "end_shift",
            Operation::UpdateWorkSummary => "update_work_summary",
            Operation::ViewShift => "view_shift",
            Operation::ListShifts => "list_shifts",
            Operation::CurrentShift => "current_shift",
        }
    }
}

/// 被操作的资源
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    /// 不针对具体资源 (创建、列表)
    None,
    /// 归属于某员工的资源 (任务的被指派人、班次的员工)
    OwnedBy {
        owner_id: i64,
        owner_company: Option<&'a str>,
    },
    /// 由某管理员创建的资源
    CreatedBy(i64),
}

/// 按策略表检查调用者是否可以执行操作
pub fn authorize(op: Operation, caller: &Caller, subject: Subject<'_>) -> AppResult<()> {
    let result = check(op.capability(), caller, subject);
    if let Err(err) = &result {
        security_log!(
            "WARN",
            "authorization_denied",
            operation = op.name(),
            caller_id = caller.id,
            reason = err.message.as_str()
        );
    }
    result.map_err(|e| e.with_detail("operation", op.name()))
}

fn check(capability: Capability, caller: &Caller, subject: Subject<'_>) -> AppResult<()> {
    match capability {
        Capability::AnyAuthenticated => Ok(()),
        Capability::Admin => {
            if caller.is_admin() {
                Ok(())
            } else {
                Err(AppError::role_required(Role::Admin))
            }
        }
        Capability::Employee => {
            if caller.role == Role::Employee {
                Ok(())
            } else {
                Err(AppError::role_required(Role::Employee))
            }
        }
        Capability::Assignee => match subject {
            Subject::OwnedBy { owner_id, .. } if owner_id == caller.id => Ok(()),
            _ => Err(AppError::not_owner(
                "Only the assigned employee can access this task",
            )),
        },
        Capability::Creator => match subject {
            Subject::CreatedBy(creator) if creator == caller.id => Ok(()),
            _ => Err(AppError::not_owner(
                "Only the admin who created this task can delete it",
            )),
        },
        Capability::Owner => match subject {
            Subject::OwnedBy { owner_id, .. } if owner_id == caller.id => Ok(()),
            _ => Err(AppError::not_owner(
                "Only the employee who owns this shift can modify it",
            )),
        },
        Capability::OwnerOrCompanyAdmin => match subject {
            Subject::OwnedBy { owner_id, .. } if owner_id == caller.id => Ok(()),
            Subject::OwnedBy {
                owner_company: Some(company),
                ..
            } if caller.is_admin() && company == caller.company => Ok(()),
            Subject::OwnedBy { .. } if caller.is_admin() => {
                Err(AppError::cross_company("Cross-company access not allowed"))
            }
            _ => Err(AppError::not_owner("Not authorized to view this shift")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    fn admin(id: i64, company: &str) -> Caller {
        Caller {
            id,
            role: Role::Admin,
            company: company.to_string(),
        }
    }

    fn employee(id: i64, company: &str) -> Caller {
        Caller {
            id,
            role: Role::Employee,
            company: company.to_string(),
        }
    }

    fn owned(owner_id: i64, company: &str) -> Subject<'_> {
        Subject::OwnedBy {
            owner_id,
            owner_company: Some(company),
        }
    }

    #[test]
    fn admin_only_operations() {
        for op in [
            Operation::ManageEmployees,
            Operation::AssignTask,
            Operation::ListCompanyTasks,
            Operation::ListEmployeeTasks,
        ] {
            assert!(authorize(op, &admin(1, "Acme"), Subject::None).is_ok());
            let err = authorize(op, &employee(2, "Acme"), Subject::None).unwrap_err();
            assert_eq!(err.code, ErrorCode::AdminRequired);
        }
    }

    #[test]
    fn start_shift_requires_employee_role() {
        assert!(authorize(Operation::StartShift, &employee(2, "Acme"), Subject::None).is_ok());
        let err = authorize(Operation::StartShift, &admin(1, "Acme"), Subject::None).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmployeeRequired);
    }

    #[test]
    fn assignee_rules() {
        let caller = employee(2, "Acme");
        assert!(authorize(Operation::UpdateTaskStatus, &caller, owned(2, "Acme")).is_ok());
        assert!(authorize(Operation::ViewTask, &caller, owned(2, "Acme")).is_ok());

        let err = authorize(Operation::UpdateTaskStatus, &caller, owned(3, "Acme")).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotResourceOwner);
        assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);

        // same-company admin is still not the assignee
        assert!(authorize(Operation::UpdateTaskStatus, &admin(1, "Acme"), owned(3, "Acme")).is_err());
    }

    #[test]
    fn only_creator_deletes() {
        assert!(authorize(Operation::DeleteTask, &admin(1, "Acme"), Subject::CreatedBy(1)).is_ok());
        let err =
            authorize(Operation::DeleteTask, &admin(9, "Acme"), Subject::CreatedBy(1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotResourceOwner);
    }

    #[test]
    fn shift_view_owner_or_company_admin() {
        assert!(authorize(Operation::ViewShift, &employee(2, "Acme"), owned(2, "Acme")).is_ok());
        assert!(authorize(Operation::ViewShift, &admin(1, "Acme"), owned(2, "Acme")).is_ok());

        let err = authorize(Operation::ViewShift, &admin(5, "Globex"), owned(2, "Acme")).unwrap_err();
        assert_eq!(err.code, ErrorCode::CrossCompanyAccess);

        let err =
            authorize(Operation::ViewShift, &employee(3, "Acme"), owned(2, "Acme")).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotResourceOwner);
    }

    #[test]
    fn shift_mutations_are_owner_only() {
        for op in [Operation::EndShift, Operation::UpdateWorkSummary] {
            assert!(authorize(op, &employee(2, "Acme"), owned(2, "Acme")).is_ok());
            assert!(authorize(op, &admin(1, "Acme"), owned(2, "Acme")).is_err());
        }
    }

    #[test]
    fn denial_names_the_operation() {
        let err = authorize(Operation::AssignTask, &employee(2, "Acme"), Subject::None).unwrap_err();
        let details = err.details.unwrap();
        assert_eq!(details.get("operation").unwrap(), "assign_task");
    }
}
