//! 员工目录 (Identity Directory)
//!
//! 公司管理员注册、登录、员工增删改查，以及两个引擎共用的
//! 调用者解析与公司成员查询。

use std::sync::Arc;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Employee, EmployeeCreate, EmployeeUpdate, LoginRequest, LoginResponse, Role, SignupRequest,
};
use sqlx::SqlitePool;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{Caller, CurrentUser, JwtService, Operation, Subject, authorize};
use crate::db::repository::{RepoError, employee};
use crate::security_log;
use crate::utils::clock::SharedClock;
use crate::utils::validation::{
    MAX_NAME_LEN, normalize_email, validate_email, validate_optional_text, validate_password,
    validate_required_text,
};

#[derive(Clone)]
pub struct DirectoryService {
    pool: SqlitePool,
    jwt: Arc<JwtService>,
    clock: SharedClock,
}

impl DirectoryService {
    pub fn new(pool: SqlitePool, jwt: Arc<JwtService>, clock: SharedClock) -> Self {
        Self { pool, jwt, clock }
    }

    /// 注册公司管理员，每个公司只能有一个
    pub async fn signup(&self, input: SignupRequest) -> AppResult<Employee> {
        validate_required_text(&input.username, "username", MAX_NAME_LEN)?;
        validate_email(&input.email)?;
        validate_password(&input.password)?;
        validate_required_text(&input.company, "company", MAX_NAME_LEN)?;
        validate_optional_text(&input.designation, "designation", MAX_NAME_LEN)?;
        validate_optional_text(&input.department, "department", MAX_NAME_LEN)?;

        let company = input.company.trim().to_string();
        let email = normalize_email(&input.email);

        if employee::find_admin_by_company(&self.pool, &company)
            .await?
            .is_some()
        {
            return Err(AppError::new(ErrorCode::CompanyAdminExists));
        }
        if employee::find_by_email(&self.pool, &email).await?.is_some() {
            return Err(AppError::new(ErrorCode::EmployeeEmailExists));
        }

        let hash_pass = hash_password(&input.password)?;
        let admin = employee::create(
            &self.pool,
            employee::NewEmployee {
                username: input.username.trim().to_string(),
                email,
                hash_pass,
                designation: input.designation,
                department: input.department,
                role: Role::Admin,
                company,
            },
            self.clock.now_millis(),
        )
        .await
        .map_err(duplicate_employee)?;

        tracing::info!(employee_id = admin.id, company = %admin.company, "Company admin registered");
        Ok(admin)
    }

    /// 邮箱 + 密码登录
    pub async fn login(&self, input: LoginRequest) -> AppResult<LoginResponse> {
        let email = normalize_email(&input.email);
        let Some(user) = employee::find_by_email(&self.pool, &email).await? else {
            security_log!("WARN", "login_failed", reason = "unknown_email");
            return Err(AppError::invalid_credentials());
        };

        if !verify_password(&input.password, &user.hash_pass) {
            security_log!("WARN", "login_failed", reason = "bad_password", user_id = user.id);
            return Err(AppError::invalid_credentials());
        }

        let token = self
            .jwt
            .generate_token(user.id, &user.username, user.role)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

        security_log!("INFO", "login_success", user_id = user.id);
        Ok(LoginResponse { token, user })
    }

    /// 令牌对应的员工及其公司；员工已被删除视为未认证
    pub async fn resolve_caller(&self, user: &CurrentUser) -> AppResult<Caller> {
        let record = employee::find_by_id(&self.pool, user.id)
            .await?
            .ok_or_else(|| {
                security_log!("WARN", "token_subject_missing", user_id = user.id);
                AppError::not_authenticated()
            })?;
        Ok(Caller {
            id: record.id,
            role: record.role,
            company: record.company,
        })
    }

    /// 当前登录员工的资料
    pub async fn me(&self, user: &CurrentUser) -> AppResult<Employee> {
        employee::find_by_id(&self.pool, user.id)
            .await?
            .ok_or_else(AppError::not_authenticated)
    }

    /// 公司全部成员 id，供任务和班次按公司过滤
    pub async fn company_member_ids(&self, company: &str) -> AppResult<Vec<i64>> {
        Ok(employee::member_ids(&self.pool, company).await?)
    }

    /// 公司全部成员 (含管理员)，按创建时间排序
    pub async fn company_members(&self, company: &str) -> AppResult<Vec<Employee>> {
        Ok(employee::find_by_company(&self.pool, company).await?)
    }

    /// 按 id 查找员工 (不做权限检查)
    pub async fn find(&self, id: i64) -> AppResult<Option<Employee>> {
        Ok(employee::find_by_id(&self.pool, id).await?)
    }

    pub async fn create_employee(&self, caller: &Caller, input: EmployeeCreate) -> AppResult<Employee> {
        authorize(Operation::ManageEmployees, caller, Subject::None)?;

        validate_required_text(&input.username, "username", MAX_NAME_LEN)?;
        validate_email(&input.email)?;
        validate_password(&input.password)?;
        validate_optional_text(&input.designation, "designation", MAX_NAME_LEN)?;
        validate_optional_text(&input.department, "department", MAX_NAME_LEN)?;

        let email = normalize_email(&input.email);
        if employee::find_by_email(&self.pool, &email).await?.is_some() {
            return Err(AppError::new(ErrorCode::EmployeeEmailExists));
        }

        let hash_pass = hash_password(&input.password)?;
        let created = employee::create(
            &self.pool,
            employee::NewEmployee {
                username: input.username.trim().to_string(),
                email,
                hash_pass,
                designation: input.designation,
                department: input.department,
                role: Role::Employee,
                company: caller.company.clone(),
            },
            self.clock.now_millis(),
        )
        .await
        .map_err(duplicate_employee)?;

        tracing::info!(employee_id = created.id, created_by = caller.id, "Employee created");
        Ok(created)
    }

    pub async fn list_employees(&self, caller: &Caller) -> AppResult<Vec<Employee>> {
        authorize(Operation::ManageEmployees, caller, Subject::None)?;
        Ok(employee::find_by_company(&self.pool, &caller.company).await?)
    }

    pub async fn get_employee(&self, caller: &Caller, id: i64) -> AppResult<Employee> {
        authorize(Operation::ManageEmployees, caller, Subject::None)?;
        self.company_employee(caller, id).await
    }

    pub async fn update_employee(
        &self,
        caller: &Caller,
        id: i64,
        input: EmployeeUpdate,
    ) -> AppResult<Employee> {
        authorize(Operation::ManageEmployees, caller, Subject::None)?;
        let existing = self.company_employee(caller, id).await?;

        if let Some(username) = &input.username {
            validate_required_text(username, "username", MAX_NAME_LEN)?;
        }
        validate_optional_text(&input.designation, "designation", MAX_NAME_LEN)?;
        validate_optional_text(&input.department, "department", MAX_NAME_LEN)?;

        let email = match &input.email {
            Some(raw) => {
                validate_email(raw)?;
                let email = normalize_email(raw);
                if email != existing.email
                    && employee::find_by_email(&self.pool, &email).await?.is_some()
                {
                    return Err(AppError::new(ErrorCode::EmployeeEmailExists));
                }
                Some(email)
            }
            None => None,
        };

        let hash_pass = match &input.password {
            Some(password) => {
                validate_password(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        let patch = employee::EmployeePatch {
            username: input.username.map(|u| u.trim().to_string()),
            email,
            hash_pass,
            designation: input.designation,
            department: input.department,
        };
        let updated = employee::update(&self.pool, id, patch, self.clock.now_millis())
            .await
            .map_err(duplicate_employee)?;
        Ok(updated)
    }

    /// 删除员工，其任务和班次级联删除
    pub async fn delete_employee(&self, caller: &Caller, id: i64) -> AppResult<bool> {
        authorize(Operation::ManageEmployees, caller, Subject::None)?;
        if id == caller.id {
            return Err(AppError::new(ErrorCode::CannotDeleteSelf));
        }
        let target = self.company_employee(caller, id).await?;

        if crate::db::repository::shift::find_open_by_employee(&self.pool, target.id)
            .await?
            .is_some()
        {
            return Err(AppError::new(ErrorCode::EmployeeHasOpenShift));
        }

        let deleted = employee::delete(&self.pool, target.id).await?;
        if deleted {
            tracing::info!(employee_id = target.id, deleted_by = caller.id, "Employee deleted");
        }
        Ok(deleted)
    }

    /// 同公司员工；其他公司的员工按不存在处理
    async fn company_employee(&self, caller: &Caller, id: i64) -> AppResult<Employee> {
        employee::find_by_id(&self.pool, id)
            .await?
            .filter(|e| e.company == caller.company)
            .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))
    }
}

/// 唯一约束冲突 -> 具体业务错误
fn duplicate_employee(err: RepoError) -> AppError {
    match err {
        RepoError::Duplicate(msg) if msg.contains("employee.email") => {
            AppError::new(ErrorCode::EmployeeEmailExists)
        }
        RepoError::Duplicate(msg) if msg.contains("employee.company") => {
            AppError::new(ErrorCode::CompanyAdminExists)
        }
        other => other.into(),
    }
}
