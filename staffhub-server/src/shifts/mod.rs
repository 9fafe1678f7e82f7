//! 班次跟踪引擎
//!
//! 每个员工同一时间最多一个未结束班次 (end_time 为空)，
//! 由 `uq_shift_open_per_employee` 唯一索引保证。

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Shift, ShiftEnd, ShiftWorkSummary, elapsed_hours};
use sqlx::SqlitePool;

use crate::auth::{Caller, Operation, Subject, authorize};
use crate::db::repository::{RepoError, shift};
use crate::directory::DirectoryService;
use crate::utils::clock::SharedClock;
use crate::utils::validation::{MAX_SUMMARY_LEN, validate_max_len};

#[derive(Clone)]
pub struct ShiftService {
    pool: SqlitePool,
    directory: DirectoryService,
    clock: SharedClock,
}

impl ShiftService {
    pub fn new(pool: SqlitePool, directory: DirectoryService, clock: SharedClock) -> Self {
        Self {
            pool,
            directory,
            clock,
        }
    }

    /// 开始班次
    pub async fn start_shift(&self, caller: &Caller) -> AppResult<Shift> {
        authorize(Operation::StartShift, caller, Subject::None)?;

        if shift::find_open_by_employee(&self.pool, caller.id)
            .await?
            .is_some()
        {
            return Err(AppError::shift_already_open());
        }

        // 两个并发请求都通过了上面的检查时，由唯一索引拒绝后一个
        let started = shift::create(&self.pool, caller.id, self.clock.now_millis())
            .await
            .map_err(|e| match e {
                RepoError::Duplicate(_) => AppError::shift_already_open(),
                other => other.into(),
            })?;

        tracing::info!(shift_id = started.id, employee_id = caller.id, "Shift started");
        Ok(started)
    }

    /// 结束班次，必须提交工作总结
    pub async fn end_shift(&self, caller: &Caller, shift_id: i64, input: ShiftEnd) -> AppResult<Shift> {
        let current = self.load(shift_id).await?;
        authorize(Operation::EndShift, caller, owner_of(&current, None))?;

        let summary = required_summary(input.work_summary)?;
        if !current.is_open() {
            return Err(AppError::shift_already_closed());
        }

        let now = self.clock.now_millis();
        // end_time 必须晚于 start_time
        let end_time = now.max(current.start_time + 1);
        let closed = shift::close(
            &self.pool,
            shift_id,
            shift::ShiftClose {
                end_time,
                work_summary: summary,
                total_hours: elapsed_hours(current.start_time, end_time),
            },
            now,
        )
        .await?;
        if !closed {
            return Err(AppError::shift_already_closed());
        }

        let ended = self.load(shift_id).await?;
        tracing::info!(
            shift_id,
            employee_id = caller.id,
            total_hours = ended.total_hours.unwrap_or_default(),
            "Shift ended"
        );
        Ok(ended)
    }

    /// 更新进行中班次的工作总结
    pub async fn update_work_summary(
        &self,
        caller: &Caller,
        shift_id: i64,
        input: ShiftWorkSummary,
    ) -> AppResult<Shift> {
        let current = self.load(shift_id).await?;
        authorize(Operation::UpdateWorkSummary, caller, owner_of(&current, None))?;

        let summary = required_summary(input.work_summary)?;
        if !current.is_open() {
            return Err(AppError::shift_already_closed());
        }

        let updated =
            shift::update_summary(&self.pool, shift_id, &summary, self.clock.now_millis()).await?;
        if !updated {
            return Err(AppError::shift_already_closed());
        }
        self.load(shift_id).await
    }

    /// 员工查看自己的班次，管理员查看本公司的班次
    pub async fn get_shift_by_id(&self, caller: &Caller, shift_id: i64) -> AppResult<Shift> {
        let found = self.load(shift_id).await?;
        let owner_company = if caller.id == found.employee_id {
            None
        } else {
            self.directory
                .find(found.employee_id)
                .await?
                .map(|e| e.company)
        };
        authorize(
            Operation::ViewShift,
            caller,
            owner_of(&found, owner_company.as_deref()),
        )?;
        Ok(found)
    }

    /// 管理员: 本公司全部班次；员工: 自己的班次
    pub async fn list_shifts(&self, caller: &Caller) -> AppResult<Vec<Shift>> {
        authorize(Operation::ListShifts, caller, Subject::None)?;
        let employees = if caller.is_admin() {
            self.directory.company_member_ids(&caller.company).await?
        } else {
            vec![caller.id]
        };
        Ok(shift::find_by_employees(&self.pool, &employees).await?)
    }

    /// 调用者当前未结束的班次
    pub async fn current_shift(&self, caller: &Caller) -> AppResult<Option<Shift>> {
        authorize(Operation::CurrentShift, caller, Subject::None)?;
        Ok(shift::find_open_by_employee(&self.pool, caller.id).await?)
    }

    async fn load(&self, shift_id: i64) -> AppResult<Shift> {
        shift::find_by_id(&self.pool, shift_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ShiftNotFound))
    }
}

fn owner_of<'a>(shift: &Shift, owner_company: Option<&'a str>) -> Subject<'a> {
    Subject::OwnedBy {
        owner_id: shift.employee_id,
        owner_company,
    }
}

fn required_summary(summary: Option<String>) -> AppResult<String> {
    let summary = summary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::WorkSummaryRequired))?;
    validate_max_len(&summary, "work_summary", MAX_SUMMARY_LEN)?;
    Ok(summary)
}
