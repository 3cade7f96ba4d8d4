use chrono::NaiveTime;
use entity::{attendance, employee};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select, Set,
    sea_query::Expr,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::{HrError, HrResult},
    model::{
        AttendanceEntry, AttendanceFilter, AttendanceRow, AttendanceSummary, Page, PageRequest,
        Punches, YearMonth,
    },
    store::{HrStore, employee_names, referenced_employee},
};

const WORK_DAYS_PER_WEEK: i64 = 5;

impl HrStore {
    /// One row per employee and day; a second entry for the same day is a
    /// duplicate, never an overwrite.
    #[instrument(
        name = "hr.record_attendance",
        skip_all,
        fields(employee_id = %entry.employee_id, date = %entry.date)
    )]
    pub async fn record_attendance(&self, entry: AttendanceEntry) -> HrResult<attendance::Model> {
        entry.punches.validate()?;
        let employee = referenced_employee(&self.db, entry.employee_id).await?;

        let hours_worked = match entry.hours_worked {
            Some(hours) => hours,
            None => entry.punches.worked_hours().unwrap_or(Decimal::ZERO),
        };
        let overtime_hours = match entry.overtime_hours {
            Some(hours) => hours,
            None => overtime_for(hours_worked, employee.work_hours),
        };
        if hours_worked < Decimal::ZERO || overtime_hours < Decimal::ZERO {
            return Err(HrError::validation("hours must not be negative"));
        }
        if hours_worked > Decimal::from(24) {
            return Err(HrError::validation("more than 24 hours in one day"));
        }

        let existing = attendance::Entity::find()
            .filter(attendance::Column::EmployeeId.eq(entry.employee_id))
            .filter(attendance::Column::Date.eq(entry.date))
            .count(&self.db)
            .await?;
        if existing > 0 {
            warn!("attendance already recorded for this day");
            return Err(HrError::DuplicateKey(format!(
                "attendance for employee {} on {}",
                entry.employee_id, entry.date
            )));
        }

        let model = attendance::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(entry.employee_id),
            date: Set(entry.date),
            check_in: Set(entry.punches.check_in),
            lunch_out: Set(entry.punches.lunch_out),
            lunch_in: Set(entry.punches.lunch_in),
            check_out: Set(entry.punches.check_out),
            hours_worked: Set(hours_worked),
            overtime_hours: Set(overtime_hours),
            notes: Set(entry.notes),
        }
        .insert(&self.db)
        .await?;
        info!(attendance_id = %model.id, %hours_worked, "attendance recorded");
        Ok(model)
    }

    /// Records inside `month`, newest day first.
    #[instrument(name = "hr.list_attendance", skip(self))]
    pub async fn list_attendance(
        &self,
        month: YearMonth,
        filter: AttendanceFilter,
        page: PageRequest,
    ) -> HrResult<Page<AttendanceRow>> {
        let paginator = attendance_in_month(month, filter)
            .order_by_desc(attendance::Column::Date)
            .order_by_asc(attendance::Column::EmployeeId)
            .paginate(&self.db, page.page_size());
        let total = paginator.num_items().await?;
        let records = paginator.fetch_page(page.index()).await?;

        let names = employee_names(&self.db, records.iter().map(|r| r.employee_id)).await?;
        let items = records
            .into_iter()
            .map(|record| AttendanceRow {
                employee_name: names.get(&record.employee_id).cloned().unwrap_or_default(),
                record,
            })
            .collect();
        Ok(Page {
            items,
            total,
            page: page.page(),
            page_size: page.page_size(),
        })
    }

    /// Averages of hours and overtime over the month. Averages are `None`
    /// when no rows match.
    #[instrument(name = "hr.monthly_attendance_summary", skip(self))]
    pub async fn monthly_attendance_summary(
        &self,
        month: YearMonth,
        filter: AttendanceFilter,
    ) -> HrResult<AttendanceSummary> {
        let summary = attendance_in_month(month, filter)
            .select_only()
            .column_as(
                Expr::cust("CAST(AVG(attendance.hours_worked) AS DOUBLE PRECISION)"),
                "avg_hours_worked",
            )
            .column_as(
                Expr::cust("CAST(AVG(attendance.overtime_hours) AS DOUBLE PRECISION)"),
                "avg_overtime_hours",
            )
            .column_as(
                Expr::col((attendance::Entity, attendance::Column::Id)).count(),
                "records",
            )
            .into_model::<AttendanceSummary>()
            .one(&self.db)
            .await?;
        Ok(summary.unwrap_or_default())
    }
}

fn attendance_in_month(month: YearMonth, filter: AttendanceFilter) -> Select<attendance::Entity> {
    let mut query = attendance::Entity::find()
        .filter(attendance::Column::Date.gte(month.first_day()))
        .filter(attendance::Column::Date.lt(month.next_first_day()));
    if let Some(employee_id) = filter.employee_id {
        query = query.filter(attendance::Column::EmployeeId.eq(employee_id));
    }
    if let Some(department_id) = filter.department_id {
        query = query
            .join(JoinType::InnerJoin, attendance::Relation::Employee.def())
            .filter(employee::Column::DepartmentId.eq(department_id));
    }
    query
}

/// Hours above the daily share of the employee's weekly hours.
fn overtime_for(hours_worked: Decimal, weekly_hours: i32) -> Decimal {
    let daily = Decimal::from(weekly_hours) / Decimal::from(WORK_DAYS_PER_WEEK);
    (hours_worked - daily).max(Decimal::ZERO).round_dp(2)
}

impl Punches {
    /// Present punches must be in check-in, lunch-out, lunch-in, check-out order.
    pub fn validate(&self) -> HrResult<()> {
        let present: Vec<NaiveTime> = [self.check_in, self.lunch_out, self.lunch_in, self.check_out]
            .into_iter()
            .flatten()
            .collect();
        if present.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(HrError::validation("punches are out of order"));
        }
        if self.lunch_out.is_some() != self.lunch_in.is_some() {
            return Err(HrError::validation("lunch needs both out and in punches"));
        }
        Ok(())
    }

    /// Check-out minus check-in minus the lunch break, in hours (2 dp).
    /// `None` without both check-in and check-out.
    pub fn worked_hours(&self) -> Option<Decimal> {
        let (start, end) = (self.check_in?, self.check_out?);
        let mut minutes = (end - start).num_minutes();
        if let (Some(out), Some(back)) = (self.lunch_out, self.lunch_in) {
            minutes -= (back - out).num_minutes();
        }
        Some((Decimal::from(minutes) / Decimal::from(60)).round_dp(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    #[test]
    fn full_day_subtracts_lunch() {
        let punches = Punches {
            check_in: t(8, 0),
            lunch_out: t(12, 0),
            lunch_in: t(13, 0),
            check_out: t(17, 30),
        };
        punches.validate().unwrap();
        assert_eq!(punches.worked_hours(), Some(Decimal::new(850, 2)));
    }

    #[test]
    fn no_check_out_means_no_hours() {
        let punches = Punches {
            check_in: t(8, 0),
            ..Punches::default()
        };
        assert_eq!(punches.worked_hours(), None);
    }

    #[test]
    fn out_of_order_punches_are_rejected() {
        let punches = Punches {
            check_in: t(9, 0),
            check_out: t(8, 0),
            ..Punches::default()
        };
        assert!(matches!(punches.validate(), Err(HrError::Validation(_))));
    }

    #[test]
    fn half_a_lunch_is_rejected() {
        let punches = Punches {
            check_in: t(8, 0),
            lunch_out: t(12, 0),
            check_out: t(17, 0),
            ..Punches::default()
        };
        assert!(punches.validate().is_err());
    }

    #[test]
    fn overtime_uses_daily_share() {
        assert_eq!(overtime_for(Decimal::new(950, 2), 40), Decimal::new(150, 2));
        assert_eq!(overtime_for(Decimal::from(6), 40), Decimal::ZERO);
        assert_eq!(overtime_for(Decimal::from(7), 30), Decimal::ONE);
    }
}
