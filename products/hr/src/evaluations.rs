use entity::{evaluation, users};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
    sea_query::Expr,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    error::{HrError, HrResult},
    model::{NewEvaluation, Page, PageRequest, PerformanceReport},
    store::{HrStore, referenced_employee},
};

impl HrStore {
    #[instrument(
        name = "hr.create_evaluation",
        skip_all,
        fields(employee_id = %input.employee_id, kind = ?input.evaluation_type)
    )]
    pub async fn create_evaluation(&self, input: NewEvaluation) -> HrResult<evaluation::Model> {
        if input.period_end < input.period_start {
            return Err(HrError::validation("evaluation period ends before it starts"));
        }
        if let Some(grade) = input.overall_grade {
            if grade < Decimal::ZERO || grade > Decimal::TEN {
                return Err(HrError::validation("overall grade must be between 0 and 10"));
            }
        }
        referenced_employee(&self.db, input.employee_id).await?;
        if users::Entity::find_by_id(input.evaluator_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(HrError::missing_reference("user", input.evaluator_id));
        }

        let model = evaluation::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(input.employee_id),
            evaluation_type: Set(input.evaluation_type),
            period_start: Set(input.period_start),
            period_end: Set(input.period_end),
            evaluator_id: Set(input.evaluator_id),
            overall_grade: Set(input.overall_grade),
            comments: Set(input.comments),
            strengths: Set(input.strengths),
            improvement_points: Set(input.improvement_points),
            evaluation_date: Set(self.now()),
        }
        .insert(&self.db)
        .await?;
        info!(evaluation_id = %model.id, "evaluation recorded");
        Ok(model)
    }

    /// Most recent evaluations first.
    #[instrument(name = "hr.list_evaluations", skip(self))]
    pub async fn list_evaluations(
        &self,
        evaluation_type: Option<evaluation::EvaluationType>,
        page: PageRequest,
    ) -> HrResult<Page<evaluation::Model>> {
        let mut query = evaluation::Entity::find();
        if let Some(kind) = evaluation_type {
            query = query.filter(evaluation::Column::EvaluationType.eq(kind));
        }
        let paginator = query
            .order_by_desc(evaluation::Column::EvaluationDate)
            .order_by_asc(evaluation::Column::Id)
            .paginate(&self.db, page.page_size());
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.index()).await?;
        Ok(Page {
            items,
            total,
            page: page.page(),
            page_size: page.page_size(),
        })
    }

    /// Mean overall grade (ungraded evaluations ignored) and evaluation count.
    #[instrument(name = "hr.performance_report", skip(self))]
    pub async fn performance_report(&self) -> HrResult<PerformanceReport> {
        let report = evaluation::Entity::find()
            .select_only()
            .column_as(
                Expr::cust("CAST(AVG(evaluation.overall_grade) AS DOUBLE PRECISION)"),
                "average_grade",
            )
            .column_as(
                Expr::col((evaluation::Entity, evaluation::Column::Id)).count(),
                "evaluations",
            )
            .into_model::<PerformanceReport>()
            .one(&self.db)
            .await?;
        Ok(report.unwrap_or_default())
    }
}
