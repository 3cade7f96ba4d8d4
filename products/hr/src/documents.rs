use entity::document;
use sea_orm::{ActiveModelTrait, Set};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    error::HrResult,
    model::NewDocument,
    store::{HrStore, referenced_employee, require_text},
};

impl HrStore {
    /// Register a stored file against an employee. Only the reference is kept.
    #[instrument(
        name = "hr.attach_document",
        skip_all,
        fields(employee_id = %input.employee_id, kind = ?input.document_type)
    )]
    pub async fn attach_document(&self, input: NewDocument) -> HrResult<document::Model> {
        let name = require_text(&input.name, "document name")?;
        let file_ref = require_text(&input.file_ref, "file reference")?;
        referenced_employee(&self.db, input.employee_id).await?;

        let model = document::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(input.employee_id),
            document_type: Set(input.document_type),
            name: Set(name),
            file_ref: Set(file_ref),
            description: Set(input.description),
            upload_date: Set(self.now()),
        }
        .insert(&self.db)
        .await?;
        info!(document_id = %model.id, "document attached");
        Ok(model)
    }
}
