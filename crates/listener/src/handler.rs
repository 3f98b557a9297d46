use dispatcher::{DispatchReport, Dispatcher};
use tasks::DispatchError;
use tracing::info;

use crate::TriggerEvent;

/// Routes a decoded trigger to the matching dispatcher entry point.
pub async fn handle_trigger(
    dispatcher: &Dispatcher,
    event: TriggerEvent,
) -> Result<DispatchReport, DispatchError> {
    match event {
        TriggerEvent::TaskCreated(task) => {
            info!(
                task_id = %task.id,
                embedded = task.has_embedded_companies(),
                "task created"
            );
            dispatcher.dispatch_task(&task).await
        }
        TriggerEvent::CompanyCreated {
            task_id,
            company_id,
        } => {
            info!(%task_id, %company_id, "company created");
            dispatcher.dispatch_company(&task_id, company_id).await
        }
    }
}
