use std::fmt::Write as _;

use tracing::{error, info};

use super::dto::{AdviceRequest, AdviceResponse, TaskBrief};
use crate::{error::AppError, state::AppState};

pub fn build_prompt(tasks: &[TaskBrief]) -> String {
    let mut details = String::new();
    for t in tasks {
        let _ = write!(
            details,
            "\nTask: {}\nDescription: {}\nDue Date: {}\nAssigned To: {}\n",
            t.task_name, t.description, t.due_date, t.assigned_to
        );
    }
    format!(
        "You are a helpful assistant. Here are the details of some tasks:\n{}\n\
         Can you provide some advice on how to finish these tasks efficiently?",
        details
    )
}

pub async fn ask(state: &AppState, req: AdviceRequest) -> Result<AdviceResponse, AppError> {
    let prompt = build_prompt(&req.tasks);
    let message = state.advisor.complete(&prompt).await.map_err(|e| {
        error!(error = ?e, "advice request failed");
        AppError::Internal(e.to_string())
    })?;
    info!(tasks = req.tasks.len(), "advice returned");
    Ok(AdviceResponse { message })
}
