//! Show command - fetch and render the analysis stored under an id.

use inferview::error::NOT_FOUND_MESSAGE;
use inferview::{
    AnalysisResult, ClientConfig, HttpAnalysisService, NotificationLevel, ResultState,
    ResultWorkflow,
};

use crate::cli::DisplayArgs;

use super::output::{print_notifications, render_result};

pub fn run(
    id: String,
    display: &DisplayArgs,
    config: ClientConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = HttpAnalysisService::new(config)?;
    let mut results = ResultWorkflow::new();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(results.load(&id, &service));

    let result = loaded_result(&mut results)?;
    render_result(result, display)
}

/// The loaded result, or an error describing why there is none.
pub fn loaded_result(
    results: &mut ResultWorkflow,
) -> Result<&AnalysisResult, Box<dyn std::error::Error>> {
    // Failures are reported through the returned error instead.
    let notifications: Vec<_> = results
        .drain_notifications()
        .into_iter()
        .filter(|n| n.level != NotificationLevel::Error)
        .collect();
    print_notifications(&notifications);

    match results.state() {
        ResultState::Loaded(result) => Ok(result),
        ResultState::NotFound { id } => Err(format!(
            "{} (id: '{}')\nUpload a file first with 'inferview upload <FILE>'.",
            NOT_FOUND_MESSAGE, id
        )
        .into()),
        ResultState::Failed { message, .. } => Err(message.clone().into()),
        other => Err(format!("no analysis loaded (state '{}')", other.name()).into()),
    }
}
