//! Upload command - submit a CSV file for analysis.

use std::path::PathBuf;

use colored::Colorize;
use inferview::{
    CandidateFile, ClientConfig, HttpAnalysisService, NotificationLevel, ResultWorkflow,
    UploadState, UploadWorkflow,
};

use crate::cli::DisplayArgs;

use super::output::{print_notifications, render_result};
use super::show::loaded_result;

pub fn run(
    file: PathBuf,
    show: bool,
    display: &DisplayArgs,
    config: ClientConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let candidate = CandidateFile::from_path(&file)?;
    let service = HttpAnalysisService::new(config)?;

    let mut workflow = UploadWorkflow::new();
    if let Err(e) = workflow.select_file(candidate) {
        return Err(first_error(&mut workflow).unwrap_or_else(|| e.to_string()).into());
    }

    eprintln!(
        "{} {}",
        "Uploading".cyan().bold(),
        file.display().to_string().white()
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(workflow.submit(&service))?;

    let response = match workflow.state() {
        UploadState::Succeeded(response) => response.clone(),
        other => {
            let state = other.name();
            let message = first_error(&mut workflow)
                .unwrap_or_else(|| format!("upload ended in state '{}'", state));
            return Err(message.into());
        }
    };
    print_notifications(&workflow.drain_notifications());
    println!("{}", response.id);

    if !show {
        eprintln!(
            "Run {} to view the results.",
            format!("inferview show {}", response.id).cyan().bold()
        );
        return Ok(());
    }

    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let id = response.id.clone();

    match response.into_analysis(file_name) {
        Some(result) => {
            log::debug!("Upload response carried the table; skipping fetch");
            render_result(&result, display)
        }
        None => {
            let mut results = ResultWorkflow::new();
            runtime.block_on(results.load(&id, &service));
            let result = loaded_result(&mut results)?;
            render_result(result, display)
        }
    }
}

/// Take the first error notification, dropping the rest.
fn first_error(workflow: &mut UploadWorkflow) -> Option<String> {
    workflow
        .drain_notifications()
        .into_iter()
        .find(|n| n.level == NotificationLevel::Error)
        .map(|n| n.text)
}
