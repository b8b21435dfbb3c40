use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match meal_reminder::start_reminder_job().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("meal reminder run aborted: {err}");
            ExitCode::FAILURE
        }
    }
}
