//! Command-line driver for todosync.
//!
//! Fetches every list and its tasks from the service, optionally creates a
//! list and a task, then prints the stores.
//!
//! ```bash
//! TODOSYNC_API_URL=https://todo.example.com/api/1.1 \
//! TODOSYNC_API_KEY=secret \
//!     todosync "Groceries" "Buy milk"
//! ```
//!
//! Set `TODOSYNC_METRICS_ADDR` (e.g. `0.0.0.0:9000`) to expose Prometheus
//! metrics while the command runs. Pass `--json` to print the state as JSON.

use anyhow::Context;
use std::time::Duration;
use todosync::{HttpTaskApi, OperationStatus, RequestStatus, TodoApp};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const ENV_METRICS_ADDR: &str = "TODOSYNC_METRICS_ADDR";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,todosync=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Ok(addr) = std::env::var(ENV_METRICS_ADDR) {
        let addr = addr
            .parse()
            .with_context(|| format!("{ENV_METRICS_ADDR}={addr} is not a socket address"))?;
        todosync_runtime::metrics::install_prometheus(addr)?;
    }

    let (json, titles): (Vec<String>, Vec<String>) =
        std::env::args().skip(1).partition(|arg| arg == "--json");
    let mut titles = titles.into_iter();

    let api = HttpTaskApi::from_env().context("invalid service configuration")?;
    tracing::info!(base_url = %api.config().base_url, "Connecting to todo-list service");
    let app = TodoApp::new(api);

    report("fetch lists", &app.fetch_todolists().await?);

    if let Some(list_title) = titles.next() {
        report("create list", &app.create_todolist(list_title.as_str()).await?);

        let created = app
            .todolists()
            .await
            .into_iter()
            .rev()
            .find(|list| list.title == list_title);

        if let (Some(list), Some(task_title)) = (created, titles.next()) {
            report("add task", &app.add_task(list.id, task_title).await?);
        }
    }

    if json.is_empty() {
        for list in app.todolists().await {
            println!("{} [{:?}]", list.title, list.filter);
            for task in app.visible_tasks(&list.id).await {
                let mark = if task.is_completed() { "x" } else { " " };
                println!("  [{mark}] {}", task.title);
            }
        }
    } else {
        let state = app.store().state(Clone::clone).await;
        println!("{}", serde_json::to_string_pretty(&state)?);
    }

    app.shutdown(Duration::from_secs(5)).await?;
    Ok(())
}

fn report(what: &str, status: &OperationStatus) {
    match status.status {
        RequestStatus::Failed => {
            tracing::error!(
                op = %status.id,
                error = status.error.as_deref().unwrap_or_default(),
                "{what} failed"
            );
        },
        _ => tracing::info!(op = %status.id, "{what}: {:?}", status.status),
    }
}
