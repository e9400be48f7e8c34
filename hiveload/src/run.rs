use std::sync::Arc;

use anyhow::Context as _;
use hiveload_core::{
    IterationMetrics, OutcomeAccountant, RunConfig, RunPlan, Workload, WorkloadRunner,
    run_workload,
};
use hiveload_http::HttpClient;
use hiveload_metrics::Registry;
use hiveload_workloads::{
    GetUser, GetUserConfig, SearchUsers, SearchUsersConfig, WorkloadKind, WriteSql,
    WriteSqlConfig,
};

use crate::cli::{HttpArgs, RunArgs};
use crate::exit_codes::ExitCode;
use crate::output::{self, OutputFormatter, RunSummary};
use crate::run_error::RunError;

pub async fn run(args: RunArgs) -> Result<ExitCode, RunError> {
    let plan = RunConfig {
        vus: args.vus,
        iterations: args.iterations,
        duration: args.duration,
    }
    .resolve()
    .context("invalid run options")
    .map_err(RunError::InvalidInput)?;

    let out = output::formatter(args.output);

    match args.workload {
        WorkloadKind::GetUser => {
            let workload = GetUser::new(
                http_client(&args.http),
                GetUserConfig {
                    base_url: args.http.base_url.clone(),
                    max_user_id: args.http.max_user_id,
                    timeout: args.http.request_timeout,
                },
            )
            .context("invalid get-user options")
            .map_err(RunError::InvalidInput)?;
            execute(workload, plan, out.as_ref()).await
        }
        WorkloadKind::SearchUsers => {
            let workload = SearchUsers::new(
                http_client(&args.http),
                SearchUsersConfig {
                    base_url: args.http.base_url.clone(),
                    first_name: args.http.first_name.clone(),
                    last_name: args.http.last_name.clone(),
                    limit: args.http.limit,
                    timeout: args.http.request_timeout,
                },
            )
            .context("invalid search-users options")
            .map_err(RunError::InvalidInput)?;
            execute(workload, plan, out.as_ref()).await
        }
        WorkloadKind::WriteSql => {
            let workload = WriteSql::connect_lazy(WriteSqlConfig {
                database_url: args.sql.database_url.clone(),
                max_connections: args.sql.max_connections,
                ..WriteSqlConfig::default()
            })
            .context("invalid write-sql options")
            .map_err(RunError::InvalidInput)?;
            execute(workload, plan, out.as_ref()).await
        }
    }
}

fn http_client(args: &HttpArgs) -> HttpClient {
    match args.request_timeout {
        Some(timeout) => HttpClient::new(Some(timeout)),
        None => HttpClient::default(),
    }
}

async fn execute<W: Workload>(
    workload: W,
    plan: RunPlan,
    out: &dyn OutputFormatter,
) -> Result<ExitCode, RunError> {
    let workload = Arc::new(workload);
    let scenario = workload.name().to_string();
    let labels = workload.outcome_labels();

    let registry = Arc::new(Registry::default());
    let runner = WorkloadRunner::new(Arc::new(OutcomeAccountant::default()))
        .with_metrics(IterationMetrics::register(registry.clone(), &scenario));

    out.print_header(&scenario, &plan);

    let report = run_workload(workload, plan, runner, out.progress())
        .await
        .context("workload run failed")
        .map_err(RunError::RuntimeError)?;

    tracing::debug!(
        scenario = %scenario,
        success = report.success_count,
        failure = report.failure_count,
        unique_errors = report.unique_errors,
        "run finished"
    );

    let series = registry.summarize();
    out.print_summary(&RunSummary {
        scenario: &scenario,
        labels,
        report: &report,
        series: &series,
    })
    .map_err(RunError::RuntimeError)?;

    Ok(ExitCode::from_failures(report.failure_count))
}
