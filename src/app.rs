use anyhow::Context;
use std::path::PathBuf;

use crate::api::file_transport::FileTransport;
use crate::api::http_transport::HttpTransport;
use crate::api::request::QueryWindow;
use crate::api::transport::CallsTransport;
use crate::api::CallsClient;
use crate::chart::render_chart;
use crate::cli::{Config, ExportTarget, Source};
use crate::diagnostics;
use crate::error::{QueryError, Result};
use crate::export;
use crate::histogram::{aggregate, HourlyHistogram};

/// How a query that did not fail ended.
#[derive(Debug)]
pub enum QueryOutcome {
    /// The response held no usable records at all.
    NoRecords,
    /// Records came back but none of them fell on the queried day.
    NoCalls,
    Histogram(HourlyHistogram),
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    // Validate before anything touches the network.
    let window = QueryWindow::parse(&config.date)?;
    let client = CallsClient::new(build_transport(&config.source)?);

    let outcome = match query(&client, &window).await {
        Err(QueryError::MalformedResponse { reason, raw }) => {
            report_malformed(&raw);
            return Err(QueryError::MalformedResponse { reason, raw }.into());
        }
        other => other?,
    };

    match outcome {
        QueryOutcome::NoRecords => println!("Sem dados: nenhum registro válido retornado."),
        QueryOutcome::NoCalls => println!("Nenhuma ligação encontrada para essa data."),
        QueryOutcome::Histogram(histogram) => {
            if config.show_chart {
                print!("{}", render_chart(&histogram));
            }
            if let Some(target) = &config.export {
                let path = export_path(target, &histogram);
                export::write_csv(&histogram, &path)
                    .with_context(|| format!("exporting {}", window.date().format("%d/%m/%Y")))?;
                println!("CSV salvo em: {}", path.display());
            }
        }
    }

    Ok(())
}

/// Fetch one day and count its calls per hour.
pub async fn query(client: &CallsClient, window: &QueryWindow) -> Result<QueryOutcome> {
    let records = client.fetch_records(window).await?;
    if records.is_empty() {
        return Ok(QueryOutcome::NoRecords);
    }

    let histogram = aggregate(window.date(), &records);
    let stats = histogram.stats();
    if stats.other_day > 0 {
        tracing::debug!(
            "dropped {} records outside {}",
            stats.other_day,
            window.date()
        );
    }

    if histogram.total() == 0 {
        return Ok(QueryOutcome::NoCalls);
    }
    Ok(QueryOutcome::Histogram(histogram))
}

fn build_transport(source: &Source) -> Result<Box<dyn CallsTransport>> {
    match source {
        Source::File(path) => Ok(Box::new(FileTransport::new(path))),
        Source::Http {
            endpoint,
            token,
            connect_timeout,
            timeout,
        } => {
            let token = token.as_deref().ok_or(QueryError::MissingToken)?;
            let transport = HttpTransport::new(endpoint, token, *connect_timeout, *timeout)?;
            Ok(Box::new(transport))
        }
    }
}

fn export_path(target: &ExportTarget, histogram: &HourlyHistogram) -> PathBuf {
    match target {
        ExportTarget::DefaultName => export::default_file_name(histogram),
        ExportTarget::Path(path) => path.clone(),
    }
}

fn report_malformed(raw: &str) {
    let dump = diagnostics::dump_raw_response(raw, &diagnostics::default_dump_path());
    eprintln!("The API response could not be read as JSON (odd formatting or charset).");
    match dump {
        Some(path) => eprintln!("Raw response saved to: {}", path.display()),
        None => eprintln!("Raw response could not be saved."),
    }
    eprintln!("\nPreview:\n{}\n", diagnostics::preview(raw));
}
