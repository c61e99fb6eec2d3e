use crate::error::{QueryError, Result};
use crate::histogram::HourlyHistogram;
use std::fs;
use std::path::{Path, PathBuf};

pub const CSV_HEADER: [&str; 2] = ["Hora", "Quantidade de ligações"];

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render the histogram as CSV, one row per hour in key order.
pub fn to_csv(histogram: &HourlyHistogram) -> String {
    let header: Vec<String> = CSV_HEADER.iter().map(|h| escape_field(h)).collect();
    let mut out = header.join(",");
    out.push('\n');

    for (bucket, count) in histogram.iter() {
        out.push_str(&escape_field(&bucket.to_string()));
        out.push(',');
        out.push_str(&count.to_string());
        out.push('\n');
    }
    out
}

/// `ligacoes_YYYYMMDD.csv` for the histogram's day.
pub fn default_file_name(histogram: &HourlyHistogram) -> PathBuf {
    PathBuf::from(format!(
        "ligacoes_{}.csv",
        histogram.date().format("%Y%m%d")
    ))
}

pub fn write_csv(histogram: &HourlyHistogram, path: &Path) -> Result<()> {
    fs::write(path, to_csv(histogram)).map_err(|source| QueryError::ExportFailure {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("CSV written to {}", path.display());
    Ok(())
}
