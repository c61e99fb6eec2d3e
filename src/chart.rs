use crate::histogram::HourlyHistogram;

const BAR_WIDTH: u64 = 50;
const BAR_CELL: char = '█';

fn bar_length(count: u64, max: u64) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    // Non-zero hours always get at least one cell.
    ((count * BAR_WIDTH + max - 1) / max) as usize
}

/// Text bar chart of calls per hour.
pub fn render_chart(histogram: &HourlyHistogram) -> String {
    let max = histogram.max();
    let count_width = max.to_string().len();

    let mut out = format!(
        "Ligações por hora - {}\n\n",
        histogram.date().format("%d/%m/%Y")
    );

    for (bucket, count) in histogram.iter() {
        let bar: String = std::iter::repeat(BAR_CELL)
            .take(bar_length(count, max))
            .collect();
        out.push_str(&format!(
            "{} | {:>width$} {}\n",
            bucket.hour_label(),
            count,
            bar,
            width = count_width
        ));
    }

    out.push_str(&format!("\nTotal: {} ligações\n", histogram.total()));
    out
}
