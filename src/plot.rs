use plotters::prelude::*;

use crate::aggregate::AggregatedSeries;

/// Renders an aggregated series as an SVG bar chart, one bar per
/// category in series order
pub fn bar_chart(series: &AggregatedSeries, title: &str, x_desc: &str, y_desc: &str, filename: &str) {
    if series.entries.is_empty() {
        return;
    }

    let root = SVGBackend::new(filename, (768, 512)).into_drawing_area();
    root.fill(&WHITE).unwrap();

    let max_value = series
        .entries
        .iter()
        .map(|(_, value)| *value)
        .fold(f64::NEG_INFINITY, f64::max);
    let mut chart = ChartBuilder::on(&root)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .margin(10)
        .caption(title, ("sans-serif", 20))
        .build_cartesian_2d(
            (0..series.entries.len() as i32).into_segmented(),
            0f64..max_value * 1.05,
        )
        .unwrap();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(series.entries.len())
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(idx) => series
                .entries
                .get(*idx as usize)
                .map(|(label, _)| label.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()
        .unwrap();

    let mut colors = colorous::TABLEAU10.iter().cycle();
    chart
        .draw_series(series.entries.iter().enumerate().map(|(idx, (_, value))| {
            let color = colors.next().unwrap();
            let rgb = RGBColor(color.r, color.g, color.b);
            Rectangle::new(
                [
                    (SegmentValue::Exact(idx as i32), 0f64),
                    (SegmentValue::Exact(idx as i32 + 1), *value),
                ],
                rgb.filled(),
            )
        }))
        .unwrap();
}
