use weather_core::{DisplaySurface, ForecastBlock, StatusTone, SummaryView};

/// Spaces between forecast columns.
const COLUMN_GAP: usize = 3;

/// Draws the weather screen as plain text.
///
/// Status changes go to stderr as they happen; the panel and forecast strip
/// are buffered and printed by [`TerminalSurface::draw`].
#[derive(Debug, Default)]
pub struct TerminalSurface {
    status: Option<(String, StatusTone)>,
    panel_visible: bool,
    summary: Option<SummaryView>,
    forecast: Vec<ForecastBlock>,
}

impl TerminalSurface {
    pub fn draw(&self) -> String {
        let mut out = String::new();

        if let Some((message, StatusTone::Error)) = &self.status {
            out.push_str(&format!("! {message}\n"));
        }

        if let (true, Some(summary)) = (self.panel_visible, &self.summary) {
            out.push_str(&draw_summary(summary));

            if !self.forecast.is_empty() {
                out.push('\n');
                out.push_str(&draw_strip(&self.forecast));
            }
        }

        out
    }
}

impl DisplaySurface for TerminalSurface {
    fn set_status(&mut self, message: &str, tone: StatusTone) {
        if message.is_empty() {
            self.status = None;
            return;
        }
        if tone == StatusTone::Info {
            eprintln!("{message}");
        }
        self.status = Some((message.to_owned(), tone));
    }

    fn set_panel_visible(&mut self, visible: bool) {
        self.panel_visible = visible;
    }

    fn set_summary(&mut self, summary: &SummaryView) {
        self.summary = Some(summary.clone());
    }

    fn clear_forecast(&mut self) {
        self.forecast.clear();
    }

    fn push_forecast(&mut self, block: &ForecastBlock) {
        self.forecast.push(block.clone());
    }
}

fn draw_summary(summary: &SummaryView) -> String {
    let mut out = format!(
        "{}\n{}\n{}   H: {}  L: {}   Humidity: {}\n",
        summary.place,
        summary.description,
        summary.current,
        summary.high,
        summary.low,
        summary.humidity,
    );

    if let Some(url) = &summary.icon_url {
        out.push_str(&format!("Icon: {url}\n"));
    }

    out
}

/// One column per forecast block: time, icon code, temperature, label.
///
/// Every column is as wide as the widest cell in the strip.
fn draw_strip(blocks: &[ForecastBlock]) -> String {
    let rows: Vec<Vec<&str>> = vec![
        blocks.iter().map(|b| b.time.as_str()).collect(),
        blocks
            .iter()
            .map(|b| b.icon_url.as_deref().map(icon_code).unwrap_or_default())
            .collect(),
        blocks.iter().map(|b| b.temp.as_str()).collect(),
        blocks.iter().map(|b| b.label.as_str()).collect(),
    ];

    let width = rows
        .iter()
        .flatten()
        .map(|cell| cell.chars().count())
        .max()
        .unwrap_or(0)
        + COLUMN_GAP;

    let mut out = String::new();
    for row in rows {
        let line: String = row
            .iter()
            .map(|cell| format!("{cell:<width$}"))
            .collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// `https://openweathermap.org/img/wn/10d@2x.png` -> `10d`
fn icon_code(url: &str) -> &str {
    let file = url.rsplit('/').next().unwrap_or(url);
    file.split('@').next().unwrap_or(file)
}
