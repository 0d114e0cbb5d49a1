use serde_json::Value;

const INDENT: &str = "  ";
const GAP: &str = "  ";
const MIN_LABEL_WIDTH: usize = 6;

/// Labels are free text and give up width when the terminal is narrow.
/// Figures (money, counts, percentages, dates) are never shortened and sit
/// right-aligned so decimal points line up.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ColumnKind {
    Label,
    Figure,
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn label(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Label,
        }
    }

    pub const fn figure(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Figure,
        }
    }
}

pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(120)
        .max(40)
}

/// Two decimals with thousands separators; negatives keep a leading `-`.
pub fn money(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{grouped}.{:02}", cents % 100)
}

pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn json_money(value: Option<&Value>) -> String {
    money(value.and_then(Value::as_f64).unwrap_or(0.0))
}

pub fn json_percent(value: Option<&Value>) -> String {
    percent(value.and_then(Value::as_f64).unwrap_or(0.0))
}

pub fn json_count(value: Option<&Value>) -> String {
    value.and_then(Value::as_u64).unwrap_or(0).to_string()
}

pub fn json_text<'a>(value: Option<&'a Value>, fallback: &'a str) -> &'a str {
    value.and_then(Value::as_str).unwrap_or(fallback)
}

/// `label  value` lines with the values starting in one column.
pub fn labelled(entries: &[(&str, String)]) -> Vec<String> {
    let label_width = widest(entries.iter().map(|(label, _)| *label));
    entries
        .iter()
        .map(|(label, value)| format!("{INDENT}{}{GAP}{value}", pad_right(label, label_width)))
        .collect()
}

/// Like [`labelled`], but the values are right-aligned as a column of figures.
pub fn figures(entries: &[(&str, String)]) -> Vec<String> {
    let label_width = widest(entries.iter().map(|(label, _)| *label));
    let value_width = widest(entries.iter().map(|(_, value)| value.as_str()));
    entries
        .iter()
        .map(|(label, value)| {
            format!(
                "{INDENT}{}{GAP}{}",
                pad_right(label, label_width),
                pad_left(value, value_width)
            )
        })
        .collect()
}

pub fn table(columns: &[Column], rows: &[Vec<String>]) -> Vec<String> {
    table_within(columns, rows, terminal_width())
}

/// Header, a dashed rule, then one line per row. When the natural layout is
/// wider than `max_width`, the widest label column is shortened first and
/// its cells end in `…`.
pub fn table_within(columns: &[Column], rows: &[Vec<String>], max_width: usize) -> Vec<String> {
    if columns.is_empty() {
        return Vec::new();
    }

    let mut widths = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let cells = rows.iter().filter_map(|row| row.get(index)).map(String::as_str);
            widest(cells).max(width_of(column.name))
        })
        .collect::<Vec<usize>>();
    shrink_labels(columns, &mut widths, max_width);

    let header = columns
        .iter()
        .map(|column| column.name.to_string())
        .collect::<Vec<String>>();
    let rule = widths
        .iter()
        .map(|width| "-".repeat(*width))
        .collect::<Vec<String>>();

    let mut output = vec![
        format_line(columns, &header, &widths),
        format!("{INDENT}{}", rule.join(GAP)),
    ];
    output.extend(rows.iter().map(|row| format_line(columns, row, &widths)));
    output
}

fn shrink_labels(columns: &[Column], widths: &mut [usize], max_width: usize) {
    let layout_width = |widths: &[usize]| {
        INDENT.len() + widths.iter().sum::<usize>() + GAP.len() * widths.len().saturating_sub(1)
    };

    while layout_width(&*widths) > max_width {
        let widest_label = columns
            .iter()
            .enumerate()
            .filter(|(index, column)| {
                column.kind == ColumnKind::Label && widths[*index] > MIN_LABEL_WIDTH
            })
            .max_by_key(|(index, _)| widths[*index])
            .map(|(index, _)| index);
        let Some(index) = widest_label else {
            return;
        };
        widths[index] -= 1;
    }
}

fn format_line(columns: &[Column], cells: &[String], widths: &[usize]) -> String {
    let pieces = columns
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(index, (column, width))| {
            let value = cells.get(index).map(String::as_str).unwrap_or("");
            match column.kind {
                ColumnKind::Label => pad_right(&shorten(value, *width), *width),
                ColumnKind::Figure => pad_left(value, *width),
            }
        })
        .collect::<Vec<String>>();
    format!("{INDENT}{}", pieces.join(GAP)).trim_end().to_string()
}

fn shorten(value: &str, width: usize) -> String {
    if width_of(value) <= width {
        return value.to_string();
    }
    let kept = value.chars().take(width.saturating_sub(1)).collect::<String>();
    format!("{kept}…")
}

fn width_of(value: &str) -> usize {
    value.chars().count()
}

fn widest<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.map(width_of).max().unwrap_or(0)
}

fn pad_right(value: &str, width: usize) -> String {
    let padding = width.saturating_sub(width_of(value));
    format!("{value}{}", " ".repeat(padding))
}

fn pad_left(value: &str, width: usize) -> String {
    let padding = width.saturating_sub(width_of(value));
    format!("{}{value}", " ".repeat(padding))
}
