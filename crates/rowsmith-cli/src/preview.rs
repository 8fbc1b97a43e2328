use std::fmt::Write;

use rowsmith_core::Record;

/// Render records as a left-aligned text table with a header rule.
pub fn render_table(columns: &[String], records: &[Record]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|name| name.chars().count()).collect();
    for record in records {
        for (width, value) in widths.iter_mut().zip(record.values()) {
            *width = (*width).max(value.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, columns.iter().map(String::as_str), &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    push_row(&mut out, rule.iter().map(String::as_str), &widths);
    for record in records {
        push_row(&mut out, record.values().iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    let _ = writeln!(out, "{}", line.join(" | ").trim_end());
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn pads_columns_to_widest_cell() {
        let columns: Arc<[String]> = Arc::from(vec!["id".to_string(), "city".to_string()]);
        let record = Record::build(Arc::clone(&columns), |idx| {
            if idx == 0 { "1001".to_string() } else { "Zoé".to_string() }
        });

        let table = render_table(&columns, &[record]);
        assert_eq!(table, "id   | city\n---- | ----\n1001 | Zoé\n");
    }
}
