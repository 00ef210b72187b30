//! Plain-text tables for stdout.

use client_core::{Pager, SelectOption};
use shared::domain::{Education, Position, PositionRef, Teacher};

pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.chars().count());
                format!("{cell}{}", " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let rules: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    let mut out = vec![line(headers.to_vec()), line(rules.iter().map(String::as_str).collect())];
    for row in rows {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out.join("\n")
}

/// `None` when the pager would be hidden.
pub fn pager_line(pager: &Pager) -> Option<String> {
    if pager.is_hidden() {
        return None;
    }
    let mut line = pager.to_string();
    if pager.has_previous() {
        line.push_str(&format!(" | prev: --page {}", pager.current - 1));
    }
    if pager.has_next() {
        line.push_str(&format!(" | next: --page {}", pager.current + 1));
    }
    Some(line)
}

pub fn positions_table(rows: &[&Position], pager: &Pager) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .enumerate()
        .map(|(index, position)| {
            vec![
                pager.row_number(index).to_string(),
                position.id.to_string(),
                or_dash(&position.code),
                or_dash(&position.name),
                or_dash(&position.description),
                position.status_label().to_string(),
            ]
        })
        .collect();
    with_pager(
        table(&["#", "ID", "Code", "Name", "Description", "Status"], &cells),
        pager,
    )
}

pub fn teachers_table(rows: &[Teacher], pager: &Pager) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .enumerate()
        .map(|(index, teacher)| {
            vec![
                pager.row_number(index).to_string(),
                teacher.id.to_string(),
                teacher.display_code().to_string(),
                teacher.display_name().to_string(),
                or_dash(&teacher.user.email),
                teacher.user.phone.as_deref().map(or_dash).unwrap_or_else(|| "-".into()),
                education_cell(&teacher.education),
                positions_cell(&teacher.positions),
                teacher.user.address.as_deref().map(or_dash).unwrap_or_else(|| "-".into()),
                teacher.status.label().to_string(),
            ]
        })
        .collect();
    with_pager(
        table(
            &[
                "#", "ID", "Code", "Teacher", "Email", "Phone", "Education", "Positions",
                "Address", "Status",
            ],
            &cells,
        ),
        pager,
    )
}

pub fn options_list(options: &[&SelectOption]) -> String {
    let cells: Vec<Vec<String>> = options
        .iter()
        .map(|option| vec![option.value.to_string(), option.label.clone()])
        .collect();
    table(&["ID", "Position"], &cells)
}

fn with_pager(mut body: String, pager: &Pager) -> String {
    if let Some(line) = pager_line(pager) {
        body.push('\n');
        body.push_str(&line);
    }
    body
}

fn education_cell(education: &Education) -> String {
    if education.is_blank() {
        return "-".into();
    }
    let mut parts = Vec::new();
    if !education.degree.is_empty() {
        parts.push(format!("Degree: {}", education.degree));
    }
    if !education.major.is_empty() {
        parts.push(format!("Major: {}", education.major));
    }
    parts.join("; ")
}

fn positions_cell(positions: &[PositionRef]) -> String {
    if positions.is_empty() {
        return "-".into();
    }
    positions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "-".into()
    } else {
        value.to_string()
    }
}
