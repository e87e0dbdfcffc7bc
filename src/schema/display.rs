//! Text rendering of descriptor headers and tuple rows.

/// Terminal width the aligned layout divides between columns
const WINDOW_WIDTH: usize = 120;

/// Center `value` in one of `ncols` equal columns, followed by a `|` separator.
///
/// Values too wide for the column are cut.
pub(crate) fn format_column(value: &str, ncols: usize) -> String {
    let col_width = WINDOW_WIDTH / ncols.max(1);
    let used = value.len() + 3;

    if col_width > used {
        let remaining = col_width - used;
        let right = remaining / 2;
        let left = remaining - right;
        format!("{}{}{} |", " ".repeat(left), value, " ".repeat(right))
    } else {
        let keep = col_width.saturating_sub(4);
        let cut: String = value.chars().take(keep).collect();
        format!(" {} |", cut)
    }
}

/// Join cells into one line, either aligned columns or comma separated
pub(crate) fn format_row(cells: &[String], aligned: bool) -> String {
    if aligned {
        cells
            .iter()
            .map(|c| format!(" {}", format_column(c, cells.len())))
            .collect()
    } else {
        cells.join(",")
    }
}
