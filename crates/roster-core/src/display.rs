//! Vertical card display for roster rows.

use crate::schema::Field;
use crate::value::Value;

const LABEL_WIDTH: usize = 24;

/// Render a row as `HEADER  value` lines, one per field, in schema order.
///
/// Empty cells are shown as `-`; missing trailing cells are treated as empty.
pub fn card_lines(cells: &[Value]) -> Vec<String> {
    Field::ALL
        .iter()
        .map(|&field| {
            let shown = match cells.get(field.index()) {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => "-".to_string(),
            };
            format!("  {:<width$} {}", field.header(), shown, width = LABEL_WIDTH)
        })
        .collect()
}

/// Numbered list of fields for the update menu.
pub fn field_menu_lines() -> Vec<String> {
    Field::ALL
        .iter()
        .map(|f| format!("  {:>2}. {}", f.position(), f.header()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn card_formats_dates_and_blanks() {
        let mut cells = vec![Value::Empty; Field::COUNT];
        cells[Field::RegistrationDate.index()] =
            Value::Date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        cells[Field::CompanyName.index()] = Value::text("Acme SAS");

        let lines = card_lines(&cells);
        assert_eq!(lines.len(), Field::COUNT);
        assert!(lines[1].starts_with("  FECHA_DE_MATRICULA"));
        assert!(lines[1].ends_with("05/01/2024"));
        assert!(lines[2].ends_with("Acme SAS"));
        assert!(lines[0].ends_with(" -"));
    }

    #[test]
    fn card_tolerates_short_rows() {
        let lines = card_lines(&[Value::text("Persona Natural")]);
        assert_eq!(lines.len(), Field::COUNT);
        assert!(lines[14].ends_with(" -"));
    }

    #[test]
    fn menu_is_one_based() {
        let lines = field_menu_lines();
        assert_eq!(lines[0], "   1. ORG_JURIDICA");
        assert_eq!(lines[14], "  15. TIPO_DE_RIESGO_ARL");
    }
}
