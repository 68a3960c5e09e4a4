//! Fixed-width rendering of directory rows.

use rolodex_core::person::DirectoryRow;

const COLUMNS: [(&str, usize); 7] = [
  ("ID", 8),
  ("First name", 16),
  ("Patronymic", 20),
  ("Last name", 20),
  ("Date of birth", 20),
  ("Phone", 25),
  ("Email", 35),
];

fn rule() -> String {
  let width: usize = COLUMNS.iter().map(|(_, w)| w + 1).sum::<usize>() + 1;
  "-".repeat(width)
}

fn line<'a>(cells: impl IntoIterator<Item = &'a str>) -> String {
  let mut out = String::new();
  for (&(_, width), cell) in COLUMNS.iter().zip(cells) {
    out.push_str(&format!("|{cell:^width$}"));
  }
  out.push('|');
  out
}

/// Render `rows` as a boxed table. Missing values are left blank.
pub fn render(rows: &[DirectoryRow]) -> String {
  let mut out = vec![rule(), line(COLUMNS.iter().map(|(name, _)| *name)), rule()];
  for row in rows {
    let id = row.person_id.to_string();
    let dob = row.date_of_birth.to_string();
    out.push(line([
      id.as_str(),
      row.first_name.as_str(),
      row.patronymic.as_deref().unwrap_or(""),
      row.last_name.as_str(),
      dob.as_str(),
      row.number.as_deref().unwrap_or(""),
      row.email.as_deref().unwrap_or(""),
    ]));
  }
  out.push(rule());
  out.join("\n")
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  #[test]
  fn renders_rows_with_blanks() {
    let rows = [DirectoryRow {
      person_id:     1,
      first_name:    "Ivan".into(),
      last_name:     "Petrov".into(),
      patronymic:    None,
      date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
      number:        Some("79990001122".into()),
      email:         None,
    }];
    let table = render(&rows);
    let lines: Vec<_> = table.lines().collect();

    assert_eq!(lines.len(), 5);
    assert!(lines[0].chars().all(|c| c == '-'));
    assert!(lines[1].contains("Date of birth"));
    assert!(lines[3].contains("1990-01-01"));
    assert!(lines[3].contains("79990001122"));
    assert_eq!(lines[3].chars().count(), lines[0].chars().count());
  }

  #[test]
  fn empty_table_is_just_a_header() {
    assert_eq!(render(&[]).lines().count(), 4);
  }
}
