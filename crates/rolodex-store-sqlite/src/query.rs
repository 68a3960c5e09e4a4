//! Parameterised SQL built from sparse search and update criteria.
//!
//! Column names come only from [`Field`]; every user-supplied value is bound
//! as a positional parameter and never spliced into the statement text.

use rolodex_core::{
  person::{PersonUpdate, present, trimmed},
  store::PersonQuery,
};
use rusqlite::types::Value;

use crate::encode::encode_date;

// ─── Fields ──────────────────────────────────────────────────────────────────

/// The fixed set of columns a search or update may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  PersonId,
  FirstName,
  LastName,
  Patronymic,
  DateOfBirth,
  Number,
  Email,
}

impl Field {
  /// Pattern-matched fields, in the order their predicates are emitted.
  pub const TEXT: [Field; 5] = [
    Field::FirstName,
    Field::Patronymic,
    Field::LastName,
    Field::Number,
    Field::Email,
  ];

  /// Qualified column in the joined search statement.
  pub fn column(self) -> &'static str {
    match self {
      Field::PersonId => "p.person_id",
      Field::FirstName => "p.first_name",
      Field::LastName => "p.last_name",
      Field::Patronymic => "p.patronymic",
      Field::DateOfBirth => "p.date_of_birth",
      Field::Number => "pn.number",
      Field::Email => "ea.email",
    }
  }

  /// Unqualified column name in the field's own table.
  pub fn bare_column(self) -> &'static str {
    match self {
      Field::PersonId => "person_id",
      Field::FirstName => "first_name",
      Field::LastName => "last_name",
      Field::Patronymic => "patronymic",
      Field::DateOfBirth => "date_of_birth",
      Field::Number => "number",
      Field::Email => "email",
    }
  }

  fn text_value(self, query: &PersonQuery) -> Option<&str> {
    match self {
      Field::FirstName => present(&query.first_name),
      Field::LastName => present(&query.last_name),
      Field::Patronymic => present(&query.patronymic),
      Field::Number => present(&query.number),
      Field::Email => present(&query.email),
      Field::PersonId | Field::DateOfBirth => None,
    }
  }
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
  Where,
  And,
}

impl Connective {
  fn as_sql(self) -> &'static str {
    match self {
      Connective::Where => "WHERE",
      Connective::And => "AND",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
  /// `LIKE`, with wildcards taken as the caller typed them.
  Matches,
  Equals,
}

impl Comparison {
  fn as_sql(self) -> &'static str {
    match self {
      Comparison::Matches => "LIKE",
      Comparison::Equals => "=",
    }
  }
}

/// One clause of a search filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Predicate {
  pub connective: Connective,
  pub field:      Field,
  pub comparison: Comparison,
}

/// The `WHERE … ORDER BY` tail of a directory search, with its parameters.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
  predicates: Vec<Predicate>,
  params:     Vec<Value>,
}

impl SearchFilter {
  fn push(&mut self, field: Field, comparison: Comparison, value: Value) {
    let connective = if self.predicates.is_empty() {
      Connective::Where
    } else {
      Connective::And
    };
    self.predicates.push(Predicate { connective, field, comparison });
    self.params.push(value);
  }

  pub fn predicates(&self) -> &[Predicate] { &self.predicates }

  pub fn params(&self) -> &[Value] { &self.params }

  /// Render the filter; placeholders are numbered in parameter order.
  pub fn to_sql(&self) -> String {
    let mut sql = String::new();
    for (i, p) in self.predicates.iter().enumerate() {
      sql.push_str(&format!(
        "{} {} {} ?{} ",
        p.connective.as_sql(),
        p.field.column(),
        p.comparison.as_sql(),
        i + 1,
      ));
    }
    sql.push_str("ORDER BY p.person_id");
    sql
  }

  pub fn into_parts(self) -> (String, Vec<Value>) {
    let sql = self.to_sql();
    (sql, self.params)
  }
}

/// Build the filter for a directory search.
///
/// 1. Each non-empty text field, in [`Field::TEXT`] order, adds a pattern
///    match.
/// 2. `person_id`, when present, adds an equality.
/// 3. Only when `person_id` is absent, `date_of_birth` adds an equality.
///
/// The first predicate gets `WHERE`, the rest `AND`; results are always
/// ordered by `person_id`.
pub fn build_search_predicate(query: &PersonQuery) -> SearchFilter {
  let mut filter = SearchFilter::default();

  for field in Field::TEXT {
    if let Some(value) = field.text_value(query) {
      filter.push(field, Comparison::Matches, Value::Text(value.to_owned()));
    }
  }

  match (query.person_id, query.date_of_birth) {
    (Some(id), _) => filter.push(Field::PersonId, Comparison::Equals, Value::Integer(id)),
    (None, Some(date)) => {
      filter.push(Field::DateOfBirth, Comparison::Equals, Value::Text(encode_date(date)))
    }
    (None, None) => {}
  }

  filter
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// A complete `UPDATE person SET … WHERE person_id = ?` statement.
#[derive(Debug, Clone)]
pub struct UpdateStatement {
  assignments: Vec<Field>,
  params:      Vec<Value>,
}

impl UpdateStatement {
  pub fn assignments(&self) -> &[Field] { &self.assignments }

  pub fn params(&self) -> &[Value] { &self.params }

  pub fn to_sql(&self) -> String {
    let set = self
      .assignments
      .iter()
      .enumerate()
      .map(|(i, f)| format!("{} = ?{}", f.bare_column(), i + 1))
      .collect::<Vec<_>>()
      .join(", ");
    format!(
      "UPDATE person SET {set} WHERE person_id = ?{}",
      self.assignments.len() + 1
    )
  }

  pub fn into_parts(self) -> (String, Vec<Value>) {
    let sql = self.to_sql();
    (sql, self.params)
  }
}

/// Build the assignment list for changing a person.
///
/// Text fields are trimmed and assigned only when non-empty; a date is always assigned
/// when given. Returns `None` when nothing qualifies, so an empty `SET` is
/// never executed.
pub fn build_update_assignment(person_id: i64, update: &PersonUpdate) -> Option<UpdateStatement> {
  let mut assignments = Vec::new();
  let mut params = Vec::new();

  let text = [
    (Field::FirstName, trimmed(&update.first_name)),
    (Field::Patronymic, trimmed(&update.patronymic)),
    (Field::LastName, trimmed(&update.last_name)),
  ];
  for (field, value) in text {
    if let Some(value) = value {
      assignments.push(field);
      params.push(Value::Text(value.to_owned()));
    }
  }
  if let Some(date) = update.date_of_birth {
    assignments.push(Field::DateOfBirth);
    params.push(Value::Text(encode_date(date)));
  }

  if assignments.is_empty() {
    return None;
  }
  params.push(Value::Integer(person_id));
  Some(UpdateStatement { assignments, params })
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn dob() -> NaiveDate { NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() }

  #[test]
  fn empty_query_only_orders() {
    let filter = build_search_predicate(&PersonQuery::default());
    assert!(filter.predicates().is_empty());
    assert!(filter.params().is_empty());
    assert_eq!(filter.to_sql(), "ORDER BY p.person_id");
  }

  #[test]
  fn empty_strings_are_skipped() {
    let query = PersonQuery {
      first_name: Some(String::new()),
      email: Some(String::new()),
      ..Default::default()
    };
    assert!(build_search_predicate(&query).predicates().is_empty());
  }

  #[test]
  fn text_fields_in_fixed_order() {
    let query = PersonQuery {
      email: Some("%@mail.ru".into()),
      last_name: Some("Petrov".into()),
      first_name: Some("Ivan".into()),
      ..Default::default()
    };
    let filter = build_search_predicate(&query);

    assert_eq!(
      filter.to_sql(),
      "WHERE p.first_name LIKE ?1 AND p.last_name LIKE ?2 AND ea.email LIKE ?3 \
       ORDER BY p.person_id"
    );
    assert_eq!(
      filter.params(),
      &[
        Value::Text("Ivan".into()),
        Value::Text("Petrov".into()),
        Value::Text("%@mail.ru".into()),
      ]
    );
  }

  #[test]
  fn person_id_alone_uses_where() {
    let filter = build_search_predicate(&PersonQuery::by_id(4));
    assert_eq!(filter.to_sql(), "WHERE p.person_id = ?1 ORDER BY p.person_id");
    assert_eq!(filter.params(), &[Value::Integer(4)]);
  }

  #[test]
  fn person_id_after_text_uses_and() {
    let query = PersonQuery {
      number: Some("7999%".into()),
      person_id: Some(2),
      ..Default::default()
    };
    let filter = build_search_predicate(&query);
    assert_eq!(
      filter.to_sql(),
      "WHERE pn.number LIKE ?1 AND p.person_id = ?2 ORDER BY p.person_id"
    );
  }

  #[test]
  fn person_id_takes_precedence_over_date_of_birth() {
    let query = PersonQuery {
      person_id: Some(9),
      date_of_birth: Some(dob()),
      ..Default::default()
    };
    let filter = build_search_predicate(&query);
    assert_eq!(filter.predicates().len(), 1);
    assert_eq!(filter.predicates()[0].field, Field::PersonId);
    assert_eq!(filter.params(), &[Value::Integer(9)]);
  }

  #[test]
  fn date_of_birth_without_person_id() {
    let filter = build_search_predicate(&PersonQuery {
      date_of_birth: Some(dob()),
      ..Default::default()
    });
    assert_eq!(filter.to_sql(), "WHERE p.date_of_birth = ?1 ORDER BY p.person_id");
    assert_eq!(filter.params(), &[Value::Text("1990-01-01".into())]);

    let filter = build_search_predicate(&PersonQuery {
      patronymic: Some("Petrovich".into()),
      date_of_birth: Some(dob()),
      ..Default::default()
    });
    assert_eq!(
      filter.predicates().iter().map(|p| p.connective).collect::<Vec<_>>(),
      [Connective::Where, Connective::And]
    );
  }

  #[test]
  fn wildcards_pass_through() {
    let filter = build_search_predicate(&PersonQuery {
      last_name: Some("Pet%_".into()),
      ..Default::default()
    });
    assert_eq!(filter.params(), &[Value::Text("Pet%_".into())]);
    assert_eq!(filter.predicates()[0].comparison, Comparison::Matches);
  }

  #[test]
  fn update_with_nothing_is_none() {
    assert!(build_update_assignment(1, &PersonUpdate::default()).is_none());
    let blank = PersonUpdate {
      first_name: Some(String::new()),
      last_name: Some(String::new()),
      patronymic: Some(String::new()),
      date_of_birth: None,
    };
    assert!(build_update_assignment(1, &blank).is_none());
  }

  #[test]
  fn update_assigns_present_fields() {
    let update = PersonUpdate {
      first_name: Some("Pyotr".into()),
      last_name: Some(String::new()),
      patronymic: None,
      date_of_birth: Some(dob()),
    };
    let stmt = build_update_assignment(12, &update).unwrap();
    assert_eq!(stmt.assignments(), &[Field::FirstName, Field::DateOfBirth]);
    assert_eq!(
      stmt.to_sql(),
      "UPDATE person SET first_name = ?1, date_of_birth = ?2 WHERE person_id = ?3"
    );
    assert_eq!(
      stmt.params(),
      &[
        Value::Text("Pyotr".into()),
        Value::Text("1990-01-01".into()),
        Value::Integer(12),
      ]
    );
  }

  #[test]
  fn update_values_are_trimmed() {
    let stmt = build_update_assignment(5, &PersonUpdate {
      first_name: Some("  Pyotr ".into()),
      patronymic: Some("   ".into()),
      ..Default::default()
    })
    .unwrap();
    assert_eq!(stmt.assignments(), &[Field::FirstName]);
    assert_eq!(stmt.params(), &[Value::Text("Pyotr".into()), Value::Integer(5)]);
  }

  #[test]
  fn update_date_alone_is_enough() {
    let stmt = build_update_assignment(3, &PersonUpdate {
      date_of_birth: Some(dob()),
      ..Default::default()
    })
    .unwrap();
    assert_eq!(
      stmt.to_sql(),
      "UPDATE person SET date_of_birth = ?1 WHERE person_id = ?2"
    );
  }
}
