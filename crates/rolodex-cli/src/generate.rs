//! Synthetic test people: Russian names with derived patronymics, random
//! birth dates, phone numbers and transliterated email addresses.

use chrono::NaiveDate;
use rand::{Rng, seq::SliceRandom};
use rolodex_core::{person::NewPerson, store::Directory};

use crate::settings::GenerateSettings;

const MALE_FIRST_NAMES: &[&str] = &[
  "Алексей", "Егор", "Федор", "Михаил", "Петр", "Сергей", "Марк", "Степан", "Андрей", "Жорж",
];

const FEMALE_FIRST_NAMES: &[&str] = &[
  "Арина", "Мария", "Злата", "Петра", "Светлана", "Ирина", "Жанна", "Виктория", "Екатерина",
  "Татьяна",
];

const LAST_NAMES: &[&str] = &[
  "Иванов", "Петров", "Сидоров", "Кузнецов", "Смирнов", "Попов", "Соколов", "Михайлов",
  "Васильев", "Федоров",
];

const EMAIL_DOMAINS: &[&str] = &[
  "mail.ru", "gmail.com", "yandex.ru", "ya.ru", "hotmail.com", "rambler.ru", "yahoo.com",
  "mail.com", "outlook.com", "protonmail.com",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
  Male,
  Female,
}

/// Derive a patronymic from a father's first name.
pub fn patronymic(father: &str, sex: Sex) -> String {
  let (soft, hard) = match sex {
    Sex::Male => ("евич", "ович"),
    Sex::Female => ("евна", "овна"),
  };
  if father.ends_with("рж") {
    format!("{father}{soft}")
  } else if let Some(stem) = father.strip_suffix("ей") {
    format!("{stem}е{soft}")
  } else {
    format!("{father}{hard}")
  }
}

/// 11 to 15 digits, never starting with zero.
pub fn phone_number<R: Rng + ?Sized>(rng: &mut R) -> String {
  let len = rng.gen_range(11..=15);
  let mut number = String::with_capacity(len);
  number.push(char::from(b'0' + rng.gen_range(1..=9)));
  for _ in 1..len {
    number.push(char::from(b'0' + rng.gen_range(0..=9)));
  }
  number
}

/// Latin spelling of a Cyrillic string, lowercased. Non-Cyrillic characters
/// pass through; hard and soft signs are dropped.
pub fn transliterate(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars().flat_map(char::to_lowercase) {
    let latin = match c {
      'а' => "a",
      'б' => "b",
      'в' => "v",
      'г' => "g",
      'д' => "d",
      'е' | 'ё' | 'э' => "e",
      'ж' => "zh",
      'з' => "z",
      'и' => "i",
      'й' => "j",
      'к' => "k",
      'л' => "l",
      'м' => "m",
      'н' => "n",
      'о' => "o",
      'п' => "p",
      'р' => "r",
      'с' => "s",
      'т' => "t",
      'у' => "u",
      'ф' => "f",
      'х' => "h",
      'ц' => "ts",
      'ч' => "ch",
      'ш' => "sh",
      'щ' => "sch",
      'ъ' | 'ь' => "",
      'ы' => "y",
      'ю' => "ju",
      'я' => "ja",
      other => {
        out.push(other);
        continue;
      }
    };
    out.push_str(latin);
  }
  out
}

/// One of six local-part shapes built from the person's names.
pub fn email_address<R: Rng + ?Sized>(
  rng: &mut R,
  first: &str,
  last: &str,
  patronymic: &str,
) -> String {
  let f = first.chars().next().unwrap_or_default();
  let p = patronymic.chars().next().unwrap_or_default();
  let local = match rng.gen_range(0..6) {
    0 => format!("{f}.{p}.{last}"),
    1 => format!("{f}-{p}-{last}"),
    2 => format!("{f}_{p}_{last}"),
    3 => format!("{first}.{last}"),
    4 => format!("{first}-{last}"),
    _ => format!("{first}_{last}"),
  };
  let domain = EMAIL_DOMAINS.choose(rng).copied().unwrap_or("mail.ru");
  format!("{}@{domain}", transliterate(&local))
}

fn pick<R: Rng + ?Sized>(rng: &mut R, names: &'static [&'static str]) -> &'static str {
  names.choose(rng).copied().unwrap_or_default()
}

/// A complete random person of the given sex.
pub fn person<R: Rng + ?Sized>(rng: &mut R, sex: Sex) -> NewPerson {
  let father = pick(rng, MALE_FIRST_NAMES);
  let (first, last) = match sex {
    Sex::Male => (pick(rng, MALE_FIRST_NAMES).to_owned(), pick(rng, LAST_NAMES).to_owned()),
    Sex::Female => (
      pick(rng, FEMALE_FIRST_NAMES).to_owned(),
      format!("{}а", pick(rng, LAST_NAMES)),
    ),
  };
  let patronymic = patronymic(father, sex);

  // Day capped at 28 so every month is valid.
  let date_of_birth = NaiveDate::from_ymd_opt(
    rng.gen_range(1960..=2021),
    rng.gen_range(1..=12),
    rng.gen_range(1..=28),
  )
  .unwrap_or_default();

  let phone = phone_number(rng);
  let email = email_address(rng, &first, &last, &patronymic);

  NewPerson::new(first, last, date_of_birth)
    .with_patronymic(patronymic)
    .with_phone(phone)
    .with_email(email)
}

/// A batch of men followed by women, each count drawn from `plan`.
pub fn batch<R: Rng + ?Sized>(rng: &mut R, plan: &GenerateSettings) -> Vec<NewPerson> {
  let men = rng.gen_range(plan.min_per_sex..=plan.max_per_sex);
  let women = rng.gen_range(plan.min_per_sex..=plan.max_per_sex);
  let mut people = Vec::with_capacity(men + women);
  for _ in 0..men {
    people.push(person(rng, Sex::Male));
  }
  for _ in 0..women {
    people.push(person(rng, Sex::Female));
  }
  people
}

/// Insert `people` one by one and return their new ids.
pub async fn seed<D: Directory>(dir: &D, people: Vec<NewPerson>) -> Result<Vec<i64>, D::Error> {
  let mut ids = Vec::with_capacity(people.len());
  for p in people {
    ids.push(dir.insert_person(p).await?);
  }
  tracing::info!(count = ids.len(), "seeded test data");
  Ok(ids)
}
