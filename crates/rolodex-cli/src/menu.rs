//! The interactive menu loop.
//!
//! Each action prompts for its input, calls the directory and prints the
//! affected rows. Bad input is reported and the menu comes back; only a
//! storage or terminal failure ends the loop.

use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use rolodex_core::{
  Error as CoreError,
  person::{NewPerson, PersonUpdate, UpdateOutcome},
  store::{Directory, PersonQuery},
  validate::parse_date,
};
use rolodex_store_sqlite::{Error as StoreError, SqliteDirectory};

use crate::{generate, settings::GenerateSettings, table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
  Find,
  AddPerson,
  AddPhone,
  AddEmail,
  Update,
  RemovePhone,
  RemoveEmail,
  RemovePerson,
  RemoveAll,
  Generate,
  Quit,
}

impl Action {
  const ALL: [Action; 11] = [
    Action::Find,
    Action::AddPerson,
    Action::AddPhone,
    Action::AddEmail,
    Action::Update,
    Action::RemovePhone,
    Action::RemoveEmail,
    Action::RemovePerson,
    Action::RemoveAll,
    Action::Generate,
    Action::Quit,
  ];

  fn label(self) -> &'static str {
    match self {
      Action::Find => "Find people",
      Action::AddPerson => "Add a person",
      Action::AddPhone => "Add a phone number",
      Action::AddEmail => "Add an email address",
      Action::Update => "Change a person's details",
      Action::RemovePhone => "Remove a phone number",
      Action::RemoveEmail => "Remove an email address",
      Action::RemovePerson => "Remove a person",
      Action::RemoveAll => "Remove everyone",
      Action::Generate => "Add generated test data",
      Action::Quit => "Quit",
    }
  }
}

/// Whether an action's error should end the program.
fn is_fatal(err: &anyhow::Error) -> bool {
  if let Some(e) = err.downcast_ref::<StoreError>() {
    return !e.is_recoverable();
  }
  err.downcast_ref::<CoreError>().is_none()
}

/// Run the menu until the user quits.
pub async fn run(dir: &SqliteDirectory, plan: &GenerateSettings) -> Result<()> {
  let labels: Vec<_> = Action::ALL.iter().map(|a| a.label()).collect();

  loop {
    println!();
    let choice = Select::new()
      .with_prompt("What would you like to do?")
      .items(&labels)
      .default(0)
      .interact()?;

    let action = Action::ALL[choice];
    let outcome = match action {
      Action::Find => find(dir).await,
      Action::AddPerson => add_person(dir).await,
      Action::AddPhone | Action::AddEmail => add_contact(dir, action).await,
      Action::Update => update(dir).await,
      Action::RemovePhone | Action::RemoveEmail => remove_contact(dir, action).await,
      Action::RemovePerson => remove_person(dir).await,
      Action::RemoveAll => remove_all(dir).await,
      Action::Generate => seed_test_data(dir, plan).await,
      Action::Quit => return Ok(()),
    };

    if let Err(err) = outcome {
      if is_fatal(&err) {
        return Err(err);
      }
      tracing::debug!(?action, error = %err, "action rejected");
      println!("\n{err}");
    }
  }
}

// ─── Prompts ─────────────────────────────────────────────────────────────────

fn ask(prompt: &str) -> Result<String> {
  let answer: String = Input::new()
    .with_prompt(prompt)
    .allow_empty(true)
    .interact_text()?;
  Ok(answer.trim().to_owned())
}

fn ask_opt(prompt: &str) -> Result<Option<String>> {
  let answer = ask(prompt)?;
  Ok((!answer.is_empty()).then_some(answer))
}

/// Names, birth date and contacts, as entered by the user.
struct Details {
  first_name:    Option<String>,
  last_name:     Option<String>,
  patronymic:    Option<String>,
  date_of_birth: Option<chrono::NaiveDate>,
  number:        Option<String>,
  email:         Option<String>,
}

fn ask_details(with_contacts: bool) -> Result<Details> {
  let last_name = ask_opt("Last name")?;
  let first_name = ask_opt("First name")?;
  let patronymic = ask_opt("Patronymic")?;
  let date_of_birth = parse_date(&ask("Date of birth (YYYY-MM-DD)")?)?;
  let (number, email) = if with_contacts {
    (ask_opt("Phone number (digits only)")?, ask_opt("Email")?)
  } else {
    (None, None)
  };
  Ok(Details { first_name, last_name, patronymic, date_of_birth, number, email })
}

fn ask_criteria() -> Result<PersonQuery> {
  println!("Leave a field blank to skip it; % matches any run of characters.");
  let details = ask_details(true)?;
  Ok(PersonQuery {
    person_id:     None,
    first_name:    details.first_name,
    last_name:     details.last_name,
    patronymic:    details.patronymic,
    date_of_birth: details.date_of_birth,
    number:        details.number,
    email:         details.email,
  })
}

/// Search, show the matches and ask which person to act on.
async fn pick_person(dir: &SqliteDirectory) -> Result<Option<i64>> {
  let query = ask_criteria()?;
  show(&dir.find_person(&query).await?);

  let raw = ask("Person ID")?;
  let Ok(person_id) = raw.parse::<i64>() else {
    println!("A numeric person ID is required.");
    return Ok(None);
  };
  if !dir.person_exists(person_id).await? {
    return Err(CoreError::PersonNotFound(person_id).into());
  }
  Ok(Some(person_id))
}

fn show(rows: &[rolodex_core::person::DirectoryRow]) {
  if rows.is_empty() {
    println!("\nNothing matches.");
  } else {
    println!("\n{}", table::render(rows));
  }
}

async fn show_person(dir: &SqliteDirectory, person_id: i64) -> Result<()> {
  show(&dir.find_person(&PersonQuery::by_id(person_id)).await?);
  Ok(())
}

// ─── Actions ─────────────────────────────────────────────────────────────────

async fn find(dir: &SqliteDirectory) -> Result<()> {
  let mut query = ask_criteria()?;
  if let Some(raw) = ask_opt("Person ID")? {
    let Ok(id) = raw.parse() else {
      println!("A numeric person ID is required.");
      return Ok(());
    };
    query.person_id = Some(id);
  }
  show(&dir.find_person(&query).await?);
  Ok(())
}

async fn add_person(dir: &SqliteDirectory) -> Result<()> {
  println!("First name, last name and date of birth are required.");
  let details = ask_details(true)?;
  let date_of_birth = details
    .date_of_birth
    .ok_or(CoreError::MissingField("date of birth"))?;

  let input = NewPerson {
    first_name: details.first_name.unwrap_or_default(),
    last_name: details.last_name.unwrap_or_default(),
    patronymic: details.patronymic,
    date_of_birth,
    phone: details.number,
    email: details.email,
  };

  match dir.insert_person(input).await {
    Ok(person_id) => {
      println!("\nAdded:");
      show_person(dir, person_id).await
    }
    Err(err @ StoreError::PartialInsert { person_id, .. }) if err.is_recoverable() => {
      println!("\n{err}");
      show_person(dir, person_id).await
    }
    Err(err) => Err(err.into()),
  }
}

async fn add_contact(dir: &SqliteDirectory, action: Action) -> Result<()> {
  let Some(person_id) = pick_person(dir).await? else { return Ok(()) };

  if action == Action::AddPhone {
    let number = ask("Phone number (digits only)")?;
    dir.insert_phone(number, person_id).await?;
  } else {
    let email = ask("Email")?;
    dir.insert_email(email, person_id).await?;
  }

  println!("\nAdded:");
  show_person(dir, person_id).await
}

async fn update(dir: &SqliteDirectory) -> Result<()> {
  let Some(person_id) = pick_person(dir).await? else { return Ok(()) };

  println!("Enter the new values; leave a field blank to keep it.");
  let details = ask_details(false)?;
  let update = PersonUpdate {
    first_name:    details.first_name,
    last_name:     details.last_name,
    patronymic:    details.patronymic,
    date_of_birth: details.date_of_birth,
  };

  match dir.update_person(person_id, update).await? {
    UpdateOutcome::Applied => {
      println!("\nUpdated:");
      show_person(dir, person_id).await
    }
    UpdateOutcome::NothingToUpdate => {
      println!("\nNothing entered, nothing changed.");
      Ok(())
    }
  }
}

async fn remove_contact(dir: &SqliteDirectory, action: Action) -> Result<()> {
  let Some(person_id) = pick_person(dir).await? else { return Ok(()) };

  let removed = if action == Action::RemovePhone {
    dir.delete_phone(person_id, ask("Phone number (% allowed)")?).await?
  } else {
    dir.delete_email(person_id, ask("Email (% allowed)")?).await?
  };

  println!("\nRemoved {removed}. Remaining:");
  show_person(dir, person_id).await
}

async fn remove_person(dir: &SqliteDirectory) -> Result<()> {
  let Some(person_id) = pick_person(dir).await? else { return Ok(()) };

  let deleted = dir.delete_person(person_id).await?;
  println!(
    "\nRemoved person {} with {} phone number(s) and {} email address(es).",
    deleted.person_id, deleted.phones, deleted.emails
  );
  Ok(())
}

async fn remove_all(dir: &SqliteDirectory) -> Result<()> {
  let everyone = dir.find_person(&PersonQuery::default()).await?;
  println!("\nThe directory currently holds:");
  show(&everyone);
  if everyone.is_empty() {
    return Ok(());
  }

  let sure = Confirm::new()
    .with_prompt("Remove everyone listed above?")
    .default(false)
    .interact()?;
  if !sure {
    println!("Nothing removed.");
    return Ok(());
  }

  let removed = dir.delete_all().await?;
  println!("\nRemoved {removed} people.");
  show(&dir.find_person(&PersonQuery::default()).await?);
  Ok(())
}

/// Insert a generated batch and print what was added.
pub async fn seed_test_data(dir: &SqliteDirectory, plan: &GenerateSettings) -> Result<()> {
  let people = generate::batch(&mut rand::thread_rng(), plan);
  let ids = generate::seed(dir, people).await?;

  let mut rows = Vec::new();
  for &id in &ids {
    rows.extend(dir.find_person(&PersonQuery::by_id(id)).await?);
  }
  println!("\nAdded {} people:", ids.len());
  show(&rows);
  Ok(())
}
