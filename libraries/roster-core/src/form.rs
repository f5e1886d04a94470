//! User form model
//!
//! A create/edit/view form reduced to what it needs to be: a keyed record of
//! field values, a validation function producing per-field messages, and the
//! `UserDraft` sent to the service once everything checks out.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use url::Url;

use crate::error::RosterError;
use crate::types::{User, UserDraft};

/// Avatar used when a user has no picture of their own
pub const DEFAULT_PICTURE_URL: &str =
    "https://ik.imagekit.io/o5chwt6p8/Default?updatedAt=1755892893537";

/// A selectable option in a dropdown field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub label: &'static str,
    pub value: &'static str,
}

/// Accepted values for `title`
pub const TITLES: &[Choice] = &[
    Choice { label: "Mr", value: "mr" },
    Choice { label: "Ms", value: "ms" },
    Choice { label: "Mrs", value: "mrs" },
    Choice { label: "Miss", value: "miss" },
    Choice { label: "Dr", value: "dr" },
];

/// Accepted values for `gender`
pub const GENDERS: &[Choice] = &[
    Choice { label: "Male", value: "male" },
    Choice { label: "Female", value: "female" },
    Choice { label: "Other", value: "other" },
];

/// Stored gender values from older clients and the choice they now map to
const LEGACY_GENDERS: &[(&str, &str)] = &[("otro", "other")];

fn current_gender(stored: &str) -> String {
    LEGACY_GENDERS
        .iter()
        .find(|(legacy, _)| stored.trim().eq_ignore_ascii_case(legacy))
        .map_or_else(|| stored.to_string(), |(_, value)| (*value).to_string())
}

/// What the form is being used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
    /// Read-only detail view
    View,
}

impl FormMode {
    pub fn is_editable(self) -> bool {
        !matches!(self, Self::View)
    }
}

/// Form fields, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Id,
    Title,
    FirstName,
    LastName,
    Gender,
    Email,
    DateOfBirth,
    Phone,
    Picture,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::Id,
        FormField::Title,
        FormField::FirstName,
        FormField::LastName,
        FormField::Gender,
        FormField::Email,
        FormField::DateOfBirth,
        FormField::Phone,
        FormField::Picture,
    ];

    /// Wire name of the field
    pub fn name(self) -> &'static str {
        match self {
            FormField::Id => "id",
            FormField::Title => "title",
            FormField::FirstName => "firstName",
            FormField::LastName => "lastName",
            FormField::Gender => "gender",
            FormField::Email => "email",
            FormField::DateOfBirth => "dateOfBirth",
            FormField::Phone => "phone",
            FormField::Picture => "picture",
        }
    }

    /// `id` is shown but never typed into
    pub fn is_read_only(self) -> bool {
        matches!(self, FormField::Id)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormField {
    type Err = RosterError;

    /// Accepts the wire name (`firstName`) as well as `first_name` / `first-name`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        FormField::ALL
            .into_iter()
            .find(|field| field.name().to_ascii_lowercase() == folded)
            .ok_or_else(|| RosterError::invalid_input(format!("unknown form field: {}", s)))
    }
}

/// Validation messages keyed by field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
        }
        Ok(())
    }
}

/// Current value of every form field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFormValues {
    pub id: Option<String>,
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<String>,
    pub phone: Option<String>,
    pub picture: Option<String>,
}

impl UserFormValues {
    /// Prefill from an existing user, substituting the default avatar and
    /// mapping legacy gender values onto the current choices
    pub fn from_user(user: &User) -> Self {
        Self {
            id: Some(user.id.to_string()),
            title: user.title.clone(),
            first_name: Some(user.first_name.clone()),
            last_name: Some(user.last_name.clone()),
            gender: user.gender.as_deref().map(current_gender),
            email: user.email.clone(),
            date_of_birth: user.date_of_birth.clone(),
            phone: user.phone.clone(),
            picture: Some(
                user.picture
                    .clone()
                    .filter(|p| !p.is_empty())
                    .unwrap_or_else(|| DEFAULT_PICTURE_URL.to_string()),
            ),
        }
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    pub fn clear(&mut self, field: FormField) {
        *self.slot_mut(field) = None;
    }

    fn slot(&self, field: FormField) -> &Option<String> {
        match field {
            FormField::Id => &self.id,
            FormField::Title => &self.title,
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
            FormField::Gender => &self.gender,
            FormField::Email => &self.email,
            FormField::DateOfBirth => &self.date_of_birth,
            FormField::Phone => &self.phone,
            FormField::Picture => &self.picture,
        }
    }

    fn slot_mut(&mut self, field: FormField) -> &mut Option<String> {
        match field {
            FormField::Id => &mut self.id,
            FormField::Title => &mut self.title,
            FormField::FirstName => &mut self.first_name,
            FormField::LastName => &mut self.last_name,
            FormField::Gender => &mut self.gender,
            FormField::Email => &mut self.email,
            FormField::DateOfBirth => &mut self.date_of_birth,
            FormField::Phone => &mut self.phone,
            FormField::Picture => &mut self.picture,
        }
    }
}

/// Check every field and build the request body.
///
/// `today` bounds the date of birth; passing it in keeps the check
/// deterministic.
pub fn validate(values: &UserFormValues, today: NaiveDate) -> Result<UserDraft, FieldErrors> {
    let mut errors = FieldErrors::default();

    let title = required(values, FormField::Title, &mut errors)
        .and_then(|v| one_of(v, TITLES, FormField::Title, &mut errors));
    let first_name = required(values, FormField::FirstName, &mut errors)
        .and_then(|v| min_chars(v, 2, FormField::FirstName, &mut errors));
    let last_name = required(values, FormField::LastName, &mut errors)
        .and_then(|v| min_chars(v, 2, FormField::LastName, &mut errors));
    let gender = required(values, FormField::Gender, &mut errors)
        .and_then(|v| one_of(v, GENDERS, FormField::Gender, &mut errors));

    let email = required(values, FormField::Email, &mut errors).and_then(|v| {
        if email_pattern().is_match(v) {
            Some(v.to_string())
        } else {
            errors.insert(FormField::Email, "email must be a valid address");
            None
        }
    });

    let date_of_birth = required(values, FormField::DateOfBirth, &mut errors).and_then(|v| {
        match parse_birth_date(v) {
            Some(date) if date > today => {
                errors.insert(FormField::DateOfBirth, "date of birth cannot be in the future");
                None
            }
            Some(_) => Some(v.to_string()),
            None => {
                errors.insert(FormField::DateOfBirth, "date of birth must be a valid date");
                None
            }
        }
    });

    let phone = required(values, FormField::Phone, &mut errors).and_then(|v| {
        if phone_pattern().is_match(v) {
            Some(v.to_string())
        } else {
            errors.insert(FormField::Phone, "phone must be 9 to 15 digits");
            None
        }
    });

    let picture = required(values, FormField::Picture, &mut errors).and_then(|v| {
        match Url::parse(v) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Some(v.to_string()),
            _ => {
                errors.insert(FormField::Picture, "picture must be an http(s) URL");
                None
            }
        }
    });

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(UserDraft {
        title,
        first_name,
        last_name,
        email,
        gender,
        phone,
        date_of_birth,
        picture,
        location: None,
    })
}

fn required<'a>(
    values: &'a UserFormValues,
    field: FormField,
    errors: &mut FieldErrors,
) -> Option<&'a str> {
    match values.get(field).map(str::trim) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            errors.insert(field, format!("{} is required", field));
            None
        }
    }
}

fn min_chars(value: &str, min: usize, field: FormField, errors: &mut FieldErrors) -> Option<String> {
    if value.chars().count() < min {
        errors.insert(field, format!("{} must be at least {} characters", field, min));
        return None;
    }
    Some(value.to_string())
}

fn one_of(
    value: &str,
    choices: &[Choice],
    field: FormField,
    errors: &mut FieldErrors,
) -> Option<String> {
    let lowered = value.to_ascii_lowercase();
    if choices.iter().any(|c| c.value == lowered) {
        return Some(lowered);
    }

    let allowed: Vec<&str> = choices.iter().map(|c| c.value).collect();
    errors.insert(field, format!("{} must be one of: {}", field, allowed.join(", ")));
    None
}

/// RFC 3339 timestamps (what the service sends) or plain `YYYY-MM-DD`
fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

fn phone_pattern() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^[0-9]{9,15}$").expect("valid phone pattern"))
}

/// A user form bound to its mode
#[derive(Debug, Clone)]
pub struct UserForm {
    mode: FormMode,
    values: UserFormValues,
}

impl UserForm {
    /// Empty create form with the default avatar preselected
    pub fn create() -> Self {
        let mut values = UserFormValues::default();
        values.set(FormField::Picture, DEFAULT_PICTURE_URL);
        Self {
            mode: FormMode::Create,
            values,
        }
    }

    /// Edit form prefilled from `user`
    pub fn edit(user: &User) -> Self {
        Self {
            mode: FormMode::Edit,
            values: UserFormValues::from_user(user),
        }
    }

    /// Read-only view of `user`
    pub fn view(user: &User) -> Self {
        Self {
            mode: FormMode::View,
            values: UserFormValues::from_user(user),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn values(&self) -> &UserFormValues {
        &self.values
    }

    /// Change a field. Rejected in view mode and for read-only fields.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) -> crate::Result<()> {
        if !self.mode.is_editable() {
            return Err(RosterError::invalid_input("form is read-only"));
        }
        if field.is_read_only() {
            return Err(RosterError::invalid_input(format!("{} is read-only", field)));
        }
        self.values.set(field, value);
        Ok(())
    }

    /// Current validation state without submitting
    pub fn errors(&self, today: NaiveDate) -> FieldErrors {
        validate(&self.values, today).err().unwrap_or_default()
    }

    /// Validate and produce the request body.
    ///
    /// Returns `Ok(None)` in view mode: there is nothing to send.
    pub fn submit(&self, today: NaiveDate) -> Result<Option<UserDraft>, FieldErrors> {
        if !self.mode.is_editable() {
            return Ok(None);
        }
        validate(&self.values, today).map(Some)
    }
}
