/// Command implementations
///
/// Each command talks to the service through [`UserApi`] and writes its
/// report to the given writer, so the binary passes stdout and tests pass a
/// buffer.
use crate::error::Result;
use chrono::NaiveDate;
use clap::Args;
use roster_client::PagedUserFeed;
use roster_core::{FormField, RosterError, User, UserApi, UserForm, UserId};
use std::io::{BufRead, Write};
use tracing::info;

/// How far `list` scrolls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLimit {
    /// Stop after this many pages
    Pages(u32),
    /// Keep loading until the feed is exhausted
    All,
}

impl PageLimit {
    fn allows(self, loaded: u32) -> bool {
        match self {
            PageLimit::Pages(max) => loaded < max,
            PageLimit::All => true,
        }
    }
}

/// Field flags shared by `create` and `edit`
#[derive(Debug, Clone, Default, Args)]
pub struct UserArgs {
    /// Salutation: mr, ms, mrs, miss or dr
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    /// male, female or other
    #[arg(long)]
    pub gender: Option<String>,
    /// 9 to 15 digits
    #[arg(long)]
    pub phone: Option<String>,
    /// YYYY-MM-DD or an RFC 3339 timestamp
    #[arg(long)]
    pub date_of_birth: Option<String>,
    /// Avatar URL
    #[arg(long)]
    pub picture: Option<String>,
}

impl UserArgs {
    /// Copy every flag that was given into `form`.
    pub fn apply(&self, form: &mut UserForm) -> roster_core::Result<()> {
        let fields = [
            (FormField::Title, &self.title),
            (FormField::FirstName, &self.first_name),
            (FormField::LastName, &self.last_name),
            (FormField::Email, &self.email),
            (FormField::Gender, &self.gender),
            (FormField::Phone, &self.phone),
            (FormField::DateOfBirth, &self.date_of_birth),
            (FormField::Picture, &self.picture),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                form.set(field, value.as_str())?;
            }
        }
        Ok(())
    }
}

/// Scroll through the collection and print one row per user.
///
/// Returns the number of users printed.
pub async fn list<A: UserApi, W: Write>(
    api: A,
    page_size: u32,
    limit: PageLimit,
    out: &mut W,
) -> Result<usize> {
    let feed = PagedUserFeed::new(api, page_size);
    feed.refresh().await?;

    let mut loaded = 1;
    while limit.allows(loaded) {
        if !feed.load_next().await?.is_loaded() {
            break;
        }
        loaded += 1;
    }

    let users = feed.users().await;
    for user in &users {
        writeln!(out, "{}  {}", user.id, user.full_name())?;
    }

    let total = feed.total().await.unwrap_or(0);
    if feed.has_more().await {
        writeln!(
            out,
            "Showing {} of {} users (more available, use --all)",
            users.len(),
            total
        )?;
    } else {
        writeln!(out, "Showing {} of {} users", users.len(), total)?;
    }

    Ok(users.len())
}

/// Print every populated field of one user.
pub async fn show<A: UserApi, W: Write>(api: &A, id: &UserId, out: &mut W) -> Result<User> {
    let user = api.get_user(id).await?;
    write_user(&user, out)?;
    Ok(user)
}

/// Validate the flags as a new user and create it.
pub async fn create<A: UserApi, W: Write>(
    api: &A,
    args: &UserArgs,
    today: NaiveDate,
    out: &mut W,
) -> Result<User> {
    let mut form = UserForm::create();
    args.apply(&mut form)?;
    let draft = match form.submit(today) {
        Ok(Some(draft)) => draft,
        Ok(None) => return Err(RosterError::Other("form is read-only".into()).into()),
        Err(errors) => return Err(RosterError::Validation(errors).into()),
    };

    let user = api.create_user(&draft).await?;
    info!(user_id = %user.id, "Created user");
    writeln!(out, "Created user {}", user.id)?;
    Ok(user)
}

/// Overlay the flags on an existing user, validate, and save.
pub async fn edit<A: UserApi, W: Write>(
    api: &A,
    id: &UserId,
    args: &UserArgs,
    today: NaiveDate,
    out: &mut W,
) -> Result<User> {
    let current = api.get_user(id).await?;
    let mut form = UserForm::edit(&current);
    args.apply(&mut form)?;
    let draft = match form.submit(today) {
        Ok(Some(draft)) => draft,
        Ok(None) => return Err(RosterError::Other("form is read-only".into()).into()),
        Err(errors) => return Err(RosterError::Validation(errors).into()),
    };

    let user = api.update_user(id, &draft).await?;
    info!(user_id = %user.id, "Updated user");
    writeln!(out, "Updated user {}", user.id)?;
    Ok(user)
}

/// Delete a user through a feed, which then reloads page 1. Returns the
/// total the server reports afterwards.
///
/// When only the reload fails the deletion is still reported before the
/// error is returned.
pub async fn delete<A: UserApi, W: Write>(
    api: A,
    page_size: u32,
    id: &UserId,
    out: &mut W,
) -> Result<u64> {
    let feed = PagedUserFeed::new(api, page_size);
    match feed.delete_user(id).await {
        Ok(_) => {}
        Err(err @ RosterError::DeletedReloadFailed { .. }) => {
            writeln!(out, "Deleted user {}. Reloading the list failed", id)?;
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    }

    let total = feed.total().await.unwrap_or(0);
    writeln!(out, "Deleted user {}. {} users remain", id, total)?;
    Ok(total)
}

/// Ask a yes/no question; only `y` or `yes` counts as yes.
pub fn confirm<R: BufRead, W: Write>(question: &str, input: &mut R, out: &mut W) -> Result<bool> {
    write!(out, "{} [y/N] ", question)?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn write_user<W: Write>(user: &User, out: &mut W) -> Result<()> {
    writeln!(out, "ID:            {}", user.id)?;
    match &user.title {
        Some(title) => writeln!(out, "Name:          {} {}", title, user.full_name())?,
        None => writeln!(out, "Name:          {}", user.full_name())?,
    }

    let optional = [
        ("Email", &user.email),
        ("Gender", &user.gender),
        ("Phone", &user.phone),
        ("Date of birth", &user.date_of_birth),
        ("Picture", &user.picture),
        ("Registered", &user.register_date),
        ("Updated", &user.updated_date),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            writeln!(out, "{:<15}{}", format!("{}:", label), value)?;
        }
    }

    if let Some(location) = &user.location {
        let parts: Vec<&str> = [
            &location.street,
            &location.city,
            &location.state,
            &location.country,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .collect();
        if !parts.is_empty() {
            writeln!(out, "Location:      {}", parts.join(", "))?;
        }
        if let Some(timezone) = &location.timezone {
            writeln!(out, "Timezone:      {}", timezone)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn page_limit() {
        assert!(PageLimit::Pages(2).allows(1));
        assert!(!PageLimit::Pages(2).allows(2));
        assert!(!PageLimit::Pages(1).allows(1));
        assert!(PageLimit::All.allows(1000));
    }

    #[test]
    fn confirm_accepts_yes_only() {
        for (input, expected) in [("y\n", true), ("YES\n", true), ("n\n", false), ("\n", false)] {
            let mut out = Vec::new();
            let answer = confirm("Delete?", &mut Cursor::new(input), &mut out).unwrap();
            assert_eq!(answer, expected, "input {:?}", input);
            assert_eq!(String::from_utf8(out).unwrap(), "Delete? [y/N] ");
        }
    }

    #[test]
    fn args_fill_form() {
        let args = UserArgs {
            first_name: Some("Sara".into()),
            phone: Some("0612345678".into()),
            ..UserArgs::default()
        };
        let mut form = UserForm::create();
        args.apply(&mut form).unwrap();
        assert_eq!(form.values().get(FormField::FirstName), Some("Sara"));
        assert_eq!(form.values().get(FormField::Phone), Some("0612345678"));
        assert_eq!(form.values().get(FormField::Email), None);
    }
}
