//! Form payloads posted by the staff and account pages, with validation.

use serde::Deserialize;

use entities::album_local_model::AlbumModel;
use entities::track_local_model::TrackModel;
use entities::{album, artist, style, track, user};

use crate::import::parse::{parse_date_text, parse_styles};

/// Validation messages shown above a re-rendered form.
pub type FieldErrors = Vec<String>;

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn check_len(errors: &mut FieldErrors, label: &str, value: &str, max: usize) {
    if value.trim().chars().count() > max {
        errors.push(format!("{} must be at most {} characters.", label, max));
    }
}

fn required(errors: &mut FieldErrors, label: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{} is required.", label));
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct ArtistForm {
    pub name: String,
    pub profile: String,
    pub sites: String,
    pub members: String,
}

/// Validated artist fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtistFields {
    pub name: String,
    pub profile: Option<String>,
    pub sites: Option<String>,
    pub members: Option<String>,
}

impl ArtistForm {
    pub fn validate(&self) -> Result<ArtistFields, FieldErrors> {
        let mut errors = FieldErrors::new();
        required(&mut errors, "Name", &self.name);
        check_len(&mut errors, "Name", &self.name, artist::NAME_MAX);
        check_len(&mut errors, "Sites", &self.sites, artist::SITES_MAX);
        check_len(&mut errors, "Members", &self.members, artist::MEMBERS_MAX);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ArtistFields {
            name: self.name.trim().to_string(),
            profile: optional(&self.profile),
            sites: optional(&self.sites),
            members: optional(&self.members),
        })
    }
}

impl From<&artist::Model> for ArtistForm {
    fn from(artist: &artist::Model) -> Self {
        ArtistForm {
            name: artist.name.clone(),
            profile: artist.profile.clone().unwrap_or_default(),
            sites: artist.sites.clone().unwrap_or_default(),
            members: artist.members.clone().unwrap_or_default(),
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct AlbumForm {
    pub title: String,
    pub label: String,
    pub catalog_number: String,
    pub genre: String,
    pub styles: String,
    pub format: String,
    pub storage: String,
    pub release_date: String,
    pub cost: String,
    /// Checkbox: present only when ticked.
    pub closed: Option<String>,
    pub notes: String,
}

impl AlbumForm {
    /// The album fields plus the style names to tag it with.
    pub fn validate(&self) -> Result<(AlbumModel, Vec<String>), FieldErrors> {
        let mut errors = FieldErrors::new();
        required(&mut errors, "Title", &self.title);
        check_len(&mut errors, "Title", &self.title, album::TITLE_MAX);
        check_len(&mut errors, "Label", &self.label, album::LABEL_MAX);
        check_len(
            &mut errors,
            "Catalog number",
            &self.catalog_number,
            album::CATALOG_NUMBER_MAX,
        );
        check_len(&mut errors, "Genre", &self.genre, album::GENRE_MAX);
        check_len(&mut errors, "Format", &self.format, album::FORMAT_MAX);
        check_len(&mut errors, "Storage", &self.storage, album::STORAGE_MAX);

        let styles = parse_styles(&self.styles);
        for name in &styles {
            check_len(&mut errors, "Style", name, style::NAME_MAX);
        }
        let release_date = match optional(&self.release_date) {
            None => None,
            Some(text) => match parse_date_text(&text) {
                Some(date) => Some(date),
                None => {
                    errors.push("Release date must look like 1973-03-01 or 1973.".to_string());
                    None
                }
            },
        };
        let cost = match optional(&self.cost) {
            None => 0.0,
            Some(text) => match text.replace(',', ".").parse::<f64>() {
                Ok(cost) if cost >= 0.0 => cost,
                _ => {
                    errors.push("Cost must be a positive number.".to_string());
                    0.0
                }
            },
        };
        if !errors.is_empty() {
            return Err(errors);
        }
        let genre = optional(&self.genre).or_else(|| styles.first().cloned());
        Ok((
            AlbumModel {
                title: self.title.trim().to_string(),
                label: optional(&self.label),
                catalog_number: optional(&self.catalog_number),
                genre,
                format: optional(&self.format),
                release_date,
                storage: optional(&self.storage),
                notes: optional(&self.notes),
                cost,
                closed: self.closed.is_some(),
            },
            styles,
        ))
    }

    pub fn from_album(album: &album::Model, styles: &[style::Model]) -> Self {
        AlbumForm {
            title: album.title.clone(),
            label: album.label.clone().unwrap_or_default(),
            catalog_number: album.catalog_number.clone().unwrap_or_default(),
            genre: album.genre.clone().unwrap_or_default(),
            styles: styles
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            format: album.format.clone().unwrap_or_default(),
            storage: album.storage.clone().unwrap_or_default(),
            release_date: album
                .release_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            cost: album.cost.to_string(),
            closed: album.closed.then(|| "on".to_string()),
            notes: album.notes.clone().unwrap_or_default(),
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct TrackForm {
    pub title: String,
    pub section: String,
    pub ordinal: String,
    pub duration: String,
    pub credits: String,
}

impl TrackForm {
    pub fn validate(&self) -> Result<TrackModel, FieldErrors> {
        let mut errors = FieldErrors::new();
        required(&mut errors, "Title", &self.title);
        check_len(&mut errors, "Title", &self.title, track::TITLE_MAX);
        check_len(&mut errors, "Section", &self.section, track::SECTION_MAX);
        check_len(&mut errors, "Position", &self.ordinal, track::ORDINAL_WIDTH);
        check_len(&mut errors, "Duration", &self.duration, track::DURATION_MAX);
        check_len(&mut errors, "Credits", &self.credits, track::CREDITS_MAX);
        if !errors.is_empty() {
            return Err(errors);
        }
        // Numeric positions are stored padded like imported ones.
        let ordinal = optional(&self.ordinal).map(|ordinal| match ordinal.parse::<usize>() {
            Ok(position) => track::padded_ordinal(position),
            Err(_) => ordinal,
        });
        Ok(TrackModel {
            title: self.title.trim().to_string(),
            section: optional(&self.section),
            ordinal,
            credits: optional(&self.credits),
            duration: optional(&self.duration),
        })
    }
}

impl From<&track::Model> for TrackForm {
    fn from(track: &track::Model) -> Self {
        TrackForm {
            title: track.title.clone(),
            section: track.section.clone().unwrap_or_default(),
            ordinal: track.ordinal.clone().unwrap_or_default(),
            duration: track.duration.clone().unwrap_or_default(),
            credits: track.credits.clone().unwrap_or_default(),
        }
    }
}

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

impl RegisterForm {
    /// Checks everything except uniqueness of the username.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let username = self.username.trim();
        required(&mut errors, "Username", username);
        check_len(&mut errors, "Username", username, user::USERNAME_MAX);
        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
        {
            errors.push(
                "Username may contain only letters, digits and @/./+/-/_ characters.".to_string(),
            );
        }
        let email = self.email.trim();
        if !email.is_empty() && !email.contains('@') {
            errors.push("Enter a valid email address.".to_string());
        }
        if self.password1 != self.password2 {
            errors.push("The two password fields didn't match.".to_string());
        }
        if self.password1.chars().count() < MIN_PASSWORD_LEN {
            errors.push(format!(
                "This password is too short. It must contain at least {} characters.",
                MIN_PASSWORD_LEN
            ));
        }
        if !self.password1.is_empty() && self.password1.chars().all(|c| c.is_ascii_digit()) {
            errors.push("This password is entirely numeric.".to_string());
        }
        errors
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn album_form_parses_dates_costs_and_styles() {
        let form = AlbumForm {
            title: " Abbey Road ".to_string(),
            styles: "Rock, Pop".to_string(),
            release_date: "1969-09-26".to_string(),
            cost: "12,50".to_string(),
            closed: Some("on".to_string()),
            ..Default::default()
        };
        let (fields, styles) = form.validate().unwrap();
        assert_eq!(fields.title, "Abbey Road");
        assert_eq!(fields.genre.as_deref(), Some("Rock"));
        assert_eq!(fields.release_date, NaiveDate::from_ymd_opt(1969, 9, 26));
        assert_eq!(fields.cost, 12.5);
        assert!(fields.closed);
        assert_eq!(styles, vec!["Rock", "Pop"]);
    }

    #[test]
    fn album_form_reports_every_problem() {
        let form = AlbumForm {
            storage: "far too long for a shelf".to_string(),
            release_date: "yesterday".to_string(),
            cost: "cheap".to_string(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&"Title is required.".to_string()));
    }

    #[test]
    fn track_positions_are_padded() {
        let form = TrackForm {
            title: "Money".to_string(),
            ordinal: "6".to_string(),
            ..Default::default()
        };
        assert_eq!(form.validate().unwrap().ordinal.as_deref(), Some("006"));
    }

    #[test]
    fn register_form_checks_passwords() {
        let mut form = RegisterForm {
            username: "ringo".to_string(),
            email: "ringo@example.com".to_string(),
            password1: "octopus-garden".to_string(),
            password2: "octopus-garden".to_string(),
        };
        assert!(form.validate().is_empty());
        form.password2 = "yellow-submarine".to_string();
        assert_eq!(form.validate().len(), 1);
        form.password1 = "1234".to_string();
        form.password2 = "1234".to_string();
        assert_eq!(form.validate().len(), 2);
        form.username = "ringo starr".to_string();
        assert_eq!(form.validate().len(), 3);
    }
}
