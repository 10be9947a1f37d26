use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

/// Photo filename a bootcamp starts out with before anything is uploaded
pub const PLACEHOLDER_PHOTO: &str = "no-photo.jpg";

/// A bootcamp record as stored in the `bootcamps` table.
///
/// `latitude`/`longitude` are populated by geocoding the address at
/// creation time; `user_id` is the owning user, set from the
/// authenticated identity and never from the request payload.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Bootcamp {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub careers: Vec<String>,
    pub housing: bool,
    pub job_assistance: bool,
    pub average_cost: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub photo: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a bootcamp. Any owner field a caller supplies is
/// simply not part of this type, so it cannot be spoofed.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBootcamp {
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub careers: Option<Vec<String>>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub average_cost: Option<i32>,
}

impl CreateBootcamp {
    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut errors = HashMap::new();

        check_name(Some(&self.name), &mut errors);
        check_description(Some(&self.description), &mut errors);
        check_website(self.website.as_deref(), &mut errors);
        check_phone(self.phone.as_deref(), &mut errors);
        check_email(self.email.as_deref(), &mut errors);
        check_average_cost(self.average_cost, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Partial payload for updating a bootcamp. Only present fields are
/// validated and applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBootcamp {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub careers: Option<Vec<String>>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub average_cost: Option<i32>,
}

impl UpdateBootcamp {
    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut errors = HashMap::new();

        check_name(self.name.as_deref(), &mut errors);
        check_description(self.description.as_deref(), &mut errors);
        check_website(self.website.as_deref(), &mut errors);
        check_phone(self.phone.as_deref(), &mut errors);
        check_email(self.email.as_deref(), &mut errors);
        check_average_cost(self.average_cost, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_name(name: Option<&str>, errors: &mut HashMap<String, String>) {
    if let Some(name) = name {
        if name.trim().is_empty() {
            errors.insert("name".to_string(), "Please add a name".to_string());
        } else if name.chars().count() > 50 {
            errors.insert(
                "name".to_string(),
                "Name can not be more than 50 characters".to_string(),
            );
        }
    }
}

fn check_description(description: Option<&str>, errors: &mut HashMap<String, String>) {
    if let Some(description) = description {
        if description.trim().is_empty() {
            errors.insert(
                "description".to_string(),
                "Please add a description".to_string(),
            );
        } else if description.chars().count() > 500 {
            errors.insert(
                "description".to_string(),
                "Description can not be more than 500 characters".to_string(),
            );
        }
    }
}

fn check_website(website: Option<&str>, errors: &mut HashMap<String, String>) {
    if let Some(website) = website {
        let scheme_ok = website.starts_with("http://") || website.starts_with("https://");
        if !scheme_ok || url::Url::parse(website).is_err() {
            errors.insert(
                "website".to_string(),
                "Please use a valid URL with HTTP or HTTPS".to_string(),
            );
        }
    }
}

fn check_phone(phone: Option<&str>, errors: &mut HashMap<String, String>) {
    if let Some(phone) = phone {
        if phone.chars().count() > 20 {
            errors.insert(
                "phone".to_string(),
                "Phone number can not be longer than 20 characters".to_string(),
            );
        }
    }
}

fn check_email(email: Option<&str>, errors: &mut HashMap<String, String>) {
    if let Some(email) = email {
        let parts: Vec<&str> = email.splitn(2, '@').collect();
        let valid = parts.len() == 2
            && !parts[0].is_empty()
            && parts[1].contains('.')
            && !parts[1].starts_with('.')
            && !parts[1].ends_with('.');
        if !valid {
            errors.insert("email".to_string(), "Please add a valid email".to_string());
        }
    }
}

fn check_average_cost(average_cost: Option<i32>, errors: &mut HashMap<String, String>) {
    if let Some(cost) = average_cost {
        if cost < 0 {
            errors.insert(
                "average_cost".to_string(),
                "Average cost must not be negative".to_string(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateBootcamp {
        CreateBootcamp {
            name: "Devworks Bootcamp".to_string(),
            description: "Full stack web development".to_string(),
            website: Some("https://devworks.com".to_string()),
            phone: Some("(111) 111-1111".to_string()),
            email: Some("enroll@devworks.com".to_string()),
            address: Some("233 Bay State Rd Boston MA 02215".to_string()),
            careers: Some(vec!["Web Development".to_string()]),
            housing: Some(true),
            job_assistance: Some(true),
            average_cost: Some(10000),
        }
    }

    #[test]
    fn accepts_valid_payload() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn rejects_oversized_name() {
        let mut payload = valid_create();
        payload.name = "x".repeat(51);
        let errors = payload.validate().unwrap_err();
        assert!(errors.contains_key("name"));
    }

    #[test]
    fn rejects_blank_description() {
        let mut payload = valid_create();
        payload.description = "   ".to_string();
        let errors = payload.validate().unwrap_err();
        assert!(errors.contains_key("description"));
    }

    #[test]
    fn rejects_non_http_website() {
        let mut payload = valid_create();
        payload.website = Some("ftp://devworks.com".to_string());
        let errors = payload.validate().unwrap_err();
        assert!(errors.contains_key("website"));
    }

    #[test]
    fn rejects_bad_email() {
        for email in ["not-an-email", "@devworks.com", "enroll@devworks", "enroll@.com"] {
            let mut payload = valid_create();
            payload.email = Some(email.to_string());
            let errors = payload.validate().unwrap_err();
            assert!(errors.contains_key("email"), "{} should be rejected", email);
        }
    }

    #[test]
    fn update_only_validates_present_fields() {
        let update = UpdateBootcamp {
            housing: Some(false),
            ..Default::default()
        };
        assert!(update.validate().is_ok());

        let update = UpdateBootcamp {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().unwrap_err().contains_key("name"));
    }

    #[test]
    fn create_payload_ignores_owner_fields() {
        // Owner fields in the payload are not part of the type at all
        let payload: CreateBootcamp = serde_json::from_value(serde_json::json!({
            "name": "Devworks",
            "description": "desc",
            "user_id": "5f9f1b9b9b9b9b9b9b9b9b9b"
        }))
        .unwrap();
        assert_eq!(payload.name, "Devworks");
    }
}
