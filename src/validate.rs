//! Structural validation of request payloads.
//!
//! Mirrors the upstream handlers' hand-rolled `// Validate input` checks
//! rather than pulling in a derive-based validation crate: each request
//! type gets a `validate` method returning a list of field/message pairs.

use crate::models::{CreateIssueRequest, Priority, Status, UpdateIssueRequest};

const TITLE_MAX: usize = 200;
const DESCRIPTION_MAX: usize = 5000;

pub type FieldErrors = Vec<(String, String)>;

impl CreateIssueRequest {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.title.trim().is_empty() {
            errors.push(("title".to_string(), "must not be empty".to_string()));
        } else if self.title.chars().count() > TITLE_MAX {
            errors.push((
                "title".to_string(),
                format!("must be at most {TITLE_MAX} characters"),
            ));
        }

        if self.description.chars().count() > DESCRIPTION_MAX {
            errors.push((
                "description".to_string(),
                format!("must be at most {DESCRIPTION_MAX} characters"),
            ));
        }

        if Status::parse(&self.status).is_none() {
            errors.push(("status".to_string(), "invalid status".to_string()));
        }

        if Priority::parse(&self.priority).is_none() {
            errors.push(("priority".to_string(), "invalid priority".to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl UpdateIssueRequest {
    /// Same bounds as `CreateIssueRequest::validate`, applied only to
    /// fields actually present in the request.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                errors.push(("title".to_string(), "must not be empty".to_string()));
            } else if title.chars().count() > TITLE_MAX {
                errors.push((
                    "title".to_string(),
                    format!("must be at most {TITLE_MAX} characters"),
                ));
            }
        }

        if let Some(description) = &self.description {
            if description.chars().count() > DESCRIPTION_MAX {
                errors.push((
                    "description".to_string(),
                    format!("must be at most {DESCRIPTION_MAX} characters"),
                ));
            }
        }

        if let Some(status) = &self.status {
            if Status::parse(status).is_none() {
                errors.push(("status".to_string(), "invalid status".to_string()));
            }
        }

        if let Some(priority) = &self.priority {
            if Priority::parse(priority).is_none() {
                errors.push(("priority".to_string(), "invalid priority".to_string()));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateIssueRequest {
        CreateIssueRequest {
            title: "Fix the widget".to_string(),
            description: "".to_string(),
            status: "Todo".to_string(),
            priority: "Low".to_string(),
            assignee_id: None,
            label_ids: vec![],
        }
    }

    #[test]
    fn accepts_valid_create() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn rejects_empty_title() {
        let mut req = valid_create();
        req.title = "   ".to_string();
        let errors = req.validate().unwrap_err();
        assert!(errors.iter().any(|(f, _)| f == "title"));
    }

    #[test]
    fn rejects_title_over_200_chars() {
        let mut req = valid_create();
        req.title = "x".repeat(201);
        let errors = req.validate().unwrap_err();
        assert!(errors.iter().any(|(f, _)| f == "title"));
    }

    #[test]
    fn rejects_description_over_5000_chars() {
        let mut req = valid_create();
        req.description = "x".repeat(5001);
        let errors = req.validate().unwrap_err();
        assert!(errors.iter().any(|(f, _)| f == "description"));
    }

    #[test]
    fn rejects_unknown_status_and_priority() {
        let mut req = valid_create();
        req.status = "Nope".to_string();
        req.priority = "Nope".to_string();
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn update_only_checks_present_fields() {
        let req = UpdateIssueRequest {
            status: Some("bogus".to_string()),
            ..Default::default()
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "status");
    }

    #[test]
    fn update_with_no_fields_is_valid() {
        assert!(UpdateIssueRequest::default().validate().is_ok());
    }
}
