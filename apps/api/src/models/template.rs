use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Reusable outreach copy with `{{variable}}` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmailTemplate {
    pub id: Uuid,
    pub name: String,
    pub subject: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmailTemplate {
    /// Substitutes `{{name}}` placeholders in subject and body. Unknown
    /// placeholders are left in place so missing variables are visible in the
    /// preview rather than silently blanked.
    pub fn render(&self, vars: &HashMap<String, String>) -> RenderedTemplate {
        RenderedTemplate {
            subject: self.subject.as_deref().map(|s| substitute(s, vars)),
            body: substitute(&self.body, vars),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedTemplate {
    pub subject: Option<String>,
    pub body: String,
}

fn substitute(text: &str, vars: &HashMap<String, String>) -> String {
    let mut out = text.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{{{key}}}}}"), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn template(subject: Option<&str>, body: &str) -> EmailTemplate {
        EmailTemplate {
            id: Uuid::new_v4(),
            name: "intro".to_string(),
            subject: subject.map(|s| s.to_string()),
            body: body.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_substitutes_body_and_subject() {
        let t = template(Some("Hello {{first_name}}"), "Saw {{company}} is hiring.");
        let r = t.render(&vars(&[("first_name", "Ada"), ("company", "Acme")]));
        assert_eq!(r.subject.as_deref(), Some("Hello Ada"));
        assert_eq!(r.body, "Saw Acme is hiring.");
    }

    #[test]
    fn test_render_repeated_placeholder() {
        let t = template(None, "{{name}}, {{name}}!");
        let r = t.render(&vars(&[("name", "Bo")]));
        assert_eq!(r.body, "Bo, Bo!");
    }

    #[test]
    fn test_render_unknown_placeholder_left_intact() {
        let t = template(None, "Hi {{first_name}}");
        let r = t.render(&vars(&[]));
        assert_eq!(r.body, "Hi {{first_name}}");
    }

    #[test]
    fn test_render_no_subject() {
        let t = template(None, "plain");
        assert!(t.render(&vars(&[])).subject.is_none());
    }
}
