use secrecy::{ExposeSecret, SecretString};
use snafu::prelude::*;

use crate::common::{EmptyFieldSnafu, MissingVariableSnafu, PortFormatSnafu, Result};

/// Snapshot of the `EMAIL_*` environment, before presence and format checks.
#[derive(Clone, Default, serde::Deserialize)]
pub struct RawConfig {
    pub from: Option<String>,
    pub from_name: Option<String>,
    pub password: Option<String>,
    pub to: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<String>,
}

/// Everything needed for one send, assembled once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub from: String,
    pub from_name: String,
    pub password: SecretString,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub smtp_host: String,
    pub smtp_port: u16,
}

fn require(value: Option<String>, name: &'static str, purpose: &'static str) -> Result<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => MissingVariableSnafu { name, purpose }.fail(),
    }
}

impl Config {
    /// Check presence and format of every raw value. An unset display name
    /// falls back to the sender address.
    pub fn from_raw(raw: RawConfig, subject: String, body: String) -> Result<Self> {
        let from = require(raw.from, "EMAIL_FROM", "Sender email address")?;
        let from_name = match raw.from_name {
            Some(name) if !name.is_empty() => name,
            _ => from.clone(),
        };
        let password = require(raw.password, "EMAIL_PASSWORD", "Email password")?;
        let to = require(raw.to, "EMAIL_TO", "Recipient email address")?;
        let smtp_host = require(raw.smtp_host, "EMAIL_SMTP_HOST", "Mail server host")?;
        let port = require(
            raw.smtp_port,
            "EMAIL_SMTP_PORT",
            "Mail server port (SSL 465)",
        )?;
        let smtp_port = port
            .parse()
            .context(PortFormatSnafu { value: port.clone() })?;

        Ok(Self {
            from,
            from_name,
            password: SecretString::new(password),
            to,
            subject,
            body,
            smtp_host,
            smtp_port,
        })
    }

    #[cfg(feature = "cli")]
    pub fn populate_from_env(subject: String, body: String) -> Result<Self> {
        use crate::common::EnvironmentSnafu;

        let raw: RawConfig = config::Config::builder()
            .add_source(config::Environment::with_prefix("EMAIL"))
            .build()
            .context(EnvironmentSnafu)?
            .try_deserialize()
            .context(EnvironmentSnafu)?;
        Self::from_raw(raw, subject, body)
    }

    /// Defensive re-check before any network traffic. Construction already
    /// rejects empty values, so a failure here means a construction bug.
    pub fn validate(&self) -> Result<()> {
        if self.from.is_empty() {
            return EmptyFieldSnafu {
                field: "sender email",
            }
            .fail();
        }
        if self.password.expose_secret().is_empty() {
            return EmptyFieldSnafu {
                field: "email password",
            }
            .fail();
        }
        if self.to.is_empty() {
            return EmptyFieldSnafu {
                field: "recipient email",
            }
            .fail();
        }
        if self.subject.is_empty() {
            return EmptyFieldSnafu {
                field: "email subject",
            }
            .fail();
        }
        if self.body.is_empty() {
            return EmptyFieldSnafu {
                field: "email content",
            }
            .fail();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;

    fn full_raw() -> RawConfig {
        RawConfig {
            from: Some("a@x.com".into()),
            from_name: Some("Alice".into()),
            password: Some("hunter2".into()),
            to: Some("b@y.com".into()),
            smtp_host: Some("smtp.x.com".into()),
            smtp_port: Some("465".into()),
        }
    }

    fn build(raw: RawConfig) -> Result<Config> {
        Config::from_raw(raw, "Test".into(), "Hello".into())
    }

    #[test]
    fn complete_environment_loads() {
        let config = build(full_raw()).unwrap();
        assert_eq!(config.from, "a@x.com");
        assert_eq!(config.from_name, "Alice");
        assert_eq!(config.to, "b@y.com");
        assert_eq!(config.smtp_host, "smtp.x.com");
        assert_eq!(config.smtp_port, 465);
    }

    #[test]
    fn each_required_variable_is_checked() {
        for (name, clear) in [
            (
                "EMAIL_FROM",
                Box::new(|r: &mut RawConfig| r.from = None) as Box<dyn Fn(&mut RawConfig)>,
            ),
            ("EMAIL_PASSWORD", Box::new(|r| r.password = None)),
            ("EMAIL_TO", Box::new(|r| r.to = None)),
            ("EMAIL_SMTP_HOST", Box::new(|r| r.smtp_host = None)),
            ("EMAIL_SMTP_PORT", Box::new(|r| r.smtp_port = None)),
        ] {
            let mut raw = full_raw();
            clear(&mut raw);
            match build(raw) {
                Err(Error::MissingVariable { name: missing, .. }) => assert_eq!(missing, name),
                other => panic!("expected MissingVariable for {name}, got {other:?}"),
            }
        }
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let mut raw = full_raw();
        raw.password = Some(String::new());
        assert!(matches!(
            build(raw),
            Err(Error::MissingVariable {
                name: "EMAIL_PASSWORD",
                ..
            })
        ));
    }

    #[test]
    fn display_name_defaults_to_sender_address() {
        let mut raw = full_raw();
        raw.from_name = None;
        assert_eq!(build(raw).unwrap().from_name, "a@x.com");

        let mut raw = full_raw();
        raw.from_name = Some(String::new());
        assert_eq!(build(raw).unwrap().from_name, "a@x.com");
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let mut raw = full_raw();
        raw.smtp_port = Some("smtps".into());
        assert!(matches!(
            build(raw),
            Err(Error::PortFormat { value, .. }) if value == "smtps"
        ));
    }

    #[test]
    fn out_of_range_port_is_rejected() {
        let mut raw = full_raw();
        raw.smtp_port = Some("70000".into());
        assert!(matches!(build(raw), Err(Error::PortFormat { .. })));
    }

    #[test]
    fn validator_names_the_first_empty_field() {
        let config = build(full_raw()).unwrap();

        for (field, wipe) in [
            (
                "sender email",
                Box::new(|c: &mut Config| c.from.clear()) as Box<dyn Fn(&mut Config)>,
            ),
            (
                "email password",
                Box::new(|c| c.password = SecretString::new(String::new())),
            ),
            ("recipient email", Box::new(|c| c.to.clear())),
            ("email subject", Box::new(|c| c.subject.clear())),
            ("email content", Box::new(|c| c.body.clear())),
        ] {
            let mut broken = config.clone();
            wipe(&mut broken);
            match broken.validate() {
                Err(Error::EmptyField { field: empty }) => assert_eq!(empty, field),
                other => panic!("expected EmptyField for {field}, got {other:?}"),
            }
        }

        config.validate().unwrap();
    }

    #[test]
    fn debug_output_hides_the_credential() {
        let config = build(full_raw()).unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
