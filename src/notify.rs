// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Sends rendered reports by email.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::report::Email;

pub const SENDGRID_URL: &str = "https://api.sendgrid.com";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to reach the mail service: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("The mail service responded with {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("No recipients configured")]
    NoRecipients,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// Addresses a report is sent to.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Recipients(Vec<Address>);

impl Recipients {
    /// Parses a comma separated list of addresses.
    ///
    /// Whitespace is removed from each address, the name is the part before `@`.
    pub fn parse(raw: &str) -> Self {
        Recipients(
            raw.split(',')
                .map(|x| x.chars().filter(|c| !c.is_whitespace()).collect::<String>())
                .filter(|x| !x.is_empty())
                .map(|email| {
                    let name = email.split('@').next().unwrap_or_default().to_string();
                    Address { email, name }
                })
                .collect(),
        )
    }

    pub fn addresses(&self) -> &[Address] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Delivers reports.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: &Email, recipients: &Recipients) -> Result<(), Error>;
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: &'a [Address],
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

#[derive(Serialize)]
struct MailSend<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: &'a Address,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

/// Sends mails via the SendGrid v3 API.
pub struct SendGrid {
    base_url: String,
    api_key: String,
    from: Address,
    http: reqwest::Client,
}

impl SendGrid {
    pub fn new(api_key: String, from: Address) -> Self {
        Self::with_base_url(SENDGRID_URL.to_string(), api_key, from)
    }

    pub fn with_base_url(base_url: String, api_key: String, from: Address) -> Self {
        Self {
            base_url,
            api_key,
            from,
            http: reqwest::Client::new(),
        }
    }

    fn payload<'a>(&'a self, email: &'a Email, recipients: &'a Recipients) -> MailSend<'a> {
        MailSend {
            personalizations: vec![Personalization {
                to: recipients.addresses(),
            }],
            from: &self.from,
            subject: &email.subject,
            content: vec![Content {
                kind: "text/html",
                value: &email.html,
            }],
        }
    }
}

#[async_trait]
impl Notifier for SendGrid {
    async fn send(&self, email: &Email, recipients: &Recipients) -> Result<(), Error> {
        if recipients.is_empty() {
            return Err(Error::NoRecipients);
        }
        let url = format!("{}/v3/mail/send", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.payload(email, recipients))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status { status, body });
        }
        tracing::info!(
            recipients = recipients.addresses().len(),
            subject = %email.subject,
            "report sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_recipients() {
        let recipients = Recipients::parse(" alice@example.com,  bob @example.com ,,");
        assert_eq!(
            recipients.addresses(),
            &[
                Address {
                    email: "alice@example.com".to_string(),
                    name: "alice".to_string()
                },
                Address {
                    email: "bob@example.com".to_string(),
                    name: "bob".to_string()
                },
            ]
        );
        assert!(Recipients::parse(" , ").is_empty());
    }

    #[test]
    fn sendgrid_payload() {
        let sendgrid = SendGrid::new(
            "key".to_string(),
            Address {
                email: "agent@example.com".to_string(),
                name: "Monitoring Agent".to_string(),
            },
        );
        let email = Email {
            subject: "The Monitoring Agent found 1 Issues".to_string(),
            html: "<p>x</p>".to_string(),
        };
        let recipients = Recipients::parse("alice@example.com");
        let json = serde_json::to_value(sendgrid.payload(&email, &recipients)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "personalizations": [{"to": [{"email": "alice@example.com", "name": "alice"}]}],
                "from": {"email": "agent@example.com", "name": "Monitoring Agent"},
                "subject": "The Monitoring Agent found 1 Issues",
                "content": [{"type": "text/html", "value": "<p>x</p>"}]
            })
        );
    }

    #[tokio::test]
    async fn refuses_without_recipients() {
        let sendgrid = SendGrid::new(
            "key".to_string(),
            Address {
                email: "agent@example.com".to_string(),
                name: String::new(),
            },
        );
        let email = Email {
            subject: "s".to_string(),
            html: "h".to_string(),
        };
        assert!(matches!(
            sendgrid.send(&email, &Recipients::default()).await,
            Err(Error::NoRecipients)
        ));
    }
}
