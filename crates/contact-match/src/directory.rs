use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use reply_core::{Contact, ContactMatch, ServiceResult};
use service_client::ContactSource;
use tracing::{debug, info};

pub const NAME_CONFIDENCE: f64 = 1.0;
pub const ALIAS_CONFIDENCE: f64 = 0.7;

#[derive(Debug)]
struct Term {
    contact: usize,
    text: String,
    regex: Regex,
    confidence: f64,
}

/// Known contacts with a precompiled whole-word matcher per name and alias.
#[derive(Debug, Default)]
pub struct ContactDirectory {
    contacts: Vec<Contact>,
    terms: Vec<Term>,
}

impl ContactDirectory {
    pub fn new(contacts: Vec<Contact>) -> Result<Self> {
        let mut terms = Vec::new();
        for (index, contact) in contacts.iter().enumerate() {
            let names = std::iter::once((&contact.name, NAME_CONFIDENCE))
                .chain(contact.aliases.iter().map(|a| (a, ALIAS_CONFIDENCE)));
            for (text, confidence) in names {
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                let pattern = format!(r"(?i)\b{}\b", regex::escape(text));
                let regex = Regex::new(&pattern)
                    .with_context(|| format!("Failed to compile matcher for {:?}", text))?;
                terms.push(Term {
                    contact: index,
                    text: text.to_string(),
                    regex,
                    confidence,
                });
            }
        }
        Ok(Self { contacts, terms })
    }

    /// Loads a JSON array of contacts.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read contacts file {}", path.display()))?;
        let contacts: Vec<Contact> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid contacts file {}", path.display()))?;
        info!(count = contacts.len(), path = %path.display(), "Loaded contacts");
        Self::new(contacts)
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// The contact whose name or alias appears in `message` as whole words.
    ///
    /// The longest matching term wins; on equal length the earlier contact wins, and a
    /// contact's name before its aliases.
    pub fn match_message(&self, message: &str) -> Option<ContactMatch> {
        let mut best: Option<&Term> = None;
        for term in &self.terms {
            if !term.regex.is_match(message) {
                continue;
            }
            let longer = best.map_or(true, |b| term.text.chars().count() > b.text.chars().count());
            if longer {
                best = Some(term);
            }
        }
        let term = best?;
        debug!(matched_on = %term.text, confidence = term.confidence, "Contact matched");
        Some(ContactMatch {
            contact: self.contacts[term.contact].clone(),
            confidence: term.confidence,
            matched_on: term.text.clone(),
        })
    }
}

#[async_trait]
impl ContactSource for ContactDirectory {
    async fn match_contact(&self, message: &str) -> ServiceResult<Option<ContactMatch>> {
        ServiceResult::Success(self.match_message(message))
    }
}
