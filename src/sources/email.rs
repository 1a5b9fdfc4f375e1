//! Inbox collaborator.

use crate::state::Email;

const TECHCORP_BODY: &str = "Hi there,

I hope this email finds you well. I'm reaching out from TechCorp regarding a potential partnership opportunity.

We're looking to integrate advanced AI capabilities into our customer service platform, and we've been impressed by your company's work in the field. We currently handle about 50,000 customer inquiries per month and are looking for solutions that can:

1. Automate routine responses
2. Provide intelligent routing
3. Maintain high customer satisfaction

Would you be available for a call next week to discuss this further? We're particularly interested in understanding your pricing models and implementation timelines.

Looking forward to hearing from you.

Best regards,
John Doe
Director of Technology
TechCorp Inc.
john.doe@techcorp.com
";

const STARTUP_BODY: &str = "Hello,

I'm a PhD student at Stanford researching multi-agent systems and I came across your recent work on context isolation in agent architectures.

I'm wondering if you'd be interested in collaborating on a research paper exploring scalability challenges in production LLM agent deployments. I have some interesting findings from our lab that complement your approach.

Would you be open to a brief discussion about this?

Thanks,
Sarah Smith
PhD Candidate, Computer Science
Stanford University
";

/// Where emails come from. The latest email is the last one returned.
pub trait EmailSource: Send + Sync {
    fn emails(&self) -> Vec<Email>;

    fn latest(&self) -> Option<Email> {
        self.emails().pop()
    }
}

/// Fixed two-message inbox.
#[derive(Debug, Clone)]
pub struct MockInbox {
    emails: Vec<Email>,
}

impl MockInbox {
    pub fn new() -> Self {
        Self {
            emails: vec![
                Email {
                    id: "email_001".to_string(),
                    from_address: "john.doe@techcorp.com".to_string(),
                    subject: "Partnership Proposal - AI Integration".to_string(),
                    body: TECHCORP_BODY.to_string(),
                    received_at: "2026-01-14T09:30:00Z".to_string(),
                },
                Email {
                    id: "email_002".to_string(),
                    from_address: "sarah.smith@startup.io".to_string(),
                    subject: "Research Collaboration Inquiry".to_string(),
                    body: STARTUP_BODY.to_string(),
                    received_at: "2026-01-14T14:15:00Z".to_string(),
                },
            ],
        }
    }

    /// Inbox with arbitrary contents.
    pub fn with_emails(emails: Vec<Email>) -> Self {
        Self { emails }
    }
}

impl Default for MockInbox {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailSource for MockInbox {
    fn emails(&self) -> Vec<Email> {
        self.emails.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_is_last_in_list() {
        let inbox = MockInbox::new();
        let ids: Vec<_> = inbox.emails().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["email_001", "email_002"]);

        let latest = inbox.latest().unwrap();
        assert_eq!(latest.id, "email_002");
        assert_eq!(latest.subject, "Research Collaboration Inquiry");
    }

    #[test]
    fn test_fixed_bodies_are_complete() {
        let emails = MockInbox::new().emails();
        assert!(emails[0].body.contains("50,000 customer inquiries per month"));
        assert!(emails[0].body.ends_with("TechCorp Inc.\njohn.doe@techcorp.com\n"));
        assert!(emails[1].body.contains("a PhD student at Stanford researching"));
        assert!(emails[1].body.ends_with("Computer Science\nStanford University\n"));
    }

    #[test]
    fn test_empty_inbox_has_no_latest() {
        assert!(MockInbox::with_emails(vec![]).latest().is_none());
    }
}
