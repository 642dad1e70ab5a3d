//! Scripted chat assistant
//!
//! A keyword dispatch table: the first rule with a keyword contained in the
//! lowercased input answers, otherwise the fallback does. Replies quote the
//! configured company profile.

use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::config::CompanyProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ChatMessage {
    fn new(role: Role, content: String, suggestions: Vec<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content,
            timestamp: Utc::now(),
            suggestions,
        }
    }

    /// `HH:MM` in local time
    pub fn time_label(&self) -> String {
        self.timestamp.with_timezone(&Local).format("%H:%M").to_string()
    }
}

struct Rule {
    keywords: &'static [&'static str],
    reply: &'static str,
    suggestions: [&'static str; 4],
}

// Order matters: earlier rules win.
const RULES: &[Rule] = &[
    Rule {
        keywords: &["service", "what do you do"],
        reply: "{company} offers cutting-edge technology solutions including AI/ML development, cloud computing, mobile app development, web development, blockchain solutions, and IT consulting. We specialize in transforming businesses through innovative technology.",
        suggestions: ["View our services page", "Tell me about AI solutions", "What about cloud computing?", "Show me your portfolio"],
    },
    Rule {
        keywords: &["job", "career", "hiring"],
        reply: "We're always looking for talented individuals to join our team! We have openings in various departments including Engineering, Design, Product Management, and Sales. You can view all current openings on our careers page and apply directly through our application system.",
        suggestions: ["View job openings", "How do I apply?", "What benefits do you offer?", "Tell me about company culture"],
    },
    Rule {
        keywords: &["project", "portfolio", "work"],
        reply: "We've successfully delivered 150+ projects for clients worldwide, ranging from AI-powered applications to enterprise cloud solutions. Our portfolio includes work in fintech, healthcare, e-commerce, and emerging technologies. Each project is tailored to meet specific client needs and business objectives.",
        suggestions: ["View our projects", "Tell me about a specific project", "What technologies do you use?", "How do you approach projects?"],
    },
    Rule {
        keywords: &["contact", "reach", "talk"],
        reply: "You can reach us through multiple channels: Email us at {email}, call us at {phone}, or visit our contact page to send us a message. Our team typically responds within 24 hours. We're here to help with any questions about our services or potential collaborations.",
        suggestions: ["Send a message", "Schedule a call", "Visit our office", "Get a quote"],
    },
    Rule {
        keywords: &["price", "cost", "quote"],
        reply: "Our pricing varies based on project scope, complexity, and timeline. We offer competitive rates and flexible engagement models including fixed-price projects, time & materials, and dedicated team arrangements. Contact us for a personalized quote based on your specific requirements.",
        suggestions: ["Get a custom quote", "Tell me about your process", "What's included in projects?", "Contact sales team"],
    },
    Rule {
        keywords: &["technology", "tech stack"],
        reply: "We work with cutting-edge technologies including React, Node.js, Python, AWS, Docker, Kubernetes, TensorFlow, MongoDB, PostgreSQL, and more. Our team stays current with the latest industry trends and best practices to deliver robust, scalable solutions.",
        suggestions: ["View our tech stack", "Tell me about AI capabilities", "What about cloud platforms?", "Mobile development technologies"],
    },
    Rule {
        keywords: &["about", "company"],
        reply: "{company} was founded in 2020 with a mission to empower businesses through innovative technology solutions. We're a team of 25+ experts serving 50+ global clients with a 99% satisfaction rate. Our vision is to become the global leader in transformative technology consulting.",
        suggestions: ["Learn more about us", "Meet our team", "Our company values", "Our mission and vision"],
    },
    Rule {
        keywords: &["hello", "hi", "hey"],
        reply: "Hello! Great to meet you. I'm here to help you learn more about {company} and how we can assist with your technology needs. What would you like to know about our company, services, or team?",
        suggestions: ["Tell me about your services", "What makes you different?", "Show me your work", "How can you help my business?"],
    },
    Rule {
        keywords: &["help"],
        reply: "I'm here to help! I can provide information about our services, current job openings, recent projects, company information, contact details, and more. What specific information are you looking for?",
        suggestions: ["Services overview", "Job opportunities", "Recent projects", "Contact information"],
    },
];

const FALLBACK: Rule = Rule {
    keywords: &[],
    reply: "I understand you're interested in learning more. While I may not have specific information about that topic, I'd be happy to help you with questions about our services, projects, careers, or company information. You can also contact our team directly for more detailed assistance.",
    suggestions: ["Tell me about your services", "View job openings", "See recent projects", "Contact your team"],
};

const GREETING: &str = "Hello! I'm your assistant for {company}. I can help you with information about our services, projects, careers, and more. How can I assist you today?";
const GREETING_SUGGESTIONS: [&str; 4] = [
    "Tell me about your services",
    "What job openings do you have?",
    "Show me recent projects",
    "How can I contact you?",
];

fn fill(template: &str, profile: &CompanyProfile) -> String {
    template
        .replace("{company}", &profile.name)
        .replace("{email}", &profile.email)
        .replace("{phone}", &profile.phone)
}

fn owned(suggestions: &[&str]) -> Vec<String> {
    suggestions.iter().map(|s| s.to_string()).collect()
}

/// Reply text and suggestions for one user message
pub fn reply_for(input: &str, profile: &CompanyProfile) -> (String, Vec<String>) {
    let lower = input.to_lowercase();
    let rule = RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
        .unwrap_or(&FALLBACK);
    (fill(rule.reply, profile), owned(&rule.suggestions))
}

/// One conversation with the assistant
#[derive(Debug, Clone)]
pub struct Assistant {
    profile: CompanyProfile,
    reply_delay: Duration,
    messages: Vec<ChatMessage>,
}

impl Assistant {
    /// Start a conversation with the greeting already posted
    pub fn new(profile: CompanyProfile, reply_delay: Duration) -> Self {
        let greeting = ChatMessage::new(
            Role::Assistant,
            fill(GREETING, &profile),
            owned(&GREETING_SUGGESTIONS),
        );
        Self {
            profile,
            reply_delay,
            messages: vec![greeting],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Post `input` and the reply to it. Blank input is ignored.
    pub async fn send(&mut self, input: &str) -> Option<&ChatMessage> {
        let content = input.trim();
        if content.is_empty() {
            return None;
        }
        self.messages
            .push(ChatMessage::new(Role::User, content.to_string(), Vec::new()));

        if !self.reply_delay.is_zero() {
            tokio::time::sleep(self.reply_delay).await;
        }

        let (reply, suggestions) = reply_for(content, &self.profile);
        self.messages
            .push(ChatMessage::new(Role::Assistant, reply, suggestions));
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CompanyProfile {
        CompanyProfile {
            name: "Acme".into(),
            email: "hello@acme.test".into(),
            phone: "555-0100".into(),
        }
    }

    #[test]
    fn test_rule_order_wins() {
        // "services" and "project" both match; services comes first
        let (reply, _) = reply_for("Do your services include project work?", &profile());
        assert!(reply.starts_with("Acme offers"));
    }

    #[test]
    fn test_contact_quotes_profile() {
        let (reply, suggestions) = reply_for("How do I CONTACT you", &profile());
        assert!(reply.contains("hello@acme.test"));
        assert!(reply.contains("555-0100"));
        assert_eq!(suggestions.len(), 4);
    }

    #[test]
    fn test_fallback() {
        let (reply, suggestions) = reply_for("zzz", &profile());
        assert!(reply.starts_with("I understand you're interested"));
        assert_eq!(suggestions[0], "Tell me about your services");
    }

    #[tokio::test]
    async fn test_conversation_flow() {
        let mut assistant = Assistant::new(profile(), Duration::ZERO);
        assert_eq!(assistant.messages().len(), 1);
        assert!(assistant.messages()[0].content.contains("Acme"));

        assert!(assistant.send("   ").await.is_none());
        assert_eq!(assistant.messages().len(), 1);

        let reply = assistant.send("  help  ").await.unwrap();
        assert_eq!(reply.role, Role::Assistant);
        assert!(reply.content.starts_with("I'm here to help!"));
        assert_eq!(assistant.messages()[1].content, "help");
        assert_eq!(assistant.messages().len(), 3);
    }

    #[tokio::test]
    async fn test_reply_waits_for_delay() {
        let mut assistant = Assistant::new(profile(), Duration::from_millis(30));
        let started = tokio::time::Instant::now();
        assistant.send("hello").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
