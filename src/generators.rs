//! Templated content helpers
//!
//! Canned text for the "generate" buttons and small derived figures for the
//! dashboard and blog listing. Nothing here calls out to a model.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::domain::{application_status, BlogPost, DomainError, DomainResult, JobApplication, Project, Service, Testimonial};

const TESTIMONIAL_TEMPLATES: [&str; 4] = [
    "Working with {company} has been a game-changer for our business. Their innovative approach and technical expertise helped us streamline our operations and achieve remarkable growth. The team's dedication and professionalism exceeded our expectations at every step.",
    "The solutions provided by {company} transformed how we operate. Their cutting-edge technology and strategic insights delivered measurable results that significantly improved our efficiency and customer satisfaction. Highly recommended for any business looking to innovate.",
    "{company} delivered exceptional results that surpassed our goals. Their team's deep understanding of our industry challenges and their ability to provide tailored solutions made all the difference. The ROI we've seen has been outstanding.",
    "From concept to implementation, {company} demonstrated unparalleled expertise and commitment. Their innovative solutions not only solved our immediate challenges but also positioned us for long-term success. A truly remarkable partnership.",
];

/// Pick a testimonial body about `company` for the given author
pub fn testimonial_text<R: Rng + ?Sized>(
    rng: &mut R,
    company: &str,
    author_name: Option<&str>,
    company_name: Option<&str>,
) -> DomainResult<String> {
    let filled = |v: Option<&str>| v.is_some_and(|s| !s.trim().is_empty());
    if !filled(author_name) || !filled(company_name) {
        return Err(DomainError::Validation(
            "Please enter author name and company name first.".to_string(),
        ));
    }
    let template = TESTIMONIAL_TEMPLATES
        .choose(rng)
        .copied()
        .unwrap_or(TESTIMONIAL_TEMPLATES[0]);
    Ok(template.replace("{company}", company))
}

/// Summary paragraph for a case study draft
pub fn case_study_summary(title: Option<&str>, client_name: Option<&str>) -> DomainResult<String> {
    let client = match (title.map(str::trim), client_name.map(str::trim)) {
        (Some(t), Some(c)) if !t.is_empty() && !c.is_empty() => c,
        _ => {
            return Err(DomainError::Validation(
                "Please enter case study title and client name first.".to_string(),
            ))
        }
    };
    Ok(format!(
        "Discover how {} transformed their business operations through innovative technology solutions. \
         This comprehensive case study showcases the challenges faced, strategic approach implemented, \
         and remarkable results achieved. Learn about the cutting-edge methodologies and best practices \
         that led to significant improvements in efficiency, productivity, and overall business performance.",
        client
    ))
}

const WORDS_PER_MINUTE: usize = 200;
pub const EXCERPT_LENGTH: usize = 150;

/// `"N min read"` at 200 words per minute, rounded up
pub fn reading_time(content: Option<&str>) -> String {
    let minutes = match content {
        Some(text) if !text.is_empty() => text.split(' ').count().div_ceil(WORDS_PER_MINUTE),
        _ => 1,
    };
    format!("{} min read", minutes)
}

/// First `length` characters followed by `...` when the text is longer
pub fn excerpt(content: Option<&str>, length: usize) -> String {
    let Some(text) = content else {
        return String::new();
    };
    if text.chars().count() > length {
        let cut: String = text.chars().take(length).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContentHealth {
    Excellent,
    Good,
    NeedsAttention,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EngagementTrend {
    Positive,
    Stable,
    Declining,
}

/// Overview card on the admin dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub content_health: ContentHealth,
    pub engagement_trend: EngagementTrend,
    pub average_rating: f64,
    pub action_items: Vec<String>,
}

pub fn dashboard_summary(
    blog_posts: &[BlogPost],
    projects: &[Project],
    services: &[Service],
    testimonials: &[Testimonial],
    applications: &[JobApplication],
) -> DashboardSummary {
    let total_content = blog_posts.len() + projects.len() + services.len();
    let pending = applications
        .iter()
        .filter(|a| a.application_status.as_deref() == Some(application_status::PENDING))
        .count();
    // Unrated testimonials count as zero here
    let average_rating = if testimonials.is_empty() {
        0.0
    } else {
        testimonials.iter().map(|t| t.rating.unwrap_or(0.0)).sum::<f64>() / testimonials.len() as f64
    };

    let content_health = match total_content {
        n if n > 10 => ContentHealth::Excellent,
        n if n > 5 => ContentHealth::Good,
        _ => ContentHealth::NeedsAttention,
    };
    let engagement_trend = if average_rating > 4.0 {
        EngagementTrend::Positive
    } else if average_rating > 3.0 {
        EngagementTrend::Stable
    } else {
        EngagementTrend::Declining
    };

    let mut action_items = Vec::new();
    if pending > 0 {
        action_items.push(format!("{} job applications need review", pending));
    }
    if blog_posts.len() < 5 {
        action_items.push("Consider adding more blog content".to_string());
    }
    if testimonials.len() < 10 {
        action_items.push("Collect more customer testimonials".to_string());
    }

    DashboardSummary {
        content_health,
        engagement_trend,
        average_rating,
        action_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_testimonial_requires_author_and_company() {
        let mut rng = StdRng::seed_from_u64(7);
        let err = testimonial_text(&mut rng, "Acme", Some("Sam"), Some("  ")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_testimonial_is_seed_stable() {
        let a = testimonial_text(&mut StdRng::seed_from_u64(42), "Acme", Some("Sam"), Some("Initech")).unwrap();
        let b = testimonial_text(&mut StdRng::seed_from_u64(42), "Acme", Some("Sam"), Some("Initech")).unwrap();
        assert_eq!(a, b);
        assert!(a.contains("Acme"));
        assert!(!a.contains("{company}"));
    }

    #[test]
    fn test_case_study_summary_names_client() {
        let text = case_study_summary(Some("Cloud move"), Some("Globex")).unwrap();
        assert!(text.starts_with("Discover how Globex transformed"));
        assert!(case_study_summary(Some("Cloud move"), None).is_err());
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time(None), "1 min read");
        assert_eq!(reading_time(Some("")), "1 min read");
        assert_eq!(reading_time(Some("one two three")), "1 min read");
        let long = vec!["word"; 401].join(" ");
        assert_eq!(reading_time(Some(&long)), "3 min read");
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt(None, 150), "");
        assert_eq!(excerpt(Some("short"), 150), "short");
        let long = "x".repeat(151);
        let cut = excerpt(Some(&long), EXCERPT_LENGTH);
        assert_eq!(cut.len(), 153);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_dashboard_summary() {
        let apps = vec![
            JobApplication {
                application_status: Some("pending".into()),
                ..Default::default()
            },
            JobApplication {
                application_status: Some("submitted".into()),
                ..Default::default()
            },
        ];
        let testimonials = vec![
            Testimonial {
                rating: Some(5.0),
                ..Default::default()
            },
            Testimonial::default(),
        ];
        let summary = dashboard_summary(&[], &[], &[], &testimonials, &apps);
        assert_eq!(summary.content_health, ContentHealth::NeedsAttention);
        assert_eq!(summary.average_rating, 2.5);
        assert_eq!(summary.engagement_trend, EngagementTrend::Declining);
        assert_eq!(
            summary.action_items,
            vec![
                "1 job applications need review",
                "Consider adding more blog content",
                "Collect more customer testimonials",
            ]
        );
    }
}
