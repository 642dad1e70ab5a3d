//! Resume text assembly
//!
//! Applicants fill an `ApplicationForm`; on submit it becomes a
//! `JobApplication` whose `resumeFile` holds plain resume text. The admin
//! dashboard renders its own download copy from the stored record.

use crate::domain::{application_status, FlexDate, JobApplication};

/// Careers page application form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationForm {
    /// Posting applied to; `None` for a general application
    pub job_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub cover_letter: String,
    pub resume_text: String,
    /// Free text; only the leading integer is kept
    pub experience: String,
    pub skills: Vec<String>,
    pub portfolio: String,
    pub linked_in: String,
}

impl ApplicationForm {
    pub fn for_job(job_id: impl Into<String>) -> Self {
        Self {
            job_id: Some(job_id.into()),
            ..Default::default()
        }
    }

    /// Add a trimmed skill unless it is blank or already listed
    pub fn add_skill(&mut self, raw: &str) -> bool {
        let skill = raw.trim();
        if skill.is_empty() || self.skills.iter().any(|s| s == skill) {
            return false;
        }
        self.skills.push(skill.to_string());
        true
    }

    pub fn remove_skill(&mut self, skill: &str) {
        self.skills.retain(|s| s != skill);
    }

    /// Build the record to create. The id is left for the form controller.
    pub fn to_application(&self, submitted: FlexDate) -> JobApplication {
        let status = if self.job_id.is_some() {
            application_status::SUBMITTED
        } else {
            application_status::GENERAL_SUBMISSION
        };
        JobApplication {
            first_name: non_empty(&self.first_name),
            last_name: non_empty(&self.last_name),
            email: non_empty(&self.email),
            phone_number: non_empty(&self.phone),
            resume_file: Some(formatted_resume(self, &submitted)),
            skills: Some(self.skills.join(", ")),
            years_of_experience: Some(parse_experience(&self.experience)),
            application_status: Some(status.to_string()),
            submission_date: Some(submitted),
            ..Default::default()
        }
    }

    /// Rebuild a form from a stored application, for the applicant's own download
    pub fn from_application(app: &JobApplication) -> Self {
        Self {
            first_name: app.first_name.clone().unwrap_or_default(),
            last_name: app.last_name.clone().unwrap_or_default(),
            email: app.email.clone().unwrap_or_default(),
            phone: app.phone_number.clone().unwrap_or_default(),
            experience: app
                .years_of_experience
                .map(|y| format_number(y))
                .unwrap_or_default(),
            skills: app.skill_list(),
            resume_text: app.resume_file.clone().unwrap_or_default(),
            ..Default::default()
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Leading integer of `raw`, or 0 when there is none
pub fn parse_experience(raw: &str) -> f64 {
    let s = raw.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    match digits[..end].parse::<f64>() {
        Ok(n) => sign * n,
        Err(_) => 0.0,
    }
}

fn or_else<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Resume text stored with a new application
pub fn formatted_resume(form: &ApplicationForm, date: &FlexDate) -> String {
    let mut lines: Vec<String> = vec![
        "RESUME".into(),
        format!("Generated on: {}", date.short_date()),
        String::new(),
        "PERSONAL INFORMATION".into(),
        format!("Name: {} {}", form.first_name, form.last_name),
        format!("Email: {}", form.email),
        format!("Phone: {}", form.phone),
    ];
    if !form.portfolio.trim().is_empty() {
        lines.push(format!("Portfolio: {}", form.portfolio));
    }
    if !form.linked_in.trim().is_empty() {
        lines.push(format!("LinkedIn: {}", form.linked_in));
    }
    let skills = if form.skills.is_empty() {
        "Not specified".to_string()
    } else {
        form.skills.join(", ")
    };
    lines.extend([
        String::new(),
        "EXPERIENCE".into(),
        format!("Years of Experience: {}", or_else(&form.experience, "Not specified")),
        String::new(),
        "SKILLS".into(),
        skills,
        String::new(),
        "RESUME CONTENT".into(),
        or_else(&form.resume_text, "No resume content provided").to_string(),
    ]);
    if !form.cover_letter.trim().is_empty() {
        lines.extend([String::new(), "COVER LETTER".into(), form.cover_letter.clone()]);
    }
    lines.extend([
        String::new(),
        "---".into(),
        "Application submitted via the careers portal".into(),
        format!("Submission Date: {}", date.short_date()),
    ]);
    lines.join("\n")
}

/// Resume copy downloaded from the admin dashboard
pub fn admin_resume(app: &JobApplication, today: &FlexDate) -> String {
    let name = format!(
        "{} {}",
        app.first_name.as_deref().unwrap_or_default(),
        app.last_name.as_deref().unwrap_or_default()
    );
    let experience = app
        .years_of_experience
        .filter(|y| *y != 0.0)
        .map(format_number)
        .unwrap_or_else(|| "Not specified".to_string());
    [
        format!("RESUME - {}", name),
        format!("Downloaded on: {}", today.short_date()),
        String::new(),
        "PERSONAL INFORMATION".into(),
        format!("Name: {}", name),
        format!("Email: {}", app.email.as_deref().unwrap_or_default()),
        format!("Phone: {}", app.phone_number.as_deref().unwrap_or("Not provided")),
        String::new(),
        "EXPERIENCE".into(),
        format!("Years of Experience: {}", experience),
        String::new(),
        "SKILLS".into(),
        app.skills.clone().unwrap_or_else(|| "Not specified".into()),
        String::new(),
        "RESUME CONTENT".into(),
        app.resume_file
            .clone()
            .unwrap_or_else(|| "No resume content available".into()),
        String::new(),
        "APPLICATION DETAILS".into(),
        format!("Status: {}", app.application_status.as_deref().unwrap_or("Pending")),
        format!(
            "Submission Date: {}",
            app.submission_date
                .map(|d| d.short_date())
                .unwrap_or_else(|| "Unknown".into())
        ),
        String::new(),
        "---".into(),
        "Downloaded from the admin dashboard".into(),
    ]
    .join("\n")
}

/// `First_Last_Resume.txt`
pub fn resume_file_name(app: &JobApplication) -> String {
    format!(
        "{}_{}_Resume.txt",
        app.first_name.as_deref().unwrap_or_default(),
        app.last_name.as_deref().unwrap_or_default()
    )
}

/// `My_Resume_2024-01-15.txt`
pub fn my_resume_file_name(date: &FlexDate) -> String {
    format!("My_Resume_{}.txt", date.date().format("%Y-%m-%d"))
}

// ========================
// Resume builder
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Personal,
    Experience,
    Education,
    Skills,
    Projects,
}

impl SectionKind {
    fn title(self) -> &'static str {
        match self {
            SectionKind::Personal => "Personal Information",
            SectionKind::Experience => "Experience",
            SectionKind::Education => "Education",
            SectionKind::Skills => "Skills",
            SectionKind::Projects => "Projects",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    Personal {
        full_name: String,
        email: String,
        phone: String,
        location: String,
        summary: String,
    },
    Experience {
        company: String,
        position: String,
        duration: String,
        description: String,
    },
    Education {
        institution: String,
        degree: String,
        year: String,
        gpa: String,
    },
    Skills {
        categories: Vec<String>,
    },
    Projects {
        name: String,
        description: String,
        technologies: String,
        link: String,
    },
}

impl SectionContent {
    fn blank(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Personal => SectionContent::Personal {
                full_name: String::new(),
                email: String::new(),
                phone: String::new(),
                location: String::new(),
                summary: String::new(),
            },
            SectionKind::Experience => SectionContent::Experience {
                company: String::new(),
                position: String::new(),
                duration: String::new(),
                description: String::new(),
            },
            SectionKind::Education => SectionContent::Education {
                institution: String::new(),
                degree: String::new(),
                year: String::new(),
                gpa: String::new(),
            },
            SectionKind::Skills => SectionContent::Skills {
                categories: Vec::new(),
            },
            SectionKind::Projects => SectionContent::Projects {
                name: String::new(),
                description: String::new(),
                technologies: String::new(),
                link: String::new(),
            },
        }
    }

    fn render(&self) -> String {
        match self {
            SectionContent::Personal {
                full_name,
                email,
                phone,
                location,
                summary,
            } => format!("{}\n{} | {}\n{}\n\n{}\n", full_name, email, phone, location, summary),
            SectionContent::Experience {
                company,
                position,
                duration,
                description,
            } => format!("{} at {}\n{}\n{}\n", position, company, duration, description),
            SectionContent::Education {
                institution,
                degree,
                year,
                gpa,
            } => {
                let gpa = if gpa.is_empty() {
                    String::new()
                } else {
                    format!(" | GPA: {}", gpa)
                };
                format!("{} - {}\n{}{}\n", degree, institution, year, gpa)
            }
            SectionContent::Skills { categories } if categories.is_empty() => String::new(),
            SectionContent::Skills { categories } => format!("{}\n", categories.join(", ")),
            SectionContent::Projects {
                name,
                description,
                technologies,
                link,
            } => {
                let link = if link.is_empty() {
                    String::new()
                } else {
                    format!("Link: {}", link)
                };
                format!("{}\n{}\nTechnologies: {}\n{}\n", name, description, technologies, link)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeSection {
    pub id: String,
    pub title: String,
    pub content: SectionContent,
}

/// Ordered resume sections; starts with a blank personal section
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeBuilder {
    sections: Vec<ResumeSection>,
}

impl Default for ResumeBuilder {
    fn default() -> Self {
        let mut builder = Self { sections: Vec::new() };
        builder.add(SectionKind::Personal);
        builder
    }
}

impl ResumeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> &[ResumeSection] {
        &self.sections
    }

    /// Append a blank section and return its id
    pub fn add(&mut self, kind: SectionKind) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.sections.push(ResumeSection {
            id: id.clone(),
            title: kind.title().to_string(),
            content: SectionContent::blank(kind),
        });
        id
    }

    pub fn content_mut(&mut self, id: &str) -> Option<&mut SectionContent> {
        self.sections
            .iter_mut()
            .find(|s| s.id == id)
            .map(|s| &mut s.content)
    }

    pub fn remove(&mut self, id: &str) {
        self.sections.retain(|s| s.id != id);
    }

    /// Plain text for the form's resume field
    pub fn render(&self) -> String {
        self.sections
            .iter()
            .map(|s| format!("\n{}\n{}\n", s.title.to_uppercase(), s.content.render()))
            .collect()
    }
}
