//! Domain Layer
//!
//! Collection record shapes and core abstractions. Records are flat: an id plus
//! optional scalar fields, serialized with the CMS's camelCase field names.

mod entity;
mod date;
mod blog_post;
mod case_study;
mod contact;
mod job;
mod milestone;
mod project;
mod service;
mod team_member;
mod testimonial;

pub use entity::{blank_fields, is_filled, DomainError, DomainResult, Entity};
pub use date::FlexDate;
pub use blog_post::BlogPost;
pub use case_study::CaseStudy;
pub use contact::{ContactSubmission, STATUS_NEW};
pub use job::{status as application_status, JobApplication, JobOpening};
pub use milestone::CompanyMilestone;
pub use project::Project;
pub use service::Service;
pub use team_member::TeamMember;
pub use testimonial::Testimonial;

/// Every collection name the site reads or writes
pub const COLLECTIONS: &[&str] = &[
    BlogPost::COLLECTION,
    Project::COLLECTION,
    Service::COLLECTION,
    Testimonial::COLLECTION,
    TeamMember::COLLECTION,
    JobOpening::COLLECTION,
    JobApplication::COLLECTION,
    CaseStudy::COLLECTION,
    CompanyMilestone::COLLECTION,
    ContactSubmission::COLLECTION,
];
