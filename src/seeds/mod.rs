//! # Seed Data
//!
//! Idempotent seeding of the skills catalog, run at startup after
//! migrations. Rerunning against a populated database inserts nothing.

use anyhow::Result;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::repositories::SkillRepository;

/// Skill names offered as suggestions during profile setup.
const SKILL_CATALOG: &[&str] = &[
    "C++",
    "Data Analysis",
    "Graphic Design",
    "Java",
    "JavaScript",
    "Leadership",
    "Machine Learning",
    "MATLAB",
    "Public Speaking",
    "Python",
    "R",
    "React",
    "Rust",
    "SQL",
    "Teamwork",
    "Technical Writing",
    "Time Management",
    "TypeScript",
];

/// Ensures every catalog skill exists.
pub async fn seed_skills(db: &DatabaseConnection) -> Result<()> {
    let skills = SkillRepository::new(Arc::new(db.clone()));

    for name in SKILL_CATALOG {
        skills.ensure(name).await?;
    }

    tracing::info!(count = SKILL_CATALOG.len(), "Skills catalog seeded");
    Ok(())
}
