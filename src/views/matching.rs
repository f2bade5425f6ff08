//! Match scoring and profile completeness.
//!
//! Match percentage weights shared courses twice as heavily as shared skills
//! or interests, against the best possible overlap for the pair. Overlap
//! comparison is case-insensitive.

use std::collections::HashSet;

use crate::models::profile::Model as ProfileModel;

fn lowered(items: &[String]) -> HashSet<String> {
    items.iter().map(|s| s.to_lowercase()).collect()
}

fn overlap(a: &[String], b: &[String]) -> usize {
    let a = lowered(a);
    let b = lowered(b);
    a.intersection(&b).count()
}

/// Weighted similarity between two profiles, 0..=100.
///
/// Common courses count double; skills and interests count once. The
/// denominator is the maximum achievable score for the pair, so two profiles
/// with identical lists score 100. Two profiles with nothing listed score 0.
pub fn match_percentage(mine: &ProfileModel, theirs: &ProfileModel) -> u8 {
    let course_overlap = overlap(&mine.courses.0, &theirs.courses.0);
    let skill_overlap = overlap(&mine.skills.0, &theirs.skills.0);
    let interest_overlap = overlap(&mine.interests.0, &theirs.interests.0);

    let score = 2 * course_overlap + skill_overlap + interest_overlap;

    let max_possible = 2 * mine.courses.len().max(theirs.courses.len())
        + mine.skills.len().max(theirs.skills.len())
        + mine.interests.len().max(theirs.interests.len());

    if max_possible == 0 {
        return 0;
    }

    ((score as f64 / max_possible as f64) * 100.0).round() as u8
}

/// A profile is complete when name, faculty and major are filled in and at
/// least one course is listed. Never persisted, always derived.
pub fn is_complete(profile: &ProfileModel) -> bool {
    !profile.full_name.trim().is_empty()
        && !profile.faculty.trim().is_empty()
        && !profile.major.trim().is_empty()
        && !profile.courses.is_empty()
}

/// Percentage of the seven profile sections that are filled in, 0..=100.
pub fn completion_percent(profile: &ProfileModel) -> u8 {
    let filled = [
        !profile.full_name.trim().is_empty(),
        !profile.faculty.trim().is_empty(),
        !profile.major.trim().is_empty(),
        !profile.courses.is_empty(),
        profile.bio.as_deref().is_some_and(|b| !b.trim().is_empty()),
        !profile.skills.is_empty(),
        !profile.interests.is_empty(),
    ]
    .into_iter()
    .filter(|&f| f)
    .count();

    ((filled as f64 / 7.0) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::StringList;
    use chrono::Utc;
    use uuid::Uuid;

    fn profile(
        full_name: &str,
        faculty: &str,
        major: &str,
        courses: &[&str],
        skills: &[&str],
        interests: &[&str],
        bio: Option<&str>,
    ) -> ProfileModel {
        let list = |items: &[&str]| StringList(items.iter().map(|s| s.to_string()).collect());
        ProfileModel {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            full_name: full_name.to_string(),
            faculty: faculty.to_string(),
            major: major.to_string(),
            courses: list(courses),
            skills: list(skills),
            interests: list(interests),
            bio: bio.map(|b| b.to_string()),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn identical_profiles_score_100() {
        let a = profile(
            "Alice",
            "Science",
            "CS",
            &["CPSC 331"],
            &["Rust"],
            &["hiking"],
            None,
        );
        let b = profile(
            "Bob",
            "Science",
            "CS",
            &["CPSC 331"],
            &["Rust"],
            &["hiking"],
            None,
        );

        assert_eq!(match_percentage(&a, &b), 100);
    }

    #[test]
    fn empty_profiles_score_0() {
        let a = profile("Alice", "Science", "CS", &[], &[], &[], None);
        let b = profile("Bob", "Science", "CS", &[], &[], &[], None);

        assert_eq!(match_percentage(&a, &b), 0);
    }

    #[test]
    fn shared_courses_weigh_double() {
        // One shared course out of one: 2/2. One shared skill out of one: 1/1.
        // Mixed case: shared course but unshared skill should beat shared
        // skill but unshared course.
        let course_match_a = profile("A", "S", "CS", &["CPSC 331"], &["Rust"], &[], None);
        let course_match_b = profile("B", "S", "CS", &["CPSC 331"], &["Go"], &[], None);

        let skill_match_a = profile("A", "S", "CS", &["CPSC 331"], &["Rust"], &[], None);
        let skill_match_b = profile("B", "S", "CS", &["MATH 271"], &["Rust"], &[], None);

        let course_score = match_percentage(&course_match_a, &course_match_b);
        let skill_score = match_percentage(&skill_match_a, &skill_match_b);

        assert_eq!(course_score, 67); // 2 of 3
        assert_eq!(skill_score, 33); // 1 of 3
        assert!(course_score > skill_score);
    }

    #[test]
    fn overlap_is_case_insensitive() {
        let a = profile("A", "S", "CS", &["cpsc 331"], &[], &[], None);
        let b = profile("B", "S", "CS", &["CPSC 331"], &[], &[], None);

        assert_eq!(match_percentage(&a, &b), 100);
    }

    #[test]
    fn match_is_symmetric() {
        let a = profile("A", "S", "CS", &["CPSC 331", "MATH 271"], &["Rust"], &[], None);
        let b = profile("B", "S", "CS", &["CPSC 331"], &["Rust", "Go"], &["chess"], None);

        assert_eq!(match_percentage(&a, &b), match_percentage(&b, &a));
    }

    #[test]
    fn complete_iff_identity_fields_and_a_course() {
        let complete = profile("Alice", "Science", "CS", &["CPSC 331"], &[], &[], None);
        assert!(is_complete(&complete));

        let no_courses = profile("Alice", "Science", "CS", &[], &[], &[], None);
        assert!(!is_complete(&no_courses));

        let blank_name = profile("  ", "Science", "CS", &["CPSC 331"], &[], &[], None);
        assert!(!is_complete(&blank_name));

        let blank_faculty = profile("Alice", "", "CS", &["CPSC 331"], &[], &[], None);
        assert!(!is_complete(&blank_faculty));

        let blank_major = profile("Alice", "Science", "", &["CPSC 331"], &[], &[], None);
        assert!(!is_complete(&blank_major));
    }

    #[test]
    fn completion_percent_counts_seven_sections() {
        let empty = profile("", "", "", &[], &[], &[], None);
        assert_eq!(completion_percent(&empty), 0);

        let full = profile(
            "Alice",
            "Science",
            "CS",
            &["CPSC 331"],
            &["Rust"],
            &["hiking"],
            Some("Hi!"),
        );
        assert_eq!(completion_percent(&full), 100);

        // 4 of 7 sections filled
        let partial = profile("Alice", "Science", "CS", &["CPSC 331"], &[], &[], None);
        assert_eq!(completion_percent(&partial), 57);
    }
}
