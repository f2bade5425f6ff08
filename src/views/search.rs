//! Profile search: case-insensitive substring matching over a chosen scope.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::models::profile::Model as ProfileModel;

/// Which profile fields a search query is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    /// Name, faculty, major, courses, skills and interests
    #[default]
    All,
    Courses,
    Skills,
    Interests,
}

fn list_matches(items: &[String], needle: &str) -> bool {
    items.iter().any(|item| item.to_lowercase().contains(needle))
}

/// Returns whether `profile` matches `query` within `scope`.
///
/// Matching is case-insensitive substring containment. An empty or
/// whitespace-only query matches every profile.
pub fn profile_matches(profile: &ProfileModel, query: &str, scope: SearchScope) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    match scope {
        SearchScope::Courses => list_matches(&profile.courses.0, &needle),
        SearchScope::Skills => list_matches(&profile.skills.0, &needle),
        SearchScope::Interests => list_matches(&profile.interests.0, &needle),
        SearchScope::All => {
            profile.full_name.to_lowercase().contains(&needle)
                || profile.faculty.to_lowercase().contains(&needle)
                || profile.major.to_lowercase().contains(&needle)
                || list_matches(&profile.courses.0, &needle)
                || list_matches(&profile.skills.0, &needle)
                || list_matches(&profile.interests.0, &needle)
        }
    }
}

/// Filters `profiles` to those matching `query` within `scope`.
pub fn search_profiles(
    profiles: Vec<ProfileModel>,
    query: &str,
    scope: SearchScope,
) -> Vec<ProfileModel> {
    profiles
        .into_iter()
        .filter(|p| profile_matches(p, query, scope))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::StringList;
    use chrono::Utc;
    use uuid::Uuid;

    fn profile(
        full_name: &str,
        major: &str,
        courses: &[&str],
        skills: &[&str],
        interests: &[&str],
    ) -> ProfileModel {
        let list = |items: &[&str]| StringList(items.iter().map(|s| s.to_string()).collect());
        ProfileModel {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            full_name: full_name.to_string(),
            faculty: "Science".to_string(),
            major: major.to_string(),
            courses: list(courses),
            skills: list(skills),
            interests: list(interests),
            bio: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn course_scope_matches_course_codes_case_insensitively() {
        let p = profile("Alice", "Computer Science", &["CPSC 331"], &[], &[]);

        assert!(profile_matches(&p, "cpsc", SearchScope::Courses));
        assert!(profile_matches(&p, "CPSC 331", SearchScope::Courses));
        assert!(!profile_matches(&p, "MATH", SearchScope::Courses));
    }

    #[test]
    fn scope_restricts_matching_fields() {
        let p = profile("Alice", "Computer Science", &["CPSC 331"], &["Rust"], &["hiking"]);

        // "rust" only lives in skills
        assert!(profile_matches(&p, "rust", SearchScope::Skills));
        assert!(!profile_matches(&p, "rust", SearchScope::Courses));
        assert!(!profile_matches(&p, "rust", SearchScope::Interests));
        assert!(profile_matches(&p, "rust", SearchScope::All));
    }

    #[test]
    fn all_scope_covers_name_faculty_and_major() {
        let p = profile("Alice Ng", "Computer Science", &[], &[], &[]);

        assert!(profile_matches(&p, "alice", SearchScope::All));
        assert!(profile_matches(&p, "science", SearchScope::All));
        assert!(profile_matches(&p, "computer", SearchScope::All));
    }

    #[test]
    fn empty_query_matches_everything() {
        let p = profile("Alice", "Computer Science", &[], &[], &[]);

        assert!(profile_matches(&p, "", SearchScope::All));
        assert!(profile_matches(&p, "   ", SearchScope::Courses));
    }

    #[test]
    fn search_filters_list() {
        let matching = profile("Alice", "Computer Science", &["CPSC 331"], &[], &[]);
        let other = profile("Bob", "Biology", &["BIOL 241"], &[], &[]);
        let matching_id = matching.id;

        let results = search_profiles(vec![matching, other], "CPSC", SearchScope::Courses);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, matching_id);
    }
}
