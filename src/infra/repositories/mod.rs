pub mod sqlite_booking_repo;
pub mod sqlite_coach_repo;
pub mod sqlite_learner_repo;
pub mod sqlite_lesson_repo;
pub mod sqlite_review_repo;
pub mod sqlite_template_repo;

pub mod postgres_booking_repo;
pub mod postgres_coach_repo;
pub mod postgres_learner_repo;
pub mod postgres_lesson_repo;
pub mod postgres_review_repo;
pub mod postgres_template_repo;

/// `%term%` with LIKE wildcards in `term` escaped by a backslash.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
