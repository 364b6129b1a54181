//! Local store keys. Whitespace inside key components becomes `_`.

use chrono::NaiveDate;

pub const USER: &str = "user";
pub const ACTIVE_TEST_SESSION: &str = "active_test_session";

fn component(part: &str) -> String {
    part.split_whitespace().collect::<Vec<_>>().join("_")
}

pub fn questions(subject: &str, chapter: &str, topic: &str) -> String {
    format!(
        "questions_{}_{}_{}",
        component(subject),
        component(chapter),
        component(topic)
    )
}

pub fn daily_question(date: NaiveDate) -> String {
    format!("daily_question_{}", date.format("%Y-%m-%d"))
}

pub fn syllabus_progress(user_id: &str, class_type: &str) -> String {
    format!(
        "syllabus_progress_{}_{}",
        component(user_id),
        component(class_type)
    )
}
