//! Prompt templates sent to the completion endpoint.

/// Questions requested per `POST /ai/generate-mcq` call.
pub const MCQ_BATCH_SIZE: usize = 5;

pub const MOTIVATION: &str = "Write a short, powerful motivational message of at most two \
sentences for a NEET aspirant. Focus on one of: consistency, hard work, NCERT mastery or exam \
strategy. Keep it uplifting and actionable. No emojis.";

/// MCQ batch prompt. The reply must be the JSON document shown in the template.
pub fn mcq_batch(subject: &str, chapter: &str, topic: &str, difficulty: &str, count: usize) -> String {
    format!(
        r#"Write EXACTLY {count} NEET-UG multiple-choice questions aligned with the NCERT syllabus.

Subject: {subject}
Chapter: {chapter}
Topic: {topic}
Difficulty: {difficulty}

Rules:
1. NCERT Class 11/12 level only.
2. Four options labeled A, B, C and D with exactly one correct answer.
3. A one-line explanation of the correct answer.
4. "Easy" means direct recall, "Moderate" means conceptual application.
5. No ambiguous wording and no trick questions.

Reply with this JSON and nothing else:
{{
  "subject": "{subject}",
  "chapter": "{chapter}",
  "topic": "{topic}",
  "difficulty": "{difficulty}",
  "questions": [
    {{
      "question": "Question text",
      "options": {{ "A": "Option A", "B": "Option B", "C": "Option C", "D": "Option D" }},
      "correct": "B",
      "explanation": "One-line explanation using NCERT terminology"
    }}
  ]
}}"#
    )
}

/// Single question on a random high-yield chapter, used for the question of the day.
pub fn daily_question() -> String {
    r#"Write one NEET-UG multiple-choice question from a random high-yield NCERT chapter.

Reply with this JSON and nothing else:
{
  "subject": "Physics, Chemistry or Biology",
  "chapter": "Chapter name",
  "topic": "Topic name",
  "difficulty": "Moderate",
  "question": "Question text",
  "options": { "A": "Option A", "B": "Option B", "C": "Option C", "D": "Option D" },
  "correct": "A",
  "explanation": "One-line explanation with the NCERT reference"
}"#
    .to_string()
}

pub fn buddy(message: &str) -> String {
    format!(
        r#"A NEET student asks: "{message}"

Answer clearly and concisely:
- concept questions: explain with an NCERT reference
- numerical problems: give a step-by-step solution
- doubts: clarify with an example
Stay under 150 words and be encouraging."#
    )
}

pub fn study_plan(duration: u32, daily_hours: u32, prep_level: &str, weak_subjects: &[String]) -> String {
    let focus = if weak_subjects.is_empty() {
        String::new()
    } else {
        format!(" Spend extra time on: {}.", weak_subjects.join(", "))
    };

    format!(
        r#"Create a {duration}-day NEET study plan for a {prep_level} student who studies {daily_hours} hours a day.{focus}

Reply with this JSON and nothing else:
{{
  "title": "Plan title",
  "dailySchedule": [
    {{
      "day": 1,
      "subjects": ["Physics", "Chemistry", "Biology"],
      "topics": ["Topic 1", "Topic 2"],
      "hours": {daily_hours},
      "goals": ["Goal 1", "Goal 2"]
    }}
  ],
  "weeklyGoals": ["Week goal 1"],
  "tips": ["Tip 1"]
}}

Keep it realistic and NCERT-focused."#
    )
}
