use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

use inductrack_core::assignment::{AnswerPayload, Assignment, AssignmentStatus};
use inductrack_core::grading::grade;
use inductrack_core::model::{OptionIndex, Question, QuestionBody};
use inductrack_core::results::summarize;

fn instant(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn multichoice_question(option_count: u32) -> Question {
    Question {
        id: "bench".into(),
        question: "Pick all that apply".into(),
        description: String::new(),
        body: QuestionBody::Multichoice {
            options: (0..option_count).map(|i| format!("option {i}")).collect(),
            correct_options: (0..option_count / 2).map(OptionIndex).collect(),
        },
    }
}

fn make_assignment(status: AssignmentStatus, due: &str) -> Assignment {
    Assignment {
        id: Uuid::nil(),
        user_id: Uuid::nil(),
        induction_id: "bench".into(),
        status,
        available_from: instant("2024-01-01T00:00:00Z"),
        due_date: instant(due),
        assigned_at: instant("2023-12-20T00:00:00Z"),
        started_at: None,
        completed_at: None,
        answers: BTreeMap::new(),
        feedback: None,
    }
}

fn bench_grade(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade");

    let small = multichoice_question(4);
    let small_payload = AnswerPayload::Multichoice {
        selected_options: vec![OptionIndex(1), OptionIndex(0)],
    };
    group.bench_function("multichoice_4_options", |b| {
        b.iter(|| grade(black_box(&small), black_box(&small_payload)))
    });

    let large = multichoice_question(64);
    let large_payload = AnswerPayload::Multichoice {
        selected_options: (0..32).rev().map(OptionIndex).collect(),
    };
    group.bench_function("multichoice_64_options", |b| {
        b.iter(|| grade(black_box(&large), black_box(&large_payload)))
    });

    let yes_no = Question {
        id: "bench".into(),
        question: "Ready?".into(),
        description: String::new(),
        body: QuestionBody::YesNo {
            options: vec![],
            correct_option: OptionIndex(0),
        },
    };
    let yes_no_payload = AnswerPayload::YesNo {
        selected_option: Some(OptionIndex(0)),
    };
    group.bench_function("yes_no", |b| {
        b.iter(|| grade(black_box(&yes_no), black_box(&yes_no_payload)))
    });

    let short = Question {
        id: "bench".into(),
        question: "Explain".into(),
        description: String::new(),
        body: QuestionBody::ShortAnswer,
    };
    let short_payload = AnswerPayload::ShortAnswer {
        text_value: "a free-text answer".into(),
    };
    group.bench_function("short_answer", |b| {
        b.iter(|| grade(black_box(&short), black_box(&short_payload)))
    });

    group.finish();
}

fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize");
    let now = instant("2024-01-15T00:00:00Z");

    for size in [100usize, 1000, 10_000] {
        let roster: Vec<Assignment> = (0..size)
            .map(|i| match i % 3 {
                0 => make_assignment(AssignmentStatus::Complete, "2024-01-10T00:00:00Z"),
                1 => make_assignment(AssignmentStatus::InProgress, "2024-01-20T00:00:00Z"),
                _ => make_assignment(AssignmentStatus::Assigned, "2024-01-10T00:00:00Z"),
            })
            .collect();

        group.bench_function(format!("roster_{size}"), |b| {
            b.iter(|| summarize(black_box(&roster), black_box(now)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grade, bench_summarize);
criterion_main!(benches);
