use serde_json::json;

use interview_coach::models::{CodeReviewResponse, Review, ReviewCategory};

fn decode(value: serde_json::Value) -> Review {
    serde_json::from_value::<CodeReviewResponse>(value)
        .unwrap()
        .into_review()
}

#[test]
fn test_decode_full_review() {
    let review = decode(json!({
        "review": {
            "clarification": {"grade": 9, "feedback": "Asked about empty input"},
            "brute_force": {"grade": 7.5, "feedback": "O(n^2) is fine"},
            "coding": {
                "grade": 8,
                "feedback": "Clean",
                "line_by_line": [
                    {"line": 4, "issue": "unused variable", "suggestion": "remove it"}
                ]
            },
            "total": 24.5,
            "key_pointers": ["Sort by start", "Compare with last merged"],
            "actual_solution": "inner solution"
        },
        "actual_solution": "top-level solution"
    }));

    assert_eq!(review.total_score, 24.5);
    assert_eq!(review.score(ReviewCategory::BruteForce), 7.5);
    assert_eq!(review.feedback(ReviewCategory::Coding), "Clean");
    assert_eq!(review.line_issues.len(), 1);
    assert_eq!(review.line_issues[0].line, Some(4));
    assert_eq!(review.key_takeaways.len(), 2);
    assert_eq!(
        review.reference_solution.as_deref(),
        Some("top-level solution")
    );
}

#[test]
fn test_decode_lenient_scores() {
    let review = decode(json!({
        "review": {
            "clarification": {"grade": "8/10", "feedback": "ok"},
            "brute_force": {"grade": " 6 "},
            "coding": {"grade": null},
        }
    }));

    assert_eq!(review.score(ReviewCategory::Clarification), 8.0);
    assert_eq!(review.score(ReviewCategory::BruteForce), 6.0);
    assert_eq!(review.score(ReviewCategory::Coding), 0.0);
    // 缺少总分时按各维度求和
    assert_eq!(review.total_score, 14.0);
    assert_eq!(review.feedback(ReviewCategory::BruteForce), "");
}

#[test]
fn test_decode_takeaways_from_text() {
    let review = decode(json!({
        "review": {
            "total": "20",
            "key_pointers": "- Use a heap\n\n* Watch for overflow\n• Test edge cases",
            "actual_solution": "   "
        }
    }));

    assert_eq!(review.total_score, 20.0);
    assert_eq!(
        review.key_takeaways,
        vec!["Use a heap", "Watch for overflow", "Test edge cases"]
    );
    assert!(review.reference_solution.is_none());
}

#[test]
fn test_decode_falls_back_to_inner_solution() {
    let review = decode(json!({
        "review": {
            "coding": {
                "line_by_line": [{"line": "0", "issue": "bad"}, {"issue": "no line"}]
            },
            "actual_solution": "inner solution"
        }
    }));

    assert_eq!(review.reference_solution.as_deref(), Some("inner solution"));
    assert_eq!(review.line_issues[0].line, None);
    assert_eq!(review.line_issues[1].line, None);
    assert_eq!(review.line_issues[1].issue, "no line");
}

#[test]
fn test_decode_null_sections_as_empty() {
    let review = decode(json!({
        "review": {
            "clarification": null,
            "brute_force": {"grade": 5, "feedback": "ok"},
            "coding": {"grade": 6, "line_by_line": null},
            "key_pointers": null
        }
    }));

    assert_eq!(review.score(ReviewCategory::Clarification), 0.0);
    assert_eq!(review.feedback(ReviewCategory::Clarification), "");
    assert_eq!(review.total_score, 11.0);
    assert!(review.line_issues.is_empty());
    assert!(review.key_takeaways.is_empty());

    let review = decode(json!({"review": {"coding": null}, "actual_solution": "sol"}));
    assert_eq!(review.total_score, 0.0);
    assert_eq!(review.reference_solution.as_deref(), Some("sol"));

    let review = decode(json!({"review": null}));
    assert_eq!(review.category_scores.len(), 3);
}

#[test]
fn test_decode_plain_text_line_items() {
    let review = decode(json!({
        "review": {
            "coding": {
                "grade": 7,
                "line_by_line": [
                    "Line 2: off by one",
                    {"line": 5, "issue": "shadowed name", "suggestion": "rename"}
                ]
            }
        }
    }));

    assert_eq!(review.line_issues.len(), 2);
    assert_eq!(review.line_issues[0].line, None);
    assert_eq!(review.line_issues[0].issue, "Line 2: off by one");
    assert_eq!(review.line_issues[0].suggestion, "");
    assert_eq!(review.line_issues[1].line, Some(5));
    assert_eq!(review.line_issues[1].suggestion, "rename");
}
