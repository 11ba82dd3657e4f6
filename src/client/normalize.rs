//! Response interpretation and shape normalization.
//!
//! Maps whatever the analysis service returned onto an [`AnalysisOutcome`]. Absent
//! numbers become 0 and absent lists become empty; nothing here can fail.

use crate::model::{
    AnalysisBreakdown, AnalysisOutcome, AnalysisResult, Scores, MSG_ANALYSIS_FAILED,
};
use reqwest::StatusCode;
use serde_json::Value;

/// Turn a parsed response body into an outcome, given the HTTP status it came with.
pub(crate) fn interpret_response(status: StatusCode, body: Value) -> AnalysisOutcome {
    if !status.is_success() {
        return AnalysisOutcome::Failure(server_error(&body));
    }

    match body.get("success").and_then(Value::as_bool) {
        Some(true) => {}
        Some(false) => return AnalysisOutcome::Failure(server_error(&body)),
        None => return AnalysisOutcome::Malformed(body),
    }

    match body
        .get("data")
        .and_then(|d| d.get("analysis"))
        .filter(|a| a.is_object())
    {
        Some(analysis) => AnalysisOutcome::Success(normalize(analysis)),
        None => AnalysisOutcome::Malformed(body),
    }
}

/// Map the backend's `data.analysis` object onto the canonical result.
pub(crate) fn normalize(analysis: &Value) -> AnalysisResult {
    let match_percentage = number_at(analysis, "match_percentage");
    let scores = analysis.get("scores").unwrap_or(&Value::Null);

    AnalysisResult {
        match_percentage,
        scores: Scores {
            education: number_at(scores, "education"),
            skills: number_at(scores, "skills"),
            experience: number_at(scores, "experience"),
            tools: number_at(scores, "tools"),
            overall: match_percentage,
        },
        analysis: AnalysisBreakdown {
            // The backend has no counterpart for these three.
            education_match: Vec::new(),
            skills_match: strings_at(analysis, "matched_skills"),
            skills_missing: strings_at(analysis, "missing_skills"),
            tools_match: Vec::new(),
            tools_missing: Vec::new(),
            strengths: strings_at(analysis, "strengths"),
            weaknesses: strings_at(analysis, "weaknesses"),
        },
        recommendations: strings_at(analysis, "recommendations"),
    }
}

/// Server-supplied `error` message, verbatim, or the generic fallback when it is absent or blank.
pub(crate) fn server_error(body: &Value) -> String {
    body.get("error")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| MSG_ANALYSIS_FAILED.to_string())
}

fn number_at(v: &Value, key: &str) -> f64 {
    v.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn strings_at(v: &Value, key: &str) -> Vec<String> {
    v.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MSG_UNEXPECTED_SHAPE;
    use serde_json::json;

    fn well_formed() -> Value {
        json!({
            "success": true,
            "data": {
                "analysis_id": "abc",
                "filename": "cv.pdf",
                "analysis": {
                    "match_percentage": 82,
                    "scores": {"education": 90, "skills": 70, "experience": 60, "tools": 80},
                    "matched_skills": ["Python"],
                    "missing_skills": ["Docker"],
                    "strengths": ["Clear project history"],
                    "weaknesses": ["No cloud exposure"],
                    "recommendations": ["Ship a Docker project", "Learn SQL", "Write tests"]
                }
            }
        })
    }

    #[test]
    fn maps_well_formed_payload() {
        let outcome = interpret_response(StatusCode::OK, well_formed());
        let r = outcome.result().expect("success");

        assert_eq!(r.match_percentage, 82.0);
        assert_eq!(r.scores.overall, 82.0);
        assert_eq!(r.scores.education, 90.0);
        assert_eq!(r.scores.skills, 70.0);
        assert_eq!(r.scores.experience, 60.0);
        assert_eq!(r.scores.tools, 80.0);
        assert_eq!(r.analysis.skills_match, vec!["Python"]);
        assert_eq!(r.analysis.skills_missing, vec!["Docker"]);
        assert_eq!(r.analysis.strengths, vec!["Clear project history"]);
        assert_eq!(r.analysis.weaknesses, vec!["No cloud exposure"]);
        assert!(r.analysis.tools_match.is_empty());
        assert!(r.analysis.tools_missing.is_empty());
        assert!(r.analysis.education_match.is_empty());
    }

    #[test]
    fn recommendations_keep_server_order() {
        let r = normalize(&well_formed()["data"]["analysis"]);
        assert_eq!(
            r.recommendations,
            vec!["Ship a Docker project", "Learn SQL", "Write tests"]
        );
    }

    #[test]
    fn missing_scores_default_to_zero() {
        let body = json!({
            "success": true,
            "data": {"analysis": {"match_percentage": 55, "matched_skills": ["Git"]}}
        });
        let r = interpret_response(StatusCode::OK, body);
        let r = r.result().expect("success");
        assert_eq!(r.scores.education, 0.0);
        assert_eq!(r.scores.tools, 0.0);
        assert_eq!(r.scores.overall, 55.0);
        assert!(r.recommendations.is_empty());
    }

    #[test]
    fn wrong_types_count_as_absent() {
        let body = json!({
            "match_percentage": "82",
            "scores": {"skills": null},
            "matched_skills": "Python",
            "strengths": ["ok", 3, null, "fine"]
        });
        let r = normalize(&body);
        assert_eq!(r.match_percentage, 0.0);
        assert_eq!(r.scores.skills, 0.0);
        assert!(r.analysis.skills_match.is_empty());
        assert_eq!(r.analysis.strengths, vec!["ok", "fine"]);
    }

    #[test]
    fn http_error_uses_server_message() {
        let out = interpret_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "bad file"}),
        );
        assert_eq!(out, AnalysisOutcome::Failure("bad file".into()));
    }

    #[test]
    fn server_message_is_passed_through_untrimmed() {
        let outcome = interpret_response(
            StatusCode::BAD_REQUEST,
            json!({"success": false, "error": "  bad file "}),
        );
        assert_eq!(outcome, AnalysisOutcome::Failure("  bad file ".into()));

        let blank = interpret_response(StatusCode::BAD_REQUEST, json!({"error": "   "}));
        assert_eq!(blank, AnalysisOutcome::Failure(MSG_ANALYSIS_FAILED.into()));
    }

    #[test]
    fn http_error_without_message_uses_fallback() {
        let out = interpret_response(StatusCode::BAD_REQUEST, json!({"detail": "nope"}));
        assert_eq!(out, AnalysisOutcome::Failure(MSG_ANALYSIS_FAILED.into()));

        let out = interpret_response(StatusCode::BAD_GATEWAY, json!({"error": "  "}));
        assert_eq!(out, AnalysisOutcome::Failure(MSG_ANALYSIS_FAILED.into()));
    }

    #[test]
    fn success_false_is_a_failure_even_with_200() {
        let out = interpret_response(
            StatusCode::OK,
            json!({"success": false, "error": "No text found in PDF"}),
        );
        assert_eq!(out, AnalysisOutcome::Failure("No text found in PDF".into()));
    }

    #[test]
    fn unexpected_shape_is_malformed_not_success() {
        for body in [
            json!({"success": true, "data": {"filename": "cv.pdf"}}),
            json!({"success": true, "data": {"analysis": [1, 2]}}),
            json!({"status": "ok"}),
            json!([1, 2, 3]),
        ] {
            let out = interpret_response(StatusCode::OK, body.clone());
            assert_eq!(out, AnalysisOutcome::Malformed(body));
            assert_eq!(out.error_message(), Some(MSG_UNEXPECTED_SHAPE));
        }
    }
}
